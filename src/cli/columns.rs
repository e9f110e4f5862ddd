//! `columns` subcommand: list the header of a CSV file against the schema

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use crate::pipeline::{get_column_names, required_columns};

/// Print every column of `input`, marking required schema columns and
/// reporting any that are missing
pub fn run_columns(input: &Path) -> Result<()> {
    let columns = get_column_names(input)
        .with_context(|| format!("Failed to read header of {}", input.display()))?;
    let required = required_columns();

    println!(
        "\n {} {} column(s) in {}",
        style("◆").cyan().bold(),
        style(columns.len()).yellow(),
        style(input.display()).dim()
    );

    for name in &columns {
        match required.iter().find(|(r, _)| r == name) {
            Some((_, kind)) => println!("   {} {} {}", style("✓").green(), name, style(kind).dim()),
            None => println!("   {} {}", style("·").dim(), name),
        }
    }

    let missing: Vec<&str> = required
        .iter()
        .filter(|(r, _)| !columns.iter().any(|c| c == r))
        .map(|(r, _)| *r)
        .collect();

    if !missing.is_empty() {
        println!();
        println!(
            "   {} missing required column(s): {}",
            style("✗").red().bold(),
            missing.join(", ")
        );
    }

    Ok(())
}
