//! Terminal styling utilities

use console::{style, Emoji, StyledObject};
use std::path::Path;

use crate::pipeline::{DatasetStats, FilterSpec, NumericRange};

// Emoji icons with fallbacks for terminals that don't support them
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static MONEY: Emoji<'_, '_> = Emoji("💶 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("credlens").cyan().bold(),
        style("German Credit Data Dashboard").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
}

fn format_range(range: &NumericRange) -> String {
    format!("{} - {}", range.min, range.max)
}

/// Card heading padded to `width` before styling, so escape codes do not
/// count toward the padding
fn card_title(title: &str, width: usize) -> StyledObject<String> {
    style(format!("{:<width$}", title, width = width)).cyan().bold()
}

/// Print the active filter as a configuration card
pub fn print_filters(input: &Path, spec: &FilterSpec) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    let labels = if spec.selects_nothing() {
        "(none)".to_string()
    } else {
        spec.risk_labels
            .iter()
            .map(|l| l.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    println!("    ┌{}┐", line);
    println!("    │ {}│", card_title("Filters", box_width - 3));
    println!("    ├{}┤", line);
    println!(
        "    │  {}Input:  {:<41}│",
        FOLDER,
        truncate_string(&input.display().to_string(), 40)
    );
    println!("    │  {}Risk:   {:<41}│", TARGET, truncate_string(&labels, 40));
    println!("    │  {}Age:    {:<41}│", CHART, format_range(&spec.age));
    println!("    │  {}Credit: {:<41}│", MONEY, format_range(&spec.credit));
    println!("    └{}┘", line);
}

/// Print dataset shape after loading
pub fn print_dataset_stats(stats: &DatasetStats) {
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", stats.rows);
    println!("      Columns: {}", stats.columns);
    println!("      Estimated memory: {:.2} MB", stats.memory_mb);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}
