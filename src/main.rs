//! Credlens: German Credit dashboard CLI
//!
//! Loads the dataset, applies the filters given on the command line and
//! prints every dashboard view, optionally exporting them as JSON.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use credlens::cli::{columns::run_columns, Cli, Commands};
use credlens::pipeline::{apply_filter, DatasetCache, DatasetStats};
use credlens::report::{export_dashboard, print_dashboard, DashboardReport, ExportMetadata};
use credlens::utils::{
    create_spinner, finish_with_success, print_banner, print_dataset_stats, print_filters,
    print_success,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_env("RUST_LOG")
        .init();

    if let Some(command) = &cli.command {
        return match command {
            Commands::Columns { input } => run_columns(input),
        };
    }

    let input = cli.input().ok_or_else(|| {
        anyhow::anyhow!("Input file is required. Use -i/--input to specify a file.")
    })?;

    print_banner(env!("CARGO_PKG_VERSION"));

    // Load once; every view below reads the same immutable frame
    let start = Instant::now();
    let cache = DatasetCache::with_schema_length(input, cli.infer_schema_length);
    let spinner = create_spinner("Loading dataset...");
    let base = cache
        .get()
        .with_context(|| format!("Failed to load dataset: {}", input.display()))?;
    finish_with_success(&spinner, "Dataset loaded");
    print_dataset_stats(&DatasetStats::of(&base));
    log::debug!("load took {:?}", start.elapsed());

    let spec = cli.filter_spec(&base).context("Invalid filter")?;
    println!();
    print_filters(input, &spec);

    let start = Instant::now();
    let filtered = apply_filter(&base, &spec)?;
    let report = DashboardReport::build(&filtered, &spec, base.height())?;
    log::debug!("filter and aggregation took {:?}", start.elapsed());

    print_dashboard(&report);

    if let Some(path) = &cli.export {
        let metadata = ExportMetadata::new(&input.display().to_string());
        export_dashboard(path, &report, metadata)?;
        println!();
        print_success(&format!("Exported views to {}", path.display()));
    }

    println!();
    Ok(())
}
