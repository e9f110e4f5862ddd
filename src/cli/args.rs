//! Command-line argument definitions using clap

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use polars::prelude::DataFrame;

use crate::pipeline::{FilterSpec, NumericRange, RiskLabel};

/// Credlens - Explore the German Credit dataset through filtered dashboard views
#[derive(Parser, Debug)]
#[command(name = "credlens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Input CSV file (pre-cleaned German Credit data)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Risk label to include ("Good Risk" or "Bad Risk"). Repeat to select both.
    /// Defaults to all labels.
    #[arg(long = "risk", value_parser = parse_risk_label, conflicts_with = "no_risk")]
    pub risk: Vec<RiskLabel>,

    /// Select no risk label at all (the dashboard shows no data)
    #[arg(long, default_value = "false")]
    pub no_risk: bool,

    /// Minimum age in years (inclusive). Defaults to the youngest applicant.
    #[arg(long)]
    pub age_min: Option<f64>,

    /// Maximum age in years (inclusive). Defaults to the oldest applicant.
    #[arg(long)]
    pub age_max: Option<f64>,

    /// Minimum credit amount in DM (inclusive). Defaults to the smallest credit.
    #[arg(long)]
    pub credit_min: Option<f64>,

    /// Maximum credit amount in DM (inclusive). Defaults to the largest credit.
    #[arg(long)]
    pub credit_max: Option<f64>,

    /// Write every dashboard view to this JSON file
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    /// Number of rows to use for schema inference.
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the columns of a CSV file
    Columns {
        /// Input CSV file
        input: PathBuf,
    },
}

impl Cli {
    pub fn input(&self) -> Option<&PathBuf> {
        self.input.as_ref()
    }

    /// Log level implied by the number of `-v` flags
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    /// Selected risk labels: none with `--no-risk`, all when `--risk` is absent
    pub fn risk_labels(&self) -> BTreeSet<RiskLabel> {
        if self.no_risk {
            BTreeSet::new()
        } else if self.risk.is_empty() {
            RiskLabel::all()
        } else {
            self.risk.iter().copied().collect()
        }
    }

    /// Build the filter from the flags, defaulting unset bounds to the
    /// observed range of `df`.
    pub fn filter_spec(&self, df: &DataFrame) -> Result<FilterSpec> {
        let mut spec = FilterSpec::full_range(df)?;
        spec.risk_labels = self.risk_labels();

        override_range(&mut spec.age, self.age_min, self.age_max);
        override_range(&mut spec.credit, self.credit_min, self.credit_max);

        spec.validate()?;
        Ok(spec)
    }
}

/// Apply user-supplied bounds to an observed range.
///
/// A single bound beyond the observed data moves the unset side with it, so
/// the range selects no rows instead of being inverted.
fn override_range(range: &mut NumericRange, min: Option<f64>, max: Option<f64>) {
    match (min, max) {
        (Some(min), Some(max)) => *range = NumericRange::new(min, max),
        (Some(min), None) => *range = NumericRange::new(min, range.max.max(min)),
        (None, Some(max)) => *range = NumericRange::new(range.min.min(max), max),
        (None, None) => {}
    }
}

/// Validator for risk label values
fn parse_risk_label(s: &str) -> Result<RiskLabel, String> {
    s.parse()
}
