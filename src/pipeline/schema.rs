//! Fixed schema of the German Credit dataset
//!
//! Column names follow the pre-cleaned ("treated") CSV. The loader validates
//! every required column against this table before the data is handed out.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const RISK: &str = "risk";
pub const AGE: &str = "age_in_years";
pub const CREDIT_AMOUNT: &str = "credit_amount";
pub const DURATION: &str = "duration_in_month";
pub const INSTALLMENT_RATE: &str = "installment_rate";
pub const RESIDENCE_SINCE: &str = "present_residence_since";
pub const EXISTING_CREDITS: &str = "existing_credits";
pub const DEPENDENTS: &str = "number_of_dependents";
pub const PERSONAL_STATUS: &str = "personal_status_sex";
pub const PURPOSE: &str = "purpose";
pub const HOUSING: &str = "housing_type";
pub const EMPLOYMENT: &str = "employment_status";
pub const CHECKING_ACCOUNT: &str = "checking_account_status";
pub const SAVINGS_ACCOUNT: &str = "savings_account_status";

/// Numeric attributes, in the order used for the correlation heatmap.
pub const NUMERIC_COLUMNS: [&str; 7] = [
    AGE,
    CREDIT_AMOUNT,
    DURATION,
    INSTALLMENT_RATE,
    RESIDENCE_SINCE,
    EXISTING_CREDITS,
    DEPENDENTS,
];

pub const CATEGORICAL_COLUMNS: [&str; 6] = [
    PERSONAL_STATUS,
    PURPOSE,
    HOUSING,
    EMPLOYMENT,
    CHECKING_ACCOUNT,
    SAVINGS_ACCOUNT,
];

/// Binary credit risk outcome of an applicant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLabel {
    #[serde(rename = "Good Risk")]
    GoodRisk,
    #[serde(rename = "Bad Risk")]
    BadRisk,
}

impl RiskLabel {
    pub const ALL: [RiskLabel; 2] = [RiskLabel::GoodRisk, RiskLabel::BadRisk];

    /// The label as it appears in the dataset
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::GoodRisk => "Good Risk",
            RiskLabel::BadRisk => "Bad Risk",
        }
    }

    pub fn all() -> BTreeSet<RiskLabel> {
        Self::ALL.into_iter().collect()
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Good Risk" => Ok(RiskLabel::GoodRisk),
            "Bad Risk" => Ok(RiskLabel::BadRisk),
            other => Err(format!(
                "unknown risk label '{}' (expected 'Good Risk' or 'Bad Risk')",
                other
            )),
        }
    }
}

/// Kind of values a schema column must hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Risk,
    Numeric,
    Categorical,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Risk => f.write_str("risk label (string)"),
            ColumnKind::Numeric => f.write_str("numeric"),
            ColumnKind::Categorical => f.write_str("categorical (string)"),
        }
    }
}

/// Every required column with its expected kind
pub fn required_columns() -> Vec<(&'static str, ColumnKind)> {
    let mut columns = vec![(RISK, ColumnKind::Risk)];
    columns.extend(NUMERIC_COLUMNS.iter().map(|c| (*c, ColumnKind::Numeric)));
    columns.extend(CATEGORICAL_COLUMNS.iter().map(|c| (*c, ColumnKind::Categorical)));
    columns
}

/// Errors raised while loading the dataset. All of them are fatal.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("dataset file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported file format '{extension}' for {}: expected csv", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("required column '{0}' is missing")]
    MissingColumn(String),

    #[error("column '{column}' should be {expected}, found {found}")]
    WrongType {
        column: String,
        expected: ColumnKind,
        found: String,
    },

    #[error("row {row}: risk label is missing")]
    NullRisk { row: usize },

    #[error("row {row}: invalid risk label '{value}'")]
    InvalidRiskLabel { row: usize, value: String },
}

/// Check a DataFrame against the fixed schema.
///
/// Extra columns are allowed; every required column must be present with
/// the right kind, and every risk value must be a known label.
pub fn validate_schema(df: &DataFrame) -> Result<(), DataLoadError> {
    for (name, kind) in required_columns() {
        let column = df
            .column(name)
            .map_err(|_| DataLoadError::MissingColumn(name.to_string()))?;

        let dtype = column.dtype();
        let matches = match kind {
            ColumnKind::Numeric => dtype.is_primitive_numeric(),
            // An all-null categorical column is read back as Null by the CSV reader
            ColumnKind::Categorical => matches!(dtype, DataType::String | DataType::Null),
            ColumnKind::Risk => matches!(dtype, DataType::String),
        };

        if !matches {
            return Err(DataLoadError::WrongType {
                column: name.to_string(),
                expected: kind,
                found: dtype.to_string(),
            });
        }
    }

    let risk = df
        .column(RISK)
        .and_then(|c| c.str().cloned())
        .map_err(|_| DataLoadError::MissingColumn(RISK.to_string()))?;

    for (row, value) in risk.into_iter().enumerate() {
        match value {
            None => return Err(DataLoadError::NullRisk { row }),
            Some(v) => {
                v.parse::<RiskLabel>()
                    .map_err(|_| DataLoadError::InvalidRiskLabel {
                        row,
                        value: v.to_string(),
                    })?;
            }
        }
    }

    Ok(())
}

/// Read the risk column as typed labels.
///
/// Only valid on a frame that passed [`validate_schema`]; unknown values
/// (which validation rules out) are dropped.
pub fn risk_labels(df: &DataFrame) -> Vec<Option<RiskLabel>> {
    match df.column(RISK).and_then(|c| c.str().cloned()) {
        Ok(ca) => ca
            .into_iter()
            .map(|v| v.and_then(|s| s.parse().ok()))
            .collect(),
        Err(_) => Vec::new(),
    }
}
