//! Filter engine: risk labels, age range and credit-amount range

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::schema::{RiskLabel, AGE, CREDIT_AMOUNT, RISK};

/// Inclusive numeric range `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Range that admits every finite value
    pub fn unbounded() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Invalid filter input supplied by a caller
#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("{field} range is inverted: min {min} > max {max}")]
    InvertedRange { field: &'static str, min: f64, max: f64 },

    #[error("{field} range bound is NaN")]
    NanBound { field: &'static str },
}

/// Current state of the dashboard's filter controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub risk_labels: BTreeSet<RiskLabel>,
    pub age: NumericRange,
    pub credit: NumericRange,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            risk_labels: RiskLabel::all(),
            age: NumericRange::unbounded(),
            credit: NumericRange::unbounded(),
        }
    }
}

impl FilterSpec {
    /// All risk labels and the observed min/max of age and credit amount.
    ///
    /// This is the initial state of the filter controls.
    pub fn full_range(df: &DataFrame) -> Result<Self> {
        Ok(Self {
            risk_labels: RiskLabel::all(),
            age: observed_range(df, AGE)?,
            credit: observed_range(df, CREDIT_AMOUNT)?,
        })
    }

    /// True when no risk label is selected; such a spec always filters to
    /// an empty table.
    pub fn selects_nothing(&self) -> bool {
        self.risk_labels.is_empty()
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        for (field, range) in [("age", &self.age), ("credit", &self.credit)] {
            if range.min.is_nan() || range.max.is_nan() {
                return Err(FilterError::NanBound { field });
            }
            if range.min > range.max {
                return Err(FilterError::InvertedRange {
                    field,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        Ok(())
    }

    /// Whether a single record passes all three predicates
    pub fn admits(&self, risk: RiskLabel, age: f64, credit: f64) -> bool {
        self.risk_labels.contains(&risk) && self.age.contains(age) && self.credit.contains(credit)
    }
}

fn observed_range(df: &DataFrame, column: &str) -> Result<NumericRange> {
    let values = df
        .column(column)
        .with_context(|| format!("Column '{}' not found", column))?
        .cast(&DataType::Float64)?;
    let ca = values.f64()?;

    match (ca.min(), ca.max()) {
        (Some(min), Some(max)) => Ok(NumericRange::new(min, max)),
        _ => Ok(NumericRange::unbounded()),
    }
}

fn range_predicate(column: &str, range: &NumericRange) -> Expr {
    let mut predicate = col(column).is_not_null();
    if range.min.is_finite() {
        predicate = predicate.and(col(column).gt_eq(lit(range.min)));
    }
    if range.max.is_finite() {
        predicate = predicate.and(col(column).lt_eq(lit(range.max)));
    }
    predicate
}

/// Apply a filter spec to the base table.
///
/// Rows are kept in their original order. An empty risk-label set returns
/// an empty table with the same schema. The input frame is never modified.
pub fn apply_filter(df: &DataFrame, spec: &FilterSpec) -> Result<DataFrame> {
    if spec.selects_nothing() {
        log::debug!("no risk label selected, returning empty table");
        return Ok(df.slice(0, 0));
    }

    let risk_predicate = spec
        .risk_labels
        .iter()
        .map(|label| col(RISK).eq(lit(label.as_str())))
        .reduce(|acc, e| acc.or(e))
        .unwrap_or_else(|| lit(false));

    let predicate = risk_predicate
        .and(range_predicate(AGE, &spec.age))
        .and(range_predicate(CREDIT_AMOUNT, &spec.credit));

    let filtered = df
        .clone()
        .lazy()
        .filter(predicate)
        .collect()
        .context("Failed to apply filter")?;

    log::debug!("filter kept {} of {} rows", filtered.height(), df.height());

    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_range_is_inclusive() {
        let range = NumericRange::new(18.0, 30.0);
        assert!(range.contains(18.0));
        assert!(range.contains(30.0));
        assert!(!range.contains(30.5));
        assert!(!range.contains(f64::NAN));
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let spec = FilterSpec {
            age: NumericRange::new(40.0, 20.0),
            ..Default::default()
        };

        assert_eq!(
            spec.validate(),
            Err(FilterError::InvertedRange {
                field: "age",
                min: 40.0,
                max: 20.0
            })
        );
    }

    #[test]
    fn test_validate_rejects_nan_bound() {
        let spec = FilterSpec {
            credit: NumericRange::new(f64::NAN, 100.0),
            ..Default::default()
        };

        assert_eq!(spec.validate(), Err(FilterError::NanBound { field: "credit" }));
    }

    #[test]
    fn test_admits_requires_all_predicates() {
        let spec = FilterSpec {
            risk_labels: [RiskLabel::BadRisk].into_iter().collect(),
            age: NumericRange::new(18.0, 30.0),
            credit: NumericRange::new(0.0, 5000.0),
        };

        assert!(spec.admits(RiskLabel::BadRisk, 25.0, 1000.0));
        assert!(!spec.admits(RiskLabel::GoodRisk, 25.0, 1000.0));
        assert!(!spec.admits(RiskLabel::BadRisk, 31.0, 1000.0));
        assert!(!spec.admits(RiskLabel::BadRisk, 25.0, 5000.5));
    }
}
