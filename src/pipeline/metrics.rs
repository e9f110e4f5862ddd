//! Headline metric cards and scatter series

use polars::prelude::*;
use serde::Serialize;

use super::aggregate::{usable_column, Aggregate, InsufficientData};
use super::schema::{risk_labels, RiskLabel, AGE, CREDIT_AMOUNT};

/// Good-risk share of the subset.
///
/// A subset holding a single risk class reports the raw count of good-risk
/// rows instead of a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "unit", content = "value", rename_all = "snake_case")]
pub enum RiskShare {
    Percentage(f64),
    Count(usize),
}

/// Scalars shown on the metric cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlineMetrics {
    pub applicants: usize,
    pub good_risk: usize,
    pub bad_risk: usize,
    pub good_risk_share: RiskShare,
    /// Percent of bad-risk applicants; absent when the subset has none
    pub bad_risk_pct: Option<f64>,
    pub mean_age: Option<f64>,
    pub mean_credit: Option<f64>,
}

fn column_mean(df: &DataFrame, column: &str) -> Option<f64> {
    df.column(column)
        .ok()?
        .cast(&DataType::Float64)
        .ok()?
        .f64()
        .ok()?
        .mean()
}

pub fn headline_metrics(df: &DataFrame) -> Aggregate<HeadlineMetrics> {
    if df.height() == 0 {
        return Aggregate::Insufficient(InsufficientData::EmptyTable);
    }

    let risks = risk_labels(df);
    let good_risk = risks
        .iter()
        .filter(|r| **r == Some(RiskLabel::GoodRisk))
        .count();
    let bad_risk = risks
        .iter()
        .filter(|r| **r == Some(RiskLabel::BadRisk))
        .count();
    let applicants = df.height();

    let good_risk_share = if good_risk > 0 && bad_risk > 0 {
        RiskShare::Percentage(good_risk as f64 / applicants as f64 * 100.0)
    } else {
        RiskShare::Count(good_risk)
    };

    let bad_risk_pct = (bad_risk > 0).then(|| bad_risk as f64 / applicants as f64 * 100.0);

    Aggregate::Ready(HeadlineMetrics {
        applicants,
        good_risk,
        bad_risk,
        good_risk_share,
        bad_risk_pct,
        mean_age: column_mean(df, AGE),
        mean_credit: column_mean(df, CREDIT_AMOUNT),
    })
}

/// One point of a scatter chart, colored by risk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub risk: RiskLabel,
}

fn numeric_values(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>, InsufficientData> {
    let col = usable_column(df, column)?;
    if !col.dtype().is_primitive_numeric() {
        return Err(InsufficientData::NonNumericColumn(column.to_string()));
    }
    col.cast(&DataType::Float64)
        .and_then(|c| c.f64().map(|ca| ca.into_iter().collect()))
        .map_err(|_| InsufficientData::NonNumericColumn(column.to_string()))
}

/// `(x, y, risk)` triples for every row with both values present
pub fn scatter_points(df: &DataFrame, x: &str, y: &str) -> Aggregate<Vec<ScatterPoint>> {
    let xs = match numeric_values(df, x) {
        Ok(values) => values,
        Err(reason) => return Aggregate::Insufficient(reason),
    };
    let ys = match numeric_values(df, y) {
        Ok(values) => values,
        Err(reason) => return Aggregate::Insufficient(reason),
    };

    let points: Vec<ScatterPoint> = xs
        .into_iter()
        .zip(ys)
        .zip(risk_labels(df))
        .filter_map(|((x, y), risk)| {
            Some(ScatterPoint {
                x: x?,
                y: y?,
                risk: risk?,
            })
        })
        .collect();

    if points.is_empty() {
        return Aggregate::Insufficient(InsufficientData::NoValues(format!("{}/{}", x, y)));
    }

    Aggregate::Ready(points)
}
