//! Value distributions and risk crosstabs
//!
//! Every aggregation is total: an empty subset or an unknown column yields
//! [`Aggregate::Insufficient`] instead of an error, so a renderer can show
//! a placeholder.

use std::collections::{BTreeMap, HashMap};

use polars::prelude::*;
use serde::Serialize;

use super::schema::{risk_labels, RiskLabel};

/// Why an aggregation could not produce a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "column", rename_all = "snake_case")]
pub enum InsufficientData {
    /// The (filtered) table has no rows
    EmptyTable,
    /// The requested column does not exist
    MissingColumn(String),
    /// A numeric aggregation was requested over a non-numeric column
    NonNumericColumn(String),
    /// The column exists but every value in the subset is null
    NoValues(String),
}

/// Result of an aggregation over a possibly-empty subset
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregate<T> {
    Ready(T),
    Insufficient(InsufficientData),
}

impl<T> Aggregate<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Aggregate::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Aggregate::Ready(value) => Some(value),
            Aggregate::Insufficient(_) => None,
        }
    }

    pub fn into_ready(self) -> Option<T> {
        match self {
            Aggregate::Ready(value) => Some(value),
            Aggregate::Insufficient(_) => None,
        }
    }

    pub fn insufficient(&self) -> Option<&InsufficientData> {
        match self {
            Aggregate::Ready(_) => None,
            Aggregate::Insufficient(reason) => Some(reason),
        }
    }
}

/// Resolve a column for aggregation, or explain why it cannot be used
pub(crate) fn usable_column<'a>(df: &'a DataFrame, column: &str) -> Result<&'a Column, InsufficientData> {
    if df.height() == 0 {
        return Err(InsufficientData::EmptyTable);
    }
    df.column(column)
        .map_err(|_| InsufficientData::MissingColumn(column.to_string()))
}

/// Convert a column to a Vec of Option<String> for grouping
pub(crate) fn column_to_string_vec(col: &Column) -> PolarsResult<Vec<Option<String>>> {
    let values: Vec<Option<String>> = match col.dtype() {
        DataType::String => col
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect(),
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
            let cast = col.cast(&DataType::Int64)?;
            cast.i64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
            let cast = col.cast(&DataType::UInt64)?;
            cast.u64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::Float32 | DataType::Float64 => {
            let cast = col.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .map(|v| v.map(|n| format!("{}", n)))
                .collect()
        }
        DataType::Boolean => col
            .bool()?
            .into_iter()
            .map(|v| v.map(|b| b.to_string()))
            .collect(),
        DataType::Null => vec![None; col.len()],
        _ => {
            let cast = col.cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| v.map(|s| s.to_string()))
                .collect()
        }
    };

    Ok(values)
}

fn category_values(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>, InsufficientData> {
    let col = usable_column(df, column)?;
    let values = column_to_string_vec(col)
        .map_err(|_| InsufficientData::MissingColumn(column.to_string()))?;
    if values.iter().all(Option::is_none) {
        return Err(InsufficientData::NoValues(column.to_string()));
    }
    Ok(values)
}

/// Count of rows per distinct value of a column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub column: String,
    /// `(value, count)`, most frequent first, ties broken by value
    pub counts: Vec<(String, usize)>,
}

impl Distribution {
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    pub fn get(&self, value: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, n)| *n)
    }

    /// Share of each value in percent
    pub fn percentages(&self) -> Vec<(String, f64)> {
        let total = self.total() as f64;
        self.counts
            .iter()
            .map(|(v, n)| (v.clone(), *n as f64 / total * 100.0))
            .collect()
    }
}

/// Count rows per distinct value of `column`. Nulls are not counted.
pub fn distribution(df: &DataFrame, column: &str) -> Aggregate<Distribution> {
    let values = match category_values(df, column) {
        Ok(values) => values,
        Err(reason) => return Aggregate::Insufficient(reason),
    };

    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in values.into_iter().flatten() {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    Aggregate::Ready(Distribution {
        column: column.to_string(),
        counts,
    })
}

/// Units of the values in a [`CrossRiskTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossRiskUnit {
    /// Percentage of the category's rows carrying each label
    Percentage,
    /// Raw row counts; used when the subset holds a single risk class
    Count,
}

/// One row of a crosstab
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossRiskRow {
    pub category: String,
    /// One value per entry of [`CrossRiskTable::risk_labels`]
    pub values: Vec<f64>,
}

/// Two-way breakdown of a column against the risk label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossRiskTable {
    pub column: String,
    pub unit: CrossRiskUnit,
    /// Labels present in the subset, in `RiskLabel` order
    pub risk_labels: Vec<RiskLabel>,
    /// Categories sorted by value
    pub rows: Vec<CrossRiskRow>,
}

impl CrossRiskTable {
    pub fn is_single_class(&self) -> bool {
        self.unit == CrossRiskUnit::Count
    }

    pub fn value(&self, category: &str, label: RiskLabel) -> Option<f64> {
        let idx = self.risk_labels.iter().position(|l| *l == label)?;
        self.rows
            .iter()
            .find(|r| r.category == category)
            .map(|r| r.values[idx])
    }

    /// Long format: one `(category, label, value)` triple per cell
    pub fn to_long(&self) -> Vec<(String, RiskLabel, f64)> {
        self.rows
            .iter()
            .flat_map(|row| {
                self.risk_labels
                    .iter()
                    .zip(row.values.iter())
                    .map(move |(label, value)| (row.category.clone(), *label, *value))
            })
            .collect()
    }
}

/// Break `column` down against the risk label.
///
/// With two or more risk classes in the subset each category's values are
/// percentages summing to 100. With a single class the values are raw
/// counts for that class, since a one-class percentage is always 100.
/// Rows with a null category are skipped.
pub fn cross_risk(df: &DataFrame, column: &str) -> Aggregate<CrossRiskTable> {
    let categories = match category_values(df, column) {
        Ok(values) => values,
        Err(reason) => return Aggregate::Insufficient(reason),
    };
    let risks = risk_labels(df);
    if risks.len() != categories.len() {
        return Aggregate::Insufficient(InsufficientData::MissingColumn(
            super::schema::RISK.to_string(),
        ));
    }

    let mut counts: BTreeMap<String, BTreeMap<RiskLabel, usize>> = BTreeMap::new();
    for (category, risk) in categories.into_iter().zip(risks) {
        if let (Some(category), Some(risk)) = (category, risk) {
            *counts.entry(category).or_default().entry(risk).or_insert(0) += 1;
        }
    }

    let present: Vec<RiskLabel> = RiskLabel::ALL
        .into_iter()
        .filter(|label| counts.values().any(|by_label| by_label.contains_key(label)))
        .collect();

    if present.is_empty() {
        return Aggregate::Insufficient(InsufficientData::NoValues(column.to_string()));
    }

    let unit = if present.len() > 1 {
        CrossRiskUnit::Percentage
    } else {
        CrossRiskUnit::Count
    };

    let rows = counts
        .into_iter()
        .map(|(category, by_label)| {
            let row_total: usize = by_label.values().sum();
            let values = present
                .iter()
                .map(|label| {
                    let n = by_label.get(label).copied().unwrap_or(0) as f64;
                    match unit {
                        CrossRiskUnit::Percentage => n / row_total as f64 * 100.0,
                        CrossRiskUnit::Count => n,
                    }
                })
                .collect();
            CrossRiskRow { category, values }
        })
        .collect();

    Aggregate::Ready(CrossRiskTable {
        column: column.to_string(),
        unit,
        risk_labels: present,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_frame() -> DataFrame {
        df! {
            "risk" => ["Good Risk", "Bad Risk", "Good Risk", "Good Risk"],
            "housing_type" => [Some("own"), Some("rent"), None, Some("own")],
            "existing_credits" => [1i64, 2, 1, 1],
        }
        .unwrap()
    }

    #[test]
    fn test_distribution_orders_by_count() {
        let df = small_frame();
        let dist = distribution(&df, "existing_credits").into_ready().unwrap();

        assert_eq!(dist.counts, vec![("1".to_string(), 3), ("2".to_string(), 1)]);
        assert_eq!(dist.total(), df.height());
    }

    #[test]
    fn test_distribution_skips_nulls() {
        let df = small_frame();
        let dist = distribution(&df, "housing_type").into_ready().unwrap();

        assert_eq!(dist.get("own"), Some(2));
        assert_eq!(dist.get("rent"), Some(1));
        assert_eq!(dist.total(), 3);
    }

    #[test]
    fn test_distribution_missing_column() {
        let df = small_frame();
        assert_eq!(
            distribution(&df, "job"),
            Aggregate::Insufficient(InsufficientData::MissingColumn("job".to_string()))
        );
    }

    #[test]
    fn test_cross_risk_fills_absent_pairs_with_zero() {
        let df = small_frame();
        let table = cross_risk(&df, "housing_type").into_ready().unwrap();

        assert_eq!(table.unit, CrossRiskUnit::Percentage);
        assert_eq!(table.value("own", RiskLabel::GoodRisk), Some(100.0));
        assert_eq!(table.value("own", RiskLabel::BadRisk), Some(0.0));
        assert_eq!(table.value("rent", RiskLabel::BadRisk), Some(100.0));
        assert_eq!(table.to_long().len(), 4);
    }

    #[test]
    fn test_cross_risk_all_null_column() {
        let df = df! {
            "risk" => ["Good Risk", "Bad Risk"],
            "purpose" => [None::<&str>, None],
        }
        .unwrap();

        assert_eq!(
            cross_risk(&df, "purpose").insufficient(),
            Some(&InsufficientData::NoValues("purpose".to_string()))
        );
    }
}
