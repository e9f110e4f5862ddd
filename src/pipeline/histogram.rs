//! Equal-width histograms for numeric columns

use polars::prelude::*;
use serde::Serialize;

use super::aggregate::{usable_column, Aggregate, InsufficientData};

/// Bins used for the age histogram
pub const AGE_HISTOGRAM_BINS: usize = 20;
/// Bins used for the credit amount histogram
pub const CREDIT_HISTOGRAM_BINS: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub column: String,
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Split `[min, max]` of `column` into `bins` equal-width bins.
///
/// Bins are left-inclusive except the last, which also holds `max`. A
/// constant column collapses into a single bin. Nulls are not counted.
pub fn histogram(df: &DataFrame, column: &str, bins: usize) -> Aggregate<Histogram> {
    let col = match usable_column(df, column) {
        Ok(col) => col,
        Err(reason) => return Aggregate::Insufficient(reason),
    };
    if !col.dtype().is_primitive_numeric() {
        return Aggregate::Insufficient(InsufficientData::NonNumericColumn(column.to_string()));
    }

    let values: Vec<f64> = match col.cast(&DataType::Float64).and_then(|c| {
        c.f64()
            .map(|ca| ca.into_iter().flatten().filter(|v| v.is_finite()).collect())
    }) {
        Ok(values) => values,
        Err(_) => {
            return Aggregate::Insufficient(InsufficientData::NonNumericColumn(column.to_string()))
        }
    };

    if values.is_empty() {
        return Aggregate::Insufficient(InsufficientData::NoValues(column.to_string()));
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max || bins <= 1 {
        return Aggregate::Ready(Histogram {
            column: column.to_string(),
            bins: vec![HistogramBin {
                lower: min,
                upper: max,
                count: values.len(),
            }],
        });
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in &values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    let edges = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count,
        })
        .collect();

    Aggregate::Ready(Histogram {
        column: column.to_string(),
        bins: edges,
    })
}
