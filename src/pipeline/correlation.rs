//! Pearson correlation matrix over numeric columns

use faer::Mat;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

use super::aggregate::{usable_column, Aggregate, InsufficientData};

/// A pair of columns whose correlation exceeds a threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelatedPair {
    pub feature1: String,
    pub feature2: String,
    pub correlation: f64,
}

/// Symmetric matrix of Pearson coefficients.
///
/// Entries involving a zero-variance column are NaN.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }

    /// Off-diagonal pairs with |r| above `threshold`, strongest first
    pub fn strongest_pairs(&self, threshold: f64) -> Vec<CorrelatedPair> {
        let n = self.columns.len();
        let mut pairs = Vec::new();

        for i in 0..n {
            for j in (i + 1)..n {
                let corr = self.values[i][j];
                if corr.abs() > threshold && !corr.is_nan() {
                    pairs.push(CorrelatedPair {
                        feature1: self.columns[i].clone(),
                        feature2: self.columns[j].clone(),
                        correlation: corr,
                    });
                }
            }
        }

        pairs.sort_by(|a, b| {
            b.correlation
                .abs()
                .partial_cmp(&a.correlation.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        pairs
    }
}

/// Compute the correlation matrix of `columns` over the rows of `df`.
///
/// Uses the standardized matrix product when none of the columns has nulls
/// and pairwise-complete observations otherwise.
pub fn correlation_matrix(df: &DataFrame, columns: &[&str]) -> Aggregate<CorrelationMatrix> {
    if df.height() == 0 {
        return Aggregate::Insufficient(InsufficientData::EmptyTable);
    }

    let mut float_columns: Vec<(String, Vec<Option<f64>>)> = Vec::with_capacity(columns.len());

    for name in columns {
        let column = match usable_column(df, name) {
            Ok(column) => column,
            Err(reason) => return Aggregate::Insufficient(reason),
        };
        if !column.dtype().is_primitive_numeric() {
            return Aggregate::Insufficient(InsufficientData::NonNumericColumn(name.to_string()));
        }
        let values = match column.cast(&DataType::Float64).and_then(|c| {
            c.f64()
                .map(|ca| ca.into_iter().collect::<Vec<Option<f64>>>())
        }) {
            Ok(values) => values,
            Err(_) => {
                return Aggregate::Insufficient(InsufficientData::NonNumericColumn(
                    name.to_string(),
                ))
            }
        };
        float_columns.push((name.to_string(), values));
    }

    let has_nulls = float_columns
        .iter()
        .any(|(_, values)| values.iter().any(Option::is_none));

    let values = if has_nulls {
        compute_correlation_pairwise(&float_columns)
    } else {
        let dense: Vec<Vec<f64>> = float_columns
            .iter()
            .map(|(_, values)| values.iter().map(|v| v.unwrap_or(0.0)).collect())
            .collect();
        compute_correlation_matrix_fast(&dense)
    };

    log::debug!(
        "correlation over {} columns and {} rows ({} path)",
        columns.len(),
        df.height(),
        if has_nulls { "pairwise" } else { "matrix" }
    );

    Aggregate::Ready(CorrelationMatrix {
        columns: float_columns.into_iter().map(|(name, _)| name).collect(),
        values,
    })
}

/// Pearson correlation over the rows where both values are present, using
/// a single-pass Welford update. `None` when fewer than two rows remain or
/// either side has zero variance.
pub fn pearson_correlation(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let mut n = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for (x, y) in x.iter().zip(y.iter()) {
        if let (Some(x), Some(y)) = (x, y) {
            n += 1.0;
            let dx = x - mean_x;
            let dy = y - mean_y;
            mean_x += dx / n;
            mean_y += dy / n;
            var_x += dx * (x - mean_x);
            var_y += dy * (y - mean_y);
            cov_xy += dx * (y - mean_y);
        }
    }

    if n < 2.0 || var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }

    Some((cov_xy / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

fn compute_correlation_pairwise(float_columns: &[(String, Vec<Option<f64>>)]) -> Vec<Vec<f64>> {
    let n = float_columns.len();
    let mut values = vec![vec![f64::NAN; n]; n];

    // Upper triangle including the diagonal
    let pairs: Vec<(usize, usize)> = (0..n).flat_map(|i| (i..n).map(move |j| (i, j))).collect();

    let results: Vec<(usize, usize, f64)> = pairs
        .par_iter()
        .map(|&(i, j)| {
            let corr = pearson_correlation(&float_columns[i].1, &float_columns[j].1)
                .map(|c| if i == j { 1.0 } else { c })
                .unwrap_or(f64::NAN);
            (i, j, corr)
        })
        .collect();

    for (i, j, corr) in results {
        values[i][j] = corr;
        values[j][i] = corr;
    }

    values
}

/// Correlation matrix via R = Z^T * Z / n over standardized columns.
///
/// Zero-variance columns get NaN rows and columns.
fn compute_correlation_matrix_fast(columns: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n_cols = columns.len();
    let n_rows = columns.first().map(|c| c.len()).unwrap_or(0);
    let mut values = vec![vec![f64::NAN; n_cols]; n_cols];

    if n_rows < 2 {
        return values;
    }

    let standardized: Vec<Option<Vec<f64>>> = columns
        .par_iter()
        .map(|col| {
            // A rounded mean leaves a tiny residual sum of squares on constant columns
            if col.iter().all(|x| *x == col[0]) {
                return None;
            }
            let mean = col.iter().sum::<f64>() / n_rows as f64;
            let ss: f64 = col.iter().map(|x| (x - mean) * (x - mean)).sum();
            if ss <= 0.0 {
                return None;
            }
            let scale = ss.sqrt();
            Some(col.iter().map(|x| (x - mean) / scale).collect())
        })
        .collect();

    let valid: Vec<(usize, &Vec<f64>)> = standardized
        .iter()
        .enumerate()
        .filter_map(|(i, col)| col.as_ref().map(|c| (i, c)))
        .collect();

    let mut z = Mat::<f64>::zeros(n_rows, valid.len());
    for (col_idx, (_, col_data)) in valid.iter().enumerate() {
        for (row_idx, &val) in col_data.iter().enumerate() {
            z[(row_idx, col_idx)] = val;
        }
    }

    let corr = z.transpose() * &z;

    // Read the upper triangle only so the result is exactly symmetric
    for (a, (i, _)) in valid.iter().enumerate() {
        values[*i][*i] = 1.0;
        for (b, (j, _)) in valid.iter().enumerate().skip(a + 1) {
            let r = corr[(a, b)].clamp(-1.0, 1.0);
            values[*i][*j] = r;
            values[*j][*i] = r;
        }
    }

    values
}
