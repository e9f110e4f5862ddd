//! Unit tests for the correlation matrix

use credlens::pipeline::{
    correlation_matrix, Aggregate, InsufficientData, AGE, CREDIT_AMOUNT, DURATION,
    NUMERIC_COLUMNS, PURPOSE,
};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

/// Columns with known correlation patterns
fn create_correlation_test_dataframe() -> DataFrame {
    df! {
        "a" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
        "b" => [2.0f64, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0], // b = 2*a
        "c" => [10.0f64, 9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0], // negative of a
        "d" => [5.0f64, 1.0, 8.0, 2.0, 9.0, 3.0, 7.0, 4.0, 6.0, 0.0],
        "constant" => [5.0f64; 10],
    }
    .unwrap()
}

#[test]
fn test_perfect_positive_and_negative() {
    let df = create_correlation_test_dataframe();
    let matrix = correlation_matrix(&df, &["a", "b", "c", "d"])
        .into_ready()
        .unwrap();

    assert_close(matrix.get("a", "b").unwrap(), 1.0, 1e-12);
    assert_close(matrix.get("a", "c").unwrap(), -1.0, 1e-12);
    assert!(matrix.get("a", "d").unwrap().abs() < 0.5);
}

#[test]
fn test_matrix_is_symmetric_with_unit_diagonal() {
    let df = create_random_credit_dataframe(300, 21);
    let matrix = correlation_matrix(&df, &NUMERIC_COLUMNS)
        .into_ready()
        .unwrap();

    assert_eq!(matrix.len(), NUMERIC_COLUMNS.len());
    for i in 0..matrix.len() {
        assert_eq!(matrix.values[i][i], 1.0);
        for j in 0..matrix.len() {
            let r = matrix.values[i][j];
            assert!((-1.0..=1.0).contains(&r), "r[{}][{}] = {}", i, j, r);
            assert_eq!(r, matrix.values[j][i]);
        }
    }

    // Duration is generated from credit amount
    assert!(matrix.get(CREDIT_AMOUNT, DURATION).unwrap() > 0.8);
}

#[test]
fn test_zero_variance_column_is_nan() {
    let df = create_correlation_test_dataframe();
    let matrix = correlation_matrix(&df, &["a", "constant"])
        .into_ready()
        .unwrap();

    assert_eq!(matrix.get("a", "a"), Some(1.0));
    assert!(matrix.get("a", "constant").unwrap().is_nan());
    assert!(matrix.get("constant", "constant").unwrap().is_nan());
    assert!(matrix.strongest_pairs(0.0).is_empty());
}

#[test]
fn test_nulls_use_pairwise_complete_rows() {
    let df = df! {
        "x" => [Some(1.0f64), Some(2.0), None, Some(4.0), Some(5.0)],
        "y" => [2.0f64, 4.0, 100.0, 8.0, 10.0],
        "z" => [5.0f64, 4.0, 3.0, 2.0, 1.0],
    }
    .unwrap();

    let matrix = correlation_matrix(&df, &["x", "y", "z"]).into_ready().unwrap();

    // The outlier in y sits on the row where x is null
    assert_close(matrix.get("x", "y").unwrap(), 1.0, 1e-12);
    assert_close(matrix.get("x", "z").unwrap(), -1.0, 1e-12);
    assert!(matrix.get("y", "z").unwrap() < 0.0);
    assert_eq!(matrix.get("x", "x"), Some(1.0));
}

#[test]
fn test_filtered_subset_changes_correlation() {
    let df = create_credit_dataframe();
    let full = correlation_matrix(&df, &[AGE, CREDIT_AMOUNT])
        .into_ready()
        .unwrap();

    let young = df.head(Some(4));
    let subset = correlation_matrix(&young, &[AGE, CREDIT_AMOUNT])
        .into_ready()
        .unwrap();

    assert_ne!(
        full.get(AGE, CREDIT_AMOUNT).unwrap(),
        subset.get(AGE, CREDIT_AMOUNT).unwrap()
    );
}

#[test]
fn test_non_numeric_and_missing_columns() {
    let df = create_credit_dataframe();

    assert_eq!(
        correlation_matrix(&df, &[AGE, PURPOSE]).insufficient(),
        Some(&InsufficientData::NonNumericColumn(PURPOSE.to_string()))
    );
    assert!(matches!(
        correlation_matrix(&df, &[AGE, "telephone"]),
        Aggregate::Insufficient(InsufficientData::MissingColumn(ref c)) if c == "telephone"
    ));
}

#[test]
fn test_strongest_pairs_above_threshold() {
    let df = create_correlation_test_dataframe();
    let matrix = correlation_matrix(&df, &["a", "b", "c", "d"])
        .into_ready()
        .unwrap();

    let pairs = matrix.strongest_pairs(0.9);

    // a-b, a-c, b-c are all perfect
    assert_eq!(pairs.len(), 3);
    assert!(pairs.iter().all(|p| p.correlation.abs() > 0.99));
}

#[test]
fn test_constant_float_column_is_nan_with_and_without_nulls() {
    let dense = df! {
        "a" => [0.1f64, 0.1, 0.1],
        "b" => [1.0f64, 2.0, 4.0],
    }
    .unwrap();
    let with_null = df! {
        "a" => [Some(0.1f64), Some(0.1), Some(0.1), None],
        "b" => [1.0f64, 2.0, 4.0, 8.0],
    }
    .unwrap();

    for df in [dense, with_null] {
        let matrix = correlation_matrix(&df, &["a", "b"]).into_ready().unwrap();
        assert!(matrix.get("a", "a").unwrap().is_nan());
        assert!(matrix.get("a", "b").unwrap().is_nan());
        assert_eq!(matrix.get("b", "b"), Some(1.0));
    }
}

#[test]
fn test_empty_table_without_columns_is_insufficient() {
    let df = create_credit_dataframe().slice(0, 0);

    assert_eq!(
        correlation_matrix(&df, &[]).insufficient(),
        Some(&InsufficientData::EmptyTable)
    );
}
