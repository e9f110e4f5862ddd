//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Ten applicants with every schema column.
///
/// - 7 `Good Risk`, 3 `Bad Risk`
/// - ages spread over [20, 70]
/// - ages 20, 25, 28 fall in [18, 30]: two good, one bad
pub fn create_credit_dataframe() -> DataFrame {
    df! {
        "risk" => ["Good Risk", "Bad Risk", "Good Risk", "Good Risk", "Bad Risk",
                   "Good Risk", "Good Risk", "Bad Risk", "Good Risk", "Good Risk"],
        "age_in_years" => [20i64, 25, 28, 33, 38, 45, 52, 58, 64, 70],
        "credit_amount" => [1000i64, 2500, 1500, 4000, 6000, 3000, 8000, 2000, 1200, 5000],
        "duration_in_month" => [12i64, 24, 18, 36, 48, 24, 60, 12, 9, 30],
        "installment_rate" => [2i64, 4, 3, 4, 4, 1, 3, 2, 1, 2],
        "present_residence_since" => [1i64, 2, 4, 3, 2, 4, 4, 1, 3, 2],
        "existing_credits" => [1i64, 1, 2, 1, 2, 1, 2, 1, 1, 1],
        "number_of_dependents" => [1i64, 1, 1, 2, 1, 1, 2, 1, 1, 1],
        "personal_status_sex" => ["female", "male single", "female", "male single", "male married",
                                  "male single", "male married", "female", "male single", "male divorced"],
        "purpose" => ["car (new)", "radio/television", "furniture", "car (new)", "business",
                      "radio/television", "car (used)", "education", "radio/television", "car (new)"],
        "housing_type" => ["rent", "own", "own", "own", "for free", "own", "own", "rent", "own", "own"],
        "employment_status" => ["< 1 year", "< 1 year", "1-4 years", "4-7 years", "1-4 years",
                                ">= 7 years", ">= 7 years", "unemployed", ">= 7 years", "4-7 years"],
        "checking_account_status" => ["< 0 DM", "< 0 DM", "0-200 DM", "none", "< 0 DM",
                                      "none", ">= 200 DM", "0-200 DM", "none", "none"],
        "savings_account_status" => ["< 100 DM", "< 100 DM", "unknown", "100-500 DM", "< 100 DM",
                                     "unknown", ">= 1000 DM", "< 100 DM", "unknown", "500-1000 DM"],
    }
    .unwrap()
}

/// Random applicants with the full schema, for property-style checks
pub fn create_random_credit_dataframe(rows: usize, seed: u64) -> DataFrame {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let purposes = ["car (new)", "car (used)", "business", "education", "radio/television"];
    let housing = ["own", "rent", "for free"];

    let risk: Vec<&str> = (0..rows)
        .map(|_| if rng.gen_bool(0.7) { "Good Risk" } else { "Bad Risk" })
        .collect();
    let age: Vec<i64> = (0..rows).map(|_| rng.gen_range(19..=75)).collect();
    let credit: Vec<i64> = (0..rows).map(|_| rng.gen_range(250..=18000)).collect();
    let duration: Vec<i64> = credit
        .iter()
        .map(|c| (c / 400 + rng.gen_range(4..=12)).min(72))
        .collect();
    let small = |rng: &mut rand::rngs::StdRng, hi: i64| -> Vec<i64> {
        (0..rows).map(|_| rng.gen_range(1..=hi)).collect()
    };
    let installment = small(&mut rng, 4);
    let residence = small(&mut rng, 4);
    let credits = small(&mut rng, 4);
    let dependents = small(&mut rng, 2);
    let pick = |rng: &mut rand::rngs::StdRng, options: &[&'static str]| -> Vec<&'static str> {
        (0..rows)
            .map(|_| options[rng.gen_range(0..options.len())])
            .collect()
    };
    let status = pick(&mut rng, &["female", "male single", "male married"]);
    let purpose = pick(&mut rng, &purposes);
    let housing_type = pick(&mut rng, &housing);
    let employment = pick(&mut rng, &["< 1 year", "1-4 years", ">= 7 years"]);
    let checking = pick(&mut rng, &["< 0 DM", "0-200 DM", "none"]);
    let savings = pick(&mut rng, &["< 100 DM", "unknown"]);

    df! {
        "risk" => risk,
        "age_in_years" => age,
        "credit_amount" => credit,
        "duration_in_month" => duration,
        "installment_rate" => installment,
        "present_residence_since" => residence,
        "existing_credits" => credits,
        "number_of_dependents" => dependents,
        "personal_status_sex" => status,
        "purpose" => purpose,
        "housing_type" => housing_type,
        "employment_status" => employment,
        "checking_account_status" => checking,
        "savings_account_status" => savings,
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("german_credit_data_treated.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Write raw CSV text to a temporary file
pub fn write_temp_csv(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("data.csv");
    std::fs::write(&csv_path, contents).unwrap();
    (temp_dir, csv_path)
}

/// Read an integer column as plain values
pub fn i64_values(df: &DataFrame, column: &str) -> Vec<i64> {
    df.column(column)
        .unwrap()
        .cast(&DataType::Int64)
        .unwrap()
        .i64()
        .unwrap()
        .into_no_null_iter()
        .collect()
}

/// Read a string column as plain values
pub fn str_values(df: &DataFrame, column: &str) -> Vec<String> {
    df.column(column)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect()
}

/// Assert that two floats are within a tolerance
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} (±{}), got {}",
        expected,
        tolerance,
        actual
    );
}
