//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Header of the survey file, identifier column first
pub const SURVEY_HEADER: &str = "person_id,lottery,female,birthyear,hh_inc,doc_visit_num";

/// One deterministic survey row.
///
/// Lottery alternates every row and sex every two rows, so both indicators
/// are balanced and uncorrelated, and every subgroup has varying regressors.
pub fn survey_row(i: usize) -> String {
    let lottery = if i % 2 == 0 { "Selected" } else { "Not selected" };
    let female = if (i / 2) % 2 == 0 { "1: Female" } else { "0: Male" };
    let birthyear = 1945 + (i * 7) % 50;
    let hh_inc = 1000 + (i * 1237) % 20000;
    let visits = (i * 3 + i / 5) % 8;
    format!(
        "{},{},{},{},{},{}",
        i + 1,
        lottery,
        female,
        birthyear,
        hh_inc,
        visits
    )
}

/// Write a survey CSV with `rows` deterministic rows
pub fn write_survey_csv(path: &Path, rows: usize) {
    let mut file = std::fs::File::create(path).unwrap();
    writeln!(file, "{}", SURVEY_HEADER).unwrap();
    for i in 0..rows {
        writeln!(file, "{}", survey_row(i)).unwrap();
    }
}

/// Create a temporary directory holding `survey.csv`
pub fn create_temp_survey_csv(rows: usize) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("survey.csv");
    write_survey_csv(&csv_path, rows);
    (temp_dir, csv_path)
}

/// Write arbitrary CSV lines to `name` inside a fresh temp directory
pub fn create_temp_csv_from_lines(name: &str, lines: &[&str]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join(name);
    let mut file = std::fs::File::create(&csv_path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    (temp_dir, csv_path)
}

/// Already recoded survey table with derived age, built in memory
pub fn create_recoded_dataframe(rows: usize) -> DataFrame {
    let lottery: Vec<i32> = (0..rows).map(|i| i32::from(i % 2 == 0)).collect();
    let female: Vec<i32> = (0..rows).map(|i| i32::from((i / 2) % 2 == 0)).collect();
    let age: Vec<f64> = (0..rows)
        .map(|i| 2010.0 - (1945 + (i * 7) % 50) as f64)
        .collect();
    let hh_inc: Vec<f64> = (0..rows).map(|i| (1000 + (i * 1237) % 20000) as f64).collect();
    let visits: Vec<f64> = (0..rows).map(|i| ((i * 3 + i / 5) % 8) as f64).collect();

    df! {
        "lottery" => lottery,
        "female" => female,
        "age" => age,
        "hh_inc" => hh_inc,
        "doc_visit_num" => visits,
    }
    .unwrap()
}

/// Assert two floats agree within `tol`
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {} (±{}), got {}",
        expected,
        tol,
        actual
    );
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(
        rows, expected_rows,
        "Row count mismatch: expected {}, got {}",
        expected_rows, rows
    );
    assert_eq!(
        cols, expected_cols,
        "Column count mismatch: expected {}, got {}",
        expected_cols, cols
    );
}
