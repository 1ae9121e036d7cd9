//! Unit tests for the Pearson correlation matrix

use docvisits::pipeline::{correlation_matrix, pearson_correlation};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

fn correlation_test_dataframe() -> DataFrame {
    df! {
        "a" => [1.0, 2.0, 3.0, 4.0, 5.0],
        "b" => [2.0, 4.0, 6.0, 8.0, 10.0],
        "c" => [5.0, 4.0, 3.0, 2.0, 1.0],
        "d" => [1.0, 3.0, 2.0, 5.0, 4.0],
        "flat" => [7.0, 7.0, 7.0, 7.0, 7.0],
    }
    .unwrap()
}

#[test]
fn test_perfect_positive_and_negative() {
    let df = correlation_test_dataframe();

    let matrix = correlation_matrix(&df, &["a", "b", "c"]).unwrap();

    common::assert_close(matrix.get("a", "b").unwrap(), 1.0, 1e-12);
    common::assert_close(matrix.get("a", "c").unwrap(), -1.0, 1e-12);
    common::assert_close(matrix.get("b", "c").unwrap(), -1.0, 1e-12);
}

#[test]
fn test_matrix_is_symmetric_with_unit_diagonal() {
    let df = correlation_test_dataframe();
    let columns = ["a", "b", "c", "d"];

    let matrix = correlation_matrix(&df, &columns).unwrap();

    for i in 0..columns.len() {
        assert_eq!(matrix.values[i][i], 1.0);
        for j in 0..columns.len() {
            assert_eq!(matrix.values[i][j], matrix.values[j][i]);
            assert!(matrix.values[i][j].abs() <= 1.0 + 1e-12);
        }
    }
    common::assert_close(matrix.get("a", "d").unwrap(), 0.8, 1e-12);
}

#[test]
fn test_constant_column_is_undefined() {
    let df = correlation_test_dataframe();

    let matrix = correlation_matrix(&df, &["a", "flat"]).unwrap();

    assert!(matrix.get("a", "flat").unwrap().is_nan());
    assert!(matrix.get("flat", "flat").unwrap().is_nan());
    assert_eq!(matrix.get("a", "a"), Some(1.0));
}

#[test]
fn test_pearson_rejects_bad_input() {
    assert!(pearson_correlation(&[], &[]).is_none());
    assert!(pearson_correlation(&[1.0, 2.0], &[1.0]).is_none());
    assert!(pearson_correlation(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_none());
}

#[test]
fn test_unknown_column_fails() {
    let df = correlation_test_dataframe();
    assert!(correlation_matrix(&df, &["a", "missing"]).is_err());
}
