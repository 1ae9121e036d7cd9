//! Tests for dataset loading, schema validation and recoding

use docvisits::pipeline::{
    load_dataset, load_survey, numeric_values, AnalysisError, FEMALE, LOTTERY,
};
use polars::prelude::*;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_load_csv_file() {
    let (_dir, csv_path) =
        common::create_temp_csv_from_lines("test.csv", &["a,b,c", "1,2,3", "4,5,6"]);

    let df = load_dataset(&csv_path, 100).unwrap();

    common::assert_shape(&df, 2, 3);
    assert_eq!(df.get_column_names(), &["a", "b", "c"]);
}

#[test]
fn test_load_parquet_file() {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test.parquet");

    let mut df = df! {
        "x" => [1i32, 2, 3],
        "y" => [4i32, 5, 6],
    }
    .unwrap();

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(&mut df).unwrap();

    let loaded = load_dataset(&parquet_path, 100).unwrap();

    common::assert_shape(&loaded, 3, 2);
    assert_eq!(loaded.get_column_names(), &["x", "y"]);
}

#[test]
fn test_unsupported_format() {
    let temp_dir = TempDir::new().unwrap();
    let bad_path = temp_dir.path().join("test.xlsx");
    std::fs::File::create(&bad_path).unwrap();

    let err = load_dataset(&bad_path, 100).unwrap_err();

    assert!(
        err.to_string().contains("Unsupported"),
        "Error message should mention unsupported format: {}",
        err
    );
}

#[test]
fn test_nonexistent_file() {
    let path = std::path::Path::new("/nonexistent/path/to/file.csv");
    assert!(load_dataset(path, 100).is_err());
}

#[test]
fn test_load_survey_recodes_every_row() {
    let (_dir, csv_path) = common::create_temp_survey_csv(20);

    let df = load_survey(&csv_path, 100).unwrap();

    common::assert_shape(&df, 20, 6);
    for column in [LOTTERY, FEMALE] {
        let values = numeric_values(&df, column).unwrap();
        assert_eq!(values.len(), 20, "No row may be dropped");
        assert!(
            values.iter().all(|&v| v == 0.0 || v == 1.0),
            "{} must be recoded to 0/1",
            column
        );
    }

    let lottery = numeric_values(&df, LOTTERY).unwrap();
    assert_eq!(&lottery[..4], &[1.0, 0.0, 1.0, 0.0]);
    let female = numeric_values(&df, FEMALE).unwrap();
    assert_eq!(&female[..4], &[1.0, 1.0, 0.0, 0.0]);
}

#[test]
fn test_load_survey_rejects_unknown_label() {
    let (_dir, csv_path) = common::create_temp_csv_from_lines(
        "bad.csv",
        &[
            common::SURVEY_HEADER,
            "1,Selected,1: Female,1970,5000,2",
            "2,Maybe,0: Male,1980,7000,0",
        ],
    );

    let err = load_survey(&csv_path, 100).unwrap_err();

    match err.downcast_ref::<AnalysisError>() {
        Some(AnalysisError::UnexpectedLabel { column, row, label, .. }) => {
            assert_eq!(column, "lottery");
            assert_eq!(*row, 1);
            assert_eq!(label, "Maybe");
        }
        other => panic!("Expected UnexpectedLabel, got {:?}", other),
    }
}

#[test]
fn test_load_survey_rejects_missing_column() {
    let (_dir, csv_path) = common::create_temp_csv_from_lines(
        "partial.csv",
        &["lottery,female,birthyear,hh_inc", "Selected,1: Female,1970,5000"],
    );

    let err = load_survey(&csv_path, 100).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<AnalysisError>(),
        Some(AnalysisError::MissingColumn { column, .. }) if column == "doc_visit_num"
    ));
}

#[test]
fn test_load_survey_rejects_empty_file() {
    let (_dir, csv_path) =
        common::create_temp_csv_from_lines("empty.csv", &[common::SURVEY_HEADER]);

    let err = load_survey(&csv_path, 100).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<AnalysisError>(),
        Some(AnalysisError::EmptyDataset { .. })
    ));
}

#[test]
fn test_load_survey_accepts_numeric_indicators() {
    let (_dir, csv_path) = common::create_temp_csv_from_lines(
        "clean.csv",
        &[
            "lottery,female,birthyear,hh_inc,doc_visit_num",
            "1,0,1970,5000,2",
            "0,1,1980,7000,0",
        ],
    );

    let df = load_survey(&csv_path, 100).unwrap();

    assert_eq!(numeric_values(&df, LOTTERY).unwrap(), vec![1.0, 0.0]);
    assert_eq!(numeric_values(&df, FEMALE).unwrap(), vec![0.0, 1.0]);
}
