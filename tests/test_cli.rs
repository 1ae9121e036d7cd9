//! Tests for CLI argument parsing and end-to-end runs

use assert_cmd::Command;
use clap::Parser;
use docvisits::cli::{Cli, OutputFormat};
use predicates::prelude::*;
use std::path::PathBuf;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_cli_default_values() {
    let cli = Cli::parse_from(["docvisits"]);

    assert_eq!(cli.input, PathBuf::from("PS1_insurance.csv"));
    assert_eq!(
        cli.histogram,
        PathBuf::from("images/histogram_income_distribution.svg")
    );
    assert_eq!(cli.bin_width, 2500.0, "Default bin width should be 2500");
    assert_eq!(cli.reference_year, 2010, "Default reference year should be 2010");
    assert_eq!(cli.format, OutputFormat::Both);
    assert!(cli.export_json.is_none());
    assert_eq!(
        cli.infer_schema_length, 10000,
        "Default schema inference should be 10000"
    );
}

#[test]
fn test_cli_custom_values() {
    let cli = Cli::parse_from([
        "docvisits",
        "-i",
        "survey.parquet",
        "--bin-width",
        "1000",
        "--reference-year",
        "2020",
        "--format",
        "latex",
        "--export-json",
        "out.json",
    ]);

    assert_eq!(cli.input, PathBuf::from("survey.parquet"));
    assert_eq!(cli.bin_width, 1000.0);
    assert_eq!(cli.reference_year, 2020);
    assert!(cli.format.latex());
    assert!(!cli.format.tables());
    assert_eq!(cli.export_json, Some(PathBuf::from("out.json")));
}

#[test]
fn test_cli_rejects_non_positive_bin_width() {
    assert!(Cli::try_parse_from(["docvisits", "--bin-width", "0"]).is_err());
    assert!(Cli::try_parse_from(["docvisits", "--bin-width", "-5"]).is_err());
    assert!(Cli::try_parse_from(["docvisits", "--bin-width", "wide"]).is_err());
}

#[test]
fn test_cli_rejects_unknown_format() {
    assert!(Cli::try_parse_from(["docvisits", "--format", "html"]).is_err());
}

#[test]
fn test_full_run_produces_every_model() {
    let (temp_dir, csv_path) = common::create_temp_survey_csv(40);
    let histogram = temp_dir.path().join("images").join("income.svg");
    let json_path = temp_dir.path().join("results.json");

    Command::cargo_bin("docvisits")
        .unwrap()
        .arg("-i")
        .arg(&csv_path)
        .arg("--histogram")
        .arg(&histogram)
        .arg("--export-json")
        .arg(&json_path)
        .args(["--format", "both"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Model 1:"))
        .stdout(predicate::str::contains("Model 12:"))
        .stdout(predicate::str::contains("\\begin{tabular}"));

    assert!(histogram.exists(), "Histogram should be written");

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    let models = json["models"].as_array().unwrap();
    assert_eq!(models.len(), 12);
    assert_eq!(models[5]["sample"], "female");
    assert_eq!(models[6]["sample"], "male");
    assert_eq!(models[7]["terms"][3], "age_squared");
    assert!(json["age_increase_effect"].is_number());
    assert_eq!(json["income_histogram"]["counts"].as_array().map(|c| {
        c.iter().filter_map(|v| v.as_u64()).sum::<u64>()
    }), Some(40));
}

#[test]
fn test_bad_label_fails_at_load_step() {
    let (temp_dir, csv_path) = common::create_temp_csv_from_lines(
        "bad.csv",
        &[
            common::SURVEY_HEADER,
            "1,Selected,1: Female,1970,5000,2",
            "2,Selected,Unknown,1980,7000,0",
        ],
    );

    Command::cargo_bin("docvisits")
        .unwrap()
        .arg("-i")
        .arg(&csv_path)
        .arg("--histogram")
        .arg(temp_dir.path().join("h.svg"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Step A"))
        .stderr(predicate::str::contains("unexpected label"));

    assert!(!temp_dir.path().join("h.svg").exists());
    assert!(!temp_dir.path().join(".h.svg.partial").exists());
}

#[test]
fn test_missing_input_fails() {
    let temp_dir = tempfile::TempDir::new().unwrap();

    Command::cargo_bin("docvisits")
        .unwrap()
        .arg("-i")
        .arg(temp_dir.path().join("absent.csv"))
        .arg("--histogram")
        .arg(temp_dir.path().join("h.svg"))
        .assert()
        .failure();
}
