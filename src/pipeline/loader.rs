//! Dataset loader for CSV and Parquet files

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

use super::error::AnalysisError;
use super::recode::{recode_binary, FEMALE_RECODE, LOTTERY_RECODE};
use super::schema::validate_schema;
use crate::utils::{create_spinner, finish_with_success};

/// Load a dataset from a file (CSV or Parquet based on extension)
///
/// `infer_schema_length` of 0 scans the whole CSV file for type inference.
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(schema_length)
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => return Err(AnalysisError::UnsupportedFormat { extension }.into()),
    };

    let df = lf
        .collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))?;

    Ok(df)
}

/// Load the dataset behind a spinner, returning the frame with its shape
pub fn load_dataset_with_progress(
    path: &Path,
    infer_schema_length: usize,
) -> Result<(DataFrame, usize, usize)> {
    let spinner = create_spinner(&format!("Reading {}...", path.display()));
    let df = load_dataset(path, infer_schema_length)?;
    let (rows, cols) = df.shape();
    finish_with_success(&spinner, &format!("Read {} rows x {} columns", rows, cols));
    Ok((df, rows, cols))
}

/// Load, validate and recode the survey table.
///
/// Every row is validated before this returns, so later steps (including the
/// histogram write) never see an invalid table.
pub fn load_survey(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    let (mut df, _, _) = load_dataset_with_progress(path, infer_schema_length)?;

    validate_schema(&df, &path.display().to_string())?;

    for recode in [&LOTTERY_RECODE, &FEMALE_RECODE] {
        let column = recode_binary(&df, recode)?;
        df.with_column(column)?;
    }

    Ok(df)
}
