//! Column names of the survey table and typed column access

use polars::prelude::*;

use super::error::{AnalysisError, AnalysisResult};

pub const LOTTERY: &str = "lottery";
pub const FEMALE: &str = "female";
pub const BIRTH_YEAR: &str = "birthyear";
pub const HOUSEHOLD_INCOME: &str = "hh_inc";
pub const DOCTOR_VISITS: &str = "doc_visit_num";

pub const AGE: &str = "age";
pub const VISIT_INDICATOR: &str = "doc_visit_dummy";
pub const AGE_SQUARED: &str = "age_squared";

/// Columns that must be present in every input file
pub const REQUIRED_COLUMNS: [&str; 5] = [
    LOTTERY,
    FEMALE,
    BIRTH_YEAR,
    HOUSEHOLD_INCOME,
    DOCTOR_VISITS,
];

/// Fail with the list of available columns if `column` is absent.
pub fn require_column<'a>(df: &'a DataFrame, column: &str) -> AnalysisResult<&'a Column> {
    df.column(column).map_err(|_| AnalysisError::MissingColumn {
        column: column.to_string(),
        available: column_names(df),
    })
}

/// Check the table is non-empty and carries every required column.
pub fn validate_schema(df: &DataFrame, source: &str) -> AnalysisResult<()> {
    for column in REQUIRED_COLUMNS {
        require_column(df, column)?;
    }

    if df.height() == 0 {
        return Err(AnalysisError::EmptyDataset {
            path: source.to_string(),
        });
    }

    Ok(())
}

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|s| s.to_string()).collect()
}

/// Names of all numeric columns, in table order
pub fn numeric_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| col.dtype().is_primitive_numeric())
        .map(|col| col.name().to_string())
        .collect()
}

fn float_column(df: &DataFrame, column: &str) -> AnalysisResult<Float64Chunked> {
    let col = require_column(df, column)?;

    if !col.dtype().is_primitive_numeric() {
        return Err(AnalysisError::NonNumeric {
            column: column.to_string(),
            dtype: col.dtype().to_string(),
        });
    }

    Ok(col.cast(&DataType::Float64)?.f64()?.clone())
}

/// Read a numeric column as `f64` values, rejecting nulls.
pub fn numeric_values(df: &DataFrame, column: &str) -> AnalysisResult<Vec<f64>> {
    float_column(df, column)?
        .iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| AnalysisError::MissingValue {
                column: column.to_string(),
                row,
            })
        })
        .collect()
}

/// Non-null values of a numeric column, in row order
pub fn non_null_values(df: &DataFrame, column: &str) -> AnalysisResult<Vec<f64>> {
    Ok(float_column(df, column)?.into_iter().flatten().collect())
}
