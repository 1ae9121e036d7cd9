//! Error types for the analysis pipeline.
//!
//! Three families of failure stop a run: input validation (bad labels,
//! missing columns or values, empty files), numerical failures in the
//! regression engine, and empty partitions in the group comparator.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while loading, validating, or analysing the survey table.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The input file parsed but contains no data rows.
    #[error("Dataset '{path}' contains no rows")]
    EmptyDataset { path: String },

    /// The input file extension is neither CSV nor Parquet.
    #[error("Unsupported file format: '{extension}'. Supported formats: csv, parquet")]
    UnsupportedFormat { extension: String },

    /// A column the analysis depends on is absent.
    #[error("Required column '{column}' not found. Available columns: {available:?}")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// A categorical column holds a label outside its two known categories.
    ///
    /// Recoding is total, so this is fatal instead of producing a null.
    #[error(
        "Column '{column}' has unexpected label '{label}' at row {row} (expected '{zero_label}' or '{one_label}')"
    )]
    UnexpectedLabel {
        column: String,
        row: usize,
        label: String,
        zero_label: String,
        one_label: String,
    },

    /// A required value is null.
    #[error("Column '{column}' has a missing value at row {row}")]
    MissingValue { column: String, row: usize },

    /// A column expected to be numeric cannot be read as numbers.
    #[error("Column '{column}' must be numeric, found {dtype}")]
    NonNumeric { column: String, dtype: String },

    /// Statistics were requested over zero values.
    #[error("Column '{column}' has no values to summarize")]
    EmptyColumn { column: String },

    /// An indicator column holds something other than 0 or 1.
    #[error("Indicator column '{column}' has non-binary value {value} at row {row}")]
    NonBinaryIndicator {
        column: String,
        row: usize,
        value: f64,
    },

    /// One side of a binary partition has no rows, so its mean is undefined.
    #[error("Partition '{column}' == {value} contains no rows")]
    EmptyPartition { column: String, value: u8 },

    /// Histogram bin width must be a positive finite number.
    #[error("Bin width must be positive and finite, got {width}")]
    InvalidBinWidth { width: f64 },

    /// The design matrix is rank deficient.
    #[error("Singular design matrix: term '{term}' is collinear with the preceding terms")]
    SingularDesign { term: String },

    /// A regression has no residual degrees of freedom.
    #[error("Model for '{response}' needs more observations ({n_obs}) than parameters ({n_params})")]
    InsufficientObservations {
        response: String,
        n_obs: usize,
        n_params: usize,
    },

    /// Response and design columns have different lengths.
    #[error("Length mismatch for '{name}': expected {expected} rows, got {actual}")]
    DimensionMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// A design matrix was requested without any predictors.
    #[error("Design matrix needs at least one predictor besides the intercept")]
    NoPredictors,

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;
