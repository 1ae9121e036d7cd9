//! Command-line argument definitions using clap

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::pipeline::{DEFAULT_BIN_WIDTH, DEFAULT_REFERENCE_YEAR};

/// Dataset analysed when no input is given
pub const DEFAULT_INPUT: &str = "PS1_insurance.csv";

/// Where the income histogram is written when no path is given
pub const DEFAULT_HISTOGRAM: &str = "images/histogram_income_distribution.svg";

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Terminal tables only
    Table,
    /// LaTeX tabular text only
    Latex,
    /// Terminal tables followed by LaTeX
    Both,
}

impl OutputFormat {
    pub fn tables(self) -> bool {
        matches!(self, OutputFormat::Table | OutputFormat::Both)
    }

    pub fn latex(self) -> bool {
        matches!(self, OutputFormat::Latex | OutputFormat::Both)
    }
}

/// docvisits - Descriptive statistics and OLS regressions for the insurance lottery survey
#[derive(Parser, Debug)]
#[command(name = "docvisits")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV or Parquet)
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Output path for the income histogram (SVG)
    #[arg(long, default_value = DEFAULT_HISTOGRAM)]
    pub histogram: PathBuf,

    /// Histogram bin width in currency units
    #[arg(long, default_value_t = DEFAULT_BIN_WIDTH, value_parser = validate_bin_width)]
    pub bin_width: f64,

    /// Year ages are measured against (age = reference year - birth year)
    #[arg(long, default_value_t = DEFAULT_REFERENCE_YEAR)]
    pub reference_year: i32,

    /// Output format for tables and regression reports
    #[arg(long, value_enum, default_value = "both")]
    pub format: OutputFormat,

    /// Write every computed result to this JSON file
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

/// Validator for bin_width parameter
fn validate_bin_width(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("bin_width must be positive, got {}", value))
    }
}
