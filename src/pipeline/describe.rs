//! Descriptive statistics per numeric column
//!
//! Mirrors the usual `describe` table: count, mean, sample standard deviation
//! (ddof = 1), min, the three quartiles and max. Quartiles use linear
//! interpolation between order statistics at position `(n - 1) * q`.

use polars::prelude::*;
use serde::Serialize;

use super::error::{AnalysisError, AnalysisResult};
use super::schema::{non_null_values, numeric_column_names, numeric_values, REQUIRED_COLUMNS};

/// Statistic names in display order
pub const STATISTIC_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Summary of a single column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; NaN when fewer than two values
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    /// Summary of a column without a single value
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        }
    }

    /// Values in the order of [`STATISTIC_LABELS`]
    pub fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
        ]
    }
}

/// Summaries of several columns, one per column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTable {
    pub columns: Vec<ColumnSummary>,
}

impl SummaryTable {
    /// Copy with every statistic rounded to `digits` decimals
    pub fn rounded(&self, digits: i32) -> Self {
        let round = |x: f64| round_to(x, digits);
        let columns = self
            .columns
            .iter()
            .map(|c| ColumnSummary {
                name: c.name.clone(),
                count: c.count,
                mean: round(c.mean),
                std: round(c.std),
                min: round(c.min),
                q25: round(c.q25),
                median: round(c.median),
                q75: round(c.q75),
                max: round(c.max),
            })
            .collect();
        Self { columns }
    }

    pub fn get(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Round half away from zero; NaN and infinities pass through
pub fn round_to(x: f64, digits: i32) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let factor = 10f64.powi(digits);
    (x * factor).round() / factor
}

/// Summarize a slice of values
pub fn summarize(name: &str, values: &[f64]) -> AnalysisResult<ColumnSummary> {
    if values.is_empty() {
        return Err(AnalysisError::EmptyColumn {
            column: name.to_string(),
        });
    }

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let std = if n > 1 {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    Ok(ColumnSummary {
        name: name.to_string(),
        count: n,
        mean,
        std,
        min: sorted[0],
        q25: percentile(&sorted, 0.25),
        median: percentile(&sorted, 0.50),
        q75: percentile(&sorted, 0.75),
        max: sorted[n - 1],
    })
}

/// Linear-interpolated percentile of already sorted, non-empty data
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    let position = (sorted.len() - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + fraction * (sorted[upper] - sorted[lower])
}

/// Summary table for the named columns
pub fn describe(df: &DataFrame, columns: &[&str]) -> AnalysisResult<SummaryTable> {
    let columns = columns
        .iter()
        .map(|name| summarize(name, &numeric_values(df, name)?))
        .collect::<AnalysisResult<Vec<_>>>()?;
    Ok(SummaryTable { columns })
}

/// Summary table over every numeric column of the frame.
///
/// Required survey columns must be complete. Any other column is summarized
/// over its non-null values, so `count` is the non-null count and an all-null
/// column reports zero with NaN statistics.
pub fn describe_numeric(df: &DataFrame) -> AnalysisResult<SummaryTable> {
    let columns = numeric_column_names(df)
        .iter()
        .map(|name| {
            if REQUIRED_COLUMNS.contains(&name.as_str()) {
                return summarize(name, &numeric_values(df, name)?);
            }
            let values = non_null_values(df, name)?;
            if values.is_empty() {
                Ok(ColumnSummary::empty(name))
            } else {
                summarize(name, &values)
            }
        })
        .collect::<AnalysisResult<Vec<_>>>()?;
    Ok(SummaryTable { columns })
}
