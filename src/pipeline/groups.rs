//! Subgroup comparison by a binary indicator

use polars::prelude::*;
use serde::Serialize;

use super::error::{AnalysisError, AnalysisResult};
use super::schema::numeric_values;

/// Tolerance for floating point comparison when checking binary 0/1 values
const TOLERANCE: f64 = 1e-9;

/// Mean of one column inside each side of the partition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean {
    pub column: String,
    /// Mean where the indicator is 1
    pub mean_one: f64,
    /// Mean where the indicator is 0
    pub mean_zero: f64,
}

impl GroupMean {
    pub fn difference(&self) -> f64 {
        self.mean_one - self.mean_zero
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupComparison {
    pub indicator: String,
    pub rows_one: usize,
    pub rows_zero: usize,
    pub means: Vec<GroupMean>,
}

/// Split the table into (indicator == 1, indicator == 0).
///
/// The two frames are disjoint and together hold every row. Any value other
/// than 0 or 1 is rejected, as is an empty side.
pub fn partition_by_indicator(
    df: &DataFrame,
    indicator: &str,
) -> AnalysisResult<(DataFrame, DataFrame)> {
    let mask = indicator_mask(df, indicator)?;

    let ones = BooleanChunked::from_slice("ones".into(), &mask);
    let zeros = BooleanChunked::from_slice(
        "zeros".into(),
        &mask.iter().map(|m| !m).collect::<Vec<bool>>(),
    );

    let selected = df.filter(&ones)?;
    let rest = df.filter(&zeros)?;

    if selected.height() == 0 {
        return Err(empty_partition(indicator, 1));
    }
    if rest.height() == 0 {
        return Err(empty_partition(indicator, 0));
    }

    Ok((selected, rest))
}

/// Compare means of `columns` between the two sides of `indicator`
pub fn compare_group_means(
    df: &DataFrame,
    indicator: &str,
    columns: &[&str],
) -> AnalysisResult<GroupComparison> {
    let (ones, zeros) = partition_by_indicator(df, indicator)?;

    let means = columns
        .iter()
        .map(|&column| {
            Ok(GroupMean {
                column: column.to_string(),
                mean_one: mean(&numeric_values(&ones, column)?),
                mean_zero: mean(&numeric_values(&zeros, column)?),
            })
        })
        .collect::<AnalysisResult<Vec<_>>>()?;

    Ok(GroupComparison {
        indicator: indicator.to_string(),
        rows_one: ones.height(),
        rows_zero: zeros.height(),
        means,
    })
}

fn indicator_mask(df: &DataFrame, indicator: &str) -> AnalysisResult<Vec<bool>> {
    numeric_values(df, indicator)?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            if value.abs() < TOLERANCE {
                Ok(false)
            } else if (value - 1.0).abs() < TOLERANCE {
                Ok(true)
            } else {
                Err(AnalysisError::NonBinaryIndicator {
                    column: indicator.to_string(),
                    row,
                    value,
                })
            }
        })
        .collect()
}

fn empty_partition(indicator: &str, value: u8) -> AnalysisError {
    AnalysisError::EmptyPartition {
        column: indicator.to_string(),
        value,
    }
}

// Callers guarantee non-empty input; partitions are checked above
fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
