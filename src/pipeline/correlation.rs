//! Pearson correlation matrix over selected columns

use serde::Serialize;

use polars::prelude::*;

use super::error::AnalysisResult;
use super::schema::numeric_values;

/// Symmetric matrix of pairwise Pearson coefficients
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major, `columns.len()` x `columns.len()`
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Coefficient between two named columns
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }
}

/// Compute the Pearson correlation matrix of `columns`.
///
/// The diagonal is 1. Pairs involving a constant column are undefined and
/// stored as NaN.
pub fn correlation_matrix(df: &DataFrame, columns: &[&str]) -> AnalysisResult<CorrelationMatrix> {
    let data: Vec<Vec<f64>> = columns
        .iter()
        .map(|name| numeric_values(df, name))
        .collect::<AnalysisResult<_>>()?;

    let k = columns.len();
    let mut values = vec![vec![f64::NAN; k]; k];

    for i in 0..k {
        for j in i..k {
            let r = if i == j {
                if is_constant(&data[i]) {
                    f64::NAN
                } else {
                    1.0
                }
            } else {
                pearson_correlation(&data[i], &data[j]).unwrap_or(f64::NAN)
            };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        values,
    })
}

/// Pearson correlation using a single-pass Welford accumulation.
///
/// Returns `None` for mismatched or empty input and for zero-variance columns.
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len();
    if n == 0 || n != ys.len() {
        return None;
    }

    let mut count = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for (&x, &y) in xs.iter().zip(ys.iter()) {
        count += 1.0;
        let dx = x - mean_x;
        let dy = y - mean_y;
        mean_x += dx / count;
        mean_y += dy / count;
        var_x += dx * (x - mean_x);
        var_y += dy * (y - mean_y);
        cov_xy += dx * (y - mean_y);
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some(cov_xy / (var_x.sqrt() * var_y.sqrt()))
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}
