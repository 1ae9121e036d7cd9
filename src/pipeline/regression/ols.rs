//! Ordinary least squares on a design matrix with an explicit intercept
//!
//! The fit solves the normal equations `XᵀX β = Xᵀy` after scaling every
//! design column to unit length, which keeps the Gram matrix well scaled when
//! regressors differ by orders of magnitude (income vs. an indicator). The
//! Cholesky pivots of the scaled Gram matrix equal `1 - R²` of each column on
//! the columns before it, so a tiny pivot pinpoints the collinear term.

use faer::linalg::solvers::Cholesky;
use faer::prelude::SpSolver;
use faer::{Mat, Side};
use serde::Serialize;

use super::diagnostics::{residual_diagnostics, ResidualDiagnostics};
use super::distribution::{f_upper_tail, student_t_critical, student_t_two_sided};
use crate::pipeline::error::{AnalysisError, AnalysisResult};

/// Name of the intercept term
pub const INTERCEPT: &str = "const";

/// Smallest admissible Cholesky pivot of the unit-scaled Gram matrix
const SINGULAR_TOLERANCE: f64 = 1e-10;

/// Significance level of the reported confidence intervals
const CONFIDENCE_ALPHA: f64 = 0.05;

/// Regressor matrix whose first column is the intercept
#[derive(Debug, Clone)]
pub struct DesignMatrix {
    terms: Vec<String>,
    matrix: Mat<f64>,
}

impl DesignMatrix {
    /// Build `[1, x_1, ..., x_p]` from named predictor columns.
    pub fn with_intercept(predictors: &[(&str, &[f64])]) -> AnalysisResult<Self> {
        let (_, first) = predictors.first().ok_or(AnalysisError::NoPredictors)?;
        let n = first.len();

        for (name, values) in predictors {
            if values.len() != n {
                return Err(AnalysisError::DimensionMismatch {
                    name: name.to_string(),
                    expected: n,
                    actual: values.len(),
                });
            }
        }

        let k = predictors.len() + 1;
        let matrix = Mat::<f64>::from_fn(n, k, |i, j| {
            if j == 0 {
                1.0
            } else {
                predictors[j - 1].1[i]
            }
        });

        let terms = std::iter::once(INTERCEPT.to_string())
            .chain(predictors.iter().map(|(name, _)| name.to_string()))
            .collect();

        Ok(Self { terms, matrix })
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn n_obs(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn n_params(&self) -> usize {
        self.matrix.ncols()
    }

    pub fn matrix(&self) -> &Mat<f64> {
        &self.matrix
    }
}

/// Result of an OLS fit. Immutable once produced.
#[derive(Debug, Clone, Serialize)]
pub struct FittedModel {
    pub response: String,
    pub terms: Vec<String>,
    pub coefficients: Vec<f64>,
    pub std_errors: Vec<f64>,
    pub t_values: Vec<f64>,
    pub p_values: Vec<f64>,
    /// 95% confidence interval per term, `[lower, upper]`
    pub conf_int: Vec<[f64; 2]>,
    #[serde(skip)]
    pub residuals: Vec<f64>,
    #[serde(skip)]
    pub fitted_values: Vec<f64>,
    pub n_obs: usize,
    pub df_model: usize,
    pub df_resid: usize,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub f_statistic: f64,
    pub f_pvalue: f64,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    pub ssr: f64,
    pub diagnostics: ResidualDiagnostics,
}

impl FittedModel {
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.terms.iter().position(|t| t == term)
    }

    pub fn coefficient(&self, term: &str) -> Option<f64> {
        self.term_index(term).map(|i| self.coefficients[i])
    }

    pub fn std_error(&self, term: &str) -> Option<f64> {
        self.term_index(term).map(|i| self.std_errors[i])
    }

    pub fn p_value(&self, term: &str) -> Option<f64> {
        self.term_index(term).map(|i| self.p_values[i])
    }
}

/// Fit `y = Xβ + u` by least squares.
pub fn fit_ols(response: &str, y: &[f64], design: &DesignMatrix) -> AnalysisResult<FittedModel> {
    let n = design.n_obs();
    let k = design.n_params();
    let x = design.matrix();

    if y.len() != n {
        return Err(AnalysisError::DimensionMismatch {
            name: response.to_string(),
            expected: n,
            actual: y.len(),
        });
    }
    if n <= k {
        return Err(AnalysisError::InsufficientObservations {
            response: response.to_string(),
            n_obs: n,
            n_params: k,
        });
    }

    // Unit-length column scaling
    let scales: Vec<f64> = (0..k)
        .map(|j| (0..n).map(|i| x[(i, j)] * x[(i, j)]).sum::<f64>().sqrt())
        .collect();
    if let Some(j) = scales.iter().position(|&s| s == 0.0) {
        return Err(AnalysisError::SingularDesign {
            term: design.terms()[j].clone(),
        });
    }

    let scaled = Mat::<f64>::from_fn(n, k, |i, j| x[(i, j)] / scales[j]);
    let y_col = Mat::<f64>::from_fn(n, 1, |i, _| y[i]);

    let gram = scaled.transpose() * &scaled;
    let xty = scaled.transpose() * &y_col;

    let cholesky = factor_gram(&gram, design.terms())?;

    let scaled_beta = cholesky.solve(&xty);
    let coefficients: Vec<f64> = (0..k).map(|j| scaled_beta[(j, 0)] / scales[j]).collect();

    // Diagonal of (XᵀX)⁻¹, undoing the column scaling
    let scaled_inverse = cholesky.solve(Mat::<f64>::identity(k, k));
    let inverse_diagonal: Vec<f64> = (0..k)
        .map(|j| scaled_inverse[(j, j)] / (scales[j] * scales[j]))
        .collect();

    let beta_col = Mat::<f64>::from_fn(k, 1, |i, _| coefficients[i]);
    let fitted = x * &beta_col;
    let fitted_values: Vec<f64> = (0..n).map(|i| fitted[(i, 0)]).collect();
    let residuals: Vec<f64> = y
        .iter()
        .zip(&fitted_values)
        .map(|(obs, fit)| obs - fit)
        .collect();

    let df_resid = n - k;
    let df_model = k - 1;
    let n_f = n as f64;

    let ssr: f64 = residuals.iter().map(|r| r * r).sum();
    let mean_y = y.iter().sum::<f64>() / n_f;
    let sst: f64 = y.iter().map(|v| (v - mean_y).powi(2)).sum();
    let ess = sst - ssr;

    let sigma2 = ssr / df_resid as f64;
    let std_errors: Vec<f64> = inverse_diagonal
        .iter()
        .map(|v| (sigma2 * v).sqrt())
        .collect();
    let t_values: Vec<f64> = coefficients
        .iter()
        .zip(&std_errors)
        .map(|(b, se)| b / se)
        .collect();
    let p_values: Vec<f64> = t_values
        .iter()
        .map(|&t| student_t_two_sided(t, df_resid as f64))
        .collect();

    let t_crit = student_t_critical(CONFIDENCE_ALPHA, df_resid as f64);
    let conf_int: Vec<[f64; 2]> = coefficients
        .iter()
        .zip(&std_errors)
        .map(|(b, se)| [b - t_crit * se, b + t_crit * se])
        .collect();

    let r_squared = if sst > 0.0 { 1.0 - ssr / sst } else { f64::NAN };
    let adj_r_squared = 1.0 - (1.0 - r_squared) * (n_f - 1.0) / df_resid as f64;

    let f_statistic = (ess / df_model as f64) / sigma2;
    let f_pvalue = f_upper_tail(f_statistic, df_model as f64, df_resid as f64);

    let log_likelihood =
        -0.5 * n_f * ((2.0 * std::f64::consts::PI).ln() + (ssr / n_f).ln() + 1.0);
    let aic = -2.0 * log_likelihood + 2.0 * k as f64;
    let bic = -2.0 * log_likelihood + n_f.ln() * k as f64;

    let singular_values = x.singular_values();
    let condition_number = singular_values[0] / singular_values[singular_values.len() - 1];
    let diagnostics = residual_diagnostics(&residuals, condition_number);

    Ok(FittedModel {
        response: response.to_string(),
        terms: design.terms().to_vec(),
        coefficients,
        std_errors,
        t_values,
        p_values,
        conf_int,
        residuals,
        fitted_values,
        n_obs: n,
        df_model,
        df_resid,
        r_squared,
        adj_r_squared,
        f_statistic,
        f_pvalue,
        log_likelihood,
        aic,
        bic,
        ssr,
        diagnostics,
    })
}

/// Cholesky factor of the unit-scaled Gram matrix.
///
/// faer only rejects non-positive pivots. A squared diagonal entry at or below
/// [`SINGULAR_TOLERANCE`] is an exact collinearity blurred by rounding, and is
/// reported against the matching term as well.
fn factor_gram(gram: &Mat<f64>, terms: &[String]) -> AnalysisResult<Cholesky<f64>> {
    let singular = |j: usize| AnalysisError::SingularDesign {
        term: terms[j.min(terms.len() - 1)].clone(),
    };

    let cholesky = gram
        .cholesky(Side::Lower)
        .map_err(|e| singular(e.non_positive_definite_minor.saturating_sub(1)))?;

    let lower = cholesky.compute_l();
    if let Some(j) = (0..terms.len()).find(|&j| lower[(j, j)].powi(2) <= SINGULAR_TOLERANCE) {
        return Err(singular(j));
    }

    Ok(cholesky)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_design_prepends_intercept() {
        let x = [1.0, 2.0, 3.0];
        let design = DesignMatrix::with_intercept(&[("x", &x)]).unwrap();

        assert_eq!(design.terms(), &["const".to_string(), "x".to_string()]);
        assert_eq!(design.n_obs(), 3);
        assert_eq!(design.n_params(), 2);
        assert_eq!(design.matrix()[(2, 0)], 1.0);
        assert_eq!(design.matrix()[(2, 1)], 3.0);
    }

    #[test]
    fn test_design_rejects_ragged_columns() {
        let a = [1.0, 2.0, 3.0];
        let b = [1.0, 2.0];
        let err = DesignMatrix::with_intercept(&[("a", &a), ("b", &b)]).unwrap_err();
        assert!(matches!(err, AnalysisError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_design_rejects_empty_predictors() {
        assert!(matches!(
            DesignMatrix::with_intercept(&[]),
            Err(AnalysisError::NoPredictors)
        ));
    }

    #[test]
    fn test_condition_number_of_simple_design() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];
        let design = DesignMatrix::with_intercept(&[("x", &x)]).unwrap();
        let model = fit_ols("y", &y, &design).unwrap();

        // sqrt of the eigenvalue ratio of [[5, 15], [15, 55]]
        let cond = model.diagnostics.condition_number;
        assert!((cond - 8.365746).abs() < 1e-5, "got {cond}");
    }

    #[test]
    fn test_zero_column_is_singular() {
        let x = [0.0, 0.0, 0.0, 0.0];
        let y = [1.0, 2.0, 3.0, 4.0];
        let design = DesignMatrix::with_intercept(&[("zero", &x)]).unwrap();
        let err = fit_ols("y", &y, &design).unwrap_err();
        assert!(matches!(err, AnalysisError::SingularDesign { ref term } if term == "zero"));
    }
}
