//! Regression engine: OLS fits over table columns and partial regressions

pub mod diagnostics;
pub mod distribution;
pub mod ols;

pub use diagnostics::*;
pub use distribution::*;
pub use ols::*;

use polars::prelude::*;
use serde::Serialize;

use super::error::AnalysisResult;
use super::schema::numeric_values;

/// Regress `response` on the named `predictors` (intercept added)
pub fn regress(df: &DataFrame, response: &str, predictors: &[&str]) -> AnalysisResult<FittedModel> {
    let y = numeric_values(df, response)?;
    let columns: Vec<Vec<f64>> = predictors
        .iter()
        .map(|name| numeric_values(df, name))
        .collect::<AnalysisResult<_>>()?;
    let named: Vec<(&str, &[f64])> = predictors
        .iter()
        .zip(&columns)
        .map(|(name, values)| (*name, values.as_slice()))
        .collect();

    let design = DesignMatrix::with_intercept(&named)?;
    fit_ols(response, &y, &design)
}

/// The three fits of a Frisch-Waugh-Lovell decomposition
#[derive(Debug, Clone, Serialize)]
pub struct PartialRegression {
    /// Response regressed on the controls
    pub response_on_controls: FittedModel,
    /// Focus variable regressed on the controls
    pub focus_on_controls: FittedModel,
    /// Response residuals regressed on focus residuals
    pub partial: FittedModel,
}

impl PartialRegression {
    /// Slope on the residualized focus variable
    pub fn focus_coefficient(&self) -> f64 {
        self.partial.coefficients[1]
    }
}

/// Partial out `controls` from both `response` and `focus`, then regress the
/// response residual on the focus residual.
///
/// The resulting slope equals the coefficient on `focus` in the full
/// regression of `response` on `focus` and `controls`.
pub fn partial_regression(
    df: &DataFrame,
    response: &str,
    focus: &str,
    controls: &[&str],
) -> AnalysisResult<PartialRegression> {
    let response_on_controls = regress(df, response, controls)?;
    let focus_on_controls = regress(df, focus, controls)?;

    let response_resid = format!("{}_resid", response);
    let focus_resid = format!("{}_resid", focus);

    let design = DesignMatrix::with_intercept(&[(
        focus_resid.as_str(),
        focus_on_controls.residuals.as_slice(),
    )])?;
    let partial = fit_ols(&response_resid, &response_on_controls.residuals, &design)?;

    Ok(PartialRegression {
        response_on_controls,
        focus_on_controls,
        partial,
    })
}

/// Change in the fitted response when `age` rises by `relative_increase`
/// (0.1 = 10%) from `base_age`, under `β_age·age + β_age²·age²`.
pub fn quadratic_effect(linear: f64, quadratic: f64, base_age: f64, relative_increase: f64) -> f64 {
    let new_age = base_age * (1.0 + relative_increase);
    linear * (new_age - base_age) + quadratic * (new_age * new_age - base_age * base_age)
}
