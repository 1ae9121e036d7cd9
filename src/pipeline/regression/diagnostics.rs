//! Residual diagnostics printed under a regression report
//!
//! Omnibus is D'Agostino's K² (skewness and kurtosis z-scores combined),
//! Jarque-Bera uses the biased moment estimates, and both p-values come from
//! a chi-squared distribution with two degrees of freedom.

use serde::Serialize;

/// Omnibus needs at least this many residuals for the skewness z-score
const OMNIBUS_MIN_OBS: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResidualDiagnostics {
    pub omnibus: f64,
    pub omnibus_pvalue: f64,
    pub skew: f64,
    /// Pearson kurtosis (3 for a normal distribution)
    pub kurtosis: f64,
    pub durbin_watson: f64,
    pub jarque_bera: f64,
    pub jarque_bera_pvalue: f64,
    /// Ratio of the largest to the smallest singular value of the design
    pub condition_number: f64,
}

/// Diagnostics of `residuals`; `condition_number` is taken as computed.
///
/// Omnibus and its p-value are NaN below eight residuals.
pub fn residual_diagnostics(residuals: &[f64], condition_number: f64) -> ResidualDiagnostics {
    let n = residuals.len() as f64;
    let mean = residuals.iter().sum::<f64>() / n;
    let moment = |p: i32| residuals.iter().map(|r| (r - mean).powi(p)).sum::<f64>() / n;

    let m2 = moment(2);
    let skew = moment(3) / m2.powf(1.5);
    let kurtosis = moment(4) / (m2 * m2);

    let jarque_bera = n / 6.0 * (skew * skew + (kurtosis - 3.0).powi(2) / 4.0);

    let (omnibus, omnibus_pvalue) = if residuals.len() >= OMNIBUS_MIN_OBS {
        let k2 = skew_z(skew, n).powi(2) + kurtosis_z(kurtosis, n).powi(2);
        (k2, chi2_two_df_sf(k2))
    } else {
        (f64::NAN, f64::NAN)
    };

    ResidualDiagnostics {
        omnibus,
        omnibus_pvalue,
        skew,
        kurtosis,
        durbin_watson: durbin_watson(residuals),
        jarque_bera,
        jarque_bera_pvalue: chi2_two_df_sf(jarque_bera),
        condition_number,
    }
}

/// `Σ (e_t - e_{t-1})² / Σ e_t²`
pub fn durbin_watson(residuals: &[f64]) -> f64 {
    let diff: f64 = residuals.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
    let total: f64 = residuals.iter().map(|r| r * r).sum();
    diff / total
}

fn chi2_two_df_sf(x: f64) -> f64 {
    (-x / 2.0).exp()
}

/// D'Agostino skewness z-score
fn skew_z(skew: f64, n: f64) -> f64 {
    let y = skew * ((n + 1.0) * (n + 3.0) / (6.0 * (n - 2.0))).sqrt();
    let beta2 = 3.0 * (n * n + 27.0 * n - 70.0) * (n + 1.0) * (n + 3.0)
        / ((n - 2.0) * (n + 5.0) * (n + 7.0) * (n + 9.0));
    let w2 = -1.0 + (2.0 * (beta2 - 1.0)).sqrt();
    let delta = 1.0 / (0.5 * w2.ln()).sqrt();
    let alpha = (2.0 / (w2 - 1.0)).sqrt();
    let y = if y == 0.0 { 1.0 } else { y };
    delta * (y / alpha + ((y / alpha).powi(2) + 1.0).sqrt()).ln()
}

/// Anscombe-Glynn kurtosis z-score
fn kurtosis_z(kurtosis: f64, n: f64) -> f64 {
    let expected = 3.0 * (n - 1.0) / (n + 1.0);
    let variance = 24.0 * n * (n - 2.0) * (n - 3.0)
        / ((n + 1.0).powi(2) * (n + 3.0) * (n + 5.0));
    let x = (kurtosis - expected) / variance.sqrt();

    let sqrt_beta1 = 6.0 * (n * n - 5.0 * n + 2.0) / ((n + 7.0) * (n + 9.0))
        * (6.0 * (n + 3.0) * (n + 5.0) / (n * (n - 2.0) * (n - 3.0))).sqrt();
    let a = 6.0
        + 8.0 / sqrt_beta1 * (2.0 / sqrt_beta1 + (1.0 + 4.0 / (sqrt_beta1 * sqrt_beta1)).sqrt());

    let term1 = 1.0 - 2.0 / (9.0 * a);
    let denom = 1.0 + x * (2.0 / (a - 4.0)).sqrt();
    let term2 = if denom == 0.0 {
        f64::NAN
    } else {
        denom.signum() * ((1.0 - 2.0 / a) / denom.abs()).powf(1.0 / 3.0)
    };
    (term1 - term2) / (2.0 / (9.0 * a)).sqrt()
}
