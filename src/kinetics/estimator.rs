//! Linear Parameter Estimator
//!
//! Recovers the kinetic slope from a Lineweaver-Burk style reciprocal transform of the
//! data. Both substrate concentration and velocity are inverted, and `1/v` is regressed on
//! `1/s` through the origin with ordinary least squares:
//!
//! ```text
//! x = 1/s,  y = 1/v,  y = β·x,  β = Σxy / Σx²
//! ```
//!
//! Zero-valued inputs are not dropped. They enter the regression as a zero point, see
//! [`reciprocal`].

use log::{debug, warn};
use ndarray::Array1;
use serde::Serialize;

use crate::dataset::Dataset;

use super::error::KineticsError;

/// Result of a least squares fit through the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    /// Fitted slope
    pub beta: f64,
    /// Number of points that entered the fit
    pub n_points: usize,
    /// Residual sum of squares
    pub rss: f64,
    /// Standard error of `beta`; undefined for a single point
    pub std_error: Option<f64>,
    /// Uncentered coefficient of determination; undefined if every `y` is zero
    pub r_squared: Option<f64>,
}

/// Reciprocal with an explicit zero policy: `0` maps to `0`, anything else to `1/value`.
#[inline]
pub fn reciprocal(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        1.0 / value
    }
}

/// Fits `y = β·x` by ordinary least squares without intercept.
///
/// # Arguments
///
/// * `x` - Design vector
/// * `y` - Response vector, same length as `x`
///
/// # Returns
///
/// The fitted [`LinearFit`], or `KineticsError::InsufficientData` if the input is empty,
/// the design vector is all zero or the slope is not finite.
pub fn fit_through_origin(x: &Array1<f64>, y: &Array1<f64>) -> Result<LinearFit, KineticsError> {
    if x.len() != y.len() {
        return Err(KineticsError::InsufficientData(format!(
            "design and response differ in length ({} vs {})",
            x.len(),
            y.len()
        )));
    }

    if x.is_empty() {
        return Err(KineticsError::InsufficientData("no data points".into()));
    }

    let sxx = x.dot(x);
    if sxx == 0.0 {
        return Err(KineticsError::InsufficientData(
            "design vector is all zero".into(),
        ));
    }

    let beta = x.dot(y) / sxx;
    if !beta.is_finite() {
        return Err(KineticsError::InsufficientData(format!(
            "fitted slope is not finite ({beta})"
        )));
    }

    let residuals = y - &x.mapv(|xi| beta * xi);
    let rss = residuals.dot(&residuals);
    let n_points = x.len();

    let std_error = (n_points > 1).then(|| (rss / (n_points - 1) as f64 / sxx).sqrt());

    let syy = y.dot(y);
    let r_squared = (syy != 0.0).then(|| 1.0 - rss / syy);

    Ok(LinearFit {
        beta,
        n_points,
        rss,
        std_error,
        r_squared,
    })
}

/// Runs the reciprocal-transform regression over every row of a dataset.
///
/// Rows with `s = 0` or `v = 0` contribute the point `(0, 1/v)` or `(1/s, 0)` respectively.
pub fn lineweaver_burk(dataset: &Dataset) -> Result<LinearFit, KineticsError> {
    let x: Array1<f64> = dataset.substrate().into_iter().map(reciprocal).collect();
    let y: Array1<f64> = dataset.velocity().into_iter().map(reciprocal).collect();

    let zero_points = x.iter().zip(y.iter()).filter(|(x, y)| **x == 0.0 || **y == 0.0).count();
    if zero_points > 0 {
        debug!("{zero_points} row(s) enter the reciprocal fit as zero points");
    }

    let fit = fit_through_origin(&x, &y)?;

    if fit.beta <= 0.0 {
        warn!(
            "Reciprocal fit produced a non-positive slope ({}); predictions may be meaningless",
            fit.beta
        );
    }

    debug!(
        "Reciprocal fit over {} points: beta = {}, rss = {}",
        fit.n_points, fit.beta, fit.rss
    );

    Ok(fit)
}
