use ndarray::Array1;
use serde::Serialize;

/// Calculates the sum of squared errors (SSE) between predicted and actual values.
///
/// SSE = Σ(y_pred - y_actual)²
pub fn sum_of_squared_errors(residuals: &Array1<f64>) -> f64 {
    residuals.mapv(|x| x * x).sum()
}

/// Calculates Mean Squared Error (MSE). Lower values indicate better fit.
///
/// MSE = (1/n) * Σ(y_pred - y_actual)²
pub fn mean_squared_error(residuals: &Array1<f64>) -> f64 {
    sum_of_squared_errors(residuals) / residuals.len() as f64
}

/// Calculates Root Mean Squared Error (RMSE), the square root of MSE.
///
/// RMSE is in the same units as the velocities.
pub fn root_mean_squared_error(residuals: &Array1<f64>) -> f64 {
    mean_squared_error(residuals).sqrt()
}

/// Calculates Mean Absolute Error (MAE).
///
/// MAE = (1/n) * Σ|y_pred - y_actual|
pub fn mean_absolute_error(residuals: &Array1<f64>) -> f64 {
    residuals.mapv(|x| x.abs()).sum() / residuals.len() as f64
}

/// Calculates Akaike Information Criterion (AIC), balancing goodness of fit against
/// the number of parameters. Lower values indicate better models.
///
/// AIC = n * ln(SSE/n) + 2k
pub fn akaike_information_criterion(residuals: &Array1<f64>, num_parameters: f64) -> f64 {
    let n = residuals.len() as f64;
    let sse = sum_of_squared_errors(residuals);
    n * (sse / n).ln() + 2.0 * num_parameters
}

/// Calculates Bayesian Information Criterion (BIC), similar to AIC with a stronger
/// penalty for model complexity. Lower values indicate better models.
///
/// BIC = n * ln(SSE/n) + k * ln(n)
pub fn bayesian_information_criterion(residuals: &Array1<f64>, num_parameters: f64) -> f64 {
    let n = residuals.len() as f64;
    let sse = sum_of_squared_errors(residuals);
    n * (sse / n).ln() + num_parameters * n.ln()
}

/// Agreement between predicted and observed velocities of one result table
///
/// Lower values indicate a better fit for all metrics. A perfect prediction has an SSE of
/// zero, which makes AIC and BIC negative infinity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitMetrics {
    /// Number of compared rows
    pub n: usize,
    pub sse: f64,
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub aic: f64,
    pub bic: f64,
}

impl FitMetrics {
    /// Computes all metrics from `predicted - observed`, or `None` for an empty table.
    pub fn from_residuals(residuals: &Array1<f64>, num_parameters: usize) -> Option<Self> {
        if residuals.is_empty() {
            return None;
        }

        let k = num_parameters as f64;
        Some(Self {
            n: residuals.len(),
            sse: sum_of_squared_errors(residuals),
            mse: mean_squared_error(residuals),
            rmse: root_mean_squared_error(residuals),
            mae: mean_absolute_error(residuals),
            aic: akaike_information_criterion(residuals, k),
            bic: bayesian_information_criterion(residuals, k),
        })
    }
}
