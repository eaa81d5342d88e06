//! Constant Derivation
//!
//! Attaches the Michaelis constant and the inhibitor constant to every observation.
//!
//! The Michaelis constant is a single value computed once for the whole dataset. The
//! inhibitor constant is derived per row from the inhibitor concentration:
//!
//! ```text
//! k_i = k_m · i / (k_m − 1)
//! ```
//!
//! It is undefined for `k_m = 1`. Undefined values are carried as `None` and excluded by
//! the model evaluation, never clamped.

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;

use super::estimator::LinearFit;

/// How the fitted slope becomes the Michaelis constant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KmPolicy {
    /// Use the slope itself as one shared constant
    #[default]
    Scalar,
    /// Scale the slope by each row's observed velocity (`k_m[row] = β · v[row]`)
    PerRow,
}

/// Michaelis constant attached to a dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MichaelisConstant {
    Scalar(f64),
    PerRow(Vec<f64>),
}

impl MichaelisConstant {
    /// Builds the constant from a reciprocal fit according to `policy`.
    pub fn from_fit(fit: &LinearFit, dataset: &Dataset, policy: KmPolicy) -> Self {
        match policy {
            KmPolicy::Scalar => MichaelisConstant::Scalar(fit.beta),
            KmPolicy::PerRow => {
                MichaelisConstant::PerRow(dataset.iter().map(|o| fit.beta * o.v).collect())
            }
        }
    }

    /// Value for the row at `index`. Rows outside a per-row vector read as `NaN`.
    pub fn at(&self, index: usize) -> f64 {
        match self {
            MichaelisConstant::Scalar(k_m) => *k_m,
            MichaelisConstant::PerRow(values) => values.get(index).copied().unwrap_or(f64::NAN),
        }
    }

    /// Returns the shared value, if this is a scalar constant.
    pub fn scalar(&self) -> Option<f64> {
        match self {
            MichaelisConstant::Scalar(k_m) => Some(*k_m),
            MichaelisConstant::PerRow(_) => None,
        }
    }
}

/// An observation extended with its kinetic constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedRow {
    /// Position of the row in the loaded dataset
    pub index: usize,
    pub s: f64,
    pub i: f64,
    pub v: f64,
    pub k_m: f64,
    /// `None` where the inhibitor constant is undefined
    pub k_i: Option<f64>,
}

/// Computes `k_m · i / (k_m − 1)`, or `None` if `k_m = 1` or the result is not finite.
pub fn inhibitor_constant(k_m: f64, i: f64) -> Option<f64> {
    if k_m == 1.0 {
        return None;
    }

    let k_i = k_m * i / (k_m - 1.0);
    k_i.is_finite().then_some(k_i)
}

/// Attaches `k_m` and `k_i` to every row of the dataset, in dataset order.
pub fn derive_constants(dataset: &Dataset, k_m: &MichaelisConstant) -> Vec<DerivedRow> {
    dataset
        .iter()
        .enumerate()
        .map(|(index, obs)| {
            let k_m = k_m.at(index);
            DerivedRow {
                index,
                s: obs.s,
                i: obs.i,
                v: obs.v,
                k_m,
                k_i: inhibitor_constant(k_m, obs.i),
            }
        })
        .collect()
}
