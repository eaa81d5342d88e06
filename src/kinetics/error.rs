//! Kinetics Error Module
//!
//! Two kinds of failure exist in the estimation pipeline:
//!
//! - [`KineticsError`] aborts the whole run. It covers degenerate regression input and
//!   structural dataset problems.
//! - [`UndefinedValue`] is scoped to a single row. Rows carrying one are excluded from the
//!   affected result table and the run continues.

use serde::Serialize;
use thiserror::Error;

use crate::dataset::DatasetError;

#[derive(Error, Debug)]
pub enum KineticsError {
    #[error("Insufficient data for regression: {0}")]
    InsufficientData(String),
    #[error("Invalid Michaelis constant: {0}")]
    InvalidMichaelisConstant(f64),
    #[error("Invalid maximum velocity: {0}")]
    InvalidVmax(f64),
    #[error("Failed to load dataset: {0}")]
    Dataset(#[from] DatasetError),
}

/// Reason a row produced no usable value
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UndefinedValue {
    #[error("Inhibitor constant is undefined (k_m = 1 or non-finite)")]
    InhibitorConstant,
    #[error("Predicted velocity is not finite")]
    NonFinitePrediction,
}
