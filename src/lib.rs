//! Enzyme Inhibition Kinetics Library
//!
//! This library estimates enzyme-kinetics parameters from measured reaction rates and
//! predicts reaction velocities under the classical inhibition models:
//! - Loading substrate/inhibitor/velocity datasets from CSV and Excel files
//! - Lineweaver-Burk style estimation of the Michaelis constant
//! - Derivation of per-row inhibitor constants
//! - Noncompetitive, competitive and uncompetitive velocity predictions
//! - Goodness-of-fit metrics against the observed velocities

#![warn(unused_imports)]

/// Commonly used types and functionality re-exported for convenience
pub mod prelude {
    pub use crate::analysis::*;
    pub use crate::dataset::*;
    pub use crate::kinetics::*;

    #[cfg(feature = "tabular")]
    pub use crate::tabular::reader::*;
}

/// Observation rows and the validated dataset they form
pub mod dataset;

/// Parameter estimation and inhibition models
pub mod kinetics {
    pub use crate::kinetics::constants::*;
    pub use crate::kinetics::error::*;
    pub use crate::kinetics::estimator::*;
    pub use crate::kinetics::filter::*;
    pub use crate::kinetics::metrics::FitMetrics;
    pub use crate::kinetics::models::*;
    pub use crate::kinetics::table::*;

    /// Michaelis and inhibitor constant derivation
    pub mod constants;
    /// Error types for the estimation pipeline
    pub mod error;
    /// Reciprocal-transform least squares estimation
    pub mod estimator;
    /// Working set selection
    pub mod filter;
    /// Goodness-of-fit metrics
    pub mod metrics;
    /// Inhibition velocity equations
    pub mod models;
    /// Per-model result tables
    pub mod table;
}

/// End-to-end pipeline configuration and results
pub mod analysis;

/// Human-readable rendering of results
pub mod info;

/// Tabular data handling
#[cfg(feature = "tabular")]
pub mod tabular {
    /// DataFrame conversions
    mod dataframe;
    /// Reading tabular data from files
    pub mod reader;
}
