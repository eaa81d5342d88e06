//! Analysis module for running the complete estimation pipeline.
//!
//! This module provides the [`PipelineSetup`] configuration and the [`InhibitionAnalysis`]
//! result it produces. A single call runs every stage once:
//!
//! 1. Reciprocal-transform fit of the Michaelis constant (skipped if `k_m` is supplied)
//! 2. Derivation of `k_m` and `k_i` for every observation
//! 3. Selection of the working set (`s > 0`)
//! 4. Evaluation of the noncompetitive, competitive and uncompetitive models
//!
//! The result is an immutable value. Running the pipeline twice on the same dataset yields
//! identical results.

use std::path::Path;

use derive_builder::Builder;
use log::info;
use serde::{Deserialize, Serialize};

use crate::dataset::{ColumnMapping, Dataset};
use crate::kinetics::{
    derive_constants, lineweaver_burk, working_set, DerivedRow, InhibitionModel, KineticsError,
    KmPolicy, LinearFit, MichaelisConstant, ModelTable, VmaxSource,
};

/// Configuration of the estimation pipeline
///
/// # Fields
///
/// * `km_policy` - How the fitted slope becomes the Michaelis constant (default: scalar)
/// * `k_m` - Externally supplied Michaelis constant; skips the fit when set
/// * `vmax` - Source of the maximum velocity (default: observed velocity of each row)
/// * `columns` - Column names used when loading a file
///
/// # Examples
///
/// ```
/// use enzinhib::prelude::*;
///
/// let setup = PipelineSetupBuilder::default()
///     .k_m(15.0)
///     .vmax(VmaxSource::Fixed(12.0))
///     .build()
///     .unwrap();
///
/// assert_eq!(setup.k_m, Some(15.0));
/// assert_eq!(setup.km_policy, KmPolicy::Scalar);
/// ```
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct PipelineSetup {
    #[builder(default)]
    #[serde(default)]
    pub km_policy: KmPolicy,
    #[builder(setter(into, strip_option), default)]
    #[serde(default)]
    pub k_m: Option<f64>,
    #[builder(default)]
    #[serde(default)]
    pub vmax: VmaxSource,
    #[builder(default)]
    #[serde(default)]
    pub columns: ColumnMapping,
}

impl Default for PipelineSetup {
    fn default() -> Self {
        Self {
            km_policy: KmPolicy::default(),
            k_m: None,
            vmax: VmaxSource::default(),
            columns: ColumnMapping::default(),
        }
    }
}

impl PipelineSetup {
    /// Reads a setup from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, std::io::Error> {
        let file = std::fs::File::open(path)?;
        serde_json::from_reader(file).map_err(std::io::Error::from)
    }
}

/// Result of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InhibitionAnalysis {
    /// Reciprocal fit; `None` if the Michaelis constant was supplied
    pub fit: Option<LinearFit>,
    pub k_m: MichaelisConstant,
    /// Every observation with its constants, in dataset order
    pub derived: Vec<DerivedRow>,
    /// Derived rows with `s > 0`
    pub working_set: Vec<DerivedRow>,
    pub noncompetitive: ModelTable,
    pub competitive: ModelTable,
    pub uncompetitive: ModelTable,
}

impl InhibitionAnalysis {
    /// Runs the full pipeline on `dataset`.
    ///
    /// # Arguments
    ///
    /// * `dataset` - The loaded observations
    /// * `setup` - Pipeline configuration
    ///
    /// # Returns
    ///
    /// The analysis, or a `KineticsError` if the regression input is degenerate or a
    /// supplied constant is not finite. Row-level undefined values never fail the run.
    pub fn run(dataset: &Dataset, setup: &PipelineSetup) -> Result<Self, KineticsError> {
        if let VmaxSource::Fixed(vmax) = setup.vmax {
            if !vmax.is_finite() {
                return Err(KineticsError::InvalidVmax(vmax));
            }
        }

        let (fit, k_m) = match setup.k_m {
            Some(k_m) if !k_m.is_finite() => {
                return Err(KineticsError::InvalidMichaelisConstant(k_m))
            }
            Some(k_m) => (None, MichaelisConstant::Scalar(k_m)),
            None => {
                let fit = lineweaver_burk(dataset)?;
                let k_m = MichaelisConstant::from_fit(&fit, dataset, setup.km_policy);
                (Some(fit), k_m)
            }
        };

        match k_m.scalar() {
            Some(value) => info!("Michaelis constant: {value}"),
            None => info!("Michaelis constant: per-row values"),
        }

        let derived = derive_constants(dataset, &k_m);
        let working_set = working_set(&derived);

        info!(
            "Working set: {} of {} rows have s > 0",
            working_set.len(),
            derived.len()
        );

        let [noncompetitive, competitive, uncompetitive] =
            InhibitionModel::ALL.map(|model| ModelTable::evaluate(model, &working_set, setup.vmax));

        for table in [&noncompetitive, &competitive, &uncompetitive] {
            info!(
                "{}: {} rows kept, {} dropped",
                table.model(),
                table.len(),
                table.dropped().len()
            );
        }

        Ok(Self {
            fit,
            k_m,
            derived,
            working_set,
            noncompetitive,
            competitive,
            uncompetitive,
        })
    }

    /// Loads a CSV or Excel file and runs the pipeline on it.
    #[cfg(feature = "tabular")]
    pub fn from_file(path: impl AsRef<Path>, setup: &PipelineSetup) -> Result<Self, KineticsError> {
        let dataset = crate::tabular::reader::load_dataset(path, &setup.columns)?;
        Self::run(&dataset, setup)
    }

    /// The result table of `model`.
    pub fn table(&self, model: InhibitionModel) -> &ModelTable {
        match model {
            InhibitionModel::Noncompetitive => &self.noncompetitive,
            InhibitionModel::Competitive => &self.competitive,
            InhibitionModel::Uncompetitive => &self.uncompetitive,
        }
    }

    pub fn tables(&self) -> [&ModelTable; 3] {
        [&self.noncompetitive, &self.competitive, &self.uncompetitive]
    }
}
