//! Model Result Tables
//!
//! A [`ModelTable`] holds the predicted velocities of one inhibition model over the working
//! set. Rows whose prediction is undefined are not part of the table. They are recorded as
//! [`DroppedRow`]s instead, so every table has its own survivorship.
//!
//! Tables are immutable. The query methods ([`ModelTable::inhibitor_concentrations`],
//! [`ModelTable::select`]) return new values and are safe to call from several threads.

use itertools::Itertools;
use log::debug;
use ndarray::Array1;
use ordered_float::OrderedFloat;
use serde::Serialize;

use super::{
    constants::DerivedRow,
    error::UndefinedValue,
    filter::predict,
    metrics::FitMetrics,
    models::{InhibitionModel, VmaxSource},
};

/// Number of fitted constants behind every prediction (`k_m` and `k_i`)
const NUM_PARAMETERS: usize = 2;

/// A derived row with the velocity predicted by one model
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelRow {
    #[serde(flatten)]
    pub row: DerivedRow,
    pub predicted_v: f64,
}

impl ModelRow {
    pub fn index(&self) -> usize {
        self.row.index
    }
}

/// A working-set row that has no prediction in a table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DroppedRow {
    pub index: usize,
    pub i: f64,
    pub reason: UndefinedValue,
}

/// Predicted velocities of one inhibition model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelTable {
    model: InhibitionModel,
    rows: Vec<ModelRow>,
    dropped: Vec<DroppedRow>,
}

impl ModelTable {
    /// Evaluates `model` on every row of the working set.
    ///
    /// # Arguments
    ///
    /// * `model` - The inhibition mechanism to evaluate
    /// * `working_set` - Derived rows with `s > 0`
    /// * `vmax` - Source of the maximum velocity
    ///
    /// # Returns
    ///
    /// The table of finite predictions, in working-set order. Rows without a finite
    /// prediction are listed in [`ModelTable::dropped`].
    pub fn evaluate(model: InhibitionModel, working_set: &[DerivedRow], vmax: VmaxSource) -> Self {
        let mut rows = Vec::with_capacity(working_set.len());
        let mut dropped = Vec::new();

        for row in working_set {
            match predict(model, row, vmax) {
                Ok(predicted_v) => rows.push(ModelRow {
                    row: *row,
                    predicted_v,
                }),
                Err(reason) => {
                    debug!("{model}: dropping row {} ({reason})", row.index);
                    dropped.push(DroppedRow {
                        index: row.index,
                        i: row.i,
                        reason,
                    });
                }
            }
        }

        Self {
            model,
            rows,
            dropped,
        }
    }

    pub fn model(&self) -> InhibitionModel {
        self.model
    }

    pub fn rows(&self) -> &[ModelRow] {
        &self.rows
    }

    pub fn dropped(&self) -> &[DroppedRow] {
        &self.dropped
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ModelRow> {
        self.rows.iter()
    }

    /// Whether the dataset row at `index` survived into this table.
    pub fn contains(&self, index: usize) -> bool {
        self.rows.iter().any(|r| r.index() == index)
    }

    /// Looks up the surviving row that originates from dataset row `index`.
    pub fn get(&self, index: usize) -> Option<&ModelRow> {
        self.rows.iter().find(|r| r.index() == index)
    }

    /// Distinct inhibitor concentrations, in order of first appearance.
    pub fn inhibitor_concentrations(&self) -> Vec<f64> {
        self.rows
            .iter()
            .map(|r| r.row.i)
            .unique_by(|i| OrderedFloat(*i))
            .collect()
    }

    /// Rows measured at inhibitor concentration `i`, as a new table.
    pub fn select(&self, i: f64) -> ModelTable {
        ModelTable {
            model: self.model,
            rows: self.rows.iter().filter(|r| r.row.i == i).copied().collect(),
            dropped: self.dropped.iter().filter(|d| d.i == i).copied().collect(),
        }
    }

    pub fn predicted(&self) -> Array1<f64> {
        self.rows.iter().map(|r| r.predicted_v).collect()
    }

    pub fn observed(&self) -> Array1<f64> {
        self.rows.iter().map(|r| r.row.v).collect()
    }

    /// Goodness-of-fit of the predictions against the observed velocities.
    pub fn metrics(&self) -> Option<FitMetrics> {
        let residuals = self.predicted() - self.observed();
        FitMetrics::from_residuals(&residuals, NUM_PARAMETERS)
    }
}

impl<'a> IntoIterator for &'a ModelTable {
    type Item = &'a ModelRow;
    type IntoIter = std::slice::Iter<'a, ModelRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
