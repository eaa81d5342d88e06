//! Observation Dataset Module
//!
//! This module provides the input side of the estimation pipeline: individual
//! [`Observation`] rows and the validated [`Dataset`] they form.
//!
//! # Key Features
//!
//! - Validation of substrate and inhibitor concentrations (finite, non-negative)
//! - Validation of observed velocities (finite)
//! - Configurable, case-insensitive column name matching through [`ColumnMapping`]
//!
//! A dataset is immutable once constructed. Rows are identified by their position.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single measured reaction rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Substrate concentration
    pub s: f64,
    /// Inhibitor concentration
    pub i: f64,
    /// Observed reaction velocity
    pub v: f64,
}

impl Observation {
    pub fn new(s: f64, i: f64, v: f64) -> Self {
        Self { s, i, v }
    }
}

/// A validated, non-empty table of observations
///
/// Construction checks every row, so downstream stages can rely on
/// `s >= 0`, `i >= 0` and a finite `v` for every observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    observations: Vec<Observation>,
}

impl Dataset {
    /// Creates a dataset from a list of observations.
    ///
    /// # Arguments
    ///
    /// * `observations` - The observation rows, in measurement order.
    ///
    /// # Returns
    ///
    /// Returns the validated `Dataset`, or a `DatasetError` if the list is empty or a row
    /// carries an invalid value.
    pub fn new(observations: Vec<Observation>) -> Result<Self, DatasetError> {
        if observations.is_empty() {
            return Err(DatasetError::Empty);
        }

        for (row, obs) in observations.iter().enumerate() {
            validate_concentration("s", row, obs.s)?;
            validate_concentration("i", row, obs.i)?;
            if !obs.v.is_finite() {
                return Err(DatasetError::InvalidValue {
                    column: "v",
                    row,
                    value: obs.v,
                });
            }
        }

        Ok(Self { observations })
    }

    /// Creates a dataset from three equally long columns.
    pub fn from_columns(s: &[f64], i: &[f64], v: &[f64]) -> Result<Self, DatasetError> {
        if s.len() != i.len() || s.len() != v.len() {
            return Err(DatasetError::ColumnLengthMismatch {
                s: s.len(),
                i: i.len(),
                v: v.len(),
            });
        }

        let observations = s
            .iter()
            .zip(i)
            .zip(v)
            .map(|((&s, &i), &v)| Observation { s, i, v })
            .collect();

        Self::new(observations)
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    pub fn substrate(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.s).collect()
    }

    pub fn velocity(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.v).collect()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

fn validate_concentration(column: &'static str, row: usize, value: f64) -> Result<(), DatasetError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(DatasetError::InvalidValue { column, row, value })
    }
}

/// Names of the substrate, inhibitor and velocity columns in a source table
///
/// Matching is case-insensitive, so the default mapping accepts both `s` and `S`.
///
/// # Examples
///
/// ```
/// use enzinhib::prelude::ColumnMappingBuilder;
///
/// let mapping = ColumnMappingBuilder::default()
///     .substrate("Substrate")
///     .build()
///     .unwrap();
///
/// assert_eq!(mapping.position(&["time", "substrate"], &mapping.substrate), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct ColumnMapping {
    #[builder(setter(into), default = "String::from(\"s\")")]
    pub substrate: String,
    #[builder(setter(into), default = "String::from(\"i\")")]
    pub inhibitor: String,
    #[builder(setter(into), default = "String::from(\"v\")")]
    pub velocity: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            substrate: String::from("s"),
            inhibitor: String::from("i"),
            velocity: String::from("v"),
        }
    }
}

impl ColumnMapping {
    /// Finds the position of `wanted` among `headers`, ignoring case and surrounding whitespace.
    pub fn position<S: AsRef<str>>(&self, headers: &[S], wanted: &str) -> Option<usize> {
        headers
            .iter()
            .position(|h| h.as_ref().trim().eq_ignore_ascii_case(wanted.trim()))
    }

    /// Resolves all three columns against `headers`.
    ///
    /// # Returns
    ///
    /// The `(substrate, inhibitor, velocity)` positions, or `DatasetError::MissingColumn`
    /// naming the first column that could not be found.
    pub fn resolve<S: AsRef<str>>(&self, headers: &[S]) -> Result<(usize, usize, usize), DatasetError> {
        let find = |wanted: &String| {
            self.position(headers, wanted)
                .ok_or_else(|| DatasetError::MissingColumn(wanted.clone()))
        };

        Ok((
            find(&self.substrate)?,
            find(&self.inhibitor)?,
            find(&self.velocity)?,
        ))
    }
}

/// Structural errors raised while loading a dataset
///
/// All of these abort the pipeline before any estimation takes place.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Missing column '{0}'")]
    MissingColumn(String),
    #[error("Dataset contains no observations")]
    Empty,
    #[error("Invalid value {value} in column '{column}' at row {row}")]
    InvalidValue {
        column: &'static str,
        row: usize,
        value: f64,
    },
    #[error("Missing value in column '{column}' at row {row}")]
    MissingValue { column: String, row: usize },
    #[error("Columns have different lengths (s: {s}, i: {i}, v: {v})")]
    ColumnLengthMismatch { s: usize, i: usize, v: usize },
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("Workbook contains no worksheets")]
    NoWorksheet,
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "tabular")]
    #[error("Failed to read table: {0}")]
    Polars(#[from] polars::error::PolarsError),
    #[cfg(feature = "tabular")]
    #[error("Failed to open workbook: {0}")]
    Excel(#[from] calamine::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_dataset() {
        let result = Dataset::new(vec![]);
        assert!(matches!(result, Err(DatasetError::Empty)));
    }

    #[test]
    fn test_rejects_negative_concentration() {
        let result = Dataset::new(vec![
            Observation::new(1.0, 0.0, 1.0),
            Observation::new(2.0, -1.0, 1.0),
        ]);

        match result {
            Err(DatasetError::InvalidValue { column, row, .. }) => {
                assert_eq!(column, "i");
                assert_eq!(row, 1);
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_finite_velocity() {
        let result = Dataset::new(vec![Observation::new(1.0, 0.0, f64::NAN)]);
        assert!(matches!(
            result,
            Err(DatasetError::InvalidValue { column: "v", .. })
        ));
    }

    #[test]
    fn test_io_error_message_keeps_cause() {
        let error = DatasetError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "permission denied",
        ));

        let message = error.to_string();
        assert_eq!(message, "Failed to read file: permission denied");
        assert!(!message.contains("not found"));
    }

    #[test]
    fn test_zero_concentrations_are_valid() {
        let dataset = Dataset::new(vec![Observation::new(0.0, 0.0, 0.0)]).unwrap();
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_from_columns_length_mismatch() {
        let result = Dataset::from_columns(&[1.0, 2.0], &[0.0], &[1.0, 2.0]);
        assert!(matches!(
            result,
            Err(DatasetError::ColumnLengthMismatch { s: 2, i: 1, v: 2 })
        ));
    }

    #[test]
    fn test_mapping_is_case_insensitive() {
        let mapping = ColumnMapping::default();
        let headers = vec!["S", "I", "v"];
        assert_eq!(mapping.resolve(&headers).unwrap(), (0, 1, 2));
    }

    #[test]
    fn test_mapping_reports_missing_column() {
        let mapping = ColumnMapping::default();
        let headers = vec!["s", "v"];

        match mapping.resolve(&headers) {
            Err(DatasetError::MissingColumn(name)) => assert_eq!(name, "i"),
            other => panic!("Expected MissingColumn, got {:?}", other),
        }
    }
}
