//! Tabular Data Conversion Module
//!
//! Conversions between the pipeline types and Polars DataFrames:
//!
//! - `Dataset::from_dataframe()` validates a DataFrame into a [`Dataset`]
//! - `TryFrom<&ModelTable>` / `ModelTable::to_dataframe()` expose a result table with the
//!   columns `index, s, i, v, k_m, k_i` and the model's predicted velocity column

use polars::prelude::*;

use crate::dataset::{ColumnMapping, Dataset, DatasetError};
use crate::kinetics::ModelTable;

impl Dataset {
    /// Creates a dataset from the substrate, inhibitor and velocity columns of a DataFrame.
    ///
    /// # Arguments
    ///
    /// * `df` - The DataFrame to convert. Other columns are ignored.
    /// * `columns` - Names of the three columns, matched case-insensitively
    ///
    /// # Returns
    ///
    /// Returns the validated `Dataset`, or a `DatasetError` if a column is missing, a value
    /// is null or non-numeric, or a value is out of range.
    pub fn from_dataframe(df: &DataFrame, columns: &ColumnMapping) -> Result<Self, DatasetError> {
        let names: Vec<&str> = df.get_columns().iter().map(|c| c.name()).collect();
        let (s_idx, i_idx, v_idx) = columns.resolve(&names)?;

        let s = column_values(&df.get_columns()[s_idx])?;
        let i = column_values(&df.get_columns()[i_idx])?;
        let v = column_values(&df.get_columns()[v_idx])?;

        Dataset::from_columns(&s, &i, &v)
    }
}

impl TryFrom<&ModelTable> for DataFrame {
    type Error = PolarsError;

    fn try_from(table: &ModelTable) -> Result<Self, Self::Error> {
        model_table_to_dataframe(table)
    }
}

impl ModelTable {
    /// Converts the table into a DataFrame.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        model_table_to_dataframe(self)
    }
}

/// Reads a column as `f64`, failing on nulls and values that do not cast.
fn column_values(series: &Series) -> Result<Vec<f64>, DatasetError> {
    let name = series.name().to_string();
    let casted = series.cast(&DataType::Float64)?;

    casted
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| DatasetError::MissingValue {
                column: name.clone(),
                row,
            })
        })
        .collect()
}

fn model_table_to_dataframe(table: &ModelTable) -> PolarsResult<DataFrame> {
    let rows = table.rows();

    DataFrame::new(vec![
        Series::new(
            "index",
            rows.iter().map(|r| r.row.index as u64).collect::<Vec<u64>>(),
        ),
        Series::new("s", rows.iter().map(|r| r.row.s).collect::<Vec<f64>>()),
        Series::new("i", rows.iter().map(|r| r.row.i).collect::<Vec<f64>>()),
        Series::new("v", rows.iter().map(|r| r.row.v).collect::<Vec<f64>>()),
        Series::new("k_m", rows.iter().map(|r| r.row.k_m).collect::<Vec<f64>>()),
        Series::new(
            "k_i",
            rows.iter().map(|r| r.row.k_i).collect::<Vec<Option<f64>>>(),
        ),
        Series::new(
            table.model().column(),
            rows.iter().map(|r| r.predicted_v).collect::<Vec<f64>>(),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinetics::{DerivedRow, InhibitionModel, VmaxSource};

    #[test]
    fn test_dataset_from_dataframe() {
        let df = DataFrame::new(vec![
            Series::new("V", vec![1.0, 2.0]),
            Series::new("S", vec![3i64, 4]),
            Series::new("I", vec![0.0, 1.5]),
        ])
        .unwrap();

        let dataset = Dataset::from_dataframe(&df, &ColumnMapping::default()).unwrap();

        assert_eq!(dataset.substrate(), vec![3.0, 4.0]);
        assert_eq!(dataset.velocity(), vec![1.0, 2.0]);
        assert_eq!(dataset.observations()[1].i, 1.5);
    }

    #[test]
    fn test_non_numeric_values_are_missing() {
        let df = DataFrame::new(vec![
            Series::new("s", vec!["1.0", "high"]),
            Series::new("i", vec![0.0, 0.0]),
            Series::new("v", vec![1.0, 2.0]),
        ])
        .unwrap();

        let result = Dataset::from_dataframe(&df, &ColumnMapping::default());

        assert!(matches!(
            result,
            Err(DatasetError::MissingValue { row: 1, .. })
        ));
    }

    #[test]
    fn test_model_table_columns() {
        let working_set = vec![DerivedRow {
            index: 3,
            s: 2.0,
            i: 0.0,
            v: 4.0,
            k_m: 2.0,
            k_i: Some(0.0),
        }];
        let table = ModelTable::evaluate(
            InhibitionModel::Uncompetitive,
            &working_set,
            VmaxSource::Observed,
        );

        let df = table.to_dataframe().unwrap();

        assert_eq!(
            df.get_column_names(),
            vec!["index", "s", "i", "v", "k_m", "k_i", "ui_v"]
        );
        assert_eq!(df.height(), 1);
        assert_eq!(df.column("ui_v").unwrap().f64().unwrap().get(0), Some(2.0));
    }
}
