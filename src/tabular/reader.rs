//! Tabular Data Reading Module
//!
//! Loads observation datasets from CSV files (via Polars) and spreadsheets (via Calamine).
//! Both paths produce a Polars `DataFrame` first, which is then validated into a
//! [`Dataset`] using a [`ColumnMapping`].
//!
//! Spreadsheets are read from their first worksheet. The first row holds the headers.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use log::{debug, info};
use polars::prelude::*;

use crate::dataset::{ColumnMapping, Dataset, DatasetError};

/// File extensions handled by [`read_excel`]
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Loads a dataset from a CSV or spreadsheet file.
///
/// # Arguments
///
/// * `path` - Path to a `.csv` file or a spreadsheet (`.xlsx`, `.xls`, `.ods`, ...)
/// * `columns` - Names of the substrate, inhibitor and velocity columns
///
/// # Returns
///
/// Returns the validated `Dataset`, or a `DatasetError` if the file cannot be read, the
/// format is not supported, a column is missing or a value is invalid.
pub fn load_dataset(
    path: impl AsRef<Path>,
    columns: &ColumnMapping,
) -> Result<Dataset, DatasetError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    let df = if extension == "csv" {
        read_csv(path)?
    } else if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
        read_excel(path, columns)?
    } else {
        return Err(DatasetError::UnsupportedFormat(path.display().to_string()));
    };

    let dataset = Dataset::from_dataframe(&df, columns)?;
    info!(
        "Loaded {} observations from {}",
        dataset.len(),
        path.display()
    );

    Ok(dataset)
}

/// Reads a CSV file with a header row into a `DataFrame`.
pub fn read_csv(path: &Path) -> Result<DataFrame, DatasetError> {
    // Surface a missing file as an IO error rather than a Polars one
    std::fs::metadata(path)?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    debug!("Read CSV {} with shape {:?}", path.display(), df.shape());
    Ok(df)
}

/// Reads the substrate, inhibitor and velocity columns of the first worksheet of a
/// spreadsheet into a `DataFrame`.
///
/// Only the columns named by `columns` are converted, so other columns may hold text.
/// Empty cells and cells that are not numbers become nulls. Rows without any value are
/// skipped.
pub fn read_excel(path: &Path, columns: &ColumnMapping) -> Result<DataFrame, DatasetError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(DatasetError::NoWorksheet)?;

    let range = workbook.worksheet_range(&sheet)?;
    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(|cell| cell.to_string()).collect(),
        None => return Err(DatasetError::Empty),
    };

    let (s_idx, i_idx, v_idx) = columns.resolve(&headers)?;
    let selected = [s_idx, i_idx, v_idx];
    let mut values: [Vec<Option<f64>>; 3] = Default::default();

    for row in rows {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }

        for (column, idx) in values.iter_mut().zip(selected) {
            column.push(row.get(idx).and_then(cell_value));
        }
    }

    let series: Vec<Series> = selected
        .iter()
        .zip(values)
        .map(|(idx, values)| Series::new(&headers[*idx], values))
        .collect();

    let df = DataFrame::new(series)?;
    debug!(
        "Read worksheet '{}' of {} with shape {:?}",
        sheet,
        path.display(),
        df.shape()
    );

    Ok(df)
}

/// Numeric value of a worksheet cell. Numeric text is parsed, anything else is `None`.
fn cell_value(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(value) => Some(*value),
        Data::Int(value) => Some(*value as f64),
        Data::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dataset::Observation;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    /// Writes a single-sheet workbook. Cells that parse as numbers are written as numbers,
    /// empty strings are left blank and everything else is written as text.
    fn write_workbook(
        dir: &tempfile::TempDir,
        name: &str,
        rows: &[&[&str]],
    ) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();

        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let (r, c) = (r as u32, c as u16);
                if cell.is_empty() {
                    continue;
                }
                match cell.parse::<f64>() {
                    Ok(number) => sheet.write_number(r, c, number).unwrap(),
                    Err(_) => sheet.write_string(r, c, *cell).unwrap(),
                };
            }
        }

        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn test_load_csv_with_uppercase_headers() {
        // ARRANGE
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "data.csv", "S,I,v\n10,0,5\n20,0,8\n10,5,3\n");

        // ACT
        let dataset = load_dataset(&path, &ColumnMapping::default()).unwrap();

        // ASSERT
        assert_eq!(
            dataset.observations(),
            &[
                Observation::new(10.0, 0.0, 5.0),
                Observation::new(20.0, 0.0, 8.0),
                Observation::new(10.0, 5.0, 3.0),
            ]
        );
    }

    #[test]
    fn test_load_csv_ignores_extra_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "data.csv", "run,v,s,i\na,1.5,2.0,0.5\nb,2.5,4.0,0.5\n");

        let dataset = load_dataset(&path, &ColumnMapping::default()).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.observations()[1], Observation::new(4.0, 0.5, 2.5));
    }

    #[test]
    fn test_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "data.csv", "s,v\n1,2\n");

        let result = load_dataset(&path, &ColumnMapping::default());

        match result {
            Err(DatasetError::MissingColumn(name)) => assert_eq!(name, "i"),
            other => panic!("Expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "data.csv", "s,i,v\n1,0,2\n2,,3\n");

        let result = load_dataset(&path, &ColumnMapping::default());

        assert!(matches!(
            result,
            Err(DatasetError::MissingValue { row: 1, .. })
        ));
    }

    #[test]
    fn test_unsupported_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "data.json", "{}");

        let result = load_dataset(&path, &ColumnMapping::default());
        assert!(matches!(result, Err(DatasetError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_dataset("does/not/exist.csv", &ColumnMapping::default());
        assert!(matches!(result, Err(DatasetError::Io(_))));
    }

    #[test]
    fn test_load_spreadsheet() {
        // ARRANGE
        let dir = tempfile::tempdir().unwrap();
        let path = write_workbook(
            &dir,
            "data.xlsx",
            &[
                &["S", "I", "v"],
                &["10", "0", "5"],
                &["20", "0", "8"],
                &["10", "5", "3"],
            ],
        );

        // ACT
        let dataset = load_dataset(&path, &ColumnMapping::default()).unwrap();

        // ASSERT
        assert_eq!(
            dataset.observations(),
            &[
                Observation::new(10.0, 0.0, 5.0),
                Observation::new(20.0, 0.0, 8.0),
                Observation::new(10.0, 5.0, 3.0),
            ]
        );
    }

    #[test]
    fn test_spreadsheet_ignores_text_in_unmapped_columns() {
        let dir = tempfile::tempdir().unwrap();
        let xlsx = write_workbook(
            &dir,
            "data.xlsx",
            &[
                &["run", "S", "I", "v"],
                &["a", "1", "0", "0.9"],
                &["b", "2.5", "5", "1.0"],
            ],
        );
        let csv = write_file(&dir, "data.csv", "run,S,I,v\na,1,0,0.9\nb,2.5,5,1.0\n");

        let from_xlsx = load_dataset(&xlsx, &ColumnMapping::default()).unwrap();
        let from_csv = load_dataset(&csv, &ColumnMapping::default()).unwrap();

        assert_eq!(from_xlsx.len(), 2);
        assert_eq!(from_xlsx.observations()[1], Observation::new(2.5, 5.0, 1.0));
        assert_eq!(from_xlsx, from_csv);
    }

    #[test]
    fn test_spreadsheet_skips_blank_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_workbook(
            &dir,
            "data.xlsx",
            &[
                &["s", "i", "v"],
                &["1", "0", "0.5"],
                &["", "", ""],
                &["2", "0", "0.8"],
            ],
        );

        let dataset = load_dataset(&path, &ColumnMapping::default()).unwrap();

        assert_eq!(
            dataset.observations(),
            &[
                Observation::new(1.0, 0.0, 0.5),
                Observation::new(2.0, 0.0, 0.8)
            ]
        );
    }

    #[test]
    fn test_spreadsheet_parses_numeric_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "s").unwrap();
        sheet.write_string(0, 1, "i").unwrap();
        sheet.write_string(0, 2, "v").unwrap();
        sheet.write_string(1, 0, " 4.0 ").unwrap();
        sheet.write_number(1, 1, 0.0).unwrap();
        sheet.write_number(1, 2, 1.5).unwrap();
        workbook.save(&path).unwrap();

        let dataset = load_dataset(&path, &ColumnMapping::default()).unwrap();

        assert_eq!(dataset.observations(), &[Observation::new(4.0, 0.0, 1.5)]);
    }

    #[test]
    fn test_spreadsheet_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_workbook(&dir, "data.xlsx", &[&["s", "v"], &["1", "2"]]);

        match load_dataset(&path, &ColumnMapping::default()) {
            Err(DatasetError::MissingColumn(name)) => assert_eq!(name, "i"),
            other => panic!("Expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_spreadsheet_text_in_mapped_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_workbook(
            &dir,
            "data.xlsx",
            &[&["s", "i", "v"], &["1", "0", "2"], &["high", "0", "3"]],
        );

        let result = load_dataset(&path, &ColumnMapping::default());

        assert!(matches!(
            result,
            Err(DatasetError::MissingValue { row: 1, .. })
        ));
    }
}
