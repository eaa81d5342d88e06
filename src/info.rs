//! Information display module for pipeline results
//!
//! This module implements `Display` for the fit, the model tables and the complete
//! analysis, rendering them as tables for terminal output.

use std::fmt::{self, Display};

use colored::Colorize;
use tabled::{builder::Builder, settings::Style};

use crate::analysis::InhibitionAnalysis;
use crate::kinetics::{
    DroppedRow, FitMetrics, LinearFit, MichaelisConstant, ModelRow, ModelTable,
};

/// Number of decimals shown for floating point values
const PRECISION: usize = 4;

/// Trait for converting result rows to table records
trait TableRecord {
    /// Get the column headers for the table
    fn columns() -> Vec<String>;

    /// Convert the instance to a record for display in a table
    fn to_record(&self) -> Vec<String>;
}

impl TableRecord for ModelRow {
    fn columns() -> Vec<String> {
        ["row", "s", "i", "v", "k_m", "k_i", "predicted v"]
            .map(String::from)
            .to_vec()
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.row.index.to_string(),
            format_value(self.row.s),
            format_value(self.row.i),
            format_value(self.row.v),
            format_value(self.row.k_m),
            format_optional(self.row.k_i),
            format_value(self.predicted_v),
        ]
    }
}

impl TableRecord for DroppedRow {
    fn columns() -> Vec<String> {
        ["row", "i", "reason"].map(String::from).to_vec()
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.index.to_string(),
            format_value(self.i),
            self.reason.to_string(),
        ]
    }
}

impl Display for LinearFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = Builder::default();
        builder.push_record(vec!["Reciprocal fit", ""]);
        builder.push_record(vec!["beta".to_string(), format_value(self.beta)]);
        builder.push_record(vec!["points".to_string(), self.n_points.to_string()]);
        builder.push_record(vec!["rss".to_string(), format_value(self.rss)]);
        builder.push_record(vec!["std error".to_string(), format_optional(self.std_error)]);
        builder.push_record(vec!["R² (uncentered)".to_string(), format_optional(self.r_squared)]);

        let mut table = builder.build();
        table.with(Style::rounded());
        write!(f, "{}", table)
    }
}

impl Display for FitMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = Builder::default();
        builder.push_record(["n", "SSE", "MSE", "RMSE", "MAE", "AIC", "BIC"]);
        builder.push_record(vec![
            self.n.to_string(),
            format_value(self.sse),
            format_value(self.mse),
            format_value(self.rmse),
            format_value(self.mae),
            format_value(self.aic),
            format_value(self.bic),
        ]);

        let mut table = builder.build();
        table.with(Style::rounded());
        write!(f, "{}", table)
    }
}

impl Display for ModelTable {
    /// Formats the surviving rows, followed by the dropped rows if there are any.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({})",
            format!("{} inhibition", self.model()).bold(),
            self.model().column()
        )?;

        if self.is_empty() {
            writeln!(f, "{}", "No rows with a finite prediction".yellow())?;
        } else {
            writeln!(f, "{}", to_table(self.rows()))?;
        }

        if !self.dropped().is_empty() {
            writeln!(f, "{}", format!("Dropped {} row(s)", self.dropped().len()).yellow())?;
            writeln!(f, "{}", to_table(self.dropped()))?;
        }

        Ok(())
    }
}

impl Display for InhibitionAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(fit) = &self.fit {
            writeln!(f, "{}", fit)?;
        }

        match &self.k_m {
            MichaelisConstant::Scalar(k_m) => {
                writeln!(f, "{} {}", "k_m:".bold(), format_value(*k_m))?
            }
            MichaelisConstant::PerRow(values) => {
                writeln!(f, "{} per row ({} values)", "k_m:".bold(), values.len())?
            }
        }

        writeln!(
            f,
            "{} {} of {} rows",
            "Working set:".bold(),
            self.working_set.len(),
            self.derived.len()
        )?;

        for table in self.tables() {
            writeln!(f)?;
            write!(f, "{}", table)?;
            if let Some(metrics) = table.metrics() {
                writeln!(f, "{}", metrics)?;
            }
        }

        Ok(())
    }
}

/// Converts a collection of TableRecord implementors to a formatted table string
fn to_table<T: TableRecord>(records: &[T]) -> String {
    let mut builder = Builder::default();
    builder.push_record(T::columns());

    for record in records {
        builder.push_record(record.to_record());
    }

    let mut table = builder.build();
    table.with(Style::sharp());
    table.to_string()
}

fn format_value(value: f64) -> String {
    format!("{:.*}", PRECISION, value)
}

fn format_optional(value: Option<f64>) -> String {
    value.map(format_value).unwrap_or_else(|| "undefined".to_string())
}
