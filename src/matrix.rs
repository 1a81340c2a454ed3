//! Combination matrices
//!
//! The same product as the case generator, laid out as a table: one column
//! per parameter, one row per combination.
//!
//! ```text
//!     pressure  GVF  WLR
//! 0         10   10   40
//! 1         10   10   60
//! ...
//! ```

use crate::error::{Error, Result};
use crate::params::ParameterSet;
use crate::value::Value;
use serde::Serialize;
use std::fmt;

/// All combinations of a parameter set as rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinationMatrix {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Lay out every combination of `parameters` as a matrix
pub fn generate_combination_matrix(parameters: &ParameterSet) -> Result<CombinationMatrix> {
    let rows: Vec<Vec<Value>> = parameters.combinations()?.collect();
    Ok(CombinationMatrix {
        columns: parameters.names().map(str::to_string).collect(),
        rows,
    })
}

impl CombinationMatrix {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let i = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| &row[i]).collect())
    }

    /// Export as CSV with a header row
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(Value::to_plain_string))?;
        }
        let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| Error::Other(e.to_string()))
    }
}

impl fmt::Display for CombinationMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(Value::to_plain_string).collect())
            .collect();

        let index_width = self.rows.len().saturating_sub(1).to_string().len();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                cells
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:index_width$}", "")?;
        for (name, width) in self.columns.iter().zip(&widths) {
            write!(f, "  {:>width$}", name)?;
        }
        writeln!(f)?;

        for (index, row) in cells.iter().enumerate() {
            write!(f, "{:<index_width$}", index)?;
            for (cell, width) in row.iter().zip(&widths) {
                write!(f, "  {:>width$}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
