//! Tabular case sources
//!
//! A delimited text table with a header row, one test case per data row.
//! Headers name the function parameters; rows are keyed by zero-based row
//! index, or by the values of a designated key column.
//!
//! ```text
//! a,b,c
//! 1,2,3
//! 4,5,6
//! ```

use crate::cases::{CaseCollection, TestCase};
use crate::error::{Error, Result};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};

/// How to read a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableOptions {
    /// Field delimiter (ASCII)
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Column whose values label the cases instead of the row index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_column: Option<String>,
}

fn default_delimiter() -> char {
    ','
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            key_column: None,
        }
    }
}

impl TableOptions {
    fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| Error::Table(format!("delimiter must be ASCII: {:?}", self.delimiter)))
    }
}

/// A parsed table: header plus inferred cell values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Read a delimited table with a header row
    pub fn from_reader<R: Read>(reader: R, options: &TableOptions) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter_byte()?)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if columns.iter().all(String::is_empty) {
            return Err(Error::Table("missing header row".into()));
        }
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].contains(column) {
                return Err(Error::Table(format!("duplicate column: {}", column)));
            }
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(Value::infer).collect());
        }

        Ok(Self { columns, rows })
    }

    pub fn parse(text: &str, options: &TableOptions) -> Result<Self> {
        Self::from_reader(text.as_bytes(), options)
    }

    /// Turn rows into labeled test cases
    pub fn into_cases(self, key_column: Option<&str>) -> Result<CaseCollection> {
        let key_index = match key_column {
            Some(key) => Some(
                self.columns
                    .iter()
                    .position(|c| c == key)
                    .ok_or_else(|| Error::Table(format!("unknown key column: {}", key)))?,
            ),
            None => None,
        };

        let mut cases = CaseCollection::with_capacity(self.rows.len());
        for (row_index, row) in self.rows.into_iter().enumerate() {
            let label = match key_index {
                Some(k) => {
                    let label = row[k].to_plain_string();
                    if label.is_empty() {
                        return Err(Error::Table(format!("row {} has an empty key", row_index)));
                    }
                    label
                }
                None => row_index.to_string(),
            };
            let case: TestCase = self
                .columns
                .iter()
                .zip(row)
                .enumerate()
                .filter(|(i, _)| Some(*i) != key_index)
                .map(|(_, (column, value))| (column.clone(), value))
                .collect();
            cases.insert(label, case)?;
        }
        Ok(cases)
    }

    /// Columns that carry parameters, i.e. all but the key column
    pub fn parameter_columns<'a>(&'a self, key_column: Option<&'a str>) -> impl Iterator<Item = &'a str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(move |c| Some(*c) != key_column)
    }
}

#[derive(Debug, Clone)]
enum Origin {
    Path(PathBuf),
    Text(String),
}

/// A table of test cases held in a file or in memory
#[derive(Debug, Clone)]
pub struct TabularSource {
    origin: Origin,
    options: TableOptions,
}

impl TabularSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            origin: Origin::Path(path.into()),
            options: TableOptions::default(),
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            origin: Origin::Text(text.into()),
            options: TableOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TableOptions) -> Self {
        self.options = options;
        self
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.options.delimiter = delimiter;
        self
    }

    pub fn key_column(mut self, column: impl Into<String>) -> Self {
        self.options.key_column = Some(column.into());
        self
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.origin {
            Origin::Path(p) => Some(p),
            Origin::Text(_) => None,
        }
    }

    /// Describe the source for error messages
    pub fn describe(&self) -> String {
        match &self.origin {
            Origin::Path(p) => p.display().to_string(),
            Origin::Text(_) => "<inline table>".to_string(),
        }
    }

    /// Read and parse the table
    pub fn load(&self) -> Result<Table> {
        let table = match &self.origin {
            Origin::Path(p) => Table::from_reader(std::fs::File::open(p)?, &self.options)?,
            Origin::Text(t) => Table::parse(t, &self.options)?,
        };
        tracing::debug!(
            source = %self.describe(),
            columns = table.columns.len(),
            rows = table.rows.len(),
            "loaded case table"
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_infers_types() {
        let table = Table::parse("a,b,op\n1,2.5,add\n3,,mul\n", &TableOptions::default()).unwrap();
        assert_eq!(table.columns, vec!["a", "b", "op"]);
        assert_eq!(
            table.rows[0],
            vec![Value::Int(1), Value::Float(2.5), Value::from("add")]
        );
        assert_eq!(table.rows[1][1], Value::Null);
    }

    #[test]
    fn test_rows_keyed_by_index() {
        let table = Table::parse("a,b\n1,2\n3,4\n", &TableOptions::default()).unwrap();
        let cases = table.into_cases(None).unwrap();
        assert_eq!(cases.labels().collect::<Vec<_>>(), vec!["0", "1"]);
        assert_eq!(cases.get("1").unwrap().get("a"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_rows_keyed_by_column() {
        let table = Table::parse("id;a\nfirst;1\nsecond;2\n", &TableOptions {
            delimiter: ';',
            key_column: None,
        })
        .unwrap();
        let cases = table.into_cases(Some("id")).unwrap();
        let first = cases.get("first").unwrap();
        assert_eq!(first.keys().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_duplicate_key_values_rejected() {
        let table = Table::parse("id,a\nx,1\nx,2\n", &TableOptions::default()).unwrap();
        assert!(matches!(
            table.into_cases(Some("id")),
            Err(Error::DuplicateLabel(ref l)) if l == "x"
        ));
    }

    #[test]
    fn test_unknown_key_column() {
        let table = Table::parse("a\n1\n", &TableOptions::default()).unwrap();
        assert!(matches!(table.into_cases(Some("id")), Err(Error::Table(_))));
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        assert!(matches!(
            Table::parse("a,a\n1,2\n", &TableOptions::default()),
            Err(Error::Table(_))
        ));
    }

    #[test]
    fn test_ragged_row_is_an_error() {
        assert!(matches!(
            Table::parse("a,b\n1,2,3\n", &TableOptions::default()),
            Err(Error::Csv(_))
        ));
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let source = TabularSource::from_text("a\n1\n").delimiter('→');
        assert!(matches!(source.load(), Err(Error::Table(_))));
    }

    #[test]
    fn test_options_from_yaml_defaults() {
        let options: TableOptions = serde_norway::from_str("key_column: id").unwrap();
        assert_eq!(options.delimiter, ',');
        assert_eq!(options.key_column.as_deref(), Some("id"));
    }
}
