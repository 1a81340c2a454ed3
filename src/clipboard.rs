//! Clipboard tables — ranges copied from a spreadsheet
//!
//! Copied ranges arrive as text without a header: tab-separated when copied
//! from a spreadsheet, otherwise whitespace-aligned. Reading the system
//! clipboard is left to the caller; these functions take the copied text.
//!
//! ```text
//! idx    col_a  col_b        clipboard_to_dict
//! row_a  1      4       ──►  {row_a: {col_a: 1, col_b: 4},
//! row_b  2      5             row_b: {col_a: 2, col_b: 5}}
//! ```

use crate::error::{Error, Result};
use crate::value::Value;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use std::io::Read;

/// Lines inspected when deciding between tab and whitespace separation
const SNIFF_LINES: usize = 10;

/// A headerless table of copied cells
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipboardTable {
    rows: Vec<Vec<Value>>,
    width: usize,
}

impl ClipboardTable {
    /// Parse copied text. Blank lines are skipped and short rows are padded
    /// with `Null`.
    pub fn parse(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        if lines.is_empty() {
            return Err(Error::Table("clipboard is empty".into()));
        }

        let tabbed = is_tab_separated(&lines);
        let mut rows: Vec<Vec<Value>> = lines
            .iter()
            .map(|line| {
                if tabbed {
                    line.split('\t').map(Value::infer).collect()
                } else {
                    line.split_whitespace().map(Value::infer).collect()
                }
            })
            .collect();

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, Value::Null);
        }

        Ok(Self { rows, width })
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse(&text)
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// One column, top to bottom
    pub fn column(&self, index: usize) -> Vec<&Value> {
        self.rows.iter().filter_map(|row| row.get(index)).collect()
    }
}

/// Tab separation wins when every sniffed line has the same, non-zero
/// number of tabs
fn is_tab_separated(lines: &[&str]) -> bool {
    let counts: HashSet<usize> = lines
        .iter()
        .take(SNIFF_LINES)
        .map(|l| l.trim_start_matches(' ').matches('\t').count())
        .collect();
    counts.len() == 1 && !counts.contains(&0)
}

/// Convert copied text to a map.
///
/// Two columns give a flat map `first column → second column`. Any other
/// width treats the first row as the header and the first column as row
/// keys, giving `row key → {header: value}`.
pub fn clipboard_to_dict(text: &str) -> Result<IndexMap<String, Value>> {
    let table = ClipboardTable::parse(text)?;

    if table.width() == 2 {
        return Ok(table
            .rows
            .iter()
            .map(|row| (row[0].to_plain_string(), row[1].clone()))
            .collect());
    }

    let (header, body) = table
        .rows
        .split_first()
        .ok_or_else(|| Error::Table("clipboard is empty".into()))?;
    let names: Vec<String> = header.iter().skip(1).map(Value::to_plain_string).collect();

    Ok(body
        .iter()
        .map(|row| {
            let record: IndexMap<String, Value> = names
                .iter()
                .cloned()
                .zip(row.iter().skip(1).cloned())
                .collect();
            (row[0].to_plain_string(), Value::Map(record))
        })
        .collect())
}

/// Flatten copied text to a list, row by row
pub fn clipboard_to_list(text: &str) -> Result<Vec<Value>> {
    let table = ClipboardTable::parse(text)?;
    Ok(table.rows.into_iter().flatten().collect())
}

/// Columns of a copied range compared against each other
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnComparison {
    /// One list per column, empty cells dropped
    pub columns: Vec<Vec<Value>>,
    /// Items missing from at least one column, in first-seen order
    pub unique_items: Vec<Value>,
    /// Items present in every column
    pub common_items: Vec<Value>,
}

/// Split copied text into columns and find which items every column shares.
pub fn compare_lists_from_clipboard(text: &str) -> Result<ColumnComparison> {
    let table = ClipboardTable::parse(text)?;
    let columns: Vec<Vec<Value>> = (0..table.width())
        .map(|i| {
            table
                .column(i)
                .into_iter()
                .filter(|v| !v.is_null())
                .cloned()
                .collect()
        })
        .collect();
    Ok(compare_columns(columns))
}

/// Compare already-split columns
pub fn compare_columns(columns: Vec<Vec<Value>>) -> ColumnComparison {
    let key_sets: Vec<HashSet<ValueKey>> = columns
        .iter()
        .map(|column| column.iter().map(ValueKey::from).collect())
        .collect();
    let in_every_column = |key: &ValueKey| key_sets.iter().all(|set| set.contains(key));

    let mut seen = HashSet::new();
    let mut common_items = Vec::new();
    let mut unique_items = Vec::new();
    for value in columns.iter().flatten() {
        let key = ValueKey::from(value);
        if in_every_column(&key) {
            if seen.insert(key) {
                common_items.push(value.clone());
            }
        } else if seen.insert(key) {
            unique_items.push(value.clone());
        }
    }

    ColumnComparison {
        columns,
        unique_items,
        common_items,
    }
}

/// Hashable identity of a [`Value`]; floats compare by bit pattern
#[derive(Debug, PartialEq, Eq, Hash)]
enum ValueKey {
    Null,
    Bool(bool),
    Int(i64),
    Float(u64),
    String(String),
    List(Vec<ValueKey>),
    Map(Vec<(String, ValueKey)>),
}

impl From<&Value> for ValueKey {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => ValueKey::Null,
            Value::Bool(b) => ValueKey::Bool(*b),
            Value::Int(i) => ValueKey::Int(*i),
            Value::Float(f) => ValueKey::Float(f.to_bits()),
            Value::String(s) => ValueKey::String(s.clone()),
            Value::List(items) => ValueKey::List(items.iter().map(ValueKey::from).collect()),
            Value::Map(map) => ValueKey::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), ValueKey::from(v)))
                    .collect(),
            ),
        }
    }
}
