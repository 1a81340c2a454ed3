//! Dynamically typed values
//!
//! Parameter candidates, test case arguments, table cells and function
//! outputs are all `Value`s. Serialization is untagged so a `Value` reads and
//! writes as plain YAML/JSON.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A parameter, cell or output value
#[derive(Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    /// Infer a value from a raw table cell.
    ///
    /// Empty cells are `Null`; `true`/`false` in any case are booleans;
    /// integers and floats are parsed; anything else stays a string.
    pub fn infer(raw: &str) -> Value {
        let s = raw.trim();
        if s.is_empty() {
            return Value::Null;
        }
        if s.eq_ignore_ascii_case("true") {
            return Value::Bool(true);
        }
        if s.eq_ignore_ascii_case("false") {
            return Value::Bool(false);
        }
        if let Ok(i) = s.parse::<i64>() {
            return Value::Int(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return Value::Float(f);
        }
        Value::String(s.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Render without quoting strings; `Null` renders empty.
    ///
    /// Used wherever a value becomes a label, a key or a table cell.
    pub fn to_plain_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{:?}", fl),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::List(items) => {
                let strs: Vec<_> = items.iter().map(|i| i.to_string()).collect();
                write!(f, "[{}]", strs.join(", "))
            }
            Value::Map(m) => {
                let pairs: Vec<_> = m.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
                write!(f, "{{{}}}", pairs.join(", "))
            }
        }
    }
}

/// Same as `Display`, so reports and assertion messages read like the data
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f64::from(f))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(m: IndexMap<String, Value>) -> Self {
        Value::Map(m)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_cells() {
        assert_eq!(Value::infer(""), Value::Null);
        assert_eq!(Value::infer("  "), Value::Null);
        assert_eq!(Value::infer("TRUE"), Value::Bool(true));
        assert_eq!(Value::infer("false"), Value::Bool(false));
        assert_eq!(Value::infer("42"), Value::Int(42));
        assert_eq!(Value::infer("-7"), Value::Int(-7));
        assert_eq!(Value::infer("2.5"), Value::Float(2.5));
        assert_eq!(Value::infer(" add "), Value::String("add".into()));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Int(3).to_string(), "3");
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::from("x").to_string(), "\"x\"");
        assert_eq!(Value::from(vec![1, 2]).to_string(), "[1, 2]");

        let map = IndexMap::from([
            ("sum".to_string(), Value::Int(3)),
            ("diff".to_string(), Value::Int(-1)),
        ]);
        assert_eq!(Value::Map(map).to_string(), "{sum: 3, diff: -1}");
    }

    #[test]
    fn test_plain_string() {
        assert_eq!(Value::from("row_a").to_plain_string(), "row_a");
        assert_eq!(Value::Null.to_plain_string(), "");
        assert_eq!(Value::Int(5).to_plain_string(), "5");
    }

    #[test]
    fn test_untagged_yaml() {
        let values: Vec<Value> = serde_norway::from_str("[1, 2.5, add, true, ~]").unwrap();
        assert_eq!(
            values,
            vec![
                Value::Int(1),
                Value::Float(2.5),
                Value::from("add"),
                Value::Bool(true),
                Value::Null,
            ]
        );
    }

    #[test]
    fn test_map_keeps_document_order() {
        let value: Value = serde_json::from_str(r#"{"b": 1, "a": 2}"#).unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"b":1,"a":2}"#);
    }

    #[test]
    fn test_debug_reads_like_display() {
        assert_eq!(format!("{:?}", Value::Float(0.5)), "0.5");
        assert_eq!(
            format!("{:?}", vec![Value::Int(1), Value::from("x")]),
            "[1, \"x\"]"
        );
    }

    #[test]
    fn test_numeric_views() {
        assert_eq!(Value::Int(2).as_f64(), Some(2.0));
        assert_eq!(Value::Float(2.0).as_i64(), None);
        assert_eq!(Value::from("2").as_f64(), None);
    }
}
