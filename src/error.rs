//! Error types for chtoolbox

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// chtoolbox errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Parameter '{name}' has no values; no test cases can be generated")]
    EmptyParameter { name: String },

    #[error("Parameter set is empty")]
    NoParameters,

    #[error("Parameter names must be non-empty")]
    InvalidParameterName,

    #[error("Duplicate case label: {0}")]
    DuplicateLabel(String),

    #[error("Expected {expected} case labels, got {actual}")]
    LabelCount { expected: usize, actual: usize },

    #[error("Too many combinations: the product of all value counts overflows")]
    TooManyCombinations,

    #[error(
        "Parameter mismatch in {case}: unexpected [{}], missing [{}]",
        unexpected.join(", "),
        missing.join(", ")
    )]
    ParameterMismatch {
        case: String,
        unexpected: Vec<String>,
        missing: Vec<String>,
    },

    #[error("Table error: {0}")]
    Table(String),

    #[error("Pattern error: {0}")]
    Pattern(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_norway::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}
