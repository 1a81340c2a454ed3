// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # chtoolbox — a personal toolbox of data conveniences
//!
//! The centrepiece is combinatorial test data generation: describe the
//! candidate values of every parameter, get every combination as a labeled
//! test case, then run a function over the cases to record expected outputs.
//!
//! ## Quick Start
//!
//! ```rust
//! use chtoolbox::{create_test_cases, generate_test_results, NamedFn, ParameterSet, Value};
//!
//! fn calculator(args: &[Value]) -> chtoolbox::Result<Value> {
//!     let (a, b) = (args[0].as_f64().unwrap_or(0.0), args[1].as_f64().unwrap_or(0.0));
//!     match args[2].as_str() {
//!         Some("add") => Ok(Value::Float(a + b)),
//!         Some("subtract") => Ok(Value::Float(a - b)),
//!         Some("multiply") => Ok(Value::Float(a * b)),
//!         Some("divide") => Ok(Value::Float(a / b)),
//!         _ => Err("Invalid operation".into()),
//!     }
//! }
//!
//! let parameters = ParameterSet::new()
//!     .param("a", [1, 2, 3, 4])
//!     .param("b", [5, 6, 7, 8])
//!     .param("operation", ["add", "subtract", "multiply", "divide"]);
//!
//! let cases = create_test_cases(&parameters)?;
//! assert_eq!(cases.len(), 64);
//!
//! let calc = NamedFn::new(["a", "b", "operation"], calculator);
//! let results = generate_test_results(&calc, &cases, false)?;
//! assert_eq!(results.get("case_0").unwrap().output(), &Value::Float(6.0));
//! # Ok::<(), chtoolbox::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                                                              │
//! │  ParameterSet {a: [..], b: [..]}                             │
//! │       │                                                      │
//! │       ├──► create_test_cases ──► CaseCollection              │
//! │       │         │                                            │
//! │       │         └──► generate_test_results(fn) ──► Results   │
//! │       │                   ▲               │                  │
//! │       │   TabularSource ──┘               └──► verify_results│
//! │       │                                                      │
//! │       └──► generate_combination_matrix ──► CombinationMatrix │
//! │                                                              │
//! │  Clipboard text ──► clipboard_to_dict / _list / compare      │
//! │                                                              │
//! │  LicenseConfig ──► add_license_header ──► LicenseReport      │
//! │                                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything is synchronous and in memory apart from reading tables and
//! rewriting files for license headers.

// Core data model
pub mod error;
pub mod params;
pub mod value;

// Test data generation
pub mod cases;
pub mod function;
pub mod results;
pub mod table;
pub mod verify;

// Other utilities
pub mod clipboard;
pub mod license;
pub mod matrix;

// Re-exports
pub use cases::{create_labeled_test_cases, create_test_cases, CaseCollection, TestCase};
pub use error::{Error, Result};
pub use function::{bind_arguments, NamedFn, TargetFn};
pub use params::{Combinations, ParameterSet};
pub use results::{generate_test_results, CaseSource, ResultCollection, ResultRecord};
pub use table::{Table, TableOptions, TabularSource};
pub use value::Value;
pub use verify::{verify_results, Mismatch, VerificationReport};

pub use clipboard::{
    clipboard_to_dict, clipboard_to_list, compare_columns, compare_lists_from_clipboard,
    ClipboardTable, ColumnComparison,
};
pub use license::{add_license_header, CommentStyle, IgnoreRules, LicenseConfig, LicenseReport};
pub use matrix::{generate_combination_matrix, CombinationMatrix};

/// Map type of test cases and `Value::Map`
pub use indexmap::IndexMap;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
