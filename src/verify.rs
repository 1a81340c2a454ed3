//! Verification — re-run a function against recorded results
//!
//! Generated results double as regression fixtures: after the function
//! changes, replaying every recorded input shows which outputs moved.

use crate::error::Error;
use crate::function::{bind_arguments, TargetFn};
use crate::results::ResultCollection;
use serde::Serialize;
use std::fmt::Debug;

/// Outcome of replaying recorded results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationReport<V> {
    /// True when every case reproduced its recorded output
    pub passed: bool,
    /// Number of cases replayed
    pub checked: usize,
    /// Cases whose output changed
    pub mismatches: Vec<Mismatch<V>>,
}

/// A case whose output no longer matches the record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mismatch<V> {
    pub case: String,
    pub expected: V,
    pub actual: V,
}

/// Replay every recorded input through `func` and compare outputs.
///
/// Errors from `func` stop the replay and are returned unchanged.
pub fn verify_results<F>(
    func: &F,
    results: &ResultCollection<F::Output>,
) -> std::result::Result<VerificationReport<F::Output>, F::Error>
where
    F: TargetFn,
    F::Output: PartialEq + Clone,
    F::Error: From<Error>,
{
    let mut mismatches = Vec::new();
    for (label, record) in results.iter() {
        let args = bind_arguments(label, record.input(), func.params())?;
        let actual = func.call(&args)?;
        if &actual != record.output() {
            mismatches.push(Mismatch {
                case: label.to_string(),
                expected: record.output().clone(),
                actual,
            });
        }
    }

    tracing::debug!(
        checked = results.len(),
        mismatches = mismatches.len(),
        "verified test results"
    );

    Ok(VerificationReport {
        passed: mismatches.is_empty(),
        checked: results.len(),
        mismatches,
    })
}

impl<V: Debug> VerificationReport<V> {
    pub fn to_report(&self) -> String {
        let mut out = String::new();

        let status = if self.passed {
            "✓ PASSED"
        } else {
            "✗ FAILED"
        };
        out.push_str(&format!("Verification: {}\n", status));
        out.push_str(&format!(
            "Cases: {}/{} match\n",
            self.checked - self.mismatches.len(),
            self.checked
        ));

        if !self.mismatches.is_empty() {
            out.push_str("\nMismatches:\n");
            for m in &self.mismatches {
                out.push_str(&format!(
                    "  {}: expected {:?}, got {:?}\n",
                    m.case, m.expected, m.actual
                ));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::create_test_cases;
    use crate::error::Result;
    use crate::function::NamedFn;
    use crate::params::ParameterSet;
    use crate::results::generate_test_results;
    use crate::value::Value;

    fn int_fn(f: fn(i64, i64) -> i64) -> NamedFn<impl Fn(&[Value]) -> Result<i64>> {
        NamedFn::new(["a", "b"], move |args: &[Value]| -> Result<i64> {
            match (args[0].as_i64(), args[1].as_i64()) {
                (Some(a), Some(b)) => Ok(f(a, b)),
                _ => Err("expected integers".into()),
            }
        })
    }

    #[test]
    fn test_unchanged_function_passes() {
        let set = ParameterSet::new().param("a", [1, 2]).param("b", [3, 4]);
        let cases = create_test_cases(&set).unwrap();
        let add = int_fn(|a, b| a + b);
        let results = generate_test_results(&add, &cases, false).unwrap();

        let report = verify_results(&add, &results).unwrap();
        assert!(report.passed);
        assert_eq!(report.checked, 4);
        assert!(report.to_report().contains("✓ PASSED"));
    }

    #[test]
    fn test_changed_function_reports_mismatches() {
        let set = ParameterSet::new().param("a", [1, 2]).param("b", [1, 3]);
        let cases = create_test_cases(&set).unwrap();
        let results = generate_test_results(&int_fn(|a, b| a + b), &cases, false).unwrap();

        // a * b agrees with a + b only at (2, 2), which is not among the cases
        let report = verify_results(&int_fn(|a, b| a * b), &results).unwrap();
        assert!(!report.passed);
        assert_eq!(report.mismatches.len(), 4);
        assert_eq!(
            report.mismatches[0],
            Mismatch {
                case: "case_0".into(),
                expected: 2,
                actual: 1,
            }
        );
        assert!(report.to_report().contains("case_0: expected 2, got 1"));
    }
}
