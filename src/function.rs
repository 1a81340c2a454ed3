//! Functions under test
//!
//! A target function declares its parameter names. Arguments are bound by
//! name: for each declared parameter the value is looked up in the test case,
//! producing an ordered argument list.

use crate::cases::TestCase;
use crate::error::{Error, Result};
use crate::value::Value;

/// A function that test results can be generated for
pub trait TargetFn {
    /// What the function returns for one case
    type Output;
    /// What the function fails with
    type Error;

    /// Declared parameter names, in call order
    fn params(&self) -> &[String];

    /// Invoke with arguments in [`TargetFn::params`] order
    fn call(&self, args: &[Value]) -> std::result::Result<Self::Output, Self::Error>;
}

/// A closure paired with its parameter names
///
/// ```
/// use chtoolbox::{NamedFn, TargetFn, Value};
///
/// let add = NamedFn::new(["a", "b"], |args: &[Value]| -> chtoolbox::Result<Value> {
///     match (&args[0], &args[1]) {
///         (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a + b)),
///         _ => Err("add expects integers".into()),
///     }
/// });
/// assert_eq!(add.params(), ["a", "b"]);
/// assert_eq!(add.call(&[Value::Int(1), Value::Int(2)]).unwrap(), Value::Int(3));
/// ```
#[derive(Clone)]
pub struct NamedFn<F> {
    params: Vec<String>,
    func: F,
}

impl<F> NamedFn<F> {
    pub fn new<I, S>(params: I, func: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            params: params.into_iter().map(Into::into).collect(),
            func,
        }
    }
}

impl<F> std::fmt::Debug for NamedFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedFn")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl<F, O, E> TargetFn for NamedFn<F>
where
    F: Fn(&[Value]) -> std::result::Result<O, E>,
{
    type Output = O;
    type Error = E;

    fn params(&self) -> &[String] {
        &self.params
    }

    fn call(&self, args: &[Value]) -> std::result::Result<O, E> {
        (self.func)(args)
    }
}

/// Build the ordered argument list for `params` from a test case.
///
/// Every declared parameter must be present in the case and every key of the
/// case must be a declared parameter.
pub fn bind_arguments(label: &str, case: &TestCase, params: &[String]) -> Result<Vec<Value>> {
    check_names(label, case.keys().map(String::as_str), params)?;
    Ok(params
        .iter()
        .filter_map(|p| case.get(p))
        .cloned()
        .collect())
}

/// Compare a set of supplied names (case keys or table columns) against the
/// declared parameters
pub(crate) fn check_names<'a, I>(context: &str, names: I, params: &[String]) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let names: Vec<&str> = names.into_iter().collect();
    let unexpected: Vec<String> = names
        .iter()
        .filter(|n| !params.iter().any(|p| p == *n))
        .map(|n| n.to_string())
        .collect();
    let missing: Vec<String> = params
        .iter()
        .filter(|p| !names.contains(&p.as_str()))
        .cloned()
        .collect();

    if unexpected.is_empty() && missing.is_empty() {
        Ok(())
    } else {
        Err(Error::ParameterMismatch {
            case: context.to_string(),
            unexpected,
            missing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(pairs: &[(&str, i64)]) -> TestCase {
        pairs
            .iter()
            .map(|&(k, v)| (k.to_string(), Value::Int(v)))
            .collect()
    }

    fn params(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_binds_by_name_not_position() {
        let args = bind_arguments("c", &case(&[("b", 2), ("a", 1)]), &params(&["a", "b"])).unwrap();
        assert_eq!(args, vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn test_missing_argument() {
        let err = bind_arguments("c", &case(&[("a", 1)]), &params(&["a", "b"])).unwrap_err();
        match err {
            Error::ParameterMismatch {
                case,
                unexpected,
                missing,
            } => {
                assert_eq!(case, "c");
                assert!(unexpected.is_empty());
                assert_eq!(missing, vec!["b"]);
            }
            other => panic!("expected ParameterMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_unexpected_argument() {
        let err =
            bind_arguments("c", &case(&[("a", 1), ("z", 9)]), &params(&["a"])).unwrap_err();
        assert!(matches!(
            err,
            Error::ParameterMismatch { ref unexpected, .. } if unexpected == &vec!["z".to_string()]
        ));
    }
}
