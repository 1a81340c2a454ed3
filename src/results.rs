//! Run a function over every test case and record its outputs
//!
//! Each case's values are bound to the function's parameters by name and the
//! return value is recorded next to the input:
//!
//! ```text
//! case_0 {a: 1, b: 3}  ──► fn(a, b) ──►  case_0 {input: {a: 1, b: 3}, output: 4}
//! ```
//!
//! The first failing case aborts the run and its error is returned as-is.

use crate::cases::{CaseCollection, TestCase};
use crate::error::{Error, Result};
use crate::function::{bind_arguments, check_names, TargetFn};
use crate::table::TabularSource;
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::Debug;

/// Where test cases come from
#[derive(Debug, Clone)]
pub enum CaseSource<'a> {
    /// Cases already in memory
    Cases(Cow<'a, CaseCollection>),
    /// A delimited table, one case per row
    Table(Cow<'a, TabularSource>),
}

impl CaseSource<'_> {
    /// Produce the cases, checking table headers against `params` up front
    pub fn resolve(&self, params: &[String]) -> Result<Cow<'_, CaseCollection>> {
        match self {
            CaseSource::Cases(cases) => Ok(Cow::Borrowed(cases.as_ref())),
            CaseSource::Table(source) => {
                let table = source.load()?;
                let key_column = source.options().key_column.as_deref();
                check_names(
                    &format!("table {}", source.describe()),
                    table.parameter_columns(key_column),
                    params,
                )?;
                Ok(Cow::Owned(table.into_cases(key_column)?))
            }
        }
    }
}

impl<'a> From<&'a CaseCollection> for CaseSource<'a> {
    fn from(cases: &'a CaseCollection) -> Self {
        CaseSource::Cases(Cow::Borrowed(cases))
    }
}

impl From<CaseCollection> for CaseSource<'_> {
    fn from(cases: CaseCollection) -> Self {
        CaseSource::Cases(Cow::Owned(cases))
    }
}

impl<'a> From<&'a TabularSource> for CaseSource<'a> {
    fn from(source: &'a TabularSource) -> Self {
        CaseSource::Table(Cow::Borrowed(source))
    }
}

impl From<TabularSource> for CaseSource<'_> {
    fn from(source: TabularSource) -> Self {
        CaseSource::Table(Cow::Owned(source))
    }
}

/// Input and output of one evaluated case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord<V> {
    input: TestCase,
    output: V,
}

impl<V> ResultRecord<V> {
    pub fn new(input: TestCase, output: V) -> Self {
        Self { input, output }
    }

    pub fn input(&self) -> &TestCase {
        &self.input
    }

    pub fn output(&self) -> &V {
        &self.output
    }
}

/// Evaluated cases, keyed and ordered like their source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultCollection<V> {
    records: IndexMap<String, ResultRecord<V>>,
}

impl<V> Default for ResultCollection<V> {
    fn default() -> Self {
        Self {
            records: IndexMap::new(),
        }
    }
}

impl<V> ResultCollection<V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            records: IndexMap::with_capacity(capacity),
        }
    }

    /// Add a record; used when merging partial runs
    pub fn insert(&mut self, label: impl Into<String>, record: ResultRecord<V>) -> Result<()> {
        match self.records.entry(label.into()) {
            Entry::Occupied(entry) => Err(Error::DuplicateLabel(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(record);
                Ok(())
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<&ResultRecord<V>> {
        self.records.get(label)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResultRecord<V>)> {
        self.records.iter().map(|(label, record)| (label.as_str(), record))
    }

    /// Outputs in case order
    pub fn outputs(&self) -> impl Iterator<Item = &V> {
        self.records.values().map(ResultRecord::output)
    }
}

impl<V: Serialize> ResultCollection<V> {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_norway::to_string(self)?)
    }
}

impl<V: Debug> ResultCollection<V> {
    /// Render one line per case: `label: a=1, b=3 → 4`
    pub fn to_report(&self) -> String {
        let mut out = format!("Test results: {} cases\n", self.len());
        for (label, record) in self.iter() {
            let inputs: Vec<String> = record
                .input
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            out.push_str(&format!(
                "  {}: {} → {:?}\n",
                label,
                inputs.join(", "),
                record.output
            ));
        }
        out
    }

    /// Write the report to stdout
    #[allow(clippy::print_stdout)]
    pub fn print(&self) {
        print!("{}", self.to_report());
    }
}

impl<V> IntoIterator for ResultCollection<V> {
    type Item = (String, ResultRecord<V>);
    type IntoIter = indexmap::map::IntoIter<String, ResultRecord<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// Run `func` on every case and pair each input with its output.
///
/// `cases` is a [`CaseCollection`] or a [`TabularSource`]. Table columns must
/// match the function's parameters exactly, which is checked before the first
/// call. An error from `func` stops the run and is returned unchanged.
/// With `print_cases` the results are also written to stdout.
pub fn generate_test_results<'a, F>(
    func: &F,
    cases: impl Into<CaseSource<'a>>,
    print_cases: bool,
) -> std::result::Result<ResultCollection<F::Output>, F::Error>
where
    F: TargetFn,
    F::Output: Debug,
    F::Error: From<Error>,
{
    let source: CaseSource<'_> = cases.into();
    let cases = source.resolve(func.params())?;

    let mut results = ResultCollection::with_capacity(cases.len());
    for (label, case) in cases.iter() {
        let args = bind_arguments(label, case, func.params())?;
        tracing::trace!(case = %label, "evaluating test case");
        let output = func.call(&args)?;
        results.insert(label, ResultRecord::new(case.clone(), output))?;
    }

    tracing::debug!(cases = results.len(), "generated test results");

    if print_cases {
        results.print();
    }
    Ok(results)
}
