//! Test case generation from a parameter set
//!
//! ```text
//! {a: [1, 2], b: [3, 4]}
//!     │
//!     └──► case_0 {a: 1, b: 3}
//!          case_1 {a: 1, b: 4}
//!          case_2 {a: 2, b: 3}
//!          case_3 {a: 2, b: 4}
//! ```
//!
//! Case identifiers are positional. They follow the order of the parameters
//! and their values, so reordering the parameter set relabels the cases.

use crate::error::{Error, Result};
use crate::params::ParameterSet;
use crate::value::Value;
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One concrete combination: parameter name → value
pub type TestCase = IndexMap<String, Value>;

/// Labeled test cases in generation order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseCollection {
    cases: IndexMap<String, TestCase>,
}

impl CaseCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cases: IndexMap::with_capacity(capacity),
        }
    }

    /// Add a case under a new label
    pub fn insert(&mut self, label: impl Into<String>, case: TestCase) -> Result<()> {
        match self.cases.entry(label.into()) {
            Entry::Occupied(entry) => Err(Error::DuplicateLabel(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(case);
                Ok(())
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<&TestCase> {
        self.cases.get(label)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.cases.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TestCase)> {
        self.cases.iter().map(|(label, case)| (label.as_str(), case))
    }

    /// Content hash for detecting changes to generated fixtures
    pub fn fingerprint(&self) -> Result<String> {
        use sha2::{Digest, Sha256};
        let content = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&content);
        Ok(format!("sha256:{}", hex::encode(&hasher.finalize()[..8])))
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_norway::from_str(yaml)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_norway::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl IntoIterator for CaseCollection {
    type Item = (String, TestCase);
    type IntoIter = indexmap::map::IntoIter<String, TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.into_iter()
    }
}

/// Generate every combination of `parameters`, labeled `case_0`, `case_1`, ...
pub fn create_test_cases(parameters: &ParameterSet) -> Result<CaseCollection> {
    let count = parameters.combination_count()?;
    build_cases(parameters, (0..count).map(|i| format!("case_{}", i)))
}

/// Generate every combination of `parameters` under caller-supplied labels.
///
/// Labels are used verbatim in order; there must be exactly one per
/// combination and no two may be equal.
pub fn create_labeled_test_cases<I, S>(parameters: &ParameterSet, labels: I) -> Result<CaseCollection>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let count = parameters.combination_count()?;
    let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
    if labels.len() != count {
        return Err(Error::LabelCount {
            expected: count,
            actual: labels.len(),
        });
    }
    build_cases(parameters, labels)
}

fn build_cases<I>(parameters: &ParameterSet, labels: I) -> Result<CaseCollection>
where
    I: IntoIterator<Item = String>,
{
    let combinations = parameters.combinations()?;
    let names: Vec<&str> = parameters.names().collect();
    let mut cases = CaseCollection::with_capacity(combinations.len());

    for (label, row) in labels.into_iter().zip(combinations) {
        let case: TestCase = names
            .iter()
            .map(|name| name.to_string())
            .zip(row)
            .collect();
        cases.insert(label, case)?;
    }

    tracing::debug!(
        parameters = names.len(),
        cases = cases.len(),
        "generated test cases"
    );
    Ok(cases)
}
