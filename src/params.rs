//! Parameter sets and their Cartesian product
//!
//! A `ParameterSet` maps each parameter name to the candidate values for
//! that parameter. Order matters: parameters keep the order they were
//! supplied in, and the product enumerates them like nested loops, the first
//! parameter varying slowest.
//!
//! ## Example
//!
//! ```yaml
//! a: [1, 2, 3, 4]
//! b: [5, 6, 7, 8]
//! operation: [add, subtract, multiply, divide]
//! ```

use crate::error::{Error, Result};
use crate::value::Value;
use indexmap::IndexMap;
use itertools::structs::MultiProduct;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Cloned;
use std::path::Path;
use std::slice;

/// Named parameter lists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet {
    params: IndexMap<String, Vec<Value>>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`ParameterSet::insert`]
    pub fn param<I, T>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.insert(name, values.into_iter().map(Into::into).collect());
        self
    }

    /// Set the candidate values of a parameter. Re-setting a parameter keeps
    /// its position and returns the previous values.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<Value>) -> Option<Vec<Value>> {
        self.params.insert(name.into(), values)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Parameter names in supplied order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    pub fn values(&self, name: &str) -> Option<&[Value]> {
        self.params.get(name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Check that a product can be generated
    pub fn validate(&self) -> Result<()> {
        if self.params.is_empty() {
            return Err(Error::NoParameters);
        }
        for (name, values) in self.params.iter() {
            if name.is_empty() {
                return Err(Error::InvalidParameterName);
            }
            if values.is_empty() {
                return Err(Error::EmptyParameter {
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Number of combinations: the product of all value counts
    pub fn combination_count(&self) -> Result<usize> {
        self.validate()?;
        self.params
            .values()
            .try_fold(1usize, |acc, values| acc.checked_mul(values.len()))
            .ok_or(Error::TooManyCombinations)
    }

    /// Iterate the Cartesian product, first parameter varying slowest
    pub fn combinations(&self) -> Result<Combinations<'_>> {
        let remaining = self.combination_count()?;
        let product = self
            .params
            .values()
            .map(|values| values.iter().cloned())
            .multi_cartesian_product();
        Ok(Combinations { product, remaining })
    }

    /// Parse from YAML, keeping document order
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_norway::from_str(yaml)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_norway::to_string(self)?)
    }

    /// Parse from JSON, keeping document order
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a `.json` file, or YAML for any other extension
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }
}

impl<K, I, T> FromIterator<(K, I)> for ParameterSet
where
    K: Into<String>,
    I: IntoIterator<Item = T>,
    T: Into<Value>,
{
    fn from_iter<It: IntoIterator<Item = (K, I)>>(iter: It) -> Self {
        iter.into_iter()
            .fold(ParameterSet::new(), |set, (name, values)| set.param(name, values))
    }
}

/// Rows of the Cartesian product of a [`ParameterSet`], in nested-loop order
pub struct Combinations<'a> {
    product: MultiProduct<Cloned<slice::Iter<'a, Value>>>,
    remaining: usize,
}

impl Iterator for Combinations<'_> {
    type Item = Vec<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.product.next()?;
        self.remaining = self.remaining.saturating_sub(1);
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Combinations<'_> {}

impl fmt::Debug for Combinations<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Combinations")
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}
