use std::fmt;
use std::ops::{Deref, DerefMut};

use indexmap::IndexMap;
use tracing::trace;

use crate::error::{FuzzyError, Result};
use crate::variable::FuzzyVariable;

/// Crisp values keyed by input variable name.
#[derive(Clone, Debug, Default)]
pub struct Inputs(pub(crate) IndexMap<String, f64>);

impl Inputs {
    pub fn new() -> Self {
        Inputs(IndexMap::new())
    }

    /// Setting the same variable twice keeps the last value
    pub fn add(&mut self, name: impl Into<String>, val: f64) {
        self.0.insert(name.into(), val);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Inputs {
    fn from_iter<It: IntoIterator<Item = (K, f64)>>(iter: It) -> Self {
        Inputs(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Degrees of membership of one crisp value in each term of an input
/// variable, in term order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fuzzification(IndexMap<String, f64>);

impl Fuzzification {
    pub fn degree(&self, term: &str) -> Option<f64> {
        self.0.get(term).copied()
    }

    pub fn degree_at(&self, index: usize) -> Option<f64> {
        self.0.get_index(index).map(|(_, d)| *d)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// A variable on the antecedent side of rules. It can fuzzify crisp values.
#[derive(Clone, Debug)]
pub struct InputVariable(FuzzyVariable);

impl InputVariable {
    pub fn new(name: impl Into<String>, min_val: f64, max_val: f64, res: usize) -> Result<Self> {
        FuzzyVariable::new(name, min_val, max_val, res).map(Self)
    }

    pub fn fuzzify(&self, value: f64) -> Result<Fuzzification> {
        if !value.is_finite() {
            return Err(FuzzyError::InvalidValue {
                name: self.name().to_owned(),
                value,
            });
        }

        let degrees = self
            .sets()
            .iter()
            .map(|(term, set)| (term.clone(), set.lookup(value)))
            .collect();

        trace!(variable = self.name(), value, "fuzzified input");

        Ok(Fuzzification(degrees))
    }

    /// Same as [`InputVariable::fuzzify`] plus a report listing the degree of
    /// every term.
    pub fn fuzzify_info(&self, value: f64) -> Result<(Fuzzification, String)> {
        let fuzzification = self.fuzzify(value)?;
        let mut report = self.name().to_owned();

        for (term, degree) in fuzzification.iter() {
            report.push_str(&format!("\n{term} {degree}"));
        }

        Ok((fuzzification, report))
    }
}

impl From<FuzzyVariable> for InputVariable {
    fn from(var: FuzzyVariable) -> Self {
        Self(var)
    }
}

impl Deref for InputVariable {
    type Target = FuzzyVariable;

    fn deref(&self) -> &FuzzyVariable {
        &self.0
    }
}

impl DerefMut for InputVariable {
    fn deref_mut(&mut self) -> &mut FuzzyVariable {
        &mut self.0
    }
}

impl fmt::Display for InputVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
