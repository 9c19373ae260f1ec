use slotmap::SecondaryMap;

use crate::error::Result;
use crate::inputs::{Fuzzification, InputVariable};
use crate::outputs::{OutputDistribution, OutputVariable};
use crate::variable::{InputKey, OutputKey, Variables};

/// Transient state of one inference cycle: the fuzzified inputs and the
/// output distributions being aggregated.
///
/// A fresh context is created for every evaluation, so nothing carries over
/// between calls and the system itself is never mutated while evaluating.
#[derive(Clone, Debug)]
pub struct Evaluation {
    degrees: SecondaryMap<InputKey, Fuzzification>,
    distributions: SecondaryMap<OutputKey, OutputDistribution>,
}

impl Evaluation {
    /// Start a cycle with an empty distribution for every output variable.
    pub fn new(outputs: &Variables<OutputKey, OutputVariable>) -> Result<Self> {
        let mut distributions = SecondaryMap::with_capacity(outputs.len());

        for (key, var) in outputs.iter() {
            distributions.insert(key, var.output_distribution()?);
        }

        Ok(Self {
            degrees: SecondaryMap::new(),
            distributions,
        })
    }

    /// Fuzzify `value` into `var` and remember the degrees for the rules.
    pub fn fuzzify(&mut self, key: InputKey, var: &InputVariable, value: f64) -> Result<&Fuzzification> {
        let fuzzification = var.fuzzify(value)?;

        self.degrees.insert(key, fuzzification);

        Ok(&self.degrees[key])
    }

    pub(crate) fn record(&mut self, key: InputKey, fuzzification: Fuzzification) {
        self.degrees.insert(key, fuzzification);
    }

    /// Degree of the term at `term` (its registration index) of an input
    /// variable. Variables that were not fuzzified in this cycle have degree 0
    /// in every term.
    pub fn degree(&self, key: InputKey, term: usize) -> f64 {
        self.degrees
            .get(key)
            .and_then(|f| f.degree_at(term))
            .unwrap_or(0.)
    }

    pub fn fuzzification(&self, key: InputKey) -> Option<&Fuzzification> {
        self.degrees.get(key)
    }

    pub fn distribution(&self, key: OutputKey) -> Option<&OutputDistribution> {
        self.distributions.get(key)
    }

    pub(crate) fn distribution_mut(&mut self, key: OutputKey) -> Option<&mut OutputDistribution> {
        self.distributions.get_mut(key)
    }

    pub(crate) fn into_distributions(self) -> SecondaryMap<OutputKey, OutputDistribution> {
        self.distributions
    }
}
