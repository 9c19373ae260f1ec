use std::fmt;
use std::ops::{Deref, DerefMut};

use indexmap::IndexMap;

use crate::error::Result;
use crate::set::FuzzySet;
use crate::variable::FuzzyVariable;

/// Crisp results keyed by output variable name, in registration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outputs(IndexMap<String, f64>);

impl Outputs {
    pub(crate) fn new(values: IndexMap<String, f64>) -> Self {
        Self(values)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
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

/// A variable on the consequent side of rules. Rule contributions are
/// accumulated into an [`OutputDistribution`] and defuzzified from there.
#[derive(Clone, Debug)]
pub struct OutputVariable(FuzzyVariable);

impl OutputVariable {
    pub fn new(name: impl Into<String>, min_val: f64, max_val: f64, res: usize) -> Result<Self> {
        FuzzyVariable::new(name, min_val, max_val, res).map(Self)
    }

    /// An empty distribution spanning this variable's universe
    pub fn output_distribution(&self) -> Result<OutputDistribution> {
        let set = FuzzySet::with_universe(self.name(), self.universe())?;

        Ok(OutputDistribution(set))
    }
}

impl From<FuzzyVariable> for OutputVariable {
    fn from(var: FuzzyVariable) -> Self {
        Self(var)
    }
}

impl Deref for OutputVariable {
    type Target = FuzzyVariable;

    fn deref(&self) -> &FuzzyVariable {
        &self.0
    }
}

impl DerefMut for OutputVariable {
    fn deref_mut(&mut self) -> &mut FuzzyVariable {
        &mut self.0
    }
}

impl fmt::Display for OutputVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The running max-aggregation of every rule consequent that targets one
/// output variable.
#[derive(Clone, Debug)]
pub struct OutputDistribution(FuzzySet);

impl OutputDistribution {
    pub fn clear_output_distribution(&mut self) {
        self.0.clear_set();
    }

    pub fn add_rule_contribution(&mut self, consequence: &FuzzySet) -> Result<()> {
        // keep the variable's name rather than the nested union name
        let name = self.0.name().to_owned();

        self.0 = self.0.union(consequence)?.renamed(name);

        Ok(())
    }

    pub fn get_crisp_output(&self) -> f64 {
        self.0.defuzzify_cog()
    }

    /// The crisp output together with the aggregated set it came from
    pub fn get_crisp_output_info(&self) -> (f64, &FuzzySet) {
        (self.0.defuzzify_cog(), &self.0)
    }

    pub fn set(&self) -> &FuzzySet {
        &self.0
    }

    pub(crate) fn into_set(self) -> FuzzySet {
        self.0
    }
}
