use std::fmt;

use slotmap::Key;

use crate::error::{FuzzyError, Kind, Result};
use crate::evaluation::Evaluation;
use crate::outputs::OutputVariable;
use crate::variable::{FuzzyVariable, InputKey, OutputKey, Variables};

/// The proposition "variable is term".
///
/// The key type ties a clause to the role of its variable: antecedents read
/// input variables, consequents write output variables.
#[derive(Clone, Debug, PartialEq)]
pub struct FuzzyClause<K> {
    variable: K,
    variable_name: String,
    term: usize,
    term_name: String,
}

/// A clause in the IF part of a rule
pub type Antecedent = FuzzyClause<InputKey>;
/// A clause in the THEN part of a rule
pub type Consequent = FuzzyClause<OutputKey>;

impl<K: Key> FuzzyClause<K> {
    pub(crate) fn new(key: K, var: &FuzzyVariable, term: &str) -> Result<Self> {
        if var.name().is_empty() || term.is_empty() {
            return Err(FuzzyError::construction(format!(
                "clause `{} is {term}` needs both a variable and a term name",
                var.name()
            )));
        }

        Ok(Self {
            variable: key,
            variable_name: var.name().to_owned(),
            term: var.term_index(term)?,
            term_name: term.to_owned(),
        })
    }

    pub fn variable(&self) -> K {
        self.variable
    }

    pub fn variable_name(&self) -> &str {
        &self.variable_name
    }

    pub fn term_name(&self) -> &str {
        &self.term_name
    }
}

impl FuzzyClause<InputKey> {
    /// The degree this cycle's fuzzification gave the term.
    pub fn evaluate_antecedent(&self, eval: &Evaluation) -> f64 {
        eval.degree(self.variable, self.term)
    }
}

impl FuzzyClause<OutputKey> {
    /// Clip the term at `strength` and aggregate it into the variable's
    /// output distribution.
    pub fn evaluate_consequent(
        &self,
        strength: f64,
        outputs: &Variables<OutputKey, OutputVariable>,
        eval: &mut Evaluation,
    ) -> Result<()> {
        let (_, set) = outputs
            .by_key(self.variable)
            .ok_or_else(|| FuzzyError::not_found(Kind::OutputVariable, &self.variable_name))?
            .sets()
            .get_index(self.term)
            .ok_or_else(|| FuzzyError::not_found(Kind::Term, &self.term_name))?;
        let distribution = eval
            .distribution_mut(self.variable)
            .ok_or_else(|| FuzzyError::not_found(Kind::OutputVariable, &self.variable_name))?;

        distribution.add_rule_contribution(&set.min_scalar(strength))
    }
}

impl<K> fmt::Display for FuzzyClause<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is {}", self.variable_name, self.term_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::InputVariable;

    #[test]
    fn resolves_term_by_name() {
        let mut inputs = Variables::new(Kind::InputVariable);
        let mut temp = InputVariable::new("temp", 0., 10., 11).unwrap();

        temp.add_triangular("low", 0., 0., 5.).unwrap();
        temp.add_triangular("high", 5., 10., 10.).unwrap();

        let key = inputs.add(temp).unwrap();
        let temp = inputs.by_key(key).unwrap();
        let clause = Antecedent::new(key, temp, "high").unwrap();

        assert_eq!(clause.to_string(), "temp is high");
        assert_eq!(clause.variable_name(), "temp");
        assert_eq!(clause.term_name(), "high");
        assert_eq!(
            Antecedent::new(key, temp, "warm").unwrap_err(),
            FuzzyError::not_found(Kind::Term, "warm")
        );
        assert!(matches!(
            Antecedent::new(key, temp, ""),
            Err(FuzzyError::Construction(_))
        ));
    }

    #[test]
    fn antecedent_reads_context_degree() {
        let mut inputs = Variables::new(Kind::InputVariable);
        let mut temp = InputVariable::new("temp", 0., 10., 11).unwrap();

        temp.add_triangular("high", 5., 10., 10.).unwrap();

        let key = inputs.add(temp).unwrap();
        let outputs = Variables::new(Kind::OutputVariable);
        let mut eval = Evaluation::new(&outputs).unwrap();
        let clause = Antecedent::new(key, inputs.get("temp").unwrap(), "high").unwrap();

        assert_eq!(clause.evaluate_antecedent(&eval), 0.);

        eval.fuzzify(key, inputs.get("temp").unwrap(), 9.).unwrap();

        assert_eq!(clause.evaluate_antecedent(&eval), 0.8);
    }

    #[test]
    fn consequent_clips_into_distribution() {
        let mut outputs = Variables::new(Kind::OutputVariable);
        let mut fan = OutputVariable::new("fan", 0., 10., 11).unwrap();

        fan.add_triangular("fast", 5., 10., 10.).unwrap();

        let key = outputs.add(fan).unwrap();
        let mut eval = Evaluation::new(&outputs).unwrap();
        let clause = Consequent::new(key, outputs.get("fan").unwrap(), "fast").unwrap();

        clause.evaluate_consequent(0.3, &outputs, &mut eval).unwrap();

        let dist = eval.distribution(key).unwrap().set();

        assert_eq!(dist.membership(), &[0., 0., 0., 0., 0., 0., 0.2, 0.3, 0.3, 0.3, 0.3]);
    }
}
