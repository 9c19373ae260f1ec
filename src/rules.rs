use std::fmt;

use tracing::trace;

use crate::clause::{Antecedent, Consequent, FuzzyClause};
use crate::error::Result;
use crate::evaluation::Evaluation;
use crate::outputs::OutputVariable;
use crate::variable::{OutputKey, Variables};

/// Rules in the order they were registered.
#[derive(Clone, Debug, Default)]
pub struct Rules(pub(crate) Vec<FuzzyRule>);

impl Rules {
    pub fn new() -> Self {
        Rules(Vec::new())
    }

    pub fn add(&mut self, rule: FuzzyRule) -> &FuzzyRule {
        self.0.push(rule);

        &self.0[self.0.len() - 1]
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &FuzzyRule> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// `IF a is x and b is y THEN c is z`. Antecedents are always combined with
/// AND (minimum).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FuzzyRule {
    antecedents: Vec<Antecedent>,
    consequents: Vec<Consequent>,
}

impl FuzzyRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_antecedent_clause(&mut self, clause: Antecedent) {
        self.antecedents.push(clause);
    }

    pub fn add_consequent_clause(&mut self, clause: Consequent) {
        self.consequents.push(clause);
    }

    pub fn antecedents(&self) -> &[Antecedent] {
        &self.antecedents
    }

    pub fn consequents(&self) -> &[Consequent] {
        &self.consequents
    }

    /// Minimum degree over the antecedents. A rule without antecedents is
    /// vacuously true and fires with strength 1.
    pub fn strength(&self, eval: &Evaluation) -> f64 {
        self.antecedents
            .iter()
            .fold(1., |strength, clause| f64::min(strength, clause.evaluate_antecedent(eval)))
    }

    /// Fire the rule: every consequent is clipped at the rule strength and
    /// aggregated into its output distribution. Returns the strength.
    pub fn evaluate(&self, outputs: &Variables<OutputKey, OutputVariable>, eval: &mut Evaluation) -> Result<f64> {
        let strength = self.strength(eval);

        for clause in &self.consequents {
            clause.evaluate_consequent(strength, outputs, eval)?;
        }

        trace!(rule = %self, strength, "fired rule");

        Ok(strength)
    }

    /// Same as [`FuzzyRule::evaluate`], rendered as `"<strength> : <rule>"`.
    pub fn evaluate_info(&self, outputs: &Variables<OutputKey, OutputVariable>, eval: &mut Evaluation) -> Result<String> {
        let strength = self.evaluate(outputs, eval)?;

        Ok(format!("{strength} : {self}"))
    }
}

impl fmt::Display for FuzzyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join<K>(f: &mut fmt::Formatter<'_>, clauses: &[FuzzyClause<K>]) -> fmt::Result {
            for (i, clause) in clauses.iter().enumerate() {
                if i > 0 {
                    f.write_str(" and ")?;
                }
                write!(f, "{clause}")?;
            }

            Ok(())
        }

        f.write_str("IF ")?;
        join(f, &self.antecedents)?;
        f.write_str(" THEN ")?;
        join(f, &self.consequents)
    }
}
