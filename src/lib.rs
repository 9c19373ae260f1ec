//! Type-1 Mamdani fuzzy inference.
//!
//! Crisp inputs are fuzzified against the terms of their [`InputVariable`],
//! every [`FuzzyRule`] fires with the minimum degree of its antecedents, the
//! clipped consequents are max-aggregated per [`OutputVariable`] and the
//! result is defuzzified by centroid.
//!
//! ```
//! use fuzzy_mamdani::{FuzzySystem, InputVariable, Inputs, OutputVariable};
//!
//! let mut temp = InputVariable::new("temp", 0., 10., 11)?;
//! temp.add_triangular("low", 0., 0., 5.)?;
//! temp.add_triangular("high", 5., 10., 10.)?;
//!
//! let mut fan = OutputVariable::new("fan", 0., 10., 11)?;
//! fan.add_triangular("slow", 0., 0., 5.)?;
//! fan.add_triangular("fast", 5., 10., 10.)?;
//!
//! let mut system = FuzzySystem::new();
//! system.add_input_variable(temp)?;
//! system.add_output_variable(fan)?;
//! system.add_rule([("temp", "low")], [("fan", "slow")])?;
//! system.add_rule([("temp", "high")], [("fan", "fast")])?;
//!
//! let outputs = system.evaluate_output(&[("temp", 8.)].into_iter().collect::<Inputs>())?;
//! assert!(outputs.get("fan").unwrap() > 5.);
//! # Ok::<(), fuzzy_mamdani::FuzzyError>(())
//! ```

mod clause;
mod error;
mod evaluation;
mod inputs;
mod linspace;
mod math;
mod outputs;
mod rules;
mod set;
mod system;
mod universe;
mod variable;

pub use clause::{Antecedent, Consequent, FuzzyClause};
pub use error::{FuzzyError, Kind, Result};
pub use evaluation::Evaluation;
pub use inputs::{Fuzzification, InputVariable, Inputs};
pub use linspace::Linspace;
pub use outputs::{OutputDistribution, OutputVariable, Outputs};
pub use rules::{FuzzyRule, Rules};
pub use set::FuzzySet;
pub use system::{EvaluationInfo, FuzzySystem};
pub use universe::Universe;
pub use variable::{FuzzyVariable, InputKey, OutputKey, Variables};
