use std::fmt;

use indexmap::IndexMap;
use tracing::debug;

use crate::clause::{Antecedent, Consequent};
use crate::error::{Kind, Result};
use crate::evaluation::Evaluation;
use crate::inputs::{InputVariable, Inputs};
use crate::outputs::{OutputVariable, Outputs};
use crate::rules::{FuzzyRule, Rules};
use crate::set::FuzzySet;
use crate::variable::{InputKey, OutputKey, Variables};

/// Diagnostic trace of one inference cycle.
#[derive(Clone, Debug)]
pub struct EvaluationInfo {
    /// One fuzzification report per input, newline separated
    pub fuzzification: String,
    /// One `"<strength> : <rule>"` line per rule, in registration order
    pub rules: String,
    /// The aggregated distribution each output was defuzzified from
    pub distributions: IndexMap<String, FuzzySet>,
}

/// A type-1 Mamdani fuzzy inference system.
///
/// Rule antecedents are combined with minimum, consequents are clipped at the
/// rule strength, aggregated with maximum and defuzzified by centroid.
/// Evaluation only reads the system, so one instance can serve concurrent
/// callers.
#[derive(Clone, Debug)]
pub struct FuzzySystem {
    inputs: Variables<InputKey, InputVariable>,
    outputs: Variables<OutputKey, OutputVariable>,
    rules: Rules,
}

impl Default for FuzzySystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FuzzySystem {
    pub fn new() -> Self {
        Self {
            inputs: Variables::new(Kind::InputVariable),
            outputs: Variables::new(Kind::OutputVariable),
            rules: Rules::new(),
        }
    }

    pub fn add_input_variable(&mut self, var: InputVariable) -> Result<InputKey> {
        self.inputs.add(var)
    }

    pub fn add_output_variable(&mut self, var: OutputVariable) -> Result<OutputKey> {
        self.outputs.add(var)
    }

    pub fn get_input_variable(&self, name: &str) -> Result<&InputVariable> {
        self.inputs.get(name)
    }

    pub fn get_output_variable(&self, name: &str) -> Result<&OutputVariable> {
        self.outputs.get(name)
    }

    pub fn input_variables(&self) -> &Variables<InputKey, InputVariable> {
        &self.inputs
    }

    pub fn output_variables(&self) -> &Variables<OutputKey, OutputVariable> {
        &self.outputs
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Add `IF <antecedents> THEN <consequents>` from `(variable, term)` name
    /// pairs. Either every clause resolves and the rule is added, or nothing
    /// changes.
    pub fn add_rule<A, B, C, D>(
        &mut self,
        antecedents: impl IntoIterator<Item = (A, B)>,
        consequents: impl IntoIterator<Item = (C, D)>,
    ) -> Result<&FuzzyRule>
    where
        A: AsRef<str>,
        B: AsRef<str>,
        C: AsRef<str>,
        D: AsRef<str>,
    {
        let mut rule = FuzzyRule::new();

        for (var_name, term) in antecedents {
            let key = self.inputs.key(var_name.as_ref())?;
            let var = self.inputs.get(var_name.as_ref())?;

            rule.add_antecedent_clause(Antecedent::new(key, var, term.as_ref())?);
        }

        for (var_name, term) in consequents {
            let key = self.outputs.key(var_name.as_ref())?;
            let var = self.outputs.get(var_name.as_ref())?;

            rule.add_consequent_clause(Consequent::new(key, var, term.as_ref())?);
        }

        debug!(rule = %rule, "registered rule");

        Ok(self.rules.add(rule))
    }

    /// Run one inference cycle and return the crisp value of every output
    /// variable. Input variables missing from `inputs` contribute degree 0 to
    /// every rule that mentions them.
    pub fn evaluate_output(&self, inputs: &Inputs) -> Result<Outputs> {
        let mut eval = Evaluation::new(&self.outputs)?;

        for (name, value) in inputs.iter() {
            let key = self.inputs.key(name)?;
            let var = self.inputs.get(name)?;

            eval.fuzzify(key, var, value)?;
        }

        for rule in self.rules.iter() {
            rule.evaluate(&self.outputs, &mut eval)?;
        }

        Ok(self.defuzzify(&eval))
    }

    /// Same as [`FuzzySystem::evaluate_output`], also returning the
    /// fuzzification and rule firing reports and the aggregated output sets.
    pub fn evaluate_output_info(&self, inputs: &Inputs) -> Result<(Outputs, EvaluationInfo)> {
        let mut eval = Evaluation::new(&self.outputs)?;
        let mut fuzzification = Vec::with_capacity(inputs.len());
        let mut rules = Vec::with_capacity(self.rules.len());

        for (name, value) in inputs.iter() {
            let key = self.inputs.key(name)?;
            let (degrees, report) = self.inputs.get(name)?.fuzzify_info(value)?;

            eval.record(key, degrees);
            fuzzification.push(report);
        }

        for rule in self.rules.iter() {
            rules.push(rule.evaluate_info(&self.outputs, &mut eval)?);
        }

        let outputs = self.defuzzify(&eval);
        let mut distributions = eval.into_distributions();
        let distributions = self
            .outputs
            .iter()
            .filter_map(|(key, var)| {
                distributions
                    .remove(key)
                    .map(|dist| (var.name().to_owned(), dist.into_set()))
            })
            .collect();

        let info = EvaluationInfo {
            fuzzification: fuzzification.join("\n"),
            rules: rules.join("\n"),
            distributions,
        };

        Ok((outputs, info))
    }

    fn defuzzify(&self, eval: &Evaluation) -> Outputs {
        let values = self
            .outputs
            .iter()
            .filter_map(|(key, var)| {
                eval.distribution(key)
                    .map(|dist| (var.name().to_owned(), dist.get_crisp_output()))
            })
            .collect();

        Outputs::new(values)
    }
}

impl fmt::Display for FuzzySystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Input: ")?;
        for (_, var) in self.inputs.iter() {
            writeln!(f, "{}: ({var})", var.name())?;
        }
        writeln!(f, "Output: ")?;
        for (_, var) in self.outputs.iter() {
            writeln!(f, "{}: ({var})", var.name())?;
        }
        writeln!(f, "Rules: ")?;
        for rule in self.rules.iter() {
            writeln!(f, "{rule}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::FuzzyError;

    const NO_CLAUSES: [(&str, &str); 0] = [];

    fn fan_controller() -> FuzzySystem {
        let mut system = FuzzySystem::new();
        let mut temp = InputVariable::new("temp", 0., 10., 11).unwrap();
        let mut fan = OutputVariable::new("fan", 0., 10., 11).unwrap();

        temp.add_triangular("low", 0., 0., 5.).unwrap();
        temp.add_triangular("high", 5., 10., 10.).unwrap();
        fan.add_triangular("slow", 0., 0., 5.).unwrap();
        fan.add_triangular("fast", 5., 10., 10.).unwrap();

        system.add_input_variable(temp).unwrap();
        system.add_output_variable(fan).unwrap();
        system.add_rule([("temp", "low")], [("fan", "slow")]).unwrap();
        system.add_rule([("temp", "high")], [("fan", "fast")]).unwrap();
        system
    }

    fn inputs(temp: f64) -> Inputs {
        [("temp", temp)].into_iter().collect()
    }

    #[test]
    fn test_fan_controller() {
        let system = fan_controller();
        let outputs = system.evaluate_output(&inputs(2.5)).unwrap();

        // 2.5 snaps to grid point 2 where `low` is 0.6; the clipped `slow`
        // triangle 0.6, 0.6, 0.6, 0.4, 0.2 has its centroid at 3.8 / 2.4
        assert_relative_eq!(outputs.get("fan").unwrap(), 3.8 / 2.4, epsilon = 1e-9);
        assert_eq!(outputs.len(), 1);

        let outputs = system.evaluate_output(&inputs(7.)).unwrap();

        assert_relative_eq!(outputs.get("fan").unwrap(), 8.222222222222223, epsilon = 1e-9);
    }

    #[test]
    fn no_rule_fires_yields_midpoint() {
        let system = fan_controller();
        let outputs = system.evaluate_output(&inputs(5.)).unwrap();

        assert_eq!(outputs.get("fan"), Some(5.));

        let outputs = system.evaluate_output(&Inputs::new()).unwrap();

        assert_eq!(outputs.get("fan"), Some(5.));
    }

    #[test]
    fn evaluations_do_not_leak_state() {
        let system = fan_controller();
        let first = system.evaluate_output(&inputs(2.5)).unwrap();

        system.evaluate_output(&inputs(9.)).unwrap();

        assert_eq!(system.evaluate_output(&inputs(2.5)).unwrap(), first);
    }

    #[test]
    fn rule_order_does_not_change_outputs() {
        let mut forward = FuzzySystem::new();
        let mut reversed = FuzzySystem::new();
        let rules = [
            ([("temp", "low"), ("humidity", "low")], ("fan", "slow")),
            ([("temp", "high"), ("humidity", "low")], ("fan", "medium")),
            ([("temp", "low"), ("humidity", "high")], ("fan", "medium")),
            ([("temp", "high"), ("humidity", "high")], ("fan", "fast")),
        ];

        for system in [&mut forward, &mut reversed] {
            for name in ["temp", "humidity"] {
                let mut var = InputVariable::new(name, 0., 10., 21).unwrap();

                var.add_trapezoidal("low", 0., 0., 3., 7.).unwrap();
                var.add_trapezoidal("high", 3., 7., 10., 10.).unwrap();
                system.add_input_variable(var).unwrap();
            }

            let mut fan = OutputVariable::new("fan", 0., 100., 101).unwrap();

            fan.add_triangular("slow", 0., 0., 50.).unwrap();
            fan.add_triangular("medium", 20., 50., 80.).unwrap();
            fan.add_triangular("fast", 50., 100., 100.).unwrap();
            system.add_output_variable(fan).unwrap();
        }

        for (ante, cons) in rules.iter() {
            forward.add_rule(*ante, [*cons]).unwrap();
        }
        for (ante, cons) in rules.iter().rev() {
            reversed.add_rule(*ante, [*cons]).unwrap();
        }

        for (t, h) in [(1., 2.), (4.5, 6.), (8., 3.5), (6., 9.5)] {
            let inputs: Inputs = [("temp", t), ("humidity", h)].into_iter().collect();

            assert_eq!(
                forward.evaluate_output(&inputs).unwrap(),
                reversed.evaluate_output(&inputs).unwrap()
            );
        }
    }

    #[test]
    fn rule_without_antecedents_always_fires() {
        let mut system = fan_controller();

        system.add_rule(NO_CLAUSES, [("fan", "fast")]).unwrap();

        let (outputs, info) = system.evaluate_output_info(&inputs(0.)).unwrap();

        assert!(info.rules.ends_with("1 : IF  THEN fan is fast"));
        assert_eq!(info.distributions["fan"].lookup(0.), 1.);
        assert_eq!(info.distributions["fan"].lookup(10.), 1.);
        assert_relative_eq!(outputs.get("fan").unwrap(), 5., epsilon = 1e-9);
    }

    #[test]
    fn evaluate_output_info_traces_the_cycle() {
        let system = fan_controller();
        let (outputs, info) = system.evaluate_output_info(&inputs(2.5)).unwrap();

        assert_eq!(outputs, system.evaluate_output(&inputs(2.5)).unwrap());
        assert_eq!(info.fuzzification, "temp\nlow 0.6\nhigh 0");
        assert_eq!(info.rules, "0.6 : IF temp is low THEN fan is slow\n0 : IF temp is high THEN fan is fast");
        assert_eq!(
            info.distributions["fan"].membership(),
            &[0.6, 0.6, 0.6, 0.4, 0.2, 0., 0., 0., 0., 0., 0.]
        );
        assert_eq!(info.distributions["fan"].name(), "fan");
    }

    #[test]
    fn registration_errors() {
        let mut system = fan_controller();

        assert_eq!(
            system
                .add_input_variable(InputVariable::new("temp", 0., 1., 2).unwrap())
                .unwrap_err(),
            FuzzyError::duplicate(Kind::InputVariable, "temp")
        );
        assert_eq!(
            system
                .add_output_variable(OutputVariable::new("fan", 0., 1., 2).unwrap())
                .unwrap_err(),
            FuzzyError::duplicate(Kind::OutputVariable, "fan")
        );
        assert_eq!(
            system.get_input_variable("pressure").unwrap_err(),
            FuzzyError::not_found(Kind::InputVariable, "pressure")
        );
        assert_eq!(
            system.get_output_variable("pump").unwrap_err(),
            FuzzyError::not_found(Kind::OutputVariable, "pump")
        );
        assert_eq!(system.get_input_variable("temp").unwrap().sets().len(), 2);
    }

    #[test]
    fn failed_rule_leaves_no_trace() {
        let mut system = fan_controller();

        assert_eq!(
            system.add_rule([("temp", "low")], [("fan", "turbo")]).unwrap_err(),
            FuzzyError::not_found(Kind::Term, "turbo")
        );
        assert_eq!(
            system.add_rule([("temp", "low"), ("wind", "strong")], [("fan", "fast")]).unwrap_err(),
            FuzzyError::not_found(Kind::InputVariable, "wind")
        );
        // output names are not valid antecedents
        assert_eq!(
            system.add_rule([("fan", "slow")], [("fan", "fast")]).unwrap_err(),
            FuzzyError::not_found(Kind::InputVariable, "fan")
        );
        assert_eq!(system.rules().len(), 2);
    }

    #[test]
    fn unknown_or_invalid_inputs_are_rejected() {
        let system = fan_controller();

        assert_eq!(
            system.evaluate_output(&[("pressure", 1.)].into_iter().collect()).unwrap_err(),
            FuzzyError::not_found(Kind::InputVariable, "pressure")
        );
        assert!(matches!(
            system.evaluate_output_info(&inputs(f64::INFINITY)),
            Err(FuzzyError::InvalidValue { .. })
        ));
    }

    #[test]
    fn display_lists_variables_and_rules() {
        let system = fan_controller();

        assert_eq!(
            system.to_string(),
            "Input: \ntemp: (low, high)\nOutput: \nfan: (slow, fast)\nRules: \n\
             IF temp is low THEN fan is slow\nIF temp is high THEN fan is fast\n"
        );
    }

    #[test]
    fn rule_clauses_point_at_their_variables() {
        let mut system = fan_controller();
        let mut heater = OutputVariable::new("heater", 0., 10., 11).unwrap();

        heater.add_triangular("on", 5., 10., 10.).unwrap();
        heater.add_triangular("off", 0., 0., 5.).unwrap();
        system.add_output_variable(heater).unwrap();

        let rule = system
            .add_rule([("temp", "low")], [("fan", "slow"), ("heater", "on")])
            .unwrap()
            .clone();
        let [fan, heater] = rule.consequents() else {
            panic!("expected two consequents");
        };

        assert_eq!(rule.antecedents()[0].variable(), system.input_variables().key("temp").unwrap());
        assert_eq!(fan.variable(), system.output_variables().key("fan").unwrap());
        assert_eq!(heater.variable(), system.output_variables().key("heater").unwrap());
        assert_eq!(heater.term_name(), "on");

        // temp = 0: `low` fires fully, so heater follows its `on` term
        let outputs = system.evaluate_output(&inputs(0.)).unwrap();

        assert_relative_eq!(outputs.get("heater").unwrap(), 26. / 3., epsilon = 1e-9);
    }

    #[test]
    fn system_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}

        assert_send_sync::<FuzzySystem>();

        let system = fan_controller();
        let expected = system.evaluate_output(&inputs(7.)).unwrap();

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| system.evaluate_output(&inputs(7.)).unwrap()))
                .collect();

            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn test_bank_loan() {
        let mut system = FuzzySystem::new();
        let mut score = InputVariable::new("score", 150., 200., 51).unwrap();
        let mut ratio = InputVariable::new("ratio", 0.1, 1., 91).unwrap();
        let mut credit = InputVariable::new("credit", 0., 10., 101).unwrap();
        let mut decision = OutputVariable::new("decision", 0., 10., 101).unwrap();

        score.add_points("high", &[(175., 0.), (180., 0.2), (185., 0.7), (190., 1.)]).unwrap();
        score
            .add_points("low", &[(155., 1.), (160., 0.8), (165., 0.5), (170., 0.2), (175., 0.)])
            .unwrap();
        ratio.add_points("good", &[(0.3, 1.), (0.4, 0.7), (0.41, 0.3), (0.42, 0.)]).unwrap();
        ratio.add_points("bad", &[(0.44, 0.), (0.45, 0.3), (0.5, 0.7), (0.7, 1.)]).unwrap();
        credit.add_points("good", &[(2., 1.), (3., 0.7), (4., 0.3), (5., 0.)]).unwrap();
        credit.add_points("bad", &[(5., 0.), (6., 0.3), (7., 0.7), (8., 1.)]).unwrap();
        decision.add_points("approve", &[(5., 0.), (6., 0.3), (7., 0.7), (8., 1.)]).unwrap();
        decision.add_points("reject", &[(2., 1.), (3., 0.7), (4., 0.3), (5., 0.)]).unwrap();

        system.add_input_variable(score).unwrap();
        system.add_input_variable(ratio).unwrap();
        system.add_input_variable(credit).unwrap();
        system.add_output_variable(decision).unwrap();

        system
            .add_rule(
                [("score", "high"), ("ratio", "good"), ("credit", "good")],
                [("decision", "approve")],
            )
            .unwrap();
        // (score low AND ratio bad) OR credit bad, split into two rules
        system
            .add_rule([("score", "low"), ("ratio", "bad")], [("decision", "reject")])
            .unwrap();
        system.add_rule([("credit", "bad")], [("decision", "reject")]).unwrap();

        let inputs: Inputs = [("score", 190.), ("ratio", 0.39), ("credit", 1.5)].into_iter().collect();
        let (outputs, info) = system.evaluate_output_info(&inputs).unwrap();

        assert_relative_eq!(outputs.get("decision").unwrap(), 8.036173913043475, epsilon = 1e-9);
        assert!(info.rules.starts_with("0.73 : IF score is high and ratio is good and credit is good"));

        let inputs: Inputs = [("score", 160.), ("ratio", 0.6), ("credit", 6.5)].into_iter().collect();
        let outputs = system.evaluate_output(&inputs).unwrap();

        assert_relative_eq!(outputs.get("decision").unwrap(), 1.925252196550602, epsilon = 1e-9);
    }
}
