use std::fmt;

use crate::error::{FuzzyError, Result};
use crate::linspace::Linspace;

/// The discretized domain a fuzzy set or variable lives on: `res` evenly
/// spaced samples from `min` to `max` inclusive.
///
/// Sets are only combinable when their universes are equal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Universe {
    min: f64,
    max: f64,
    res: usize,
}

impl Universe {
    pub fn new(min: f64, max: f64, res: usize) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(FuzzyError::construction(format!(
                "universe bounds must be finite, got [{min}, {max}]"
            )));
        }
        if min > max {
            return Err(FuzzyError::construction(format!(
                "universe minimum {min} exceeds maximum {max}"
            )));
        }
        if res == 0 {
            return Err(FuzzyError::construction("universe resolution must be at least 1"));
        }
        if res > 1 && min == max {
            return Err(FuzzyError::construction(format!(
                "universe [{min}, {max}] is a single point and cannot hold {res} samples"
            )));
        }

        Ok(Self { min, max, res })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn res(&self) -> usize {
        self.res
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.
    }

    pub fn grid(&self) -> Linspace<f64> {
        Linspace::new(self.min, self.max, self.res)
    }
}

impl fmt::Display for Universe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]/{}", self.min, self.max, self.res)
    }
}
