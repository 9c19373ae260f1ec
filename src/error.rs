use std::fmt;

use crate::universe::Universe;

/// What kind of registry entry an error refers to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Kind {
    InputVariable,
    OutputVariable,
    Term,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputVariable => f.write_str("input variable"),
            Self::OutputVariable => f.write_str("output variable"),
            Self::Term => f.write_str("term"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum FuzzyError {
    #[error("invalid construction: {0}")]
    Construction(String),
    #[error("{kind} `{name}` is already registered")]
    DuplicateName { kind: Kind, name: String },
    #[error("unknown {kind} `{name}`")]
    NotFound { kind: Kind, name: String },
    #[error("domain mismatch: {left} vs {right}")]
    DomainMismatch { left: Universe, right: Universe },
    #[error("input `{name}` is not a finite value: {value}")]
    InvalidValue { name: String, value: f64 },
}

impl FuzzyError {
    pub(crate) fn construction(msg: impl Into<String>) -> Self {
        Self::Construction(msg.into())
    }

    pub(crate) fn duplicate(kind: Kind, name: impl Into<String>) -> Self {
        Self::DuplicateName {
            kind,
            name: name.into(),
        }
    }

    pub(crate) fn not_found(kind: Kind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }
}

pub type Result<T, E = FuzzyError> = std::result::Result<T, E>;
