use std::fmt;
use std::ops::Deref;

use indexmap::IndexMap;
use slotmap::{new_key_type, Key, SlotMap};
use tracing::debug;

use crate::error::{FuzzyError, Kind, Result};
use crate::set::FuzzySet;
use crate::universe::Universe;

new_key_type! {
    /// Key of an input variable registered in a system
    pub struct InputKey;
    /// Key of an output variable registered in a system
    pub struct OutputKey;
}

/// Name-indexed arena of variables sharing one role.
#[derive(Clone, Debug)]
pub struct Variables<K: Key, V> {
    kind: Kind,
    arena: SlotMap<K, V>,
    names: IndexMap<String, K>,
}

impl<K: Key, V: Deref<Target = FuzzyVariable>> Variables<K, V> {
    pub(crate) fn new(kind: Kind) -> Self {
        Self {
            kind,
            arena: SlotMap::with_key(),
            names: IndexMap::new(),
        }
    }

    pub(crate) fn add(&mut self, var: V) -> Result<K> {
        if self.names.contains_key(var.name()) {
            return Err(FuzzyError::duplicate(self.kind, var.name()));
        }

        let name = var.name().to_owned();

        debug!(kind = %self.kind, variable = %name, terms = var.sets().len(), "registered variable");

        let key = self.arena.insert(var);

        self.names.insert(name, key);

        Ok(key)
    }

    pub fn get(&self, name: &str) -> Result<&V> {
        let key = self.key(name)?;

        self.arena.get(key).ok_or_else(|| FuzzyError::not_found(self.kind, name))
    }

    pub fn key(&self, name: &str) -> Result<K> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| FuzzyError::not_found(self.kind, name))
    }

    pub fn by_key(&self, key: K) -> Option<&V> {
        self.arena.get(key)
    }

    /// Variables in registration order
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> {
        self.names
            .values()
            .filter_map(|key| self.arena.get(*key).map(|var| (*key, var)))
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }
}

/// A linguistic variable: a named universe and the terms (fuzzy sets)
/// defined over it.
#[derive(Clone, Debug)]
pub struct FuzzyVariable {
    name: String,
    universe: Universe,
    sets: IndexMap<String, FuzzySet>,
}

impl FuzzyVariable {
    pub fn new(name: impl Into<String>, min_val: f64, max_val: f64, res: usize) -> Result<Self> {
        let name = name.into();

        if name.is_empty() {
            return Err(FuzzyError::construction("variable name must not be empty"));
        }

        Ok(Self {
            name,
            universe: Universe::new(min_val, max_val, res)?,
            sets: IndexMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn universe(&self) -> Universe {
        self.universe
    }

    /// Terms in registration order
    pub fn sets(&self) -> &IndexMap<String, FuzzySet> {
        &self.sets
    }

    pub fn add_set(&mut self, name: impl Into<String>, set: FuzzySet) -> Result<&FuzzySet> {
        let name = name.into();

        if name.is_empty() {
            return Err(FuzzyError::construction(format!(
                "term of variable `{}` must have a name",
                self.name
            )));
        }
        if self.sets.contains_key(&name) {
            return Err(FuzzyError::duplicate(Kind::Term, name));
        }
        if set.universe() != self.universe {
            return Err(FuzzyError::DomainMismatch {
                left: self.universe,
                right: set.universe(),
            });
        }

        let entry = self.sets.entry(name).or_insert(set);

        Ok(&*entry)
    }

    pub fn get_set(&self, name: &str) -> Result<&FuzzySet> {
        self.sets.get(name).ok_or_else(|| FuzzyError::not_found(Kind::Term, name))
    }

    pub(crate) fn term_index(&self, name: &str) -> Result<usize> {
        self.sets
            .get_index_of(name)
            .ok_or_else(|| FuzzyError::not_found(Kind::Term, name))
    }

    pub fn add_triangular(&mut self, name: &str, low: f64, mid: f64, high: f64) -> Result<&FuzzySet> {
        let set = FuzzySet::triangular_on(name, self.universe, low, mid, high)?;

        self.add_set(name, set)
    }

    pub fn add_trapezoidal(&mut self, name: &str, a: f64, b: f64, c: f64, d: f64) -> Result<&FuzzySet> {
        let set = FuzzySet::trapezoidal_on(name, self.universe, a, b, c, d)?;

        self.add_set(name, set)
    }

    /// Add a term from piecewise-linear `(x, membership)` points.
    pub fn add_points(&mut self, name: &str, points: &[(f64, f64)]) -> Result<&FuzzySet> {
        let set = FuzzySet::from_points(name, self.universe, points)?;

        self.add_set(name, set)
    }
}

impl fmt::Display for FuzzyVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.sets.keys().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(term)?;
        }

        Ok(())
    }
}
