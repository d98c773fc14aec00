//! Name-keyed operator registry.
//!
//! Plays the same role for [`Operator`]s that the teacher's `TypeEnv`
//! plays for `Scheme`s (`snow-typeck::env`): a flat lookup table an
//! embedding caller populates once at startup. Unlike `TypeEnv`, operators
//! are not lexically scoped, so there is no scope stack here -- just a
//! single `FxHashMap`.

use rustc_hash::FxHashMap;

use crate::operator::Operator;

/// A name-keyed table of declared operators.
#[derive(Default)]
pub struct Registry {
    operators: FxHashMap<String, Operator>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Declare `operator` under its own name, overwriting any previous
    /// declaration of the same name.
    pub fn declare(&mut self, operator: Operator) -> Operator {
        self.operators.insert(operator.name().to_string(), operator.clone());
        operator
    }

    pub fn get(&self, name: &str) -> Option<&Operator> {
        self.operators.get(name)
    }
}
