//! Schemas: generators of fresh top-level terms, prenex-quantified over a
//! fixed set of named variables.
//!
//! Unlike the reference implementation's `Schema`, which wraps a Python
//! callable and re-binds its parameters dynamically on every call, a Rust
//! `Schema` closure already captures concrete [`PlainTerm`]s by the time
//! its body runs -- each call to [`Schema::instance`] allocates exactly
//! one fresh cell per quantified variable and passes the resulting slice
//! to the closure, so "thread a single instantiation per evaluation"
//! (`spec.md` §4.8) falls out of ordinary closure semantics rather than
//! needing a dynamic combinator (`DESIGN.md` records this simplification).

use std::fmt;
use std::rc::Rc;

use crate::term::{PlainTerm, Term, VariableCell};

const DEFAULT_NAMES: [&str; 6] = ["x", "y", "z", "u", "v", "w"];

fn default_names(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            DEFAULT_NAMES
                .get(i)
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("{}{}", DEFAULT_NAMES[0], i + 1))
        })
        .collect()
}

/// A function from a fixed number of fresh variable cells to a [`Term`].
#[derive(Clone)]
pub struct Schema {
    names: Vec<String>,
    body: Rc<dyn Fn(&[PlainTerm]) -> Term>,
}

impl Schema {
    /// Build a schema with `arity` quantified variables, named `x, y, z,
    /// u, v, w` and then `x7, x8, ...` beyond six.
    pub fn new(arity: usize, body: impl Fn(&[PlainTerm]) -> Term + 'static) -> Schema {
        Schema { names: default_names(arity), body: Rc::new(body) }
    }

    /// Build a schema with explicitly named quantified variables.
    pub fn with_names(names: Vec<String>, body: impl Fn(&[PlainTerm]) -> Term + 'static) -> Schema {
        Schema { names, body: Rc::new(body) }
    }

    pub fn arity(&self) -> usize {
        self.names.len()
    }

    /// Instantiate this schema, filling any unsupplied parameters with
    /// fresh variable cells. `args[i]` binds the `i`-th quantified
    /// variable when `Some`; trailing parameters may be omitted entirely.
    pub fn instance(&self, args: &[Option<PlainTerm>]) -> Term {
        assert!(
            args.len() <= self.names.len(),
            "schema takes {} parameter(s), got {}",
            self.names.len(),
            args.len()
        );
        let vars: Vec<PlainTerm> = self
            .names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                args.get(i)
                    .and_then(|a| a.clone())
                    .unwrap_or_else(|| PlainTerm::Variable(VariableCell::fresh(Some(name.clone()))))
            })
            .collect();
        (self.body)(&vars)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.instance(&vec![None; self.names.len()]))
    }
}
