//! Parametric type inference with declared subtype lattices, variance and
//! deferred constraints.
//!
//! This crate is an embeddable, synchronous, single-threaded unifier for a
//! small user-extensible type algebra. It is a Hindley-Milner-style
//! unification engine extended with:
//!
//! - a declared subtype lattice over nullary ("basic") operators,
//! - variance on compound-operator parameters,
//! - bounded type variables that track a lower and upper basic-operator
//!   bound as they are refined, and
//! - deferred constraints (`Member`, `Param`) that stay pending until a
//!   subject is resolved enough to check.
//!
//! It has no parser, no algebra/graph composition layer, no persistence,
//! and no CLI: those are the job of an embedding client.
//!
//! # Architecture
//!
//! - [`operator`]: operator identity, variance, and the subtype lineage.
//! - [`registry`]: a name-keyed table of declared operators.
//! - [`term`]: plain terms (`OperatorTerm`, `VariableCell`) and the
//!   top-level `Term` (plain term plus deferred constraints).
//! - [`unify`]: the subtype-aware unifier -- `unify_subtype`, `subtype`,
//!   `resolve`, and the occurs check.
//! - [`constraint`]: `Member`/`Param` deferred constraints and their
//!   three-valued `enforce`.
//! - [`schema`]: prenex-quantified term generators.
//! - [`apply`]: function application.
//! - [`error`]: the exhaustive `TypeError` enum.

pub mod apply;
pub mod constraint;
pub mod error;
pub mod operator;
pub mod registry;
pub mod schema;
pub mod term;
pub mod unify;

pub use apply::apply_fn;
pub use constraint::Constraint;
pub use error::TypeError;
pub use operator::{function, Arity, Operator, Variance};
pub use registry::Registry;
pub use schema::Schema;
pub use term::{OperatorTerm, PlainTerm, Term, VariableCell};

/// Apply an operator as a constructor: `op(Int, Int)` where `operator` is
/// `Function`-like with the given arity.
pub fn op(operator: &Operator, params: Vec<PlainTerm>) -> PlainTerm {
    PlainTerm::op(operator.clone(), params)
}

/// Function abstraction: build `a -> b`, merging both operands' deferred
/// constraints. Infallible: building a function type is never itself a
/// subtype check.
pub fn arrow(a: Term, b: Term) -> Term {
    Term::new(
        PlainTerm::Operator(OperatorTerm::new(function(), vec![a.plain, b.plain])),
        a.constraints.into_iter().chain(b.constraints).collect(),
    )
}

/// Attach a deferred constraint to a term.
pub fn with_constraint(term: Term, constraint: Constraint) -> Term {
    let mut constraints = vec![constraint];
    constraints.extend(term.constraints);
    Term::new(term.plain, constraints)
}

/// Assert that `a` is a subtype of `b`, for the mutating side effects
/// (bound tightening, cell fusion) this has on both terms' free variables.
/// Used directly in tests; an embedding caller normally reaches
/// `unify_subtype` indirectly through [`apply_fn`] instead.
pub fn subtype_assert(a: &Term, b: &Term) -> Result<(), TypeError> {
    a.plain.unify_subtype(&b.plain)
}

/// Build a zero-argument `Member` constraint subject: `subject` must be a
/// subtype of at least one of `alternatives`.
pub fn member(subject: PlainTerm, alternatives: Vec<PlainTerm>) -> Constraint {
    Constraint::member(subject, alternatives)
}

/// Build a `Param` constraint: the parameter at `at` (1-based; `None` for
/// "every parameter") of `subject` must be a subtype of at least one of
/// `alternatives`.
pub fn param(subject: PlainTerm, alternatives: Vec<PlainTerm>, at: Option<usize>) -> Constraint {
    Constraint::param(subject, alternatives, at)
}

impl Operator {
    /// Construct a zero-argument `Term` directly from a nullary operator.
    ///
    /// # Panics
    ///
    /// Panics if the operator is not nullary.
    pub fn instance(&self) -> Term {
        Term::new(PlainTerm::op(self.clone(), vec![]), vec![])
    }
}

impl Term {
    /// Resolve this term's free variables to their tightest bound, and
    /// drop any deferred constraint that has become satisfied. Uses
    /// `resolve_subtypes = true`, `prefer_lower = true`; see
    /// [`PlainTerm::resolve`] for the general three-parameter form.
    pub fn resolve(&self, force: bool) -> Result<Term, TypeError> {
        self.resolve_with(force, true, true)
    }

    /// The general form of [`Term::resolve`], exposing all three
    /// parameters described in `spec.md` §6.
    pub fn resolve_with(&self, force: bool, resolve_subtypes: bool, prefer_lower: bool) -> Result<Term, TypeError> {
        let plain = self.plain.resolve(force, resolve_subtypes, prefer_lower);
        let mut constraints = Vec::new();
        for c in &self.constraints {
            if c.enforce()? {
                constraints.push(c.clone());
            }
        }
        Ok(Term::new(plain, constraints))
    }
}


#[cfg(test)]
trait IntoTerm {
    fn into_term(self) -> Term;
}

#[cfg(test)]
impl IntoTerm for PlainTerm {
    fn into_term(self) -> Term {
        Term::new(self, vec![])
    }
}
