//! Type errors.
//!
//! Five exhaustive kinds, matching `mesh-common::error::LexError` and
//! `mesh-typeck::error::TypeError`'s hand-rolled style: no `thiserror`,
//! plain `impl fmt::Display` plus `impl std::error::Error`. There is no
//! surface syntax in this crate's scope, so -- unlike the teacher's
//! `TypeError`, which carries a `rowan::TextRange` per variant -- these
//! variants carry the offending terms themselves rather than a span.

use std::fmt;

use crate::constraint::Constraint;
use crate::term::PlainTerm;

/// Every way a term-algebra operation can fail.
#[derive(Clone, Debug)]
pub enum TypeError {
    /// `apply_fn` was called on a head that is not, and cannot be refined
    /// to, the `Function` operator.
    NonFunctionApplication { found: PlainTerm },
    /// A basic-operator relation required `sub <= sup` but the two are
    /// either ordered the wrong way or lie in unrelated lineages.
    SubtypeMismatch { sub: PlainTerm, sup: PlainTerm },
    /// Two compound terms have the same arity but different operators, or
    /// two basic terms can never be related by any declared lineage.
    TypeMismatch { a: PlainTerm, b: PlainTerm },
    /// Unifying `var` with `ty` would require `var` to occur inside its
    /// own definition.
    RecursiveType { var: PlainTerm, ty: PlainTerm },
    /// A deferred constraint's alternatives were all falsified.
    ViolatedConstraint(Constraint),
}

impl TypeError {
    pub(crate) fn subtype_mismatch(sub: PlainTerm, sup: PlainTerm) -> TypeError {
        TypeError::SubtypeMismatch { sub, sup }
    }

    pub(crate) fn type_mismatch(a: PlainTerm, b: PlainTerm) -> TypeError {
        TypeError::TypeMismatch { a, b }
    }

    pub(crate) fn recursive_type(var: PlainTerm, ty: PlainTerm) -> TypeError {
        TypeError::RecursiveType { var, ty }
    }

    pub(crate) fn non_function_application(found: PlainTerm) -> TypeError {
        TypeError::NonFunctionApplication { found }
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeError::NonFunctionApplication { found } => {
                write!(f, "`{found}` is not a function and cannot be applied")
            }
            TypeError::SubtypeMismatch { sub, sup } => {
                write!(f, "`{sub}` is not a subtype of `{sup}`")
            }
            TypeError::TypeMismatch { a, b } => {
                write!(f, "`{a}` and `{b}` are incompatible types")
            }
            TypeError::RecursiveType { var, ty } => {
                write!(f, "`{var}` occurs in `{ty}`, which would form an infinite type")
            }
            TypeError::ViolatedConstraint(c) => {
                write!(f, "violated constraint: {c}")
            }
        }
    }
}

impl std::error::Error for TypeError {}
