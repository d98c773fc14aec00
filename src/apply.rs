//! Function application.
//!
//! `apply_fn(f, x)` pins an unresolved `f` to a fresh `Function` shape if
//! needed, checks `x <: domain(f)`, and returns the (constraint-filtered)
//! codomain.

use crate::error::TypeError;
use crate::operator::function;
use crate::term::{OperatorTerm, PlainTerm, Term};

/// Apply `f` to `x`, per `spec.md` §4.4.
///
/// If `f`'s plain term is an unresolved variable, it is first fused to a
/// fresh `Function(_, _)` shape. The head must then be exactly the
/// distinguished `Function` operator (by identity, not name) or this
/// fails with [`TypeError::NonFunctionApplication`]. On success, `x` is
/// required to be a subtype of the domain, and the result term's
/// constraints are both operands' constraint lists, each re-checked with
/// [`crate::constraint::Constraint::enforce`] and kept only while not yet
/// decided.
pub fn apply_fn(f: &Term, x: &Term) -> Result<Term, TypeError> {
    let head = f.plain.follow();
    let head = match &head {
        PlainTerm::Variable(fv) => {
            let fresh = PlainTerm::Operator(OperatorTerm {
                operator: function(),
                params: vec![PlainTerm::var(None), PlainTerm::var(None)],
            });
            fv.unify(&fresh)?;
            fv.follow()
        }
        PlainTerm::Operator(_) => head,
    };

    match &head {
        PlainTerm::Operator(op) if op.operator.is_function() => {
            x.plain.unify_subtype(&op.params[0])?;
            let result_plain = op.params[1].resolve(false, true, true);
            let mut constraints = Vec::with_capacity(f.constraints.len() + x.constraints.len());
            for c in f.constraints.iter().chain(x.constraints.iter()) {
                if c.enforce()? {
                    constraints.push(c.clone());
                }
            }
            Ok(Term::new(result_plain, constraints))
        }
        _ => Err(TypeError::non_function_application(head)),
    }
}
