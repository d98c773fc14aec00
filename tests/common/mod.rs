//! Shared fixtures for the integration test suites: the small lattice used
//! throughout `original_source/tests/test_type.py`
//! (`Any > Ord > {Bool, Str, Int > UInt}`, plus the compound operators `T`
//! and `Set`).

use algebra_types::{op, Operator, Term};
use algebra_types::term::PlainTerm;

pub struct Lattice {
    pub any: Operator,
    pub ord: Operator,
    pub bool_op: Operator,
    pub str_op: Operator,
    pub int_op: Operator,
    pub uint_op: Operator,
    pub t_op: Operator,
    pub set_op: Operator,
}

pub fn lattice() -> Lattice {
    let any = Operator::new("Any", 0, None);
    let ord = Operator::new("Ord", 0, Some(any.clone()));
    let bool_op = Operator::new("Bool", 0, Some(ord.clone()));
    let str_op = Operator::new("Str", 0, Some(ord.clone()));
    let int_op = Operator::new("Int", 0, Some(ord.clone()));
    let uint_op = Operator::new("UInt", 0, Some(int_op.clone()));
    let t_op = Operator::new("T", 1, None);
    let set_op = Operator::new("Set", 1, None);
    Lattice { any, ord, bool_op, str_op, int_op, uint_op, t_op, set_op }
}

pub fn nullary(operator: &Operator) -> PlainTerm {
    op(operator, vec![])
}

/// Wrap a bare [`PlainTerm`] as a constraint-free [`Term`], for operands
/// built directly from `op`/`PlainTerm::var` rather than `Operator::instance`.
pub fn term(plain: PlainTerm) -> Term {
    Term::new(plain, vec![])
}
