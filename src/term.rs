//! Plain terms: operator applications and variable cells.
//!
//! A [`PlainTerm`] is either an [`OperatorTerm`] (an operator applied to its
//! parameters) or a [`VariableCell`] (an as-yet-unresolved type, possibly
//! bounded). [`VariableCell`] is a reference-counted, interior-mutable
//! handle -- grounded on `kailua_check::ty::slot::Slot`'s `Arc<RwLock<S>>`
//! pattern, reduced to `Rc<RefCell<_>>` because this crate is single
//! threaded (see `DESIGN.md`).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::operator::Operator;

static NEXT_CELL_ID: AtomicU64 = AtomicU64::new(0);

/// An operator applied to its parameters. `params.len()` always equals
/// `operator.arity()`.
#[derive(Clone, Debug)]
pub struct OperatorTerm {
    pub operator: Operator,
    pub params: Vec<PlainTerm>,
}

impl OperatorTerm {
    pub fn new(operator: Operator, params: Vec<PlainTerm>) -> Self {
        assert_eq!(
            params.len(),
            operator.arity(),
            "operator {} takes {} parameter(s), got {}",
            operator.name(),
            operator.arity(),
            params.len()
        );
        OperatorTerm { operator, params }
    }
}

#[derive(Debug)]
pub(crate) struct VarCellData {
    pub(crate) id: u64,
    pub(crate) name: Option<String>,
    pub(crate) lower: Option<Operator>,
    pub(crate) upper: Option<Operator>,
    pub(crate) unified: Option<PlainTerm>,
}

/// A reference-counted handle to an unresolved type variable. Cloning a
/// `VariableCell` shares the same underlying cell; two cells are the same
/// variable exactly when they share the same `Rc` allocation.
#[derive(Clone, Debug)]
pub struct VariableCell(pub(crate) Rc<RefCell<VarCellData>>);

impl VariableCell {
    /// Allocate a fresh, unbounded, unfused cell.
    pub fn fresh(name: Option<String>) -> Self {
        let id = NEXT_CELL_ID.fetch_add(1, Ordering::Relaxed);
        VariableCell(Rc::new(RefCell::new(VarCellData {
            id,
            name,
            lower: None,
            upper: None,
            unified: None,
        })))
    }

    pub fn id(&self) -> u64 {
        self.0.borrow().id
    }

    pub fn name(&self) -> Option<String> {
        self.0.borrow().name.clone()
    }

    pub fn lower(&self) -> Option<Operator> {
        self.0.borrow().lower.clone()
    }

    pub fn upper(&self) -> Option<Operator> {
        self.0.borrow().upper.clone()
    }

    /// Walk the `unified` chain to the nearest representative: either an
    /// unfused cell (itself) or the operator term it has been fused to.
    pub fn follow(&self) -> PlainTerm {
        let next = self.0.borrow().unified.clone();
        match next {
            Some(t) => t.follow(),
            None => PlainTerm::Variable(self.clone()),
        }
    }

    pub(crate) fn same_cell(&self, other: &VariableCell) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for VariableCell {
    fn eq(&self, other: &Self) -> bool {
        self.same_cell(other)
    }
}

impl Eq for VariableCell {}

/// Either an operator application or a variable cell, after following any
/// prior fusion at most one level (callers that need the fully-dereferenced
/// view call [`PlainTerm::follow`]).
#[derive(Clone, Debug)]
pub enum PlainTerm {
    Operator(OperatorTerm),
    Variable(VariableCell),
}

impl PlainTerm {
    pub fn op(operator: Operator, params: Vec<PlainTerm>) -> PlainTerm {
        PlainTerm::Operator(OperatorTerm::new(operator, params))
    }

    pub fn var(name: Option<&str>) -> PlainTerm {
        PlainTerm::Variable(VariableCell::fresh(name.map(str::to_string)))
    }

    /// Follow a chain of fused variable cells to the representative term:
    /// either an unfused cell or the operator term at the end of the chain.
    pub fn follow(&self) -> PlainTerm {
        match self {
            PlainTerm::Variable(v) => v.follow(),
            PlainTerm::Operator(_) => self.clone(),
        }
    }

    /// All variable cells reachable from this term (after following fusion
    /// chains), in first-discovery order, without duplicates.
    pub fn variables(&self) -> Vec<VariableCell> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables(&self, out: &mut Vec<VariableCell>) {
        match self.follow() {
            PlainTerm::Variable(v) => {
                if !out.iter().any(|existing| existing.same_cell(&v)) {
                    out.push(v);
                }
            }
            PlainTerm::Operator(op) => {
                for p in &op.params {
                    p.collect_variables(out);
                }
            }
        }
    }

    /// A structural copy of this term with a fresh variable at every basic
    /// (nullary-operator) leaf, preserving the shape of any compound
    /// operator applications. Used to pin an unresolved variable to a
    /// compound shape while leaving its basic leaves free to range over
    /// the subtype lattice.
    pub fn skeleton(&self) -> PlainTerm {
        match self {
            PlainTerm::Variable(_) => self.clone(),
            PlainTerm::Operator(op) => {
                if op.operator.basic() {
                    PlainTerm::var(None)
                } else {
                    PlainTerm::Operator(OperatorTerm {
                        operator: op.operator.clone(),
                        params: op.params.iter().map(PlainTerm::skeleton).collect(),
                    })
                }
            }
        }
    }
}

impl PartialEq for PlainTerm {
    fn eq(&self, other: &Self) -> bool {
        match (self.follow(), other.follow()) {
            (PlainTerm::Variable(a), PlainTerm::Variable(b)) => a.same_cell(&b),
            (PlainTerm::Operator(a), PlainTerm::Operator(b)) => {
                a.operator == b.operator
                    && a.params.len() == b.params.len()
                    && a.params.iter().zip(b.params.iter()).all(|(x, y)| x == y)
            }
            _ => false,
        }
    }
}

impl Eq for PlainTerm {}

impl fmt::Display for VariableCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.0.borrow();
        match &d.name {
            Some(n) => write!(f, "{n}"),
            None => write!(f, "_{}", d.id),
        }
    }
}

impl fmt::Display for PlainTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.follow() {
            PlainTerm::Variable(v) => write!(f, "{v}"),
            PlainTerm::Operator(op) => {
                if op.operator.is_function() {
                    let lhs_is_function = matches!(
                        op.params[0].follow(),
                        PlainTerm::Operator(ref inner) if inner.operator.is_function()
                    );
                    if lhs_is_function {
                        write!(f, "({}) ** {}", op.params[0], op.params[1])
                    } else {
                        write!(f, "{} ** {}", op.params[0], op.params[1])
                    }
                } else if op.params.is_empty() {
                    write!(f, "{}", op.operator)
                } else {
                    write!(f, "{}(", op.operator)?;
                    for (i, p) in op.params.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{p}")?;
                    }
                    write!(f, ")")
                }
            }
        }
    }
}

/// A top-level term: a plain term together with the deferred constraints
/// still pending against it.
#[derive(Clone, Debug)]
pub struct Term {
    pub plain: PlainTerm,
    pub constraints: Vec<crate::constraint::Constraint>,
}

impl Term {
    pub fn new(plain: PlainTerm, constraints: Vec<crate::constraint::Constraint>) -> Self {
        Term { plain, constraints }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.plain)?;
        for c in &self.constraints {
            write!(f, " | {c}")?;
        }
        for v in self.plain.variables() {
            if let Some(lower) = v.lower() {
                write!(f, " | {lower} << {v}")?;
            }
            if let Some(upper) = v.upper() {
                write!(f, " | {v} << {upper}")?;
            }
        }
        Ok(())
    }
}
