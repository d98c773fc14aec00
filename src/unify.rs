//! The subtype-aware unifier.
//!
//! These are inherent methods on [`PlainTerm`] and [`VariableCell`] rather
//! than methods on a context struct: unlike the teacher's `InferCtx`
//! (which owns an `ena` union-find table external to its `Ty` values),
//! cells here own their own union-find state directly (`DESIGN.md`), so
//! there is no context to thread through.

use crate::error::TypeError;
use crate::operator::{Operator, Variance};
use crate::term::{OperatorTerm, PlainTerm, VariableCell};

impl VariableCell {
    /// True when `self` occurs anywhere inside `term`, following fusion
    /// chains at every level encountered -- not just at the point the
    /// check began, so a variable fused to something that itself contains
    /// `self` is still caught.
    pub fn occurs_in(&self, term: &PlainTerm) -> bool {
        match term.follow() {
            PlainTerm::Variable(v) => self.same_cell(&v),
            PlainTerm::Operator(op) => op.params.iter().any(|p| self.occurs_in(p)),
        }
    }

    /// Tighten the lower bound to `new`, or fail if that would conflict
    /// with an existing bound or put `new` in an unrelated lineage.
    pub fn above(&self, new: &Operator) -> Result<(), TypeError> {
        let (lower, upper) = {
            let d = self.0.borrow();
            (
                d.lower.clone().unwrap_or_else(|| new.clone()),
                d.upper.clone().unwrap_or_else(|| new.clone()),
            )
        };
        if upper.lt(new) {
            Err(TypeError::subtype_mismatch(op_term(new), op_term(&upper)))
        } else if new.lt(&lower) {
            Ok(())
        } else if lower.le(new) {
            self.0.borrow_mut().lower = Some(new.clone());
            Ok(())
        } else {
            Err(TypeError::subtype_mismatch(op_term(&lower), op_term(new)))
        }
    }

    /// Tighten the upper bound to `new`, symmetric to [`VariableCell::above`].
    pub fn below(&self, new: &Operator) -> Result<(), TypeError> {
        let (lower, upper) = {
            let d = self.0.borrow();
            (
                d.lower.clone().unwrap_or_else(|| new.clone()),
                d.upper.clone().unwrap_or_else(|| new.clone()),
            )
        };
        if new.lt(&lower) {
            Err(TypeError::subtype_mismatch(op_term(&lower), op_term(new)))
        } else if upper.lt(new) {
            Ok(())
        } else if new.le(&upper) {
            self.0.borrow_mut().upper = Some(new.clone());
            Ok(())
        } else {
            Err(TypeError::subtype_mismatch(op_term(new), op_term(&upper)))
        }
    }

    /// Fuse this cell to `target`. A cell may be fused at most once; fusing
    /// it again to the same target is a no-op, fusing it to a different
    /// target is a contract violation in the caller (mirrors the
    /// `assert not self.unified` precondition of the reference
    /// implementation -- this is never reachable from a `TypeError`-facing
    /// client operation).
    pub fn unify(&self, target: &PlainTerm) -> Result<(), TypeError> {
        {
            let existing = self.0.borrow().unified.clone();
            if let Some(existing) = existing {
                assert!(
                    &existing == target,
                    "variable cell fused a second time to a different term"
                );
            }
        }
        if let PlainTerm::Variable(t) = target {
            if self.same_cell(t) {
                return Ok(());
            }
        }
        self.0.borrow_mut().unified = Some(target.clone());
        match target {
            PlainTerm::Variable(t) => {
                let (lo, hi) = {
                    let d = self.0.borrow();
                    (d.lower.clone(), d.upper.clone())
                };
                if let Some(l) = lo {
                    t.above(&l)?;
                }
                if let Some(u) = hi {
                    t.below(&u)?;
                }
                let (tl, tu) = {
                    let d = t.0.borrow();
                    (d.lower.clone(), d.upper.clone())
                };
                if let (Some(tl), Some(tu)) = (tl, tu) {
                    if tl == tu {
                        t.unify(&op_term(&tl))?;
                    }
                }
                Ok(())
            }
            PlainTerm::Operator(t) if t.operator.basic() => {
                let d = self.0.borrow();
                if let Some(l) = &d.lower {
                    if t.operator.lt(l) {
                        return Err(TypeError::subtype_mismatch(op_term(l), op_term(&t.operator)));
                    }
                }
                if let Some(u) = &d.upper {
                    if u.lt(&t.operator) {
                        return Err(TypeError::subtype_mismatch(op_term(&t.operator), op_term(u)));
                    }
                }
                Ok(())
            }
            // Fusing to a compound operator term discards any bounds:
            // bounds only constrain basic-operator representatives.
            PlainTerm::Operator(_) => Ok(()),
        }
    }
}

fn op_term(operator: &Operator) -> PlainTerm {
    PlainTerm::Operator(OperatorTerm {
        operator: operator.clone(),
        params: Vec::new(),
    })
}

impl PlainTerm {
    /// Three-valued subtype test: `Some(true)`/`Some(false)` when the
    /// relation is fully determined by the current bounds, `None` when it
    /// depends on a variable that is not yet resolved enough to decide.
    /// Never mutates any cell.
    ///
    /// An unfused variable is not automatically `None`: its bounds already
    /// constrain where it can land, and transitivity lets some queries be
    /// answered without waiting for a fuse. If `self` is a variable with
    /// lower bound `lo`, its eventual value `r` satisfies `lo <= r`, so `r
    /// <= other` is impossible whenever `lo` is not itself `<= other`
    /// (`Some(false)`); symmetric reasoning from an upper bound gives
    /// `Some(true)`. A variable with no bound on the relevant side stays
    /// `None`, same as before.
    pub fn subtype(&self, other: &PlainTerm) -> Option<bool> {
        let a = self.follow();
        let b = other.follow();
        match (&a, &b) {
            (PlainTerm::Operator(oa), PlainTerm::Operator(ob)) => {
                if oa.operator.basic() {
                    Some(oa.operator.le(&ob.operator))
                } else if oa.operator != ob.operator {
                    Some(false)
                } else {
                    let mut result = true;
                    for (variance, (x, y)) in oa
                        .operator
                        .variance()
                        .iter()
                        .zip(oa.params.iter().zip(ob.params.iter()))
                    {
                        let r = match variance {
                            Variance::Covariant => x.subtype(y),
                            Variance::Contravariant => y.subtype(x),
                        };
                        match r {
                            None => return None,
                            Some(v) => result &= v,
                        }
                    }
                    Some(result)
                }
            }
            (PlainTerm::Variable(va), PlainTerm::Operator(ob)) if ob.operator.basic() => {
                if let Some(upper) = va.upper() {
                    if upper.le(&ob.operator) {
                        return Some(true);
                    }
                }
                if let Some(lower) = va.lower() {
                    if !lower.le(&ob.operator) {
                        return Some(false);
                    }
                }
                None
            }
            (PlainTerm::Operator(oa), PlainTerm::Variable(vb)) if oa.operator.basic() => {
                if let Some(lower) = vb.lower() {
                    if oa.operator.le(&lower) {
                        return Some(true);
                    }
                }
                if let Some(upper) = vb.upper() {
                    if !oa.operator.le(&upper) {
                        return Some(false);
                    }
                }
                None
            }
            _ => None,
        }
    }

    /// Mutating subtype-aware unification: requires that `self` be a
    /// subtype of `other`, refining variable bounds and fusing cells as
    /// needed to make the relation hold, or failing with a [`TypeError`]
    /// when it cannot.
    pub fn unify_subtype(&self, other: &PlainTerm) -> Result<(), TypeError> {
        let a = self.follow();
        let b = other.follow();
        match (&a, &b) {
            (PlainTerm::Operator(oa), PlainTerm::Operator(ob)) => {
                if oa.operator.basic() {
                    if oa.operator.le(&ob.operator) {
                        Ok(())
                    } else {
                        Err(TypeError::subtype_mismatch(a.clone(), b.clone()))
                    }
                } else if oa.operator == ob.operator {
                    for (variance, (x, y)) in oa
                        .operator
                        .variance()
                        .iter()
                        .zip(oa.params.iter().zip(ob.params.iter()))
                    {
                        match variance {
                            Variance::Covariant => x.unify_subtype(y)?,
                            Variance::Contravariant => y.unify_subtype(x)?,
                        }
                    }
                    Ok(())
                } else {
                    Err(TypeError::type_mismatch(a.clone(), b.clone()))
                }
            }
            (PlainTerm::Variable(va), PlainTerm::Variable(_)) => va.unify(&b),
            (PlainTerm::Variable(va), PlainTerm::Operator(ob)) => {
                if va.occurs_in(&b) {
                    return Err(TypeError::recursive_type(a.clone(), b.clone()));
                }
                if ob.operator.basic() {
                    va.below(&ob.operator)
                } else {
                    va.unify(&b.skeleton())?;
                    a.unify_subtype(&b)
                }
            }
            (PlainTerm::Operator(oa), PlainTerm::Variable(vb)) => {
                if vb.occurs_in(&a) {
                    return Err(TypeError::recursive_type(b.clone(), a.clone()));
                }
                if oa.operator.basic() {
                    vb.above(&oa.operator)
                } else {
                    vb.unify(&a.skeleton())?;
                    a.unify_subtype(&b)
                }
            }
        }
    }

    /// Fuse this term's free variables to their tightest available bound.
    ///
    /// `resolve_subtypes`: when `false`, leave variables as-is (only
    /// compound structure is dereferenced). `prefer_lower`: when resolving
    /// a variable with both bounds available, which one wins; this flips
    /// at each contravariant parameter so that, e.g., a function's
    /// argument type resolves towards its upper bound while its result
    /// resolves towards its lower bound. `force`: when only one bound is
    /// set (or `prefer_lower`'s preferred bound is missing), fuse to
    /// whichever bound exists anyway -- this is an unsound widening used
    /// only for display purposes, never during normal unification.
    pub fn resolve(&self, force: bool, resolve_subtypes: bool, prefer_lower: bool) -> PlainTerm {
        match self.follow() {
            PlainTerm::Operator(op) => PlainTerm::Operator(OperatorTerm {
                operator: op.operator.clone(),
                params: op
                    .operator
                    .variance()
                    .iter()
                    .zip(op.params.iter())
                    .map(|(v, p)| {
                        let flipped = match v {
                            Variance::Covariant => prefer_lower,
                            Variance::Contravariant => !prefer_lower,
                        };
                        p.resolve(force, resolve_subtypes, flipped)
                    })
                    .collect(),
            }),
            PlainTerm::Variable(cell) => cell.resolve(force, resolve_subtypes, prefer_lower),
        }
    }
}

impl VariableCell {
    fn resolve(&self, force: bool, resolve_subtypes: bool, prefer_lower: bool) -> PlainTerm {
        if !resolve_subtypes {
            return PlainTerm::Variable(self.clone());
        }
        let (lower, upper) = (self.lower(), self.upper());
        if prefer_lower && lower.is_some() {
            let _ = self.unify(&op_term(&lower.unwrap()));
        } else if !prefer_lower && upper.is_some() {
            let _ = self.unify(&op_term(&upper.unwrap()));
        } else if force {
            if let Some(u) = upper {
                let _ = self.unify(&op_term(&u));
            } else if let Some(l) = lower {
                let _ = self.unify(&op_term(&l));
            }
        }
        self.follow()
    }
}
