//! Deferred constraints: `Member` and `Param`.
//!
//! A constraint records something that must eventually hold once its
//! subject is resolved enough to tell, without forcing that resolution
//! early. [`Constraint::enforce`] is the three-valued check: an alternative
//! is satisfied (drop the constraint), the subject is still too
//! undetermined to decide (keep it), or every alternative has been
//! definitively falsified (raise [`TypeError::ViolatedConstraint`]).

use std::fmt;

use crate::error::TypeError;
use crate::term::PlainTerm;

/// A constraint deferred against a subject term until it is resolved
/// enough to check.
#[derive(Clone, Debug)]
pub enum Constraint {
    /// The subject must be a subtype of at least one alternative.
    Member {
        subject: PlainTerm,
        alternatives: Vec<PlainTerm>,
    },
    /// The subject must be a compound operator term; the parameter at
    /// `at` (1-based), or every parameter when `at` is `None`, must be a
    /// subtype of at least one alternative.
    Param {
        subject: PlainTerm,
        alternatives: Vec<PlainTerm>,
        at: Option<usize>,
    },
}

impl Constraint {
    pub fn member(subject: PlainTerm, alternatives: Vec<PlainTerm>) -> Constraint {
        Constraint::Member { subject, alternatives }
    }

    pub fn param(subject: PlainTerm, alternatives: Vec<PlainTerm>, at: Option<usize>) -> Constraint {
        Constraint::Param { subject, alternatives, at }
    }

    /// Dereference the subject and alternatives through any fusions that
    /// happened since this constraint was created, without forcing
    /// resolution of any variable still free.
    fn dereferenced(&self) -> Constraint {
        match self {
            Constraint::Member { subject, alternatives } => Constraint::Member {
                subject: subject.resolve(false, false, true),
                alternatives: alternatives.iter().map(|p| p.resolve(false, false, true)).collect(),
            },
            Constraint::Param { subject, alternatives, at } => Constraint::Param {
                subject: subject.resolve(false, false, true),
                alternatives: alternatives.iter().map(|p| p.resolve(false, false, true)).collect(),
                at: *at,
            },
        }
    }

    /// Check whether this constraint still needs to be kept around.
    ///
    /// Returns `Ok(true)` if the subject is not yet resolved enough to
    /// decide (the constraint should be kept for a later pass), `Ok(false)`
    /// if some alternative is already satisfied (the constraint can be
    /// dropped), or `Err` if every alternative has been ruled out.
    pub fn enforce(&self) -> Result<bool, TypeError> {
        let resolved = self.dereferenced();
        match &resolved {
            Constraint::Member { subject, alternatives } => {
                for other in alternatives {
                    match subject.subtype(other) {
                        Some(true) => return Ok(false),
                        None => return Ok(true),
                        Some(false) => {}
                    }
                }
                Err(TypeError::ViolatedConstraint(resolved.clone()))
            }
            Constraint::Param { subject, alternatives, at } => {
                let subject = subject.follow();
                match &subject {
                    PlainTerm::Variable(_) => Ok(true),
                    PlainTerm::Operator(op) => {
                        let candidates: Option<Vec<PlainTerm>> = match at {
                            None => Some(op.params.clone()),
                            Some(pos) => {
                                if *pos >= 1 && *pos - 1 < op.params.len() {
                                    Some(vec![op.params[*pos - 1].clone()])
                                } else {
                                    None
                                }
                            }
                        };
                        if let Some(candidates) = candidates {
                            for p in &candidates {
                                let p = p.follow();
                                for other in alternatives {
                                    match p.subtype(&other.follow()) {
                                        Some(true) => return Ok(false),
                                        None => return Ok(true),
                                        Some(false) => {}
                                    }
                                }
                            }
                        }
                        Err(TypeError::ViolatedConstraint(resolved.clone()))
                    }
                }
            }
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Member { subject, alternatives } => {
                write!(f, "{subject} @ [")?;
                for (i, a) in alternatives.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{a}")?;
                }
                write!(f, "]")
            }
            Constraint::Param { subject, alternatives, at } => {
                match at {
                    Some(pos) => write!(f, "{subject}#{pos} @ [")?,
                    None => write!(f, "{subject}#* @ [")?,
                }
                for (i, a) in alternatives.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{a}")?;
                }
                write!(f, "]")
            }
        }
    }
}
