//! Operator identity: type constructors, variance, and the basic-operator
//! subtype lineage.
//!
//! An [`Operator`] is a cheap-to-clone handle (backed by `Rc`) so it can be
//! embedded directly inside terms and compared by structural identity. This
//! mirrors the teacher's `TyCon`, whose `PartialEq`/`Hash` deliberately
//! excludes display-only metadata (`display_prefix`) from identity -- here
//! the excluded field is `supertype`, which is metadata for the subtype
//! lineage rather than part of an operator's own identity.

use std::fmt;
use std::rc::Rc;

/// The variance of a compound operator's parameter: how its subtype
/// relation composes with the subtype relation of the parameter itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Variance {
    /// The compound subtype relation preserves the parameter's relation.
    Covariant,
    /// The compound subtype relation reverses the parameter's relation.
    Contravariant,
}

struct OperatorData {
    name: String,
    variance: Vec<Variance>,
    supertype: Option<Operator>,
}

/// A user-declared type constructor: a name, an arity (expressed as a
/// variance vector), and -- for nullary operators only -- an optional
/// direct supertype.
///
/// Two operators are equal when their `(name, variance)` pair matches;
/// `supertype` is lineage metadata, not part of identity, exactly as the
/// teacher's `TyCon` excludes `display_prefix` from its own `PartialEq`.
#[derive(Clone)]
pub struct Operator(Rc<OperatorData>);

/// How many parameters an operator takes, expressed either as a bare count
/// (all parameters covariant) or as an explicit variance per parameter.
pub enum Arity {
    Count(usize),
    Variance(Vec<Variance>),
}

impl From<usize> for Arity {
    fn from(n: usize) -> Self {
        Arity::Count(n)
    }
}

impl From<i32> for Arity {
    // Unsuffixed integer literals (`Operator::new("Int", 0, None)`) default
    // to `i32`; this lets that common call shape type-check without the
    // caller having to write `0usize`.
    fn from(n: i32) -> Self {
        Arity::Count(n as usize)
    }
}

impl From<Vec<Variance>> for Arity {
    fn from(v: Vec<Variance>) -> Self {
        Arity::Variance(v)
    }
}

impl Operator {
    /// Declare a new operator.
    ///
    /// # Panics
    ///
    /// Panics if a non-nullary operator is given a direct supertype --
    /// only basic (nullary) operators may participate in a subtype
    /// lineage (`spec.md` §3 invariant).
    pub fn new(name: impl Into<String>, arity: impl Into<Arity>, supertype: Option<Operator>) -> Self {
        let variance = match arity.into() {
            Arity::Count(n) => vec![Variance::Covariant; n],
            Arity::Variance(v) => v,
        };
        if supertype.is_some() && !variance.is_empty() {
            panic!("only nullary operators can declare a direct supertype");
        }
        Operator(Rc::new(OperatorData {
            name: name.into(),
            variance,
            supertype,
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn variance(&self) -> &[Variance] {
        &self.0.variance
    }

    pub fn arity(&self) -> usize {
        self.0.variance.len()
    }

    /// A nullary operator: no parameters, eligible to carry bounds and
    /// participate in the subtype lineage.
    pub fn basic(&self) -> bool {
        self.0.variance.is_empty()
    }

    pub fn compound(&self) -> bool {
        !self.basic()
    }

    pub fn supertype(&self) -> Option<&Operator> {
        self.0.supertype.as_ref()
    }

    /// Reflexive-transitive closure of the declared supertype edges.
    ///
    /// Ordering is only meaningful between operators in the same lineage;
    /// operators with no common ancestor compare as unordered (`false`),
    /// not as an error.
    pub fn le(&self, other: &Operator) -> bool {
        self == other || self.lt(other)
    }

    /// Strict version of [`Operator::le`]: true exactly when `self` has a
    /// supertype chain reaching `other`.
    pub fn lt(&self, other: &Operator) -> bool {
        self.0.supertype.as_ref().is_some_and(|s| s.le(other))
    }

    /// True exactly when this handle is the distinguished `Function`
    /// operator (identity, not name -- `spec.md` §4.4).
    pub fn is_function(&self) -> bool {
        Rc::ptr_eq(&self.0, &function().0)
    }
}

impl PartialEq for Operator {
    fn eq(&self, other: &Self) -> bool {
        self.0.name == other.0.name && self.0.variance == other.0.variance
    }
}

impl Eq for Operator {}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Operator({})", self.0.name)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.name)
    }
}

thread_local! {
    static FUNCTION: Operator = Operator(Rc::new(OperatorData {
        name: "Function".to_string(),
        variance: vec![Variance::Contravariant, Variance::Covariant],
        supertype: None,
    }));
}

/// The special constructor for function types: arity 2, contravariant in
/// its input parameter and covariant in its output. Distinguished from any
/// user-declared operator of the same name by handle identity.
pub fn function() -> Operator {
    FUNCTION.with(|f| f.clone())
}
