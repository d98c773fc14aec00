//! Integration tests ported from `original_source/tests/test_type.py`, the
//! reference implementation's own test suite. Where that suite's scenario
//! composes several applications in sequence, the Rust port chains
//! `apply_fn` the same way rather than re-deriving the algebra from
//! scratch.

mod common;

use algebra_types::{apply_fn, arrow, member, with_constraint, Operator, Schema, Term, TypeError};
use algebra_types::term::PlainTerm;

use common::{lattice, nullary, term};

#[test]
fn apply_non_function() {
    let l = lattice();
    let f = term(nullary(&l.int_op));
    let x = term(nullary(&l.int_op));
    assert!(matches!(apply_fn(&f, &x), Err(TypeError::NonFunctionApplication { .. })));
}

#[test]
fn basic_match() {
    let l = lattice();
    let f = arrow(term(nullary(&l.int_op)), term(nullary(&l.bool_op)));
    let result = apply_fn(&f, &term(nullary(&l.int_op))).unwrap();
    assert_eq!(format!("{result}"), "Bool");
}

#[test]
fn basic_mismatch() {
    let l = lattice();
    let f = arrow(term(nullary(&l.int_op)), term(nullary(&l.bool_op)));
    assert!(apply_fn(&f, &term(nullary(&l.bool_op))).is_err());
}

#[test]
fn basic_sub_match() {
    let l = lattice();
    let f = arrow(term(nullary(&l.int_op)), term(nullary(&l.int_op)));
    let result = apply_fn(&f, &term(nullary(&l.uint_op))).unwrap();
    assert_eq!(format!("{result}"), "Int");
}

#[test]
fn basic_sub_mismatch() {
    let l = lattice();
    // Contravariant-adjacent: the domain is the *narrower* type, so a wider
    // argument does not satisfy it.
    let f = arrow(term(nullary(&l.uint_op)), term(nullary(&l.int_op)));
    assert!(apply_fn(&f, &term(nullary(&l.int_op))).is_err());
}

#[test]
fn compound_match() {
    let l = lattice();
    let f = arrow(
        term(algebra_types::op(&l.t_op, vec![nullary(&l.int_op)])),
        term(nullary(&l.int_op)),
    );
    let result = apply_fn(&f, &term(algebra_types::op(&l.t_op, vec![nullary(&l.int_op)]))).unwrap();
    assert_eq!(format!("{result}"), "Int");
}

#[test]
fn compound_mismatch() {
    let l = lattice();
    let f = arrow(
        term(algebra_types::op(&l.t_op, vec![nullary(&l.int_op)])),
        term(nullary(&l.int_op)),
    );
    assert!(apply_fn(&f, &term(algebra_types::op(&l.set_op, vec![nullary(&l.int_op)]))).is_err());
}

#[test]
fn compound_sub_match() {
    let l = lattice();
    let f = arrow(
        term(algebra_types::op(&l.t_op, vec![nullary(&l.int_op)])),
        term(nullary(&l.int_op)),
    );
    let result = apply_fn(&f, &term(algebra_types::op(&l.t_op, vec![nullary(&l.uint_op)]))).unwrap();
    assert_eq!(format!("{result}"), "Int");
}

#[test]
fn compound_sub_mismatch() {
    let l = lattice();
    // `T` is covariant by default, so `T(Int)` is not a subtype of `T(UInt)`.
    let f = arrow(
        term(algebra_types::op(&l.t_op, vec![nullary(&l.uint_op)])),
        term(nullary(&l.int_op)),
    );
    assert!(apply_fn(&f, &term(algebra_types::op(&l.t_op, vec![nullary(&l.int_op)]))).is_err());
}

#[test]
fn variable() {
    // wrap = forall x. x -> T(x)
    let l = lattice();
    let t = l.t_op.clone();
    let wrap = Schema::new(1, move |vars| {
        Term::new(
            PlainTerm::op(algebra_types::function(), vec![vars[0].clone(), PlainTerm::op(t.clone(), vec![vars[0].clone()])]),
            vec![],
        )
    });
    let instance = wrap.instance(&[]);
    let result = apply_fn(&instance, &term(nullary(&l.int_op))).unwrap();
    assert_eq!(format!("{result}"), "T(Int)");
}

#[test]
fn compose() {
    // compose = forall x y z. (y -> z) -> (x -> y) -> (x -> z)
    let compose = Schema::new(3, |vars| {
        let (x, y, z) = (vars[0].clone(), vars[1].clone(), vars[2].clone());
        Term::new(
            PlainTerm::op(
                algebra_types::function(),
                vec![
                    PlainTerm::op(algebra_types::function(), vec![y.clone(), z.clone()]),
                    PlainTerm::op(
                        algebra_types::function(),
                        vec![
                            PlainTerm::op(algebra_types::function(), vec![x.clone(), y]),
                            PlainTerm::op(algebra_types::function(), vec![x, z]),
                        ],
                    ),
                ],
            ),
            vec![],
        )
    });
    let l = lattice();
    let f = arrow(term(nullary(&l.int_op)), term(nullary(&l.bool_op)));
    let g = arrow(term(nullary(&l.str_op)), term(nullary(&l.int_op)));
    let instance = compose.instance(&[]);
    let step1 = apply_fn(&instance, &f).unwrap();
    let step2 = apply_fn(&step1, &g).unwrap();
    assert_eq!(format!("{step2}"), "Str ** Bool");
}

#[test]
fn compose_subtype() {
    // Same `compose` schema, applied to operands related by a UInt<:Int
    // narrowing in the second slot.
    let compose = Schema::new(3, |vars| {
        let (x, y, z) = (vars[0].clone(), vars[1].clone(), vars[2].clone());
        Term::new(
            PlainTerm::op(
                algebra_types::function(),
                vec![
                    PlainTerm::op(algebra_types::function(), vec![y.clone(), z.clone()]),
                    PlainTerm::op(
                        algebra_types::function(),
                        vec![
                            PlainTerm::op(algebra_types::function(), vec![x.clone(), y]),
                            PlainTerm::op(algebra_types::function(), vec![x, z]),
                        ],
                    ),
                ],
            ),
            vec![],
        )
    });
    let l = lattice();
    let f = arrow(term(nullary(&l.int_op)), term(nullary(&l.bool_op)));
    let g = arrow(term(nullary(&l.uint_op)), term(nullary(&l.int_op)));
    let instance = compose.instance(&[]);
    let step1 = apply_fn(&instance, &f).unwrap();
    let step2 = apply_fn(&step1, &g).unwrap();
    assert_eq!(format!("{step2}"), "UInt ** Bool");
}

/// The reference implementation's own author flags this scenario as
/// possibly wrong (`@unittest.skip("I think this one is not correct.")`);
/// kept here, skipped, as the documented record of that open question
/// rather than silently baking in today's behavior. See `DESIGN.md`.
#[test]
#[ignore = "reference implementation's author: \"I think this one is not correct\" (see DESIGN.md Open Question decisions)"]
fn variable_subtype_match() {
    let l = lattice();
    let any = l.any.clone();
    let f = Schema::new(1, move |vars| {
        let x = vars[0].clone();
        Term::new(
            PlainTerm::op(
                algebra_types::function(),
                vec![PlainTerm::op(algebra_types::function(), vec![x.clone(), nullary(&any)]), x],
            ),
            vec![],
        )
    });
    let instance = f.instance(&[]);
    let arg = arrow(term(nullary(&l.int_op)), term(nullary(&l.int_op)));
    let result = apply_fn(&instance, &arg).unwrap();
    assert_eq!(format!("{result}"), "Int");
}

#[test]
fn variable_subtype_mismatch() {
    // f = forall x. (x -> Int) -> x, applied to (Int -> Any): the
    // covariant codomain check requires Any <: Int, which fails.
    let l = lattice();
    let int_op = l.int_op.clone();
    let f = Schema::new(1, move |vars| {
        let x = vars[0].clone();
        Term::new(
            PlainTerm::op(
                algebra_types::function(),
                vec![PlainTerm::op(algebra_types::function(), vec![x.clone(), nullary(&int_op)]), x],
            ),
            vec![],
        )
    });
    let instance = f.instance(&[]);
    let arg = arrow(term(nullary(&l.int_op)), term(nullary(&l.any)));
    let result = apply_fn(&instance, &arg);
    assert!(matches!(result, Err(TypeError::SubtypeMismatch { .. })));
}

#[test]
fn weird_swap() {
    // swap = forall a b c. (a -> b -> c) -> (b -> a -> c), applied to
    // Int -> Int -> Int and then to UInt, UInt: spec.md §8 scenario 4,
    // also `original_source/tests/test_type.py::test_weird`.
    let swap = Schema::new(3, |vars| {
        let (a, b, c) = (vars[0].clone(), vars[1].clone(), vars[2].clone());
        let inner_ab = PlainTerm::op(algebra_types::function(), vec![a.clone(), b.clone()]);
        let inner_abc = PlainTerm::op(algebra_types::function(), vec![inner_ab, c.clone()]);
        let inner_ba = PlainTerm::op(algebra_types::function(), vec![b, a]);
        let inner_bac = PlainTerm::op(algebra_types::function(), vec![inner_ba, c]);
        Term::new(PlainTerm::op(algebra_types::function(), vec![inner_abc, inner_bac]), vec![])
    });
    let l = lattice();
    let f = arrow(term(nullary(&l.int_op)), arrow(term(nullary(&l.int_op)), term(nullary(&l.int_op))));
    let instance = swap.instance(&[]);
    let swapped = apply_fn(&instance, &f).unwrap();
    assert_eq!(format!("{swapped}"), "Int ** Int ** Int");
    let step1 = apply_fn(&swapped, &term(nullary(&l.uint_op))).unwrap();
    let step2 = apply_fn(&step1, &term(nullary(&l.uint_op))).unwrap();
    assert_eq!(format!("{step2}"), "Int");
}

#[test]
fn functions_as_arguments() {
    // identity_on_functions = forall a b. (a -> b) -> (a -> b)
    let identity_on_functions = Schema::new(2, |vars| {
        let (a, b) = (vars[0].clone(), vars[1].clone());
        let shape = PlainTerm::op(algebra_types::function(), vec![a, b]);
        Term::new(PlainTerm::op(algebra_types::function(), vec![shape.clone(), shape]), vec![])
    });
    let l = lattice();
    let f = arrow(term(nullary(&l.int_op)), term(nullary(&l.bool_op)));
    let instance = identity_on_functions.instance(&[]);
    let result = apply_fn(&instance, &f).unwrap();
    assert_eq!(format!("{result}"), "Int ** Bool");
}

#[test]
fn order_of_subtype_application() {
    // leq = forall a. a -> a -> Bool, applied Int then UInt and, separately,
    // UInt then Int: both orders tighten the shared variable to the same
    // bound (its lower bound ends up `Int` either way).
    let l = lattice();
    let bool_op1 = l.bool_op.clone();
    let leq1 = Schema::new(1, move |vars| {
        let a = vars[0].clone();
        let inner = PlainTerm::op(algebra_types::function(), vec![a.clone(), nullary(&bool_op1)]);
        Term::new(PlainTerm::op(algebra_types::function(), vec![a, inner]), vec![])
    });
    let forward = apply_fn(&leq1.instance(&[]), &term(nullary(&l.int_op))).unwrap();
    assert_eq!(format!("{forward}"), "x ** Bool | Int << x");
    let forward = apply_fn(&forward, &term(nullary(&l.uint_op))).unwrap();
    assert_eq!(format!("{forward}"), "Bool");

    let bool_op2 = l.bool_op.clone();
    let leq2 = Schema::new(1, move |vars| {
        let a = vars[0].clone();
        let inner = PlainTerm::op(algebra_types::function(), vec![a.clone(), nullary(&bool_op2)]);
        Term::new(PlainTerm::op(algebra_types::function(), vec![a, inner]), vec![])
    });
    let backward = apply_fn(&leq2.instance(&[]), &term(nullary(&l.uint_op))).unwrap();
    assert_eq!(format!("{backward}"), "x ** Bool | UInt << x");
    let backward = apply_fn(&backward, &term(nullary(&l.int_op))).unwrap();
    assert_eq!(format!("{backward}"), "Bool", "converges to the same final bound regardless of application order");

    // A third application with operands from unrelated lineages: having
    // tightened `a`'s lower bound to `Int`, tightening it again to `Bool`
    // must fail rather than silently widen.
    let bool_op3 = l.bool_op.clone();
    let leq3 = Schema::new(1, move |vars| {
        let a = vars[0].clone();
        let inner = PlainTerm::op(algebra_types::function(), vec![a.clone(), nullary(&bool_op3)]);
        Term::new(PlainTerm::op(algebra_types::function(), vec![a, inner]), vec![])
    });
    let applied = apply_fn(&leq3.instance(&[]), &term(nullary(&l.int_op))).unwrap();
    let result = apply_fn(&applied, &term(nullary(&l.bool_op)));
    assert!(matches!(result, Err(TypeError::SubtypeMismatch { .. })));
}

#[test]
fn order_of_subtype_application_with_constraints() {
    // Same scenario, but the shared variable also carries a Member
    // constraint (a @ [Ord, Bool]) that must stay pending, never violated,
    // across both applications -- `a`'s bound only ever tightens towards
    // Int, which is compatible with the Ord alternative.
    let l = lattice();
    let bool_op = l.bool_op.clone();
    let ord = l.ord.clone();
    let leq = Schema::new(1, move |vars| {
        let a = vars[0].clone();
        let inner = PlainTerm::op(algebra_types::function(), vec![a.clone(), nullary(&bool_op)]);
        with_constraint(
            Term::new(PlainTerm::op(algebra_types::function(), vec![a.clone(), inner]), vec![]),
            member(a, vec![nullary(&ord), nullary(&bool_op)]),
        )
    });
    let applied = apply_fn(&leq.instance(&[]), &term(nullary(&l.int_op))).unwrap();
    let applied = apply_fn(&applied, &term(nullary(&l.uint_op))).unwrap();
    assert_eq!(format!("{}", applied.plain), "Bool");

    // Applied to Any in one step instead: `a`'s lower bound becomes Any,
    // which is not a subtype of either alternative, so every alternative
    // is definitively ruled out without needing `a` to be fully resolved.
    let applied_any = apply_fn(&leq.instance(&[]), &term(nullary(&l.any)));
    assert!(matches!(applied_any, Err(TypeError::ViolatedConstraint(_))));
}

#[test]
fn constraint() {
    // sum = forall a. a -> a | a @ [Int, Set(Int)]
    let l = lattice();
    let set_op = l.set_op.clone();
    let int_op = l.int_op.clone();
    let sum = Schema::new(1, move |vars| {
        let a = vars[0].clone();
        let alternatives = vec![nullary(&int_op), PlainTerm::op(set_op.clone(), vec![nullary(&int_op)])];
        with_constraint(
            Term::new(PlainTerm::op(algebra_types::function(), vec![a.clone(), a.clone()]), vec![]),
            member(a, alternatives),
        )
    });
    let result = apply_fn(&sum.instance(&[]), &term(nullary(&l.int_op))).unwrap();
    assert!(result.constraints.is_empty());

    // A disjoint operator falsifies every alternative.
    let str_fail = Operator::new("Str", 0, None);
    let err = apply_fn(&sum.instance(&[]), &term(nullary(&str_fail)));
    assert!(matches!(err, Err(TypeError::ViolatedConstraint(_))));
}

#[test]
fn preserve_subtypes() {
    // f = forall x. x -> x | x @ [Any]
    let l = lattice();
    let any = l.any.clone();
    let f_schema = Schema::new(1, move |vars| {
        let a = vars[0].clone();
        with_constraint(
            Term::new(PlainTerm::op(algebra_types::function(), vec![a.clone(), a]), vec![]),
            member(vars[0].clone(), vec![nullary(&any)]),
        )
    });
    let result = apply_fn(&f_schema.instance(&[]), &term(nullary(&l.uint_op))).unwrap();
    assert_eq!(format!("{result}"), "UInt", "subtype information must not be widened to Int");
}
