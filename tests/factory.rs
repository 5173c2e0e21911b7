//! Factory constructor invariants.

use typelens::ty::{Type, Variance};
use typelens::types;

// ─── Canonical folds ────────────────────────────────────────────────────────

#[test]
fn unbounded_range_folds_to_int() {
    assert_eq!(types::int_range(None, None), Type::Int);
    assert!(matches!(
        types::int_range(Some(0), None),
        Type::IntRange { min: Some(0), max: None }
    ));
}

#[test]
fn array_key_is_int_or_string() {
    assert_eq!(
        types::array_key(),
        Type::Union(vec![Type::Int, Type::String])
    );
}

#[test]
fn scalar_members_in_declared_order() {
    assert_eq!(
        types::scalar(),
        Type::Union(vec![Type::Bool, Type::Int, Type::Float, Type::String])
    );
}

#[test]
fn plain_array_defaults() {
    assert_eq!(
        types::array(),
        types::array_of(types::array_key(), types::mixed())
    );
    assert_eq!(types::list(), types::list_of(types::mixed()));
    assert_eq!(
        types::iterable(),
        types::iterable_of(types::mixed(), types::mixed())
    );
}

#[test]
fn bare_callables_take_anything_return_mixed() {
    assert_eq!(
        types::callable(),
        types::callable_with(Vec::new(), types::mixed())
    );
    assert_eq!(
        types::closure(),
        types::closure_with(Vec::new(), types::mixed())
    );
}

// ─── Sugar ──────────────────────────────────────────────────────────────────

#[test]
fn nullable_is_null_first_union() {
    assert_eq!(
        types::nullable(types::string()),
        types::union(vec![types::null(), types::string()])
    );
}

#[test]
fn non_empty_composes() {
    assert_eq!(
        types::non_empty_list(),
        types::non_empty(types::list())
    );
    assert_eq!(
        types::non_empty_array(),
        types::non_empty(types::array())
    );
}

/// `non-empty-string` has its own node kind; wrapping `string` must
/// produce it, not a wrapper that prints the same but compares unequal.
#[test]
fn non_empty_string_folds_to_its_own_kind() {
    assert_eq!(types::non_empty(types::string()), Type::NonEmptyString);
    assert_eq!(
        types::non_empty(types::non_empty_string()),
        Type::NonEmptyString
    );
    assert!(matches!(types::non_empty(types::list()), Type::NonEmpty(_)));
}

/// Invariance is the default and has no notation, so the wrapper folds
/// away at construction.
#[test]
fn invariant_wrappers_fold_to_the_inner_type() {
    assert_eq!(
        types::variance_aware(Variance::Invariant, types::int()),
        Type::Int
    );
    assert!(matches!(
        types::covariant(types::int()),
        Type::VarianceAware { variance: Variance::Covariant, .. }
    ));
}

#[test]
fn literal_dispatches_on_value_kind() {
    assert_eq!(types::literal(42), types::int_literal(42));
    assert_eq!(types::literal(0.5), types::float_literal(0.5));
    assert_eq!(types::literal("done"), types::string_literal("done"));
}

#[test]
fn list_shape_keys_are_sequential() {
    let shape = types::list_shape(vec![types::int(), types::string()]);
    let Type::ArrayShape { elements, sealed } = shape else {
        panic!("expected an array shape");
    };
    assert!(sealed);
    let keys: Vec<_> = elements.iter().map(|(key, _)| key.clone()).collect();
    assert_eq!(keys, vec![0.into(), 1.into()]);
}

// ─── Structural equality ────────────────────────────────────────────────────

#[test]
fn float_literals_compare_bitwise() {
    assert_eq!(types::float_literal(1.5), types::float_literal(1.5));
    assert_ne!(types::float_literal(1.5), types::float_literal(2.5));
    // NaN is equal to itself under bitwise comparison.
    assert_eq!(types::float_literal(f64::NAN), types::float_literal(f64::NAN));
}

#[test]
fn union_order_is_significant() {
    assert_ne!(
        types::union(vec![types::int(), types::string()]),
        types::union(vec![types::string(), types::int()])
    );
}

// ─── Arity invariants ───────────────────────────────────────────────────────

#[test]
#[should_panic(expected = "a union type requires at least 2 members, got 1")]
fn union_requires_two_members() {
    types::union(vec![types::int()]);
}

#[test]
#[should_panic(expected = "an intersection type requires at least 2 members, got 0")]
fn intersection_requires_two_members() {
    types::intersection(Vec::new());
}

#[test]
#[should_panic(expected = "class name must not be empty")]
fn named_object_requires_a_name() {
    types::named_object("", Vec::new());
}
