//! Canonical constructors for the type algebra.
//!
//! All construction of [`Type`] values in normal code goes through this
//! module. The functions are total, side-effect-free structural builders;
//! the only failures are the stated arity invariants on `union` and
//! `intersection`, which are programming errors and panic.
//!
//! Smart constructors fold degenerate forms so that equal types have one
//! canonical shape: `int_range(None, None)` is plain `int`, `nullable(T)`
//! is `null|T`, and the common no-argument container shapes come from
//! process-wide cached instances.

use once_cell::sync::Lazy;

use crate::ty::{
    CallableParameter, FloatValue, ShapeElement, ShapeKey, TemplateScope, TemplateType, Type,
    Variance,
};

// ─── Nullary scalars and markers ────────────────────────────────────────────

pub fn never() -> Type {
    Type::Never
}

pub fn void() -> Type {
    Type::Void
}

pub fn null() -> Type {
    Type::Null
}

pub fn true_() -> Type {
    Type::True
}

pub fn false_() -> Type {
    Type::False
}

pub fn bool_() -> Type {
    Type::Bool
}

pub fn int() -> Type {
    Type::Int
}

pub fn float() -> Type {
    Type::Float
}

pub fn string() -> Type {
    Type::String
}

pub fn numeric_string() -> Type {
    Type::NumericString
}

pub fn non_empty_string() -> Type {
    Type::NonEmptyString
}

pub fn object() -> Type {
    Type::Object
}

pub fn mixed() -> Type {
    Type::Mixed
}

pub fn resource() -> Type {
    Type::Resource
}

/// The canonical `array-key` type: `int|string`.
pub fn array_key() -> Type {
    static ARRAY_KEY: Lazy<Type> = Lazy::new(|| Type::Union(vec![Type::Int, Type::String]));
    ARRAY_KEY.clone()
}

/// The canonical `scalar` type: `bool|int|float|string`.
pub fn scalar() -> Type {
    static SCALAR: Lazy<Type> =
        Lazy::new(|| Type::Union(vec![Type::Bool, Type::Int, Type::Float, Type::String]));
    SCALAR.clone()
}

// ─── Literals ───────────────────────────────────────────────────────────────

pub fn int_literal(value: i64) -> Type {
    Type::IntLiteral(value)
}

pub fn float_literal(value: f64) -> Type {
    Type::FloatLiteral(FloatValue(value))
}

pub fn string_literal(value: impl Into<String>) -> Type {
    Type::StringLiteral(value.into())
}

/// A `Foo::class` literal.
pub fn class_string_literal(class: impl Into<String>) -> Type {
    Type::ClassStringLiteral(class.into())
}

/// A host value that maps onto a literal type.
pub enum LiteralValue {
    Int(i64),
    Float(f64),
    String(String),
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        LiteralValue::Int(value)
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        LiteralValue::Float(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        LiteralValue::String(value.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(value: String) -> Self {
        LiteralValue::String(value)
    }
}

/// Build the literal type matching the kind of the given value.
pub fn literal(value: impl Into<LiteralValue>) -> Type {
    match value.into() {
        LiteralValue::Int(value) => int_literal(value),
        LiteralValue::Float(value) => float_literal(value),
        LiteralValue::String(value) => string_literal(value),
    }
}

/// `int<min, max>`. The doubly-unbounded range is just `int`.
pub fn int_range(min: Option<i64>, max: Option<i64>) -> Type {
    if min.is_none() && max.is_none() {
        return Type::Int;
    }
    Type::IntRange { min, max }
}

/// `int<1, max>`.
pub fn positive_int() -> Type {
    int_range(Some(1), None)
}

/// `int<min, -1>`.
pub fn negative_int() -> Type {
    int_range(None, Some(-1))
}

// ─── Containers ─────────────────────────────────────────────────────────────

/// Plain `array` — `array<array-key, mixed>`.
pub fn array() -> Type {
    static ARRAY: Lazy<Type> = Lazy::new(|| Type::Array {
        key: Box::new(Type::Union(vec![Type::Int, Type::String])),
        value: Box::new(Type::Mixed),
    });
    ARRAY.clone()
}

pub fn array_of(key: Type, value: Type) -> Type {
    Type::Array {
        key: Box::new(key),
        value: Box::new(value),
    }
}

/// `array<V>` — value type with the default `array-key` key.
pub fn array_of_value(value: Type) -> Type {
    array_of(array_key(), value)
}

/// Plain `list` — `list<mixed>`.
pub fn list() -> Type {
    static LIST: Lazy<Type> = Lazy::new(|| Type::List {
        value: Box::new(Type::Mixed),
    });
    LIST.clone()
}

pub fn list_of(value: Type) -> Type {
    Type::List {
        value: Box::new(value),
    }
}

/// Plain `iterable` — `iterable<mixed, mixed>`.
pub fn iterable() -> Type {
    static ITERABLE: Lazy<Type> = Lazy::new(|| Type::Iterable {
        key: Box::new(Type::Mixed),
        value: Box::new(Type::Mixed),
    });
    ITERABLE.clone()
}

pub fn iterable_of(key: Type, value: Type) -> Type {
    Type::Iterable {
        key: Box::new(key),
        value: Box::new(value),
    }
}

/// Wrap a type in the non-emptiness refinement. The string forms fold
/// into the dedicated `non-empty-string` kind, which is what the
/// wrapper would print as anyway.
pub fn non_empty(inner: Type) -> Type {
    match inner {
        Type::String | Type::NonEmptyString => Type::NonEmptyString,
        inner => Type::NonEmpty(Box::new(inner)),
    }
}

/// `non-empty-array<array-key, mixed>`.
pub fn non_empty_array() -> Type {
    non_empty(array())
}

/// `non-empty-list<mixed>`.
pub fn non_empty_list() -> Type {
    non_empty(list())
}

/// A sealed array shape from `(key, element)` pairs in declared order.
pub fn array_shape(elements: Vec<(ShapeKey, ShapeElement)>) -> Type {
    Type::ArrayShape {
        elements,
        sealed: true,
    }
}

/// An unsealed array shape (`array{…, ...}`).
pub fn unsealed_array_shape(elements: Vec<(ShapeKey, ShapeElement)>) -> Type {
    Type::ArrayShape {
        elements,
        sealed: false,
    }
}

/// A sealed array shape with positional keys `0..n`, all required.
pub fn list_shape(types: Vec<Type>) -> Type {
    let elements = types
        .into_iter()
        .enumerate()
        .map(|(index, ty)| (ShapeKey::Int(index as i64), ShapeElement::required(ty)))
        .collect();
    array_shape(elements)
}

/// A sealed object shape.
pub fn object_shape(elements: Vec<(ShapeKey, ShapeElement)>) -> Type {
    Type::ObjectShape {
        elements,
        sealed: true,
    }
}

// ─── Callables ──────────────────────────────────────────────────────────────

/// Plain `callable` — no parameters, `mixed` return.
pub fn callable() -> Type {
    static CALLABLE: Lazy<Type> = Lazy::new(|| Type::Callable {
        parameters: Vec::new(),
        return_type: Box::new(Type::Mixed),
    });
    CALLABLE.clone()
}

pub fn callable_with(parameters: Vec<CallableParameter>, return_type: Type) -> Type {
    Type::Callable {
        parameters,
        return_type: Box::new(return_type),
    }
}

/// Plain `Closure` — no parameters, `mixed` return.
pub fn closure() -> Type {
    static CLOSURE: Lazy<Type> = Lazy::new(|| Type::Closure {
        parameters: Vec::new(),
        return_type: Box::new(Type::Mixed),
    });
    CLOSURE.clone()
}

pub fn closure_with(parameters: Vec<CallableParameter>, return_type: Type) -> Type {
    Type::Closure {
        parameters,
        return_type: Box::new(return_type),
    }
}

/// A plain required callable parameter.
pub fn param(ty: Type) -> CallableParameter {
    CallableParameter::new(ty)
}

// ─── Named and generic types ────────────────────────────────────────────────

/// An object of the given class with template arguments.
///
/// Panics if the class name is empty — a type with a required name must
/// have one.
pub fn named_object(class: impl Into<String>, arguments: Vec<Type>) -> Type {
    let class = class.into();
    assert!(!class.is_empty(), "class name must not be empty");
    Type::NamedObject { class, arguments }
}

/// An object of the given class with no template arguments.
pub fn object_of(class: impl Into<String>) -> Type {
    named_object(class, Vec::new())
}

pub fn static_(arguments: Vec<Type>) -> Type {
    Type::Static { arguments }
}

pub fn self_(arguments: Vec<Type>) -> Type {
    Type::Self_ { arguments }
}

pub fn parent_(arguments: Vec<Type>) -> Type {
    Type::Parent { arguments }
}

/// `class-string`.
pub fn class_string() -> Type {
    Type::ClassString(None)
}

/// `class-string<T>`.
pub fn class_string_of(object: Type) -> Type {
    Type::ClassString(Some(Box::new(object)))
}

// ─── Combinators ────────────────────────────────────────────────────────────

/// A union of at least two members.
///
/// Panics when fewer than two members are supplied; that is a structural
/// invariant violation, not a recoverable condition.
pub fn union(members: Vec<Type>) -> Type {
    assert!(
        members.len() >= 2,
        "a union type requires at least 2 members, got {}",
        members.len()
    );
    Type::Union(members)
}

/// An intersection of at least two members.
///
/// Panics when fewer than two members are supplied.
pub fn intersection(members: Vec<Type>) -> Type {
    assert!(
        members.len() >= 2,
        "an intersection type requires at least 2 members, got {}",
        members.len()
    );
    Type::Intersection(members)
}

/// `?T` — sugar for `null|T`.
pub fn nullable(ty: Type) -> Type {
    union(vec![null(), ty])
}

// ─── Symbolic and deferred types ────────────────────────────────────────────

pub fn constant(name: impl Into<String>) -> Type {
    let name = name.into();
    assert!(!name.is_empty(), "constant name must not be empty");
    Type::Constant(name)
}

pub fn class_constant(class: impl Into<String>, constant: impl Into<String>) -> Type {
    Type::ClassConstant {
        class: class.into(),
        constant: constant.into(),
    }
}

/// A template occurrence with an explicit constraint.
pub fn template(name: impl Into<String>, declared_at: TemplateScope, constraint: Type) -> Type {
    Type::Template(TemplateType {
        name: name.into(),
        declared_at,
        constraint: Box::new(constraint),
    })
}

/// A template occurrence constrained by `mixed`.
pub fn unconstrained_template(name: impl Into<String>, declared_at: TemplateScope) -> Type {
    template(name, declared_at, mixed())
}

pub fn conditional(subject: Type, is: Type, then: Type, otherwise: Type) -> Type {
    Type::Conditional {
        subject: Box::new(subject),
        is: Box::new(is),
        then: Box::new(then),
        otherwise: Box::new(otherwise),
    }
}

pub fn key_of(inner: Type) -> Type {
    Type::KeyOf(Box::new(inner))
}

pub fn value_of(inner: Type) -> Type {
    Type::ValueOf(Box::new(inner))
}

pub fn offset(subject: Type, offset: Type) -> Type {
    Type::Offset {
        subject: Box::new(subject),
        offset: Box::new(offset),
    }
}

pub fn alias(class: impl Into<String>, name: impl Into<String>) -> Type {
    Type::Alias {
        class: class.into(),
        name: name.into(),
    }
}

/// Annotate a type with an explicit variance. Invariant is the default
/// and carries no notation, so the wrapper folds away.
pub fn variance_aware(variance: Variance, inner: Type) -> Type {
    if variance == Variance::Invariant {
        return inner;
    }
    Type::VarianceAware {
        variance,
        inner: Box::new(inner),
    }
}

pub fn covariant(inner: Type) -> Type {
    variance_aware(Variance::Covariant, inner)
}

pub fn contravariant(inner: Type) -> Type {
    variance_aware(Variance::Contravariant, inner)
}
