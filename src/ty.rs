//! The PHP type algebra.
//!
//! This module defines [`Type`], a closed set of immutable node kinds
//! covering the extended PHP type grammar: native hints, PHPStan/Psalm
//! scalar refinements, literal types, array/object shapes, callables,
//! generics, templates, and conditional types.
//!
//! Every node is a plain value — two nodes with equal structure compare
//! equal and print identically. Composite nodes own their children
//! outright, so a type is always a tree: templates and aliases refer to
//! *names* that are resolved lazily by the reflection layer, never to
//! embedded subtrees, which is what keeps the structure acyclic.
//!
//! Construction goes through the [`crate::types`] factory in normal code;
//! the enum itself stays public so that visitors and rewriters can match
//! exhaustively.

use serde::{Deserialize, Serialize};

/// A node in the PHP type algebra.
///
/// The set of variants is closed: external code cannot add kinds, and
/// every consumer (stringifier, resolvers, analyses) matches all of them
/// through [`crate::visitor::TypeVisitor`] or
/// [`crate::rewrite::TypeRewriter`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// `never` — the bottom type.
    Never,
    /// `void` — absence of a return value.
    Void,
    /// `null`.
    Null,
    /// The `true` literal type.
    True,
    /// The `false` literal type.
    False,
    /// `bool`.
    Bool,
    /// `int` with no range restriction.
    Int,
    /// `float`.
    Float,
    /// `string`.
    String,
    /// `numeric-string` — a string holding a numeric value.
    NumericString,
    /// `non-empty-string`.
    NonEmptyString,
    /// `object` — any object, of no particular class.
    Object,
    /// `mixed` — the top type.
    Mixed,
    /// `resource`.
    Resource,

    /// A literal integer type, e.g. `42`.
    IntLiteral(i64),
    /// A literal float type, e.g. `0.5`.
    FloatLiteral(FloatValue),
    /// A literal string type, e.g. `'created'`.
    StringLiteral(String),
    /// A known class-string value, e.g. `Acme\User::class`.
    ClassStringLiteral(String),
    /// `int<min, max>` — an integer range. An absent bound is unbounded.
    /// The factory folds the doubly-unbounded form back to [`Type::Int`].
    IntRange {
        min: Option<i64>,
        max: Option<i64>,
    },

    /// `array<K, V>`.
    Array {
        key: Box<Type>,
        value: Box<Type>,
    },
    /// `list<V>` — an array with sequential integer keys from zero.
    List {
        value: Box<Type>,
    },
    /// `iterable<K, V>`.
    Iterable {
        key: Box<Type>,
        value: Box<Type>,
    },
    /// A non-emptiness refinement wrapping an array, list, or string type.
    NonEmpty(Box<Type>),
    /// `array{k: T, ...}` — an array shape with per-key types.
    /// `sealed == true` means no keys beyond the declared ones are allowed.
    ArrayShape {
        elements: Vec<(ShapeKey, ShapeElement)>,
        sealed: bool,
    },
    /// `object{k: T, ...}` — an object shape.
    ObjectShape {
        elements: Vec<(ShapeKey, ShapeElement)>,
        sealed: bool,
    },

    /// `callable(T, U=, V...): R`.
    Callable {
        parameters: Vec<CallableParameter>,
        return_type: Box<Type>,
    },
    /// `Closure(T): R` — like [`Type::Callable`] but specifically a
    /// `\Closure` instance.
    Closure {
        parameters: Vec<CallableParameter>,
        return_type: Box<Type>,
    },

    /// An object of a named class, possibly with template arguments:
    /// `Collection<int, User>`.
    NamedObject {
        class: String,
        arguments: Vec<Type>,
    },
    /// `static` — the class is resolved at the call site (late static
    /// binding), possibly carrying template arguments.
    Static {
        arguments: Vec<Type>,
    },
    /// `self` — the declaring class.
    Self_ {
        arguments: Vec<Type>,
    },
    /// `parent` — the declaring class's parent.
    Parent {
        arguments: Vec<Type>,
    },
    /// `class-string` or `class-string<T>`.
    ClassString(Option<Box<Type>>),

    /// `T|U|…` — at least two members.
    Union(Vec<Type>),
    /// `T&U&…` — at least two members.
    Intersection(Vec<Type>),

    /// A global constant reference, e.g. `PHP_INT_MAX`.
    Constant(String),
    /// A class constant reference, e.g. `Order::STATUS_OPEN`.
    ClassConstant {
        class: String,
        constant: String,
    },
    /// A template parameter occurrence, e.g. `T`.
    Template(TemplateType),
    /// `(subject is pattern ? then : otherwise)`.
    Conditional {
        subject: Box<Type>,
        is: Box<Type>,
        then: Box<Type>,
        otherwise: Box<Type>,
    },
    /// `key-of<T>`.
    KeyOf(Box<Type>),
    /// `value-of<T>`.
    ValueOf(Box<Type>),
    /// `T[K]` — the type at offset `K` of `T`.
    Offset {
        subject: Box<Type>,
        offset: Box<Type>,
    },
    /// A reference to a `@phpstan-type` alias declared on a class,
    /// resolved lazily through the reflector.
    Alias {
        class: String,
        name: String,
    },
    /// A call-site variance annotation wrapping a template argument,
    /// e.g. `covariant int` in `Collection<covariant int>`.
    VarianceAware {
        variance: Variance,
        inner: Box<Type>,
    },
}

/// A key of an array or object shape: either positional or named.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKey {
    Int(i64),
    String(String),
}

impl From<i64> for ShapeKey {
    fn from(key: i64) -> Self {
        ShapeKey::Int(key)
    }
}

impl From<&str> for ShapeKey {
    fn from(key: &str) -> Self {
        ShapeKey::String(key.to_string())
    }
}

impl From<String> for ShapeKey {
    fn from(key: String) -> Self {
        ShapeKey::String(key)
    }
}

/// A single member of an array/object shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeElement {
    pub ty: Type,
    /// Whether the key may be absent (`key?: T`).
    pub optional: bool,
}

impl ShapeElement {
    pub fn required(ty: Type) -> Self {
        Self {
            ty,
            optional: false,
        }
    }

    pub fn optional(ty: Type) -> Self {
        Self { ty, optional: true }
    }
}

/// A parameter of a callable/closure type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallableParameter {
    pub ty: Type,
    /// Whether the parameter has a default value (`T=` in the notation).
    pub has_default: bool,
    /// Whether the parameter is variadic (`T...`).
    pub variadic: bool,
    /// Whether the parameter is passed by reference.
    pub by_reference: bool,
    /// Optional parameter name. Names are not part of the printed
    /// notation; they exist for diagnostics only.
    pub name: Option<String>,
}

impl CallableParameter {
    /// A plain required, by-value, unnamed parameter.
    pub fn new(ty: Type) -> Self {
        Self {
            ty,
            has_default: false,
            variadic: false,
            by_reference: false,
            name: None,
        }
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }
}

/// A template parameter occurrence inside a type tree.
///
/// Carries everything a resolver needs without consulting the declaring
/// entity again: the name, where it was declared, and the constraint to
/// fall back to when no argument is bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateType {
    pub name: String,
    pub declared_at: TemplateScope,
    pub constraint: Box<Type>,
}

/// The declaration site of a template parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateScope {
    AtClass(String),
    AtMethod(String, String),
    AtFunction(String),
}

/// How a template argument relates to subtyping of the parameterized type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variance {
    Invariant,
    Covariant,
    Contravariant,
    Bivariant,
}

/// A float with bitwise equality and hashing so that literal float types
/// can participate in the algebra's structural equality.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FloatValue(pub f64);

impl PartialEq for FloatValue {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatValue {}

impl std::hash::Hash for FloatValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl From<f64> for FloatValue {
    fn from(value: f64) -> Self {
        FloatValue(value)
    }
}

impl std::fmt::Display for FloatValue {
    /// Prints with a trailing `.0` when the value has no fractional or
    /// exponent part, so a float literal never reads as an int literal.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let repr = format!("{}", self.0);
        if repr.contains('.') || repr.contains('e') || repr.contains("inf") || repr.contains("NaN")
        {
            write!(f, "{repr}")
        } else {
            write!(f, "{repr}.0")
        }
    }
}
