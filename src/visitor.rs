//! Double-dispatch visitor protocol over the type algebra.
//!
//! [`TypeVisitor`] has one method per [`Type`] kind. Each method receives
//! the node *and* its decomposed constituents (e.g. the array method gets
//! the key and value types directly), so a visitor can recurse without
//! re-inspecting the node. Every per-kind method has a provided body that
//! routes to a single [`TypeVisitor::default`] hook — a narrow analysis
//! (e.g. "is this a union?") overrides only the cases it cares about while
//! the compiler still guarantees totality over all kinds.

use crate::ty::{
    CallableParameter, FloatValue, ShapeElement, ShapeKey, TemplateType, Type, Variance,
};

/// A total case analysis over every [`Type`] kind.
///
/// Implementers must provide [`TypeVisitor::default`]; every other method
/// defaults to it. Dispatch happens through [`Type::accept`].
#[allow(unused_variables)]
pub trait TypeVisitor {
    type Output;

    /// The single fallback every unhandled kind routes through.
    fn default(&mut self, ty: &Type) -> Self::Output;

    fn visit_never(&mut self, ty: &Type) -> Self::Output {
        self.default(ty)
    }

    fn visit_void(&mut self, ty: &Type) -> Self::Output {
        self.default(ty)
    }

    fn visit_null(&mut self, ty: &Type) -> Self::Output {
        self.default(ty)
    }

    fn visit_true(&mut self, ty: &Type) -> Self::Output {
        self.default(ty)
    }

    fn visit_false(&mut self, ty: &Type) -> Self::Output {
        self.default(ty)
    }

    fn visit_bool(&mut self, ty: &Type) -> Self::Output {
        self.default(ty)
    }

    fn visit_int(&mut self, ty: &Type) -> Self::Output {
        self.default(ty)
    }

    fn visit_float(&mut self, ty: &Type) -> Self::Output {
        self.default(ty)
    }

    fn visit_string(&mut self, ty: &Type) -> Self::Output {
        self.default(ty)
    }

    fn visit_numeric_string(&mut self, ty: &Type) -> Self::Output {
        self.default(ty)
    }

    fn visit_non_empty_string(&mut self, ty: &Type) -> Self::Output {
        self.default(ty)
    }

    fn visit_object(&mut self, ty: &Type) -> Self::Output {
        self.default(ty)
    }

    fn visit_mixed(&mut self, ty: &Type) -> Self::Output {
        self.default(ty)
    }

    fn visit_resource(&mut self, ty: &Type) -> Self::Output {
        self.default(ty)
    }

    fn visit_int_literal(&mut self, ty: &Type, value: i64) -> Self::Output {
        self.default(ty)
    }

    fn visit_float_literal(&mut self, ty: &Type, value: FloatValue) -> Self::Output {
        self.default(ty)
    }

    fn visit_string_literal(&mut self, ty: &Type, value: &str) -> Self::Output {
        self.default(ty)
    }

    fn visit_class_string_literal(&mut self, ty: &Type, class: &str) -> Self::Output {
        self.default(ty)
    }

    fn visit_int_range(&mut self, ty: &Type, min: Option<i64>, max: Option<i64>) -> Self::Output {
        self.default(ty)
    }

    fn visit_array(&mut self, ty: &Type, key: &Type, value: &Type) -> Self::Output {
        self.default(ty)
    }

    fn visit_list(&mut self, ty: &Type, value: &Type) -> Self::Output {
        self.default(ty)
    }

    fn visit_iterable(&mut self, ty: &Type, key: &Type, value: &Type) -> Self::Output {
        self.default(ty)
    }

    fn visit_non_empty(&mut self, ty: &Type, inner: &Type) -> Self::Output {
        self.default(ty)
    }

    fn visit_array_shape(
        &mut self,
        ty: &Type,
        elements: &[(ShapeKey, ShapeElement)],
        sealed: bool,
    ) -> Self::Output {
        self.default(ty)
    }

    fn visit_object_shape(
        &mut self,
        ty: &Type,
        elements: &[(ShapeKey, ShapeElement)],
        sealed: bool,
    ) -> Self::Output {
        self.default(ty)
    }

    fn visit_callable(
        &mut self,
        ty: &Type,
        parameters: &[CallableParameter],
        return_type: &Type,
    ) -> Self::Output {
        self.default(ty)
    }

    fn visit_closure(
        &mut self,
        ty: &Type,
        parameters: &[CallableParameter],
        return_type: &Type,
    ) -> Self::Output {
        self.default(ty)
    }

    fn visit_named_object(&mut self, ty: &Type, class: &str, arguments: &[Type]) -> Self::Output {
        self.default(ty)
    }

    fn visit_static(&mut self, ty: &Type, arguments: &[Type]) -> Self::Output {
        self.default(ty)
    }

    fn visit_self(&mut self, ty: &Type, arguments: &[Type]) -> Self::Output {
        self.default(ty)
    }

    fn visit_parent(&mut self, ty: &Type, arguments: &[Type]) -> Self::Output {
        self.default(ty)
    }

    fn visit_class_string(&mut self, ty: &Type, object: Option<&Type>) -> Self::Output {
        self.default(ty)
    }

    fn visit_union(&mut self, ty: &Type, members: &[Type]) -> Self::Output {
        self.default(ty)
    }

    fn visit_intersection(&mut self, ty: &Type, members: &[Type]) -> Self::Output {
        self.default(ty)
    }

    fn visit_constant(&mut self, ty: &Type, name: &str) -> Self::Output {
        self.default(ty)
    }

    fn visit_class_constant(&mut self, ty: &Type, class: &str, constant: &str) -> Self::Output {
        self.default(ty)
    }

    fn visit_template(&mut self, ty: &Type, template: &TemplateType) -> Self::Output {
        self.default(ty)
    }

    fn visit_conditional(
        &mut self,
        ty: &Type,
        subject: &Type,
        is: &Type,
        then: &Type,
        otherwise: &Type,
    ) -> Self::Output {
        self.default(ty)
    }

    fn visit_key_of(&mut self, ty: &Type, inner: &Type) -> Self::Output {
        self.default(ty)
    }

    fn visit_value_of(&mut self, ty: &Type, inner: &Type) -> Self::Output {
        self.default(ty)
    }

    fn visit_offset(&mut self, ty: &Type, subject: &Type, offset: &Type) -> Self::Output {
        self.default(ty)
    }

    fn visit_alias(&mut self, ty: &Type, class: &str, name: &str) -> Self::Output {
        self.default(ty)
    }

    fn visit_variance_aware(
        &mut self,
        ty: &Type,
        variance: Variance,
        inner: &Type,
    ) -> Self::Output {
        self.default(ty)
    }
}

impl Type {
    /// Dispatch to the matching visitor method, passing the node's
    /// decomposed constituents alongside the node itself.
    pub fn accept<V: TypeVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Type::Never => visitor.visit_never(self),
            Type::Void => visitor.visit_void(self),
            Type::Null => visitor.visit_null(self),
            Type::True => visitor.visit_true(self),
            Type::False => visitor.visit_false(self),
            Type::Bool => visitor.visit_bool(self),
            Type::Int => visitor.visit_int(self),
            Type::Float => visitor.visit_float(self),
            Type::String => visitor.visit_string(self),
            Type::NumericString => visitor.visit_numeric_string(self),
            Type::NonEmptyString => visitor.visit_non_empty_string(self),
            Type::Object => visitor.visit_object(self),
            Type::Mixed => visitor.visit_mixed(self),
            Type::Resource => visitor.visit_resource(self),
            Type::IntLiteral(value) => visitor.visit_int_literal(self, *value),
            Type::FloatLiteral(value) => visitor.visit_float_literal(self, *value),
            Type::StringLiteral(value) => visitor.visit_string_literal(self, value),
            Type::ClassStringLiteral(class) => visitor.visit_class_string_literal(self, class),
            Type::IntRange { min, max } => visitor.visit_int_range(self, *min, *max),
            Type::Array { key, value } => visitor.visit_array(self, key, value),
            Type::List { value } => visitor.visit_list(self, value),
            Type::Iterable { key, value } => visitor.visit_iterable(self, key, value),
            Type::NonEmpty(inner) => visitor.visit_non_empty(self, inner),
            Type::ArrayShape { elements, sealed } => {
                visitor.visit_array_shape(self, elements, *sealed)
            }
            Type::ObjectShape { elements, sealed } => {
                visitor.visit_object_shape(self, elements, *sealed)
            }
            Type::Callable {
                parameters,
                return_type,
            } => visitor.visit_callable(self, parameters, return_type),
            Type::Closure {
                parameters,
                return_type,
            } => visitor.visit_closure(self, parameters, return_type),
            Type::NamedObject { class, arguments } => {
                visitor.visit_named_object(self, class, arguments)
            }
            Type::Static { arguments } => visitor.visit_static(self, arguments),
            Type::Self_ { arguments } => visitor.visit_self(self, arguments),
            Type::Parent { arguments } => visitor.visit_parent(self, arguments),
            Type::ClassString(object) => visitor.visit_class_string(self, object.as_deref()),
            Type::Union(members) => visitor.visit_union(self, members),
            Type::Intersection(members) => visitor.visit_intersection(self, members),
            Type::Constant(name) => visitor.visit_constant(self, name),
            Type::ClassConstant { class, constant } => {
                visitor.visit_class_constant(self, class, constant)
            }
            Type::Template(template) => visitor.visit_template(self, template),
            Type::Conditional {
                subject,
                is,
                then,
                otherwise,
            } => visitor.visit_conditional(self, subject, is, then, otherwise),
            Type::KeyOf(inner) => visitor.visit_key_of(self, inner),
            Type::ValueOf(inner) => visitor.visit_value_of(self, inner),
            Type::Offset { subject, offset } => visitor.visit_offset(self, subject, offset),
            Type::Alias { class, name } => visitor.visit_alias(self, class, name),
            Type::VarianceAware { variance, inner } => {
                visitor.visit_variance_aware(self, *variance, inner)
            }
        }
    }
}

// ─── Predicates ─────────────────────────────────────────────────────────────

/// `true` only for [`Type::Union`]; default-false everywhere else.
struct IsUnion;

impl TypeVisitor for IsUnion {
    type Output = bool;

    fn default(&mut self, _ty: &Type) -> bool {
        false
    }

    fn visit_union(&mut self, _ty: &Type, _members: &[Type]) -> bool {
        true
    }
}

/// `true` only for [`Type::Intersection`].
struct IsIntersection;

impl TypeVisitor for IsIntersection {
    type Output = bool;

    fn default(&mut self, _ty: &Type) -> bool {
        false
    }

    fn visit_intersection(&mut self, _ty: &Type, _members: &[Type]) -> bool {
        true
    }
}

/// Whether a node is a union type.
pub fn is_union(ty: &Type) -> bool {
    ty.accept(&mut IsUnion)
}

/// Whether a node is an intersection type.
pub fn is_intersection(ty: &Type) -> bool {
    ty.accept(&mut IsIntersection)
}
