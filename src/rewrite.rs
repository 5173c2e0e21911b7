//! Recursive tree-rewrite protocol over the type algebra.
//!
//! [`TypeRewriter`] is the mutating counterpart of
//! [`crate::visitor::TypeVisitor`]: one overridable method per [`Type`]
//! kind, where every provided body performs the generic depth-first
//! rebuild — each child is independently re-visited, so an override of a
//! single kind takes effect at arbitrary nesting depth. Leaf kinds
//! default to a clone. Rewriting never fails.
//!
//! The resolvers in [`crate::resolve`] and the parser's context passes
//! (name qualification, template marking, alias marking) are all
//! rewriters that override a handful of cases each.

use crate::ty::{CallableParameter, ShapeElement, ShapeKey, TemplateType, Type};

/// A total `Type -> Type` rewrite with structural recursion provided.
#[allow(unused_variables)]
pub trait TypeRewriter {
    /// Rewrite one node. Dispatches to the per-kind methods below.
    fn rewrite(&self, ty: &Type) -> Type {
        match ty {
            Type::Never
            | Type::Void
            | Type::Null
            | Type::True
            | Type::False
            | Type::Bool
            | Type::Int
            | Type::Float
            | Type::String
            | Type::NumericString
            | Type::NonEmptyString
            | Type::Object
            | Type::Mixed
            | Type::Resource
            | Type::IntLiteral(_)
            | Type::FloatLiteral(_)
            | Type::StringLiteral(_)
            | Type::IntRange { .. }
            | Type::Constant(_)
            | Type::ClassConstant { .. } => self.rewrite_leaf(ty),
            Type::ClassStringLiteral(class) => self.rewrite_class_string_literal(class),
            Type::Array { key, value } => self.rewrite_array(key, value),
            Type::List { value } => self.rewrite_list(value),
            Type::Iterable { key, value } => self.rewrite_iterable(key, value),
            Type::NonEmpty(inner) => self.rewrite_non_empty(inner),
            Type::ArrayShape { elements, sealed } => self.rewrite_array_shape(elements, *sealed),
            Type::ObjectShape { elements, sealed } => self.rewrite_object_shape(elements, *sealed),
            Type::Callable {
                parameters,
                return_type,
            } => self.rewrite_callable(parameters, return_type),
            Type::Closure {
                parameters,
                return_type,
            } => self.rewrite_closure(parameters, return_type),
            Type::NamedObject { class, arguments } => self.rewrite_named_object(class, arguments),
            Type::Static { arguments } => self.rewrite_static(arguments),
            Type::Self_ { arguments } => self.rewrite_self(arguments),
            Type::Parent { arguments } => self.rewrite_parent(arguments),
            Type::ClassString(object) => self.rewrite_class_string(object.as_deref()),
            Type::Union(members) => self.rewrite_union(members),
            Type::Intersection(members) => self.rewrite_intersection(members),
            Type::Template(template) => self.rewrite_template(template),
            Type::Conditional {
                subject,
                is,
                then,
                otherwise,
            } => self.rewrite_conditional(subject, is, then, otherwise),
            Type::KeyOf(inner) => self.rewrite_key_of(inner),
            Type::ValueOf(inner) => self.rewrite_value_of(inner),
            Type::Offset { subject, offset } => self.rewrite_offset(subject, offset),
            Type::Alias { class, name } => self.rewrite_alias(class, name),
            Type::VarianceAware { variance, inner } => {
                let variance = *variance;
                Type::VarianceAware {
                    variance,
                    inner: Box::new(self.rewrite(inner)),
                }
            }
        }
    }

    /// Fallback for kinds with no child types.
    fn rewrite_leaf(&self, ty: &Type) -> Type {
        ty.clone()
    }

    fn rewrite_class_string_literal(&self, class: &str) -> Type {
        Type::ClassStringLiteral(class.to_string())
    }

    fn rewrite_array(&self, key: &Type, value: &Type) -> Type {
        Type::Array {
            key: Box::new(self.rewrite(key)),
            value: Box::new(self.rewrite(value)),
        }
    }

    fn rewrite_list(&self, value: &Type) -> Type {
        Type::List {
            value: Box::new(self.rewrite(value)),
        }
    }

    fn rewrite_iterable(&self, key: &Type, value: &Type) -> Type {
        Type::Iterable {
            key: Box::new(self.rewrite(key)),
            value: Box::new(self.rewrite(value)),
        }
    }

    fn rewrite_non_empty(&self, inner: &Type) -> Type {
        Type::NonEmpty(Box::new(self.rewrite(inner)))
    }

    fn rewrite_shape_elements(
        &self,
        elements: &[(ShapeKey, ShapeElement)],
    ) -> Vec<(ShapeKey, ShapeElement)> {
        elements
            .iter()
            .map(|(key, element)| {
                (
                    key.clone(),
                    ShapeElement {
                        ty: self.rewrite(&element.ty),
                        optional: element.optional,
                    },
                )
            })
            .collect()
    }

    fn rewrite_array_shape(&self, elements: &[(ShapeKey, ShapeElement)], sealed: bool) -> Type {
        Type::ArrayShape {
            elements: self.rewrite_shape_elements(elements),
            sealed,
        }
    }

    fn rewrite_object_shape(&self, elements: &[(ShapeKey, ShapeElement)], sealed: bool) -> Type {
        Type::ObjectShape {
            elements: self.rewrite_shape_elements(elements),
            sealed,
        }
    }

    fn rewrite_parameters(&self, parameters: &[CallableParameter]) -> Vec<CallableParameter> {
        parameters
            .iter()
            .map(|parameter| CallableParameter {
                ty: self.rewrite(&parameter.ty),
                has_default: parameter.has_default,
                variadic: parameter.variadic,
                by_reference: parameter.by_reference,
                name: parameter.name.clone(),
            })
            .collect()
    }

    fn rewrite_callable(&self, parameters: &[CallableParameter], return_type: &Type) -> Type {
        Type::Callable {
            parameters: self.rewrite_parameters(parameters),
            return_type: Box::new(self.rewrite(return_type)),
        }
    }

    fn rewrite_closure(&self, parameters: &[CallableParameter], return_type: &Type) -> Type {
        Type::Closure {
            parameters: self.rewrite_parameters(parameters),
            return_type: Box::new(self.rewrite(return_type)),
        }
    }

    fn rewrite_arguments(&self, arguments: &[Type]) -> Vec<Type> {
        arguments.iter().map(|arg| self.rewrite(arg)).collect()
    }

    fn rewrite_named_object(&self, class: &str, arguments: &[Type]) -> Type {
        Type::NamedObject {
            class: class.to_string(),
            arguments: self.rewrite_arguments(arguments),
        }
    }

    fn rewrite_static(&self, arguments: &[Type]) -> Type {
        Type::Static {
            arguments: self.rewrite_arguments(arguments),
        }
    }

    fn rewrite_self(&self, arguments: &[Type]) -> Type {
        Type::Self_ {
            arguments: self.rewrite_arguments(arguments),
        }
    }

    fn rewrite_parent(&self, arguments: &[Type]) -> Type {
        Type::Parent {
            arguments: self.rewrite_arguments(arguments),
        }
    }

    fn rewrite_class_string(&self, object: Option<&Type>) -> Type {
        Type::ClassString(object.map(|ty| Box::new(self.rewrite(ty))))
    }

    fn rewrite_union(&self, members: &[Type]) -> Type {
        Type::Union(members.iter().map(|member| self.rewrite(member)).collect())
    }

    fn rewrite_intersection(&self, members: &[Type]) -> Type {
        Type::Intersection(members.iter().map(|member| self.rewrite(member)).collect())
    }

    fn rewrite_template(&self, template: &TemplateType) -> Type {
        Type::Template(TemplateType {
            name: template.name.clone(),
            declared_at: template.declared_at.clone(),
            constraint: Box::new(self.rewrite(&template.constraint)),
        })
    }

    fn rewrite_conditional(
        &self,
        subject: &Type,
        is: &Type,
        then: &Type,
        otherwise: &Type,
    ) -> Type {
        Type::Conditional {
            subject: Box::new(self.rewrite(subject)),
            is: Box::new(self.rewrite(is)),
            then: Box::new(self.rewrite(then)),
            otherwise: Box::new(self.rewrite(otherwise)),
        }
    }

    fn rewrite_key_of(&self, inner: &Type) -> Type {
        Type::KeyOf(Box::new(self.rewrite(inner)))
    }

    fn rewrite_value_of(&self, inner: &Type) -> Type {
        Type::ValueOf(Box::new(self.rewrite(inner)))
    }

    fn rewrite_offset(&self, subject: &Type, offset: &Type) -> Type {
        Type::Offset {
            subject: Box::new(self.rewrite(subject)),
            offset: Box::new(self.rewrite(offset)),
        }
    }

    fn rewrite_alias(&self, class: &str, name: &str) -> Type {
        Type::Alias {
            class: class.to_string(),
            name: name.to_string(),
        }
    }
}
