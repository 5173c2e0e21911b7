//! Canonical textual notation for types.
//!
//! [`TypeStringifier`] is a [`TypeVisitor`] producing the notation used in
//! PHPDoc: `array<int, string>`, `list<User>`, `array{id: int, name?:
//! string}`, `callable(int, string=): bool`, `(T is int ? string : float)`
//! and so on. `Display for Type` delegates here.
//!
//! The notation is deterministic and round-trippable: for every type built
//! through the [`crate::types`] factory that contains no free constant,
//! alias, or template references, [`crate::typetext::parse`] applied to the
//! rendered text reproduces the exact tree.

use std::fmt;

use crate::ty::{CallableParameter, FloatValue, ShapeElement, ShapeKey, TemplateType, Type, Variance};
use crate::visitor::{TypeVisitor, is_intersection, is_union};

/// Render a type in the canonical notation.
pub fn stringify(ty: &Type) -> String {
    ty.accept(&mut TypeStringifier)
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&stringify(self))
    }
}

/// The stringifying visitor. Stateless; every method is pure.
pub struct TypeStringifier;

impl TypeStringifier {
    fn render(&mut self, ty: &Type) -> String {
        ty.accept(self)
    }

    /// Render a union/intersection member, parenthesizing when the member
    /// is the opposite combinator.
    fn member(&mut self, ty: &Type) -> String {
        if is_union(ty) || is_intersection(ty) {
            format!("({})", self.render(ty))
        } else {
            self.render(ty)
        }
    }

    fn arguments(&mut self, arguments: &[Type]) -> String {
        if arguments.is_empty() {
            return String::new();
        }
        let rendered: Vec<String> = arguments.iter().map(|arg| self.render(arg)).collect();
        format!("<{}>", rendered.join(", "))
    }

    fn shape_body(&mut self, elements: &[(ShapeKey, ShapeElement)], sealed: bool) -> String {
        let mut parts: Vec<String> = if positional(elements) {
            elements
                .iter()
                .map(|(_, element)| self.render(&element.ty))
                .collect()
        } else {
            elements
                .iter()
                .map(|(key, element)| {
                    let marker = if element.optional { "?" } else { "" };
                    format!("{}{marker}: {}", shape_key(key), self.render(&element.ty))
                })
                .collect()
        };
        if !sealed {
            parts.push("...".to_string());
        }
        format!("{{{}}}", parts.join(", "))
    }

    fn callable_like(
        &mut self,
        keyword: &str,
        parameters: &[CallableParameter],
        return_type: &Type,
    ) -> String {
        if parameters.is_empty() && *return_type == Type::Mixed {
            return keyword.to_string();
        }
        let params: Vec<String> = parameters
            .iter()
            .map(|parameter| {
                let mut rendered = self.member(&parameter.ty);
                if parameter.variadic {
                    rendered.push_str("...");
                } else if parameter.has_default {
                    rendered.push('=');
                }
                rendered
            })
            .collect();
        format!(
            "{keyword}({}): {}",
            params.join(", "),
            self.member(return_type)
        )
    }
}

impl TypeVisitor for TypeStringifier {
    type Output = String;

    /// Keyword table for the kinds with no constituents; every
    /// parameterized kind has a dedicated method below.
    fn default(&mut self, ty: &Type) -> String {
        match ty {
            Type::Never => "never",
            Type::Void => "void",
            Type::Null => "null",
            Type::True => "true",
            Type::False => "false",
            Type::Bool => "bool",
            Type::Int => "int",
            Type::Float => "float",
            Type::String => "string",
            Type::NumericString => "numeric-string",
            Type::NonEmptyString => "non-empty-string",
            Type::Object => "object",
            Type::Mixed => "mixed",
            Type::Resource => "resource",
            _ => "",
        }
        .to_string()
    }

    fn visit_int_literal(&mut self, _ty: &Type, value: i64) -> String {
        value.to_string()
    }

    fn visit_float_literal(&mut self, _ty: &Type, value: FloatValue) -> String {
        value.to_string()
    }

    fn visit_string_literal(&mut self, _ty: &Type, value: &str) -> String {
        quote(value)
    }

    fn visit_class_string_literal(&mut self, _ty: &Type, class: &str) -> String {
        format!("{class}::class")
    }

    fn visit_int_range(&mut self, _ty: &Type, min: Option<i64>, max: Option<i64>) -> String {
        let min = min.map_or_else(|| "min".to_string(), |bound| bound.to_string());
        let max = max.map_or_else(|| "max".to_string(), |bound| bound.to_string());
        format!("int<{min}, {max}>")
    }

    fn visit_array(&mut self, _ty: &Type, key: &Type, value: &Type) -> String {
        if is_array_key(key) {
            if *value == Type::Mixed {
                "array".to_string()
            } else {
                format!("array<{}>", self.render(value))
            }
        } else {
            format!("array<{}, {}>", self.render(key), self.render(value))
        }
    }

    fn visit_list(&mut self, _ty: &Type, value: &Type) -> String {
        if *value == Type::Mixed {
            "list".to_string()
        } else {
            format!("list<{}>", self.render(value))
        }
    }

    fn visit_iterable(&mut self, _ty: &Type, key: &Type, value: &Type) -> String {
        if *key == Type::Mixed && *value == Type::Mixed {
            "iterable".to_string()
        } else if *key == Type::Mixed {
            format!("iterable<{}>", self.render(value))
        } else {
            format!("iterable<{}, {}>", self.render(key), self.render(value))
        }
    }

    fn visit_non_empty(&mut self, _ty: &Type, inner: &Type) -> String {
        // `array<V>` becomes `non-empty-array<V>`, `list` becomes
        // `non-empty-list`, and so on for every prefixable inner form.
        format!("non-empty-{}", self.render(inner))
    }

    fn visit_array_shape(
        &mut self,
        _ty: &Type,
        elements: &[(ShapeKey, ShapeElement)],
        sealed: bool,
    ) -> String {
        format!("array{}", self.shape_body(elements, sealed))
    }

    fn visit_object_shape(
        &mut self,
        _ty: &Type,
        elements: &[(ShapeKey, ShapeElement)],
        sealed: bool,
    ) -> String {
        format!("object{}", self.shape_body(elements, sealed))
    }

    fn visit_callable(
        &mut self,
        _ty: &Type,
        parameters: &[CallableParameter],
        return_type: &Type,
    ) -> String {
        self.callable_like("callable", parameters, return_type)
    }

    fn visit_closure(
        &mut self,
        _ty: &Type,
        parameters: &[CallableParameter],
        return_type: &Type,
    ) -> String {
        self.callable_like("Closure", parameters, return_type)
    }

    fn visit_named_object(&mut self, _ty: &Type, class: &str, arguments: &[Type]) -> String {
        format!("{class}{}", self.arguments(arguments))
    }

    fn visit_static(&mut self, _ty: &Type, arguments: &[Type]) -> String {
        format!("static{}", self.arguments(arguments))
    }

    fn visit_self(&mut self, _ty: &Type, arguments: &[Type]) -> String {
        format!("self{}", self.arguments(arguments))
    }

    fn visit_parent(&mut self, _ty: &Type, arguments: &[Type]) -> String {
        format!("parent{}", self.arguments(arguments))
    }

    fn visit_class_string(&mut self, _ty: &Type, object: Option<&Type>) -> String {
        match object {
            Some(object) => format!("class-string<{}>", self.render(object)),
            None => "class-string".to_string(),
        }
    }

    fn visit_union(&mut self, _ty: &Type, members: &[Type]) -> String {
        let rendered: Vec<String> = members.iter().map(|member| self.member(member)).collect();
        rendered.join("|")
    }

    fn visit_intersection(&mut self, _ty: &Type, members: &[Type]) -> String {
        let rendered: Vec<String> = members.iter().map(|member| self.member(member)).collect();
        rendered.join("&")
    }

    fn visit_constant(&mut self, _ty: &Type, name: &str) -> String {
        name.to_string()
    }

    fn visit_class_constant(&mut self, _ty: &Type, class: &str, constant: &str) -> String {
        format!("{class}::{constant}")
    }

    fn visit_template(&mut self, _ty: &Type, template: &TemplateType) -> String {
        template.name.clone()
    }

    fn visit_conditional(
        &mut self,
        _ty: &Type,
        subject: &Type,
        is: &Type,
        then: &Type,
        otherwise: &Type,
    ) -> String {
        format!(
            "({} is {} ? {} : {})",
            self.render(subject),
            self.member(is),
            self.render(then),
            self.render(otherwise)
        )
    }

    fn visit_key_of(&mut self, _ty: &Type, inner: &Type) -> String {
        format!("key-of<{}>", self.render(inner))
    }

    fn visit_value_of(&mut self, _ty: &Type, inner: &Type) -> String {
        format!("value-of<{}>", self.render(inner))
    }

    fn visit_offset(&mut self, _ty: &Type, subject: &Type, offset: &Type) -> String {
        format!("{}[{}]", self.member(subject), self.render(offset))
    }

    fn visit_alias(&mut self, _ty: &Type, _class: &str, name: &str) -> String {
        name.to_string()
    }

    fn visit_variance_aware(&mut self, _ty: &Type, variance: Variance, inner: &Type) -> String {
        let keyword = match variance {
            Variance::Invariant => return self.render(inner),
            Variance::Covariant => "covariant",
            Variance::Contravariant => "contravariant",
            Variance::Bivariant => "bivariant",
        };
        format!("{keyword} {}", self.member(inner))
    }
}

/// Whether a key type is the canonical `array-key` union, which the
/// notation leaves implicit.
fn is_array_key(key: &Type) -> bool {
    matches!(key, Type::Union(members) if members.as_slice() == [Type::Int, Type::String])
}

/// Whether a shape prints positionally: all keys are the sequential
/// integers from zero and every element is required.
fn positional(elements: &[(ShapeKey, ShapeElement)]) -> bool {
    elements.iter().enumerate().all(|(index, (key, element))| {
        !element.optional && *key == ShapeKey::Int(index as i64)
    })
}

fn shape_key(key: &ShapeKey) -> String {
    match key {
        ShapeKey::Int(key) => key.to_string(),
        ShapeKey::String(key) if is_identifier(key) => key.clone(),
        ShapeKey::String(key) => quote(key),
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Single-quote a literal string, escaping backslash, quote, newline and
/// carriage return.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}
