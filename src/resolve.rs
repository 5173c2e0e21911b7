//! Type resolvers: `static`/`self`/`parent` substitution and template
//! substitution.
//!
//! Both resolvers are [`TypeRewriter`]s configured once and then applied
//! to any number of types. They never fail: a template with no bound
//! argument degrades to its declared constraint, and an out-of-scope
//! template passes through untouched. Applying the same resolver to its
//! own output is a no-op.

use indexmap::IndexMap;

use crate::reflect::TemplateDeclaration;
use crate::rewrite::TypeRewriter;
use crate::ty::{TemplateScope, TemplateType, Type};

// ─── StaticResolver ─────────────────────────────────────────────────────────

/// Rewrites `static` (and, when configured, `self` / `parent`) to a
/// concrete named object, re-visiting template arguments.
#[derive(Debug, Clone)]
pub struct StaticResolver {
    class: String,
    self_target: Option<String>,
    parent_target: Option<String>,
}

impl StaticResolver {
    /// Resolve `static` to the given class.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            self_target: None,
            parent_target: None,
        }
    }

    /// Additionally resolve `self` to the given class.
    pub fn with_self(mut self, class: impl Into<String>) -> Self {
        self.self_target = Some(class.into());
        self
    }

    /// Additionally resolve `parent` to the given class.
    pub fn with_parent(mut self, class: impl Into<String>) -> Self {
        self.parent_target = Some(class.into());
        self
    }
}

impl TypeRewriter for StaticResolver {
    fn rewrite_static(&self, arguments: &[Type]) -> Type {
        Type::NamedObject {
            class: self.class.clone(),
            arguments: self.rewrite_arguments(arguments),
        }
    }

    fn rewrite_self(&self, arguments: &[Type]) -> Type {
        match &self.self_target {
            Some(class) => Type::NamedObject {
                class: class.clone(),
                arguments: self.rewrite_arguments(arguments),
            },
            None => Type::Self_ {
                arguments: self.rewrite_arguments(arguments),
            },
        }
    }

    fn rewrite_parent(&self, arguments: &[Type]) -> Type {
        match &self.parent_target {
            Some(class) => Type::NamedObject {
                class: class.clone(),
                arguments: self.rewrite_arguments(arguments),
            },
            None => Type::Parent {
                arguments: self.rewrite_arguments(arguments),
            },
        }
    }
}

// ─── Template arguments ─────────────────────────────────────────────────────

/// Arguments supplied for a template parameter list, addressable by name
/// or by position.
#[derive(Debug, Clone, Default)]
pub struct TemplateArguments {
    positional: Vec<Type>,
    named: IndexMap<String, Type>,
}

impl TemplateArguments {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn positional(arguments: Vec<Type>) -> Self {
        Self {
            positional: arguments,
            named: IndexMap::new(),
        }
    }

    pub fn named(pairs: impl IntoIterator<Item = (String, Type)>) -> Self {
        Self {
            positional: Vec::new(),
            named: pairs.into_iter().collect(),
        }
    }

    pub fn push(&mut self, argument: Type) {
        self.positional.push(argument);
    }

    pub fn insert(&mut self, name: impl Into<String>, argument: Type) {
        self.named.insert(name.into(), argument);
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    /// Look up an argument for a parameter: by name first, then by its
    /// declared position.
    pub fn get(&self, name: &str, position: usize) -> Option<&Type> {
        self.named.get(name).or_else(|| self.positional.get(position))
    }
}

impl From<Vec<Type>> for TemplateArguments {
    fn from(arguments: Vec<Type>) -> Self {
        TemplateArguments::positional(arguments)
    }
}

// ─── TemplateResolver ───────────────────────────────────────────────────────

/// Substitutes template occurrences with concrete types.
///
/// The unscoped form replaces every template it knows by name and
/// degrades the rest to their constraints. The class-scoped form built by
/// [`TemplateResolver::for_class`] touches only templates declared at
/// that class, so method-level templates survive an inheritance merge
/// intact; it also resolves `self` to the class and, when configured
/// through [`TemplateResolver::with_static`], `static` to the reflecting
/// class.
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    bindings: IndexMap<String, Type>,
    scope: Option<String>,
    self_target: Option<String>,
    static_target: Option<String>,
}

impl TemplateResolver {
    /// Substitute every template: the bound type when the name is known,
    /// the template's own constraint otherwise.
    pub fn new(bindings: IndexMap<String, Type>) -> Self {
        Self {
            bindings,
            scope: None,
            self_target: None,
            static_target: None,
        }
    }

    /// Bind the template parameters declared at `class` from the given
    /// arguments, precomputing one type per parameter (by name, then by
    /// position, else the declared constraint). Substitution is
    /// restricted to templates declared at that class; `self` resolves to
    /// the class itself.
    pub fn for_class(
        class: impl Into<String>,
        templates: &[TemplateDeclaration],
        arguments: &TemplateArguments,
    ) -> Self {
        let class = class.into();
        let bindings = templates
            .iter()
            .map(|declaration| {
                let bound = arguments
                    .get(&declaration.name, declaration.position)
                    .cloned()
                    .unwrap_or_else(|| declaration.constraint.clone());
                (declaration.name.clone(), bound)
            })
            .collect();
        Self {
            bindings,
            scope: Some(class.clone()),
            self_target: Some(class),
            static_target: None,
        }
    }

    /// Additionally resolve `static` to the given class.
    pub fn with_static(mut self, class: impl Into<String>) -> Self {
        self.static_target = Some(class.into());
        self
    }

    fn in_scope(&self, template: &TemplateType) -> bool {
        match &self.scope {
            None => true,
            Some(class) => matches!(
                &template.declared_at,
                TemplateScope::AtClass(declared) if declared == class
            ),
        }
    }
}

impl TypeRewriter for TemplateResolver {
    fn rewrite_template(&self, template: &TemplateType) -> Type {
        if !self.in_scope(template) {
            return Type::Template(TemplateType {
                name: template.name.clone(),
                declared_at: template.declared_at.clone(),
                constraint: Box::new(self.rewrite(&template.constraint)),
            });
        }
        match self.bindings.get(&template.name) {
            Some(bound) => bound.clone(),
            None => self.rewrite(&template.constraint),
        }
    }

    fn rewrite_self(&self, arguments: &[Type]) -> Type {
        match &self.self_target {
            Some(class) => Type::NamedObject {
                class: class.clone(),
                arguments: self.rewrite_arguments(arguments),
            },
            None => Type::Self_ {
                arguments: self.rewrite_arguments(arguments),
            },
        }
    }

    fn rewrite_static(&self, arguments: &[Type]) -> Type {
        match &self.static_target {
            Some(class) => Type::NamedObject {
                class: class.clone(),
                arguments: self.rewrite_arguments(arguments),
            },
            None => Type::Static {
                arguments: self.rewrite_arguments(arguments),
            },
        }
    }
}
