//! Immutable per-declaration class metadata.
//!
//! Everything here records what one declaration *says* — no inheritance,
//! no substitution. The [`crate::reflect::Reflector`] combines these
//! records into resolved views.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ty::{Type, Variance};

/// What kind of class-like entity a declaration introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Trait,
}

/// PHP member visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

/// A use-site reference to another class, carrying the template
/// arguments supplied at that site (`@extends Collection<int, User>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRef {
    pub name: String,
    pub arguments: Vec<Type>,
}

impl ClassRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn with_arguments(name: impl Into<String>, arguments: Vec<Type>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// A template parameter declared on a class, method, or function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDeclaration {
    /// Zero-based position in the declaration order; positional template
    /// arguments bind through it.
    pub position: usize,
    pub name: String,
    /// The `of` bound; `mixed` when none was written.
    pub constraint: Type,
    pub variance: Variance,
}

/// The two independent type statements a member can carry: the native
/// hint and the PHPDoc annotation.
///
/// The doc facet is the more precise one when both exist, so
/// [`TypeFacets::resolved`] prefers it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeFacets {
    pub native: Option<Type>,
    pub doc: Option<Type>,
}

impl TypeFacets {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn native(ty: Type) -> Self {
        Self {
            native: Some(ty),
            doc: None,
        }
    }

    pub fn doc(ty: Type) -> Self {
        Self {
            native: None,
            doc: Some(ty),
        }
    }

    pub fn is_unspecified(&self) -> bool {
        self.native.is_none() && self.doc.is_none()
    }

    /// The effective type: doc annotation, else native hint, else `mixed`.
    pub fn resolved(&self) -> Type {
        self.doc
            .clone()
            .or_else(|| self.native.clone())
            .unwrap_or(Type::Mixed)
    }

    /// Compose an overriding member's facets with the overridden one's:
    /// a member that states nothing inherits the parent's pair whole, a
    /// member that states anything keeps its own pair.
    pub fn child_of(&self, parent: &TypeFacets) -> TypeFacets {
        if self.is_unspecified() {
            parent.clone()
        } else {
            self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyMetadata {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_readonly: bool,
    pub facets: TypeFacets,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterMetadata {
    pub name: String,
    pub facets: TypeFacets,
    pub has_default: bool,
    pub variadic: bool,
    pub by_reference: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodMetadata {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_final: bool,
    /// Method-level template parameters (`@template` on the method).
    pub templates: Vec<TemplateDeclaration>,
    pub parameters: Vec<ParameterMetadata>,
    pub return_facets: TypeFacets,
}

impl MethodMetadata {
    /// Compose an overriding method with the method it overrides:
    /// parameter facets compose position-wise, the return facets compose
    /// independently, and everything else (flags, visibility, templates)
    /// stays the child's.
    pub fn child_of(&self, parent: &MethodMetadata) -> MethodMetadata {
        let mut merged = self.clone();
        for (position, parameter) in merged.parameters.iter_mut().enumerate() {
            if let Some(overridden) = parent.parameters.get(position) {
                parameter.facets = parameter.facets.child_of(&overridden.facets);
            }
        }
        merged.return_facets = self.return_facets.child_of(&parent.return_facets);
        merged
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassConstantMetadata {
    pub name: String,
    pub visibility: Visibility,
    pub is_final: bool,
    pub facets: TypeFacets,
}

/// One class-like declaration, exactly as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMetadata {
    pub name: String,
    pub kind: ClassKind,
    pub is_abstract: bool,
    pub is_final: bool,
    pub is_readonly: bool,
    pub templates: Vec<TemplateDeclaration>,
    pub parent: Option<ClassRef>,
    pub interfaces: Vec<ClassRef>,
    pub trait_uses: Vec<ClassRef>,
    /// Local `@phpstan-type` / `@psalm-type` aliases.
    pub aliases: IndexMap<String, Type>,
    pub properties: IndexMap<String, PropertyMetadata>,
    pub methods: IndexMap<String, MethodMetadata>,
    pub constants: IndexMap<String, ClassConstantMetadata>,
}

impl ClassMetadata {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            is_abstract: false,
            is_final: false,
            is_readonly: false,
            templates: Vec::new(),
            parent: None,
            interfaces: Vec::new(),
            trait_uses: Vec::new(),
            aliases: IndexMap::new(),
            properties: IndexMap::new(),
            methods: IndexMap::new(),
            constants: IndexMap::new(),
        }
    }

    pub fn template(&self, name: &str) -> Option<&TemplateDeclaration> {
        self.templates.iter().find(|template| template.name == name)
    }
}
