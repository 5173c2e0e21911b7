//! Resolved class views.
//!
//! [`ClassReflection`] is a cheap handle pairing one class's metadata
//! with the reflector that can load its ancestors. Member accessors
//! return fully resolved metadata: inheritance merged, `static` bound to
//! the reflecting class, and, when the reflection was specialized
//! through [`ClassReflection::with_resolved_templates`], class template
//! parameters substituted.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::reflect::error::ReflectionError;
use crate::reflect::meta::{
    ClassConstantMetadata, ClassMetadata, MethodMetadata, PropertyMetadata, TemplateDeclaration,
    TypeFacets,
};
use crate::reflect::reflector::Reflector;
use crate::resolve::{StaticResolver, TemplateArguments, TemplateResolver};
use crate::rewrite::TypeRewriter;
use crate::ty::Type;

/// The complete member set visible on a class after inheritance merging.
#[derive(Debug, Clone, Default)]
pub struct ResolvedMembers {
    pub properties: IndexMap<String, PropertyMetadata>,
    pub methods: IndexMap<String, MethodMetadata>,
    pub constants: IndexMap<String, ClassConstantMetadata>,
}

impl ResolvedMembers {
    /// Seed with the class's own declarations, indexed by name.
    pub(crate) fn from_own(metadata: &ClassMetadata) -> Self {
        Self {
            properties: metadata.properties.clone(),
            methods: metadata.methods.clone(),
            constants: metadata.constants.clone(),
        }
    }
}

/// A view over one reflected class.
#[derive(Clone)]
pub struct ClassReflection {
    metadata: Arc<ClassMetadata>,
    reflector: Reflector,
    /// `Some` once specialized, even with an empty argument list — an
    /// empty specialization still degrades templates to constraints.
    arguments: Option<TemplateArguments>,
}

impl ClassReflection {
    pub(crate) fn new(metadata: Arc<ClassMetadata>, reflector: Reflector) -> Self {
        Self {
            metadata,
            reflector,
            arguments: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn metadata(&self) -> &ClassMetadata {
        &self.metadata
    }

    /// A reflection whose member types have this class's template
    /// parameters substituted with the given arguments. Parameters with
    /// no matching argument fall back to their declared constraints, so
    /// an empty argument list degrades every class template to its
    /// constraint.
    pub fn with_resolved_templates(&self, arguments: impl Into<TemplateArguments>) -> Self {
        Self {
            metadata: Arc::clone(&self.metadata),
            reflector: self.reflector.clone(),
            arguments: Some(arguments.into()),
        }
    }

    fn members(&self) -> Result<Arc<ResolvedMembers>, ReflectionError> {
        self.reflector.resolved_members(&self.metadata)
    }

    /// The resolver applying this reflection's bound template arguments,
    /// when specialization was requested.
    fn argument_resolver(&self) -> Option<TemplateResolver> {
        let arguments = self.arguments.as_ref()?;
        Some(
            TemplateResolver::for_class(&self.metadata.name, &self.metadata.templates, arguments)
                .with_static(&self.metadata.name),
        )
    }

    /// Late static binding: the merged member maps keep `static` nodes
    /// unresolved, and only here, where the reflecting class is known,
    /// do they bind to it.
    fn static_resolver(&self) -> StaticResolver {
        StaticResolver::new(self.metadata.name.as_str())
    }

    fn finish_method(&self, method: &MethodMetadata) -> MethodMetadata {
        let method = match self.argument_resolver() {
            Some(resolver) => rewrite_method(&resolver, method),
            None => method.clone(),
        };
        rewrite_method(&self.static_resolver(), &method)
    }

    fn finish_property(&self, property: &PropertyMetadata) -> PropertyMetadata {
        let property = match self.argument_resolver() {
            Some(resolver) => rewrite_property(&resolver, property),
            None => property.clone(),
        };
        rewrite_property(&self.static_resolver(), &property)
    }

    fn finish_constant(&self, constant: &ClassConstantMetadata) -> ClassConstantMetadata {
        let constant = match self.argument_resolver() {
            Some(resolver) => rewrite_constant(&resolver, constant),
            None => constant.clone(),
        };
        rewrite_constant(&self.static_resolver(), &constant)
    }

    pub fn methods(&self) -> Result<IndexMap<String, MethodMetadata>, ReflectionError> {
        let members = self.members()?;
        Ok(members
            .methods
            .iter()
            .map(|(name, method)| (name.clone(), self.finish_method(method)))
            .collect())
    }

    pub fn properties(&self) -> Result<IndexMap<String, PropertyMetadata>, ReflectionError> {
        let members = self.members()?;
        Ok(members
            .properties
            .iter()
            .map(|(name, property)| (name.clone(), self.finish_property(property)))
            .collect())
    }

    pub fn constants(&self) -> Result<IndexMap<String, ClassConstantMetadata>, ReflectionError> {
        let members = self.members()?;
        Ok(members
            .constants
            .iter()
            .map(|(name, constant)| (name.clone(), self.finish_constant(constant)))
            .collect())
    }

    pub fn method(&self, name: &str) -> Result<MethodMetadata, ReflectionError> {
        let members = self.members()?;
        let method = members
            .methods
            .get(name)
            .ok_or_else(|| ReflectionError::MethodNotFound {
                class: self.metadata.name.clone(),
                method: name.to_string(),
            })?;
        Ok(self.finish_method(method))
    }

    pub fn property(&self, name: &str) -> Result<PropertyMetadata, ReflectionError> {
        let members = self.members()?;
        let property =
            members
                .properties
                .get(name)
                .ok_or_else(|| ReflectionError::PropertyNotFound {
                    class: self.metadata.name.clone(),
                    property: name.to_string(),
                })?;
        Ok(self.finish_property(property))
    }

    pub fn constant(&self, name: &str) -> Result<ClassConstantMetadata, ReflectionError> {
        let members = self.members()?;
        let constant =
            members
                .constants
                .get(name)
                .ok_or_else(|| ReflectionError::ConstantNotFound {
                    class: self.metadata.name.clone(),
                    constant: name.to_string(),
                })?;
        Ok(self.finish_constant(constant))
    }

    /// The constructor when the class (or an ancestor) declares one.
    pub fn constructor(&self) -> Result<Option<MethodMetadata>, ReflectionError> {
        let members = self.members()?;
        Ok(members
            .methods
            .get("__construct")
            .map(|constructor| self.finish_method(constructor)))
    }

    pub fn template(&self, name: &str) -> Result<&TemplateDeclaration, ReflectionError> {
        self.metadata
            .template(name)
            .ok_or_else(|| ReflectionError::TemplateNotFound {
                class: self.metadata.name.clone(),
                template: name.to_string(),
            })
    }

    pub fn type_alias(&self, name: &str) -> Result<&Type, ReflectionError> {
        self.metadata
            .aliases
            .get(name)
            .ok_or_else(|| ReflectionError::AliasNotFound {
                class: self.metadata.name.clone(),
                alias: name.to_string(),
            })
    }
}

// ─── Rewriting helpers shared with the merge ────────────────────────────────

pub(crate) fn rewrite_facets(resolver: &impl TypeRewriter, facets: &TypeFacets) -> TypeFacets {
    TypeFacets {
        native: facets.native.as_ref().map(|ty| resolver.rewrite(ty)),
        doc: facets.doc.as_ref().map(|ty| resolver.rewrite(ty)),
    }
}

pub(crate) fn rewrite_method(resolver: &impl TypeRewriter, method: &MethodMetadata) -> MethodMetadata {
    let mut rewritten = method.clone();
    for parameter in &mut rewritten.parameters {
        parameter.facets = rewrite_facets(resolver, &parameter.facets);
    }
    rewritten.return_facets = rewrite_facets(resolver, &method.return_facets);
    rewritten
}

pub(crate) fn rewrite_property(
    resolver: &impl TypeRewriter,
    property: &PropertyMetadata,
) -> PropertyMetadata {
    let mut rewritten = property.clone();
    rewritten.facets = rewrite_facets(resolver, &property.facets);
    rewritten
}

pub(crate) fn rewrite_constant(
    resolver: &impl TypeRewriter,
    constant: &ClassConstantMetadata,
) -> ClassConstantMetadata {
    let mut rewritten = constant.clone();
    rewritten.facets = rewrite_facets(resolver, &constant.facets);
    rewritten
}
