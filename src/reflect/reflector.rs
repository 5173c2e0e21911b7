//! The reflector: metadata loading, caching, and inheritance merging.
//!
//! Merging respects PHP's precedence rules the same way instance access
//! does:
//!
//!   class own > traits > parent > interfaces
//!
//! Every inherited member crosses its inheritance edge through a
//! [`TemplateResolver`] that binds the ancestor's template parameters
//! from the use-site arguments and resolves `self` to the ancestor.
//! `static` stays unresolved in the merged maps; [`ClassReflection`]'s
//! accessors late-bind it to the reflecting class, so a cached map never
//! bakes in a class from the middle of a chain. Private members are
//! never inherited. A depth limit prevents infinite loops from circular
//! inheritance.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::reflect::class::{
    ClassReflection, ResolvedMembers, rewrite_constant, rewrite_method, rewrite_property,
};
use crate::reflect::error::ReflectionError;
use crate::reflect::meta::{ClassMetadata, ClassRef, Visibility};
use crate::resolve::{TemplateArguments, TemplateResolver};

/// Maximum inheritance depth followed before giving up on a chain.
const MAX_DEPTH: u32 = 20;

/// Supplies PHP source for a class name on demand. The autoloader-shaped
/// seam: implementations may hit disk, a composer classmap, or anything
/// else — the reflector only ever asks for text.
pub trait ClassLocator: Send + Sync {
    fn locate(&self, class: &str) -> Option<String>;
}

/// Clone-cheap reflection entry point.
///
/// Holds a metadata cache and a resolved-member cache behind mutexes;
/// each entry is written once per process, and recomputation is
/// idempotent, so lock contention is the only cost of concurrent use.
#[derive(Clone, Default)]
pub struct Reflector {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    locator: Option<Box<dyn ClassLocator>>,
    metadata: Mutex<HashMap<String, Arc<ClassMetadata>>>,
    resolved: Mutex<HashMap<String, Arc<ResolvedMembers>>>,
}

impl Reflector {
    /// A reflector with no locator; classes come from
    /// [`Reflector::add_source`] / [`Reflector::add_metadata`] only.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locator(locator: impl ClassLocator + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                locator: Some(Box::new(locator)),
                metadata: Mutex::new(HashMap::new()),
                resolved: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Parse PHP source text and register every class it declares.
    pub fn add_source(&self, source: &str) {
        for metadata in crate::parser::parse_source(source) {
            self.add_metadata(metadata);
        }
    }

    pub fn add_metadata(&self, metadata: ClassMetadata) {
        let name = metadata.name.clone();
        self.inner.metadata.lock().insert(name, Arc::new(metadata));
    }

    /// Reflect a class by name.
    pub fn reflect(&self, class: &str) -> Result<ClassReflection, ReflectionError> {
        let metadata = self
            .metadata(class)
            .ok_or_else(|| ReflectionError::ClassNotFound(class.to_string()))?;
        Ok(ClassReflection::new(metadata, self.clone()))
    }

    /// Look a class up in the cache, consulting the locator on a miss.
    fn metadata(&self, class: &str) -> Option<Arc<ClassMetadata>> {
        let name = class.strip_prefix('\\').unwrap_or(class);
        if let Some(metadata) = self.inner.metadata.lock().get(name) {
            return Some(metadata.clone());
        }
        let source = self.inner.locator.as_ref()?.locate(name)?;
        debug!(class = name, "loading class through locator");
        self.add_source(&source);
        self.inner.metadata.lock().get(name).cloned()
    }

    /// Resolve the complete member set of a class, memoized.
    pub(crate) fn resolved_members(
        &self,
        metadata: &Arc<ClassMetadata>,
    ) -> Result<Arc<ResolvedMembers>, ReflectionError> {
        self.resolve(metadata, 0)
    }

    fn resolve(
        &self,
        metadata: &Arc<ClassMetadata>,
        depth: u32,
    ) -> Result<Arc<ResolvedMembers>, ReflectionError> {
        if let Some(cached) = self.inner.resolved.lock().get(&metadata.name) {
            return Ok(cached.clone());
        }
        if depth > MAX_DEPTH {
            warn!(
                class = metadata.name.as_str(),
                "inheritance chain exceeds depth limit; truncating"
            );
            return Ok(Arc::new(ResolvedMembers::from_own(metadata)));
        }

        let mut members = ResolvedMembers::from_own(metadata);
        let mut composed = Composed::default();

        // Fixed ancestor order: traits, then the parent, then interfaces.
        // First-wins within that order; names the class itself declares
        // compose "child of parent" with the first ancestor providing
        // them instead of being replaced.
        let ancestors = metadata
            .trait_uses
            .iter()
            .chain(metadata.parent.iter())
            .chain(metadata.interfaces.iter());
        for ancestor_ref in ancestors {
            self.merge_ancestor(metadata, ancestor_ref, &mut members, &mut composed, depth)?;
        }

        let members = Arc::new(members);
        // Deeper results can be truncated by the depth limit under a
        // cyclic hierarchy, so only top-level resolutions are cached.
        if depth == 0 {
            self.inner
                .resolved
                .lock()
                .insert(metadata.name.clone(), Arc::clone(&members));
        }
        Ok(members)
    }

    fn merge_ancestor(
        &self,
        metadata: &ClassMetadata,
        ancestor_ref: &ClassRef,
        members: &mut ResolvedMembers,
        composed: &mut Composed,
        depth: u32,
    ) -> Result<(), ReflectionError> {
        let ancestor = self.metadata(&ancestor_ref.name).ok_or_else(|| {
            ReflectionError::AncestorNotFound {
                class: metadata.name.clone(),
                ancestor: ancestor_ref.name.clone(),
            }
        })?;
        let inherited = self.resolve(&ancestor, depth + 1)?;

        let resolver = TemplateResolver::for_class(
            &ancestor.name,
            &ancestor.templates,
            &TemplateArguments::positional(ancestor_ref.arguments.clone()),
        );

        for (name, method) in &inherited.methods {
            if method.visibility == Visibility::Private {
                continue;
            }
            if let Some(existing) = members.methods.get(name) {
                if metadata.methods.contains_key(name) && composed.methods.insert(name.clone()) {
                    let overridden = rewrite_method(&resolver, method);
                    let merged = existing.child_of(&overridden);
                    members.methods.insert(name.clone(), merged);
                }
                continue;
            }
            members
                .methods
                .insert(name.clone(), rewrite_method(&resolver, method));
        }

        for (name, property) in &inherited.properties {
            if property.visibility == Visibility::Private {
                continue;
            }
            if let Some(existing) = members.properties.get(name) {
                if metadata.properties.contains_key(name) && composed.properties.insert(name.clone())
                {
                    let overridden = rewrite_property(&resolver, property);
                    let mut merged = existing.clone();
                    merged.facets = existing.facets.child_of(&overridden.facets);
                    members.properties.insert(name.clone(), merged);
                }
                continue;
            }
            members
                .properties
                .insert(name.clone(), rewrite_property(&resolver, property));
        }

        for (name, constant) in &inherited.constants {
            if constant.visibility == Visibility::Private {
                continue;
            }
            if let Some(existing) = members.constants.get(name) {
                if metadata.constants.contains_key(name) && composed.constants.insert(name.clone())
                {
                    let overridden = rewrite_constant(&resolver, constant);
                    let mut merged = existing.clone();
                    merged.facets = existing.facets.child_of(&overridden.facets);
                    members.constants.insert(name.clone(), merged);
                }
                continue;
            }
            members
                .constants
                .insert(name.clone(), rewrite_constant(&resolver, constant));
        }

        Ok(())
    }
}

/// Names already composed with an ancestor, so that only the first
/// providing ancestor contributes to a child-declared member.
#[derive(Default)]
struct Composed {
    methods: HashSet<String>,
    properties: HashSet<String>,
    constants: HashSet<String>,
}
