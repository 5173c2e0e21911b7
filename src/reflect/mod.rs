//! Class metadata and the reflection layer.
//!
//! [`ClassMetadata`] captures what a single declaration says, verbatim:
//! its own members with native and doc type facets, template parameter
//! declarations, and references to ancestors with use-site template
//! arguments. It is immutable once built and serde-serializable so a
//! cache collaborator can persist it.
//!
//! [`Reflector`] turns metadata into [`ClassReflection`] views whose
//! members are fully resolved: inheritance merged across traits, parent,
//! and interfaces, with ancestor template parameters, `self`, and
//! `static` substituted along every inheritance edge.

mod class;
mod error;
mod meta;
mod reflector;

pub use class::{ClassReflection, ResolvedMembers};
pub use error::ReflectionError;
pub use meta::{
    ClassConstantMetadata, ClassKind, ClassMetadata, ClassRef, MethodMetadata, ParameterMetadata,
    PropertyMetadata, TemplateDeclaration, TypeFacets, Visibility,
};
pub use reflector::{ClassLocator, Reflector};
