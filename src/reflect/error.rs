//! Reflection error taxonomy.
//!
//! Lookup failures are ordinary values naming the entity and the member
//! that was asked for. Structural invariant violations (union arity,
//! empty names) are not represented here; those panic at construction.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReflectionError {
    #[error("class `{0}` not found")]
    ClassNotFound(String),

    #[error("method `{class}::{method}()` not found")]
    MethodNotFound { class: String, method: String },

    #[error("property `{class}::${property}` not found")]
    PropertyNotFound { class: String, property: String },

    #[error("constant `{class}::{constant}` not found")]
    ConstantNotFound { class: String, constant: String },

    #[error("template parameter `{template}` not declared on `{class}`")]
    TemplateNotFound { class: String, template: String },

    #[error("type alias `{alias}` not declared on `{class}`")]
    AliasNotFound { class: String, alias: String },

    #[error("ancestor `{ancestor}` of `{class}` not found")]
    AncestorNotFound { class: String, ancestor: String },
}
