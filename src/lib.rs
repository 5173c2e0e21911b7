//! typelens — static type algebra and reflection for PHP.
//!
//! Models the extended PHP type grammar (unions, intersections,
//! generics, literal types, array/object shapes, conditional types) as
//! an immutable [`Type`](ty::Type) algebra with visitor and rewriter
//! protocols, and reflects PHP source into fully resolved class models:
//! inheritance merged, templates substituted, native hints and PHPDoc
//! annotations combined.
//!
//! Typical use:
//!
//! ```no_run
//! use typelens::reflect::Reflector;
//!
//! let reflector = Reflector::new();
//! reflector.add_source("<?php class User { public int $id; }");
//! let user = reflector.reflect("User")?;
//! for (name, property) in user.properties()? {
//!     println!("{name}: {}", property.facets.resolved());
//! }
//! # Ok::<(), typelens::reflect::ReflectionError>(())
//! ```

pub mod docblock;
pub mod parser;
pub mod reflect;
pub mod resolve;
pub mod rewrite;
pub mod stringify;
pub mod ty;
pub mod types;
pub mod typetext;
pub mod visitor;

pub use crate::resolve::{StaticResolver, TemplateArguments, TemplateResolver};
pub use crate::rewrite::TypeRewriter;
pub use crate::stringify::{TypeStringifier, stringify};
pub use crate::ty::Type;
pub use crate::visitor::TypeVisitor;
