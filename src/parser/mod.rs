//! PHP source front end.
//!
//! Parses PHP text with the `mago_syntax` parser and extracts one
//! [`ClassMetadata`](crate::reflect::ClassMetadata) per class-like
//! declaration, combining native hints with the PHPDoc tags the
//! [`crate::docblock`] module extracts, then applying the name-context
//! passes from [`names`] (template/alias marking and qualification).
//!
//! Sub-modules:
//! - [`classes`]: class, interface, trait, and enum extraction
//! - [`names`]: `use` statement maps, namespaces, and the rewriter passes

mod classes;
mod names;

use mago_syntax::ast::Trivia;
use tracing::error;

use crate::reflect::ClassMetadata;

/// Bundles the program's trivia and raw source so extraction functions
/// can look up the `/** ... */` comment preceding any AST node.
pub(crate) struct DocblockCtx<'a> {
    pub trivias: &'a [Trivia<'a>],
    pub content: &'a str,
}

/// Parse PHP source text into class metadata.
///
/// Parser panics are contained; a file the parser cannot survive yields
/// no classes rather than taking the process down.
pub fn parse_source(content: &str) -> Vec<ClassMetadata> {
    let owned = content.to_string();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let arena = bumpalo::Bump::new();
        let file_id = mago_database::file::FileId::new("input.php");
        let program = mago_syntax::parser::parse_file_content(&arena, file_id, &owned);

        let ctx = DocblockCtx {
            trivias: program.trivia.as_slice(),
            content: &owned,
        };
        let use_map = names::use_map(program.statements.iter());
        let namespace = names::namespace(program.statements.iter());

        let mut classes = Vec::new();
        classes::extract_classes(program.statements.iter(), &mut classes, &ctx);
        for metadata in &mut classes {
            names::contextualize(metadata, &use_map, namespace.as_deref());
        }
        classes
    }));

    match result {
        Ok(classes) => classes,
        Err(_) => {
            error!("parser panicked; dropping file");
            Vec::new()
        }
    }
}
