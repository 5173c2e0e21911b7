//! PHPDoc block extraction.
//!
//! Scans `/** ... */` comments line by line for the tags the reflection
//! model consumes: `@template` declarations (with `of` bounds and
//! variance suffixes), `@extends` / `@implements` / `@use` ancestor
//! arguments, `@phpstan-type` / `@psalm-type` local aliases, and the
//! member type tags `@param` / `@return` / `@var`. Type texts parse
//! through [`crate::typetext`]; a malformed type degrades that facet to
//! absent rather than failing the entity.

use indexmap::IndexMap;
use mago_span::HasSpan;
use mago_syntax::ast::{Trivia, TriviaKind};
use std::collections::HashMap;
use tracing::debug;

use crate::reflect::{ClassRef, TemplateDeclaration};
use crate::ty::{Type, Variance};
use crate::typetext;

/// Tags extracted from a class-level docblock.
#[derive(Debug, Default)]
pub(crate) struct ClassDoc {
    pub templates: Vec<TemplateDeclaration>,
    pub extends: Vec<ClassRef>,
    pub implements: Vec<ClassRef>,
    pub trait_uses: Vec<ClassRef>,
    pub aliases: IndexMap<String, Type>,
}

/// Tags extracted from a member-level docblock.
#[derive(Debug, Default)]
pub(crate) struct MemberDoc {
    /// Method-level `@template` declarations.
    pub templates: Vec<TemplateDeclaration>,
    /// `@param` types keyed by parameter name, without the `$`.
    pub params: HashMap<String, Type>,
    pub return_type: Option<Type>,
    pub var_type: Option<Type>,
}

/// The closest `/** ... */` comment preceding an AST node, provided
/// nothing but whitespace and ordinary comments sit in between.
pub(crate) fn docblock_for_node<'a>(
    trivia: &'a [Trivia<'a>],
    content: &str,
    node: &impl HasSpan,
) -> Option<&'a str> {
    let node_start = node.span().start.offset as usize;
    let preceding = &trivia[..trivia.partition_point(|t| (t.span.start.offset as usize) < node_start)];
    let bytes = content.as_bytes();

    // Scan backwards from the node; `reached` tracks how far up the
    // trivia chain extends without interruption. A non-whitespace gap
    // means real code intervenes and ends the scan.
    let mut reached = node_start;
    preceding
        .iter()
        .rev()
        .find_map(|t| {
            let gap = bytes
                .get(t.span.end.offset as usize..reached)
                .unwrap_or(&[]);
            if !gap.iter().all(u8::is_ascii_whitespace) {
                return Some(None);
            }
            if matches!(t.kind, TriviaKind::DocBlockComment) {
                return Some(Some(t.value));
            }
            reached = t.span.start.offset as usize;
            None
        })
        .flatten()
}

pub(crate) fn class_doc(docblock: &str) -> ClassDoc {
    let mut doc = ClassDoc::default();
    for line in tag_lines(docblock) {
        if let Some((name, constraint, variance)) = parse_template_line(line) {
            let position = doc.templates.len();
            doc.templates.push(TemplateDeclaration {
                position,
                name,
                constraint,
                variance,
            });
        } else if let Some(reference) = parse_ref_line(line, "extends") {
            doc.extends.push(reference);
        } else if let Some(reference) = parse_ref_line(line, "implements") {
            doc.implements.push(reference);
        } else if let Some(reference) = parse_ref_line(line, "use") {
            doc.trait_uses.push(reference);
        } else if let Some((name, ty)) = parse_alias_line(line) {
            doc.aliases.insert(name, ty);
        }
    }
    doc
}

pub(crate) fn member_doc(docblock: &str) -> MemberDoc {
    let mut doc = MemberDoc::default();
    for line in tag_lines(docblock) {
        if let Some((name, constraint, variance)) = parse_template_line(line) {
            let position = doc.templates.len();
            doc.templates.push(TemplateDeclaration {
                position,
                name,
                constraint,
                variance,
            });
        } else if let Some(rest) = strip_tag(line, "param") {
            let (token, remainder) = split_type_token(rest);
            let Some(name) = remainder
                .split_whitespace()
                .next()
                .and_then(|word| word.strip_prefix('$'))
            else {
                continue;
            };
            if let Some(ty) = parse_doc_type(token) {
                doc.params.insert(name.to_string(), ty);
            }
        } else if let Some(rest) = strip_tag(line, "return") {
            let (token, _) = split_type_token(rest);
            doc.return_type = parse_doc_type(token).or(doc.return_type.take());
        } else if let Some(rest) = strip_tag(line, "var") {
            let (token, _) = split_type_token(rest);
            doc.var_type = parse_doc_type(token).or(doc.var_type.take());
        }
    }
    doc
}

// ─── Line and tag plumbing ──────────────────────────────────────────────────

/// Iterate a docblock's lines with delimiters and the `*` gutter removed.
fn tag_lines(docblock: &str) -> impl Iterator<Item = &str> {
    docblock
        .trim()
        .strip_prefix("/**")
        .unwrap_or(docblock)
        .strip_suffix("*/")
        .unwrap_or(docblock)
        .lines()
        .map(|line| line.trim().trim_start_matches('*').trim())
}

/// Match `@tag`, `@phpstan-tag`, or `@psalm-tag` at the start of a line
/// and return the rest, which must be non-empty.
fn strip_tag<'a>(line: &'a str, tag: &str) -> Option<&'a str> {
    let body = line.strip_prefix('@')?;
    let rest = body
        .strip_prefix(tag)
        .or_else(|| body.strip_prefix("phpstan-")?.strip_prefix(tag))
        .or_else(|| body.strip_prefix("psalm-")?.strip_prefix(tag))?;
    let trimmed = rest.trim_start();
    if trimmed.is_empty() || trimmed.len() == rest.len() {
        // Reject `@params` etc.: the tag must end at a word boundary.
        return None;
    }
    Some(trimmed)
}

/// `@template NAME`, `@template NAME of TYPE`, with `-covariant` /
/// `-contravariant` suffixes and `@phpstan-` / `@psalm-` prefixes.
fn parse_template_line(line: &str) -> Option<(String, Type, Variance)> {
    let body = line.strip_prefix('@')?;
    let body = body
        .strip_prefix("phpstan-")
        .or_else(|| body.strip_prefix("psalm-"))
        .unwrap_or(body);
    let rest = body.strip_prefix("template")?;
    let (rest, variance) = if let Some(r) = rest.strip_prefix("-covariant") {
        (r, Variance::Covariant)
    } else if let Some(r) = rest.strip_prefix("-contravariant") {
        (r, Variance::Contravariant)
    } else {
        (rest, Variance::Invariant)
    };
    let trimmed = rest.trim_start();
    if trimmed.is_empty() || trimmed.len() == rest.len() {
        return None;
    }

    let mut words = trimmed.split_whitespace();
    let name = words.next()?;
    if !name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
    {
        return None;
    }
    let constraint = if words.next() == Some("of") {
        let bound_start = trimmed.find(" of ").map(|at| at + 4)?;
        let (token, _) = split_type_token(trimmed[bound_start..].trim_start());
        parse_doc_type(token).unwrap_or(Type::Mixed)
    } else {
        Type::Mixed
    };
    Some((name.to_string(), constraint, variance))
}

/// `@extends Base<int, T>` and friends, returning a [`ClassRef`] with
/// the use-site template arguments.
fn parse_ref_line(line: &str, tag: &str) -> Option<ClassRef> {
    let rest = strip_tag(line, tag)?;
    let (token, _) = split_type_token(rest);
    match parse_doc_type(token)? {
        Type::NamedObject { class, arguments } => Some(ClassRef { name: class, arguments }),
        _ => None,
    }
}

/// `@phpstan-type Name TYPE` / `@psalm-type Name TYPE`.
fn parse_alias_line(line: &str) -> Option<(String, Type)> {
    let rest = strip_tag(line, "type")?;
    let mut words = rest.splitn(2, char::is_whitespace);
    let name = words.next()?;
    let (token, _) = split_type_token(words.next()?.trim_start());
    Some((name.to_string(), parse_doc_type(token)?))
}

/// Take the leading type token from a tag body, respecting `<>`, `()`,
/// `{}`, and `[]` nesting so that `array<int, string>` and conditional
/// `( ... ? ... : ... )` forms survive their interior spaces.
fn split_type_token(text: &str) -> (&str, &str) {
    let mut depth = 0usize;
    for (index, c) in text.char_indices() {
        match c {
            '<' | '(' | '{' | '[' => depth += 1,
            '>' | ')' | '}' | ']' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                return (&text[..index], &text[index..]);
            }
            _ => {}
        }
    }
    (text, "")
}

/// Parse a doc type text, logging and discarding failures.
fn parse_doc_type(token: &str) -> Option<Type> {
    if token.is_empty() {
        return None;
    }
    match typetext::parse(token) {
        Ok(ty) => Some(ty),
        Err(error) => {
            debug!(%token, %error, "discarding unparsable doc type");
            None
        }
    }
}
