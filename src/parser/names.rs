//! Name context: `use` maps, namespaces, and the rewriter passes that
//! apply them to parsed metadata.
//!
//! Parsed types initially contain raw [`Type::NamedObject`] references
//! exactly as written in source. Two rewriter passes turn them into the
//! model's canonical form:
//!
//!   1. *Marking* replaces bare names that match an in-scope `@template`
//!      parameter or a local `@phpstan-type` alias with the dedicated
//!      [`Type::Template`] / [`Type::Alias`] nodes.
//!   2. *Qualification* expands the remaining class names to their
//!      fully-qualified form through the file's import table and
//!      namespace.

use std::collections::HashMap;

use mago_syntax::ast::{Statement, UseItem, UseItems};

use crate::reflect::{ClassMetadata, ClassRef, TemplateDeclaration, TypeFacets};
use crate::rewrite::TypeRewriter;
use crate::ty::{TemplateScope, TemplateType, Type};

/// Walk statements and build the short-name → fully-qualified-name
/// import table. Function and constant imports are skipped; only class
/// names participate in type resolution.
pub(crate) fn use_map<'a>(
    statements: impl Iterator<Item = &'a Statement<'a>>,
) -> HashMap<String, String> {
    let mut map = HashMap::new();
    collect_use_statements(statements, &mut map);
    map
}

fn collect_use_statements<'a>(
    statements: impl Iterator<Item = &'a Statement<'a>>,
    map: &mut HashMap<String, String>,
) {
    for statement in statements {
        match statement {
            Statement::Use(use_stmt) => collect_use_items(&use_stmt.items, map),
            Statement::Namespace(namespace) => {
                collect_use_statements(namespace.statements().iter(), map);
            }
            _ => {}
        }
    }
}

fn collect_use_items(items: &UseItems, map: &mut HashMap<String, String>) {
    match items {
        UseItems::Sequence(sequence) => {
            for item in sequence.items.iter() {
                register_use_item(item, None, map);
            }
        }
        UseItems::TypedSequence(sequence) => {
            if sequence.r#type.is_function() || sequence.r#type.is_const() {
                return;
            }
            for item in sequence.items.iter() {
                register_use_item(item, None, map);
            }
        }
        UseItems::TypedList(list) => {
            if list.r#type.is_function() || list.r#type.is_const() {
                return;
            }
            for item in list.items.iter() {
                register_use_item(item, Some(list.namespace.value()), map);
            }
        }
        UseItems::MixedList(list) => {
            for maybe_typed in list.items.iter() {
                if let Some(ref t) = maybe_typed.r#type
                    && (t.is_function() || t.is_const())
                {
                    continue;
                }
                register_use_item(&maybe_typed.item, Some(list.namespace.value()), map);
            }
        }
    }
}

fn register_use_item(item: &UseItem, group_prefix: Option<&str>, map: &mut HashMap<String, String>) {
    let fqn = match group_prefix {
        Some(prefix) => format!("{prefix}\\{}", item.name.value()),
        None => item.name.value().to_string(),
    };
    let imported = match item.alias {
        Some(ref alias) => alias.identifier.value.to_string(),
        None => short_name(&fqn).to_string(),
    };
    map.insert(imported, fqn);
}

/// The first namespace declared in the file, if any.
pub(crate) fn namespace<'a>(
    statements: impl Iterator<Item = &'a Statement<'a>>,
) -> Option<String> {
    for statement in statements {
        if let Statement::Namespace(ns) = statement
            && let Some(ident) = &ns.name
        {
            let name = ident.value();
            if !name.is_empty() {
                return Some(name.to_string());
            }
        }
    }
    None
}

/// The last `\`-separated segment of a class name.
pub(crate) fn short_name(name: &str) -> &str {
    name.rsplit('\\').next().unwrap_or(name)
}

// ─── Contextualization ──────────────────────────────────────────────────────

/// Apply marking and qualification to every type a class's metadata
/// carries, and qualify the class and ancestor names themselves.
pub(crate) fn contextualize(
    metadata: &mut ClassMetadata,
    use_map: &HashMap<String, String>,
    namespace: Option<&str>,
) {
    if let Some(ns) = namespace {
        metadata.name = format!("{ns}\\{}", metadata.name);
    }
    let class = metadata.name.clone();
    let alias_names: Vec<String> = metadata.aliases.keys().cloned().collect();
    let qualifier = Qualifier { use_map, namespace };

    // Template constraints first, marked against the raw declarations so
    // that mutually-referencing bounds still resolve.
    let raw_templates = metadata.templates.clone();
    {
        let marker = Marker {
            class: &class,
            class_templates: &raw_templates,
            method_templates: &[],
            method: None,
            aliases: &alias_names,
        };
        for declaration in &mut metadata.templates {
            declaration.constraint = qualifier.rewrite(&marker.rewrite(&declaration.constraint));
        }
    }
    let class_templates = metadata.templates.clone();
    let class_marker = Marker {
        class: &class,
        class_templates: &class_templates,
        method_templates: &[],
        method: None,
        aliases: &alias_names,
    };

    // Ancestor references: qualify the name, rewrite the use-site
    // arguments (which may mention class templates).
    let mut rewrite_ref = |reference: &mut ClassRef| {
        reference.name = qualifier.qualify_name(&reference.name);
        for argument in &mut reference.arguments {
            *argument = qualifier.rewrite(&class_marker.rewrite(argument));
        }
    };
    if let Some(parent) = &mut metadata.parent {
        rewrite_ref(parent);
    }
    metadata.interfaces.iter_mut().for_each(&mut rewrite_ref);
    metadata.trait_uses.iter_mut().for_each(&mut rewrite_ref);

    for body in metadata.aliases.values_mut() {
        *body = qualifier.rewrite(&class_marker.rewrite(body));
    }
    for property in metadata.properties.values_mut() {
        apply(&class_marker, &qualifier, &mut property.facets);
    }
    for constant in metadata.constants.values_mut() {
        apply(&class_marker, &qualifier, &mut constant.facets);
    }

    for method in metadata.methods.values_mut() {
        let name = method.name.clone();
        let raw_method_templates = method.templates.clone();
        {
            let marker = Marker {
                class: &class,
                class_templates: &class_templates,
                method_templates: &raw_method_templates,
                method: Some(&name),
                aliases: &alias_names,
            };
            for declaration in &mut method.templates {
                declaration.constraint =
                    qualifier.rewrite(&marker.rewrite(&declaration.constraint));
            }
        }
        let method_templates = method.templates.clone();
        let marker = Marker {
            class: &class,
            class_templates: &class_templates,
            method_templates: &method_templates,
            method: Some(&name),
            aliases: &alias_names,
        };
        for parameter in &mut method.parameters {
            apply(&marker, &qualifier, &mut parameter.facets);
        }
        apply(&marker, &qualifier, &mut method.return_facets);
    }
}

fn apply(marker: &Marker<'_>, qualifier: &Qualifier<'_>, facets: &mut TypeFacets) {
    if let Some(native) = &facets.native {
        facets.native = Some(qualifier.rewrite(&marker.rewrite(native)));
    }
    if let Some(doc) = &facets.doc {
        facets.doc = Some(qualifier.rewrite(&marker.rewrite(doc)));
    }
}

/// Replaces bare names matching in-scope template parameters or local
/// aliases with [`Type::Template`] / [`Type::Alias`] nodes.
struct Marker<'a> {
    class: &'a str,
    class_templates: &'a [TemplateDeclaration],
    method_templates: &'a [TemplateDeclaration],
    /// The method name, when rewriting inside a method.
    method: Option<&'a str>,
    aliases: &'a [String],
}

impl TypeRewriter for Marker<'_> {
    fn rewrite_named_object(&self, class: &str, arguments: &[Type]) -> Type {
        if arguments.is_empty() {
            if let (Some(method), Some(declaration)) = (
                self.method,
                self.method_templates.iter().find(|t| t.name == class),
            ) {
                return Type::Template(TemplateType {
                    name: declaration.name.clone(),
                    declared_at: TemplateScope::AtMethod(self.class.to_string(), method.to_string()),
                    constraint: Box::new(declaration.constraint.clone()),
                });
            }
            if let Some(declaration) = self.class_templates.iter().find(|t| t.name == class) {
                return Type::Template(TemplateType {
                    name: declaration.name.clone(),
                    declared_at: TemplateScope::AtClass(self.class.to_string()),
                    constraint: Box::new(declaration.constraint.clone()),
                });
            }
            if self.aliases.iter().any(|alias| alias == class) {
                return Type::Alias {
                    class: self.class.to_string(),
                    name: class.to_string(),
                };
            }
        }
        Type::NamedObject {
            class: class.to_string(),
            arguments: self.rewrite_arguments(arguments),
        }
    }
}

/// Expands class names to fully-qualified form.
struct Qualifier<'a> {
    use_map: &'a HashMap<String, String>,
    namespace: Option<&'a str>,
}

impl Qualifier<'_> {
    /// PHP name resolution for a class-name string: a leading `\` makes
    /// it already fully qualified; otherwise the first segment goes
    /// through the import table, and unimported names are prefixed with
    /// the current namespace.
    fn qualify_name(&self, name: &str) -> String {
        if let Some(absolute) = name.strip_prefix('\\') {
            return absolute.to_string();
        }
        let (first, rest) = match name.split_once('\\') {
            Some((first, rest)) => (first, Some(rest)),
            None => (name, None),
        };
        if let Some(imported) = self.use_map.get(first) {
            return match rest {
                Some(rest) => format!("{imported}\\{rest}"),
                None => imported.clone(),
            };
        }
        match self.namespace {
            Some(ns) => format!("{ns}\\{name}"),
            None => name.to_string(),
        }
    }
}

impl TypeRewriter for Qualifier<'_> {
    fn rewrite_named_object(&self, class: &str, arguments: &[Type]) -> Type {
        Type::NamedObject {
            class: self.qualify_name(class),
            arguments: self.rewrite_arguments(arguments),
        }
    }

    fn rewrite_class_string_literal(&self, class: &str) -> Type {
        Type::ClassStringLiteral(self.qualify_name(class))
    }

    fn rewrite_leaf(&self, ty: &Type) -> Type {
        if let Type::ClassConstant { class, constant } = ty {
            return Type::ClassConstant {
                class: self.qualify_name(class),
                constant: constant.clone(),
            };
        }
        ty.clone()
    }
}
