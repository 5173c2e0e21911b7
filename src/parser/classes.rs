//! Class, interface, trait, and enum extraction.
//!
//! Walks the parsed AST and builds one [`ClassMetadata`] per class-like
//! declaration: members with native and doc type facets, template
//! declarations, ancestor references with doc-supplied template
//! arguments, promoted constructor properties, and enum cases as
//! constants.

use mago_syntax::ast::{
    ClassLikeMember, FunctionLikeParameter, Hint, Modifier, Property, Statement,
};

use crate::docblock::{self, ClassDoc, MemberDoc};
use crate::parser::DocblockCtx;
use crate::parser::names::short_name;
use crate::reflect::{
    ClassConstantMetadata, ClassKind, ClassMetadata, ClassRef, MethodMetadata, ParameterMetadata,
    PropertyMetadata, TypeFacets, Visibility,
};
use crate::ty::Type;
use crate::types;

/// Recursively walk statements (including namespace bodies) and extract
/// every class-like declaration.
pub(crate) fn extract_classes<'a>(
    statements: impl Iterator<Item = &'a Statement<'a>>,
    classes: &mut Vec<ClassMetadata>,
    ctx: &DocblockCtx<'a>,
) {
    for statement in statements {
        match statement {
            Statement::Class(class) => {
                let doc = class_doc_for(class, ctx);
                let mut metadata = ClassMetadata::new(class.name.value, ClassKind::Class);
                metadata.is_final = class.modifiers.contains_final();
                metadata.is_abstract = class.modifiers.contains_abstract();
                metadata.is_readonly = class.modifiers.iter().any(|m| m.is_readonly());
                metadata.templates = doc.templates.clone();
                metadata.aliases = doc.aliases.clone();

                metadata.parent = class.extends.as_ref().and_then(|extends| {
                    extends
                        .types
                        .first()
                        .map(|ident| ancestor_ref(ident.value(), &doc.extends))
                });
                if let Some(implements) = class.implements.as_ref() {
                    metadata.interfaces = implements
                        .types
                        .iter()
                        .map(|ident| ancestor_ref(ident.value(), &doc.implements))
                        .collect();
                }

                extract_members(class.members.iter(), &mut metadata, &doc, ctx);
                classes.push(metadata);
            }
            Statement::Interface(interface) => {
                let doc = class_doc_for(interface, ctx);
                let mut metadata = ClassMetadata::new(interface.name.value, ClassKind::Interface);
                metadata.templates = doc.templates.clone();
                metadata.aliases = doc.aliases.clone();

                // Interfaces may extend several parents; they all merge
                // in interface position.
                if let Some(extends) = interface.extends.as_ref() {
                    metadata.interfaces = extends
                        .types
                        .iter()
                        .map(|ident| ancestor_ref(ident.value(), &doc.extends))
                        .collect();
                }

                extract_members(interface.members.iter(), &mut metadata, &doc, ctx);
                classes.push(metadata);
            }
            Statement::Trait(trait_def) => {
                let doc = class_doc_for(trait_def, ctx);
                let mut metadata = ClassMetadata::new(trait_def.name.value, ClassKind::Trait);
                metadata.templates = doc.templates.clone();
                metadata.aliases = doc.aliases.clone();
                extract_members(trait_def.members.iter(), &mut metadata, &doc, ctx);
                classes.push(metadata);
            }
            Statement::Enum(enum_def) => {
                let doc = class_doc_for(enum_def, ctx);
                let mut metadata = ClassMetadata::new(enum_def.name.value, ClassKind::Enum);
                metadata.is_final = true;
                if let Some(implements) = enum_def.implements.as_ref() {
                    metadata.interfaces = implements
                        .types
                        .iter()
                        .map(|ident| ancestor_ref(ident.value(), &doc.implements))
                        .collect();
                }
                extract_members(enum_def.members.iter(), &mut metadata, &doc, ctx);
                classes.push(metadata);
            }
            Statement::Namespace(namespace) => {
                extract_classes(namespace.statements().iter(), classes, ctx);
            }
            _ => {}
        }
    }
}

fn class_doc_for<'a>(node: &impl mago_span::HasSpan, ctx: &DocblockCtx<'a>) -> ClassDoc {
    docblock::docblock_for_node(ctx.trivias, ctx.content, node)
        .map(docblock::class_doc)
        .unwrap_or_default()
}

/// Build an ancestor reference from a native name, picking up use-site
/// template arguments from the matching doc tag (compared by short name,
/// since the doc tag and the native clause may differ in qualification).
fn ancestor_ref(native_name: &str, doc_refs: &[ClassRef]) -> ClassRef {
    let arguments = doc_refs
        .iter()
        .find(|reference| short_name(&reference.name) == short_name(native_name))
        .map(|reference| reference.arguments.clone())
        .unwrap_or_default();
    ClassRef::with_arguments(native_name, arguments)
}

fn extract_members<'a>(
    members: impl Iterator<Item = &'a ClassLikeMember<'a>>,
    metadata: &mut ClassMetadata,
    class_doc: &ClassDoc,
    ctx: &DocblockCtx<'a>,
) {
    for member in members {
        match member {
            ClassLikeMember::Method(method) => {
                let doc = docblock::docblock_for_node(ctx.trivias, ctx.content, method)
                    .map(docblock::member_doc)
                    .unwrap_or_default();

                let name = method.name.value.to_string();
                let parameters: Vec<ParameterMetadata> = method
                    .parameter_list
                    .parameters
                    .iter()
                    .map(|parameter| extract_parameter(parameter, &doc))
                    .collect();

                // Promoted constructor properties become properties of
                // the class, sharing the parameter's facets.
                if name == "__construct" {
                    for parameter in method.parameter_list.parameters.iter() {
                        if !parameter.is_promoted_property() {
                            continue;
                        }
                        let extracted = extract_parameter(parameter, &doc);
                        metadata.properties.insert(
                            extracted.name.clone(),
                            PropertyMetadata {
                                name: extracted.name.clone(),
                                visibility: visibility(parameter.modifiers.iter()),
                                is_static: false,
                                is_readonly: parameter
                                    .modifiers
                                    .iter()
                                    .any(|m| m.is_readonly()),
                                facets: extracted.facets,
                            },
                        );
                    }
                }

                let return_facets = TypeFacets {
                    native: method
                        .return_type_hint
                        .as_ref()
                        .map(|hint| hint_to_type(&hint.hint)),
                    doc: doc.return_type.clone(),
                };

                metadata.methods.insert(
                    name.clone(),
                    MethodMetadata {
                        name,
                        visibility: visibility(method.modifiers.iter()),
                        is_static: method.modifiers.iter().any(|m| m.is_static()),
                        is_abstract: method.modifiers.contains_abstract(),
                        is_final: method.modifiers.contains_final(),
                        templates: doc.templates,
                        parameters,
                        return_facets,
                    },
                );
            }
            ClassLikeMember::Property(property) => {
                let doc = docblock::docblock_for_node(ctx.trivias, ctx.content, member)
                    .map(docblock::member_doc)
                    .unwrap_or_default();
                for extracted in extract_properties(property, &doc) {
                    metadata.properties.insert(extracted.name.clone(), extracted);
                }
            }
            ClassLikeMember::Constant(constant) => {
                let doc = docblock::docblock_for_node(ctx.trivias, ctx.content, member)
                    .map(docblock::member_doc)
                    .unwrap_or_default();
                let facets = TypeFacets {
                    native: constant.hint.as_ref().map(hint_to_type),
                    doc: doc.var_type,
                };
                let vis = visibility(constant.modifiers.iter());
                let is_final = constant.modifiers.contains_final();
                for item in constant.items.iter() {
                    let name = item.name.value.to_string();
                    metadata.constants.insert(
                        name.clone(),
                        ClassConstantMetadata {
                            name,
                            visibility: vis,
                            is_final,
                            facets: facets.clone(),
                        },
                    );
                }
            }
            ClassLikeMember::EnumCase(case) => {
                let name = case.item.name().value.to_string();
                metadata.constants.insert(
                    name.clone(),
                    ClassConstantMetadata {
                        name,
                        visibility: Visibility::Public,
                        is_final: false,
                        facets: TypeFacets::native(types::self_(Vec::new())),
                    },
                );
            }
            ClassLikeMember::TraitUse(trait_use) => {
                for ident in trait_use.trait_names.iter() {
                    metadata
                        .trait_uses
                        .push(ancestor_ref(ident.value(), &class_doc.trait_uses));
                }
            }
        }
    }
}

fn extract_parameter(parameter: &FunctionLikeParameter<'_>, doc: &MemberDoc) -> ParameterMetadata {
    let raw_name = parameter.variable.name.to_string();
    let name = raw_name.strip_prefix('$').unwrap_or(&raw_name).to_string();
    ParameterMetadata {
        facets: TypeFacets {
            native: parameter.hint.as_ref().map(hint_to_type),
            doc: doc.params.get(&name).cloned(),
        },
        name,
        has_default: parameter.default_value.is_some(),
        variadic: parameter.ellipsis.is_some(),
        by_reference: parameter.ampersand.is_some(),
    }
}

fn extract_properties(property: &Property<'_>, doc: &MemberDoc) -> Vec<PropertyMetadata> {
    let is_static = property.modifiers().iter().any(|m| m.is_static());
    let is_readonly = property.modifiers().iter().any(|m| m.is_readonly());
    let vis = visibility(property.modifiers().iter());
    let native = property.hint().map(hint_to_type);

    property
        .variables()
        .iter()
        .map(|variable| {
            let raw_name = variable.name.to_string();
            let name = raw_name.strip_prefix('$').unwrap_or(&raw_name).to_string();
            PropertyMetadata {
                name,
                visibility: vis,
                is_static,
                is_readonly,
                facets: TypeFacets {
                    native: native.clone(),
                    doc: doc.var_type.clone(),
                },
            }
        })
        .collect()
}

/// Defaults to `Public` when no visibility modifier is present.
fn visibility<'a>(modifiers: impl Iterator<Item = &'a Modifier<'a>>) -> Visibility {
    for modifier in modifiers {
        if modifier.is_private() {
            return Visibility::Private;
        }
        if modifier.is_protected() {
            return Visibility::Protected;
        }
        if modifier.is_public() {
            return Visibility::Public;
        }
    }
    Visibility::Public
}

/// Convert a native hint from the AST into a type tree. Names stay raw;
/// the contextualization pass qualifies them afterwards.
pub(crate) fn hint_to_type(hint: &Hint<'_>) -> Type {
    match hint {
        Hint::Identifier(ident) => Type::NamedObject {
            class: ident.value().to_string(),
            arguments: Vec::new(),
        },
        Hint::Nullable(nullable) => types::nullable(hint_to_type(nullable.hint)),
        Hint::Union(_) => {
            let mut members = Vec::new();
            collect_union(hint, &mut members);
            Type::Union(members)
        }
        Hint::Intersection(_) => {
            let mut members = Vec::new();
            collect_intersection(hint, &mut members);
            Type::Intersection(members)
        }
        Hint::Void(_) => Type::Void,
        Hint::Never(_) => Type::Never,
        Hint::Float(_) => Type::Float,
        Hint::Bool(_) => Type::Bool,
        Hint::Integer(_) => Type::Int,
        Hint::String(_) => Type::String,
        Hint::Object(_) => Type::Object,
        Hint::Mixed(_) => Type::Mixed,
        Hint::Iterable(_) => types::iterable(),
        Hint::Null(_) => Type::Null,
        Hint::True(_) => Type::True,
        Hint::False(_) => Type::False,
        Hint::Array(_) => types::array(),
        Hint::Callable(_) => types::callable(),
        Hint::Static(_) => types::static_(Vec::new()),
        Hint::Self_(_) => types::self_(Vec::new()),
        Hint::Parent(_) => types::parent_(Vec::new()),
        Hint::Parenthesized(parenthesized) => hint_to_type(parenthesized.hint),
    }
}

/// Flatten nested binary union hints (`A|B|C` parses as a left-leaning
/// chain) into one member list.
fn collect_union(hint: &Hint<'_>, members: &mut Vec<Type>) {
    match hint {
        Hint::Union(union) => {
            collect_union(union.left, members);
            collect_union(union.right, members);
        }
        other => members.push(hint_to_type(other)),
    }
}

fn collect_intersection(hint: &Hint<'_>, members: &mut Vec<Type>) {
    match hint {
        Hint::Intersection(intersection) => {
            collect_intersection(intersection.left, members);
            collect_intersection(intersection.right, members);
        }
        other => members.push(hint_to_type(other)),
    }
}
