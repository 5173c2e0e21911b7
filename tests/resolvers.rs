//! Static and template substitution.

use indexmap::IndexMap;
use typelens::reflect::TemplateDeclaration;
use typelens::ty::{ShapeElement, TemplateScope, Type, Variance};
use typelens::types;
use typelens::{StaticResolver, TemplateArguments, TemplateResolver, TypeRewriter};

fn declaration(position: usize, name: &str, constraint: Type) -> TemplateDeclaration {
    TemplateDeclaration {
        position,
        name: name.to_string(),
        constraint,
        variance: Variance::Invariant,
    }
}

// ─── StaticResolver ─────────────────────────────────────────────────────────

#[test]
fn static_resolves_at_any_depth() {
    let resolver = StaticResolver::new("Acme\\User");
    let ty = types::union(vec![
        types::null(),
        types::list_of(types::static_(Vec::new())),
    ]);
    assert_eq!(
        resolver.rewrite(&ty),
        types::union(vec![
            types::null(),
            types::list_of(types::object_of("Acme\\User")),
        ])
    );
}

#[test]
fn static_arguments_are_rewritten_too() {
    let resolver = StaticResolver::new("Builder");
    let ty = types::static_(vec![types::static_(Vec::new())]);
    assert_eq!(
        resolver.rewrite(&ty),
        types::named_object("Builder", vec![types::object_of("Builder")])
    );
}

#[test]
fn self_and_parent_resolve_only_when_configured() {
    let bare = StaticResolver::new("Child");
    assert_eq!(bare.rewrite(&types::self_(Vec::new())), types::self_(Vec::new()));
    assert_eq!(
        bare.rewrite(&types::parent_(Vec::new())),
        types::parent_(Vec::new())
    );

    let full = StaticResolver::new("Child").with_self("Child").with_parent("Base");
    assert_eq!(full.rewrite(&types::self_(Vec::new())), types::object_of("Child"));
    assert_eq!(full.rewrite(&types::parent_(Vec::new())), types::object_of("Base"));
}

#[test]
fn static_resolution_is_idempotent() {
    let resolver = StaticResolver::new("User").with_self("User").with_parent("Base");
    let ty = types::array_of(types::string(), types::static_(Vec::new()));
    let once = resolver.rewrite(&ty);
    assert_eq!(resolver.rewrite(&once), once);
}

// ─── TemplateArguments ──────────────────────────────────────────────────────

#[test]
fn named_arguments_win_over_positional() {
    let mut arguments = TemplateArguments::positional(vec![types::int()]);
    arguments.insert("T", types::string());
    assert_eq!(arguments.get("T", 0), Some(&types::string()));
    assert_eq!(arguments.get("U", 0), Some(&types::int()));
    assert_eq!(arguments.get("U", 1), None);
}

// ─── TemplateResolver ───────────────────────────────────────────────────────

#[test]
fn unscoped_resolver_replaces_every_template() {
    let mut bindings = IndexMap::new();
    bindings.insert("T".to_string(), types::int());
    let resolver = TemplateResolver::new(bindings);

    let at_class = types::template("T", TemplateScope::AtClass("Box".into()), types::mixed());
    let at_method = types::template(
        "T",
        TemplateScope::AtMethod("Box".into(), "map".into()),
        types::mixed(),
    );
    assert_eq!(resolver.rewrite(&at_class), types::int());
    assert_eq!(resolver.rewrite(&at_method), types::int());
}

#[test]
fn unbound_templates_degrade_to_their_constraints() {
    let resolver = TemplateResolver::new(IndexMap::new());
    let ty = types::template("K", TemplateScope::AtClass("Map".into()), types::array_key());
    assert_eq!(resolver.rewrite(&ty), types::array_key());
}

#[test]
fn class_scoped_resolver_binds_by_name_then_position() {
    let templates = vec![
        declaration(0, "K", types::array_key()),
        declaration(1, "V", types::mixed()),
    ];
    let mut arguments = TemplateArguments::positional(vec![types::int(), types::string()]);
    arguments.insert("V", types::bool_());
    let resolver = TemplateResolver::for_class("Map", &templates, &arguments);

    let k = types::template("K", TemplateScope::AtClass("Map".into()), types::array_key());
    let v = types::template("V", TemplateScope::AtClass("Map".into()), types::mixed());
    assert_eq!(resolver.rewrite(&k), types::int());
    assert_eq!(resolver.rewrite(&v), types::bool_());
}

#[test]
fn missing_arguments_fall_back_to_constraints() {
    let templates = vec![declaration(0, "T", types::scalar())];
    let resolver = TemplateResolver::for_class("Box", &templates, &TemplateArguments::none());
    let t = types::template("T", TemplateScope::AtClass("Box".into()), types::scalar());
    assert_eq!(resolver.rewrite(&t), types::scalar());
}

#[test]
fn scope_restriction_keeps_foreign_templates_intact() {
    let templates = vec![declaration(0, "T", types::mixed())];
    let arguments = TemplateArguments::positional(vec![types::int()]);
    let resolver = TemplateResolver::for_class("Box", &templates, &arguments);

    // A method-level template of the same name stays untouched.
    let method_t = types::template(
        "T",
        TemplateScope::AtMethod("Box".into(), "map".into()),
        types::mixed(),
    );
    assert_eq!(resolver.rewrite(&method_t), method_t);

    // A class template from a different class stays untouched as well.
    let other_t = types::template("T", TemplateScope::AtClass("Other".into()), types::mixed());
    assert_eq!(resolver.rewrite(&other_t), other_t);
}

#[test]
fn out_of_scope_template_constraints_are_still_rewritten() {
    let templates = vec![declaration(0, "T", types::mixed())];
    let arguments = TemplateArguments::positional(vec![types::int()]);
    let resolver = TemplateResolver::for_class("Box", &templates, &arguments);

    let nested = types::template(
        "U",
        TemplateScope::AtMethod("Box".into(), "map".into()),
        types::template("T", TemplateScope::AtClass("Box".into()), types::mixed()),
    );
    assert_eq!(
        resolver.rewrite(&nested),
        types::template(
            "U",
            TemplateScope::AtMethod("Box".into(), "map".into()),
            types::int(),
        )
    );
}

#[test]
fn class_scoped_resolver_binds_self_and_static() {
    let resolver = TemplateResolver::for_class("Base", &[], &TemplateArguments::none())
        .with_static("Child");
    assert_eq!(resolver.rewrite(&types::self_(Vec::new())), types::object_of("Base"));
    assert_eq!(
        resolver.rewrite(&types::static_(Vec::new())),
        types::object_of("Child")
    );
}

#[test]
fn substitution_reaches_nested_positions() {
    let templates = vec![declaration(0, "T", types::mixed())];
    let arguments = TemplateArguments::positional(vec![types::object_of("User")]);
    let resolver = TemplateResolver::for_class("Repo", &templates, &arguments);

    let t = types::template("T", TemplateScope::AtClass("Repo".into()), types::mixed());
    let ty = types::callable_with(
        vec![types::param(types::class_string_of(t.clone()))],
        types::nullable(t.clone()),
    );
    assert_eq!(
        resolver.rewrite(&ty),
        types::callable_with(
            vec![types::param(types::class_string_of(types::object_of("User")))],
            types::nullable(types::object_of("User")),
        )
    );
}

/// An empty resolver must handle every node kind: templates degrade to
/// their constraints, everything else comes back unchanged.
#[test]
fn empty_resolver_is_total_over_every_node_kind() {
    let resolver = TemplateResolver::new(IndexMap::new());

    let unchanged = vec![
        types::never(),
        types::void(),
        types::null(),
        types::true_(),
        types::false_(),
        types::bool_(),
        types::int(),
        types::float(),
        types::string(),
        types::numeric_string(),
        types::non_empty_string(),
        types::object(),
        types::mixed(),
        types::resource(),
        types::int_literal(7),
        types::float_literal(0.5),
        types::string_literal("done"),
        types::class_string_literal("Acme\\User"),
        types::int_range(Some(0), None),
        types::array_of(types::string(), types::int()),
        types::list_of(types::int()),
        types::iterable_of(types::string(), types::bool_()),
        types::non_empty(types::list()),
        types::array_shape(vec![("id".into(), ShapeElement::required(types::int()))]),
        types::object_shape(vec![("name".into(), ShapeElement::optional(types::string()))]),
        types::callable_with(vec![types::param(types::int())], types::void()),
        types::closure_with(Vec::new(), types::never()),
        types::named_object("Collection", vec![types::int()]),
        types::static_(Vec::new()),
        types::self_(Vec::new()),
        types::parent_(Vec::new()),
        types::class_string(),
        types::class_string_of(types::object_of("Acme\\User")),
        types::union(vec![types::int(), types::string()]),
        types::intersection(vec![types::object_of("Countable"), types::object_of("Iterator")]),
        types::constant("PHP_INT_MAX"),
        types::class_constant("Order", "OPEN"),
        types::conditional(
            types::object_of("Input"),
            types::int(),
            types::string(),
            types::float(),
        ),
        types::key_of(types::object_of("Config")),
        types::value_of(types::object_of("Config")),
        types::offset(types::object_of("Config"), types::string_literal("db")),
        types::alias("Table", "Row"),
        types::covariant(types::int()),
    ];
    for ty in unchanged {
        assert_eq!(resolver.rewrite(&ty), ty);
    }

    let t = types::template("T", TemplateScope::AtClass("Box".into()), types::scalar());
    assert_eq!(resolver.rewrite(&t), types::scalar());
    let u = types::template(
        "U",
        TemplateScope::AtMethod("Box".into(), "map".into()),
        types::mixed(),
    );
    assert_eq!(resolver.rewrite(&u), types::mixed());
}

#[test]
fn template_resolution_is_idempotent() {
    let templates = vec![declaration(0, "T", types::mixed())];
    let arguments = TemplateArguments::positional(vec![types::list_of(types::int())]);
    let resolver = TemplateResolver::for_class("Box", &templates, &arguments);

    let t = types::template("T", TemplateScope::AtClass("Box".into()), types::mixed());
    let once = resolver.rewrite(&types::array_of_value(t));
    assert_eq!(resolver.rewrite(&once), once);
}
