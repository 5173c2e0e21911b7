//! Template declarations and substitution across inheritance.

mod common;

use typelens::ty::{TemplateScope, Type, Variance};
use typelens::types;

use common::reflector_for;

fn box_source() -> &'static str {
    concat!(
        "<?php\n",
        "/**\n",
        " * @template T\n",
        " */\n",
        "class Box {\n",
        "    /** @var T */\n",
        "    public $value;\n",
        "    /** @return T */\n",
        "    public function get() { return $this->value; }\n",
        "}\n",
    )
}

// ─── Declarations ───────────────────────────────────────────────────────────

#[test]
fn class_templates_are_declared_in_order() {
    let reflector = reflector_for(concat!(
        "<?php\n",
        "/**\n",
        " * @template K of array-key\n",
        " * @template-covariant V\n",
        " */\n",
        "class Map {}\n",
    ));
    let map = reflector.reflect("Map").unwrap();

    let k = map.template("K").unwrap();
    assert_eq!(k.position, 0);
    assert_eq!(k.constraint, types::array_key());
    assert_eq!(k.variance, Variance::Invariant);

    let v = map.template("V").unwrap();
    assert_eq!(v.position, 1);
    assert_eq!(v.constraint, types::mixed());
    assert_eq!(v.variance, Variance::Covariant);

    assert!(map.template("W").is_err());
}

/// A bare template name inside a member type becomes a template
/// occurrence scoped to the declaring class.
#[test]
fn template_names_resolve_to_occurrences() {
    let reflector = reflector_for(box_source());
    let boxed = reflector.reflect("Box").unwrap();
    let value = boxed.property("value").unwrap();
    assert_eq!(
        value.facets.resolved(),
        types::unconstrained_template("T", TemplateScope::AtClass("Box".into()))
    );
}

// ─── Explicit specialization ────────────────────────────────────────────────

#[test]
fn with_resolved_templates_substitutes_members() {
    let reflector = reflector_for(box_source());
    let int_box = reflector
        .reflect("Box")
        .unwrap()
        .with_resolved_templates(vec![types::int()]);

    assert_eq!(int_box.property("value").unwrap().facets.resolved(), types::int());
    assert_eq!(
        int_box.method("get").unwrap().return_facets.resolved(),
        types::int()
    );
}

#[test]
fn unsupplied_arguments_fall_back_to_constraints() {
    let reflector = reflector_for(concat!(
        "<?php\n",
        "/** @template T of scalar */\n",
        "class Wrapper {\n",
        "    /** @var T */\n",
        "    public $inner;\n",
        "}\n",
    ));
    let wrapper = reflector
        .reflect("Wrapper")
        .unwrap()
        .with_resolved_templates(Vec::new());
    assert_eq!(
        wrapper.property("inner").unwrap().facets.resolved(),
        types::scalar()
    );
}

// ─── Substitution across inheritance edges ──────────────────────────────────

#[test]
fn extends_arguments_substitute_inherited_members() {
    let source = format!(
        "{}{}",
        box_source(),
        concat!(
            "/** @extends Box<int> */\n",
            "class IntBox extends Box {}\n",
        )
    );
    let reflector = reflector_for(&source);
    let int_box = reflector.reflect("IntBox").unwrap();

    assert_eq!(int_box.property("value").unwrap().facets.resolved(), types::int());
    assert_eq!(
        int_box.method("get").unwrap().return_facets.resolved(),
        types::int()
    );
}

#[test]
fn bare_extends_degrades_templates_to_constraints() {
    let source = format!("{}{}", box_source(), "class RawBox extends Box {}\n");
    let reflector = reflector_for(&source);
    let raw_box = reflector.reflect("RawBox").unwrap();
    assert_eq!(
        raw_box.property("value").unwrap().facets.resolved(),
        types::mixed()
    );
}

#[test]
fn implements_arguments_substitute_interface_members() {
    let reflector = reflector_for(concat!(
        "<?php\n",
        "/** @template T */\n",
        "interface Producer {\n",
        "    /** @return T */\n",
        "    public function produce();\n",
        "}\n",
        "/** @implements Producer<list<string>> */\n",
        "class NameProducer implements Producer {}\n",
    ));
    let producer = reflector.reflect("NameProducer").unwrap();
    assert_eq!(
        producer.method("produce").unwrap().return_facets.resolved(),
        types::list_of(types::string())
    );
}

#[test]
fn trait_use_arguments_substitute_trait_members() {
    let reflector = reflector_for(concat!(
        "<?php\n",
        "/** @template T */\n",
        "trait Holds {\n",
        "    /** @var T */\n",
        "    public $held;\n",
        "}\n",
        "/** @use Holds<bool> */\n",
        "class Flag {\n",
        "    use Holds;\n",
        "}\n",
    ));
    let flag = reflector.reflect("Flag").unwrap();
    assert_eq!(flag.property("held").unwrap().facets.resolved(), types::bool_());
}

/// Method-level templates are out of scope for the inheritance-edge
/// substitution and survive the merge intact.
#[test]
fn method_templates_survive_the_merge() {
    let source = format!(
        "{}{}",
        concat!(
            "<?php\n",
            "/** @template T */\n",
            "class Base {\n",
            "    /**\n",
            "     * @template U\n",
            "     * @param U $seed\n",
            "     * @return U\n",
            "     */\n",
            "    public function pass($seed) { return $seed; }\n",
            "}\n",
        ),
        concat!(
            "/** @extends Base<int> */\n",
            "class Child extends Base {}\n",
        )
    );
    let reflector = reflector_for(&source);
    let child = reflector.reflect("Child").unwrap();
    let pass = child.method("pass").unwrap();

    assert_eq!(pass.templates.len(), 1);
    assert_eq!(pass.templates[0].name, "U");
    assert_eq!(
        pass.return_facets.resolved(),
        types::unconstrained_template("U", TemplateScope::AtMethod("Base".into(), "pass".into()))
    );
}

// ─── self / static across edges ─────────────────────────────────────────────

#[test]
fn self_binds_to_the_declaring_class() {
    let reflector = reflector_for(concat!(
        "<?php\n",
        "class Base {\n",
        "    public function same(): self { return $this; }\n",
        "}\n",
        "class Child extends Base {}\n",
    ));
    let child = reflector.reflect("Child").unwrap();
    assert_eq!(
        child.method("same").unwrap().return_facets.resolved(),
        types::object_of("Base")
    );
}

#[test]
fn static_binds_to_the_reflecting_class() {
    let reflector = reflector_for(concat!(
        "<?php\n",
        "class Base {\n",
        "    public function fresh(): static { return new static(); }\n",
        "}\n",
        "class Child extends Base {}\n",
    ));
    let child = reflector.reflect("Child").unwrap();
    assert_eq!(
        child.method("fresh").unwrap().return_facets.resolved(),
        types::object_of("Child")
    );

    // The declaring class binds the marker to itself.
    let base = reflector.reflect("Base").unwrap();
    assert_eq!(
        base.method("fresh").unwrap().return_facets.resolved(),
        types::object_of("Base")
    );
}

/// Late static binding must survive intermediate classes: the class
/// being reflected wins, not whichever ancestor happened to sit on the
/// first inheritance edge, and a map resolved for the bottom of the
/// chain must not leak a middle class into later reflections.
#[test]
fn static_stays_late_bound_through_a_chain() {
    let reflector = reflector_for(concat!(
        "<?php\n",
        "class Grand {\n",
        "    public function fresh(): static { return new static(); }\n",
        "}\n",
        "class Mid extends Grand {}\n",
        "class Leaf extends Mid {}\n",
    ));
    let leaf = reflector.reflect("Leaf").unwrap();
    assert_eq!(
        leaf.method("fresh").unwrap().return_facets.resolved(),
        types::object_of("Leaf")
    );

    let mid = reflector.reflect("Mid").unwrap();
    assert_eq!(
        mid.method("fresh").unwrap().return_facets.resolved(),
        types::object_of("Mid")
    );
}

// ─── Generic arguments flowing through a chain ──────────────────────────────

#[test]
fn arguments_compose_through_intermediate_classes() {
    let reflector = reflector_for(concat!(
        "<?php\n",
        "/** @template T */\n",
        "class Upper {\n",
        "    /** @return T */\n",
        "    public function top() {}\n",
        "}\n",
        "/**\n",
        " * @template U\n",
        " * @extends Upper<list<U>>\n",
        " */\n",
        "class Middle extends Upper {}\n",
        "/** @extends Middle<int> */\n",
        "class Lower extends Middle {}\n",
    ));
    let lower = reflector.reflect("Lower").unwrap();
    assert_eq!(
        lower.method("top").unwrap().return_facets.resolved(),
        types::list_of(types::int())
    );
}

#[test]
fn generic_hierarchies_reflect_as_snapshot_types() {
    let reflector = reflector_for(concat!(
        "<?php\n",
        "/** @template T */\n",
        "class Collection {\n",
        "    /** @return list<T> */\n",
        "    public function all() { return []; }\n",
        "}\n",
    ));
    let collection = reflector
        .reflect("Collection")
        .unwrap()
        .with_resolved_templates(vec![types::object_of("User")]);
    let all = collection.method("all").unwrap();
    let Type::List { value } = all.return_facets.resolved() else {
        panic!("expected a list type");
    };
    assert_eq!(*value, types::object_of("User"));
}
