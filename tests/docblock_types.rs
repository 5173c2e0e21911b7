//! Source extraction: native hints, PHPDoc facets, names, and aliases.

mod common;

use typelens::reflect::{ClassKind, Visibility};
use typelens::ty::Type;
use typelens::types;

use common::{reflector_for, shown};

// ─── Facets ─────────────────────────────────────────────────────────────────

/// Both type statements are kept; the doc one wins on resolution.
#[test]
fn doc_types_refine_native_hints() {
    let reflector = reflector_for(concat!(
        "<?php\n",
        "class Article {\n",
        "    /** @var list<string> */\n",
        "    public array $tags;\n",
        "}\n",
    ));
    let article = reflector.reflect("Article").unwrap();
    let tags = article.property("tags").unwrap();
    assert_eq!(tags.facets.native, Some(types::array()));
    assert_eq!(tags.facets.doc, Some(types::list_of(types::string())));
    assert_eq!(tags.facets.resolved(), types::list_of(types::string()));
}

#[test]
fn param_and_return_tags_attach_to_the_method() {
    let reflector = reflector_for(concat!(
        "<?php\n",
        "class Finder {\n",
        "    /**\n",
        "     * @param non-empty-string $query\n",
        "     * @param int<1, max> $limit\n",
        "     * @return list<array{id: int, score: float}>\n",
        "     */\n",
        "    public function search(string $query, int $limit = 10): array { return []; }\n",
        "}\n",
    ));
    let finder = reflector.reflect("Finder").unwrap();
    let search = finder.method("search").unwrap();

    assert_eq!(search.parameters[0].facets.resolved(), types::non_empty_string());
    assert_eq!(search.parameters[1].facets.resolved(), types::positive_int());
    assert!(search.parameters[1].has_default);
    assert_eq!(
        shown(&search.return_facets),
        "list<array{id: int, score: float}>"
    );
}

#[test]
fn unannotated_members_resolve_to_mixed() {
    let reflector = reflector_for(concat!(
        "<?php\n",
        "class Loose {\n",
        "    public $anything;\n",
        "}\n",
    ));
    let loose = reflector.reflect("Loose").unwrap();
    let anything = loose.property("anything").unwrap();
    assert!(anything.facets.is_unspecified());
    assert_eq!(anything.facets.resolved(), types::mixed());
}

/// A malformed doc type loses the doc facet only; the native hint stays.
#[test]
fn malformed_doc_types_degrade_to_the_native_hint() {
    let reflector = reflector_for(concat!(
        "<?php\n",
        "class Sloppy {\n",
        "    /** @var array<int, */\n",
        "    public array $broken;\n",
        "}\n",
    ));
    let sloppy = reflector.reflect("Sloppy").unwrap();
    let broken = sloppy.property("broken").unwrap();
    assert_eq!(broken.facets.doc, None);
    assert_eq!(broken.facets.resolved(), types::array());
}

#[test]
fn native_hint_shapes() {
    let reflector = reflector_for(concat!(
        "<?php\n",
        "class Hints {\n",
        "    public ?int $age;\n",
        "    public int|string $key;\n",
        "    public function run(): void {}\n",
        "}\n",
    ));
    let hints = reflector.reflect("Hints").unwrap();
    assert_eq!(
        hints.property("age").unwrap().facets.resolved(),
        types::nullable(types::int())
    );
    assert_eq!(
        hints.property("key").unwrap().facets.resolved(),
        types::union(vec![types::int(), types::string()])
    );
    assert_eq!(
        hints.method("run").unwrap().return_facets.resolved(),
        types::void()
    );
}

#[test]
fn parameter_flags_are_recorded() {
    let reflector = reflector_for(concat!(
        "<?php\n",
        "class Sink {\n",
        "    public function drain(array &$buffer, string ...$extra): void {}\n",
        "}\n",
    ));
    let sink = reflector.reflect("Sink").unwrap();
    let drain = sink.method("drain").unwrap();
    assert!(drain.parameters[0].by_reference);
    assert!(drain.parameters[1].variadic);
}

// ─── Declarations ───────────────────────────────────────────────────────────

#[test]
fn class_flags_and_kinds() {
    let reflector = reflector_for(concat!(
        "<?php\n",
        "final class Sealed {}\n",
        "abstract class Partial {}\n",
        "interface Surface {}\n",
        "trait Mixin {}\n",
    ));
    assert!(reflector.reflect("Sealed").unwrap().metadata().is_final);
    assert!(reflector.reflect("Partial").unwrap().metadata().is_abstract);
    assert_eq!(
        reflector.reflect("Surface").unwrap().metadata().kind,
        ClassKind::Interface
    );
    assert_eq!(
        reflector.reflect("Mixin").unwrap().metadata().kind,
        ClassKind::Trait
    );
}

#[test]
fn promoted_constructor_parameters_become_properties() {
    let reflector = reflector_for(concat!(
        "<?php\n",
        "class Point {\n",
        "    public function __construct(\n",
        "        public readonly int $x,\n",
        "        private float $y,\n",
        "        bool $plain,\n",
        "    ) {}\n",
        "}\n",
    ));
    let point = reflector.reflect("Point").unwrap();

    let x = point.property("x").unwrap();
    assert_eq!(x.facets.resolved(), types::int());
    assert!(x.is_readonly);
    assert_eq!(x.visibility, Visibility::Public);

    assert_eq!(
        point.metadata().properties["y"].visibility,
        Visibility::Private
    );
    assert!(!point.metadata().properties.contains_key("plain"));

    let constructor = point.constructor().unwrap().unwrap();
    assert_eq!(constructor.parameters.len(), 3);
}

#[test]
fn enum_cases_reflect_as_self_typed_constants() {
    let reflector = reflector_for(concat!(
        "<?php\n",
        "enum Suit: string {\n",
        "    case Hearts = 'H';\n",
        "    case Spades = 'S';\n",
        "}\n",
    ));
    let suit = reflector.reflect("Suit").unwrap();
    assert_eq!(suit.metadata().kind, ClassKind::Enum);
    let constants = suit.constants().unwrap();
    assert_eq!(constants["Hearts"].facets.resolved(), types::self_(Vec::new()));
    assert!(constants.contains_key("Spades"));
}

#[test]
fn static_members_are_flagged() {
    let reflector = reflector_for(concat!(
        "<?php\n",
        "class Registry {\n",
        "    public static array $instances = [];\n",
        "    public static function get(): static { return new static(); }\n",
        "}\n",
    ));
    let registry = reflector.reflect("Registry").unwrap();
    assert!(registry.property("instances").unwrap().is_static);
    assert!(registry.method("get").unwrap().is_static);
}

// ─── Aliases ────────────────────────────────────────────────────────────────

#[test]
fn type_aliases_are_declared_and_referenced() {
    let reflector = reflector_for(concat!(
        "<?php\n",
        "/**\n",
        " * @phpstan-type Row array{id: int, name: string}\n",
        " */\n",
        "class Table {\n",
        "    /** @return list<Row> */\n",
        "    public function rows(): array { return []; }\n",
        "}\n",
    ));
    let table = reflector.reflect("Table").unwrap();

    assert_eq!(
        table.type_alias("Row").unwrap(),
        &types::array_shape(vec![
            ("id".into(), typelens::ty::ShapeElement::required(types::int())),
            ("name".into(), typelens::ty::ShapeElement::required(types::string())),
        ])
    );

    // The reference site points back at the declaring class.
    let rows = table.method("rows").unwrap();
    let Type::List { value } = rows.return_facets.resolved() else {
        panic!("expected a list type");
    };
    assert_eq!(
        *value,
        types::alias("Table", "Row")
    );
}

// ─── Name qualification ─────────────────────────────────────────────────────

#[test]
fn namespace_qualifies_classes_and_references() {
    let reflector = reflector_for(concat!(
        "<?php\n",
        "namespace App\\Model;\n",
        "class User {\n",
        "    public function clone_(): User { return clone $this; }\n",
        "}\n",
    ));
    let user = reflector.reflect("App\\Model\\User").unwrap();
    assert_eq!(user.name(), "App\\Model\\User");
    assert_eq!(
        user.method("clone_").unwrap().return_facets.resolved(),
        types::object_of("App\\Model\\User")
    );
}

#[test]
fn use_statements_qualify_doc_and_native_types() {
    let reflector = reflector_for(concat!(
        "<?php\n",
        "namespace App;\n",
        "use Acme\\Collection;\n",
        "use Acme\\User as Account;\n",
        "class Roster {\n",
        "    /** @var Collection<Account> */\n",
        "    public Collection $members;\n",
        "}\n",
    ));
    let roster = reflector.reflect("App\\Roster").unwrap();
    let members = roster.property("members").unwrap();
    assert_eq!(members.facets.native, Some(types::object_of("Acme\\Collection")));
    assert_eq!(
        members.facets.doc,
        Some(types::named_object(
            "Acme\\Collection",
            vec![types::object_of("Acme\\User")],
        ))
    );
}

#[test]
fn leading_backslash_escapes_the_namespace() {
    let reflector = reflector_for(concat!(
        "<?php\n",
        "namespace App;\n",
        "class Clock {\n",
        "    public function now(): \\DateTimeImmutable { return new \\DateTimeImmutable(); }\n",
        "}\n",
    ));
    let clock = reflector.reflect("App\\Clock").unwrap();
    assert_eq!(
        clock.method("now").unwrap().return_facets.resolved(),
        types::object_of("DateTimeImmutable")
    );
}

#[test]
fn lookups_tolerate_a_leading_backslash() {
    let reflector = reflector_for(concat!(
        "<?php\n",
        "namespace App;\n",
        "class Task {}\n",
    ));
    assert!(reflector.reflect("\\App\\Task").is_ok());
}

// ─── Robustness ─────────────────────────────────────────────────────────────

#[test]
fn broken_source_yields_no_classes_but_does_not_panic() {
    let reflector = reflector_for("<?php class {{{{");
    assert!(reflector.reflect("Anything").is_err());
}

#[test]
fn docblock_must_be_adjacent_to_its_member() {
    let reflector = reflector_for(concat!(
        "<?php\n",
        "class Gap {\n",
        "    /** @var list<int> */\n",
        "    public const FLAG = true;\n",
        "    public array $far;\n",
        "}\n",
    ));
    let gap = reflector.reflect("Gap").unwrap();
    // The block annotates the constant, not the later property.
    assert_eq!(gap.property("far").unwrap().facets.doc, None);
    assert_eq!(
        gap.constant("FLAG").unwrap().facets.resolved(),
        types::list_of(types::int())
    );
}
