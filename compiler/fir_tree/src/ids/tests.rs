use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn class_id_renders_package_with_slashes() {
    let interner = StringInterner::new();
    let id = ClassId::parse(&interner, "kotlin/collections/List");
    assert_eq!(id.render(&interner), "kotlin/collections/List");
    assert_eq!(id.package_fq_name().render(&interner), "kotlin.collections");
    assert_eq!(interner.lookup(id.short_class_name()), "List");
    assert!(!id.is_nested());
}

#[test]
fn nested_class_ids_know_their_outer_class() {
    let interner = StringInterner::new();
    let outer = ClassId::parse(&interner, "app/Outer");
    let inner = outer.create_nested(interner.intern("Inner"));
    assert_eq!(inner.render(&interner), "app/Outer.Inner");
    assert!(inner.is_nested());
    assert_eq!(inner.outer_class_id(), Some(outer));
    assert_eq!(inner.as_fq_name().render(&interner), "app.Outer.Inner");
}

#[test]
fn root_package_class_has_no_slash() {
    let interner = StringInterner::new();
    let id = ClassId::top_level(FqName::root(), interner.intern("Main"));
    assert_eq!(id.render(&interner), "Main");
}

#[test]
fn fq_name_prefixes() {
    let interner = StringInterner::new();
    let full = FqName::parse(&interner, "a.b.c");
    assert!(full.starts_with(&FqName::parse(&interner, "a.b")));
    assert!(!full.starts_with(&FqName::parse(&interner, "b")));
    assert_eq!(full.parent(), Some(FqName::parse(&interner, "a.b")));
    assert_eq!(FqName::root().parent(), None);
}

#[test]
fn callable_id_rendering() {
    let interner = StringInterner::new();
    let class_id = ClassId::parse(&interner, "app/Foo");
    let member = CallableId::member(&class_id, interner.intern("bar"));
    assert_eq!(member.render(&interner), "app/Foo.bar");
    assert_eq!(member.class_id(), Some(class_id));
}

fn segment() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z][a-zA-Z0-9_]{0,6}").expect("valid regex")
}

proptest! {
    #[test]
    fn class_id_parse_render_round_trip(
        package in prop::collection::vec(segment(), 0..4),
        classes in prop::collection::vec(segment(), 1..3),
    ) {
        let interner = StringInterner::new();
        let rendered = if package.is_empty() {
            classes.join(".")
        } else {
            format!("{}/{}", package.join("/"), classes.join("."))
        };
        let id = ClassId::parse(&interner, &rendered);
        prop_assert_eq!(id.render(&interner), rendered);
        prop_assert_eq!(id.package_fq_name().len(), package.len());
        prop_assert_eq!(id.relative_class_name().len(), classes.len());
    }
}
