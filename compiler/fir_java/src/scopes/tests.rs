use std::sync::Arc;

use fir_resolve::scopes::{FirScope, ProcessorAction};
use fir_resolve::{FirSession, ResolveConfig};
use fir_tree::{ClassId, DeclId, FirDeclaration, VariableSymbol};
use pretty_assertions::assert_eq;

use crate::model::{JavaClass, JavaClassKind, JavaMethod, JavaPrimitive, JavaType};
use crate::type_mapping::class_id_of;
use crate::whitelist::SignatureWhitelist;
use crate::JavaClassLoader;

fn session() -> FirSession {
    FirSession::new(ResolveConfig::new())
}

fn scope_of(session: &FirSession, internal_name: &str) -> (ClassId, Arc<dyn FirScope>) {
    let class_id = class_id_of(session.interner(), internal_name).expect("valid name");
    let scope = session
        .use_site_scope(&class_id)
        .unwrap_or_else(|| panic!("{internal_name} has no scope"));
    (class_id, scope)
}

/// `owner.name/arity` for every function the scope yields.
fn functions(session: &FirSession, scope: &dyn FirScope, name: &str) -> Vec<String> {
    let mut found = Vec::new();
    scope.process_functions_by_name(session, session.name(name), &mut |symbol| {
        found.push(describe(session, symbol.0));
        ProcessorAction::Next
    });
    found
}

fn describe(session: &FirSession, id: DeclId) -> String {
    match session.declaration(id) {
        Some(FirDeclaration::SimpleFunction(f)) => {
            let owner = f.containing_class().map_or_else(|| "<top>".to_owned(), |c| c.render(session));
            format!("{owner}.{}/{}", session.text(f.name()), f.value_parameters().len())
        }
        Some(FirDeclaration::Constructor(c)) => {
            format!("{}.<init>/{}", c.owner().render(session), c.value_parameters().len())
        }
        other => panic!("not a function: {other:?}"),
    }
}

fn property_owners(session: &FirSession, scope: &dyn FirScope, name: &str) -> Vec<String> {
    let mut found = Vec::new();
    scope.process_properties_by_name(session, session.name(name), &mut |symbol| {
        if let VariableSymbol::Property(id) = symbol {
            if let Some(FirDeclaration::Property(p)) = session.declaration(id) {
                found.push(p.containing_class().map_or_else(String::new, |c| c.render(session)));
            }
        }
        ProcessorAction::Next
    });
    found
}

fn load_lists(session: &FirSession, loader: &JavaClassLoader) {
    let e = || JavaType::type_parameter("E");
    let int = || JavaType::Primitive(JavaPrimitive::Int);
    let boolean = || JavaType::Primitive(JavaPrimitive::Boolean);
    let abstract_list = JavaClass::new("java/util/AbstractList", JavaClassKind::Class)
        .abstract_class()
        .type_parameter("E", vec![])
        .super_type(JavaType::class("java/lang/Object"))
        .super_type(JavaType::generic("java/util/List", vec![e()]))
        .method(JavaMethod::new("get", e()).parameter("index", int()).abstract_method())
        .method(JavaMethod::new("isEmpty", boolean()))
        .method(JavaMethod::new("add", boolean()).parameter("element", e()));
    let array_list = JavaClass::new("java/util/ArrayList", JavaClassKind::Class)
        .type_parameter("E", vec![])
        .super_type(JavaType::generic("java/util/AbstractList", vec![e()]))
        .constructor(Default::default())
        .method(JavaMethod::new("get", e()).parameter("index", int()))
        .method(JavaMethod::new("add", boolean()).parameter("element", e()))
        .method(JavaMethod::new("add", JavaType::Void).parameter("index", int()).parameter("element", e()))
        .method(JavaMethod::new("trimToSize", JavaType::Void));
    loader.load(session, &abstract_list).expect("loads");
    loader.load(session, &array_list).expect("loads");
}

#[test]
fn declared_methods_hide_overridden_ones() {
    let s = session();
    let loader = crate::install(&s, SignatureWhitelist::new());
    load_lists(&s, &loader);
    let (_, scope) = scope_of(&s, "java/util/ArrayList");

    assert_eq!(functions(&s, &*scope, "get"), vec!["java/util/ArrayList.get/1"]);
    assert_eq!(
        functions(&s, &*scope, "add"),
        vec!["java/util/ArrayList.add/1", "java/util/ArrayList.add/2"]
    );
    assert_eq!(functions(&s, &*scope, "isEmpty"), vec!["java/util/AbstractList.isEmpty/0"]);
    assert_eq!(functions(&s, &*scope, "trimToSize"), vec!["java/util/ArrayList.trimToSize/0"]);
}

#[test]
fn inherited_kotlin_members_come_through_mapped_supertypes() {
    let s = session();
    let loader = crate::install(&s, SignatureWhitelist::new());
    load_lists(&s, &loader);
    let (_, scope) = scope_of(&s, "java/util/AbstractList");

    // `java/util/List` is not loaded, so its Kotlin counterpart stands in.
    assert_eq!(functions(&s, &*scope, "get"), vec!["java/util/AbstractList.get/1"]);
    assert_eq!(property_owners(&s, &*scope, "size"), vec!["kotlin/collections/Collection"]);
    assert_eq!(functions(&s, &*scope, "hashCode"), vec!["kotlin/Any.hashCode/0"]);
}

#[test]
fn constructors_are_never_inherited() {
    let s = session();
    let loader = crate::install(&s, SignatureWhitelist::new());
    load_lists(&s, &loader);
    let (_, scope) = scope_of(&s, "java/util/ArrayList");
    assert_eq!(functions(&s, &*scope, "<init>"), vec!["java/util/ArrayList.<init>/0"]);
}

#[test]
fn stop_ends_the_walk_in_declared_members() {
    let s = session();
    let loader = crate::install(&s, SignatureWhitelist::new());
    load_lists(&s, &loader);
    let (_, scope) = scope_of(&s, "java/util/ArrayList");
    let mut seen = 0;
    let action = scope.process_functions_by_name(&s, s.name("add"), &mut |_| {
        seen += 1;
        ProcessorAction::Stop
    });
    assert_eq!(action, ProcessorAction::Stop);
    assert_eq!(seen, 1);
}

fn java_string() -> JavaClass {
    let string = || JavaType::class("java/lang/String");
    let object = || JavaType::class("java/lang/Object");
    let int = || JavaType::Primitive(JavaPrimitive::Int);
    JavaClass::new("java/lang/String", JavaClassKind::Class)
        .final_class()
        .super_type(object())
        .super_type(JavaType::generic("java/lang/Comparable", vec![string()]))
        .super_type(JavaType::class("java/lang/CharSequence"))
        .method(JavaMethod::new("foo", JavaType::Void))
        .method(JavaMethod::new("foo", JavaType::Void).parameter("x", int()))
        .method(JavaMethod::new("compareTo", int()).parameter("other", string()))
        .method(JavaMethod::new("length", int()))
        .method(JavaMethod::new("plus", string()).parameter("a", object()).parameter("b", object()))
}

fn string_whitelist() -> SignatureWhitelist {
    SignatureWhitelist::from_entries([
        "java/lang/String.foo()V",
        "java/lang/String.plus(Ljava/lang/Object;Ljava/lang/Object;)Ljava/lang/String;",
        "java/lang/StringBuilder.compareTo(Ljava/lang/String;)I",
    ])
    .expect("valid entries")
}

#[test]
fn only_listed_java_overloads_are_exposed() {
    let s = session();
    let loader = crate::install(&s, string_whitelist());
    loader.load(&s, &java_string()).expect("loads");
    let (_, scope) = scope_of(&s, "java/lang/String");

    assert_eq!(functions(&s, &*scope, "foo"), vec!["java/lang/String.foo/0"]);
}

#[test]
fn unlisted_names_come_from_the_kotlin_class() {
    let s = session();
    let loader = crate::install(&s, string_whitelist());
    loader.load(&s, &java_string()).expect("loads");
    let (_, scope) = scope_of(&s, "java/lang/String");

    let compare_to = functions(&s, &*scope, "compareTo");
    assert!(!compare_to.is_empty());
    assert!(compare_to.iter().all(|f| f.starts_with("kotlin/")), "{compare_to:?}");
    assert!(functions(&s, &*scope, "length").is_empty());
    assert_eq!(property_owners(&s, &*scope, "length"), vec!["kotlin/String"]);
}

#[test]
fn divergent_arity_exposes_both_and_is_flagged() {
    let s = session();
    let loader = crate::install(&s, string_whitelist());
    loader.load(&s, &java_string()).expect("loads");
    let (class_id, scope) = scope_of(&s, "java/lang/String");
    let plus = s.name("plus");

    assert!(!loader.index().has_divergent_arity(&class_id, plus));
    assert_eq!(
        functions(&s, &*scope, "plus"),
        vec!["java/lang/String.plus/2", "kotlin/String.plus/1"]
    );
    assert!(loader.index().has_divergent_arity(&class_id, plus));
    assert_eq!(loader.index().divergent_arity(), vec![(class_id.clone(), plus)]);
    assert!(!loader.index().has_divergent_arity(&class_id, s.name("foo")));
}

#[test]
fn mapped_classes_without_entries_use_the_java_scope() {
    let s = session();
    let loader = crate::install(&s, string_whitelist());
    let number = JavaClass::new("java/lang/Number", JavaClassKind::Class)
        .abstract_class()
        .super_type(JavaType::class("java/lang/Object"))
        .method(JavaMethod::new("intValue", JavaType::Primitive(JavaPrimitive::Int)).abstract_method());
    loader.load(&s, &number).expect("loads");
    let (_, scope) = scope_of(&s, "java/lang/Number");

    assert_eq!(functions(&s, &*scope, "intValue"), vec!["java/lang/Number.intValue/0"]);
    assert_eq!(functions(&s, &*scope, "toString"), vec!["kotlin/Any.toString/0"]);
}

#[test]
fn kotlin_classes_keep_the_default_scope() {
    let s = session();
    let _loader = crate::install(&s, string_whitelist());
    let string = ClassId::parse(s.interner(), "kotlin/String");
    let scope = s.use_site_scope(&string).expect("builtin");
    assert_eq!(functions(&s, &*scope, "plus"), vec!["kotlin/String.plus/1"]);
}
