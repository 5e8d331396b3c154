//! Kotlin sources calling into loaded Java classes.

use fir_java::{
    install, DescriptorWriter, JavaClass, JavaClassKind, JavaConstructor, JavaMethod, JavaPrimitive, JavaType,
    SignatureWhitelist,
};
use fir_resolve::{init_tracing, resolve_files, DiagnosticKind, FirBuilder, FirSession, NeverCancelled, ResolveConfig};
use fir_tree::{DeclId, FunctionSymbol};
use pretty_assertions::assert_eq;

fn session() -> FirSession {
    init_tracing();
    FirSession::new(ResolveConfig::new())
}

fn function_return_type(session: &FirSession, id: DeclId) -> String {
    let ty = session
        .declarations()
        .with(id, |d| d.as_function().map(|f| f.return_type_ref().cone_type_or_error()))
        .flatten()
        .unwrap_or_else(|| panic!("#{} is not a function", id.raw()));
    session.render_type(&ty)
}

fn array_list() -> JavaClass {
    let e = || JavaType::type_parameter("E");
    JavaClass::new("java/util/ArrayList", JavaClassKind::Class)
        .type_parameter("E", vec![])
        .super_type(JavaType::class("java/lang/Object"))
        .super_type(JavaType::generic("java/util/List", vec![e()]))
        .constructor(JavaConstructor::default())
        .constructor(JavaConstructor::default().parameter("capacity", JavaType::Primitive(JavaPrimitive::Int)))
        .method(JavaMethod::new("get", e()).parameter("index", JavaType::Primitive(JavaPrimitive::Int)))
        .method(JavaMethod::new("add", JavaType::Primitive(JavaPrimitive::Boolean)).parameter("element", e()))
        .method(JavaMethod::new("ensureCapacity", JavaType::Void).parameter("min", JavaType::Primitive(JavaPrimitive::Int)))
}

#[test]
fn java_generics_are_seen_through_kotlin_call_sites() {
    let session = session();
    let loader = install(&session, SignatureWhitelist::jvm_builtins());
    loader.load(&session, &array_list()).expect("loads");

    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    b.import(file, "java.util.ArrayList");
    let list = || b.generic_type("ArrayList", vec![b.user_type("String")]);
    let first = b
        .function(file, "first")
        .parameter("list", list())
        .expression_body(b.call_on(b.access("list"), "get", vec![b.int(0)]))
        .build();
    let grow = b
        .function(file, "grow")
        .parameter("list", list())
        .expression_body(b.call_on(b.access("list"), "ensureCapacity", vec![b.int(10)]))
        .build();
    let count = b
        .function(file, "count")
        .parameter("list", list())
        .expression_body(b.access_on(b.access("list"), "size"))
        .build();

    let summary = resolve_files(&session, &NeverCancelled).expect("not cancelled");
    assert!(!summary.has_errors(), "{:?}", summary.diagnostics);
    assert_eq!(summary.files, 1, "Java classes are not resolved as sources");
    assert_eq!(function_return_type(&session, first), "kotlin/String");
    assert_eq!(function_return_type(&session, grow), "kotlin/Unit");
    assert_eq!(function_return_type(&session, count), "kotlin/Int");
}

#[test]
fn java_constructors_are_called_by_class_name() {
    let session = session();
    let loader = install(&session, SignatureWhitelist::jvm_builtins());
    loader.load(&session, &array_list()).expect("loads");

    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    b.import(file, "java.util.ArrayList");
    let make = b
        .function(file, "make")
        .expression_body(b.call_with_type_arguments("ArrayList", vec![b.user_type("Int")], vec![b.int(4)]))
        .build();

    let summary = resolve_files(&session, &NeverCancelled).expect("not cancelled");
    assert!(!summary.has_errors(), "{:?}", summary.diagnostics);
    assert_eq!(function_return_type(&session, make), "java/util/ArrayList<kotlin/Int>");
}

fn java_string() -> JavaClass {
    let int = || JavaType::Primitive(JavaPrimitive::Int);
    JavaClass::new("java/lang/String", JavaClassKind::Class)
        .final_class()
        .super_type(JavaType::class("java/lang/Object"))
        .super_type(JavaType::generic("java/lang/Comparable", vec![JavaType::class("java/lang/String")]))
        .method(JavaMethod::new("foo", JavaType::Void))
        .method(JavaMethod::new("foo", JavaType::Void).parameter("x", int()))
        .method(JavaMethod::new("codePointAt", int()).parameter("index", int()))
        .method(JavaMethod::new("compareTo", int()).parameter("other", JavaType::class("java/lang/String")))
}

#[test]
fn allow_listed_java_methods_sit_next_to_kotlin_ones() {
    let session = session();
    let mut entries: Vec<String> = vec!["java/lang/String.foo()V".to_owned()];
    entries.push("java/lang/String.codePointAt(I)I".to_owned());
    let loader = install(&session, SignatureWhitelist::from_entries(&entries).expect("valid entries"));
    loader.load(&session, &java_string()).expect("loads");

    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    let jstring = || b.user_type("java.lang.String");
    let listed = b
        .function(file, "listed")
        .parameter("s", jstring())
        .expression_body(b.call_on(b.access("s"), "foo", vec![]))
        .build();
    let code_point = b
        .function(file, "codePoint")
        .parameter("s", jstring())
        .expression_body(b.call_on(b.access("s"), "codePointAt", vec![b.int(0)]))
        .build();
    let compared = b
        .function(file, "compared")
        .parameter("s", jstring())
        .expression_body(b.call_on(b.access("s"), "compareTo", vec![b.string("x")]))
        .build();
    let length = b
        .function(file, "length")
        .parameter("s", jstring())
        .expression_body(b.access_on(b.access("s"), "length"))
        .build();

    let summary = resolve_files(&session, &NeverCancelled).expect("not cancelled");
    assert!(!summary.has_errors(), "{:?}", summary.diagnostics);
    assert_eq!(function_return_type(&session, listed), "kotlin/Unit");
    assert_eq!(function_return_type(&session, code_point), "kotlin/Int");
    assert_eq!(function_return_type(&session, compared), "kotlin/Int");
    assert_eq!(function_return_type(&session, length), "kotlin/Int");
}

#[test]
fn unlisted_java_overloads_stay_hidden() {
    let session = session();
    let whitelist = SignatureWhitelist::from_entries(["java/lang/String.foo()V"]).expect("valid entry");
    let loader = install(&session, whitelist);
    loader.load(&session, &java_string()).expect("loads");

    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    b.function(file, "hidden")
        .parameter("s", b.user_type("java.lang.String"))
        .expression_body(b.call_on(b.access("s"), "foo", vec![b.int(1)]))
        .build();

    let summary = resolve_files(&session, &NeverCancelled).expect("not cancelled");
    assert!(summary.has_errors());
    assert!(
        summary
            .diagnostics
            .iter()
            .all(|d| d.kind != DiagnosticKind::UnresolvedType),
        "{:?}",
        summary.diagnostics
    );
}

#[test]
fn descriptors_of_loaded_methods_use_java_names() {
    let session = session();
    let loader = install(&session, SignatureWhitelist::new());
    let class = loader.load(&session, &array_list()).expect("loads");
    let members = session
        .declaration(class)
        .and_then(|d| d.as_class().map(|c| c.declarations().to_vec()))
        .unwrap_or_default();
    let writer = DescriptorWriter::new(&session, loader.mapping());
    let mut descriptors: Vec<String> = members
        .into_iter()
        .filter_map(|id| writer.method(FunctionSymbol(id)))
        .map(|d| d.to_string())
        .collect();
    descriptors.sort();
    assert_eq!(
        descriptors,
        vec![
            "<init>()V",
            "<init>(I)V",
            "add(Ljava/lang/Object;)Z",
            "ensureCapacity(I)V",
            "get(I)Ljava/lang/Object;",
        ]
    );
}
