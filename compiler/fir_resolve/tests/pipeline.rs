//! Whole-session resolution through `resolve_files`.

use std::sync::Arc;

use fir_resolve::{
    init_tracing, resolve_files, BuiltinTypeCache, CancelAfter, CancellationFlag, DiagnosticKind, FirBuilder,
    FirSession, NeverCancelled, ResolveConfig, ResolveError,
};
use fir_tree::{DeclId, ResolvePhase, SharedInterner};
use pretty_assertions::assert_eq;

fn session() -> FirSession {
    init_tracing();
    FirSession::new(ResolveConfig::new())
}

fn phase(session: &FirSession, id: DeclId) -> Option<ResolvePhase> {
    session.declarations().phase(id)
}

fn function_return_type(session: &FirSession, id: DeclId) -> String {
    let ty = session
        .declarations()
        .with(id, |d| d.as_function().map(|f| f.return_type_ref().cone_type_or_error()))
        .flatten()
        .unwrap_or_else(|| panic!("#{} is not a function", id.raw()));
    session.render_type(&ty)
}

#[test]
fn every_source_declaration_reaches_body_resolve() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    let greeter = b.class(file, "Greeter").build();
    let constructor = b.constructor(greeter).build();
    let greet = b.function(greeter, "greet").expression_body(b.string("hi")).build();
    let main = b
        .function(file, "main")
        .expression_body(b.call_on(b.call("Greeter", vec![]), "greet", vec![]))
        .build();

    let summary = resolve_files(&session, &NeverCancelled).expect("not cancelled");
    assert_eq!(summary.files, 1);
    assert_eq!(summary.declarations, session.declarations().len());
    assert!(!summary.has_errors(), "{:?}", summary.diagnostics);
    for id in [file, greeter, constructor, greet, main] {
        assert_eq!(phase(&session, id), Some(ResolvePhase::BodyResolve));
    }
    assert_eq!(function_return_type(&session, main), "kotlin/String");
}

#[test]
fn library_files_are_used_but_not_resolved() {
    let session = session();
    let b = FirBuilder::new(&session);
    let library = b.library_file("lib.kt", "lib");
    b.function(library, "helper").returns(b.user_type("Int")).build();
    let file = b.file("main.kt", "app");
    b.import(file, "lib.helper");
    let main = b.function(file, "main").expression_body(b.call("helper", vec![])).build();

    let summary = resolve_files(&session, &NeverCancelled).expect("not cancelled");
    assert_eq!(summary.files, 1);
    assert!(!summary.has_errors(), "{:?}", summary.diagnostics);
    assert_eq!(function_return_type(&session, main), "kotlin/Int");
    assert!(phase(&session, library) < Some(ResolvePhase::BodyResolve));
}

#[test]
fn problems_are_collected_in_report_order() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    b.class(file, "A").super_type(b.user_type("B")).build();
    b.class(file, "B").super_type(b.user_type("A")).build();
    b.function(file, "f")
        .parameter("x", b.generic_type("Foo?", vec![b.user_type("Int")]))
        .build();
    b.function(file, "g").expression_body(b.call("missing", vec![])).build();

    let summary = resolve_files(&session, &NeverCancelled).expect("not cancelled");
    let reported: Vec<(DiagnosticKind, &str)> = summary
        .diagnostics
        .iter()
        .map(|d| (d.kind, d.message.as_str()))
        .collect();
    assert_eq!(reported, vec![
        (DiagnosticKind::CyclicSupertypes, "Cyclic supertypes: app/A through app/B"),
        (DiagnosticKind::UnresolvedType, "Symbol not found, for `Foo<Int>?`"),
        (DiagnosticKind::UnresolvedReference, "Unresolved reference: missing"),
    ]);
    assert!(summary.has_errors());
}

#[test]
fn cancelled_pass_can_be_resumed() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    let first = b.function(file, "first").expression_body(b.int(1)).build();
    let second = b.function(file, "second").expression_body(b.call("first", vec![])).build();

    // One poll for the file, one for `first`, then the check fires.
    let cancelled = resolve_files(&session, &CancelAfter::new(2));
    assert_eq!(cancelled, Err(ResolveError::Cancelled));
    assert_eq!(phase(&session, file), Some(ResolvePhase::Imports));
    assert_eq!(phase(&session, first), Some(ResolvePhase::Imports));
    assert_eq!(phase(&session, second), Some(ResolvePhase::RawFir));

    resolve_files(&session, &NeverCancelled).expect("not cancelled");
    assert_eq!(function_return_type(&session, second), "kotlin/Int");
}

#[test]
fn raised_flag_cancels_before_any_work() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    let function = b.function(file, "f").build();
    let flag = CancellationFlag::new();
    flag.cancel();
    assert_eq!(resolve_files(&session, &flag), Err(ResolveError::Cancelled));
    assert_eq!(phase(&session, file), Some(ResolvePhase::RawFir));
    assert_eq!(phase(&session, function), Some(ResolvePhase::RawFir));
}

#[test]
fn sessions_sharing_a_builtin_cache_stay_apart() {
    init_tracing();
    let interner = SharedInterner::new();
    let cache = Arc::new(BuiltinTypeCache::new());
    let first = FirSession::with_shared(interner.clone(), Arc::clone(&cache), ResolveConfig::new());
    let second = FirSession::with_shared(interner, Arc::clone(&cache), ResolveConfig::new());

    let mut mains = Vec::new();
    for session in [&first, &second] {
        let b = FirBuilder::new(session);
        let file = b.file("main.kt", "app");
        let main = b.function(file, "main").body(b.block(Vec::new())).build();
        resolve_files(session, &NeverCancelled).expect("not cancelled");
        mains.push(main);
    }
    assert_eq!(function_return_type(&first, mains[0]), "kotlin/Unit");
    assert_eq!(function_return_type(&second, mains[1]), "kotlin/Unit");

    let queries = cache.provider_queries();
    let unit = first.standard().unit.clone();
    assert!(cache.symbol(&first, &unit).is_some());
    assert_eq!(cache.provider_queries(), queries);

    let entries = cache.len();
    drop(second);
    assert!(cache.len() < entries);
    assert!(cache.symbol(&first, &unit).is_some());
    assert_eq!(cache.provider_queries(), queries);
}
