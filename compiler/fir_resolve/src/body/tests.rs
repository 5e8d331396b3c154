use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::calls::{CallCompletion, CallInfo, SimpleInferenceEngine};
use crate::dfa::{DataFlowEvent, JumpKind, NoopDataFlowAnalyzer, RecordingDataFlowAnalyzer, RecordingDataFlowFactory};
use crate::phases::resolve_to;
use crate::subtyping::TypeContext;
use crate::{DiagnosticKind, FirBuilder, ResolveConfig};
use fir_tree::{ClassKind, FirReference, FirSimpleFunction, LoopJumpKind, Modality, Name, Operation};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn session() -> FirSession {
    FirSession::new(ResolveConfig::new())
}

fn function(session: &FirSession, id: DeclId) -> Box<FirSimpleFunction> {
    match session.declaration(id) {
        Some(FirDeclaration::SimpleFunction(function)) => function,
        other => panic!("expected a function, found {other:?}"),
    }
}

fn resolved_return_type(session: &FirSession, id: DeclId) -> String {
    resolve_to(session, id, ResolvePhase::BodyResolve).expect("resolves");
    let function = function(session, id);
    session.render_type(&function.return_type_ref().cone_type_or_error())
}

/// Type of the value returned by a single-expression body.
fn body_result_type(session: &FirSession, id: DeclId) -> String {
    resolve_to(session, id, ResolvePhase::BodyResolve).expect("resolves");
    let function = function(session, id);
    let body = function.body().expect("body");
    let result = match body.last_expression() {
        Some(FirExpression::Return(ret)) => type_of(ret.result()),
        Some(other) => type_of(other),
        None => ConeType::error("empty body"),
    };
    session.render_type(&result)
}

/// Body resolution of `id` with every data-flow event recorded.
fn record_events(session: &FirSession, id: DeclId) -> Vec<DataFlowEvent> {
    resolve_to(session, id, ResolvePhase::ImplicitTypesBodyResolve).expect("header phases");
    let declaration = session.declarations().checkout(id).expect("available");
    let mut dfa = RecordingDataFlowAnalyzer::new();
    let declaration = BodyResolveTransformer::new(session, &mut dfa).resolve_declaration(id, declaration);
    session.declarations().checkin(id, declaration);
    dfa.events
}

/// Counts completions of the synthetic `when` call and can refuse them.
struct WhenCounting {
    when_call: Name,
    refuse: bool,
    calls: AtomicUsize,
}

impl WhenCounting {
    fn install(session: &FirSession, refuse: bool) -> Arc<WhenCounting> {
        let engine = Arc::new(WhenCounting {
            when_call: session.special_names().when_call,
            refuse,
            calls: AtomicUsize::new(0),
        });
        session.set_inference_engine(engine.clone());
        engine
    }

    fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl InferenceEngine for WhenCounting {
    fn complete_call(&self, call: &CallInfo, context: &dyn TypeContext) -> CallCompletion {
        if call.name == self.when_call {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.refuse {
                return CallCompletion::NoApplicable;
            }
        }
        SimpleInferenceEngine::new().complete_call(call, context)
    }
}

/// Remembers the expected type handed to each synthetic `when`/`try` call.
struct ExpectedTypes {
    synthetic: [Name; 2],
    seen: Mutex<Vec<(Name, Option<ConeType>)>>,
}

impl ExpectedTypes {
    fn install(session: &FirSession) -> Arc<ExpectedTypes> {
        let names = session.special_names();
        let engine = Arc::new(ExpectedTypes {
            synthetic: [names.when_call, names.try_call],
            seen: Mutex::new(Vec::new()),
        });
        session.set_inference_engine(engine.clone());
        engine
    }

    fn take(&self) -> Vec<(Name, Option<ConeType>)> {
        std::mem::take(&mut *self.seen.lock())
    }
}

impl InferenceEngine for ExpectedTypes {
    fn complete_call(&self, call: &CallInfo, context: &dyn TypeContext) -> CallCompletion {
        if self.synthetic.contains(&call.name) {
            self.seen.lock().push((call.name, call.expected_type.clone()));
        }
        SimpleInferenceEngine::new().complete_call(call, context)
    }
}

/// Panics on a synthetic `when`/`try` call once `fail_at` of them went through.
struct FailingSelect {
    synthetic: [Name; 2],
    fail_at: usize,
    calls: AtomicUsize,
}

impl FailingSelect {
    fn install(session: &FirSession, fail_at: usize) -> Arc<FailingSelect> {
        let names = session.special_names();
        let engine = Arc::new(FailingSelect {
            synthetic: [names.when_call, names.try_call],
            fail_at,
            calls: AtomicUsize::new(0),
        });
        session.set_inference_engine(engine.clone());
        engine
    }

    fn failed(&self) -> bool {
        self.calls.load(Ordering::SeqCst) > self.fail_at
    }
}

impl InferenceEngine for FailingSelect {
    fn complete_call(&self, call: &CallInfo, context: &dyn TypeContext) -> CallCompletion {
        if self.synthetic.contains(&call.name) && self.calls.fetch_add(1, Ordering::SeqCst) == self.fail_at {
            panic!("inference failed at synthetic call {}", self.fail_at);
        }
        SimpleInferenceEngine::new().complete_call(call, context)
    }
}

/// `open class Base; class A : Base; class B : Base`, each constructible.
fn hierarchy(b: &FirBuilder<'_>, file: DeclId, modality: Modality) {
    let base = b.class(file, "Base").modality(modality).build();
    if modality != Modality::Sealed {
        b.constructor(base).build();
    }
    for name in ["A", "B"] {
        let class = b.class(file, name).super_type(b.user_type("Base")).build();
        b.constructor(class).build();
    }
}

// === Scopes ===

#[test]
fn scope_stack_survives_a_panic() {
    let session = session();
    let mut dfa = NoopDataFlowAnalyzer;
    let mut transformer = BodyResolveTransformer::new(&session, &mut dfa);
    transformer.with_local_scope(|t| {
        assert_eq!(t.scope_depth(), 1);
        let caught = catch_unwind(AssertUnwindSafe(|| {
            t.with_local_scope(|inner| {
                assert_eq!(inner.scope_depth(), 2);
                inner.with_local_scope(|_| panic!("resolution failed"));
            });
        }));
        assert!(caught.is_err());
        assert_eq!(t.scope_depth(), 1);
    });
    assert_eq!(transformer.scope_depth(), 0);
}

#[test]
fn block_locals_are_gone_after_the_block() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    let inner = b.block_expression(vec![b.local("x", false, None, Some(b.int(1)))]);
    let id = b
        .function(file, "f")
        .body(b.block(vec![FirStatement::Expression(inner), FirStatement::Expression(b.access("x"))]))
        .build();
    resolve_to(&session, id, ResolvePhase::BodyResolve).expect("resolves");
    let unresolved = session.diagnostics().of_kind(DiagnosticKind::UnresolvedReference);
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].message, "Unresolved reference: x");
}

// === Implicit types ===

#[test]
fn expression_body_gives_the_return_type() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    let id = b.function(file, "answer").expression_body(b.int(42)).build();
    assert_eq!(resolved_return_type(&session, id), "kotlin/Int");
}

#[test]
fn implicit_types_follow_calls_across_declarations() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    let caller = b.function(file, "caller").expression_body(b.call("callee", vec![])).build();
    b.function(file, "callee").expression_body(b.string("s")).build();
    let property = b.property(file, "p").initializer(b.call("caller", vec![])).build();

    assert_eq!(resolved_return_type(&session, caller), "kotlin/String");
    resolve_to(&session, property, ResolvePhase::BodyResolve).expect("resolves");
    let ty = session
        .declarations()
        .with(property, |d| d.as_property().map(|p| p.return_type_ref().cone_type_or_error()))
        .flatten()
        .expect("property");
    assert_eq!(session.render_type(&ty), "kotlin/String");
}

#[test]
fn recursive_implicit_type_is_an_error() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    let id = b.function(file, "loop").expression_body(b.call("loop", vec![])).build();

    assert_eq!(
        resolved_return_type(&session, id),
        "ERROR CLASS: cycle in implicit type resolution"
    );
    assert_eq!(session.diagnostics().of_kind(DiagnosticKind::RecursiveImplicitType).len(), 1);
}

#[test]
fn block_body_without_return_is_unit() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    let id = b.function(file, "f").body(b.block_of(b.int(1))).build();
    assert_eq!(resolved_return_type(&session, id), "kotlin/Unit");
}

// === When ===

#[test]
fn single_branch_when_skips_the_engine() {
    let session = session();
    let engine = WhenCounting::install(&session, false);
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    let when = b.when(None, vec![b.else_branch(b.block_of(b.int(1)))]);
    let id = b.function(file, "f").expression_body(when).build();

    assert_eq!(body_result_type(&session, id), "kotlin/Int");
    assert_eq!(engine.count(), 0);
}

#[test]
fn branch_with_empty_else_is_still_the_fast_path() {
    let session = session();
    let engine = WhenCounting::install(&session, false);
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    let when = b.when(
        None,
        vec![
            b.branch(b.boolean(true), b.block_of(b.string("yes"))),
            b.else_branch(b.block(vec![])),
        ],
    );
    let id = b.function(file, "f").expression_body(when).build();

    assert_eq!(body_result_type(&session, id), "kotlin/String");
    assert_eq!(engine.count(), 0);
}

#[test]
fn branches_unify_to_their_common_supertype() {
    let session = session();
    let engine = WhenCounting::install(&session, false);
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    hierarchy(&b, file, Modality::Open);
    let when = b.when(
        Some(b.access("flag")),
        vec![
            b.branch(b.boolean(true), b.block_of(b.call("A", vec![]))),
            b.branch(b.boolean(false), b.block_of(b.call("B", vec![]))),
        ],
    );
    let id = b
        .function(file, "pick")
        .parameter("flag", b.user_type("Boolean"))
        .expression_body(when)
        .build();

    assert_eq!(resolved_return_type(&session, id), "app/Base");
    assert_eq!(engine.count(), 1);
    let when = match function(&session, id).body().and_then(FirBlock::last_expression) {
        Some(FirExpression::Return(ret)) => match ret.result() {
            FirExpression::When(when) => when.clone(),
            other => panic!("expected a when, found {other:?}"),
        },
        other => panic!("expected a return, found {other:?}"),
    };
    assert!(when.is_exhaustive());
    assert_eq!(
        when.callee_reference(),
        &FirReference::Resolved {
            name: session.special_names().when_call,
            symbol: fir_tree::FirSymbol::Synthetic(fir_tree::SyntheticCallKind::When),
        }
    );
}

#[test]
fn refused_unification_is_an_error_type() {
    let session = session();
    let engine = WhenCounting::install(&session, true);
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    let when = b.when(
        None,
        vec![
            b.branch(b.boolean(true), b.block_of(b.int(1))),
            b.else_branch(b.block_of(b.int(2))),
        ],
    );
    let id = b.function(file, "f").expression_body(when).build();

    assert!(body_result_type(&session, id).starts_with("ERROR CLASS"));
    assert_eq!(engine.count(), 1);
}

#[test]
fn when_and_try_hand_their_expected_type_to_the_engine() {
    let session = session();
    let engine = ExpectedTypes::install(&session);
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    let choice = |b: &FirBuilder<'_>| {
        b.when(
            None,
            vec![
                b.branch(b.boolean(true), b.block_of(b.int(1))),
                b.else_branch(b.block_of(b.int(2))),
            ],
        )
    };
    let attempt = b.try_expression(
        b.block_of(b.int(1)),
        vec![b.catch("e", b.user_type("Exception"), b.block_of(b.int(2)))],
        None,
    );
    let typed_when = b.function(file, "pick").returns(b.user_type("Any")).expression_body(choice(&b)).build();
    let typed_try = b.function(file, "guarded").returns(b.user_type("Any")).expression_body(attempt).build();
    let untyped = b.function(file, "free").expression_body(choice(&b)).build();
    let names = session.special_names();
    let rendered = |session: &FirSession, seen: &[(Name, Option<ConeType>)]| -> Vec<(Name, Option<String>)> {
        seen.iter().map(|(name, ty)| (*name, ty.as_ref().map(|t| session.render_type(t)))).collect()
    };

    resolve_to(&session, typed_when, ResolvePhase::BodyResolve).expect("resolves");
    assert_eq!(rendered(&session, &engine.take()), vec![(names.when_call, Some("kotlin/Any".to_owned()))]);
    resolve_to(&session, typed_try, ResolvePhase::BodyResolve).expect("resolves");
    assert_eq!(rendered(&session, &engine.take()), vec![(names.try_call, Some("kotlin/Any".to_owned()))]);
    resolve_to(&session, untyped, ResolvePhase::BodyResolve).expect("resolves");
    assert_eq!(rendered(&session, &engine.take()), vec![(names.when_call, None)]);
}

#[test]
fn non_exhaustive_when_is_unit() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    let when = b.when(
        Some(b.access("flag")),
        vec![
            b.branch(b.boolean(true), b.block_of(b.int(1))),
            b.branch(b.boolean(true), b.block_of(b.int(2))),
        ],
    );
    let id = b
        .function(file, "f")
        .parameter("flag", b.user_type("Boolean"))
        .expression_body(when)
        .build();

    assert_eq!(resolved_return_type(&session, id), "kotlin/Unit");
    assert!(session.diagnostics().of_kind(DiagnosticKind::NonExhaustiveWhen).is_empty());
}

#[test]
fn non_exhaustive_when_used_as_a_value_is_reported() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    let when = b.when(
        Some(b.access("flag")),
        vec![
            b.branch(b.boolean(true), b.block_of(b.int(1))),
            b.branch(b.boolean(true), b.block_of(b.int(2))),
        ],
    );
    let id = b
        .function(file, "f")
        .parameter("flag", b.user_type("Boolean"))
        .returns(b.user_type("Int"))
        .expression_body(when)
        .build();
    resolve_to(&session, id, ResolvePhase::BodyResolve).expect("resolves");
    assert_eq!(session.diagnostics().of_kind(DiagnosticKind::NonExhaustiveWhen).len(), 1);
}

#[test]
fn sealed_subject_is_covered_by_its_subclasses() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    hierarchy(&b, file, Modality::Sealed);
    let branches = |b: &FirBuilder<'_>, with_b: bool| {
        let mut branches = vec![b.branch(b.is(b.subject(), b.user_type("A")), b.block_of(b.int(1)))];
        if with_b {
            branches.push(b.branch(b.is(b.subject(), b.user_type("B")), b.block_of(b.int(2))));
        }
        branches
    };
    let covered = b
        .function(file, "covered")
        .parameter("value", b.user_type("Base"))
        .expression_body(b.when(Some(b.access("value")), branches(&b, true)))
        .build();
    let partial = b
        .function(file, "partial")
        .parameter("value", b.user_type("Base"))
        .expression_body(b.when(Some(b.access("value")), branches(&b, false)))
        .build();
    let nullable = b
        .function(file, "nullable")
        .parameter("value", b.user_type("Base?"))
        .expression_body(b.when(Some(b.access("value")), branches(&b, true)))
        .build();

    assert_eq!(resolved_return_type(&session, covered), "kotlin/Int");
    assert_eq!(resolved_return_type(&session, partial), "kotlin/Unit");
    assert_eq!(resolved_return_type(&session, nullable), "kotlin/Unit");
}

#[test]
fn empty_when_is_an_error() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    let id = b.function(file, "f").expression_body(b.when(None, vec![])).build();
    assert!(body_result_type(&session, id).starts_with("ERROR CLASS"));
}

#[test]
fn subject_variable_is_scoped_to_the_when() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    let when = b.when_with_variable(
        "v",
        b.boolean(true),
        vec![b.else_branch(b.block_of(b.access("v")))],
    );
    let id = b
        .function(file, "f")
        .body(b.block(vec![FirStatement::Expression(when), FirStatement::Expression(b.access("v"))]))
        .build();
    resolve_to(&session, id, ResolvePhase::BodyResolve).expect("resolves");
    let unresolved = session.diagnostics().of_kind(DiagnosticKind::UnresolvedReference);
    assert_eq!(unresolved.len(), 1);
}

// === Data flow ===

#[test]
fn do_while_events_come_in_evaluation_order() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    let body = b.block(vec![b.local("x", false, None, Some(b.int(1)))]);
    let condition = b.equals(b.access("x"), b.int(1));
    let id = b
        .function(file, "f")
        .body(b.block(vec![b.do_while_loop(None, body, condition)]))
        .build();

    let events = record_events(&session, id);
    let loop_events: Vec<_> = events.iter().filter(|e| e.is_loop_event()).cloned().collect();
    assert_eq!(
        loop_events,
        vec![
            DataFlowEvent::EnterDoWhileLoop,
            DataFlowEvent::ExitDoWhileBlock,
            DataFlowEvent::EnterDoWhileCondition,
            DataFlowEvent::ExitDoWhileLoop,
        ]
    );
    // The condition sees `x` from the body.
    assert!(session.diagnostics().of_kind(DiagnosticKind::UnresolvedReference).is_empty());
}

#[test]
fn while_loop_and_jumps_are_reported() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    let body = b.block_of(b.jump(LoopJumpKind::Break, None));
    let id = b
        .function(file, "f")
        .body(b.block(vec![b.while_loop(None, b.boolean(true), body)]))
        .build();

    let events = record_events(&session, id);
    assert_eq!(
        events,
        vec![
            DataFlowEvent::EnterFunction,
            DataFlowEvent::EnterWhileLoop,
            DataFlowEvent::ExitWhileCondition,
            DataFlowEvent::Jump(JumpKind::Break),
            DataFlowEvent::ExitWhileLoop,
            DataFlowEvent::ExitFunction,
        ]
    );
}

#[test]
fn when_branches_report_condition_and_result_boundaries() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    let when = b.when(
        Some(b.access("flag")),
        vec![
            b.branch(b.boolean(true), b.block_of(b.int(1))),
            b.branch(b.boolean(false), b.block_of(b.int(2))),
        ],
    );
    let id = b
        .function(file, "f")
        .parameter("flag", b.user_type("Boolean"))
        .returns(b.user_type("Int"))
        .expression_body(when)
        .build();

    let events = record_events(&session, id);
    let branch = [
        DataFlowEvent::EnterWhenBranchCondition,
        DataFlowEvent::ExitWhenBranchCondition,
        DataFlowEvent::ExitWhenBranchResult,
    ];
    let mut expected = vec![DataFlowEvent::EnterFunction, DataFlowEvent::EnterWhenExpression];
    expected.extend(branch.iter().cloned());
    expected.extend(branch.iter().cloned());
    expected.extend([
        DataFlowEvent::ExitWhenExpression { exhaustive: true },
        DataFlowEvent::Jump(JumpKind::Return),
        DataFlowEvent::ExitFunction,
    ]);
    let control: Vec<_> = events
        .into_iter()
        .filter(|e| !matches!(e, DataFlowEvent::ExitCall(_) | DataFlowEvent::VariableDeclaration(_)))
        .collect();
    assert_eq!(control, expected);
}

#[test]
fn implicit_type_bodies_reach_the_session_analyzer() {
    let session = session();
    let factory = Arc::new(RecordingDataFlowFactory::new());
    session.set_data_flow_factory(factory.clone());
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    // fun f() = when (true) { true -> 1; false -> 2 }
    let when = b.when(
        Some(b.boolean(true)),
        vec![
            b.branch(b.boolean(true), b.block_of(b.int(1))),
            b.branch(b.boolean(false), b.block_of(b.int(2))),
        ],
    );
    let implicit = b.function(file, "f").expression_body(when).build();
    let explicit = b
        .function(file, "g")
        .returns(b.user_type("Int"))
        .expression_body(b.int(1))
        .build();

    assert_eq!(resolved_return_type(&session, implicit), "kotlin/Int");
    resolve_to(&session, explicit, ResolvePhase::BodyResolve).expect("resolves");

    let events = factory.events(implicit);
    assert!(events.contains(&DataFlowEvent::EnterWhenExpression));
    let entries = events.iter().filter(|e| **e == DataFlowEvent::EnterFunction).count();
    assert_eq!(entries, 1, "the body is walked once");
    assert_eq!(
        factory.events(explicit),
        vec![
            DataFlowEvent::EnterFunction,
            DataFlowEvent::Jump(JumpKind::Return),
            DataFlowEvent::ExitFunction,
        ]
    );
}

#[test]
fn return_to_an_unknown_label_is_not_allowed() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    let id = b
        .function(file, "f")
        .body(b.block_of(b.return_at("missing", b.int(1))))
        .build();
    resolve_to(&session, id, ResolvePhase::BodyResolve).expect("resolves");

    let rejected = session.diagnostics().of_kind(DiagnosticKind::ReturnNotAllowed);
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].message, "'return' is not allowed here");
    assert!(session.diagnostics().of_kind(DiagnosticKind::UnresolvedReference).is_empty());
}

#[test]
fn try_unifies_block_and_catches() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    let catch = b.catch(
        "e",
        b.user_type("Exception"),
        b.block_of(b.access_on(b.access("e"), "message")),
    );
    let attempt = b.try_expression(b.block_of(b.string("ok")), vec![catch], Some(b.block(vec![])));
    let id = b.function(file, "f").expression_body(attempt).build();

    assert_eq!(resolved_return_type(&session, id), "kotlin/String?");
}

// === Calls ===

#[test]
fn overloads_pick_the_most_specific() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    b.function(file, "show")
        .parameter("value", b.user_type("Any"))
        .returns(b.user_type("String"))
        .build();
    b.function(file, "show")
        .parameter("value", b.user_type("Int"))
        .returns(b.user_type("Int"))
        .build();
    let id = b.function(file, "f").expression_body(b.call("show", vec![b.int(1)])).build();
    assert_eq!(resolved_return_type(&session, id), "kotlin/Int");
}

#[test]
fn generic_calls_infer_from_arguments_and_lambdas() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    b.function(file, "apply")
        .type_parameter("T", vec![])
        .type_parameter("R", vec![])
        .parameter("value", b.user_type("T"))
        .parameter(
            "block",
            b.function_type(None, vec![b.user_type("T")], b.user_type("R")),
        )
        .returns(b.user_type("R"))
        .build();
    let lambda = b.lambda(None, b.block_of(b.call_on(b.access("it"), "toString", vec![])));
    let id = b
        .function(file, "f")
        .expression_body(b.call("apply", vec![b.int(1), lambda]))
        .build();
    assert_eq!(resolved_return_type(&session, id), "kotlin/String");
    assert!(session.diagnostics().of_kind(DiagnosticKind::UnresolvedReference).is_empty());
    assert!(session.diagnostics().of_kind(DiagnosticKind::InapplicableCandidate).is_empty());
}

#[test]
fn members_win_over_extensions() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    let class = b.class(file, "Box").build();
    b.constructor(class).build();
    b.function(class, "size").returns(b.user_type("Int")).build();
    b.function(file, "size")
        .receiver(b.user_type("Box"))
        .returns(b.user_type("String"))
        .build();
    b.function(file, "label")
        .receiver(b.user_type("Box"))
        .returns(b.user_type("String"))
        .build();
    let member = b
        .function(file, "member")
        .expression_body(b.call_on(b.call("Box", vec![]), "size", vec![]))
        .build();
    let extension = b
        .function(file, "extension")
        .expression_body(b.call_on(b.call("Box", vec![]), "label", vec![]))
        .build();
    assert_eq!(resolved_return_type(&session, member), "kotlin/Int");
    assert_eq!(resolved_return_type(&session, extension), "kotlin/String");
}

#[test]
fn implicit_receivers_reach_members_and_this() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    let class = b.class(file, "Counter").build();
    b.property(class, "count").returns(b.user_type("Int")).build();
    let implicit = b.function(class, "read").expression_body(b.access("count")).build();
    let labelled = b
        .function(class, "me")
        .expression_body(b.this_at("Counter"))
        .build();
    let outside = b.function(file, "outside").expression_body(b.this()).build();

    assert_eq!(resolved_return_type(&session, implicit), "kotlin/Int");
    assert_eq!(resolved_return_type(&session, labelled), "app/Counter");
    assert!(resolved_return_type(&session, outside).starts_with("ERROR CLASS"));
    assert_eq!(session.diagnostics().of_kind(DiagnosticKind::ThisNotAvailable).len(), 1);
}

#[test]
fn unknown_callee_is_unresolved() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    let id = b.function(file, "f").expression_body(b.call("missing", vec![])).build();
    assert_eq!(
        resolved_return_type(&session, id),
        "ERROR CLASS: Unresolved reference: missing"
    );
}

#[test]
fn wrong_arguments_are_inapplicable() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    b.function(file, "takes")
        .parameter("value", b.user_type("Int"))
        .returns(b.user_type("Int"))
        .build();
    let id = b.function(file, "f").expression_body(b.call("takes", vec![b.string("x")])).build();
    assert!(resolved_return_type(&session, id).starts_with("ERROR CLASS"));
    assert_eq!(session.diagnostics().of_kind(DiagnosticKind::InapplicableCandidate).len(), 1);
}

// === Operators and assignments ===

#[test]
fn operators_have_their_result_types() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    let less = b
        .function(file, "less")
        .expression_body(b.operator(Operation::Less, vec![b.int(1), b.int(2)]))
        .build();
    let negated = b.function(file, "negated").expression_body(b.not(b.boolean(false))).build();
    let cast = b
        .function(file, "cast")
        .expression_body(b.type_operator(
            fir_tree::TypeOperation::SafeAs,
            b.string("s"),
            b.user_type("CharSequence"),
        ))
        .build();
    assert_eq!(resolved_return_type(&session, less), "kotlin/Boolean");
    assert_eq!(resolved_return_type(&session, negated), "kotlin/Boolean");
    assert_eq!(resolved_return_type(&session, cast), "kotlin/CharSequence?");
}

#[test]
fn val_cannot_be_reassigned() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    let id = b
        .function(file, "f")
        .body(b.block(vec![
            b.local("fixed", false, None, Some(b.int(1))),
            b.local("counter", true, None, Some(b.int(1))),
            b.assign("counter", b.int(2)),
            b.assign("fixed", b.int(2)),
        ]))
        .build();
    resolve_to(&session, id, ResolvePhase::BodyResolve).expect("resolves");
    let reassigned = session.diagnostics().of_kind(DiagnosticKind::ValReassignment);
    assert_eq!(reassigned.len(), 1);
}

#[test]
fn class_kind_object_is_a_value() {
    let session = session();
    let b = FirBuilder::new(&session);
    let file = b.file("main.kt", "app");
    b.class(file, "Registry").kind(ClassKind::Object).build();
    let id = b.function(file, "f").expression_body(b.access("Registry")).build();
    assert_eq!(resolved_return_type(&session, id), "app/Registry");
}

// === Scope balance under failure ===

/// Expressions that open and close local scopes.
#[derive(Clone, Debug)]
enum Nesting {
    Value,
    When { variable: bool, branches: Vec<Nesting> },
    Try { body: Box<Nesting>, catches: Vec<Nesting> },
    Lambda(Box<Nesting>),
}

fn nesting() -> impl Strategy<Value = Nesting> {
    Just(Nesting::Value).prop_recursive(4, 24, 3, |inner| {
        prop_oneof![
            (any::<bool>(), prop::collection::vec(inner.clone(), 1..3))
                .prop_map(|(variable, branches)| Nesting::When { variable, branches }),
            (inner.clone(), prop::collection::vec(inner.clone(), 0..3))
                .prop_map(|(body, catches)| Nesting::Try { body: Box::new(body), catches }),
            inner.prop_map(|body| Nesting::Lambda(Box::new(body))),
        ]
    })
}

fn build_nesting(b: &FirBuilder<'_>, nesting: &Nesting) -> FirExpression {
    match nesting {
        Nesting::Value => b.int(1),
        Nesting::When { variable, branches } => {
            let mut arms: Vec<_> = branches
                .iter()
                .map(|branch| b.branch(b.boolean(true), b.block_of(build_nesting(b, branch))))
                .collect();
            arms.push(b.else_branch(b.block_of(b.int(0))));
            if *variable {
                b.when_with_variable("v", b.boolean(true), arms)
            } else {
                b.when(None, arms)
            }
        }
        Nesting::Try { body, catches } => b.try_expression(
            b.block_of(build_nesting(b, body)),
            catches
                .iter()
                .map(|c| b.catch("e", b.user_type("Exception"), b.block_of(build_nesting(b, c))))
                .collect(),
            None,
        ),
        Nesting::Lambda(body) => b.lambda(None, b.block_of(build_nesting(b, body))),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn failed_inference_leaves_the_scope_stack_balanced(nesting in nesting(), fail_at in 0usize..3) {
        let session = session();
        let engine = FailingSelect::install(&session, fail_at);
        let b = FirBuilder::new(&session);
        let file = b.file("main.kt", "app");
        let id = b
            .function(file, "f")
            .returns(b.user_type("Any"))
            .expression_body(build_nesting(&b, &nesting))
            .build();
        resolve_to(&session, id, ResolvePhase::ImplicitTypesBodyResolve).expect("header phases");
        let declaration = session.declarations().checkout(id).expect("available");

        let mut dfa = NoopDataFlowAnalyzer;
        let mut transformer = BodyResolveTransformer::new(&session, &mut dfa);
        let (before, after, panicked) = transformer.with_local_scope(|t| {
            let before = t.scope_depth();
            let caught = catch_unwind(AssertUnwindSafe(|| t.resolve_declaration(id, declaration)));
            (before, t.scope_depth(), caught.is_err())
        });
        prop_assert_eq!(before, after);
        prop_assert_eq!(panicked, engine.failed());
        prop_assert_eq!(transformer.scope_depth(), 0);
    }
}
