use fir_tree::{ClassId, ConeType, ConeTypeProjection, FirSymbol, SyntheticCallKind, TypeParameterOwner, TypeParameterSymbol};
use pretty_assertions::assert_eq;

use super::*;
use crate::calls::{CallArgument, CallCompletion, CallInfo, Candidate, CandidateParameter};
use crate::subtyping::SessionTypeContext;
use crate::{FirSession, ResolveConfig};

fn session() -> FirSession {
    FirSession::new(ResolveConfig::new())
}

fn simple(id: &ClassId) -> ConeType {
    ConeType::simple(id.clone())
}

fn variable(session: &FirSession, name: &str) -> TypeParameterSymbol {
    TypeParameterSymbol {
        owner: TypeParameterOwner::Synthetic(SyntheticCallKind::When),
        index: 0,
        name: session.name(name),
    }
}

fn parameter(session: &FirSession, name: &str, ty: ConeType) -> CandidateParameter {
    CandidateParameter {
        name: session.name(name),
        ty,
        has_default: false,
        is_vararg: false,
    }
}

fn candidate(parameters: Vec<CandidateParameter>, return_type: ConeType) -> Candidate {
    Candidate {
        symbol: FirSymbol::Synthetic(SyntheticCallKind::When),
        type_parameters: Vec::new(),
        receiver_type: None,
        parameters,
        return_type,
    }
}

fn generic(variable: &TypeParameterSymbol, parameters: Vec<CandidateParameter>, return_type: ConeType) -> Candidate {
    Candidate {
        type_parameters: vec![variable.clone()],
        ..candidate(parameters, return_type)
    }
}

fn complete(session: &FirSession, call: &CallInfo) -> CallCompletion {
    SimpleInferenceEngine::new().complete_call(call, &SessionTypeContext::new(session))
}

fn completed(completion: CallCompletion) -> CompletedCall {
    match completion {
        CallCompletion::Completed(call) => call,
        other => panic!("expected a completed call, got {other:?}"),
    }
}

fn expressions(types: &[ConeType]) -> Vec<CallArgument> {
    types.iter().cloned().map(CallArgument::Expression).collect()
}

#[test]
fn most_specific_overload_wins() {
    let s = session();
    let std = s.standard();
    let call = CallInfo::new(
        s.name("f"),
        vec![
            candidate(vec![parameter(&s, "x", simple(&std.any))], simple(&std.unit)),
            candidate(vec![parameter(&s, "x", simple(&std.int))], simple(&std.unit)),
        ],
        expressions(&[simple(&std.int)]),
    );
    assert_eq!(completed(complete(&s, &call)).candidate, 1);
}

#[test]
fn incomparable_overloads_are_ambiguous() {
    let s = session();
    let std = s.standard();
    let (int, any) = (simple(&std.int), simple(&std.any));
    let call = CallInfo::new(
        s.name("f"),
        vec![
            candidate(
                vec![parameter(&s, "a", int.clone()), parameter(&s, "b", any.clone())],
                simple(&std.unit),
            ),
            candidate(vec![parameter(&s, "a", any), parameter(&s, "b", int.clone())], simple(&std.unit)),
        ],
        expressions(&[int.clone(), int]),
    );
    assert_eq!(complete(&s, &call), CallCompletion::Ambiguous(vec![0, 1]));
}

#[test]
fn mismatched_argument_is_not_applicable() {
    let s = session();
    let std = s.standard();
    let call = CallInfo::new(
        s.name("f"),
        vec![candidate(vec![parameter(&s, "x", simple(&std.string))], simple(&std.unit))],
        expressions(&[simple(&std.int)]),
    );
    assert_eq!(complete(&s, &call), CallCompletion::NoApplicable);
}

#[test]
fn missing_argument_needs_a_default() {
    let s = session();
    let std = s.standard();
    let int = simple(&std.int);
    let required = candidate(
        vec![parameter(&s, "x", int.clone()), parameter(&s, "y", int.clone())],
        simple(&std.unit),
    );
    let call = CallInfo::new(s.name("f"), vec![required.clone()], expressions(&[int.clone()]));
    assert_eq!(complete(&s, &call), CallCompletion::NoApplicable);

    let mut defaulted = required;
    defaulted.parameters[1].has_default = true;
    let call = CallInfo::new(s.name("f"), vec![defaulted], expressions(&[int]));
    assert_eq!(completed(complete(&s, &call)).argument_types.len(), 1);
}

#[test]
fn exact_candidate_beats_one_using_defaults() {
    let s = session();
    let std = s.standard();
    let int = simple(&std.int);
    let mut with_default = candidate(
        vec![parameter(&s, "x", int.clone()), parameter(&s, "y", int.clone())],
        simple(&std.unit),
    );
    with_default.parameters[1].has_default = true;
    let exact = candidate(vec![parameter(&s, "x", int.clone())], simple(&std.unit));
    let call = CallInfo::new(s.name("f"), vec![with_default, exact], expressions(&[int]));
    assert_eq!(completed(complete(&s, &call)).candidate, 1);
}

#[test]
fn type_variable_is_fixed_to_the_argument_type() {
    let s = session();
    let std = s.standard();
    let t = variable(&s, "T");
    let tv = ConeType::type_parameter(t.clone());
    let call = CallInfo::new(
        s.name("id"),
        vec![generic(&t, vec![parameter(&s, "x", tv.clone())], tv)],
        expressions(&[simple(&std.string)]),
    );
    let result = completed(complete(&s, &call));
    assert_eq!(result.return_type, simple(&std.string));
    assert_eq!(result.substitutor.get(&t), Some(&simple(&std.string)));
}

#[test]
fn unrelated_arguments_meet_at_their_common_supertype() {
    let s = session();
    let std = s.standard();
    let t = variable(&s, "T");
    let tv = ConeType::type_parameter(t.clone());
    let call = CallInfo::new(
        s.name("pick"),
        vec![generic(
            &t,
            vec![parameter(&s, "a", tv.clone()), parameter(&s, "b", tv.clone())],
            tv,
        )],
        expressions(&[simple(&std.int), simple(&std.string)]),
    );
    assert_eq!(completed(complete(&s, &call)).return_type, simple(&std.any));
}

#[test]
fn varargs_take_every_remaining_argument() {
    let s = session();
    let std = s.standard();
    let t = variable(&s, "T");
    let tv = ConeType::type_parameter(t.clone());
    let list_of = |ty: ConeType| ConeType::class(std.list.clone(), vec![ConeTypeProjection::invariant(ty)], false);
    let mut elements = parameter(&s, "elements", tv.clone());
    elements.is_vararg = true;
    let int = simple(&std.int);
    let call = CallInfo::new(
        s.name("listOf"),
        vec![generic(&t, vec![elements], list_of(tv))],
        expressions(&[int.clone(), int.clone(), int.clone()]),
    );
    let result = completed(complete(&s, &call));
    assert_eq!(result.return_type, list_of(int.clone()));
    assert_eq!(result.argument_types, vec![int.clone(), int.clone(), int]);
}

#[test]
fn nullable_parameter_strips_nullability_from_the_bound() {
    let s = session();
    let std = s.standard();
    let t = variable(&s, "T");
    let nullable_t = ConeType::type_parameter(t.clone()).with_nullability(true);
    let call = CallInfo::new(
        s.name("f"),
        vec![generic(&t, vec![parameter(&s, "x", nullable_t)], ConeType::type_parameter(t.clone()))],
        expressions(&[simple(&std.string).with_nullability(true)]),
    );
    assert_eq!(completed(complete(&s, &call)).return_type, simple(&std.string));
}

#[test]
fn expected_type_fixes_variables_the_arguments_leave_open() {
    let s = session();
    let std = s.standard();
    let t = variable(&s, "T");
    let list_of = |ty: ConeType| ConeType::class(std.list.clone(), vec![ConeTypeProjection::invariant(ty)], false);
    let mut call = CallInfo::new(
        s.name("emptyList"),
        vec![generic(&t, Vec::new(), list_of(ConeType::type_parameter(t.clone())))],
        Vec::new(),
    );
    call.expected_type = Some(list_of(simple(&std.string)));
    assert_eq!(completed(complete(&s, &call)).return_type, list_of(simple(&std.string)));

    call.expected_type = None;
    let fallback = ConeType::class(std.any.clone(), Vec::new(), true);
    assert_eq!(completed(complete(&s, &call)).return_type, list_of(fallback));
}

#[test]
fn explicit_type_arguments_must_match_in_number() {
    let s = session();
    let std = s.standard();
    let t = variable(&s, "T");
    let tv = ConeType::type_parameter(t.clone());
    let mut call = CallInfo::new(
        s.name("id"),
        vec![generic(&t, vec![parameter(&s, "x", tv.clone())], tv)],
        expressions(&[simple(&std.int)]),
    );
    call.explicit_type_arguments = vec![simple(&std.number)];
    assert_eq!(completed(complete(&s, &call)).return_type, simple(&std.number));

    call.explicit_type_arguments = vec![simple(&std.number), simple(&std.int)];
    assert_eq!(complete(&s, &call), CallCompletion::NoApplicable);
}

#[test]
fn lambda_leaves_its_variables_open() {
    let s = session();
    let std = s.standard();
    let t = variable(&s, "T");
    let tv = ConeType::type_parameter(t.clone());
    let function0 = std.function(0).expect("Function0").clone();
    let block = ConeType::class(function0, vec![ConeTypeProjection::invariant(tv.clone())], false);
    let run = generic(&t, vec![parameter(&s, "block", block.clone())], tv.clone());

    let call = CallInfo::new(
        s.name("run"),
        vec![run.clone()],
        vec![CallArgument::Lambda { parameter_count: None }],
    );
    let result = completed(complete(&s, &call));
    assert_eq!(result.return_type, tv);
    assert_eq!(result.argument_types, vec![block]);
    assert!(result.substitutor.get(&t).is_none());

    let call = CallInfo::new(
        s.name("run"),
        vec![run],
        vec![CallArgument::Lambda { parameter_count: Some(2) }],
    );
    assert_eq!(complete(&s, &call), CallCompletion::NoApplicable);
}

#[test]
fn extension_needs_a_matching_receiver() {
    let s = session();
    let std = s.standard();
    let extension = Candidate {
        receiver_type: Some(simple(&std.string)),
        ..candidate(Vec::new(), simple(&std.int))
    };
    let mut call = CallInfo::new(s.name("size"), vec![extension], Vec::new());
    assert_eq!(complete(&s, &call), CallCompletion::NoApplicable);

    call.receiver = Some(simple(&std.int));
    assert_eq!(complete(&s, &call), CallCompletion::NoApplicable);

    call.receiver = Some(simple(&std.string));
    assert_eq!(completed(complete(&s, &call)).return_type, simple(&std.int));
}

#[test]
fn error_arguments_fit_any_parameter() {
    let s = session();
    let std = s.standard();
    let call = CallInfo::new(
        s.name("f"),
        vec![candidate(vec![parameter(&s, "x", simple(&std.int))], simple(&std.string))],
        expressions(&[ConeType::error("unresolved")]),
    );
    assert_eq!(completed(complete(&s, &call)).return_type, simple(&std.string));
}
