//! Function calls.
//!
//! A call without an explicit receiver is tried level by level, innermost
//! first:
//!
//! ```text
//! locals (invoke on a function-typed variable)
//! each implicit receiver: its members, then extensions on it
//! each static scope of the enclosing declaration
//! ```
//!
//! A call on an explicit receiver tries the receiver's members, then
//! extensions. The first level whose candidates complete wins; a level
//! where nothing applies hands over to the next one.

use fir_tree::{
    ConeType, FirExpression, FirFunctionCall, FirReference, FirSymbol, FirTransformer, FirTypeRef,
    FunctionSymbol, Name,
};
use rustc_hash::FxHashSet;

use super::{resolved, type_of, BodyResolveTransformer, Expected};
use crate::calls::{
    function_candidate, invoke_candidate, CallArgument, CallCompletion, CallInfo, Candidate, CompletedCall,
};
use crate::diagnostics::DiagnosticKind;
use crate::scopes::{FirScope, ProcessorAction};

/// What the resolver knows about a call before choosing a callee.
pub(super) struct CallSite {
    pub name: Name,
    pub receiver: Option<ConeType>,
    pub safe: bool,
    pub arguments: Vec<CallArgument>,
    pub type_arguments: Vec<ConeType>,
    pub expected: Expected,
}

pub(super) enum CallOutcome {
    Completed { info: CallInfo, completed: CompletedCall },
    Ambiguous(Vec<FirSymbol>),
    /// Candidates exist but none takes these arguments.
    Inapplicable,
    Unresolved,
}

#[derive(Copy, Clone, Debug)]
enum Level {
    Locals,
    /// Indexed innermost first.
    ReceiverMembers(usize),
    ReceiverExtensions(usize),
    Static(usize),
    Members,
    Extensions,
}

fn functions_in(session: &crate::FirSession, scope: &dyn FirScope, name: Name) -> Vec<FunctionSymbol> {
    let mut functions = Vec::new();
    scope.process_functions_by_name(session, name, &mut |symbol| {
        functions.push(symbol);
        ProcessorAction::Next
    });
    functions
}

impl BodyResolveTransformer<'_, '_> {
    fn levels(&self, site: &CallSite) -> Vec<Level> {
        if site.receiver.is_some() {
            return vec![Level::Members, Level::Extensions];
        }
        let mut levels = vec![Level::Locals];
        for index in 0..self.context.receivers.len() {
            levels.push(Level::ReceiverMembers(index));
            levels.push(Level::ReceiverExtensions(index));
        }
        levels.extend((0..self.context.static_levels.len()).map(Level::Static));
        levels
    }

    fn member_candidates(&self, receiver: &ConeType, name: Name, seen: &mut FxHashSet<FunctionSymbol>) -> Vec<Candidate> {
        let Some(class_id) = self.receiver_class(receiver) else {
            return Vec::new();
        };
        let Some(scope) = self.session.use_site_scope(&class_id) else {
            return Vec::new();
        };
        let dispatch = receiver.with_nullability(false);
        functions_in(self.session, &*scope, name)
            .into_iter()
            .filter(|symbol| seen.insert(*symbol))
            .filter_map(|symbol| function_candidate(self.session, symbol, Some(&dispatch), self.context.container))
            .filter(|candidate| candidate.receiver_type.is_none())
            .collect()
    }

    /// Extensions visible from the enclosing declaration. Every implicit
    /// receiver gets to try all of them.
    fn extension_candidates(&self, name: Name) -> Vec<Candidate> {
        let mut seen = FxHashSet::default();
        let mut candidates = Vec::new();
        for level in &self.context.static_levels {
            for symbol in functions_in(self.session, &**level, name) {
                if !seen.insert(symbol) {
                    continue;
                }
                let candidate = function_candidate(self.session, symbol, None, self.context.container);
                candidates.extend(candidate.filter(|c| c.receiver_type.is_some()));
            }
        }
        candidates
    }

    /// Candidates of one level and the receiver they are called on.
    fn level_candidates(
        &self,
        level: Level,
        site: &CallSite,
        seen: &mut FxHashSet<FunctionSymbol>,
    ) -> (Vec<Candidate>, Option<ConeType>) {
        let session = self.session;
        let container = self.context.container;
        match level {
            Level::Locals => {
                let candidates = self
                    .context
                    .local(site.name)
                    .and_then(|(_, variable)| invoke_candidate(session, &variable.ty, container))
                    .into_iter()
                    .collect();
                (candidates, None)
            }
            Level::ReceiverMembers(index) | Level::ReceiverExtensions(index) => {
                let Some(receiver) = self.context.receivers.innermost_first().nth(index) else {
                    return (Vec::new(), None);
                };
                let ty = receiver.ty.clone();
                let candidates = if matches!(level, Level::ReceiverMembers(_)) {
                    self.member_candidates(&ty, site.name, seen)
                } else {
                    self.extension_candidates(site.name)
                };
                (candidates, Some(ty))
            }
            Level::Static(index) => {
                let Some(scope) = self.context.static_levels.get(index) else {
                    return (Vec::new(), None);
                };
                let candidates = functions_in(session, &**scope, site.name)
                    .into_iter()
                    .filter(|symbol| seen.insert(*symbol))
                    .filter_map(|symbol| function_candidate(session, symbol, None, container))
                    .filter(|candidate| candidate.receiver_type.is_none())
                    .collect();
                (candidates, None)
            }
            Level::Members => match &site.receiver {
                Some(receiver) => (
                    self.member_candidates(receiver, site.name, seen),
                    Some(receiver.with_nullability(false)),
                ),
                None => (Vec::new(), None),
            },
            Level::Extensions => match &site.receiver {
                Some(receiver) => {
                    let receiver = if site.safe {
                        receiver.with_nullability(false)
                    } else {
                        receiver.clone()
                    };
                    (self.extension_candidates(site.name), Some(receiver))
                }
                None => (Vec::new(), None),
            },
        }
    }

    /// Try each level until one completes.
    pub(super) fn resolve_call_site(&self, site: &CallSite) -> CallOutcome {
        let context = self.type_context();
        let mut seen = FxHashSet::default();
        let mut inapplicable = false;
        for level in self.levels(site) {
            let (candidates, receiver) = self.level_candidates(level, site, &mut seen);
            if candidates.is_empty() {
                continue;
            }
            let info = CallInfo {
                name: site.name,
                candidates,
                receiver,
                arguments: site.arguments.clone(),
                explicit_type_arguments: site.type_arguments.clone(),
                expected_type: site.expected.clone(),
            };
            match self.engine.complete_call(&info, &context) {
                CallCompletion::Completed(completed) => {
                    tracing::trace!(name = self.session.text(site.name), ?level, "call completed");
                    return CallOutcome::Completed { info, completed };
                }
                CallCompletion::Ambiguous(indices) => {
                    let symbols = indices
                        .iter()
                        .filter_map(|&i| info.candidates.get(i).map(|c| c.symbol.clone()))
                        .collect();
                    return CallOutcome::Ambiguous(symbols);
                }
                CallCompletion::NoApplicable => inapplicable = true,
            }
        }
        if inapplicable {
            CallOutcome::Inapplicable
        } else {
            CallOutcome::Unresolved
        }
    }

    /// Report a failed outcome and turn it into an error reference and type.
    pub(super) fn report_call_outcome(
        &self,
        name: Name,
        outcome: CallOutcome,
    ) -> Result<(CallInfo, CompletedCall), (FirReference, ConeType)> {
        let text = self.session.text(name);
        let (kind, reason) = match outcome {
            CallOutcome::Completed { info, completed } => return Ok((info, completed)),
            CallOutcome::Unresolved => return Err(self.unresolved(name)),
            CallOutcome::Ambiguous(symbols) => (
                DiagnosticKind::AmbiguousCall,
                format!("Overload resolution ambiguity between {} candidates: {text}", symbols.len()),
            ),
            CallOutcome::Inapplicable => (
                DiagnosticKind::InapplicableCandidate,
                format!("Inapplicable candidate(s): {text}"),
            ),
        };
        self.report(kind, reason.clone());
        Err((
            FirReference::Error {
                name,
                reason: reason.clone(),
            },
            ConeType::error(reason),
        ))
    }

    fn resolve_lambda_arguments(&mut self, call: &mut FirFunctionCall, expected: &[ConeType]) {
        call.map_arguments(|index, argument| match argument {
            FirExpression::AnonymousFunction(lambda) => self.resolve_lambda(lambda, expected.get(index).cloned()),
            other => other,
        });
    }

    /// Analyze lambda arguments against the completed call, then complete
    /// the chosen candidate again with the lambdas' types.
    fn complete_lambdas(
        &mut self,
        call: &mut FirFunctionCall,
        info: CallInfo,
        completed: CompletedCall,
    ) -> CompletedCall {
        if !info.arguments.iter().any(CallArgument::is_lambda) {
            return completed;
        }
        self.resolve_lambda_arguments(call, &completed.argument_types);
        let Some(chosen) = info.candidates.get(completed.candidate).cloned() else {
            return completed;
        };
        let again = CallInfo {
            candidates: vec![chosen],
            arguments: call.arguments().iter().map(|a| CallArgument::Expression(type_of(a))).collect(),
            ..info
        };
        match self.engine.complete_call(&again, &self.type_context()) {
            CallCompletion::Completed(recompleted) => CompletedCall {
                candidate: completed.candidate,
                ..recompleted
            },
            CallCompletion::Ambiguous(_) | CallCompletion::NoApplicable => completed,
        }
    }

    pub(super) fn resolve_function_call(&mut self, mut call: Box<FirFunctionCall>, expected: Expected) -> FirExpression {
        call.transform_explicit_receiver(self, None);
        call.transform_type_arguments(self, None);
        let Some(name) = call.callee_reference().name() else {
            call.replace_type_ref(resolved(ConeType::error("Call without a name")));
            return FirExpression::FunctionCall(call);
        };
        call.map_arguments(|_, argument| match argument {
            lambda @ FirExpression::AnonymousFunction(_) => lambda,
            other => self.transform_expression(other, None),
        });

        let safe = call.safe();
        let receiver = (!call.explicit_receiver().is_no_receiver()).then(|| type_of(call.explicit_receiver()));
        if let Some(receiver) = receiver.as_ref().filter(|r| r.is_error()) {
            self.resolve_lambda_arguments(&mut call, &[]);
            call.replace_callee_reference(FirReference::Error {
                name,
                reason: "Receiver has an error type".to_owned(),
            });
            call.replace_type_ref(resolved(receiver.clone()));
            return FirExpression::FunctionCall(call);
        }
        if let Some(receiver) = &receiver {
            self.check_receiver_nullability(receiver, safe);
        }

        let arguments = call
            .arguments()
            .iter()
            .map(|argument| match argument {
                FirExpression::AnonymousFunction(lambda) => CallArgument::Lambda {
                    parameter_count: lambda.has_explicit_parameters().then(|| lambda.value_parameters().len()),
                },
                other => CallArgument::Expression(type_of(other)),
            })
            .collect();
        let site = CallSite {
            name,
            receiver,
            safe,
            arguments,
            type_arguments: call.type_arguments().iter().map(FirTypeRef::cone_type_or_error).collect(),
            expected,
        };
        let outcome = self.resolve_call_site(&site);

        match self.report_call_outcome(name, outcome) {
            Ok((info, completed)) => {
                let symbol = info.candidates.get(completed.candidate).map(|c| c.symbol.clone());
                let completed = self.complete_lambdas(&mut call, info, completed);
                let nullable_result = safe && site.receiver.as_ref().is_some_and(ConeType::is_nullable);
                let ty = if nullable_result {
                    completed.return_type.with_nullability(true)
                } else {
                    completed.return_type
                };
                if let Some(symbol) = symbol {
                    call.replace_callee_reference(FirReference::Resolved { name, symbol });
                }
                call.replace_type_ref(resolved(ty));
            }
            Err((reference, ty)) => {
                self.resolve_lambda_arguments(&mut call, &[]);
                call.replace_callee_reference(reference);
                call.replace_type_ref(resolved(ty));
            }
        }
        self.dfa.exit_call(name);
        FirExpression::FunctionCall(call)
    }
}
