//! `when`, `try`, `return` and loops.
//!
//! `when` and `try` pick their type the way a call would: every branch is
//! an argument of a synthetic generic function `fun <K> select(vararg K): K`
//! and the engine infers `K`. A `when` with a single meaningful branch
//! skips that and takes the branch's type directly.

use fir_tree::{
    ConeType, FirCatch, FirDoWhileLoop, FirExpression, FirReference, FirReturnExpression, FirStatement,
    FirSymbol, FirTryExpression, FirWhenExpression, FirWhileLoop, Name, SyntheticCallKind,
};

use super::{exhaustiveness, resolved, type_of, BodyResolveTransformer, Expected};
use crate::calls::{synthetic_candidate, CallArgument, CallCompletion, CallInfo};
use crate::dfa::JumpKind;
use crate::diagnostics::DiagnosticKind;

/// One branch, or a branch followed by an `else` that does nothing.
fn is_single_branch(when: &FirWhenExpression) -> bool {
    match when.branches() {
        [_] => true,
        [_, second] => second.is_else() && second.result().is_empty(),
        _ => false,
    }
}

impl BodyResolveTransformer<'_, '_> {
    /// Infer the common type of `branches` through a synthetic call. The
    /// expected type of the whole construct is the call's expected type.
    fn unify_branches(
        &self,
        kind: SyntheticCallKind,
        name: Name,
        branches: Vec<ConeType>,
        expected: Expected,
    ) -> (FirReference, ConeType) {
        if branches.is_empty() {
            let reason = "Construct has no branches".to_owned();
            return (FirReference::Error { name, reason: reason.clone() }, ConeType::error(reason));
        }
        let candidate = synthetic_candidate(self.session, kind, branches.len());
        let mut info = CallInfo::new(
            name,
            vec![candidate],
            branches.into_iter().map(CallArgument::Expression).collect(),
        );
        info.expected_type = expected;
        match self.engine.complete_call(&info, &self.type_context()) {
            CallCompletion::Completed(completed) => (
                FirReference::Resolved {
                    name,
                    symbol: FirSymbol::Synthetic(kind),
                },
                completed.return_type,
            ),
            CallCompletion::Ambiguous(_) | CallCompletion::NoApplicable => {
                let reason = format!("Cannot infer a common type of {}", self.session.text(name));
                (FirReference::Error { name, reason: reason.clone() }, ConeType::error(reason))
            }
        }
    }

    pub(super) fn resolve_when(&mut self, when: Box<FirWhenExpression>, expected: Expected) -> FirExpression {
        if when.type_ref().is_resolved() {
            return FirExpression::When(when);
        }
        self.dfa.enter_when_expression();
        let when = if when.subject_variable().is_some() {
            self.with_local_scope(|t| t.resolve_when_in_scope(when, expected))
        } else {
            self.resolve_when_in_scope(when, expected)
        };
        FirExpression::When(when)
    }

    fn resolve_when_in_scope(&mut self, mut when: Box<FirWhenExpression>, expected: Expected) -> Box<FirWhenExpression> {
        when.transform_subject(self, None);
        let subject = when
            .subject()
            .map(type_of)
            .or_else(|| when.subject_variable().map(|v| v.return_type_ref().cone_type_or_error()));
        let pushed = subject.is_some();
        if let Some(subject) = &subject {
            self.context.when_subjects.push(subject.clone());
        }

        let boolean = self.boolean_type();
        let single = is_single_branch(&when);
        let branch_expected = if single { expected.clone() } else { None };
        when.map_branches(|_, mut branch| {
            self.dfa.enter_when_branch_condition();
            branch.transform_condition(self, Some(boolean.clone()));
            self.dfa.exit_when_branch_condition();
            branch.transform_result(self, branch_expected.clone());
            self.dfa.exit_when_branch_result();
            branch
        });
        if pushed {
            self.context.when_subjects.pop();
        }

        let ty = if single {
            when.branches()
                .first()
                .map_or_else(|| ConeType::error("Empty when"), |b| b.result().type_ref().cone_type_or_error())
        } else {
            let name = self.session.special_names().when_call;
            let branches = when.branches().iter().map(|b| b.result().type_ref().cone_type_or_error()).collect();
            let (reference, ty) = self.unify_branches(SyntheticCallKind::When, name, branches, expected.clone());
            when.replace_callee_reference(reference);
            ty
        };

        let exhaustive = exhaustiveness::is_exhaustive(self.session, &when, subject.as_ref());
        when.replace_is_exhaustive(exhaustive);
        let ty = if exhaustive || when.branches().is_empty() {
            ty
        } else {
            let used_as_value = expected.as_ref().is_some_and(|e| !self.is_unit(e));
            if used_as_value && self.session.config().report_non_exhaustive_when {
                self.report(
                    DiagnosticKind::NonExhaustiveWhen,
                    "'when' expression must be exhaustive, add necessary branches or an 'else' branch",
                );
            }
            self.unit_type()
        };
        tracing::trace!(exhaustive, ty = %self.session.render_type(&ty), "when resolved");
        self.dfa.exit_when_expression(exhaustive);
        when.replace_type_ref(resolved(ty));
        when
    }

    pub(super) fn resolve_try(&mut self, mut expression: Box<FirTryExpression>, expected: Expected) -> FirExpression {
        self.dfa.enter_try_expression();
        expression.transform_try_block(self, None);
        self.dfa.exit_try_main_block();
        expression.transform_catches(self, None);

        let mut branches = vec![expression.try_block().type_ref().cone_type_or_error()];
        branches.extend(expression.catches().iter().map(|c| c.block().type_ref().cone_type_or_error()));
        let name = self.session.special_names().try_call;
        let (reference, ty) = self.unify_branches(SyntheticCallKind::Try, name, branches, expected);
        expression.replace_callee_reference(reference);

        if expression.finally_block().is_some() {
            self.dfa.enter_finally_block();
            expression.transform_finally_block(self, None);
            self.dfa.exit_finally_block();
        }
        self.dfa.exit_try_expression();
        expression.replace_type_ref(resolved(ty));
        FirExpression::Try(expression)
    }

    pub(super) fn resolve_catch(&mut self, catch: FirCatch) -> FirCatch {
        self.with_local_scope(|t| {
            let mut catch = catch;
            t.dfa.enter_catch_clause();
            catch.transform_parameter(t, None);
            let parameter = catch.parameter();
            let ty = parameter.return_type_ref().cone_type_or_error();
            t.context.declare_local(parameter.name(), parameter.symbol(), ty, false);
            t.dfa.variable_declaration(parameter.symbol());
            catch.transform_block(t, None);
            t.dfa.exit_catch_clause();
            catch
        })
    }

    pub(super) fn resolve_return(&mut self, mut expression: Box<FirReturnExpression>) -> FirExpression {
        let label = expression.target_label();
        let expected = match self.context.return_target_mut(label) {
            Some(target) => target.expected.clone(),
            None => {
                self.report(DiagnosticKind::ReturnNotAllowed, "'return' is not allowed here");
                None
            }
        };
        expression.transform_result(self, expected);
        let result = if expression.result().is_no_receiver() {
            self.unit_type()
        } else {
            type_of(expression.result())
        };
        if let Some(target) = self.context.return_target_mut(label) {
            target.collected.push(result);
        }
        expression.replace_type_ref(resolved(self.nothing_type()));
        self.dfa.jump(JumpKind::Return);
        FirExpression::Return(expression)
    }

    pub(super) fn resolve_while_loop(&mut self, mut r#loop: Box<FirWhileLoop>) -> FirStatement {
        let boolean = self.boolean_type();
        self.dfa.enter_while_loop();
        r#loop.transform_condition(self, Some(boolean));
        self.dfa.exit_while_condition();
        r#loop.transform_block(self, None);
        self.dfa.exit_while_loop();
        FirStatement::WhileLoop(r#loop)
    }

    /// The body and the condition share one scope, so the condition sees
    /// variables declared in the body.
    pub(super) fn resolve_do_while_loop(&mut self, r#loop: Box<FirDoWhileLoop>) -> FirStatement {
        let boolean = self.boolean_type();
        let r#loop = self.with_local_scope(|t| {
            let mut r#loop = r#loop;
            t.dfa.enter_do_while_loop();
            t.context.inherit_scope = true;
            r#loop.transform_block(t, None);
            t.context.inherit_scope = false;
            t.dfa.exit_do_while_block();
            t.dfa.enter_do_while_condition();
            r#loop.transform_condition(t, Some(boolean));
            t.dfa.exit_do_while_loop();
            r#loop
        });
        FirStatement::DoWhileLoop(r#loop)
    }
}
