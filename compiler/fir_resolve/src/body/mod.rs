//! Body resolution.
//!
//! # Design
//!
//! [`BodyResolveTransformer`] is a [`FirTransformer`] whose data is the
//! expected type of the node being rewritten. It walks a declaration's
//! body once, in evaluation order, and for every expression:
//!
//! - resolves references against locals, implicit receivers and the
//!   static scopes of the enclosing declaration,
//! - hands calls to the session's [`InferenceEngine`] level by level,
//! - writes the inferred type into the node's type ref,
//! - tells the [`DataFlowAnalyzer`] where control enters and leaves.
//!
//! Every construct that introduces names opens exactly one local scope
//! through a [`LocalScopeGuard`], which restores the stack even when
//! resolution panics.
//!
//! The same transformer runs in two modes. `ImplicitTypeOnly` is used by
//! the implicit-types phase to compute the return type of a declaration
//! someone else depends on; `Full` is the body-resolve phase proper.

mod calls;
mod context;
mod control_flow;
mod declarations;
mod exhaustiveness;
mod expressions;
mod scope_guard;

use std::sync::Arc;

use fir_tree::{
    ClassId, ConeType, DeclId, FirAnonymousFunction, FirBinaryLogicExpression, FirBlock, FirCatch,
    FirConstExpression, FirDeclaration, FirDoWhileLoop, FirElseIfTrueCondition, FirExpression,
    FirFunctionCall, FirLoopJump, FirOperatorCall, FirProperty, FirQualifiedAccessExpression,
    FirReturnExpression, FirStatement, FirThisReceiverExpression, FirThrowExpression,
    FirTransformer, FirTryExpression, FirTypeOperatorCall, FirTypeRef, FirValueParameter,
    FirVariableAssignment, FirWhenExpression, FirWhenSubjectExpression, FirWhileLoop, ResolvePhase,
};

use crate::calls::InferenceEngine;
use crate::dfa::DataFlowAnalyzer;
use crate::phases::{report_type_error, transform_in_table};
use crate::subtyping::SessionTypeContext;
use crate::type_resolver::FirTypeResolver;
use crate::{FirSession, ResolveError};

use context::BodyResolveContext;
pub use scope_guard::{ContainerGuard, LocalScopeGuard};

/// Expected type of the node being transformed, if any.
type Expected = Option<ConeType>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResolutionMode {
    /// Resolve everything.
    Full,
    /// Only what the declaration's own type depends on: declarations with
    /// an explicit type are left alone.
    ImplicitTypeOnly,
}

pub struct BodyResolveTransformer<'s, 'd> {
    session: &'s FirSession,
    dfa: &'d mut dyn DataFlowAnalyzer,
    engine: Arc<dyn InferenceEngine>,
    mode: ResolutionMode,
    context: BodyResolveContext,
}

impl<'s, 'd> BodyResolveTransformer<'s, 'd> {
    pub fn new(session: &'s FirSession, dfa: &'d mut dyn DataFlowAnalyzer) -> Self {
        BodyResolveTransformer {
            session,
            dfa,
            engine: session.inference_engine(),
            mode: ResolutionMode::Full,
            context: BodyResolveContext::new(),
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ResolutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    /// Number of local scopes currently open.
    pub fn scope_depth(&self) -> usize {
        self.context.local_scopes.len()
    }

    /// Run `f` inside a fresh local scope, popped however `f` exits.
    pub fn with_local_scope<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let mut scoped = self.scoped_local();
        f(&mut scoped)
    }

    /// Run `f` with `id` as the enclosing declaration.
    pub(crate) fn with_container<R>(&mut self, id: DeclId, f: impl FnOnce(&mut Self) -> R) -> R {
        let mut scoped = self.scoped_container(id);
        f(&mut scoped)
    }

    /// Resolve the body of the declaration stored under `id`.
    ///
    /// Files and classes have no bodies of their own; their members are
    /// separate declarations and come back unchanged.
    pub fn resolve_declaration(&mut self, id: DeclId, declaration: FirDeclaration) -> FirDeclaration {
        match declaration {
            FirDeclaration::SimpleFunction(function) => {
                FirDeclaration::SimpleFunction(self.with_container(id, |t| t.resolve_function(function)))
            }
            FirDeclaration::Property(property) => {
                FirDeclaration::Property(self.with_container(id, |t| t.resolve_member_property(property)))
            }
            FirDeclaration::Constructor(constructor) => {
                FirDeclaration::Constructor(self.with_container(id, |t| t.resolve_constructor(constructor)))
            }
            other @ (FirDeclaration::File(_) | FirDeclaration::RegularClass(_)) => other,
        }
    }

    // === Helpers shared by the submodules ===

    fn type_context(&self) -> SessionTypeContext<'s> {
        SessionTypeContext::new(self.session)
    }

    /// Type of a builtin class, through the session's builtin type cache.
    fn builtin_type(&self, class_id: &ClassId) -> ConeType {
        match self.session.builtin_types().symbol(self.session, class_id) {
            Some(symbol) => ConeType::simple(symbol.0),
            None => ConeType::error(format!(
                "Symbol not found, for `{}`",
                class_id.render(self.session)
            )),
        }
    }

    fn unit_type(&self) -> ConeType {
        self.builtin_type(&self.session.standard().unit)
    }

    fn boolean_type(&self) -> ConeType {
        self.builtin_type(&self.session.standard().boolean)
    }

    fn nothing_type(&self) -> ConeType {
        self.builtin_type(&self.session.standard().nothing)
    }

    fn is_unit(&self, ty: &ConeType) -> bool {
        ty.is_class(&self.session.standard().unit) && !ty.is_nullable()
    }

    fn report(&self, kind: crate::DiagnosticKind, message: impl Into<String>) {
        self.session.report(kind, message, self.context.container);
    }
}

/// Type of an already-resolved node, or the error type.
fn type_of(expression: &FirExpression) -> ConeType {
    expression.type_ref().cone_type_or_error()
}

fn resolved(ty: ConeType) -> FirTypeRef {
    FirTypeRef::resolved(ty)
}

impl FirTransformer<Expected> for BodyResolveTransformer<'_, '_> {
    fn transform_expression(&mut self, expression: FirExpression, data: Expected) -> FirExpression {
        if expression.type_ref().is_resolved() {
            return expression;
        }
        crate::stack::ensure_sufficient_stack(|| expression.transform(self, data))
    }

    fn transform_type_ref(&mut self, type_ref: FirTypeRef, _: Expected) -> FirTypeRef {
        if type_ref.is_implicit() || type_ref.is_resolved() {
            return type_ref;
        }
        let resolved = FirTypeResolver::new(self.session).resolve_type_ref(type_ref, &*self.context.static_scope);
        if let Some(container) = self.context.container {
            report_type_error(self.session, &resolved, container);
        }
        resolved
    }

    fn transform_value_parameter(&mut self, mut parameter: FirValueParameter, _: Expected) -> FirValueParameter {
        parameter.transform_return_type_ref(self, None);
        let expected = parameter.return_type_ref().cone_type().cloned();
        parameter.transform_other_children(self, expected);
        parameter
    }

    fn transform_property(&mut self, property: Box<FirProperty>, _: Expected) -> Box<FirProperty> {
        if property.is_local() {
            self.resolve_local_property(property)
        } else {
            self.resolve_member_property(property)
        }
    }

    fn transform_block(&mut self, block: FirBlock, data: Expected) -> FirBlock {
        if std::mem::take(&mut self.context.inherit_scope) {
            self.resolve_block(block, data)
        } else {
            self.with_local_scope(|t| t.resolve_block(block, data))
        }
    }

    fn transform_const_expression(&mut self, expression: Box<FirConstExpression>, data: Expected) -> FirExpression {
        self.resolve_const(expression, data)
    }

    fn transform_qualified_access_expression(
        &mut self,
        expression: Box<FirQualifiedAccessExpression>,
        _: Expected,
    ) -> FirExpression {
        self.resolve_qualified_access(expression)
    }

    fn transform_function_call(&mut self, call: Box<FirFunctionCall>, data: Expected) -> FirExpression {
        self.resolve_function_call(call, data)
    }

    fn transform_when_expression(&mut self, expression: Box<FirWhenExpression>, data: Expected) -> FirExpression {
        self.resolve_when(expression, data)
    }

    fn transform_when_subject_expression(
        &mut self,
        mut expression: Box<FirWhenSubjectExpression>,
        _: Expected,
    ) -> FirExpression {
        let ty = match self.context.when_subjects.last() {
            Some(subject) => subject.clone(),
            None => ConeType::error("No when subject in scope"),
        };
        expression.replace_type_ref(resolved(ty));
        FirExpression::WhenSubject(expression)
    }

    fn transform_else_if_true_condition(
        &mut self,
        mut condition: Box<FirElseIfTrueCondition>,
        _: Expected,
    ) -> FirExpression {
        condition.replace_type_ref(resolved(self.boolean_type()));
        FirExpression::ElseIfTrueCondition(condition)
    }

    fn transform_try_expression(&mut self, expression: Box<FirTryExpression>, data: Expected) -> FirExpression {
        self.resolve_try(expression, data)
    }

    fn transform_catch(&mut self, catch: FirCatch, _: Expected) -> FirCatch {
        self.resolve_catch(catch)
    }

    fn transform_loop_jump(&mut self, mut jump: Box<FirLoopJump>, _: Expected) -> FirExpression {
        let kind = match jump.kind() {
            fir_tree::LoopJumpKind::Break => crate::dfa::JumpKind::Break,
            fir_tree::LoopJumpKind::Continue => crate::dfa::JumpKind::Continue,
        };
        jump.replace_type_ref(resolved(self.nothing_type()));
        self.dfa.jump(kind);
        FirExpression::LoopJump(jump)
    }

    fn transform_return_expression(&mut self, expression: Box<FirReturnExpression>, _: Expected) -> FirExpression {
        self.resolve_return(expression)
    }

    fn transform_throw_expression(&mut self, expression: Box<FirThrowExpression>, _: Expected) -> FirExpression {
        let mut expression = expression.transform_children(self, None);
        expression.replace_type_ref(resolved(self.nothing_type()));
        self.dfa.jump(crate::dfa::JumpKind::Throw);
        FirExpression::Throw(expression)
    }

    fn transform_anonymous_function(
        &mut self,
        function: Box<FirAnonymousFunction>,
        data: Expected,
    ) -> FirExpression {
        self.resolve_lambda(function, data)
    }

    fn transform_this_receiver_expression(
        &mut self,
        expression: Box<FirThisReceiverExpression>,
        _: Expected,
    ) -> FirExpression {
        self.resolve_this(expression)
    }

    fn transform_operator_call(&mut self, call: Box<FirOperatorCall>, _: Expected) -> FirExpression {
        self.resolve_operator_call(call)
    }

    fn transform_type_operator_call(&mut self, call: Box<FirTypeOperatorCall>, _: Expected) -> FirExpression {
        self.resolve_type_operator_call(call)
    }

    fn transform_binary_logic_expression(
        &mut self,
        expression: Box<FirBinaryLogicExpression>,
        _: Expected,
    ) -> FirExpression {
        let boolean = self.boolean_type();
        let mut expression = expression.transform_children(self, Some(boolean.clone()));
        expression.replace_type_ref(resolved(boolean));
        FirExpression::BinaryLogic(expression)
    }

    fn transform_while_loop(&mut self, r#loop: Box<FirWhileLoop>, _: Expected) -> FirStatement {
        self.resolve_while_loop(r#loop)
    }

    fn transform_do_while_loop(&mut self, r#loop: Box<FirDoWhileLoop>, _: Expected) -> FirStatement {
        self.resolve_do_while_loop(r#loop)
    }

    fn transform_variable_assignment(
        &mut self,
        assignment: Box<FirVariableAssignment>,
        _: Expected,
    ) -> FirStatement {
        self.resolve_assignment(assignment)
    }
}

fn needs_implicit_type(declaration: &FirDeclaration) -> bool {
    match declaration {
        FirDeclaration::SimpleFunction(f) => f.return_type_ref().is_implicit(),
        FirDeclaration::Property(p) => p.return_type_ref().is_implicit(),
        FirDeclaration::File(_) | FirDeclaration::RegularClass(_) | FirDeclaration::Constructor(_) => false,
    }
}

/// The implicit-types phase for one declaration.
///
/// Only declarations whose type is left out get their bodies walked here.
/// While the walk runs the declaration stays checked out, so a body that
/// depends on its own type sees a recursive problem instead of looping.
/// This is the only walk over such a body, so the session's data-flow
/// analyzer gets its notifications here.
pub(crate) fn resolve_implicit_types(session: &FirSession, id: DeclId) -> Result<(), ResolveError> {
    let needed = session.declarations().with(id, needs_implicit_type).unwrap_or(false);
    let factory = session.data_flow_factory();
    transform_in_table(session, id, ResolvePhase::ImplicitTypesBodyResolve, |declaration| {
        if !needed {
            return declaration;
        }
        tracing::debug!(id = id.raw(), "resolving implicit type");
        let mut dfa = factory.analyzer(id);
        BodyResolveTransformer::new(session, &mut *dfa)
            .with_mode(ResolutionMode::ImplicitTypeOnly)
            .resolve_declaration(id, declaration)
    })
}

/// The body-resolve phase for one declaration.
pub(crate) fn resolve_body(session: &FirSession, id: DeclId) -> Result<(), ResolveError> {
    let factory = session.data_flow_factory();
    transform_in_table(session, id, ResolvePhase::BodyResolve, |declaration| {
        let mut dfa = factory.analyzer(id);
        BodyResolveTransformer::new(session, &mut *dfa).resolve_declaration(id, declaration)
    })
}

#[cfg(test)]
mod tests;
