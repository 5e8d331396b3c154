//! Rewriting traversal.
//!
//! # Design
//!
//! A transformer takes each node by value and returns its replacement, which
//! may be the same node with rewritten children or something else entirely
//! (a `when` can come back as an error expression, a call as a different
//! call). Every default method rewrites the node's children in declared
//! field order through `transform_children` and returns the node itself, so
//! a pass overrides only the kinds it cares about.
//!
//! Lists are rewritten element by element in place. Named members of files
//! and classes are only `DeclId`s in the tree; `transform_member` is the hook
//! through which a pass reaches into the declaration table.

use crate::nodes::{
    FirAnonymousFunction, FirBinaryLogicExpression, FirBlock, FirCatch, FirConstExpression,
    FirConstructor, FirDeclaration, FirDoWhileLoop, FirElseIfTrueCondition, FirExpression,
    FirFile, FirFunctionCall, FirImport, FirLoopJump, FirOperatorCall, FirProperty,
    FirQualifiedAccessExpression, FirRegularClass, FirReturnExpression, FirSimpleFunction,
    FirStatement, FirThisReceiverExpression, FirThrowExpression, FirTryExpression,
    FirTypeOperatorCall, FirTypeParameter, FirValueParameter, FirVariableAssignment,
    FirWhenBranch, FirWhenExpression, FirWhenSubjectExpression, FirWhileLoop,
};
use crate::{transform_inplace, DeclId, FirReference, FirTypeProjection, FirTypeRef};

/// Rewriting visitor over the tree.
///
/// `D` is cloned for each child; body resolution uses it for the expected
/// type of the node being transformed.
pub trait FirTransformer<D: Clone> {
    // === Dispatch ===

    fn transform_statement(&mut self, statement: FirStatement, data: D) -> FirStatement {
        statement.transform(self, data)
    }

    fn transform_expression(&mut self, expression: FirExpression, data: D) -> FirExpression {
        expression.transform(self, data)
    }

    fn transform_declaration(&mut self, declaration: FirDeclaration, data: D) -> FirDeclaration {
        declaration.transform(self, data)
    }

    /// A named member of a file or class, by table id. No-op by default.
    fn transform_member(&mut self, member: DeclId, data: D) {
        let _ = (member, data);
    }

    // === Declarations ===

    fn transform_file(&mut self, file: Box<FirFile>, data: D) -> Box<FirFile> {
        file.transform_children(self, data)
    }

    fn transform_import(&mut self, import: FirImport, data: D) -> FirImport {
        let _ = data;
        import
    }

    fn transform_regular_class(
        &mut self,
        class: Box<FirRegularClass>,
        data: D,
    ) -> Box<FirRegularClass> {
        class.transform_children(self, data)
    }

    fn transform_type_parameter(&mut self, parameter: FirTypeParameter, data: D) -> FirTypeParameter {
        parameter.transform_children(self, data)
    }

    fn transform_simple_function(
        &mut self,
        function: Box<FirSimpleFunction>,
        data: D,
    ) -> Box<FirSimpleFunction> {
        function.transform_children(self, data)
    }

    fn transform_property(&mut self, property: Box<FirProperty>, data: D) -> Box<FirProperty> {
        property.transform_children(self, data)
    }

    fn transform_constructor(
        &mut self,
        constructor: Box<FirConstructor>,
        data: D,
    ) -> Box<FirConstructor> {
        constructor.transform_children(self, data)
    }

    fn transform_value_parameter(
        &mut self,
        parameter: FirValueParameter,
        data: D,
    ) -> FirValueParameter {
        parameter.transform_children(self, data)
    }

    // === Type refs and references ===

    fn transform_type_ref(&mut self, type_ref: FirTypeRef, data: D) -> FirTypeRef {
        type_ref.transform_children(self, data)
    }

    fn transform_reference(&mut self, reference: FirReference, data: D) -> FirReference {
        let _ = data;
        reference
    }

    // === Statements ===

    fn transform_while_loop(&mut self, r#loop: Box<FirWhileLoop>, data: D) -> FirStatement {
        FirStatement::WhileLoop(r#loop.transform_children(self, data))
    }

    fn transform_do_while_loop(&mut self, r#loop: Box<FirDoWhileLoop>, data: D) -> FirStatement {
        FirStatement::DoWhileLoop(r#loop.transform_children(self, data))
    }

    fn transform_variable_assignment(
        &mut self,
        assignment: Box<FirVariableAssignment>,
        data: D,
    ) -> FirStatement {
        FirStatement::VariableAssignment(assignment.transform_children(self, data))
    }

    // === Expressions ===

    fn transform_block(&mut self, block: FirBlock, data: D) -> FirBlock {
        block.transform_children(self, data)
    }

    fn transform_const_expression(
        &mut self,
        expression: Box<FirConstExpression>,
        data: D,
    ) -> FirExpression {
        FirExpression::Const(expression.transform_children(self, data))
    }

    fn transform_qualified_access_expression(
        &mut self,
        expression: Box<FirQualifiedAccessExpression>,
        data: D,
    ) -> FirExpression {
        FirExpression::QualifiedAccess(expression.transform_children(self, data))
    }

    fn transform_function_call(&mut self, call: Box<FirFunctionCall>, data: D) -> FirExpression {
        FirExpression::FunctionCall(call.transform_children(self, data))
    }

    fn transform_when_expression(
        &mut self,
        expression: Box<FirWhenExpression>,
        data: D,
    ) -> FirExpression {
        FirExpression::When(expression.transform_children(self, data))
    }

    fn transform_when_branch(&mut self, branch: FirWhenBranch, data: D) -> FirWhenBranch {
        branch.transform_children(self, data)
    }

    fn transform_when_subject_expression(
        &mut self,
        expression: Box<FirWhenSubjectExpression>,
        data: D,
    ) -> FirExpression {
        FirExpression::WhenSubject(expression.transform_children(self, data))
    }

    fn transform_else_if_true_condition(
        &mut self,
        condition: Box<FirElseIfTrueCondition>,
        data: D,
    ) -> FirExpression {
        FirExpression::ElseIfTrueCondition(condition.transform_children(self, data))
    }

    fn transform_try_expression(
        &mut self,
        expression: Box<FirTryExpression>,
        data: D,
    ) -> FirExpression {
        FirExpression::Try(expression.transform_children(self, data))
    }

    fn transform_catch(&mut self, catch: FirCatch, data: D) -> FirCatch {
        catch.transform_children(self, data)
    }

    fn transform_loop_jump(&mut self, jump: Box<FirLoopJump>, data: D) -> FirExpression {
        FirExpression::LoopJump(jump.transform_children(self, data))
    }

    fn transform_return_expression(
        &mut self,
        expression: Box<FirReturnExpression>,
        data: D,
    ) -> FirExpression {
        FirExpression::Return(expression.transform_children(self, data))
    }

    fn transform_throw_expression(
        &mut self,
        expression: Box<FirThrowExpression>,
        data: D,
    ) -> FirExpression {
        FirExpression::Throw(expression.transform_children(self, data))
    }

    fn transform_anonymous_function(
        &mut self,
        function: Box<FirAnonymousFunction>,
        data: D,
    ) -> FirExpression {
        FirExpression::AnonymousFunction(function.transform_children(self, data))
    }

    fn transform_this_receiver_expression(
        &mut self,
        expression: Box<FirThisReceiverExpression>,
        data: D,
    ) -> FirExpression {
        FirExpression::ThisReceiver(expression.transform_children(self, data))
    }

    fn transform_operator_call(&mut self, call: Box<FirOperatorCall>, data: D) -> FirExpression {
        FirExpression::OperatorCall(call.transform_children(self, data))
    }

    fn transform_type_operator_call(
        &mut self,
        call: Box<FirTypeOperatorCall>,
        data: D,
    ) -> FirExpression {
        FirExpression::TypeOperatorCall(call.transform_children(self, data))
    }

    fn transform_binary_logic_expression(
        &mut self,
        expression: Box<FirBinaryLogicExpression>,
        data: D,
    ) -> FirExpression {
        FirExpression::BinaryLogic(expression.transform_children(self, data))
    }
}

impl FirTypeRef {
    /// Rewrite nested type refs: type arguments, function type parts, delegate.
    #[must_use]
    pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        self,
        transformer: &mut T,
        data: D,
    ) -> FirTypeRef {
        match self {
            FirTypeRef::User(mut user) => {
                for part in &mut user.qualifier {
                    transform_inplace(&mut part.type_arguments, |argument| match argument {
                        FirTypeProjection::Type { variance, type_ref } => FirTypeProjection::Type {
                            variance,
                            type_ref: transformer.transform_type_ref(type_ref, data.clone()),
                        },
                        FirTypeProjection::Star => FirTypeProjection::Star,
                    });
                }
                FirTypeRef::User(user)
            }
            FirTypeRef::Function(mut function) => {
                function.receiver = function
                    .receiver
                    .map(|r| Box::new(transformer.transform_type_ref(*r, data.clone())));
                transform_inplace(&mut function.parameters, |p| {
                    transformer.transform_type_ref(p, data.clone())
                });
                function.return_type =
                    Box::new(transformer.transform_type_ref(*function.return_type, data));
                FirTypeRef::Function(function)
            }
            FirTypeRef::Delegated(inner) => {
                FirTypeRef::Delegated(Box::new(transformer.transform_type_ref(*inner, data)))
            }
            other @ (FirTypeRef::Implicit
            | FirTypeRef::Resolved(_)
            | FirTypeRef::ImplicitBuiltin(_)
            | FirTypeRef::Dynamic { .. }) => other,
        }
    }
}

#[cfg(test)]
mod tests;
