//! Read-only traversal.
//!
//! # Design
//!
//! Every node's `accept` double-dispatches to its own `visit_*` method. The
//! default of each `visit_*` method forwards to `visit_element` with a
//! borrowed `FirElementRef`, so a visitor that only cares about a handful of
//! kinds overrides those plus `visit_element`, and recurses with
//! `FirElementRef::accept_children`:
//!
//! ```text
//! struct CountCalls(usize);
//!
//! impl FirVisitor<()> for CountCalls {
//!     type Output = ();
//!
//!     fn visit_element(&mut self, element: FirElementRef<'_>, data: ()) {
//!         element.accept_children(self, data);
//!     }
//!
//!     fn visit_function_call(&mut self, call: &FirFunctionCall, data: ()) {
//!         self.0 += 1;
//!         call.accept_children(self, data);
//!     }
//! }
//! ```
//!
//! Children are visited in declared field order. Named members of files and
//! classes are only `DeclId`s here; `visit_member` is where a visitor with
//! access to the declaration table descends into them.

use crate::nodes::{
    FirAnonymousFunction, FirBinaryLogicExpression, FirBlock, FirCatch, FirConstExpression,
    FirConstructor, FirDoWhileLoop, FirElseIfTrueCondition, FirFile, FirFunctionCall, FirImport,
    FirLoopJump, FirOperatorCall, FirProperty, FirQualifiedAccessExpression, FirRegularClass,
    FirReturnExpression, FirSimpleFunction, FirThisReceiverExpression, FirThrowExpression,
    FirTryExpression, FirTypeOperatorCall, FirTypeParameter, FirValueParameter,
    FirVariableAssignment, FirWhenBranch, FirWhenExpression, FirWhenSubjectExpression,
    FirWhileLoop,
};
use crate::{DeclId, ElementKind, FirReference, FirTypeProjection, FirTypeRef};

/// A borrowed element of any kind.
#[derive(Copy, Clone, Debug)]
pub enum FirElementRef<'a> {
    File(&'a FirFile),
    Import(&'a FirImport),
    RegularClass(&'a FirRegularClass),
    TypeParameter(&'a FirTypeParameter),
    SimpleFunction(&'a FirSimpleFunction),
    Property(&'a FirProperty),
    Constructor(&'a FirConstructor),
    ValueParameter(&'a FirValueParameter),
    TypeRef(&'a FirTypeRef),
    Reference(&'a FirReference),
    ConstExpression(&'a FirConstExpression),
    QualifiedAccessExpression(&'a FirQualifiedAccessExpression),
    FunctionCall(&'a FirFunctionCall),
    Block(&'a FirBlock),
    WhenExpression(&'a FirWhenExpression),
    WhenBranch(&'a FirWhenBranch),
    WhenSubjectExpression(&'a FirWhenSubjectExpression),
    ElseIfTrueCondition(&'a FirElseIfTrueCondition),
    TryExpression(&'a FirTryExpression),
    Catch(&'a FirCatch),
    WhileLoop(&'a FirWhileLoop),
    DoWhileLoop(&'a FirDoWhileLoop),
    LoopJump(&'a FirLoopJump),
    ReturnExpression(&'a FirReturnExpression),
    ThrowExpression(&'a FirThrowExpression),
    AnonymousFunction(&'a FirAnonymousFunction),
    ThisReceiverExpression(&'a FirThisReceiverExpression),
    OperatorCall(&'a FirOperatorCall),
    TypeOperatorCall(&'a FirTypeOperatorCall),
    BinaryLogicExpression(&'a FirBinaryLogicExpression),
    VariableAssignment(&'a FirVariableAssignment),
    NoReceiver,
}

impl FirElementRef<'_> {
    pub fn kind(&self) -> ElementKind {
        match self {
            FirElementRef::File(_) => ElementKind::File,
            FirElementRef::Import(_) => ElementKind::Import,
            FirElementRef::RegularClass(_) => ElementKind::RegularClass,
            FirElementRef::TypeParameter(_) => ElementKind::TypeParameter,
            FirElementRef::SimpleFunction(_) => ElementKind::SimpleFunction,
            FirElementRef::Property(_) => ElementKind::Property,
            FirElementRef::Constructor(_) => ElementKind::Constructor,
            FirElementRef::ValueParameter(_) => ElementKind::ValueParameter,
            FirElementRef::TypeRef(_) => ElementKind::TypeRef,
            FirElementRef::Reference(_) => ElementKind::Reference,
            FirElementRef::ConstExpression(_) => ElementKind::ConstExpression,
            FirElementRef::QualifiedAccessExpression(_) => ElementKind::QualifiedAccessExpression,
            FirElementRef::FunctionCall(_) => ElementKind::FunctionCall,
            FirElementRef::Block(_) => ElementKind::Block,
            FirElementRef::WhenExpression(_) => ElementKind::WhenExpression,
            FirElementRef::WhenBranch(_) => ElementKind::WhenBranch,
            FirElementRef::WhenSubjectExpression(_) => ElementKind::WhenSubjectExpression,
            FirElementRef::ElseIfTrueCondition(_) => ElementKind::ElseIfTrueCondition,
            FirElementRef::TryExpression(_) => ElementKind::TryExpression,
            FirElementRef::Catch(_) => ElementKind::Catch,
            FirElementRef::WhileLoop(_) => ElementKind::WhileLoop,
            FirElementRef::DoWhileLoop(_) => ElementKind::DoWhileLoop,
            FirElementRef::LoopJump(_) => ElementKind::LoopJump,
            FirElementRef::ReturnExpression(_) => ElementKind::ReturnExpression,
            FirElementRef::ThrowExpression(_) => ElementKind::ThrowExpression,
            FirElementRef::AnonymousFunction(_) => ElementKind::AnonymousFunction,
            FirElementRef::ThisReceiverExpression(_) => ElementKind::ThisReceiverExpression,
            FirElementRef::OperatorCall(_) => ElementKind::OperatorCall,
            FirElementRef::TypeOperatorCall(_) => ElementKind::TypeOperatorCall,
            FirElementRef::BinaryLogicExpression(_) => ElementKind::BinaryLogicExpression,
            FirElementRef::VariableAssignment(_) => ElementKind::VariableAssignment,
            FirElementRef::NoReceiver => ElementKind::NoReceiver,
        }
    }

    /// Visit this element's children in declared field order.
    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        match self {
            FirElementRef::File(e) => e.accept_children(visitor, data),
            FirElementRef::Import(_) | FirElementRef::NoReceiver => {}
            FirElementRef::RegularClass(e) => e.accept_children(visitor, data),
            FirElementRef::TypeParameter(e) => e.accept_children(visitor, data),
            FirElementRef::SimpleFunction(e) => e.accept_children(visitor, data),
            FirElementRef::Property(e) => e.accept_children(visitor, data),
            FirElementRef::Constructor(e) => e.accept_children(visitor, data),
            FirElementRef::ValueParameter(e) => e.accept_children(visitor, data),
            FirElementRef::TypeRef(e) => e.accept_children(visitor, data),
            FirElementRef::Reference(_) => {}
            FirElementRef::ConstExpression(e) => e.accept_children(visitor, data),
            FirElementRef::QualifiedAccessExpression(e) => e.accept_children(visitor, data),
            FirElementRef::FunctionCall(e) => e.accept_children(visitor, data),
            FirElementRef::Block(e) => e.accept_children(visitor, data),
            FirElementRef::WhenExpression(e) => e.accept_children(visitor, data),
            FirElementRef::WhenBranch(e) => e.accept_children(visitor, data),
            FirElementRef::WhenSubjectExpression(e) => e.accept_children(visitor, data),
            FirElementRef::ElseIfTrueCondition(e) => e.accept_children(visitor, data),
            FirElementRef::TryExpression(e) => e.accept_children(visitor, data),
            FirElementRef::Catch(e) => e.accept_children(visitor, data),
            FirElementRef::WhileLoop(e) => e.accept_children(visitor, data),
            FirElementRef::DoWhileLoop(e) => e.accept_children(visitor, data),
            FirElementRef::LoopJump(e) => e.accept_children(visitor, data),
            FirElementRef::ReturnExpression(e) => e.accept_children(visitor, data),
            FirElementRef::ThrowExpression(e) => e.accept_children(visitor, data),
            FirElementRef::AnonymousFunction(e) => e.accept_children(visitor, data),
            FirElementRef::ThisReceiverExpression(e) => e.accept_children(visitor, data),
            FirElementRef::OperatorCall(e) => e.accept_children(visitor, data),
            FirElementRef::TypeOperatorCall(e) => e.accept_children(visitor, data),
            FirElementRef::BinaryLogicExpression(e) => e.accept_children(visitor, data),
            FirElementRef::VariableAssignment(e) => e.accept_children(visitor, data),
        }
    }
}

/// Read-only visitor over the tree.
///
/// `D` is passed down by value to every call; visitors that need no data use
/// `()`.
pub trait FirVisitor<D> {
    type Output;

    /// Fallback for every kind whose `visit_*` method is not overridden.
    fn visit_element(&mut self, element: FirElementRef<'_>, data: D) -> Self::Output;

    /// A named member of a file or class, by table id. No-op by default.
    fn visit_member(&mut self, member: DeclId, data: D) {
        let _ = (member, data);
    }

    fn visit_file(&mut self, file: &FirFile, data: D) -> Self::Output {
        self.visit_element(FirElementRef::File(file), data)
    }

    fn visit_import(&mut self, import: &FirImport, data: D) -> Self::Output {
        self.visit_element(FirElementRef::Import(import), data)
    }

    fn visit_regular_class(&mut self, class: &FirRegularClass, data: D) -> Self::Output {
        self.visit_element(FirElementRef::RegularClass(class), data)
    }

    fn visit_type_parameter(&mut self, parameter: &FirTypeParameter, data: D) -> Self::Output {
        self.visit_element(FirElementRef::TypeParameter(parameter), data)
    }

    fn visit_simple_function(&mut self, function: &FirSimpleFunction, data: D) -> Self::Output {
        self.visit_element(FirElementRef::SimpleFunction(function), data)
    }

    fn visit_property(&mut self, property: &FirProperty, data: D) -> Self::Output {
        self.visit_element(FirElementRef::Property(property), data)
    }

    fn visit_constructor(&mut self, constructor: &FirConstructor, data: D) -> Self::Output {
        self.visit_element(FirElementRef::Constructor(constructor), data)
    }

    fn visit_value_parameter(&mut self, parameter: &FirValueParameter, data: D) -> Self::Output {
        self.visit_element(FirElementRef::ValueParameter(parameter), data)
    }

    fn visit_type_ref(&mut self, type_ref: &FirTypeRef, data: D) -> Self::Output {
        self.visit_element(FirElementRef::TypeRef(type_ref), data)
    }

    fn visit_reference(&mut self, reference: &FirReference, data: D) -> Self::Output {
        self.visit_element(FirElementRef::Reference(reference), data)
    }

    fn visit_const_expression(&mut self, expression: &FirConstExpression, data: D) -> Self::Output {
        self.visit_element(FirElementRef::ConstExpression(expression), data)
    }

    fn visit_qualified_access_expression(
        &mut self,
        expression: &FirQualifiedAccessExpression,
        data: D,
    ) -> Self::Output {
        self.visit_element(FirElementRef::QualifiedAccessExpression(expression), data)
    }

    fn visit_function_call(&mut self, call: &FirFunctionCall, data: D) -> Self::Output {
        self.visit_element(FirElementRef::FunctionCall(call), data)
    }

    fn visit_block(&mut self, block: &FirBlock, data: D) -> Self::Output {
        self.visit_element(FirElementRef::Block(block), data)
    }

    fn visit_when_expression(&mut self, expression: &FirWhenExpression, data: D) -> Self::Output {
        self.visit_element(FirElementRef::WhenExpression(expression), data)
    }

    fn visit_when_branch(&mut self, branch: &FirWhenBranch, data: D) -> Self::Output {
        self.visit_element(FirElementRef::WhenBranch(branch), data)
    }

    fn visit_when_subject_expression(
        &mut self,
        expression: &FirWhenSubjectExpression,
        data: D,
    ) -> Self::Output {
        self.visit_element(FirElementRef::WhenSubjectExpression(expression), data)
    }

    fn visit_else_if_true_condition(
        &mut self,
        condition: &FirElseIfTrueCondition,
        data: D,
    ) -> Self::Output {
        self.visit_element(FirElementRef::ElseIfTrueCondition(condition), data)
    }

    fn visit_try_expression(&mut self, expression: &FirTryExpression, data: D) -> Self::Output {
        self.visit_element(FirElementRef::TryExpression(expression), data)
    }

    fn visit_catch(&mut self, catch: &FirCatch, data: D) -> Self::Output {
        self.visit_element(FirElementRef::Catch(catch), data)
    }

    fn visit_while_loop(&mut self, r#loop: &FirWhileLoop, data: D) -> Self::Output {
        self.visit_element(FirElementRef::WhileLoop(r#loop), data)
    }

    fn visit_do_while_loop(&mut self, r#loop: &FirDoWhileLoop, data: D) -> Self::Output {
        self.visit_element(FirElementRef::DoWhileLoop(r#loop), data)
    }

    fn visit_loop_jump(&mut self, jump: &FirLoopJump, data: D) -> Self::Output {
        self.visit_element(FirElementRef::LoopJump(jump), data)
    }

    fn visit_return_expression(&mut self, expression: &FirReturnExpression, data: D) -> Self::Output {
        self.visit_element(FirElementRef::ReturnExpression(expression), data)
    }

    fn visit_throw_expression(&mut self, expression: &FirThrowExpression, data: D) -> Self::Output {
        self.visit_element(FirElementRef::ThrowExpression(expression), data)
    }

    fn visit_anonymous_function(
        &mut self,
        function: &FirAnonymousFunction,
        data: D,
    ) -> Self::Output {
        self.visit_element(FirElementRef::AnonymousFunction(function), data)
    }

    fn visit_this_receiver_expression(
        &mut self,
        expression: &FirThisReceiverExpression,
        data: D,
    ) -> Self::Output {
        self.visit_element(FirElementRef::ThisReceiverExpression(expression), data)
    }

    fn visit_operator_call(&mut self, call: &FirOperatorCall, data: D) -> Self::Output {
        self.visit_element(FirElementRef::OperatorCall(call), data)
    }

    fn visit_type_operator_call(&mut self, call: &FirTypeOperatorCall, data: D) -> Self::Output {
        self.visit_element(FirElementRef::TypeOperatorCall(call), data)
    }

    fn visit_binary_logic_expression(
        &mut self,
        expression: &FirBinaryLogicExpression,
        data: D,
    ) -> Self::Output {
        self.visit_element(FirElementRef::BinaryLogicExpression(expression), data)
    }

    fn visit_variable_assignment(
        &mut self,
        assignment: &FirVariableAssignment,
        data: D,
    ) -> Self::Output {
        self.visit_element(FirElementRef::VariableAssignment(assignment), data)
    }

    fn visit_no_receiver(&mut self, data: D) -> Self::Output {
        self.visit_element(FirElementRef::NoReceiver, data)
    }
}

// === Non-node elements ===

impl FirTypeRef {
    pub fn accept<V, D>(&self, visitor: &mut V, data: D) -> V::Output
    where
        V: FirVisitor<D> + ?Sized,
    {
        visitor.visit_type_ref(self, data)
    }

    /// Nested type refs: type arguments, function type parts, delegate.
    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        match self {
            FirTypeRef::User(user) => {
                for part in &user.qualifier {
                    for argument in &part.type_arguments {
                        if let FirTypeProjection::Type { type_ref, .. } = argument {
                            type_ref.accept(visitor, data.clone());
                        }
                    }
                }
            }
            FirTypeRef::Function(function) => {
                if let Some(receiver) = &function.receiver {
                    receiver.accept(visitor, data.clone());
                }
                for parameter in &function.parameters {
                    parameter.accept(visitor, data.clone());
                }
                function.return_type.accept(visitor, data);
            }
            FirTypeRef::Delegated(inner) => {
                inner.accept(visitor, data);
            }
            FirTypeRef::Implicit
            | FirTypeRef::Resolved(_)
            | FirTypeRef::ImplicitBuiltin(_)
            | FirTypeRef::Dynamic { .. } => {}
        }
    }
}

impl FirReference {
    pub fn accept<V, D>(&self, visitor: &mut V, data: D) -> V::Output
    where
        V: FirVisitor<D> + ?Sized,
    {
        visitor.visit_reference(self, data)
    }
}

#[cfg(test)]
mod tests;
