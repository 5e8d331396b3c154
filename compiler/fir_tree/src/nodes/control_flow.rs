//! Control-flow nodes: `when`, `try`, loops and jumps.
//!
//! Child order is load-bearing here. A `when` visits its subject before its
//! branches; a `while` loop visits its condition before its block; a
//! `do-while` loop visits its block before its condition.

use super::{getters, impl_accept, transform_inplace, transform_opt, transform_slot};
use super::{FirBlock, FirExpression, FirProperty, FirValueParameter};
use crate::{FirReference, FirTransformer, FirTypeRef, FirVisitor, Name};

// === When ===

#[derive(Clone, Debug, PartialEq)]
pub struct FirWhenExpression {
    type_ref: FirTypeRef,
    callee_reference: FirReference,
    subject: Option<FirExpression>,
    subject_variable: Option<Box<FirProperty>>,
    branches: Vec<FirWhenBranch>,
    is_exhaustive: bool,
}

getters!(FirWhenExpression {
    val type_ref: FirTypeRef,
    val callee_reference: FirReference,
    opt subject: FirExpression,
    list branches: FirWhenBranch,
    copy is_exhaustive: bool,
});
impl_accept!(FirWhenExpression => visit_when_expression);

impl FirWhenExpression {
    pub fn new(subject: Option<FirExpression>, branches: Vec<FirWhenBranch>) -> Self {
        FirWhenExpression {
            type_ref: FirTypeRef::Implicit,
            callee_reference: FirReference::Stub,
            subject,
            subject_variable: None,
            branches,
            is_exhaustive: false,
        }
    }

    /// `when (val name = initializer) { ... }`.
    pub fn with_subject_variable(variable: FirProperty, branches: Vec<FirWhenBranch>) -> Self {
        FirWhenExpression {
            subject_variable: Some(Box::new(variable)),
            ..Self::new(None, branches)
        }
    }

    pub fn subject_variable(&self) -> Option<&FirProperty> {
        self.subject_variable.as_deref()
    }

    pub fn has_subject(&self) -> bool {
        self.subject.is_some() || self.subject_variable.is_some()
    }

    pub fn replace_type_ref(&mut self, type_ref: FirTypeRef) {
        self.type_ref = type_ref;
    }

    pub fn replace_callee_reference(&mut self, reference: FirReference) {
        self.callee_reference = reference;
    }

    pub fn replace_is_exhaustive(&mut self, is_exhaustive: bool) {
        self.is_exhaustive = is_exhaustive;
    }

    /// Subject expression and subject variable.
    pub fn transform_subject<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_opt(&mut self.subject, |e| {
            transformer.transform_expression(e, data.clone())
        });
        transform_opt(&mut self.subject_variable, |p| transformer.transform_property(p, data));
    }

    pub fn transform_branches<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_inplace(&mut self.branches, |b| {
            transformer.transform_when_branch(b, data.clone())
        });
    }

    /// Rewrite branches one at a time, each with its own context.
    pub fn map_branches(&mut self, mut f: impl FnMut(usize, FirWhenBranch) -> FirWhenBranch) {
        let mut index = 0;
        transform_inplace(&mut self.branches, |b| {
            let out = f(index, b);
            index += 1;
            out
        });
    }

    /// Callee reference and type reference.
    pub fn transform_other_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_slot(&mut self.callee_reference, |r| {
            transformer.transform_reference(r, data.clone())
        });
        transform_slot(&mut self.type_ref, |t| transformer.transform_type_ref(t, data));
    }

    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        if let Some(subject) = &self.subject {
            subject.accept(visitor, data.clone());
        }
        if let Some(variable) = &self.subject_variable {
            variable.accept(visitor, data.clone());
        }
        for branch in &self.branches {
            branch.accept(visitor, data.clone());
        }
        self.callee_reference.accept(visitor, data.clone());
        self.type_ref.accept(visitor, data);
    }

    #[must_use]
    pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        mut self: Box<Self>,
        transformer: &mut T,
        data: D,
    ) -> Box<Self> {
        self.transform_subject(transformer, data.clone());
        self.transform_branches(transformer, data.clone());
        self.transform_other_children(transformer, data);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct FirWhenBranch {
    condition: FirExpression,
    result: FirBlock,
}

getters!(FirWhenBranch { val condition: FirExpression, val result: FirBlock });
impl_accept!(FirWhenBranch => visit_when_branch);

impl FirWhenBranch {
    pub fn new(condition: FirExpression, result: FirBlock) -> Self {
        FirWhenBranch { condition, result }
    }

    /// An `else` branch: its condition is the always-true marker.
    pub fn is_else(&self) -> bool {
        matches!(self.condition, FirExpression::ElseIfTrueCondition(_))
    }

    pub fn transform_condition<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_slot(&mut self.condition, |e| transformer.transform_expression(e, data));
    }

    pub fn transform_result<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_slot(&mut self.result, |b| transformer.transform_block(b, data));
    }

    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        self.condition.accept(visitor, data.clone());
        self.result.accept(visitor, data);
    }

    #[must_use]
    pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        mut self,
        transformer: &mut T,
        data: D,
    ) -> Self {
        self.transform_condition(transformer, data.clone());
        self.transform_result(transformer, data);
        self
    }
}

/// The subject value as referenced from a branch condition.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FirWhenSubjectExpression {
    type_ref: FirTypeRef,
}

getters!(FirWhenSubjectExpression { val type_ref: FirTypeRef });
impl_accept!(FirWhenSubjectExpression => visit_when_subject_expression);

impl FirWhenSubjectExpression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_type_ref(&mut self, type_ref: FirTypeRef) {
        self.type_ref = type_ref;
    }

    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        self.type_ref.accept(visitor, data);
    }

    #[must_use]
    pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        mut self: Box<Self>,
        transformer: &mut T,
        data: D,
    ) -> Box<Self> {
        transform_slot(&mut self.type_ref, |t| transformer.transform_type_ref(t, data));
        self
    }
}

/// Condition of an `else` branch.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FirElseIfTrueCondition {
    type_ref: FirTypeRef,
}

getters!(FirElseIfTrueCondition { val type_ref: FirTypeRef });
impl_accept!(FirElseIfTrueCondition => visit_else_if_true_condition);

impl FirElseIfTrueCondition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_type_ref(&mut self, type_ref: FirTypeRef) {
        self.type_ref = type_ref;
    }

    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        self.type_ref.accept(visitor, data);
    }

    #[must_use]
    pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        mut self: Box<Self>,
        transformer: &mut T,
        data: D,
    ) -> Box<Self> {
        transform_slot(&mut self.type_ref, |t| transformer.transform_type_ref(t, data));
        self
    }
}

// === Try ===

#[derive(Clone, Debug, PartialEq)]
pub struct FirTryExpression {
    type_ref: FirTypeRef,
    callee_reference: FirReference,
    try_block: FirBlock,
    catches: Vec<FirCatch>,
    finally_block: Option<FirBlock>,
}

getters!(FirTryExpression {
    val type_ref: FirTypeRef,
    val callee_reference: FirReference,
    val try_block: FirBlock,
    list catches: FirCatch,
    opt finally_block: FirBlock,
});
impl_accept!(FirTryExpression => visit_try_expression);

impl FirTryExpression {
    pub fn new(try_block: FirBlock, catches: Vec<FirCatch>, finally_block: Option<FirBlock>) -> Self {
        FirTryExpression {
            type_ref: FirTypeRef::Implicit,
            callee_reference: FirReference::Stub,
            try_block,
            catches,
            finally_block,
        }
    }

    pub fn replace_type_ref(&mut self, type_ref: FirTypeRef) {
        self.type_ref = type_ref;
    }

    pub fn replace_callee_reference(&mut self, reference: FirReference) {
        self.callee_reference = reference;
    }

    pub fn transform_try_block<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_slot(&mut self.try_block, |b| transformer.transform_block(b, data));
    }

    pub fn transform_catches<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_inplace(&mut self.catches, |c| {
            transformer.transform_catch(c, data.clone())
        });
    }

    pub fn transform_finally_block<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_opt(&mut self.finally_block, |b| transformer.transform_block(b, data));
    }

    /// Callee reference and type reference.
    pub fn transform_other_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_slot(&mut self.callee_reference, |r| {
            transformer.transform_reference(r, data.clone())
        });
        transform_slot(&mut self.type_ref, |t| transformer.transform_type_ref(t, data));
    }

    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        self.try_block.accept(visitor, data.clone());
        for catch in &self.catches {
            catch.accept(visitor, data.clone());
        }
        if let Some(finally_block) = &self.finally_block {
            finally_block.accept(visitor, data.clone());
        }
        self.callee_reference.accept(visitor, data.clone());
        self.type_ref.accept(visitor, data);
    }

    #[must_use]
    pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        mut self: Box<Self>,
        transformer: &mut T,
        data: D,
    ) -> Box<Self> {
        self.transform_try_block(transformer, data.clone());
        self.transform_catches(transformer, data.clone());
        self.transform_finally_block(transformer, data.clone());
        self.transform_other_children(transformer, data);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FirCatch {
    parameter: FirValueParameter,
    block: FirBlock,
}

getters!(FirCatch { val parameter: FirValueParameter, val block: FirBlock });
impl_accept!(FirCatch => visit_catch);

impl FirCatch {
    pub fn new(parameter: FirValueParameter, block: FirBlock) -> Self {
        FirCatch { parameter, block }
    }

    pub fn transform_parameter<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_slot(&mut self.parameter, |p| {
            transformer.transform_value_parameter(p, data)
        });
    }

    pub fn transform_block<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_slot(&mut self.block, |b| transformer.transform_block(b, data));
    }

    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        self.parameter.accept(visitor, data.clone());
        self.block.accept(visitor, data);
    }

    #[must_use]
    pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        mut self,
        transformer: &mut T,
        data: D,
    ) -> Self {
        self.transform_parameter(transformer, data.clone());
        self.transform_block(transformer, data);
        self
    }
}

// === Loops ===

#[derive(Clone, Debug, PartialEq)]
pub struct FirWhileLoop {
    label: Option<Name>,
    condition: FirExpression,
    block: FirBlock,
}

getters!(FirWhileLoop { val condition: FirExpression, val block: FirBlock });
impl_accept!(FirWhileLoop => visit_while_loop);

impl FirWhileLoop {
    pub fn new(label: Option<Name>, condition: FirExpression, block: FirBlock) -> Self {
        FirWhileLoop {
            label,
            condition,
            block,
        }
    }

    pub fn label(&self) -> Option<Name> {
        self.label
    }

    pub fn transform_condition<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_slot(&mut self.condition, |e| transformer.transform_expression(e, data));
    }

    pub fn transform_block<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_slot(&mut self.block, |b| transformer.transform_block(b, data));
    }

    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        self.condition.accept(visitor, data.clone());
        self.block.accept(visitor, data);
    }

    #[must_use]
    pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        mut self: Box<Self>,
        transformer: &mut T,
        data: D,
    ) -> Box<Self> {
        self.transform_condition(transformer, data.clone());
        self.transform_block(transformer, data);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FirDoWhileLoop {
    label: Option<Name>,
    block: FirBlock,
    condition: FirExpression,
}

getters!(FirDoWhileLoop { val block: FirBlock, val condition: FirExpression });
impl_accept!(FirDoWhileLoop => visit_do_while_loop);

impl FirDoWhileLoop {
    pub fn new(label: Option<Name>, block: FirBlock, condition: FirExpression) -> Self {
        FirDoWhileLoop {
            label,
            block,
            condition,
        }
    }

    pub fn label(&self) -> Option<Name> {
        self.label
    }

    pub fn transform_block<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_slot(&mut self.block, |b| transformer.transform_block(b, data));
    }

    pub fn transform_condition<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_slot(&mut self.condition, |e| transformer.transform_expression(e, data));
    }

    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        self.block.accept(visitor, data.clone());
        self.condition.accept(visitor, data);
    }

    #[must_use]
    pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        mut self: Box<Self>,
        transformer: &mut T,
        data: D,
    ) -> Box<Self> {
        self.transform_block(transformer, data.clone());
        self.transform_condition(transformer, data);
        self
    }
}

// === Jumps ===

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LoopJumpKind {
    Break,
    Continue,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FirLoopJump {
    type_ref: FirTypeRef,
    kind: LoopJumpKind,
    target_label: Option<Name>,
}

getters!(FirLoopJump { val type_ref: FirTypeRef, copy kind: LoopJumpKind });
impl_accept!(FirLoopJump => visit_loop_jump);

impl FirLoopJump {
    pub fn new(kind: LoopJumpKind, target_label: Option<Name>) -> Self {
        FirLoopJump {
            type_ref: FirTypeRef::Implicit,
            kind,
            target_label,
        }
    }

    pub fn target_label(&self) -> Option<Name> {
        self.target_label
    }

    pub fn replace_type_ref(&mut self, type_ref: FirTypeRef) {
        self.type_ref = type_ref;
    }

    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        self.type_ref.accept(visitor, data);
    }

    #[must_use]
    pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        mut self: Box<Self>,
        transformer: &mut T,
        data: D,
    ) -> Box<Self> {
        transform_slot(&mut self.type_ref, |t| transformer.transform_type_ref(t, data));
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FirReturnExpression {
    type_ref: FirTypeRef,
    result: FirExpression,
    target_label: Option<Name>,
}

getters!(FirReturnExpression { val type_ref: FirTypeRef, val result: FirExpression });
impl_accept!(FirReturnExpression => visit_return_expression);

impl FirReturnExpression {
    /// `result` is `NoReceiver` for a bare `return`.
    pub fn new(result: FirExpression, target_label: Option<Name>) -> Self {
        FirReturnExpression {
            type_ref: FirTypeRef::Implicit,
            result,
            target_label,
        }
    }

    pub fn target_label(&self) -> Option<Name> {
        self.target_label
    }

    pub fn replace_type_ref(&mut self, type_ref: FirTypeRef) {
        self.type_ref = type_ref;
    }

    pub fn transform_result<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_slot(&mut self.result, |e| transformer.transform_expression(e, data));
    }

    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        self.result.accept(visitor, data.clone());
        self.type_ref.accept(visitor, data);
    }

    #[must_use]
    pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        mut self: Box<Self>,
        transformer: &mut T,
        data: D,
    ) -> Box<Self> {
        self.transform_result(transformer, data.clone());
        transform_slot(&mut self.type_ref, |t| transformer.transform_type_ref(t, data));
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FirThrowExpression {
    type_ref: FirTypeRef,
    exception: FirExpression,
}

getters!(FirThrowExpression { val type_ref: FirTypeRef, val exception: FirExpression });
impl_accept!(FirThrowExpression => visit_throw_expression);

impl FirThrowExpression {
    pub fn new(exception: FirExpression) -> Self {
        FirThrowExpression {
            type_ref: FirTypeRef::Implicit,
            exception,
        }
    }

    pub fn replace_type_ref(&mut self, type_ref: FirTypeRef) {
        self.type_ref = type_ref;
    }

    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        self.exception.accept(visitor, data.clone());
        self.type_ref.accept(visitor, data);
    }

    #[must_use]
    pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        mut self: Box<Self>,
        transformer: &mut T,
        data: D,
    ) -> Box<Self> {
        transform_slot(&mut self.exception, |e| {
            transformer.transform_expression(e, data.clone())
        });
        transform_slot(&mut self.type_ref, |t| transformer.transform_type_ref(t, data));
        self
    }
}
