//! Tree nodes.
//!
//! # Design
//!
//! Each leaf element kind is one struct holding the union of the fields it
//! inherits from its parent kinds plus its own. The overlapping categories
//! (statement, expression, declaration) are closed sum types whose variants
//! box those structs:
//!
//! ```text
//! FirStatement ──┬─ Expression(FirExpression) ─┬─ When, Try, Block, ...
//!                │                             └─ AnonymousFunction   (also a declaration)
//!                ├─ WhileLoop / DoWhileLoop
//!                ├─ VariableAssignment
//!                └─ Property (local variable)  (also a declaration)
//! FirDeclaration ─ File | RegularClass | SimpleFunction | Property | Constructor
//! ```
//!
//! Ownership is strictly top-down. Named declarations inside files and
//! classes are referred to by `DeclId` and live in the session's declaration
//! table; everything inside a body is owned inline.
//!
//! Fields are private. Readers use getters; the few fields passes may rewrite
//! are exposed through `replace_*` methods, and children are rewritten only
//! through `transform_children` or the per-field `transform_*` hooks.

mod control_flow;
mod declarations;
mod expressions;

pub use control_flow::{
    FirCatch, FirDoWhileLoop, FirElseIfTrueCondition, FirLoopJump, FirReturnExpression,
    FirThrowExpression, FirTryExpression, FirWhenBranch, FirWhenExpression,
    FirWhenSubjectExpression, FirWhileLoop, LoopJumpKind,
};
pub use declarations::{
    ClassKind, DeclarationFlags, DeclarationOrigin, FirConstructor, FirDeclaration,
    FirDeclarationStatus, FirFile, FirImport, FirProperty, FirRegularClass, FirResolvedImport,
    FirSimpleFunction, FirTypeParameter, FirValueParameter, Modality, Visibility,
};
pub use expressions::{
    ConstValue, FirAnonymousFunction, FirBinaryLogicExpression, FirBlock, FirConstExpression,
    FirFunctionCall, FirOperatorCall, FirQualifiedAccessExpression, FirThisReceiverExpression,
    FirTypeOperatorCall, FirVariableAssignment, LogicOperation, Operation, TypeOperation,
};

use crate::{FirTransformer, FirTypeRef, FirVisitor};

/// Generates read-only accessors.
///
/// `val name: T` yields `&T`, `opt name: T` yields `Option<&T>`, `list name: T`
/// yields `&[T]`, `copy name: T` yields `T`.
macro_rules! getters {
    ($ty:ident { $($kind:ident $field:ident : $fty:ty),* $(,)? }) => {
        impl $ty {
            $( getters!(@one $kind $field : $fty); )*
        }
    };
    (@one val $field:ident : $fty:ty) => {
        #[inline]
        pub fn $field(&self) -> &$fty {
            &self.$field
        }
    };
    (@one opt $field:ident : $fty:ty) => {
        #[inline]
        pub fn $field(&self) -> Option<&$fty> {
            self.$field.as_ref()
        }
    };
    (@one list $field:ident : $fty:ty) => {
        #[inline]
        pub fn $field(&self) -> &[$fty] {
            &self.$field
        }
    };
    (@one copy $field:ident : $fty:ty) => {
        #[inline]
        pub fn $field(&self) -> $fty {
            self.$field
        }
    };
}

/// Generates `accept`, double-dispatching to one `FirVisitor` method.
macro_rules! impl_accept {
    ($ty:ident => $visit:ident) => {
        impl $ty {
            pub fn accept<V, D>(&self, visitor: &mut V, data: D) -> V::Output
            where
                V: $crate::FirVisitor<D> + ?Sized,
            {
                visitor.$visit(self, data)
            }
        }
    };
}

pub(crate) use getters;
pub(crate) use impl_accept;

/// Rewrite every element of `list`, keeping its position.
///
/// The backing allocation is reused: the list is rewritten in place rather
/// than rebuilt.
pub fn transform_inplace<T>(list: &mut Vec<T>, f: impl FnMut(T) -> T) {
    let items = std::mem::take(list);
    *list = items.into_iter().map(f).collect();
}

/// Rewrite a single owned slot.
pub(crate) fn transform_slot<T: Default>(slot: &mut T, f: impl FnOnce(T) -> T) {
    let old = std::mem::take(slot);
    *slot = f(old);
}

/// Rewrite an optional slot.
pub(crate) fn transform_opt<T>(slot: &mut Option<T>, f: impl FnOnce(T) -> T) {
    if let Some(old) = slot.take() {
        *slot = Some(f(old));
    }
}

/// Every expression kind.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum FirExpression {
    Const(Box<FirConstExpression>),
    QualifiedAccess(Box<FirQualifiedAccessExpression>),
    FunctionCall(Box<FirFunctionCall>),
    Block(Box<FirBlock>),
    When(Box<FirWhenExpression>),
    WhenSubject(Box<FirWhenSubjectExpression>),
    ElseIfTrueCondition(Box<FirElseIfTrueCondition>),
    Try(Box<FirTryExpression>),
    LoopJump(Box<FirLoopJump>),
    Return(Box<FirReturnExpression>),
    Throw(Box<FirThrowExpression>),
    AnonymousFunction(Box<FirAnonymousFunction>),
    ThisReceiver(Box<FirThisReceiverExpression>),
    OperatorCall(Box<FirOperatorCall>),
    TypeOperatorCall(Box<FirTypeOperatorCall>),
    BinaryLogic(Box<FirBinaryLogicExpression>),
    /// Absent receiver; also the placeholder left behind while a slot is
    /// being transformed.
    #[default]
    NoReceiver,
}

impl FirExpression {
    /// The expression's type reference; `Implicit` until resolved.
    pub fn type_ref(&self) -> &FirTypeRef {
        const IMPLICIT: &FirTypeRef = &FirTypeRef::Implicit;
        match self {
            FirExpression::Const(e) => e.type_ref(),
            FirExpression::QualifiedAccess(e) => e.type_ref(),
            FirExpression::FunctionCall(e) => e.type_ref(),
            FirExpression::Block(e) => e.type_ref(),
            FirExpression::When(e) => e.type_ref(),
            FirExpression::WhenSubject(e) => e.type_ref(),
            FirExpression::ElseIfTrueCondition(e) => e.type_ref(),
            FirExpression::Try(e) => e.type_ref(),
            FirExpression::LoopJump(e) => e.type_ref(),
            FirExpression::Return(e) => e.type_ref(),
            FirExpression::Throw(e) => e.type_ref(),
            FirExpression::AnonymousFunction(e) => e.type_ref(),
            FirExpression::ThisReceiver(e) => e.type_ref(),
            FirExpression::OperatorCall(e) => e.type_ref(),
            FirExpression::TypeOperatorCall(e) => e.type_ref(),
            FirExpression::BinaryLogic(e) => e.type_ref(),
            FirExpression::NoReceiver => IMPLICIT,
        }
    }

    pub fn replace_type_ref(&mut self, type_ref: FirTypeRef) {
        match self {
            FirExpression::Const(e) => e.replace_type_ref(type_ref),
            FirExpression::QualifiedAccess(e) => e.replace_type_ref(type_ref),
            FirExpression::FunctionCall(e) => e.replace_type_ref(type_ref),
            FirExpression::Block(e) => e.replace_type_ref(type_ref),
            FirExpression::When(e) => e.replace_type_ref(type_ref),
            FirExpression::WhenSubject(e) => e.replace_type_ref(type_ref),
            FirExpression::ElseIfTrueCondition(e) => e.replace_type_ref(type_ref),
            FirExpression::Try(e) => e.replace_type_ref(type_ref),
            FirExpression::LoopJump(e) => e.replace_type_ref(type_ref),
            FirExpression::Return(e) => e.replace_type_ref(type_ref),
            FirExpression::Throw(e) => e.replace_type_ref(type_ref),
            FirExpression::AnonymousFunction(e) => e.replace_type_ref(type_ref),
            FirExpression::ThisReceiver(e) => e.replace_type_ref(type_ref),
            FirExpression::OperatorCall(e) => e.replace_type_ref(type_ref),
            FirExpression::TypeOperatorCall(e) => e.replace_type_ref(type_ref),
            FirExpression::BinaryLogic(e) => e.replace_type_ref(type_ref),
            FirExpression::NoReceiver => {}
        }
    }

    #[inline]
    pub fn is_no_receiver(&self) -> bool {
        matches!(self, FirExpression::NoReceiver)
    }

    /// Dispatch to the transformer method for this kind.
    pub fn transform<D, T>(self, transformer: &mut T, data: D) -> FirExpression
    where
        D: Clone,
        T: FirTransformer<D> + ?Sized,
    {
        match self {
            FirExpression::Const(e) => transformer.transform_const_expression(e, data),
            FirExpression::QualifiedAccess(e) => {
                transformer.transform_qualified_access_expression(e, data)
            }
            FirExpression::FunctionCall(e) => transformer.transform_function_call(e, data),
            FirExpression::Block(e) => {
                FirExpression::Block(Box::new(transformer.transform_block(*e, data)))
            }
            FirExpression::When(e) => transformer.transform_when_expression(e, data),
            FirExpression::WhenSubject(e) => {
                transformer.transform_when_subject_expression(e, data)
            }
            FirExpression::ElseIfTrueCondition(e) => {
                transformer.transform_else_if_true_condition(e, data)
            }
            FirExpression::Try(e) => transformer.transform_try_expression(e, data),
            FirExpression::LoopJump(e) => transformer.transform_loop_jump(e, data),
            FirExpression::Return(e) => transformer.transform_return_expression(e, data),
            FirExpression::Throw(e) => transformer.transform_throw_expression(e, data),
            FirExpression::AnonymousFunction(e) => {
                transformer.transform_anonymous_function(e, data)
            }
            FirExpression::ThisReceiver(e) => {
                transformer.transform_this_receiver_expression(e, data)
            }
            FirExpression::OperatorCall(e) => transformer.transform_operator_call(e, data),
            FirExpression::TypeOperatorCall(e) => {
                transformer.transform_type_operator_call(e, data)
            }
            FirExpression::BinaryLogic(e) => {
                transformer.transform_binary_logic_expression(e, data)
            }
            FirExpression::NoReceiver => FirExpression::NoReceiver,
        }
    }

    pub fn accept<V, D>(&self, visitor: &mut V, data: D) -> V::Output
    where
        V: FirVisitor<D> + ?Sized,
    {
        match self {
            FirExpression::Const(e) => e.accept(visitor, data),
            FirExpression::QualifiedAccess(e) => e.accept(visitor, data),
            FirExpression::FunctionCall(e) => e.accept(visitor, data),
            FirExpression::Block(e) => e.accept(visitor, data),
            FirExpression::When(e) => e.accept(visitor, data),
            FirExpression::WhenSubject(e) => e.accept(visitor, data),
            FirExpression::ElseIfTrueCondition(e) => e.accept(visitor, data),
            FirExpression::Try(e) => e.accept(visitor, data),
            FirExpression::LoopJump(e) => e.accept(visitor, data),
            FirExpression::Return(e) => e.accept(visitor, data),
            FirExpression::Throw(e) => e.accept(visitor, data),
            FirExpression::AnonymousFunction(e) => e.accept(visitor, data),
            FirExpression::ThisReceiver(e) => e.accept(visitor, data),
            FirExpression::OperatorCall(e) => e.accept(visitor, data),
            FirExpression::TypeOperatorCall(e) => e.accept(visitor, data),
            FirExpression::BinaryLogic(e) => e.accept(visitor, data),
            FirExpression::NoReceiver => visitor.visit_no_receiver(data),
        }
    }
}

/// Every statement kind. Expressions are statements too.
#[derive(Clone, Debug, PartialEq)]
pub enum FirStatement {
    Expression(FirExpression),
    WhileLoop(Box<FirWhileLoop>),
    DoWhileLoop(Box<FirDoWhileLoop>),
    VariableAssignment(Box<FirVariableAssignment>),
    /// Local variable declaration.
    Property(Box<FirProperty>),
}

impl Default for FirStatement {
    fn default() -> Self {
        FirStatement::Expression(FirExpression::NoReceiver)
    }
}

impl FirStatement {
    pub fn as_expression(&self) -> Option<&FirExpression> {
        match self {
            FirStatement::Expression(e) => Some(e),
            _ => None,
        }
    }

    pub fn transform<D, T>(self, transformer: &mut T, data: D) -> FirStatement
    where
        D: Clone,
        T: FirTransformer<D> + ?Sized,
    {
        match self {
            FirStatement::Expression(e) => {
                FirStatement::Expression(transformer.transform_expression(e, data))
            }
            FirStatement::WhileLoop(s) => transformer.transform_while_loop(s, data),
            FirStatement::DoWhileLoop(s) => transformer.transform_do_while_loop(s, data),
            FirStatement::VariableAssignment(s) => {
                transformer.transform_variable_assignment(s, data)
            }
            FirStatement::Property(p) => {
                FirStatement::Property(transformer.transform_property(p, data))
            }
        }
    }

    pub fn accept<V, D>(&self, visitor: &mut V, data: D) -> V::Output
    where
        V: FirVisitor<D> + ?Sized,
    {
        match self {
            FirStatement::Expression(e) => e.accept(visitor, data),
            FirStatement::WhileLoop(s) => s.accept(visitor, data),
            FirStatement::DoWhileLoop(s) => s.accept(visitor, data),
            FirStatement::VariableAssignment(s) => s.accept(visitor, data),
            FirStatement::Property(p) => p.accept(visitor, data),
        }
    }
}

impl From<FirExpression> for FirStatement {
    fn from(expression: FirExpression) -> Self {
        FirStatement::Expression(expression)
    }
}
