//! Expression nodes that are not control flow.

use super::{getters, impl_accept, transform_inplace, transform_opt, transform_slot};
use super::{FirExpression, FirStatement, FirValueParameter};
use crate::{FirReference, FirTransformer, FirTypeRef, FirVisitor, Name};

// === Constants ===

#[derive(Clone, Debug, PartialEq)]
pub enum ConstValue {
    Null,
    Boolean(bool),
    Char(char),
    Int(i64),
    Long(i64),
    Double(f64),
    String(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FirConstExpression {
    type_ref: FirTypeRef,
    value: ConstValue,
}

getters!(FirConstExpression { val type_ref: FirTypeRef, val value: ConstValue });
impl_accept!(FirConstExpression => visit_const_expression);

impl FirConstExpression {
    pub fn new(value: ConstValue) -> Self {
        FirConstExpression {
            type_ref: FirTypeRef::Implicit,
            value,
        }
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

// === Accesses and calls ===

/// `receiver.name`, `name`, or `receiver?.name`.
#[derive(Clone, Debug, PartialEq)]
pub struct FirQualifiedAccessExpression {
    type_ref: FirTypeRef,
    explicit_receiver: FirExpression,
    callee_reference: FirReference,
    safe: bool,
}

getters!(FirQualifiedAccessExpression {
    val type_ref: FirTypeRef,
    val explicit_receiver: FirExpression,
    val callee_reference: FirReference,
    copy safe: bool,
});
impl_accept!(FirQualifiedAccessExpression => visit_qualified_access_expression);

impl FirQualifiedAccessExpression {
    pub fn new(explicit_receiver: FirExpression, name: Name, safe: bool) -> Self {
        FirQualifiedAccessExpression {
            type_ref: FirTypeRef::Implicit,
            explicit_receiver,
            callee_reference: FirReference::Simple(name),
            safe,
        }
    }

    pub fn replace_type_ref(&mut self, type_ref: FirTypeRef) {
        self.type_ref = type_ref;
    }

    pub fn replace_callee_reference(&mut self, reference: FirReference) {
        self.callee_reference = reference;
    }

    pub fn transform_explicit_receiver<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_slot(&mut self.explicit_receiver, |e| {
            transformer.transform_expression(e, data)
        });
    }

    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        self.explicit_receiver.accept(visitor, data.clone());
        self.callee_reference.accept(visitor, data.clone());
        self.type_ref.accept(visitor, data);
    }

    #[must_use]
    pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        mut self: Box<Self>,
        transformer: &mut T,
        data: D,
    ) -> Box<Self> {
        self.transform_explicit_receiver(transformer, data.clone());
        transform_slot(&mut self.callee_reference, |r| {
            transformer.transform_reference(r, data.clone())
        });
        transform_slot(&mut self.type_ref, |t| transformer.transform_type_ref(t, data));
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FirFunctionCall {
    type_ref: FirTypeRef,
    explicit_receiver: FirExpression,
    callee_reference: FirReference,
    type_arguments: Vec<FirTypeRef>,
    arguments: Vec<FirExpression>,
    safe: bool,
}

getters!(FirFunctionCall {
    val type_ref: FirTypeRef,
    val explicit_receiver: FirExpression,
    val callee_reference: FirReference,
    list type_arguments: FirTypeRef,
    list arguments: FirExpression,
    copy safe: bool,
});
impl_accept!(FirFunctionCall => visit_function_call);

impl FirFunctionCall {
    pub fn new(
        explicit_receiver: FirExpression,
        name: Name,
        type_arguments: Vec<FirTypeRef>,
        arguments: Vec<FirExpression>,
    ) -> Self {
        FirFunctionCall {
            type_ref: FirTypeRef::Implicit,
            explicit_receiver,
            callee_reference: FirReference::Simple(name),
            type_arguments,
            arguments,
            safe: false,
        }
    }

    #[must_use]
    pub fn with_safe(mut self, safe: bool) -> Self {
        self.safe = safe;
        self
    }

    pub fn replace_type_ref(&mut self, type_ref: FirTypeRef) {
        self.type_ref = type_ref;
    }

    pub fn replace_callee_reference(&mut self, reference: FirReference) {
        self.callee_reference = reference;
    }

    pub fn replace_type_arguments(&mut self, type_arguments: Vec<FirTypeRef>) {
        self.type_arguments = type_arguments;
    }

    pub fn transform_explicit_receiver<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_slot(&mut self.explicit_receiver, |e| {
            transformer.transform_expression(e, data)
        });
    }

    pub fn transform_type_arguments<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_inplace(&mut self.type_arguments, |t| {
            transformer.transform_type_ref(t, data.clone())
        });
    }

    pub fn transform_arguments<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_inplace(&mut self.arguments, |e| {
            transformer.transform_expression(e, data.clone())
        });
    }

    /// Rewrite arguments one at a time, each with its own context.
    pub fn map_arguments(&mut self, mut f: impl FnMut(usize, FirExpression) -> FirExpression) {
        let mut index = 0;
        transform_inplace(&mut self.arguments, |e| {
            let out = f(index, e);
            index += 1;
            out
        });
    }

    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        self.explicit_receiver.accept(visitor, data.clone());
        self.callee_reference.accept(visitor, data.clone());
        for type_argument in &self.type_arguments {
            type_argument.accept(visitor, data.clone());
        }
        for argument in &self.arguments {
            argument.accept(visitor, data.clone());
        }
        self.type_ref.accept(visitor, data);
    }

    #[must_use]
    pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        mut self: Box<Self>,
        transformer: &mut T,
        data: D,
    ) -> Box<Self> {
        self.transform_explicit_receiver(transformer, data.clone());
        transform_slot(&mut self.callee_reference, |r| {
            transformer.transform_reference(r, data.clone())
        });
        self.transform_type_arguments(transformer, data.clone());
        self.transform_arguments(transformer, data.clone());
        transform_slot(&mut self.type_ref, |t| transformer.transform_type_ref(t, data));
        self
    }
}

// === Blocks ===

#[derive(Clone, Debug, PartialEq, Default)]
pub struct FirBlock {
    statements: Vec<FirStatement>,
    type_ref: FirTypeRef,
}

getters!(FirBlock { list statements: FirStatement, val type_ref: FirTypeRef });
impl_accept!(FirBlock => visit_block);

impl FirBlock {
    pub fn new(statements: Vec<FirStatement>) -> Self {
        FirBlock {
            statements,
            type_ref: FirTypeRef::Implicit,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// The trailing statement, if it is an expression: the block's value.
    pub fn last_expression(&self) -> Option<&FirExpression> {
        self.statements.last().and_then(FirStatement::as_expression)
    }

    pub fn replace_type_ref(&mut self, type_ref: FirTypeRef) {
        self.type_ref = type_ref;
    }

    pub fn transform_statements<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_inplace(&mut self.statements, |s| {
            transformer.transform_statement(s, data.clone())
        });
    }

    /// Rewrite statements one at a time; `f` learns whether it sees the last one.
    pub fn map_statements(&mut self, mut f: impl FnMut(bool, FirStatement) -> FirStatement) {
        let count = self.statements.len();
        let mut index = 0;
        transform_inplace(&mut self.statements, |s| {
            index += 1;
            f(index == count, s)
        });
    }

    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        for statement in &self.statements {
            statement.accept(visitor, data.clone());
        }
        self.type_ref.accept(visitor, data);
    }

    #[must_use]
    pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        mut self,
        transformer: &mut T,
        data: D,
    ) -> Self {
        self.transform_statements(transformer, data.clone());
        transform_slot(&mut self.type_ref, |t| transformer.transform_type_ref(t, data));
        self
    }
}

// === Receivers and operators ===

#[derive(Clone, Debug, PartialEq)]
pub struct FirThisReceiverExpression {
    type_ref: FirTypeRef,
    callee_reference: FirReference,
}

getters!(FirThisReceiverExpression { val type_ref: FirTypeRef, val callee_reference: FirReference });
impl_accept!(FirThisReceiverExpression => visit_this_receiver_expression);

impl FirThisReceiverExpression {
    pub fn new(label: Option<Name>) -> Self {
        FirThisReceiverExpression {
            type_ref: FirTypeRef::Implicit,
            callee_reference: FirReference::This { label },
        }
    }

    pub fn label(&self) -> Option<Name> {
        match self.callee_reference {
            FirReference::This { label } => label,
            _ => None,
        }
    }

    pub fn replace_type_ref(&mut self, type_ref: FirTypeRef) {
        self.type_ref = type_ref;
    }

    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        self.callee_reference.accept(visitor, data.clone());
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

/// Builtin operators that do not go through member lookup.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Equal,
    NotEqual,
    Identity,
    NotIdentity,
    Less,
    Greater,
    LessOrEqual,
    GreaterOrEqual,
    Not,
}

impl Operation {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Operation::Less | Operation::Greater | Operation::LessOrEqual | Operation::GreaterOrEqual
        )
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operation::Equal => "==",
            Operation::NotEqual => "!=",
            Operation::Identity => "===",
            Operation::NotIdentity => "!==",
            Operation::Less => "<",
            Operation::Greater => ">",
            Operation::LessOrEqual => "<=",
            Operation::GreaterOrEqual => ">=",
            Operation::Not => "!",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FirOperatorCall {
    type_ref: FirTypeRef,
    operation: Operation,
    arguments: Vec<FirExpression>,
}

getters!(FirOperatorCall {
    val type_ref: FirTypeRef,
    copy operation: Operation,
    list arguments: FirExpression,
});
impl_accept!(FirOperatorCall => visit_operator_call);

impl FirOperatorCall {
    pub fn new(operation: Operation, arguments: Vec<FirExpression>) -> Self {
        FirOperatorCall {
            type_ref: FirTypeRef::Implicit,
            operation,
            arguments,
        }
    }

    pub fn replace_type_ref(&mut self, type_ref: FirTypeRef) {
        self.type_ref = type_ref;
    }

    pub fn transform_arguments<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_inplace(&mut self.arguments, |e| {
            transformer.transform_expression(e, data.clone())
        });
    }

    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        for argument in &self.arguments {
            argument.accept(visitor, data.clone());
        }
        self.type_ref.accept(visitor, data);
    }

    #[must_use]
    pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        mut self: Box<Self>,
        transformer: &mut T,
        data: D,
    ) -> Box<Self> {
        self.transform_arguments(transformer, data.clone());
        transform_slot(&mut self.type_ref, |t| transformer.transform_type_ref(t, data));
        self
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeOperation {
    Is,
    NotIs,
    As,
    SafeAs,
}

/// `e is T`, `e !is T`, `e as T`, `e as? T`.
#[derive(Clone, Debug, PartialEq)]
pub struct FirTypeOperatorCall {
    type_ref: FirTypeRef,
    operation: TypeOperation,
    argument: FirExpression,
    conversion_type_ref: FirTypeRef,
}

getters!(FirTypeOperatorCall {
    val type_ref: FirTypeRef,
    copy operation: TypeOperation,
    val argument: FirExpression,
    val conversion_type_ref: FirTypeRef,
});
impl_accept!(FirTypeOperatorCall => visit_type_operator_call);

impl FirTypeOperatorCall {
    pub fn new(operation: TypeOperation, argument: FirExpression, conversion_type_ref: FirTypeRef) -> Self {
        FirTypeOperatorCall {
            type_ref: FirTypeRef::Implicit,
            operation,
            argument,
            conversion_type_ref,
        }
    }

    pub fn replace_type_ref(&mut self, type_ref: FirTypeRef) {
        self.type_ref = type_ref;
    }

    pub fn replace_conversion_type_ref(&mut self, type_ref: FirTypeRef) {
        self.conversion_type_ref = type_ref;
    }

    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        self.argument.accept(visitor, data.clone());
        self.conversion_type_ref.accept(visitor, data.clone());
        self.type_ref.accept(visitor, data);
    }

    #[must_use]
    pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        mut self: Box<Self>,
        transformer: &mut T,
        data: D,
    ) -> Box<Self> {
        transform_slot(&mut self.argument, |e| {
            transformer.transform_expression(e, data.clone())
        });
        transform_slot(&mut self.conversion_type_ref, |t| {
            transformer.transform_type_ref(t, data.clone())
        });
        transform_slot(&mut self.type_ref, |t| transformer.transform_type_ref(t, data));
        self
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LogicOperation {
    And,
    Or,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FirBinaryLogicExpression {
    type_ref: FirTypeRef,
    kind: LogicOperation,
    left: FirExpression,
    right: FirExpression,
}

getters!(FirBinaryLogicExpression {
    val type_ref: FirTypeRef,
    copy kind: LogicOperation,
    val left: FirExpression,
    val right: FirExpression,
});
impl_accept!(FirBinaryLogicExpression => visit_binary_logic_expression);

impl FirBinaryLogicExpression {
    pub fn new(kind: LogicOperation, left: FirExpression, right: FirExpression) -> Self {
        FirBinaryLogicExpression {
            type_ref: FirTypeRef::Implicit,
            kind,
            left,
            right,
        }
    }

    pub fn replace_type_ref(&mut self, type_ref: FirTypeRef) {
        self.type_ref = type_ref;
    }

    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        self.left.accept(visitor, data.clone());
        self.right.accept(visitor, data.clone());
        self.type_ref.accept(visitor, data);
    }

    #[must_use]
    pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        mut self: Box<Self>,
        transformer: &mut T,
        data: D,
    ) -> Box<Self> {
        transform_slot(&mut self.left, |e| transformer.transform_expression(e, data.clone()));
        transform_slot(&mut self.right, |e| transformer.transform_expression(e, data.clone()));
        transform_slot(&mut self.type_ref, |t| transformer.transform_type_ref(t, data));
        self
    }
}

// === Lambdas ===

/// A lambda. It is both an expression and a declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct FirAnonymousFunction {
    type_ref: FirTypeRef,
    label: Option<Name>,
    receiver_type_ref: Option<FirTypeRef>,
    value_parameters: Vec<FirValueParameter>,
    return_type_ref: FirTypeRef,
    body: Option<FirBlock>,
    has_explicit_parameters: bool,
}

getters!(FirAnonymousFunction {
    val type_ref: FirTypeRef,
    opt receiver_type_ref: FirTypeRef,
    list value_parameters: FirValueParameter,
    val return_type_ref: FirTypeRef,
    opt body: FirBlock,
    copy has_explicit_parameters: bool,
});
impl_accept!(FirAnonymousFunction => visit_anonymous_function);

impl FirAnonymousFunction {
    /// A lambda with declared parameters (possibly none: `{ -> x }`), or with
    /// `value_parameters = None` when the source listed no parameter clause.
    pub fn new(label: Option<Name>, value_parameters: Option<Vec<FirValueParameter>>, body: FirBlock) -> Self {
        let has_explicit_parameters = value_parameters.is_some();
        FirAnonymousFunction {
            type_ref: FirTypeRef::Implicit,
            label,
            receiver_type_ref: None,
            value_parameters: value_parameters.unwrap_or_default(),
            return_type_ref: FirTypeRef::Implicit,
            body: Some(body),
            has_explicit_parameters,
        }
    }

    pub fn label(&self) -> Option<Name> {
        self.label
    }

    pub fn replace_type_ref(&mut self, type_ref: FirTypeRef) {
        self.type_ref = type_ref;
    }

    pub fn replace_label(&mut self, label: Option<Name>) {
        self.label = label;
    }

    pub fn replace_receiver_type_ref(&mut self, receiver: Option<FirTypeRef>) {
        self.receiver_type_ref = receiver;
    }

    pub fn replace_value_parameters(&mut self, value_parameters: Vec<FirValueParameter>) {
        self.value_parameters = value_parameters;
    }

    pub fn replace_return_type_ref(&mut self, return_type_ref: FirTypeRef) {
        self.return_type_ref = return_type_ref;
    }

    pub fn transform_value_parameters<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_inplace(&mut self.value_parameters, |p| {
            transformer.transform_value_parameter(p, data.clone())
        });
    }

    pub fn transform_return_type_ref<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_slot(&mut self.return_type_ref, |t| {
            transformer.transform_type_ref(t, data)
        });
    }

    pub fn transform_body<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_opt(&mut self.body, |b| transformer.transform_block(b, data));
    }

    /// Everything except value parameters, return type and body.
    pub fn transform_other_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_opt(&mut self.receiver_type_ref, |t| {
            transformer.transform_type_ref(t, data.clone())
        });
        transform_slot(&mut self.type_ref, |t| transformer.transform_type_ref(t, data));
    }

    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        if let Some(receiver) = &self.receiver_type_ref {
            receiver.accept(visitor, data.clone());
        }
        for parameter in &self.value_parameters {
            parameter.accept(visitor, data.clone());
        }
        self.return_type_ref.accept(visitor, data.clone());
        if let Some(body) = &self.body {
            body.accept(visitor, data.clone());
        }
        self.type_ref.accept(visitor, data);
    }

    #[must_use]
    pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        mut self: Box<Self>,
        transformer: &mut T,
        data: D,
    ) -> Box<Self> {
        self.transform_value_parameters(transformer, data.clone());
        self.transform_return_type_ref(transformer, data.clone());
        self.transform_body(transformer, data.clone());
        self.transform_other_children(transformer, data);
        self
    }
}

// === Assignments ===

/// `receiver.name = rvalue` or `name = rvalue`. A statement, not an expression.
#[derive(Clone, Debug, PartialEq)]
pub struct FirVariableAssignment {
    explicit_receiver: FirExpression,
    callee_reference: FirReference,
    rvalue: FirExpression,
}

getters!(FirVariableAssignment {
    val explicit_receiver: FirExpression,
    val callee_reference: FirReference,
    val rvalue: FirExpression,
});
impl_accept!(FirVariableAssignment => visit_variable_assignment);

impl FirVariableAssignment {
    pub fn new(explicit_receiver: FirExpression, name: Name, rvalue: FirExpression) -> Self {
        FirVariableAssignment {
            explicit_receiver,
            callee_reference: FirReference::Simple(name),
            rvalue,
        }
    }

    pub fn replace_callee_reference(&mut self, reference: FirReference) {
        self.callee_reference = reference;
    }

    pub fn transform_explicit_receiver<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_slot(&mut self.explicit_receiver, |e| {
            transformer.transform_expression(e, data)
        });
    }

    pub fn transform_rvalue<D: Clone, T: FirTransformer<D> + ?Sized>(
        &mut self,
        transformer: &mut T,
        data: D,
    ) {
        transform_slot(&mut self.rvalue, |e| transformer.transform_expression(e, data));
    }

    pub fn accept_children<V: FirVisitor<D> + ?Sized, D: Clone>(&self, visitor: &mut V, data: D) {
        self.explicit_receiver.accept(visitor, data.clone());
        self.callee_reference.accept(visitor, data.clone());
        self.rvalue.accept(visitor, data);
    }

    #[must_use]
    pub fn transform_children<D: Clone, T: FirTransformer<D> + ?Sized>(
        mut self: Box<Self>,
        transformer: &mut T,
        data: D,
    ) -> Box<Self> {
        self.transform_explicit_receiver(transformer, data.clone());
        transform_slot(&mut self.callee_reference, |r| {
            transformer.transform_reference(r, data.clone())
        });
        self.transform_rvalue(transformer, data);
        self
    }
}
