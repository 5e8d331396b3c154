//! Blocks, constants, accesses, operators, assignments and lambdas.

use fir_tree::{
    ClassId, ClassKind, ClassifierSymbol, ConeClassType, ConeType, ConeTypeProjection, ConstValue,
    DeclId, FirAnonymousFunction, FirBlock, FirConstExpression, FirExpression, FirOperatorCall,
    FirQualifiedAccessExpression, FirReference, FirStatement, FirSymbol, FirThisReceiverExpression,
    FirTypeOperatorCall, FirValueParameter, FirVariableAssignment, Name, Operation, TypeOperation,
    VariableSymbol,
};

use super::context::ReturnTarget;
use super::{resolved, type_of, BodyResolveTransformer, Expected};
use crate::calls::{property_type, CallArgument};
use crate::diagnostics::DiagnosticKind;
use crate::receivers::{ImplicitReceiver, ImplicitReceiverKind};
use crate::scopes::{FirScope, LookupPosition, ProcessorAction};
use crate::subtyping::{type_parameter_bounds, TypeContext};

/// A variable a name resolved to.
pub(super) struct VariableLookup {
    pub symbol: FirSymbol,
    pub ty: ConeType,
    pub is_var: bool,
}

/// A function type taken apart: `R.(P1, ..., Pn) -> T`.
pub(super) struct FunctionShape {
    pub receiver: Option<ConeType>,
    pub parameters: Vec<ConeType>,
    pub return_type: ConeType,
}

impl BodyResolveTransformer<'_, '_> {
    // === Blocks ===

    /// The block's statements in order; the trailing expression gets the
    /// expected type and gives the block its type.
    pub(super) fn resolve_block(&mut self, mut block: FirBlock, expected: Expected) -> FirBlock {
        block.map_statements(|is_last, statement| match statement {
            FirStatement::Expression(expression) if is_last => {
                FirStatement::Expression(self.transform_expression_with(expression, expected.clone()))
            }
            other => self.transform_statement_with(other),
        });
        let ty = match block.last_expression() {
            Some(expression) => type_of(expression),
            None => self.unit_type(),
        };
        block.replace_type_ref(resolved(ty));
        block
    }

    fn transform_expression_with(&mut self, expression: FirExpression, expected: Expected) -> FirExpression {
        fir_tree::FirTransformer::transform_expression(self, expression, expected)
    }

    fn transform_statement_with(&mut self, statement: FirStatement) -> FirStatement {
        fir_tree::FirTransformer::transform_statement(self, statement, None)
    }

    // === Constants ===

    pub(super) fn resolve_const(&mut self, mut expression: Box<FirConstExpression>, expected: Expected) -> FirExpression {
        let standard = self.session.standard();
        let ty = match expression.value() {
            ConstValue::Null => self.nothing_type().with_nullability(true),
            ConstValue::Boolean(_) => self.builtin_type(&standard.boolean),
            ConstValue::Char(_) => self.builtin_type(&standard.char),
            // An integer literal takes the type `Long` when one is expected.
            ConstValue::Int(_) if expected.as_ref().is_some_and(|t| t.is_class(&standard.long)) => {
                self.builtin_type(&standard.long)
            }
            ConstValue::Int(_) => self.builtin_type(&standard.int),
            ConstValue::Long(_) => self.builtin_type(&standard.long),
            ConstValue::Double(_) => self.builtin_type(&standard.double),
            ConstValue::String(_) => self.builtin_type(&standard.string),
        };
        expression.replace_type_ref(resolved(ty));
        FirExpression::Const(expression)
    }

    // === Variables ===

    /// The class whose members a value of type `ty` exposes.
    pub(super) fn receiver_class(&self, ty: &ConeType) -> Option<ClassId> {
        match ty {
            ConeType::Class(class) => Some(class.lookup_tag.clone()),
            ConeType::TypeParameter { symbol, .. } => type_parameter_bounds(self.session, symbol)
                .iter()
                .find_map(|bound| self.receiver_class(bound))
                .or_else(|| Some(self.session.standard().any.clone())),
            ConeType::Error(_) => None,
        }
    }

    fn property_is_var(&self, id: DeclId) -> bool {
        self.session
            .declarations()
            .with(id, |d| d.as_property().is_some_and(|p| p.is_var()))
            .unwrap_or(false)
    }

    fn property_lookup(&self, id: DeclId, dispatch: Option<&ConeType>) -> VariableLookup {
        VariableLookup {
            symbol: FirSymbol::Variable(VariableSymbol::Property(id)),
            ty: property_type(self.session, id, dispatch, self.context.container),
            is_var: self.property_is_var(id),
        }
    }

    /// A property visible on a value of type `receiver`.
    fn member_property(&self, receiver: &ConeType, name: Name) -> Option<VariableLookup> {
        let class_id = self.receiver_class(receiver)?;
        let scope = self.session.use_site_scope(&class_id)?;
        let mut found = None;
        scope.process_properties_by_name(self.session, name, &mut |symbol| match symbol {
            VariableSymbol::Property(id) => {
                found = Some(id);
                ProcessorAction::Stop
            }
            VariableSymbol::Local(_) => ProcessorAction::Next,
        });
        let dispatch = receiver.with_nullability(false);
        found.map(|id| self.property_lookup(id, Some(&dispatch)))
    }

    /// Locals, then the members of each implicit receiver innermost first,
    /// then top-level properties, then objects.
    pub(super) fn lookup_variable(&self, name: Name) -> Option<VariableLookup> {
        if let Some((symbol, variable)) = self.context.local(name) {
            return Some(VariableLookup {
                symbol: FirSymbol::Variable(VariableSymbol::Local(symbol)),
                ty: variable.ty.clone(),
                is_var: variable.is_var,
            });
        }
        for receiver in self.context.receivers.innermost_first() {
            if let Some(found) = self.member_property(&receiver.ty, name) {
                return Some(found);
            }
        }
        for level in &self.context.static_levels {
            let mut found = None;
            level.process_properties_by_name(self.session, name, &mut |symbol| match symbol {
                VariableSymbol::Property(id) => {
                    found = Some(id);
                    ProcessorAction::Stop
                }
                VariableSymbol::Local(_) => ProcessorAction::Next,
            });
            if let Some(id) = found {
                return Some(self.property_lookup(id, None));
            }
        }
        self.lookup_object(name)
    }

    fn lookup_object(&self, name: Name) -> Option<VariableLookup> {
        let mut found = None;
        self.context.static_scope.process_classifiers_by_name(
            self.session,
            name,
            LookupPosition::Other,
            &mut |symbol| match symbol {
                ClassifierSymbol::Class(class) => {
                    found = Some(class);
                    ProcessorAction::Stop
                }
                ClassifierSymbol::TypeParameter(_) => ProcessorAction::Next,
            },
        );
        let class = found?;
        let is_object = self
            .session
            .with_class(class.class_id(), |c| c.class_kind() == ClassKind::Object)
            .unwrap_or(false);
        is_object.then(|| VariableLookup {
            ty: ConeType::simple(class.0.clone()),
            symbol: FirSymbol::Class(class),
            is_var: false,
        })
    }

    /// Report a nullable receiver used without `?.`.
    pub(super) fn check_receiver_nullability(&self, receiver: &ConeType, safe: bool) {
        if receiver.is_nullable() && !safe && !receiver.is_error() {
            self.report(
                DiagnosticKind::UnsafeCall,
                format!(
                    "Only safe (?.) or non-null asserted (!!.) calls are allowed on a nullable receiver of type {}",
                    self.session.render_type(receiver)
                ),
            );
        }
    }

    pub(super) fn unresolved(&self, name: Name) -> (FirReference, ConeType) {
        let reason = format!("Unresolved reference: {}", self.session.text(name));
        self.report(DiagnosticKind::UnresolvedReference, reason.clone());
        (
            FirReference::Error {
                name,
                reason: reason.clone(),
            },
            ConeType::error(reason),
        )
    }

    pub(super) fn resolve_qualified_access(&mut self, mut access: Box<FirQualifiedAccessExpression>) -> FirExpression {
        access.transform_explicit_receiver(self, None);
        let Some(name) = access.callee_reference().name() else {
            access.replace_type_ref(resolved(ConeType::error("Access without a name")));
            return FirExpression::QualifiedAccess(access);
        };
        let safe = access.safe();
        let receiver = (!access.explicit_receiver().is_no_receiver()).then(|| type_of(access.explicit_receiver()));

        let lookup = match &receiver {
            None => self.lookup_variable(name),
            // Errors in the receiver were reported where they happened.
            Some(receiver) if receiver.is_error() => {
                access.replace_callee_reference(FirReference::Error {
                    name,
                    reason: "Receiver has an error type".to_owned(),
                });
                access.replace_type_ref(resolved(receiver.clone()));
                return FirExpression::QualifiedAccess(access);
            }
            Some(receiver) => {
                self.check_receiver_nullability(receiver, safe);
                self.member_property(receiver, name)
            }
        };

        match lookup {
            Some(found) => {
                let nullable_result = safe && receiver.as_ref().is_some_and(ConeType::is_nullable);
                let ty = if nullable_result {
                    found.ty.with_nullability(true)
                } else {
                    found.ty
                };
                access.replace_callee_reference(FirReference::Resolved {
                    name,
                    symbol: found.symbol,
                });
                access.replace_type_ref(resolved(ty));
            }
            None => {
                let (reference, ty) = self.unresolved(name);
                access.replace_callee_reference(reference);
                access.replace_type_ref(resolved(ty));
            }
        }
        FirExpression::QualifiedAccess(access)
    }

    pub(super) fn resolve_this(&mut self, mut expression: Box<FirThisReceiverExpression>) -> FirExpression {
        let ty = match self.context.receivers.find(expression.label()) {
            Some(receiver) => receiver.ty.clone(),
            None => {
                let message = "'this' is not defined in this context";
                self.report(DiagnosticKind::ThisNotAvailable, message);
                ConeType::error(message)
            }
        };
        expression.replace_type_ref(resolved(ty));
        FirExpression::ThisReceiver(expression)
    }

    // === Operators ===

    /// `left.name(arguments)` through member and extension lookup.
    fn resolve_operator_function(&mut self, receiver: &ConeType, name: Name, arguments: &[ConeType]) -> ConeType {
        if receiver.is_error() {
            return receiver.clone();
        }
        let arguments = arguments.iter().cloned().map(CallArgument::Expression).collect();
        let site = super::calls::CallSite {
            name,
            receiver: Some(receiver.clone()),
            safe: false,
            arguments,
            type_arguments: Vec::new(),
            expected: None,
        };
        let outcome = self.resolve_call_site(&site);
        match self.report_call_outcome(name, outcome) {
            Ok((_, completed)) => completed.return_type,
            Err((_, ty)) => ty,
        }
    }

    pub(super) fn resolve_operator_call(&mut self, call: Box<FirOperatorCall>) -> FirExpression {
        let mut call = call;
        call.transform_arguments(self, None);
        let operation = call.operation();
        let boolean = self.boolean_type();
        let operands: Vec<ConeType> = call.arguments().iter().map(type_of).collect();
        let special = self.session.special_names().clone();
        let ty = match operation {
            Operation::Equal | Operation::NotEqual | Operation::Identity | Operation::NotIdentity => boolean,
            comparison if comparison.is_comparison() => match operands.as_slice() {
                [left, right] => {
                    let compared = self.resolve_operator_function(left, special.compare_to, std::slice::from_ref(right));
                    if compared.is_error() {
                        compared
                    } else {
                        boolean
                    }
                }
                _ => ConeType::error(format!("Operator {} takes two operands", comparison.symbol())),
            },
            Operation::Not => match operands.as_slice() {
                [operand] => self.resolve_operator_function(operand, special.not, &[]),
                _ => ConeType::error("Operator ! takes one operand"),
            },
            other => ConeType::error(format!("Unsupported operator {}", other.symbol())),
        };
        call.replace_type_ref(resolved(ty));
        FirExpression::OperatorCall(call)
    }

    pub(super) fn resolve_type_operator_call(&mut self, call: Box<FirTypeOperatorCall>) -> FirExpression {
        let mut call = call.transform_children(self, None);
        let target = call.conversion_type_ref().cone_type_or_error();
        let ty = match call.operation() {
            TypeOperation::Is | TypeOperation::NotIs => self.boolean_type(),
            TypeOperation::As => target,
            TypeOperation::SafeAs => target.with_nullability(true),
        };
        call.replace_type_ref(resolved(ty));
        FirExpression::TypeOperatorCall(call)
    }

    // === Assignments ===

    pub(super) fn resolve_assignment(&mut self, mut assignment: Box<FirVariableAssignment>) -> FirStatement {
        assignment.transform_explicit_receiver(self, None);
        let Some(name) = assignment.callee_reference().name() else {
            assignment.transform_rvalue(self, None);
            return FirStatement::VariableAssignment(assignment);
        };
        let lookup = if assignment.explicit_receiver().is_no_receiver() {
            self.lookup_variable(name)
        } else {
            let receiver = type_of(assignment.explicit_receiver());
            if receiver.is_error() {
                None
            } else {
                self.member_property(&receiver, name)
            }
        };
        let expected = match lookup {
            Some(found) => {
                if !found.is_var {
                    self.report(DiagnosticKind::ValReassignment, "Val cannot be reassigned");
                }
                assignment.replace_callee_reference(FirReference::Resolved {
                    name,
                    symbol: found.symbol,
                });
                Some(found.ty)
            }
            None => {
                let (reference, _) = self.unresolved(name);
                assignment.replace_callee_reference(reference);
                None
            }
        };
        assignment.transform_rvalue(self, expected);
        self.dfa.variable_assignment(name);
        FirStatement::VariableAssignment(assignment)
    }

    // === Lambdas ===

    /// Parts of a function type, `None` for anything else.
    pub(super) fn function_shape(&self, ty: &ConeType) -> Option<FunctionShape> {
        let class = ty.as_class()?;
        self.session.standard().function_arity(&class.lookup_tag)?;
        let mut arguments: Vec<ConeType> = class
            .type_arguments
            .iter()
            .map(|a| a.ty().cloned().unwrap_or_else(|| ConeType::error("Star projection")))
            .collect();
        let return_type = arguments.pop()?;
        let receiver = if class.extension_function && !arguments.is_empty() {
            Some(arguments.remove(0))
        } else {
            None
        };
        Some(FunctionShape {
            receiver,
            parameters: arguments,
            return_type,
        })
    }

    /// `FunctionN<receiver, parameters..., return_type>`.
    pub(super) fn function_type(
        &self,
        receiver: Option<ConeType>,
        parameters: Vec<ConeType>,
        return_type: ConeType,
    ) -> ConeType {
        let arity = parameters.len() + usize::from(receiver.is_some());
        let Some(class_id) = self
            .session
            .standard()
            .function(arity)
            .filter(|_| arity <= self.session.config().max_function_arity)
        else {
            return ConeType::unsupported(format!("Function type with {arity} parameters is not supported"));
        };
        let extension_function = receiver.is_some();
        let type_arguments = receiver
            .into_iter()
            .chain(parameters)
            .chain(std::iter::once(return_type))
            .map(ConeTypeProjection::invariant)
            .collect();
        ConeType::Class(ConeClassType {
            lookup_tag: class_id.clone(),
            type_arguments,
            nullable: false,
            extension_function,
        })
    }

    /// Parameters of a lambda with their types filled in from `shape`.
    /// A lambda with no parameter clause and one expected parameter gets
    /// the implicit `it`.
    fn lambda_parameters(&self, lambda: &FirAnonymousFunction, shape: Option<&FunctionShape>) -> Vec<FirValueParameter> {
        let expected = shape.map_or(&[][..], |s| s.parameters.as_slice());
        if !lambda.has_explicit_parameters() && lambda.value_parameters().is_empty() {
            if let [only] = expected {
                let it = self.session.special_names().it;
                return vec![FirValueParameter::new(it, self.session.new_local_symbol(), resolved(only.clone()))];
            }
        }
        lambda
            .value_parameters()
            .iter()
            .enumerate()
            .map(|(index, parameter)| {
                let mut parameter = parameter.clone();
                if parameter.return_type_ref().is_implicit() {
                    let ty = expected
                        .get(index)
                        .cloned()
                        .unwrap_or_else(|| ConeType::error("Cannot infer a type for this parameter"));
                    parameter.replace_return_type_ref(resolved(ty));
                }
                parameter
            })
            .collect()
    }

    pub(super) fn resolve_lambda(&mut self, mut lambda: Box<FirAnonymousFunction>, expected: Expected) -> FirExpression {
        let shape = expected.as_ref().and_then(|t| self.function_shape(t));
        lambda.transform_value_parameters(self, None);
        let parameters = self.lambda_parameters(&lambda, shape.as_ref());
        lambda.replace_value_parameters(parameters);

        let receiver = shape.as_ref().and_then(|s| s.receiver.clone());
        if let Some(receiver) = &receiver {
            lambda.replace_receiver_type_ref(Some(resolved(receiver.clone())));
        }
        let expected_return = shape.map(|s| s.return_type);
        let returns_unit = expected_return.as_ref().is_some_and(|t| self.is_unit(t));
        // A return type still waiting for inference says nothing about the body.
        let body_expected = expected_return
            .filter(|t| !returns_unit && !t.is_error() && !matches!(t, ConeType::TypeParameter { .. }));

        let receivers = self.context.receivers.len();
        if let Some(receiver) = &receiver {
            self.context.receivers.push(ImplicitReceiver {
                label: lambda.label(),
                ty: receiver.clone(),
                kind: ImplicitReceiverKind::Lambda,
            });
        }
        let label = lambda.label();
        let (mut lambda, target) = self.with_local_scope(|t| {
            t.declare_parameters(lambda.value_parameters());
            t.context.return_targets.push(ReturnTarget {
                label,
                expected: body_expected.clone(),
                collected: Vec::new(),
                is_lambda: true,
            });
            t.dfa.enter_anonymous_function();
            lambda.transform_body(t, body_expected);
            t.dfa.exit_anonymous_function();
            let target = t.context.return_targets.pop();
            (lambda, target)
        });
        self.context.receivers.truncate(receivers);

        let return_type = if returns_unit {
            self.unit_type()
        } else {
            let mut types = target.map(|t| t.collected).unwrap_or_default();
            if let Some(body) = lambda.body() {
                types.push(body.type_ref().cone_type_or_error());
            }
            self.type_context().common_super_type(&types)
        };
        lambda.replace_return_type_ref(resolved(return_type.clone()));
        let parameter_types = lambda
            .value_parameters()
            .iter()
            .map(|p| p.return_type_ref().cone_type_or_error())
            .collect();
        let ty = self.function_type(receiver, parameter_types, return_type);
        lambda.replace_type_ref(resolved(ty));
        FirExpression::AnonymousFunction(lambda)
    }
}
