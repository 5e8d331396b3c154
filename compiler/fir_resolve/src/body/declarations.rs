//! Functions, properties and constructors.

use fir_tree::{
    ConeType, ConeTypeProjection, DeclId, FirConstructor, FirProperty, FirSimpleFunction, FirTypeRef,
    FirValueParameter, VariableSymbol,
};

use super::context::ReturnTarget;
use super::{resolved, BodyResolveTransformer, ResolutionMode};
use crate::receivers::{ImplicitReceiver, ImplicitReceiverKind};
use crate::subtyping::TypeContext;

impl BodyResolveTransformer<'_, '_> {
    /// The innermost class around `id` is the dispatch receiver of its body.
    pub(super) fn push_dispatch_receiver(&mut self, id: DeclId) {
        let session = self.session;
        let Some(class) = session.declarations().designation(id).and_then(|d| d.innermost_class()) else {
            return;
        };
        let receiver = session
            .declarations()
            .with(class, |d| {
                d.as_class().map(|c| ImplicitReceiver {
                    label: Some(c.name()),
                    ty: c.default_type(),
                    kind: ImplicitReceiverKind::Dispatch(c.class_id().clone()),
                })
            })
            .flatten();
        if let Some(receiver) = receiver {
            self.context.receivers.push(receiver);
        }
    }

    /// Type a parameter has inside the body: `Array<T>` for `vararg T`.
    pub(super) fn parameter_type(&self, parameter: &FirValueParameter) -> ConeType {
        let ty = parameter.return_type_ref().cone_type_or_error();
        if parameter.is_vararg() {
            ConeType::class(
                self.session.standard().array.clone(),
                vec![ConeTypeProjection::invariant(ty)],
                false,
            )
        } else {
            ty
        }
    }

    pub(super) fn declare_parameters(&mut self, parameters: &[FirValueParameter]) {
        for parameter in parameters {
            let ty = self.parameter_type(parameter);
            self.context.declare_local(parameter.name(), parameter.symbol(), ty, false);
            self.dfa.variable_declaration(parameter.symbol());
        }
    }

    pub(super) fn resolve_function(&mut self, mut function: Box<FirSimpleFunction>) -> Box<FirSimpleFunction> {
        if function.body().is_some_and(|body| body.type_ref().is_resolved()) {
            return function;
        }
        if self.mode == ResolutionMode::ImplicitTypeOnly && !function.return_type_ref().is_implicit() {
            return function;
        }
        let receivers = self.context.receivers.len();
        if let Some(receiver) = function.receiver_type_ref().and_then(FirTypeRef::cone_type) {
            self.context.receivers.push(ImplicitReceiver {
                label: Some(function.name()),
                ty: receiver.clone(),
                kind: ImplicitReceiverKind::Extension,
            });
        }
        let declared = function.return_type_ref().cone_type().cloned();
        let name = function.name();

        let (mut function, target) = self.with_local_scope(|t| {
            function.transform_value_parameters(t, None);
            t.declare_parameters(function.value_parameters());
            t.context.return_targets.push(ReturnTarget {
                label: Some(name),
                expected: declared,
                collected: Vec::new(),
                is_lambda: false,
            });
            t.dfa.enter_function();
            function.transform_body(t, None);
            t.dfa.exit_function();
            let target = t.context.return_targets.pop();
            (function, target)
        });
        self.context.receivers.truncate(receivers);

        if function.return_type_ref().is_implicit() {
            let collected = target.map(|t| t.collected).unwrap_or_default();
            let ty = if collected.is_empty() {
                self.unit_type()
            } else {
                self.type_context().common_super_type(&collected)
            };
            tracing::trace!(function = self.session.text(name), ty = %self.session.render_type(&ty), "implicit return type");
            function.replace_return_type_ref(resolved(ty));
        }
        function
    }

    /// A top-level or member property: its initializer, and its type when
    /// the declaration leaves it out.
    pub(super) fn resolve_member_property(&mut self, mut property: Box<FirProperty>) -> Box<FirProperty> {
        let explicit = !property.return_type_ref().is_implicit();
        if explicit && self.mode == ResolutionMode::ImplicitTypeOnly {
            return property;
        }
        if explicit && property.initializer().is_some_and(|e| e.type_ref().is_resolved()) {
            return property;
        }
        let receivers = self.context.receivers.len();
        if let Some(receiver) = property.receiver_type_ref().and_then(FirTypeRef::cone_type) {
            self.context.receivers.push(ImplicitReceiver {
                label: Some(property.name()),
                ty: receiver.clone(),
                kind: ImplicitReceiverKind::Extension,
            });
        }
        let expected = property.return_type_ref().cone_type().cloned();
        property.transform_initializer(self, expected);
        self.context.receivers.truncate(receivers);
        self.infer_property_type(&mut property);
        property
    }

    fn infer_property_type(&self, property: &mut FirProperty) {
        if !property.return_type_ref().is_implicit() {
            return;
        }
        let ty = match property.initializer() {
            Some(initializer) => super::type_of(initializer),
            None => ConeType::error("Cannot infer a type for a property without an initializer"),
        };
        property.replace_return_type_ref(resolved(ty));
    }

    /// `val x: T = initializer` inside a body.
    pub(super) fn resolve_local_property(&mut self, mut property: Box<FirProperty>) -> Box<FirProperty> {
        property.transform_return_type_ref(self, None);
        let expected = property.return_type_ref().cone_type().cloned();
        property.transform_initializer(self, expected);
        self.infer_property_type(&mut property);
        if let VariableSymbol::Local(symbol) = property.symbol() {
            let ty = property.return_type_ref().cone_type_or_error();
            self.context.declare_local(property.name(), symbol, ty, property.is_var());
            self.dfa.variable_declaration(symbol);
        }
        property
    }

    pub(super) fn resolve_constructor(&mut self, constructor: Box<FirConstructor>) -> Box<FirConstructor> {
        if self.mode == ResolutionMode::ImplicitTypeOnly {
            return constructor;
        }
        self.with_local_scope(|t| {
            let mut constructor = constructor;
            constructor.transform_value_parameters(t, None);
            t.declare_parameters(constructor.value_parameters());
            t.dfa.enter_function();
            constructor.transform_body(t, None);
            t.dfa.exit_function();
            constructor
        })
    }
}
