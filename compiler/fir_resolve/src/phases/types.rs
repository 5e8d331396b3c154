use fir_tree::{
    DeclId, FirBlock, FirDeclaration, FirExpression, FirTransformer, FirTypeParameter, FirTypeRef,
    FirValueParameter, ResolvePhase,
};

use super::{callable_scopes, report_type_error, transform_in_table};
use crate::scopes::FirCompositeScope;
use crate::type_resolver::FirTypeResolver;
use crate::{FirSession, ResolveError};

/// Resolves every explicit type in a declaration header and leaves bodies,
/// default values and initializers for body resolution.
struct TypeResolveTransformer<'s> {
    session: &'s FirSession,
    container: DeclId,
    scope: FirCompositeScope,
    resolver: FirTypeResolver<'s>,
}

impl FirTransformer<()> for TypeResolveTransformer<'_> {
    fn transform_type_ref(&mut self, type_ref: FirTypeRef, _: ()) -> FirTypeRef {
        let was_resolved = type_ref.is_resolved();
        let resolved = self.resolver.resolve_type_ref(type_ref, &self.scope);
        if !was_resolved {
            report_type_error(self.session, &resolved, self.container);
        }
        resolved
    }

    fn transform_type_parameter(&mut self, mut parameter: FirTypeParameter, data: ()) -> FirTypeParameter {
        parameter.transform_bounds(self, data);
        parameter
    }

    fn transform_value_parameter(&mut self, mut parameter: FirValueParameter, data: ()) -> FirValueParameter {
        parameter.transform_return_type_ref(self, data);
        parameter
    }

    fn transform_block(&mut self, block: FirBlock, _: ()) -> FirBlock {
        block
    }

    fn transform_expression(&mut self, expression: FirExpression, _: ()) -> FirExpression {
        expression
    }
}

pub(super) fn resolve_types(session: &FirSession, id: DeclId) -> Result<(), ResolveError> {
    let scope = FirCompositeScope::new(callable_scopes(session, id));
    transform_in_table(session, id, ResolvePhase::Types, |mut declaration| {
        let mut transformer = TypeResolveTransformer {
            session,
            container: id,
            scope,
            resolver: FirTypeResolver::new(session),
        };
        let t = &mut transformer;
        match &mut declaration {
            FirDeclaration::File(_) => {}
            FirDeclaration::RegularClass(class) => class.transform_type_parameters(t, ()),
            FirDeclaration::SimpleFunction(function) => {
                function.transform_type_parameters(t, ());
                function.transform_receiver_type_ref(t, ());
                function.transform_value_parameters(t, ());
                function.transform_return_type_ref(t, ());
            }
            FirDeclaration::Property(property) => {
                property.transform_receiver_type_ref(t, ());
                property.transform_return_type_ref(t, ());
            }
            FirDeclaration::Constructor(constructor) => {
                constructor.transform_value_parameters(t, ());
                constructor.transform_return_type_ref(t, ());
            }
        }
        declaration
    })
}
