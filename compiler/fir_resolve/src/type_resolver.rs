//! Syntactic type refs to cone types.
//!
//! Resolution never fails loudly: anything that cannot be resolved becomes
//! an error type carrying the reason, and the caller decides whether that
//! deserves a diagnostic.

use fir_tree::{
    ClassifierSymbol, ConeClassType, ConeType, ConeTypeProjection, FirFunctionTypeRef,
    FirTypeProjection, FirTypeRef, FirUserTypeRef, Name,
};

use crate::qualifier::resolve_qualifier;
use crate::scopes::{FirScope, LookupPosition, ProcessorAction};
use crate::FirSession;

pub struct FirTypeResolver<'s> {
    session: &'s FirSession,
    position: LookupPosition,
}

impl<'s> FirTypeResolver<'s> {
    pub fn new(session: &'s FirSession) -> Self {
        FirTypeResolver {
            session,
            position: LookupPosition::Other,
        }
    }

    /// Resolve as written in a supertype list.
    #[must_use]
    pub fn in_supertype_position(mut self) -> Self {
        self.position = LookupPosition::SuperType;
        self
    }

    /// `Implicit` refs stay implicit; resolved refs are returned unchanged.
    pub fn resolve_type_ref(&self, type_ref: FirTypeRef, scope: &dyn FirScope) -> FirTypeRef {
        match type_ref {
            FirTypeRef::Implicit | FirTypeRef::Resolved(_) => type_ref,
            other => FirTypeRef::resolved(self.resolve_type(&other, scope)),
        }
    }

    pub fn resolve_type(&self, type_ref: &FirTypeRef, scope: &dyn FirScope) -> ConeType {
        match type_ref {
            FirTypeRef::Resolved(resolved) => resolved.ty.clone(),
            FirTypeRef::Implicit => ConeType::error("Implicit type reference"),
            FirTypeRef::ImplicitBuiltin(class_id) => {
                match self.session.builtin_types().symbol(self.session, class_id) {
                    Some(symbol) => ConeType::simple(symbol.0),
                    None => self.not_found(type_ref),
                }
            }
            FirTypeRef::Delegated(inner) => self.resolve_type(inner, scope),
            FirTypeRef::Dynamic { .. } => ConeType::unsupported("Not supported: dynamic"),
            FirTypeRef::User(user) => self.resolve_user_type(type_ref, user, scope),
            FirTypeRef::Function(function) => self.resolve_function_type(function, scope),
        }
    }

    fn not_found(&self, type_ref: &FirTypeRef) -> ConeType {
        let rendered = type_ref.render(self.session);
        tracing::trace!(%rendered, "type not found");
        ConeType::error(format!("Symbol not found, for `{rendered}`"))
    }

    fn resolve_user_type(
        &self,
        type_ref: &FirTypeRef,
        user: &FirUserTypeRef,
        scope: &dyn FirScope,
    ) -> ConeType {
        match self.resolve_to_symbol(user, scope) {
            Some(ClassifierSymbol::Class(class)) => {
                let arguments = user
                    .qualifier
                    .iter()
                    .rev()
                    .flat_map(|part| part.type_arguments.iter())
                    .map(|argument| self.resolve_projection(argument, scope))
                    .collect();
                ConeType::class(class.0, arguments, user.nullable)
            }
            Some(ClassifierSymbol::TypeParameter(symbol)) => ConeType::TypeParameter {
                symbol,
                nullable: user.nullable,
            },
            None => self.not_found(type_ref),
        }
    }

    fn resolve_projection(&self, projection: &FirTypeProjection, scope: &dyn FirScope) -> ConeTypeProjection {
        match projection {
            FirTypeProjection::Star => ConeTypeProjection::Star,
            FirTypeProjection::Type { variance, type_ref } => ConeTypeProjection::Type {
                variance: *variance,
                ty: self.resolve_type(type_ref, scope),
            },
        }
    }

    /// The classifier the qualifier names, looked up through `scope` and
    /// falling back to a fully qualified path.
    pub fn resolve_to_symbol(&self, user: &FirUserTypeRef, scope: &dyn FirScope) -> Option<ClassifierSymbol> {
        let names: Vec<Name> = user.qualifier.iter().map(|part| part.name).collect();
        let (first, rest) = names.split_first()?;

        let mut found = None;
        scope.process_classifiers_by_name(self.session, *first, self.position, &mut |symbol| {
            found = Some(symbol);
            ProcessorAction::Stop
        });
        let through_scope = found.and_then(|symbol| match symbol {
            _ if rest.is_empty() => Some(symbol),
            ClassifierSymbol::Class(class) => {
                let mut class_id = class.0;
                for name in rest {
                    class_id = class_id.create_nested(*name);
                    self.session.class_symbol(&class_id)?;
                }
                Some(ClassifierSymbol::Class(fir_tree::ClassLikeSymbol(class_id)))
            }
            ClassifierSymbol::TypeParameter(_) => None,
        });
        through_scope.or_else(|| {
            if rest.is_empty() {
                return None;
            }
            resolve_qualifier(self.session, &names)
                .map(|class_id| ClassifierSymbol::Class(fir_tree::ClassLikeSymbol(class_id)))
        })
    }

    /// `R.(P1, P2) -> T` becomes `FunctionN<R, P1, P2, T>` with arguments in
    /// receiver, parameter, return order.
    fn resolve_function_type(&self, function: &FirFunctionTypeRef, scope: &dyn FirScope) -> ConeType {
        let arity = function.parameters_count();
        let max = self.session.config().max_function_arity;
        let Some(class_id) = self.session.standard().function(arity).filter(|_| arity <= max) else {
            return ConeType::unsupported(format!("Function type with {arity} parameters is not supported"));
        };
        let arguments = function
            .receiver
            .iter()
            .map(|r| &**r)
            .chain(&function.parameters)
            .chain(std::iter::once(&*function.return_type))
            .map(|t| ConeTypeProjection::invariant(self.resolve_type(t, scope)))
            .collect();
        ConeType::Class(ConeClassType {
            lookup_tag: class_id.clone(),
            type_arguments: arguments,
            nullable: function.nullable,
            extension_function: function.receiver.is_some(),
        })
    }
}

#[cfg(test)]
mod tests;
