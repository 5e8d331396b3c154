use fir_tree::{ClassId, DeclId, FirDeclaration, FirTransformer, FirTypeRef, ResolvePhase};
use rustc_hash::FxHashSet;

use super::{callable_scopes, ensure_at_least, report_type_error, transform_in_table};
use crate::diagnostics::DiagnosticKind;
use crate::scopes::FirCompositeScope;
use crate::type_resolver::FirTypeResolver;
use crate::{FirSession, ResolveError};

struct SupertypeResolveTransformer<'s> {
    session: &'s FirSession,
    class: DeclId,
    class_id: ClassId,
    scope: FirCompositeScope,
    resolver: FirTypeResolver<'s>,
}

impl SupertypeResolveTransformer<'_> {
    /// Whether walking up from `start` leads back to the class being resolved.
    ///
    /// Classes on the way are resolved to `SuperTypes` first. One that is
    /// itself mid-resolution shows its unresolved shadow and ends that path.
    fn leads_back(&self, start: &ClassId) -> bool {
        let mut queue = vec![start.clone()];
        let mut seen = FxHashSet::default();
        while let Some(current) = queue.pop() {
            if current == self.class_id {
                return true;
            }
            if !seen.insert(current.clone()) {
                continue;
            }
            let Some(id) = self.session.class_decl_id(&current) else {
                continue;
            };
            ensure_at_least(self.session, id, ResolvePhase::SuperTypes);
            let supertypes = self
                .session
                .declarations()
                .with(id, |d| {
                    d.as_class().map(|c| {
                        c.resolved_super_types()
                            .filter_map(|t| t.class_id().cloned())
                            .collect::<Vec<_>>()
                    })
                })
                .flatten()
                .unwrap_or_default();
            queue.extend(supertypes);
        }
        false
    }
}

impl FirTransformer<()> for SupertypeResolveTransformer<'_> {
    fn transform_type_ref(&mut self, type_ref: FirTypeRef, _: ()) -> FirTypeRef {
        let resolved = self.resolver.resolve_type_ref(type_ref, &self.scope);
        let Some(ty) = resolved.cone_type() else {
            return resolved;
        };
        if ty.is_error() {
            report_type_error(self.session, &resolved, self.class);
            return resolved;
        }
        match ty.class_id() {
            Some(supertype) if self.leads_back(supertype) => {
                let message = format!(
                    "Cyclic supertypes: {} through {}",
                    self.class_id.render(self.session.interner()),
                    supertype.render(self.session.interner()),
                );
                tracing::debug!(%message);
                self.session
                    .report(DiagnosticKind::CyclicSupertypes, message.clone(), Some(self.class));
                FirTypeRef::error(message)
            }
            _ => resolved,
        }
    }
}

/// Classes resolve their supertype list. A class that declares none gets
/// `kotlin.Any`, except `Any` and `Nothing` themselves.
pub(super) fn resolve_supertypes(session: &FirSession, id: DeclId) -> Result<(), ResolveError> {
    let scope = FirCompositeScope::new(callable_scopes(session, id));
    transform_in_table(session, id, ResolvePhase::SuperTypes, |mut declaration| {
        let FirDeclaration::RegularClass(class) = &mut declaration else {
            return declaration;
        };
        let mut transformer = SupertypeResolveTransformer {
            session,
            class: id,
            class_id: class.class_id().clone(),
            scope,
            resolver: FirTypeResolver::new(session).in_supertype_position(),
        };
        class.transform_super_type_refs(&mut transformer, ());

        let standard = session.standard();
        let is_root = *class.class_id() == standard.any || *class.class_id() == standard.nothing;
        if class.super_type_refs().is_empty() && !is_root {
            let any = transformer
                .resolver
                .resolve_type(&FirTypeRef::ImplicitBuiltin(standard.any.clone()), &transformer.scope);
            if !any.is_error() {
                class.replace_super_type_refs(vec![FirTypeRef::resolved(any)]);
            }
        }
        declaration
    })
}
