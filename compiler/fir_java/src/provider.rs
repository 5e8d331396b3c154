//! The session hook that gives Java classes their use-site scopes.

use std::cell::RefCell;
use std::sync::Arc;

use fir_resolve::phases::ensure_at_least;
use fir_resolve::scopes::FirScope;
use fir_resolve::{ClassScopeProvider, FirSession};
use fir_tree::{ClassId, DeclarationOrigin, FirRegularClass, ResolvePhase};
use rustc_hash::FxHashSet;

use crate::loader::{JavaClassIndex, JavaClassInfo};
use crate::scopes::{JavaClassMappedScope, JavaClassUseSiteMemberScope};
use crate::type_mapping::JavaClassMapping;
use crate::whitelist::SignatureWhitelist;

thread_local! {
    /// Classes whose scope this thread is building. A supertype that leads
    /// back to one of them gets the default scope instead.
    static BUILDING: RefCell<FxHashSet<ClassId>> = RefCell::new(FxHashSet::default());
}

/// Removes the class from [`BUILDING`] however the build ends.
struct BuildGuard(ClassId);

impl BuildGuard {
    fn enter(class_id: &ClassId) -> Option<Self> {
        BUILDING
            .with(|building| building.borrow_mut().insert(class_id.clone()))
            .then(|| BuildGuard(class_id.clone()))
    }
}

impl Drop for BuildGuard {
    fn drop(&mut self) {
        BUILDING.with(|building| building.borrow_mut().remove(&self.0));
    }
}

pub struct JavaScopeProvider {
    mapping: Arc<JavaClassMapping>,
    index: Arc<JavaClassIndex>,
    whitelist: Arc<SignatureWhitelist>,
}

impl JavaScopeProvider {
    pub fn new(mapping: Arc<JavaClassMapping>, index: Arc<JavaClassIndex>, whitelist: Arc<SignatureWhitelist>) -> Self {
        JavaScopeProvider {
            mapping,
            index,
            whitelist,
        }
    }

    fn mapped_scope(
        &self,
        session: &FirSession,
        class_id: &ClassId,
        info: &JavaClassInfo,
    ) -> Option<Arc<dyn FirScope>> {
        let kotlin = self.mapping.to_kotlin(&info.internal_name)?;
        let signatures = self.whitelist.signatures_by_name(session.interner(), session, class_id);
        if signatures.is_empty() {
            return None;
        }
        let declared = session.declared_member_scope(class_id)?;
        let Some(mapped) = session.use_site_scope(kotlin) else {
            tracing::debug!(
                class = %info.internal_name,
                kotlin = %kotlin.render(session),
                "mapped Kotlin class is not registered",
            );
            return None;
        };
        Some(Arc::new(JavaClassMappedScope::new(
            declared,
            mapped,
            signatures,
            Arc::clone(&self.mapping),
            Arc::clone(&self.index),
        )))
    }

    fn use_site_scope(
        &self,
        session: &FirSession,
        class_id: &ClassId,
        info: &JavaClassInfo,
    ) -> Option<Arc<dyn FirScope>> {
        let declared = session.declared_member_scope(class_id)?;
        let supertypes = info
            .supertypes
            .iter()
            .filter_map(|supertype| {
                if session.class_symbol(&supertype.java).is_some() {
                    session.use_site_scope(&supertype.java)
                } else {
                    supertype.mapped.as_ref().and_then(|kotlin| session.use_site_scope(kotlin))
                }
            })
            .collect();
        Some(Arc::new(JavaClassUseSiteMemberScope::new(
            declared,
            supertypes,
            Arc::clone(&self.mapping),
        )))
    }
}

impl ClassScopeProvider for JavaScopeProvider {
    fn use_site_scope(&self, session: &FirSession, class: &FirRegularClass) -> Option<Arc<dyn FirScope>> {
        if class.origin() != DeclarationOrigin::Java {
            return None;
        }
        let class_id = class.class_id();
        let info = self.index.get(class_id)?;
        let _guard = BuildGuard::enter(class_id)?;
        ensure_at_least(session, info.decl, ResolvePhase::Types);
        if let Some(scope) = self.mapped_scope(session, class_id, &info) {
            tracing::trace!(class = %info.internal_name, "mapped Java scope");
            return Some(scope);
        }
        self.use_site_scope(session, class_id, &info)
    }
}
