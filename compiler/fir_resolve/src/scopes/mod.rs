//! Name lookup scopes.
//!
//! A scope answers "what does this name mean here" for three kinds of names:
//! functions, properties and classifiers. Lookups feed candidates into a
//! processor one at a time; the processor answers [`ProcessorAction::Stop`]
//! to end the walk early, and `Stop` propagates out of every composite
//! scope unchanged.
//!
//! Scopes never hold the session. Every method receives it, so scopes can
//! be cached inside the session without reference cycles.

mod composite;
mod declared_member;
mod importing;
mod local;
mod nested_classifier;
mod supertype;
mod type_parameter;
mod use_site;

use std::sync::Arc;

use fir_tree::{
    ClassId, ClassLikeSymbol, ClassifierSymbol, FirRegularClass, FunctionSymbol, Name,
    ResolvePhase, VariableSymbol,
};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

pub use composite::FirCompositeScope;
pub use declared_member::FirClassDeclaredMemberScope;
pub use importing::{FirExplicitImportingScope, FirExplicitStarImportingScope, FirPackageMemberScope};
pub use local::FirLocalScope;
pub use nested_classifier::FirNestedClassifierScope;
pub use supertype::FirSuperTypeScope;
pub use type_parameter::FirTypeParameterScope;
pub use use_site::FirClassUseSiteScope;

use crate::FirSession;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProcessorAction {
    Next,
    Stop,
}

impl ProcessorAction {
    #[inline]
    pub fn is_stop(self) -> bool {
        self == ProcessorAction::Stop
    }
}

/// Where a classifier lookup happens. Supertype lists cannot see the
/// nested classes of the class they belong to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LookupPosition {
    #[default]
    Other,
    SuperType,
}

pub trait FirScope: Send + Sync {
    fn process_functions_by_name(
        &self,
        session: &FirSession,
        name: Name,
        processor: &mut dyn FnMut(FunctionSymbol) -> ProcessorAction,
    ) -> ProcessorAction {
        let _ = (session, name, processor);
        ProcessorAction::Next
    }

    fn process_properties_by_name(
        &self,
        session: &FirSession,
        name: Name,
        processor: &mut dyn FnMut(VariableSymbol) -> ProcessorAction,
    ) -> ProcessorAction {
        let _ = (session, name, processor);
        ProcessorAction::Next
    }

    fn process_classifiers_by_name(
        &self,
        session: &FirSession,
        name: Name,
        position: LookupPosition,
        processor: &mut dyn FnMut(ClassifierSymbol) -> ProcessorAction,
    ) -> ProcessorAction {
        let _ = (session, name, position, processor);
        ProcessorAction::Next
    }
}

/// Replaces the default use-site scope for the classes it recognizes.
///
/// Interop layers register one of these on the session; the first provider
/// that returns a scope for a class wins.
pub trait ClassScopeProvider: Send + Sync {
    fn use_site_scope(
        &self,
        session: &FirSession,
        class: &FirRegularClass,
    ) -> Option<Arc<dyn FirScope>>;
}

/// Memoized class scopes.
///
/// Member scopes are cached once the class's supertypes are resolved; before
/// that its member list may still be growing. Use-site scopes also depend on
/// the supertypes of supertypes and wait for the types phase.
#[derive(Default)]
pub struct ScopeCache {
    declared: RwLock<FxHashMap<ClassId, Arc<FirClassDeclaredMemberScope>>>,
    nested: RwLock<FxHashMap<ClassId, Arc<FirNestedClassifierScope>>>,
    use_site: RwLock<FxHashMap<ClassId, Arc<dyn FirScope>>>,
}

fn cached<T: ?Sized>(
    map: &RwLock<FxHashMap<ClassId, Arc<T>>>,
    class_id: &ClassId,
    cacheable: bool,
    build: impl FnOnce() -> Option<Arc<T>>,
) -> Option<Arc<T>> {
    if let Some(scope) = map.read().get(class_id) {
        return Some(Arc::clone(scope));
    }
    let scope = build()?;
    if cacheable {
        map.write()
            .entry(class_id.clone())
            .or_insert_with(|| Arc::clone(&scope));
    }
    Some(scope)
}

impl FirSession {
    fn scopes_cacheable(&self, class_id: &ClassId, phase: ResolvePhase) -> bool {
        self.class_decl_id(class_id)
            .and_then(|id| self.declarations().phase(id))
            .is_some_and(|reached| reached >= phase)
    }

    /// Members declared directly in the class.
    pub fn declared_member_scope(&self, class_id: &ClassId) -> Option<Arc<FirClassDeclaredMemberScope>> {
        let cacheable = self.scopes_cacheable(class_id, ResolvePhase::SuperTypes);
        cached(&self.scope_cache().declared, class_id, cacheable, || {
            FirClassDeclaredMemberScope::new(self, class_id).map(Arc::new)
        })
    }

    pub fn nested_classifier_scope(&self, class_id: &ClassId) -> Option<Arc<FirNestedClassifierScope>> {
        let cacheable = self.scopes_cacheable(class_id, ResolvePhase::SuperTypes);
        cached(&self.scope_cache().nested, class_id, cacheable, || {
            FirNestedClassifierScope::new(self, class_id).map(Arc::new)
        })
    }

    /// Members visible on an instance of the class, inherited ones included.
    pub fn use_site_scope(&self, class_id: &ClassId) -> Option<Arc<dyn FirScope>> {
        let cacheable = self.scopes_cacheable(class_id, ResolvePhase::Types);
        cached(&self.scope_cache().use_site, class_id, cacheable, || {
            let id = self.class_decl_id(class_id)?;
            let class = self.declaration(id)?;
            let class = class.as_class()?;
            for provider in self.class_scope_providers() {
                if let Some(scope) = provider.use_site_scope(self, class) {
                    tracing::trace!(class = %class_id.render(self), "use-site scope from provider");
                    return Some(scope);
                }
            }
            Some(Arc::new(FirClassUseSiteScope::new(self, class_id)?) as Arc<dyn FirScope>)
        })
    }

    /// Constructors declared in the class.
    pub fn class_constructors(&self, class_id: &ClassId) -> Vec<FunctionSymbol> {
        let Some(scope) = self.declared_member_scope(class_id) else {
            return Vec::new();
        };
        let mut constructors = Vec::new();
        scope.process_functions_by_name(self, self.special_names().init, &mut |symbol| {
            constructors.push(symbol);
            ProcessorAction::Next
        });
        constructors
    }

    /// Whether a class is registered under `class_id`.
    pub fn class_symbol(&self, class_id: &ClassId) -> Option<ClassLikeSymbol> {
        self.provider().get_class_like_symbol_by_fq_name(class_id)
    }
}
