//! The resolution session.
//!
//! A session owns everything one compilation shares across declarations:
//! the interner, the declaration table and symbol provider, memoized
//! scopes, diagnostics, and the pluggable collaborators (inference engine,
//! class-scope providers). Nothing here is a global: two sessions can live
//! side by side and be dropped independently.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use fir_tree::{
    ClassId, DeclId, FirDeclaration, FirRegularClass, LocalSymbolId, Name, SharedInterner,
    StandardClassIds, StringLookup,
};
use parking_lot::RwLock;

use crate::builtin_types::BuiltinTypeCache;
use crate::calls::{InferenceEngine, SimpleInferenceEngine};
use crate::dfa::{DataFlowAnalyzerFactory, NoopDataFlowAnalyzer};
use crate::declarations::DeclarationTable;
use crate::diagnostics::{DiagnosticKind, DiagnosticSink, FirDiagnostic};
use crate::provider::SymbolProvider;
use crate::scopes::{ClassScopeProvider, ScopeCache};
use crate::ResolveConfig;

static NEXT_SESSION_ID: AtomicU32 = AtomicU32::new(0);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(u32);

impl SessionId {
    fn fresh() -> Self {
        SessionId(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Names the resolver fabricates.
#[derive(Clone, Debug)]
pub struct SpecialNames {
    /// Constructors in member scopes.
    pub init: Name,
    /// Implicit lambda parameter.
    pub it: Name,
    pub anonymous: Name,
    pub when_call: Name,
    pub try_call: Name,
    pub compare_to: Name,
    pub not: Name,
    pub invoke: Name,
}

impl SpecialNames {
    fn new(interner: &SharedInterner) -> Self {
        SpecialNames {
            init: interner.intern("<init>"),
            it: interner.intern("it"),
            anonymous: interner.intern("<anonymous>"),
            when_call: StandardClassIds::synthetic_call_name(interner, true),
            try_call: StandardClassIds::synthetic_call_name(interner, false),
            compare_to: interner.intern("compareTo"),
            not: interner.intern("not"),
            invoke: interner.intern("invoke"),
        }
    }
}

pub struct FirSession {
    id: SessionId,
    interner: SharedInterner,
    config: ResolveConfig,
    standard: StandardClassIds,
    special: SpecialNames,
    declarations: DeclarationTable,
    provider: SymbolProvider,
    scopes: ScopeCache,
    builtin_types: Arc<BuiltinTypeCache>,
    diagnostics: DiagnosticSink,
    class_scope_providers: RwLock<Vec<Arc<dyn ClassScopeProvider>>>,
    inference: RwLock<Arc<dyn InferenceEngine>>,
    data_flow: RwLock<Arc<dyn DataFlowAnalyzerFactory>>,
    files: RwLock<Vec<DeclId>>,
    next_local: AtomicU32,
}

impl FirSession {
    /// A session with its own interner and builtin-type cache.
    pub fn new(config: ResolveConfig) -> Self {
        Self::with_shared(SharedInterner::new(), Arc::new(BuiltinTypeCache::new()), config)
    }

    /// A session sharing an interner and a builtin-type cache with others.
    pub fn with_shared(
        interner: SharedInterner,
        builtin_types: Arc<BuiltinTypeCache>,
        config: ResolveConfig,
    ) -> Self {
        let standard = StandardClassIds::new(&interner);
        let special = SpecialNames::new(&interner);
        let session = FirSession {
            id: SessionId::fresh(),
            interner,
            config,
            standard,
            special,
            declarations: DeclarationTable::new(),
            provider: SymbolProvider::new(),
            scopes: ScopeCache::default(),
            builtin_types,
            diagnostics: DiagnosticSink::new(),
            class_scope_providers: RwLock::new(Vec::new()),
            inference: RwLock::new(Arc::new(SimpleInferenceEngine::new())),
            data_flow: RwLock::new(Arc::new(NoopDataFlowAnalyzer)),
            files: RwLock::new(Vec::new()),
            next_local: AtomicU32::new(0),
        };
        if session.config.register_builtins {
            crate::builtins::register_builtins(&session);
        }
        tracing::debug!(session = session.id.raw(), "session created");
        session
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn config(&self) -> &ResolveConfig {
        &self.config
    }

    pub fn standard(&self) -> &StandardClassIds {
        &self.standard
    }

    pub fn special_names(&self) -> &SpecialNames {
        &self.special
    }

    pub fn declarations(&self) -> &DeclarationTable {
        &self.declarations
    }

    pub fn provider(&self) -> &SymbolProvider {
        &self.provider
    }

    pub fn builtin_types(&self) -> &Arc<BuiltinTypeCache> {
        &self.builtin_types
    }

    pub fn diagnostics(&self) -> &DiagnosticSink {
        &self.diagnostics
    }

    pub(crate) fn scope_cache(&self) -> &ScopeCache {
        &self.scopes
    }

    pub fn name(&self, text: &str) -> Name {
        self.interner.intern(text)
    }

    pub fn text(&self, name: Name) -> &str {
        self.interner.lookup(name)
    }

    pub fn new_local_symbol(&self) -> LocalSymbolId {
        LocalSymbolId::from_raw(self.next_local.fetch_add(1, Ordering::Relaxed))
    }

    pub fn inference_engine(&self) -> Arc<dyn InferenceEngine> {
        Arc::clone(&self.inference.read())
    }

    /// Replace the engine used by every body resolver created afterwards.
    pub fn set_inference_engine(&self, engine: Arc<dyn InferenceEngine>) {
        *self.inference.write() = engine;
    }

    pub fn data_flow_factory(&self) -> Arc<dyn DataFlowAnalyzerFactory> {
        Arc::clone(&self.data_flow.read())
    }

    /// Replace the factory whose analyzers receive the notifications of
    /// every body walk started afterwards.
    pub fn set_data_flow_factory(&self, factory: Arc<dyn DataFlowAnalyzerFactory>) {
        *self.data_flow.write() = factory;
    }

    pub fn register_class_scope_provider(&self, provider: Arc<dyn ClassScopeProvider>) {
        self.class_scope_providers.write().push(provider);
    }

    pub(crate) fn class_scope_providers(&self) -> Vec<Arc<dyn ClassScopeProvider>> {
        self.class_scope_providers.read().clone()
    }

    pub(crate) fn register_file(&self, file: DeclId) {
        self.files.write().push(file);
    }

    /// Source files in registration order.
    pub fn files(&self) -> Vec<DeclId> {
        self.files.read().clone()
    }

    pub fn declaration(&self, id: DeclId) -> Option<FirDeclaration> {
        self.declarations.get(id)
    }

    pub fn class_decl_id(&self, class_id: &ClassId) -> Option<DeclId> {
        self.provider.get_symbol_by_lookup_tag(class_id)
    }

    /// Read a class through its lookup tag.
    pub fn with_class<R>(
        &self,
        class_id: &ClassId,
        f: impl FnOnce(&FirRegularClass) -> R,
    ) -> Option<R> {
        let id = self.class_decl_id(class_id)?;
        self.declarations.with(id, |d| d.as_class().map(f)).flatten()
    }

    pub fn report(&self, kind: DiagnosticKind, message: impl Into<String>, container: Option<DeclId>) {
        self.diagnostics.report(FirDiagnostic {
            kind,
            message: message.into(),
            container,
        });
    }

    /// Render a type for messages.
    pub fn render_type(&self, ty: &fir_tree::ConeType) -> String {
        ty.render(&self.interner)
    }
}

impl StringLookup for FirSession {
    fn lookup(&self, name: Name) -> &str {
        self.interner.lookup(name)
    }
}

impl Drop for FirSession {
    fn drop(&mut self) {
        self.builtin_types.forget_session(self.id);
    }
}

impl std::fmt::Debug for FirSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirSession")
            .field("id", &self.id)
            .field("declarations", &self.declarations.len())
            .field("diagnostics", &self.diagnostics.len())
            .finish_non_exhaustive()
    }
}
