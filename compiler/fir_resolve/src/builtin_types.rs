//! Cross-session cache for implicit builtin type refs.
//!
//! `ImplicitBuiltin(kotlin/Unit)` and friends are resolved by asking the
//! session's symbol provider once and remembering the answer under
//! `(session, class id)`. One cache can serve several sessions; dropping a
//! session forgets its entries.

use std::sync::atomic::{AtomicUsize, Ordering};

use fir_tree::{ClassId, ClassLikeSymbol};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::session::SessionId;
use crate::FirSession;

#[derive(Default)]
pub struct BuiltinTypeCache {
    entries: RwLock<FxHashMap<(SessionId, ClassId), Option<ClassLikeSymbol>>>,
    provider_queries: AtomicUsize,
}

impl BuiltinTypeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn symbol(&self, session: &FirSession, class_id: &ClassId) -> Option<ClassLikeSymbol> {
        let key = (session.id(), class_id.clone());
        if let Some(cached) = self.entries.read().get(&key) {
            return cached.clone();
        }
        let mut entries = self.entries.write();
        entries
            .entry(key)
            .or_insert_with(|| {
                self.provider_queries.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(session = session.id().raw(), "builtin type cache miss");
                session.provider().get_class_like_symbol_by_fq_name(class_id)
            })
            .clone()
    }

    /// How many times the cache had to ask a symbol provider.
    pub fn provider_queries(&self) -> usize {
        self.provider_queries.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub(crate) fn forget_session(&self, session: SessionId) {
        self.entries.write().retain(|(owner, _), _| *owner != session);
    }
}
