//! RAII guards for the body resolver's scoped state.
//!
//! Both guards hold `&mut BodyResolveTransformer` and deref to it, so code
//! inside a scoped region uses the transformer as usual. Dropping the guard
//! restores what it pushed, also while unwinding.

use std::ops::{Deref, DerefMut};

use fir_tree::DeclId;

use super::context::ContainerFrame;
use super::BodyResolveTransformer;
use crate::scopes::FirLocalScope;

/// Pops the local scope it pushed when dropped.
///
/// A stack that shrank below the guard's own scope means some nested
/// construct popped scopes it did not push. That is a bug in the walk and
/// panics, unless the thread is already unwinding.
pub struct LocalScopeGuard<'g, 's, 'd> {
    transformer: &'g mut BodyResolveTransformer<'s, 'd>,
    depth: usize,
}

impl Drop for LocalScopeGuard<'_, '_, '_> {
    fn drop(&mut self) {
        let scopes = &mut self.transformer.context.local_scopes;
        let intact = scopes.len() > self.depth;
        scopes.truncate(self.depth);
        if !intact && !std::thread::panicking() {
            panic!("local scope stack shrank below {} inside a scoped region", self.depth);
        }
    }
}

impl<'s, 'd> Deref for LocalScopeGuard<'_, 's, 'd> {
    type Target = BodyResolveTransformer<'s, 'd>;

    fn deref(&self) -> &Self::Target {
        self.transformer
    }
}

impl DerefMut for LocalScopeGuard<'_, '_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.transformer
    }
}

/// Switches back to the previous container when dropped.
pub struct ContainerGuard<'g, 's, 'd> {
    transformer: &'g mut BodyResolveTransformer<'s, 'd>,
    frame: Option<ContainerFrame>,
}

impl Drop for ContainerGuard<'_, '_, '_> {
    fn drop(&mut self) {
        if let Some(frame) = self.frame.take() {
            self.transformer.context.leave_container(frame);
        }
    }
}

impl<'s, 'd> Deref for ContainerGuard<'_, 's, 'd> {
    type Target = BodyResolveTransformer<'s, 'd>;

    fn deref(&self) -> &Self::Target {
        self.transformer
    }
}

impl DerefMut for ContainerGuard<'_, '_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.transformer
    }
}

impl<'s, 'd> BodyResolveTransformer<'s, 'd> {
    /// Open a local scope that lives as long as the returned guard.
    pub fn scoped_local(&mut self) -> LocalScopeGuard<'_, 's, 'd> {
        let depth = self.context.local_scopes.len();
        self.context.local_scopes.push(FirLocalScope::new());
        LocalScopeGuard {
            transformer: self,
            depth,
        }
    }

    /// Make `id` the enclosing declaration for as long as the returned
    /// guard lives: its header scopes become the static levels and its
    /// class becomes the dispatch receiver.
    pub(crate) fn scoped_container(&mut self, id: DeclId) -> ContainerGuard<'_, 's, 'd> {
        let levels = crate::phases::callable_scopes(self.session, id);
        let frame = self.context.enter_container(id, levels);
        self.push_dispatch_receiver(id);
        ContainerGuard {
            transformer: self,
            frame: Some(frame),
        }
    }
}
