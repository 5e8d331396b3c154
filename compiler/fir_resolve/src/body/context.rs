//! Mutable state of one body walk.

use std::sync::Arc;

use fir_tree::{ConeType, DeclId, LocalSymbolId, Name, VariableSymbol};
use rustc_hash::FxHashMap;

use crate::receivers::ImplicitReceiverStack;
use crate::scopes::{FirCompositeScope, FirLocalScope, FirScope};

#[derive(Clone, Debug)]
pub(crate) struct LocalVariable {
    pub ty: ConeType,
    pub is_var: bool,
}

/// A function or lambda that `return` can leave.
#[derive(Debug)]
pub(crate) struct ReturnTarget {
    pub label: Option<Name>,
    pub expected: Option<ConeType>,
    /// Types of the values returned so far.
    pub collected: Vec<ConeType>,
    pub is_lambda: bool,
}

/// Static part of the context, swapped as a whole when the walk enters
/// another declaration.
pub(crate) struct ContainerFrame {
    pub container: Option<DeclId>,
    pub static_levels: Vec<Arc<dyn FirScope>>,
    pub static_scope: Arc<FirCompositeScope>,
    pub receivers: usize,
}

pub(crate) struct BodyResolveContext {
    pub container: Option<DeclId>,
    /// Innermost last.
    pub local_scopes: Vec<FirLocalScope>,
    /// Scopes of the declaration header, innermost first. Each one is a
    /// separate level of call resolution.
    pub static_levels: Vec<Arc<dyn FirScope>>,
    /// `static_levels` searched as one, for types and classifiers.
    pub static_scope: Arc<FirCompositeScope>,
    pub receivers: ImplicitReceiverStack,
    pub locals: FxHashMap<LocalSymbolId, LocalVariable>,
    pub return_targets: Vec<ReturnTarget>,
    pub when_subjects: Vec<ConeType>,
    /// The next block joins the current local scope instead of opening
    /// its own. Set for the body of a `do-while` loop.
    pub inherit_scope: bool,
}

impl BodyResolveContext {
    pub fn new() -> Self {
        BodyResolveContext {
            container: None,
            local_scopes: Vec::new(),
            static_levels: Vec::new(),
            static_scope: Arc::new(FirCompositeScope::new(Vec::new())),
            receivers: ImplicitReceiverStack::new(),
            locals: FxHashMap::default(),
            return_targets: Vec::new(),
            when_subjects: Vec::new(),
            inherit_scope: false,
        }
    }

    /// Switch to `container`, returning what to restore afterwards.
    pub fn enter_container(&mut self, container: DeclId, levels: Vec<Arc<dyn FirScope>>) -> ContainerFrame {
        let static_scope = Arc::new(FirCompositeScope::new(levels.clone()));
        ContainerFrame {
            container: self.container.replace(container),
            static_levels: std::mem::replace(&mut self.static_levels, levels),
            static_scope: std::mem::replace(&mut self.static_scope, static_scope),
            receivers: self.receivers.len(),
        }
    }

    pub fn leave_container(&mut self, frame: ContainerFrame) {
        self.container = frame.container;
        self.static_levels = frame.static_levels;
        self.static_scope = frame.static_scope;
        self.receivers.truncate(frame.receivers);
    }

    pub fn declare_local(&mut self, name: Name, symbol: LocalSymbolId, ty: ConeType, is_var: bool) {
        if let Some(scope) = self.local_scopes.last_mut() {
            scope.store_variable(name, VariableSymbol::Local(symbol));
        }
        self.locals.insert(symbol, LocalVariable { ty, is_var });
    }

    /// The innermost local named `name`.
    pub fn local(&self, name: Name) -> Option<(LocalSymbolId, &LocalVariable)> {
        self.local_scopes.iter().rev().find_map(|scope| match scope.variable(name)? {
            VariableSymbol::Local(id) => self.locals.get(&id).map(|variable| (id, variable)),
            VariableSymbol::Property(_) => None,
        })
    }

    /// Plain `return` leaves the innermost function; `return@label` the
    /// innermost function or lambda carrying `label`.
    pub fn return_target_mut(&mut self, label: Option<Name>) -> Option<&mut ReturnTarget> {
        match label {
            None => self.return_targets.iter_mut().rev().find(|t| !t.is_lambda),
            Some(label) => self.return_targets.iter_mut().rev().find(|t| t.label == Some(label)),
        }
    }
}
