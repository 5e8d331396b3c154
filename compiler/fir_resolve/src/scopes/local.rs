use fir_tree::{Name, VariableSymbol};
use rustc_hash::FxHashMap;

use super::{FirScope, ProcessorAction};
use crate::FirSession;

/// Variables declared in one block, lambda or function header.
///
/// Later declarations shadow earlier ones with the same name.
#[derive(Default)]
pub struct FirLocalScope {
    variables: FxHashMap<Name, VariableSymbol>,
}

impl FirLocalScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store_variable(&mut self, name: Name, symbol: VariableSymbol) {
        self.variables.insert(name, symbol);
    }

    pub fn variable(&self, name: Name) -> Option<VariableSymbol> {
        self.variables.get(&name).copied()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl FirScope for FirLocalScope {
    fn process_properties_by_name(
        &self,
        _session: &FirSession,
        name: Name,
        processor: &mut dyn FnMut(VariableSymbol) -> ProcessorAction,
    ) -> ProcessorAction {
        match self.variable(name) {
            Some(symbol) => processor(symbol),
            None => ProcessorAction::Next,
        }
    }
}
