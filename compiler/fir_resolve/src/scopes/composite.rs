use std::sync::Arc;

use fir_tree::{ClassifierSymbol, FunctionSymbol, Name, VariableSymbol};

use super::{FirScope, LookupPosition, ProcessorAction};
use crate::FirSession;

/// Several scopes searched in order.
pub struct FirCompositeScope {
    scopes: Vec<Arc<dyn FirScope>>,
}

impl FirCompositeScope {
    pub fn new(scopes: Vec<Arc<dyn FirScope>>) -> Self {
        FirCompositeScope { scopes }
    }
}

impl FirScope for FirCompositeScope {
    fn process_functions_by_name(
        &self,
        session: &FirSession,
        name: Name,
        processor: &mut dyn FnMut(FunctionSymbol) -> ProcessorAction,
    ) -> ProcessorAction {
        for scope in &self.scopes {
            if scope.process_functions_by_name(session, name, processor).is_stop() {
                return ProcessorAction::Stop;
            }
        }
        ProcessorAction::Next
    }

    fn process_properties_by_name(
        &self,
        session: &FirSession,
        name: Name,
        processor: &mut dyn FnMut(VariableSymbol) -> ProcessorAction,
    ) -> ProcessorAction {
        for scope in &self.scopes {
            if scope.process_properties_by_name(session, name, processor).is_stop() {
                return ProcessorAction::Stop;
            }
        }
        ProcessorAction::Next
    }

    fn process_classifiers_by_name(
        &self,
        session: &FirSession,
        name: Name,
        position: LookupPosition,
        processor: &mut dyn FnMut(ClassifierSymbol) -> ProcessorAction,
    ) -> ProcessorAction {
        for scope in &self.scopes {
            if scope
                .process_classifiers_by_name(session, name, position, processor)
                .is_stop()
            {
                return ProcessorAction::Stop;
            }
        }
        ProcessorAction::Next
    }
}
