use fir_tree::{ClassifierSymbol, Name, TypeParameterSymbol};
use smallvec::SmallVec;

use super::{FirScope, LookupPosition, ProcessorAction};
use crate::FirSession;

/// Type parameters of one class or callable.
pub struct FirTypeParameterScope {
    parameters: SmallVec<[TypeParameterSymbol; 2]>,
}

impl FirTypeParameterScope {
    pub fn new(parameters: impl IntoIterator<Item = TypeParameterSymbol>) -> Self {
        FirTypeParameterScope {
            parameters: parameters.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl FirScope for FirTypeParameterScope {
    fn process_classifiers_by_name(
        &self,
        _session: &FirSession,
        name: Name,
        _position: LookupPosition,
        processor: &mut dyn FnMut(ClassifierSymbol) -> ProcessorAction,
    ) -> ProcessorAction {
        for parameter in self.parameters.iter().filter(|p| p.name == name) {
            if processor(ClassifierSymbol::TypeParameter(parameter.clone())).is_stop() {
                return ProcessorAction::Stop;
            }
        }
        ProcessorAction::Next
    }
}
