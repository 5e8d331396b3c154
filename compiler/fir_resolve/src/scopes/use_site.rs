use std::sync::Arc;

use fir_tree::{ClassId, ClassifierSymbol, ConeType, FunctionSymbol, Name, VariableSymbol};

use super::declared_member::FirClassDeclaredMemberScope;
use super::supertype::{substituted_signature, FirSuperTypeScope};
use super::{FirScope, LookupPosition, ProcessorAction};
use crate::substitution::Substitutor;
use crate::FirSession;

/// What an instance of a class exposes: its declared members, then the
/// inherited members they do not override.
pub struct FirClassUseSiteScope {
    declared: Arc<FirClassDeclaredMemberScope>,
    supertypes: FirSuperTypeScope,
}

impl FirClassUseSiteScope {
    pub fn new(session: &FirSession, class_id: &ClassId) -> Option<Self> {
        Some(FirClassUseSiteScope {
            declared: session.declared_member_scope(class_id)?,
            supertypes: FirSuperTypeScope::for_class(session, class_id),
        })
    }
}

impl FirScope for FirClassUseSiteScope {
    fn process_functions_by_name(
        &self,
        session: &FirSession,
        name: Name,
        processor: &mut dyn FnMut(FunctionSymbol) -> ProcessorAction,
    ) -> ProcessorAction {
        let identity = Substitutor::empty();
        let mut declared: Vec<Vec<ConeType>> = Vec::new();
        for symbol in self.declared.functions(name) {
            if let Some(signature) = substituted_signature(session, *symbol, &identity) {
                declared.push(signature);
            }
            if processor(*symbol).is_stop() {
                return ProcessorAction::Stop;
            }
        }
        if name == session.special_names().init {
            return ProcessorAction::Next;
        }
        self.supertypes
            .process_functions_with_substitution(session, name, &mut |symbol, substitutor| {
                let overridden = substituted_signature(session, symbol, substitutor)
                    .is_some_and(|signature| declared.contains(&signature));
                if overridden {
                    ProcessorAction::Next
                } else {
                    processor(symbol)
                }
            })
    }

    fn process_properties_by_name(
        &self,
        session: &FirSession,
        name: Name,
        processor: &mut dyn FnMut(VariableSymbol) -> ProcessorAction,
    ) -> ProcessorAction {
        if self.declared.has_property(name) {
            return self.declared.process_properties_by_name(session, name, processor);
        }
        self.supertypes.process_properties_by_name(session, name, processor)
    }

    fn process_classifiers_by_name(
        &self,
        session: &FirSession,
        name: Name,
        position: LookupPosition,
        processor: &mut dyn FnMut(ClassifierSymbol) -> ProcessorAction,
    ) -> ProcessorAction {
        self.declared
            .process_classifiers_by_name(session, name, position, processor)
    }
}
