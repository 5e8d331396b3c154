use std::sync::Arc;

use fir_resolve::scopes::{FirClassDeclaredMemberScope, FirScope, LookupPosition, ProcessorAction};
use fir_resolve::FirSession;
use fir_tree::{ClassifierSymbol, FunctionSymbol, Name, VariableSymbol};
use rustc_hash::FxHashSet;

use super::descriptor_of;
use crate::type_mapping::JavaClassMapping;

/// What an instance of a Java class exposes: its declared members, then
/// the members of each supertype scope that no earlier member overrides.
pub struct JavaClassUseSiteMemberScope {
    declared: Arc<FirClassDeclaredMemberScope>,
    /// Use-site scopes of the direct supertypes, in class-file order.
    supertypes: Vec<Arc<dyn FirScope>>,
    mapping: Arc<JavaClassMapping>,
}

impl JavaClassUseSiteMemberScope {
    pub fn new(
        declared: Arc<FirClassDeclaredMemberScope>,
        supertypes: Vec<Arc<dyn FirScope>>,
        mapping: Arc<JavaClassMapping>,
    ) -> Self {
        JavaClassUseSiteMemberScope {
            declared,
            supertypes,
            mapping,
        }
    }
}

impl FirScope for JavaClassUseSiteMemberScope {
    fn process_functions_by_name(
        &self,
        session: &FirSession,
        name: Name,
        processor: &mut dyn FnMut(FunctionSymbol) -> ProcessorAction,
    ) -> ProcessorAction {
        let mut seen: FxHashSet<String> = FxHashSet::default();
        for symbol in self.declared.functions(name) {
            if let Some(descriptor) = descriptor_of(session, &self.mapping, *symbol) {
                seen.insert(descriptor.override_key());
            }
            if processor(*symbol).is_stop() {
                return ProcessorAction::Stop;
            }
        }
        if name == session.special_names().init {
            return ProcessorAction::Next;
        }
        for scope in &self.supertypes {
            let action = scope.process_functions_by_name(session, name, &mut |symbol| {
                match descriptor_of(session, &self.mapping, symbol) {
                    Some(descriptor) if !seen.insert(descriptor.override_key()) => ProcessorAction::Next,
                    _ => processor(symbol),
                }
            });
            if action.is_stop() {
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
        if self.declared.has_property(name) {
            return self.declared.process_properties_by_name(session, name, processor);
        }
        for scope in &self.supertypes {
            let mut found = false;
            let action = scope.process_properties_by_name(session, name, &mut |symbol| {
                found = true;
                processor(symbol)
            });
            if action.is_stop() {
                return ProcessorAction::Stop;
            }
            if found {
                break;
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
        self.declared
            .process_classifiers_by_name(session, name, position, processor)
    }
}
