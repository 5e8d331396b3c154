use std::sync::Arc;

use fir_resolve::scopes::{FirClassDeclaredMemberScope, FirScope, LookupPosition, ProcessorAction};
use fir_resolve::FirSession;
use fir_tree::{ClassifierSymbol, FunctionSymbol, Name, VariableSymbol};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::descriptor_of;
use crate::loader::JavaClassIndex;
use crate::type_mapping::JavaClassMapping;

/// Members of a Java class that Kotlin sees as a Kotlin class.
///
/// Functions come from the Kotlin class. For names on the allow-list, the
/// Java class's own methods whose descriptor is listed come first; other
/// Java overloads of that name stay hidden. Properties always come from
/// the Kotlin class.
///
/// When a listed Java method has an arity no Kotlin function of the same
/// name has, both are exposed as they are and the name is flagged in the
/// class index; see [`JavaClassIndex::has_divergent_arity`].
pub struct JavaClassMappedScope {
    declared: Arc<FirClassDeclaredMemberScope>,
    mapped: Arc<dyn FirScope>,
    /// `name(params)ret` strings allowed through, by method name.
    whitelist: FxHashMap<Name, Vec<String>>,
    mapping: Arc<JavaClassMapping>,
    index: Arc<JavaClassIndex>,
}

impl JavaClassMappedScope {
    pub fn new(
        declared: Arc<FirClassDeclaredMemberScope>,
        mapped: Arc<dyn FirScope>,
        whitelist: FxHashMap<Name, Vec<String>>,
        mapping: Arc<JavaClassMapping>,
        index: Arc<JavaClassIndex>,
    ) -> Self {
        JavaClassMappedScope {
            declared,
            mapped,
            whitelist,
            mapping,
            index,
        }
    }

    fn check_arity(&self, session: &FirSession, name: Name, admitted: &[usize]) {
        let class_id = self.declared.class_id();
        if admitted.is_empty() || self.index.has_divergent_arity(class_id, name) {
            return;
        }
        let mut mapped_arities: SmallVec<[usize; 4]> = SmallVec::new();
        self.mapped.process_functions_by_name(session, name, &mut |symbol| {
            if let Some(descriptor) = descriptor_of(session, &self.mapping, symbol) {
                mapped_arities.push(descriptor.arity());
            }
            ProcessorAction::Next
        });
        if mapped_arities.is_empty() {
            return;
        }
        if admitted.iter().any(|arity| !mapped_arities.contains(arity)) {
            let class = class_id.render(session);
            tracing::warn!(
                %class,
                name = session.text(name),
                ?admitted,
                mapped = ?mapped_arities,
                "allow-listed Java method and Kotlin function differ in arity; exposing both",
            );
            self.index.flag_divergent_arity(class_id.clone(), name);
        }
    }
}

impl FirScope for JavaClassMappedScope {
    fn process_functions_by_name(
        &self,
        session: &FirSession,
        name: Name,
        processor: &mut dyn FnMut(FunctionSymbol) -> ProcessorAction,
    ) -> ProcessorAction {
        let Some(signatures) = self.whitelist.get(&name) else {
            return self.mapped.process_functions_by_name(session, name, processor);
        };
        let mut admitted: SmallVec<[usize; 2]> = SmallVec::new();
        for symbol in self.declared.functions(name) {
            let Some(descriptor) = descriptor_of(session, &self.mapping, *symbol) else {
                continue;
            };
            if !signatures.contains(&descriptor.to_string()) {
                continue;
            }
            admitted.push(descriptor.arity());
            if processor(*symbol).is_stop() {
                return ProcessorAction::Stop;
            }
        }
        self.check_arity(session, name, &admitted);
        self.mapped.process_functions_by_name(session, name, processor)
    }

    fn process_properties_by_name(
        &self,
        session: &FirSession,
        name: Name,
        processor: &mut dyn FnMut(VariableSymbol) -> ProcessorAction,
    ) -> ProcessorAction {
        self.mapped.process_properties_by_name(session, name, processor)
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
