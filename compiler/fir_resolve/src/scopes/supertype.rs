use fir_tree::{ClassId, ConeType, FunctionSymbol, Name, VariableSymbol};

use super::{FirScope, ProcessorAction};
use crate::substitution::Substitutor;
use crate::subtyping::all_supertypes;
use crate::FirSession;

/// Members inherited from every supertype of a class, nearest first.
///
/// Each supertype carries the substitution that maps its type parameters to
/// the arguments the class supplied. A function is hidden by a nearer one
/// whose substituted parameter types are identical; a property by a nearer
/// one with the same name.
pub struct FirSuperTypeScope {
    supertypes: Vec<(ClassId, Substitutor)>,
}

/// Parameter types of a function after substitution.
pub(crate) fn substituted_signature(
    session: &FirSession,
    symbol: FunctionSymbol,
    substitutor: &Substitutor,
) -> Option<Vec<ConeType>> {
    session
        .declarations()
        .with(symbol.0, |d| {
            d.as_function().map(|f| {
                f.value_parameters()
                    .iter()
                    .map(|p| substitutor.substitute(&p.return_type_ref().cone_type_or_error()))
                    .collect()
            })
        })
        .flatten()
}

impl FirSuperTypeScope {
    pub fn for_class(session: &FirSession, class_id: &ClassId) -> Self {
        let supertypes = session
            .with_class(class_id, fir_tree::FirRegularClass::default_type)
            .map(|ty| all_supertypes(session, &ty))
            .unwrap_or_default()
            .into_iter()
            .filter_map(|ty| match ty {
                ConeType::Class(class) => {
                    let substitutor = Substitutor::for_class_type(session, &class);
                    Some((class.lookup_tag, substitutor))
                }
                _ => None,
            })
            .collect();
        FirSuperTypeScope { supertypes }
    }

    pub fn is_empty(&self) -> bool {
        self.supertypes.is_empty()
    }

    /// Inherited functions with the substitution that applies to each.
    /// Already-hidden overrides are skipped.
    pub fn process_functions_with_substitution(
        &self,
        session: &FirSession,
        name: Name,
        processor: &mut dyn FnMut(FunctionSymbol, &Substitutor) -> ProcessorAction,
    ) -> ProcessorAction {
        let mut seen: Vec<Vec<ConeType>> = Vec::new();
        for (class_id, substitutor) in &self.supertypes {
            let Some(scope) = session.declared_member_scope(class_id) else {
                continue;
            };
            for symbol in scope.functions(name) {
                if let Some(signature) = substituted_signature(session, *symbol, substitutor) {
                    if seen.contains(&signature) {
                        continue;
                    }
                    seen.push(signature);
                }
                if processor(*symbol, substitutor).is_stop() {
                    return ProcessorAction::Stop;
                }
            }
        }
        ProcessorAction::Next
    }
}

impl FirScope for FirSuperTypeScope {
    fn process_functions_by_name(
        &self,
        session: &FirSession,
        name: Name,
        processor: &mut dyn FnMut(FunctionSymbol) -> ProcessorAction,
    ) -> ProcessorAction {
        if name == session.special_names().init {
            return ProcessorAction::Next;
        }
        self.process_functions_with_substitution(session, name, &mut |symbol, _| processor(symbol))
    }

    fn process_properties_by_name(
        &self,
        session: &FirSession,
        name: Name,
        processor: &mut dyn FnMut(VariableSymbol) -> ProcessorAction,
    ) -> ProcessorAction {
        for (class_id, _) in &self.supertypes {
            let Some(scope) = session.declared_member_scope(class_id) else {
                continue;
            };
            if scope.has_property(name) {
                return scope.process_properties_by_name(session, name, processor);
            }
        }
        ProcessorAction::Next
    }
}
