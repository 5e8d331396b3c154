use fir_tree::{ClassId, ClassLikeSymbol, ClassifierSymbol, Name};
use rustc_hash::FxHashMap;

use super::{FirScope, LookupPosition, ProcessorAction};
use crate::FirSession;

/// Classes nested directly in one class.
///
/// Invisible from supertype position: `class A : A.Nested()` does not see
/// `Nested` through this scope.
pub struct FirNestedClassifierScope {
    classifiers: FxHashMap<Name, ClassLikeSymbol>,
}

impl FirNestedClassifierScope {
    pub fn new(session: &FirSession, class_id: &ClassId) -> Option<Self> {
        let members = session.with_class(class_id, |c| c.declarations().to_vec())?;
        let classifiers = members
            .into_iter()
            .filter_map(|id| {
                session
                    .declarations()
                    .with(id, |d| d.as_class().map(|c| c.class_id().clone()))
                    .flatten()
            })
            .map(|nested| (nested.short_class_name(), ClassLikeSymbol(nested)))
            .collect();
        Some(FirNestedClassifierScope { classifiers })
    }

    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }
}

impl FirScope for FirNestedClassifierScope {
    fn process_classifiers_by_name(
        &self,
        _session: &FirSession,
        name: Name,
        position: LookupPosition,
        processor: &mut dyn FnMut(ClassifierSymbol) -> ProcessorAction,
    ) -> ProcessorAction {
        if position == LookupPosition::SuperType {
            return ProcessorAction::Next;
        }
        match self.classifiers.get(&name) {
            Some(class) => processor(ClassifierSymbol::Class(class.clone())),
            None => ProcessorAction::Next,
        }
    }
}
