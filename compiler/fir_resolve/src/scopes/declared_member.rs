use fir_tree::{
    ClassId, ClassLikeSymbol, ClassifierSymbol, DeclId, FirDeclaration, FunctionSymbol, Name,
    VariableSymbol,
};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::{FirScope, LookupPosition, ProcessorAction};
use crate::FirSession;

type Overloads = SmallVec<[FunctionSymbol; 2]>;

enum MemberKind {
    Function(Name),
    Property(Name),
    Constructor,
    Class(ClassId),
}

/// Members declared directly in one class.
///
/// Own constructors are indexed under `<init>`; constructors of nested
/// classes are indexed under the nested class's name so `Outer.Inner(...)`
/// resolves as a call.
pub struct FirClassDeclaredMemberScope {
    class_id: ClassId,
    functions: FxHashMap<Name, Overloads>,
    properties: FxHashMap<Name, SmallVec<[VariableSymbol; 1]>>,
    classifiers: FxHashMap<Name, ClassLikeSymbol>,
}

fn member_kind(session: &FirSession, id: DeclId) -> Option<MemberKind> {
    session.declarations().with(id, |d| match d {
        FirDeclaration::SimpleFunction(f) => Some(MemberKind::Function(f.name())),
        FirDeclaration::Property(p) => Some(MemberKind::Property(p.name())),
        FirDeclaration::Constructor(_) => Some(MemberKind::Constructor),
        FirDeclaration::RegularClass(c) => Some(MemberKind::Class(c.class_id().clone())),
        FirDeclaration::File(_) => None,
    })?
}

fn member_ids(session: &FirSession, class_id: &ClassId) -> Option<Vec<DeclId>> {
    session.with_class(class_id, |c| c.declarations().to_vec())
}

impl FirClassDeclaredMemberScope {
    pub fn new(session: &FirSession, class_id: &ClassId) -> Option<Self> {
        let members = member_ids(session, class_id)?;
        let init = session.special_names().init;
        let mut scope = FirClassDeclaredMemberScope {
            class_id: class_id.clone(),
            functions: FxHashMap::default(),
            properties: FxHashMap::default(),
            classifiers: FxHashMap::default(),
        };
        for id in members {
            match member_kind(session, id) {
                Some(MemberKind::Function(name)) => {
                    scope.functions.entry(name).or_default().push(FunctionSymbol(id));
                }
                Some(MemberKind::Property(name)) => {
                    scope
                        .properties
                        .entry(name)
                        .or_default()
                        .push(VariableSymbol::Property(id));
                }
                Some(MemberKind::Constructor) => {
                    scope.functions.entry(init).or_default().push(FunctionSymbol(id));
                }
                Some(MemberKind::Class(nested)) => {
                    let name = nested.short_class_name();
                    for member in member_ids(session, &nested).unwrap_or_default() {
                        if matches!(member_kind(session, member), Some(MemberKind::Constructor)) {
                            scope.functions.entry(name).or_default().push(FunctionSymbol(member));
                        }
                    }
                    scope.classifiers.insert(name, ClassLikeSymbol(nested));
                }
                None => {}
            }
        }
        Some(scope)
    }

    pub fn class_id(&self) -> &ClassId {
        &self.class_id
    }

    /// Every function name, constructors included.
    pub fn function_names(&self) -> impl Iterator<Item = Name> + '_ {
        self.functions.keys().copied()
    }

    pub fn functions(&self, name: Name) -> &[FunctionSymbol] {
        self.functions.get(&name).map_or(&[][..], SmallVec::as_slice)
    }

    pub fn has_property(&self, name: Name) -> bool {
        self.properties.contains_key(&name)
    }
}

impl FirScope for FirClassDeclaredMemberScope {
    fn process_functions_by_name(
        &self,
        _session: &FirSession,
        name: Name,
        processor: &mut dyn FnMut(FunctionSymbol) -> ProcessorAction,
    ) -> ProcessorAction {
        for symbol in self.functions(name) {
            if processor(*symbol).is_stop() {
                return ProcessorAction::Stop;
            }
        }
        ProcessorAction::Next
    }

    fn process_properties_by_name(
        &self,
        _session: &FirSession,
        name: Name,
        processor: &mut dyn FnMut(VariableSymbol) -> ProcessorAction,
    ) -> ProcessorAction {
        for symbol in self.properties.get(&name).into_iter().flatten() {
            if processor(*symbol).is_stop() {
                return ProcessorAction::Stop;
            }
        }
        ProcessorAction::Next
    }

    fn process_classifiers_by_name(
        &self,
        _session: &FirSession,
        name: Name,
        _position: LookupPosition,
        processor: &mut dyn FnMut(ClassifierSymbol) -> ProcessorAction,
    ) -> ProcessorAction {
        match self.classifiers.get(&name) {
            Some(class) => processor(ClassifierSymbol::Class(class.clone())),
            None => ProcessorAction::Next,
        }
    }
}
