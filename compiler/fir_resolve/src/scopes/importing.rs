//! File-level scopes: package members, star imports and explicit imports.

use fir_tree::{
    ClassId, ClassLikeSymbol, ClassifierSymbol, FirDeclaration, FirImport, FirResolvedImport,
    FqName, FunctionSymbol, Name, VariableSymbol,
};
use smallvec::SmallVec;

use super::{FirScope, LookupPosition, ProcessorAction};
use crate::FirSession;

fn top_level_functions(session: &FirSession, package: &FqName, name: Name) -> SmallVec<[FunctionSymbol; 2]> {
    session
        .provider()
        .top_level_callables(package, name)
        .into_iter()
        .filter(|id| {
            session
                .declarations()
                .with(*id, |d| matches!(d, FirDeclaration::SimpleFunction(_)))
                .unwrap_or(false)
        })
        .map(FunctionSymbol)
        .collect()
}

fn top_level_properties(session: &FirSession, package: &FqName, name: Name) -> SmallVec<[VariableSymbol; 1]> {
    session
        .provider()
        .top_level_callables(package, name)
        .into_iter()
        .filter(|id| {
            session
                .declarations()
                .with(*id, |d| matches!(d, FirDeclaration::Property(_)))
                .unwrap_or(false)
        })
        .map(VariableSymbol::Property)
        .collect()
}

/// Constructors of `class_id`, found by the class's name.
fn process_class_functions(
    session: &FirSession,
    class_id: &ClassId,
    processor: &mut dyn FnMut(FunctionSymbol) -> ProcessorAction,
) -> ProcessorAction {
    for constructor in session.class_constructors(class_id) {
        if processor(constructor).is_stop() {
            return ProcessorAction::Stop;
        }
    }
    ProcessorAction::Next
}

fn process_all<T: Copy>(
    items: &[T],
    processor: &mut dyn FnMut(T) -> ProcessorAction,
) -> ProcessorAction {
    for item in items {
        if processor(*item).is_stop() {
            return ProcessorAction::Stop;
        }
    }
    ProcessorAction::Next
}

/// Everything declared at the top level of one package.
pub struct FirPackageMemberScope {
    package: FqName,
}

impl FirPackageMemberScope {
    pub fn new(package: FqName) -> Self {
        FirPackageMemberScope { package }
    }

    pub fn package(&self) -> &FqName {
        &self.package
    }
}

impl FirScope for FirPackageMemberScope {
    fn process_functions_by_name(
        &self,
        session: &FirSession,
        name: Name,
        processor: &mut dyn FnMut(FunctionSymbol) -> ProcessorAction,
    ) -> ProcessorAction {
        if process_all(&top_level_functions(session, &self.package, name), processor).is_stop() {
            return ProcessorAction::Stop;
        }
        process_class_functions(session, &ClassId::top_level(self.package.clone(), name), processor)
    }

    fn process_properties_by_name(
        &self,
        session: &FirSession,
        name: Name,
        processor: &mut dyn FnMut(VariableSymbol) -> ProcessorAction,
    ) -> ProcessorAction {
        process_all(&top_level_properties(session, &self.package, name), processor)
    }

    fn process_classifiers_by_name(
        &self,
        session: &FirSession,
        name: Name,
        _position: LookupPosition,
        processor: &mut dyn FnMut(ClassifierSymbol) -> ProcessorAction,
    ) -> ProcessorAction {
        let class_id = ClassId::top_level(self.package.clone(), name);
        match session.class_symbol(&class_id) {
            Some(class) => processor(ClassifierSymbol::Class(class)),
            None => ProcessorAction::Next,
        }
    }
}

/// `import a.b.*` for packages and for classes (`import a.b.Outer.*`).
///
/// Also serves the default imports every file gets.
pub struct FirExplicitStarImportingScope {
    imports: Vec<FirResolvedImport>,
}

impl FirExplicitStarImportingScope {
    pub fn new(imports: Vec<FirResolvedImport>) -> Self {
        FirExplicitStarImportingScope { imports }
    }

    /// Star imports of a file that resolved.
    pub fn for_imports(imports: &[FirImport]) -> Self {
        Self::new(
            imports
                .iter()
                .filter(|i| i.is_all_under())
                .filter_map(|i| i.resolved().cloned())
                .collect(),
        )
    }

    /// Star imports of whole packages, e.g. the default `kotlin.*`.
    pub fn for_packages(packages: impl IntoIterator<Item = FqName>) -> Self {
        Self::new(
            packages
                .into_iter()
                .map(|package_fq_name| FirResolvedImport {
                    package_fq_name,
                    relative_class_name: None,
                })
                .collect(),
        )
    }

    fn member_class(import: &FirResolvedImport, name: Name) -> ClassId {
        match &import.relative_class_name {
            Some(relative) => ClassId::new(import.package_fq_name.clone(), relative.child(name), false),
            None => ClassId::top_level(import.package_fq_name.clone(), name),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }
}

impl FirScope for FirExplicitStarImportingScope {
    fn process_functions_by_name(
        &self,
        session: &FirSession,
        name: Name,
        processor: &mut dyn FnMut(FunctionSymbol) -> ProcessorAction,
    ) -> ProcessorAction {
        for import in &self.imports {
            if import.relative_class_name.is_none() {
                let functions = top_level_functions(session, &import.package_fq_name, name);
                if process_all(&functions, processor).is_stop() {
                    return ProcessorAction::Stop;
                }
            }
            let class_id = Self::member_class(import, name);
            if process_class_functions(session, &class_id, processor).is_stop() {
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
        for import in self.imports.iter().filter(|i| i.relative_class_name.is_none()) {
            let properties = top_level_properties(session, &import.package_fq_name, name);
            if process_all(&properties, processor).is_stop() {
                return ProcessorAction::Stop;
            }
        }
        ProcessorAction::Next
    }

    fn process_classifiers_by_name(
        &self,
        session: &FirSession,
        name: Name,
        _position: LookupPosition,
        processor: &mut dyn FnMut(ClassifierSymbol) -> ProcessorAction,
    ) -> ProcessorAction {
        for import in &self.imports {
            let class_id = Self::member_class(import, name);
            if let Some(class) = session.class_symbol(&class_id) {
                if processor(ClassifierSymbol::Class(class)).is_stop() {
                    return ProcessorAction::Stop;
                }
            }
        }
        ProcessorAction::Next
    }
}

struct ExplicitImport {
    /// The alias if there is one, otherwise the imported short name.
    visible_name: Name,
    imported_name: Name,
    resolved: FirResolvedImport,
}

/// `import a.b.C` and `import a.b.foo as bar`.
pub struct FirExplicitImportingScope {
    imports: Vec<ExplicitImport>,
}

impl FirExplicitImportingScope {
    pub fn for_imports(imports: &[FirImport]) -> Self {
        let imports = imports
            .iter()
            .filter(|i| !i.is_all_under())
            .filter_map(|i| {
                let imported_name = i.imported_fq_name().short_name()?;
                Some(ExplicitImport {
                    visible_name: i.alias().unwrap_or(imported_name),
                    imported_name,
                    resolved: i.resolved()?.clone(),
                })
            })
            .collect();
        FirExplicitImportingScope { imports }
    }

    fn matching(&self, name: Name) -> impl Iterator<Item = &ExplicitImport> {
        self.imports.iter().filter(move |i| i.visible_name == name)
    }

    fn imported_class(import: &ExplicitImport) -> Option<ClassId> {
        import.resolved.relative_class_name.as_ref().map(|relative| {
            ClassId::new(import.resolved.package_fq_name.clone(), relative.clone(), false)
        })
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }
}

impl FirScope for FirExplicitImportingScope {
    fn process_functions_by_name(
        &self,
        session: &FirSession,
        name: Name,
        processor: &mut dyn FnMut(FunctionSymbol) -> ProcessorAction,
    ) -> ProcessorAction {
        for import in self.matching(name) {
            let action = match Self::imported_class(import) {
                Some(class_id) => process_class_functions(session, &class_id, processor),
                None => {
                    let functions =
                        top_level_functions(session, &import.resolved.package_fq_name, import.imported_name);
                    process_all(&functions, processor)
                }
            };
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
        for import in self.matching(name).filter(|i| i.resolved.relative_class_name.is_none()) {
            let properties =
                top_level_properties(session, &import.resolved.package_fq_name, import.imported_name);
            if process_all(&properties, processor).is_stop() {
                return ProcessorAction::Stop;
            }
        }
        ProcessorAction::Next
    }

    fn process_classifiers_by_name(
        &self,
        session: &FirSession,
        name: Name,
        _position: LookupPosition,
        processor: &mut dyn FnMut(ClassifierSymbol) -> ProcessorAction,
    ) -> ProcessorAction {
        for import in self.matching(name) {
            let Some(class_id) = Self::imported_class(import) else {
                continue;
            };
            if session.class_symbol(&class_id).is_some()
                && processor(ClassifierSymbol::Class(ClassLikeSymbol(class_id))).is_stop()
            {
                return ProcessorAction::Stop;
            }
        }
        ProcessorAction::Next
    }
}
