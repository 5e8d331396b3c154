//! Static scope chains for declaration headers and bodies.
//!
//! Every chain is innermost first, which is the order
//! [`FirCompositeScope`](crate::scopes::FirCompositeScope) searches in.

use std::sync::Arc;

use fir_tree::{DeclId, FirImport, FqName};

use crate::declarations::Designation;
use crate::qualifier::resolve_import;
use crate::scopes::{
    FirExplicitImportingScope, FirExplicitStarImportingScope, FirPackageMemberScope, FirScope,
    FirTypeParameterScope,
};
use crate::FirSession;

/// Scopes a file contributes: explicit imports, its own package, star
/// imports, then the configured default imports.
pub(crate) fn file_scopes(session: &FirSession, file: DeclId) -> Vec<Arc<dyn FirScope>> {
    let Some((package, imports)) = session
        .declarations()
        .with(file, |d| d.as_file().map(|f| (f.package_fq_name().clone(), f.imports().to_vec())))
        .flatten()
    else {
        return Vec::new();
    };

    let config = session.config();
    let default_imports: Vec<FirImport> = config
        .default_imports
        .iter()
        .map(|dotted| {
            let mut import = FirImport::new(FqName::parse(session.interner(), dotted), false, None);
            let resolved = resolve_import(session, &import);
            import.replace_resolved(resolved);
            import
        })
        .collect();
    let default_packages = config
        .default_star_imports
        .iter()
        .map(|dotted| FqName::parse(session.interner(), dotted));

    vec![
        Arc::new(FirExplicitImportingScope::for_imports(&imports)),
        Arc::new(FirPackageMemberScope::new(package)),
        Arc::new(FirExplicitStarImportingScope::for_imports(&imports)),
        Arc::new(FirExplicitImportingScope::for_imports(&default_imports)),
        Arc::new(FirExplicitStarImportingScope::for_packages(default_packages)),
    ]
}

/// Scopes visible in the header of a declaration at `designation`: the
/// type parameters and nested classes of each enclosing class, innermost
/// class first, then the file.
pub(crate) fn header_scopes(session: &FirSession, designation: &Designation) -> Vec<Arc<dyn FirScope>> {
    let mut scopes: Vec<Arc<dyn FirScope>> = Vec::new();
    for class in designation.classes.iter().rev() {
        let Some((class_id, parameters)) = session
            .declarations()
            .with(*class, |d| {
                d.as_class().map(|c| {
                    let parameters: Vec<_> = c.type_parameters().iter().map(|p| p.symbol().clone()).collect();
                    (c.class_id().clone(), parameters)
                })
            })
            .flatten()
        else {
            continue;
        };
        scopes.push(Arc::new(FirTypeParameterScope::new(parameters)));
        if let Some(nested) = session.nested_classifier_scope(&class_id) {
            scopes.push(nested);
        }
    }
    if let Some(file) = designation.file {
        scopes.extend(file_scopes(session, file));
    }
    scopes
}

/// [`header_scopes`] for a function, with its own type parameters in front.
pub(crate) fn callable_scopes(session: &FirSession, id: DeclId) -> Vec<Arc<dyn FirScope>> {
    let designation = session.declarations().designation(id).unwrap_or_default();
    let own = session
        .declarations()
        .with(id, |d| match d {
            fir_tree::FirDeclaration::SimpleFunction(f) => {
                f.type_parameters().iter().map(|p| p.symbol().clone()).collect()
            }
            fir_tree::FirDeclaration::RegularClass(c) => {
                c.type_parameters().iter().map(|p| p.symbol().clone()).collect()
            }
            _ => Vec::new(),
        })
        .unwrap_or_default();
    let mut scopes: Vec<Arc<dyn FirScope>> = vec![Arc::new(FirTypeParameterScope::new(own))];
    scopes.extend(header_scopes(session, &designation));
    scopes
}
