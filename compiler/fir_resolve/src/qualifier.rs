//! Dotted-name resolution: `a.b.Outer.Inner` to a class id.

use fir_tree::{ClassId, FirImport, FirResolvedImport, FqName, Name};

use crate::FirSession;

/// Find the class a fully qualified dotted path names.
///
/// The longest prefix that is a known package wins; the rest must walk
/// down through nested classes one segment at a time.
pub fn resolve_qualifier(session: &FirSession, segments: &[Name]) -> Option<ClassId> {
    (0..segments.len()).rev().find_map(|split| {
        let package = FqName::from_segments(segments[..split].iter().copied());
        if !session.provider().has_package(&package) {
            return None;
        }
        let (first, nested) = segments[split..].split_first()?;
        let mut class_id = ClassId::top_level(package, *first);
        session.class_symbol(&class_id)?;
        for name in nested {
            class_id = class_id.create_nested(*name);
            session.class_symbol(&class_id)?;
        }
        Some(class_id)
    })
}

/// Resolve an import directive; `None` if it names nothing known.
pub(crate) fn resolve_import(session: &FirSession, import: &FirImport) -> Option<FirResolvedImport> {
    let fq_name = import.imported_fq_name();
    let as_class = |class_id: ClassId| FirResolvedImport {
        package_fq_name: class_id.package_fq_name().clone(),
        relative_class_name: Some(class_id.relative_class_name().clone()),
    };
    if import.is_all_under() {
        if session.provider().has_package(fq_name) {
            return Some(FirResolvedImport {
                package_fq_name: fq_name.clone(),
                relative_class_name: None,
            });
        }
        return resolve_qualifier(session, fq_name.segments()).map(as_class);
    }
    if let Some(class_id) = resolve_qualifier(session, fq_name.segments()) {
        return Some(as_class(class_id));
    }
    let package = fq_name.parent()?;
    let name = fq_name.short_name()?;
    let has_callable = !session.provider().top_level_callables(&package, name).is_empty();
    has_callable.then_some(FirResolvedImport {
        package_fq_name: package,
        relative_class_name: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FirBuilder, ResolveConfig};
    use pretty_assertions::assert_eq;

    fn session() -> FirSession {
        FirSession::new(ResolveConfig::default().with_builtins(false))
    }

    #[test]
    fn longest_package_prefix_then_nested_classes() {
        let session = session();
        let b = FirBuilder::new(&session);
        let file = b.file("a.kt", "a.b");
        let outer = b.class(file, "Outer").build();
        b.class(outer, "Inner").build();

        let segments: Vec<Name> = ["a", "b", "Outer", "Inner"].iter().map(|s| b.name(s)).collect();
        assert_eq!(
            resolve_qualifier(&session, &segments),
            Some(b.class_id("a/b/Outer.Inner"))
        );
        let missing: Vec<Name> = ["a", "b", "Outer", "Nope"].iter().map(|s| b.name(s)).collect();
        assert_eq!(resolve_qualifier(&session, &missing), None);
    }

    #[test]
    fn imports_of_functions_resolve_to_their_package() {
        let session = session();
        let b = FirBuilder::new(&session);
        let file = b.file("a.kt", "lib");
        b.function(file, "helper").build();

        let import = FirImport::new(b.fq_name("lib.helper"), false, None);
        assert_eq!(
            resolve_import(&session, &import),
            Some(FirResolvedImport {
                package_fq_name: b.fq_name("lib"),
                relative_class_name: None,
            })
        );
        let unknown = FirImport::new(b.fq_name("lib.missing"), false, None);
        assert_eq!(resolve_import(&session, &unknown), None);
    }
}
