use fir_tree::{DeclId, FirDeclaration, FirImport, FirTransformer, ResolvePhase};

use super::transform_in_table;
use crate::diagnostics::DiagnosticKind;
use crate::qualifier::resolve_import;
use crate::{FirSession, ResolveError};

struct ImportResolveTransformer<'s> {
    session: &'s FirSession,
    file: DeclId,
}

impl FirTransformer<()> for ImportResolveTransformer<'_> {
    fn transform_import(&mut self, mut import: FirImport, _: ()) -> FirImport {
        let resolved = resolve_import(self.session, &import);
        if resolved.is_none() {
            let rendered = import.imported_fq_name().render(self.session.interner());
            self.session.report(
                DiagnosticKind::UnresolvedImport,
                format!("Unresolved import: {rendered}"),
                Some(self.file),
            );
        }
        import.replace_resolved(resolved);
        import
    }
}

/// Files resolve their imports; everything else just moves on.
pub(super) fn resolve_imports(session: &FirSession, id: DeclId) -> Result<(), ResolveError> {
    transform_in_table(session, id, ResolvePhase::Imports, |mut declaration| {
        if let FirDeclaration::File(file) = &mut declaration {
            file.transform_imports(&mut ImportResolveTransformer { session, file: id }, ());
        }
        declaration
    })
}
