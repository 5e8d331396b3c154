use fir_tree::{ClassKind, DeclId, FirDeclaration, FirDeclarationStatus, Modality, ResolvePhase, Visibility};

use super::transform_in_table;
use crate::{FirSession, ResolveError};

/// Fill in what the declaration left unsaid: public visibility, and a
/// modality that depends on where the declaration lives.
fn resolved_status(
    status: &FirDeclarationStatus,
    default_modality: Modality,
) -> FirDeclarationStatus {
    FirDeclarationStatus {
        visibility: match status.visibility {
            Visibility::Unknown => Visibility::Public,
            explicit => explicit,
        },
        modality: Some(status.modality.unwrap_or(default_modality)),
        flags: status.flags,
    }
}

/// Members of interfaces are abstract without a body and open with one.
fn member_modality(container: Option<ClassKind>, has_body: bool) -> Modality {
    match container {
        Some(ClassKind::Interface) if has_body => Modality::Open,
        Some(ClassKind::Interface) => Modality::Abstract,
        _ => Modality::Final,
    }
}

pub(super) fn resolve_status(session: &FirSession, id: DeclId) -> Result<(), ResolveError> {
    let container = session
        .declarations()
        .designation(id)
        .and_then(|d| d.innermost_class())
        .and_then(|class| session.declarations().with(class, |d| d.as_class().map(|c| c.class_kind())))
        .flatten();
    transform_in_table(session, id, ResolvePhase::Status, |mut declaration| {
        match &mut declaration {
            FirDeclaration::File(_) => {}
            FirDeclaration::RegularClass(class) => {
                let default = match class.class_kind() {
                    ClassKind::Interface => Modality::Abstract,
                    ClassKind::Class | ClassKind::Object => Modality::Final,
                };
                let status = resolved_status(class.status(), default);
                class.replace_status(status);
            }
            FirDeclaration::SimpleFunction(function) => {
                let default = member_modality(container, function.body().is_some());
                let status = resolved_status(function.status(), default);
                function.replace_status(status);
            }
            FirDeclaration::Property(property) => {
                let default = member_modality(container, property.initializer().is_some());
                let status = resolved_status(property.status(), default);
                property.replace_status(status);
            }
            FirDeclaration::Constructor(constructor) => {
                let status = resolved_status(constructor.status(), Modality::Final);
                constructor.replace_status(status);
            }
        }
        declaration
    })
}
