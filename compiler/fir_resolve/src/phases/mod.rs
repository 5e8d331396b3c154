//! Phased resolution.
//!
//! Every declaration carries the phase it has reached. [`resolve_to`] moves
//! one declaration forward through every phase up to a target, running the
//! phase transformers in order and resolving its containers first (the file
//! to `Imports`, enclosing classes to `Types`). Anything can ask for any
//! declaration at any phase; work already done is never redone.
//!
//! A phase transformer checks the declaration out of the table, rewrites it
//! and checks it back in. Asking for a declaration that is checked out fails
//! with [`ResolveError::DeclarationInUse`]: the caller is inside that
//! declaration's own resolution, which is how recursive implicit types and
//! supertype cycles are noticed.
//!
//! Phase transformers only rewrite the header of the one declaration they
//! are given. Walking into members is [`resolve_tree`]'s job.

mod imports;
mod scopes;
mod status;
mod supertypes;
mod types;

use fir_tree::{ConeErrorKind, ConeType, DeclId, FirDeclaration, ResolvePhase};

pub(crate) use scopes::callable_scopes;
#[cfg(test)]
pub(crate) use scopes::file_scopes;

use crate::cancellation::{CancellationCheck, NeverCancelled};
use crate::diagnostics::DiagnosticKind;
use crate::stack::ensure_sufficient_stack;
use crate::{FirSession, ResolveError};

/// Resolve `id` until it has reached `target`.
pub fn resolve_to(session: &FirSession, id: DeclId, target: ResolvePhase) -> Result<(), ResolveError> {
    ensure_sufficient_stack(|| {
        let current = session
            .declarations()
            .phase(id)
            .ok_or(ResolveError::UnknownDeclaration(id))?;
        if current >= target {
            return Ok(());
        }
        ensure_containers(session, id, target)?;
        let mut phase = current;
        while let Some(next) = phase.next().filter(|next| *next <= target) {
            run_phase(session, id, next)?;
            phase = next;
        }
        Ok(())
    })
}

/// [`resolve_to`] for callers that only need the declaration to be as far
/// along as possible. Recursion into a declaration that is being resolved
/// is not an error here.
pub fn ensure_at_least(session: &FirSession, id: DeclId, target: ResolvePhase) -> bool {
    match resolve_to(session, id, target) {
        Ok(()) => true,
        Err(ResolveError::DeclarationInUse(in_use)) => {
            tracing::trace!(id = id.raw(), in_use = in_use.raw(), %target, "declaration in use");
            false
        }
        Err(error) => {
            tracing::debug!(id = id.raw(), %error, "lazy resolution failed");
            false
        }
    }
}

fn ensure_containers(session: &FirSession, id: DeclId, target: ResolvePhase) -> Result<(), ResolveError> {
    let Some(designation) = session.declarations().designation(id) else {
        return Err(ResolveError::UnknownDeclaration(id));
    };
    if let Some(file) = designation.file {
        resolve_to(session, file, target.min(ResolvePhase::Imports))?;
    }
    for class in designation.classes {
        resolve_to(session, class, target.min(ResolvePhase::Types))?;
    }
    Ok(())
}

fn run_phase(session: &FirSession, id: DeclId, phase: ResolvePhase) -> Result<(), ResolveError> {
    match phase {
        ResolvePhase::RawFir => Ok(()),
        ResolvePhase::Imports => imports::resolve_imports(session, id),
        ResolvePhase::SuperTypes => supertypes::resolve_supertypes(session, id),
        ResolvePhase::Types => types::resolve_types(session, id),
        ResolvePhase::Status => status::resolve_status(session, id),
        ResolvePhase::ImplicitTypesBodyResolve => crate::body::resolve_implicit_types(session, id),
        ResolvePhase::BodyResolve => crate::body::resolve_body(session, id),
    }
}

/// Check `id` out, rewrite it with `f` and check it back in at `phase`.
///
/// A declaration that already reached `phase` is left alone.
pub(crate) fn transform_in_table(
    session: &FirSession,
    id: DeclId,
    phase: ResolvePhase,
    f: impl FnOnce(FirDeclaration) -> FirDeclaration,
) -> Result<(), ResolveError> {
    let table = session.declarations();
    let current = table.phase(id).ok_or(ResolveError::UnknownDeclaration(id))?;
    if current >= phase {
        return Ok(());
    }
    let declaration = table.checkout(id)?;
    let mut declaration = f(declaration);
    declaration.replace_resolve_phase(phase);
    table.checkin(id, declaration);
    tracing::trace!(id = id.raw(), %phase, "phase reached");
    Ok(())
}

/// Resolve a file and every declaration in it, members included, to `target`.
pub fn resolve_tree(session: &FirSession, file: DeclId, target: ResolvePhase) -> Result<(), ResolveError> {
    resolve_tree_with(session, file, target, &NeverCancelled)
}

/// [`resolve_tree`] polling `cancel` before the file and before each
/// top-level declaration.
#[tracing::instrument(level = "debug", skip_all, fields(file = file.raw(), %target))]
pub(crate) fn resolve_tree_with(
    session: &FirSession,
    file: DeclId,
    target: ResolvePhase,
    cancel: &dyn CancellationCheck,
) -> Result<(), ResolveError> {
    cancel.check()?;
    resolve_to(session, file, target)?;
    let members = session
        .declarations()
        .with(file, |d| d.as_file().map(|f| f.declarations().to_vec()))
        .flatten()
        .unwrap_or_default();
    for member in members {
        cancel.check()?;
        resolve_member_tree(session, member, target)?;
    }
    Ok(())
}

fn resolve_member_tree(session: &FirSession, id: DeclId, target: ResolvePhase) -> Result<(), ResolveError> {
    resolve_to(session, id, target)?;
    let members = session
        .declarations()
        .with(id, |d| d.as_class().map(|c| c.declarations().to_vec()))
        .flatten()
        .unwrap_or_default();
    for member in members {
        resolve_member_tree(session, member, target)?;
    }
    Ok(())
}

/// Report a diagnostic for a type ref that resolved to an error type.
pub(crate) fn report_type_error(session: &FirSession, type_ref: &fir_tree::FirTypeRef, container: DeclId) {
    let Some(ConeType::Error(error)) = type_ref.cone_type() else {
        return;
    };
    let kind = match error.kind {
        ConeErrorKind::Unsupported => DiagnosticKind::UnsupportedType,
        ConeErrorKind::Unresolved => DiagnosticKind::UnresolvedType,
    };
    session.report(kind, error.reason.as_str(), Some(container));
}
