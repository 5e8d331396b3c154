//! Whole-session driver.

use fir_tree::ResolvePhase;

use crate::cancellation::CancellationCheck;
use crate::diagnostics::FirDiagnostic;
use crate::phases::resolve_tree_with;
use crate::{FirSession, ResolveError};

/// What a completed pass did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolveSummary {
    pub files: usize,
    /// Declarations registered in the session, builtins included.
    pub declarations: usize,
    /// Every diagnostic reported so far, in report order.
    pub diagnostics: Vec<FirDiagnostic>,
}

impl ResolveSummary {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Run every phase, in order, over every registered file.
///
/// All files reach one phase before any file starts the next. `cancel` is
/// polled before each file and each top-level declaration; a cancelled pass
/// returns [`ResolveError::Cancelled`] and keeps whatever was already done.
pub fn resolve_files(session: &FirSession, cancel: &dyn CancellationCheck) -> Result<ResolveSummary, ResolveError> {
    let files = session.files();
    let _span = tracing::info_span!("resolve_files", session = session.id().raw(), files = files.len()).entered();
    for phase in ResolvePhase::ALL.into_iter().skip(1) {
        tracing::debug!(%phase, "phase start");
        for &file in &files {
            resolve_tree_with(session, file, phase, cancel)?;
        }
    }
    let summary = ResolveSummary {
        files: files.len(),
        declarations: session.declarations().len(),
        diagnostics: session.diagnostics().snapshot(),
    };
    tracing::info!(diagnostics = summary.diagnostics.len(), "resolution finished");
    Ok(summary)
}
