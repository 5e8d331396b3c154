//! User-facing problems found during resolution.
//!
//! Every diagnostic has a counterpart in the tree (an error type or an error
//! reference); the sink only collects them so a host can report all of them
//! after one pass.

use std::fmt;

use fir_tree::DeclId;
use parking_lot::Mutex;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    UnresolvedReference,
    UnresolvedType,
    UnsupportedType,
    InapplicableCandidate,
    AmbiguousCall,
    RecursiveImplicitType,
    UnresolvedImport,
    CyclicSupertypes,
    UnsafeCall,
    NonExhaustiveWhen,
    ValReassignment,
    ThisNotAvailable,
    ReturnNotAllowed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirDiagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// Declaration being resolved when the problem was found.
    pub container: Option<DeclId>,
}

impl fmt::Display for FirDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

#[derive(Debug, Default)]
pub struct DiagnosticSink {
    items: Mutex<Vec<FirDiagnostic>>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self, diagnostic: FirDiagnostic) {
        tracing::debug!(kind = ?diagnostic.kind, message = %diagnostic.message, "diagnostic");
        self.items.lock().push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    pub fn snapshot(&self) -> Vec<FirDiagnostic> {
        self.items.lock().clone()
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> Vec<FirDiagnostic> {
        self.items
            .lock()
            .iter()
            .filter(|d| d.kind == kind)
            .cloned()
            .collect()
    }

    /// Drain everything reported so far.
    pub fn take(&self) -> Vec<FirDiagnostic> {
        std::mem::take(&mut *self.items.lock())
    }
}
