//! Host-level failures.
//!
//! Unresolved names, unsupported types and failed calls are not errors in
//! this sense: they become error types in the tree plus a diagnostic. What
//! remains here aborts a resolution pass.

use fir_tree::DeclId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The host's cancellation check fired between two declarations.
    #[error("resolution cancelled")]
    Cancelled,

    #[error("declaration #{} is not registered", .0.raw())]
    UnknownDeclaration(DeclId),

    /// The declaration is checked out for transformation. Phased resolution
    /// treats this as "currently being resolved".
    #[error("declaration #{} is already being transformed", .0.raw())]
    DeclarationInUse(DeclId),
}
