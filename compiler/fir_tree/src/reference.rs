//! Callee references.

use crate::{FirSymbol, Name};

/// What a call or access refers to.
///
/// Starts as `Simple` (a bare name from source) and becomes `Resolved` or
/// `Error` during body resolution.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum FirReference {
    Simple(Name),
    Resolved { name: Name, symbol: FirSymbol },
    Error { name: Name, reason: String },
    /// `this` or `this@label`.
    This { label: Option<Name> },
    /// Placeholder for nodes that have no callee yet.
    #[default]
    Stub,
}

impl FirReference {
    pub fn name(&self) -> Option<Name> {
        match self {
            FirReference::Simple(name)
            | FirReference::Resolved { name, .. }
            | FirReference::Error { name, .. } => Some(*name),
            FirReference::This { .. } | FirReference::Stub => None,
        }
    }

    pub fn resolved_symbol(&self) -> Option<&FirSymbol> {
        match self {
            FirReference::Resolved { symbol, .. } => Some(symbol),
            _ => None,
        }
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        matches!(self, FirReference::Resolved { .. })
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, FirReference::Error { .. })
    }
}
