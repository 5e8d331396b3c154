//! Resolution phases.
//!
//! Every declaration carries the phase it has reached. Phases only move
//! forward; a transformer for phase `P` touches only declarations whose
//! phase is exactly the one before `P`.

use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ResolvePhase {
    /// Straight from the tree builder.
    #[default]
    RawFir,
    /// File imports split into package and class parts.
    Imports,
    /// Class supertypes resolved.
    SuperTypes,
    /// Explicit signature types resolved.
    Types,
    /// Visibility and modality resolved.
    Status,
    /// Omitted return and property types inferred.
    ImplicitTypesBodyResolve,
    /// Bodies fully resolved.
    BodyResolve,
}

impl ResolvePhase {
    pub const ALL: [ResolvePhase; 7] = [
        ResolvePhase::RawFir,
        ResolvePhase::Imports,
        ResolvePhase::SuperTypes,
        ResolvePhase::Types,
        ResolvePhase::Status,
        ResolvePhase::ImplicitTypesBodyResolve,
        ResolvePhase::BodyResolve,
    ];

    /// The phase after this one, or `None` for the last phase.
    pub fn next(self) -> Option<ResolvePhase> {
        let idx = self as usize;
        Self::ALL.get(idx + 1).copied()
    }

    /// The phase before this one, or `None` for `RawFir`.
    pub fn prev(self) -> Option<ResolvePhase> {
        let idx = self as usize;
        idx.checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn name(self) -> &'static str {
        match self {
            ResolvePhase::RawFir => "RAW_FIR",
            ResolvePhase::Imports => "IMPORTS",
            ResolvePhase::SuperTypes => "SUPER_TYPES",
            ResolvePhase::Types => "TYPES",
            ResolvePhase::Status => "STATUS",
            ResolvePhase::ImplicitTypesBodyResolve => "IMPLICIT_TYPES_BODY_RESOLVE",
            ResolvePhase::BodyResolve => "BODY_RESOLVE",
        }
    }
}

impl fmt::Display for ResolvePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests;
