//! Interned identifiers.
//!
//! A `Name` is a 32-bit handle into a [`StringInterner`](crate::StringInterner).
//! The top four bits select the shard, the remaining 28 bits index into it.

use std::fmt;

/// Interned identifier (simple name, package segment, label).
///
/// Layout:
/// - Bits 31-28: shard index (0-15)
/// - Bits 27-0: index within the shard
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// The empty string, pre-interned in shard 0.
    pub const EMPTY: Name = Name(0);

    /// Largest index a single shard can hand out.
    pub const MAX_LOCAL: u32 = 0x0FFF_FFFF;

    /// Shard count of the interner.
    pub const NUM_SHARDS: usize = 16;

    #[inline]
    pub const fn new(shard: u32, local: u32) -> Self {
        debug_assert!(shard < 16);
        debug_assert!(local <= Self::MAX_LOCAL);
        Name((shard << 28) | local)
    }

    #[inline]
    pub const fn shard(self) -> usize {
        (self.0 >> 28) as usize
    }

    #[inline]
    pub const fn local(self) -> usize {
        (self.0 & Self::MAX_LOCAL) as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({}:{})", self.shard(), self.local())
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shard_and_local_round_trip() {
        let name = Name::new(7, 4242);
        assert_eq!(name.shard(), 7);
        assert_eq!(name.local(), 4242);
        assert_eq!(Name::from_raw(name.raw()), name);
    }

    #[test]
    fn empty_is_default() {
        assert!(Name::default().is_empty());
        assert!(!Name::new(0, 1).is_empty());
    }
}
