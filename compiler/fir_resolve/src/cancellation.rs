//! Host-injected cancellation.
//!
//! The pipeline polls a [`CancellationCheck`] between top-level declarations,
//! never mid-expression, so a cancelled pass leaves every declaration either
//! untouched or fully advanced to its phase.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::ResolveError;

pub trait CancellationCheck: Sync {
    fn is_cancelled(&self) -> bool;

    /// `Err(Cancelled)` once cancellation was requested.
    fn check(&self) -> Result<(), ResolveError> {
        if self.is_cancelled() {
            Err(ResolveError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// A check that never fires.
#[derive(Copy, Clone, Debug, Default)]
pub struct NeverCancelled;

impl CancellationCheck for NeverCancelled {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Flag a host thread can raise while resolution runs on another.
#[derive(Debug, Default)]
pub struct CancellationFlag {
    cancelled: AtomicBool,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

impl CancellationCheck for CancellationFlag {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Cancels after a fixed number of polls. Handy for exercising cancellation
/// at a precise declaration boundary.
#[derive(Debug)]
pub struct CancelAfter {
    remaining: std::sync::atomic::AtomicUsize,
}

impl CancelAfter {
    pub fn new(polls: usize) -> Self {
        CancelAfter {
            remaining: std::sync::atomic::AtomicUsize::new(polls),
        }
    }
}

impl CancellationCheck for CancelAfter {
    fn is_cancelled(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_fires_after_cancel() {
        let flag = CancellationFlag::new();
        assert_eq!(flag.check(), Ok(()));
        flag.cancel();
        assert_eq!(flag.check(), Err(ResolveError::Cancelled));
    }

    #[test]
    fn cancel_after_counts_polls() {
        let check = CancelAfter::new(2);
        assert!(!check.is_cancelled());
        assert!(!check.is_cancelled());
        assert!(check.is_cancelled());
        assert!(check.is_cancelled());
    }
}
