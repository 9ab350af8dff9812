//! Non-reentrant transaction guard.

use std::sync::atomic::{AtomicBool, Ordering};

use super::error::LedgerError;

#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    held: AtomicBool,
}

/// Releases the guard on drop.
#[derive(Debug)]
pub struct GuardToken<'a> {
    held: &'a AtomicBool,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        ReentrancyGuard {
            held: AtomicBool::new(false),
        }
    }

    /// Take the guard, failing immediately if it is already held.
    pub fn enter(&self) -> Result<GuardToken<'_>, LedgerError> {
        self.held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| LedgerError::ReentrantCall)?;
        Ok(GuardToken { held: &self.held })
    }
}

impl Drop for GuardToken<'_> {
    fn drop(&mut self) {
        self.held.store(false, Ordering::Release);
    }
}
