//! Last-wins guard for overlapping refreshes.
//!
//! A manual reload can race a timer-driven one; whichever began later
//! owns the display. Each refresh takes a token at the start and checks
//! it before publishing, so a stale fetch that finishes out of order is
//! simply dropped.

use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out monotonically increasing refresh tokens.
#[derive(Debug, Default)]
pub struct ReloadGuard {
    current: AtomicU64,
}

/// Proof of having started a particular refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadToken(u64);

impl ReloadGuard {
    /// Creates a fresh guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a refresh, invalidating every earlier token.
    pub fn begin(&self) -> ReloadToken {
        ReloadToken(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True while no later refresh has begun.
    pub fn is_current(&self, token: ReloadToken) -> bool {
        self.current.load(Ordering::SeqCst) == token.0
    }
}
