//! Cooperative cancellation and wall-clock budgets.
//!
//! Long-running operations (scans, simulations, gate runs) check both at
//! every I/O yield point; in-memory traversal is bounded by depth instead.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::errors::CancelError;

/// Clone-shared cancellation flag.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new token (not cancelled).
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request cancellation. All clones observe it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Err(Cancelled) once cancellation has been requested.
    pub fn check(&self) -> Result<(), CancelError> {
        if self.is_cancelled() {
            Err(CancelError::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Wall-clock budget for a run. Default: 30 seconds.
#[derive(Debug, Clone)]
pub struct Budget {
    started: Instant,
    limit: Duration,
}

impl Budget {
    pub const DEFAULT_MS: u64 = 30_000;

    pub fn new(limit: Duration) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn is_exhausted(&self) -> bool {
        self.elapsed() >= self.limit
    }

    /// Err(Timeout) once the budget has elapsed.
    pub fn check(&self) -> Result<(), CancelError> {
        if self.is_exhausted() {
            Err(CancelError::Timeout {
                elapsed_ms: self.elapsed().as_millis() as u64,
            })
        } else {
            Ok(())
        }
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self::from_millis(Self::DEFAULT_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_propagates_to_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(token.check().is_ok());
        clone.cancel();
        assert!(token.is_cancelled());
        assert!(matches!(token.check(), Err(CancelError::Cancelled)));
    }

    #[test]
    fn zero_budget_is_exhausted() {
        let budget = Budget::from_millis(0);
        assert!(budget.is_exhausted());
        assert!(matches!(budget.check(), Err(CancelError::Timeout { .. })));
    }
}
