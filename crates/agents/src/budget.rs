use std::sync::atomic::{AtomicU32, Ordering};

pub const DEFAULT_MAX_ERROR_COUNT: u32 = 5;

/// Consecutive-failure counter gating the general-knowledge path. Shared by every
/// caller of the owning agent; only a general-knowledge success resets it.
#[derive(Debug)]
pub struct ErrorBudget {
    count: AtomicU32,
    threshold: u32,
}

impl Default for ErrorBudget {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ERROR_COUNT)
    }
}

impl ErrorBudget {
    pub fn new(threshold: u32) -> Self {
        Self {
            count: AtomicU32::new(0),
            threshold,
        }
    }

    /// Returns the count after the increment.
    pub fn increment(&self) -> u32 {
        self.count.fetch_add(1, Ordering::AcqRel).saturating_add(1)
    }

    pub fn reset(&self) {
        self.count.store(0, Ordering::Release);
    }

    pub fn exhausted(&self) -> bool {
        self.count() >= self.threshold
    }

    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Acquire)
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}
