//! Serving liveness flag
//!
//! One shared boolean deciding whether the pipeline does any work at all.
//! The server flips it at startup and during shutdown; requests and encode
//! workers only read it. Loads are relaxed: a worker may observe a flip one
//! scheduling interval late, which costs at most one skipped or wasted
//! encode and never affects correctness.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag gating capture and encode work
///
/// Cloning shares the same flag.
#[derive(Debug, Clone)]
pub struct Liveness {
    active: Arc<AtomicBool>,
}

impl Liveness {
    /// Create a flag with the given initial state
    pub fn new(active: bool) -> Self {
        Self {
            active: Arc::new(AtomicBool::new(active)),
        }
    }

    /// Set whether serving is active
    pub fn set(&self, active: bool) {
        self.active.store(active, Ordering::Relaxed);
    }

    /// Whether serving is currently active
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        assert!(Liveness::new(true).is_active());
        assert!(!Liveness::new(false).is_active());
    }

    #[test]
    fn test_clones_share_state() {
        let liveness = Liveness::new(true);
        let clone = liveness.clone();
        liveness.set(false);
        assert!(!clone.is_active());
        clone.set(true);
        assert!(liveness.is_active());
    }
}
