//! Edge-triggered celebration pulse.
//!
//! Raised by the refresh controller when today's completed count increases,
//! and cleared a fixed delay later. Operates on wall-clock epoch
//! milliseconds supplied by the caller -- no internal timer.

/// Celebration state with a decay deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CelebrationPulse {
    decay_ms: u64,
    deadline_ms: Option<u64>,
}

impl CelebrationPulse {
    pub fn new(decay_ms: u64) -> Self {
        Self {
            decay_ms,
            deadline_ms: None,
        }
    }

    /// Arm the pulse at `now_ms`. Re-triggering while already active
    /// replaces the deadline: the last trigger wins, so a burst of increases
    /// keeps the pulse alive until one decay past the final one.
    pub fn trigger(&mut self, now_ms: u64) {
        self.deadline_ms = Some(now_ms + self.decay_ms);
    }

    pub fn is_active(&self) -> bool {
        self.deadline_ms.is_some()
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.deadline_ms
    }

    /// Clear the pulse once its deadline has passed. Returns `true` only
    /// when this call performed the active -> inactive transition.
    pub fn expire(&mut self, now_ms: u64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }
}
