//! Refresh controller.
//!
//! A wall-clock state machine in the same shape as the rest of the core: no
//! internal threads or timers, the owning service drives it (`begin` when a
//! poll starts, `complete` with the provider's outcome). State moves
//! `Idle -> Loading -> {Ready, Failed} -> Loading -> ...`.
//!
//! A failed poll never blanks the display: the previous snapshot is kept and
//! only the error string changes. The first successful fetch of a session
//! establishes the baseline and is excluded from increase detection.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ProviderError;
use crate::events::Event;
use crate::snapshot::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshPhase {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Process-local display state, lifecycle = one session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshState {
    pub snapshot: Snapshot,
    pub loading: bool,
    pub error: Option<String>,
    pub last_refreshed: Option<DateTime<Utc>>,
}

/// Owns the current snapshot and classifies poll outcomes.
#[derive(Debug, Clone)]
pub struct RefreshController {
    state: RefreshState,
    phase: RefreshPhase,
    /// True until the first successful fetch establishes a baseline.
    first_load_pending: bool,
}

impl Default for RefreshController {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshController {
    /// Start with a zero snapshot and `loading = true`.
    pub fn new() -> Self {
        Self {
            state: RefreshState {
                snapshot: Snapshot::default(),
                loading: true,
                error: None,
                last_refreshed: None,
            },
            phase: RefreshPhase::Idle,
            first_load_pending: true,
        }
    }

    pub fn state(&self) -> &RefreshState {
        &self.state
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.state.snapshot
    }

    pub fn phase(&self) -> RefreshPhase {
        self.phase
    }

    /// Mark a poll as in flight.
    pub fn begin(&mut self) {
        self.phase = RefreshPhase::Loading;
        self.state.loading = true;
    }

    /// Apply a poll outcome, returning the events it produced.
    ///
    /// On success the snapshot is replaced and, when today's completed count
    /// rose against the previous successful fetch, a [`Event::LegsCompleted`]
    /// follows the refresh event. On failure the snapshot is untouched and a
    /// user-facing error message is stored.
    pub fn complete(
        &mut self,
        outcome: Result<Snapshot, ProviderError>,
        now: DateTime<Utc>,
    ) -> Vec<Event> {
        match outcome {
            Ok(snapshot) => {
                let previous_completed = self.state.snapshot.recently_completed_legs;
                let increased = !self.first_load_pending
                    && snapshot.recently_completed_legs > previous_completed;

                let mut events = vec![Event::SnapshotRefreshed {
                    completed_today: snapshot.recently_completed_legs,
                    ytd_legs: snapshot.ytd_legs,
                    at: now,
                }];
                if increased {
                    events.push(Event::LegsCompleted {
                        from: previous_completed,
                        to: snapshot.recently_completed_legs,
                        at: now,
                    });
                }

                self.state.snapshot = snapshot;
                self.state.loading = false;
                self.state.error = None;
                self.state.last_refreshed = Some(now);
                self.phase = RefreshPhase::Ready;
                self.first_load_pending = false;

                events
            }
            Err(err) => {
                let message = format!("Failed to refresh scoreboard: {err}");
                self.state.loading = false;
                self.state.error = Some(message.clone());
                self.phase = RefreshPhase::Failed;

                vec![Event::RefreshFailed { message, at: now }]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success(completed: u32) -> Result<Snapshot, ProviderError> {
        Ok(Snapshot {
            recently_completed_legs: completed,
            ytd_legs: 3000 + completed,
            ..Snapshot::sample()
        })
    }

    fn celebrations(events: &[Event]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, Event::LegsCompleted { .. }))
            .count()
    }

    #[test]
    fn starts_loading_with_zero_snapshot() {
        let controller = RefreshController::new();
        assert!(controller.state().loading);
        assert_eq!(controller.phase(), RefreshPhase::Idle);
        assert_eq!(controller.snapshot().ytd_legs, 0);
        assert!(controller.state().last_refreshed.is_none());
    }

    #[test]
    fn first_success_never_celebrates() {
        let mut controller = RefreshController::new();
        controller.begin();
        let events = controller.complete(success(5), Utc::now());
        assert_eq!(celebrations(&events), 0);
        assert_eq!(controller.phase(), RefreshPhase::Ready);
        assert!(!controller.state().loading);
        assert!(controller.state().last_refreshed.is_some());
    }

    #[test]
    fn celebrates_only_on_increases() {
        let mut controller = RefreshController::new();
        let mut fired = Vec::new();
        for completed in [5, 5, 7, 7, 9] {
            controller.begin();
            let events = controller.complete(success(completed), Utc::now());
            fired.push(celebrations(&events));
        }
        // Fires exactly on the 5 -> 7 and 7 -> 9 edges.
        assert_eq!(fired, vec![0, 0, 1, 0, 1]);
    }

    #[test]
    fn failure_keeps_previous_snapshot() {
        let mut controller = RefreshController::new();
        controller.begin();
        controller.complete(success(5), Utc::now());
        let before = controller.snapshot().clone();
        let refreshed_at = controller.state().last_refreshed;

        controller.begin();
        let events = controller.complete(
            Err(ProviderError::Status { status: 500 }),
            Utc::now(),
        );

        assert!(matches!(events[0], Event::RefreshFailed { .. }));
        assert_eq!(controller.snapshot(), &before);
        assert_eq!(controller.phase(), RefreshPhase::Failed);
        assert!(controller.state().error.is_some());
        assert_eq!(controller.state().last_refreshed, refreshed_at);
    }

    #[test]
    fn success_after_failure_clears_error() {
        let mut controller = RefreshController::new();
        controller.begin();
        controller.complete(Err(ProviderError::Unauthorized), Utc::now());
        assert!(controller.state().error.is_some());

        controller.begin();
        let events = controller.complete(success(6), Utc::now());
        assert!(controller.state().error.is_none());
        // A first failure does not consume the baseline: this success is the
        // first, so still no celebration.
        assert_eq!(celebrations(&events), 0);
    }

    #[test]
    fn decrease_does_not_celebrate() {
        let mut controller = RefreshController::new();
        controller.begin();
        controller.complete(success(9), Utc::now());
        controller.begin();
        let events = controller.complete(success(3), Utc::now());
        assert_eq!(celebrations(&events), 0);
    }
}
