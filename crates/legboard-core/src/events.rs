use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every state change in the scoreboard produces an Event.
/// Front ends consume the event stream instead of reaching into controller
/// state mid-update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A refresh succeeded and the snapshot was replaced.
    SnapshotRefreshed {
        completed_today: u32,
        ytd_legs: u32,
        at: DateTime<Utc>,
    },
    /// A refresh failed; the previous snapshot stays on display.
    RefreshFailed {
        message: String,
        at: DateTime<Utc>,
    },
    /// Today's completed count increased between two successful refreshes.
    LegsCompleted {
        from: u32,
        to: u32,
        at: DateTime<Utc>,
    },
    /// The celebration pulse decayed back to inactive.
    CelebrationEnded {
        at: DateTime<Utc>,
    },
    /// One-second countdown update.
    CountdownTick {
        time_left_label: String,
        day_percent: f64,
        at: DateTime<Utc>,
    },
}
