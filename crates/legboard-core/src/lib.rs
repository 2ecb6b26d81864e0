//! # Legboard Core Library
//!
//! Core engine for the Legboard operations scoreboard: completed flight legs
//! measured against daily, monthly, and yearly targets, with pace
//! classification, projections, and a short-range booking forecast.
//!
//! The library is CLI-first: every operation is reachable from the
//! `legboard` binary, and a GUI would be a thin layer over the same core.
//!
//! ## Architecture
//!
//! - **Snapshot**: the point-in-time state document all consumers derive from
//! - **Metrics**: pure, stateless derivation -- recomputed on demand, never
//!   cached
//! - **Refresh**: a tick-driven controller the async service drives; failures
//!   keep the last good snapshot on display
//! - **Providers**: live HTTP endpoint or the synthetic evolution model,
//!   behind one trait
//!
//! ## Key Components
//!
//! - [`Snapshot`]: scoreboard state and wire format
//! - [`DerivedMetrics`]: averages, capped percentages, pace level
//! - [`RefreshController`]: poll outcome classification and increase detection
//! - [`ScoreboardService`]: the timer loop tying it all together

pub mod celebration;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod evolve;
pub mod metrics;
pub mod provider;
pub mod refresh;
pub mod service;
pub mod snapshot;

pub use celebration::CelebrationPulse;
pub use clock::{day_timing, days_in_month, format_short_date, is_same_local_date, DayTiming};
pub use config::Config;
pub use error::{ConfigError, CoreError, ProviderError};
pub use events::Event;
pub use metrics::{DerivedMetrics, PaceLevel, Targets};
pub use provider::{HttpProvider, SnapshotProvider, SyntheticProvider};
pub use refresh::{RefreshController, RefreshPhase, RefreshState};
pub use service::{ScoreboardService, ServiceHandle, ServiceOptions};
pub use snapshot::{MonthSummary, Projection, Snapshot, UpcomingDay};
