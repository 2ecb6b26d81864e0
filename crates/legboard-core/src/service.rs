//! The scoreboard service: one task multiplexing the three timers.
//!
//! The controller and pulse are plain state machines; this is the only place
//! that owns clocks. A single `select!` loop runs the one-second countdown
//! tick, the poll-period refresh tick (which awaits the provider inline, so
//! fetches never overlap), and the celebration decay deadline. Every handler
//! runs to completion before the next branch is polled, so shared state is
//! never observed mid-update. Dropping the shutdown signal tears the whole
//! loop down; no timer outlives it.

use std::time::Duration;

use chrono::{Local, Utc};
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, Instant, MissedTickBehavior};

use crate::celebration::CelebrationPulse;
use crate::clock;
use crate::events::Event;
use crate::provider::SnapshotProvider;
use crate::refresh::RefreshController;

/// Timing knobs for [`ScoreboardService`].
#[derive(Debug, Clone, Copy)]
pub struct ServiceOptions {
    pub poll_period: Duration,
    pub celebration_decay_ms: u64,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            poll_period: Duration::from_secs(180),
            celebration_decay_ms: 1500,
        }
    }
}

/// Caller's end of a running service: the event stream plus a stop signal.
pub struct ServiceHandle {
    pub events: mpsc::UnboundedReceiver<Event>,
    shutdown: watch::Sender<bool>,
}

impl ServiceHandle {
    /// Ask the service loop to exit. Idempotent.
    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
    }
}

/// Owns the refresh controller, celebration pulse, and provider, and drives
/// them from timers until stopped.
pub struct ScoreboardService<P> {
    provider: P,
    controller: RefreshController,
    pulse: CelebrationPulse,
    options: ServiceOptions,
    events: mpsc::UnboundedSender<Event>,
    shutdown: watch::Receiver<bool>,
}

impl<P: SnapshotProvider> ScoreboardService<P> {
    pub fn new(provider: P, options: ServiceOptions) -> (Self, ServiceHandle) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let service = Self {
            provider,
            controller: RefreshController::new(),
            pulse: CelebrationPulse::new(options.celebration_decay_ms),
            options,
            events: event_tx,
            shutdown: shutdown_rx,
        };
        let handle = ServiceHandle {
            events: event_rx,
            shutdown: shutdown_tx,
        };
        (service, handle)
    }

    /// Run until the handle signals stop (or is dropped). The first poll
    /// fires immediately; countdown ticks once per second.
    pub async fn run(mut self) {
        let mut poll = interval(self.options.poll_period);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut countdown = interval(Duration::from_secs(1));
        countdown.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut celebration_deadline: Option<Instant> = None;

        loop {
            tokio::select! {
                _ = poll.tick() => {
                    self.controller.begin();
                    let outcome = self.provider.fetch().await;
                    let now = Utc::now();
                    for event in self.controller.complete(outcome, now) {
                        if matches!(event, Event::LegsCompleted { .. }) {
                            self.pulse.trigger(now_ms());
                            celebration_deadline = Some(
                                Instant::now()
                                    + Duration::from_millis(self.options.celebration_decay_ms),
                            );
                        }
                        let _ = self.events.send(event);
                    }
                }
                _ = countdown.tick() => {
                    let timing = clock::day_timing(&Local::now());
                    let _ = self.events.send(Event::CountdownTick {
                        time_left_label: timing.time_left_label,
                        day_percent: timing.day_percent,
                        at: Utc::now(),
                    });
                }
                _ = sleep_until_opt(celebration_deadline), if celebration_deadline.is_some() => {
                    if self.pulse.expire(now_ms()) {
                        celebration_deadline = None;
                        let _ = self.events.send(Event::CelebrationEnded { at: Utc::now() });
                    } else if let Some(deadline_ms) = self.pulse.deadline_ms() {
                        // Wall clock trails the monotonic timer; re-arm for
                        // the remainder.
                        let remaining = deadline_ms.saturating_sub(now_ms()).max(1);
                        celebration_deadline =
                            Some(Instant::now() + Duration::from_millis(remaining));
                    } else {
                        celebration_deadline = None;
                    }
                }
                changed = self.shutdown.changed() => {
                    // A send of `true` or a dropped handle both end the loop.
                    if changed.is_err() || *self.shutdown.borrow() {
                        break;
                    }
                }
            }
        }
    }
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::SyntheticProvider;
    use crate::snapshot::Snapshot;

    fn options() -> ServiceOptions {
        ServiceOptions {
            poll_period: Duration::from_millis(10),
            celebration_decay_ms: 1500,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn emits_refreshes_and_eventually_celebrates() {
        let provider = SyntheticProvider::seeded(Snapshot::sample(), 13, 7);
        let (service, mut handle) = ScoreboardService::new(provider, options());
        let runner = tokio::spawn(service.run());

        let mut refreshes = 0;
        let mut celebrated = false;
        while let Some(event) = handle.events.recv().await {
            match event {
                Event::SnapshotRefreshed { .. } => refreshes += 1,
                Event::LegsCompleted { from, to, .. } => {
                    assert!(to > from);
                    celebrated = true;
                    break;
                }
                _ => {}
            }
            if refreshes > 200 {
                break;
            }
        }

        assert!(celebrated, "synthetic data never produced an increase");
        handle.stop();
        runner.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_ticks_once_per_second() {
        let provider = SyntheticProvider::seeded(Snapshot::sample(), 13, 3);
        let (service, mut handle) = ScoreboardService::new(provider, options());
        let runner = tokio::spawn(service.run());

        let mut ticks = 0;
        while let Some(event) = handle.events.recv().await {
            if let Event::CountdownTick { time_left_label, day_percent, .. } = event {
                assert_eq!(time_left_label.len(), 8);
                assert!((0.0..=100.0).contains(&day_percent));
                ticks += 1;
                if ticks == 3 {
                    break;
                }
            }
        }

        handle.stop();
        runner.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_loop() {
        let provider = SyntheticProvider::seeded(Snapshot::sample(), 13, 5);
        let (service, handle) = ScoreboardService::new(provider, options());
        let runner = tokio::spawn(service.run());
        drop(handle);
        runner.await.unwrap();
    }
}
