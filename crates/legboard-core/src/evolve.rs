//! Synthetic snapshot evolution.
//!
//! Stand-in data source for environments without a live goal endpoint. Each
//! step perturbs the previous snapshot within believable bounds: legs
//! complete at a coin-flip rate, near-term days pick up bookings faster than
//! far-out ones, and the forecast drifts occasionally.
//!
//! This is the only place in the core that consumes randomness, and the
//! generator is an explicit parameter so tests substitute a seeded one.

use rand::Rng;

use crate::metrics::round2;
use crate::snapshot::{Projection, Snapshot};

/// Chance that one leg completes on a given tick.
const COMPLETION_PROB: f64 = 0.5;

/// Chance of a new booking per upcoming day, indexed by position; days past
/// the table use the last entry.
const BOOKING_PROBS: [f64; 7] = [0.70, 0.50, 0.35, 0.20, 0.20, 0.20, 0.20];

/// Chance of a +-1 forecast drift per upcoming day.
const FORECAST_DRIFT_PROB: f64 = 0.18;

/// Produce the next synthetic snapshot from `prev`.
pub fn next_snapshot<R: Rng + ?Sized>(prev: &Snapshot, daily_target: u32, rng: &mut R) -> Snapshot {
    let mut next = prev.clone();

    if rng.gen_bool(COMPLETION_PROB) {
        next.recently_completed_legs += 1;
        next.ytd_legs += 1;
        next.mtd_legs += 1;
        next.scheduled_legs = next.scheduled_legs.saturating_sub(1);
    }

    let max_planned = daily_target + 6;
    let max_forecast = daily_target + 4;

    for (index, day) in next.upcoming.iter_mut().enumerate() {
        let booking_prob = BOOKING_PROBS
            .get(index)
            .copied()
            .unwrap_or(BOOKING_PROBS[BOOKING_PROBS.len() - 1]);
        if rng.gen_bool(booking_prob) {
            day.planned_legs += 1;
        }

        if rng.gen_bool(FORECAST_DRIFT_PROB) {
            if rng.gen_bool(0.5) {
                day.forecast_legs = day.forecast_legs.saturating_sub(1);
            } else {
                day.forecast_legs += 1;
            }
        }

        day.planned_legs = day.planned_legs.min(max_planned);
        day.forecast_legs = day.forecast_legs.min(max_forecast);

        // Keep the forecast plausible relative to bookings.
        if day.planned_legs > day.forecast_legs + 3 {
            day.forecast_legs = day.planned_legs - 2;
        }
    }

    next.projected_year_end = Some(project_year_end(next.ytd_legs, next.days_elapsed));

    next
}

/// Straight-line year-end projection from the running YTD average.
pub fn project_year_end(ytd_legs: u32, days_elapsed: u32) -> Projection {
    if days_elapsed == 0 {
        return Projection {
            total_legs: 0.0,
            avg_legs: 0.0,
        };
    }
    let avg_legs = round2(ytd_legs as f64 / days_elapsed as f64);
    Projection {
        total_legs: avg_legs * 365.0,
        avg_legs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    const TARGET: u32 = 13;

    #[test]
    fn counters_never_decrease() {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        let mut snap = Snapshot::sample();
        for _ in 0..200 {
            let next = next_snapshot(&snap, TARGET, &mut rng);
            assert!(next.recently_completed_legs >= snap.recently_completed_legs);
            assert!(next.ytd_legs >= snap.ytd_legs);
            assert!(next.mtd_legs >= snap.mtd_legs);
            assert_eq!(
                next.ytd_legs - snap.ytd_legs,
                next.recently_completed_legs - snap.recently_completed_legs
            );
            snap = next;
        }
    }

    #[test]
    fn upcoming_stays_within_bounds() {
        let mut rng = Pcg64Mcg::seed_from_u64(42);
        let mut snap = Snapshot::sample();
        for _ in 0..500 {
            snap = next_snapshot(&snap, TARGET, &mut rng);
            for day in &snap.upcoming {
                assert!(day.planned_legs <= TARGET + 6);
                assert!(day.forecast_legs <= TARGET + 4);
                assert!(day.planned_legs <= day.forecast_legs + 3);
            }
        }
    }

    #[test]
    fn projection_tracks_new_ytd() {
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        let snap = Snapshot::sample();
        let next = next_snapshot(&snap, TARGET, &mut rng);
        let projection = next.projected_year_end.expect("projection always set");
        assert_eq!(
            projection.avg_legs,
            round2(next.ytd_legs as f64 / next.days_elapsed as f64)
        );
        assert_eq!(projection.total_legs, projection.avg_legs * 365.0);
    }

    #[test]
    fn projection_with_zero_days_is_zero() {
        let projection = project_year_end(500, 0);
        assert_eq!(projection.avg_legs, 0.0);
        assert_eq!(projection.total_legs, 0.0);
    }

    #[test]
    fn month_projection_passes_through() {
        let mut rng = Pcg64Mcg::seed_from_u64(9);
        let mut snap = Snapshot::sample();
        snap.projected_month_end = Some(Projection {
            total_legs: 360.0,
            avg_legs: 12.0,
        });
        let next = next_snapshot(&snap, TARGET, &mut rng);
        assert_eq!(next.projected_month_end, snap.projected_month_end);
    }

    #[test]
    fn same_seed_same_sequence() {
        let snap = Snapshot::sample();
        let a = next_snapshot(&snap, TARGET, &mut Pcg64Mcg::seed_from_u64(99));
        let b = next_snapshot(&snap, TARGET, &mut Pcg64Mcg::seed_from_u64(99));
        assert_eq!(a, b);
    }
}
