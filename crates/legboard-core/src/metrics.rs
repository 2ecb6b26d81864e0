//! Pure metric derivation.
//!
//! Everything in this module is a stateless function of a [`Snapshot`] and
//! the configured targets. Derived values are recomputed on demand and never
//! stored, so a partially updated snapshot can't leave stale numbers behind.
//! Division by a zero day count is defined as zero rather than letting
//! NaN/Infinity reach a display layer.

use serde::{Deserialize, Serialize};

use crate::snapshot::{MonthSummary, Snapshot, UpcomingDay};

/// Round to two decimals, matching the upstream projection precision.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Goal targets and classification boundaries.
///
/// All knobs live here so the derivation functions never need touching when
/// the operation changes its goals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Targets {
    /// Legs per day the operation is aiming for.
    pub daily: u32,
    /// Display cap for percent-of-goal values.
    pub percent_ceiling: f64,
    /// Pace level boundaries, closed below / open above.
    pub pace_thresholds: [f64; 4],
}

impl Default for Targets {
    fn default() -> Self {
        Self {
            daily: 13,
            percent_ceiling: 120.0,
            pace_thresholds: [8.0, 11.0, 13.0, 16.0],
        }
    }
}

impl Targets {
    pub fn yearly(&self) -> u32 {
        self.daily * 365
    }

    pub fn monthly(&self, days_in_month: u32) -> u32 {
        self.daily * days_in_month
    }
}

/// Discrete pace classification over the YTD average, flight-deck themed.
///
/// A pure step function of the average: it carries no memory of previous
/// levels, and a larger average never maps to a lower level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaceLevel {
    Taxiing,
    Takeoff,
    Climb,
    Cruising,
    Supersonic,
}

impl PaceLevel {
    /// Bucket `avg_legs` against the configured boundaries.
    pub fn classify(avg_legs: f64, thresholds: &[f64; 4]) -> Self {
        if avg_legs < thresholds[0] {
            PaceLevel::Taxiing
        } else if avg_legs < thresholds[1] {
            PaceLevel::Takeoff
        } else if avg_legs < thresholds[2] {
            PaceLevel::Climb
        } else if avg_legs < thresholds[3] {
            PaceLevel::Cruising
        } else {
            PaceLevel::Supersonic
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaceLevel::Taxiing => "Taxiing",
            PaceLevel::Takeoff => "Takeoff",
            PaceLevel::Climb => "Climb",
            PaceLevel::Cruising => "Cruising",
            PaceLevel::Supersonic => "Supersonic",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PaceLevel::Taxiing => "Still on the runway. Time to accelerate.",
            PaceLevel::Takeoff => "Lifting off. Momentum is building.",
            PaceLevel::Climb => "Climbing toward cruising altitude.",
            PaceLevel::Cruising => "At cruising altitude. Maintain the pace.",
            PaceLevel::Supersonic => "Smashing the target. Legendary pace.",
        }
    }

    pub fn next_hint(&self) -> &'static str {
        match self {
            PaceLevel::Taxiing => "Hit 8+ legs/day to take off.",
            PaceLevel::Takeoff => "Push to 11+ legs/day to climb.",
            PaceLevel::Climb => "13+ legs/day unlocks cruising.",
            PaceLevel::Cruising => "16+ legs/day goes supersonic.",
            PaceLevel::Supersonic => "Keep it steady and enjoy the view.",
        }
    }
}

/// Tri-state coloring for an upcoming day's booking bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForecastStatus {
    /// Bookings already meet the daily target.
    OnTarget,
    /// Bookings trail the demand forecast.
    Behind,
    Neutral,
}

/// Display-ready view of one upcoming day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayOutlook {
    pub date: String,
    pub planned_legs: u32,
    pub forecast_legs: u32,
    pub booked_percent: f64,
    pub forecast_percent: f64,
    pub hit_target: bool,
    pub behind_forecast: bool,
    pub status: ForecastStatus,
}

/// Classify one upcoming day. Hitting the target wins over trailing the
/// forecast; a day doing neither is neutral.
pub fn day_outlook(day: &UpcomingDay, targets: &Targets) -> DayOutlook {
    let hit_target = day.planned_legs >= targets.daily;
    let behind_forecast = day.planned_legs < day.forecast_legs;
    let status = if hit_target {
        ForecastStatus::OnTarget
    } else if behind_forecast {
        ForecastStatus::Behind
    } else {
        ForecastStatus::Neutral
    };

    DayOutlook {
        date: day.date.clone(),
        planned_legs: day.planned_legs,
        forecast_legs: day.forecast_legs,
        booked_percent: capped_percent(day.planned_legs, targets.daily, targets.percent_ceiling),
        forecast_percent: capped_percent(day.forecast_legs, targets.daily, targets.percent_ceiling),
        hit_target,
        behind_forecast,
        status,
    }
}

/// One bar of the monthly performance chart, scaled against the best month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthBar {
    pub month: String,
    pub month_number: u32,
    pub legs: u32,
    pub avg_legs_per_day: f64,
    pub on_track: bool,
    /// `100 * legs / max(legs)` across the sequence.
    pub height_percent: f64,
}

/// Derive chart bars from a previous-months sequence.
pub fn month_bars(months: &[MonthSummary], targets: &Targets) -> Vec<MonthBar> {
    let max_legs = months.iter().map(|m| m.legs).max().unwrap_or(0);
    months
        .iter()
        .map(|m| MonthBar {
            month: m.month.clone(),
            month_number: m.month_number,
            legs: m.legs,
            avg_legs_per_day: m.avg_legs_per_day,
            on_track: m.avg_legs_per_day >= targets.daily as f64,
            height_percent: if max_legs == 0 {
                0.0
            } else {
                (m.legs as f64 / max_legs as f64) * 100.0
            },
        })
        .collect()
}

/// All displayed numbers derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    pub avg_legs: f64,
    pub avg_legs_mtd: f64,
    pub today_goal_percent: f64,
    pub annual_percent: f64,
    pub mtd_percent: f64,
    pub ahead_of_pace: bool,
    pub on_track: bool,
    pub on_track_mtd: bool,
    pub pace_level: PaceLevel,
}

impl DerivedMetrics {
    /// Derive every displayed metric from `snapshot`.
    ///
    /// `day_percent` comes from [`crate::clock::day_timing`] and
    /// `days_in_month` from [`crate::clock::days_in_month`] for the current
    /// local date.
    pub fn compute(
        snapshot: &Snapshot,
        targets: &Targets,
        day_percent: f64,
        days_in_month: u32,
    ) -> Self {
        let avg_legs = safe_ratio(snapshot.ytd_legs, snapshot.days_elapsed);
        let avg_legs_mtd = safe_ratio(snapshot.mtd_legs, snapshot.days_elapsed_mtd);

        let today_goal_percent = capped_percent(
            snapshot.recently_completed_legs,
            targets.daily,
            targets.percent_ceiling,
        );
        let annual_percent =
            capped_percent(snapshot.ytd_legs, targets.yearly(), targets.percent_ceiling);
        let mtd_percent = capped_percent(
            snapshot.mtd_legs,
            targets.monthly(days_in_month),
            targets.percent_ceiling,
        );

        Self {
            avg_legs,
            avg_legs_mtd,
            today_goal_percent,
            annual_percent,
            mtd_percent,
            ahead_of_pace: today_goal_percent > day_percent,
            on_track: avg_legs >= targets.daily as f64,
            on_track_mtd: avg_legs_mtd >= targets.daily as f64,
            pace_level: PaceLevel::classify(avg_legs, &targets.pace_thresholds),
        }
    }
}

fn safe_ratio(count: u32, days: u32) -> f64 {
    if days == 0 {
        0.0
    } else {
        count as f64 / days as f64
    }
}

fn capped_percent(count: u32, target: u32, ceiling: f64) -> f64 {
    if target == 0 {
        return 0.0;
    }
    ((count as f64 / target as f64) * 100.0).min(ceiling)
}
