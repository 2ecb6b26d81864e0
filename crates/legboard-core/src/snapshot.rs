//! The scoreboard snapshot: the full point-in-time state every display and
//! derivation consumer works from.
//!
//! The wire format is the camelCase JSON document the goal endpoint returns.
//! Leg counts are non-negative integers and monotonically non-decreasing
//! within their period; `days_elapsed` / `days_elapsed_mtd` are at least 1
//! so they can serve as divisors (a zero from a misbehaving upstream is
//! still guarded in the metrics layer).

use serde::{Deserialize, Serialize};

/// One forward-looking day in the booking window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingDay {
    /// Calendar date, `YYYY-MM-DD`, interpreted as a local date.
    pub date: String,
    /// Legs already booked for this day.
    pub planned_legs: u32,
    /// Demand forecast for this day.
    pub forecast_legs: u32,
}

/// Straight-line projection to the end of a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub total_legs: f64,
    pub avg_legs: f64,
}

/// Per-month completion summary for the monthly performance chart.
///
/// `previousMonths` carries `completedLegs` and `previousMonthsCreated`
/// carries `createdLegs` in the same slot; both deserialize into `legs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    /// Month name, e.g. "January".
    pub month: String,
    pub month_number: u32,
    #[serde(rename = "completedLegs", alias = "createdLegs")]
    pub legs: u32,
    pub days_in_month: u32,
    pub avg_legs_per_day: f64,
}

/// The authoritative scoreboard state at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Legs planned for today but not yet completed.
    #[serde(default)]
    pub scheduled_legs: u32,
    /// Legs completed today. Reset upstream at the day boundary.
    #[serde(default)]
    pub recently_completed_legs: u32,
    /// Cumulative legs this year.
    #[serde(default)]
    pub ytd_legs: u32,
    /// Cumulative legs this month.
    #[serde(default)]
    pub mtd_legs: u32,
    /// Calendar days elapsed this year.
    #[serde(default = "one")]
    pub days_elapsed: u32,
    /// Calendar days elapsed this month.
    #[serde(default = "one", rename = "daysElapsedMTD")]
    pub days_elapsed_mtd: u32,
    #[serde(default)]
    pub projected_year_end: Option<Projection>,
    #[serde(default)]
    pub projected_month_end: Option<Projection>,
    /// Chronological forward window, typically seven days.
    #[serde(default)]
    pub upcoming: Vec<UpcomingDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_months: Option<Vec<MonthSummary>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_months_created: Option<Vec<MonthSummary>>,
}

fn one() -> u32 {
    1
}

impl Default for Snapshot {
    /// The zero-valued snapshot the refresh state starts from.
    fn default() -> Self {
        Self {
            scheduled_legs: 0,
            recently_completed_legs: 0,
            ytd_legs: 0,
            mtd_legs: 0,
            days_elapsed: 1,
            days_elapsed_mtd: 1,
            projected_year_end: None,
            projected_month_end: None,
            upcoming: Vec::new(),
            previous_months: None,
            previous_months_created: None,
        }
    }
}

impl Snapshot {
    /// Seeded demo snapshot used as the synthetic mode's starting state.
    pub fn sample() -> Self {
        let upcoming = [
            ("2025-02-10", 9, 12),
            ("2025-02-11", 7, 11),
            ("2025-02-12", 12, 13),
            ("2025-02-13", 5, 10),
            ("2025-02-14", 13, 14),
            ("2025-02-15", 4, 9),
            ("2025-02-16", 6, 11),
        ]
        .into_iter()
        .map(|(date, planned_legs, forecast_legs)| UpcomingDay {
            date: date.to_string(),
            planned_legs,
            forecast_legs,
        })
        .collect();

        Self {
            scheduled_legs: 5,
            recently_completed_legs: 8,
            ytd_legs: 3115,
            mtd_legs: 117,
            days_elapsed: 240,
            days_elapsed_mtd: 9,
            projected_year_end: Some(Projection {
                total_legs: 4755.0,
                avg_legs: 13.03,
            }),
            projected_month_end: None,
            upcoming,
            previous_months: None,
            previous_months_created: None,
        }
    }
}
