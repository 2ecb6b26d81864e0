use chrono::Local;
use serde::Serialize;

use legboard_core::clock::{self, DayTiming};
use legboard_core::metrics::{self, DayOutlook, MonthBar};
use legboard_core::{Config, DerivedMetrics, Snapshot, SnapshotProvider, SyntheticProvider};

use super::common;

/// Everything the scoreboard shows, in one JSON document.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    source: &'static str,
    snapshot: Snapshot,
    metrics: DerivedMetrics,
    timing: DayTiming,
    upcoming: Vec<DayOutlook>,
    monthly: Vec<MonthBar>,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let runtime = common::runtime()?;

    let (source, snapshot) = runtime.block_on(async {
        match common::http_provider(&config)? {
            Some(mut provider) => {
                let snapshot = provider.fetch().await?;
                Ok::<_, Box<dyn std::error::Error>>((provider.name(), snapshot))
            }
            None => {
                let mut provider = SyntheticProvider::sample(config.goal.daily_target);
                let snapshot = provider.fetch().await?;
                Ok((provider.name(), snapshot))
            }
        }
    })?;

    let now = Local::now();
    let timing = clock::day_timing(&now);
    let days_in_month = clock::days_in_month(now.date_naive());
    let targets = config.targets();

    let derived = DerivedMetrics::compute(&snapshot, &targets, timing.day_percent, days_in_month);
    let upcoming = snapshot
        .upcoming
        .iter()
        .take(config.refresh.upcoming_days)
        .map(|day| metrics::day_outlook(day, &targets))
        .collect();
    let monthly = snapshot
        .previous_months
        .as_deref()
        .map(|months| metrics::month_bars(months, &targets))
        .unwrap_or_default();

    let report = StatusReport {
        source,
        snapshot,
        metrics: derived,
        timing,
        upcoming,
        monthly,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
