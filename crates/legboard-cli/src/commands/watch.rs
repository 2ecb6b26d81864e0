use std::io::Write;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};

use legboard_core::{
    Config, Event, ScoreboardService, ServiceOptions, SnapshotProvider, SyntheticProvider,
};

use super::common;

/// Synthetic data evolves on a demo cadence rather than the live poll period.
const SYNTHETIC_POLL_SECS: u64 = 3;

pub fn run(synthetic: bool, period: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let options = |default_period: u64| ServiceOptions {
        poll_period: Duration::from_secs(period.unwrap_or(default_period)),
        celebration_decay_ms: config.refresh.celebration_decay_ms,
    };
    let runtime = common::runtime()?;

    runtime.block_on(async {
        match (common::http_provider(&config)?, synthetic) {
            (Some(provider), false) => {
                watch_loop(provider, options(config.refresh.poll_period_secs)).await
            }
            _ => {
                let provider = SyntheticProvider::sample(config.goal.daily_target);
                watch_loop(provider, options(SYNTHETIC_POLL_SECS)).await
            }
        }
    })
}

async fn watch_loop<P: SnapshotProvider>(
    provider: P,
    options: ServiceOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "watching scoreboard via {} provider (ctrl-c to stop)",
        provider.name()
    );

    let (service, mut handle) = ScoreboardService::new(provider, options);
    let runner = service.run();
    tokio::pin!(runner);

    loop {
        tokio::select! {
            _ = &mut runner => break,
            _ = tokio::signal::ctrl_c() => {
                println!();
                handle.stop();
            }
            maybe_event = handle.events.recv() => {
                match maybe_event {
                    Some(event) => print_event(&event)?,
                    None => break,
                }
            }
        }
    }
    Ok(())
}

fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    match event {
        Event::CountdownTick {
            time_left_label,
            day_percent,
            ..
        } => {
            print!("\r  {time_left_label} left today | {day_percent:.0}% of day elapsed ");
            std::io::stdout().flush()?;
        }
        Event::SnapshotRefreshed {
            completed_today,
            ytd_legs,
            at,
        } => {
            println!(
                "\n[{}] refreshed: {completed_today} legs today, {ytd_legs} YTD",
                local_time(at)
            );
        }
        Event::RefreshFailed { message, at } => {
            eprintln!("\n[{}] {message}", local_time(at));
        }
        Event::LegsCompleted { from, to, at } => {
            println!("\n[{}] leg completed! {from} -> {to} today", local_time(at));
        }
        Event::CelebrationEnded { .. } => {}
    }
    Ok(())
}

fn local_time(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}
