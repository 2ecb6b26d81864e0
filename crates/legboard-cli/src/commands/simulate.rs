use legboard_core::{Config, Snapshot, SyntheticProvider};

pub fn run(steps: u32, seed: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let seed = seed.unwrap_or(42);
    let mut provider =
        SyntheticProvider::seeded(Snapshot::sample(), config.goal.daily_target, seed);

    let mut snapshot = provider.step();
    println!(
        "start   : {} legs today | {} YTD (seed {seed})",
        snapshot.recently_completed_legs, snapshot.ytd_legs
    );
    for tick in 1..=steps {
        snapshot = provider.step();
        let projected = snapshot
            .projected_year_end
            .as_ref()
            .map(|p| p.avg_legs)
            .unwrap_or_default();
        println!(
            "tick {tick:>3}: {} legs today | {} YTD | projected {projected:.2} legs/day",
            snapshot.recently_completed_legs, snapshot.ytd_legs
        );
    }

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
