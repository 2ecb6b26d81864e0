use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "legboard", version, about = "Legboard operations scoreboard CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one snapshot and print the derived scoreboard
    Status,
    /// Run the live scoreboard loop in the terminal
    Watch {
        /// Force the synthetic data source even when a provider is configured
        #[arg(long)]
        synthetic: bool,
        /// Override the poll period in seconds
        #[arg(long)]
        period: Option<u64>,
    },
    /// Step the synthetic evolution model and print the result
    Simulate {
        /// Number of ticks to simulate
        #[arg(long, default_value_t = 20)]
        steps: u32,
        /// RNG seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Status => commands::status::run(),
        Commands::Watch { synthetic, period } => commands::watch::run(synthetic, period),
        Commands::Simulate { steps, seed } => commands::simulate::run(steps, seed),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
