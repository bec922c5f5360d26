use std::path::PathBuf;

use anyhow::{Context, Result};
use circlelife_app::{ConfigOverrides, HeadlessRunner, init_tracing, load_config};
use circlelife_core::CircleLifeConfig;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "circlelife",
    version,
    about = "Run the CircleLife simulation headless"
)]
struct Cli {
    /// JSON configuration file; missing fields take defaults.
    #[arg(long, env = "CIRCLELIFE_CONFIG")]
    config: Option<PathBuf>,

    /// RNG seed override.
    #[arg(long)]
    seed: Option<u64>,

    /// Initial population override.
    #[arg(long)]
    population: Option<usize>,

    /// Food slot count override.
    #[arg(long)]
    food: Option<usize>,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 1000)]
    ticks: u64,

    /// Log a progress line every N ticks (0 disables).
    #[arg(long, default_value_t = 100)]
    report_every: u64,

    /// Print the final world snapshot as JSON on stdout.
    #[arg(long)]
    snapshot: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => CircleLifeConfig::default(),
    };
    ConfigOverrides {
        seed: cli.seed,
        population: cli.population,
        food: cli.food,
    }
    .apply(&mut config);

    info!(ticks = cli.ticks, "starting CircleLife");
    let mut runner = HeadlessRunner::new(config, cli.report_every)?;
    runner.run(cli.ticks);

    if cli.snapshot {
        let json = serde_json::to_string_pretty(&runner.snapshot())
            .context("failed to serialise world snapshot")?;
        println!("{json}");
    }
    Ok(())
}
