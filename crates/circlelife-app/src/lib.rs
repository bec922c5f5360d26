//! Headless host plumbing for the CircleLife simulation.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use circlelife_core::{CircleLifeConfig, WorldSnapshot, WorldState};
use tracing::{debug, info, warn};

/// Install the global `tracing` subscriber, filtered by `RUST_LOG`.
///
/// Output goes to stderr so stdout stays free for snapshot JSON.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Read a JSON configuration file; absent fields take their defaults.
pub fn load_config(path: &Path) -> Result<CircleLifeConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// Command-line overrides layered on top of a loaded configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub seed: Option<u64>,
    pub population: Option<usize>,
    pub food: Option<usize>,
}

impl ConfigOverrides {
    pub fn apply(self, config: &mut CircleLifeConfig) {
        if let Some(seed) = self.seed {
            config.rng_seed = Some(seed);
        }
        if let Some(population) = self.population {
            config.population = population;
        }
        if let Some(food) = self.food {
            config.food_slots = food;
        }
    }
}

/// Outcome of a headless run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Ticks executed by this run.
    pub ticks: u64,
    pub alive: usize,
    /// Stored agents, tombstones included.
    pub agents: usize,
    pub food: usize,
    pub births: u64,
    pub deaths: u64,
    pub elapsed: Duration,
}

/// Drives a [`WorldState`] without any display, logging overlay stats.
#[derive(Debug)]
pub struct HeadlessRunner {
    world: WorldState,
    report_every: u64,
    extinct_reported: bool,
}

impl HeadlessRunner {
    /// Build a world from `config`. A `report_every` of zero disables periodic reports.
    pub fn new(config: CircleLifeConfig, report_every: u64) -> Result<Self> {
        debug!(?config, "building world");
        let world = WorldState::new(config).context("invalid simulation configuration")?;
        info!(
            seed = world.seed(),
            population = world.agent_count(),
            food = world.food().len(),
            "world initialised"
        );
        Ok(Self {
            world,
            report_every,
            extinct_reported: false,
        })
    }

    #[must_use]
    pub fn world(&self) -> &WorldState {
        &self.world
    }

    #[must_use]
    pub fn into_world(self) -> WorldState {
        self.world
    }

    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        self.world.snapshot()
    }

    /// Advance the world `ticks` times and summarise the run.
    pub fn run(&mut self, ticks: u64) -> RunReport {
        let births_before = self.world.total_births();
        let deaths_before = self.world.total_deaths();

        for _ in 0..ticks {
            let events = self.world.step();
            let alive = self.world.alive_count();

            if self.report_every > 0 && events.tick.0 % self.report_every == 0 {
                info!(
                    tick = events.tick.0,
                    elapsed_ms = self.world.elapsed().as_millis() as u64,
                    alive,
                    food = self.world.food().present_count(),
                    births = self.world.total_births(),
                    deaths = self.world.total_deaths(),
                    "progress"
                );
            }
            if alive == 0 && !self.extinct_reported {
                warn!(tick = events.tick.0, "population went extinct");
                self.extinct_reported = true;
            }
        }

        let report = RunReport {
            ticks,
            alive: self.world.alive_count(),
            agents: self.world.agent_count(),
            food: self.world.food().present_count(),
            births: self.world.total_births() - births_before,
            deaths: self.world.total_deaths() - deaths_before,
            elapsed: self.world.elapsed(),
        };
        info!(
            tick = self.world.tick().0,
            alive = report.alive,
            agents = report.agents,
            births = report.births,
            deaths = report.deaths,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "run complete"
        );
        report
    }
}
