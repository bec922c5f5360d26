//! World construction parameters and their validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when constructing world state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldStateError {
    /// Indicates an invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Static configuration for a CircleLife world. Fixed at construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CircleLifeConfig {
    /// Width of the arena in world units.
    pub world_width: f32,
    /// Height of the arena in world units.
    pub world_height: f32,
    /// Radius shared by every agent.
    pub agent_radius: f32,
    /// Grid cell size; reproduction distance is expressed in cells.
    pub cell_size: f32,
    /// Number of agents spawned at construction.
    pub population: usize,
    /// Number of food slots; fixed for the lifetime of the world.
    pub food_slots: usize,
    /// Agents older than this many ticks die.
    pub max_age: u32,
    /// Mating range in multiples of `cell_size`.
    pub reproduction_distance_cells: f32,
    /// Probability that an eligible, close pair reproduces on a given tick.
    pub reproduction_chance: f32,
    /// Ticks a parent waits before it can reproduce again.
    pub reproduction_cooldown: u32,
    /// Energy assigned to founders.
    pub initial_energy: f32,
    /// Energy lost by every live agent each tick.
    pub energy_decay: f32,
    /// Energy gained per food item eaten.
    pub food_energy: f32,
    /// Fraction of `initial_energy` each parent pays (and must hold) to reproduce.
    pub reproduction_cost_fraction: f32,
    /// Per-tick chance that an empty food slot respawns.
    pub food_respawn_chance: f32,
    /// Per-tick chance that a brain ignores everything and picks a random heading.
    pub wander_chance: f32,
    /// Speed used when pursuing a mate.
    pub pursuit_speed: f32,
    /// Half-width of the velocity perturbation applied after each bounce.
    pub collision_jitter: f32,
    /// Half-width of the position nudge applied to exactly overlapping agents.
    pub overlap_nudge: f32,
    /// Maximum number of recent tick summaries retained in-memory.
    pub history_capacity: usize,
    /// RNG seed; `None` draws one from entropy (recorded on the world).
    pub rng_seed: Option<u64>,
}

impl Default for CircleLifeConfig {
    fn default() -> Self {
        Self {
            world_width: 800.0,
            world_height: 600.0,
            agent_radius: 10.0,
            cell_size: 20.0,
            population: 50,
            food_slots: 20,
            max_age: 1_000,
            reproduction_distance_cells: 3.0,
            reproduction_chance: 0.01,
            reproduction_cooldown: 300,
            initial_energy: 100.0,
            energy_decay: 0.1,
            food_energy: 50.0,
            reproduction_cost_fraction: 0.33,
            food_respawn_chance: 0.1,
            wander_chance: 0.01,
            pursuit_speed: 2.0,
            collision_jitter: 0.1,
            overlap_nudge: 0.5,
            history_capacity: 256,
            rng_seed: Some(1234),
        }
    }
}

fn is_probability(value: f32) -> bool {
    (0.0..=1.0).contains(&value)
}

fn is_non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

impl CircleLifeConfig {
    /// Validates the configuration, failing on the first bad value.
    pub fn validate(&self) -> Result<(), WorldStateError> {
        if self.population == 0 {
            return Err(WorldStateError::InvalidConfig(
                "population must be non-zero",
            ));
        }
        if !(self.world_width.is_finite() && self.world_height.is_finite())
            || self.world_width <= 0.0
            || self.world_height <= 0.0
        {
            return Err(WorldStateError::InvalidConfig(
                "world dimensions must be positive and finite",
            ));
        }
        if !self.agent_radius.is_finite() || self.agent_radius <= 0.0 {
            return Err(WorldStateError::InvalidConfig(
                "agent_radius must be positive",
            ));
        }
        if self.world_width <= self.agent_radius * 2.0
            || self.world_height <= self.agent_radius * 2.0
        {
            return Err(WorldStateError::InvalidConfig(
                "world dimensions must exceed one agent diameter",
            ));
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(WorldStateError::InvalidConfig("cell_size must be positive"));
        }
        if !is_non_negative(self.reproduction_distance_cells) {
            return Err(WorldStateError::InvalidConfig(
                "reproduction_distance_cells must be non-negative",
            ));
        }
        if !is_probability(self.reproduction_chance)
            || !is_probability(self.food_respawn_chance)
            || !is_probability(self.wander_chance)
        {
            return Err(WorldStateError::InvalidConfig(
                "reproduction, respawn and wander chances must be within [0, 1]",
            ));
        }
        if !self.initial_energy.is_finite() || self.initial_energy <= 0.0 {
            return Err(WorldStateError::InvalidConfig(
                "initial_energy must be positive",
            ));
        }
        if !is_probability(self.reproduction_cost_fraction) {
            return Err(WorldStateError::InvalidConfig(
                "reproduction_cost_fraction must be within [0, 1]",
            ));
        }
        if !is_non_negative(self.energy_decay)
            || !is_non_negative(self.food_energy)
            || !is_non_negative(self.pursuit_speed)
            || !is_non_negative(self.collision_jitter)
            || !is_non_negative(self.overlap_nudge)
        {
            return Err(WorldStateError::InvalidConfig(
                "decay, food energy, pursuit speed, jitter and nudge must be non-negative",
            ));
        }
        if self.history_capacity == 0 {
            return Err(WorldStateError::InvalidConfig(
                "history_capacity must be non-zero",
            ));
        }
        Ok(())
    }

    /// Energy each parent must hold and pays on reproduction.
    #[must_use]
    pub fn reproduction_threshold(&self) -> f32 {
        self.initial_energy * self.reproduction_cost_fraction
    }

    /// Squared centre distance below which two agents may mate.
    #[must_use]
    pub fn reproduction_distance_sq(&self) -> f32 {
        let distance = self.reproduction_distance_cells * self.cell_size;
        distance * distance
    }

    /// Squared centre distance below which two agents collide.
    #[must_use]
    pub fn collision_distance_sq(&self) -> f32 {
        let diameter = self.agent_radius * 2.0;
        diameter * diameter
    }
}
