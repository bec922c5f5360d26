//! Core types and the tick pipeline for the CircleLife simulation.
//!
//! A population of circular agents moves, collides, eats, ages and reproduces
//! inside a bounded arena. Everything stochastic draws from one seeded
//! [`SimRng`], so a world built from the same [`CircleLifeConfig`] replays
//! identically. Hosts drive the world through [`WorldState::step`] (or the
//! by-value [`advance`]) and read it back through [`WorldState::snapshot`].

pub mod agent;
pub mod brain;
pub mod config;
pub mod food;
pub mod physics;
pub mod reproduction;
pub mod rng;
pub mod world;

use serde::{Deserialize, Serialize};

pub use agent::{Agent, AgentArena, AgentId, Rgb};
pub use brain::{Brain, BrainMode, Decision, MateCandidate};
pub use config::{CircleLifeConfig, WorldStateError};
pub use food::FoodField;
pub use rng::SimRng;
pub use world::{
    AgentView, FoodView, TickEvents, TickSummary, WorldSnapshot, WorldState, advance,
};

/// High level simulation clock (ticks processed since construction).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct Tick(pub u64);

impl Tick {
    /// Returns the next sequential tick.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Resets the tick counter back to zero.
    #[must_use]
    pub const fn zero() -> Self {
        Self(0)
    }
}

/// Arena-space position of an agent or food item.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    /// Construct a new position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to `other`.
    #[must_use]
    pub fn distance_sq(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        self.distance_sq(other).sqrt()
    }

    /// Point halfway between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Position displaced by one tick of `velocity`.
    #[must_use]
    pub fn offset(self, velocity: Velocity) -> Self {
        Self::new(self.x + velocity.vx, self.y + velocity.vy)
    }
}

/// Per-tick displacement of an agent.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Velocity {
    pub vx: f32,
    pub vy: f32,
}

impl Velocity {
    /// Construct a new velocity vector.
    #[must_use]
    pub const fn new(vx: f32, vy: f32) -> Self {
        Self { vx, vy }
    }

    /// Dot product with the direction `(nx, ny)`.
    #[must_use]
    pub fn dot(self, nx: f32, ny: f32) -> f32 {
        self.vx * nx + self.vy * ny
    }

    /// Euclidean length.
    #[must_use]
    pub fn speed(self) -> f32 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }
}

/// Lineage counter (agents produced by reproduction increment this).
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct Generation(pub u32);

impl Generation {
    /// Advances to the next lineage generation.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}
