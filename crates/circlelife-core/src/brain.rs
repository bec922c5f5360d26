//! Per-agent mate-seeking decision policy.
//!
//! Each tick a live agent's [`Brain`] looks at a read-only snapshot of the
//! population taken before anyone moved, and may replace the agent's
//! velocity. The brain remembers at most one mate target by handle; the
//! handle is re-validated against the snapshot before every use.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, AgentId};
use crate::config::CircleLifeConfig;
use crate::rng::SimRng;
use crate::{Position, Velocity};

/// Pre-tick view of one agent as seen by every brain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MateCandidate {
    pub id: AgentId,
    pub position: Position,
    pub alive: bool,
    pub cooldown: u32,
}

impl MateCandidate {
    /// Capture the fields brains are allowed to read.
    #[must_use]
    pub fn of(id: AgentId, agent: &Agent) -> Self {
        Self {
            id,
            position: agent.position,
            alive: agent.alive,
            cooldown: agent.reproduction_cooldown,
        }
    }

    /// Live and off cooldown.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.alive && self.cooldown == 0
    }
}

/// Outcome of the most recent decision.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BrainMode {
    /// Picked a random heading this tick.
    Wandering,
    /// On reproduction cooldown; keeps drifting.
    Resting,
    /// Eligible but no available mate exists. Fresh brains start here.
    #[default]
    Seeking,
    /// Steering towards a held target.
    Pursuing,
}

/// Result of [`Brain::decide`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub mode: BrainMode,
    /// Replacement velocity, or `None` to keep the current one.
    pub velocity: Option<Velocity>,
}

impl Decision {
    const fn keep(mode: BrainMode) -> Self {
        Self {
            mode,
            velocity: None,
        }
    }
}

/// Tunables a brain reads from the world configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrainParams {
    pub wander_chance: f32,
    pub pursuit_speed: f32,
}

impl From<&CircleLifeConfig> for BrainParams {
    fn from(config: &CircleLifeConfig) -> Self {
        Self {
            wander_chance: config.wander_chance,
            pursuit_speed: config.pursuit_speed,
        }
    }
}

/// Decision state owned by exactly one agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Brain {
    target: Option<AgentId>,
    mode: BrainMode,
}

impl Brain {
    /// A fresh brain with no target.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently pursued mate, if any.
    #[must_use]
    pub const fn target(&self) -> Option<AgentId> {
        self.target
    }

    /// Mode chosen by the most recent decision.
    #[must_use]
    pub const fn mode(&self) -> BrainMode {
        self.mode
    }

    /// Decide this tick's velocity for `me` against the pre-tick `population`.
    ///
    /// Rules are applied in order and the first one that returns wins:
    /// random wander override, cooldown rest, target revalidation, nearest
    /// available mate search, then pursuit at `pursuit_speed`.
    pub fn decide(
        &mut self,
        me: &MateCandidate,
        population: &[MateCandidate],
        params: BrainParams,
        rng: &mut SimRng,
    ) -> Decision {
        let decision = self.evaluate(me, population, params, rng);
        self.mode = decision.mode;
        decision
    }

    fn evaluate(
        &mut self,
        me: &MateCandidate,
        population: &[MateCandidate],
        params: BrainParams,
        rng: &mut SimRng,
    ) -> Decision {
        if rng.chance(params.wander_chance) {
            let velocity = Velocity::new(rng.signed_unit(), rng.signed_unit());
            return Decision {
                mode: BrainMode::Wandering,
                velocity: Some(velocity),
            };
        }

        if !me.is_available() {
            self.target = None;
            return Decision::keep(BrainMode::Resting);
        }

        let held = self.target.and_then(|target| {
            population
                .iter()
                .find(|candidate| candidate.id == target)
                .filter(|candidate| candidate.is_available())
        });
        let target = match held {
            Some(candidate) => Some(candidate),
            None => Self::nearest_mate(me, population),
        };
        self.target = target.map(|candidate| candidate.id);

        let Some(target) = target else {
            return Decision::keep(BrainMode::Seeking);
        };

        let dx = target.position.x - me.position.x;
        let dy = target.position.y - me.position.y;
        let distance = (dx * dx + dy * dy).sqrt();
        let velocity = (distance > 0.0).then(|| {
            Velocity::new(
                dx / distance * params.pursuit_speed,
                dy / distance * params.pursuit_speed,
            )
        });
        Decision {
            mode: BrainMode::Pursuing,
            velocity,
        }
    }

    /// Closest available agent other than `me`; ties keep the first found.
    fn nearest_mate<'a>(
        me: &MateCandidate,
        population: &'a [MateCandidate],
    ) -> Option<&'a MateCandidate> {
        population
            .iter()
            .filter(|candidate| candidate.id != me.id && candidate.is_available())
            .min_by_key(|candidate| OrderedFloat(candidate.position.distance(me.position)))
    }
}
