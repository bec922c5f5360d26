//! World state and the per-tick pipeline.

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::agent::{Agent, AgentArena, AgentId, Rgb};
use crate::brain::{BrainParams, MateCandidate};
use crate::config::{CircleLifeConfig, WorldStateError};
use crate::food::FoodField;
use crate::physics::{self, MotionParams};
use crate::reproduction::{self, ReproductionParams};
use crate::rng::SimRng;
use crate::{Generation, Position, Tick};

/// Counters emitted after processing a world tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TickEvents {
    pub tick: Tick,
    pub births: usize,
    pub deaths: usize,
    pub collisions: usize,
    pub food_eaten: usize,
    pub food_respawned: usize,
}

/// Summary retained in the world history after each tick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TickSummary {
    pub tick: Tick,
    pub agent_count: usize,
    pub alive_count: usize,
    pub births: usize,
    pub deaths: usize,
    pub food_present: usize,
    pub total_energy: f32,
    pub average_energy: f32,
}

/// Display view of one agent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AgentView {
    pub id: AgentId,
    pub position: Position,
    pub color: Rgb,
    pub alive: bool,
    pub generation: Generation,
}

/// Display view of one food slot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FoodView {
    pub position: Option<Position>,
    pub present: bool,
}

/// Read-only picture of the world handed to renderers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldSnapshot {
    pub tick: Tick,
    pub agents: Vec<AgentView>,
    pub food: Vec<FoodView>,
    pub alive_count: usize,
    pub food_count: usize,
}

/// Aggregate world state owned by the simulation loop.
#[derive(Clone)]
pub struct WorldState {
    config: CircleLifeConfig,
    tick: Tick,
    rng: SimRng,
    agents: AgentArena,
    food: FoodField,
    history: VecDeque<TickSummary>,
    total_births: u64,
    total_deaths: u64,
    started_at: Instant,
}

impl fmt::Debug for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorldState")
            .field("config", &self.config)
            .field("tick", &self.tick)
            .field("seed", &self.rng.seed())
            .field("agent_count", &self.agents.len())
            .field("food_present", &self.food.present_count())
            .finish()
    }
}

/// Consume a world, advance it by one tick and hand it back.
#[must_use]
pub fn advance(mut world: WorldState) -> WorldState {
    world.step();
    world
}

impl WorldState {
    /// Validate `config`, seed the RNG and populate agents then food.
    pub fn new(config: CircleLifeConfig) -> Result<Self, WorldStateError> {
        config.validate()?;
        let mut rng = SimRng::from_optional_seed(config.rng_seed);
        let mut agents = AgentArena::with_capacity(config.population);
        for _ in 0..config.population {
            let x = rng.next_float() * config.world_width;
            let y = rng.next_float() * config.world_height;
            agents.insert(Agent::spawn(
                Position::new(x, y),
                config.initial_energy,
                &mut rng,
            ));
        }
        let food = FoodField::scatter(
            config.food_slots,
            config.world_width,
            config.world_height,
            &mut rng,
        );
        Ok(Self {
            history: VecDeque::with_capacity(config.history_capacity),
            config,
            tick: Tick::zero(),
            rng,
            agents,
            food,
            total_births: 0,
            total_deaths: 0,
            started_at: Instant::now(),
        })
    }

    /// Decide velocities for every live agent against the pre-tick population.
    fn stage_brains(&mut self) {
        let snapshot: Vec<MateCandidate> = self
            .agents
            .iter()
            .map(|(id, agent)| MateCandidate::of(id, agent))
            .collect();
        let params = BrainParams::from(&self.config);
        for me in &snapshot {
            if !me.alive {
                continue;
            }
            let Some(agent) = self.agents.get_mut(me.id) else {
                continue;
            };
            let decision = agent.brain.decide(me, &snapshot, params, &mut self.rng);
            if let Some(velocity) = decision.velocity {
                agent.velocity = velocity;
            }
        }
    }

    /// Move, feed, age and possibly kill each live agent in population order.
    fn stage_motion_and_metabolism(&mut self, events: &mut TickEvents) {
        let motion = MotionParams {
            radius: self.config.agent_radius,
            width: self.config.world_width,
            height: self.config.world_height,
            jitter: self.config.collision_jitter,
            nudge: self.config.overlap_nudge,
        };
        let eat_radius_sq = self.config.agent_radius * self.config.agent_radius;
        let handles: Vec<AgentId> = self.agents.iter_handles().collect();

        for id in handles {
            let Some(agent) = self.agents.get(id) else {
                continue;
            };
            if !agent.alive {
                continue;
            }
            let (position, velocity) = (agent.position, agent.velocity);
            let neighbours = self
                .agents
                .iter()
                .filter(|(other, peer)| *other != id && peer.alive)
                .map(|(_, peer)| peer.position);
            let outcome = physics::integrate(position, velocity, neighbours, motion, &mut self.rng);
            events.collisions += outcome.collisions;

            let claimed = self.food.claim_within(outcome.position, eat_radius_sq);
            events.food_eaten += claimed;

            let Some(agent) = self.agents.get_mut(id) else {
                continue;
            };
            agent.position = outcome.position;
            agent.velocity = outcome.velocity;
            agent.age = agent.age.saturating_add(1);
            agent.energy -= self.config.energy_decay;
            agent.energy += self.config.food_energy * claimed as f32;
            agent.reproduction_cooldown = agent.reproduction_cooldown.saturating_sub(1);
            if agent.energy <= 0.0 || agent.age > self.config.max_age {
                agent.alive = false;
                events.deaths += 1;
            }
        }
    }

    fn stage_food_respawn(&mut self) -> usize {
        self.food.respawn(
            self.config.food_respawn_chance,
            self.config.world_width,
            self.config.world_height,
            &mut self.rng,
        )
    }

    /// Run the pair scan, then append offspring in pair order.
    fn stage_reproduction(&mut self, events: &mut TickEvents) {
        let params = ReproductionParams::from(&self.config);
        let scan = reproduction::pair_scan(&mut self.agents, params, &mut self.rng);
        events.births = scan.births.len();
        events.deaths += scan.deaths;
        for birth in scan.births {
            self.agents.insert(birth.child);
        }
    }

    fn stage_history(&mut self, events: &TickEvents) {
        let (alive_count, total_energy) = self
            .agents
            .iter()
            .filter(|(_, agent)| agent.alive)
            .fold((0usize, 0.0f32), |(count, energy), (_, agent)| {
                (count + 1, energy + agent.energy)
            });
        let average_energy = if alive_count > 0 {
            total_energy / alive_count as f32
        } else {
            0.0
        };
        if self.history.len() >= self.config.history_capacity {
            self.history.pop_front();
        }
        self.history.push_back(TickSummary {
            tick: events.tick,
            agent_count: self.agents.len(),
            alive_count,
            births: events.births,
            deaths: events.deaths,
            food_present: self.food.present_count(),
            total_energy,
            average_energy,
        });
    }

    /// Execute one simulation tick pipeline returning emitted counters.
    pub fn step(&mut self) -> TickEvents {
        let mut events = TickEvents {
            tick: self.tick.next(),
            ..TickEvents::default()
        };

        self.stage_brains();
        self.stage_motion_and_metabolism(&mut events);
        events.food_respawned = self.stage_food_respawn();
        self.stage_reproduction(&mut events);

        self.total_births += events.births as u64;
        self.total_deaths += events.deaths as u64;
        self.tick = events.tick;
        self.stage_history(&events);
        events
    }

    /// Read-only view of positions, colours and liveness for display.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        let agents: Vec<AgentView> = self
            .agents
            .iter()
            .map(|(id, agent)| AgentView {
                id,
                position: agent.position,
                color: agent.color,
                alive: agent.alive,
                generation: agent.generation,
            })
            .collect();
        let food: Vec<FoodView> = self
            .food
            .slots()
            .iter()
            .map(|slot| FoodView {
                position: *slot,
                present: slot.is_some(),
            })
            .collect();
        WorldSnapshot {
            tick: self.tick,
            alive_count: agents.iter().filter(|agent| agent.alive).count(),
            food_count: self.food.present_count(),
            agents,
            food,
        }
    }

    /// Insert a founder-style agent at `position` with full initial energy.
    pub fn spawn_agent(&mut self, position: Position) -> AgentId {
        let agent = Agent::spawn(position, self.config.initial_energy, &mut self.rng);
        self.agents.insert(agent)
    }

    /// Drop dead agents from the arena, keeping survivors in order.
    ///
    /// Never called by [`WorldState::step`]; brains pointing at a removed
    /// agent clear their target on the next decision.
    pub fn compact_dead(&mut self) -> usize {
        self.agents.compact_dead()
    }

    /// Returns an immutable reference to configuration.
    #[must_use]
    pub fn config(&self) -> &CircleLifeConfig {
        &self.config
    }

    /// Current simulation tick.
    #[must_use]
    pub const fn tick(&self) -> Tick {
        self.tick
    }

    /// Seed the world RNG was created from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Wall-clock time since construction. Diagnostic only.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Read-only access to the agent arena.
    #[must_use]
    pub fn agents(&self) -> &AgentArena {
        &self.agents
    }

    /// Mutable access to the agent arena.
    #[must_use]
    pub fn agents_mut(&mut self) -> &mut AgentArena {
        &mut self.agents
    }

    /// Immutable access to the food field.
    #[must_use]
    pub fn food(&self) -> &FoodField {
        &self.food
    }

    /// Mutable access to the food field.
    #[must_use]
    pub fn food_mut(&mut self) -> &mut FoodField {
        &mut self.food
    }

    /// Number of stored agents, tombstones included.
    #[must_use]
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Number of live agents.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.agents.alive_count()
    }

    /// Births since construction.
    #[must_use]
    pub const fn total_births(&self) -> u64 {
        self.total_births
    }

    /// Deaths since construction.
    #[must_use]
    pub const fn total_deaths(&self) -> u64 {
        self.total_deaths
    }

    /// Iterate over retained tick summaries, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &TickSummary> {
        self.history.iter()
    }
}
