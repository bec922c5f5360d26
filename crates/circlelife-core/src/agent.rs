//! Agent state and the insertion-ordered arena that stores it.

use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

use crate::brain::Brain;
use crate::rng::SimRng;
use crate::{Generation, Position, Velocity};

new_key_type! {
    /// Stable handle for agents backed by a generational slot map.
    pub struct AgentId;
}

/// Opaque display colour. Has no physical role.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// Draw a uniformly random colour, one channel at a time.
    pub fn random(rng: &mut SimRng) -> Self {
        let mut channels = [0u8; 3];
        for channel in &mut channels {
            *channel = rng.next_int(256) as u8;
        }
        Self(channels)
    }
}

/// A single simulated organism.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Agent {
    pub position: Position,
    pub velocity: Velocity,
    pub alive: bool,
    pub color: Rgb,
    pub age: u32,
    pub energy: f32,
    pub reproduction_cooldown: u32,
    pub generation: Generation,
    pub brain: Brain,
}

impl Agent {
    /// Spawn an agent at `position` with a random heading and colour.
    ///
    /// Draws two velocity components in `[-1, 1)` followed by three colour
    /// channels; founders and offspring share this draw order.
    pub fn spawn(position: Position, energy: f32, rng: &mut SimRng) -> Self {
        let velocity = Velocity::new(rng.signed_unit(), rng.signed_unit());
        let color = Rgb::random(rng);
        Self {
            position,
            velocity,
            alive: true,
            color,
            age: 0,
            energy,
            reproduction_cooldown: 0,
            generation: Generation::default(),
            brain: Brain::new(),
        }
    }

    /// Whether the agent may take part in a mating attempt.
    #[must_use]
    pub fn can_reproduce(&self, threshold: f32) -> bool {
        self.alive && self.reproduction_cooldown == 0 && self.energy >= threshold
    }
}

/// Population storage addressed by generational handles.
///
/// Iteration follows insertion order, which is the order collisions and
/// mating pairs are evaluated in. Dead agents stay in place until
/// [`AgentArena::compact_dead`] is called explicitly.
#[derive(Debug, Clone, Default)]
pub struct AgentArena {
    slots: SlotMap<AgentId, Agent>,
    order: Vec<AgentId>,
}

impl AgentArena {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an arena with reserved capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: SlotMap::with_capacity_and_key(capacity),
            order: Vec::with_capacity(capacity),
        }
    }

    /// Number of stored agents, tombstones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true when no agents are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of agents still alive.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.iter().filter(|(_, agent)| agent.alive).count()
    }

    /// Insert a new agent at the end of the population order.
    pub fn insert(&mut self, agent: Agent) -> AgentId {
        let id = self.slots.insert(agent);
        self.order.push(id);
        id
    }

    /// Returns true if `id` refers to a stored agent.
    #[must_use]
    pub fn contains(&self, id: AgentId) -> bool {
        self.slots.contains_key(id)
    }

    #[must_use]
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.slots.get(id)
    }

    #[must_use]
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.slots.get_mut(id)
    }

    /// Handle at population index `index`.
    #[must_use]
    pub fn handle_at(&self, index: usize) -> Option<AgentId> {
        self.order.get(index).copied()
    }

    /// Iterate over handles in population order.
    pub fn iter_handles(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.order.iter().copied()
    }

    /// Iterate over agents in population order.
    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &Agent)> + '_ {
        self.order.iter().map(|&id| (id, &self.slots[id]))
    }

    /// Mutably borrow two distinct agents at once.
    pub fn get_pair_mut(&mut self, a: AgentId, b: AgentId) -> Option<[&mut Agent; 2]> {
        self.slots.get_disjoint_mut([a, b])
    }

    /// Remove every dead agent, preserving the relative order of survivors.
    ///
    /// Returns the number of tombstones dropped. Handles of removed agents
    /// become invalid.
    pub fn compact_dead(&mut self) -> usize {
        let slots = &mut self.slots;
        let before = self.order.len();
        self.order.retain(|&id| {
            let alive = slots.get(id).is_some_and(|agent| agent.alive);
            if !alive {
                slots.remove(id);
            }
            alive
        });
        before - self.order.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_agent(seed: u64) -> Agent {
        let mut rng = SimRng::from_seed(seed);
        Agent::spawn(Position::new(seed as f32, seed as f32 + 1.0), 100.0, &mut rng)
    }

    #[test]
    fn insert_allocates_unique_handles_in_order() {
        let mut arena = AgentArena::new();
        let ids: Vec<_> = (0..4).map(|seed| arena.insert(sample_agent(seed))).collect();
        assert_eq!(arena.len(), 4);
        assert_eq!(arena.iter_handles().collect::<Vec<_>>(), ids);
        assert_eq!(arena.handle_at(2), Some(ids[2]));
        for (index, (id, agent)) in arena.iter().enumerate() {
            assert_eq!(id, ids[index]);
            assert_eq!(agent.position.x, index as f32);
        }
    }

    #[test]
    fn spawn_draws_bounded_velocity_and_full_energy() {
        let agent = sample_agent(3);
        assert!(agent.alive);
        assert_eq!(agent.age, 0);
        assert_eq!(agent.reproduction_cooldown, 0);
        assert!((agent.energy - 100.0).abs() < f32::EPSILON);
        assert!((-1.0..1.0).contains(&agent.velocity.vx));
        assert!((-1.0..1.0).contains(&agent.velocity.vy));
        assert!(agent.brain.target().is_none());
    }

    #[test]
    fn eligibility_tracks_liveness_cooldown_and_energy() {
        let mut agent = sample_agent(1);
        assert!(agent.can_reproduce(33.0));
        agent.energy = 32.9;
        assert!(!agent.can_reproduce(33.0));
        agent.energy = 50.0;
        agent.reproduction_cooldown = 1;
        assert!(!agent.can_reproduce(33.0));
        agent.reproduction_cooldown = 0;
        agent.alive = false;
        assert!(!agent.can_reproduce(33.0));
    }

    #[test]
    fn compact_dead_preserves_survivor_order() {
        let mut arena = AgentArena::new();
        let ids: Vec<_> = (0..5).map(|seed| arena.insert(sample_agent(seed))).collect();
        for &dead in &[ids[1], ids[3]] {
            arena.get_mut(dead).expect("agent").alive = false;
        }
        assert_eq!(arena.alive_count(), 3);
        assert_eq!(arena.compact_dead(), 2);
        assert_eq!(
            arena.iter_handles().collect::<Vec<_>>(),
            vec![ids[0], ids[2], ids[4]]
        );
        assert!(!arena.contains(ids[1]));
        assert!(arena.get(ids[3]).is_none());
        assert_eq!(arena.compact_dead(), 0);
    }

    #[test]
    fn pair_borrow_rejects_aliasing() {
        let mut arena = AgentArena::new();
        let a = arena.insert(sample_agent(0));
        let b = arena.insert(sample_agent(1));
        assert!(arena.get_pair_mut(a, b).is_some());
        assert!(arena.get_pair_mut(a, a).is_none());
    }
}
