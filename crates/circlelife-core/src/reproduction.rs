//! Pairwise mating scan.

use crate::agent::{Agent, AgentArena, AgentId};
use crate::config::CircleLifeConfig;
use crate::rng::SimRng;

/// Tunables for one reproduction pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReproductionParams {
    /// Energy each parent must hold, and pays, to reproduce.
    pub threshold: f32,
    pub distance_sq: f32,
    pub chance: f32,
    pub cooldown: u32,
}

impl From<&CircleLifeConfig> for ReproductionParams {
    fn from(config: &CircleLifeConfig) -> Self {
        Self {
            threshold: config.reproduction_threshold(),
            distance_sq: config.reproduction_distance_sq(),
            chance: config.reproduction_chance,
            cooldown: config.reproduction_cooldown,
        }
    }
}

/// Offspring produced by a successful pairing, not yet in the arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Birth {
    pub parents: [AgentId; 2],
    pub child: Agent,
}

/// Everything one scan produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairScan {
    pub births: Vec<Birth>,
    /// Parents left with no energy after paying for a child.
    pub deaths: usize,
}

/// Evaluate every unordered pair `(i, j)`, `i < j`, in population order.
///
/// Eligibility is re-read for each pair, so a parent that succeeds goes on
/// cooldown and skips the rest of the scan. Offspring are returned in pair
/// order and must be appended only after the scan; they never take part in
/// the pass that produced them. A parent whose payment leaves it with no
/// energy dies on the spot.
pub fn pair_scan(
    arena: &mut AgentArena,
    params: ReproductionParams,
    rng: &mut SimRng,
) -> PairScan {
    let handles: Vec<AgentId> = arena.iter_handles().collect();
    let mut scan = PairScan::default();

    for (i, &first) in handles.iter().enumerate() {
        for &second in &handles[i + 1..] {
            let Some(a) = arena.get(first) else { break };
            if !a.can_reproduce(params.threshold) {
                break;
            }
            let Some(b) = arena.get(second) else { continue };
            if !b.can_reproduce(params.threshold) {
                continue;
            }
            if a.position.distance_sq(b.position) >= params.distance_sq {
                continue;
            }
            if !rng.chance(params.chance) {
                continue;
            }

            let midpoint = a.position.midpoint(b.position);
            let generation = a.generation.max(b.generation).next();
            let mut child = Agent::spawn(midpoint, params.threshold * 2.0, rng);
            child.generation = generation;

            if let Some([a, b]) = arena.get_pair_mut(first, second) {
                for parent in [a, b] {
                    parent.energy -= params.threshold;
                    parent.reproduction_cooldown = params.cooldown;
                    if parent.energy <= 0.0 {
                        parent.alive = false;
                        scan.deaths += 1;
                    }
                }
            }
            scan.births.push(Birth {
                parents: [first, second],
                child,
            });
        }
    }

    scan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Generation, Position};

    const ALWAYS: ReproductionParams = ReproductionParams {
        threshold: 33.0,
        distance_sq: 3_600.0,
        chance: 1.0,
        cooldown: 300,
    };

    fn arena_with(positions: &[(f32, f32)]) -> (AgentArena, Vec<AgentId>) {
        let mut rng = SimRng::from_seed(8);
        let mut arena = AgentArena::new();
        let ids = positions
            .iter()
            .map(|&(x, y)| arena.insert(Agent::spawn(Position::new(x, y), 100.0, &mut rng)))
            .collect();
        (arena, ids)
    }

    #[test]
    fn close_eligible_pair_produces_one_child() {
        let (mut arena, ids) = arena_with(&[(100.0, 100.0), (140.0, 100.0)]);
        let mut rng = SimRng::from_seed(1);
        let scan = pair_scan(&mut arena, ALWAYS, &mut rng);
        assert_eq!(scan.deaths, 0);
        let births = scan.births;
        assert_eq!(births.len(), 1);

        let birth = &births[0];
        assert_eq!(birth.parents, [ids[0], ids[1]]);
        assert_eq!(birth.child.position, Position::new(120.0, 100.0));
        assert!((birth.child.energy - 66.0).abs() < 1e-4);
        assert_eq!(birth.child.generation, Generation(1));
        assert!(birth.child.brain.target().is_none());

        for id in ids {
            let parent = arena.get(id).expect("parent");
            assert!((parent.energy - 67.0).abs() < 1e-4);
            assert_eq!(parent.reproduction_cooldown, 300);
        }
        assert_eq!(arena.len(), 2, "offspring are not appended by the scan");
    }

    #[test]
    fn distance_bound_is_strict() {
        let (mut arena, _) = arena_with(&[(100.0, 100.0), (160.0, 100.0)]);
        let mut rng = SimRng::from_seed(1);
        assert!(pair_scan(&mut arena, ALWAYS, &mut rng).births.is_empty());
    }

    #[test]
    fn ineligible_agents_never_pair() {
        let (mut arena, ids) = arena_with(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (30.0, 0.0)]);
        arena.get_mut(ids[0]).expect("agent").alive = false;
        arena.get_mut(ids[1]).expect("agent").reproduction_cooldown = 4;
        arena.get_mut(ids[2]).expect("agent").energy = 32.0;
        let mut rng = SimRng::from_seed(1);
        assert!(pair_scan(&mut arena, ALWAYS, &mut rng).births.is_empty());
        assert!((arena.get(ids[3]).expect("agent").energy - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn each_parent_mates_at_most_once_per_scan() {
        let (mut arena, ids) = arena_with(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (30.0, 0.0)]);
        let mut rng = SimRng::from_seed(1);
        let births = pair_scan(&mut arena, ALWAYS, &mut rng).births;
        let pairs: Vec<_> = births.iter().map(|birth| birth.parents).collect();
        assert_eq!(pairs, vec![[ids[0], ids[1]], [ids[2], ids[3]]]);
    }

    #[test]
    fn parents_paid_down_to_zero_die() {
        let (mut arena, ids) = arena_with(&[(100.0, 100.0), (130.0, 100.0)]);
        arena.get_mut(ids[1]).expect("agent").energy = 50.0;
        let params = ReproductionParams {
            threshold: 50.0,
            ..ALWAYS
        };
        let mut rng = SimRng::from_seed(1);
        let scan = pair_scan(&mut arena, params, &mut rng);
        assert_eq!(scan.births.len(), 1);
        assert_eq!(scan.deaths, 1);

        let rich = arena.get(ids[0]).expect("agent");
        assert!(rich.alive);
        assert!((rich.energy - 50.0).abs() < f32::EPSILON);
        let spent = arena.get(ids[1]).expect("agent");
        assert!(!spent.alive);
        assert!(spent.energy <= 0.0);
        assert!((scan.births[0].child.energy - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn success_rate_tracks_chance() {
        let params = ReproductionParams {
            chance: 0.01,
            ..ALWAYS
        };
        let mut rng = SimRng::from_seed(77);
        let trials = 40_000;
        let mut successes = 0;
        for _ in 0..trials {
            let (mut arena, _) = arena_with(&[(0.0, 0.0), (10.0, 0.0)]);
            successes += pair_scan(&mut arena, params, &mut rng).births.len();
        }
        let rate = successes as f32 / trials as f32;
        assert!((rate - 0.01).abs() < 0.003, "observed reproduction rate {rate}");
    }
}
