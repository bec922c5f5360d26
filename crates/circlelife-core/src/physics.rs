//! Sequential collision response and arena boundary clamping.

use crate::rng::SimRng;
use crate::{Position, Velocity};

/// Geometry and noise parameters used while moving one agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    pub radius: f32,
    pub width: f32,
    pub height: f32,
    pub jitter: f32,
    pub nudge: f32,
}

/// Result of moving one agent through its neighbours and the walls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionOutcome {
    pub position: Position,
    pub velocity: Velocity,
    pub collisions: usize,
}

/// Move an agent one tick and resolve overlaps against `neighbours`.
///
/// `neighbours` must yield the current stored positions of every other live
/// agent in population order. Each overlap is resolved as soon as it is
/// found and accumulates into the same candidate position and velocity.
/// Coincident centres take a random nudge instead of a normal, so no
/// division by zero occurs.
pub fn integrate<I>(
    position: Position,
    velocity: Velocity,
    neighbours: I,
    params: MotionParams,
    rng: &mut SimRng,
) -> MotionOutcome
where
    I: IntoIterator<Item = Position>,
{
    let min_dist = params.radius * 2.0;
    let mut candidate = position.offset(velocity);
    let mut velocity = velocity;
    let mut collisions = 0;

    for other in neighbours {
        let dx = candidate.x - other.x;
        let dy = candidate.y - other.y;
        let dist_sq = dx * dx + dy * dy;
        if dist_sq >= min_dist * min_dist {
            continue;
        }
        collisions += 1;

        let dist = dist_sq.sqrt();
        if dist == 0.0 {
            candidate.x += rng.centered(params.nudge);
            candidate.y += rng.centered(params.nudge);
            continue;
        }

        let nx = dx / dist;
        let ny = dy / dist;
        let overlap = min_dist - dist;
        candidate.x += nx * overlap * 0.5;
        candidate.y += ny * overlap * 0.5;

        let dot = velocity.dot(nx, ny);
        velocity.vx -= 2.0 * dot * nx;
        velocity.vy -= 2.0 * dot * ny;

        velocity.vx += rng.centered(params.jitter);
        velocity.vy += rng.centered(params.jitter);
    }

    let (x, vx) = clamp_axis(candidate.x, velocity.vx, params.radius, params.width);
    let (y, vy) = clamp_axis(candidate.y, velocity.vy, params.radius, params.height);
    MotionOutcome {
        position: Position::new(x, y),
        velocity: Velocity::new(vx, vy),
        collisions,
    }
}

/// Keep `value` within `[radius, extent - radius]`, flipping `speed` on contact.
#[must_use]
pub fn clamp_axis(value: f32, speed: f32, radius: f32, extent: f32) -> (f32, f32) {
    if value < radius {
        (radius, -speed)
    } else if value > extent - radius {
        (extent - radius, -speed)
    } else {
        (value, speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const PARAMS: MotionParams = MotionParams {
        radius: 10.0,
        width: 800.0,
        height: 600.0,
        jitter: 0.1,
        nudge: 0.5,
    };

    #[test]
    fn free_agent_moves_by_velocity() {
        let mut rng = SimRng::from_seed(1);
        let outcome = integrate(
            Position::new(100.0, 100.0),
            Velocity::new(1.5, -0.5),
            Vec::<Position>::new(),
            PARAMS,
            &mut rng,
        );
        assert_eq!(outcome.position, Position::new(101.5, 99.5));
        assert_eq!(outcome.velocity, Velocity::new(1.5, -0.5));
        assert_eq!(outcome.collisions, 0);
    }

    #[test]
    fn touching_agents_are_not_corrected() {
        let mut rng = SimRng::from_seed(1);
        let outcome = integrate(
            Position::new(100.0, 100.0),
            Velocity::default(),
            [Position::new(120.0, 100.0)],
            PARAMS,
            &mut rng,
        );
        assert_eq!(outcome.position, Position::new(100.0, 100.0));
        assert_eq!(outcome.collisions, 0);
    }

    #[test]
    fn overlap_pushes_apart_and_reflects_velocity() {
        let mut rng = SimRng::from_seed(1);
        let outcome = integrate(
            Position::new(100.0, 100.0),
            Velocity::new(2.0, 0.0),
            [Position::new(114.0, 100.0)],
            PARAMS,
            &mut rng,
        );
        // Candidate 102 sits 12 from the neighbour: overlap 8, half of it applied.
        assert!((outcome.position.x - 98.0).abs() < 1e-4);
        assert!((outcome.position.y - 100.0).abs() < 0.11);
        assert!((outcome.velocity.vx + 2.0).abs() <= 0.1 + 1e-5);
        assert!(outcome.velocity.vy.abs() <= 0.1 + 1e-5);
        assert_eq!(outcome.collisions, 1);
    }

    #[test]
    fn coincident_centres_take_the_nudge_path() {
        let mut rng = SimRng::from_seed(99);
        let outcome = integrate(
            Position::new(200.0, 200.0),
            Velocity::default(),
            [Position::new(200.0, 200.0)],
            PARAMS,
            &mut rng,
        );
        assert!(outcome.position.x.is_finite() && outcome.position.y.is_finite());
        assert!((outcome.position.x - 200.0).abs() <= 0.5);
        assert!((outcome.position.y - 200.0).abs() <= 0.5);
        assert_eq!(outcome.velocity, Velocity::default());
        assert_eq!(outcome.collisions, 1);
    }

    #[test]
    fn neighbours_resolve_sequentially() {
        let mut rng = SimRng::from_seed(4);
        let outcome = integrate(
            Position::new(100.0, 100.0),
            Velocity::default(),
            [Position::new(115.0, 100.0), Position::new(85.0, 100.0)],
            PARAMS,
            &mut rng,
        );
        // First push moves to 97.5; the second neighbour then sees 12.5 and pushes to 101.25.
        assert!((outcome.position.x - 101.25).abs() < 1e-4);
        assert_eq!(outcome.collisions, 2);
    }

    #[test]
    fn walls_clamp_and_invert() {
        assert_eq!(clamp_axis(4.0, -3.0, 10.0, 800.0), (10.0, 3.0));
        assert_eq!(clamp_axis(795.0, 3.0, 10.0, 800.0), (790.0, -3.0));
        assert_eq!(clamp_axis(400.0, 3.0, 10.0, 800.0), (400.0, 3.0));
        assert_eq!(clamp_axis(10.0, -1.0, 10.0, 800.0), (10.0, -1.0));
    }

    proptest! {
        #[test]
        fn integrated_positions_stay_in_bounds(
            x in -50.0f32..850.0,
            y in -50.0f32..650.0,
            vx in -5.0f32..5.0,
            vy in -5.0f32..5.0,
            ox in 0.0f32..800.0,
            oy in 0.0f32..600.0,
            seed in any::<u64>(),
        ) {
            let mut rng = SimRng::from_seed(seed);
            let outcome = integrate(
                Position::new(x, y),
                Velocity::new(vx, vy),
                [Position::new(ox, oy)],
                PARAMS,
                &mut rng,
            );
            prop_assert!(outcome.position.x >= PARAMS.radius);
            prop_assert!(outcome.position.x <= PARAMS.width - PARAMS.radius);
            prop_assert!(outcome.position.y >= PARAMS.radius);
            prop_assert!(outcome.position.y <= PARAMS.height - PARAMS.radius);
        }
    }
}
