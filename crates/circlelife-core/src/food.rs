//! Fixed set of food slots with probabilistic respawn.

use serde::{Deserialize, Serialize};

use crate::Position;
use crate::rng::SimRng;

/// Food slots; an empty slot holds `None` until it respawns.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FoodField {
    slots: Vec<Option<Position>>,
}

fn random_position(width: f32, height: f32, rng: &mut SimRng) -> Position {
    let x = rng.next_float() * width;
    let y = rng.next_float() * height;
    Position::new(x, y)
}

impl FoodField {
    /// Construct `count` slots, all present at uniformly random positions.
    pub fn scatter(count: usize, width: f32, height: f32, rng: &mut SimRng) -> Self {
        let slots = (0..count)
            .map(|_| Some(random_position(width, height, rng)))
            .collect();
        Self { slots }
    }

    /// Construct a field from explicit slot contents.
    #[must_use]
    pub fn from_slots(slots: Vec<Option<Position>>) -> Self {
        Self { slots }
    }

    /// Total number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn slots(&self) -> &[Option<Position>] {
        &self.slots
    }

    /// Number of slots currently holding food.
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Give every empty slot an independent `chance` to respawn somewhere random.
    ///
    /// Occupied slots draw nothing. Returns the number of slots refilled.
    pub fn respawn(&mut self, chance: f32, width: f32, height: f32, rng: &mut SimRng) -> usize {
        let mut refilled = 0;
        for slot in &mut self.slots {
            if slot.is_none() && rng.chance(chance) {
                *slot = Some(random_position(width, height, rng));
                refilled += 1;
            }
        }
        refilled
    }

    /// Empty every slot strictly within `sqrt(radius_sq)` of `position`.
    ///
    /// Returns how many items were claimed.
    pub fn claim_within(&mut self, position: Position, radius_sq: f32) -> usize {
        let mut claimed = 0;
        for slot in &mut self.slots {
            if slot.is_some_and(|food| food.distance_sq(position) < radius_sq) {
                *slot = None;
                claimed += 1;
            }
        }
        claimed
    }
}
