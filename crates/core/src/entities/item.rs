//! Plain item model used by the headless demo and tests.

use super::{ItemRegistry, ItemState};
use crate::core_types::Vec2;
use crate::hull::HullId;
use serde::{Deserialize, Serialize};

/// Condition lost per second of fire exposure by the built-in on-fire effect
pub const ON_FIRE_CONDITION_LOSS: f32 = 5.0;

/// A world item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub hull: Option<HullId>,
    pub position: Vec2,
    pub fireproof: bool,
    /// Condition in `[0, 100]`
    pub condition: f32,
    pub in_container: bool,
    /// Total seconds the on-fire effect has run
    pub fire_exposure: f32,
}

impl Item {
    /// Loose, flammable item at full condition
    pub fn new(hull: Option<HullId>, position: Vec2) -> Self {
        Self {
            hull,
            position,
            fireproof: false,
            condition: 100.0,
            in_container: false,
            fire_exposure: 0.0,
        }
    }
}

impl ItemRegistry for Vec<Item> {
    fn item_count(&self) -> usize {
        self.len()
    }

    fn item(&self, index: usize) -> ItemState {
        let item = &self[index];
        ItemState {
            hull: item.hull,
            position: item.position,
            fireproof: item.fireproof,
            condition: item.condition,
            in_container: item.in_container,
        }
    }

    fn apply_on_fire(&mut self, index: usize, dt: f32) {
        let item = &mut self[index];
        item.fire_exposure += dt;
        item.condition = (item.condition - ON_FIRE_CONDITION_LOSS * dt).max(0.0);
    }
}
