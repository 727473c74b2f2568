//! Actors and items that fires damage.
//!
//! Both registries are read by position every tick and mutated only through
//! their damage or status-effect call. The simulation never adds or removes
//! actors or items.

pub mod character;
pub mod item;

pub use character::{Character, Limb};
pub use item::Item;

use crate::core_types::Vec2;
use crate::hull::HullId;

/// What a fire needs to know about an actor this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorState {
    /// Hull the actor is standing in, if any
    pub hull: Option<HullId>,
    /// Vessel-local position
    pub position: Vec2,
    pub is_dead: bool,
    pub limb_count: usize,
}

/// Registry of damageable actors.
pub trait ActorRegistry {
    fn actor_count(&self) -> usize;

    fn actor(&self, index: usize) -> ActorState;

    /// True when the limb is covered by fire-resistant worn equipment
    fn is_limb_fireproof(&self, actor: usize, limb: usize) -> bool;

    /// Add burn accumulation and generic damage to one limb
    fn burn_limb(&mut self, actor: usize, limb: usize, burn: f32, damage: f32);
}

/// What a fire needs to know about an item this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemState {
    pub hull: Option<HullId>,
    /// Vessel-local position
    pub position: Vec2,
    pub fireproof: bool,
    pub condition: f32,
    /// True when the item is held in an inventory or container
    pub in_container: bool,
}

/// Registry of items with an "on fire" status-effect hook.
pub trait ItemRegistry {
    fn item_count(&self) -> usize;

    fn item(&self, index: usize) -> ItemState;

    /// Run the item's on-fire status effects for `dt` seconds
    fn apply_on_fire(&mut self, index: usize, dt: f32);
}
