//! Plain actor model used by the headless demo and tests.

use super::{ActorRegistry, ActorState};
use crate::core_types::Vec2;
use crate::hull::HullId;
use serde::{Deserialize, Serialize};

/// One body part
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Limb {
    /// Worn equipment on this limb is fire-resistant
    pub fireproof: bool,
    /// Accumulated burn
    pub burnt: f32,
    /// Accumulated generic damage
    pub damage: f32,
}

/// A crew member or creature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub hull: Option<HullId>,
    pub position: Vec2,
    pub is_dead: bool,
    pub limbs: Vec<Limb>,
}

impl Character {
    /// Living character with `limb_count` unprotected limbs
    pub fn new(hull: Option<HullId>, position: Vec2, limb_count: usize) -> Self {
        Self {
            hull,
            position,
            is_dead: false,
            limbs: vec![Limb::default(); limb_count],
        }
    }

    /// Sum of generic damage over all limbs
    pub fn total_damage(&self) -> f32 {
        self.limbs.iter().map(|l| l.damage).sum()
    }

    /// Sum of burn over all limbs
    pub fn total_burn(&self) -> f32 {
        self.limbs.iter().map(|l| l.burnt).sum()
    }
}

impl ActorRegistry for Vec<Character> {
    fn actor_count(&self) -> usize {
        self.len()
    }

    fn actor(&self, index: usize) -> ActorState {
        let c = &self[index];
        ActorState {
            hull: c.hull,
            position: c.position,
            is_dead: c.is_dead,
            limb_count: c.limbs.len(),
        }
    }

    fn is_limb_fireproof(&self, actor: usize, limb: usize) -> bool {
        self[actor].limbs[limb].fireproof
    }

    fn burn_limb(&mut self, actor: usize, limb: usize, burn: f32, damage: f32) {
        let limb = &mut self[actor].limbs[limb];
        limb.burnt += burn;
        limb.damage += damage;
    }
}
