//! Enclosed compartments ("hulls") that fires live inside.
//!
//! A hull owns its geometry and its gas/liquid model. Fires hold only a
//! [`HullId`] back-reference and resolve it through the [`HullMap`] every
//! time they need the hull, so a fire never keeps a hull alive.

pub mod map;

pub use map::HullMap;

use crate::core_types::{Rect, Vec2};
use crate::fire::FireId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a hull inside a [`HullMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HullId(pub u32);

impl fmt::Display for HullId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hull#{}", self.0)
    }
}

/// A bounded, gas- and liquid-holding compartment.
#[derive(Debug, Clone)]
pub struct Hull {
    pub(crate) id: HullId,
    /// Bounds in the owning vessel's local frame
    pub(crate) rect: Rect,
    /// World position of the owning vessel
    pub(crate) vessel_origin: Vec2,
    /// Breathable gas volume, `[0, full_volume]`
    pub(crate) oxygen: f32,
    /// Standing liquid volume, `[0, full_volume]`
    pub(crate) water_volume: f32,
    /// Fires currently burning in this hull
    pub(crate) fires: Vec<FireId>,
}

impl Hull {
    /// Create a hull filled with breathable gas and no standing liquid
    pub fn new(id: HullId, rect: Rect, vessel_origin: Vec2) -> Self {
        let full = rect.area().max(0.0);
        Self {
            id,
            rect,
            vessel_origin,
            oxygen: full,
            water_volume: 0.0,
            fires: Vec::new(),
        }
    }

    pub fn id(&self) -> HullId {
        self.id
    }

    /// Bounds in the vessel's local frame
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Bounds in world space
    pub fn world_rect(&self) -> Rect {
        self.rect.translated(self.vessel_origin)
    }

    pub fn vessel_origin(&self) -> Vec2 {
        self.vessel_origin
    }

    /// Move the owning vessel (all local positions follow)
    pub fn set_vessel_origin(&mut self, origin: Vec2) {
        if crate::core_types::is_finite(&origin) {
            self.vessel_origin = origin;
        }
    }

    /// Total gas/liquid capacity
    pub fn full_volume(&self) -> f32 {
        self.rect.area().max(0.0)
    }

    /// Local y of the floor
    pub fn floor(&self) -> f32 {
        self.rect.bottom()
    }

    /// Local y of the ceiling
    pub fn ceiling(&self) -> f32 {
        self.rect.top()
    }

    pub fn oxygen(&self) -> f32 {
        self.oxygen
    }

    /// Set the breathable gas volume, clamped to `[0, full_volume]`
    pub fn set_oxygen(&mut self, oxygen: f32) {
        if oxygen.is_finite() {
            self.oxygen = oxygen.clamp(0.0, self.full_volume());
        }
    }

    /// Breathable gas as a fraction of capacity, `[0, 1]`
    pub fn gas_fraction(&self) -> f32 {
        let full = self.full_volume();
        if full <= 0.0 {
            0.0
        } else {
            self.oxygen / full
        }
    }

    /// Breathable gas as a percentage of capacity, `[0, 100]`
    pub fn oxygen_percentage(&self) -> f32 {
        self.gas_fraction() * 100.0
    }

    pub fn water_volume(&self) -> f32 {
        self.water_volume
    }

    /// Set the standing liquid volume, clamped to `[0, full_volume]`
    pub fn set_water_volume(&mut self, volume: f32) {
        if volume.is_finite() {
            self.water_volume = volume.clamp(0.0, self.full_volume());
        }
    }

    /// Ids of the fires burning in this hull
    pub fn fires(&self) -> &[FireId] {
        &self.fires
    }

    pub(crate) fn attach_fire(&mut self, fire: FireId) {
        if !self.fires.contains(&fire) {
            self.fires.push(fire);
        }
    }

    pub(crate) fn detach_fire(&mut self, fire: FireId) {
        self.fires.retain(|&f| f != fire);
    }
}
