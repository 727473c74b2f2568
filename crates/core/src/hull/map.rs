//! Hull storage and the world-space containment query.

use super::{Hull, HullId};
use crate::core_types::{Rect, Vec2};
use rustc_hash::FxHashMap;

/// All hulls of the running session, keyed by [`HullId`].
#[derive(Debug, Default)]
pub struct HullMap {
    hulls: FxHashMap<HullId, Hull>,
    next_id: u32,
}

impl HullMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hull with the given local bounds and vessel origin, returning its id
    pub fn add(&mut self, rect: Rect, vessel_origin: Vec2) -> HullId {
        let id = HullId(self.next_id);
        self.next_id += 1;
        self.hulls.insert(id, Hull::new(id, rect, vessel_origin));
        id
    }

    /// Insert a prebuilt hull, replacing any hull with the same id
    pub fn insert(&mut self, hull: Hull) {
        self.next_id = self.next_id.max(hull.id.0 + 1);
        self.hulls.insert(hull.id, hull);
    }

    pub fn get(&self, id: HullId) -> Option<&Hull> {
        self.hulls.get(&id)
    }

    pub fn get_mut(&mut self, id: HullId) -> Option<&mut Hull> {
        self.hulls.get_mut(&id)
    }

    /// Remove a hull from the map.
    ///
    /// Fires that still reference it become inert; call
    /// [`FireRegistry::clear_hull`](crate::fire::FireRegistry::clear_hull)
    /// first to release them.
    pub fn remove(&mut self, id: HullId) -> Option<Hull> {
        self.hulls.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.hulls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hulls.is_empty()
    }

    /// Hull ids in ascending order
    pub fn ids(&self) -> Vec<HullId> {
        let mut ids: Vec<HullId> = self.hulls.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Find the hull containing a world-space point.
    ///
    /// The `hint` hull is tested first, since callers usually know which hull
    /// a point was in last frame. Other hulls are tested in id order so the
    /// result is deterministic when hulls touch.
    pub fn find_hull(&self, world_pos: Vec2, hint: Option<HullId>) -> Option<HullId> {
        if let Some(hull) = hint.and_then(|id| self.hulls.get(&id)) {
            if hull.world_rect().contains(world_pos) {
                return Some(hull.id);
            }
        }

        self.ids()
            .into_iter()
            .find(|id| self.hulls[id].world_rect().contains(world_pos))
    }
}
