//! Burning actors and items near a fire.

use super::config::{FireConfig, ItemScanPolicy};
use super::region::FireRegion;
use crate::core_types::Vec2;
use crate::entities::{ActorRegistry, ItemRegistry};
use crate::hull::Hull;

impl FireRegion {
    /// True when `point` lies within `range` of the fire horizontally and
    /// between the fire's bottom edge and the hull ceiling vertically.
    fn in_reach(&self, point: Vec2, range: f32, hull: &Hull) -> bool {
        if point.x < self.left() - range || point.x > self.right() + range {
            return false;
        }
        point.y >= self.position.y - self.size.y && point.y <= hull.ceiling()
    }

    /// Burn every living actor in this hull that is close enough.
    ///
    /// Damage is `sqrt(width) * dt` split evenly over the actor's limbs;
    /// limbs under fire-resistant gear are skipped. Returns the number of
    /// actors hit.
    pub(crate) fn damage_actors(
        &self,
        dt: f32,
        config: &FireConfig,
        hull: &Hull,
        actors: &mut dyn ActorRegistry,
    ) -> usize {
        if self.size.x <= 0.0 {
            return 0;
        }

        let range = self.size.x.sqrt() * config.actor_range_factor;
        let mut hit = 0;

        for index in 0..actors.actor_count() {
            let actor = actors.actor(index);
            if actor.is_dead || actor.hull != Some(self.hull) || actor.limb_count == 0 {
                continue;
            }
            if !self.in_reach(actor.position, range, hull) {
                continue;
            }

            let damage = self.size.x.sqrt() * dt / actor.limb_count as f32;
            for limb in 0..actor.limb_count {
                if actors.is_limb_fireproof(index, limb) {
                    continue;
                }
                actors.burn_limb(index, limb, damage * config.burn_multiplier, damage);
            }
            hit += 1;
        }

        hit
    }

    /// Run the on-fire effect of every flammable item in reach. Returns the
    /// number of items affected.
    ///
    /// With [`ItemScanPolicy::StopAtContained`] the first contained item ends
    /// the scan for this tick.
    pub(crate) fn damage_items(
        &self,
        dt: f32,
        config: &FireConfig,
        hull: &Hull,
        items: &mut dyn ItemRegistry,
    ) -> usize {
        if self.size.x <= 0.0 {
            return 0;
        }

        let range = self.size.x.sqrt() * config.item_range_factor;
        let mut hit = 0;

        for index in 0..items.item_count() {
            let item = items.item(index);
            if item.hull != Some(self.hull) || item.fireproof || item.condition <= 0.0 {
                continue;
            }
            if item.in_container {
                match config.item_scan_policy {
                    ItemScanPolicy::StopAtContained => break,
                    ItemScanPolicy::SkipContained => continue,
                }
            }
            if !self.in_reach(item.position, range, hull) {
                continue;
            }

            items.apply_on_fire(index, dt);
            hit += 1;
        }

        hit
    }
}
