//! A single fire and its per-tick growth and feedback step.

use super::config::FireConfig;
use super::events::RemovalCause;
use super::{emission_count, rand_range, FireContext, FireId};
use crate::core_types::{is_finite, Rect, Vec2};
use crate::feedback::{
    AudioPlayer, FireSounds, LightId, LightRenderer, ParticleKind, ParticleSpawn, ParticleSpawner,
    SlotId,
};
use crate::hull::{Hull, HullId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Width over which the large loop fades from silent to full volume
const LARGE_LOOP_FADE: f32 = 100.0;
/// Flame particles spawn this far above the sampled point
const PARTICLE_LIFT: f32 = 10.0;

/// One rectangular fire burning in a hull.
///
/// `position` is the top-left anchor in the vessel's local frame; the fire
/// covers `[x, x + size.x]` horizontally and hangs down to `y - size.y`.
/// After every mutation the rectangle is clamped to the hull's bounds.
#[derive(Debug)]
pub struct FireRegion {
    pub(crate) id: FireId,
    pub(crate) hull: HullId,
    pub(crate) position: Vec2,
    pub(crate) size: Vec2,
    pub(crate) light: Option<LightId>,
    pub(crate) basic_slot: Option<SlotId>,
    pub(crate) large_slot: Option<SlotId>,
}

/// Plain copy of a fire's geometry, for observation and replication
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireSnapshot {
    pub id: FireId,
    pub hull: HullId,
    pub position: Vec2,
    pub size: Vec2,
}

/// Growth scalar from the hull's oxygen percentage.
///
/// `1.0` at or above `threshold`; below it, falls linearly to `-1.0` at zero
/// oxygen, so starved fires shrink.
pub fn growth_modifier(oxygen_percentage: f32, threshold: f32) -> f32 {
    if oxygen_percentage < threshold {
        oxygen_percentage / (threshold * 0.5) - 1.0
    } else {
        1.0
    }
}

impl FireRegion {
    /// Ignite a fire at a world point inside `hull`
    pub(crate) fn new(
        id: FireId,
        hull: &Hull,
        world_pos: Vec2,
        config: &FireConfig,
        lights: &mut dyn LightRenderer,
    ) -> Self {
        // Anchor sits 5 units right of and below the ignition point
        let position = world_pos + Vec2::new(5.0, -5.0) - hull.vessel_origin();
        let light = lights.create(
            hull.vessel_origin() + position,
            config.ignition_light_range,
            config.ignition_light_color,
        );

        let mut fire = Self {
            id,
            hull: hull.id(),
            position,
            size: config.initial_size,
            light: Some(light),
            basic_slot: None,
            large_slot: None,
        };
        fire.limit_size(hull);
        fire
    }

    pub fn id(&self) -> FireId {
        self.id
    }

    /// Hull this fire burns in
    pub fn hull(&self) -> HullId {
        self.hull
    }

    /// Vessel-local top-left anchor
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Anchor in world space
    pub fn world_position(&self, hull: &Hull) -> Vec2 {
        hull.vessel_origin() + self.position
    }

    /// Vessel-local bounds
    pub fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.size.x, self.size.y)
    }

    pub fn left(&self) -> f32 {
        self.position.x
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.size.x
    }

    pub fn light(&self) -> Option<LightId> {
        self.light
    }

    /// Loop slots `(basic, large)` held from the last tick
    pub fn sound_slots(&self) -> (Option<SlotId>, Option<SlotId>) {
        (self.basic_slot, self.large_slot)
    }

    pub fn snapshot(&self) -> FireSnapshot {
        FireSnapshot {
            id: self.id,
            hull: self.hull,
            position: self.position,
            size: self.size,
        }
    }

    /// Move the anchor. Non-finite positions are ignored.
    pub fn set_position(&mut self, position: Vec2) -> bool {
        if !is_finite(&position) {
            return false;
        }
        self.position = position;
        true
    }

    /// Resize around the horizontal center, then clamp to the hull.
    /// Non-finite sizes are ignored.
    pub fn set_size(&mut self, size: Vec2, hull: &Hull) -> bool {
        if !is_finite(&size) {
            return false;
        }
        if size == self.size {
            return true;
        }
        let change = size - self.size;
        self.size = size;
        self.position.x -= change.x * 0.5;
        self.limit_size(hull);
        true
    }

    /// Horizontal containment of a vessel-local point (edges excluded)
    pub fn contains(&self, point: Vec2) -> bool {
        point.x > self.left() && point.x < self.right()
    }

    /// True when the horizontal spans touch or overlap
    pub fn overlaps(&self, other: &FireRegion) -> bool {
        !(self.left() > other.right() || self.right() < other.left())
    }

    /// Keep the rectangle inside the hull's walls, ceiling and floor
    pub(crate) fn limit_size(&mut self, hull: &Hull) {
        let rect = hull.rect();
        self.position.x = self.position.x.max(rect.left()).min(rect.right());
        self.position.y = self.position.y.clamp(rect.bottom(), rect.top());

        self.size.x = self
            .size
            .x
            .min(rect.width - (self.position.x - rect.left()))
            .max(0.0);
        self.size.y = self
            .size
            .y
            .min(rect.height - (rect.top() - self.position.y))
            .max(0.0);
    }

    /// Advance one tick. Returns why the fire died, if it did.
    pub(crate) fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        config: &FireConfig,
        sounds: &FireSounds,
        ctx: &mut FireContext<'_>,
        rng: &mut R,
    ) -> Option<RemovalCause> {
        let Some(hull) = ctx.hulls.get_mut(self.hull) else {
            trace!(fire = %self.id, hull = %self.hull, "Hull missing, fire is inert");
            return None;
        };

        let flame_count = rand_range(rng, 0.0, self.size.x.max(0.0).sqrt() / 3.0);

        self.refresh_audio(config, sounds, hull, ctx.audio);

        // Large fires settle onto the floor
        if self.size.x > config.settle_width {
            self.position.y += (hull.floor() - self.position.y) * dt.min(1.0);
        }

        let grow_modifier = growth_modifier(hull.oxygen_percentage(), config.starvation_threshold);

        self.emit_flames(flame_count, grow_modifier, config, hull, ctx.particles, rng);

        self.damage_actors(dt, config, hull, ctx.actors);
        self.damage_items(dt, config, hull, ctx.items);

        if hull.water_volume() > 0.0
            && self.extinguish_with_liquid(dt, config, hull, ctx.particles, rng)
        {
            return Some(RemovalCause::Extinguished);
        }

        hull.set_oxygen(hull.oxygen() - self.size.x * dt * config.oxygen_consumption);

        self.position.x -= config.grow_speed * grow_modifier * 0.5 * dt;
        self.size.x += config.grow_speed * grow_modifier * dt;
        self.limit_size(hull);

        if self.size.x < config.min_size {
            return Some(RemovalCause::Starved);
        }
        debug_assert!(
            self.size.x >= 0.0 && self.size.y >= 0.0 && is_finite(&self.position),
            "fire geometry escaped its hull: {:?}",
            self.rect()
        );

        self.refresh_light(config, hull, ctx.lights, rng);
        None
    }

    /// Play or refresh both fire loops.
    ///
    /// The slots from the previous call are passed back to the audio player,
    /// so repeated calls keep the same loops alive.
    pub fn refresh_audio(
        &mut self,
        config: &FireConfig,
        sounds: &FireSounds,
        hull: &Hull,
        audio: &mut dyn AudioPlayer,
    ) {
        let center = self.world_position(hull) + Vec2::new(self.size.x, -self.size.y) * 0.5;

        if let Some(sound) = sounds.basic {
            let volume = (self.size.x / config.basic_loop_width).min(1.0);
            self.basic_slot =
                audio.play_loop(sound, self.basic_slot, volume, center, config.sound_range);
        }
        if let Some(sound) = sounds.large {
            let volume =
                ((self.size.x - config.large_loop_threshold) / LARGE_LOOP_FADE).clamp(0.0, 1.0);
            self.large_slot =
                audio.play_loop(sound, self.large_slot, volume, center, config.sound_range);
        }
    }

    fn emit_flames<R: Rng + ?Sized>(
        &self,
        count: f32,
        grow_modifier: f32,
        config: &FireConfig,
        hull: &Hull,
        particles: &mut dyn ParticleSpawner,
        rng: &mut R,
    ) {
        let world = self.world_position(hull);
        let rise = self.size.x.max(0.0).sqrt();
        let size_scale = (self.size.x / 100.0 * hull.gas_fraction().max(0.4)).clamp(0.5, 4.0);

        for _ in 0..emission_count(count) {
            let position = Vec2::new(
                world.x + rand_range(rng, 0.0, self.size.x),
                rand_range(rng, world.y - self.size.y, world.y) + PARTICLE_LIFT,
            );
            let velocity = Vec2::new(
                position.x - (world.x + self.size.x / 2.0),
                rise * rand_range(rng, 10.0, 15.0) * grow_modifier,
            );
            let ember_source = rng.random_bool(config.ember_chance).then_some(self.id);

            let flame = particles.spawn(ParticleSpawn {
                kind: ParticleKind::Flame,
                position,
                velocity,
                hull: hull.id(),
                size_scale,
                ember_source,
            });
            if flame.is_none() || self.size.x < config.smoke_width {
                continue;
            }

            if rng.random_bool(config.smoke_chance) {
                particles.spawn(ParticleSpawn {
                    kind: ParticleKind::Smoke,
                    position,
                    velocity,
                    hull: hull.id(),
                    size_scale,
                    ember_source: None,
                });
            }
        }
    }

    fn refresh_light<R: Rng + ?Sized>(
        &self,
        config: &FireConfig,
        hull: &Hull,
        lights: &mut dyn LightRenderer,
        rng: &mut R,
    ) {
        let Some(light) = self.light else {
            return;
        };
        let range = self.size.x.max(self.size.y) * rand_range(rng, 8.0, 10.0) / 2.0;
        let color = config.light_color.scaled(rand_range(rng, 0.8, 1.0));
        lights.set(light, self.world_position(hull), range, color);
    }

    /// Stop both loops and remove the light. Safe to call twice.
    pub(crate) fn release(&mut self, audio: &mut dyn AudioPlayer, lights: &mut dyn LightRenderer) {
        if let Some(light) = self.light.take() {
            lights.remove(light);
        }
        if let Some(slot) = self.basic_slot.take() {
            audio.stop(slot);
        }
        if let Some(slot) = self.large_slot.take() {
            audio.stop(slot);
        }
    }
}
