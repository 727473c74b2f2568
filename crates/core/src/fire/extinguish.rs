//! Putting fires out with standing water or a directed agent.

use super::config::FireConfig;
use super::region::FireRegion;
use super::{emission_count, rand_range};
use crate::core_types::Vec2;
use crate::feedback::{ParticleKind, ParticleSpawn, ParticleSpawner};
use crate::hull::Hull;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Result of pointing an extinguisher at a fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtinguishOutcome {
    /// The target point is outside the fire's reach; nothing changed.
    OutOfRange,
    /// The fire shrank but is still burning.
    Reduced,
    /// The fire shrank below the minimum size and has been removed.
    Extinguished,
}

/// Where steam puffs are spawned along the fire
#[derive(Debug, Clone, Copy)]
enum SteamSpread {
    /// Evenly across the fire's width
    Across,
    /// Around a world-space x coordinate
    Around(f32),
}

impl FireRegion {
    /// Shrink the fire with the hull's standing water, draining the water
    /// used. Returns true when the fire is too small to keep burning.
    pub(crate) fn extinguish_with_liquid<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        config: &FireConfig,
        hull: &mut Hull,
        particles: &mut dyn ParticleSpawner,
        rng: &mut R,
    ) -> bool {
        let amount =
            (hull.water_volume() / config.liquid_per_width).min(self.size.x) * 10.0 * dt;

        let steam_count = rand_range(rng, -5.0, amount.max(0.0).sqrt());
        self.emit_steam(steam_count, SteamSpread::Across, hull, particles, rng);

        self.shrink(amount);
        hull.set_water_volume(hull.water_volume() - amount);

        self.size.x < config.min_size
    }

    /// Apply `amount` per second of extinguishing agent aimed at `world_pos`,
    /// draining the agent used from the hull's standing water.
    ///
    /// Points more than `extinguish_reach` beyond the fire's span, below its
    /// bottom edge, or more than `extinguish_height` above its top are out of
    /// range. A non-finite dose changes nothing and is reported as out of
    /// range.
    #[expect(clippy::too_many_arguments)]
    pub(crate) fn extinguish_directed<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        amount: f32,
        world_pos: Vec2,
        config: &FireConfig,
        hull: &mut Hull,
        particles: &mut dyn ParticleSpawner,
        rng: &mut R,
    ) -> ExtinguishOutcome {
        let dose = amount * dt;
        if !dose.is_finite() || !self.in_extinguish_reach(world_pos, config, hull) {
            return ExtinguishOutcome::OutOfRange;
        }

        let steam_count = rand_range(rng, -5.0, amount.max(0.0).sqrt());
        self.emit_steam(
            steam_count,
            SteamSpread::Around(world_pos.x),
            hull,
            particles,
            rng,
        );

        self.shrink(dose);
        hull.set_water_volume(hull.water_volume() - dose);

        if self.size.x < config.min_size {
            ExtinguishOutcome::Extinguished
        } else {
            ExtinguishOutcome::Reduced
        }
    }

    /// True when a world point is close enough for directed extinguishing
    pub fn in_extinguish_reach(&self, world_pos: Vec2, config: &FireConfig, hull: &Hull) -> bool {
        let world = self.world_position(hull);
        let reach = config.extinguish_reach;

        if world_pos.x < world.x - reach || world_pos.x > world.x + self.size.x + reach {
            return false;
        }
        world_pos.y >= world.y - self.size.y && world_pos.y <= world.y + config.extinguish_height
    }

    /// Narrow the fire symmetrically around its center. Non-finite amounts
    /// are ignored.
    fn shrink(&mut self, amount: f32) {
        if !amount.is_finite() {
            return;
        }
        self.position.x += amount / 2.0;
        self.size.x -= amount;
    }

    fn emit_steam<R: Rng + ?Sized>(
        &self,
        count: f32,
        spread: SteamSpread,
        hull: &Hull,
        particles: &mut dyn ParticleSpawner,
        rng: &mut R,
    ) {
        let world = self.world_position(hull);
        let center_x = world.x + self.size.x / 2.0;
        let rise = self.size.x.max(0.0).sqrt();
        let size_scale = (self.size.x / 10.0).clamp(0.5, 3.0);

        for i in 0..emission_count(count) {
            let base_x = match spread {
                SteamSpread::Across => world.x + self.size.x * (i as f32 / count),
                SteamSpread::Around(x) => x,
            };
            let position = Vec2::new(
                base_x + rand_range(rng, -5.0, 5.0),
                rand_range(rng, world.y - self.size.y, world.y) + 10.0,
            );
            let velocity = Vec2::new(position.x - center_x, rise * rand_range(rng, 20.0, 25.0));

            particles.spawn(ParticleSpawn {
                kind: ParticleKind::Steam,
                position,
                velocity,
                hull: hull.id(),
                size_scale,
                ember_source: None,
            });
        }
    }
}
