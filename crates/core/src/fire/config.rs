//! Tunable fire constants.

use crate::core_types::Vec2;
use crate::error::FireError;
use crate::feedback::Color;
use serde::{Deserialize, Serialize};

/// How the item damage scan treats items held in a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ItemScanPolicy {
    /// The first contained item ends the item scan for that fire and tick.
    /// Items after it in the registry are not burned this tick.
    #[default]
    StopAtContained,
    /// Contained items are skipped; the scan continues.
    SkipContained,
}

/// Fire simulation configuration.
///
/// Defaults are the tuned reference values. Hosts may load this from their
/// own config files through serde.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireConfig {
    /// Gas consumed per unit width per second
    pub oxygen_consumption: f32,
    /// Width gained per second at full oxygen
    pub grow_speed: f32,
    /// Fires narrower than this are destroyed
    pub min_size: f32,
    /// Size of a freshly ignited fire
    pub initial_size: Vec2,
    /// Oxygen percentage below which fires start to starve
    pub starvation_threshold: f32,
    /// Width above which the fire settles onto the hull floor
    pub settle_width: f32,

    /// Actor damage reach per `sqrt(width)`
    pub actor_range_factor: f32,
    /// Item damage reach per `sqrt(width)`
    pub item_range_factor: f32,
    /// Burn accumulated per point of limb damage
    pub burn_multiplier: f32,
    pub item_scan_policy: ItemScanPolicy,

    /// Horizontal reach of directed extinguishing beyond the fire's span
    pub extinguish_reach: f32,
    /// Vertical reach of directed extinguishing above the fire's top
    pub extinguish_height: f32,
    /// Liquid volume that extinguishes one unit of width per second (divided by 10)
    pub liquid_per_width: f32,

    /// Chance that a flame particle is an ember able to ignite other hulls
    pub ember_chance: f64,
    /// Chance of an extra smoke particle per flame on wide fires
    pub smoke_chance: f64,
    /// Minimum width for smoke
    pub smoke_width: f32,
    /// Half-width of the window around an ember landing that must be fire-free
    pub ignition_margin: f32,

    /// Audible range of the fire loops
    pub sound_range: f32,
    /// Width at which the small loop reaches full volume
    pub basic_loop_width: f32,
    /// Width at which the large loop starts to fade in
    pub large_loop_threshold: f32,

    pub ignition_light_range: f32,
    pub ignition_light_color: Color,
    pub light_color: Color,

    /// Only merge overlapping fires that burn in the same hull
    pub merge_requires_same_hull: bool,
    /// RNG seed; `None` seeds from OS entropy
    pub seed: Option<u64>,
}

impl Default for FireConfig {
    fn default() -> Self {
        Self {
            oxygen_consumption: 50.0,
            grow_speed: 5.0,
            min_size: 1.0,
            initial_size: Vec2::new(10.0, 10.0),
            starvation_threshold: 20.0,
            settle_width: 50.0,
            actor_range_factor: 20.0,
            item_range_factor: 10.0,
            burn_multiplier: 10.0,
            item_scan_policy: ItemScanPolicy::StopAtContained,
            extinguish_reach: 100.0,
            extinguish_height: 500.0,
            liquid_per_width: 100.0,
            ember_chance: 1.0 / 20.0,
            smoke_chance: 1.0 / 5.0,
            smoke_width: 100.0,
            ignition_margin: 100.0,
            sound_range: 2000.0,
            basic_loop_width: 100.0,
            large_loop_threshold: 200.0,
            ignition_light_range: 50.0,
            ignition_light_color: Color::new(1.0, 0.9, 0.7),
            light_color: Color::new(1.0, 0.45, 0.3),
            merge_requires_same_hull: false,
            seed: None,
        }
    }
}

impl FireConfig {
    /// Default configuration with a fixed RNG seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Check every value is usable.
    pub fn validate(&self) -> Result<(), FireError> {
        let positive = [
            ("grow_speed", self.grow_speed),
            ("min_size", self.min_size),
            ("initial_size.x", self.initial_size.x),
            ("initial_size.y", self.initial_size.y),
            ("starvation_threshold", self.starvation_threshold),
            ("liquid_per_width", self.liquid_per_width),
            ("sound_range", self.sound_range),
            ("basic_loop_width", self.basic_loop_width),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(FireError::not_positive(field, value));
            }
        }

        let non_negative = [
            ("oxygen_consumption", self.oxygen_consumption),
            ("settle_width", self.settle_width),
            ("actor_range_factor", self.actor_range_factor),
            ("item_range_factor", self.item_range_factor),
            ("burn_multiplier", self.burn_multiplier),
            ("extinguish_reach", self.extinguish_reach),
            ("extinguish_height", self.extinguish_height),
            ("smoke_width", self.smoke_width),
            ("ignition_margin", self.ignition_margin),
            ("large_loop_threshold", self.large_loop_threshold),
            ("ignition_light_range", self.ignition_light_range),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(FireError::InvalidConfig {
                    field,
                    reason: format!("must be finite and non-negative, got {value}"),
                });
            }
        }

        for (field, p) in [
            ("ember_chance", self.ember_chance),
            ("smoke_chance", self.smoke_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(FireError::not_probability(field, p));
            }
        }

        if self.initial_size.x < self.min_size {
            return Err(FireError::InvalidConfig {
                field: "initial_size.x",
                reason: format!(
                    "must be at least min_size ({}), got {}",
                    self.min_size, self.initial_size.x
                ),
            });
        }

        Ok(())
    }
}
