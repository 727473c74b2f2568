//! Spreading fires inside hulls.
//!
//! A [`FireRegion`] is one rectangular fire. It grows while its hull has
//! breathable gas, starves without it, burns nearby actors and items, and is
//! put out by standing water or a directed extinguisher. The
//! [`FireRegistry`] owns every active region and advances them once per
//! simulation tick, then merges regions whose horizontal spans overlap.
//!
//! # Per-tick order
//!
//! 1. Every region updates independently (feedback, damage, liquid
//!    extinguish, gas consumption, growth, bounds clamp, light).
//! 2. Overlapping regions are merged into the lower-indexed survivor.
//! 3. Destroyed and merged regions are released in one compaction pass.
//!
//! Nothing here runs concurrently; both passes are strictly sequential.

pub mod config;
mod damage;
pub mod events;
mod extinguish;
pub mod region;
pub mod registry;

pub use config::{FireConfig, ItemScanPolicy};
pub use events::{EventOrigin, FireEvent, RemovalCause};
pub use extinguish::ExtinguishOutcome;
pub use region::{FireRegion, FireSnapshot};
pub use registry::{EmberCrossing, FireRegistry, SessionRole};

use crate::entities::{ActorRegistry, ItemRegistry};
use crate::feedback::{AudioPlayer, LightRenderer, ParticleSpawner};
use crate::hull::HullMap;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a fire, unique for the lifetime of its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FireId(pub u32);

impl fmt::Display for FireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fire#{}", self.0)
    }
}

/// Everything a fire touches outside itself during one registry call.
///
/// Positions handed to the feedback collaborators are world-space; actor and
/// item positions are vessel-local, like fire positions.
pub struct FireContext<'a> {
    pub hulls: &'a mut HullMap,
    pub actors: &'a mut dyn ActorRegistry,
    pub items: &'a mut dyn ItemRegistry,
    pub audio: &'a mut dyn AudioPlayer,
    pub particles: &'a mut dyn ParticleSpawner,
    pub lights: &'a mut dyn LightRenderer,
}

/// Uniform sample from `[lo, hi)`, or `lo` when the range is empty
#[inline]
pub(crate) fn rand_range<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        lo
    }
}

/// Number of iterations of `for (i = 0; i < count; i++)` with a float bound
#[inline]
pub(crate) fn emission_count(count: f32) -> usize {
    if count > 0.0 {
        count.ceil() as usize
    } else {
        0
    }
}
