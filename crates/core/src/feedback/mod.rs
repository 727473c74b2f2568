//! Audio, particle and light collaborators.
//!
//! The simulation never renders or plays anything itself. It talks to the
//! host through the three traits below, once per fire per tick. A `None`
//! from any collaborator means "skip this feedback for this tick".

pub mod sounds;

pub use sounds::FireSounds;

use crate::core_types::Vec2;
use crate::error::FireError;
use crate::fire::FireId;
use crate::hull::HullId;
use serde::{Deserialize, Serialize};

/// Handle to a loaded sound asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoundId(pub u32);

/// Handle to a playing loop. Passing the same slot back every tick keeps
/// one loop alive instead of spawning a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotId(pub u32);

/// Opaque handle to a spawned particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticleHandle(pub u64);

/// Handle to a dynamic light owned by exactly one fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LightId(pub u32);

/// Linear RGB color, components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Scale every channel by `factor`
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor)
    }
}

/// Particle effects a fire emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleKind {
    Flame,
    Smoke,
    Steam,
}

impl ParticleKind {
    /// Effect name as authored in the host's particle prefabs
    pub fn name(&self) -> &'static str {
        match self {
            ParticleKind::Flame => "flame",
            ParticleKind::Smoke => "smoke",
            ParticleKind::Steam => "steam",
        }
    }
}

/// Everything the particle collaborator needs to spawn one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSpawn {
    pub kind: ParticleKind,
    /// World-space spawn position
    pub position: Vec2,
    pub velocity: Vec2,
    /// Hull the particle starts in
    pub hull: HullId,
    /// Multiplier applied to the prefab's base size
    pub size_scale: f32,
    /// When set, the particle is an ember: if it later drifts into another
    /// hull the host reports an [`EmberCrossing`](crate::fire::EmberCrossing)
    /// carrying this source.
    pub ember_source: Option<FireId>,
}

/// Looping positional audio.
pub trait AudioPlayer {
    /// Load a sound asset. Called once per asset through [`FireSounds`].
    fn load(&mut self, path: &str) -> Result<SoundId, FireError>;

    /// Play or refresh a loop.
    ///
    /// `slot` is the slot returned last tick (or `None`). Implementations
    /// must return the same slot when it is still playing this sound, and
    /// may return `None` when no channel is free or the volume is zero.
    fn play_loop(
        &mut self,
        sound: SoundId,
        slot: Option<SlotId>,
        volume: f32,
        position: Vec2,
        range: f32,
    ) -> Option<SlotId>;

    /// Stop a loop. Unknown slots are ignored.
    fn stop(&mut self, slot: SlotId);
}

/// Particle spawning.
pub trait ParticleSpawner {
    /// Spawn a particle, or return `None` if suppressed (cap reached, culled).
    fn spawn(&mut self, request: ParticleSpawn) -> Option<ParticleHandle>;
}

/// Dynamic point lights.
pub trait LightRenderer {
    fn create(&mut self, position: Vec2, range: f32, color: Color) -> LightId;

    /// Update a light's range, color and position
    fn set(&mut self, light: LightId, position: Vec2, range: f32, color: Color);

    fn remove(&mut self, light: LightId);
}
