//! In-memory collaborators for headless runs and tests.
//!
//! These keep just enough state to observe what the simulation asked for:
//! which loops are playing and how loud, which particles were spawned, and
//! which lights exist.

use crate::core_types::Vec2;
use crate::entities::{Character, Item};
use crate::error::FireError;
use crate::feedback::{
    AudioPlayer, Color, LightId, LightRenderer, ParticleHandle, ParticleKind, ParticleSpawn,
    ParticleSpawner, SlotId, SoundId,
};
use crate::fire::FireContext;
use crate::hull::HullMap;
use rustc_hash::{FxHashMap, FxHashSet};

/// State of one playing loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopState {
    pub sound: SoundId,
    pub volume: f32,
    pub position: Vec2,
    pub range: f32,
}

/// Audio player that tracks loops without producing sound.
#[derive(Debug)]
pub struct HeadlessAudio {
    cache: FxHashMap<String, SoundId>,
    failing: FxHashSet<String>,
    loops: FxHashMap<SlotId, LoopState>,
    max_channels: usize,
    next_slot: u32,
}

impl Default for HeadlessAudio {
    fn default() -> Self {
        Self::new(64)
    }
}

impl HeadlessAudio {
    /// Create a player with a fixed number of loop channels
    pub fn new(max_channels: usize) -> Self {
        Self {
            cache: FxHashMap::default(),
            failing: FxHashSet::default(),
            loops: FxHashMap::default(),
            max_channels,
            next_slot: 0,
        }
    }

    /// Make future loads of `path` fail
    pub fn fail_path(&mut self, path: &str) {
        self.failing.insert(path.to_owned());
    }

    /// Loop currently playing in `slot`
    pub fn loop_state(&self, slot: SlotId) -> Option<&LoopState> {
        self.loops.get(&slot)
    }

    /// Number of loops currently playing
    pub fn playing(&self) -> usize {
        self.loops.len()
    }
}

impl AudioPlayer for HeadlessAudio {
    fn load(&mut self, path: &str) -> Result<SoundId, FireError> {
        if self.failing.contains(path) {
            return Err(FireError::SoundLoad {
                path: path.to_owned(),
                reason: "asset unavailable".to_owned(),
            });
        }
        let next = SoundId(self.cache.len() as u32);
        Ok(*self.cache.entry(path.to_owned()).or_insert(next))
    }

    fn play_loop(
        &mut self,
        sound: SoundId,
        slot: Option<SlotId>,
        volume: f32,
        position: Vec2,
        range: f32,
    ) -> Option<SlotId> {
        if volume <= 0.0 {
            if let Some(slot) = slot {
                self.stop(slot);
            }
            return None;
        }

        let state = LoopState {
            sound,
            volume,
            position,
            range,
        };

        if let Some(slot) = slot {
            if let Some(existing) = self.loops.get_mut(&slot) {
                if existing.sound == sound {
                    *existing = state;
                    return Some(slot);
                }
            }
        }

        if self.loops.len() >= self.max_channels {
            return None;
        }

        let slot = SlotId(self.next_slot);
        self.next_slot += 1;
        self.loops.insert(slot, state);
        Some(slot)
    }

    fn stop(&mut self, slot: SlotId) {
        self.loops.remove(&slot);
    }
}

/// Particle spawner that records every accepted spawn request.
#[derive(Debug)]
pub struct HeadlessParticles {
    spawned: Vec<ParticleSpawn>,
    max_particles: usize,
    next_handle: u64,
}

impl Default for HeadlessParticles {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl HeadlessParticles {
    /// Create a spawner that refuses requests once `max_particles` are recorded
    pub fn new(max_particles: usize) -> Self {
        Self {
            spawned: Vec::new(),
            max_particles,
            next_handle: 0,
        }
    }

    /// Every spawn accepted since the last [`clear`](Self::clear)
    pub fn spawned(&self) -> &[ParticleSpawn] {
        &self.spawned
    }

    /// Number of accepted spawns of one kind
    pub fn count(&self, kind: ParticleKind) -> usize {
        self.spawned.iter().filter(|p| p.kind == kind).count()
    }

    /// Spawns tagged as embers
    pub fn embers(&self) -> impl Iterator<Item = &ParticleSpawn> {
        self.spawned.iter().filter(|p| p.ember_source.is_some())
    }

    pub fn clear(&mut self) {
        self.spawned.clear();
    }
}

impl ParticleSpawner for HeadlessParticles {
    fn spawn(&mut self, request: ParticleSpawn) -> Option<ParticleHandle> {
        if self.spawned.len() >= self.max_particles {
            return None;
        }
        self.spawned.push(request);
        let handle = ParticleHandle(self.next_handle);
        self.next_handle += 1;
        Some(handle)
    }
}

/// State of one light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightState {
    pub position: Vec2,
    pub range: f32,
    pub color: Color,
}

/// Light renderer that keeps a table of live lights.
#[derive(Debug, Default)]
pub struct HeadlessLights {
    lights: FxHashMap<LightId, LightState>,
    next_id: u32,
}

impl HeadlessLights {
    pub fn get(&self, light: LightId) -> Option<&LightState> {
        self.lights.get(&light)
    }

    /// Number of live lights
    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }
}

impl LightRenderer for HeadlessLights {
    fn create(&mut self, position: Vec2, range: f32, color: Color) -> LightId {
        let id = LightId(self.next_id);
        self.next_id += 1;
        self.lights.insert(
            id,
            LightState {
                position,
                range,
                color,
            },
        );
        id
    }

    fn set(&mut self, light: LightId, position: Vec2, range: f32, color: Color) {
        if let Some(state) = self.lights.get_mut(&light) {
            state.position = position;
            state.range = range;
            state.color = color;
        }
    }

    fn remove(&mut self, light: LightId) {
        self.lights.remove(&light);
    }
}

/// A complete in-memory world: hulls, crew, items and feedback sinks.
#[derive(Debug, Default)]
pub struct HeadlessWorld {
    pub hulls: HullMap,
    pub crew: Vec<Character>,
    pub items: Vec<Item>,
    pub audio: HeadlessAudio,
    pub particles: HeadlessParticles,
    pub lights: HeadlessLights,
}

impl HeadlessWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow everything as a [`FireContext`] for one registry call
    pub fn context(&mut self) -> FireContext<'_> {
        FireContext {
            hulls: &mut self.hulls,
            actors: &mut self.crew,
            items: &mut self.items,
            audio: &mut self.audio,
            particles: &mut self.particles,
            lights: &mut self.lights,
        }
    }
}
