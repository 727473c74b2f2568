//! Hull Fire Core Library
//!
//! Fire hazards inside the hulls of a vessel. Fires are axis-aligned
//! rectangles that grow while their hull holds breathable gas, burn the
//! actors and items within reach, and are put out by standing water or a
//! directed extinguisher. Overlapping fires merge, and embers drifting into
//! a neighbouring hull start new fires there.
//!
//! ## Coordinates
//!
//! y points up. A hull's rectangle is anchored at its top-left corner, so
//! the floor sits at `y - height`. Fire, actor and item positions are local
//! to the vessel; everything handed to audio, particles and lights is in
//! world space.
//!
//! ## Collaborators
//!
//! The simulation owns no rendering or audio. Hosts implement
//! [`AudioPlayer`], [`ParticleSpawner`], [`LightRenderer`],
//! [`ActorRegistry`] and [`ItemRegistry`] and pass them in through a
//! [`FireContext`]. [`HeadlessWorld`] implements all of them in memory.

// Core types and utilities
pub mod core_types;
pub mod error;

// World model
pub mod entities;
pub mod hull;

// Fire simulation
pub mod feedback;
pub mod fire;

// In-memory collaborators for tests and headless runs
pub mod headless;

// Re-export core types
pub use core_types::{Rect, Vec2};
pub use error::FireError;

// Re-export world types
pub use entities::{ActorRegistry, ActorState, Character, Item, ItemRegistry, ItemState, Limb};
pub use hull::{Hull, HullId, HullMap};

// Re-export fire types
pub use feedback::{
    AudioPlayer, Color, FireSounds, LightId, LightRenderer, ParticleHandle, ParticleKind,
    ParticleSpawn, ParticleSpawner, SlotId, SoundId,
};
pub use fire::{
    EmberCrossing, EventOrigin, ExtinguishOutcome, FireConfig, FireContext, FireEvent, FireId,
    FireRegion, FireRegistry, FireSnapshot, ItemScanPolicy, RemovalCause, SessionRole,
};
pub use headless::{HeadlessAudio, HeadlessLights, HeadlessParticles, HeadlessWorld};
