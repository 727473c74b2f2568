//! Shared fire loop sounds.

use super::{AudioPlayer, SoundId};
use tracing::{debug, warn};

/// Asset path of the small fire loop
pub const FIRE_BASIC_PATH: &str = "Content/Sounds/fire.ogg";
/// Asset path of the large fire loop
pub const FIRE_LARGE_PATH: &str = "Content/Sounds/firelarge.ogg";

/// Loop sounds shared by every fire.
///
/// Loaded once through the audio collaborator before the first fire is
/// ignited, then handed to each fire update by reference. A sound that
/// failed to load stays `None` and its loop is skipped for every fire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FireSounds {
    pub basic: Option<SoundId>,
    pub large: Option<SoundId>,
}

impl FireSounds {
    /// Load both loops from the default asset paths
    pub fn load(audio: &mut dyn AudioPlayer) -> Self {
        Self::load_from(audio, FIRE_BASIC_PATH, FIRE_LARGE_PATH)
    }

    /// Load both loops from custom asset paths
    pub fn load_from(audio: &mut dyn AudioPlayer, basic_path: &str, large_path: &str) -> Self {
        let sounds = Self {
            basic: load_one(audio, basic_path),
            large: load_one(audio, large_path),
        };
        debug!(?sounds, "Fire sounds loaded");
        sounds
    }
}

fn load_one(audio: &mut dyn AudioPlayer, path: &str) -> Option<SoundId> {
    match audio.load(path) {
        Ok(id) => Some(id),
        Err(e) => {
            warn!("Fire loop disabled: {e}");
            None
        }
    }
}
