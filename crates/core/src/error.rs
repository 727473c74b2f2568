//! Error types for fire registry operations.
//!
//! Only failures a host has to act on are errors. Silent no-ops (ignition
//! outside every hull, non-finite geometry writes, absent feedback handles)
//! are reported through `Option`/`bool` returns instead.

use crate::fire::FireId;
use crate::hull::HullId;
use std::error::Error;
use std::fmt;

/// Errors returned by [`FireRegistry`](crate::fire::FireRegistry) and its
/// collaborators.
#[derive(Clone, Debug, PartialEq)]
pub enum FireError {
    /// No active fire carries this id.
    UnknownFire(FireId),
    /// The hull map has no hull with this id.
    UnknownHull(HullId),
    /// A replica tried to create or remove a fire without a replicated event.
    NotAuthoritative,
    /// A configuration value is out of range.
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// The audio collaborator could not load a sound asset.
    SoundLoad {
        /// Asset path that failed to load.
        path: String,
        /// Collaborator-specific failure message.
        reason: String,
    },
}

impl FireError {
    /// Create an `InvalidConfig` error for a value that must be finite and positive.
    pub fn not_positive(field: &'static str, value: f32) -> Self {
        Self::InvalidConfig {
            field,
            reason: format!("must be finite and positive, got {value}"),
        }
    }

    /// Create an `InvalidConfig` error for a probability outside `[0, 1]`.
    pub fn not_probability(field: &'static str, value: f64) -> Self {
        Self::InvalidConfig {
            field,
            reason: format!("must be within [0, 1], got {value}"),
        }
    }
}

impl fmt::Display for FireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFire(id) => write!(f, "no active fire with id {id}"),
            Self::UnknownHull(id) => write!(f, "no hull with id {id}"),
            Self::NotAuthoritative => {
                write!(f, "replica sessions may only apply replicated fire events")
            }
            Self::InvalidConfig { field, reason } => {
                write!(f, "invalid fire config '{field}': {reason}")
            }
            Self::SoundLoad { path, reason } => {
                write!(f, "failed to load sound '{path}': {reason}")
            }
        }
    }
}

impl Error for FireError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            FireError::UnknownFire(FireId(7)).to_string(),
            "no active fire with id fire#7"
        );
        assert_eq!(
            FireError::UnknownHull(HullId(3)).to_string(),
            "no hull with id hull#3"
        );
        assert_eq!(
            FireError::not_positive("grow_speed", -1.0).to_string(),
            "invalid fire config 'grow_speed': must be finite and positive, got -1"
        );
    }
}
