//! Vector type alias for 2D positions, extents and velocities.

use nalgebra::Vector2;

/// 2D vector type for positions, extents, and velocities.
///
/// This is a simple alias for `nalgebra::Vector2<f32>`, used throughout
/// the simulation for vessel-local fire anchors, hull geometry and particle
/// launch velocities.
pub type Vec2 = Vector2<f32>;

/// Returns true when both components are finite.
///
/// Fire geometry silently rejects writes that fail this check, keeping the
/// last valid value.
#[inline]
pub fn is_finite(v: &Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}
