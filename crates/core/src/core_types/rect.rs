//! Axis-aligned rectangle in the vessel's y-up coordinate frame.

use crate::core_types::vec2::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle anchored at its top-left corner.
///
/// The y axis points up, so the rectangle covers
/// `[x, x + width]` horizontally and `[y - height, y]` vertically.
/// This matches how hull bounds are authored: `y` is the ceiling and
/// `y - height` is the floor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge (ceiling)
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y - self.height
    }

    /// Area of the rectangle
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Same rectangle shifted by `offset`
    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Inclusive point containment test
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.bottom()
            && point.y <= self.top()
    }

    /// True when `other` lies entirely inside this rectangle (within `eps`)
    pub fn encloses(&self, other: &Rect, eps: f32) -> bool {
        other.left() >= self.left() - eps
            && other.right() <= self.right() + eps
            && other.top() <= self.top() + eps
            && other.bottom() >= self.bottom() - eps
    }
}
