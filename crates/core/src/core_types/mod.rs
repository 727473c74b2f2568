//! Core types and utilities

pub mod rect;
pub mod vec2;

pub use rect::Rect;
pub use vec2::{is_finite, Vec2};
