//! Math utilities and types
//!
//! Only the 2D types needed for placing text on screen are exposed.

pub use nalgebra::Vector2;

/// 2D vector type, used for screen positions in pixels
pub type Vec2 = Vector2<f32>;
