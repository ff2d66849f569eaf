//! Collision tests for the scrolling world
//!
//! Planets are circles in screen space, the player is an axis-aligned box.
//! The box may be inset per edge to forgive transparent sprite padding.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Per-edge hitbox insets, all ≥ 0, subtracted from the visual sprite box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeInsets {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

/// Axis-aligned collision box in screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Hitbox {
    /// Build from a sprite box and its insets. Degenerate insets collapse
    /// the box to a point at its center rather than inverting it.
    pub fn from_sprite(x: f32, y: f32, width: f32, height: f32, insets: EdgeInsets) -> Self {
        let w = (width - insets.left - insets.right).max(0.0);
        let h = (height - insets.top - insets.bottom).max(0.0);
        Self {
            x: if w > 0.0 { x + insets.left } else { x + width / 2.0 },
            y: if h > 0.0 { y + insets.top } else { y + height / 2.0 },
            width: w,
            height: h,
        }
    }
}

/// Circle vs axis-aligned box, via the closest point on the box
pub fn circle_box_overlap(center: Vec2, radius: f32, hitbox: &Hitbox) -> bool {
    let closest = Vec2::new(
        center.x.clamp(hitbox.x, hitbox.x + hitbox.width),
        center.y.clamp(hitbox.y, hitbox.y + hitbox.height),
    );
    center.distance_squared(closest) <= radius * radius
}
