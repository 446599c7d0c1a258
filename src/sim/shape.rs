//! Collision shapes and box overlap tests
//!
//! Every shape is an axis-aligned box centered on its body position.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::BodyId;

/// Axis-aligned box attached to a body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub width: f32,
    pub height: f32,
    /// Restitution in [0, 1]
    pub elasticity: f32,
    /// Sensors report contacts but never get a collision response
    pub sensor: bool,
    /// Owning body (set when the body is added to a space)
    pub(crate) body: BodyId,
}

impl Shape {
    pub fn new_box(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            elasticity: 0.0,
            sensor: false,
            body: BodyId::DETACHED,
        }
    }

    pub fn with_elasticity(mut self, elasticity: f32) -> Self {
        self.elasticity = elasticity.clamp(0.0, 1.0);
        self
    }

    /// Body that owns this shape
    #[inline]
    pub fn body(&self) -> BodyId {
        self.body
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }
}

/// Result of an overlap check between two boxes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit axis pointing from box A toward box B
    pub normal: Vec2,
    /// Overlap along `normal` (always positive)
    pub penetration: f32,
}

/// Overlap test for two boxes at the given centers
///
/// Boxes that only share an edge do not overlap. The normal lies on the
/// axis of least penetration.
pub fn box_overlap(pos_a: Vec2, a: &Shape, pos_b: Vec2, b: &Shape) -> Option<Contact> {
    let delta = pos_b - pos_a;
    let reach = a.half_extents() + b.half_extents();
    let overlap = reach - delta.abs();

    if overlap.x <= 0.0 || overlap.y <= 0.0 {
        return None;
    }

    // Coincident centers resolve upward / rightward
    let sign = |d: f32| if d < 0.0 { -1.0 } else { 1.0 };

    if overlap.x < overlap.y {
        Some(Contact {
            normal: Vec2::new(sign(delta.x), 0.0),
            penetration: overlap.x,
        })
    } else {
        Some(Contact {
            normal: Vec2::new(0.0, sign(delta.y)),
            penetration: overlap.y,
        })
    }
}
