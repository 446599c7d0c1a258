//! Rigid bodies
//!
//! A body is a point mass with one or more box shapes. Kinematic bodies have
//! infinite mass: gravity and collision response never touch them, they only
//! move by their own velocity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::shape::Shape;

/// Stable handle to a body inside a [`super::Space`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl BodyId {
    /// Id carried by bodies that have not been added to a space yet
    pub const DETACHED: BodyId = BodyId(0);
}

/// A rigid body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub(crate) id: BodyId,
    pub pos: Vec2,
    pub vel: Vec2,
    /// `f32::INFINITY` for kinematic bodies
    mass: f32,
    pub ignores_gravity: bool,
    /// Never empty
    shapes: Vec<Shape>,
}

impl Body {
    /// Finite-mass body affected by gravity and collisions
    pub fn dynamic(mass: f32, shape: Shape) -> Self {
        Self {
            id: BodyId::DETACHED,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            mass,
            ignores_gravity: false,
            shapes: vec![shape],
        }
    }

    /// Infinite-mass body moved only by its own velocity
    pub fn kinematic(shape: Shape) -> Self {
        Self {
            id: BodyId::DETACHED,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            mass: f32::INFINITY,
            ignores_gravity: true,
            shapes: vec![shape],
        }
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    #[inline]
    pub fn id(&self) -> BodyId {
        self.id
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[inline]
    pub fn is_kinematic(&self) -> bool {
        self.mass.is_infinite()
    }

    /// Zero for kinematic bodies
    #[inline]
    pub fn inverse_mass(&self) -> f32 {
        if self.is_kinematic() || self.mass <= 0.0 {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shapes_mut(&mut self) -> &mut [Shape] {
        &mut self.shapes
    }

    pub fn add_shape(&mut self, mut shape: Shape) {
        shape.body = self.id;
        self.shapes.push(shape);
    }

    /// Turn every shape into a sensor
    pub fn sensorize(&mut self) {
        for shape in &mut self.shapes {
            shape.sensor = true;
        }
    }

    /// Semi-implicit Euler: velocity first, then position
    pub(crate) fn integrate(&mut self, gravity: Vec2, dt: f32) {
        if !self.is_kinematic() && !self.ignores_gravity {
            self.vel += gravity * dt;
        }
        self.pos += self.vel * dt;
    }

    /// Stamp the owning id on the body and all its shapes
    pub(crate) fn attach(&mut self, id: BodyId) {
        self.id = id;
        for shape in &mut self.shapes {
            shape.body = id;
        }
    }
}
