//! Simulation space
//!
//! Owns every body, integrates them each step, and detects box contacts.
//! Bodies live in an id-keyed map so iteration follows insertion order and
//! removal never shifts other bodies around.

use std::collections::BTreeMap;

use glam::Vec2;

use super::body::{Body, BodyId};
use super::shape::{Contact, Shape, box_overlap};

/// Identifies one shape: owning body plus index in its shape list
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeKey {
    pub body: BodyId,
    pub index: usize,
}

/// Ordered pair of touching shapes (first < second)
type PairKey = (ShapeKey, ShapeKey);

/// Contact data handed to a [`CollisionListener`]
#[derive(Debug, Clone, Copy)]
pub struct Arbiter<'a> {
    pub shape_a: &'a Shape,
    pub shape_b: &'a Shape,
    /// Unit axis pointing from `shape_a` toward `shape_b`
    pub normal: Vec2,
    pub penetration: f32,
}

/// Receives contact-begin events during [`Space::step`]
pub trait CollisionListener {
    /// Called once when two shapes start touching. Return `false` to skip
    /// the collision response for as long as the contact lasts.
    fn collision_enter(&mut self, arbiter: &Arbiter<'_>) -> bool;
}

/// Listener that accepts every contact
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl CollisionListener for AcceptAll {
    fn collision_enter(&mut self, _arbiter: &Arbiter<'_>) -> bool {
        true
    }
}

/// The physics world
#[derive(Debug, Clone)]
pub struct Space {
    gravity: Vec2,
    bodies: BTreeMap<BodyId, Body>,
    /// Pairs touching after the last step, with the listener's verdict
    contacts: BTreeMap<PairKey, bool>,
    next_id: u32,
}

impl Space {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            bodies: BTreeMap::new(),
            contacts: BTreeMap::new(),
            next_id: 1,
        }
    }

    #[inline]
    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// Take ownership of a body and return its handle
    pub fn add_body(&mut self, mut body: Body) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        body.attach(id);
        self.bodies.insert(id, body);
        id
    }

    /// Remove a body. Unknown ids are ignored.
    pub fn remove_body(&mut self, id: BodyId) -> Option<Body> {
        let body = self.bodies.remove(&id)?;
        self.contacts.retain(|(a, b), _| a.body != id && b.body != id);
        Some(body)
    }

    /// Remove every body
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.contacts.clear();
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(&id)
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.contains_key(&id)
    }

    /// Bodies in insertion order
    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.values()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    fn shape(&self, key: ShapeKey) -> Option<&Shape> {
        self.bodies.get(&key.body)?.shapes().get(key.index)
    }

    /// Advance the world by `dt` seconds
    ///
    /// Non-positive (or NaN) `dt` is a no-op.
    pub fn step(&mut self, dt: f32, listener: &mut dyn CollisionListener) {
        if dt.is_nan() || dt <= 0.0 {
            return;
        }

        for body in self.bodies.values_mut() {
            body.integrate(self.gravity, dt);
        }

        let mut touching = BTreeMap::new();
        let mut accepted = Vec::new();

        for (key, contact) in self.find_overlaps() {
            let accept = match self.contacts.get(&key) {
                Some(&verdict) => verdict,
                None => {
                    let (Some(shape_a), Some(shape_b)) = (self.shape(key.0), self.shape(key.1))
                    else {
                        continue;
                    };
                    listener.collision_enter(&Arbiter {
                        shape_a,
                        shape_b,
                        normal: contact.normal,
                        penetration: contact.penetration,
                    })
                }
            };
            touching.insert(key, accept);
            if accept {
                accepted.push(key);
            }
        }

        self.contacts = touching;

        for key in accepted {
            self.resolve(key);
        }
    }

    /// Narrow phase over every shape pair on different bodies
    fn find_overlaps(&self) -> Vec<(PairKey, Contact)> {
        let shapes: Vec<(ShapeKey, Vec2, &Shape)> = self
            .bodies
            .values()
            .flat_map(|body| {
                body.shapes().iter().enumerate().map(move |(index, shape)| {
                    (ShapeKey { body: body.id(), index }, body.pos, shape)
                })
            })
            .collect();

        let mut overlaps = Vec::new();
        for (i, &(key_a, pos_a, shape_a)) in shapes.iter().enumerate() {
            for &(key_b, pos_b, shape_b) in &shapes[i + 1..] {
                if key_a.body == key_b.body {
                    continue;
                }
                if let Some(contact) = box_overlap(pos_a, shape_a, pos_b, shape_b) {
                    overlaps.push(((key_a, key_b), contact));
                }
            }
        }
        overlaps
    }

    /// Push the pair apart and bounce them along the contact normal
    fn resolve(&mut self, (key_a, key_b): PairKey) {
        let (Some(a), Some(b)) = (self.bodies.get(&key_a.body), self.bodies.get(&key_b.body))
        else {
            return;
        };
        let (Some(shape_a), Some(shape_b)) =
            (a.shapes().get(key_a.index), b.shapes().get(key_b.index))
        else {
            return;
        };
        if shape_a.sensor || shape_b.sensor {
            return;
        }

        let (inv_a, inv_b) = (a.inverse_mass(), b.inverse_mass());
        let inv_sum = inv_a + inv_b;
        if inv_sum <= 0.0 {
            return;
        }

        // An earlier contact this step may already have separated them
        let Some(contact) = box_overlap(a.pos, shape_a, b.pos, shape_b) else {
            return;
        };
        let n = contact.normal;
        let restitution = shape_a.elasticity * shape_b.elasticity;

        let correction = n * (contact.penetration / inv_sum);
        let approach = (b.vel - a.vel).dot(n);
        let impulse = if approach < 0.0 {
            -(1.0 + restitution) * approach / inv_sum
        } else {
            0.0
        };

        if let Some(a) = self.bodies.get_mut(&key_a.body) {
            a.pos -= correction * inv_a;
            a.vel -= n * impulse * inv_a;
        }
        if let Some(b) = self.bodies.get_mut(&key_b.body) {
            b.pos += correction * inv_b;
            b.vel += n * impulse * inv_b;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::shape::Shape;
    use proptest::prelude::*;

    /// Records every enter event and answers with a fixed verdict
    struct Recorder {
        accept: bool,
        enters: Vec<(BodyId, BodyId)>,
    }

    impl Recorder {
        fn accepting() -> Self {
            Self { accept: true, enters: Vec::new() }
        }
    }

    impl CollisionListener for Recorder {
        fn collision_enter(&mut self, arbiter: &Arbiter<'_>) -> bool {
            self.enters.push((arbiter.shape_a.body(), arbiter.shape_b.body()));
            self.accept
        }
    }

    fn square() -> Shape {
        Shape::new_box(BOX_SIDE, BOX_SIDE)
    }

    /// Kinematic floor block with a falling box resting 10 units into it
    fn overlapping_pair(space: &mut Space) -> (BodyId, BodyId) {
        let wall = space.add_body(
            Body::kinematic(square().with_elasticity(OBSTACLE_ELASTICITY))
                .with_position(Vec2::new(100.0, 0.0)),
        );
        let player = space.add_body(
            Body::dynamic(1.0, square().with_elasticity(PLAYER_ELASTICITY))
                .with_position(Vec2::new(100.0, 50.0))
                .with_velocity(Vec2::new(0.0, -60.0)),
        );
        (wall, player)
    }

    #[test]
    fn test_free_fall_one_second() {
        let mut space = Space::new(GRAVITY);
        let id = space.add_body(Body::dynamic(PLAYER_MASS, square()));

        for _ in 0..60 {
            space.step(SIM_DT, &mut AcceptAll);
        }

        let body = space.body(id).unwrap();
        assert!((body.vel.y - (-900.0)).abs() < 1e-2, "vy = {}", body.vel.y);
        assert_eq!(body.vel.x, 0.0);
    }

    #[test]
    fn test_kinematic_body_keeps_velocity() {
        let mut space = Space::new(GRAVITY);
        let id = space.add_body(Body::kinematic(square()).with_velocity(OBSTACLE_VELOCITY));

        for _ in 0..30 {
            space.step(SIM_DT, &mut AcceptAll);
        }

        let body = space.body(id).unwrap();
        assert_eq!(body.vel, OBSTACLE_VELOCITY);
        assert!((body.pos.x - (-100.0)).abs() < 1e-2);
        assert_eq!(body.pos.y, 0.0);
    }

    #[test]
    fn test_ids_follow_insertion_order() {
        let mut space = Space::new(GRAVITY);
        let a = space.add_body(Body::kinematic(square()));
        let b = space.add_body(Body::dynamic(1.0, square()));
        let c = space.add_body(Body::kinematic(square()));
        space.remove_body(b);
        let d = space.add_body(Body::kinematic(square()));

        let order: Vec<BodyId> = space.bodies().map(|b| b.id()).collect();
        assert_eq!(order, vec![a, c, d]);
        assert!(d > c);
    }

    #[test]
    fn test_remove_absent_body_is_noop() {
        let mut space = Space::new(GRAVITY);
        let id = space.add_body(Body::dynamic(1.0, square()));

        assert!(space.remove_body(BodyId(999)).is_none());
        assert!(space.remove_body(id).is_some());
        assert!(space.remove_body(id).is_none());
        assert!(space.is_empty());
    }

    #[test]
    fn test_enter_fires_once_per_contact() {
        let mut space = Space::new(Vec2::ZERO);
        let mut recorder = Recorder { accept: false, enters: Vec::new() };
        let (wall, player) = overlapping_pair(&mut space);
        space.body_mut(player).unwrap().vel = Vec2::ZERO;

        for _ in 0..5 {
            space.step(SIM_DT, &mut recorder);
        }
        assert_eq!(recorder.enters, vec![(wall, player)]);

        // Separate, then touch again: a second enter
        space.body_mut(player).unwrap().pos.y = 500.0;
        space.step(SIM_DT, &mut recorder);
        space.body_mut(player).unwrap().pos.y = 50.0;
        space.step(SIM_DT, &mut recorder);
        assert_eq!(recorder.enters.len(), 2);
    }

    #[test]
    fn test_accepted_contact_pushes_dynamic_body_out() {
        let mut space = Space::new(Vec2::ZERO);
        let mut recorder = Recorder::accepting();
        let (wall, player) = overlapping_pair(&mut space);

        space.step(SIM_DT, &mut recorder);

        let wall = space.body(wall).unwrap();
        let player = space.body(player).unwrap();
        // Wall is kinematic: untouched
        assert_eq!(wall.pos, Vec2::new(100.0, 0.0));
        assert_eq!(wall.vel, Vec2::ZERO);
        // Player sits on top of the wall, bouncing up at 0.95 * 0.6 of impact speed
        assert!((player.pos.y - 60.0).abs() < 1e-3, "y = {}", player.pos.y);
        let expected = 60.0 * PLAYER_ELASTICITY * OBSTACLE_ELASTICITY;
        assert!((player.vel.y - expected).abs() < 1e-3, "vy = {}", player.vel.y);
    }

    #[test]
    fn test_rejected_contact_gets_no_response() {
        let mut space = Space::new(Vec2::ZERO);
        let mut recorder = Recorder { accept: false, enters: Vec::new() };
        let (_, player) = overlapping_pair(&mut space);

        space.step(SIM_DT, &mut recorder);

        let player = space.body(player).unwrap();
        assert_eq!(player.vel, Vec2::new(0.0, -60.0));
        assert!((player.pos.y - 49.0).abs() < 1e-3);
        assert_eq!(recorder.enters.len(), 1);
    }

    #[test]
    fn test_sensor_detects_without_response() {
        let mut space = Space::new(Vec2::ZERO);
        let mut recorder = Recorder::accepting();
        let (_, player) = overlapping_pair(&mut space);
        space.body_mut(player).unwrap().sensorize();

        space.step(SIM_DT, &mut recorder);

        assert_eq!(recorder.enters.len(), 1);
        assert_eq!(space.body(player).unwrap().vel, Vec2::new(0.0, -60.0));
    }

    #[test]
    fn test_readded_body_gets_fresh_contact() {
        let mut space = Space::new(Vec2::ZERO);
        let mut recorder = Recorder { accept: false, enters: Vec::new() };
        let (wall, player) = overlapping_pair(&mut space);
        space.body_mut(player).unwrap().vel = Vec2::ZERO;
        space.step(SIM_DT, &mut recorder);

        let body = space.remove_body(player).unwrap();
        let player = space.add_body(body);
        space.step(SIM_DT, &mut recorder);

        assert_eq!(recorder.enters, vec![(wall, BodyId(2)), (wall, player)]);
    }

    proptest! {
        #[test]
        fn prop_non_positive_dt_is_noop(dt in -10.0f32..=0.0) {
            let mut space = Space::new(GRAVITY);
            let mut recorder = Recorder::accepting();
            overlapping_pair(&mut space);
            let before: Vec<(Vec2, Vec2)> = space.bodies().map(|b| (b.pos, b.vel)).collect();

            space.step(dt, &mut recorder);

            let after: Vec<(Vec2, Vec2)> = space.bodies().map(|b| (b.pos, b.vel)).collect();
            prop_assert_eq!(before, after);
            prop_assert!(recorder.enters.is_empty());
        }
    }

    #[test]
    fn test_nan_dt_is_noop() {
        let mut space = Space::new(GRAVITY);
        let id = space.add_body(Body::dynamic(1.0, square()));
        space.step(f32::NAN, &mut AcceptAll);
        assert_eq!(space.body(id).unwrap().vel, Vec2::ZERO);
    }
}
