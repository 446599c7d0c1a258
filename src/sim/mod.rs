//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by body ID)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod body;
pub mod game;
pub mod input;
pub mod shape;
pub mod space;
pub mod spawner;

pub use body::{Body, BodyId};
pub use game::{Frame, Game, GameEvent, GamePhase, RoundState, Sprite, SpriteKind};
pub use input::{InputEvent, InputQueue};
pub use shape::{Contact, Shape, box_overlap};
pub use space::{AcceptAll, Arbiter, CollisionListener, ShapeKey, Space};
pub use spawner::{find_gap, slot_center_y, spawn_obstacle, spawn_row, spawn_row_with_gap};
