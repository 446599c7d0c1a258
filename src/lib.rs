//! Flappy Box - a side-scrolling arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, collision space, spawner, game state)
//! - `settings`: Driver options loaded from JSON
//! - `error`: Error types for the fallible edges (settings I/O)

pub mod error;
pub mod settings;
pub mod sim;

pub use error::SettingsError;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    pub const TICK_HZ: u32 = 60;

    /// Visible area
    pub const SCREEN_WIDTH: f32 = 600.0;
    pub const SCREEN_HEIGHT: f32 = 620.0;

    /// World gravity (y points up)
    pub const GRAVITY: Vec2 = Vec2::new(0.0, -900.0);

    /// Every box in the game (player and obstacle) is this wide and tall
    pub const BOX_SIDE: f32 = 60.0;
    /// Inner fill side for renderers that draw a dark border
    pub const BOX_INNER_SIDE: f32 = 58.0;
    pub const HALF_SIDE: f32 = BOX_SIDE / 2.0;

    /// Player defaults
    pub const PLAYER_MASS: f32 = 1.0;
    pub const PLAYER_ELASTICITY: f32 = 0.95;
    pub const PLAYER_SPAWN: Vec2 = Vec2::new(100.0, SCREEN_HEIGHT);
    /// Jump keeps this fraction of the current velocity...
    pub const JUMP_VELOCITY_CARRY: f32 = -0.1;
    /// ...and adds gravity scaled by this factor (negative = upward)
    pub const JUMP_GRAVITY_SCALE: f32 = -0.3;

    /// Obstacle rows. Slot and gap sizes are tied to the player size: two
    /// empty slots leave a 130 unit hole for a 60 unit player.
    pub const ROW_SLOTS: usize = 9;
    pub const SLOT_SPACING: f32 = 10.0;
    pub const GAP_SLOTS: usize = 2;
    /// Gap start is drawn from 1..=GAP_START_CHOICES
    pub const GAP_START_CHOICES: usize = 6;
    pub const OBSTACLE_VELOCITY: Vec2 = Vec2::new(-200.0, 0.0);
    pub const OBSTACLE_ELASTICITY: f32 = 0.6;

    /// Spawn timing (ticks)
    pub const INITIAL_SPAWN_DELAY_TICKS: u32 = 10;
    pub const SPAWN_INTERVAL_TICKS: u32 = 90;
    pub const COLLIDED_SPAWN_INTERVAL_TICKS: u32 = 10;
    /// Rows spawned before scoring starts
    pub const WARMUP_ROWS: u32 = 2;
}

/// True if `pos` is inside the vertical band the player may occupy
#[inline]
pub fn within_vertical_bounds(pos: Vec2) -> bool {
    use crate::consts::{HALF_SIDE, SCREEN_HEIGHT};
    pos.y >= -HALF_SIDE && pos.y <= SCREEN_HEIGHT + HALF_SIDE
}

/// True once a box centered at `pos` has fully scrolled off the left edge
#[inline]
pub fn past_left_edge(pos: Vec2) -> bool {
    pos.x < -consts::HALF_SIDE
}
