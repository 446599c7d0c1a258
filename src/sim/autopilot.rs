//! Demo player
//!
//! Reads the same state a renderer sees and decides whether to press jump.
//! Used by the headless driver so unattended runs score points.

use super::game::Game;
use super::spawner::{find_gap, slot_at, slot_center_y};
use crate::consts::*;

/// How far below the target height the player may sink before jumping
const JUMP_MARGIN: f32 = 10.0;

/// Height the player should hold: the center of the next gap, or mid-screen
pub fn target_height(game: &Game) -> f32 {
    let Some(player) = game.player_body() else {
        return SCREEN_HEIGHT / 2.0;
    };
    let player_left = player.pos.x - HALF_SIDE;

    let obstacles: Vec<_> = game
        .obstacles()
        .iter()
        .filter_map(|&id| game.space().body(id))
        .collect();

    // Nearest column whose right edge is still ahead of the player
    let column_x = obstacles
        .iter()
        .map(|body| body.pos.x)
        .filter(|&x| x + HALF_SIDE > player_left)
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let Some(column_x) = column_x else {
        return SCREEN_HEIGHT / 2.0;
    };

    let occupied: Vec<usize> = obstacles
        .iter()
        .filter(|body| (body.pos.x - column_x).abs() < 1.0)
        .filter_map(|body| slot_at(body.pos.y))
        .collect();

    match find_gap(&occupied) {
        Some(gap) => (slot_center_y(gap) + slot_center_y(gap + GAP_SLOTS - 1)) / 2.0,
        None => SCREEN_HEIGHT / 2.0,
    }
}

/// True when the player is falling below the target height
pub fn wants_jump(game: &Game) -> bool {
    if game.is_collided() {
        return false;
    }
    let Some(player) = game.player_body() else {
        return false;
    };
    player.vel.y <= 0.0 && player.pos.y < target_height(game) - JUMP_MARGIN
}
