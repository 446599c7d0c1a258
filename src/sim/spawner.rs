//! Obstacle rows
//!
//! A row is a column of 9 box slots at the right edge of the screen with one
//! two-slot hole the player can fly through.

use glam::Vec2;
use rand::Rng;

use super::body::{Body, BodyId};
use super::shape::Shape;
use super::space::Space;
use crate::consts::*;

/// Vertical center of slot `index` (slot 0 sits on the floor)
#[inline]
pub fn slot_center_y(index: usize) -> f32 {
    let i = index as f32;
    i * BOX_SIDE + HALF_SIDE + i * SLOT_SPACING
}

/// Slot whose center is nearest to `y`
#[inline]
pub fn slot_at(y: f32) -> Option<usize> {
    let slot = ((y - HALF_SIDE) / (BOX_SIDE + SLOT_SPACING)).round();
    (slot >= 0.0 && slot < ROW_SLOTS as f32).then_some(slot as usize)
}

/// Add one kinematic obstacle box at `pos`
pub fn spawn_obstacle(space: &mut Space, pos: Vec2) -> BodyId {
    let shape = Shape::new_box(BOX_SIDE, BOX_SIDE).with_elasticity(OBSTACLE_ELASTICITY);
    space.add_body(
        Body::kinematic(shape)
            .with_position(pos)
            .with_velocity(OBSTACLE_VELOCITY),
    )
}

/// Spawn a row leaving slots `gap` and `gap + 1` empty
///
/// Every new body id is appended to `obstacles`.
pub fn spawn_row_with_gap(space: &mut Space, gap: usize, obstacles: &mut Vec<BodyId>) {
    debug_assert!((1..=GAP_START_CHOICES).contains(&gap), "gap {gap} out of range");

    for i in 0..ROW_SLOTS {
        if (gap..gap + GAP_SLOTS).contains(&i) {
            continue;
        }
        let pos = Vec2::new(SCREEN_WIDTH, slot_center_y(i));
        obstacles.push(spawn_obstacle(space, pos));
    }
}

/// Spawn a row with a random gap and return the gap start slot
pub fn spawn_row<R: Rng + ?Sized>(
    space: &mut Space,
    rng: &mut R,
    obstacles: &mut Vec<BodyId>,
) -> usize {
    let gap = rng.random_range(0..GAP_START_CHOICES) + 1;
    spawn_row_with_gap(space, gap, obstacles);
    gap
}

/// Recover a row's gap start from the slots that hold a box
///
/// Returns the first run of `GAP_SLOTS` empty slots starting inside the
/// range a gap can start in.
pub fn find_gap(occupied: &[usize]) -> Option<usize> {
    (1..=GAP_START_CHOICES).find(|&start| {
        (start..start + GAP_SLOTS).all(|slot| !occupied.contains(&slot))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn occupied_slots(space: &Space, obstacles: &[BodyId]) -> Vec<usize> {
        let mut slots: Vec<usize> = obstacles
            .iter()
            .filter_map(|&id| space.body(id))
            .filter_map(|body| slot_at(body.pos.y))
            .collect();
        slots.sort_unstable();
        slots
    }

    #[test]
    fn test_gap_three_leaves_slots_three_and_four_empty() {
        let mut space = Space::new(GRAVITY);
        let mut obstacles = Vec::new();
        spawn_row_with_gap(&mut space, 3, &mut obstacles);

        assert_eq!(obstacles.len(), 7);
        assert_eq!(occupied_slots(&space, &obstacles), vec![0, 1, 2, 5, 6, 7, 8]);
        assert_eq!(find_gap(&occupied_slots(&space, &obstacles)), Some(3));
    }

    #[test]
    fn test_obstacle_bodies() {
        let mut space = Space::new(GRAVITY);
        let mut obstacles = Vec::new();
        spawn_row_with_gap(&mut space, 1, &mut obstacles);

        for &id in &obstacles {
            let body = space.body(id).unwrap();
            assert!(body.is_kinematic());
            assert!(body.ignores_gravity);
            assert_eq!(body.vel, OBSTACLE_VELOCITY);
            assert_eq!(body.pos.x, SCREEN_WIDTH);
            assert_eq!(body.shapes().len(), 1);
            assert_eq!(body.shapes()[0].elasticity, OBSTACLE_ELASTICITY);
            assert_eq!(body.shapes()[0].width, BOX_SIDE);
        }
    }

    #[test]
    fn test_slot_layout() {
        assert_eq!(slot_center_y(0), 30.0);
        assert_eq!(slot_center_y(1), 100.0);
        assert_eq!(slot_center_y(8), 590.0);
        assert_eq!(slot_at(590.0), Some(8));
        assert_eq!(slot_at(-200.0), None);
        assert_eq!(slot_at(700.0), None);
    }

    #[test]
    fn test_gap_fits_player() {
        // Space between the boxes above and below a gap
        let gap = 4;
        let below_top = slot_center_y(gap - 1) + HALF_SIDE;
        let above_bottom = slot_center_y(gap + GAP_SLOTS) - HALF_SIDE;
        assert!(above_bottom - below_top >= 2.0 * BOX_SIDE + SLOT_SPACING);
    }

    #[test]
    fn test_every_gap_start_is_reachable() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut seen = [false; GAP_START_CHOICES + 1];
        for _ in 0..500 {
            let mut space = Space::new(GRAVITY);
            let gap = spawn_row(&mut space, &mut rng, &mut Vec::new());
            seen[gap] = true;
        }
        assert!(!seen[0]);
        assert!(seen[1..].iter().all(|&s| s));
    }

    proptest! {
        #[test]
        fn prop_row_has_one_adjacent_gap(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut space = Space::new(GRAVITY);
            let mut obstacles = Vec::new();
            let gap = spawn_row(&mut space, &mut rng, &mut obstacles);

            prop_assert_eq!(obstacles.len(), ROW_SLOTS - GAP_SLOTS);
            let occupied = occupied_slots(&space, &obstacles);
            let missing: Vec<usize> = (0..ROW_SLOTS).filter(|s| !occupied.contains(s)).collect();
            prop_assert_eq!(missing.len(), 2);
            prop_assert_eq!(missing[1], missing[0] + 1);
            prop_assert!(missing[0] >= 1 && missing[1] <= 7);
            prop_assert_eq!(missing[0], gap);
        }
    }
}
