//! Game controller
//!
//! Owns the space, the player handle, the obstacle list and all round state.
//! One call to [`Game::tick`] runs the spawn timer, steps physics, and cleans
//! up bodies that left the screen.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyId};
use super::input::InputEvent;
use super::shape::Shape;
use super::space::{Arbiter, CollisionListener, Space};
use super::spawner;
use crate::consts::*;
use crate::{past_left_edge, within_vertical_bounds};

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Player alive, obstacles scrolling
    Running,
    /// Player hit an obstacle; waits for the player to fall off screen
    Collided,
}

/// Score and collision flags for the current round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub score: u32,
    /// Rows spawned since the last restart
    pub obstacles_spawned: u32,
    /// Latched on the round-ending hit, cleared only by restart
    pub collided: bool,
    /// Set by restart; the next player contact is ignored
    pub just_restarted: bool,
}

/// Things that happened during a tick, drained by the loop driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    RowSpawned { gap: usize },
    Scored { score: u32 },
    Collided,
    /// The player contact right after a restart
    CollisionIgnored,
    Restarted,
}

/// What a render view draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteKind {
    Player,
    Obstacle,
}

/// One box to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub sensor: bool,
}

/// Read-only snapshot for a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Obstacles first, player last
    pub sprites: Vec<Sprite>,
    pub score: u32,
    pub score_text: String,
}

/// Collision listener used while the space steps
struct CollisionWatch<'a> {
    player: BodyId,
    round: &'a mut RoundState,
    events: &'a mut Vec<GameEvent>,
    hit: bool,
}

impl CollisionListener for CollisionWatch<'_> {
    fn collision_enter(&mut self, arbiter: &Arbiter<'_>) -> bool {
        let touches_player =
            arbiter.shape_a.body() == self.player || arbiter.shape_b.body() == self.player;
        if !touches_player {
            return true;
        }

        // TODO: replace with a one-tick contact debounce for freshly added
        // bodies once the spurious post-restart contact is tracked down.
        if self.round.just_restarted {
            self.round.just_restarted = false;
            log::trace!("Ignoring first player contact after restart");
            self.events.push(GameEvent::CollisionIgnored);
        } else if !self.round.collided {
            self.round.collided = true;
            self.hit = true;
            self.events.push(GameEvent::Collided);
        }
        true
    }
}

fn new_player() -> Body {
    let shape = Shape::new_box(BOX_SIDE, BOX_SIDE).with_elasticity(PLAYER_ELASTICITY);
    Body::dynamic(PLAYER_MASS, shape).with_position(PLAYER_SPAWN)
}

fn sprites_for(kind: SpriteKind, body: &Body) -> impl Iterator<Item = Sprite> + '_ {
    body.shapes().iter().map(move |shape| Sprite {
        kind,
        pos: body.pos,
        width: shape.width,
        height: shape.height,
        sensor: shape.sensor,
    })
}

/// The whole game
#[derive(Debug, Clone)]
pub struct Game {
    seed: u64,
    rng: Pcg32,
    space: Space,
    player: BodyId,
    obstacles: Vec<BodyId>,
    round: RoundState,
    ticks_to_next_spawn: u32,
    time_ticks: u64,
    quit_requested: bool,
    events: Vec<GameEvent>,
}

impl Game {
    /// Create a game with one player and no obstacles
    pub fn new(seed: u64) -> Self {
        let mut space = Space::new(GRAVITY);
        let player = space.add_body(new_player());
        log::info!("New game (seed {seed})");

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            space,
            player,
            obstacles: Vec::new(),
            round: RoundState::default(),
            ticks_to_next_spawn: INITIAL_SPAWN_DELAY_TICKS,
            time_ticks: 0,
            quit_requested: false,
            events: Vec::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn space(&self) -> &Space {
        &self.space
    }

    pub fn player(&self) -> BodyId {
        self.player
    }

    pub fn player_body(&self) -> Option<&Body> {
        self.space.body(self.player)
    }

    /// Live obstacle handles, oldest first
    pub fn obstacles(&self) -> &[BodyId] {
        &self.obstacles
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn score(&self) -> u32 {
        self.round.score
    }

    pub fn phase(&self) -> GamePhase {
        if self.round.collided {
            GamePhase::Collided
        } else {
            GamePhase::Running
        }
    }

    pub fn is_collided(&self) -> bool {
        self.round.collided
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Take the events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance one fixed step
    ///
    /// A non-positive `dt` leaves the game untouched.
    pub fn tick(&mut self, dt: f32) {
        if dt.is_nan() || dt <= 0.0 {
            return;
        }
        self.time_ticks += 1;

        self.advance_spawn_timer();

        let mut watch = CollisionWatch {
            player: self.player,
            round: &mut self.round,
            events: &mut self.events,
            hit: false,
        };
        self.space.step(dt, &mut watch);
        if watch.hit {
            self.end_round();
        }

        let out_of_bounds = self
            .player_body()
            .is_some_and(|body| !within_vertical_bounds(body.pos));
        if out_of_bounds {
            self.restart();
        }

        self.remove_offscreen_obstacles();
    }

    fn advance_spawn_timer(&mut self) {
        self.ticks_to_next_spawn = self.ticks_to_next_spawn.saturating_sub(1);
        if self.ticks_to_next_spawn > 0 {
            return;
        }

        if self.round.collided {
            self.ticks_to_next_spawn = COLLIDED_SPAWN_INTERVAL_TICKS;
        } else {
            self.ticks_to_next_spawn = SPAWN_INTERVAL_TICKS;
            self.spawn_row();
        }
    }

    /// Spawn one obstacle row and count it toward the score
    fn spawn_row(&mut self) {
        let gap = spawner::spawn_row(&mut self.space, &mut self.rng, &mut self.obstacles);
        self.round.obstacles_spawned += 1;
        self.events.push(GameEvent::RowSpawned { gap });
        log::debug!("Row {} spawned, gap at slot {gap}", self.round.obstacles_spawned);

        if self.round.obstacles_spawned > WARMUP_ROWS && !self.round.collided {
            self.round.score += 1;
            self.events.push(GameEvent::Scored {
                score: self.round.score,
            });
            log::debug!("Score: {}", self.round.score);
        }
    }

    /// Player becomes a ghost, obstacles stop
    fn end_round(&mut self) {
        log::info!("Round over with score {}", self.round.score);
        if let Some(player) = self.space.body_mut(self.player) {
            player.sensorize();
        }
        for &id in &self.obstacles {
            if let Some(obstacle) = self.space.body_mut(id) {
                obstacle.vel = Vec2::ZERO;
            }
        }
    }

    fn remove_offscreen_obstacles(&mut self) {
        let space = &mut self.space;
        self.obstacles.retain(|&id| {
            let offscreen = space.body(id).map(|body| past_left_edge(body.pos));
            match offscreen {
                Some(true) => {
                    space.remove_body(id);
                    false
                }
                Some(false) => true,
                None => false,
            }
        });
    }

    /// Wipe the world and start a fresh round
    pub fn restart(&mut self) {
        self.round.score = 0;
        self.round.obstacles_spawned = 0;
        self.round.collided = false;

        self.space.clear();
        self.obstacles.clear();
        self.player = self.space.add_body(new_player());

        self.round.just_restarted = true;
        self.events.push(GameEvent::Restarted);
        log::info!("Restarted");
    }

    /// Kick the player upward. Ignored once the round is over.
    ///
    /// Overrides the velocity instead of adding to it, so mashing jump
    /// settles at a fixed rise speed.
    pub fn jump(&mut self) {
        if self.round.collided {
            return;
        }
        let gravity = self.space.gravity();
        if let Some(player) = self.space.body_mut(self.player) {
            player.vel = player.vel * JUMP_VELOCITY_CARRY + gravity * JUMP_GRAVITY_SCALE;
        }
    }

    pub fn on_jump(&mut self) {
        self.jump();
    }

    /// Always honored, even after a collision
    pub fn on_quit_requested(&mut self) {
        if !self.quit_requested {
            log::info!("Quit requested");
        }
        self.quit_requested = true;
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Jump => self.on_jump(),
            InputEvent::Quit => self.on_quit_requested(),
        }
    }

    /// Apply queued events in order, each exactly once
    pub fn apply_inputs(&mut self, events: impl IntoIterator<Item = InputEvent>) {
        for event in events {
            self.handle_input(event);
        }
    }

    pub fn score_text(&self) -> String {
        format!("[ Score: {} ]", self.round.score)
    }

    /// Snapshot of everything a renderer needs
    pub fn frame(&self) -> Frame {
        let mut sprites: Vec<Sprite> = self
            .space
            .bodies()
            .filter(|body| body.id() != self.player)
            .flat_map(|body| sprites_for(SpriteKind::Obstacle, body))
            .collect();
        if let Some(player) = self.player_body() {
            sprites.extend(sprites_for(SpriteKind::Player, player));
        }

        Frame {
            sprites,
            score: self.round.score,
            score_text: self.score_text(),
        }
    }

    #[cfg(test)]
    pub(crate) fn space_mut(&mut self) -> &mut Space {
        &mut self.space
    }

    #[cfg(test)]
    pub(crate) fn obstacles_mut(&mut self) -> &mut Vec<BodyId> {
        &mut self.obstacles
    }

    #[cfg(test)]
    pub(crate) fn force_collided(&mut self) {
        self.round.collided = true;
        self.end_round();
    }
}
