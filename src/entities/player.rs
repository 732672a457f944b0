use super::bullet::Bullet;
use crate::collision::Hitbox;
use crate::constants::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Number of frames in the one-shot death animation
pub const EXPLOSION_FRAMES: u8 = 3;
/// Ticks each death animation frame stays on screen
const EXPLOSION_FRAME_TICKS: u8 = 10;

#[derive(Debug, Clone)]
pub struct Player {
    pub x: i32,
    pub y: i32,
    pub exploding: bool,
    pub explosion_index: u8,
    pub explosion_counter: u8,
}

impl Player {
    pub const WIDTH: i32 = 50;
    pub const HEIGHT: i32 = 30;
    pub const SPEED: i32 = 5;

    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            exploding: false,
            explosion_index: 0,
            explosion_counter: 0,
        }
    }

    /// Horizontally centered, 20px above the bottom edge
    pub fn start_position() -> (i32, i32) {
        (
            SCREEN_WIDTH / 2 - Self::WIDTH / 2,
            SCREEN_HEIGHT - Self::HEIGHT - 20,
        )
    }

    pub fn spawn() -> Self {
        let (x, y) = Self::start_position();
        Self::new(x, y)
    }

    pub fn max_x() -> i32 {
        SCREEN_WIDTH - Self::WIDTH
    }

    pub fn move_left(&mut self) {
        self.x = (self.x - Self::SPEED).max(0);
    }

    pub fn move_right(&mut self) {
        self.x = (self.x + Self::SPEED).min(Self::max_x());
    }

    /// Applies held movement input for one tick. Frozen while exploding.
    pub fn update(&mut self, left: bool, right: bool) {
        if self.exploding {
            return;
        }
        if left {
            self.move_left();
        }
        if right {
            self.move_right();
        }
    }

    pub fn can_fire(&self) -> bool {
        !self.exploding
    }

    /// Fires a bullet from the nose of the ship. No cooldown.
    pub fn try_fire(&self) -> Option<Bullet> {
        if !self.can_fire() {
            return None;
        }
        let x = self.x + Self::WIDTH / 2 - Bullet::WIDTH / 2;
        Some(Bullet::new(x, self.y))
    }

    pub fn explode(&mut self) {
        self.exploding = true;
    }

    /// Advances the death animation; does nothing while alive
    pub fn animate(&mut self) {
        if !self.exploding || self.explosion_finished() {
            return;
        }
        self.explosion_counter += 1;
        if self.explosion_counter >= EXPLOSION_FRAME_TICKS {
            self.explosion_index += 1;
            self.explosion_counter = 0;
        }
    }

    pub fn explosion_finished(&self) -> bool {
        self.explosion_index >= EXPLOSION_FRAMES
    }

    pub fn reset(&mut self, x: i32, y: i32) {
        *self = Self::new(x, y);
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.x, self.y, Self::WIDTH, Self::HEIGHT)
    }

    pub fn center(&self) -> (i32, i32) {
        self.hitbox().center()
    }
}
