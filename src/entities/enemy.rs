use crate::collision::Hitbox;
use crate::constants::SCREEN_HEIGHT;

/// Number of frames in the looping enemy animation
pub const ANIMATION_FRAMES: u8 = 3;
const ANIMATION_FRAME_TICKS: u8 = 15;

#[derive(Debug, Clone)]
pub struct Enemy {
    pub x: i32,
    pub y: i32,
    pub current_frame: u8,
    pub animation_counter: u8,
}

impl Enemy {
    pub const WIDTH: i32 = 40;
    pub const HEIGHT: i32 = 40;
    pub const SPEED: i32 = 2;

    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            current_frame: 0,
            animation_counter: 0,
        }
    }

    pub fn update(&mut self) {
        self.y += Self::SPEED;
    }

    pub fn animate(&mut self) {
        self.animation_counter += 1;
        if self.animation_counter >= ANIMATION_FRAME_TICKS {
            self.current_frame = (self.current_frame + 1) % ANIMATION_FRAMES;
            self.animation_counter = 0;
        }
    }

    /// True once the enemy's top edge has passed the bottom of the canvas
    pub fn has_escaped(&self) -> bool {
        self.y > SCREEN_HEIGHT
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.x, self.y, Self::WIDTH, Self::HEIGHT)
    }

    pub fn center(&self) -> (i32, i32) {
        self.hitbox().center()
    }
}
