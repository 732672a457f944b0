use crate::collision::Hitbox;

#[derive(Debug, Clone)]
pub struct Bullet {
    pub x: i32,
    pub y: i32,
}

impl Bullet {
    pub const WIDTH: i32 = 5;
    pub const HEIGHT: i32 = 15;
    pub const SPEED: i32 = 7;

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn update(&mut self) {
        self.y -= Self::SPEED;
    }

    /// True once the bullet has left the top of the canvas
    pub fn is_out_of_bounds(&self) -> bool {
        self.y < 0
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.x, self.y, Self::WIDTH, Self::HEIGHT)
    }
}
