/// Number of colors an explosion cycles through while shrinking
pub const EXPLOSION_COLORS: usize = 3;

const START_RADIUS: i32 = 5;
const MAX_RADIUS: i32 = 30;
const RADIUS_STEP: i32 = 2;

/// A circle that grows to its maximum radius, then shrinks away while
/// cycling colors
#[derive(Debug, Clone)]
pub struct Explosion {
    pub x: i32,
    pub y: i32,
    pub radius: i32,
    pub growing: bool,
    pub color_index: usize,
}

impl Explosion {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            radius: START_RADIUS,
            growing: true,
            color_index: 0,
        }
    }

    pub fn at((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }

    pub fn update(&mut self) {
        if self.growing {
            self.radius += RADIUS_STEP;
            if self.radius >= MAX_RADIUS {
                self.growing = false;
            }
        } else {
            self.radius -= RADIUS_STEP;
            self.color_index = (self.color_index + 1) % EXPLOSION_COLORS;
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.growing && self.radius <= 0
    }
}
