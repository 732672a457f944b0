// Logical canvas, in pixels. All entity coordinates live in this space.
pub const SCREEN_WIDTH: i32 = 800;
pub const SCREEN_HEIGHT: i32 = 600;

// Scoring
pub const POINTS_PER_KILL: u32 = 100; // multiplied by the current level
pub const ESCAPE_PENALTY: u32 = 10;
pub const POINTS_PER_LEVEL: u32 = 1000; // level N ends once score reaches N * 1000

// Spawning
pub const SPAWN_RATE_STEP: u32 = 2; // spawn_rate drops by this much per level
