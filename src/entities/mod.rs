mod bullet;
mod enemy;
mod explosion;
mod player;

// Re-export all public types
pub use bullet::Bullet;
pub use enemy::{ANIMATION_FRAMES, Enemy};
pub use explosion::{EXPLOSION_COLORS, Explosion};
pub use player::{EXPLOSION_FRAMES, Player};
