// Library exports for testing
pub use entities::{Bullet, Enemy, Explosion, Player};
pub use session::{GameEvent, GameSession, Steering};
pub use state::{GameState, GameStatus};

pub mod app;
pub mod audio;
pub mod collision;
pub mod config;
pub mod constants;
pub mod entities;
pub mod highscore;
pub mod input;
pub mod logging;
pub mod renderer;
pub mod session;
pub mod spawner;
pub mod state;
