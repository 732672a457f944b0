use rand::Rng;
use std::time::Instant;

use crate::entities::{Bullet, Enemy, Explosion, Player};
use crate::highscore::HighScoreStore;
use crate::spawner::Spawner;
use crate::state::{GameState, GameStatus};

/// Held movement keys for one tick
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Steering {
    pub left: bool,
    pub right: bool,
}

/// Things that happened during a tick, for the loop to react to (audio,
/// level banner). Drained with [`GameSession::drain_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Shot,
    EnemyDestroyed { points: u32 },
    EnemyEscaped,
    LevelUp { level: u32 },
    GameOver { score: u32, new_high_score: bool },
}

/// One play session: the board, the score and the spawn policy
pub struct GameSession {
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub explosions: Vec<Explosion>,
    pub state: GameState,
    pub status: GameStatus,
    pub spawner: Spawner,
    store: HighScoreStore,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Starts a session at level 1 with the high score loaded from `store`
    pub fn new(spawner: Spawner, store: HighScoreStore) -> Self {
        let state = GameState::load(&store);
        Self {
            player: Player::spawn(),
            bullets: Vec::new(),
            enemies: Vec::new(),
            explosions: Vec::new(),
            state,
            status: GameStatus::Playing,
            spawner,
            store,
            events: Vec::new(),
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    /// Fires one bullet if the player is alive. There is no cooldown: every
    /// press is a shot.
    pub fn fire(&mut self) {
        if self.is_game_over() {
            return;
        }
        if let Some(bullet) = self.player.try_fire() {
            self.bullets.push(bullet);
            self.events.push(GameEvent::Shot);
        }
    }

    /// Advances the game by one tick. Does nothing once the game is over.
    pub fn tick(&mut self, steering: Steering, now: Instant, rng: &mut impl Rng) {
        if self.is_game_over() {
            return;
        }

        self.player.update(steering.left, steering.right);

        for bullet in &mut self.bullets {
            bullet.update();
        }
        self.bullets.retain(|b| !b.is_out_of_bounds());

        for enemy in &mut self.enemies {
            enemy.update();
        }

        if let Some(enemy) = self.spawner.try_spawn(now, rng) {
            self.enemies.push(enemy);
        }

        self.resolve_bullet_hits();
        if self.state.level_complete() {
            self.advance_level();
        }
        self.check_player_hit();
        self.remove_escaped_enemies();
    }

    /// Advances animations by one frame. Runs in every state so the death
    /// explosion keeps playing after game over.
    pub fn animate(&mut self) {
        self.player.animate();
        for enemy in &mut self.enemies {
            enemy.animate();
        }
        for explosion in &mut self.explosions {
            explosion.update();
        }
        self.explosions.retain(|e| !e.is_complete());
    }

    /// Starts over from level 1. Only honored after game over.
    pub fn restart(&mut self, now: Instant) -> bool {
        if !self.is_game_over() {
            return false;
        }
        self.clear_board();
        self.state.reset();
        self.spawner.reset(now);
        self.status = GameStatus::Playing;
        log::info!("Restarted, high score {}", self.state.high_score);
        true
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn clear_board(&mut self) {
        let (x, y) = Player::start_position();
        self.player.reset(x, y);
        self.bullets.clear();
        self.enemies.clear();
        self.explosions.clear();
    }

    /// Each bullet takes out at most one enemy, and each enemy absorbs at
    /// most one bullet
    fn resolve_bullet_hits(&mut self) {
        let mut bullets_to_remove = Vec::new();
        let mut enemies_to_remove = Vec::new();

        for (b_idx, bullet) in self.bullets.iter().enumerate() {
            let bullet_box = bullet.hitbox();
            let hit = self.enemies.iter().enumerate().find(|(e_idx, enemy)| {
                !enemies_to_remove.contains(e_idx) && bullet_box.intersects(&enemy.hitbox())
            });

            if let Some((e_idx, enemy)) = hit {
                self.explosions.push(Explosion::at(enemy.center()));
                let points = self.state.kill_reward();
                self.state.award_kill();
                self.events.push(GameEvent::EnemyDestroyed { points });

                bullets_to_remove.push(b_idx);
                enemies_to_remove.push(e_idx);
            }
        }

        remove_indices(&mut self.bullets, bullets_to_remove);
        remove_indices(&mut self.enemies, enemies_to_remove);
    }

    fn advance_level(&mut self) {
        self.state.advance_level();
        self.spawner.set_level(self.state.level);
        self.clear_board();

        log::info!(
            "Reached level {} (spawn rate 1/{})",
            self.state.level,
            self.spawner.spawn_rate
        );
        self.events.push(GameEvent::LevelUp {
            level: self.state.level,
        });
    }

    fn check_player_hit(&mut self) {
        if self.player.exploding {
            return;
        }
        let player_box = self.player.hitbox();
        if !self
            .enemies
            .iter()
            .any(|enemy| enemy.hitbox().intersects(&player_box))
        {
            return;
        }

        self.player.explode();
        self.explosions.push(Explosion::at(self.player.center()));
        let new_high_score = self.state.update_high_score(&self.store);
        self.status = GameStatus::GameOver;

        log::info!(
            "Game over at level {} with score {}",
            self.state.level,
            self.state.score
        );
        self.events.push(GameEvent::GameOver {
            score: self.state.score,
            new_high_score,
        });
    }

    fn remove_escaped_enemies(&mut self) {
        let before = self.enemies.len();
        self.enemies.retain(|e| !e.has_escaped());

        for _ in self.enemies.len()..before {
            self.state.penalize_escape();
            self.events.push(GameEvent::EnemyEscaped);
        }
    }
}

/// Removes the marked positions, highest first so earlier indices stay valid
fn remove_indices<T>(items: &mut Vec<T>, mut indices: Vec<usize>) {
    indices.sort_unstable();
    indices.dedup();
    for idx in indices.into_iter().rev() {
        if idx < items.len() {
            items.remove(idx);
        }
    }
}
