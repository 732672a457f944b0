use crate::constants::{ESCAPE_PENALTY, POINTS_PER_KILL, POINTS_PER_LEVEL};
use crate::highscore::HighScoreStore;

/// Phase of a play session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// Score, level and the best score seen so far
#[derive(Debug, Clone)]
pub struct GameState {
    pub score: u32,
    pub high_score: u32,
    pub level: u32,
}

impl GameState {
    pub fn new(high_score: u32) -> Self {
        Self {
            score: 0,
            high_score,
            level: 1,
        }
    }

    /// Loads the persisted high score and starts at level 1
    pub fn load(store: &HighScoreStore) -> Self {
        Self::new(store.load())
    }

    /// Points awarded for destroying one enemy at the current level
    pub fn kill_reward(&self) -> u32 {
        POINTS_PER_KILL * self.level
    }

    pub fn award_kill(&mut self) {
        self.score += self.kill_reward();
    }

    /// Escaped enemies cost points; the score bottoms out at 0
    pub fn penalize_escape(&mut self) {
        self.score = self.score.saturating_sub(ESCAPE_PENALTY);
    }

    pub fn level_threshold(&self) -> u32 {
        self.level * POINTS_PER_LEVEL
    }

    pub fn level_complete(&self) -> bool {
        self.score >= self.level_threshold()
    }

    /// Moves to the next level; the score starts over from 0
    pub fn advance_level(&mut self) {
        self.level += 1;
        self.score = 0;
    }

    /// Records a new high score and writes it through `store`.
    ///
    /// Returns true if the score beat the previous best. A failed write is
    /// logged and otherwise ignored.
    pub fn update_high_score(&mut self, store: &HighScoreStore) -> bool {
        if self.score <= self.high_score {
            return false;
        }
        self.high_score = self.score;
        if let Err(err) = store.save(self.high_score) {
            log::error!("Failed to persist high score: {:#}", err);
        }
        true
    }

    /// Back to level 1 with an empty score; the high score is kept
    pub fn reset(&mut self) {
        self.score = 0;
        self.level = 1;
    }
}
