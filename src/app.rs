use color_eyre::Result;
use rand::rngs::ThreadRng;
use ratatui::{Terminal, backend::Backend};
use std::time::{Duration, Instant};

use crate::audio::AudioManager;
use crate::config::GameConfig;
use crate::highscore::HighScoreStore;
use crate::input::{InputAction, InputManager};
use crate::renderer::{GameRenderer, RenderView};
use crate::session::{GameEvent, GameSession, Steering};
use crate::spawner::Spawner;

/// The main application which holds the state and logic of the application.
pub struct App {
    running: bool,
    config: GameConfig,
    session: GameSession,
    rng: ThreadRng,
    /// Frames info
    last_frame_time: Instant,
    fps: u32,
    /// internal components
    input_manager: InputManager,
    renderer: GameRenderer,
    audio_manager: AudioManager,
}

impl App {
    /// Construct a new instance of [`App`].
    ///
    /// `reports_releases` tells the input layer whether the terminal sends key
    /// release events.
    pub fn new(config: GameConfig, reports_releases: bool) -> Self {
        let now = Instant::now();
        let gameplay = &config.gameplay;
        let spawner = Spawner::new(
            gameplay.spawn_interval(),
            gameplay.base_spawn_rate,
            gameplay.min_spawn_rate,
            now,
        );
        let store = HighScoreStore::new(&config.storage.high_score_path);
        let session = GameSession::new(spawner, store);
        let audio_manager = AudioManager::new(&config.audio);

        log::info!(
            "New game: {} ticks/s, high score {}",
            gameplay.tick_rate,
            session.state.high_score
        );

        Self {
            running: true,
            config,
            session,
            rng: rand::rng(),
            last_frame_time: now,
            fps: 0,
            input_manager: InputManager::new(reports_releases),
            renderer: GameRenderer::new(),
            audio_manager,
        }
    }

    /// Run the application's main loop.
    pub fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let tick = self.config.gameplay.tick_duration();

        while self.running {
            let frame_start = Instant::now();
            let frame_time = frame_start.duration_since(self.last_frame_time);
            self.last_frame_time = frame_start;
            if frame_time.as_micros() > 0 {
                self.fps = (1_000_000 / frame_time.as_micros()) as u32;
            }

            // Poll input events and get actions
            self.input_manager.poll_events(self.session.status)?;
            let actions = self
                .input_manager
                .get_actions(self.session.status, frame_start);
            let steering = self.process_actions(&actions, frame_start);

            self.session.tick(steering, frame_start, &mut self.rng);
            self.session.animate();

            let events = self.session.drain_events();
            for event in &events {
                self.audio_manager.handle_event(event);
            }
            let level_banner = events.iter().find_map(|event| match event {
                GameEvent::LevelUp { level } => Some(*level),
                _ => None,
            });

            self.draw(terminal, level_banner)?;

            // The banner holds the game; keys pressed meanwhile are dropped
            if level_banner.is_some() {
                std::thread::sleep(self.config.gameplay.level_banner());
                self.input_manager.discard_pending()?;
            }

            std::thread::sleep(remaining_tick(tick, frame_start.elapsed()));
        }

        log::info!("Exiting, high score {}", self.session.state.high_score);
        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>, level_banner: Option<u32>) -> Result<()> {
        terminal.draw(|frame| {
            let view = RenderView {
                level_banner,
                fps: self.fps,
                ..RenderView::new(&self.session, frame.area())
            };
            self.renderer.render(frame, &view);
        })?;
        Ok(())
    }

    /// Process input actions and return the held movement for this tick
    fn process_actions(&mut self, actions: &[InputAction], now: Instant) -> Steering {
        let mut steering = Steering::default();
        for action in actions {
            match action {
                InputAction::Quit => {
                    self.running = false;
                }
                InputAction::Restart => {
                    self.session.restart(now);
                }
                InputAction::Fire => {
                    self.session.fire();
                }
                InputAction::MoveLeft => {
                    steering.left = true;
                }
                InputAction::MoveRight => {
                    steering.right = true;
                }
            }
        }
        steering
    }
}

/// Time left in the tick budget after `elapsed` was spent on the frame
fn remaining_tick(tick: Duration, elapsed: Duration) -> Duration {
    tick.saturating_sub(elapsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_tick() {
        let tick = Duration::from_millis(16);
        assert_eq!(
            remaining_tick(tick, Duration::from_millis(6)),
            Duration::from_millis(10)
        );
        // Overlong frames do not sleep at all
        assert_eq!(
            remaining_tick(tick, Duration::from_millis(40)),
            Duration::ZERO
        );
    }
}
