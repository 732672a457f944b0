use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::{Duration, Instant};

use crate::state::GameStatus;

/// How long a movement key counts as held after its last press when the
/// terminal cannot report key releases
const HOLD_WINDOW: Duration = Duration::from_millis(120);

/// Represents semantic game actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    Fire,
    Restart,
    Quit,
}

/// Movement keys currently held, stamped with their last press or repeat.
/// The two directions are tracked independently; holding both nets to zero.
#[derive(Debug, Default)]
struct KeyState {
    left: Option<Instant>,
    right: Option<Instant>,
    /// Last Space press, used to spot auto-repeat without release events
    fire: Option<Instant>,
}

/// Manages input polling and translates raw key events into game actions
pub struct InputManager {
    key_state: KeyState,
    oneshot_actions: Vec<InputAction>,
    reports_releases: bool,
}

impl InputManager {
    /// `reports_releases` is true when the terminal sends key release events
    /// (keyboard enhancement enabled)
    pub fn new(reports_releases: bool) -> Self {
        Self {
            key_state: KeyState::default(),
            oneshot_actions: Vec::new(),
            reports_releases,
        }
    }

    /// Polls for all input events and stores one-shot actions
    /// Should be called once per frame before getting actions
    pub fn poll_events(&mut self, status: GameStatus) -> color_eyre::Result<()> {
        // Clear previous one-shot actions
        self.oneshot_actions.clear();

        let now = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = event::read()? {
                self.handle_key_event(key_event, status, now);
            }
        }

        Ok(())
    }

    /// Throws away everything typed so far, including held keys. Used after
    /// blocking pauses so input given during the pause has no effect.
    pub fn discard_pending(&mut self) -> color_eyre::Result<()> {
        while event::poll(Duration::from_millis(0))? {
            event::read()?;
        }
        self.oneshot_actions.clear();
        self.key_state = KeyState::default();
        Ok(())
    }

    /// Processes a key event and updates key state and one-shot actions
    fn handle_key_event(&mut self, key_event: KeyEvent, status: GameStatus, now: Instant) {
        match key_event.kind {
            KeyEventKind::Press => self.handle_key_press(key_event, status, now),
            KeyEventKind::Repeat => self.handle_key_repeat(key_event.code, now),
            KeyEventKind::Release => self.handle_key_release(key_event.code),
        }
    }

    fn handle_key_press(&mut self, key_event: KeyEvent, status: GameStatus, now: Instant) {
        // Check for quit keys first (works in any state)
        if matches!(
            key_event.code,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
        ) || (key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.oneshot_actions.push(InputAction::Quit);
            return;
        }

        match status {
            GameStatus::GameOver => {
                if matches!(key_event.code, KeyCode::Char('r') | KeyCode::Char('R')) {
                    self.oneshot_actions.push(InputAction::Restart);
                }
            }
            GameStatus::Playing => match key_event.code {
                KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                    self.key_state.left = Some(now);
                }
                KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                    self.key_state.right = Some(now);
                }
                // One bullet per press. Without release events, auto-repeat
                // arrives as a stream of presses inside the hold window.
                KeyCode::Char(' ') => {
                    let repeated = !self.reports_releases
                        && self
                            .key_state
                            .fire
                            .is_some_and(|at| now.saturating_duration_since(at) <= HOLD_WINDOW);
                    self.key_state.fire = Some(now);
                    if !repeated {
                        self.oneshot_actions.push(InputAction::Fire);
                    }
                }
                _ => {}
            },
        }
    }

    /// Auto-repeat means the key is still down: it re-arms movement keys
    /// but never fires
    fn handle_key_repeat(&mut self, code: KeyCode, now: Instant) {
        match code {
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                self.key_state.left = Some(now);
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                self.key_state.right = Some(now);
            }
            _ => {}
        }
    }

    fn handle_key_release(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                self.key_state.left = None;
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                self.key_state.right = None;
            }
            KeyCode::Char(' ') => {
                self.key_state.fire = None;
            }
            _ => {}
        }
    }

    fn is_held(&self, pressed: Option<Instant>, now: Instant) -> bool {
        match pressed {
            Some(at) => self.reports_releases || now.saturating_duration_since(at) <= HOLD_WINDOW,
            None => false,
        }
    }

    /// Returns all actions for this frame (both continuous and one-shot)
    /// Must be called after poll_events()
    pub fn get_actions(&self, status: GameStatus, now: Instant) -> Vec<InputAction> {
        let mut actions = Vec::new();

        // Add one-shot actions first
        actions.extend_from_slice(&self.oneshot_actions);

        if status == GameStatus::Playing {
            if self.is_held(self.key_state.left, now) {
                actions.push(InputAction::MoveLeft);
            }
            if self.is_held(self.key_state.right, now) {
                actions.push(InputAction::MoveRight);
            }
        }

        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    fn repeat(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Repeat)
    }

    #[test]
    fn test_fire_is_one_shot() {
        let mut input = InputManager::new(true);
        let now = Instant::now();
        input.handle_key_event(press(KeyCode::Char(' ')), GameStatus::Playing, now);
        assert_eq!(
            input.get_actions(GameStatus::Playing, now),
            vec![InputAction::Fire]
        );

        // Holding space does not keep firing
        input.oneshot_actions.clear();
        input.handle_key_event(
            KeyEvent::new_with_kind(KeyCode::Char(' '), KeyModifiers::NONE, KeyEventKind::Repeat),
            GameStatus::Playing,
            now,
        );
        assert!(input.get_actions(GameStatus::Playing, now).is_empty());
    }

    #[test]
    fn test_movement_held_until_release() {
        let mut input = InputManager::new(true);
        let now = Instant::now();
        input.handle_key_event(press(KeyCode::Left), GameStatus::Playing, now);

        let later = now + Duration::from_secs(5);
        assert_eq!(
            input.get_actions(GameStatus::Playing, later),
            vec![InputAction::MoveLeft]
        );

        input.handle_key_event(release(KeyCode::Left), GameStatus::Playing, later);
        assert!(input.get_actions(GameStatus::Playing, later).is_empty());
    }

    #[test]
    fn test_both_directions_held_together() {
        let mut input = InputManager::new(true);
        let now = Instant::now();
        input.handle_key_event(press(KeyCode::Char('a')), GameStatus::Playing, now);
        input.handle_key_event(press(KeyCode::Char('d')), GameStatus::Playing, now);
        assert_eq!(
            input.get_actions(GameStatus::Playing, now),
            vec![InputAction::MoveLeft, InputAction::MoveRight]
        );
    }

    #[test]
    fn test_held_right_survives_left_tap() {
        let mut input = InputManager::new(true);
        let now = Instant::now();
        input.handle_key_event(press(KeyCode::Right), GameStatus::Playing, now);
        input.handle_key_event(press(KeyCode::Left), GameStatus::Playing, now);
        input.handle_key_event(release(KeyCode::Left), GameStatus::Playing, now);
        input.handle_key_event(repeat(KeyCode::Right), GameStatus::Playing, now);
        assert_eq!(
            input.get_actions(GameStatus::Playing, now),
            vec![InputAction::MoveRight]
        );
    }

    #[test]
    fn test_repeat_rearms_cleared_key() {
        let mut input = InputManager::new(true);
        let now = Instant::now();
        // Key state was wiped (level banner) while Left stayed down
        input.handle_key_event(repeat(KeyCode::Left), GameStatus::Playing, now);
        assert_eq!(
            input.get_actions(GameStatus::Playing, now),
            vec![InputAction::MoveLeft]
        );
    }

    #[test]
    fn test_fire_autorepeat_without_release_events() {
        let mut input = InputManager::new(false);
        let now = Instant::now();
        input.handle_key_event(press(KeyCode::Char(' ')), GameStatus::Playing, now);
        assert_eq!(
            input.get_actions(GameStatus::Playing, now),
            vec![InputAction::Fire]
        );

        // Terminal auto-repeat shows up as presses every ~30ms
        let mut at = now;
        for _ in 0..10 {
            at += Duration::from_millis(30);
            input.oneshot_actions.clear();
            input.handle_key_event(press(KeyCode::Char(' ')), GameStatus::Playing, at);
            assert!(input.get_actions(GameStatus::Playing, at).is_empty());
        }

        // A fresh press after a pause fires again
        let later = at + Duration::from_millis(300);
        input.oneshot_actions.clear();
        input.handle_key_event(press(KeyCode::Char(' ')), GameStatus::Playing, later);
        assert_eq!(
            input.get_actions(GameStatus::Playing, later),
            vec![InputAction::Fire]
        );
    }

    #[test]
    fn test_rapid_presses_fire_with_release_events() {
        let mut input = InputManager::new(true);
        let now = Instant::now();
        for _ in 0..3 {
            input.handle_key_event(press(KeyCode::Char(' ')), GameStatus::Playing, now);
            input.handle_key_event(release(KeyCode::Char(' ')), GameStatus::Playing, now);
        }
        assert_eq!(
            input.get_actions(GameStatus::Playing, now),
            vec![InputAction::Fire; 3]
        );
    }

    #[test]
    fn test_hold_window_without_release_events() {
        let mut input = InputManager::new(false);
        let now = Instant::now();
        input.handle_key_event(press(KeyCode::Right), GameStatus::Playing, now);

        assert_eq!(
            input.get_actions(GameStatus::Playing, now + Duration::from_millis(50)),
            vec![InputAction::MoveRight]
        );
        assert!(
            input
                .get_actions(GameStatus::Playing, now + Duration::from_millis(500))
                .is_empty()
        );
    }

    #[test]
    fn test_restart_only_in_game_over() {
        let mut input = InputManager::new(true);
        let now = Instant::now();
        input.handle_key_event(press(KeyCode::Char('r')), GameStatus::Playing, now);
        assert!(input.get_actions(GameStatus::Playing, now).is_empty());

        input.handle_key_event(press(KeyCode::Char('r')), GameStatus::GameOver, now);
        assert_eq!(
            input.get_actions(GameStatus::GameOver, now),
            vec![InputAction::Restart]
        );
    }

    #[test]
    fn test_no_fire_or_movement_in_game_over() {
        let mut input = InputManager::new(true);
        let now = Instant::now();
        input.handle_key_event(press(KeyCode::Char(' ')), GameStatus::GameOver, now);
        input.handle_key_event(press(KeyCode::Left), GameStatus::GameOver, now);
        assert!(input.get_actions(GameStatus::GameOver, now).is_empty());
    }

    #[test]
    fn test_quit_in_any_state() {
        let mut input = InputManager::new(true);
        let now = Instant::now();
        input.handle_key_event(
            KeyEvent::new_with_kind(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL,
                KeyEventKind::Press,
            ),
            GameStatus::GameOver,
            now,
        );
        assert_eq!(
            input.get_actions(GameStatus::GameOver, now),
            vec![InputAction::Quit]
        );
    }
}
