//! Keyboard input mapped to game actions
//!
//! Most terminals never report key releases, so a held soft-drop key is
//! tracked from its repeat events and treated as released once the repeats
//! stop for longer than [`KEY_TIMEOUT`].

use crate::run::Action;
use crate::settings::Settings;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

/// Time after which we consider a key "released" if no repeat received
const KEY_TIMEOUT: Duration = Duration::from_millis(150);

/// Key bindings configuration - supports multiple keys per action
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub left: Vec<KeyCode>,
    pub right: Vec<KeyCode>,
    pub up: Vec<KeyCode>,
    pub down: Vec<KeyCode>,
    pub hard_drop: Vec<KeyCode>,
    pub rotate_cw: Vec<KeyCode>,
    pub rotate_ccw: Vec<KeyCode>,
    pub restart: Vec<KeyCode>,
    pub quit: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key name into a KeyCode
    fn parse_key(name: &str) -> Option<KeyCode> {
        let lower = name.to_lowercase();
        let code = match lower.as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "backspace" => KeyCode::Backspace,
            "esc" | "escape" => KeyCode::Esc,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };
        Some(code)
    }

    /// Parse a list of key names, skipping unknown ones
    fn parse_keys(names: &[String]) -> Vec<KeyCode> {
        names
            .iter()
            .filter_map(|name| {
                let code = Self::parse_key(name);
                if code.is_none() {
                    tracing::warn!(key = %name, "unknown key name in settings");
                }
                code
            })
            .collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        let keys = &settings.keys;
        Self {
            left: Self::parse_keys(&keys.left),
            right: Self::parse_keys(&keys.right),
            up: Self::parse_keys(&keys.up),
            down: Self::parse_keys(&keys.down),
            hard_drop: Self::parse_keys(&keys.hard_drop),
            rotate_cw: Self::parse_keys(&keys.rotate_cw),
            rotate_ccw: Self::parse_keys(&keys.rotate_ccw),
            restart: Self::parse_keys(&keys.restart),
            quit: Self::parse_keys(&keys.quit),
        }
    }

    /// Action bound to a key, if any
    fn action_for(&self, code: KeyCode) -> Option<Action> {
        let table = [
            (&self.left, Action::Left),
            (&self.right, Action::Right),
            (&self.up, Action::Up),
            (&self.down, Action::Down),
            (&self.hard_drop, Action::HardDrop),
            (&self.rotate_cw, Action::RotateCw),
            (&self.rotate_ccw, Action::RotateCcw),
            (&self.restart, Action::Restart),
            (&self.quit, Action::Quit),
        ];
        table
            .into_iter()
            .find(|(codes, _)| codes.contains(&code))
            .map(|(_, action)| action)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Input handler tracking the held down key
#[derive(Debug)]
pub struct InputHandler {
    bindings: KeyBindings,
    /// When the down key was last seen while held
    down_seen: Option<Instant>,
}

impl InputHandler {
    /// Create input handler from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            bindings: KeyBindings::from_settings(settings),
            down_seen: None,
        }
    }

    /// Handle a key press or repeat - returns immediate actions
    pub fn key_down(&mut self, key: KeyEvent) -> Vec<Action> {
        self.key_down_at(key, Instant::now())
    }

    fn key_down_at(&mut self, key: KeyEvent, now: Instant) -> Vec<Action> {
        // Handle Ctrl+C for quit
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return vec![Action::Quit];
        }

        let Some(action) = self.bindings.action_for(normalize_key(key.code)) else {
            return Vec::new();
        };

        if action == Action::Down {
            // Repeats only keep the hold alive
            let held = self.down_seen.replace(now).is_some();
            if held {
                return Vec::new();
            }
            return vec![action];
        }

        // Any other key ends the hold, so the next Down is a fresh press
        if self.down_seen.take().is_some() {
            return vec![Action::DownReleased, action];
        }
        vec![action]
    }

    /// Handle a key release event (only reported by some terminals)
    pub fn key_up(&mut self, key: KeyEvent) -> Vec<Action> {
        let code = normalize_key(key.code);
        if self.bindings.down.contains(&code) && self.down_seen.take().is_some() {
            return vec![Action::DownReleased];
        }
        Vec::new()
    }

    /// Release keys whose repeats stopped (call every frame)
    pub fn update(&mut self) -> Vec<Action> {
        self.update_at(Instant::now())
    }

    fn update_at(&mut self, now: Instant) -> Vec<Action> {
        match self.down_seen {
            Some(seen) if now.duration_since(seen) > KEY_TIMEOUT => {
                self.down_seen = None;
                vec![Action::DownReleased]
            }
            _ => Vec::new(),
        }
    }

    /// Forget held keys (leaving a game screen)
    pub fn clear(&mut self) {
        self.down_seen = None;
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_default_bindings() {
        let mut input = InputHandler::default();
        assert_eq!(input.key_down(press(KeyCode::Char('a'))), vec![Action::Left]);
        assert_eq!(input.key_down(press(KeyCode::Char('D'))), vec![Action::Right]);
        assert_eq!(input.key_down(press(KeyCode::Char(' '))), vec![Action::HardDrop]);
        assert_eq!(input.key_down(press(KeyCode::Char('q'))), vec![Action::RotateCcw]);
        assert_eq!(input.key_down(press(KeyCode::Esc)), vec![Action::Quit]);
        assert!(input.key_down(press(KeyCode::F(5))).is_empty());
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut input = InputHandler::default();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(input.key_down(key), vec![Action::Quit]);
    }

    #[test]
    fn test_held_down_released_after_timeout() {
        let mut input = InputHandler::default();
        let start = Instant::now();
        assert_eq!(input.key_down_at(press(KeyCode::Down), start), vec![Action::Down]);
        // Repeat keeps it held without re-triggering
        let repeat = start + Duration::from_millis(100);
        assert!(input.key_down_at(press(KeyCode::Down), repeat).is_empty());
        assert!(input.update_at(repeat + Duration::from_millis(100)).is_empty());
        assert_eq!(
            input.update_at(repeat + Duration::from_millis(200)),
            vec![Action::DownReleased]
        );
        assert!(input.update_at(repeat + Duration::from_millis(300)).is_empty());
    }

    #[test]
    fn test_down_pressed_again_after_another_key() {
        let mut input = InputHandler::default();
        let start = Instant::now();
        assert_eq!(input.key_down_at(press(KeyCode::Down), start), vec![Action::Down]);
        assert_eq!(
            input.key_down_at(press(KeyCode::Right), start + Duration::from_millis(60)),
            vec![Action::DownReleased, Action::Right]
        );
        assert_eq!(
            input.key_down_at(press(KeyCode::Down), start + Duration::from_millis(120)),
            vec![Action::Down]
        );
    }

    #[test]
    fn test_key_up_releases_once() {
        let mut input = InputHandler::default();
        input.key_down(press(KeyCode::Char('s')));
        assert_eq!(input.key_up(press(KeyCode::Char('s'))), vec![Action::DownReleased]);
        assert!(input.key_up(press(KeyCode::Char('s'))).is_empty());
    }

    #[test]
    fn test_unknown_key_names_are_skipped() {
        let names = vec!["F13".to_string(), "k".to_string()];
        assert_eq!(KeyBindings::parse_keys(&names), vec![KeyCode::Char('k')]);
    }
}
