//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/arcade/settings.toml (or platform equivalent)

use crate::chaos::ChaosConfig;
use crate::snake::{SnakeConfig, SnakeVariant};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Arcade settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Keybindings
    pub keys: KeyBindings,
    /// Tick timings
    pub gameplay: GameplaySettings,
    /// Visual settings
    pub visual: VisualSettings,
    /// Where scores go
    pub leaderboard: LeaderboardSettings,
}

/// Key bindings (stored as strings for easy editing)
/// Each action can have one or more keys bound to it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub left: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub right: Vec<String>,
    /// Steer up, rotates in Chaos Drop
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub up: Vec<String>,
    /// Steer down, soft drop in Chaos Drop
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub down: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub hard_drop: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate_cw: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate_ccw: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub restart: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub quit: Vec<String>,
}

/// Deserialize keys as either a single string or array of strings
fn deserialize_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct KeysVisitor;

    impl<'de> Visitor<'de> for KeysVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a key name or a list of key names")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut keys = Vec::new();
            while let Some(key) = seq.next_element::<String>()? {
                keys.push(key);
            }
            Ok(keys)
        }
    }

    deserializer.deserialize_any(KeysVisitor)
}

/// A lone key is written as a plain string, several as a list
fn serialize_keys<S>(keys: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match keys {
        [single] => serializer.serialize_str(single),
        _ => serializer.collect_seq(keys),
    }
}

/// Tick timings in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    /// Snake movement tick
    pub snake_tick_ms: u64,
    /// Hunter step delay at the start and after every catch
    pub hunter_initial_ms: u64,
    /// Fastest the hunter gets
    pub hunter_min_ms: u64,
    /// Delay shaved off per hunter step
    pub hunter_step_ms: u64,
    /// Forced growth period in Hunter Snake
    pub growth_interval_ms: u64,
    /// Chaos Drop gravity
    pub chaos_drop_ms: u64,
    /// Chaos Drop gravity while soft dropping
    pub chaos_soft_drop_ms: u64,
}

/// Visual settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualSettings {
    /// Show where the falling piece will land
    pub show_ghost: bool,
    /// Block style: "solid", "bracket", "round"
    pub block_style: String,
}

/// Leaderboard backend and remembered alias
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardSettings {
    /// Base URL of the arcade API, empty keeps scores on this machine
    pub api_url: String,
    /// Alias used for the last successful submission
    pub player_name: String,
    /// Rows shown on the leaderboard screen
    pub fetch_limit: usize,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: vec!["Left".to_string(), "a".to_string()],
            right: vec!["Right".to_string(), "d".to_string()],
            up: vec!["Up".to_string(), "w".to_string()],
            down: vec!["Down".to_string(), "s".to_string()],
            hard_drop: vec!["Space".to_string()],
            rotate_cw: vec!["x".to_string()],
            rotate_ccw: vec!["q".to_string(), "z".to_string()],
            restart: vec!["r".to_string()],
            quit: vec!["Esc".to_string()],
        }
    }
}

impl Default for GameplaySettings {
    fn default() -> Self {
        let snake = SnakeConfig::classic();
        let chaos = ChaosConfig::default();
        Self {
            snake_tick_ms: snake.move_interval.as_millis() as u64,
            hunter_initial_ms: snake.food_initial_delay.as_millis() as u64,
            hunter_min_ms: snake.food_min_delay.as_millis() as u64,
            hunter_step_ms: snake.food_acceleration_step.as_millis() as u64,
            growth_interval_ms: snake.growth_interval.as_millis() as u64,
            chaos_drop_ms: chaos.drop_interval.as_millis() as u64,
            chaos_soft_drop_ms: chaos.soft_drop_interval.as_millis() as u64,
        }
    }
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            show_ghost: true,
            block_style: "solid".to_string(),
        }
    }
}

impl Default for LeaderboardSettings {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            player_name: String::new(),
            fetch_limit: crate::leaderboard::DEFAULT_LIMIT,
        }
    }
}

impl GameplaySettings {
    /// Snake configuration for a variant with these timings
    pub fn snake_config(&self, variant: SnakeVariant) -> SnakeConfig {
        let base = match variant {
            SnakeVariant::Classic => SnakeConfig::classic(),
            SnakeVariant::Hunter => SnakeConfig::hunter(),
        };
        // A zero interval would never fire, fall back to the stock timing
        let ms = |value: u64, fallback: Duration| {
            if value == 0 {
                fallback
            } else {
                Duration::from_millis(value)
            }
        };
        let food_initial_delay = ms(self.hunter_initial_ms, base.food_initial_delay);
        SnakeConfig {
            move_interval: ms(self.snake_tick_ms, base.move_interval),
            food_initial_delay,
            // The hunter only ever speeds up, so its floor never sits above the start
            food_min_delay: ms(self.hunter_min_ms, base.food_min_delay).min(food_initial_delay),
            food_acceleration_step: Duration::from_millis(self.hunter_step_ms),
            growth_interval: ms(self.growth_interval_ms, base.growth_interval),
            ..base
        }
    }

    /// Chaos Drop configuration with these timings
    pub fn chaos_config(&self) -> ChaosConfig {
        let base = ChaosConfig::default();
        ChaosConfig {
            drop_interval: match self.chaos_drop_ms {
                0 => base.drop_interval,
                ms => Duration::from_millis(ms),
            },
            soft_drop_interval: match self.chaos_soft_drop_ms {
                0 => base.soft_drop_interval,
                ms => Duration::from_millis(ms),
            },
            ..base
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "arcade", "arcade").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from file, or fall back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents),
            Err(_) => Self::default(),
        }
    }

    /// Parse settings text, falling back to defaults if it is malformed
    pub fn parse(contents: &str) -> Self {
        toml::from_str(contents).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring malformed settings file");
            Self::default()
        })
    }

    /// Save settings to file
    pub fn save(&self) -> Result<(), String> {
        let Some(dir) = Self::config_dir() else {
            return Err("Could not determine config directory".to_string());
        };
        let path = dir.join("settings.toml");

        fs::create_dir_all(&dir).map_err(|e| format!("Failed to create config dir: {}", e))?;

        let contents =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize: {}", e))?;

        fs::write(&path, contents).map_err(|e| format!("Failed to write settings: {}", e))?;

        Ok(())
    }

    /// Remember the alias of a successful submission, true if it changed
    pub fn remember_player(&mut self, name: &str) -> bool {
        if self.leaderboard.player_name == name {
            return false;
        }
        self.leaderboard.player_name = name.to_string();
        true
    }
}

impl VisualSettings {
    /// Get the block characters based on style
    pub fn block_chars(&self) -> (&'static str, &'static str) {
        match self.block_style.as_str() {
            "bracket" => ("[]", " ."),
            "round" => ("()", " ."),
            _ => ("██", "░░"), // "solid" or default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run::ArcadeGame;
    use crate::snake::SnakeGame;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = Settings::parse("");
        assert_eq!(settings.keys.hard_drop, vec!["Space"]);
        assert_eq!(settings.gameplay.snake_tick_ms, 180);
        assert_eq!(settings.gameplay.chaos_drop_ms, 700);
        assert!(settings.leaderboard.api_url.is_empty());
        assert_eq!(settings.leaderboard.fetch_limit, 10);
    }

    #[test]
    fn test_keys_accept_string_or_list() {
        let settings = Settings::parse(
            r#"
            [keys]
            left = "h"
            right = ["l", "Right"]
            "#,
        );
        assert_eq!(settings.keys.left, vec!["h"]);
        assert_eq!(settings.keys.right, vec!["l", "Right"]);
        // Untouched bindings keep their defaults
        assert_eq!(settings.keys.quit, vec!["Esc"]);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let settings = Settings::parse("[gameplay]\nsnake_tick_ms = \"fast\"");
        assert_eq!(settings.gameplay.snake_tick_ms, 180);
    }

    #[test]
    fn test_round_trip_keeps_single_keys_as_strings() {
        let text = toml::to_string_pretty(&Settings::default()).unwrap();
        assert!(text.contains("hard_drop = \"Space\""));
        let parsed = Settings::parse(&text);
        assert_eq!(parsed.keys.rotate_ccw, vec!["q", "z"]);
    }

    #[test]
    fn test_timings_feed_game_configs() {
        let settings = Settings::parse(
            r#"
            [gameplay]
            snake_tick_ms = 120
            hunter_min_ms = 0
            chaos_drop_ms = 500
            "#,
        );
        let hunter = settings.gameplay.snake_config(SnakeVariant::Hunter);
        assert_eq!(hunter.variant, SnakeVariant::Hunter);
        assert_eq!(hunter.move_interval, Duration::from_millis(120));
        assert_eq!(hunter.food_min_delay, Duration::from_millis(220));
        let chaos = settings.gameplay.chaos_config();
        assert_eq!(chaos.drop_interval, Duration::from_millis(500));
        assert_eq!(chaos.soft_drop_interval, Duration::from_millis(70));
    }

    #[test]
    fn test_hunter_floor_capped_at_start_delay() {
        let settings = Settings::parse(
            r#"
            [gameplay]
            hunter_initial_ms = 300
            hunter_min_ms = 900
            "#,
        );
        let hunter = settings.gameplay.snake_config(SnakeVariant::Hunter);
        assert_eq!(hunter.food_initial_delay, Duration::from_millis(300));
        assert_eq!(hunter.food_min_delay, Duration::from_millis(300));

        let mut game = SnakeGame::new(hunter);
        game.start();
        for _ in 0..20 {
            game.update(Duration::from_millis(300));
            assert!(game.food_delay() <= Duration::from_millis(300));
        }
    }

    #[test]
    fn test_remember_player() {
        let mut settings = Settings::default();
        assert!(settings.remember_player("ada"));
        assert!(!settings.remember_player("ada"));
        assert_eq!(settings.leaderboard.player_name, "ada");
    }
}
