//! Game configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. Built-in defaults
//! 2. `config/default.toml`
//! 3. `config/user.toml` (user overrides)
//! 4. Environment variables (`INVADER_SECTION__KEY`)

use color_eyre::Result;
use color_eyre::eyre::eyre;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub gameplay: GameplayConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GameConfig {
    /// Load configuration from the `config` directory
    pub fn load() -> Result<Self> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory. Missing files are skipped.
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref();

        Figment::from(Serialized::defaults(GameConfig::default()))
            .merge(Toml::file(config_dir.join("default.toml")))
            .merge(Toml::file(config_dir.join("user.toml")))
            // INVADER_GAMEPLAY__TICK_RATE=30 -> gameplay.tick_rate = 30
            .merge(Env::prefixed("INVADER_").split("__"))
            .extract()
            .map_err(|err| eyre!("invalid configuration in {}: {}", config_dir.display(), err))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameplayConfig {
    /// Target ticks per second
    pub tick_rate: u32,
    /// Minimum time between two enemy spawns
    pub spawn_interval_ms: u64,
    /// Spawn odds are 1 in `spawn_rate` per tick once the interval has passed
    pub base_spawn_rate: u32,
    pub min_spawn_rate: u32,
    /// How long the "Level N" banner blocks the game
    pub level_banner_ms: u64,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            spawn_interval_ms: 1000,
            base_spawn_rate: 30,
            min_spawn_rate: 10,
            level_banner_ms: 2000,
        }
    }
}

impl GameplayConfig {
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_rate.max(1)))
    }

    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    pub fn level_banner(&self) -> Duration {
        Duration::from_millis(self.level_banner_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub high_score_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            high_score_path: PathBuf::from("highscore.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    pub enabled: bool,
    /// Playback volume, 0.0 to 1.0
    pub volume: f32,
    pub shoot: PathBuf,
    pub explosion: PathBuf,
    pub game_over: PathBuf,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 0.3,
            shoot: PathBuf::from("assets/sounds/shoot.wav"),
            explosion: PathBuf::from("assets/sounds/explosion.wav"),
            game_over: PathBuf::from("assets/sounds/game_over.wav"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter; `RUST_LOG` takes precedence
    pub level: String,
    /// Log file (the terminal belongs to the game)
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: PathBuf::from("cosmic-invader.log"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.gameplay.tick_rate, 60);
        assert_eq!(config.gameplay.spawn_interval(), Duration::from_millis(1000));
        assert_eq!(config.gameplay.base_spawn_rate, 30);
        assert_eq!(config.gameplay.min_spawn_rate, 10);
        assert_eq!(
            config.storage.high_score_path,
            PathBuf::from("highscore.json")
        );
    }

    #[test]
    fn test_tick_duration() {
        let gameplay = GameplayConfig::default();
        let tick = gameplay.tick_duration();
        assert!(tick > Duration::from_millis(16) && tick < Duration::from_millis(17));

        let broken = GameplayConfig {
            tick_rate: 0,
            ..GameplayConfig::default()
        };
        assert_eq!(broken.tick_duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_load_from_empty_dir_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig::load_from(dir.path()).unwrap();
        assert_eq!(config.gameplay.level_banner_ms, 2000);
        assert!(config.audio.enabled);
    }

    #[test]
    fn test_user_file_overrides_default_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[gameplay]\ntick_rate = 30\nbase_spawn_rate = 40\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("user.toml"),
            "[gameplay]\ntick_rate = 120\n\n[audio]\nenabled = false\n",
        )
        .unwrap();

        let config = GameConfig::load_from(dir.path()).unwrap();
        assert_eq!(config.gameplay.tick_rate, 120);
        assert_eq!(config.gameplay.base_spawn_rate, 40);
        // Untouched keys keep their defaults
        assert_eq!(config.gameplay.min_spawn_rate, 10);
        assert!(!config.audio.enabled);
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[gameplay]\ntick_rate = \"fast\"\n",
        )
        .unwrap();
        assert!(GameConfig::load_from(dir.path()).is_err());
    }
}
