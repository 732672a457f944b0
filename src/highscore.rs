//! Single-value high score persistence.
//!
//! The record is a JSON object `{"high_score": N}` written wholesale on every
//! update. A missing file means no high score yet; a file that cannot be read
//! or parsed is treated the same way so a bad save never stops the game.

use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    #[serde(default)]
    pub high_score: u32,
}

#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the persisted high score, falling back to 0
    pub fn load(&self) -> u32 {
        match self.try_load() {
            Ok(Some(record)) => {
                log::info!(
                    "Loaded high score {} from {}",
                    record.high_score,
                    self.path.display()
                );
                record.high_score
            }
            Ok(None) => {
                log::info!("No high score file at {}", self.path.display());
                0
            }
            Err(err) => {
                log::warn!("Ignoring unreadable high score file: {:#}", err);
                0
            }
        }
    }

    fn try_load(&self) -> Result<Option<HighScoreRecord>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err)
                    .wrap_err_with(|| format!("failed to read {}", self.path.display()));
            }
        };
        let record = serde_json::from_str(&contents)
            .wrap_err_with(|| format!("failed to parse {}", self.path.display()))?;
        Ok(Some(record))
    }

    /// Overwrites the stored record with `high_score`
    pub fn save(&self, high_score: u32) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
        }

        let contents = serde_json::to_string(&HighScoreRecord { high_score })?;
        fs::write(&self.path, contents)
            .wrap_err_with(|| format!("failed to write {}", self.path.display()))?;

        log::info!("Saved high score {} to {}", high_score, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_loads_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = HighScoreStore::new(dir.path().join("highscore.json"));
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = HighScoreStore::new(dir.path().join("highscore.json"));
        store.save(4200).unwrap();
        assert_eq!(store.load(), 4200);

        // Overwritten wholesale
        store.save(10).unwrap();
        assert_eq!(store.load(), 10);
    }

    #[test]
    fn test_saved_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscore.json");
        HighScoreStore::new(&path).save(300).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["high_score"], 300);
    }

    #[test]
    fn test_corrupt_file_loads_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscore.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(HighScoreStore::new(&path).load(), 0);

        fs::write(&path, r#"{"high_score": -5}"#).unwrap();
        assert_eq!(HighScoreStore::new(&path).load(), 0);
    }

    #[test]
    fn test_missing_key_loads_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscore.json");
        fs::write(&path, "{}").unwrap();
        assert_eq!(HighScoreStore::new(&path).load(), 0);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = HighScoreStore::new(dir.path().join("saves").join("highscore.json"));
        store.save(7).unwrap();
        assert_eq!(store.load(), 7);
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_persisted_value_round_trips(score in any::<u32>()) {
                let dir = tempfile::tempdir().unwrap();
                let store = HighScoreStore::new(dir.path().join("highscore.json"));
                store.save(score).unwrap();
                prop_assert_eq!(store.load(), score);
            }
        }
    }
}
