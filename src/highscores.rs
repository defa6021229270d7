//! Persisted high score
//!
//! A single integer stored under [`crate::consts::HIGH_SCORE_KEY`]: LocalStorage on the web,
//! a small JSON file on native, or memory for tests and demos.

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::GameError;

/// Get/set of the best score ever recorded
pub trait ScoreStore {
    /// Stored high score, 0 when nothing has been stored
    fn get(&self) -> u64;
    fn set(&mut self, score: u64) -> Result<(), GameError>;
}

/// In-memory store; clones share the same value
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    value: Rc<Cell<u64>>,
    writes: Rc<Cell<u32>>,
}

impl MemoryScoreStore {
    pub fn new(initial: u64) -> Self {
        Self {
            value: Rc::new(Cell::new(initial)),
            writes: Rc::new(Cell::new(0)),
        }
    }

    /// Number of successful `set` calls
    pub fn writes(&self) -> u32 {
        self.writes.get()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn get(&self) -> u64 {
        self.value.get()
    }

    fn set(&mut self, score: u64) -> Result<(), GameError> {
        self.value.set(score);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

/// On-disk layout: `{ "highScore": 120 }`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct ScoreFile {
    #[serde(rename = "highScore", default)]
    high_score: u64,
}

/// JSON file store for native builds
#[derive(Debug, Clone)]
pub struct JsonFileScoreStore {
    path: PathBuf,
}

impl JsonFileScoreStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<ScoreFile, GameError> {
        let json = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl ScoreStore for JsonFileScoreStore {
    fn get(&self) -> u64 {
        match self.read() {
            Ok(file) => {
                log::info!("Loaded high score {} from {}", file.high_score, self.path.display());
                file.high_score
            }
            Err(GameError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high score found, starting fresh");
                0
            }
            Err(err) => {
                log::warn!("Unreadable high score file {}: {}", self.path.display(), err);
                0
            }
        }
    }

    fn set(&mut self, score: u64) -> Result<(), GameError> {
        let json = serde_json::to_string(&ScoreFile { high_score: score })?;
        std::fs::write(&self.path, json)?;
        log::info!("High score {} saved", score);
        Ok(())
    }
}

/// Browser LocalStorage store
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageScoreStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageScoreStore {
    fn storage() -> Result<web_sys::Storage, GameError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| GameError::Storage("LocalStorage unavailable".into()))
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageScoreStore {
    fn get(&self) -> u64 {
        let stored = Self::storage()
            .ok()
            .and_then(|s| s.get_item(crate::consts::HIGH_SCORE_KEY).ok().flatten());
        match stored.map(|v| v.parse::<u64>()) {
            Some(Ok(score)) => {
                log::info!("Loaded high score {}", score);
                score
            }
            Some(Err(_)) => {
                log::warn!("Ignoring malformed stored high score");
                0
            }
            None => {
                log::info!("No high score found, starting fresh");
                0
            }
        }
    }

    fn set(&mut self, score: u64) -> Result<(), GameError> {
        Self::storage()?
            .set_item(crate::consts::HIGH_SCORE_KEY, &score.to_string())
            .map_err(|_| GameError::Storage("LocalStorage write rejected".into()))?;
        log::info!("High score {} saved", score);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::HIGH_SCORE_KEY;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("void_drift_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_memory_store_shared_between_clones() {
        let store = MemoryScoreStore::new(5);
        let mut writer = store.clone();
        writer.set(80).unwrap();
        assert_eq!(store.get(), 80);
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_file_store_defaults_to_zero() {
        let store = JsonFileScoreStore::new(temp_path("missing"));
        assert_eq!(store.get(), 0);
    }

    #[test]
    fn test_file_store_round_trip_layout() {
        let path = temp_path("layout");
        let mut store = JsonFileScoreStore::new(&path);
        store.set(120).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw, format!(r#"{{"{}":120}}"#, HIGH_SCORE_KEY));
        assert_eq!(store.get(), 120);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "{{nope").unwrap();
        assert_eq!(JsonFileScoreStore::new(&path).get(), 0);
        let _ = std::fs::remove_file(&path);
    }
}
