//! Durable score mirror
//!
//! A single scalar keyed to the local session:
//! - written on every score update
//! - cleared on reset
//! - read once at session start to seed the score

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("score store io: {0}")]
    Io(#[from] std::io::Error),
    #[error("score store payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("score store unavailable")]
    Unavailable,
}

/// Where the running score is mirrored
pub trait ScoreStore {
    fn load(&self) -> Result<Option<u64>, StoreError>;
    fn save(&mut self, score: u64) -> Result<(), StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// In-process store (tests, headless runs)
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    score: Option<u64>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u64) -> Self {
        Self { score: Some(score) }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> Result<Option<u64>, StoreError> {
        Ok(self.score)
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        self.score = Some(score);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.score = None;
        Ok(())
    }
}

/// Versioned envelope written to disk
#[derive(Debug, Serialize, Deserialize)]
struct ScoreEnvelope {
    version: u32,
    score: u64,
}

const ENVELOPE_VERSION: u32 = 1;

/// JSON file store (native)
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&self) -> Result<Option<u64>, StoreError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let envelope: ScoreEnvelope = serde_json::from_str(&json)?;
        if envelope.version != ENVELOPE_VERSION {
            log::warn!(
                "Ignoring score file {} with version {}",
                self.path.display(),
                envelope.version
            );
            return Ok(None);
        }
        Ok(Some(envelope.score))
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        let json = serde_json::to_string(&ScoreEnvelope {
            version: ENVELOPE_VERSION,
            score,
        })?;
        // tmp → score file
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Browser LocalStorage store
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalScoreStore;

#[cfg(target_arch = "wasm32")]
impl LocalScoreStore {
    const STORAGE_KEY: &'static str = "safe_crossing_score";

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalScoreStore {
    fn load(&self) -> Result<Option<u64>, StoreError> {
        let storage = Self::storage()?;
        let raw = storage
            .get_item(Self::STORAGE_KEY)
            .map_err(|_| StoreError::Unavailable)?;
        Ok(raw.and_then(|s| s.trim().parse().ok()))
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(Self::STORAGE_KEY, &score.to_string())
            .map_err(|_| StoreError::Unavailable)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        Self::storage()?
            .remove_item(Self::STORAGE_KEY)
            .map_err(|_| StoreError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("safe_crossing_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryScoreStore::new();
        assert_eq!(store.load().unwrap(), None);
        store.save(300).unwrap();
        assert_eq!(store.load().unwrap(), Some(300));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_file_store_lifecycle() {
        let path = temp_path("lifecycle");
        let mut store = FileScoreStore::new(&path);
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);

        store.save(1234).unwrap();
        assert_eq!(FileScoreStore::new(&path).load().unwrap(), Some(1234));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let path = temp_path("garbage");
        std::fs::write(&path, "not json").unwrap();
        let store = FileScoreStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Json(_))));
        std::fs::remove_file(&path).unwrap();
    }
}
