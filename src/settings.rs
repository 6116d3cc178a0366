//! Session configuration
//!
//! Loaded from a JSON file natively or LocalStorage on the web. Missing fields
//! fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{CROSSING_TOP_Y, PLAYER_SIZE, PLAYER_START_OFFSET, PLAYER_START_X};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Static configuration for one game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Viewport width in pixels
    pub viewport_width: f32,
    /// Viewport height in pixels
    pub viewport_height: f32,
    /// Optional RNG seed for reproducible sessions
    pub seed: Option<u64>,
    /// Player age reported to the predictor
    pub player_age: u32,
    /// Name attached to finished-session records; none disables submission
    pub player_name: Option<String>,
    /// Simulated round trip of a predictor call
    pub predictor_latency_ms: u64,
    /// Start with AI mode enabled
    pub ai_mode: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 800.0,
            seed: None,
            player_age: 3,
            player_name: None,
            predictor_latency_ms: 0,
            ai_mode: false,
        }
    }
}

impl GameConfig {
    /// Reject geometry the rules can't work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.viewport_width.is_finite() && self.viewport_height.is_finite()) {
            return Err(ConfigError::Invalid("viewport must be finite"));
        }
        if self.viewport_width <= 0.0 || self.viewport_height <= 0.0 {
            return Err(ConfigError::Invalid("viewport must be positive"));
        }
        if self.viewport_width < PLAYER_START_X + PLAYER_SIZE {
            return Err(ConfigError::Invalid("viewport too narrow for start position"));
        }
        // Start line must sit below the road and the finish line above it
        if self.viewport_height - PLAYER_START_OFFSET <= self.viewport_height / 2.0 + 200.0
            || self.viewport_height / 2.0 - 200.0 <= CROSSING_TOP_Y
        {
            return Err(ConfigError::Invalid("viewport too short for the road"));
        }
        Ok(())
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "safe_crossing_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Stored config rejected: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
