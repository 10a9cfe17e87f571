//! Game settings and preferences
//!
//! Persisted in LocalStorage on the web, or in a JSON file named by the
//! `INTO_STELLAR_SETTINGS` environment variable on native.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::Rules;

/// Driver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pause between a cleared round and the next one (ms)
    pub round_delay_ms: u32,
    /// Pause between a cleared level and the next one (ms)
    pub level_delay_ms: u32,
    /// Fixed run seed (random when unset)
    pub seed: Option<u64>,
    /// Pause when the window loses focus
    pub pause_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            round_delay_ms: ROUND_ADVANCE_DELAY_MS,
            level_delay_ms: LEVEL_ADVANCE_DELAY_MS,
            seed: None,
            pause_on_blur: true,
        }
    }
}

impl Settings {
    /// Delayed-transition rules for the engine
    pub fn rules(&self) -> Rules {
        Rules {
            round_delay_ms: self.round_delay_ms,
            level_delay_ms: self.level_delay_ms,
        }
    }

    /// Parse settings JSON, keeping defaults for missing fields
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "into_stellar_settings";

    /// Environment variable naming the native settings file
    pub const PATH_ENV: &'static str = "INTO_STELLAR_SETTINGS";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from the file named by `INTO_STELLAR_SETTINGS`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::PATH_ENV) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path);
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring unreadable settings in {}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read settings {}: {}", path, e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        let Ok(path) = std::env::var(Self::PATH_ENV) else {
            return;
        };
        match serde_json::to_string_pretty(self) {
            Ok(json) => match std::fs::write(&path, json) {
                Ok(()) => log::info!("Settings saved to {}", path),
                Err(e) => log::warn!("Cannot write settings {}: {}", path, e),
            },
            Err(e) => log::warn!("Cannot encode settings: {}", e),
        }
    }
}
