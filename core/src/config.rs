//! Runtime configuration for the dispatch core.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Timings and limits of the deferred-message scheduler.
///
/// Every field has a default, so a TOML file only needs to list what it
/// overrides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Delay before a coalesced shift-state refresh runs
    pub shift_state_delay_ms: u64,
    /// Delay before a coalesced suggestion refresh runs
    pub suggestion_update_delay_ms: u64,

    /// How long the orientation-change window waits for the duplicate
    /// start-input-view before force-closing
    pub pending_ims_callback_ms: u64,
    /// How long to wait for the main dictionary before giving up on it
    pub wait_for_dictionary_load_ms: u64,
    /// Idle time after the input view closes before keyboard memory is freed
    pub deallocate_memory_ms: u64,

    // Cursor sync retry
    /// Scheduled attempts to resync caches with the cursor
    pub cursor_reset_attempts: u32,
    pub cursor_reset_retry_delay_ms: u64,

    /// Turn host-contract violations (e.g. a missing editor descriptor) into
    /// panics
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shift_state_delay_ms: 100,
            suggestion_update_delay_ms: 100,
            pending_ims_callback_ms: 800,
            wait_for_dictionary_load_ms: 2_000,
            deallocate_memory_ms: 10_000,
            cursor_reset_attempts: 5,
            cursor_reset_retry_delay_ms: 20,
            debug: false,
        }
    }
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write configuration to a TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = self.to_toml_string()?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check values the scheduler cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cursor_reset_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "cursor_reset_attempts",
                reason: "at least one attempt is required".to_string(),
            });
        }
        if self.pending_ims_callback_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "pending_ims_callback_ms",
                reason: "the orientation window needs a non-zero timeout".to_string(),
            });
        }
        Ok(())
    }

    // ========== Durations ==========

    pub fn shift_state_delay(&self) -> Duration {
        Duration::from_millis(self.shift_state_delay_ms)
    }

    pub fn suggestion_update_delay(&self) -> Duration {
        Duration::from_millis(self.suggestion_update_delay_ms)
    }

    pub fn pending_ims_callback(&self) -> Duration {
        Duration::from_millis(self.pending_ims_callback_ms)
    }

    pub fn wait_for_dictionary_load(&self) -> Duration {
        Duration::from_millis(self.wait_for_dictionary_load_ms)
    }

    pub fn deallocate_memory(&self) -> Duration {
        Duration::from_millis(self.deallocate_memory_ms)
    }

    pub fn cursor_reset_retry_delay(&self) -> Duration {
        Duration::from_millis(self.cursor_reset_retry_delay_ms)
    }
}
