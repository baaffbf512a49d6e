//! Application settings management
//!
//! Stores configuration in a plain JSON file under the platform config
//! directory. Command-line flags and environment variables override it.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{CoreError, Result};
use openapi_engine::DEFAULT_MAX_DEPTH;

/// Settings file name inside the config directory
pub const SETTINGS_FILE: &str = "settings.json";

/// Keys accepted by [`Settings::set_value`]
pub const SETTING_KEYS: &[&str] = &["specs-dir", "max-depth", "log-level"];

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Settings file version
    pub version: u32,
    /// Directory holding the OpenAPI spec files
    pub specs_dir: Option<PathBuf>,
    /// Nesting limit for synthesized examples
    pub max_depth: usize,
    /// Default log filter directive, e.g. "info" or "openapi_engine=debug"
    pub log_level: Option<String>,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self {
            version: 1,
            specs_dir: None,
            max_depth: DEFAULT_MAX_DEPTH,
            log_level: None,
        }
    }

    /// Set one setting from its command-line spelling
    ///
    /// Keys are `specs-dir`, `max-depth` and `log-level`.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "specs-dir" => self.specs_dir = Some(PathBuf::from(value)),
            "max-depth" => {
                self.max_depth = value.parse().map_err(|_| CoreError::InvalidSetting {
                    key: key.to_string(),
                    reason: format!("expected a non-negative integer, got {:?}", value),
                })?;
            }
            "log-level" => self.log_level = Some(value.to_string()),
            _ => {
                return Err(CoreError::InvalidSetting {
                    key: key.to_string(),
                    reason: format!("unknown key, expected one of {}", SETTING_KEYS.join(", ")),
                })
            }
        }
        Ok(())
    }

    /// Restore one setting to its default
    pub fn unset_value(&mut self, key: &str) -> Result<()> {
        let defaults = Settings::new();
        match key {
            "specs-dir" => self.specs_dir = defaults.specs_dir,
            "max-depth" => self.max_depth = defaults.max_depth,
            "log-level" => self.log_level = defaults.log_level,
            _ => {
                return Err(CoreError::InvalidSetting {
                    key: key.to_string(),
                    reason: format!("unknown key, expected one of {}", SETTING_KEYS.join(", ")),
                })
            }
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings manager
pub struct SettingsManager {
    settings_file: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Load settings from `settings_file`
    ///
    /// A missing file yields defaults; an unreadable or malformed one is an
    /// error.
    pub fn load(settings_file: impl Into<PathBuf>) -> Result<Self> {
        let settings_file = settings_file.into();
        let settings = Self::load_from_file(&settings_file)?;

        Ok(Self {
            settings_file,
            settings,
        })
    }

    /// Default settings backed by `settings_file`, without reading it
    pub fn with_defaults(settings_file: impl Into<PathBuf>) -> Self {
        Self {
            settings_file: settings_file.into(),
            settings: Settings::new(),
        }
    }

    /// Settings file in the platform config directory, e.g.
    /// `~/.config/xcspec/settings.json` on Linux
    ///
    /// Returns `None` when no home directory can be determined.
    pub fn default_settings_file() -> Option<PathBuf> {
        ProjectDirs::from("io", "xcspec", "xcspec")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    /// Load settings from file
    fn load_from_file(path: &Path) -> Result<Settings> {
        if !path.exists() {
            debug!("No settings file found, using defaults");
            return Ok(Settings::new());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents)?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to file
    pub fn save(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.settings)?;

        if let Some(parent) = self.settings_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Write atomically using temp file
        let temp_path = self.settings_file.with_extension("tmp");
        std::fs::write(&temp_path, &contents)?;
        std::fs::rename(&temp_path, &self.settings_file)?;

        debug!("Saved settings to {:?}", self.settings_file);
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Update settings and save
    pub fn update(&mut self, settings: Settings) -> Result<()> {
        self.settings = settings;
        self.save()
    }

    /// Path of the backing settings file
    pub fn settings_file(&self) -> &Path {
        &self.settings_file
    }

    /// Reset settings to defaults and delete settings file
    pub fn reset(&mut self) -> Result<()> {
        self.settings = Settings::new();

        if self.settings_file.exists() {
            std::fs::remove_file(&self.settings_file)?;
        }

        Ok(())
    }
}
