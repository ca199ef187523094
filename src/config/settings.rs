//! Application settings.
//!
//! Defaults can be overridden by a JSON file in the XDG config directory
//! (`~/.config/portprobe/settings.json` on Linux) or a file named on the
//! command line. Command-line flags override both.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings file name inside the config directory.
const SETTINGS_FILE: &str = "settings.json";

/// Location of the default settings file, if a home directory is known.
pub fn default_settings_path() -> ConfigResult<PathBuf> {
    let project =
        ProjectDirs::from("com", "portprobe", "portprobe").ok_or(ConfigError::DirectoryNotFound)?;
    Ok(project.config_dir().join(SETTINGS_FILE))
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Default port specification.
    pub default_ports: String,
    /// Default worker pool size.
    pub default_workers: usize,
    /// Default per-probe timeout in milliseconds.
    pub default_timeout_ms: u64,
    /// Default output format.
    pub default_output_format: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_ports: "1-1024".to_string(),
            default_workers: 50,
            default_timeout_ms: 1000,
            default_output_format: "plain".to_string(),
        }
    }
}

impl AppSettings {
    /// Load settings from an explicit file, or from the default location.
    ///
    /// An explicit file must exist. A missing default file means defaults.
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from(path);
        }

        match default_settings_path() {
            Ok(path) if path.exists() => Self::load_from(&path),
            Ok(_) => Ok(Self::default()),
            Err(e) => {
                tracing::debug!(error = %e, "no config directory, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let settings: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }
}
