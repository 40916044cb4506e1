//! User settings.
//!
//! Settings live in `settings.toml` under the platform config directory:
//! - Linux: ~/.config/agri-shield/
//! - macOS: ~/Library/Application Support/in.agri-shield.Agri-Shield/
//! - Windows: %APPDATA%/agri-shield/Agri Shield/config/
//!
//! A missing or unreadable file falls back to defaults with a warning.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use agri_ai::GeminiConfig;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

const APP_QUALIFIER: &str = "in";
const APP_ORG: &str = "agri-shield";
const APP_NAME: &str = "Agri Shield";
const CONFIG_FILENAME: &str = "settings.toml";
const SESSION_FILENAME: &str = "session.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub session: SessionSettings,
    pub ai: GeminiConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Session file; the platform data directory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Geolocation stamped on field scans.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo_location: Option<String>,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
}

/// Default settings file location.
pub fn settings_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Default session file location.
pub fn default_session_path() -> PathBuf {
    project_dirs().map_or_else(
        || PathBuf::from(SESSION_FILENAME),
        |dirs| dirs.data_dir().join(SESSION_FILENAME),
    )
}

impl Settings {
    /// Session file to use, with `--session` taking precedence.
    pub fn session_path(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.session.path.clone())
            .unwrap_or_else(default_session_path)
    }
}

/// Load settings from `explicit`, or the default location.
pub fn load_settings(explicit: Option<&Path>) -> Settings {
    let Some(path) = explicit.map(Path::to_path_buf).or_else(settings_path) else {
        tracing::warn!("Could not determine settings path, using defaults");
        return Settings::default();
    };

    match fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                tracing::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                tracing::warn!("Failed to parse {}: {e}, using defaults", path.display());
                Settings::default()
            }
        },
        Err(e) if e.kind() == ErrorKind::NotFound => {
            if explicit.is_some() {
                tracing::warn!("No settings file at {}, using defaults", path.display());
            } else {
                tracing::debug!("No settings file at {}, using defaults", path.display());
            }
            Settings::default()
        }
        Err(e) => {
            tracing::warn!("Failed to read {}: {e}, using defaults", path.display());
            Settings::default()
        }
    }
}

/// Write `settings` as TOML to `path`.
pub fn save_settings(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(settings).context("serialize settings")?;
    fs::write(path, content).with_context(|| format!("write {}", path.display()))?;
    tracing::info!("Saved settings to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_configured_session_path() {
        let settings = Settings {
            session: SessionSettings {
                path: Some(PathBuf::from("/data/agri.json")),
                geo_location: None,
            },
            ..Settings::default()
        };
        assert_eq!(
            settings.session_path(Some(Path::new("override.json"))),
            PathBuf::from("override.json")
        );
        assert_eq!(settings.session_path(None), PathBuf::from("/data/agri.json"));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let settings: Settings = toml::from_str("[ai]\nmodel = \"gemini-1.5-pro\"\n").unwrap();
        assert_eq!(settings.ai.model, "gemini-1.5-pro");
        assert_eq!(settings.ai.timeout_secs, 60);
        assert_eq!(settings.session, SessionSettings::default());
    }
}
