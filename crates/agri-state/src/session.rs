//! Session files.
//!
//! A session file is a JSON snapshot of [`StateData`] wrapped with a schema
//! version and save time. Saves go through a temp file that is synced and then
//! renamed over the target.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{SessionError, SessionResult};
use crate::store::{AppState, StateData};

/// Current session schema version.
///
/// The loader rejects files with a newer version.
pub const SESSION_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    schema_version: u32,
    saved_at: DateTime<Utc>,
    state: StateData,
}

/// Save `state` to `path`.
pub fn save_session(state: &AppState, path: &Path) -> SessionResult<()> {
    let file = SessionFile {
        schema_version: SESSION_SCHEMA_VERSION,
        saved_at: Utc::now(),
        state: state.data().clone(),
    };
    let bytes = serde_json::to_vec_pretty(&file).map_err(SessionError::Serialization)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SessionError::Io {
            operation: "create directory for",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("json.tmp");
    let mut temp = File::create(&temp_path).map_err(|e| SessionError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;
    temp.write_all(&bytes).map_err(|e| SessionError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;
    temp.sync_all().map_err(|e| SessionError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| SessionError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })?;

    info!("Saved session to {}", path.display());
    Ok(())
}

/// Load a session from `path`.
pub fn load_session(path: &Path) -> SessionResult<AppState> {
    let bytes = fs::read(path).map_err(|e| SessionError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;
    let file: SessionFile =
        serde_json::from_slice(&bytes).map_err(|e| SessionError::InvalidFormat {
            path: path.to_path_buf(),
            source: e,
        })?;

    if file.schema_version > SESSION_SCHEMA_VERSION {
        return Err(SessionError::UnsupportedVersion {
            found: file.schema_version,
            max_supported: SESSION_SCHEMA_VERSION,
            path: path.to_path_buf(),
        });
    }

    info!(
        "Loaded session from {} (saved {})",
        path.display(),
        file.saved_at.format("%Y-%m-%d %H:%M:%S")
    );
    Ok(AppState::from_data(file.state))
}

/// Load `path` if it exists, otherwise start a fresh session.
pub fn load_or_new(path: &Path) -> SessionResult<AppState> {
    if path.exists() {
        load_session(path)
    } else {
        info!("No session at {}, starting fresh", path.display());
        Ok(AppState::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn newer_schema_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(
            &path,
            r#"{"schema_version": 99, "saved_at": "2024-05-01T00:00:00Z", "state": {}}"#,
        )
        .unwrap();

        let err = load_session(&path).unwrap_err();
        assert!(matches!(
            err,
            SessionError::UnsupportedVersion { found: 99, .. }
        ));
    }

    #[test]
    fn garbage_is_invalid_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            load_session(&path).unwrap_err(),
            SessionError::InvalidFormat { .. }
        ));
    }

    #[test]
    fn missing_file_starts_fresh() {
        let dir = tempdir().unwrap();
        let state = load_or_new(&dir.path().join("absent.json")).unwrap();
        assert!(state.seizures().is_empty());
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        save_session(&AppState::new(), &path).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }
}
