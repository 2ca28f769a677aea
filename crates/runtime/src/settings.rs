//! Settings collaborator
//!
//! The engine only ever needs two things from persisted settings: the high
//! score (read at start, written on game over) and the ghost-piece toggle.
//! How they are stored is up to the [`SettingsStore`] implementation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Errors from a settings store
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("settings store lock poisoned")]
    Poisoned,
}

/// Persisted player settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub high_score: u32,
    pub show_ghost_piece: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            high_score: 0,
            show_ghost_piece: true,
        }
    }
}

/// Narrow persistence interface used by the runtime
///
/// Calls may block; the runtime issues saves from a blocking task.
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Result<Settings, SettingsError>;

    fn save_high_score(&self, score: u32) -> Result<(), SettingsError>;
}

/// In-memory store that records every save
#[derive(Debug, Default)]
pub struct MemorySettings {
    settings: Mutex<Settings>,
    saves: Mutex<Vec<u32>>,
}

impl MemorySettings {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Mutex::new(settings),
            saves: Mutex::new(Vec::new()),
        }
    }

    /// Scores passed to `save_high_score`, oldest first
    pub fn saves(&self) -> Vec<u32> {
        self.saves.lock().map(|saves| saves.clone()).unwrap_or_default()
    }
}

impl SettingsStore for MemorySettings {
    fn load(&self) -> Result<Settings, SettingsError> {
        self.settings
            .lock()
            .map(|settings| *settings)
            .map_err(|_| SettingsError::Poisoned)
    }

    fn save_high_score(&self, score: u32) -> Result<(), SettingsError> {
        self.settings
            .lock()
            .map_err(|_| SettingsError::Poisoned)?
            .high_score = score;
        self.saves
            .lock()
            .map_err(|_| SettingsError::Poisoned)?
            .push(score);
        Ok(())
    }
}

/// Settings kept in a pretty-printed JSON file
///
/// A missing file reads as the defaults.
#[derive(Debug, Clone)]
pub struct JsonFileSettings {
    path: PathBuf,
}

impl JsonFileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl SettingsStore for JsonFileSettings {
    fn load(&self) -> Result<Settings, SettingsError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Settings::default()),
            Err(err) => Err(err.into()),
        }
    }

    fn save_high_score(&self, score: u32) -> Result<(), SettingsError> {
        let mut settings = self.load()?;
        settings.high_score = score;
        self.write(&settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("tetris-engine-settings-{}-{}", std::process::id(), name))
            .join("settings.json")
    }

    #[test]
    fn test_memory_store_records_saves() {
        let store = MemorySettings::new(Settings {
            high_score: 10,
            show_ghost_piece: false,
        });
        store.save_high_score(25).unwrap();
        assert_eq!(store.saves(), vec![25]);
        let loaded = store.load().unwrap();
        assert_eq!(loaded.high_score, 25);
        assert!(!loaded.show_ghost_piece);
    }

    #[test]
    fn test_json_store_missing_file_is_default() {
        let store = JsonFileSettings::new(scratch_path("missing"));
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_json_store_keeps_other_fields() {
        let path = scratch_path("roundtrip");
        let store = JsonFileSettings::new(&path);
        store
            .write(&Settings {
                high_score: 1,
                show_ghost_piece: false,
            })
            .unwrap();

        store.save_high_score(900).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.high_score, 900);
        assert!(!loaded.show_ghost_piece);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_json_partial_file_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"highScore": 7}"#).unwrap();
        assert_eq!(settings.high_score, 7);
        assert!(settings.show_ghost_piece);
    }

    #[test]
    fn test_json_store_rejects_garbage() {
        let path = scratch_path("garbage");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();
        let store = JsonFileSettings::new(&path);
        assert!(matches!(store.load(), Err(SettingsError::Json(_))));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
