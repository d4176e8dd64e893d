// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor settings persisted between sessions.
//!
//! Stored as RON next to the working directory unless a path is given on
//! the command line. A missing file yields the defaults.

use crate::theme::ThemePreset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Default settings file name
pub const SETTINGS_FILE_NAME: &str = "vista_editor.ron";

/// Settings errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Reading or writing the file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid settings RON
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serialization failed
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// Written by a newer editor
    #[error("Settings version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest version this build reads
        supported: u32,
    },
}

/// Result type for settings operations
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Timeline view preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    /// Pixels per second
    pub zoom: f32,
    /// Snap scrubbing to the grid
    pub snap_enabled: bool,
    /// Grid interval in seconds
    pub snap_interval: f32,
    /// Loop playback
    pub looping: bool,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            zoom: 100.0,
            snap_enabled: false,
            snap_interval: 0.1,
            looping: true,
        }
    }
}

/// Settings for the whole editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Format version
    pub version: u32,
    /// Initial window size in logical pixels
    pub window_size: [u32; 2],
    /// Theme preset
    pub theme: ThemePreset,
    /// Frame rate for new clips
    pub frame_rate: f32,
    /// Undo depth
    pub history_depth: usize,
    /// Timeline preferences
    pub timeline: TimelineSettings,
    /// Clip opened on startup and used by Save
    pub last_clip: Option<PathBuf>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            window_size: [1280, 720],
            theme: ThemePreset::default(),
            frame_rate: 30.0,
            history_depth: 100,
            timeline: TimelineSettings::default(),
            last_clip: None,
        }
    }
}

impl EditorSettings {
    /// Parse settings from RON
    pub fn from_ron(source: &str) -> Result<Self> {
        let settings: Self = ron::from_str(source)?;
        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(SettingsError::UnsupportedVersion {
                found: settings.version,
                supported: SETTINGS_FORMAT_VERSION,
            });
        }
        Ok(settings)
    }

    /// Serialize to RON
    pub fn to_ron(&self) -> Result<String> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    /// Load settings, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(SettingsError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Settings path from the first command line argument
    pub fn path_from_args(mut args: impl Iterator<Item = String>) -> PathBuf {
        args.nth(1)
            .map_or_else(|| PathBuf::from(SETTINGS_FILE_NAME), PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = EditorSettings::default();
        assert_eq!(settings.version, SETTINGS_FORMAT_VERSION);
        assert_eq!(settings.timeline.zoom, 100.0);
        assert!(settings.last_clip.is_none());
    }

    #[test]
    fn test_serialization() {
        let mut settings = EditorSettings::default();
        settings.theme = ThemePreset::Light;
        settings.timeline.snap_enabled = true;
        settings.last_clip = Some(PathBuf::from("clips/walk.ron"));

        let loaded = EditorSettings::from_ron(&settings.to_ron().unwrap()).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let loaded = EditorSettings::from_ron("(frame_rate: 24.0)").unwrap();
        assert_eq!(loaded.frame_rate, 24.0);
        assert_eq!(loaded.window_size, [1280, 720]);
    }

    #[test]
    fn test_rejects_newer_version() {
        let result = EditorSettings::from_ron("(version: 99)");
        assert!(matches!(
            result,
            Err(SettingsError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join(format!("vista_missing_{}.ron", uuid::Uuid::new_v4()));
        let settings = EditorSettings::load_or_default(&path).unwrap();
        assert_eq!(settings, EditorSettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("vista_settings_{}.ron", uuid::Uuid::new_v4()));
        let mut settings = EditorSettings::default();
        settings.history_depth = 7;
        settings.save(&path).unwrap();

        let loaded = EditorSettings::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.history_depth, 7);
    }

    #[test]
    fn test_path_from_args() {
        let args = ["vista_editor".to_string(), "custom.ron".to_string()];
        assert_eq!(EditorSettings::path_from_args(args.into_iter()), PathBuf::from("custom.ron"));
        let args = ["vista_editor".to_string()];
        assert_eq!(EditorSettings::path_from_args(args.into_iter()), PathBuf::from(SETTINGS_FILE_NAME));
    }
}
