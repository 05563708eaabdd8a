//! Search settings management
//!
//! Settings are stored as pretty-printed JSON. A missing file means
//! defaults; a file that fails to parse is logged and replaced by defaults.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Behaviour switches for a search session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchSettings {
    /// Mark occurrences of the replacement text after a replace
    pub highlight_replacements: bool,
    /// Ask the host to scroll the current match into the middle of the view
    pub center_on_navigate: bool,
    /// Maximum number of undo entries
    pub undo_limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            highlight_replacements: true,
            center_on_navigate: true,
            undo_limit: 100,
        }
    }
}

/// Loads and saves `SearchSettings`
pub struct SettingsManager {
    /// Path to the settings file
    settings_path: PathBuf,
    /// Current settings (cached)
    current: SearchSettings,
}

impl SettingsManager {
    /// Create a settings manager storing `search_settings.json` in `dir`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::with_path(dir.as_ref().join("search_settings.json"))
    }

    /// Create a settings manager for an explicit file path
    pub fn with_path(settings_path: impl Into<PathBuf>) -> Self {
        Self {
            settings_path: settings_path.into(),
            current: SearchSettings::default(),
        }
    }

    /// Get the path to the settings file
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_sync(&mut self) -> Result<&SearchSettings> {
        if self.settings_path.exists() {
            let content = std::fs::read_to_string(&self.settings_path)?;
            match serde_json::from_str::<SearchSettings>(&content) {
                Ok(settings) => {
                    self.current = settings;
                }
                Err(e) => {
                    tracing::warn!("Failed to parse settings file, using defaults: {}", e);
                    self.current = SearchSettings::default();
                }
            }
        } else {
            self.current = SearchSettings::default();
        }
        Ok(&self.current)
    }

    /// Save current settings to disk
    pub fn save_sync(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.current)?;
        std::fs::write(&self.settings_path, content)?;
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &SearchSettings {
        &self.current
    }

    /// Update settings and save to disk
    pub fn update_sync(&mut self, settings: SearchSettings) -> Result<()> {
        self.current = settings;
        self.save_sync()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = SearchSettings::default();
        assert!(settings.highlight_replacements);
        assert!(settings.center_on_navigate);
        assert_eq!(settings.undo_limit, 100);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let parsed: SearchSettings = serde_json::from_str(r#"{"undo_limit": 5}"#).unwrap();
        assert_eq!(parsed.undo_limit, 5);
        assert!(parsed.highlight_replacements);
    }

    #[test]
    fn test_settings_manager_load_save_sync() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path());

        // Load should return defaults when no file exists
        assert_eq!(manager.load_sync().unwrap(), &SearchSettings::default());

        let new_settings = SearchSettings {
            highlight_replacements: false,
            center_on_navigate: false,
            undo_limit: 7,
        };
        manager.update_sync(new_settings.clone()).unwrap();

        let mut manager2 = SettingsManager::new(temp_dir.path());
        assert_eq!(manager2.load_sync().unwrap(), &new_settings);
    }

    #[test]
    fn test_unparsable_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let mut manager = SettingsManager::with_path(&path);
        assert_eq!(manager.load_sync().unwrap(), &SearchSettings::default());
    }
}
