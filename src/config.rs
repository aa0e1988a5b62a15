//! Application configuration management

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::store::DEFAULT_FILE_NAME;

/// Overrides `data_file` when set
pub const DATA_FILE_ENV: &str = "FLASHCARDS_DATA_FILE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Location of the flashcard document; the platform data dir when unset
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    /// Initial window size in points
    #[serde(default = "default_window_size")]
    pub window_size: [f32; 2],
}

fn default_window_size() -> [f32; 2] {
    [500.0, 700.0]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            window_size: default_window_size(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "flashcards", "Flashcards")
}

impl AppConfig {
    fn config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from the platform config dir, then apply the environment override
    pub fn load() -> Result<Self> {
        let config = match Self::config_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };

        Ok(config.with_data_file_override(std::env::var_os(DATA_FILE_ENV)))
    }

    /// Replaces `data_file` with the value of the override variable, if set
    pub fn with_data_file_override(mut self, value: Option<OsString>) -> Self {
        if let Some(data_file) = value.filter(|v| !v.is_empty()) {
            self.data_file = Some(PathBuf::from(data_file));
        }
        self
    }

    /// Load configuration from a file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Resolved path of the flashcard document
    pub fn data_file(&self) -> PathBuf {
        self.data_file.clone().unwrap_or_else(|| {
            project_dirs()
                .map(|dirs| dirs.data_dir().join(DEFAULT_FILE_NAME))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME))
        })
    }
}
