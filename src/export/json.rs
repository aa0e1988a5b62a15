//! JSON import/export module for flashcard groups.
//! Provides functionality to save and load a single Group to/from a JSON file.

use crate::models::Group;
use crate::store::json_store::to_pretty_json;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Could not access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid group file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Exports a group to a JSON file at the specified path.
/// Returns an error if file creation or writing fails.
pub fn export_group_to_path(group: &Group, path: &Path) -> Result<(), ExportError> {
    let bytes = to_pretty_json(group)?;
    fs::write(path, bytes).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!("Group '{}' exported to {}", group.name, path.display());
    Ok(())
}

/// Imports a group from a JSON file.
/// Returns an error if the file doesn't exist or contains invalid JSON.
pub fn import_group(path: &Path) -> Result<Group, ExportError> {
    let contents = fs::read_to_string(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let group: Group = serde_json::from_str(&contents)?;

    tracing::info!("Group '{}' imported from {}", group.name, path.display());
    Ok(group)
}
