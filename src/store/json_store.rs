//! Whole-document JSON storage for flashcard groups
//!
//! Every mutation loads the full document, changes it in memory and writes
//! the full document back. A missing file is read as an empty document.

use crate::models::{Flashcard, Group};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_FILE_NAME: &str = "user_data.json";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed flashcard document {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not encode document: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Group '{0}' already exists")]
    DuplicateGroup(String),

    #[error("Group name cannot be empty")]
    EmptyGroupName,
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Serializes with four-space indentation, the layout existing documents use.
pub(crate) fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Name of a raw group entry; entries without one match only the empty name
fn entry_name(entry: &Value) -> &str {
    entry
        .get("name_group")
        .and_then(Value::as_str)
        .unwrap_or("")
}

/// Storage for the list of groups kept in a single JSON file
#[derive(Clone, Debug)]
pub struct FlashcardStore {
    path: PathBuf,
}

impl FlashcardStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_content(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No document at {}, starting empty", self.path.display());
                Ok(None)
            }
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn malformed(&self, source: serde_json::Error) -> StoreError {
        StoreError::Malformed {
            path: self.path.clone(),
            source,
        }
    }

    /// Reads every group in the document
    ///
    /// Returns an empty list when the file does not exist yet.
    pub fn list_groups(&self) -> Result<Vec<Group>> {
        let Some(content) = self.read_content()? else {
            return Ok(Vec::new());
        };

        serde_json::from_str(&content).map_err(|source| self.malformed(source))
    }

    /// Loads the document as raw JSON so that groups a mutation does not touch
    /// are written back with their keys and key order as found.
    /// Every entry must still read as a `Group`.
    fn load_document(&self) -> Result<Vec<Value>> {
        let Some(content) = self.read_content()? else {
            return Ok(Vec::new());
        };

        let document: Vec<Value> =
            serde_json::from_str(&content).map_err(|source| self.malformed(source))?;
        for entry in &document {
            Group::deserialize(entry).map_err(|source| self.malformed(source))?;
        }
        Ok(document)
    }

    /// Adds a new group at the end of the document
    ///
    /// Blank names and names already present are rejected.
    pub fn append_group(&self, name: &str, flashcards: Vec<Flashcard>) -> Result<()> {
        if name.trim().is_empty() {
            return Err(StoreError::EmptyGroupName);
        }

        let mut document = self.load_document()?;
        if document.iter().any(|g| entry_name(g) == name) {
            return Err(StoreError::DuplicateGroup(name.to_string()));
        }

        let count = flashcards.len();
        document.push(serde_json::to_value(Group::new(name, flashcards))?);
        self.write_document(&document)?;

        tracing::info!("Group '{}' saved with {} flashcards", name, count);
        Ok(())
    }

    /// Replaces the flashcards of the first group named `group_name`
    ///
    /// The document is rewritten even if nothing matched; the return value
    /// tells whether a group was updated.
    pub fn replace_flashcards(&self, group_name: &str, flashcards: Vec<Flashcard>) -> Result<bool> {
        let mut document = self.load_document()?;
        let cards = serde_json::to_value(&flashcards)?;

        let target = document
            .iter_mut()
            .find(|g| entry_name(g) == group_name)
            .and_then(Value::as_object_mut);
        let matched = match target {
            Some(group) => {
                group.insert("flashcards".to_string(), cards);
                true
            }
            None => false,
        };

        self.write_document(&document)?;

        if matched {
            tracing::info!("Flashcards of group '{}' updated", group_name);
        } else {
            tracing::warn!("No group named '{}' to update", group_name);
        }
        Ok(matched)
    }

    /// Removes every group named `group_name`, returning how many were removed
    pub fn delete_group(&self, group_name: &str) -> Result<usize> {
        let mut document = self.load_document()?;
        let before = document.len();
        document.retain(|g| entry_name(g) != group_name);
        let removed = before - document.len();

        self.write_document(&document)?;

        tracing::info!("Deleted {} group(s) named '{}'", removed, group_name);
        Ok(removed)
    }

    fn write_document(&self, document: &[Value]) -> Result<()> {
        let bytes = to_pretty_json(document)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        fs::write(&self.path, bytes).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, FlashcardStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FlashcardStore::new(dir.path().join(DEFAULT_FILE_NAME));
        (dir, store)
    }

    fn capitals() -> Vec<Flashcard> {
        vec![Flashcard::new("France?", "Paris")]
    }

    fn polish() -> Vec<Flashcard> {
        vec![
            Flashcard::new("cześć", "hello"),
            Flashcard::new("proszę", "please"),
        ]
    }

    #[test]
    fn test_missing_file_lists_empty() {
        let (_dir, store) = create_test_store();

        assert!(store.list_groups().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_append_then_list_returns_group_last() {
        let (_dir, store) = create_test_store();
        store.append_group("Capitals", capitals()).unwrap();
        store.append_group("Polish", polish()).unwrap();

        let groups = store.list_groups().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups.last().unwrap(), &Group::new("Polish", polish()));
    }

    #[test]
    fn test_append_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FlashcardStore::new(dir.path().join("nested/data").join(DEFAULT_FILE_NAME));

        store.append_group("Capitals", capitals()).unwrap();
        assert_eq!(store.list_groups().unwrap().len(), 1);
    }

    #[test]
    fn test_append_rejects_duplicate_and_blank_names() {
        let (_dir, store) = create_test_store();
        store.append_group("Capitals", capitals()).unwrap();

        assert!(matches!(
            store.append_group("Capitals", Vec::new()),
            Err(StoreError::DuplicateGroup(name)) if name == "Capitals"
        ));
        assert!(matches!(
            store.append_group("   ", Vec::new()),
            Err(StoreError::EmptyGroupName)
        ));
        assert_eq!(store.list_groups().unwrap().len(), 1);
    }

    #[test]
    fn test_replace_flashcards_preserves_order() {
        let (_dir, store) = create_test_store();
        fs::write(
            store.path(),
            r#"[{"name_group":"Capitals","flashcards":[{"question":"France?","answer":"Paris"}]}]"#,
        )
        .unwrap();

        let new_cards = vec![
            Flashcard::new("France?", "Paris"),
            Flashcard::new("Japan?", "Tokyo"),
        ];
        assert!(store.replace_flashcards("Capitals", new_cards.clone()).unwrap());

        let groups = store.list_groups().unwrap();
        assert_eq!(groups, vec![Group::new("Capitals", new_cards)]);
    }

    #[test]
    fn test_replace_leaves_other_groups_untouched() {
        let (_dir, store) = create_test_store();
        store.append_group("Capitals", capitals()).unwrap();
        store.append_group("Polish", polish()).unwrap();
        store.append_group("Empty", Vec::new()).unwrap();

        store
            .replace_flashcards("Polish", vec![Flashcard::new("tak", "yes")])
            .unwrap();

        let groups = store.list_groups().unwrap();
        assert_eq!(groups[0], Group::new("Capitals", capitals()));
        assert_eq!(groups[1].flashcards, vec![Flashcard::new("tak", "yes")]);
        assert_eq!(groups[2], Group::new("Empty", Vec::new()));
    }

    #[test]
    fn test_replace_updates_first_match_only() {
        let (_dir, store) = create_test_store();
        let doc = vec![Group::new("Dup", capitals()), Group::new("Dup", polish())];
        fs::write(store.path(), to_pretty_json(&doc).unwrap()).unwrap();

        store.replace_flashcards("Dup", Vec::new()).unwrap();

        let groups = store.list_groups().unwrap();
        assert!(groups[0].flashcards.is_empty());
        assert_eq!(groups[1].flashcards, polish());
    }

    #[test]
    fn test_replace_without_match_is_noop() {
        let (_dir, store) = create_test_store();
        store.append_group("Capitals", capitals()).unwrap();
        let before = fs::read(store.path()).unwrap();

        assert!(!store.replace_flashcards("Missing", polish()).unwrap());
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn test_replace_keeps_untouched_groups_as_written() {
        let (_dir, store) = create_test_store();
        let untouched = r#"    {
        "flashcards": [],
        "name_group": "B",
        "color": "red"
    }"#;
        let doc = format!(
            "[\n    {{\n        \"name_group\": \"A\",\n        \"flashcards\": []\n    }},\n{}\n]",
            untouched
        );
        fs::write(store.path(), &doc).unwrap();

        assert!(store.replace_flashcards("A", capitals()).unwrap());

        let written = fs::read_to_string(store.path()).unwrap();
        assert!(written.contains(untouched), "{}", written);
        assert_eq!(store.list_groups().unwrap()[0].flashcards, capitals());
    }

    #[test]
    fn test_replace_keeps_unknown_keys_of_target_group() {
        let (_dir, store) = create_test_store();
        fs::write(
            store.path(),
            r#"[{"name_group":"A","starred":true,"flashcards":[]}]"#,
        )
        .unwrap();

        store.replace_flashcards("A", polish()).unwrap();

        let groups = store.list_groups().unwrap();
        assert_eq!(groups[0].extra["starred"], true);
        assert_eq!(groups[0].flashcards, polish());
    }

    #[test]
    fn test_group_without_name_does_not_break_document() {
        let (_dir, store) = create_test_store();
        fs::write(
            store.path(),
            r#"[{"flashcards":[]},{"name_group":"A","flashcards":[]}]"#,
        )
        .unwrap();

        let groups = store.list_groups().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "");

        store.append_group("B", capitals()).unwrap();
        assert_eq!(store.delete_group("A").unwrap(), 1);
        let names: Vec<String> = store.list_groups().unwrap().into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_delete_removes_all_matches() {
        let (_dir, store) = create_test_store();
        let doc = vec![
            Group::new("Dup", capitals()),
            Group::new("Polish", polish()),
            Group::new("Dup", Vec::new()),
        ];
        fs::write(store.path(), to_pretty_json(&doc).unwrap()).unwrap();

        assert_eq!(store.delete_group("Dup").unwrap(), 2);
        assert_eq!(store.list_groups().unwrap(), vec![Group::new("Polish", polish())]);
    }

    #[test]
    fn test_delete_absent_name_is_noop() {
        let (_dir, store) = create_test_store();
        store.append_group("Capitals", capitals()).unwrap();

        assert_eq!(store.delete_group("Missing").unwrap(), 0);
        assert_eq!(store.list_groups().unwrap(), vec![Group::new("Capitals", capitals())]);
    }

    #[test]
    fn test_malformed_document_is_left_untouched() {
        let (_dir, store) = create_test_store();
        fs::write(store.path(), "{ this is not valid json }").unwrap();

        assert!(matches!(store.list_groups(), Err(StoreError::Malformed { .. })));
        assert!(matches!(
            store.append_group("Capitals", capitals()),
            Err(StoreError::Malformed { .. })
        ));
        assert!(store.delete_group("Capitals").is_err());
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "{ this is not valid json }"
        );
    }

    #[test]
    fn test_document_layout() {
        let (_dir, store) = create_test_store();
        store.append_group("Capitals", capitals()).unwrap();

        let written = fs::read_to_string(store.path()).unwrap();
        let expected = r#"[
    {
        "name_group": "Capitals",
        "flashcards": [
            {
                "question": "France?",
                "answer": "Paris"
            }
        ]
    }
]"#;
        assert_eq!(written, expected);
    }
}
