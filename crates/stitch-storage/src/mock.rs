//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::storage::{DirEntry, Storage, StorageError};

const BACKEND: &str = "Mock";

/// Mock storage for testing.
///
/// Stores files in memory keyed by relative path. Directories are implied
/// by file paths.
///
/// # Example
///
/// ```ignore
/// use stitch_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("index.md", "# Home")
///     .with_file("setup/install.md", "# Install");
///
/// assert!(storage.exists("setup"));
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    files: RwLock<BTreeMap<String, String>>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with content.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.add_file(path, content);
        self
    }

    /// Add a markdown page whose content is a single H1 heading.
    #[must_use]
    pub fn with_page(self, path: impl Into<String>, title: &str) -> Self {
        self.with_file(path, format!("# {title}\n"))
    }

    /// Add or replace a file after construction.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn add_file(&self, path: impl Into<String>, content: impl Into<String>) {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), content.into());
    }

    fn is_dir(files: &BTreeMap<String, String>, path: &str) -> bool {
        if path.is_empty() {
            return !files.is_empty();
        }
        let prefix = format!("{path}/");
        files.keys().any(|k| k.starts_with(&prefix))
    }
}

impl Storage for MockStorage {
    fn read(&self, path: &str) -> Result<String, StorageError> {
        self.files
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))
    }

    fn exists(&self, path: &str) -> bool {
        let files = self.files.read().unwrap();
        files.contains_key(path) || Self::is_dir(&files, path)
    }

    fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>, StorageError> {
        let files = self.files.read().unwrap();
        if !Self::is_dir(&files, path) {
            return Err(StorageError::not_found(path).with_backend(BACKEND));
        }

        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{path}/")
        };
        let mut entries: BTreeMap<String, bool> = BTreeMap::new();
        for key in files.keys() {
            let Some(rest) = key.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                Some((dir, _)) => {
                    entries.insert(dir.to_owned(), true);
                }
                None => {
                    entries.entry(rest.to_owned()).or_insert(false);
                }
            }
        }
        Ok(entries
            .into_iter()
            .map(|(name, is_dir)| DirEntry { name, is_dir })
            .collect())
    }

    fn describe(&self) -> String {
        String::from("<mock>")
    }
}
