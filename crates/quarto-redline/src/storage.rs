//! Document storage backends.
//!
//! The edit history reads and writes whole documents through [`FileStore`],
//! so it can run against the real filesystem or an in-memory map in tests.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::edit_log::lock;
use crate::error::{Error, Result};

/// Whole-document read/write access.
pub trait FileStore: Send + Sync {
    /// Read the full text of a document.
    ///
    /// Missing documents are reported as [`Error::FileNotFound`].
    fn read(&self, path: &Path) -> Result<String>;

    /// Replace the full text of a document.
    fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Resolve `path` to the key the edit log is indexed by.
    ///
    /// Two spellings of the same file must resolve to the same key, and a
    /// file keeps its key after it is deleted.
    fn resolve(&self, path: &Path) -> PathBuf {
        if let Ok(canonical) = path.canonicalize() {
            return canonical;
        }
        let in_canonical_parent = match (path.parent(), path.file_name()) {
            (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
                parent.canonicalize().ok().map(|dir| dir.join(name))
            }
            _ => None,
        };
        in_canonical_parent
            .or_else(|| std::path::absolute(path).ok())
            .unwrap_or_else(|| path.to_path_buf())
    }
}

/// Filesystem-backed store.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeFileStore;

impl NativeFileStore {
    pub fn new() -> Self {
        Self
    }
}

impl FileStore for NativeFileStore {
    fn read(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
            _ => Error::Io(e),
        })
    }

    /// Writes to a sibling temp file, then renames over the target.
    fn write(&self, path: &Path, content: &str) -> Result<()> {
        let mut temp_name = path
            .file_name()
            .map(|name| name.to_os_string())
            .ok_or_else(|| Error::FileNotFound(path.to_path_buf()))?;
        temp_name.push(".redline.tmp");
        let temp = path.with_file_name(temp_name);

        std::fs::write(&temp, content)?;

        if let Err(e) = std::fs::rename(&temp, path) {
            let _ = std::fs::remove_file(&temp);
            return Err(Error::Io(e));
        }

        debug!(path = %path.display(), bytes = content.len(), "Wrote document");
        Ok(())
    }
}

/// In-memory store, keyed by path exactly as given.
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a document's content without going through the edit history.
    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        lock(&self.files).insert(path.into(), content.into());
    }

    pub fn get(&self, path: &Path) -> Option<String> {
        lock(&self.files).get(path).cloned()
    }
}

impl FileStore for MemoryFileStore {
    fn read(&self, path: &Path) -> Result<String> {
        self.get(path)
            .ok_or_else(|| Error::FileNotFound(path.to_path_buf()))
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        self.insert(path, content);
        Ok(())
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_native_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("post.md");
        let store = NativeFileStore::new();

        store.write(&path, "# Title\n").unwrap();
        assert_eq!(store.read(&path).unwrap(), "# Title\n");

        store.write(&path, "# Renamed\n").unwrap();
        assert_eq!(store.read(&path).unwrap(), "# Renamed\n");

        // Temp file was renamed away
        assert!(!temp.path().join("post.md.redline.tmp").exists());
    }

    #[test]
    fn test_native_missing_file() {
        let temp = TempDir::new().unwrap();
        let store = NativeFileStore::new();
        let err = store.read(&temp.path().join("missing.md")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }

    #[test]
    fn test_native_resolve_is_canonical() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("docs")).unwrap();
        std::fs::write(temp.path().join("docs/a.md"), "a").unwrap();

        let store = NativeFileStore::new();
        let direct = store.resolve(&temp.path().join("docs/a.md"));
        let dotted = store.resolve(&temp.path().join("docs/../docs/./a.md"));
        assert_eq!(direct, dotted);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryFileStore::new();
        assert!(matches!(
            store.read(Path::new("a.md")),
            Err(Error::FileNotFound(_))
        ));

        store.insert("a.md", "hello");
        store.write(Path::new("a.md"), "world").unwrap();
        assert_eq!(store.read(Path::new("a.md")).unwrap(), "world");
        assert_eq!(store.resolve(Path::new("a.md")), PathBuf::from("a.md"));
    }
}
