//! Mapping request paths onto documents under the project root.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Extensions tried, in order, when a request path names no existing file.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["md", "mdx", "qmd"];

/// Resolve `.` and `..` components without touching the filesystem.
pub(crate) fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Join `relative` under `root` and reject anything that escapes it.
///
/// Purely lexical: the returned path need not exist.
pub fn validate_file_path(root: &Path, relative: &Path) -> Result<PathBuf> {
    let root = normalize_lexically(&std::path::absolute(root)?);
    let candidate = normalize_lexically(&root.join(relative));
    if candidate.starts_with(&root) {
        Ok(candidate)
    } else {
        Err(Error::PathOutsideRoot(relative.to_path_buf()))
    }
}

/// Find the document a request path refers to.
///
/// Returns the path itself if it exists, otherwise the first existing
/// sibling with one of [`DOCUMENT_EXTENSIONS`] appended (`posts/hello`
/// resolves to `posts/hello.md`).
pub fn resolve_file_path(root: &Path, relative: &Path) -> Result<PathBuf> {
    let candidate = validate_file_path(root, relative)?;
    if candidate.is_file() {
        return Ok(candidate);
    }

    for ext in DOCUMENT_EXTENSIONS {
        let mut with_ext = candidate.clone().into_os_string();
        with_ext.push(".");
        with_ext.push(ext);
        let with_ext = PathBuf::from(with_ext);
        if with_ext.is_file() {
            return Ok(with_ext);
        }
    }

    Err(Error::FileNotFound(relative.to_path_buf()))
}
