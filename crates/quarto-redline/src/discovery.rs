//! Project file discovery
//!
//! Walks the project directory to find editable Markdown documents.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::paths::DOCUMENT_EXTENSIONS;

/// List every Markdown document under `project_root`.
///
/// Returns paths relative to the root, sorted. Skips:
/// - Hidden directories (starting with `.`)
/// - `node_modules`
/// - `_site`, `dist`, and other output directories
pub fn list_markdown_files(project_root: &Path) -> Vec<PathBuf> {
    let walker = WalkDir::new(project_root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_ignored(e));

    let mut files: Vec<PathBuf> = walker
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_document(e.path()))
        .filter_map(|e| {
            let relative = e.path().strip_prefix(project_root).ok()?.to_path_buf();
            debug!(?relative, "Discovered document");
            Some(relative)
        })
        .collect();

    // Sort for deterministic ordering
    files.sort();
    files
}

fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| DOCUMENT_EXTENSIONS.contains(&ext))
}

/// Check if a directory entry should be ignored during traversal.
fn is_ignored(entry: &walkdir::DirEntry) -> bool {
    // Never filter the root directory (depth 0)
    if entry.depth() == 0 {
        return false;
    }

    if !entry.file_type().is_dir() {
        return false;
    }

    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return true;
    }

    matches!(
        name.as_ref(),
        "node_modules" | "_site" | "_book" | "_freeze" | "dist" | "build" | "target"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_lists_markdown_files() {
        let temp = TempDir::new().unwrap();

        fs::write(temp.path().join("index.md"), "# Hello").unwrap();
        fs::write(temp.path().join("about.mdx"), "# About").unwrap();
        fs::write(temp.path().join("notes.txt"), "not a document").unwrap();

        fs::create_dir(temp.path().join("posts")).unwrap();
        fs::write(temp.path().join("posts/first.qmd"), "# First").unwrap();

        // Ignored
        fs::create_dir(temp.path().join(".git")).unwrap();
        fs::write(temp.path().join(".git/hidden.md"), "hidden").unwrap();

        let files = list_markdown_files(temp.path());
        assert_eq!(
            files,
            vec![
                PathBuf::from("about.mdx"),
                PathBuf::from("index.md"),
                PathBuf::from("posts/first.qmd"),
            ]
        );
    }

    #[test]
    fn test_ignores_node_modules_and_output() {
        let temp = TempDir::new().unwrap();

        fs::write(temp.path().join("index.md"), "# Hello").unwrap();
        fs::create_dir(temp.path().join("node_modules")).unwrap();
        fs::write(
            temp.path().join("node_modules/README.md"),
            "should be ignored",
        )
        .unwrap();
        fs::create_dir(temp.path().join("_site")).unwrap();
        fs::write(temp.path().join("_site/index.md"), "rendered").unwrap();

        let files = list_markdown_files(temp.path());
        assert_eq!(files, vec![PathBuf::from("index.md")]);
    }

    #[test]
    fn test_hidden_files_at_top_level_are_kept() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".draft.md"), "draft").unwrap();

        let files = list_markdown_files(temp.path());
        assert_eq!(files, vec![PathBuf::from(".draft.md")]);
    }
}
