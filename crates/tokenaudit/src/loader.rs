//! Source file discovery.
//!
//! Directories are walked recursively. Files are kept when their extension
//! is in the configured list; dependency and build directories are skipped.
//! Results are sorted by origin so audits are deterministic regardless of
//! directory iteration order.

use std::path::{Path, PathBuf};

use crate::error::LoadError;

/// Directory names never descended into.
const SKIPPED_DIRS: &[&str] = &["node_modules", "target", "dist", "build", ".git", ".next"];

/// A component source loaded into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Identifier used in report locators, with forward slashes.
    pub origin: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(origin: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            text: text.into(),
        }
    }

    /// Reads one file. The origin is the path as given.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self::new(
            to_origin(path),
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    }
}

/// Loads every path: files directly, directories via [`walk_sources`].
///
/// Explicit files are loaded whatever their extension.
pub fn load_sources(paths: &[PathBuf], extensions: &[String]) -> Result<Vec<SourceFile>, LoadError> {
    let mut sources = Vec::new();
    for path in paths {
        if path.is_dir() {
            sources.extend(walk_sources(path, extensions)?);
        } else {
            sources.push(SourceFile::from_path(path)?);
        }
    }
    Ok(sources)
}

/// Walks `root` and loads files with a matching extension.
///
/// Origins are relative to `root`, prefixed with its display form.
pub fn walk_sources(root: &Path, extensions: &[String]) -> Result<Vec<SourceFile>, LoadError> {
    let mut paths = Vec::new();
    walk_dir_recursive(root, extensions, &mut paths)?;
    paths.sort();

    let sources = paths
        .iter()
        .map(|path| SourceFile::from_path(path))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(root = %root.display(), files = sources.len(), "walked sources");
    Ok(sources)
}

fn walk_dir_recursive(
    current: &Path,
    extensions: &[String],
    paths: &mut Vec<PathBuf>,
) -> Result<(), LoadError> {
    let entries = std::fs::read_dir(current).map_err(|e| LoadError::Io {
        path: current.to_path_buf(),
        message: e.to_string(),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| LoadError::Io {
            path: current.to_path_buf(),
            message: e.to_string(),
        })?;
        let path = entry.path();

        if path.is_dir() {
            let skipped = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| SKIPPED_DIRS.contains(&n));
            if !skipped {
                walk_dir_recursive(&path, extensions, paths)?;
            }
        } else if path.is_file() && has_extension(&path, extensions) {
            paths.push(path);
        }
    }

    Ok(())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

fn to_origin(path: &Path) -> String {
    path.to_string_lossy()
        .replace(std::path::MAIN_SEPARATOR, "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn exts(list: &[&str]) -> Vec<String> {
        list.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_walk_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("components/ui")).unwrap();
        fs::write(dir.path().join("components/ui/button.tsx"), "b").unwrap();
        fs::write(dir.path().join("components/card.tsx"), "c").unwrap();
        fs::write(dir.path().join("components/readme.md"), "x").unwrap();

        let sources = walk_sources(dir.path(), &exts(&["tsx"])).unwrap();
        let origins: Vec<&str> = sources.iter().map(|s| s.origin.as_str()).collect();

        assert_eq!(origins.len(), 2);
        assert!(origins[0].ends_with("components/card.tsx"));
        assert!(origins[1].ends_with("components/ui/button.tsx"));
        assert_eq!(sources[0].text, "c");
    }

    #[test]
    fn test_walk_skips_node_modules() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("node_modules/pkg")).unwrap();
        fs::write(dir.path().join("node_modules/pkg/index.js"), "x").unwrap();
        fs::write(dir.path().join("app.js"), "y").unwrap();

        let sources = walk_sources(dir.path(), &exts(&[".js"])).unwrap();
        assert_eq!(sources.len(), 1);
        assert!(sources[0].origin.ends_with("app.js"));
    }

    #[test]
    fn test_load_sources_accepts_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("page.mdx");
        fs::write(&file, "content").unwrap();

        let sources = load_sources(&[file], &exts(&["tsx"])).unwrap();
        assert_eq!(sources.len(), 1);
    }

    #[test]
    fn test_missing_path_is_error() {
        let result = load_sources(&[PathBuf::from("/nonexistent/x.tsx")], &exts(&["tsx"]));
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }
}
