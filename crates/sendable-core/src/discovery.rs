//! Swift source discovery
//!
//! Paths named on the command line are taken as-is when they are Swift files.
//! Directories are walked recursively, skipping build output and dependency
//! checkouts, and the `files.include` / `files.exclude` globs are matched
//! against paths relative to the directory that was named.

use glob::Pattern;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::FilesConfiguration;
use crate::error::SendableError;
use crate::result::Result;

/// Extension of the files the rewriter handles
pub const SOURCE_EXTENSION: &str = "swift";

/// Directories never descended into
pub const SKIPPED_DIRECTORIES: &[&str] = &[".build", ".git", ".swiftpm", "DerivedData", "Pods"];

fn compile_patterns(patterns: Option<&Vec<String>>, section: &str) -> Result<Vec<Pattern>> {
    patterns
        .into_iter()
        .flatten()
        .map(|p| {
            Pattern::new(p).map_err(|e| {
                SendableError::config_error(format!("Invalid {section} pattern '{p}': {e}"))
            })
        })
        .collect()
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SOURCE_EXTENSION))
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRECTORIES.contains(&name))
}

/// Every Swift file under `roots`, sorted and without duplicates
pub fn list_source_files<P: AsRef<Path>>(
    roots: &[P],
    files: &FilesConfiguration,
) -> Result<BTreeSet<PathBuf>> {
    let include = compile_patterns(files.include.as_ref(), "include")?;
    let exclude = compile_patterns(files.exclude.as_ref(), "exclude")?;
    let mut found = BTreeSet::new();

    for root in roots {
        let root = root.as_ref();
        let metadata = std::fs::metadata(root).map_err(|e| SendableError::io_error(root, e))?;

        if metadata.is_file() {
            if is_source_file(root) {
                found.insert(root.to_path_buf());
            } else {
                warn!("Skipping {}: not a .{} file", root.display(), SOURCE_EXTENSION);
            }
            continue;
        }

        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !is_skipped_dir(e))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Skipping unreadable entry under {}: {}", root.display(), err);
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_file() || !is_source_file(path) {
                continue;
            }

            let relative = path.strip_prefix(root).unwrap_or(path);
            let included = include.is_empty() || include.iter().any(|p| p.matches_path(relative));
            if !included || exclude.iter().any(|p| p.matches_path(relative)) {
                debug!("Filtered out {}", path.display());
                continue;
            }
            found.insert(path.to_path_buf());
        }
    }

    info!("Discovered {} Swift files", found.len());
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, relative: &str) -> PathBuf {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "struct A {}\n").unwrap();
        path
    }

    fn relative(found: &BTreeSet<PathBuf>, root: &Path) -> Vec<String> {
        found
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_walks_directories_and_skips_build_output() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(root, "Package.swift");
        touch(root, "Sources/App/Model.swift");
        touch(root, "Sources/App/README.md");
        touch(root, ".build/checkouts/Dep/Dep.swift");
        touch(root, "Pods/Lib/Lib.swift");

        let found = list_source_files(&[root], &FilesConfiguration::default()).unwrap();
        assert_eq!(
            relative(&found, root),
            vec!["Package.swift", "Sources/App/Model.swift"]
        );
    }

    #[test]
    fn test_include_and_exclude_patterns() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(root, "Sources/App/Model.swift");
        touch(root, "Sources/App/Generated/Api.swift");
        touch(root, "Tests/AppTests/ModelTests.swift");

        let files = FilesConfiguration {
            include: Some(vec!["Sources/**/*.swift".to_string()]),
            exclude: Some(vec!["**/Generated/**".to_string()]),
        };
        let found = list_source_files(&[root], &files).unwrap();
        assert_eq!(relative(&found, root), vec!["Sources/App/Model.swift"]);
    }

    #[test]
    fn test_explicit_files_and_duplicates() {
        let temp = TempDir::new().unwrap();
        let model = touch(temp.path(), "Model.swift");
        let notes = touch(temp.path(), "notes.txt");

        let found =
            list_source_files(&[model.clone(), model.clone(), notes], &FilesConfiguration::default())
                .unwrap();
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec![model]);
    }

    #[test]
    fn test_missing_root_is_an_io_error() {
        let temp = TempDir::new().unwrap();
        let err = list_source_files(&[temp.path().join("missing")], &FilesConfiguration::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
