//! Per-file rewrite driver
//!
//! Each file goes through read, parse, rewrite, print and, in write mode, an
//! atomic replace. Files are independent, so they are processed in parallel
//! on the rayon pool and a failure in one never stops the others.

use rayon::prelude::*;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

use crate::cst::parse_swift;
use crate::diff::{generate_unified_diff, generate_unified_diff_plain};
use crate::error::SendableError;
use crate::result::Result;
use crate::rewrite::Pipeline;

/// What to do with rewritten files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Replace files in place
    #[default]
    Write,
    /// Only report which files would change
    Check,
    /// Report a unified diff per changed file
    Diff,
}

/// Result of processing one file
#[derive(Debug)]
pub enum FileOutcome {
    Unchanged,
    Changed {
        /// Declarations edited across all passes
        edits: usize,
        /// Present in [`Mode::Diff`]
        diff: Option<String>,
    },
    Failed(SendableError),
}

impl FileOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

/// Outcomes of a run, in input order
#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<FileReport>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.reports.len()
    }

    pub fn changed(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome.is_changed()).count()
    }

    pub fn failed(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome.is_failed()).count()
    }

    pub fn unchanged(&self) -> usize {
        self.total() - self.changed() - self.failed()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &SendableError)> {
        self.reports.iter().filter_map(|r| match &r.outcome {
            FileOutcome::Failed(err) => Some((r.path.as_path(), err)),
            _ => None,
        })
    }
}

/// Read a source file as UTF-8
pub fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| SendableError::io_error(path, e))
}

/// Replace `path` with `content` through a temporary file in the same directory
///
/// Readers see either the old or the new content, never a partial write. The
/// original file permissions are kept.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let io_error = |e: std::io::Error| SendableError::io_error(path, e);

    let mut temp = NamedTempFile::new_in(parent).map_err(io_error)?;
    temp.write_all(content.as_bytes()).map_err(io_error)?;
    temp.as_file().sync_all().map_err(io_error)?;
    if let Ok(metadata) = fs::metadata(path) {
        temp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(io_error)?;
    }
    temp.persist(path).map_err(|e| io_error(e.error))?;
    Ok(())
}

/// Runs a pipeline over files
#[derive(Debug, Clone)]
pub struct Driver {
    pipeline: Pipeline,
    mode: Mode,
    colored_diff: bool,
}

impl Driver {
    pub fn new(pipeline: Pipeline, mode: Mode) -> Self {
        Self {
            pipeline,
            mode,
            colored_diff: false,
        }
    }

    pub fn with_colored_diff(mut self, colored: bool) -> Self {
        self.colored_diff = colored;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Process one file, turning every error into [`FileOutcome::Failed`]
    pub fn process_file(&self, path: &Path) -> FileOutcome {
        match self.rewrite_file(path) {
            Ok(outcome) => outcome,
            Err(err) if err.is_recoverable() => {
                warn!("Skipping {}: {}", path.display(), err);
                FileOutcome::Failed(err)
            }
            Err(err) => {
                error!("Failed to rewrite {}: {}", path.display(), err);
                FileOutcome::Failed(err)
            }
        }
    }

    fn rewrite_file(&self, path: &Path) -> Result<FileOutcome> {
        let original = read_source(path)?;
        let (tree, errors) = parse_swift(&original);
        if let Some(err) = SendableError::from_syntax_errors(&errors) {
            return Err(err);
        }

        let outcome = self.pipeline.run(&tree)?;
        let rewritten = outcome.tree.print();
        if rewritten == original {
            debug!("{} is unchanged", path.display());
            return Ok(FileOutcome::Unchanged);
        }

        let diff = match self.mode {
            Mode::Write => {
                write_atomic(path, &rewritten)?;
                debug!("Rewrote {} ({} edits)", path.display(), outcome.edits);
                None
            }
            Mode::Check => None,
            Mode::Diff if self.colored_diff => {
                Some(generate_unified_diff(&original, &rewritten, path))
            }
            Mode::Diff => Some(generate_unified_diff_plain(&original, &rewritten, path)),
        };
        Ok(FileOutcome::Changed {
            edits: outcome.edits,
            diff,
        })
    }

    /// Process every file in parallel
    pub fn run(&self, files: &[PathBuf]) -> RunSummary {
        self.run_with_progress(files, |_| {})
    }

    /// Like [`Driver::run`], calling `on_file` as each file completes
    pub fn run_with_progress<F>(&self, files: &[PathBuf], on_file: F) -> RunSummary
    where
        F: Fn(&FileReport) + Sync,
    {
        info!("Rewriting {} files in {:?} mode", files.len(), self.mode);
        let reports: Vec<FileReport> = files
            .par_iter()
            .map(|path| {
                let report = FileReport {
                    path: path.clone(),
                    outcome: self.process_file(path),
                };
                on_file(&report);
                report
            })
            .collect();

        let summary = RunSummary { reports };
        info!(
            "Processed {} files: {} changed, {} unchanged, {} failed",
            summary.total(),
            summary.changed(),
            summary.unchanged(),
            summary.failed()
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_write_mode_replaces_changed_files() {
        let dir = TempDir::new().unwrap();
        let changed = write(&dir, "A.swift", "public struct A {}\n");
        let unchanged = write(&dir, "B.swift", "struct B {}\n");

        let driver = Driver::new(Pipeline::auto_sendable(), Mode::Write);
        let summary = driver.run(&[changed.clone(), unchanged.clone()]);

        assert_eq!(summary.changed(), 1);
        assert_eq!(summary.unchanged(), 1);
        assert_eq!(fs::read_to_string(&changed).unwrap(), "public struct A: Sendable {}\n");
        assert_eq!(fs::read_to_string(&unchanged).unwrap(), "struct B {}\n");
    }

    #[test]
    fn test_check_and_diff_modes_leave_files_alone() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "A.swift", "public enum E { case a }\n");

        let check = Driver::new(Pipeline::auto_sendable(), Mode::Check).process_file(&path);
        assert!(matches!(check, FileOutcome::Changed { edits: 1, diff: None }));

        let diff = Driver::new(Pipeline::auto_sendable(), Mode::Diff).process_file(&path);
        match diff {
            FileOutcome::Changed { diff: Some(diff), .. } => {
                assert!(diff.contains("+public enum E: Sendable { case a }"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), "public enum E { case a }\n");
    }

    #[test]
    fn test_failures_do_not_stop_other_files() {
        let dir = TempDir::new().unwrap();
        let broken = write(&dir, "Broken.swift", "public struct A {\n");
        let missing = dir.path().join("Missing.swift");
        let good = write(&dir, "Good.swift", "public struct C {}\n");

        let summary = Driver::new(Pipeline::auto_sendable(), Mode::Write).run(&[
            broken.clone(),
            missing,
            good.clone(),
        ]);

        assert_eq!(summary.failed(), 2);
        assert_eq!(summary.changed(), 1);
        let kinds: Vec<_> = summary.failures().map(|(_, e)| e.kind()).collect();
        assert_eq!(kinds, vec![ErrorKind::Syntax, ErrorKind::Io]);
        assert_eq!(fs::read_to_string(&broken).unwrap(), "public struct A {\n");
        assert_eq!(fs::read_to_string(&good).unwrap(), "public struct C: Sendable {}\n");
    }

    #[test]
    fn test_progress_callback_sees_every_file() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let dir = TempDir::new().unwrap();
        let files: Vec<_> = (0..4)
            .map(|i| write(&dir, &format!("F{i}.swift"), "struct S {}\n"))
            .collect();
        let seen = AtomicUsize::new(0);
        Driver::new(Pipeline::auto_sendable(), Mode::Check).run_with_progress(&files, |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(seen.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_write_atomic_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "A.swift", "old");
        write_atomic(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
