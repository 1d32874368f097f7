//! Output formatting and reporting

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use sendable_core::{FileOutcome, Mode, RunSummary};
use std::path::Path;
use std::time::Duration;

/// Prints per-file lines and the run summary
pub struct OutputFormatter {
    mode: Mode,
}

impl OutputFormatter {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }

    /// One line per changed or failed file, in input order
    pub fn print_reports(&self, summary: &RunSummary) {
        for report in &summary.reports {
            let path = report.path.display();
            match &report.outcome {
                FileOutcome::Unchanged => {}
                FileOutcome::Changed { edits, diff } => match self.mode {
                    Mode::Write => println!(
                        "{} Rewrote {} ({})",
                        "✓".green(),
                        path,
                        plural(*edits, "edit")
                    ),
                    Mode::Check => println!(
                        "{} Would rewrite {} ({})",
                        "!".yellow(),
                        path,
                        plural(*edits, "edit")
                    ),
                    Mode::Diff => {
                        if let Some(diff) = diff {
                            print!("{diff}");
                        }
                    }
                },
                FileOutcome::Failed(err) => {
                    eprintln!("{} {}: {}", "✗".red(), path, err);
                }
            }
        }
    }

    pub fn print_summary(&self, summary: &RunSummary, elapsed: Duration) {
        println!("\n{}", "Summary:".bold());
        println!("  Files checked: {}", summary.total());

        let changed = summary.changed().to_string();
        match self.mode {
            Mode::Write => println!("  Files rewritten: {}", changed.green()),
            Mode::Check | Mode::Diff => println!("  Files to rewrite: {}", changed.yellow()),
        }
        println!("  Files unchanged: {}", summary.unchanged());
        if summary.failed() > 0 {
            println!("  Files failed: {}", summary.failed().to_string().red());
        } else if summary.changed() == 0 {
            println!("  {} Nothing to rewrite", "✓".green());
        }
        println!("Completed in {}", utils::format_duration(elapsed));
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Progress bar for long-running operations
///
/// Hidden unless enabled; safe to advance from the rayon workers.
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new(enabled: bool, total: usize) -> Self {
        if !enabled {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        Self { bar }
    }

    pub fn inc(&self, path: &Path) {
        self.bar.set_message(path.display().to_string());
        self.bar.inc(1);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Utility functions for output formatting
pub mod utils {
    /// Format duration in human-readable format
    pub fn format_duration(duration: std::time::Duration) -> String {
        let total_ms = duration.as_millis();

        if total_ms < 1000 {
            format!("{total_ms}ms")
        } else if total_ms < 60_000 {
            format!("{:.1}s", total_ms as f64 / 1000.0)
        } else {
            let minutes = total_ms / 60_000;
            let seconds = (total_ms % 60_000) as f64 / 1000.0;
            format!("{minutes}m {seconds:.1}s")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(utils::format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(utils::format_duration(Duration::from_millis(1500)), "1.5s");
        assert_eq!(utils::format_duration(Duration::from_secs(90)), "1m 30.0s");
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "edit"), "1 edit");
        assert_eq!(plural(3, "edit"), "3 edits");
    }

    #[test]
    fn test_hidden_progress_accepts_updates() {
        let progress = ProgressReporter::new(false, 2);
        progress.inc(Path::new("A.swift"));
        progress.inc(Path::new("B.swift"));
        progress.finish();
    }
}
