//! Unified diff rendering for `--diff` and `--check` output

use similar::{ChangeTag, TextDiff};
use std::fmt::Write;
use std::path::Path;

const CONTEXT_LINES: usize = 3;

const BOLD: &str = "\x1b[1m";
const CYAN: &str = "\x1b[36m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Unified diff with ANSI colors for terminal display
pub fn generate_unified_diff(original: &str, modified: &str, file_path: &Path) -> String {
    render(original, modified, file_path, true)
}

/// Unified diff without colors, suitable for `patch`
pub fn generate_unified_diff_plain(original: &str, modified: &str, file_path: &Path) -> String {
    render(original, modified, file_path, false)
}

fn paint(output: &mut String, color: Option<&str>, line: &str) {
    match color {
        Some(color) => {
            let _ = write!(output, "{color}{line}{RESET}");
        }
        None => output.push_str(line),
    }
}

fn render(original: &str, modified: &str, file_path: &Path, colorize: bool) -> String {
    let mut output = String::new();
    if original == modified {
        return output;
    }
    let diff = TextDiff::from_lines(original, modified);

    let color = |c: &'static str| colorize.then_some(c);
    let path = file_path.display();
    paint(&mut output, color(BOLD), &format!("--- {path}"));
    output.push('\n');
    paint(&mut output, color(BOLD), &format!("+++ {path}"));
    output.push('\n');

    for group in diff.grouped_ops(CONTEXT_LINES) {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        let old_start = first.old_range().start;
        let new_start = first.new_range().start;
        let old_len = last.old_range().end - old_start;
        let new_len = last.new_range().end - new_start;
        let header = format!(
            "@@ -{},{old_len} +{},{new_len} @@",
            old_start + 1,
            new_start + 1
        );
        paint(&mut output, color(CYAN), &header);
        output.push('\n');

        for op in &group {
            for change in diff.iter_changes(op) {
                let (sign, line_color) = match change.tag() {
                    ChangeTag::Delete => ('-', color(RED)),
                    ChangeTag::Insert => ('+', color(GREEN)),
                    ChangeTag::Equal => (' ', None),
                };
                let text = change.value();
                let line = format!("{sign}{}", text.strip_suffix('\n').unwrap_or(text));
                paint(&mut output, line_color, &line);
                output.push('\n');
                if change.missing_newline() {
                    output.push_str("\\ No newline at end of file\n");
                }
            }
        }
    }

    output
}
