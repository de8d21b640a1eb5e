//! Unified-diff patch parsing.
//!
//! Hosting platforms deliver one patch fragment per changed file: hunks
//! only, no `---`/`+++` file headers, and no patch at all for binary
//! files. Parsing is best-effort and never fails; malformed input
//! degrades to whatever hunks could be recovered.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::{DiffLine, FileDiff, FileStatus, Hunk};

/// Parse one file's patch fragment into a structured diff.
///
/// An absent `patch` means the host had no textual diff for the file
/// (binary content); the result then carries `is_binary = true` and no
/// hunks. Text before the first hunk header is discarded.
pub fn parse_file_patch(
    path: impl Into<String>,
    previous_path: Option<String>,
    status: FileStatus,
    patch: Option<&str>,
) -> FileDiff {
    let mut file = FileDiff::new(path, status);
    file.previous_path = previous_path;

    let Some(text) = patch else {
        file.is_binary = true;
        return file;
    };

    // Running line counters, reset by every hunk header.
    let mut old_line = 0u32;
    let mut new_line = 0u32;

    for raw in text.lines() {
        if let Some(hunk) = parse_hunk_header(raw) {
            old_line = hunk.old_start;
            new_line = hunk.new_start;
            file.hunks.push(hunk);
            continue;
        }

        let Some(hunk) = file.hunks.last_mut() else {
            log::debug!("discarding patch line before first hunk header: {raw:?}");
            continue;
        };

        let mut chars = raw.chars();
        let marker = chars.next();
        let content = chars.as_str();
        match marker {
            Some('+') => {
                hunk.lines.push(DiffLine::addition(content, new_line));
                new_line += 1;
            }
            Some('-') => {
                hunk.lines.push(DiffLine::deletion(content, old_line));
                old_line += 1;
            }
            // "\ No newline at end of file" marker, not a content line.
            Some('\\') => {}
            _ => {
                hunk.lines.push(DiffLine::context(content, old_line, new_line));
                old_line += 1;
                new_line += 1;
            }
        }
    }

    file.recalculate_stats();
    file
}

/// Recognize `@@ -a[,b] +c[,d] @@ ...` and build an empty hunk from it.
///
/// Missing counts default to 1. The verbatim header line is retained,
/// including any trailing section text.
fn parse_hunk_header(line: &str) -> Option<Hunk> {
    static HUNK_HEADER: OnceLock<Regex> = OnceLock::new();

    let re = HUNK_HEADER
        .get_or_init(|| Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").unwrap());
    let caps = re.captures(line)?;
    let group = |idx: usize, default: u32| -> Option<u32> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(default),
        }
    };

    Some(Hunk::from_header(
        line,
        group(1, 0)?,
        group(2, 1)?,
        group(3, 0)?,
        group(4, 1)?,
    ))
}
