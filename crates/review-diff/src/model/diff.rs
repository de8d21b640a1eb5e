//! Diff data structures representing a change's files, hunks and lines.

/// A complete diff between two refs, covering every changed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDiff {
    /// Base ref (the target branch side).
    pub base_ref: String,
    /// Head ref (the branch under review).
    pub head_ref: String,
    /// All files changed between the two refs.
    pub files: Vec<FileDiff>,
    /// Total additions across all files.
    pub total_additions: usize,
    /// Total deletions across all files.
    pub total_deletions: usize,
}

impl ReviewDiff {
    /// Create an empty diff between two refs.
    pub fn new(base_ref: impl Into<String>, head_ref: impl Into<String>) -> Self {
        Self {
            base_ref: base_ref.into(),
            head_ref: head_ref.into(),
            files: Vec::new(),
            total_additions: 0,
            total_deletions: 0,
        }
    }

    /// Recalculate totals from files.
    pub fn recalculate_totals(&mut self) {
        self.total_additions = self.files.iter().map(|f| f.additions).sum();
        self.total_deletions = self.files.iter().map(|f| f.deletions).sum();
    }
}

/// A single file's diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    /// Current file path (after rename if applicable).
    pub path: String,
    /// Previous file path (if renamed).
    pub previous_path: Option<String>,
    /// File status.
    pub status: FileStatus,
    /// True when the host supplied no textual patch for this file.
    pub is_binary: bool,
    /// Change hunks. Always empty for binary files.
    pub hunks: Vec<Hunk>,
    /// Number of added lines.
    pub additions: usize,
    /// Number of deleted lines.
    pub deletions: usize,
}

impl FileDiff {
    /// Create an empty file diff.
    pub fn new(path: impl Into<String>, status: FileStatus) -> Self {
        Self {
            path: path.into(),
            previous_path: None,
            status,
            is_binary: false,
            hunks: Vec::new(),
            additions: 0,
            deletions: 0,
        }
    }

    /// Get the display name for the file (handles renames).
    pub fn display_name(&self) -> String {
        match &self.previous_path {
            Some(old) if old != &self.path => format!("{} → {}", old, self.path),
            _ => self.path.clone(),
        }
    }

    /// Recalculate line statistics from hunks.
    pub fn recalculate_stats(&mut self) {
        self.additions = self
            .hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| l.kind == LineKind::Addition)
            .count();
        self.deletions = self
            .hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| l.kind == LineKind::Deletion)
            .count();
    }

    /// Flattened display rows: each hunk contributes a synthetic header
    /// row followed by its content rows, in patch order.
    pub fn rows(&self) -> Vec<DiffLine> {
        let mut rows = Vec::with_capacity(self.total_rows());
        for hunk in &self.hunks {
            rows.push(DiffLine::hunk_header(hunk.header.clone()));
            rows.extend(hunk.lines.iter().cloned());
        }
        rows
    }

    /// Total number of displayable rows (for scrolling).
    pub fn total_rows(&self) -> usize {
        self.hunks.iter().map(|h| h.lines.len() + 1).sum() // +1 for hunk header
    }
}

/// File status in the diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Removed,
    Modified,
    Renamed,
}

impl FileStatus {
    /// Get a single-character representation.
    pub fn as_char(&self) -> char {
        match self {
            FileStatus::Added => 'A',
            FileStatus::Removed => 'D',
            FileStatus::Modified => 'M',
            FileStatus::Renamed => 'R',
        }
    }
}

/// A contiguous region of changes (hunk).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    /// Header line exactly as it appeared in the patch
    /// (e.g., "@@ -10,5 +10,7 @@ fn example()").
    pub header: String,
    /// Old file starting line.
    pub old_start: u32,
    /// Number of lines in old version.
    pub old_count: u32,
    /// New file starting line.
    pub new_start: u32,
    /// Number of lines in new version.
    pub new_count: u32,
    /// Lines in this hunk, in patch order.
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    /// Create a new hunk, formatting a canonical header.
    pub fn new(old_start: u32, old_count: u32, new_start: u32, new_count: u32) -> Self {
        Self {
            header: format!(
                "@@ -{},{} +{},{} @@",
                old_start, old_count, new_start, new_count
            ),
            old_start,
            old_count,
            new_start,
            new_count,
            lines: Vec::new(),
        }
    }

    /// Create a hunk that retains the verbatim header it was parsed from.
    pub fn from_header(
        header: impl Into<String>,
        old_start: u32,
        old_count: u32,
        new_start: u32,
        new_count: u32,
    ) -> Self {
        Self {
            header: header.into(),
            old_start,
            old_count,
            new_start,
            new_count,
            lines: Vec::new(),
        }
    }
}

/// A single line in the diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    /// Line type.
    pub kind: LineKind,
    /// Line content (without the leading +/-/space marker).
    pub content: String,
    /// Line number in old file (for Context and Deletion).
    pub old_line: Option<u32>,
    /// Line number in new file (for Context and Addition).
    pub new_line: Option<u32>,
}

impl DiffLine {
    /// Create a new context line.
    pub fn context(content: impl Into<String>, old_line: u32, new_line: u32) -> Self {
        Self {
            kind: LineKind::Context,
            content: content.into(),
            old_line: Some(old_line),
            new_line: Some(new_line),
        }
    }

    /// Create a new addition line.
    pub fn addition(content: impl Into<String>, new_line: u32) -> Self {
        Self {
            kind: LineKind::Addition,
            content: content.into(),
            old_line: None,
            new_line: Some(new_line),
        }
    }

    /// Create a new deletion line.
    pub fn deletion(content: impl Into<String>, old_line: u32) -> Self {
        Self {
            kind: LineKind::Deletion,
            content: content.into(),
            old_line: Some(old_line),
            new_line: None,
        }
    }

    /// Create a synthetic hunk-header row; it carries no line numbers.
    pub fn hunk_header(content: impl Into<String>) -> Self {
        Self {
            kind: LineKind::HunkHeader,
            content: content.into(),
            old_line: None,
            new_line: None,
        }
    }

    /// Get the line number to display (prefers new_line, falls back to old_line).
    pub fn display_line_number(&self) -> Option<u32> {
        self.new_line.or(self.old_line)
    }
}

/// Line type in the diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Unchanged line (for context).
    Context,
    /// Added line (+).
    Addition,
    /// Removed line (-).
    Deletion,
    /// @@ header line.
    HunkHeader,
}

impl LineKind {
    /// Get the prefix character for this line type.
    pub fn prefix(&self) -> char {
        match self {
            LineKind::Context => ' ',
            LineKind::Addition => '+',
            LineKind::Deletion => '-',
            LineKind::HunkHeader => '@',
        }
    }
}
