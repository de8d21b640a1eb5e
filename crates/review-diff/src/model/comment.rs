//! Comment-related data structures for reviews.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A pending (not yet submitted) review comment.
///
/// The id is local only: it exists so the draft can be edited before
/// submission and has no meaning to the hosting platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingComment {
    /// Local identifier for this pending comment.
    pub id: Uuid,
    /// File path.
    pub path: String,
    /// Position information.
    pub position: CommentPosition,
    /// Comment body (markdown).
    pub body: String,
    /// When the comment was drafted locally.
    pub created_at: DateTime<Utc>,
}

impl PendingComment {
    /// Create a new pending comment with a fresh local id.
    pub fn new(
        path: impl Into<String>,
        position: CommentPosition,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            path: path.into(),
            position,
            body: body.into(),
            created_at: Utc::now(),
        }
    }
}

/// A review comment that already exists on the hosting platform.
///
/// Anchoring fields are all optional because historical records may carry
/// a legacy diff `position` instead of a `(line, side)` pair; the comment
/// index normalizes them (see [`crate::index`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewComment {
    /// Server-side comment id.
    pub id: u64,
    /// File path the comment is attached to.
    pub path: String,
    /// Line number in the version addressed by `side`.
    pub line: Option<u32>,
    /// Legacy diff-position anchor.
    pub position: Option<u32>,
    /// Which side of the diff the comment addresses.
    pub side: Option<DiffSide>,
    /// Comment body (markdown).
    pub body: String,
    /// Login of the comment author.
    pub author: String,
    /// When the comment was created on the platform.
    pub created_at: DateTime<Utc>,
}

/// Where a comment is anchored in the diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentPosition {
    /// Which side of the diff.
    pub side: DiffSide,
    /// Line number (in the respective file version). For multi-line
    /// comments this is the final line of the range.
    pub line: u32,
    /// For multi-line comments: starting line.
    pub start_line: Option<u32>,
}

impl CommentPosition {
    /// Create a single-line comment position.
    pub fn single(side: DiffSide, line: u32) -> Self {
        Self {
            side,
            line,
            start_line: None,
        }
    }

    /// Create a multi-line comment position.
    pub fn range(side: DiffSide, start_line: u32, end_line: u32) -> Self {
        Self {
            side,
            line: end_line,
            start_line: Some(start_line),
        }
    }

    /// Check if this is a multi-line comment.
    pub fn is_multiline(&self) -> bool {
        self.start_line.is_some()
    }

    /// Get the line range as (start, end).
    pub fn line_range(&self) -> (u32, u32) {
        (self.start_line.unwrap_or(self.line), self.line)
    }
}

/// Which side of the diff a comment is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffSide {
    /// Base/pre-change version (deletions side).
    Left,
    /// Head/post-change version (additions side).
    Right,
}

impl DiffSide {
    /// Convert to the platform's string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffSide::Left => "LEFT",
            DiffSide::Right => "RIGHT",
        }
    }

    /// Parse the platform's string representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "LEFT" => Some(DiffSide::Left),
            "RIGHT" => Some(DiffSide::Right),
            _ => None,
        }
    }
}

/// The verdict attached to a review submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewEvent {
    /// Approve the change.
    Approve,
    /// Request changes.
    RequestChanges,
    /// Just leave comments (neutral).
    Comment,
}

impl ReviewEvent {
    /// Convert to the platform's string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewEvent::Approve => "APPROVE",
            ReviewEvent::RequestChanges => "REQUEST_CHANGES",
            ReviewEvent::Comment => "COMMENT",
        }
    }
}
