//! Hosting-platform data transfer objects
//!
//! These types represent data crossing the platform API boundary. They
//! are intentionally separate from the engine's domain models to keep
//! this crate pure and reusable; the session layer converts between the
//! two.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Merge status of a change relative to its base branch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeStatus {
    /// Commits the head branch is ahead of base by
    pub ahead_by: u64,

    /// Commits the head branch is behind base by
    pub behind_by: u64,

    /// Whether the change is mergeable (None if not yet computed)
    pub mergeable: Option<bool>,

    /// Mergeable state as reported by the platform
    pub state: MergeableState,

    /// Base branch name (e.g., "main")
    pub base_ref: String,

    /// Head branch name (e.g., "feature/foo")
    pub head_ref: String,

    /// HEAD commit SHA of the change
    pub head_sha: String,

    /// Server-provided list of conflicting paths, when the platform
    /// supplies one (GitHub does not; other hosts may)
    pub conflicting_files: Option<Vec<String>>,
}

/// Mergeable state as reported by the platform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeableState {
    /// The merge is clean
    Clean,
    /// The head branch is behind the base branch
    Behind,
    /// The merge has conflicts
    Dirty,
    /// The merge is blocked (e.g., by required reviews)
    Blocked,
    /// CI checks are failing or pending
    Unstable,
    /// State is unknown or not yet computed
    #[default]
    Unknown,
}

/// One file entry of a branch-tip comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangedFile {
    /// Current file path
    #[serde(rename = "filename")]
    pub path: String,

    /// Previous path when the file was renamed
    #[serde(rename = "previous_filename")]
    pub previous_path: Option<String>,

    /// Change status of the file
    pub status: ChangeStatus,

    /// Number of lines added
    pub additions: u64,

    /// Number of lines deleted
    pub deletions: u64,

    /// Unified-diff patch fragment; absent for binary files
    pub patch: Option<String>,
}

/// Per-file change status in a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    /// File exists only on the head side
    Added,
    /// File exists only on the base side
    Removed,
    /// File content differs between the sides
    Modified,
    /// File was renamed (possibly with edits)
    Renamed,
    /// File was copied from another path
    Copied,
    /// File type or mode changed
    Changed,
    /// Anything the platform may add later
    #[serde(other)]
    Unknown,
}

/// A file's content together with its content-addressed version token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteFile {
    /// File path
    pub path: String,

    /// Version token (blob SHA) of this exact content on that ref
    pub sha: String,

    /// Decoded text content
    pub content: String,
}

/// A review comment from the platform API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewComment {
    /// Comment ID
    pub id: u64,

    /// File path the comment is on
    pub path: String,

    /// Line number in the diff (None for outdated/legacy comments)
    pub line: Option<u32>,

    /// Original line number when the comment was created
    pub original_line: Option<u32>,

    /// Legacy diff-position anchor
    pub position: Option<u32>,

    /// Which side of the diff ("LEFT" or "RIGHT")
    pub side: Option<String>,

    /// Comment body (markdown)
    pub body: String,

    /// Comment author's username
    pub author: String,

    /// When the comment was created
    pub created_at: DateTime<Utc>,

    /// When the comment was last updated
    pub updated_at: DateTime<Utc>,
}

/// One drafted inline comment inside a review submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftComment {
    /// File path relative to the repository root
    pub path: String,

    /// Line the comment applies to (final line for multi-line comments)
    pub line: u32,

    /// "LEFT" for the base version, "RIGHT" for the head version
    pub side: String,

    /// Starting line for multi-line comments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_line: Option<u32>,

    /// Side of the starting line for multi-line comments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_side: Option<String>,

    /// Comment body text
    pub body: String,
}

/// Review event for submitting reviews
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewEvent {
    /// Approve the change
    Approve,
    /// Request changes before merging
    RequestChanges,
    /// Comment without explicit approval
    Comment,
}
