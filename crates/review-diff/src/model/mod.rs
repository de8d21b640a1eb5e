//! Data models for diff representation and review comments.

mod comment;
mod diff;

pub use comment::{CommentPosition, DiffSide, PendingComment, ReviewComment, ReviewEvent};
pub use diff::{DiffLine, FileDiff, FileStatus, Hunk, LineKind, ReviewDiff};
