//! # review-diff
//!
//! A standalone, reusable diff model for code review: unified-diff patch
//! parsing, line-accurate addressing, and (line, side)-keyed comment
//! lookup.
//!
//! ## Design Principles
//!
//! This crate is pure data and computation: it performs no I/O and never
//! fails. Hosts that cannot supply a textual patch get a binary
//! placeholder; malformed patches degrade to whatever hunks could be
//! recovered. The orchestrating layers fetch wire data, convert it into
//! these models, and feed user actions back through their own state
//! machines.
//!
//! ## Usage
//!
//! ```rust
//! use review_diff::{parse_file_patch, DiffSide, FileStatus, LineCommentIndex};
//!
//! let patch = "@@ -1,2 +1,2 @@\n unchanged\n-old\n+new";
//! let file = parse_file_patch("src/lib.rs", None, FileStatus::Modified, Some(patch));
//! assert_eq!(file.hunks.len(), 1);
//!
//! let index = LineCommentIndex::build(&[], &[], &file.path);
//! assert!(index.pending_at(1, DiffSide::Right).is_empty());
//! ```

pub mod index;
pub mod model;
pub mod parser;

// Re-export commonly used types
pub use index::{LineCommentIndex, LineKey};
pub use model::{
    CommentPosition, DiffLine, DiffSide, FileDiff, FileStatus, Hunk, LineKind, PendingComment,
    ReviewComment, ReviewDiff, ReviewEvent,
};
pub use parser::parse_file_patch;
