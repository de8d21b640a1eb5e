//! Line-keyed lookup of review comments for one file.

use std::collections::HashMap;

use crate::model::{DiffSide, PendingComment, ReviewComment};

/// Key addressing one rendered diff line: (1-based line number, side).
pub type LineKey = (u32, DiffSide);

/// Buckets existing and pending comments by the exact diff line they
/// anchor to, restricted to a single file.
///
/// Bucket order preserves input order: server return order for existing
/// comments, creation order for pending ones. Lines without comments
/// simply have no bucket; lookups return an empty slice.
#[derive(Debug, Default)]
pub struct LineCommentIndex {
    existing: HashMap<LineKey, Vec<ReviewComment>>,
    pending: HashMap<LineKey, Vec<PendingComment>>,
}

impl LineCommentIndex {
    /// Build the index for `path` from flat comment lists.
    pub fn build(existing: &[ReviewComment], pending: &[PendingComment], path: &str) -> Self {
        let mut index = Self::default();

        for comment in existing.iter().filter(|c| c.path == path) {
            match anchor(comment) {
                Some(key) => index.existing.entry(key).or_default().push(comment.clone()),
                None => {
                    log::debug!("comment {} carries neither line nor position, skipped", comment.id)
                }
            }
        }
        for comment in pending.iter().filter(|c| c.path == path) {
            let key = (comment.position.line, comment.position.side);
            index.pending.entry(key).or_default().push(comment.clone());
        }

        index
    }

    /// Existing comments anchored at exactly (line, side).
    pub fn existing_at(&self, line: u32, side: DiffSide) -> &[ReviewComment] {
        self.existing.get(&(line, side)).map_or(&[], Vec::as_slice)
    }

    /// Pending comments anchored at exactly (line, side).
    pub fn pending_at(&self, line: u32, side: DiffSide) -> &[PendingComment] {
        self.pending.get(&(line, side)).map_or(&[], Vec::as_slice)
    }

    /// True when the file has no anchored comments at all.
    pub fn is_empty(&self) -> bool {
        self.existing.is_empty() && self.pending.is_empty()
    }

    /// Number of anchored existing comments.
    pub fn existing_count(&self) -> usize {
        self.existing.values().map(Vec::len).sum()
    }

    /// Number of anchored pending comments.
    pub fn pending_count(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }
}

/// Derive the (line, side) anchor for an existing comment.
///
/// Legacy records may carry a diff `position` instead of a line number.
/// The line number wins when both are present, and an explicit `side`
/// wins over the position-derived one; a record with neither line nor
/// position cannot be anchored.
fn anchor(comment: &ReviewComment) -> Option<LineKey> {
    let side = comment.side.unwrap_or(if comment.position.is_some() {
        DiffSide::Right
    } else {
        DiffSide::Left
    });
    let line = comment.line.or(comment.position)?;
    Some((line, side))
}
