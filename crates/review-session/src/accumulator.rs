//! Pending-review accumulation
//!
//! Inline comments drafted during a review are staged locally, per
//! change, and shipped to the platform as one atomic submission. Until
//! then nothing leaves the process: drafts can be edited, pruned or
//! discarded freely.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};
use review_client::types::DraftComment;
use review_client::{HostClient, HostError};
use review_diff::{CommentPosition, PendingComment, ReviewEvent};
use thiserror::Error;
use uuid::Uuid;

use crate::convert;

/// Errors from review drafting and submission
#[derive(Debug, Error)]
pub enum ReviewError {
    /// The comment body was empty after trimming.
    #[error("Comment body must not be empty")]
    EmptyCommentBody,

    /// A COMMENT or REQUEST_CHANGES review carried neither a body nor
    /// any pending comments.
    #[error("Review needs a body or at least one pending comment")]
    EmptySubmission,

    /// No draft exists for the change.
    #[error("No active review draft for change #{0}")]
    NoActiveReview(u64),

    /// The platform rejected or never received the submission.
    #[error(transparent)]
    Host(#[from] HostError),
}

/// A draft review for one change.
///
/// Created on the first staged comment (or an explicit start), dropped
/// on discard or submission. Comment order is creation order and is
/// preserved through submission.
#[derive(Debug, Clone)]
pub struct PendingReview {
    /// The change this draft belongs to.
    pub change: u64,
    /// Staged comments in creation order.
    pub comments: Vec<PendingComment>,
}

impl PendingReview {
    fn new(change: u64) -> Self {
        Self {
            change,
            comments: Vec::new(),
        }
    }
}

/// Stages inline comments per change and submits them as one review.
pub struct ReviewAccumulator {
    host: Arc<dyn HostClient>,
    owner: String,
    repo: String,
    drafts: HashMap<u64, PendingReview>,
}

impl ReviewAccumulator {
    /// Create an accumulator for one repository.
    pub fn new(host: Arc<dyn HostClient>, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            host,
            owner: owner.into(),
            repo: repo.into(),
            drafts: HashMap::new(),
        }
    }

    /// Open a draft for the change. Idempotent: an existing draft is
    /// kept untouched.
    pub fn start_pending_review(&mut self, change: u64) {
        self.drafts
            .entry(change)
            .or_insert_with(|| PendingReview::new(change));
    }

    /// Whether a draft exists for the change.
    pub fn has_draft(&self, change: u64) -> bool {
        self.drafts.contains_key(&change)
    }

    /// Get the draft for a change, if one exists.
    pub fn draft(&self, change: u64) -> Option<&PendingReview> {
        self.drafts.get(&change)
    }

    /// Number of comments staged for the change.
    pub fn comment_count(&self, change: u64) -> usize {
        self.drafts.get(&change).map_or(0, |d| d.comments.len())
    }

    /// Stage a comment, opening a draft for the change if none exists.
    ///
    /// The body must be non-empty after trimming; otherwise nothing is
    /// staged. Returns the comment's local id, usable with
    /// [`ReviewAccumulator::remove_comment`] until submission.
    pub fn add_comment(
        &mut self,
        change: u64,
        path: impl Into<String>,
        position: CommentPosition,
        body: impl Into<String>,
    ) -> Result<Uuid, ReviewError> {
        let body = body.into();
        if body.trim().is_empty() {
            return Err(ReviewError::EmptyCommentBody);
        }

        let comment = PendingComment::new(path, position, body);
        let id = comment.id;
        let draft = self
            .drafts
            .entry(change)
            .or_insert_with(|| PendingReview::new(change));
        draft.comments.push(comment);

        debug!(
            "Staged comment {} for change #{} ({} staged)",
            id,
            change,
            draft.comments.len()
        );
        Ok(id)
    }

    /// Remove a staged comment by its local id.
    ///
    /// Returns whether a comment was removed; an unknown id is a no-op,
    /// not an error.
    pub fn remove_comment(&mut self, change: u64, id: Uuid) -> bool {
        let Some(draft) = self.drafts.get_mut(&change) else {
            return false;
        };
        let before = draft.comments.len();
        draft.comments.retain(|c| c.id != id);
        before != draft.comments.len()
    }

    /// Drop the draft for a change without submitting anything.
    pub fn discard(&mut self, change: u64) {
        if self.drafts.remove(&change).is_some() {
            debug!("Discarded review draft for change #{}", change);
        }
    }

    /// Submit the draft as one review.
    ///
    /// An APPROVE review may be empty. COMMENT and REQUEST_CHANGES need
    /// a non-empty body or at least one staged comment; a validation
    /// failure leaves the draft untouched so the caller can correct and
    /// retry. The draft itself is consumed before the network call and
    /// is not restored if the platform rejects the submission.
    ///
    /// Returns the number of comments included in the review.
    pub async fn submit(
        &mut self,
        change: u64,
        event: ReviewEvent,
        body: Option<&str>,
    ) -> Result<usize, ReviewError> {
        let staged = match self.drafts.get(&change) {
            Some(draft) => draft.comments.len(),
            None => return Err(ReviewError::NoActiveReview(change)),
        };

        let body = body.map(str::trim).filter(|text| !text.is_empty());
        if event != ReviewEvent::Approve && body.is_none() && staged == 0 {
            return Err(ReviewError::EmptySubmission);
        }

        let Some(draft) = self.drafts.remove(&change) else {
            return Err(ReviewError::NoActiveReview(change));
        };
        let comments: Vec<DraftComment> = draft
            .comments
            .iter()
            .map(convert::draft_from_pending)
            .collect();

        self.host
            .submit_review(
                &self.owner,
                &self.repo,
                change,
                convert::event_to_wire(event),
                body,
                &comments,
            )
            .await?;

        info!(
            "Submitted {:?} review with {} comment(s) for change #{}",
            event,
            comments.len(),
            change
        );
        Ok(comments.len())
    }
}
