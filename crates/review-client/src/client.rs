//! Hosting-platform client abstraction
//!
//! Defines the [`HostClient`] trait that the review and conflict
//! engines depend on. Production code uses the octocrab-backed
//! implementation; tests substitute scripted doubles.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{
    ChangedFile, DraftComment, MergeStatus, RemoteFile, ReviewComment, ReviewEvent,
};

/// Errors from hosting-platform operations
#[derive(Debug, Error)]
pub enum HostError {
    /// The requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A compare-and-swap write was rejected because the version token
    /// no longer matches the branch tip
    #[error("Stale write rejected for '{path}'")]
    Stale {
        /// Path whose version token was out of date
        path: String,
    },

    /// The platform rate limit was hit
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Authentication or permission failure
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Any other API-level failure
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the platform
        status: u16,
        /// Error message from the response body
        message: String,
    },

    /// Network or protocol failure before an API response was received
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Trait for hosting-platform operations used by the review engine
///
/// All methods return owned data so implementations are free to
/// deserialize, decode, and convert without lifetime entanglement.
#[async_trait]
pub trait HostClient: Send + Sync {
    /// Fetch the merge status of a change against its base branch
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `change` - Change (pull request) number
    ///
    /// # Returns
    ///
    /// The change's merge status, including ahead/behind counts and
    /// mergeability
    async fn fetch_merge_status(
        &self,
        owner: &str,
        repo: &str,
        change: u64,
    ) -> Result<MergeStatus, HostError>;

    /// Compare two branch tips and list the files that differ
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `base` - Base branch name
    /// * `head` - Head branch name
    ///
    /// # Returns
    ///
    /// Per-file change entries with patch fragments where available
    async fn fetch_changed_files(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> Result<Vec<ChangedFile>, HostError>;

    /// Fetch a file's content and version token at a given ref
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `path` - File path relative to the repository root
    /// * `git_ref` - Branch name or commit SHA to read from
    ///
    /// # Returns
    ///
    /// The decoded file content together with its version token
    async fn fetch_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<RemoteFile, HostError>;

    /// Write new content to a file on a branch, guarded by a version token
    ///
    /// The write succeeds only if `expected_sha` still identifies the
    /// file's current content on the branch; otherwise the platform
    /// rejects it and this returns [`HostError::Stale`].
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `path` - File path relative to the repository root
    /// * `branch` - Branch to commit to
    /// * `content` - New file content
    /// * `expected_sha` - Version token the write is conditioned on
    /// * `message` - Commit message
    ///
    /// # Returns
    ///
    /// Ok(()) on success, error on failure
    #[allow(clippy::too_many_arguments)]
    async fn put_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: &str,
        content: &str,
        expected_sha: &str,
        message: &str,
    ) -> Result<(), HostError>;

    /// Submit a review with its drafted inline comments in one call
    ///
    /// The event and all comments are published atomically: either the
    /// whole review lands or none of it does.
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `change` - Change (pull request) number
    /// * `event` - Review verdict to attach
    /// * `body` - Optional top-level review body
    /// * `comments` - Drafted inline comments to publish with the review
    ///
    /// # Returns
    ///
    /// Ok(()) on success, error on failure
    async fn submit_review(
        &self,
        owner: &str,
        repo: &str,
        change: u64,
        event: ReviewEvent,
        body: Option<&str>,
        comments: &[DraftComment],
    ) -> Result<(), HostError>;

    /// Fetch review comments for a change
    ///
    /// Returns all published inline comments, across all pages.
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `change` - Change (pull request) number
    ///
    /// # Returns
    ///
    /// List of review comments on the change
    async fn fetch_review_comments(
        &self,
        owner: &str,
        repo: &str,
        change: u64,
    ) -> Result<Vec<ReviewComment>, HostError>;

    /// Update the change's head branch with the latest from base branch
    ///
    /// This is equivalent to clicking "Update branch" in the GitHub UI.
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `change` - Change (pull request) number
    ///
    /// # Returns
    ///
    /// Ok(()) on success, error on failure
    async fn update_branch(&self, owner: &str, repo: &str, change: u64)
        -> Result<(), HostError>;
}
