//! Octocrab-based hosting-platform client
//!
//! Direct implementation of the `HostClient` trait using the octocrab
//! library. Endpoints octocrab does not model (branch comparison,
//! review submission, branch update, comment listing) go through its
//! raw request helpers.

use crate::client::{HostClient, HostError};
use crate::types::{
    ChangedFile, DraftComment, MergeStatus, MergeableState, RemoteFile, ReviewComment,
    ReviewEvent,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Hosting-platform client backed by octocrab
///
/// Holds a shared octocrab instance so callers can clone the client
/// cheaply across tasks.
#[derive(Debug, Clone)]
pub struct OctocrabClient {
    octocrab: Arc<Octocrab>,
}

impl OctocrabClient {
    /// Create a new client with the given octocrab instance
    pub fn new(octocrab: Arc<Octocrab>) -> Self {
        Self { octocrab }
    }

    /// Get a reference to the underlying octocrab instance
    pub fn octocrab(&self) -> &Octocrab {
        &self.octocrab
    }

    async fn compare(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> Result<CompareResponse, HostError> {
        // Use a raw GET since octocrab doesn't model the compare endpoint
        let route = format!("/repos/{}/{}/compare/{}...{}", owner, repo, base, head);
        self.octocrab
            .get(route, None::<&()>)
            .await
            .map_err(map_host_error)
    }
}

#[async_trait]
impl HostClient for OctocrabClient {
    async fn fetch_merge_status(
        &self,
        owner: &str,
        repo: &str,
        change: u64,
    ) -> Result<MergeStatus, HostError> {
        debug!("Fetching merge status for {}/{} #{}", owner, repo, change);

        let pr = self
            .octocrab
            .pulls(owner, repo)
            .get(change)
            .await
            .map_err(map_host_error)?;

        let base_ref = pr.base.ref_field.clone();
        let head_ref = pr.head.ref_field.clone();
        let comparison = self.compare(owner, repo, &base_ref, &head_ref).await?;

        Ok(MergeStatus {
            ahead_by: comparison.ahead_by,
            behind_by: comparison.behind_by,
            mergeable: pr.mergeable,
            state: pr
                .mergeable_state
                .as_ref()
                .map(convert_mergeable_state)
                .unwrap_or_default(),
            base_ref,
            head_ref,
            head_sha: pr.head.sha.clone(),
            // GitHub never reports conflicting paths; detection falls
            // back to branch comparison
            conflicting_files: None,
        })
    }

    async fn fetch_changed_files(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> Result<Vec<ChangedFile>, HostError> {
        debug!(
            "Comparing {}...{} in {}/{} for changed files",
            base, head, owner, repo
        );

        let comparison = self.compare(owner, repo, base, head).await?;
        debug!(
            "Comparison returned {} changed file(s)",
            comparison.files.len()
        );

        Ok(comparison.files)
    }

    async fn fetch_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<RemoteFile, HostError> {
        debug!("Fetching {}/{}:{} @ {}", owner, repo, path, git_ref);

        let content = self
            .octocrab
            .repos(owner, repo)
            .get_content()
            .path(path)
            .r#ref(git_ref)
            .send()
            .await
            .map_err(map_host_error)?;

        let item = content
            .items
            .into_iter()
            .next()
            .ok_or_else(|| HostError::NotFound(format!("{} at {}", path, git_ref)))?;

        Ok(RemoteFile {
            path: item.path.clone(),
            sha: item.sha.clone(),
            content: item.decoded_content().unwrap_or_default(),
        })
    }

    async fn put_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: &str,
        content: &str,
        expected_sha: &str,
        message: &str,
    ) -> Result<(), HostError> {
        debug!("Committing {} to {}/{}@{}", path, owner, repo, branch);

        let result = self
            .octocrab
            .repos(owner, repo)
            .update_file(path, message, content, expected_sha)
            .branch(branch)
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) => {
                // GitHub rejects a mismatched blob SHA with 409 Conflict
                if let octocrab::Error::GitHub { source, .. } = &err {
                    if source.status_code.as_u16() == 409 {
                        return Err(HostError::Stale {
                            path: path.to_string(),
                        });
                    }
                }
                Err(map_host_error(err))
            }
        }
    }

    async fn submit_review(
        &self,
        owner: &str,
        repo: &str,
        change: u64,
        event: ReviewEvent,
        body: Option<&str>,
        comments: &[DraftComment],
    ) -> Result<(), HostError> {
        debug!(
            "Submitting {:?} review with {} comment(s) on {}/{} #{}",
            event,
            comments.len(),
            owner,
            repo,
            change
        );

        let submission = ReviewSubmission {
            body,
            event,
            comments,
        };

        // Use a raw POST since octocrab doesn't model review creation
        let route = format!("/repos/{}/{}/pulls/{}/reviews", owner, repo, change);
        let _: serde_json::Value = self
            .octocrab
            .post(route, Some(&submission))
            .await
            .map_err(map_host_error)?;

        Ok(())
    }

    async fn fetch_review_comments(
        &self,
        owner: &str,
        repo: &str,
        change: u64,
    ) -> Result<Vec<ReviewComment>, HostError> {
        debug!("Fetching review comments for {}/{} #{}", owner, repo, change);

        const PER_PAGE: usize = 100;

        let mut comments = Vec::new();
        let mut page_num = 1u32;

        loop {
            let route = format!(
                "/repos/{}/{}/pulls/{}/comments?per_page={}&page={}",
                owner, repo, change, PER_PAGE, page_num
            );
            let batch: Vec<RawReviewComment> = self
                .octocrab
                .get(route, None::<&()>)
                .await
                .map_err(map_host_error)?;

            let batch_len = batch.len();
            comments.extend(batch.into_iter().map(convert_review_comment));

            if batch_len < PER_PAGE {
                break;
            }
            page_num += 1;
        }

        debug!(
            "Fetched {} review comment(s) for {}/{} #{}",
            comments.len(),
            owner,
            repo,
            change
        );
        Ok(comments)
    }

    async fn update_branch(
        &self,
        owner: &str,
        repo: &str,
        change: u64,
    ) -> Result<(), HostError> {
        debug!("Updating branch of {}/{} #{}", owner, repo, change);

        // Use a raw PUT since octocrab doesn't model the update-branch
        // endpoint; GitHub answers 202 with a message body
        let route = format!("/repos/{}/{}/pulls/{}/update-branch", owner, repo, change);
        let _: serde_json::Value = self
            .octocrab
            .put(route, None::<&()>)
            .await
            .map_err(map_host_error)?;

        Ok(())
    }
}

/// Response body of the branch comparison endpoint
#[derive(Debug, Deserialize)]
struct CompareResponse {
    ahead_by: u64,
    behind_by: u64,
    #[serde(default)]
    files: Vec<ChangedFile>,
}

/// Review submission payload for the reviews endpoint
#[derive(Debug, Serialize)]
struct ReviewSubmission<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<&'a str>,
    event: ReviewEvent,
    comments: &'a [DraftComment],
}

/// Wire shape of a review comment, with the author nested under `user`
#[derive(Debug, Deserialize)]
struct RawReviewComment {
    id: u64,
    path: String,
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    original_line: Option<u32>,
    #[serde(default)]
    position: Option<u32>,
    #[serde(default)]
    side: Option<String>,
    body: String,
    user: Option<RawUser>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    login: String,
}

/// Flatten the wire comment into our ReviewComment type
fn convert_review_comment(raw: RawReviewComment) -> ReviewComment {
    ReviewComment {
        id: raw.id,
        path: raw.path,
        line: raw.line,
        original_line: raw.original_line,
        position: raw.position,
        side: raw.side,
        body: raw.body,
        author: raw
            .user
            .map(|u| u.login)
            .unwrap_or_else(|| "unknown".to_string()),
        created_at: raw.created_at,
        updated_at: raw.updated_at,
    }
}

/// Convert octocrab MergeableState enum to our enum
fn convert_mergeable_state(state: &octocrab::models::pulls::MergeableState) -> MergeableState {
    use octocrab::models::pulls::MergeableState as OMS;
    match state {
        OMS::Clean => MergeableState::Clean,
        OMS::Behind => MergeableState::Behind,
        OMS::Dirty => MergeableState::Dirty,
        OMS::Blocked => MergeableState::Blocked,
        OMS::Unstable => MergeableState::Unstable,
        OMS::Unknown => MergeableState::Unknown,
        _ => MergeableState::Unknown,
    }
}

/// Translate an octocrab error into a HostError
fn map_host_error(err: octocrab::Error) -> HostError {
    match err {
        octocrab::Error::GitHub { source, .. } => {
            let status = source.status_code.as_u16();
            let message = source.message.clone();
            match status {
                404 => HostError::NotFound(message),
                401 => HostError::Unauthorized(message),
                403 if message.to_lowercase().contains("rate limit") => {
                    HostError::RateLimited(message)
                }
                403 => HostError::Unauthorized(message),
                429 => HostError::RateLimited(message),
                _ => HostError::Api { status, message },
            }
        }
        other => HostError::Transport(other.to_string()),
    }
}
