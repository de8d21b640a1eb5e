//! Scripted host double shared by the workflow tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use review_client::types::{
    ChangeStatus, ChangedFile, DraftComment, MergeStatus, MergeableState, RemoteFile,
    ReviewComment, ReviewEvent,
};
use review_client::{HostClient, HostError};

/// One recorded host call, for asserting order and payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    FetchMergeStatus {
        change: u64,
    },
    FetchChangedFiles {
        base: String,
        head: String,
    },
    FetchFile {
        path: String,
        git_ref: String,
    },
    PutFile {
        path: String,
        branch: String,
        content: String,
        expected_sha: String,
        message: String,
    },
    SubmitReview {
        change: u64,
        event: ReviewEvent,
        body: Option<String>,
        comments: Vec<DraftComment>,
    },
    FetchReviewComments {
        change: u64,
    },
    UpdateBranch {
        change: u64,
    },
}

#[derive(Default)]
struct Inner {
    calls: Vec<HostCall>,
    merge_status: Option<MergeStatus>,
    changed_files: Vec<ChangedFile>,
    // (path, ref) -> file; a missing key makes the fetch fail
    files: HashMap<(String, String), RemoteFile>,
    review_comments: Vec<ReviewComment>,
    fail_submissions: bool,
    stale_paths: Vec<String>,
    failing_put_paths: Vec<String>,
}

/// Scripted [`HostClient`] double.
///
/// Responses are programmed up front; every call is recorded so tests
/// can assert exactly what reached the platform, and in which order.
#[derive(Default)]
pub struct ScriptedHost {
    inner: Mutex<Inner>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_merge_status(&self, status: MergeStatus) {
        self.inner.lock().unwrap().merge_status = Some(status);
    }

    /// Make status fetches fail from now on.
    pub fn clear_merge_status(&self) {
        self.inner.lock().unwrap().merge_status = None;
    }

    pub fn set_changed_files(&self, files: Vec<ChangedFile>) {
        self.inner.lock().unwrap().changed_files = files;
    }

    /// Seed (or move) a file's content and version token on a ref.
    pub fn set_file(&self, path: &str, git_ref: &str, sha: &str, content: &str) {
        self.inner.lock().unwrap().files.insert(
            (path.to_string(), git_ref.to_string()),
            RemoteFile {
                path: path.to_string(),
                sha: sha.to_string(),
                content: content.to_string(),
            },
        );
    }

    /// Make fetches of this (path, ref) fail from now on.
    pub fn remove_file(&self, path: &str, git_ref: &str) {
        self.inner
            .lock()
            .unwrap()
            .files
            .remove(&(path.to_string(), git_ref.to_string()));
    }

    pub fn set_review_comments(&self, comments: Vec<ReviewComment>) {
        self.inner.lock().unwrap().review_comments = comments;
    }

    /// Make every review submission fail with a transport error.
    pub fn fail_submissions(&self) {
        self.inner.lock().unwrap().fail_submissions = true;
    }

    /// Make writes to this path fail the compare-and-swap check.
    pub fn mark_stale(&self, path: &str) {
        self.inner.lock().unwrap().stale_paths.push(path.to_string());
    }

    /// Make writes to this path fail with a transport error.
    pub fn fail_put(&self, path: &str) {
        self.inner
            .lock()
            .unwrap()
            .failing_put_paths
            .push(path.to_string());
    }

    /// Everything that was called, in order.
    pub fn calls(&self) -> Vec<HostCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Only the writes, in order.
    pub fn put_calls(&self) -> Vec<HostCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, HostCall::PutFile { .. }))
            .collect()
    }
}

#[async_trait]
impl HostClient for ScriptedHost {
    async fn fetch_merge_status(
        &self,
        _owner: &str,
        _repo: &str,
        change: u64,
    ) -> Result<MergeStatus, HostError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(HostCall::FetchMergeStatus { change });
        inner
            .merge_status
            .clone()
            .ok_or_else(|| HostError::NotFound(format!("change #{}", change)))
    }

    async fn fetch_changed_files(
        &self,
        _owner: &str,
        _repo: &str,
        base: &str,
        head: &str,
    ) -> Result<Vec<ChangedFile>, HostError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(HostCall::FetchChangedFiles {
            base: base.to_string(),
            head: head.to_string(),
        });
        Ok(inner.changed_files.clone())
    }

    async fn fetch_file(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<RemoteFile, HostError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(HostCall::FetchFile {
            path: path.to_string(),
            git_ref: git_ref.to_string(),
        });
        inner
            .files
            .get(&(path.to_string(), git_ref.to_string()))
            .cloned()
            .ok_or_else(|| HostError::NotFound(format!("{} at {}", path, git_ref)))
    }

    async fn put_file(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        branch: &str,
        content: &str,
        expected_sha: &str,
        message: &str,
    ) -> Result<(), HostError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(HostCall::PutFile {
            path: path.to_string(),
            branch: branch.to_string(),
            content: content.to_string(),
            expected_sha: expected_sha.to_string(),
            message: message.to_string(),
        });
        if inner.stale_paths.iter().any(|p| p == path) {
            return Err(HostError::Stale {
                path: path.to_string(),
            });
        }
        if inner.failing_put_paths.iter().any(|p| p == path) {
            return Err(HostError::Transport("connection reset".to_string()));
        }
        Ok(())
    }

    async fn submit_review(
        &self,
        _owner: &str,
        _repo: &str,
        change: u64,
        event: ReviewEvent,
        body: Option<&str>,
        comments: &[DraftComment],
    ) -> Result<(), HostError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(HostCall::SubmitReview {
            change,
            event,
            body: body.map(str::to_string),
            comments: comments.to_vec(),
        });
        if inner.fail_submissions {
            return Err(HostError::Transport("connection reset".to_string()));
        }
        Ok(())
    }

    async fn fetch_review_comments(
        &self,
        _owner: &str,
        _repo: &str,
        change: u64,
    ) -> Result<Vec<ReviewComment>, HostError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(HostCall::FetchReviewComments { change });
        Ok(inner.review_comments.clone())
    }

    async fn update_branch(
        &self,
        _owner: &str,
        _repo: &str,
        change: u64,
    ) -> Result<(), HostError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(HostCall::UpdateBranch { change });
        Ok(())
    }
}

/// Merge status fixture targeting `main` <- `feature/conflicts`.
pub fn merge_status(state: MergeableState, mergeable: Option<bool>) -> MergeStatus {
    MergeStatus {
        ahead_by: 1,
        behind_by: 2,
        mergeable,
        state,
        base_ref: "main".to_string(),
        head_ref: "feature/conflicts".to_string(),
        head_sha: "1111111".to_string(),
        conflicting_files: None,
    }
}

/// Comparison entry fixture with the given status and no patch.
pub fn changed_file(path: &str, status: ChangeStatus) -> ChangedFile {
    ChangedFile {
        path: path.to_string(),
        previous_path: None,
        status,
        additions: 1,
        deletions: 1,
        patch: None,
    }
}
