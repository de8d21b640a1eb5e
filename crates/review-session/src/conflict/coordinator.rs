//! Conflict-resolution coordination.
//!
//! The coordinator owns the workflow state machine for one change:
//! status inspection, candidate discovery, sequential resolution and
//! the commit phase. Every remote write is guarded by a version token
//! fetched immediately before that write.

use std::sync::Arc;

use log::{debug, info, warn};
use review_client::types::{ChangeStatus, MergeStatus};
use review_client::{HostClient, HostError};
use thiserror::Error;

use super::session::ResolutionSession;
use super::{ConflictFile, MergeHealth};

/// Errors from the conflict-resolution workflow
#[derive(Debug, Error)]
pub enum ConflictError {
    /// An operation needed merge status that has not been loaded.
    #[error("Merge status has not been loaded")]
    NoStatus,

    /// Resolution was requested but the change has no conflicts.
    #[error("Change #{0} has no merge conflicts")]
    NotConflicted(u64),

    /// Fast-forward was requested but the change is not merely behind.
    #[error("Change #{0} is not behind its base branch")]
    NotBehind(u64),

    /// Resolution was requested while a session is already active.
    #[error("A resolution session is already active")]
    SessionActive,

    /// An operation needed an active resolution session.
    #[error("No resolution session is active")]
    NoSession,

    /// No file suitable for a textual merge was identified.
    #[error("Could not identify conflicting files; resolve out of band")]
    DetectionAmbiguous,

    /// A commit was rejected because the file changed remotely between
    /// the pre-write fetch and the write itself.
    #[error("Remote content for '{path}' changed during commit; {committed} file(s) were committed")]
    StaleWrite {
        /// File whose write was rejected.
        path: String,
        /// Files successfully committed before the failure.
        committed: usize,
    },

    /// The pre-write fetch of a file failed during the commit phase.
    #[error("Failed to re-fetch '{path}' during commit; {committed} file(s) were committed")]
    CommitFetch {
        /// File whose fetch failed.
        path: String,
        /// Files successfully committed before the failure.
        committed: usize,
        #[source]
        source: HostError,
    },

    /// A write failed during the commit phase for a reason other than
    /// staleness.
    #[error("Failed to write '{path}' during commit; {committed} file(s) were committed")]
    CommitWrite {
        /// File whose write failed.
        path: String,
        /// Files successfully committed before the failure.
        committed: usize,
        #[source]
        source: HostError,
    },

    /// A platform operation failed outside the commit phase.
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Internal workflow state. The session only exists while resolving;
/// the loaded status travels with it so commits target the right refs.
enum Phase {
    Idle,
    StatusLoaded {
        status: MergeStatus,
        health: MergeHealth,
    },
    Resolving {
        status: MergeStatus,
        session: ResolutionSession,
    },
}

/// Externally visible workflow phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPhase {
    /// No merge status loaded yet.
    Idle,
    /// Merge status known; no resolution session active.
    StatusLoaded(MergeHealth),
    /// A resolution session is active.
    Resolving {
        /// Index of the active file.
        current: usize,
        /// Total files in the session.
        total: usize,
    },
}

/// What happened after resolving the active file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionStep {
    /// More files remain; the file at `index` is now active.
    Next {
        /// Index of the newly active file.
        index: usize,
    },
    /// That was the last file; the commit phase ran to completion.
    Committed(CommitOutcome),
}

/// Result of a fully successful commit phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Number of files written to the head branch.
    pub files_committed: usize,
    /// Merge health according to the post-commit status reload.
    pub health: MergeHealth,
}

/// Drives conflict detection, resolution and commit for one change.
///
/// The workflow is strictly user-paced: every transition is an explicit
/// call, and nothing is retried automatically. A failed run is retried
/// by starting over from [`ConflictCoordinator::refresh_status`].
pub struct ConflictCoordinator {
    host: Arc<dyn HostClient>,
    owner: String,
    repo: String,
    change: u64,
    phase: Phase,
}

impl ConflictCoordinator {
    /// Create a coordinator for one change.
    pub fn new(
        host: Arc<dyn HostClient>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        change: u64,
    ) -> Self {
        Self {
            host,
            owner: owner.into(),
            repo: repo.into(),
            change,
            phase: Phase::Idle,
        }
    }

    /// The change this coordinator operates on.
    pub fn change(&self) -> u64 {
        self.change
    }

    /// Current workflow phase.
    pub fn phase(&self) -> ConflictPhase {
        match &self.phase {
            Phase::Idle => ConflictPhase::Idle,
            Phase::StatusLoaded { health, .. } => ConflictPhase::StatusLoaded(*health),
            Phase::Resolving { session, .. } => ConflictPhase::Resolving {
                current: session.current_index(),
                total: session.len(),
            },
        }
    }

    /// The loaded merge status, if any.
    pub fn merge_status(&self) -> Option<&MergeStatus> {
        match &self.phase {
            Phase::Idle => None,
            Phase::StatusLoaded { status, .. } | Phase::Resolving { status, .. } => Some(status),
        }
    }

    /// The file currently awaiting resolution, if a session is active.
    pub fn current_file(&self) -> Option<&ConflictFile> {
        match &self.phase {
            Phase::Resolving { session, .. } => session.current_file(),
            _ => None,
        }
    }

    /// Load (or reload) the change's merge status and classify it.
    ///
    /// This is the entry point of every run of the workflow. Any active
    /// resolution session is discarded.
    pub async fn refresh_status(&mut self) -> Result<MergeHealth, ConflictError> {
        let status = self
            .host
            .fetch_merge_status(&self.owner, &self.repo, self.change)
            .await?;
        let health = MergeHealth::classify(&status);

        debug!(
            "Merge status for #{}: {:?} (ahead {}, behind {})",
            self.change, health, status.ahead_by, status.behind_by
        );
        self.phase = Phase::StatusLoaded { status, health };
        Ok(health)
    }

    /// Update the head branch with the latest base commits.
    ///
    /// Only legal when the loaded status classified as [`MergeHealth::Behind`];
    /// a behind-but-not-conflicting change needs no resolution session.
    /// Reloads and returns the merge health afterwards.
    pub async fn fast_forward(&mut self) -> Result<MergeHealth, ConflictError> {
        match &self.phase {
            Phase::StatusLoaded {
                health: MergeHealth::Behind,
                ..
            } => {}
            Phase::Idle => return Err(ConflictError::NoStatus),
            Phase::StatusLoaded { .. } | Phase::Resolving { .. } => {
                return Err(ConflictError::NotBehind(self.change))
            }
        }

        self.host
            .update_branch(&self.owner, &self.repo, self.change)
            .await?;
        info!("Fast-forwarded head branch of change #{}", self.change);
        self.refresh_status().await
    }

    /// Identify the conflicting files and open a resolution session.
    ///
    /// Only legal when the loaded status classified as
    /// [`MergeHealth::HasConflicts`]. Candidate paths come from the
    /// platform's conflict list when it provides one, otherwise from a
    /// branch-tip comparison keeping only files modified on both sides.
    /// Each candidate's two versions are fetched; a file enters the
    /// session only if they differ. With no files left the workflow
    /// stays where it was and detection is reported as ambiguous.
    ///
    /// Returns the number of files in the session.
    pub async fn begin_resolution(&mut self) -> Result<usize, ConflictError> {
        let status = match &self.phase {
            Phase::StatusLoaded {
                status,
                health: MergeHealth::HasConflicts,
            } => status.clone(),
            Phase::Idle => return Err(ConflictError::NoStatus),
            Phase::StatusLoaded { .. } => return Err(ConflictError::NotConflicted(self.change)),
            Phase::Resolving { .. } => return Err(ConflictError::SessionActive),
        };

        let candidates = self.candidate_paths(&status).await?;
        debug!(
            "Examining {} candidate file(s) for change #{}",
            candidates.len(),
            self.change
        );

        let mut files = Vec::new();
        for path in candidates {
            let ours = self.fetch_side(&path, &status.head_ref).await;
            let theirs = self.fetch_side(&path, &status.base_ref).await;

            let (ours_exists, ours_content) = match ours {
                Some(content) => (true, content),
                None => (false, String::new()),
            };
            let (theirs_exists, theirs_content) = match theirs {
                Some(content) => (true, content),
                None => (false, String::new()),
            };

            if ours_content == theirs_content {
                debug!("Skipping {}: identical on both branches", path);
                continue;
            }

            files.push(ConflictFile {
                path,
                ours_content,
                theirs_content,
                ours_exists,
                theirs_exists,
            });
        }

        if files.is_empty() {
            return Err(ConflictError::DetectionAmbiguous);
        }

        info!(
            "Resolution session for change #{} covers {} file(s)",
            self.change,
            files.len()
        );
        let total = files.len();
        self.phase = Phase::Resolving {
            status,
            session: ResolutionSession::new(files),
        };
        Ok(total)
    }

    /// Record the final text for the active file and advance.
    ///
    /// While files remain this only mutates the session. Resolving the
    /// last file enters the commit phase immediately: resolved files are
    /// written back in session order, each guarded by a version token
    /// fetched right before its write. There is no cancellation point
    /// inside the commit phase, and a failure aborts the remaining
    /// writes without undoing completed ones. Success and failure both
    /// end the session.
    pub async fn resolve_current(
        &mut self,
        text: impl Into<String>,
    ) -> Result<ResolutionStep, ConflictError> {
        match &mut self.phase {
            Phase::Resolving { session, .. } => {
                if !session.resolve_current(text) {
                    return Err(ConflictError::NoSession);
                }
                if !session.is_complete() {
                    return Ok(ResolutionStep::Next {
                        index: session.current_index(),
                    });
                }
            }
            _ => return Err(ConflictError::NoSession),
        }

        // Last file resolved: the session leaves the state machine and
        // the commit phase runs to completion or first failure
        let Phase::Resolving { status, session } = std::mem::replace(&mut self.phase, Phase::Idle)
        else {
            return Err(ConflictError::NoSession);
        };
        let committed = self.commit_resolved(&status, &session).await?;

        // The commit already happened; a failed reload only degrades the
        // reported health to Unknown
        let health = match self.refresh_status().await {
            Ok(health) => health,
            Err(err) => {
                warn!(
                    "Post-commit status reload failed for change #{}: {}",
                    self.change, err
                );
                MergeHealth::Unknown
            }
        };

        Ok(ResolutionStep::Committed(CommitOutcome {
            files_committed: committed,
            health,
        }))
    }

    /// Abandon the active resolution session.
    ///
    /// All in-memory resolutions are dropped; nothing was written. The
    /// loaded merge status is kept, so a new session can be started
    /// without re-fetching it. A no-op outside the resolution phase;
    /// once the commit phase starts there is nothing left to cancel.
    pub fn cancel(&mut self) {
        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        self.phase = match phase {
            Phase::Resolving { status, .. } => {
                info!("Cancelled resolution session for change #{}", self.change);
                let health = MergeHealth::classify(&status);
                Phase::StatusLoaded { status, health }
            }
            other => other,
        };
    }

    async fn candidate_paths(&self, status: &MergeStatus) -> Result<Vec<String>, ConflictError> {
        if let Some(server_list) = &status.conflicting_files {
            if !server_list.is_empty() {
                debug!(
                    "Using server-provided conflict list ({} path(s))",
                    server_list.len()
                );
                return Ok(server_list.clone());
            }
        }

        let changed = self
            .host
            .fetch_changed_files(&self.owner, &self.repo, &status.base_ref, &status.head_ref)
            .await?;

        // Only files present on both sides can host a textual merge;
        // additions and removals have nothing to merge against
        Ok(changed
            .into_iter()
            .filter(|file| file.status == ChangeStatus::Modified)
            .map(|file| file.path)
            .collect())
    }

    /// Fetch one side of a candidate file. Any failure means the file is
    /// treated as absent on that side, never as a fatal error.
    async fn fetch_side(&self, path: &str, git_ref: &str) -> Option<String> {
        match self
            .host
            .fetch_file(&self.owner, &self.repo, path, git_ref)
            .await
        {
            Ok(file) => Some(file.content),
            Err(err) => {
                debug!("Treating {} as absent on {}: {}", path, git_ref, err);
                None
            }
        }
    }

    async fn commit_resolved(
        &self,
        status: &MergeStatus,
        session: &ResolutionSession,
    ) -> Result<usize, ConflictError> {
        let branch = &status.head_ref;
        let mut committed = 0usize;

        for (path, text) in session.resolved_in_order() {
            // The token must come from a fetch made immediately before
            // this write; the one taken at session start may be stale
            let fresh = match self
                .host
                .fetch_file(&self.owner, &self.repo, path, branch)
                .await
            {
                Ok(file) => file,
                Err(source) => {
                    return Err(ConflictError::CommitFetch {
                        path: path.to_string(),
                        committed,
                        source,
                    });
                }
            };

            let message = format!("Resolve merge conflict in {}", path);
            match self
                .host
                .put_file(&self.owner, &self.repo, path, branch, text, &fresh.sha, &message)
                .await
            {
                Ok(()) => {
                    committed += 1;
                    debug!(
                        "Committed resolution {}/{}: {}",
                        committed,
                        session.len(),
                        path
                    );
                }
                Err(HostError::Stale { .. }) => {
                    return Err(ConflictError::StaleWrite {
                        path: path.to_string(),
                        committed,
                    });
                }
                Err(source) => {
                    return Err(ConflictError::CommitWrite {
                        path: path.to_string(),
                        committed,
                        source,
                    });
                }
            }
        }

        info!(
            "Committed {} resolved file(s) for change #{}",
            committed, self.change
        );
        Ok(committed)
    }
}
