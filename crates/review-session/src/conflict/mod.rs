//! Merge-conflict resolution workflow
//!
//! Detects which files conflict between a change's branches, drives a
//! strictly sequential per-file resolution, and writes the resolved
//! content back under compare-and-swap protection.

mod coordinator;
mod session;

pub use coordinator::{
    CommitOutcome, ConflictCoordinator, ConflictError, ConflictPhase, ResolutionStep,
};
pub use session::ResolutionSession;

use review_client::types::{MergeStatus, MergeableState};

/// Overall merge health of a change, distilled from platform status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeHealth {
    /// Mergeable as-is.
    Clean,
    /// No conflicts, but the head branch is missing base commits.
    Behind,
    /// Textual conflicts must be resolved before merging.
    HasConflicts,
    /// The platform has not (yet) computed mergeability.
    Unknown,
}

impl MergeHealth {
    /// Distill the platform's merge state into an actionable category.
    ///
    /// Blocked and unstable states concern reviews and CI, not text
    /// conflicts; for those the `mergeable` flag decides.
    pub fn classify(status: &MergeStatus) -> Self {
        match status.state {
            MergeableState::Dirty => MergeHealth::HasConflicts,
            MergeableState::Behind => MergeHealth::Behind,
            MergeableState::Clean => MergeHealth::Clean,
            MergeableState::Blocked | MergeableState::Unstable | MergeableState::Unknown => {
                match status.mergeable {
                    Some(true) => MergeHealth::Clean,
                    Some(false) => MergeHealth::HasConflicts,
                    None => MergeHealth::Unknown,
                }
            }
        }
    }
}

/// One file of a resolution session: both branch versions of it.
///
/// "Ours" is the head (change) branch, "theirs" the base branch. A side
/// whose fetch failed is recorded as absent with empty content rather
/// than failing the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictFile {
    /// Path relative to the repository root.
    pub path: String,
    /// Head-branch content; empty when absent on that side.
    pub ours_content: String,
    /// Base-branch content; empty when absent on that side.
    pub theirs_content: String,
    /// Whether the head-side fetch succeeded.
    pub ours_exists: bool,
    /// Whether the base-side fetch succeeded.
    pub theirs_exists: bool,
}
