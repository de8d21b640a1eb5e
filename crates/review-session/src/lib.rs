//! Review and conflict-resolution workflows
//!
//! This crate hosts the two stateful engines sitting between the UI and
//! the hosting platform: the [`ReviewAccumulator`], which stages inline
//! comments per change and submits them as one atomic review, and the
//! [`ConflictCoordinator`], which detects conflicting files between a
//! change's branches, drives sequential per-file resolution, and
//! commits the results under compare-and-swap protection.
//!
//! Both engines work against the [`review_client::HostClient`] trait,
//! so they run identically against GitHub and against scripted test
//! doubles.
//!
//! # Example
//!
//! ```rust,no_run
//! use review_client::{octocrab, OctocrabClient};
//! use review_diff::{CommentPosition, DiffSide, ReviewEvent};
//! use review_session::{ConflictCoordinator, MergeHealth, ReviewAccumulator};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let octocrab = octocrab::Octocrab::builder()
//!     .personal_token("token".to_string())
//!     .build()?;
//! let host = Arc::new(OctocrabClient::new(Arc::new(octocrab)));
//!
//! // Stage comments and submit them as one review
//! let mut review = ReviewAccumulator::new(host.clone(), "acme", "widgets");
//! review.add_comment(
//!     42,
//!     "src/lib.rs",
//!     CommentPosition::single(DiffSide::Right, 10),
//!     "typo: recieve",
//! )?;
//! review.submit(42, ReviewEvent::Approve, None).await?;
//!
//! // Resolve merge conflicts on the same change
//! let mut conflicts = ConflictCoordinator::new(host, "acme", "widgets", 42);
//! if conflicts.refresh_status().await? == MergeHealth::HasConflicts {
//!     conflicts.begin_resolution().await?;
//!     while let Some(file) = conflicts.current_file().cloned() {
//!         // A real caller would present both versions for merging
//!         conflicts.resolve_current(file.ours_content).await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod accumulator;
pub mod conflict;
pub mod convert;

pub use accumulator::{PendingReview, ReviewAccumulator, ReviewError};
pub use conflict::{
    CommitOutcome, ConflictCoordinator, ConflictError, ConflictFile, ConflictPhase, MergeHealth,
    ResolutionSession, ResolutionStep,
};

// Re-export the engine crates so consumers don't need to depend on them
// directly
pub use review_client;
pub use review_diff;
