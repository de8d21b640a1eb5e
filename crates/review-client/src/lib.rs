//! Hosting-platform client for the review engine
//!
//! This crate provides a trait-based client for the handful of
//! platform operations the review and conflict engines need: merge
//! status, branch comparison, conditional file writes, and review
//! submission. The trait keeps the engines testable against scripted
//! doubles while production code talks to GitHub through octocrab.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │               HostClient trait                   │
//! │  - fetch_merge_status()                          │
//! │  - fetch_changed_files()                         │
//! │  - fetch_file() / put_file()                     │
//! │  - submit_review() / fetch_review_comments()     │
//! │  - update_branch()                               │
//! └─────────────────────────────────────────────────┘
//!                        │
//!                        ▼
//!              ┌─────────────────┐
//!              │ OctocrabClient  │
//!              │ (direct API)    │
//!              └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use review_client::{HostClient, OctocrabClient};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let octocrab = octocrab::Octocrab::builder()
//!     .personal_token("token".to_string())
//!     .build()?;
//!
//! let client = OctocrabClient::new(Arc::new(octocrab));
//! let status = client.fetch_merge_status("owner", "repo", 42).await?;
//! println!("behind by {} commit(s)", status.behind_by);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod octocrab_client;
pub mod types;

pub use client::{HostClient, HostError};
pub use octocrab_client::OctocrabClient;
pub use types::{
    ChangeStatus, ChangedFile, DraftComment, MergeStatus, MergeableState, RemoteFile,
    ReviewComment, ReviewEvent,
};

// Re-export octocrab so consumers don't need to depend on it directly
pub use octocrab;
