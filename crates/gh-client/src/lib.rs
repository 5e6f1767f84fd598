//! Narrow GitHub API client
//!
//! This crate provides a trait-based GitHub API client covering what the
//! history bot needs: pull requests, merges, labels, branch refs, file
//! contents, collaborator permissions, releases and milestones.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              GitHubClient trait                  │
//! │  - merge_pull_request()                          │
//! │  - fetch_file() / update_file()                  │
//! │  - create_release()                              │
//! └─────────────────────────────────────────────────┘
//!                        │
//!        ┌───────────────┴───────────────┐
//!        ▼                               ▼
//! ┌─────────────────┐         ┌─────────────────────┐
//! │ OctocrabClient  │         │ test doubles        │
//! │ (direct API)    │         │ (in-memory)         │
//! └─────────────────┘         └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_client::GitHubClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = gh_client::connect(None).await?;
//! let history = client
//!     .fetch_file("jekyll", "jekyll", "History.markdown", "master")
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod octocrab_client;
pub mod types;

/// Default GitHub host (public GitHub)
pub const DEFAULT_HOST: &str = "github.com";

pub use auth::{build_client, connect, TokenResolver};
pub use client::GitHubClient;
pub use octocrab_client::OctocrabClient;
pub use types::{
    ContentConflict, FileContent, FileUpdate, MergeResult, Milestone, NewRelease,
    PermissionLevel, PullRequest,
};

// Re-export config types that appear in the trait signatures
pub use gh_bot_config::{Committer, MergeMethod};

// Re-export octocrab so consumers don't need to depend on it directly
pub use octocrab;
