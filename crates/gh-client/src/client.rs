//! GitHub client trait
//!
//! This module defines the core `GitHubClient` trait: the narrow set of
//! repository, pull request, label, ref and release operations the bot
//! depends on.

use crate::types::{
    FileContent, FileUpdate, MergeResult, Milestone, NewRelease, PermissionLevel, PullRequest,
};
use async_trait::async_trait;
use gh_bot_config::MergeMethod;

/// GitHub API client trait
///
/// Defines the interface for interacting with the GitHub API.
/// Implementations can hit the API directly or be test doubles.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks and threads.
///
/// # Example
///
/// ```rust,ignore
/// use gh_client::GitHubClient;
///
/// async fn title(client: &dyn GitHubClient) -> anyhow::Result<String> {
///     Ok(client.fetch_pull_request("jekyll", "jekyll", 4104).await?.title)
/// }
/// ```
#[async_trait]
pub trait GitHubClient: Send + Sync {
    // === PR Operations ===

    /// Fetch a single pull request by number
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `pr_number` - Pull request number
    ///
    /// # Returns
    ///
    /// The pull request details, or an error if not found.
    async fn fetch_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<PullRequest>;

    /// Merge a pull request
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `pr_number` - Pull request number
    /// * `merge_method` - How to merge (merge commit, squash, or rebase)
    /// * `commit_title` - Optional custom commit title
    /// * `commit_message` - Optional custom commit message
    ///
    /// # Returns
    ///
    /// Result of the merge operation
    async fn merge_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        merge_method: MergeMethod,
        commit_title: Option<&str>,
        commit_message: Option<&str>,
    ) -> anyhow::Result<MergeResult>;

    /// Delete a branch (`refs/heads/<branch>`)
    async fn delete_branch(&self, owner: &str, repo: &str, branch: &str) -> anyhow::Result<()>;

    /// Add labels to an issue or pull request
    async fn add_labels(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        labels: &[String],
    ) -> anyhow::Result<()>;

    // === Contents ===

    /// Read a file from a branch
    ///
    /// # Returns
    ///
    /// The decoded content and its blob SHA, or `None` if the file does
    /// not exist on that branch.
    async fn fetch_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: &str,
    ) -> anyhow::Result<Option<FileContent>>;

    /// Write a file, guarded by the SHA it was read at
    ///
    /// Fails with a [`ContentConflict`](crate::ContentConflict) inside the
    /// error when the file changed since `update.expected_sha` was read.
    ///
    /// # Returns
    ///
    /// The blob SHA of the new content
    async fn update_file(
        &self,
        owner: &str,
        repo: &str,
        update: &FileUpdate,
    ) -> anyhow::Result<String>;

    // === Access ===

    /// Fetch a user's permission level on a repository
    async fn fetch_permission(
        &self,
        owner: &str,
        repo: &str,
        login: &str,
    ) -> anyhow::Result<PermissionLevel>;

    /// Whether a user may push to (and therefore merge into) a repository
    async fn has_push_access(&self, owner: &str, repo: &str, login: &str) -> anyhow::Result<bool> {
        Ok(self.fetch_permission(owner, repo, login).await?.can_push())
    }

    // === Releases ===

    /// Create a published (non-draft) release
    async fn create_release(
        &self,
        owner: &str,
        repo: &str,
        release: &NewRelease,
    ) -> anyhow::Result<()>;

    /// Fetch all open milestones, following pagination
    async fn fetch_open_milestones(&self, owner: &str, repo: &str)
        -> anyhow::Result<Vec<Milestone>>;

    /// Close a milestone
    async fn close_milestone(&self, owner: &str, repo: &str, number: u64) -> anyhow::Result<()>;
}
