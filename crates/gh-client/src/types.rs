//! GitHub API data transfer objects
//!
//! These types represent the data exchanged with the GitHub API.
//! They are intentionally separate from the bot's domain types
//! to keep this crate pure and reusable.

use gh_bot_config::Committer;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A pull request from the GitHub API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number (e.g., 123)
    pub number: u64,

    /// PR title
    pub title: String,

    /// HEAD branch name (e.g., "feature/foo")
    pub head_branch: String,

    /// Login of the owner of the repository the HEAD branch lives in.
    /// Differs from the base owner for pull requests from forks; None
    /// when the fork has been deleted.
    pub head_repo_owner: Option<String>,

    /// Base branch name (e.g., "main")
    pub base_branch: String,

    /// PR URL for opening in browser
    pub html_url: String,
}

/// Result of a merge operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeResult {
    /// Whether the merge was successful
    pub merged: bool,
    /// Commit SHA of the merge commit (if successful)
    pub sha: Option<String>,
    /// Message from the merge operation
    pub message: Option<String>,
}

/// A file read from a repository, with the blob SHA needed to update it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    /// Decoded UTF-8 content
    pub content: String,
    /// Blob SHA of the content
    pub sha: String,
}

/// A conditional write of a repository file
///
/// The write only succeeds if the file's current blob SHA still equals
/// `expected_sha` (or, when `expected_sha` is None, if the file does not
/// exist yet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpdate {
    pub path: String,
    pub branch: String,
    pub content: String,
    pub expected_sha: Option<String>,
    pub message: String,
    pub committer: Committer,
}

/// Rejection of a [`FileUpdate`] because the file changed since it was read
///
/// Returned inside the `anyhow::Error` of `update_file`; check for it with
/// `err.downcast_ref::<ContentConflict>()`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{path} changed since it was read (expected sha {expected:?})")]
pub struct ContentConflict {
    pub path: String,
    pub expected: Option<String>,
}

/// A user's permission on a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionLevel {
    /// No access
    None,
    /// Can read and clone
    Read,
    /// Can manage issues and pull requests without write access
    Triage,
    /// Can push
    Write,
    /// Can push and manage the repository without admin rights
    Maintain,
    /// Full access
    Admin,
}

impl PermissionLevel {
    /// Parse the `permission`/`role_name` value returned by GitHub
    pub fn from_api(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "admin" => PermissionLevel::Admin,
            "maintain" => PermissionLevel::Maintain,
            "write" | "push" => PermissionLevel::Write,
            "triage" => PermissionLevel::Triage,
            "read" | "pull" => PermissionLevel::Read,
            _ => PermissionLevel::None,
        }
    }

    /// Whether this level allows pushing (and therefore merging)
    pub fn can_push(&self) -> bool {
        *self >= PermissionLevel::Write
    }
}

/// A release to create for a tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRelease {
    /// Tag the release points at (e.g. "v3.0.1")
    pub tag: String,
    /// Release title
    pub name: String,
    /// Markdown body
    pub body: String,
    /// Whether GitHub should flag the release as a prerelease
    pub prerelease: bool,
}

/// A repository milestone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub number: u64,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_from_api() {
        assert_eq!(PermissionLevel::from_api("admin"), PermissionLevel::Admin);
        assert_eq!(PermissionLevel::from_api("Write"), PermissionLevel::Write);
        assert_eq!(PermissionLevel::from_api("push"), PermissionLevel::Write);
        assert_eq!(PermissionLevel::from_api("read"), PermissionLevel::Read);
        assert_eq!(PermissionLevel::from_api("none"), PermissionLevel::None);
        assert_eq!(PermissionLevel::from_api("bogus"), PermissionLevel::None);
    }

    #[test]
    fn test_permission_can_push() {
        assert!(PermissionLevel::Admin.can_push());
        assert!(PermissionLevel::Maintain.can_push());
        assert!(PermissionLevel::Write.can_push());
        assert!(!PermissionLevel::Triage.can_push());
        assert!(!PermissionLevel::Read.can_push());
        assert!(!PermissionLevel::None.can_push());
    }

    #[test]
    fn test_content_conflict_downcast() {
        let err: anyhow::Error = ContentConflict {
            path: "History.markdown".to_string(),
            expected: Some("abc".to_string()),
        }
        .into();
        assert!(err.downcast_ref::<ContentConflict>().is_some());
    }
}
