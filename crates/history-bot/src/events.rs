//! Webhook payloads
//!
//! Only the fields the handlers read are modelled; everything else in
//! the GitHub payload is ignored on deserialization.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    pub owner: User,
    #[serde(default)]
    pub default_branch: Option<String>,
}

impl Repository {
    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner.login, self.name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub number: u64,
    /// Present only when the issue is a pull request
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl Issue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.as_ref().is_some_and(|links| !links.is_null())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub body: String,
    pub user: User,
}

/// `issue_comment` event
#[derive(Debug, Clone, Deserialize)]
pub struct IssueCommentEvent {
    #[serde(default)]
    pub action: Option<String>,
    pub issue: Issue,
    pub comment: Comment,
    pub repository: Repository,
}

/// `create` event (branch or tag)
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEvent {
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub ref_type: String,
    pub repository: Repository,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub draft: bool,
}

/// `release` event
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseEvent {
    pub action: String,
    pub release: Release,
    pub repository: Repository,
}

/// Deserialize a webhook payload
pub fn from_json<T: DeserializeOwned>(payload: &str) -> Result<T> {
    serde_json::from_str(payload).context("Failed to parse webhook payload")
}
