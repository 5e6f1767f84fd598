//! Octocrab-based GitHub API client
//!
//! Direct implementation of the `GitHubClient` trait using the octocrab library.

use crate::client::GitHubClient;
use crate::types::{
    ContentConflict, FileContent, FileUpdate, MergeResult, Milestone, NewRelease,
    PermissionLevel, PullRequest,
};
use async_trait::async_trait;
use base64::Engine;
use gh_bot_config::{Committer, MergeMethod};
use log::debug;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Direct GitHub API client using octocrab
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
}

/// Body of `PUT /repos/{owner}/{repo}/contents/{path}`
#[derive(Debug, Serialize)]
struct UpdateFileBody<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    committer: &'a Committer,
}

#[derive(Debug, Deserialize)]
struct UpdateFileResponse {
    content: Option<BlobRef>,
}

#[derive(Debug, Deserialize)]
struct BlobRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct PermissionResponse {
    permission: String,
}

#[async_trait]
impl GitHubClient for OctocrabClient {
    async fn fetch_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<PullRequest> {
        debug!("Fetching PR {}/{}#{}", owner, repo, pr_number);

        let pr = self.octocrab.pulls(owner, repo).get(pr_number).await?;
        Ok(convert_pull_request(&pr))
    }

    async fn merge_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        merge_method: MergeMethod,
        commit_title: Option<&str>,
        commit_message: Option<&str>,
    ) -> anyhow::Result<MergeResult> {
        debug!(
            "Merging PR {}/{}#{} with {:?}",
            owner, repo, pr_number, merge_method
        );

        let pulls = self.octocrab.pulls(owner, repo);
        let mut request = pulls
            .merge(pr_number)
            .method(convert_merge_method(merge_method));

        if let Some(title) = commit_title {
            request = request.title(title);
        }
        if let Some(message) = commit_message {
            request = request.message(message);
        }

        let result = request.send().await?;

        Ok(MergeResult {
            merged: result.merged,
            sha: result.sha,
            message: result.message,
        })
    }

    async fn delete_branch(&self, owner: &str, repo: &str, branch: &str) -> anyhow::Result<()> {
        debug!("Deleting branch {} on {}/{}", branch, owner, repo);

        self.octocrab
            .repos(owner, repo)
            .delete_ref(&octocrab::params::repos::Reference::Branch(
                branch.to_string(),
            ))
            .await?;
        Ok(())
    }

    async fn add_labels(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        labels: &[String],
    ) -> anyhow::Result<()> {
        debug!(
            "Adding labels {:?} to {}/{}#{}",
            labels, owner, repo, issue_number
        );

        self.octocrab
            .issues(owner, repo)
            .add_labels(issue_number, labels)
            .await?;
        Ok(())
    }

    async fn fetch_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: &str,
    ) -> anyhow::Result<Option<FileContent>> {
        debug!("Fetching {} from {}/{}@{}", path, owner, repo, branch);

        let result = self
            .octocrab
            .repos(owner, repo)
            .get_content()
            .path(path)
            .r#ref(branch)
            .send()
            .await;

        let items = match result {
            Ok(items) => items,
            Err(err) if status_code(&err) == Some(404) => {
                debug!("{} does not exist on {}/{}@{}", path, owner, repo, branch);
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let file = items
            .items
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("{} is not a file", path))?;
        let content = file
            .decoded_content()
            .ok_or_else(|| anyhow::anyhow!("{} has no inline content", path))?;

        Ok(Some(FileContent {
            content,
            sha: file.sha,
        }))
    }

    async fn update_file(
        &self,
        owner: &str,
        repo: &str,
        update: &FileUpdate,
    ) -> anyhow::Result<String> {
        debug!(
            "Updating {} on {}/{}@{} (expected sha {:?})",
            update.path, owner, repo, update.branch, update.expected_sha
        );

        // Use raw PUT so the expected sha and committer go out exactly as given
        let route = format!("/repos/{}/{}/contents/{}", owner, repo, update.path);
        let body = UpdateFileBody {
            message: &update.message,
            content: base64::engine::general_purpose::STANDARD.encode(&update.content),
            branch: &update.branch,
            sha: update.expected_sha.as_deref(),
            committer: &update.committer,
        };

        let response: UpdateFileResponse = match self.octocrab.put(route, Some(&body)).await {
            Ok(response) => response,
            Err(err) if is_conflict(&err, update.expected_sha.is_none()) => {
                return Err(ContentConflict {
                    path: update.path.clone(),
                    expected: update.expected_sha.clone(),
                }
                .into());
            }
            Err(err) => return Err(err.into()),
        };

        response
            .content
            .map(|blob| blob.sha)
            .ok_or_else(|| anyhow::anyhow!("No content sha in update response for {}", update.path))
    }

    async fn fetch_permission(
        &self,
        owner: &str,
        repo: &str,
        login: &str,
    ) -> anyhow::Result<PermissionLevel> {
        debug!("Fetching permission of {} on {}/{}", login, owner, repo);

        let route = format!(
            "/repos/{}/{}/collaborators/{}/permission",
            owner, repo, login
        );
        let response: PermissionResponse = self.octocrab.get(route, None::<&()>).await?;
        Ok(PermissionLevel::from_api(&response.permission))
    }

    async fn create_release(
        &self,
        owner: &str,
        repo: &str,
        release: &NewRelease,
    ) -> anyhow::Result<()> {
        debug!("Creating release {} on {}/{}", release.tag, owner, repo);

        self.octocrab
            .repos(owner, repo)
            .releases()
            .create(&release.tag)
            .name(&release.name)
            .body(&release.body)
            .draft(false)
            .prerelease(release.prerelease)
            .send()
            .await?;
        Ok(())
    }

    async fn fetch_open_milestones(
        &self,
        owner: &str,
        repo: &str,
    ) -> anyhow::Result<Vec<Milestone>> {
        debug!("Fetching open milestones for {}/{}", owner, repo);

        let route = format!("/repos/{}/{}/milestones", owner, repo);
        let mut milestones = Vec::new();
        let mut page = 1;
        loop {
            let batch: Vec<Milestone> = self
                .octocrab
                .get(&route, Some(&MilestoneQuery::open(page)))
                .await?;
            let last = is_last_page(batch.len());
            milestones.extend(batch);
            if last {
                break;
            }
            page += 1;
        }
        debug!(
            "Fetched {} open milestones for {}/{} in {} page(s)",
            milestones.len(),
            owner,
            repo,
            page
        );
        Ok(milestones)
    }

    async fn close_milestone(&self, owner: &str, repo: &str, number: u64) -> anyhow::Result<()> {
        debug!("Closing milestone {} on {}/{}", number, owner, repo);

        let route = format!("/repos/{}/{}/milestones/{}", owner, repo, number);
        let _: serde_json::Value = self
            .octocrab
            .patch(route, Some(&serde_json::json!({ "state": "closed" })))
            .await?;
        Ok(())
    }
}

const MILESTONES_PER_PAGE: u32 = 100;

/// Query string for one page of open milestones
#[derive(Debug, Serialize)]
struct MilestoneQuery {
    state: &'static str,
    per_page: u32,
    page: u32,
}

impl MilestoneQuery {
    fn open(page: u32) -> Self {
        Self {
            state: "open",
            per_page: MILESTONES_PER_PAGE,
            page,
        }
    }
}

/// A short page means there is nothing after it
fn is_last_page(len: usize) -> bool {
    len < MILESTONES_PER_PAGE as usize
}

/// Convert octocrab PullRequest to our PullRequest type
fn convert_pull_request(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        title: pr.title.clone().unwrap_or_default(),
        head_branch: pr.head.ref_field.clone(),
        head_repo_owner: pr
            .head
            .repo
            .as_ref()
            .and_then(|repo| repo.owner.as_ref())
            .map(|owner| owner.login.clone()),
        base_branch: pr.base.ref_field.clone(),
        html_url: pr
            .html_url
            .as_ref()
            .map(|u| u.to_string())
            .unwrap_or_default(),
    }
}

/// Convert our merge method to octocrab's
fn convert_merge_method(method: MergeMethod) -> octocrab::params::pulls::MergeMethod {
    match method {
        MergeMethod::Merge => octocrab::params::pulls::MergeMethod::Merge,
        MergeMethod::Squash => octocrab::params::pulls::MergeMethod::Squash,
        MergeMethod::Rebase => octocrab::params::pulls::MergeMethod::Rebase,
    }
}

/// HTTP status of a GitHub API error, if the error came from the API
fn status_code(err: &octocrab::Error) -> Option<u16> {
    match err {
        octocrab::Error::GitHub { source, .. } => Some(source.status_code.as_u16()),
        _ => None,
    }
}

/// Whether a contents write was rejected because the file moved on
///
/// GitHub answers 409 when the sha is stale, and 422 when a file is
/// created without a sha although it already exists.
fn is_conflict(err: &octocrab::Error, creating: bool) -> bool {
    match status_code(err) {
        Some(409) => true,
        Some(422) => creating,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_merge_method() {
        assert!(matches!(
            convert_merge_method(MergeMethod::Squash),
            octocrab::params::pulls::MergeMethod::Squash
        ));
        assert!(matches!(
            convert_merge_method(MergeMethod::Rebase),
            octocrab::params::pulls::MergeMethod::Rebase
        ));
        assert!(matches!(
            convert_merge_method(MergeMethod::Merge),
            octocrab::params::pulls::MergeMethod::Merge
        ));
    }

    #[test]
    fn test_update_body_omits_missing_sha() {
        let committer = Committer::default();
        let body = UpdateFileBody {
            message: "Create history",
            content: base64::engine::general_purpose::STANDARD.encode("## HEAD\n"),
            branch: "master",
            sha: None,
            committer: &committer,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("sha").is_none());
        assert_eq!(json["content"], "IyMgSEVBRAo=");
        assert_eq!(json["committer"]["name"], "jekyllbot");
        assert_eq!(json["committer"]["email"], "jekyllbot@jekyllrb.com");
    }

    #[test]
    fn test_milestone_query_pages() {
        let json = serde_json::to_value(MilestoneQuery::open(3)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "state": "open", "per_page": 100, "page": 3 })
        );
    }

    #[test]
    fn test_only_a_short_page_ends_milestone_listing() {
        assert!(is_last_page(0));
        assert!(is_last_page(42));
        assert!(!is_last_page(100));
    }
}
