//! In-memory GitHub double for handler tests

use async_trait::async_trait;
use gh_client::{
    ContentConflict, FileContent, FileUpdate, GitHubClient, MergeMethod, MergeResult, Milestone,
    NewRelease, PermissionLevel, PullRequest,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// A stored file and its revision counter (its "sha")
#[derive(Debug, Clone)]
struct StoredFile {
    content: String,
    revision: u64,
}

impl StoredFile {
    fn sha(&self) -> String {
        format!("sha-{}", self.revision)
    }
}

#[derive(Debug, Default)]
struct MockState {
    permissions: HashMap<String, PermissionLevel>,
    pull_requests: HashMap<u64, PullRequest>,
    files: HashMap<(String, String), StoredFile>,
    /// Contents written by "someone else" right before each of our writes
    interleaved_writes: VecDeque<String>,
    milestones: Vec<Milestone>,
    failures: HashMap<&'static str, String>,

    merges: Vec<(u64, MergeMethod, Option<String>)>,
    deleted_branches: Vec<String>,
    applied_labels: Vec<(u64, Vec<String>)>,
    writes: Vec<FileUpdate>,
    releases: Vec<NewRelease>,
    closed_milestones: Vec<u64>,
}

/// Mock GitHub client
///
/// Clones share state, so a test can keep a handle for assertions while
/// the handler holds another.
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    state: Arc<Mutex<MockState>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_permission(self, login: &str, level: PermissionLevel) -> Self {
        self.lock().permissions.insert(login.to_string(), level);
        self
    }

    pub fn with_pull_request(self, pr: PullRequest) -> Self {
        self.lock().pull_requests.insert(pr.number, pr);
        self
    }

    pub fn with_file(self, path: &str, branch: &str, content: &str) -> Self {
        self.lock().files.insert(
            (path.to_string(), branch.to_string()),
            StoredFile {
                content: content.to_string(),
                revision: 1,
            },
        );
        self
    }

    /// Queue a concurrent edit that lands just before the next write
    pub fn with_interleaved_write(self, content: &str) -> Self {
        self.lock().interleaved_writes.push_back(content.to_string());
        self
    }

    pub fn with_milestone(self, number: u64, title: &str) -> Self {
        self.lock().milestones.push(Milestone {
            number,
            title: title.to_string(),
        });
        self
    }

    /// Make an operation fail, keyed by the trait method name
    pub fn with_failure(self, operation: &'static str, message: &str) -> Self {
        self.lock().failures.insert(operation, message.to_string());
        self
    }

    pub fn merges(&self) -> Vec<(u64, MergeMethod, Option<String>)> {
        self.lock().merges.clone()
    }

    pub fn deleted_branches(&self) -> Vec<String> {
        self.lock().deleted_branches.clone()
    }

    pub fn applied_labels(&self) -> Vec<(u64, Vec<String>)> {
        self.lock().applied_labels.clone()
    }

    pub fn writes(&self) -> Vec<FileUpdate> {
        self.lock().writes.clone()
    }

    pub fn releases(&self) -> Vec<NewRelease> {
        self.lock().releases.clone()
    }

    pub fn closed_milestones(&self) -> Vec<u64> {
        self.lock().closed_milestones.clone()
    }

    pub fn file(&self, path: &str, branch: &str) -> Option<String> {
        self.lock()
            .files
            .get(&(path.to_string(), branch.to_string()))
            .map(|file| file.content.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    fn fail_if_scripted(&self, operation: &'static str) -> anyhow::Result<()> {
        match self.lock().failures.get(operation) {
            Some(message) => Err(anyhow::anyhow!("{}", message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl GitHubClient for MockClient {
    async fn fetch_pull_request(
        &self,
        _owner: &str,
        _repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<PullRequest> {
        self.fail_if_scripted("fetch_pull_request")?;
        self.lock()
            .pull_requests
            .get(&pr_number)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Not Found: pull request #{}", pr_number))
    }

    async fn merge_pull_request(
        &self,
        _owner: &str,
        _repo: &str,
        pr_number: u64,
        merge_method: MergeMethod,
        _commit_title: Option<&str>,
        commit_message: Option<&str>,
    ) -> anyhow::Result<MergeResult> {
        self.fail_if_scripted("merge_pull_request")?;
        self.lock().merges.push((
            pr_number,
            merge_method,
            commit_message.map(str::to_string),
        ));
        Ok(MergeResult {
            merged: true,
            sha: Some(format!("merge-{}", pr_number)),
            message: Some("Pull Request successfully merged".to_string()),
        })
    }

    async fn delete_branch(&self, _owner: &str, _repo: &str, branch: &str) -> anyhow::Result<()> {
        self.fail_if_scripted("delete_branch")?;
        self.lock().deleted_branches.push(branch.to_string());
        Ok(())
    }

    async fn add_labels(
        &self,
        _owner: &str,
        _repo: &str,
        issue_number: u64,
        labels: &[String],
    ) -> anyhow::Result<()> {
        self.fail_if_scripted("add_labels")?;
        self.lock()
            .applied_labels
            .push((issue_number, labels.to_vec()));
        Ok(())
    }

    async fn fetch_file(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        branch: &str,
    ) -> anyhow::Result<Option<FileContent>> {
        self.fail_if_scripted("fetch_file")?;
        Ok(self
            .lock()
            .files
            .get(&(path.to_string(), branch.to_string()))
            .map(|file| FileContent {
                content: file.content.clone(),
                sha: file.sha(),
            }))
    }

    async fn update_file(
        &self,
        _owner: &str,
        _repo: &str,
        update: &FileUpdate,
    ) -> anyhow::Result<String> {
        self.fail_if_scripted("update_file")?;
        let mut state = self.lock();
        let key = (update.path.clone(), update.branch.clone());

        if let Some(content) = state.interleaved_writes.pop_front() {
            let revision = state.files.get(&key).map_or(1, |file| file.revision + 1);
            state.files.insert(key.clone(), StoredFile { content, revision });
        }

        let current_sha = state.files.get(&key).map(StoredFile::sha);
        if current_sha != update.expected_sha {
            return Err(ContentConflict {
                path: update.path.clone(),
                expected: update.expected_sha.clone(),
            }
            .into());
        }

        let revision = state.files.get(&key).map_or(1, |file| file.revision + 1);
        let stored = StoredFile {
            content: update.content.clone(),
            revision,
        };
        let sha = stored.sha();
        state.files.insert(key, stored);
        state.writes.push(update.clone());
        Ok(sha)
    }

    async fn fetch_permission(
        &self,
        _owner: &str,
        _repo: &str,
        login: &str,
    ) -> anyhow::Result<PermissionLevel> {
        self.fail_if_scripted("fetch_permission")?;
        Ok(self
            .lock()
            .permissions
            .get(login)
            .copied()
            .unwrap_or(PermissionLevel::None))
    }

    async fn create_release(
        &self,
        _owner: &str,
        _repo: &str,
        release: &NewRelease,
    ) -> anyhow::Result<()> {
        self.fail_if_scripted("create_release")?;
        self.lock().releases.push(release.clone());
        Ok(())
    }

    async fn fetch_open_milestones(
        &self,
        _owner: &str,
        _repo: &str,
    ) -> anyhow::Result<Vec<Milestone>> {
        self.fail_if_scripted("fetch_open_milestones")?;
        let state = self.lock();
        Ok(state
            .milestones
            .iter()
            .filter(|m| !state.closed_milestones.contains(&m.number))
            .cloned()
            .collect())
    }

    async fn close_milestone(&self, _owner: &str, _repo: &str, number: u64) -> anyhow::Result<()> {
        self.fail_if_scripted("close_milestone")?;
        self.lock().closed_milestones.push(number);
        Ok(())
    }
}

/// A same-repository pull request against master
pub fn pull_request(number: u64, title: &str, head_branch: &str) -> PullRequest {
    PullRequest {
        number,
        title: title.to_string(),
        head_branch: head_branch.to_string(),
        head_repo_owner: Some("jekyll".to_string()),
        base_branch: "master".to_string(),
        html_url: format!("https://github.com/jekyll/jekyll/pull/{}", number),
    }
}
