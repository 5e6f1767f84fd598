//! Merge-and-label workflow
//!
//! Triggered by a merge directive comment on a pull request. Once the
//! commenter is authorized and the merge succeeded, three independent
//! steps run concurrently:
//!
//! - delete the head branch (same-repository branches only)
//! - apply the labels of the requested changelog section
//! - record the pull request in the changelog, guarded by the file's sha
//!
//! A failing step never affects the others or the overall result; each
//! step reports its own [`StepOutcome`].

use crate::directive::{MergeDirective, parse_merge_directive};
use crate::error::{BotError, Result, describe};
use crate::events::IssueCommentEvent;
use crate::outcome::{Outcome, StepOutcome};
use crate::sections::{
    labels_for_section, normalize_label, section_for_slug, select_section_label,
};
use changelog::{NO_SECTION, insert_merge_line, parse};
use gh_bot_config::BotConfig;
use gh_client::{ContentConflict, FileUpdate, GitHubClient, PullRequest};
use log::{debug, error, info, warn};

/// Per-step results of a successful merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// `owner/repo#number`
    pub reference: String,
    /// Changelog section the change was filed under, or `"none"`
    pub section: String,
    pub delete_branch: StepOutcome,
    pub labels: StepOutcome,
    pub history: StepOutcome,
}

impl MergeReport {
    /// Whether any post-merge step failed
    pub fn has_failures(&self) -> bool {
        self.delete_branch.is_failed() || self.labels.is_failed() || self.history.is_failed()
    }
}

/// Merges pull requests on command and files them in the changelog
pub struct MergeAndLabel<'a, C: GitHubClient + ?Sized> {
    client: &'a C,
    config: &'a BotConfig,
}

impl<'a, C: GitHubClient + ?Sized> MergeAndLabel<'a, C> {
    pub fn new(client: &'a C, config: &'a BotConfig) -> Self {
        Self { client, config }
    }

    /// Handle an `issue_comment` event
    ///
    /// Returns [`Outcome::NotApplicable`] when the comment is not a merge
    /// directive on a pull request. Fails only if the commenter lacks push
    /// access or the merge itself fails; post-merge failures are reported
    /// in the [`MergeReport`].
    pub async fn handle(&self, event: &IssueCommentEvent) -> Result<Outcome<MergeReport>> {
        let Some(directive) = parse_merge_directive(&event.comment.body) else {
            return Ok(Outcome::not_applicable("not a merge request comment"));
        };
        if !event.issue.is_pull_request() {
            return Ok(Outcome::not_applicable("not a pull request"));
        }

        let owner = event.repository.owner.login.as_str();
        let repo = event.repository.name.as_str();
        let number = event.issue.number;
        let reference = format!("{}/{}#{}", owner, repo, number);
        let login = event.comment.user.login.as_str();

        if !self.commenter_has_push_access(owner, repo, login).await {
            warn!("{} isn't authorized to merge {}", login, reference);
            return Err(BotError::Unauthorized {
                login: login.to_string(),
                repo: event.repository.full_name(),
            });
        }

        let labels: Vec<&str> = event.issue.labels.iter().map(|l| l.name.as_str()).collect();
        let section = self.resolve_section(&directive, &labels);
        debug!("Section for {}: '{}'", reference, section);

        self.merge(owner, repo, number, &reference).await?;
        info!("Merged {}", reference);

        let default_branch = event
            .repository
            .default_branch
            .as_deref()
            .unwrap_or(&self.config.merge.fallback_default_branch);

        let (delete_branch, labels, history) =
            match self.client.fetch_pull_request(owner, repo, number).await {
                Ok(pr) => tokio::join!(
                    self.delete_branch(owner, repo, &pr, default_branch, &reference),
                    self.apply_labels(owner, repo, number, &section, &reference),
                    self.update_history(owner, repo, &pr, &section, &reference),
                ),
                Err(err) => {
                    let message = format!("error getting PR info: {}", describe(&err));
                    error!("{}: {}", reference, message);
                    let labels = self
                        .apply_labels(owner, repo, number, &section, &reference)
                        .await;
                    (
                        StepOutcome::Failed(message.clone()),
                        labels,
                        StepOutcome::Failed(message),
                    )
                }
            };

        Ok(Outcome::Handled(MergeReport {
            reference,
            section,
            delete_branch,
            labels,
            history,
        }))
    }

    /// Changelog section for a directive
    ///
    /// An explicit `+label` wins. Without one the section is `"none"`,
    /// unless inference from the pull request's labels is enabled.
    pub fn resolve_section(&self, directive: &MergeDirective, issue_labels: &[&str]) -> String {
        let categories = &self.config.categories;
        if let Some(label) = &directive.label {
            return section_for_slug(categories, &normalize_label(categories, label));
        }

        if self.config.merge.infer_section_from_labels {
            if let Some(slug) = select_section_label(categories, issue_labels.iter().copied()) {
                return section_for_slug(categories, slug);
            }
        }

        NO_SECTION.to_string()
    }

    async fn commenter_has_push_access(&self, owner: &str, repo: &str, login: &str) -> bool {
        match self.client.has_push_access(owner, repo, login).await {
            Ok(allowed) => allowed,
            Err(err) => {
                error!(
                    "Failed to check permission of {} on {}/{}: {}",
                    login,
                    owner,
                    repo,
                    describe(&err)
                );
                false
            }
        }
    }

    async fn merge(&self, owner: &str, repo: &str, number: u64, reference: &str) -> Result<()> {
        let commit_message = format!("Merge pull request {}", number);
        let result = self
            .client
            .merge_pull_request(
                owner,
                repo,
                number,
                self.config.merge.method,
                None,
                Some(&commit_message),
            )
            .await
            .map_err(|err| BotError::Merge {
                reference: reference.to_string(),
                message: describe(&err),
            })?;

        if !result.merged {
            return Err(BotError::Merge {
                reference: reference.to_string(),
                message: result
                    .message
                    .unwrap_or_else(|| "merge was not performed".to_string()),
            });
        }
        Ok(())
    }

    async fn delete_branch(
        &self,
        owner: &str,
        repo: &str,
        pr: &PullRequest,
        default_branch: &str,
        reference: &str,
    ) -> StepOutcome {
        let pages_branch = &self.config.merge.pages_branch;
        if let Err(reason) = deletable_ref(pr, owner, default_branch, pages_branch) {
            debug!("Not deleting branch of {}: {}", reference, reason);
            return StepOutcome::Skipped(reason);
        }

        match self.client.delete_branch(owner, repo, &pr.head_branch).await {
            Ok(()) => {
                info!("Deleted branch {} of {}", pr.head_branch, reference);
                StepOutcome::Done
            }
            Err(err) => {
                let message = format!(
                    "error deleting branch {}: {}",
                    pr.head_branch,
                    describe(&err)
                );
                error!("{}: {}", reference, message);
                StepOutcome::Failed(message)
            }
        }
    }

    async fn apply_labels(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        section: &str,
        reference: &str,
    ) -> StepOutcome {
        let labels = labels_for_section(&self.config.categories, section);
        if labels.is_empty() {
            return StepOutcome::Skipped(format!("no labels for section '{}'", section));
        }

        match self.client.add_labels(owner, repo, number, labels).await {
            Ok(()) => {
                info!("Labeled {} with {:?}", reference, labels);
                StepOutcome::Done
            }
            Err(err) => {
                let message = format!("error applying labels: {}", describe(&err));
                error!("{}: {}", reference, message);
                StepOutcome::Failed(message)
            }
        }
    }

    /// Read, insert, write; re-read and retry when the write loses a race
    async fn update_history(
        &self,
        owner: &str,
        repo: &str,
        pr: &PullRequest,
        section: &str,
        reference: &str,
    ) -> StepOutcome {
        let history = &self.config.history;
        let change_reference = format!("#{}", pr.number);
        let max_attempts = history.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            let current = match self
                .client
                .fetch_file(owner, repo, &history.path, &history.branch)
                .await
            {
                Ok(current) => current,
                Err(err) => {
                    let message = format!("error getting {}: {}", history.path, describe(&err));
                    error!("{}: {}", reference, message);
                    return StepOutcome::Failed(message);
                }
            };

            let (text, expected_sha) = match current {
                Some(file) => (file.content, Some(file.sha)),
                None => (String::new(), None),
            };

            let mut changes = parse(&text);
            if !insert_merge_line(&mut changes, section, &pr.title, &change_reference) {
                return StepOutcome::Skipped(format!(
                    "{} already lists {}",
                    history.path, change_reference
                ));
            }

            let update = FileUpdate {
                path: history.path.clone(),
                branch: history.branch.clone(),
                content: changes.to_string(),
                expected_sha,
                message: format!(
                    "Update history to reflect merge of #{} [ci skip]",
                    pr.number
                ),
                committer: self.config.committer.clone(),
            };

            match self.client.update_file(owner, repo, &update).await {
                Ok(sha) => {
                    info!("Recorded {} in {} ({})", reference, history.path, sha);
                    return StepOutcome::Done;
                }
                Err(err) if err.downcast_ref::<ContentConflict>().is_some() => {
                    warn!(
                        "{}: {} changed while updating it (attempt {}/{})",
                        reference, history.path, attempt, max_attempts
                    );
                }
                Err(err) => {
                    let message = format!("error committing {}: {}", history.path, describe(&err));
                    error!("{}: {}", reference, message);
                    return StepOutcome::Failed(message);
                }
            }
        }

        let message = format!(
            "{} kept changing, gave up after {} attempts",
            history.path, max_attempts
        );
        error!("{}: {}", reference, message);
        StepOutcome::Failed(message)
    }
}

/// Whether a merged pull request's head branch may be deleted
///
/// Only branches in the base repository are deleted, and never the
/// default or the pages branch.
fn deletable_ref(
    pr: &PullRequest,
    owner: &str,
    default_branch: &str,
    pages_branch: &str,
) -> std::result::Result<(), String> {
    if pr.head_repo_owner.as_deref() != Some(owner) {
        return Err("head branch is in a fork".to_string());
    }
    if pr.head_branch == default_branch {
        return Err(format!("{} is the default branch", pr.head_branch));
    }
    if pr.head_branch == pages_branch {
        return Err(format!("{} is the pages branch", pr.head_branch));
    }
    Ok(())
}
