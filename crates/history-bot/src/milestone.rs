//! Close the milestone of a published release

use crate::error::{BotError, Result, describe};
use crate::events::ReleaseEvent;
use crate::outcome::Outcome;
use gh_client::GitHubClient;
use log::info;

/// Handle a `release` event: close every open milestone titled like the
/// released tag
///
/// Only final releases count: drafts, prereleases and actions other than
/// `published` are not applicable. Returns the numbers of the closed
/// milestones.
pub async fn close_milestone_on_release<C: GitHubClient + ?Sized>(
    client: &C,
    event: &ReleaseEvent,
) -> Result<Outcome<Vec<u64>>> {
    if event.action != "published" {
        return Ok(Outcome::not_applicable("not a published release"));
    }
    if event.release.prerelease || event.release.draft {
        return Ok(Outcome::not_applicable("a prerelease or draft release"));
    }

    let owner = event.repository.owner.login.as_str();
    let repo = event.repository.name.as_str();
    let tag = event.release.tag_name.as_str();

    let milestones = client
        .fetch_open_milestones(owner, repo)
        .await
        .map_err(|err| BotError::Milestone {
            repo: event.repository.full_name(),
            message: format!("couldn't fetch milestones: {}", describe(&err)),
        })?;

    let mut closed = Vec::new();
    for milestone in milestones.iter().filter(|m| m.title == tag) {
        info!(
            "Closing milestone {} ({}) on {}/{}",
            milestone.number, milestone.title, owner, repo
        );
        client
            .close_milestone(owner, repo, milestone.number)
            .await
            .map_err(|err| BotError::Milestone {
                repo: event.repository.full_name(),
                message: format!(
                    "couldn't close milestone {}: {}",
                    milestone.number,
                    describe(&err)
                ),
            })?;
        closed.push(milestone.number);
    }

    if closed.is_empty() {
        info!("No milestone with title '{}' on {}/{}", tag, owner, repo);
    }
    Ok(Outcome::Handled(closed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::from_json;
    use crate::testing::MockClient;

    fn release_event(action: &str, tag: &str, prerelease: bool, draft: bool) -> ReleaseEvent {
        from_json(
            &serde_json::json!({
                "action": action,
                "release": { "tag_name": tag, "prerelease": prerelease, "draft": draft },
                "repository": { "name": "jekyll", "owner": { "login": "jekyll" } }
            })
            .to_string(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_closes_matching_milestone() {
        let client = MockClient::new()
            .with_milestone(7, "v3.0.1")
            .with_milestone(8, "v3.1.0");

        let event = release_event("published", "v3.0.1", false, false);
        let outcome = close_milestone_on_release(&client, &event).await.unwrap();

        assert_eq!(outcome, Outcome::Handled(vec![7]));
        assert_eq!(client.closed_milestones(), vec![7]);
    }

    #[tokio::test]
    async fn test_no_matching_milestone() {
        let client = MockClient::new().with_milestone(8, "v3.1.0");

        let event = release_event("published", "v3.0.1", false, false);
        let outcome = close_milestone_on_release(&client, &event).await.unwrap();

        assert_eq!(outcome, Outcome::Handled(vec![]));
        assert!(client.closed_milestones().is_empty());
    }

    #[tokio::test]
    async fn test_drafts_prereleases_and_other_actions_are_ignored() {
        let client = MockClient::new().with_milestone(7, "v3.0.1");

        for event in [
            release_event("created", "v3.0.1", false, false),
            release_event("published", "v3.0.1", true, false),
            release_event("published", "v3.0.1", false, true),
        ] {
            let outcome = close_milestone_on_release(&client, &event).await.unwrap();
            assert!(matches!(outcome, Outcome::NotApplicable(_)));
        }
        assert!(client.closed_milestones().is_empty());
    }

    #[tokio::test]
    async fn test_close_failure_is_an_error() {
        let client = MockClient::new()
            .with_milestone(7, "v3.0.1")
            .with_failure("close_milestone", "Not Found");

        let event = release_event("published", "v3.0.1", false, false);
        let err = close_milestone_on_release(&client, &event).await.unwrap_err();

        assert!(matches!(err, BotError::Milestone { .. }));
    }
}
