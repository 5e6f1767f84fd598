//! Release notes from the changelog
//!
//! When a version tag is pushed, the matching changelog version becomes
//! the body of a GitHub release. Prerelease tags (`v3.2.0.pre.beta1`)
//! ship from trunk, so their notes come from `HEAD`.

use crate::error::{BotError, Result, describe};
use crate::events::CreateEvent;
use crate::outcome::Outcome;
use changelog::{Changelog, HEAD, Version, parse};
use gh_bot_config::BotConfig;
use gh_client::{GitHubClient, NewRelease};
use log::{debug, info};
use regex::Regex;
use std::sync::OnceLock;

fn version_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^v(\d+\.\d+\.\d+(?:\.pre\.(?:beta|rc)\d+)?)$").unwrap())
}

/// Version named by a tag: `v2.3.0` is `2.3.0`; `3.2.0` is not a
/// version tag
pub fn extract_version(tag: &str) -> Option<String> {
    version_tag_regex()
        .captures(tag)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

/// Whether a version is a prerelease (`.pre.betaN`, `.pre.rcN`)
pub fn is_prerelease(version: &str) -> bool {
    version.contains(".pre")
}

/// A release ready to be published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseNotes {
    /// Tag the release is for
    pub tag: String,
    /// Changelog version the notes were taken from
    pub version: String,
    /// Release body: the version's entries without its heading
    pub body: String,
    pub prerelease: bool,
}

impl ReleaseNotes {
    pub fn to_new_release(&self) -> NewRelease {
        NewRelease {
            tag: self.tag.clone(),
            name: self.tag.clone(),
            body: self.body.clone(),
            prerelease: self.prerelease,
        }
    }
}

/// Build the release notes for a tag from a parsed changelog
///
/// `path` only names the changelog in errors.
pub fn release_notes(changes: &Changelog, tag: &str, path: &str) -> Result<ReleaseNotes> {
    let version = extract_version(tag).ok_or_else(|| BotError::NotAVersionTag(tag.to_string()))?;
    let prerelease = is_prerelease(&version);
    let wanted = if prerelease { HEAD } else { version.as_str() };

    let entry = find_version(changes, wanted).ok_or_else(|| BotError::VersionMissing {
        version: wanted.to_string(),
        path: path.to_string(),
    })?;

    Ok(ReleaseNotes {
        tag: tag.to_string(),
        version: entry.id().to_string(),
        body: entry.body(),
        prerelease,
    })
}

/// Look a version up by id, also accepting a `v`-prefixed heading
fn find_version<'a>(changes: &'a Changelog, id: &str) -> Option<&'a Version> {
    changes
        .version(id)
        .or_else(|| changes.version(&format!("v{}", id)))
}

/// Handle a `create` event: publish a release for a new version tag
///
/// Branch creations and tags that are not versions are not applicable.
/// A version missing from the changelog, and a failure to create the
/// release, are errors.
pub async fn create_release_on_tag<C: GitHubClient + ?Sized>(
    client: &C,
    config: &BotConfig,
    event: &CreateEvent,
) -> Result<Outcome<ReleaseNotes>> {
    if event.ref_type != "tag" {
        return Ok(Outcome::not_applicable("not a tag create event"));
    }
    let tag = event.git_ref.as_str();
    if extract_version(tag).is_none() {
        debug!("Ignoring tag {}: not a version tag", tag);
        return Ok(Outcome::not_applicable(format!("not a version tag ({})", tag)));
    }

    let owner = event.repository.owner.login.as_str();
    let repo = event.repository.name.as_str();
    let history = &config.history;

    let text = client
        .fetch_file(owner, repo, &history.path, &history.branch)
        .await
        .map_err(|err| {
            BotError::Client(format!("error getting {}: {}", history.path, describe(&err)))
        })?
        .map(|file| file.content)
        .unwrap_or_default();

    let notes = release_notes(&parse(&text), tag, &history.path)?;

    client
        .create_release(owner, repo, &notes.to_new_release())
        .await
        .map_err(|err| BotError::Release {
            tag: tag.to_string(),
            message: describe(&err),
        })?;

    info!(
        "Created {}release {} on {}",
        if notes.prerelease { "pre" } else { "" },
        tag,
        event.repository.full_name()
    );
    Ok(Outcome::Handled(notes))
}
