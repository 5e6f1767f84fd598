//! history-bot
//!
//! Event handlers that merge pull requests on a maintainer's command and
//! keep `History.markdown` and GitHub releases in sync:
//!
//! - [`MergeAndLabel`]: `@bot: merge +section` merges, deletes the branch,
//!   labels the pull request and records it in the changelog
//! - [`create_release_on_tag`]: a pushed version tag becomes a release
//!   whose body is that version's changelog entry
//! - [`close_milestone_on_release`]: a published release closes its
//!   milestone

pub mod directive;
pub mod error;
pub mod events;
pub mod merge_and_label;
pub mod milestone;
pub mod outcome;
pub mod release;
pub mod sections;

#[cfg(test)]
mod testing;

pub use directive::{MergeDirective, parse_merge_directive};
pub use error::{BotError, Result};
pub use merge_and_label::{MergeAndLabel, MergeReport};
pub use milestone::close_milestone_on_release;
pub use outcome::{Outcome, StepOutcome};
pub use release::{ReleaseNotes, create_release_on_tag, extract_version, release_notes};
