use thiserror::Error;

/// Terminal failures of the bot's handlers
///
/// Failures of the independent post-merge steps are not errors; they are
/// reported per step in a [`MergeReport`](crate::MergeReport).
#[derive(Error, Debug)]
pub enum BotError {
    #[error("{login} isn't allowed to merge anything on {repo}")]
    Unauthorized { login: String, repo: String },

    #[error("error merging {reference}: {message}")]
    Merge { reference: String, message: String },

    #[error("not a version tag ({0})")]
    NotAVersionTag(String),

    #[error("no '{version}' version in {path}")]
    VersionMissing { version: String, path: String },

    #[error("error creating release {tag}: {message}")]
    Release { tag: String, message: String },

    #[error("milestone update failed on {repo}: {message}")]
    Milestone { repo: String, message: String },

    #[error("GitHub request failed: {0}")]
    Client(String),
}

pub type Result<T> = std::result::Result<T, BotError>;

/// Render an `anyhow::Error` with its full cause chain
pub(crate) fn describe(err: &anyhow::Error) -> String {
    format!("{:#}", err)
}
