//! Bot configuration
//!
//! Configuration loaded from .history-bot.toml. Every field has a
//! default, so an empty or partial file is valid.

use crate::categories::{default_categories, Category};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Bot configuration loaded from .history-bot.toml
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BotConfig {
    /// GitHub host for Enterprise installations (None = github.com)
    #[serde(default)]
    pub host: Option<String>,

    /// Where the changelog lives
    #[serde(default)]
    pub history: HistoryConfig,

    /// Identity used for changelog commits
    #[serde(default)]
    pub committer: Committer,

    /// Merge and branch cleanup behavior
    #[serde(default)]
    pub merge: MergeConfig,

    /// Label prefix to changelog section table
    #[serde(default = "default_categories")]
    pub categories: Vec<Category>,
}

/// Location of the changelog file in the repository
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Path of the changelog file
    #[serde(default = "default_history_path")]
    pub path: String,

    /// Branch the changelog is read from and committed to
    #[serde(default = "default_history_branch")]
    pub branch: String,

    /// Attempts at the read-insert-write cycle when the write is
    /// rejected because the file changed underneath us
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

/// Git identity for bot commits
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Committer {
    #[serde(default = "default_committer_name")]
    pub name: String,

    #[serde(default = "default_committer_email")]
    pub email: String,
}

/// Merge method for pull requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeMethod {
    /// Create a merge commit
    Merge,
    /// Squash all commits into one
    #[default]
    Squash,
    /// Rebase commits onto the base branch
    Rebase,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MergeConfig {
    #[serde(default)]
    pub method: MergeMethod,

    /// Branch serving GitHub Pages, never deleted after a merge
    #[serde(default = "default_pages_branch")]
    pub pages_branch: String,

    /// Default branch assumed when the event does not carry one
    #[serde(default = "default_fallback_branch")]
    pub fallback_default_branch: String,

    /// Pick the changelog section from the PR's existing labels when the
    /// merge comment has no `+label`
    #[serde(default)]
    pub infer_section_from_labels: bool,
}

fn default_history_path() -> String {
    "History.markdown".to_string()
}

fn default_history_branch() -> String {
    "master".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_committer_name() -> String {
    "jekyllbot".to_string()
}

fn default_committer_email() -> String {
    "jekyllbot@jekyllrb.com".to_string()
}

fn default_pages_branch() -> String {
    "gh-pages".to_string()
}

fn default_fallback_branch() -> String {
    "master".to_string()
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: default_history_path(),
            branch: default_history_branch(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Default for Committer {
    fn default() -> Self {
        Self {
            name: default_committer_name(),
            email: default_committer_email(),
        }
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            method: MergeMethod::default(),
            pages_branch: default_pages_branch(),
            fallback_default_branch: default_fallback_branch(),
            infer_section_from_labels: false,
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            host: None,
            history: HistoryConfig::default(),
            committer: Committer::default(),
            merge: MergeConfig::default(),
            categories: default_categories(),
        }
    }
}

impl BotConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        if let Some(source) = crate::find_config_file() {
            match toml::from_str(&source.content) {
                Ok(config) => {
                    log::info!("Loaded bot config from {}", source.path.display());
                    return config;
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config file {}: {}",
                        source.path.display(),
                        e
                    );
                }
            }
        }

        log::debug!("Using default bot config");
        Self::default()
    }

    /// Load config from an explicit path; unlike [`BotConfig::load`] a
    /// missing or malformed file is an error.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        log::info!("Loaded bot config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BotConfig::default();
        assert_eq!(config.host, None);
        assert_eq!(config.history.path, "History.markdown");
        assert_eq!(config.history.branch, "master");
        assert_eq!(config.history.max_attempts, 3);
        assert_eq!(config.committer.name, "jekyllbot");
        assert_eq!(config.merge.method, MergeMethod::Squash);
        assert_eq!(config.merge.pages_branch, "gh-pages");
        assert!(!config.merge.infer_section_from_labels);
        assert_eq!(config.categories.len(), 8);
    }

    #[test]
    fn test_config_deserialize_partial() {
        let toml = r#"
            [history]
            path = "CHANGELOG.md"

            [merge]
            method = "rebase"
        "#;
        let config: BotConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.history.path, "CHANGELOG.md");
        // Other fields should use defaults
        assert_eq!(config.history.branch, "master");
        assert_eq!(config.merge.method, MergeMethod::Rebase);
        assert_eq!(config.merge.pages_branch, "gh-pages");
        assert_eq!(config.committer, Committer::default());
        assert_eq!(config.categories, default_categories());
    }

    #[test]
    fn test_config_custom_categories_replace_defaults() {
        let toml = r#"
            [[categories]]
            prefix = "perf"
            slug = "performance"
            section = "Performance"
            labels = ["performance"]
        "#;
        let config: BotConfig = toml::from_str(toml).unwrap();
        assert_eq!(
            config.categories,
            vec![Category::new("perf", "performance", "Performance", &["performance"])]
        );
    }

    #[test]
    fn test_config_empty_file() {
        let config: BotConfig = toml::from_str("").unwrap();
        assert_eq!(config.history, HistoryConfig::default());
    }
}
