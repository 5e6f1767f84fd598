//! Configuration for history-bot
//!
//! This crate provides:
//! - Configuration file loading (TOML)
//! - Bot configuration (BotConfig)
//! - The changelog category table

pub mod bot_config;
pub mod categories;
pub mod config_file;

pub use bot_config::{BotConfig, Committer, HistoryConfig, MergeConfig, MergeMethod};
pub use categories::{default_categories, Category};
pub use config_file::{config_search_paths, find_config_file, ConfigSource, CONFIG_FILE_NAME};
