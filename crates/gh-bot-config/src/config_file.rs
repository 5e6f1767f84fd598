//! Config file discovery

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::{env, fs};

/// File name looked up in each search location
pub const CONFIG_FILE_NAME: &str = ".history-bot.toml";

/// A config file read from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub path: PathBuf,
    pub content: String,
}

/// Candidate config locations, in search order: the working directory,
/// then `$HOME` when it is set
pub fn config_search_paths() -> Vec<PathBuf> {
    search_paths(env::var_os("HOME"))
}

/// Read the first config file found along [`config_search_paths`]
pub fn find_config_file() -> Option<ConfigSource> {
    read_first(&config_search_paths())
}

fn search_paths(home: Option<OsString>) -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(home) = home.filter(|home| !home.is_empty()) {
        paths.push(PathBuf::from(home).join(CONFIG_FILE_NAME));
    }
    paths
}

fn read_first(paths: &[PathBuf]) -> Option<ConfigSource> {
    paths.iter().find_map(|path| match fs::read_to_string(path) {
        Ok(content) => {
            log::debug!("Found config file {}", path.display());
            Some(ConfigSource {
                path: path.clone(),
                content,
            })
        }
        Err(err) if err.kind() == ErrorKind::NotFound => None,
        Err(err) => {
            log::warn!("Skipping unreadable config file {}: {}", path.display(), err);
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("gh-bot-config-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_search_paths_working_directory_first() {
        let paths = search_paths(Some(OsString::from("/home/parkr")));
        assert_eq!(
            paths,
            vec![
                PathBuf::from(".history-bot.toml"),
                PathBuf::from("/home/parkr/.history-bot.toml"),
            ]
        );
    }

    #[test]
    fn test_search_paths_without_home() {
        assert_eq!(search_paths(None), vec![PathBuf::from(CONFIG_FILE_NAME)]);
        assert_eq!(
            search_paths(Some(OsString::new())),
            vec![PathBuf::from(CONFIG_FILE_NAME)]
        );
    }

    #[test]
    fn test_read_first_skips_missing_files() {
        let dir = scratch_dir("read-first");
        let missing = dir.join("missing.toml");
        let first = dir.join("first.toml");
        let second = dir.join("second.toml");
        fs::write(&first, "host = \"first\"\n").unwrap();
        fs::write(&second, "host = \"second\"\n").unwrap();

        let found = read_first(&[missing.clone(), first.clone(), second]).unwrap();
        assert_eq!(found.path, first);
        assert_eq!(found.content, "host = \"first\"\n");

        assert_eq!(read_first(&[missing]), None);
        fs::remove_dir_all(&dir).unwrap();
    }
}
