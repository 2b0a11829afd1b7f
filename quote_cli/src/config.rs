//! Runtime configuration: where the store lives and who is using it.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "PLEAT_DATA_DIR";

/// Environment variable overriding the lock owner name
pub const USER_ENV: &str = "PLEAT_USER";

/// Directory name under the platform data directory
const APP_DIR: &str = "pleat";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding the project store
    pub data_dir: PathBuf,
    /// Name recorded in store lock files
    pub user: String,
}

impl Config {
    /// Resolve configuration. Explicit values (flag or env, already merged by
    /// clap) win over platform defaults.
    pub fn resolve(data_dir: Option<PathBuf>, user: Option<String>) -> Self {
        Config {
            data_dir: data_dir.unwrap_or_else(default_data_dir),
            user: user
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(default_user),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Platform data directory, or `./.pleat` when the platform has none.
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(format!(".{}", APP_DIR)))
}

fn default_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| "operator".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_values_win() {
        let config = Config::resolve(Some(PathBuf::from("/tmp/pleat-test")), Some("meera".to_string()));
        assert_eq!(config.data_dir(), Path::new("/tmp/pleat-test"));
        assert_eq!(config.user, "meera");
    }

    #[test]
    fn test_defaults_are_filled() {
        let config = Config::resolve(None, Some("  ".to_string()));
        assert!(config.data_dir.ends_with(APP_DIR) || config.data_dir.ends_with(".pleat"));
        assert!(!config.user.trim().is_empty());
    }
}
