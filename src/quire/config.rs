use crate::error::{QuireError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_CONTENT_DIR: &str = "content";
const DEFAULT_ARCHIVE_DIR: &str = "archive";
const DEFAULT_CREDENTIALS_FILE: &str = "users.json";
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Keys accepted by `get` and `set`, in display order.
pub const CONFIG_KEYS: &[&str] = &["content-dir", "archive-dir", "credentials-file", "log-level"];

/// Configuration for quire, stored in `<data dir>/config.json`.
///
/// Relative paths are resolved against the data directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuireConfig {
    /// Directory holding live documents
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    /// Directory holding archived snapshots
    #[serde(default = "default_archive_dir")]
    pub archive_dir: PathBuf,

    /// JSON file mapping usernames to password hashes
    #[serde(default = "default_credentials_file")]
    pub credentials_file: PathBuf,

    /// Default log filter when RUST_LOG is not set (e.g. "warn", "quire=debug")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_content_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CONTENT_DIR)
}

fn default_archive_dir() -> PathBuf {
    PathBuf::from(DEFAULT_ARCHIVE_DIR)
}

fn default_credentials_file() -> PathBuf {
    PathBuf::from(DEFAULT_CREDENTIALS_FILE)
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for QuireConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            archive_dir: default_archive_dir(),
            credentials_file: default_credentials_file(),
            log_level: default_log_level(),
        }
    }
}

impl QuireConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(QuireError::Io)?;
        serde_json::from_str(&content).map_err(|e| {
            QuireError::Config(format!("{} is not valid: {}", config_path.display(), e))
        })
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(QuireError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(QuireError::Serialization)?;
        fs::write(config_path, content).map_err(QuireError::Io)?;
        Ok(())
    }

    pub fn config_path<P: AsRef<Path>>(config_dir: P) -> PathBuf {
        config_dir.as_ref().join(CONFIG_FILENAME)
    }

    pub fn content_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.content_dir)
    }

    pub fn archive_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.archive_dir)
    }

    pub fn credentials_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.credentials_file)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "content-dir" => Some(self.content_dir.display().to_string()),
            "archive-dir" => Some(self.archive_dir.display().to_string()),
            "credentials-file" => Some(self.credentials_file.display().to_string()),
            "log-level" => Some(self.log_level.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        if value.trim().is_empty() {
            return Err(format!("{} cannot be empty", key));
        }
        match key {
            "content-dir" => self.content_dir = PathBuf::from(value),
            "archive-dir" => self.archive_dir = PathBuf::from(value),
            "credentials-file" => self.credentials_file = PathBuf::from(value),
            "log-level" => self.log_level = value.to_string(),
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QuireConfig::default();
        assert_eq!(config.content_dir, PathBuf::from("content"));
        assert_eq!(config.archive_dir, PathBuf::from("archive"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_paths_resolve_against_data_dir() {
        let config = QuireConfig::default();
        let data = Path::new("/srv/quire");
        assert_eq!(config.content_path(data), PathBuf::from("/srv/quire/content"));
        assert_eq!(
            config.credentials_path(data),
            PathBuf::from("/srv/quire/users.json")
        );
    }

    #[test]
    fn test_absolute_paths_win() {
        let mut config = QuireConfig::default();
        config.set("archive-dir", "/var/archive").unwrap();
        assert_eq!(
            config.archive_path(Path::new("/srv/quire")),
            PathBuf::from("/var/archive")
        );
    }

    #[test]
    fn test_get_and_set() {
        let mut config = QuireConfig::default();
        config.set("log-level", "debug").unwrap();
        assert_eq!(config.get("log-level").as_deref(), Some("debug"));
        assert!(config.set("colour", "blue").is_err());
        assert!(config.set("content-dir", " ").is_err());
        assert_eq!(config.get("colour"), None);
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = QuireConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config, QuireConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();

        let mut config = QuireConfig::default();
        config.set("content-dir", "docs").unwrap();
        config.save(temp_dir.path()).unwrap();

        let loaded = QuireConfig::load(temp_dir.path()).unwrap();
        assert_eq!(loaded.content_dir, PathBuf::from("docs"));
        assert_eq!(loaded.archive_dir, PathBuf::from("archive"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILENAME),
            r#"{ "log_level": "info" }"#,
        )
        .unwrap();

        let loaded = QuireConfig::load(temp_dir.path()).unwrap();
        assert_eq!(loaded.log_level, "info");
        assert_eq!(loaded.content_dir, PathBuf::from("content"));
    }

    #[test]
    fn test_invalid_file_is_a_config_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILENAME), "{ nope").unwrap();
        assert!(matches!(
            QuireConfig::load(temp_dir.path()),
            Err(QuireError::Config(_))
        ));
    }
}
