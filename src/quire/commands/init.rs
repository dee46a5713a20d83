use crate::commands::{CmdMessage, CmdResult, QuirePaths};
use crate::config::QuireConfig;
use crate::error::Result;
use std::fs;

/// Lay out a data directory: config file, content and archive directories.
/// Safe to run again on an existing directory; nothing is overwritten.
pub fn run(paths: &QuirePaths) -> Result<CmdResult> {
    let dir = &paths.data_dir;
    fs::create_dir_all(dir)?;

    let config = QuireConfig::load(dir)?;
    if !QuireConfig::config_path(dir).exists() {
        config.save(dir)?;
    }

    fs::create_dir_all(config.content_path(dir))?;
    fs::create_dir_all(config.archive_path(dir))?;
    tracing::info!(data_dir = %dir.display(), "initialized data directory");

    Ok(CmdResult::default()
        .with_config(config)
        .with_message(CmdMessage::success(format!(
            "Initialized quire store at {}",
            dir.display()
        ))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_layout() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("quire");
        let paths = QuirePaths::new(data_dir.clone());

        run(&paths).unwrap();

        assert!(data_dir.join("content").is_dir());
        assert!(data_dir.join("archive").is_dir());
        assert!(QuireConfig::config_path(&data_dir).is_file());
    }

    #[test]
    fn keeps_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        let paths = QuirePaths::new(dir.path().to_path_buf());
        let mut config = QuireConfig::default();
        config.set("content-dir", "pages").unwrap();
        config.save(dir.path()).unwrap();

        let res = run(&paths).unwrap();

        assert_eq!(res.config.unwrap().content_dir, config.content_dir);
        assert!(dir.path().join("pages").is_dir());
        assert!(!dir.path().join("content").exists());
    }
}
