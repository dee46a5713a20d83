use super::DocumentStore;
use crate::error::{QuireError, Result};
use crate::model::ensure_contained;
use chrono::{DateTime, Utc};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use uuid::Uuid;

const TMP_PREFIX: &str = ".quire-";

pub struct FileStore {
    content_root: PathBuf,
    archive_root: PathBuf,
}

impl FileStore {
    pub fn new(content_root: PathBuf, archive_root: PathBuf) -> Self {
        Self {
            content_root,
            archive_root,
        }
    }

    /// Create both directories if they are missing.
    pub fn init(&self) -> Result<()> {
        ensure_dir(&self.content_root)?;
        ensure_dir(&self.archive_root)
    }

    fn resolve(root: &Path, name: &str) -> Result<PathBuf> {
        ensure_contained(name)?;
        Ok(root.join(name))
    }
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(QuireError::Io)?;
    }
    Ok(())
}

fn list_files(root: &Path) -> Result<Vec<String>> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(root).map_err(QuireError::Io)? {
        let entry = entry.map_err(QuireError::Io)?;
        if !entry.file_type().map_err(QuireError::Io)?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if !name.starts_with(TMP_PREFIX) {
                names.push(name.to_string());
            }
        }
    }
    tracing::debug!(root = %root.display(), count = names.len(), "scanned directory");
    Ok(names)
}

fn read_file(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    fs::read_to_string(path).map(Some).map_err(QuireError::Io)
}

impl DocumentStore for FileStore {
    fn list_documents(&self) -> Result<Vec<String>> {
        list_files(&self.content_root)
    }

    fn read_document(&self, name: &str) -> Result<Option<String>> {
        let path = Self::resolve(&self.content_root, name)?;
        read_file(&path)
    }

    fn create_document(&self, name: &str) -> Result<bool> {
        let path = Self::resolve(&self.content_root, name)?;
        ensure_dir(&self.content_root)?;

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(QuireError::Io(e)),
        }
    }

    fn write_document(&self, name: &str, content: &str) -> Result<()> {
        let target_path = Self::resolve(&self.content_root, name)?;
        ensure_dir(&self.content_root)?;

        // Atomic Write
        let tmp_path = self
            .content_root
            .join(format!("{}{}.tmp", TMP_PREFIX, Uuid::new_v4()));
        fs::write(&tmp_path, content).map_err(QuireError::Io)?;
        if let Err(e) = fs::rename(&tmp_path, &target_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(QuireError::Io(e));
        }

        Ok(())
    }

    fn delete_document(&self, name: &str) -> Result<bool> {
        let path = Self::resolve(&self.content_root, name)?;
        if !path.is_file() {
            return Ok(false);
        }
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(QuireError::Io(e)),
        }
    }

    fn document_path(&self, name: &str) -> PathBuf {
        self.content_root.join(name)
    }

    fn list_archive(&self) -> Result<Vec<String>> {
        list_files(&self.archive_root)
    }

    fn read_archive(&self, file_name: &str) -> Result<Option<String>> {
        let path = Self::resolve(&self.archive_root, file_name)?;
        read_file(&path)
    }

    fn archive_path(&self, file_name: &str) -> PathBuf {
        self.archive_root.join(file_name)
    }

    fn write_archive(&self, file_name: &str, content: &str) -> Result<PathBuf> {
        let path = Self::resolve(&self.archive_root, file_name)?;
        ensure_dir(&self.archive_root)?;

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(QuireError::Io)?;

        // Never leave a truncated snapshot behind
        if let Err(e) = file.write_all(content.as_bytes()).and_then(|_| file.sync_all()) {
            drop(file);
            let _ = fs::remove_file(&path);
            return Err(QuireError::Io(e));
        }

        Ok(path)
    }

    fn archive_mtime(&self, file_name: &str) -> Result<Option<DateTime<Utc>>> {
        let path = Self::resolve(&self.archive_root, file_name)?;
        if !path.is_file() {
            return Ok(None);
        }
        let meta = fs::metadata(path).map_err(QuireError::Io)?;
        let modified: DateTime<Utc> = meta.modified().unwrap_or(SystemTime::now()).into();
        Ok(Some(modified))
    }
}
