use super::DocumentStore;
use crate::error::{QuireError, Result};
use crate::model::ensure_contained;
use chrono::{DateTime, Utc};
use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

#[derive(Clone)]
struct ArchiveFile {
    content: String,
    mtime: DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
    // Vec keeps insertion order, which stands in for directory order
    documents: Vec<(String, String)>,
    archive: Vec<(String, ArchiveFile)>,
    fail_archive_writes: bool,
    fail_document_writes: bool,
}

/// In-memory storage for testing.
///
/// Uses a `Mutex` rather than `RefCell` because stores must be `Sync`.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `write_archive` fail, for testing the abort path of edits.
    pub fn set_fail_archive_writes(&self, fail: bool) {
        self.lock().fail_archive_writes = fail;
    }

    /// Make every `write_document` fail after the snapshot has been taken.
    pub fn set_fail_document_writes(&self, fail: bool) {
        self.lock().fail_document_writes = fail;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panicking test thread must not take every other test down with it
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn simulated_failure(what: &str) -> QuireError {
    QuireError::Io(io::Error::new(
        io::ErrorKind::Other,
        format!("simulated {} failure", what),
    ))
}

impl DocumentStore for InMemoryStore {
    fn list_documents(&self) -> Result<Vec<String>> {
        Ok(self.lock().documents.iter().map(|(n, _)| n.clone()).collect())
    }

    fn read_document(&self, name: &str) -> Result<Option<String>> {
        ensure_contained(name)?;
        Ok(self
            .lock()
            .documents
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c.clone()))
    }

    fn create_document(&self, name: &str) -> Result<bool> {
        ensure_contained(name)?;
        let mut inner = self.lock();
        if inner.documents.iter().any(|(n, _)| n == name) {
            return Ok(false);
        }
        inner.documents.push((name.to_string(), String::new()));
        Ok(true)
    }

    fn write_document(&self, name: &str, content: &str) -> Result<()> {
        ensure_contained(name)?;
        let mut inner = self.lock();
        if inner.fail_document_writes {
            return Err(simulated_failure("document write"));
        }
        match inner.documents.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = content.to_string(),
            None => inner.documents.push((name.to_string(), content.to_string())),
        }
        Ok(())
    }

    fn delete_document(&self, name: &str) -> Result<bool> {
        ensure_contained(name)?;
        let mut inner = self.lock();
        let before = inner.documents.len();
        inner.documents.retain(|(n, _)| n != name);
        Ok(inner.documents.len() != before)
    }

    fn document_path(&self, name: &str) -> PathBuf {
        PathBuf::from("/memory/content").join(name)
    }

    fn list_archive(&self) -> Result<Vec<String>> {
        Ok(self.lock().archive.iter().map(|(n, _)| n.clone()).collect())
    }

    fn read_archive(&self, file_name: &str) -> Result<Option<String>> {
        ensure_contained(file_name)?;
        Ok(self
            .lock()
            .archive
            .iter()
            .find(|(n, _)| n == file_name)
            .map(|(_, f)| f.content.clone()))
    }

    fn archive_path(&self, file_name: &str) -> PathBuf {
        PathBuf::from("/memory/archive").join(file_name)
    }

    fn write_archive(&self, file_name: &str, content: &str) -> Result<PathBuf> {
        ensure_contained(file_name)?;
        let mut inner = self.lock();
        if inner.fail_archive_writes {
            return Err(simulated_failure("archive write"));
        }
        if inner.archive.iter().any(|(n, _)| n == file_name) {
            return Err(QuireError::Io(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} is already archived", file_name),
            )));
        }
        inner.archive.push((
            file_name.to_string(),
            ArchiveFile {
                content: content.to_string(),
                mtime: Utc::now(),
            },
        ));
        Ok(self.archive_path(file_name))
    }

    fn archive_mtime(&self, file_name: &str) -> Result<Option<DateTime<Utc>>> {
        ensure_contained(file_name)?;
        Ok(self
            .lock()
            .archive
            .iter()
            .find(|(n, _)| n == file_name)
            .map(|(_, f)| f.mtime))
    }
}
