//! # Mutation Locks
//!
//! Every CLI invocation is its own process, so an in-memory `Mutex` alone
//! does not serialize writers. A [`ProcessLock`] pairs one with an advisory
//! lock on a file (`flock` on Unix, `LockFileEx` on Windows): threads queue
//! on the mutex, processes queue on the file.
//!
//! The lock file is never removed. It holds no data; only its lock matters.

use crate::error::Result;
use fd_lock::RwLock;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

pub struct ProcessLock {
    path: PathBuf,
    threads: Mutex<()>,
}

impl ProcessLock {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            threads: Mutex::new(()),
        }
    }

    /// Run `f` while holding the lock exclusively. Blocks until it is free.
    pub fn with<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let _thread_guard = self.threads.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.path)?;

        let mut lock = RwLock::new(file);
        let _file_guard = lock.write()?;
        tracing::trace!(path = %self.path.display(), "lock acquired");
        f()
    }
}
