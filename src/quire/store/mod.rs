//! # Storage Layer
//!
//! The [`DocumentStore`] trait is the raw I/O boundary for documents and
//! their archived snapshots. It knows nothing about sessions, sequence
//! numbers, or rendering; that logic lives in `commands/` and `archive.rs`.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production storage, two plain directories
//! - [`memory::InMemoryStore`]: for testing logic without filesystem I/O
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── content/            # One file per live document, file name == document name
//! │   └── notes.txt
//! ├── archive/            # Snapshots taken before each edit
//! │   ├── notes_1.txt
//! │   └── notes_2.txt
//! ├── users.json          # Credential store (see auth.rs)
//! ├── session.json        # CLI session (see session.rs)
//! └── config.json
//! ```
//!
//! ## Name Safety
//!
//! Every method taking a name expects it to have passed
//! [`crate::model::ensure_contained`] already. Implementations check again
//! before touching disk, so a bad name can never escape the root.
//!
//! ## Thread Safety
//!
//! Stores are `Send + Sync` and take `&self`: [`crate::api::QuireApi`] is
//! shared between threads and does its own serialization of mutations.

use crate::error::Result;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

pub mod fs;
pub mod memory;

/// Abstract interface for document and archive storage.
pub trait DocumentStore: Send + Sync {
    // --- Live documents ---

    /// Names of all live documents, in enumeration order.
    fn list_documents(&self) -> Result<Vec<String>>;

    /// Read a live document. Returns Ok(None) if it does not exist.
    fn read_document(&self, name: &str) -> Result<Option<String>>;

    /// Create an empty document. Returns Ok(false) if the name was taken.
    fn create_document(&self, name: &str) -> Result<bool>;

    /// Replace a document's content.
    /// MUST be atomic (write to tmp then rename) to avoid partial writes.
    fn write_document(&self, name: &str, content: &str) -> Result<()>;

    /// Remove a document. Returns Ok(false) if it did not exist.
    fn delete_document(&self, name: &str) -> Result<bool>;

    /// Location of a document. For InMemoryStore, a virtual path.
    fn document_path(&self, name: &str) -> PathBuf;

    // --- Archive ---

    /// File names of all archived snapshots, in enumeration order.
    fn list_archive(&self) -> Result<Vec<String>>;

    fn read_archive(&self, file_name: &str) -> Result<Option<String>>;

    fn archive_path(&self, file_name: &str) -> PathBuf;

    /// Write a new snapshot. Fails rather than overwrite an existing one.
    fn write_archive(&self, file_name: &str, content: &str) -> Result<PathBuf>;

    fn archive_mtime(&self, file_name: &str) -> Result<Option<DateTime<Utc>>>;
}
