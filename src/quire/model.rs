use crate::error::{QuireError, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Longest allowed name, not counting the extension.
pub const MAX_NAME_LEN: usize = 25;

/// Prefix given to the copy made by `duplicate`.
pub const DUPLICATE_PREFIX: &str = "dup_";

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+\.(txt|md|mkd)$").expect("Invalid regex"));

/// How a document's content is presented, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocKind {
    Markdown,
    PlainText,
}

impl DocKind {
    /// Accepts the extension with or without the leading dot.
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim_start_matches('.') {
            "md" | "mkd" => DocKind::Markdown,
            _ => DocKind::PlainText,
        }
    }

    pub fn from_name(name: &str) -> Self {
        let (_, ext) = split_name(name);
        Self::from_extension(ext)
    }
}

/// A live document as read from the content directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub path: PathBuf,
    pub content: String,
    pub kind: DocKind,
}

impl Document {
    pub fn new(name: impl Into<String>, path: PathBuf, content: String) -> Self {
        let name = name.into();
        let kind = DocKind::from_name(&name);
        Self {
            name,
            path,
            content,
            kind,
        }
    }
}

/// One archived snapshot of a document, named `{base_name}_{sequence}{extension}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub base_name: String,
    pub sequence: u32,
    /// Includes the leading dot, or is empty for extensionless documents.
    pub extension: String,
    pub modified: Option<DateTime<Utc>>,
}

impl ArchiveEntry {
    pub fn new(base_name: impl Into<String>, sequence: u32, extension: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            sequence,
            extension: extension.into(),
            modified: None,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}_{}{}", self.base_name, self.sequence, self.extension)
    }

    /// Parses an archive file name. Returns `None` for files that don't follow
    /// the `{base}_{n}{ext}` layout.
    pub fn parse(file_name: &str) -> Option<Self> {
        let (stem, ext) = split_name(file_name);
        let (base, seq) = stem.rsplit_once('_')?;
        if base.is_empty() {
            return None;
        }
        let sequence: u32 = seq.parse().ok()?;
        if sequence == 0 || !seq.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self::new(base, sequence, ext))
    }

    pub fn with_modified(mut self, modified: Option<DateTime<Utc>>) -> Self {
        self.modified = modified;
        self
    }
}

/// Splits `notes.txt` into `("notes", ".txt")`. Names without an extension,
/// or dotfiles like `.profile`, get an empty extension.
pub fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(0) | None => (name, ""),
        Some(idx) => name.split_at(idx),
    }
}

/// Rejects any name that would resolve outside the directory it is joined to.
pub fn ensure_contained(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(QuireError::InvalidName("a name is required".into()));
    }
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == name => Ok(()),
        _ => Err(QuireError::InvalidName(format!(
            "{} is not a plain file name",
            name
        ))),
    }
}

/// Validates a name for a new document.
pub fn validate_name(name: &str) -> Result<()> {
    ensure_contained(name)?;

    if name.chars().any(char::is_whitespace) {
        return Err(QuireError::InvalidName("names cannot contain spaces".into()));
    }

    let (base, _) = split_name(name);
    if base.chars().count() > MAX_NAME_LEN {
        return Err(QuireError::InvalidName(format!(
            "{} is longer than {} characters",
            base, MAX_NAME_LEN
        )));
    }

    if !NAME_PATTERN.is_match(name) {
        return Err(QuireError::InvalidName(format!(
            "{} must be letters, digits or underscores ending in .txt, .md or .mkd",
            name
        )));
    }

    Ok(())
}

pub fn duplicate_name(name: &str) -> String {
    format!("{}{}", DUPLICATE_PREFIX, name)
}
