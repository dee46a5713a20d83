//! # Archive Manager
//!
//! Before a document is overwritten, its current content is saved as
//! `{base_name}_{sequence}{extension}` in the archive directory.
//!
//! Sequences are per base name, start at 1 and only go up. The next one is
//! derived from what is already on disk: one past the highest existing
//! sequence for the base name. Snapshots are never deleted, so that is the
//! same as `count + 1`. A gap left by a snapshot removed by hand is never
//! refilled.
//!
//! Computing a sequence and writing the snapshot is a scan-then-write, so
//! callers must hold the document mutation lock (see [`crate::api`]).
//!
//! Base names are matched exactly: `note` and `notes` are separate histories,
//! while `notes.txt` and `notes.md` share one.

use crate::error::{QuireError, Result};
use crate::model::{ensure_contained, split_name, ArchiveEntry};
use crate::store::DocumentStore;
use std::path::PathBuf;

/// Entries belonging to `base_name`, in enumeration order.
fn entries_for<S: DocumentStore>(store: &S, base_name: &str) -> Result<Vec<ArchiveEntry>> {
    Ok(store
        .list_archive()?
        .iter()
        .filter_map(|file_name| ArchiveEntry::parse(file_name))
        .filter(|entry| entry.base_name == base_name)
        .collect())
}

pub fn next_sequence<S: DocumentStore>(store: &S, base_name: &str) -> Result<u32> {
    let highest = entries_for(store, base_name)?
        .iter()
        .map(|entry| entry.sequence)
        .max()
        .unwrap_or(0);
    highest
        .checked_add(1)
        .ok_or_else(|| QuireError::ArchiveExhausted(base_name.to_string()))
}

/// Save `content` as the next snapshot of `base_name`.
pub fn archive<S: DocumentStore>(
    store: &S,
    base_name: &str,
    extension: &str,
    content: &str,
) -> Result<(ArchiveEntry, PathBuf)> {
    let sequence = next_sequence(store, base_name)?;
    let entry = ArchiveEntry::new(base_name, sequence, extension);
    let path = store.write_archive(&entry.file_name(), content)?;

    tracing::info!(file = %entry.file_name(), "archived snapshot");
    Ok((entry, path))
}

/// Archive file names, sorted. With a filter, only snapshots of that
/// document (given by name, with or without extension) are returned.
pub fn list<S: DocumentStore>(store: &S, name_filter: Option<&str>) -> Result<Vec<String>> {
    let mut names = store.list_archive()?;

    if let Some(name) = name_filter {
        let (base, _) = split_name(name);
        names.retain(|file_name| {
            ArchiveEntry::parse(file_name).is_some_and(|entry| entry.base_name == base)
        });
    }

    names.sort();
    Ok(names)
}

/// Snapshots of one document, oldest first.
pub fn history<S: DocumentStore>(store: &S, name: &str) -> Result<Vec<ArchiveEntry>> {
    ensure_contained(name)?;
    let (base, _) = split_name(name);

    let mut entries = entries_for(store, base)?;
    entries.sort_by_key(|entry| entry.sequence);

    entries
        .into_iter()
        .map(|entry| {
            let modified = store.archive_mtime(&entry.file_name())?;
            Ok(entry.with_modified(modified))
        })
        .collect()
}

pub fn read_entry<S: DocumentStore>(store: &S, file_name: &str) -> Result<String> {
    ensure_contained(file_name)?;
    store
        .read_archive(file_name)?
        .ok_or_else(|| QuireError::NotFound(file_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn sequences_start_at_one_and_increase() {
        let store = InMemoryStore::new();
        assert_eq!(next_sequence(&store, "notes").unwrap(), 1);

        let (first, _) = archive(&store, "notes", ".txt", "").unwrap();
        let (second, _) = archive(&store, "notes", ".txt", "a").unwrap();
        assert_eq!(first.file_name(), "notes_1.txt");
        assert_eq!(second.file_name(), "notes_2.txt");
        assert_eq!(store.read_archive("notes_2.txt").unwrap().as_deref(), Some("a"));
    }

    #[test]
    fn base_names_are_matched_exactly() {
        let store = InMemoryStore::new();
        archive(&store, "notes", ".txt", "").unwrap();
        archive(&store, "notes", ".txt", "").unwrap();
        archive(&store, "my_notes", ".txt", "").unwrap();

        assert_eq!(next_sequence(&store, "note").unwrap(), 1);
        assert_eq!(next_sequence(&store, "my_notes").unwrap(), 2);
        assert_eq!(next_sequence(&store, "notes").unwrap(), 3);
    }

    #[test]
    fn never_reuses_a_number_after_a_gap() {
        let store = InMemoryStore::new();
        store.write_archive("notes_4.txt", "").unwrap();
        assert_eq!(next_sequence(&store, "notes").unwrap(), 5);
    }

    #[test]
    fn highest_possible_sequence_is_an_error() {
        let store = InMemoryStore::new();
        store
            .write_archive(&format!("notes_{}.txt", u32::MAX), "")
            .unwrap();

        assert!(matches!(
            next_sequence(&store, "notes"),
            Err(QuireError::ArchiveExhausted(_))
        ));
        assert!(archive(&store, "notes", ".txt", "new").is_err());
        assert_eq!(store.list_archive().unwrap().len(), 1);
    }

    #[test]
    fn extensions_share_a_history() {
        let store = InMemoryStore::new();
        archive(&store, "notes", ".txt", "").unwrap();
        let (entry, _) = archive(&store, "notes", ".md", "").unwrap();
        assert_eq!(entry.file_name(), "notes_2.md");
    }

    #[test]
    fn list_is_sorted_and_filterable() {
        let store = InMemoryStore::new();
        archive(&store, "zeta", ".md", "").unwrap();
        archive(&store, "alpha", ".txt", "").unwrap();
        archive(&store, "alpha", ".txt", "").unwrap();

        assert_eq!(
            list(&store, None).unwrap(),
            vec!["alpha_1.txt", "alpha_2.txt", "zeta_1.md"]
        );
        assert_eq!(list(&store, Some("zeta.md")).unwrap(), vec!["zeta_1.md"]);
        assert_eq!(list(&store, Some("alpha")).unwrap().len(), 2);
        assert!(list(&store, Some("missing.txt")).unwrap().is_empty());
    }

    #[test]
    fn history_orders_numerically() {
        let store = InMemoryStore::new();
        for _ in 0..10 {
            archive(&store, "log", ".txt", "").unwrap();
        }
        let seqs: Vec<u32> = history(&store, "log.txt")
            .unwrap()
            .iter()
            .map(|e| e.sequence)
            .collect();
        assert_eq!(seqs, (1..=10).collect::<Vec<_>>());
        assert!(history(&store, "log.txt").unwrap()[0].modified.is_some());
    }

    #[test]
    fn read_entry_reports_missing_snapshots() {
        let store = InMemoryStore::new();
        assert!(matches!(
            read_entry(&store, "nope_1.txt"),
            Err(QuireError::NotFound(_))
        ));
        assert!(matches!(
            read_entry(&store, "../nope_1.txt"),
            Err(QuireError::InvalidName(_))
        ));
    }
}
