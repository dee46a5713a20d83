use crate::archive;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::ArchiveEntry;
use crate::store::DocumentStore;

/// With a name, the snapshots of that document oldest first. Without one,
/// every snapshot in the archive, sorted by file name.
pub fn run<S: DocumentStore>(store: &S, name: Option<&str>) -> Result<CmdResult> {
    let entries = match name {
        Some(name) => archive::history(store, name)?,
        None => archive::list(store, None)?
            .iter()
            .filter_map(|file_name| ArchiveEntry::parse(file_name))
            .map(|entry| {
                let modified = store.archive_mtime(&entry.file_name())?;
                Ok(entry.with_modified(modified))
            })
            .collect::<Result<Vec<_>>>()?,
    };

    let mut result = CmdResult::default();
    if entries.is_empty() {
        result.add_message(CmdMessage::info(match name {
            Some(name) => format!("{} has no archived versions.", name),
            None => "The archive is empty.".to_string(),
        }));
    }
    Ok(result.with_archived(entries))
}
