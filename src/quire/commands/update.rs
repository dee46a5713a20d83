use crate::archive;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{QuireError, Result};
use crate::model::{ensure_contained, split_name, Document};
use crate::store::DocumentStore;

/// Replace a document's content, archiving what was there first.
///
/// If the snapshot cannot be written the live document is left alone. If the
/// snapshot is written but the replace fails, the extra snapshot stays.
pub fn run<S: DocumentStore>(store: &S, name: &str, content: &str) -> Result<CmdResult> {
    ensure_contained(name)?;

    let previous = store
        .read_document(name)?
        .ok_or_else(|| QuireError::NotFound(name.to_string()))?;

    let (base, ext) = split_name(name);
    let (entry, _) = archive::archive(store, base, ext, &previous)?;

    store.write_document(name, content)?;
    tracing::info!(name, archived = %entry.file_name(), "updated document");

    let document = Document::new(name, store.document_path(name), content.to_string());
    Ok(CmdResult::default()
        .with_documents(vec![document])
        .with_archived(vec![entry])
        .with_message(CmdMessage::success(format!("{} has been updated.", name))))
}
