use crate::commands::{CmdMessage, CmdResult};
use crate::error::{QuireError, Result};
use crate::model::ensure_contained;
use crate::store::DocumentStore;

pub fn run<S: DocumentStore>(store: &S, name: &str) -> Result<CmdResult> {
    ensure_contained(name)?;

    if !store.delete_document(name)? {
        return Err(QuireError::NotFound(name.to_string()));
    }
    tracing::info!(name, "deleted document");

    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!("{} has been deleted.", name))))
}
