use crate::commands::{CmdMessage, CmdResult};
use crate::error::{QuireError, Result};
use crate::model::{validate_name, Document};
use crate::store::DocumentStore;

pub fn run<S: DocumentStore>(store: &S, name: &str) -> Result<CmdResult> {
    validate_name(name)?;

    if !store.create_document(name)? {
        return Err(QuireError::DuplicateName(name.to_string()));
    }
    tracing::info!(name, "created document");

    let document = Document::new(name, store.document_path(name), String::new());
    Ok(CmdResult::default()
        .with_documents(vec![document])
        .with_message(CmdMessage::success(format!("{} has been created.", name))))
}
