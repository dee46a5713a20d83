use crate::commands::CmdResult;
use crate::error::{QuireError, Result};
use crate::model::{ensure_contained, Document};
use crate::render::render;
use crate::store::DocumentStore;

/// Read a live document and render it for display.
pub fn run<S: DocumentStore>(store: &S, name: &str) -> Result<CmdResult> {
    ensure_contained(name)?;

    let content = store
        .read_document(name)?
        .ok_or_else(|| QuireError::NotFound(name.to_string()))?;
    let document = Document::new(name, store.document_path(name), content);
    let rendered = render(document.kind, &document.content);

    Ok(CmdResult::default()
        .with_rendered(rendered)
        .with_documents(vec![document]))
}
