use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::DocumentStore;

pub fn run<S: DocumentStore>(store: &S) -> Result<CmdResult> {
    let names = store.list_documents()?;
    Ok(CmdResult::default().with_names(names))
}
