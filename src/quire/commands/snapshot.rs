use crate::archive;
use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::Document;
use crate::render::render;
use crate::store::DocumentStore;

/// Read one archived snapshot, rendered like a live document.
pub fn run<S: DocumentStore>(store: &S, file_name: &str) -> Result<CmdResult> {
    let content = archive::read_entry(store, file_name)?;
    let document = Document::new(file_name, store.archive_path(file_name), content);
    let rendered = render(document.kind, &document.content);

    Ok(CmdResult::default()
        .with_rendered(rendered)
        .with_documents(vec![document]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{create, update};
    use crate::error::QuireError;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn shows_the_previous_content() {
        let store = InMemoryStore::new();
        create::run(&store, "guide.md").unwrap();
        update::run(&store, "guide.md", "# One").unwrap();
        update::run(&store, "guide.md", "# Two").unwrap();

        let rendered = run(&store, "guide_2.md").unwrap().rendered.unwrap();
        assert_eq!(rendered.content_type, "text/html");
        assert!(rendered.body.contains("<h1>One</h1>"));
    }

    #[test]
    fn missing_snapshot() {
        let store = InMemoryStore::new();
        assert!(matches!(
            run(&store, "guide_9.md"),
            Err(QuireError::NotFound(_))
        ));
    }
}
