use crate::commands::{CmdMessage, CmdResult};
use crate::error::{QuireError, Result};
use crate::model::{duplicate_name, ensure_contained, validate_name, Document};
use crate::store::DocumentStore;

/// Copy a document's raw content to `dup_{name}`.
pub fn run<S: DocumentStore>(store: &S, name: &str) -> Result<CmdResult> {
    ensure_contained(name)?;

    let content = store
        .read_document(name)?
        .ok_or_else(|| QuireError::NotFound(name.to_string()))?;

    let target = duplicate_name(name);
    validate_name(&target)?;

    if !store.create_document(&target)? {
        return Err(QuireError::DuplicateName(target));
    }
    if !content.is_empty() {
        if let Err(e) = store.write_document(&target, &content) {
            if let Err(cleanup) = store.delete_document(&target) {
                tracing::warn!(target = %target, error = %cleanup, "could not remove partial duplicate");
            }
            return Err(e);
        }
    }
    tracing::info!(source = name, target = %target, "duplicated document");

    let message = format!("{} has been duplicated as {}.", name, target);
    let document = Document::new(target.clone(), store.document_path(&target), content);
    Ok(CmdResult::default()
        .with_documents(vec![document])
        .with_message(CmdMessage::success(message)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{create, update};
    use crate::store::memory::InMemoryStore;

    #[test]
    fn copies_raw_content() {
        let store = InMemoryStore::new();
        create::run(&store, "about.md").unwrap();
        update::run(&store, "about.md", "# About").unwrap();

        let result = run(&store, "about.md").unwrap();
        assert_eq!(result.documents[0].name, "dup_about.md");
        assert_eq!(
            store.read_document("dup_about.md").unwrap().as_deref(),
            Some("# About")
        );
        assert_eq!(store.read_document("about.md").unwrap().as_deref(), Some("# About"));
    }

    #[test]
    fn does_not_archive() {
        let store = InMemoryStore::new();
        create::run(&store, "a.txt").unwrap();
        run(&store, "a.txt").unwrap();
        assert!(store.list_archive().unwrap().is_empty());
    }

    #[test]
    fn existing_target_is_rejected() {
        let store = InMemoryStore::new();
        create::run(&store, "a.txt").unwrap();
        create::run(&store, "dup_a.txt").unwrap();
        update::run(&store, "dup_a.txt", "mine").unwrap();

        assert!(matches!(run(&store, "a.txt"), Err(QuireError::DuplicateName(n)) if n == "dup_a.txt"));
        assert_eq!(store.read_document("dup_a.txt").unwrap().as_deref(), Some("mine"));
    }

    #[test]
    fn failed_copy_leaves_no_target() {
        let store = InMemoryStore::new();
        create::run(&store, "a.txt").unwrap();
        update::run(&store, "a.txt", "body").unwrap();
        store.set_fail_document_writes(true);

        assert!(matches!(run(&store, "a.txt"), Err(QuireError::Io(_))));
        assert_eq!(store.list_documents().unwrap(), vec!["a.txt"]);
    }

    #[test]
    fn source_outside_the_root_is_rejected() {
        let store = InMemoryStore::new();
        for name in ["../a.txt", "/etc/passwd", "sub/a.txt"] {
            assert!(matches!(run(&store, name), Err(QuireError::InvalidName(_))));
        }
        assert!(store.list_documents().unwrap().is_empty());
    }

    #[test]
    fn missing_source() {
        let store = InMemoryStore::new();
        assert!(matches!(run(&store, "a.txt"), Err(QuireError::NotFound(_))));
    }

    #[test]
    fn target_must_fit_the_name_rules() {
        let store = InMemoryStore::new();
        let name = format!("{}.txt", "n".repeat(25));
        create::run(&store, &name).unwrap();
        assert!(matches!(run(&store, &name), Err(QuireError::InvalidName(_))));
    }
}
