use crate::error::{QuireError, Result};
use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;
use uuid::Uuid;

/// Gets the editor command from environment.
/// Checks $EDITOR, then $VISUAL, then falls back to common editors.
pub fn get_editor() -> Result<String> {
    for var in ["EDITOR", "VISUAL"] {
        if let Ok(editor) = env::var(var) {
            if !editor.trim().is_empty() {
                return Ok(editor);
            }
        }
    }

    for fallback in &["vim", "vi", "nano"] {
        if Command::new("which")
            .arg(fallback)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
        {
            return Ok((*fallback).to_string());
        }
    }

    Err(QuireError::Editor(
        "No editor found. Set $EDITOR environment variable.".to_string(),
    ))
}

/// Opens a file in the user's editor and waits for it to close.
/// Returns the contents of the file after editing.
pub fn open_in_editor<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let editor = get_editor()?;
    let path = file_path.as_ref();

    // $EDITOR may carry arguments, e.g. "code --wait"
    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| QuireError::Editor("Empty editor command".to_string()))?;

    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .map_err(|e| QuireError::Editor(format!("Failed to launch editor '{}': {}", editor, e)))?;

    if !status.success() {
        return Err(QuireError::Editor(format!(
            "Editor '{}' exited with non-zero status",
            editor
        )));
    }

    fs::read_to_string(path).map_err(QuireError::Io)
}

/// Opens an editor on a scratch copy of `initial` and returns the edited text.
///
/// The scratch file keeps the document's extension so editors pick the
/// right syntax mode. The live document is never touched here.
pub fn edit_content(initial: &str, extension: &str) -> Result<String> {
    let temp_file = env::temp_dir().join(format!("quire_edit_{}{}", Uuid::new_v4(), extension));

    fs::write(&temp_file, initial).map_err(QuireError::Io)?;
    let result = open_in_editor(&temp_file);
    let _ = fs::remove_file(&temp_file);

    result
}
