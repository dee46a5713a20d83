use crate::config::QuireConfig;
use crate::model::{ArchiveEntry, Document};
use crate::render::Rendered;
use std::path::PathBuf;

pub mod config;
pub mod create;
pub mod delete;
pub mod duplicate;
pub mod history;
pub mod init;
pub mod list;
pub mod snapshot;
pub mod update;
pub mod view;

/// Where quire keeps its state on disk.
#[derive(Debug, Clone)]
pub struct QuirePaths {
    pub data_dir: PathBuf,
}

impl QuirePaths {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Documents created, changed, or read by the command
    pub documents: Vec<Document>,
    /// Names from a listing, in listing order
    pub names: Vec<String>,
    pub rendered: Option<Rendered>,
    pub archived: Vec<ArchiveEntry>,
    pub config: Option<QuireConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_documents(mut self, documents: Vec<Document>) -> Self {
        self.documents = documents;
        self
    }

    pub fn with_names(mut self, names: Vec<String>) -> Self {
        self.names = names;
        self
    }

    pub fn with_rendered(mut self, rendered: Rendered) -> Self {
        self.rendered = Some(rendered);
        self
    }

    pub fn with_archived(mut self, archived: Vec<ArchiveEntry>) -> Self {
        self.archived = archived;
        self
    }

    pub fn with_config(mut self, config: QuireConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Removes and returns the success messages, joined into one line.
    pub fn take_success(&mut self) -> Option<String> {
        let (success, rest): (Vec<_>, Vec<_>) = self
            .messages
            .drain(..)
            .partition(|m| m.level == MessageLevel::Success);
        self.messages = rest;

        if success.is_empty() {
            None
        } else {
            Some(
                success
                    .into_iter()
                    .map(|m| m.content)
                    .collect::<Vec<_>>()
                    .join(" "),
            )
        }
    }
}
