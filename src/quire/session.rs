//! # Session Gate
//!
//! A session is either `Anonymous` or `SignedIn(username)`, and carries at
//! most one pending flash message.
//!
//! ```text
//!   Anonymous ──sign in (valid credentials)──▶ SignedIn(user)
//!       ▲                                          │
//!       └──────────────── sign out ────────────────┘
//! ```
//!
//! Write operations call [`Session::require_signed_in`]. Failing it never
//! changes the state.
//!
//! The flash is a single slot. [`Session::take_flash`] empties it as it reads
//! it, so a message is delivered exactly once no matter how the transport
//! renders responses.
//!
//! The transport owns the session's lifetime. The CLI keeps it in
//! `session.json` between invocations; see [`Session::load`].

use crate::error::{QuireError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use uuid::Uuid;

pub const SESSION_FILENAME: &str = "session.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "username")]
pub enum SessionState {
    #[default]
    Anonymous,
    SignedIn(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    state: SessionState,
    #[serde(default)]
    flash: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current_user(&self) -> Option<&str> {
        match &self.state {
            SessionState::SignedIn(user) => Some(user.as_str()),
            SessionState::Anonymous => None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.current_user().is_some()
    }

    pub fn require_signed_in(&self) -> Result<&str> {
        self.current_user().ok_or(QuireError::Unauthorized)
    }

    /// Transition to `SignedIn`. Credentials must already have been verified.
    pub(crate) fn sign_in(&mut self, username: &str) {
        self.state = SessionState::SignedIn(username.to_string());
    }

    pub fn sign_out(&mut self) {
        self.state = SessionState::Anonymous;
    }

    /// Replaces any flash that has not been delivered yet.
    pub fn set_flash(&mut self, message: impl Into<String>) {
        self.flash = Some(message.into());
    }

    pub fn take_flash(&mut self) -> Option<String> {
        self.flash.take()
    }

    pub fn has_flash(&self) -> bool {
        self.flash.is_some()
    }

    /// Load a session saved by [`Session::save`]. A missing or unreadable
    /// file yields a fresh anonymous session.
    pub fn load<P: AsRef<Path>>(dir: P) -> Self {
        let path = dir.as_ref().join(SESSION_FILENAME);
        let Ok(content) = fs::read_to_string(&path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "discarding unreadable session");
            Self::default()
        })
    }

    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(QuireError::Io)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(QuireError::Serialization)?;

        // Atomic write
        let tmp_file = dir.join(format!(".session-{}.tmp", Uuid::new_v4()));
        let written = fs::write(&tmp_file, content)
            .and_then(|_| fs::rename(&tmp_file, dir.join(SESSION_FILENAME)));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_file);
            return Err(QuireError::Io(e));
        }
        Ok(())
    }
}
