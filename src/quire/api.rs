//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every quire operation, whatever the transport.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Gates** writes on the [`Session`] being signed in
//! - **Serializes** mutations: one lock for documents and their archive, one
//!   (inside [`CredentialStore`]) for the credential file
//! - **Dispatches** to the appropriate command function
//! - **Recovers** non-fatal errors into the session's flash message
//!
//! ## Flash Delivery
//!
//! Success messages of mutating operations and the messages of non-fatal
//! errors are placed in the session's flash. Errors are still returned, so a
//! transport can pick the next step with [`QuireError::next_step`]. Fatal
//! errors (corrupt credential store, I/O) are returned untouched.
//!
//! ## Concurrency
//!
//! `QuireApi` is `Sync`; share it with `Arc` across request handlers. Reads
//! take no lock. Create, update, delete and duplicate run under one
//! document mutation lock, which is what keeps archive sequence numbers
//! gap-free and unique. The lock is a [`ProcessLock`] on
//! [`MUTATION_LOCK_FILE`] in the data directory, so separate CLI processes
//! sharing one data directory are serialized as well.

use crate::auth::CredentialStore;
use crate::commands;
use crate::error::{QuireError, Result};
use crate::lock::ProcessLock;
use crate::session::Session;
use crate::store::DocumentStore;

pub const SIGNED_IN_MESSAGE: &str = "Welcome!";
pub const SIGNED_OUT_MESSAGE: &str = "You have been signed out.";
pub const INVALID_SIGN_IN_MESSAGE: &str = "Invalid credentials.";

/// Lock file held in the data directory while a document mutation runs.
pub const MUTATION_LOCK_FILE: &str = ".quire-mutation.lock";

/// The main API facade for quire operations.
///
/// Generic over `DocumentStore` to allow different storage backends.
pub struct QuireApi<S: DocumentStore> {
    store: S,
    credentials: CredentialStore,
    paths: commands::QuirePaths,
    mutation_lock: ProcessLock,
}

impl<S: DocumentStore> QuireApi<S> {
    pub fn new(store: S, credentials: CredentialStore, paths: commands::QuirePaths) -> Self {
        let mutation_lock = ProcessLock::new(paths.data_dir.join(MUTATION_LOCK_FILE));
        Self {
            store,
            credentials,
            paths,
            mutation_lock,
        }
    }

    // --- Reads ---

    pub fn list_documents(&self) -> Result<commands::CmdResult> {
        commands::list::run(&self.store)
    }

    pub fn view_document(&self, session: &mut Session, name: &str) -> Result<commands::CmdResult> {
        deliver(session, commands::view::run(&self.store, name))
    }

    pub fn history(
        &self,
        session: &mut Session,
        name: Option<&str>,
    ) -> Result<commands::CmdResult> {
        deliver(session, commands::history::run(&self.store, name))
    }

    pub fn view_snapshot(
        &self,
        session: &mut Session,
        file_name: &str,
    ) -> Result<commands::CmdResult> {
        deliver(session, commands::snapshot::run(&self.store, file_name))
    }

    // --- Writes (signed in only) ---

    pub fn create_document(
        &self,
        session: &mut Session,
        name: &str,
    ) -> Result<commands::CmdResult> {
        self.mutate(session, "create", |store| commands::create::run(store, name))
    }

    pub fn update_document(
        &self,
        session: &mut Session,
        name: &str,
        content: &str,
    ) -> Result<commands::CmdResult> {
        self.mutate(session, "update", |store| {
            commands::update::run(store, name, content)
        })
    }

    pub fn delete_document(
        &self,
        session: &mut Session,
        name: &str,
    ) -> Result<commands::CmdResult> {
        self.mutate(session, "delete", |store| commands::delete::run(store, name))
    }

    pub fn duplicate_document(
        &self,
        session: &mut Session,
        name: &str,
    ) -> Result<commands::CmdResult> {
        self.mutate(session, "duplicate", |store| {
            commands::duplicate::run(store, name)
        })
    }

    // --- Accounts ---

    pub fn sign_up(
        &self,
        session: &mut Session,
        username: &str,
        password: &str,
    ) -> Result<commands::CmdResult> {
        let result = self
            .credentials
            .register(username, password)
            .map(|_| {
                commands::CmdResult::default().with_message(commands::CmdMessage::success(
                    format!("{} has been registered. Sign in to continue.", username),
                ))
            });
        deliver(session, result)
    }

    pub fn sign_in(
        &self,
        session: &mut Session,
        username: &str,
        password: &str,
    ) -> Result<commands::CmdResult> {
        if !self.credentials.verify(username, password)? {
            tracing::warn!(username, "failed sign-in");
            return deliver(
                session,
                Err(QuireError::InvalidCredentials(
                    INVALID_SIGN_IN_MESSAGE.to_string(),
                )),
            );
        }

        session.sign_in(username);
        tracing::info!(username, "signed in");
        deliver(
            session,
            Ok(commands::CmdResult::default()
                .with_message(commands::CmdMessage::success(SIGNED_IN_MESSAGE))),
        )
    }

    pub fn sign_out(&self, session: &mut Session) -> commands::CmdResult {
        if let Some(user) = session.current_user() {
            tracing::info!(username = user, "signed out");
        }
        session.sign_out();
        session.set_flash(SIGNED_OUT_MESSAGE);
        commands::CmdResult::default()
    }

    // --- Setup ---

    pub fn init(&self) -> Result<commands::CmdResult> {
        commands::init::run(&self.paths)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn paths(&self) -> &commands::QuirePaths {
        &self.paths
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    fn mutate<F>(&self, session: &mut Session, op: &str, f: F) -> Result<commands::CmdResult>
    where
        F: FnOnce(&S) -> Result<commands::CmdResult>,
    {
        if let Err(e) = session.require_signed_in() {
            tracing::warn!(op, "rejected write from anonymous session");
            return deliver(session, Err(e));
        }

        let result = self.mutation_lock.with(|| f(&self.store));
        deliver(session, result)
    }
}

/// Move the outcome of an operation into the session's flash.
fn deliver(
    session: &mut Session,
    result: Result<commands::CmdResult>,
) -> Result<commands::CmdResult> {
    match result {
        Ok(mut res) => {
            if let Some(message) = res.take_success() {
                session.set_flash(message);
            }
            Ok(res)
        }
        Err(e) if !e.is_fatal() => {
            session.set_flash(e.to_string());
            Err(e)
        }
        Err(e) => Err(e),
    }
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel, QuirePaths};
pub use crate::error::NextStep;
