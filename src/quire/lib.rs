//! # Quire Architecture
//!
//! Quire is a **versioned flat-file document store**. Every document is one
//! file in a content directory; every edit first copies the previous version
//! into an archive directory under a numbered name. Reading is open to
//! everyone, changing anything requires a signed-in session.
//!
//! Like any quire front-end, the bundled CLI is just a client of the library.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - Persists the session between invocations                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Gates writes on the session, serializes mutations        │
//! │  - Turns outcomes into the session's flash message          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs, archive.rs, render.rs)       │
//! │  - Pure business logic                                      │
//! │  - Operates on Rust types, returns Rust types               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract DocumentStore trait                             │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Credentials ([`auth`]) and sessions ([`session`]) sit beside the
//! command layer; the API is the only place they meet the documents.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code:
//! - Takes regular Rust function arguments
//! - Returns regular Rust types (`Result<CmdResult>`)
//! - **Never** writes to stdout/stderr
//! - **Never** calls `std::process::exit`
//!
//! The same core could sit behind an HTTP handler: a session per cookie,
//! one shared `QuireApi` in an `Arc`.
//!
//! ## Testing Strategy
//!
//! 1. **Commands** (`commands/*.rs`): unit tests against `InMemoryStore`.
//! 2. **API** (`api.rs`): gating, flash delivery, sign-in transitions.
//! 3. **Integration** (`tests/`): `FileStore` on a temp dir, concurrency,
//!    and the binary driven end to end.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`archive`]: Snapshot naming and sequence numbers
//! - [`auth`]: Credential store and password hashing
//! - [`session`]: Signed-in state and the one-shot flash message
//! - [`render`]: Content-type selection and Markdown rendering
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types and name validation
//! - [`config`]: Configuration management
//! - [`editor`]: External editor integration
//! - [`lock`]: Locks that hold across threads and processes
//! - [`error`]: Error types

pub mod api;
pub mod archive;
pub mod auth;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod lock;
pub mod model;
pub mod render;
pub mod session;
pub mod store;
