//! # CLI Layer
//!
//! This module is **one possible client** for quire, not the application.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr) and exit codes
//! - Handles argument parsing
//! - Formats output for human consumption
//! - Keeps a [`Session`] alive between invocations (in `session.json`)
//!
//! ## Flow of One Invocation
//!
//! 1. Locate the data directory (`$QUIRE_HOME`, else the platform data dir)
//! 2. Load config, start logging, open the stores, load the session
//! 3. Dispatch to the `QuireApi` method for the command
//! 4. Print the result, then the flash message (taken, so it shows once)
//! 5. Save the session and pick the exit code
//!
//! Failures that the API recovered into the flash are printed as the flash
//! plus a hint for the next step. Fatal failures are printed as `Error: ...`.

use super::print::{print_flash, print_history, print_messages, print_names, print_rendered};
use super::setup::{init_logging, AccountCommands, Cli, Commands, DocCommands, MiscCommands};
use clap::Parser;
use directories::ProjectDirs;
use quire::api::{ConfigAction, NextStep, QuireApi, QuirePaths};
use quire::auth::CredentialStore;
use quire::config::{QuireConfig, CONFIG_KEYS};
use quire::editor::edit_content;
use quire::error::{QuireError, Result};
use quire::model::split_name;
use quire::session::Session;
use quire::store::fs::FileStore;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;

/// Overrides the platform data directory.
const HOME_ENV: &str = "QUIRE_HOME";

struct AppContext {
    api: QuireApi<FileStore>,
    session: Session,
    data_dir: PathBuf,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let mut ctx = match init_context(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = dispatch(&mut ctx, cli.command);

    if let Some(flash) = ctx.session.take_flash() {
        print_flash(&flash, outcome.is_err());
    }
    if let Err(e) = ctx.session.save(&ctx.data_dir) {
        tracing::error!(error = %e, "failed to save session");
    }

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

fn report(error: &QuireError) {
    if error.is_fatal() {
        eprintln!("Error: {}", error);
        return;
    }
    match error.next_step() {
        NextStep::SignIn => eprintln!("Run `quire signin <username> <password>` first."),
        NextStep::Listing => eprintln!("Run `quire list` to see the available documents."),
        NextStep::Form => {}
    }
}

fn dispatch(ctx: &mut AppContext, command: Option<Commands>) -> Result<()> {
    match command {
        Some(Commands::Doc(cmd)) => match cmd {
            DocCommands::List => handle_list(ctx),
            DocCommands::View { name, raw } => handle_view(ctx, &name, raw),
            DocCommands::New { name } => handle_new(ctx, &name),
            DocCommands::Edit { name, content } => handle_edit(ctx, &name, content),
            DocCommands::Delete { name } => handle_delete(ctx, &name),
            DocCommands::Duplicate { name } => handle_duplicate(ctx, &name),
            DocCommands::History { name } => handle_history(ctx, name.as_deref()),
            DocCommands::Snapshot { file, raw } => handle_snapshot(ctx, &file, raw),
        },
        Some(Commands::Account(cmd)) => match cmd {
            AccountCommands::Signup { username, password } => {
                handle_signup(ctx, &username, &password)
            }
            AccountCommands::Signin { username, password } => {
                handle_signin(ctx, &username, &password)
            }
            AccountCommands::Signout => handle_signout(ctx),
            AccountCommands::Whoami => handle_whoami(ctx),
        },
        Some(Commands::Misc(cmd)) => match cmd {
            MiscCommands::Init => handle_init(ctx),
            MiscCommands::Config { key, value } => handle_config(ctx, key, value),
        },
        None => handle_list(ctx),
    }
}

fn data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(HOME_ENV) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    ProjectDirs::from("com", "quire", "quire")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            QuireError::Config(format!(
                "Could not determine a data directory; set {}",
                HOME_ENV
            ))
        })
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = data_dir()?;

    let config = QuireConfig::load(&data_dir);
    let level = config
        .as_ref()
        .map(|c| c.log_level.clone())
        .unwrap_or_else(|_| QuireConfig::default().log_level);
    init_logging(cli.verbose, &level);
    let config = config?;

    let store = FileStore::new(
        config.content_path(&data_dir),
        config.archive_path(&data_dir),
    );
    let credentials = CredentialStore::open(config.credentials_path(&data_dir))?;
    let session = Session::load(&data_dir);
    tracing::debug!(data_dir = %data_dir.display(), user = ?session.current_user(), "context ready");

    Ok(AppContext {
        api: QuireApi::new(store, credentials, QuirePaths::new(data_dir.clone())),
        session,
        data_dir,
    })
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.list_documents()?;
    print_names(&result.names);
    print_messages(&result.messages);
    Ok(())
}

fn handle_view(ctx: &mut AppContext, name: &str, raw: bool) -> Result<()> {
    let result = ctx.api.view_document(&mut ctx.session, name)?;
    if let Some(rendered) = &result.rendered {
        let raw_content = result
            .documents
            .first()
            .filter(|_| raw)
            .map(|doc| doc.content.as_str());
        print_rendered(rendered, raw_content);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_new(ctx: &mut AppContext, name: &str) -> Result<()> {
    let result = ctx.api.create_document(&mut ctx.session, name)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(ctx: &mut AppContext, name: &str, content: Option<String>) -> Result<()> {
    let content = match content {
        Some(content) => content,
        None if !std::io::stdin().is_terminal() => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
        // Rejected by the API below, before any editor opens
        None if !ctx.session.is_signed_in() => String::new(),
        None => {
            let current = ctx.api.view_document(&mut ctx.session, name)?;
            let initial = current
                .documents
                .first()
                .map(|doc| doc.content.clone())
                .unwrap_or_default();
            let (_, ext) = split_name(name);
            let edited = edit_content(&initial, ext)?;
            if edited == initial {
                println!("No changes to {}.", name);
                return Ok(());
            }
            edited
        }
    };

    let result = ctx.api.update_document(&mut ctx.session, name, &content)?;
    if let Some(entry) = result.archived.first() {
        tracing::debug!(snapshot = %entry.file_name(), "previous version archived");
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, name: &str) -> Result<()> {
    let result = ctx.api.delete_document(&mut ctx.session, name)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_duplicate(ctx: &mut AppContext, name: &str) -> Result<()> {
    let result = ctx.api.duplicate_document(&mut ctx.session, name)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_history(ctx: &mut AppContext, name: Option<&str>) -> Result<()> {
    let result = ctx.api.history(&mut ctx.session, name)?;
    print_history(&result.archived);
    print_messages(&result.messages);
    Ok(())
}

fn handle_snapshot(ctx: &mut AppContext, file: &str, raw: bool) -> Result<()> {
    let result = ctx.api.view_snapshot(&mut ctx.session, file)?;
    if let Some(rendered) = &result.rendered {
        let raw_content = result
            .documents
            .first()
            .filter(|_| raw)
            .map(|doc| doc.content.as_str());
        print_rendered(rendered, raw_content);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_signup(ctx: &mut AppContext, username: &str, password: &str) -> Result<()> {
    let result = ctx.api.sign_up(&mut ctx.session, username, password)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_signin(ctx: &mut AppContext, username: &str, password: &str) -> Result<()> {
    let result = ctx.api.sign_in(&mut ctx.session, username, password)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_signout(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.sign_out(&mut ctx.session);
    print_messages(&result.messages);
    Ok(())
}

fn handle_whoami(ctx: &AppContext) -> Result<()> {
    match ctx.session.current_user() {
        Some(user) => println!("{}", user),
        None => println!("Not signed in."),
    }
    Ok(())
}

fn handle_init(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.init()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let show_all = key.is_none();
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.config(action)?;
    if show_all {
        if let Some(config) = &result.config {
            for key in CONFIG_KEYS {
                if let Some(value) = config.get(key) {
                    println!("{} = {}", key, value);
                }
            }
        }
    }
    print_messages(&result.messages);
    Ok(())
}
