use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "quire", bin_name = "quire", version)]
#[command(about = "Versioned flat-file document store", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Doc(DocCommands),

    #[command(flatten)]
    Account(AccountCommands),

    #[command(flatten)]
    Misc(MiscCommands),
}

#[derive(Subcommand, Debug)]
pub enum DocCommands {
    /// List documents
    #[command(alias = "ls", display_order = 1)]
    List,

    /// Show a document, rendered by its extension
    #[command(alias = "v", display_order = 2)]
    View {
        /// Document name (e.g. about.md)
        name: String,

        /// Print the stored content without rendering
        #[arg(long)]
        raw: bool,
    },

    /// Create an empty document
    #[command(alias = "create", display_order = 3)]
    New {
        /// Document name: letters, digits or underscores, then .txt, .md or .mkd
        name: String,
    },

    /// Replace a document's content, archiving the previous version
    #[command(alias = "e", display_order = 4)]
    Edit {
        /// Document name
        name: String,

        /// New content (otherwise read from stdin when piped, or from $EDITOR)
        #[arg(short, long)]
        content: Option<String>,
    },

    /// Delete a document (its archived versions are kept)
    #[command(alias = "rm", display_order = 5)]
    Delete {
        /// Document name
        name: String,
    },

    /// Copy a document to dup_<name>
    #[command(alias = "dup", display_order = 6)]
    Duplicate {
        /// Document name
        name: String,
    },

    /// List archived versions, of one document or of all
    #[command(display_order = 7)]
    History {
        /// Document name; versions of every extension with the same base are included
        name: Option<String>,
    },

    /// Show an archived version
    #[command(display_order = 8)]
    Snapshot {
        /// Archive file name (e.g. notes_2.txt)
        file: String,

        /// Print the stored content without rendering
        #[arg(long)]
        raw: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum AccountCommands {
    /// Register a new user
    #[command(display_order = 20)]
    Signup { username: String, password: String },

    /// Sign in; the session is kept until `signout`
    #[command(display_order = 21)]
    Signin { username: String, password: String },

    /// Sign out of the current session
    #[command(display_order = 22)]
    Signout,

    /// Show who is signed in
    #[command(display_order = 23)]
    Whoami,
}

#[derive(Subcommand, Debug)]
pub enum MiscCommands {
    /// Initialize the data directory (optional utility)
    #[command(display_order = 30)]
    Init,

    /// Get or set configuration
    #[command(display_order = 31)]
    Config {
        /// Configuration key (e.g., archive-dir)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

/// Logs go to stderr. RUST_LOG wins over `--verbose`, which wins over the
/// configured level.
pub fn init_logging(verbose: bool, configured_level: &str) {
    let fallback = if verbose { "debug" } else { configured_level };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
