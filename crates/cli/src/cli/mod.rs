// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand};

mod args;

pub use args::{OutputArgs, OutputFormat, ScopeArgs};

// Custom help template that groups commands into sections
const HELP_TEMPLATE: &str = "{about-with-newline}
{usage-heading} {usage}

{before-help}Options:
{options}{after-help}";

const COMMANDS_HELP: &str = "\
Workspace:
  init          Initialize a workspace in this directory
  workfold      Manage working folder mappings
  resolve-path  Translate between local and server paths

Changes:
  get           Bring local files up to a server version
  add           Pend adds for new files and folders
  edit          Check files out for edit
  delete        Pend deletes
  rename        Pend a rename or move
  lock          Lock items on the server
  undo          Undo pending changes
  status        Show pending changes
  checkin       Check in pending changes

Conflicts:
  conflicts     List conflicts
  resolve       Resolve a conflict

Work items:
  query         Convert work item queries to server XML";

const QUICKSTART_HELP: &str = "\
Get started:
  tfs init --server ws://tfs:8080/rpc --map $/Project   Initialize and map this directory
  tfs get                                               Download the latest version
  tfs edit src/main.c                                   Check a file out
  tfs checkin -m \"Fix crash\"                            Check in pending changes";

#[derive(Parser)]
#[command(name = "tfs")]
#[command(about = "Synchronize a local working copy with a version-control server")]
#[command(
    long_about = "Synchronize a local working copy with a version-control server.\n\n\
    Maps server folders to local folders, pends changes, applies server get\n\
    operations to disk and resolves conflicts."
)]
#[command(help_template = HELP_TEMPLATE)]
#[command(before_help = COMMANDS_HELP)]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    /// Log debug output to stderr (or the configured log file)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    // ─────────────────────────────────────────────────────────────────────────
    // Workspace
    // ─────────────────────────────────────────────────────────────────────────
    /// Initialize a workspace in the current directory
    #[command(after_help = "Examples:\n  \
        tfs init                                 Offline workspace named after the directory\n  \
        tfs init --name dev --owner alice        Explicit workspace name and owner\n  \
        tfs init --server wss://tfs/rpc          Configure the server endpoint\n  \
        tfs init --map $/Project                 Map this directory to $/Project")]
    Init {
        /// Workspace name (default: the directory name)
        #[arg(long)]
        name: Option<String>,

        /// Workspace owner (default: the current user)
        #[arg(long)]
        owner: Option<String>,

        /// Server WebSocket URL (ws:// or wss://)
        #[arg(long, value_name = "URL")]
        server: Option<String>,

        /// Map this directory to the given server path
        #[arg(long, value_name = "SERVER_PATH")]
        map: Option<String>,

        /// Directory to initialize (default: current directory)
        #[arg(long)]
        path: Option<String>,
    },

    /// Manage working folder mappings
    #[command(subcommand)]
    Workfold(WorkfoldCommand),

    /// Translate a local path to its server path, or a server path to its local path
    #[command(arg_required_else_help = true)]
    ResolvePath {
        /// Local path or server path ($/...)
        path: String,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Changes
    // ─────────────────────────────────────────────────────────────────────────
    /// Bring local files up to a server version
    #[command(after_help = "Examples:\n  \
        tfs get                       Latest version of every mapped folder\n  \
        tfs get src -V C120           Changeset 120 of src\n  \
        tfs get --force               Re-download even unchanged files\n  \
        tfs get --no-get              Record versions without downloading")]
    Get {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Version to get: T (latest) or C<changeset>
        #[arg(long = "version", short = 'V', default_value = "T")]
        version: String,

        /// Get files even if the server thinks they are current
        #[arg(long)]
        force: bool,

        /// Record the versions on the server without touching local files
        #[arg(long)]
        no_get: bool,
    },

    /// Pend adds for new files and folders
    #[command(arg_required_else_help = true)]
    Add {
        /// Local files or folders
        #[arg(required = true)]
        paths: Vec<String>,

        /// Add folder contents as well
        #[arg(long, short)]
        recursive: bool,
    },

    /// Check files out for edit
    #[command(arg_required_else_help = true)]
    Edit {
        /// Local files
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Pend deletes; local copies are removed
    #[command(arg_required_else_help = true)]
    Delete {
        /// Local files or folders
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Pend a rename or move
    #[command(arg_required_else_help = true)]
    Rename {
        /// Current local path
        from: String,

        /// New local path
        to: String,
    },

    /// Lock items on the server
    #[command(arg_required_else_help = true)]
    Lock {
        /// Local files or folders
        #[arg(required = true)]
        paths: Vec<String>,

        /// Lock level (none, checkin, checkout)
        #[arg(long, short, default_value = "checkin")]
        level: String,
    },

    /// Undo pending changes
    #[command(arg_required_else_help = true)]
    Undo {
        /// Local paths or server paths ($/...)
        #[arg(required = true)]
        paths: Vec<String>,

        /// Include changes beneath folders
        #[arg(long, short)]
        recursive: bool,
    },

    /// Show pending changes
    Status {
        #[command(flatten)]
        scope: ScopeArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Check in pending changes
    #[command(after_help = "Examples:\n  \
        tfs checkin -m \"Fix crash\"                 Check in everything pending\n  \
        tfs checkin src -m \"Refactor\"              Only changes under src\n  \
        tfs checkin -m \"Fix\" -w 42 --resolve       Link and resolve work item 42")]
    Checkin {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Check-in comment
        #[arg(long, short)]
        message: String,

        /// Work item to associate (repeatable)
        #[arg(long = "work-item", short = 'w', value_name = "ID")]
        work_items: Vec<i32>,

        /// Resolve the associated work items
        #[arg(long, requires = "work_items")]
        resolve: bool,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Conflicts
    // ─────────────────────────────────────────────────────────────────────────
    /// List conflicts
    Conflicts {
        #[command(flatten)]
        scope: ScopeArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Resolve a conflict
    #[command(
        arg_required_else_help = true,
        after_help = "Examples:\n  \
        tfs resolve 12 --with theirs     Replace the local file with the server's\n  \
        tfs resolve 12 --with yours      Keep the local file\n  \
        tfs resolve 12 --with merge      The local file already holds the merge"
    )]
    Resolve {
        /// Conflict id (see 'tfs conflicts')
        conflict_id: i32,

        /// Resolution (yours, theirs, merge)
        #[arg(long = "with", value_name = "RESOLUTION")]
        resolution: String,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Work items
    // ─────────────────────────────────────────────────────────────────────────
    /// Convert work item queries to server XML
    #[command(subcommand)]
    Query(QueryCommand),
}

#[derive(Subcommand)]
pub enum WorkfoldCommand {
    /// Map a server folder to a local folder
    #[command(arg_required_else_help = true)]
    Map {
        /// Server path ($/...)
        server_path: String,

        /// Local folder (default: current directory)
        local_path: Option<String>,
    },

    /// Remove a mapping or cloak
    #[command(arg_required_else_help = true)]
    Unmap {
        /// Server path ($/...) or mapped local folder
        target: String,
    },

    /// Exclude a server folder beneath a mapping
    #[command(arg_required_else_help = true)]
    Cloak {
        /// Server path ($/...)
        server_path: String,
    },

    /// List working folders
    List {
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Subcommand)]
pub enum QueryCommand {
    /// Print the server XML for a WHERE clause or full SELECT statement
    #[command(
        arg_required_else_help = true,
        after_help = "Examples:\n  \
        tfs query xml \"[State] = 'Active' and [Assigned To] = @me\"\n  \
        tfs query xml \"select [Id] from WorkItems where [Id] in (1, 2)\"\n  \
        tfs query xml \"[Area] = @area\" -p area=Web"
    )]
    Xml {
        /// Query text
        query: String,

        /// Value for @me (default: the current user)
        #[arg(long)]
        me: Option<String>,

        /// Value for @today as YYYY-MM-DD (default: today)
        #[arg(long)]
        today: Option<String>,

        /// Extra parameter as name=value (repeatable)
        #[arg(long = "param", short = 'p', value_name = "NAME=VALUE")]
        params: Vec<String>,
    },

    /// Print a WHERE clause with redundant brackets removed
    #[command(arg_required_else_help = true)]
    Optimize {
        /// WHERE clause
        query: String,
    },

    /// Show each stage of query conversion
    #[command(arg_required_else_help = true)]
    Explain {
        /// WHERE clause or full SELECT statement
        query: String,
    },
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
