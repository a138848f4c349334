// src/cli/args.rs
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::domain::note::{OrderField, Ordering};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Path to config file (default: <config dir>/snappad/config.toml)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Notes API root, overrides the config file
    #[arg(long, value_name = "URL", env = "SNAPPAD_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Session file holding tokens and the active note
    #[arg(long, value_name = "SESSION", global = true)]
    pub session: Option<PathBuf>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create an account
    Register {
        #[arg(long)]
        email: String,

        #[arg(long)]
        display_name: String,

        #[arg(long, env = "SNAPPAD_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign in and store the session tokens
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "SNAPPAD_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// List notes, pinned first
    List {
        /// Only notes whose title or content contains this text
        #[arg(value_name = "SEARCH")]
        search: Option<String>,

        /// Server-side sort field
        #[arg(long, value_enum)]
        order: Option<OrderArg>,

        /// Sort descending
        #[arg(long, requires = "order")]
        desc: bool,

        /// Output notes as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create an empty note and make it the active note
    New,

    /// Print a note (defaults to the active note)
    Show {
        #[arg(value_name = "NOTE_ID")]
        note_id: Option<i64>,

        /// Output note as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a note and open it in the browser
    Open {
        #[arg(value_name = "NOTE_ID")]
        note_id: Option<i64>,
    },

    /// Edit note content from stdin, one line per change, with autosave
    Edit {
        #[arg(value_name = "NOTE_ID")]
        note_id: Option<i64>,

        /// New title, saved before the content edits
        #[arg(long)]
        title: Option<String>,
    },

    /// Change a note's title
    Rename {
        #[arg(value_name = "NOTE_ID")]
        note_id: i64,

        #[arg(value_name = "TITLE")]
        title: String,
    },

    /// Toggle a note's pin
    Pin {
        #[arg(value_name = "NOTE_ID")]
        note_id: i64,
    },

    /// Set a note's colours as #RRGGBB
    Color {
        #[arg(value_name = "NOTE_ID")]
        note_id: i64,

        #[arg(long, value_name = "HEX")]
        font: Option<String>,

        #[arg(long, value_name = "HEX")]
        background: Option<String>,
    },

    /// Delete a note
    Delete {
        #[arg(value_name = "NOTE_ID")]
        note_id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderArg {
    Created,
    Updated,
    Title,
}

impl OrderArg {
    pub fn ordering(self, descending: bool) -> Ordering {
        let field = match self {
            OrderArg::Created => OrderField::CreatedAt,
            OrderArg::Updated => OrderField::UpdatedAt,
            OrderArg::Title => OrderField::Title,
        };
        Ordering { field, descending }
    }
}

impl Command {
    /// Everything except the account commands talks to the notes API
    pub fn needs_session(&self) -> bool {
        !matches!(
            self,
            Command::Register { .. } | Command::Login { .. } | Command::Logout
        )
    }
}
