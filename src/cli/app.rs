//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{habit, log};
use crate::storage::{Config, LogStore};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(author, version, about = "Local-first event logging with habit tracking")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Path to the event log (defaults to the platform data directory)
    #[arg(long, global = true, env = "CADENCE_LOG", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Append a free-text entry to the log
    ///
    /// Append `#habit[...]` to the text to declare (or complete) a habit:
    ///   cadence log water the plants '#habit[2d]'
    Log {
        /// Entry text (words are joined with spaces)
        #[arg(required = true)]
        text: Vec<String>,

        /// Timestamp for the entry (defaults to now)
        #[arg(long, value_name = "TIMESTAMP")]
        at: Option<String>,
    },

    /// List active habits with status and strength
    List {
        /// Evaluate for this day instead of today
        #[arg(long, value_name = "DATE")]
        on: Option<String>,

        /// Strength window in days (0 = all-time)
        #[arg(long, value_name = "DAYS")]
        window: Option<u32>,
    },

    /// Show habits due on a day
    Due {
        /// Evaluate for this day instead of today
        #[arg(long, value_name = "DATE")]
        on: Option<String>,
    },

    /// Show one habit in detail
    Show {
        /// Habit ID (h-xxxxxxx)
        id: String,

        /// Strength window in days (0 = all-time)
        #[arg(long, value_name = "DAYS")]
        window: Option<u32>,
    },

    /// Record a completion of a habit
    Done {
        /// Habit ID (h-xxxxxxx)
        id: String,

        /// Timestamp for the completion (defaults to now)
        #[arg(long, value_name = "TIMESTAMP")]
        at: Option<String>,
    },

    /// Remove the most recent completion of a habit
    Undo {
        /// Habit ID (h-xxxxxxx)
        id: String,
    },

    /// Show how many days until a habit is next due
    Next {
        /// Habit ID (h-xxxxxxx)
        id: String,
    },

    /// Show a habit's compliance score
    Strength {
        /// Habit ID (h-xxxxxxx)
        id: String,

        /// Window in days (0 = all-time)
        #[arg(long, value_name = "DAYS")]
        window: Option<u32>,

        /// Evaluate as of this day instead of today
        #[arg(long, value_name = "DATE")]
        as_of: Option<String>,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    let config = Config::load()?;
    let log_path = config.resolve_log_path(cli.log_file)?;
    output.verbose(&format!("Using log at: {}", log_path.display()));
    let store = LogStore::new(log_path);

    let default_window = config.strength_window_days;

    match cli.command {
        Commands::Log { text, at } => log::add(&output, &store, &text, at.as_deref()),
        Commands::Done { id, at } => log::done(&output, &store, &id, at.as_deref()),
        Commands::Undo { id } => log::undo(&output, &store, &id),

        Commands::List { on, window } => habit::list(
            &output,
            &store,
            on.as_deref(),
            window.unwrap_or(default_window),
        ),
        Commands::Due { on } => habit::due(&output, &store, on.as_deref()),
        Commands::Show { id, window } => {
            habit::show(&output, &store, &id, window.unwrap_or(default_window))
        }
        Commands::Next { id } => habit::next(&output, &store, &id),
        Commands::Strength { id, window, as_of } => habit::strength(
            &output,
            &store,
            &id,
            window.unwrap_or(default_window),
            as_of.as_deref(),
        ),
    }
}
