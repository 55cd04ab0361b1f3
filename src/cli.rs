use crate::commands::config::{get_config_path, load_config, update_config, ConfigUpdate};
use crate::commands::scan::{replay_dir, scan_file};
use crate::commands::session::{
    delete_item, delete_session, list_sessions, new_session, show_session, use_session,
};
use crate::commands::AppState;
use crate::models::session::{ItemId, SessionId};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

/// Price tag scanner - resolve price and product name from OCR frames
#[derive(Parser, Debug)]
#[command(name = "price-scan", version)]
#[command(about = "Resolve price tags from recognized text and keep shopping sessions")]
pub struct Args {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Directory holding config.json and sessions.json
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve one recorded frame
    Scan {
        frame: PathBuf,
        /// Add the entry to the current session
        #[arg(long)]
        save: bool,
    },
    /// Run the scanner over a directory of recorded frames
    Replay {
        dir: PathBuf,
        #[arg(long)]
        save: bool,
    },
    /// Shopping sessions
    #[command(subcommand)]
    Session(SessionCommand),
    /// Line items
    #[command(subcommand)]
    Item(ItemCommand),
    /// Configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Start a new session and make it current
    New,
    /// Recent sessions, most recent first
    List {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Switch the current session
    Use { id: SessionId },
    /// Items and total of a session (current one by default)
    Show { id: Option<SessionId> },
    /// Delete a session and its items
    Delete { id: SessionId },
}

#[derive(Subcommand, Debug)]
pub enum ItemCommand {
    Delete { id: ItemId },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    Show,
    Path,
    Set {
        #[arg(long)]
        interval_ms: Option<u64>,
        #[arg(long)]
        recent_limit: Option<usize>,
        /// Product name used when none is recognized or entered
        #[arg(long)]
        label: Option<String>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize output: {}", e))?;
    println!("{}", json);
    Ok(())
}

/// Execute a parsed command line
pub fn execute(args: Args) -> Result<(), String> {
    let mut state = AppState::init(args.data_dir)?;
    tracing::debug!(store = %state.store.path().display(), "state loaded");

    match args.command {
        Command::Scan { frame, save } => print_json(&scan_file(&state, &frame, save)?),
        Command::Replay { dir, save } => {
            let runtime = tokio::runtime::Runtime::new()
                .map_err(|e| format!("Failed to start runtime: {}", e))?;
            let report = runtime.block_on(replay_dir(&state, &dir, save))?;
            print_json(&report)
        }
        Command::Session(cmd) => match cmd {
            SessionCommand::New => print_json(&new_session(&state)?),
            SessionCommand::List { limit } => print_json(&list_sessions(&state, limit)?),
            SessionCommand::Use { id } => use_session(&state, id),
            SessionCommand::Show { id } => print_json(&show_session(&state, id)?),
            SessionCommand::Delete { id } => delete_session(&state, id),
        },
        Command::Item(ItemCommand::Delete { id }) => delete_item(&state, id),
        Command::Config(cmd) => match cmd {
            ConfigCommand::Show => print_json(&load_config(&state)?),
            ConfigCommand::Path => {
                println!("{}", get_config_path(&state).display());
                Ok(())
            }
            ConfigCommand::Set {
                interval_ms,
                recent_limit,
                label,
            } => {
                let update = ConfigUpdate {
                    interval_ms,
                    recent_limit,
                    default_item_label: label,
                };
                print_json(&update_config(&mut state, update)?)
            }
        },
    }
}
