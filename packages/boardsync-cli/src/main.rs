//! boardsync: command-line host for a shared task board.
//!
//! Every process is its own context; processes pointed at the same store
//! directory see each other's changes (`boardsync watch`).
mod cli;
mod config;
mod log_bridge;
mod render;

use std::process::ExitCode;

use boardsync_core::drag::{DragEnd, DragLocation};
use boardsync_core::form::{add_task_action, TaskDraft, TaskError};
use boardsync_core::storage::local::LocalStore;
use boardsync_core::types::BoardState;
use boardsync_core::{avatar, presets};
use boardsync_core::{BoardFault, BoardManager, BoardStateAction, StoreError};
use clap::Parser;

use crate::cli::{Cli, Command};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Task(#[from] TaskError),

    #[error("No task matches {0:?}")]
    UnknownTask(String),

    #[error("{0:?} matches more than one task; use more of the id")]
    AmbiguousTask(String),

    #[error("Column {0} is full")]
    ColumnFull(String),

    #[error(transparent)]
    Board(#[from] BoardFault),
}

/// Find the full id for an exact id or a unique prefix.
fn resolve_task_id(state: &BoardState, wanted: &str) -> Result<String, CliError> {
    if state.contains_id(wanted) {
        return Ok(wanted.to_string());
    }
    let mut matches = boardsync_core::types::Column::ALL
        .iter()
        .flat_map(|c| state.column(*c))
        .filter(|t| !wanted.is_empty() && t.id.starts_with(wanted));
    match (matches.next(), matches.next()) {
        (Some(task), None) => Ok(task.id.clone()),
        (Some(_), Some(_)) => Err(CliError::AmbiguousTask(wanted.to_string())),
        (None, _) => Err(CliError::UnknownTask(wanted.to_string())),
    }
}

/// Surface a write failure; other faults were already logged.
fn check_saved(manager: &mut BoardManager<LocalStore>) -> Result<(), CliError> {
    match manager.take_fault() {
        Some(fault @ BoardFault::WriteFailed { .. }) | Some(fault @ BoardFault::Encode(_)) => {
            Err(fault.into())
        }
        Some(fault) => {
            eprintln!("warning: {}", fault);
            Ok(())
        }
        None => Ok(()),
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    if let Command::Avatar { email } = &cli.command {
        println!("{}", avatar::avatar_url(email));
        return Ok(());
    }

    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let board_config = config::load_config(&config_path);
    let store_dir = cli
        .store_dir
        .clone()
        .unwrap_or_else(|| config::store_dir(&board_config));
    let key = cli.key.clone().unwrap_or(board_config.store_key.clone());
    let limit = board_config.max_tasks_per_column;

    let mut store = LocalStore::open(&store_dir)?;
    if matches!(cli.command, Command::Watch) {
        store.watch()?;
    }
    let mut manager = BoardManager::initialize(store, key);
    if let Some(fault) = manager.take_fault() {
        eprintln!("warning: {}", fault);
    }

    match cli.command {
        Command::Show { avatars } => {
            print!("{}", render::render_board(manager.state(), avatars));
        }
        Command::Add {
            column,
            title,
            email,
            description,
        } => {
            let draft = TaskDraft {
                title,
                email_address: email,
                description,
            };
            let action = add_task_action(manager.state(), column, &draft, limit)?;
            manager.dispatch(action);
            check_saved(&mut manager)?;
            if let Some(task) = manager.state().column(column).first() {
                println!("{}", task.id);
            }
        }
        Command::Move { id, to, index } => {
            let task_id = resolve_task_id(manager.state(), &id)?;
            let Some((column, position)) = manager.state().find(&task_id) else {
                return Err(CliError::UnknownTask(id));
            };
            let drag = DragEnd {
                task_id,
                source: DragLocation {
                    column,
                    index: position,
                },
                destination: Some(DragLocation { column: to, index }),
            };
            let action = drag
                .to_action(manager.state(), limit)
                .ok_or_else(|| CliError::ColumnFull(to.to_string()))?;
            manager.dispatch(action);
            check_saved(&mut manager)?;
        }
        Command::Demo => {
            manager.dispatch(BoardStateAction::Load(presets::demo_board()));
            check_saved(&mut manager)?;
        }
        Command::Clear => {
            manager.dispatch(BoardStateAction::Load(BoardState::empty()));
            check_saved(&mut manager)?;
        }
        Command::Watch => {
            eprintln!(
                "Watching {} in {} (Ctrl-C to stop)",
                manager.key(),
                manager.store().dir().display()
            );
            print!("{}", render::render_board(manager.state(), false));
            loop {
                let alive = tokio::select! {
                    alive = manager.sync_next() => alive,
                    _ = tokio::signal::ctrl_c() => false,
                };
                if !alive {
                    break;
                }
                if let Some(fault) = manager.take_fault() {
                    eprintln!("warning: {}", fault);
                }
                print!("{}", render::render_board(manager.state(), false));
            }
            manager.close();
        }
        Command::Avatar { .. } => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = log_bridge::init(&cli.log_level) {
        eprintln!("failed to initialize logger: {}", e);
    }
    log::debug!("Logging to {}", log_bridge::log_file_path());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("boardsync: {}", e);
            ExitCode::FAILURE
        }
    }
}
