//! Ghost - command-line front end over the SQLite store.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use ghost::{
    ChallengeResponse, ChallengeVote, EngineConfig, ErrorMessage, GameInfo, GhostError,
    GhostService, Move, NewChallenge, Player, Position, RuleError,
};
use ghost_rules::InvalidMoveKind;
use ghost_store::SqliteStore;
use std::process::ExitCode;
use tracing::{error, info, instrument};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,ghost=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

/// Prints a failure and picks the exit code.
///
/// Engine errors print their JSON body and exit with the status class
/// (4 for client errors, 5 for server errors).
fn report(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<GhostError>() {
        Some(ghost_err) => {
            let body = ErrorMessage::from(ghost_err);
            match serde_json::to_string_pretty(&body) {
                Ok(json) => println!("{}", json),
                Err(_) => println!("{}", body.message),
            }
            ExitCode::from((ghost_err.status_code() / 100) as u8)
        }
        None => {
            error!(error = %err, "Command failed");
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

/// Runs one subcommand against the configured database.
#[instrument(skip(cli), fields(command = ?cli.command))]
fn run(cli: Cli) -> Result<()> {
    let mut config = EngineConfig::load(&cli.config)?;
    if let Some(db_path) = cli.db_path {
        config = config.with_db_path(db_path);
    }

    let store = SqliteStore::open(config.db_path())
        .with_context(|| format!("Failed to open database '{}'", config.db_path()))?;

    if let Command::InitDb = cli.command {
        info!(db_path = %config.db_path(), "Database schema ready");
        println!("Database ready at {}", config.db_path());
        return Ok(());
    }

    let service = GhostService::new(store, *config.retry());
    let game = dispatch(&service, cli.command)?;
    if let Some(game) = game {
        println!("{}", serde_json::to_string_pretty(&game)?);
    }
    Ok(())
}

fn dispatch(
    service: &GhostService<SqliteStore>,
    command: Command,
) -> Result<Option<GameInfo>, GhostError> {
    let game = match command {
        Command::InitDb => return Ok(None),
        Command::Create { room } => service.create_game(&room)?,
        Command::Show { room, consistent } => service.read_game(&room, consistent)?,
        Command::Delete { room } => {
            service.delete_game(&room)?;
            return Ok(None);
        }
        Command::Start { room } => service.start_game(&room)?,
        Command::Join {
            room,
            name,
            image_url,
        } => service.add_player(&room, Player::new(name, image_url))?,
        Command::Leave { room, name } => service.remove_player(&room, &name)?,
        Command::Move {
            room,
            player,
            x,
            y,
            letter,
        } => service.add_move(&room, Move::new(player, Position::new(x, y), letter))?,
        Command::Challenge {
            room,
            challenger,
            challenge_type,
        } => {
            let game = service.read_game(&room, true)?;
            let last = game
                .last_move()
                .cloned()
                .ok_or_else(|| RuleError::from(InvalidMoveKind::NoMoves(room.clone())))?;
            service.create_challenge(&room, NewChallenge::new(challenger, last, challenge_type))?
        }
        Command::Respond {
            room,
            row_word,
            col_word,
        } => service.create_challenge_response(&room, ChallengeResponse::new(row_word, col_word))?,
        Command::Vote {
            room, voter, pro, ..
        } => service.add_challenge_vote(&room, ChallengeVote::new(voter, pro))?,
    };
    Ok(Some(game))
}
