//! Command-line interface for ghost.

use clap::{ArgGroup, Parser, Subcommand};
use ghost::ChallengeType;
use std::path::PathBuf;

/// Ghost - rules engine for the Ghost word game
#[derive(Parser, Debug)]
#[command(name = "ghost")]
#[command(about = "Operate Ghost games stored in a SQLite database", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(long, default_value = "ghost.toml")]
    pub config: PathBuf,

    /// Database file, overriding config and environment
    #[arg(long)]
    pub db_path: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database schema
    InitDb,

    /// Create an empty game
    Create {
        /// Room code
        room: String,
    },

    /// Print a game
    Show {
        /// Room code
        room: String,

        /// Request a strongly consistent read
        #[arg(long)]
        consistent: bool,
    },

    /// Delete a game
    Delete {
        /// Room code
        room: String,
    },

    /// Start a game
    Start {
        /// Room code
        room: String,
    },

    /// Add a player to an unstarted game
    Join {
        /// Room code
        room: String,

        /// Player name
        #[arg(long)]
        name: String,

        /// Avatar URL
        #[arg(long, default_value = "")]
        image_url: String,
    },

    /// Remove a player
    Leave {
        /// Room code
        room: String,

        /// Player name
        name: String,
    },

    /// Place a letter
    Move {
        /// Room code
        room: String,

        /// Moving player
        #[arg(long)]
        player: String,

        /// Column
        #[arg(long, allow_negative_numbers = true)]
        x: i64,

        /// Row
        #[arg(long, allow_negative_numbers = true)]
        y: i64,

        /// Letter to place
        #[arg(long)]
        letter: String,
    },

    /// Challenge the most recent move
    Challenge {
        /// Room code
        room: String,

        /// Challenging player
        #[arg(long)]
        challenger: String,

        /// COMPLETE_WORD or NO_VALID_WORDS
        #[arg(long = "type")]
        challenge_type: ChallengeType,
    },

    /// Answer a NO_VALID_WORDS challenge
    Respond {
        /// Room code
        room: String,

        /// Word along the row of the challenged letter
        #[arg(long)]
        row_word: String,

        /// Word along the column of the challenged letter
        #[arg(long)]
        col_word: String,
    },

    /// Vote on the open challenge
    #[command(group(ArgGroup::new("side").required(true).args(["pro", "con"])))]
    Vote {
        /// Room code
        room: String,

        /// Voting player
        #[arg(long)]
        voter: String,

        /// Support the challenge
        #[arg(long)]
        pro: bool,

        /// Oppose the challenge
        #[arg(long)]
        con: bool,
    },
}
