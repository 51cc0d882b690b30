//! Command-line interface for the tic-tac-toe terminal.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tictactoe_engine::{Board, GameMode};

/// Tic-tac-toe against a perfect minimax opponent
#[derive(Parser, Debug)]
#[command(name = "tictactoe")]
#[command(about = "Tic-tac-toe with an exhaustive minimax opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true, env = "TICTACTOE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal UI
    Play {
        /// Game mode: two_players or vs_computer
        #[arg(short, long)]
        mode: Option<GameMode>,

        /// Delay before the computer's move, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Let the search play both sides and print engine events as JSON lines
    Selfplay {
        /// Starting board, nine symbols of X, O and . in row-major order
        #[arg(long)]
        board: Option<Board>,
    },
}
