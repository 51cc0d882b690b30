//! Tic-tac-toe terminal front end.
//!
//! `play` runs the interactive board, `selfplay` lets the search play both
//! sides headlessly and prints engine events as JSON lines.

#![warn(missing_docs)]

mod app;
mod cli;
mod config;
mod headless;
mod input;
mod scheduler;
mod ui;

use anyhow::{Context, Result};
use app::{App, AppMessage};
use clap::Parser;
use cli::{Cli, Command};
use config::TerminalConfig;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, instrument};
use tracing_subscriber::EnvFilter;

const INPUT_POLL: Duration = Duration::from_millis(50);

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = TerminalConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Play { mode, delay_ms } => {
            let mut config = config;
            if let Some(mode) = mode {
                config = config.with_mode(mode);
            }
            if let Some(delay_ms) = delay_ms {
                config = config.with_computer_delay_ms(delay_ms);
            }
            run_play(config).await
        }
        Command::Selfplay { board } => run_selfplay(board),
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Runs the interactive terminal UI.
async fn run_play(config: TerminalConfig) -> Result<()> {
    // Log to a file so the UI owns the screen.
    let log_file = std::fs::File::create(config.log_file())
        .with_context(|| format!("Failed to create log file {}", config.log_file().display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    info!(mode = %config.mode(), delay_ms = config.computer_delay_ms(), "Starting tic-tac-toe");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let res = run_app(&mut terminal, &config).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    info!("Goodbye");
    res
}

#[instrument(skip_all)]
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &TerminalConfig,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<AppMessage>();
    let mut app = App::new(config, tx);

    loop {
        while let Ok(message) = rx.try_recv() {
            app.handle_message(message);
        }

        terminal.draw(|frame| ui::draw(frame, app.view(), app.cursor(), app.mode()))?;

        if event::poll(INPUT_POLL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key.code);
        }

        if app.should_quit() {
            return Ok(());
        }

        // Let the scheduler's timer and search tasks progress.
        tokio::task::yield_now().await;
    }
}

/// Runs optimal self-play and prints events to stdout.
fn run_selfplay(board: Option<tictactoe_engine::Board>) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .init();

    headless::run_selfplay(board, io::BufWriter::new(io::stdout().lock()))?;
    Ok(())
}
