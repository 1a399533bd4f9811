use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use simplelog::{Config, LevelFilter, WriteLogger};

use snake_field::session::GameSession;
use snake_field::GameConfig;

#[derive(Parser)]
#[command(name = "snake-field")]
#[command(version, about = "Snake on a walled grid, in the terminal")]
struct Cli {
    /// Field height, walls included
    #[arg(long, default_value = "20")]
    rows: usize,

    /// Field width, walls included
    #[arg(long, default_value = "20")]
    cols: usize,

    /// Milliseconds between two steps of the snake
    #[arg(long, default_value = "150")]
    delay: u64,

    /// Initial snake length
    #[arg(long, default_value = "3")]
    length: usize,

    /// Seed for apple placement
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the log, the terminal belongs to the game
    #[arg(long, default_value = "snake.log")]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {}", cli.log_file.display()))?;
    WriteLogger::init(LevelFilter::Info, Config::default(), log_file).context("Failed to initialize logger")?;

    let config = GameConfig {
        rows: cli.rows,
        cols: cli.cols,
        frame_delay: Duration::from_millis(cli.delay),
        initial_length: cli.length,
        seed: cli.seed,
        ..GameConfig::default()
    };

    let mut session = GameSession::init(config)?;
    // The terminal has to be handed back even when a round fails
    let result = session.run();
    session.teardown()?;

    if let Err(err) = &result {
        log::error!("session failed: {:#}", err);
    }
    result
}
