use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use ultimate_snake::app::App;
use ultimate_snake::game::GameConfig;
use ultimate_snake::highscores::HighScoreStore;
use ultimate_snake::screens::AppContext;
use ultimate_snake::settings::SettingsStore;

/// Grid sides outside this range make no playable board
const MIN_GRID: i64 = 5;
const MAX_GRID: i64 = 200;

#[derive(Parser)]
#[command(name = "ultimate_snake")]
#[command(version, about = "Snake with powerups, obstacles and a high-score table")]
struct Cli {
    /// Directory holding settings, scores and the log
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Write the log here instead of <data-dir>/snake.log
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Grid width
    #[arg(long, default_value = "40", value_parser = clap::value_parser!(u16).range(MIN_GRID..=MAX_GRID))]
    width: u16,

    /// Grid height
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u16).range(MIN_GRID..=MAX_GRID))]
    height: u16,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| data_dir.join("snake.log"));
    init_logging(&log_file, cli.verbose)?;
    info!("ultimate_snake starting, data dir {}", data_dir.display());

    let settings = SettingsStore::load(data_dir.join("settings.json"));
    let scores = match HighScoreStore::open(data_dir.join("scores")) {
        Ok(store) => Some(store),
        Err(e) => {
            warn!("high scores disabled: {}", e);
            None
        }
    };

    let config = GameConfig::new(cli.width.into(), cli.height.into());
    let mut app = App::new(AppContext::new(settings, scores, config));
    app.run().await
}

/// Per-user data directory, falling back to one next to the binary's cwd
fn default_data_dir() -> PathBuf {
    if let Some(appdata) = std::env::var_os("APPDATA") {
        return PathBuf::from(appdata).join("UltimateSnake");
    }
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME") {
        return PathBuf::from(xdg).join("ultimate-snake");
    }
    if let Some(home) = std::env::var_os("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("ultimate-snake");
    }
    PathBuf::from("ultimate-snake-data")
}

/// Send log records to a file; the terminal belongs to the game
fn init_logging(path: &Path, verbosity: u8) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let mut builder = env_logger::Builder::new();
    // Base level from CLI verbosity, RUST_LOG can still narrow or widen it
    let base_level = match verbosity {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    builder.parse_default_env();
    builder.target(env_logger::Target::Pipe(Box::new(file)));
    builder.format(|fmt, record| {
        let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
    });
    builder
        .try_init()
        .context("Failed to initialise logging")?;
    Ok(())
}
