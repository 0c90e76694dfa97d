use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use snake_engine::game::GameConfig;
use snake_engine::modes::{HeadlessMode, HumanMode};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snake_engine")]
#[command(version, about = "Snake on a wrapping grid")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// JSON configuration file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Milliseconds between two moves
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for edible placement
    #[arg(long)]
    seed: Option<u64>,

    /// Tick limit for headless runs
    #[arg(long, default_value = "200")]
    max_ticks: u32,

    /// Write logs to this file (human mode logs nowhere otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Human,
    /// Run the engine without a terminal UI, logging every move
    Headless,
}

fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_json_file(path)?,
        None => GameConfig::default(),
    };

    if cli.width.is_some() || cli.height.is_some() {
        let width = cli.width.unwrap_or(config.grid_width);
        let height = cli.height.unwrap_or(config.grid_height);
        config = config.with_field(width, height);
    }
    if let Some(tick_ms) = cli.tick_ms {
        config.tick_interval_ms = tick_ms;
    }
    if let Some(seed) = cli.seed {
        config.rng_seed = Some(seed);
    }

    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;
    Ok(config)
}

fn init_tracing(log_file: Option<&Path>, mode: Mode) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match (log_file, mode) {
        (Some(path), _) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        (None, Mode::Headless) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        // The alternate screen owns the terminal
        (None, Mode::Human) => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_file.as_deref(), cli.mode)?;
    let config = build_config(&cli)?;

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(config);
            human_mode.run().await?;
        }
        Mode::Headless => {
            let mut headless_mode = HeadlessMode::new(config, cli.max_ticks);
            let last = headless_mode.run().await?;
            println!(
                "ticks: {}  score: {}  length: {}  game over: {}",
                last.ticks,
                last.score,
                last.snake.len(),
                last.is_game_over()
            );
        }
    }

    Ok(())
}
