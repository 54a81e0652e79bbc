//! # Math Forest Main Entry Point
//!
//! Parses the command line, sets up logging and persistence, and runs the
//! macroquad frame loop.

use clap::Parser;
use math_forest::scenes::SceneManager;
use math_forest::{
    builtin_levels, FileStore, ForestError, ForestResult, GameConfig, GameSession, KeyValueStore,
};
use std::path::PathBuf;

/// Command line arguments for Math Forest.
#[derive(Parser, Debug)]
#[command(name = "math-forest")]
#[command(about = "A tile-based exploration game with arithmetic quiz tiles")]
#[command(version)]
struct Args {
    /// Random seed for quiz generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Level to start on when there is no saved progress
    #[arg(short, long)]
    level: Option<String>,

    /// Directory for the progress snapshot
    #[arg(long, default_value = ".math-forest")]
    save_dir: PathBuf,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Forget saved progress before starting
    #[arg(long)]
    reset: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[macroquad::main("Math Forest")]
async fn main() -> ForestResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level);

    log::info!("Starting Math Forest v{}", math_forest::VERSION);

    let mut game_config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if args.level.is_some() {
        game_config.starting_level = args.level.clone();
    }

    let catalog = builtin_levels()?;
    if let Some(id) = &game_config.starting_level {
        if catalog.get(id).is_none() {
            return Err(ForestError::InvalidState(format!("unknown level '{}'", id)));
        }
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("quiz seed {}", seed);

    let session = match open_store(&args, &game_config) {
        Some(store) => GameSession::with_store(
            catalog,
            seed,
            store,
            game_config.save_key.clone(),
            game_config.starting_level.as_deref(),
        ),
        None => {
            let mut session = GameSession::new(catalog, seed);
            if let Some(id) = &game_config.starting_level {
                session.load_level(id)?;
            }
            session
        }
    };

    let mut scenes = SceneManager::new(session, &game_config);
    scenes.run().await
}

/// Opens the save store; progress is simply not kept if that fails.
fn open_store(args: &Args, game_config: &GameConfig) -> Option<Box<dyn KeyValueStore>> {
    let mut store = match FileStore::open(&args.save_dir) {
        Ok(store) => store,
        Err(e) => {
            log::warn!("saving disabled: {}", e);
            return None;
        }
    };
    if args.reset {
        if let Err(e) = store.remove(&game_config.save_key) {
            log::warn!("could not reset progress: {}", e);
        }
    }
    Some(Box::new(store))
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        use tracing::Level;

        let level = match log_level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "info" => Level::INFO,
            "debug" => Level::DEBUG,
            "trace" => Level::TRACE,
            _ => Level::INFO,
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .format_timestamp(None)
            .init();
    }
}
