//! # Math Forest
//!
//! A small tile-based exploration game for practising arithmetic.
//!
//! ## Architecture Overview
//!
//! The core is a handful of pure modules operating on an explicit
//! [`PlayState`] layered over immutable [`Level`] templates:
//!
//! - **Level Model**: terrain and object grids, question definitions, start tile
//! - **Collision & Query**: passability and tile lookups with bounds checking in one place
//! - **Movement**: resolves directional intents and tile-entry side effects
//! - **Quiz Engine**: generates problems and validates answers
//! - **Progress**: completion checks and the persisted snapshot policy
//!
//! Everything else (macroquad rendering, keyboard/touch glue, the save store)
//! is a collaborator around [`GameSession`], which processes one event at a
//! time to completion and hands the renderer a read-only [`FrameView`].

pub mod game;
pub mod input;
pub mod levels;
pub mod rendering;
pub mod scenes;
pub mod storage;

pub use game::*;
pub use input::*;
pub use levels::*;
pub use rendering::*;
pub use storage::*;

pub use game::{
    // From collision
    is_passable,
    // From progress
    check_completion,
    // From quiz
    parse_answer,
    // From movement
    resolve_move,
    Arrival,
    Direction,
    FrameView,
    GameEvent,
    GameSession,
    Level,
    LevelBlueprint,
    LevelCatalog,
    MessageImportance,
    MoveOutcome,
    ObjectMarker,
    OperandRange,
    OperationKind,
    PlayState,
    Position,
    ProgressTracker,
    Question,
    QuizInstance,
    QuizOutcome,
    SaveRecord,
    TerrainKind,
};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Core error type for Math Forest.
///
/// Gameplay itself never fails; these only surface while building levels,
/// talking to a save store or starting the program.
#[derive(thiserror::Error, Debug)]
pub enum ForestError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Level data breaks a structural invariant
    #[error("Invalid level: {0}")]
    InvalidLevel(String),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Save store failed
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type used throughout the Math Forest codebase.
pub type ForestResult<T> = Result<T, ForestError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    use crate::Position;

    /// Visible tiles horizontally
    pub const VIEW_TILES_W: i32 = 12;

    /// Visible tiles vertically (taller than wide, for phones)
    pub const VIEW_TILES_H: i32 = 18;

    /// Key the progress snapshot is stored under
    pub const SAVE_KEY: &str = "math-forest-save";

    /// Start tile used when a level has no `S` marker
    pub const FALLBACK_START: Position = Position { x: 1, y: 1 };

    /// Minimum swipe length in pixels before it counts as a move
    pub const SWIPE_THRESHOLD: f32 = 20.0;

    /// Seconds between repeated steps while a direction is held
    pub const MOVE_COOLDOWN_SECS: f32 = 0.12;

    /// Maximum number of messages kept in the history
    pub const MAX_MESSAGES: usize = 50;

    /// Longest answer the quiz overlay accepts
    pub const MAX_ANSWER_LEN: usize = 8;
}

/// Runtime configuration, loadable from a JSON file.
///
/// Every field is optional in the file; missing ones take the values from
/// [`config`].
///
/// # Examples
///
/// ```
/// use math_forest::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{ "view_tiles_w": 16 }"#).unwrap();
/// assert_eq!(config.view_tiles_w, 16);
/// assert_eq!(config.view_tiles_h, 18);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Visible tiles horizontally
    pub view_tiles_w: i32,
    /// Visible tiles vertically
    pub view_tiles_h: i32,
    /// Key the progress snapshot is stored under
    pub save_key: String,
    /// Seconds between repeated steps while a direction is held
    pub move_cooldown_secs: f32,
    /// Minimum swipe length in pixels
    pub swipe_threshold: f32,
    /// Level to start on when there is no usable save
    pub starting_level: Option<String>,
}

impl GameConfig {
    /// Reads a configuration file.
    pub fn load(path: &Path) -> ForestResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&raw)?;
        if config.view_tiles_w <= 0 || config.view_tiles_h <= 0 {
            return Err(ForestError::InvalidState(
                "view size must be positive".to_string(),
            ));
        }
        Ok(config)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            view_tiles_w: config::VIEW_TILES_W,
            view_tiles_h: config::VIEW_TILES_H,
            save_key: config::SAVE_KEY.to_string(),
            move_cooldown_secs: config::MOVE_COOLDOWN_SECS,
            swipe_threshold: config::SWIPE_THRESHOLD,
            starting_level: None,
        }
    }
}
