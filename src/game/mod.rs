//! # Game Module
//!
//! Core game rules: the level model, collision queries, movement resolution,
//! the quiz engine and progress tracking.
//!
//! Nothing in here draws, reads devices or touches storage directly; those are
//! collaborators driven through [`GameSession`].

pub mod collision;
pub mod level;
pub mod movement;
pub mod progress;
pub mod quiz;
pub mod state;

pub use collision::*;
pub use level::*;
pub use movement::*;
pub use progress::*;
pub use quiz::*;
pub use state::*;

use serde::{Deserialize, Serialize};

/// Represents a tile coordinate in a level.
///
/// `x` grows to the right, `y` grows downwards.
///
/// # Examples
///
/// ```
/// use math_forest::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring position one step in `direction`.
    ///
    /// # Examples
    ///
    /// ```
    /// use math_forest::{Direction, Position};
    ///
    /// assert_eq!(Position::new(3, 3).step(Direction::Up), Position::new(3, 2));
    /// ```
    pub fn step(self, direction: Direction) -> Position {
        self + direction.to_delta()
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

/// The four movement directions.
///
/// Diagonals are deliberately absent: a single intent moves along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Converts a direction to a position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use math_forest::{Direction, Position};
    ///
    /// let delta = Direction::Up.to_delta();
    /// assert_eq!(delta, Position::new(0, -1));
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Direction::Up => Position::new(0, -1),
            Direction::Down => Position::new(0, 1),
            Direction::Left => Position::new(-1, 0),
            Direction::Right => Position::new(1, 0),
        }
    }

    /// Converts a position delta to a direction.
    ///
    /// Returns None for anything but a unit step along exactly one axis.
    pub fn from_delta(delta: Position) -> Option<Direction> {
        match (delta.x, delta.y) {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }

    /// Parses the collaborator spelling (`up|down|left|right`).
    pub fn from_name(name: &str) -> Option<Direction> {
        match name.trim().to_ascii_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Returns all 4 directions.
    pub fn all() -> [Direction; 4] {
        [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
    }
}
