//! # Movement & Interaction
//!
//! Resolves one directional intent against the level and applies what
//! happens on arrival. While a quiz is open the player is frozen.

use crate::game::{collision, quiz, Direction, Level, PlayState, Position};
use rand::Rng;

/// What the player stepped onto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arrival {
    /// Nothing of interest
    Open,
    /// An unsolved question; a quiz is now active
    Question { id: String },
    /// A question that was already answered
    SolvedQuestion { id: String },
    /// The finish tile; completion is for the progress tracker to judge
    Finish,
}

/// Result of a movement intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The player moved
    Moved {
        from: Position,
        to: Position,
        arrival: Arrival,
    },
    /// Target was impassable or out of bounds; nothing changed
    Blocked { target: Position },
    /// A quiz is active; nothing changed
    Suspended,
}

impl MoveOutcome {
    /// Whether the player's position changed.
    pub fn is_accepted(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

/// Applies a movement intent to `state`.
///
/// # Examples
///
/// ```
/// use math_forest::{builtin_levels, resolve_move, Direction, MoveOutcome, PlayState};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let catalog = builtin_levels().unwrap();
/// let level = catalog.first();
/// let mut state = PlayState::for_level(level);
/// let mut rng = StdRng::seed_from_u64(1);
///
/// let outcome = resolve_move(level, &mut state, Direction::Up, &mut rng);
/// assert!(outcome.is_accepted());
/// ```
pub fn resolve_move<R: Rng + ?Sized>(
    level: &Level,
    state: &mut PlayState,
    direction: Direction,
    rng: &mut R,
) -> MoveOutcome {
    if state.active_quiz.is_some() {
        return MoveOutcome::Suspended;
    }

    let from = state.player;
    let target = from.step(direction);
    if !collision::is_passable(level, target) {
        return MoveOutcome::Blocked { target };
    }

    state.player = target;
    log::debug!("player moved {:?} to ({}, {})", direction, target.x, target.y);

    let arrival = if let Some(question) = collision::question_at(level, target) {
        if quiz::activate(state, question, rng) {
            Arrival::Question {
                id: question.id.clone(),
            }
        } else {
            Arrival::SolvedQuestion {
                id: question.id.clone(),
            }
        }
    } else if collision::is_finish(level, target) {
        Arrival::Finish
    } else {
        Arrival::Open
    };

    MoveOutcome::Moved {
        from,
        to: target,
        arrival,
    }
}
