//! # Gesture & Typing Helpers
//!
//! Device-independent pieces of input handling: swipe classification,
//! hold-to-repeat timing and the answer text buffer.

use crate::config;
use crate::game::Direction;

/// Classifies a swipe by its dominant axis.
///
/// Returns None for swipes shorter than `threshold` on both axes. Ties go to
/// the vertical axis.
///
/// # Examples
///
/// ```
/// use math_forest::{swipe_direction, Direction};
///
/// assert_eq!(swipe_direction(40.0, 5.0, 20.0), Some(Direction::Right));
/// assert_eq!(swipe_direction(3.0, -8.0, 20.0), None);
/// ```
pub fn swipe_direction(dx: f32, dy: f32, threshold: f32) -> Option<Direction> {
    let (abs_x, abs_y) = (dx.abs(), dy.abs());
    if abs_x.max(abs_y) < threshold {
        return None;
    }
    if abs_x > abs_y {
        Some(if dx > 0.0 { Direction::Right } else { Direction::Left })
    } else {
        Some(if dy > 0.0 { Direction::Down } else { Direction::Up })
    }
}

/// Turns a held direction into steps spaced by a cooldown.
#[derive(Debug, Clone)]
pub struct MoveRepeat {
    cooldown: f32,
    remaining: f32,
}

impl MoveRepeat {
    /// Creates a repeater stepping at most once per `cooldown` seconds.
    pub fn new(cooldown: f32) -> Self {
        Self {
            cooldown,
            remaining: 0.0,
        }
    }

    /// Advances by `dt` seconds; returns a step when one is due.
    ///
    /// Releasing the direction makes the next press step immediately.
    pub fn tick(&mut self, dt: f32, held: Option<Direction>) -> Option<Direction> {
        let Some(direction) = held else {
            self.remaining = 0.0;
            return None;
        };
        self.remaining -= dt;
        if self.remaining > 0.0 {
            return None;
        }
        self.remaining = self.cooldown;
        Some(direction)
    }
}

impl Default for MoveRepeat {
    fn default() -> Self {
        Self::new(config::MOVE_COOLDOWN_SECS)
    }
}

/// Text typed into the quiz overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerBuffer {
    text: String,
}

impl AnswerBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a character if it can be part of a number.
    ///
    /// Returns whether it was accepted.
    pub fn push(&mut self, ch: char) -> bool {
        let allowed = ch.is_ascii_digit() || matches!(ch, ',' | '.' | '-');
        if !allowed || self.text.chars().count() >= config::MAX_ANSWER_LEN {
            return false;
        }
        self.text.push(ch);
        true
    }

    /// Removes the last character.
    pub fn backspace(&mut self) {
        self.text.pop();
    }

    /// Takes the text, leaving the buffer empty.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    /// Empties the buffer.
    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Current contents.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}
