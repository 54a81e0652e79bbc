//! # Input Module
//!
//! Keyboard and touch handling. Raw device state is turned into
//! [`PlayerInput`] values; the scene decides what they mean.

pub mod gestures;

pub use gestures::*;

use crate::config;
use crate::game::Direction;
use macroquad::prelude::*;

/// Player input types produced by the input handler.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerInput {
    /// Step in a direction
    Move(Direction),
    /// A character typed into the quiz answer
    Type(char),
    /// Delete the last typed character
    Erase,
    /// Submit the typed answer
    Confirm,
    /// Close the quiz without answering
    Cancel,
    /// Show help
    Help,
    /// Start the level over
    Restart,
    /// Quit the game
    Quit,
}

/// Input handler for keyboard and touch.
///
/// Movement keys repeat while held, spaced by the move cooldown. A swipe
/// anywhere on the screen moves one tile along its dominant axis.
pub struct InputHandler {
    repeat: MoveRepeat,
    swipe_threshold: f32,
    swipe_start: Option<(u64, Vec2)>,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(config::MOVE_COOLDOWN_SECS, config::SWIPE_THRESHOLD)
    }
}

impl InputHandler {
    /// Creates a new input handler.
    pub fn new(move_cooldown_secs: f32, swipe_threshold: f32) -> Self {
        Self {
            repeat: MoveRepeat::new(move_cooldown_secs),
            swipe_threshold,
            swipe_start: None,
        }
    }

    /// Polls the devices for this frame.
    ///
    /// `quiz_open` switches the keyboard between walking and typing.
    pub fn poll(&mut self, quiz_open: bool) -> Vec<PlayerInput> {
        let mut inputs = Vec::new();

        if quiz_open {
            self.repeat.tick(0.0, None);
            self.swipe_start = None;
            while let Some(ch) = get_char_pressed() {
                if !ch.is_control() {
                    inputs.push(PlayerInput::Type(ch));
                }
            }
            if is_key_pressed(KeyCode::Backspace) {
                inputs.push(PlayerInput::Erase);
            }
            if is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::KpEnter) {
                inputs.push(PlayerInput::Confirm);
            }
            if is_key_pressed(KeyCode::Escape) {
                inputs.push(PlayerInput::Cancel);
            }
            return inputs;
        }

        // Typed characters only matter in the overlay.
        while get_char_pressed().is_some() {}

        if is_key_pressed(KeyCode::Escape) {
            inputs.push(PlayerInput::Quit);
        }
        if is_key_pressed(KeyCode::F1) {
            inputs.push(PlayerInput::Help);
        }

        if let Some(direction) = self.repeat.tick(get_frame_time(), held_direction()) {
            inputs.push(PlayerInput::Move(direction));
        }
        if let Some(direction) = self.poll_swipe() {
            inputs.push(PlayerInput::Move(direction));
        }

        inputs
    }

    fn poll_swipe(&mut self) -> Option<Direction> {
        for touch in touches() {
            match touch.phase {
                TouchPhase::Started => {
                    self.swipe_start = Some((touch.id, touch.position));
                }
                TouchPhase::Ended => {
                    if let Some((id, start)) = self.swipe_start {
                        if id == touch.id {
                            self.swipe_start = None;
                            let delta = touch.position - start;
                            return swipe_direction(delta.x, delta.y, self.swipe_threshold);
                        }
                    }
                }
                TouchPhase::Cancelled => self.swipe_start = None,
                TouchPhase::Moved | TouchPhase::Stationary => {}
            }
        }
        None
    }
}

/// The movement key currently held, if exactly one axis is pressed.
fn held_direction() -> Option<Direction> {
    let up = is_key_down(KeyCode::Up) || is_key_down(KeyCode::W);
    let down = is_key_down(KeyCode::Down) || is_key_down(KeyCode::S);
    let left = is_key_down(KeyCode::Left) || is_key_down(KeyCode::A);
    let right = is_key_down(KeyCode::Right) || is_key_down(KeyCode::D);

    let dx = right as i32 - left as i32;
    let dy = down as i32 - up as i32;
    match (dx, dy) {
        (0, 0) => None,
        (dx, 0) => Direction::from_delta(crate::Position::new(dx, 0)),
        (0, dy) => Direction::from_delta(crate::Position::new(0, dy)),
        // Diagonal chords are not a valid intent.
        _ => None,
    }
}
