//! # Scene Management System
//!
//! Runs the frame loop: collects input, feeds it to the [`GameSession`] one
//! event at a time and renders the resulting state.

use crate::game::{GameEvent, GameSession, MessageImportance};
use crate::input::{AnswerBuffer, InputHandler, PlayerInput};
use crate::rendering::MacroquadDisplay;
use crate::{ForestResult, GameConfig};
use macroquad::prelude::*;

const HELP_TEXT: &str = "WASD/arrows or swipe to move. Esc quits.";

/// Represents the current scene in the game
#[derive(Debug, Clone, PartialEq)]
pub enum SceneType {
    /// Normal gameplay
    Playing,
    /// Level-complete acknowledgment
    Completed,
}

/// The main scene manager that coordinates all game scenes
pub struct SceneManager {
    current_scene: SceneType,
    session: GameSession,
    display: MacroquadDisplay,
    input_handler: InputHandler,
    answer: AnswerBuffer,
}

impl SceneManager {
    /// Creates a new scene manager for `session`.
    pub fn new(mut session: GameSession, game_config: &GameConfig) -> Self {
        let mut display = MacroquadDisplay::new(game_config);
        display.add_message(
            format!("Welcome to {}!", session.level().name),
            MessageImportance::Info,
        );
        display.add_message(HELP_TEXT.to_string(), MessageImportance::Info);

        let startup = session.take_pending_events();
        let mut manager = Self {
            current_scene: SceneType::Playing,
            session,
            display,
            input_handler: InputHandler::new(
                game_config.move_cooldown_secs,
                game_config.swipe_threshold,
            ),
            answer: AnswerBuffer::new(),
        };
        manager.apply_events(startup);
        manager
    }

    /// Runs the main scene loop until the game exits
    pub async fn run(&mut self) -> ForestResult<()> {
        loop {
            let exit = match self.current_scene {
                SceneType::Playing => self.update_playing_scene(),
                SceneType::Completed => self.update_completed_scene(),
            };
            if exit {
                break;
            }
            next_frame().await;
        }
        log::info!("game loop ended");
        Ok(())
    }

    /// Updates the playing scene, returns true if exit is requested
    fn update_playing_scene(&mut self) -> bool {
        let quiz_open = self.session.state().active_quiz.is_some();
        let inputs = self.input_handler.poll(quiz_open);
        for input in inputs {
            if self.handle_input(input) {
                return true;
            }
        }

        self.display.update(get_frame_time());
        let view = self.session.frame_view();
        let clicked = self.display.render_game(&view, self.answer.as_str());
        if let Some(input) = clicked {
            if self.handle_input(input) {
                return true;
            }
        }
        false
    }

    /// Updates the completion scene, returns true if exit is requested
    fn update_completed_scene(&mut self) -> bool {
        self.display.update(get_frame_time());
        let view = self.session.frame_view();
        self.display.render_game(&view, self.answer.as_str());
        let clicked = self
            .display
            .ui
            .render_completion_screen(&self.session.level().name);

        if is_key_pressed(KeyCode::Escape) {
            return true;
        }
        if is_key_pressed(KeyCode::N) || clicked == Some(PlayerInput::Restart) {
            let events = self.session.restart_level();
            self.apply_events(events);
            self.current_scene = SceneType::Playing;
        } else if is_key_pressed(KeyCode::Enter) {
            self.current_scene = SceneType::Playing;
        }
        false
    }

    /// Dispatches one input, returns true if exit is requested
    fn handle_input(&mut self, input: PlayerInput) -> bool {
        let events = match input {
            PlayerInput::Quit => return true,
            PlayerInput::Help => {
                self.display
                    .add_message(HELP_TEXT.to_string(), MessageImportance::Info);
                return false;
            }
            PlayerInput::Type(ch) => {
                self.answer.push(ch);
                return false;
            }
            PlayerInput::Erase => {
                self.answer.backspace();
                return false;
            }
            PlayerInput::Move(direction) => self.session.handle_move(direction),
            PlayerInput::Confirm => {
                let raw = self.answer.take();
                self.session.confirm_answer(&raw)
            }
            PlayerInput::Cancel => self.session.cancel_quiz(),
            PlayerInput::Restart => self.session.restart_level(),
        };
        self.apply_events(events);
        false
    }

    fn apply_events(&mut self, events: Vec<GameEvent>) {
        for event in events {
            match event {
                GameEvent::Message { text, importance } => {
                    self.display.add_message(text, importance);
                }
                GameEvent::QuizOpened { .. } | GameEvent::QuizClosed { .. } => {
                    self.answer.clear();
                }
                GameEvent::FinishReached { complete: true } => {
                    self.current_scene = SceneType::Completed;
                }
                GameEvent::LevelCompleted { .. } if !self.session.level().has_finish() => {
                    self.current_scene = SceneType::Completed;
                }
                _ => {}
            }
        }
    }
}
