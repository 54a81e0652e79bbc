//! # Display Management
//!
//! Draws a [`FrameView`] with macroquad: terrain layer, object layer, player,
//! HUD, message log and the quiz overlay.

use crate::config;
use crate::game::{FrameView, MessageImportance, ObjectMarker, Position, TerrainKind};
use crate::input::PlayerInput;
use crate::rendering::{Camera, UI};
use crate::GameConfig;
use macroquad::prelude::*;

/// Seconds a message stays on screen.
const MESSAGE_LIFETIME: f32 = 3.0;

/// Message shown in the log strip.
#[derive(Debug, Clone)]
struct DisplayMessage {
    text: String,
    importance: MessageImportance,
    age: f32,
}

/// Macroquad display manager for the game.
pub struct MacroquadDisplay {
    /// Side of one tile in pixels
    pub tile_size: f32,
    /// Viewport following the player
    pub camera: Camera,
    /// Message history
    messages: Vec<DisplayMessage>,
    /// HUD, overlay and touch controls
    pub ui: UI,
}

impl MacroquadDisplay {
    /// Creates a display for the configured view size.
    pub fn new(game_config: &GameConfig) -> Self {
        Self {
            tile_size: 0.0,
            camera: Camera::new(game_config.view_tiles_w, game_config.view_tiles_h),
            messages: Vec::new(),
            ui: UI::new(),
        }
    }

    /// Renders the complete game screen.
    ///
    /// Returns input from on-screen controls clicked during this frame.
    pub fn render_game(&mut self, view: &FrameView<'_>, typed_answer: &str) -> Option<PlayerInput> {
        self.resize();
        self.camera
            .follow(view.player, view.level.width as i32, view.level.height as i32);

        clear_background(BLACK);
        self.render_map(view);
        self.render_player(view.player);
        self.ui.render_hud(view);
        self.render_messages();

        match view.active_quiz {
            Some(quiz) => self.ui.render_quiz_overlay(quiz, typed_answer),
            None => self.ui.render_touch_controls(),
        }
    }

    /// Fits square tiles of the view into the screen below the HUD.
    fn resize(&mut self) {
        let usable_h = (screen_height() - self.ui.hud_height).max(1.0);
        let by_width = screen_width() / self.camera.view_w as f32;
        let by_height = usable_h / self.camera.view_h as f32;
        self.tile_size = by_width.min(by_height).floor().max(1.0);
    }

    fn origin(&self) -> (f32, f32) {
        let map_w = self.tile_size * self.camera.view_w as f32;
        ((screen_width() - map_w) / 2.0, self.ui.hud_height)
    }

    fn tile_rect(&self, pos: Position) -> (f32, f32) {
        let (ox, oy) = self.origin();
        let local = self.camera.to_view(pos);
        (
            ox + local.x as f32 * self.tile_size,
            oy + local.y as f32 * self.tile_size,
        )
    }

    fn render_map(&self, view: &FrameView<'_>) {
        let t = self.tile_size;

        for pos in self.camera.visible() {
            let Some(terrain) = view.level.terrain_at(pos) else {
                continue;
            };
            let (px, py) = self.tile_rect(pos);
            let color = match terrain {
                TerrainKind::Grass => Color::from_rgba(46, 125, 50, 255),
                TerrainKind::Path => Color::from_rgba(93, 64, 55, 255),
            };
            draw_rectangle(px, py, t, t, color);
        }

        for pos in self.camera.visible() {
            let Some(marker) = view.level.object_at(pos) else {
                continue;
            };
            let (px, py) = self.tile_rect(pos);
            match marker {
                ObjectMarker::Empty | ObjectMarker::Start => {}
                ObjectMarker::Obstacle => {
                    draw_rectangle(px + t * 0.1, py, t * 0.8, t, Color::from_rgba(27, 94, 32, 255));
                }
                ObjectMarker::Question => {
                    let solved = view
                        .level
                        .question_at(pos)
                        .map(|q| view.solved.contains(&q.id))
                        .unwrap_or(false);
                    let color = if solved {
                        Color::from_rgba(158, 157, 36, 160)
                    } else {
                        Color::from_rgba(255, 235, 59, 255)
                    };
                    draw_circle(px + t / 2.0, py + t / 2.0, t * 0.3, color);
                }
                ObjectMarker::Finish => {
                    let half = t / 2.0;
                    draw_rectangle(px, py, half, half, WHITE);
                    draw_rectangle(px + half, py + half, half, half, WHITE);
                    draw_rectangle(px + half, py, half, half, BLACK);
                    draw_rectangle(px, py + half, half, half, BLACK);
                }
            }
        }
    }

    fn render_player(&self, player: Position) {
        let t = self.tile_size;
        let (px, py) = self.tile_rect(player);
        draw_rectangle(
            px + t * 0.1,
            py + t * 0.1,
            t * 0.8,
            t * 0.8,
            Color::from_rgba(33, 150, 243, 255),
        );
    }

    fn render_messages(&self) {
        let line_height = 22.0;
        let visible: Vec<_> = self.messages.iter().rev().take(3).collect();
        let base_y = self.ui.hud_height + 30.0;

        for (i, message) in visible.into_iter().rev().enumerate() {
            let alpha = (1.0 - message.age / MESSAGE_LIFETIME).clamp(0.0, 1.0);
            let mut color = match message.importance {
                MessageImportance::Info => WHITE,
                MessageImportance::Success => GOLD,
                MessageImportance::Warning => ORANGE,
            };
            color.a = alpha;
            let y = base_y + i as f32 * line_height;
            draw_rectangle(
                6.0,
                y - 17.0,
                screen_width() - 12.0,
                line_height,
                Color::new(0.0, 0.0, 0.0, 0.5 * alpha),
            );
            draw_text(&message.text, 12.0, y, 20.0, color);
        }
    }

    /// Ages messages and drops expired ones.
    pub fn update(&mut self, dt: f32) {
        for message in &mut self.messages {
            message.age += dt;
        }
        self.messages.retain(|m| m.age < MESSAGE_LIFETIME);
    }

    /// Adds a message to the message history.
    pub fn add_message(&mut self, text: String, importance: MessageImportance) {
        self.messages.push(DisplayMessage {
            text,
            importance,
            age: 0.0,
        });

        if self.messages.len() > config::MAX_MESSAGES {
            self.messages.remove(0);
        }
    }
}
