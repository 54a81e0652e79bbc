//! # User Interface Elements
//!
//! HUD, quiz overlay, completion screen and on-screen touch buttons.
//! Every draw call here reads state; clicks come back as [`PlayerInput`].

use crate::game::{Direction, FrameView, QuizInstance};
use crate::input::PlayerInput;
use macroquad::prelude::*;

/// A clickable screen rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub label: String,
}

impl Button {
    /// Creates a button.
    pub fn new(x: f32, y: f32, w: f32, h: f32, label: impl Into<String>) -> Self {
        Self {
            x,
            y,
            w,
            h,
            label: label.into(),
        }
    }

    /// Whether a point lies inside the button.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }

    /// Draws the button and reports a click on it this frame.
    pub fn draw_and_check(&self, fill: Color) -> bool {
        draw_rectangle(self.x, self.y, self.w, self.h, fill);
        draw_rectangle_lines(self.x, self.y, self.w, self.h, 2.0, WHITE);
        let dims = measure_text(&self.label, None, 24, 1.0);
        draw_text(
            &self.label,
            self.x + (self.w - dims.width) / 2.0,
            self.y + (self.h + dims.height) / 2.0,
            24.0,
            WHITE,
        );

        if is_mouse_button_pressed(MouseButton::Left) {
            let (mx, my) = mouse_position();
            return self.contains(mx, my);
        }
        false
    }
}

/// Heads-up display, overlay and touch controls.
pub struct UI {
    /// Height of the HUD strip in pixels
    pub hud_height: f32,
}

impl Default for UI {
    fn default() -> Self {
        Self::new()
    }
}

impl UI {
    /// Creates a new UI instance.
    pub fn new() -> Self {
        Self { hud_height: 40.0 }
    }

    /// Draws `Level n: name` and the solved counter.
    pub fn render_hud(&self, view: &FrameView<'_>) {
        let width = screen_width();
        draw_rectangle(0.0, 0.0, width, self.hud_height, Color::new(0.0, 0.0, 0.0, 0.7));
        draw_text(
            &format!("Level {}: {}", view.level_number, view.level.name),
            10.0,
            27.0,
            22.0,
            WHITE,
        );

        let progress = format!("Solved: {} / {}", view.solved_count, view.required_solved);
        let dims = measure_text(&progress, None, 22, 1.0);
        let color = if view.solved_count >= view.required_solved {
            GOLD
        } else {
            WHITE
        };
        draw_text(&progress, width - dims.width - 10.0, 27.0, 22.0, color);
    }

    /// Draws the quiz overlay with the typed answer.
    ///
    /// Returns Confirm or Cancel when the matching button is clicked.
    pub fn render_quiz_overlay(&self, quiz: &QuizInstance, typed: &str) -> Option<PlayerInput> {
        let (sw, sh) = (screen_width(), screen_height());
        draw_rectangle(0.0, 0.0, sw, sh, Color::new(0.0, 0.0, 0.0, 0.6));

        let panel_w = (sw * 0.8).min(420.0);
        let panel_h = 230.0;
        let px = (sw - panel_w) / 2.0;
        let py = (sh - panel_h) / 2.0;
        draw_rectangle(px, py, panel_w, panel_h, Color::from_rgba(38, 50, 56, 245));

        let prompt = quiz.prompt();
        let dims = measure_text(&prompt, None, 40, 1.0);
        draw_text(&prompt, px + (panel_w - dims.width) / 2.0, py + 60.0, 40.0, WHITE);

        let field_y = py + 85.0;
        draw_rectangle(px + 30.0, field_y, panel_w - 60.0, 50.0, WHITE);
        draw_text(&format!("{}_", typed), px + 42.0, field_y + 36.0, 34.0, BLACK);

        let button_w = (panel_w - 90.0) / 2.0;
        let confirm = Button::new(px + 30.0, py + 160.0, button_w, 48.0, "OK");
        let cancel = Button::new(px + 60.0 + button_w, py + 160.0, button_w, 48.0, "Cancel");

        if confirm.draw_and_check(Color::from_rgba(67, 160, 71, 255)) {
            return Some(PlayerInput::Confirm);
        }
        if cancel.draw_and_check(Color::from_rgba(120, 120, 120, 255)) {
            return Some(PlayerInput::Cancel);
        }
        None
    }

    /// Draws the on-screen direction pad in the bottom-right corner.
    pub fn render_touch_controls(&self) -> Option<PlayerInput> {
        let size = 56.0;
        let gap = 6.0;
        let cx = screen_width() - (size * 1.5 + gap + 16.0);
        let cy = screen_height() - (size * 1.5 + gap + 16.0);
        let fill = Color::new(1.0, 1.0, 1.0, 0.2);

        let pad = [
            (Direction::Up, cx, cy - size - gap, "^"),
            (Direction::Down, cx, cy + size + gap, "v"),
            (Direction::Left, cx - size - gap, cy, "<"),
            (Direction::Right, cx + size + gap, cy, ">"),
        ];

        let mut pressed = None;
        for (direction, x, y, label) in pad {
            let button = Button::new(x - size / 2.0, y - size / 2.0, size, size, label);
            if button.draw_and_check(fill) {
                pressed = Some(PlayerInput::Move(direction));
            }
        }
        pressed
    }

    /// Draws the level-complete acknowledgment.
    pub fn render_completion_screen(&self, level_name: &str) -> Option<PlayerInput> {
        let (sw, sh) = (screen_width(), screen_height());
        draw_rectangle(0.0, 0.0, sw, sh, Color::new(0.0, 0.0, 0.0, 0.75));

        let title = "Level complete!";
        let dims = measure_text(title, None, 48, 1.0);
        draw_text(title, (sw - dims.width) / 2.0, sh / 2.0 - 60.0, 48.0, GOLD);

        let dims = measure_text(level_name, None, 28, 1.0);
        draw_text(level_name, (sw - dims.width) / 2.0, sh / 2.0 - 20.0, 28.0, WHITE);

        let hint = "Enter: keep exploring   N: play again   Esc: quit";
        let dims = measure_text(hint, None, 20, 1.0);
        draw_text(hint, (sw - dims.width) / 2.0, sh / 2.0 + 20.0, 20.0, LIGHTGRAY);

        let again = Button::new(sw / 2.0 - 100.0, sh / 2.0 + 50.0, 200.0, 48.0, "Play again");
        if again.draw_and_check(Color::from_rgba(67, 160, 71, 255)) {
            return Some(PlayerInput::Restart);
        }
        None
    }
}
