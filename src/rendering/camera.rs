//! # Camera
//!
//! Keeps the player centred in a fixed tile viewport without showing space
//! outside the level.

use crate::game::Position;

/// Top-left tile of the visible window plus its size in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Camera {
    pub x: i32,
    pub y: i32,
    pub view_w: i32,
    pub view_h: i32,
}

impl Camera {
    /// Creates a camera at the origin showing `view_w`×`view_h` tiles.
    pub fn new(view_w: i32, view_h: i32) -> Self {
        Self {
            x: 0,
            y: 0,
            view_w,
            view_h,
        }
    }

    /// Centres on `target`, clamped to a `level_w`×`level_h` level.
    ///
    /// A level smaller than the view is pinned to the top-left corner.
    ///
    /// # Examples
    ///
    /// ```
    /// use math_forest::{Camera, Position};
    ///
    /// let mut camera = Camera::new(12, 18);
    /// camera.follow(Position::new(5, 33), 12, 40);
    /// assert_eq!((camera.x, camera.y), (0, 22));
    /// ```
    pub fn follow(&mut self, target: Position, level_w: i32, level_h: i32) {
        self.x = clamp_axis(target.x, self.view_w, level_w);
        self.y = clamp_axis(target.y, self.view_h, level_h);
    }

    /// Converts a level position to a tile offset inside the view.
    pub fn to_view(&self, pos: Position) -> Position {
        Position::new(pos.x - self.x, pos.y - self.y)
    }

    /// Iterates the level positions covered by the view, row by row.
    pub fn visible(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.view_h).flat_map(move |ty| {
            (0..self.view_w).map(move |tx| Position::new(self.x + tx, self.y + ty))
        })
    }
}

fn clamp_axis(target: i32, view: i32, level: i32) -> i32 {
    (target - view / 2).min(level - view).max(0)
}
