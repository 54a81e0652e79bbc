//! # Rendering Module
//!
//! Macroquad presentation. Reads a [`FrameView`](crate::FrameView) every
//! frame and never mutates game state.

pub mod camera;
pub mod display;
pub mod ui;

pub use camera::*;
pub use display::*;
pub use ui::*;
