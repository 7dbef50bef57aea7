//! Windowed front end: winit for the window and input, pixels for the
//! framebuffer.

mod app;
pub mod controls;
pub mod events;
pub mod presenter;

pub use app::{GuiError, run_gui};
