//! Input adapters that turn user interaction into engine commands.

#[cfg(feature = "gui")]
pub mod gui;
