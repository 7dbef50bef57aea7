pub mod actions;
pub mod animation;
pub mod config;
pub mod data;
pub mod fractals;
pub mod util;
pub mod viewport;
