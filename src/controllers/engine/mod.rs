pub mod commands;
pub mod compositor;
pub mod data;
pub mod engine;
pub mod errors;
pub mod events;
pub mod ports;
pub mod scheduler;
