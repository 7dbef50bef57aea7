pub mod cancellation;
pub mod partition;
pub mod render_tile;
