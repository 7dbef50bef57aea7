use crate::core::data::frame_buffer::FrameBuffer;
use crate::core::data::tile::Tile;
use std::sync::Arc;
use std::time::Duration;

/// A finished generation. `frame` is an immutable snapshot that later
/// writes never touch.
#[derive(Debug, Clone)]
pub struct FrameData {
    pub generation: u64,
    pub frame: Arc<FrameBuffer>,
    pub render_duration: Duration,
    /// Tasks of this generation that failed and left their region unchanged.
    pub faults: usize,
}

/// One tile composed into the displayed frame while its generation is still
/// in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileData {
    pub generation: u64,
    pub tile: Tile,
    /// Row-major RGB bytes for `tile`.
    pub pixels: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFault {
    pub generation: u64,
    pub tile: Tile,
    pub message: String,
}
