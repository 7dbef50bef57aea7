use crate::controllers::engine::data::frame_data::{FrameData, RenderFault, TileData};

#[derive(Debug, Clone)]
pub enum RenderEvent {
    Frame(FrameData),
    Tile(TileData),
    Fault(RenderFault),
}

impl RenderEvent {
    #[must_use]
    pub fn generation(&self) -> u64 {
        match self {
            Self::Frame(frame) => frame.generation,
            Self::Tile(tile) => tile.generation,
            Self::Fault(fault) => fault.generation,
        }
    }
}
