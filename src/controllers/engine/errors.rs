use crate::core::animation::errors::AnimationError;
use crate::core::config::engine_config::ConfigError;
use crate::core::data::frame_buffer::FrameBufferError;
use crate::core::data::tile::TileError;
use crate::core::fractals::params::FractalParamsError;
use crate::core::viewport::view_transform::ViewTransformError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine has been shut down")]
    ShutDown,
    #[error("invalid frame size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    View(#[from] ViewTransformError),
    #[error(transparent)]
    Params(#[from] FractalParamsError),
    #[error(transparent)]
    Animation(#[from] AnimationError),
    #[error(transparent)]
    FrameBuffer(#[from] FrameBufferError),
    #[error(transparent)]
    Tile(#[from] TileError),
    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
