mod adapters;
mod controllers;
mod core;
#[cfg(feature = "gui")]
mod input;

pub use adapters::pixel_format::{PixelFormatError, blit_tile_to_rgba, copy_frame_to_rgba};
pub use controllers::engine::commands::EngineCommand;
pub use controllers::engine::data::frame_data::{FrameData, RenderFault, TileData};
pub use controllers::engine::engine::FractalEngine;
pub use controllers::engine::errors::EngineError;
pub use controllers::engine::events::render_event::RenderEvent;
pub use controllers::engine::ports::frame_sink::{DiscardSink, FrameSink};
pub use core::actions::cancellation::{CancelToken, Cancelled, NeverCancel};
pub use core::actions::partition::partition::{
    DEFAULT_TILE_SIZE, PartitionKind, partition, partition_bands, partition_tiles,
};
pub use core::actions::render_tile::ports::colour_map::ColourMap;
pub use core::actions::render_tile::ports::fractal_algorithm::FractalAlgorithm;
pub use core::actions::render_tile::render_tile::{RenderTileError, render_tile};
pub use core::animation::driver::{
    AnimationDriver, AnimationMode, AnimationState, AnimationStep, DEFAULT_CADENCE,
    DEFAULT_MAX_STEPS_PER_TICK,
};
pub use core::animation::errors::AnimationError;
pub use core::animation::oscillation::BoundedOscillation;
pub use core::animation::rotation::Rotation;
pub use core::config::engine_config::{ConfigError, EngineConfig, NotifyMode};
pub use core::data::colour::Colour;
pub use core::data::complex::Complex;
pub use core::data::frame_buffer::{BYTES_PER_PIXEL, FrameBuffer, FrameBufferError};
pub use core::data::point::Point;
pub use core::data::tile::{Tile, TileError};
pub use core::fractals::algorithm::{EscapeTimeAlgorithm, EscapeTimeError};
pub use core::fractals::colour_mapping::errors::ColourMapError;
pub use core::fractals::colour_mapping::factory::colour_map_factory;
pub use core::fractals::colour_mapping::kinds::ColourMapKinds;
pub use core::fractals::colour_mapping::map::FractalColourMap;
pub use core::fractals::escape_time::{ESCAPE_RADIUS_SQUARED, escape_time};
pub use core::fractals::params::{DEFAULT_MAX_ITERATIONS, FractalParams, FractalParamsError};
pub use core::fractals::variant::{DEFAULT_JULIA_C, FractalKinds, FractalVariant};
pub use core::viewport::pixel_mapping::PixelMapping;
pub use core::viewport::view_transform::{ScaleReference, ViewTransform, ViewTransformError};

#[cfg(feature = "gui")]
pub use input::gui::{GuiError, run_gui};
