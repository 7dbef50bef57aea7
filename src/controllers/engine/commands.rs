use crate::core::animation::driver::AnimationMode;
use crate::core::fractals::colour_mapping::kinds::ColourMapKinds;
use crate::core::fractals::variant::FractalVariant;
use std::time::Duration;

/// A stimulus for the engine. Any thread may send these through
/// [`FractalEngine::command_sender`](super::engine::FractalEngine::command_sender);
/// they are applied in order on the thread that owns the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    Configure { width: u32, height: u32 },
    SetVariant(FractalVariant),
    SetMaxIterations(i64),
    /// Raw text from an iteration input field.
    SetIterationsText(String),
    SetColourMap(ColourMapKinds),
    SetViewport { zoom: f64, offset_x: f64, offset_y: f64 },
    Pan { dx: f64, dy: f64 },
    ZoomAt { x: f64, y: f64, factor: f64 },
    ResetView,
    SetAnimationMode(AnimationMode),
    SetAnimationPaused(bool),
    Tick(Duration),
    Refresh,
}
