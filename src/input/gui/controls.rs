use crate::controllers::engine::commands::EngineCommand;
use crate::controllers::engine::engine::FractalEngine;
use crate::core::animation::driver::AnimationMode;
use crate::core::fractals::colour_mapping::kinds::ColourMapKinds;
use crate::core::fractals::variant::{FractalKinds, FractalVariant};
use winit::event::{ElementState, MouseButton, MouseScrollDelta};
use winit::keyboard::KeyCode;

pub const ZOOM_STEP: f64 = 1.1;
pub const ITERATION_STEP: i64 = 50;
const PIXELS_PER_SCROLL_LINE: f64 = 40.0;

/// What the key bindings need to know about the engine to pick a command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlContext {
    pub fractal: FractalKinds,
    pub colour_map: ColourMapKinds,
    pub animation_mode: AnimationMode,
    pub paused: bool,
    pub max_iterations: u32,
}

impl ControlContext {
    #[must_use]
    pub fn from_engine(engine: &FractalEngine) -> Self {
        Self {
            fractal: engine.params().variant().kind(),
            colour_map: engine.params().colour_map(),
            animation_mode: engine.animation().mode(),
            paused: engine.animation().is_paused(),
            max_iterations: engine.params().max_iterations(),
        }
    }
}

/// Maps a key press to a command.
///
/// | Key          | Command                        |
/// |--------------|--------------------------------|
/// | `M`          | switch to Mandelbrot           |
/// | `J`          | switch to Julia                |
/// | `C`          | next colour map                |
/// | `A`          | toggle oscillation / rotation  |
/// | `Space`      | pause / resume animation       |
/// | `R`          | reset the view                 |
/// | `+` / `-`    | more / fewer iterations        |
#[must_use]
pub fn key_command(key: KeyCode, context: &ControlContext) -> Option<EngineCommand> {
    match key {
        KeyCode::KeyM if context.fractal != FractalKinds::Mandelbrot => {
            Some(EngineCommand::SetVariant(FractalVariant::Mandelbrot))
        }
        KeyCode::KeyJ if context.fractal != FractalKinds::Julia => {
            Some(EngineCommand::SetVariant(FractalVariant::default()))
        }
        KeyCode::KeyC => Some(EngineCommand::SetColourMap(next_colour_map(context.colour_map))),
        KeyCode::KeyA => Some(EngineCommand::SetAnimationMode(match context.animation_mode {
            AnimationMode::Oscillation => AnimationMode::Rotation,
            AnimationMode::Rotation => AnimationMode::Oscillation,
        })),
        KeyCode::Space => Some(EngineCommand::SetAnimationPaused(!context.paused)),
        KeyCode::KeyR => Some(EngineCommand::ResetView),
        KeyCode::Equal | KeyCode::NumpadAdd => Some(EngineCommand::SetMaxIterations(
            i64::from(context.max_iterations) + ITERATION_STEP,
        )),
        KeyCode::Minus | KeyCode::NumpadSubtract => Some(EngineCommand::SetMaxIterations(
            i64::from(context.max_iterations) - ITERATION_STEP,
        )),
        _ => None,
    }
}

fn next_colour_map(current: ColourMapKinds) -> ColourMapKinds {
    let all = ColourMapKinds::ALL;
    let index = all.iter().position(|&kind| kind == current).unwrap_or(0);
    all[(index + 1) % all.len()]
}

/// Tracks the cursor so drags become pans and the wheel zooms about the
/// cursor.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PointerState {
    position: Option<(f64, f64)>,
    dragging: bool,
}

impl PointerState {
    pub fn handle_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left {
            self.dragging = state == ElementState::Pressed;
        }
    }

    /// Records the new cursor position; while dragging returns the pan that
    /// follows it.
    pub fn handle_cursor_moved(&mut self, x: f64, y: f64) -> Option<EngineCommand> {
        let previous = self.position.replace((x, y));

        match previous {
            Some((px, py)) if self.dragging && (px != x || py != y) => Some(EngineCommand::Pan {
                dx: x - px,
                dy: y - py,
            }),
            _ => None,
        }
    }

    pub fn handle_wheel(&self, delta: MouseScrollDelta) -> Option<EngineCommand> {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => f64::from(y),
            MouseScrollDelta::PixelDelta(position) => position.y / PIXELS_PER_SCROLL_LINE,
        };
        if lines == 0.0 || !lines.is_finite() {
            return None;
        }

        let (x, y) = self.position?;
        Some(EngineCommand::ZoomAt {
            x,
            y,
            factor: ZOOM_STEP.powf(lines),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
