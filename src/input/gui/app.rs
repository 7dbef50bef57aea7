//! Main GUI application loop.

use crate::controllers::engine::commands::EngineCommand;
use crate::controllers::engine::engine::FractalEngine;
use crate::controllers::engine::errors::EngineError;
use crate::core::config::engine_config::EngineConfig;
use crate::input::gui::controls::{ControlContext, PointerState, key_command};
use crate::input::gui::events::GuiEvent;
use crate::input::gui::presenter::PixelsPresenter;
use log::{error, info, warn};
use std::time::Instant;
use thiserror::Error;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoopBuilder, EventLoopWindowTarget};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowBuilder};

#[derive(Debug, Error)]
pub enum GuiError {
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("failed to create pixels surface: {0}")]
    Pixels(#[from] pixels::Error),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

struct App {
    window: &'static Window,
    engine: FractalEngine,
    presenter: PixelsPresenter,
    pointer: PointerState,
    last_tick: Instant,
}

impl App {
    fn apply(&mut self, command: EngineCommand) {
        if let Err(err) = self.engine.apply(command) {
            warn!("command rejected: {err}");
        }
    }

    fn handle_window_event(&mut self, event: WindowEvent, elwt: &EventLoopWindowTarget<GuiEvent>) {
        match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                if let Err(err) = self.presenter.resize(size.width, size.height) {
                    error!("failed to resize surface: {err}");
                    elwt.exit();
                    return;
                }
                self.apply(EngineCommand::Configure {
                    width: size.width,
                    height: size.height,
                });
            }
            WindowEvent::Focused(false) => self.pointer.reset(),
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(command) = self.pointer.handle_cursor_moved(position.x, position.y) {
                    self.apply(command);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.pointer.handle_button(button, state);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(command) = self.pointer.handle_wheel(delta) {
                    self.apply(command);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                let context = ControlContext::from_engine(&self.engine);
                if let Some(command) = key_command(key, &context) {
                    self.apply(command);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.presenter.render() {
                    error!("render failed: {err}");
                    elwt.exit();
                }
            }
            _ => {}
        }
    }

    fn tick(&mut self, elwt: &EventLoopWindowTarget<GuiEvent>) {
        let now = Instant::now();
        let cadence = self.engine.animation().cadence();
        let elapsed = now.duration_since(self.last_tick);

        if elapsed >= cadence {
            self.last_tick = now;
            if let Err(err) = self.engine.tick(elapsed) {
                warn!("animation tick failed: {err}");
            }
        }

        elwt.set_control_flow(ControlFlow::WaitUntil(self.last_tick + cadence));
    }

    fn present(&mut self) {
        if self.presenter.apply_pending(self.engine.latest_generation()) {
            self.window.request_redraw();
        }
    }
}

/// Opens a window and runs the engine until the window closes.
pub fn run_gui(mut config: EngineConfig) -> Result<(), GuiError> {
    let event_loop = EventLoopBuilder::<GuiEvent>::with_user_event().build()?;

    // Leaked so pixels can borrow the window for 'static.
    let window: &'static Window = Box::leak(Box::new(
        WindowBuilder::new()
            .with_title("Fractal Animator")
            .with_inner_size(LogicalSize::new(config.width, config.height))
            .with_min_inner_size(LogicalSize::new(200.0, 200.0))
            .build(&event_loop)?,
    ));

    let size = window.inner_size();
    config.width = size.width.max(1);
    config.height = size.height.max(1);

    let presenter = PixelsPresenter::new(window, event_loop.create_proxy())?;
    let engine = FractalEngine::new(config, presenter.share_sink())?;
    info!("{} worker(s) rendering into {}x{}", engine.workers(), size.width, size.height);

    let mut app = App {
        window,
        engine,
        presenter,
        pointer: PointerState::default(),
        last_tick: Instant::now(),
    };

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, window_id } if window_id == app.window.id() => {
            app.handle_window_event(event, elwt);
        }
        Event::UserEvent(GuiEvent::Wake) => app.present(),
        Event::AboutToWait => app.tick(elwt),
        Event::LoopExiting => app.engine.shutdown(),
        _ => {}
    })?;

    Ok(())
}
