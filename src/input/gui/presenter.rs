use crate::adapters::pixel_format::{blit_tile_to_rgba, copy_frame_to_rgba};
use crate::controllers::engine::events::render_event::RenderEvent;
use crate::controllers::engine::ports::frame_sink::FrameSink;
use crate::input::gui::events::GuiEvent;
use log::{trace, warn};
use pixels::{Pixels, SurfaceTexture};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use winit::event_loop::EventLoopProxy;
use winit::window::Window;

/// Queues render events from worker threads and wakes the event loop.
pub struct PixelsFrameSink {
    pending: Mutex<Vec<RenderEvent>>,
    event_loop_proxy: EventLoopProxy<GuiEvent>,
}

impl PixelsFrameSink {
    #[must_use]
    pub fn new(event_loop_proxy: EventLoopProxy<GuiEvent>) -> Self {
        Self {
            pending: Mutex::new(Vec::new()),
            event_loop_proxy,
        }
    }

    fn take_events(&self) -> Vec<RenderEvent> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl FrameSink for PixelsFrameSink {
    fn submit(&self, event: RenderEvent) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        // A finished frame replaces everything queued before it.
        if matches!(event, RenderEvent::Frame(_)) {
            pending.clear();
        }
        pending.push(event);
        drop(pending);

        let _ = self.event_loop_proxy.send_event(GuiEvent::Wake);
    }
}

/// Draws engine output onto the window through a pixels surface.
pub struct PixelsPresenter {
    pixels: Pixels<'static>,
    sink: Arc<PixelsFrameSink>,
    width: u32,
    height: u32,
    last_render_duration: Option<Duration>,
}

impl PixelsPresenter {
    pub fn new(
        window: &'static Window,
        event_loop_proxy: EventLoopProxy<GuiEvent>,
    ) -> Result<Self, pixels::Error> {
        let size = window.inner_size();
        let surface_texture = SurfaceTexture::new(size.width, size.height, window);
        let pixels = Pixels::new(size.width, size.height, surface_texture)?;

        Ok(Self {
            pixels,
            sink: Arc::new(PixelsFrameSink::new(event_loop_proxy)),
            width: size.width,
            height: size.height,
            last_render_duration: None,
        })
    }

    #[must_use]
    pub fn share_sink(&self) -> Arc<dyn FrameSink> {
        Arc::clone(&self.sink) as Arc<dyn FrameSink>
    }

    #[must_use]
    pub fn last_render_duration(&self) -> Option<Duration> {
        self.last_render_duration
    }

    /// Applies queued render events for `latest_generation` to the surface.
    /// Returns `true` if anything changed on screen.
    pub fn apply_pending(&mut self, latest_generation: u64) -> bool {
        let mut changed = false;

        for event in self.sink.take_events() {
            if event.generation() != latest_generation {
                trace!("skipping event for stale generation {}", event.generation());
                continue;
            }

            match event {
                RenderEvent::Frame(frame) => {
                    if frame.frame.width() != self.width || frame.frame.height() != self.height {
                        continue;
                    }
                    match copy_frame_to_rgba(&frame.frame, self.pixels.frame_mut()) {
                        Ok(()) => {
                            self.last_render_duration = Some(frame.render_duration);
                            changed = true;
                        }
                        Err(err) => warn!("dropping frame {}: {err}", frame.generation),
                    }
                }
                RenderEvent::Tile(tile) => {
                    match blit_tile_to_rgba(tile.tile, &tile.pixels, self.pixels.frame_mut(), self.width) {
                        Ok(()) => changed = true,
                        Err(err) => trace!("dropping tile: {err}"),
                    }
                }
                RenderEvent::Fault(fault) => {
                    warn!("tile {:?} failed: {}", fault.tile, fault.message);
                }
            }
        }

        changed
    }

    pub fn render(&self) -> Result<(), pixels::Error> {
        if self.width == 0 || self.height == 0 {
            return Ok(());
        }

        self.pixels.render()
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), pixels::TextureError> {
        if width == 0 || height == 0 {
            return Ok(());
        }

        self.pixels.resize_surface(width, height)?;
        self.pixels.resize_buffer(width, height)?;
        self.width = width;
        self.height = height;

        Ok(())
    }
}
