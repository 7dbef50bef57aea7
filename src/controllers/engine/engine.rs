use crate::controllers::engine::commands::EngineCommand;
use crate::controllers::engine::compositor::{BufferTarget, Compositor};
use crate::controllers::engine::errors::EngineError;
use crate::controllers::engine::ports::frame_sink::FrameSink;
use crate::controllers::engine::scheduler::{RenderJob, TileScheduler};
use crate::core::actions::partition::partition::{PartitionKind, partition};
use crate::core::animation::driver::{AnimationDriver, AnimationMode, AnimationState};
use crate::core::config::engine_config::{EngineConfig, NotifyMode};
use crate::core::data::frame_buffer::FrameBuffer;
use crate::core::fractals::algorithm::EscapeTimeAlgorithm;
use crate::core::fractals::colour_mapping::factory::colour_map_factory;
use crate::core::fractals::colour_mapping::kinds::ColourMapKinds;
use crate::core::fractals::params::{FractalParams, clamp_max_iterations};
use crate::core::fractals::variant::FractalVariant;
use crate::core::util::worker_count::resolve_worker_count;
use crate::core::viewport::view_transform::ViewTransform;
use log::{debug, info, warn};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

/// Drives rendering of one fractal view.
///
/// The engine owns the view, the fractal parameters and the animation
/// state; only the thread holding it mutates them. Each change issues a new
/// generation that supersedes any render still in flight, and workers only
/// ever see an immutable snapshot taken when the generation was issued.
pub struct FractalEngine {
    config: EngineConfig,
    params: FractalParams,
    view: ViewTransform,
    animation: AnimationDriver,
    compositor: Arc<Compositor>,
    scheduler: TileScheduler,
    command_tx: Sender<EngineCommand>,
    command_rx: Receiver<EngineCommand>,
}

impl FractalEngine {
    /// Starts the worker pool, allocates the frames and renders the first
    /// frame.
    pub fn new(mut config: EngineConfig, sink: Arc<dyn FrameSink>) -> Result<Self, EngineError> {
        if config.width == 0 || config.height == 0 {
            return Err(EngineError::InvalidSize {
                width: config.width,
                height: config.height,
            });
        }

        let workers = resolve_worker_count(config.workers);
        let animation = AnimationDriver::new(
            AnimationState::from_mode(config.animation_mode),
            config.cadence,
            config.max_steps_per_tick,
        )?;

        if config.max_iterations == 0 {
            warn!("max iterations 0 clamped to 1");
            config.max_iterations = 1;
        }

        let mut params =
            FractalParams::new(FractalVariant::from_kind(config.fractal), config.max_iterations)?;
        params.set_julia_c(animation.state().c());
        if let Some(colour_map) = config.colour_map {
            params.set_colour_map(colour_map);
        }
        if let Some(pixel_mapping) = config.pixel_mapping {
            params.set_pixel_mapping(pixel_mapping);
        }

        let view =
            ViewTransform::new(config.width, config.height)?.with_scale_reference(config.scale_reference);
        let compositor = Arc::new(Compositor::new(config.width, config.height, sink)?);
        let scheduler = TileScheduler::new(workers, Arc::clone(&compositor))?;
        let (command_tx, command_rx) = mpsc::channel();

        info!(
            "engine started: {}x{}, {} with {} worker(s)",
            config.width,
            config.height,
            params.variant().kind(),
            workers
        );

        let mut engine = Self {
            config,
            params,
            view,
            animation,
            compositor,
            scheduler,
            command_tx,
            command_rx,
        };
        engine.render()?;

        Ok(engine)
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn params(&self) -> &FractalParams {
        &self.params
    }

    #[must_use]
    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    #[must_use]
    pub fn animation(&self) -> &AnimationDriver {
        &self.animation
    }

    #[must_use]
    pub fn workers(&self) -> usize {
        self.scheduler.workers().get()
    }

    /// The most recently displayed frame. Never torn: band renders swap in
    /// whole frames and tile writes never alter a snapshot already taken.
    #[must_use]
    pub fn current_frame(&self) -> Arc<FrameBuffer> {
        self.compositor.current_frame()
    }

    #[must_use]
    pub fn latest_generation(&self) -> u64 {
        self.compositor.latest_generation()
    }

    #[must_use]
    pub fn last_completed_generation(&self) -> u64 {
        self.compositor.last_completed_generation()
    }

    /// Blocks until no render task is running. Returns `false` on timeout.
    pub fn wait_until_idle(&self, timeout: Duration) -> bool {
        self.scheduler.wait_until_idle(Some(timeout))
    }

    /// Replaces the frame-ready sink.
    pub fn on_frame_ready<S>(&self, sink: S)
    where
        S: FrameSink + 'static,
    {
        self.compositor.set_sink(Arc::new(sink));
    }

    /// Resizes the output. A zero dimension is rejected and the previous size
    /// kept.
    pub fn configure(&mut self, width: u32, height: u32) -> Result<u64, EngineError> {
        if width == 0 || height == 0 {
            warn!(
                "rejecting resize to {width}x{height}, keeping {}x{}",
                self.view.pixel_width(),
                self.view.pixel_height()
            );
            return Err(EngineError::InvalidSize { width, height });
        }

        self.ensure_running()?;
        self.view.resize(width, height)?;
        self.compositor.resize(width, height)?;
        self.config.width = width;
        self.config.height = height;

        self.render()
    }

    /// Switches fractal family. Colour map and pixel mapping follow the new
    /// family unless the config pins them. A Julia variant keeps its
    /// constant and the animation carries on from there.
    pub fn set_variant(&mut self, variant: FractalVariant) -> Result<u64, EngineError> {
        self.ensure_running()?;
        if let Some(c) = variant.julia_c() {
            self.animation
                .set_state(AnimationState::seeded(self.animation.mode(), c)?);
        }

        self.params.set_variant(variant);
        if let Some(colour_map) = self.config.colour_map {
            self.params.set_colour_map(colour_map);
        }
        if let Some(pixel_mapping) = self.config.pixel_mapping {
            self.params.set_pixel_mapping(pixel_mapping);
        }
        self.config.fractal = variant.kind();

        self.render()
    }

    /// Clamps `max_iterations` into `1..=u32::MAX`.
    pub fn set_max_iterations(&mut self, max_iterations: i64) -> Result<u64, EngineError> {
        self.ensure_running()?;
        let clamped = clamp_max_iterations(max_iterations);
        if i64::from(clamped) != max_iterations {
            warn!("max iterations {max_iterations} clamped to {clamped}");
        }

        self.params.set_max_iterations(clamped)?;
        self.config.max_iterations = clamped;

        self.render()
    }

    /// Parses iteration-count text. Unparseable text keeps the current value.
    pub fn set_iterations_text(&mut self, text: &str) -> Result<u64, EngineError> {
        self.ensure_running()?;
        let mut candidate = self.config.clone();

        if let Err(err) = candidate.apply_override("iterations", text) {
            warn!("{err}; keeping {} iterations", self.params.max_iterations());
            return Err(err.into());
        }

        self.set_max_iterations(i64::from(candidate.max_iterations))
    }

    pub fn set_colour_map(&mut self, colour_map: ColourMapKinds) -> Result<u64, EngineError> {
        self.ensure_running()?;
        self.params.set_colour_map(colour_map);
        self.config.colour_map = Some(colour_map);

        self.render()
    }

    pub fn set_viewport(&mut self, zoom: f64, offset_x: f64, offset_y: f64) -> Result<u64, EngineError> {
        self.ensure_running()?;
        self.view
            .set_viewport(zoom, offset_x, offset_y)
            .inspect_err(|err| warn!("rejecting viewport: {err}"))?;

        self.render_with(PartitionKind::Tiles)
    }

    /// Drags the view by `(dx, dy)` pixels.
    pub fn pan(&mut self, dx: f64, dy: f64) -> Result<u64, EngineError> {
        self.ensure_running()?;
        self.view
            .pan(dx, dy)
            .inspect_err(|err| warn!("rejecting pan: {err}"))?;

        self.render_with(PartitionKind::Tiles)
    }

    /// Zooms by `factor` keeping the point under `(x, y)` in place.
    pub fn zoom_at(&mut self, x: f64, y: f64, factor: f64) -> Result<u64, EngineError> {
        self.ensure_running()?;
        self.view
            .zoom_at(x, y, factor)
            .inspect_err(|err| warn!("rejecting zoom: {err}"))?;

        self.render_with(PartitionKind::Tiles)
    }

    pub fn reset_view(&mut self) -> Result<u64, EngineError> {
        self.ensure_running()?;
        self.view.reset();

        self.render_with(PartitionKind::Tiles)
    }

    pub fn set_animation_mode(&mut self, mode: AnimationMode) -> Result<Option<u64>, EngineError> {
        self.ensure_running()?;
        self.animation.set_mode(mode);
        self.config.animation_mode = mode;

        if self.params.set_julia_c(self.animation.state().c()) {
            return self.render_with(PartitionKind::Bands).map(Some);
        }

        Ok(None)
    }

    pub fn set_animation_paused(&mut self, paused: bool) {
        self.animation.set_paused(paused);
    }

    /// Advances the animation by `elapsed`. Returns the generation issued,
    /// if the animated constant moved.
    ///
    /// Only Julia variants animate; for Mandelbrot a tick does nothing.
    pub fn tick(&mut self, elapsed: Duration) -> Result<Option<u64>, EngineError> {
        self.ensure_running()?;

        if self.params.variant().julia_c().is_none() {
            return Ok(None);
        }

        let step = self.animation.advance(elapsed);
        if step.dropped_excess {
            debug!("animation fell behind; dropped surplus steps");
        }

        match step.c {
            Some(c) => {
                self.params.set_julia_c(c);
                self.render_with(PartitionKind::Bands).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Re-renders the current state with the variant's own partitioning.
    pub fn render(&mut self) -> Result<u64, EngineError> {
        self.render_with(self.params.variant().default_partition())
    }

    pub fn apply(&mut self, command: EngineCommand) -> Result<(), EngineError> {
        match command {
            EngineCommand::Configure { width, height } => self.configure(width, height).map(drop),
            EngineCommand::SetVariant(variant) => self.set_variant(variant).map(drop),
            EngineCommand::SetMaxIterations(max_iterations) => {
                self.set_max_iterations(max_iterations).map(drop)
            }
            EngineCommand::SetIterationsText(text) => self.set_iterations_text(&text).map(drop),
            EngineCommand::SetColourMap(colour_map) => self.set_colour_map(colour_map).map(drop),
            EngineCommand::SetViewport {
                zoom,
                offset_x,
                offset_y,
            } => self.set_viewport(zoom, offset_x, offset_y).map(drop),
            EngineCommand::Pan { dx, dy } => self.pan(dx, dy).map(drop),
            EngineCommand::ZoomAt { x, y, factor } => self.zoom_at(x, y, factor).map(drop),
            EngineCommand::ResetView => self.reset_view().map(drop),
            EngineCommand::SetAnimationMode(mode) => self.set_animation_mode(mode).map(drop),
            EngineCommand::SetAnimationPaused(paused) => {
                self.set_animation_paused(paused);
                Ok(())
            }
            EngineCommand::Tick(elapsed) => self.tick(elapsed).map(drop),
            EngineCommand::Refresh => self.render().map(drop),
        }
    }

    /// A handle other threads can use to queue commands.
    #[must_use]
    pub fn command_sender(&self) -> Sender<EngineCommand> {
        self.command_tx.clone()
    }

    /// Applies every queued command in arrival order. A command that fails
    /// is logged and skipped. Returns how many commands were taken.
    pub fn process_commands(&mut self) -> usize {
        let mut processed = 0;

        while let Ok(command) = self.command_rx.try_recv() {
            processed += 1;
            if let Err(err) = self.apply(command) {
                warn!("command rejected: {err}");
            }
        }

        processed
    }

    /// Supersedes all in-flight work, waits for the workers to drain and
    /// releases the pool. Further render requests fail with
    /// [`EngineError::ShutDown`].
    pub fn shutdown(&mut self) {
        if self.scheduler.is_shut_down() {
            return;
        }

        self.compositor.begin_generation(BufferTarget::Current);
        self.scheduler.shutdown();
        info!("engine shut down");
    }

    fn ensure_running(&self) -> Result<(), EngineError> {
        if self.scheduler.is_shut_down() {
            return Err(EngineError::ShutDown);
        }

        Ok(())
    }

    fn render_with(&mut self, kind: PartitionKind) -> Result<u64, EngineError> {
        self.ensure_running()?;

        let workers = u32::try_from(self.scheduler.workers().get()).unwrap_or(u32::MAX);
        let tiles = partition(
            kind,
            self.view.pixel_width(),
            self.view.pixel_height(),
            NonZeroU32::new(workers).unwrap_or(NonZeroU32::MIN),
            self.config.tile_size,
        )?;

        let (target, notify_tiles) = match kind {
            PartitionKind::Bands => (BufferTarget::Next, false),
            PartitionKind::Tiles => (
                BufferTarget::Current,
                self.config.notify_mode == NotifyMode::Progressive,
            ),
        };

        let generation = self.compositor.begin_generation(target);
        let job = RenderJob::new(
            generation,
            EscapeTimeAlgorithm::new(self.params, self.view),
            colour_map_factory(self.params.colour_map(), self.params.max_iterations()),
            target,
            notify_tiles,
        );
        self.scheduler.submit(job, tiles)?;

        Ok(generation)
    }
}

impl Drop for FractalEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
