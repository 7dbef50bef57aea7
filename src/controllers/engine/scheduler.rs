use crate::controllers::engine::compositor::{BufferTarget, Compositor, WriteOutcome};
use crate::controllers::engine::errors::EngineError;
use crate::core::actions::render_tile::render_tile::render_tile;
use crate::core::data::tile::Tile;
use crate::core::fractals::algorithm::EscapeTimeAlgorithm;
use crate::core::fractals::colour_mapping::map::FractalColourMap;
use log::{error, trace, warn};
use std::any::Any;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Everything the tasks of one generation share. Immutable apart from the
/// completion counters.
pub struct RenderJob {
    pub generation: u64,
    pub algorithm: EscapeTimeAlgorithm,
    pub colour_map: Box<dyn FractalColourMap>,
    pub target: BufferTarget,
    /// Report each tile to the sink as it lands.
    pub notify_tiles: bool,
    remaining: AtomicUsize,
    faults: AtomicUsize,
    started: Instant,
}

impl RenderJob {
    #[must_use]
    pub fn new(
        generation: u64,
        algorithm: EscapeTimeAlgorithm,
        colour_map: Box<dyn FractalColourMap>,
        target: BufferTarget,
        notify_tiles: bool,
    ) -> Self {
        Self {
            generation,
            algorithm,
            colour_map,
            target,
            notify_tiles,
            remaining: AtomicUsize::new(0),
            faults: AtomicUsize::new(0),
            started: Instant::now(),
        }
    }
}

/// Counts tasks that have been spawned but not yet finished.
#[derive(Default)]
struct TaskTracker {
    pending: Mutex<usize>,
    idle: Condvar,
}

impl TaskTracker {
    fn start(self: &Arc<Self>) -> TaskGuard {
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        TaskGuard(Arc::clone(self))
    }

    fn wait_idle(&self, timeout: Option<Duration>) -> bool {
        let deadline = timeout.map(|timeout| Instant::now() + timeout);
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);

        while *pending > 0 {
            match deadline {
                None => {
                    pending = self.idle.wait(pending).unwrap_or_else(PoisonError::into_inner);
                }
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    pending = self
                        .idle
                        .wait_timeout(pending, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0;
                }
            }
        }

        true
    }
}

struct TaskGuard(Arc<TaskTracker>);

impl Drop for TaskGuard {
    fn drop(&mut self) {
        let mut pending = self.0.pending.lock().unwrap_or_else(PoisonError::into_inner);
        *pending -= 1;
        if *pending == 0 {
            self.0.idle.notify_all();
        }
    }
}

/// Runs one task per tile on a fixed pool and completes each generation once
/// its last task has finished.
pub struct TileScheduler {
    pool: Option<rayon::ThreadPool>,
    compositor: Arc<Compositor>,
    tracker: Arc<TaskTracker>,
    shutdown: Arc<AtomicBool>,
    workers: NonZeroUsize,
}

impl TileScheduler {
    pub fn new(workers: NonZeroUsize, compositor: Arc<Compositor>) -> Result<Self, EngineError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.get())
            .thread_name(|index| format!("fractal-worker-{index}"))
            .panic_handler(|payload| {
                error!("worker panicked outside a task: {}", panic_message(payload.as_ref()));
            })
            .build()?;

        Ok(Self {
            pool: Some(pool),
            compositor,
            tracker: Arc::new(TaskTracker::default()),
            shutdown: Arc::new(AtomicBool::new(false)),
            workers,
        })
    }

    #[must_use]
    pub fn workers(&self) -> NonZeroUsize {
        self.workers
    }

    /// Spawns one task per tile. The job's generation completes when the
    /// last of them finishes, whether it wrote, was cancelled or failed.
    pub fn submit(&self, mut job: RenderJob, tiles: Vec<Tile>) -> Result<(), EngineError> {
        let pool = self.pool.as_ref().ok_or(EngineError::ShutDown)?;

        if tiles.is_empty() {
            self.compositor
                .complete_generation(job.generation, job.target, Duration::ZERO, 0);
            return Ok(());
        }

        *job.remaining.get_mut() = tiles.len();
        let job = Arc::new(job);

        trace!(
            "generation {} split into {} task(s)",
            job.generation,
            tiles.len()
        );

        for tile in tiles {
            let guard = self.tracker.start();
            let job = Arc::clone(&job);
            let compositor = Arc::clone(&self.compositor);
            let shutdown = Arc::clone(&self.shutdown);

            pool.spawn(move || {
                let _guard = guard;
                run_task(&job, tile, &compositor, &shutdown);
            });
        }

        Ok(())
    }

    /// Blocks until no task is running. Returns `false` on timeout.
    pub fn wait_until_idle(&self, timeout: Option<Duration>) -> bool {
        self.tracker.wait_idle(timeout)
    }

    /// Cancels queued and running tasks, waits for them to drain and releases
    /// the pool. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if self.pool.is_none() {
            return;
        }

        self.shutdown.store(true, Ordering::Release);
        self.tracker.wait_idle(None);
        self.pool = None;
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.pool.is_none()
    }
}

impl Drop for TileScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_task(job: &RenderJob, tile: Tile, compositor: &Compositor, shutdown: &AtomicBool) {
    let generation = job.generation;
    let cancel =
        || shutdown.load(Ordering::Relaxed) || !compositor.is_current(generation);

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        render_tile(tile, &job.algorithm, &job.colour_map, &cancel)
    }));

    match outcome {
        Ok(Ok(pixels)) => {
            match compositor.write_tile(generation, job.target, tile, &pixels, job.notify_tiles) {
                Ok(WriteOutcome::Written | WriteOutcome::Discarded) => {}
                Err(err) => fault(job, compositor, tile, err.to_string()),
            }
        }
        Ok(Err(err)) if err.is_cancelled() => {
            trace!("generation {generation} {tile:?} cancelled");
        }
        Ok(Err(err)) => fault(job, compositor, tile, err.to_string()),
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!("generation {generation} {tile:?} panicked: {message}");
            fault(job, compositor, tile, message);
        }
    }

    if job.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
        compositor.complete_generation(
            generation,
            job.target,
            job.started.elapsed(),
            job.faults.load(Ordering::Acquire),
        );
    }
}

fn fault(job: &RenderJob, compositor: &Compositor, tile: Tile, message: String) {
    warn!(
        "generation {} {tile:?} failed, region left unchanged: {message}",
        job.generation
    );
    job.faults.fetch_add(1, Ordering::AcqRel);
    compositor.report_fault(job.generation, tile, message);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::engine::events::render_event::RenderEvent;
    use crate::controllers::engine::ports::frame_sink::FrameSink;
    use crate::core::actions::partition::partition::partition_tiles;
    use crate::core::fractals::colour_mapping::factory::colour_map_factory;
    use crate::core::fractals::params::FractalParams;
    use crate::core::fractals::variant::FractalVariant;
    use crate::core::viewport::view_transform::ViewTransform;
    use std::num::NonZeroU32;

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<RenderEvent>>,
    }

    impl FrameSink for RecordingSink {
        fn submit(&self, event: RenderEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn job(generation: u64, width: u32, height: u32, target: BufferTarget) -> RenderJob {
        let params = FractalParams::new(FractalVariant::Mandelbrot, 40).unwrap();
        let view = ViewTransform::new(width, height).unwrap();
        RenderJob::new(
            generation,
            EscapeTimeAlgorithm::new(params, view),
            colour_map_factory(params.colour_map(), params.max_iterations()),
            target,
            false,
        )
    }

    fn setup(width: u32, height: u32) -> (TileScheduler, Arc<Compositor>, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let compositor =
            Arc::new(Compositor::new(width, height, Arc::clone(&sink) as Arc<dyn FrameSink>).unwrap());
        let scheduler =
            TileScheduler::new(NonZeroUsize::new(3).unwrap(), Arc::clone(&compositor)).unwrap();
        (scheduler, compositor, sink)
    }

    #[test]
    fn test_generation_completes_once_after_all_tiles() {
        let (scheduler, compositor, sink) = setup(40, 30);
        let tiles = partition_tiles(40, 30, NonZeroU32::new(7).unwrap()).unwrap();
        let generation = compositor.begin_generation(BufferTarget::Current);

        scheduler
            .submit(job(generation, 40, 30, BufferTarget::Current), tiles)
            .unwrap();
        assert!(scheduler.wait_until_idle(Some(Duration::from_secs(10))));

        let events = sink.events.lock().unwrap();
        let frames: Vec<_> = events
            .iter()
            .filter(|event| matches!(event, RenderEvent::Frame(_)))
            .collect();
        assert_eq!(frames.len(), 1);
        assert_eq!(compositor.last_completed_generation(), generation);
    }

    #[test]
    fn test_empty_tile_list_completes_immediately() {
        let (scheduler, compositor, _) = setup(4, 4);
        let generation = compositor.begin_generation(BufferTarget::Next);

        scheduler
            .submit(job(generation, 4, 4, BufferTarget::Next), Vec::new())
            .unwrap();

        assert_eq!(compositor.last_completed_generation(), generation);
    }

    #[test]
    fn test_failing_tile_is_isolated() {
        let (scheduler, compositor, sink) = setup(10, 10);
        let generation = compositor.begin_generation(BufferTarget::Current);
        let tiles = vec![
            Tile::new(0, 0, 10, 5).unwrap(),
            // Outside the 10x10 view, so the algorithm rejects it.
            Tile::new(0, 10, 10, 5).unwrap(),
            Tile::new(0, 5, 10, 5).unwrap(),
        ];

        scheduler
            .submit(job(generation, 10, 10, BufferTarget::Current), tiles)
            .unwrap();
        assert!(scheduler.wait_until_idle(Some(Duration::from_secs(10))));

        let events = sink.events.lock().unwrap();
        let faults = events
            .iter()
            .filter(|event| matches!(event, RenderEvent::Fault(_)))
            .count();
        let frame = events.iter().find_map(|event| match event {
            RenderEvent::Frame(frame) => Some(frame),
            _ => None,
        });
        assert_eq!(faults, 1);
        assert_eq!(frame.map(|frame| frame.faults), Some(1));
        assert_eq!(compositor.last_completed_generation(), generation);
    }

    #[test]
    fn test_shutdown_rejects_new_work() {
        let (mut scheduler, compositor, _) = setup(4, 4);

        scheduler.shutdown();
        scheduler.shutdown();

        let generation = compositor.begin_generation(BufferTarget::Current);
        let result = scheduler.submit(
            job(generation, 4, 4, BufferTarget::Current),
            vec![Tile::full_frame(4, 4).unwrap()],
        );
        assert!(matches!(result, Err(EngineError::ShutDown)));
        assert!(scheduler.is_shut_down());
    }

    #[test]
    fn test_panic_message_extracts_text() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");

        let payload: Box<dyn Any + Send> = Box::new(5_u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
