use crate::controllers::engine::data::frame_data::{FrameData, RenderFault, TileData};
use crate::controllers::engine::events::render_event::RenderEvent;
use crate::controllers::engine::ports::frame_sink::FrameSink;
use crate::core::data::frame_buffer::{FrameBuffer, FrameBufferError};
use crate::core::data::tile::Tile;
use log::{debug, trace};
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Which buffer a generation writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferTarget {
    /// Composed straight into the displayed frame, tile by tile.
    Current,
    /// Rendered off-screen and swapped in once the generation completes.
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// A newer generation exists; nothing was touched.
    Discarded,
}

struct CompositorState {
    current: Arc<FrameBuffer>,
    next: FrameBuffer,
    sink: Arc<dyn FrameSink>,
}

/// Owns the displayed and off-screen frames and decides which writes land.
///
/// Generations are issued under the same lock that guards every write, so a
/// task that checks its generation and writes does so atomically with
/// respect to newer generations being issued.
pub struct Compositor {
    state: Mutex<CompositorState>,
    latest_generation: AtomicU64,
    last_completed_generation: AtomicU64,
}

impl Compositor {
    pub fn new(width: u32, height: u32, sink: Arc<dyn FrameSink>) -> Result<Self, FrameBufferError> {
        let current = FrameBuffer::new(width, height)?;
        let next = current.clone();

        Ok(Self {
            state: Mutex::new(CompositorState {
                current: Arc::new(current),
                next,
                sink,
            }),
            latest_generation: AtomicU64::new(0),
            last_completed_generation: AtomicU64::new(0),
        })
    }

    #[must_use]
    pub fn latest_generation(&self) -> u64 {
        self.latest_generation.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn last_completed_generation(&self) -> u64 {
        self.last_completed_generation.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.latest_generation() == generation
    }

    /// A snapshot of the displayed frame. Later writes never alter it.
    #[must_use]
    pub fn current_frame(&self) -> Arc<FrameBuffer> {
        Arc::clone(&self.lock().current)
    }

    pub fn set_sink(&self, sink: Arc<dyn FrameSink>) {
        self.lock().sink = sink;
    }

    /// Issues a new generation, superseding every earlier one.
    ///
    /// For [`BufferTarget::Next`] the off-screen frame starts as a copy of
    /// the displayed one, so regions whose task fails keep showing what was
    /// on screen.
    pub fn begin_generation(&self, target: BufferTarget) -> u64 {
        let mut state = self.lock();
        let generation = self.latest_generation.fetch_add(1, Ordering::AcqRel) + 1;

        if target == BufferTarget::Next {
            let CompositorState { current, next, .. } = &mut *state;
            next.copy_from(current);
        }

        debug!("issued generation {generation} ({target:?})");
        generation
    }

    /// Reallocates both frames and supersedes everything in flight.
    pub fn resize(&self, width: u32, height: u32) -> Result<u64, FrameBufferError> {
        let current = FrameBuffer::new(width, height)?;
        let mut state = self.lock();
        let generation = self.latest_generation.fetch_add(1, Ordering::AcqRel) + 1;

        state.next = current.clone();
        state.current = Arc::new(current);

        debug!("resized to {width}x{height}, generation {generation}");
        Ok(generation)
    }

    /// Blits `pixels` into the target frame if `generation` is still the
    /// latest. With `notify` set, a tile written into the displayed frame is
    /// also reported to the sink.
    pub fn write_tile(
        &self,
        generation: u64,
        target: BufferTarget,
        tile: Tile,
        pixels: &[u8],
        notify: bool,
    ) -> Result<WriteOutcome, FrameBufferError> {
        let mut state = self.lock();

        if !self.is_current(generation) {
            trace!("discarding {tile:?} from stale generation {generation}");
            return Ok(WriteOutcome::Discarded);
        }

        match target {
            BufferTarget::Current => Arc::make_mut(&mut state.current).blit(tile, pixels)?,
            BufferTarget::Next => state.next.blit(tile, pixels)?,
        }

        trace!("generation {generation} wrote {tile:?}");

        if notify && target == BufferTarget::Current {
            state.sink.submit(RenderEvent::Tile(TileData {
                generation,
                tile,
                pixels: pixels.to_vec(),
            }));
        }

        Ok(WriteOutcome::Written)
    }

    /// Reports a failed task if its generation is still the latest.
    pub fn report_fault(&self, generation: u64, tile: Tile, message: String) {
        let state = self.lock();

        if self.is_current(generation) {
            state.sink.submit(RenderEvent::Fault(RenderFault {
                generation,
                tile,
                message,
            }));
        }
    }

    /// Called once every task of `generation` has finished. Swaps the
    /// off-screen frame in for [`BufferTarget::Next`] and notifies the sink.
    ///
    /// Returns `false` without touching anything when the generation is stale.
    pub fn complete_generation(
        &self,
        generation: u64,
        target: BufferTarget,
        render_duration: Duration,
        faults: usize,
    ) -> bool {
        let mut state = self.lock();

        if !self.is_current(generation) {
            trace!("generation {generation} finished after being superseded");
            return false;
        }

        if target == BufferTarget::Next {
            let finished = Arc::new(mem::take(&mut state.next));
            let previous = mem::replace(&mut state.current, finished);
            // Reuse the old allocation when no reader still holds it.
            state.next = Arc::try_unwrap(previous).unwrap_or_default();
        }

        self.last_completed_generation
            .store(generation, Ordering::Release);

        debug!(
            "generation {generation} complete in {:.2?} with {faults} fault(s)",
            render_duration
        );

        state.sink.submit(RenderEvent::Frame(FrameData {
            generation,
            frame: Arc::clone(&state.current),
            render_duration,
            faults,
        }));

        true
    }

    fn lock(&self) -> MutexGuard<'_, CompositorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
