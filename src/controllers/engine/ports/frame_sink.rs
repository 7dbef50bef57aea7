use crate::controllers::engine::events::render_event::RenderEvent;

/// Receives frame-ready notifications.
///
/// Called from worker threads, in generation order, while the compositor's
/// write lock is held: implementations should hand the event off quickly
/// and must not call back into the engine.
pub trait FrameSink: Send + Sync {
    fn submit(&self, event: RenderEvent);
}

impl<F> FrameSink for F
where
    F: Fn(RenderEvent) + Send + Sync,
{
    fn submit(&self, event: RenderEvent) {
        self(event)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardSink;

impl FrameSink for DiscardSink {
    fn submit(&self, _: RenderEvent) {}
}
