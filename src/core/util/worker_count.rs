use std::num::NonZeroUsize;

/// Number of hardware threads, falling back to one when it cannot be queried.
#[must_use]
pub fn available_workers() -> NonZeroUsize {
    std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}

/// Resolves a requested worker count, where zero means "one per hardware thread".
#[must_use]
pub fn resolve_worker_count(requested: usize) -> NonZeroUsize {
    NonZeroUsize::new(requested).unwrap_or_else(available_workers)
}
