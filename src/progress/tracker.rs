use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::error::ItemError;
use crate::scanner::{WalkEntry, WalkVisitor};

/// Subscriber notified each time the processed count changes.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, processed: u64, total: u64);
}

impl<F> ProgressObserver for F
where
    F: Fn(u64, u64) + Send + Sync,
{
    fn on_progress(&self, processed: u64, total: u64) {
        self(processed, total);
    }
}

/// Observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&self, _processed: u64, _total: u64) {}
}

#[derive(Debug, Default)]
struct ProgressState {
    total: AtomicU64,
    processed: AtomicU64,
    finished: AtomicBool,
}

/// Read side of a run's progress, safe to poll from any thread.
///
/// Only the scan worker writes; clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct ProgressHandle {
    state: Arc<ProgressState>,
}

impl ProgressHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `(processed, total)` at the time of the call.
    #[must_use]
    pub fn snapshot(&self) -> (u64, u64) {
        (self.processed(), self.total())
    }

    #[must_use]
    pub fn processed(&self) -> u64 {
        self.state.processed.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.state.total.load(Ordering::Acquire)
    }

    /// True once the run finished successfully and `processed == total`.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state.finished.load(Ordering::Acquire)
    }
}

/// Write side of [`ProgressHandle`], owned by the scan worker.
pub struct ProgressTracker<'a> {
    handle: ProgressHandle,
    observer: &'a dyn ProgressObserver,
}

impl<'a> ProgressTracker<'a> {
    #[must_use]
    pub fn new(handle: ProgressHandle, observer: &'a dyn ProgressObserver) -> Self {
        Self { handle, observer }
    }

    /// Fix the total for this run and reset the processed count.
    pub fn start(&self, total: u64) {
        let state = &self.handle.state;
        state.finished.store(false, Ordering::Release);
        state.processed.store(0, Ordering::Release);
        state.total.store(total, Ordering::Release);
        self.observer.on_progress(0, total);
    }

    /// Count one more item. Never moves past the total.
    pub fn advance(&self) {
        let state = &self.handle.state;
        let total = state.total.load(Ordering::Acquire);
        let processed = state.processed.load(Ordering::Acquire);
        if processed >= total {
            return;
        }
        state.processed.store(processed + 1, Ordering::Release);
        self.observer.on_progress(processed + 1, total);
    }

    /// Mark the run finished; `processed` snaps to `total`.
    pub fn complete(&self) {
        let state = &self.handle.state;
        let total = state.total.load(Ordering::Acquire);
        state.processed.store(total, Ordering::Release);
        state.finished.store(true, Ordering::Release);
        self.observer.on_progress(total, total);
    }

    #[must_use]
    pub const fn handle(&self) -> &ProgressHandle {
        &self.handle
    }
}

/// Advances a tracker once per visited directory or file, after the inner
/// visitor has handled it.
pub struct ProgressVisitor<'t, 'o, V> {
    inner: V,
    tracker: &'t ProgressTracker<'o>,
}

impl<'t, 'o, V: WalkVisitor> ProgressVisitor<'t, 'o, V> {
    pub const fn new(inner: V, tracker: &'t ProgressTracker<'o>) -> Self {
        Self { inner, tracker }
    }

    pub fn into_inner(self) -> V {
        self.inner
    }
}

impl<V: WalkVisitor> WalkVisitor for ProgressVisitor<'_, '_, V> {
    fn visit_dir(&mut self, entry: &WalkEntry) {
        self.inner.visit_dir(entry);
        self.tracker.advance();
    }

    fn visit_file(&mut self, entry: &WalkEntry) {
        self.inner.visit_file(entry);
        self.tracker.advance();
    }

    fn visit_error(&mut self, error: &ItemError, depth: usize) {
        self.inner.visit_error(error, depth);
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
