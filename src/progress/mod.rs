mod bar;
mod tracker;

pub use bar::ScanProgress;
pub use tracker::{NoProgress, ProgressHandle, ProgressObserver, ProgressTracker, ProgressVisitor};
