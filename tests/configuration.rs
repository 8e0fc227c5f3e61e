//! Run configuration tests.

use std::sync::Arc;

use framestrip::{
    CancellationToken, DEFAULT_WORKERS, ProgressCallback, ProgressInfo, StripOptions,
};

struct NullProgress;

impl ProgressCallback for NullProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

#[test]
fn default_options() {
    let options = StripOptions::default();
    assert_eq!(options.workers(), DEFAULT_WORKERS);
    assert_eq!(DEFAULT_WORKERS, 8);
}

#[test]
fn workers_are_clamped() {
    assert_eq!(StripOptions::new().with_workers(0).workers(), 1);
    assert_eq!(StripOptions::new().with_workers(3).workers(), 3);
}

#[test]
fn builder_chain() {
    let options = StripOptions::new()
        .with_progress(Arc::new(NullProgress))
        .with_cancellation(CancellationToken::new())
        .with_batch_size(0)
        .with_workers(2);

    let debug = format!("{options:?}");
    assert!(debug.contains("has_cancellation: true"));
    assert!(debug.contains("batch_size: 1"));
    assert!(debug.contains("workers: 2"));
}

#[test]
fn options_clone() {
    let options = StripOptions::new().with_workers(5);
    let copy = options.clone();
    assert_eq!(copy.workers(), 5);
}
