//! Run configuration.
//!
//! [`StripOptions`] is a builder that threads progress callbacks,
//! cancellation tokens, and pool sizing through the pipeline without
//! polluting every function signature. What to sample lives in
//! [`SampleSpec`](crate::SampleSpec); how to run lives here.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use framestrip::{CancellationToken, ProgressCallback, ProgressInfo, StripOptions};
//!
//! struct LogProgress;
//! impl ProgressCallback for LogProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("{:?}: {} done", info.operation, info.current);
//!     }
//! }
//!
//! let token = CancellationToken::new();
//! let options = StripOptions::new()
//!     .with_progress(Arc::new(LogProgress))
//!     .with_cancellation(token.clone())
//!     .with_workers(4)
//!     .with_batch_size(10);
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::progress::{CancellationToken, NoOpProgress, ProgressCallback};

/// Number of sampling workers used when none is configured.
pub const DEFAULT_WORKERS: usize = 8;

/// Operational settings for a strip run.
///
/// All fields have sensible defaults: no progress, no cancellation, eight
/// workers, a progress report after every frame.
#[derive(Clone)]
pub struct StripOptions {
    /// Progress callback. Defaults to a no-op.
    pub(crate) progress: Arc<dyn ProgressCallback>,
    /// Cancellation token. `None` means never cancelled.
    pub(crate) cancellation: Option<CancellationToken>,
    /// How often to fire the progress callback (every N frames).
    pub(crate) batch_size: u64,
    /// Size of the sampling pool. Independent of the frame count.
    pub(crate) workers: usize,
}

impl Debug for StripOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("StripOptions")
            .field("has_cancellation", &self.cancellation.is_some())
            .field("batch_size", &self.batch_size)
            .field("workers", &self.workers)
            .finish()
    }
}

impl Default for StripOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl StripOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self {
            progress: Arc::new(NoOpProgress),
            cancellation: None,
            batch_size: 1,
            workers: DEFAULT_WORKERS,
        }
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Attach a cancellation token.
    ///
    /// When the token is cancelled, the sampling pool stops picking up new
    /// frames and the run returns [`StripError::Cancelled`](crate::StripError::Cancelled).
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Set how often the progress callback fires. Clamped to a minimum of 1.
    #[must_use]
    pub fn with_batch_size(mut self, size: u64) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Set the number of sampling workers. Clamped to a minimum of 1.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Number of sampling workers this run will use.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Returns `true` if cancellation has been requested.
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}
