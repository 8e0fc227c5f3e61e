//! Parallel strip extraction.
//!
//! [`extract_slices`] fans the sampler out over a dedicated, fixed-size
//! [`rayon`] pool. Each worker opens and decodes its own frame file, so
//! there is no shared mutable state between workers beyond the progress
//! tracker. Every result carries its frame index; the order of the returned
//! vector is not part of the contract and the assembler re-sorts it.

use std::io::Error as IoError;
use std::path::PathBuf;
use std::sync::Mutex;

use rayon::ThreadPoolBuilder;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::configuration::StripOptions;
use crate::enumerate::FrameSequence;
use crate::error::StripError;
use crate::frame::FrameHandle;
use crate::progress::{OperationType, ProgressTracker};
use crate::sample::{self, SampleSpec, StripSlice};

/// Sample every frame of `sequence` on a pool of `options.workers()` threads.
///
/// Returns one slice per frame. The first failing frame aborts the run:
/// workers stop picking up new frames and its error is returned, so a
/// partial slice set never reaches the assembler.
///
/// # Errors
///
/// - [`StripError::FrameDecodeFailure`] if a frame cannot be opened or
///   decoded.
/// - [`StripError::InvalidSampleGeometry`] if the strip does not fit a
///   frame.
/// - [`StripError::Cancelled`] if the options' token is cancelled.
pub fn extract_slices(
    sequence: &FrameSequence,
    spec: &SampleSpec,
    options: &StripOptions,
) -> Result<Vec<StripSlice>, StripError> {
    if sequence.is_empty() {
        return Ok(Vec::new());
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(options.workers)
        .thread_name(|index| format!("framestrip-sampler-{index}"))
        .build()
        .map_err(|error| StripError::IoError(IoError::other(error)))?;

    log::debug!(
        "Sampling {} frame(s) with {} worker(s)",
        sequence.count(),
        options.workers
    );

    let tracker = Mutex::new(ProgressTracker::new(
        options.progress.clone(),
        OperationType::Sampling,
        Some(u64::from(sequence.count())),
        options.batch_size,
    ));

    let work: Vec<(u32, PathBuf)> = sequence.iter().collect();
    let slices: Result<Vec<StripSlice>, StripError> = pool.install(|| {
        work.into_par_iter()
            .map(|(index, path)| {
                if options.is_cancelled() {
                    return Err(StripError::Cancelled);
                }
                let slice = sample_frame(index, path, spec)?;
                if let Ok(mut tracker) = tracker.lock() {
                    tracker.advance(Some(index));
                }
                Ok(slice)
            })
            .collect()
    });

    if let Ok(mut tracker) = tracker.into_inner() {
        tracker.finish();
    }

    slices
}

/// Decode one frame and crop its strip. The frame is dropped on return.
fn sample_frame(index: u32, path: PathBuf, spec: &SampleSpec) -> Result<StripSlice, StripError> {
    let frame = FrameHandle::open(index, &path)?;
    let slice = sample::extract(&frame, spec)?;
    log::trace!(
        "Sampled frame {index}: {}x{} slice",
        slice.width(),
        slice.height()
    );
    Ok(slice)
}
