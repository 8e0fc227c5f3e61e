//! The strip pipeline.
//!
//! [`StripPipeline`] drives one run from video (or an existing frame
//! directory) to a saved composite:
//!
//! ```text
//! Init -> Extracting (optional) -> Enumerating -> Sampling -> Assembling -> Persisting -> Done
//! ```
//!
//! Any failing step moves the pipeline straight to
//! [`PipelineState::Failed`]. Nothing is retried, no output file is written,
//! and the frame directory is left as it was for inspection.
//!
//! # Example
//!
//! ```no_run
//! use framestrip::{FfmpegCommand, SampleAxis, SampleSpec, StripPipeline, TimeRange};
//!
//! let spec = SampleSpec::new(0.5, 1, SampleAxis::Column)?;
//! let mut pipeline = StripPipeline::new(spec, "scratch").with_frame_source(
//!     FfmpegCommand::new(),
//!     "input.mp4",
//!     TimeRange::between("0:00:10", "0:00:20"),
//! );
//! let report = pipeline.run("strip.png")?;
//! println!("{} frames -> {}x{}", report.frame_count, report.width, report.height);
//! # Ok::<(), framestrip::StripError>(())
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::assemble::assemble;
use crate::configuration::StripOptions;
use crate::enumerate::{FramePattern, enumerate_frames};
use crate::error::StripError;
use crate::pool::extract_slices;
use crate::progress::{OperationType, ProgressTracker};
use crate::sample::SampleSpec;
use crate::scratch;
use crate::source::{FrameSource, TimeRange};

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Not started.
    Init,
    /// Running the frame source.
    Extracting,
    /// Looking for frame files.
    Enumerating,
    /// Cropping slices on the worker pool.
    Sampling,
    /// Compositing slices.
    Assembling,
    /// Writing the output file.
    Persisting,
    /// Finished; the output file exists.
    Done,
    /// A step failed. Terminal for this run.
    Failed,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct StripReport {
    /// Frames sampled, `K`.
    pub frame_count: u32,
    /// Composite width in pixels.
    pub width: u32,
    /// Composite height in pixels.
    pub height: u32,
    /// Path the composite was written to.
    pub output: PathBuf,
    /// Wall-clock time of the whole run.
    pub elapsed: Duration,
}

/// What to decode before sampling, when frames are not already on disk.
struct Extraction {
    source: Box<dyn FrameSource>,
    video: PathBuf,
    range: TimeRange,
}

/// Sequences extraction, enumeration, sampling, assembly, and persistence.
pub struct StripPipeline {
    spec: SampleSpec,
    frame_directory: PathBuf,
    pattern: FramePattern,
    options: StripOptions,
    extraction: Option<Extraction>,
    state: PipelineState,
}

impl Debug for StripPipeline {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("StripPipeline")
            .field("spec", &self.spec)
            .field("frame_directory", &self.frame_directory)
            .field("pattern", &self.pattern)
            .field("options", &self.options)
            .field("extracts", &self.extraction.is_some())
            .field("state", &self.state)
            .finish()
    }
}

impl StripPipeline {
    /// Sample frames already present in `frame_directory`.
    ///
    /// Add a frame source with
    /// [`with_frame_source`](StripPipeline::with_frame_source) to decode a
    /// video first.
    pub fn new<P: Into<PathBuf>>(spec: SampleSpec, frame_directory: P) -> Self {
        Self {
            spec,
            frame_directory: frame_directory.into(),
            pattern: FramePattern::default(),
            options: StripOptions::default(),
            extraction: None,
            state: PipelineState::Init,
        }
    }

    /// Set the frame filename pattern. Defaults to `frame_%d.png`.
    #[must_use]
    pub fn with_pattern(mut self, pattern: FramePattern) -> Self {
        self.pattern = pattern;
        self
    }

    /// Set progress, cancellation, and pool options.
    #[must_use]
    pub fn with_options(mut self, options: StripOptions) -> Self {
        self.options = options;
        self
    }

    /// Decode `range` of `video` into the frame directory before sampling.
    ///
    /// Stale frames matching the pattern are cleared first.
    #[must_use]
    pub fn with_frame_source<S, P>(mut self, source: S, video: P, range: TimeRange) -> Self
    where
        S: FrameSource + 'static,
        P: Into<PathBuf>,
    {
        self.extraction = Some(Extraction {
            source: Box::new(source),
            video: video.into(),
            range,
        });
        self
    }

    /// The state the last run reached.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Run the pipeline and write the composite to `output`.
    ///
    /// Each call is an independent run starting from
    /// [`PipelineState::Init`]. An existing file at `output` is replaced.
    ///
    /// # Errors
    ///
    /// Returns the first error of any step; see [`StripError`].
    pub fn run<P: AsRef<Path>>(&mut self, output: P) -> Result<StripReport, StripError> {
        let output = output.as_ref();
        let started = Instant::now();
        self.state = PipelineState::Init;

        match self.execute(output, started) {
            Ok(report) => {
                self.transition(PipelineState::Done);
                log::info!(
                    "Wrote {}x{} strip of {} frame(s) to {} in {:.2?}",
                    report.width,
                    report.height,
                    report.frame_count,
                    report.output.display(),
                    report.elapsed
                );
                Ok(report)
            }
            Err(error) => {
                log::error!("Strip run failed while {:?}: {error}", self.state);
                self.transition(PipelineState::Failed);
                Err(error)
            }
        }
    }

    fn execute(&mut self, output: &Path, started: Instant) -> Result<StripReport, StripError> {
        if self.extraction.is_some() {
            self.transition(PipelineState::Extracting);
        }
        if let Some(extraction) = &self.extraction {
            scratch::ensure_dir(&self.frame_directory)?;
            scratch::clear_frames(&self.frame_directory, &self.pattern)?;
            extraction.source.produce_frames(
                &extraction.video,
                &self.frame_directory,
                &self.pattern,
                &extraction.range,
            )?;
            ProgressTracker::new(
                self.options.progress.clone(),
                OperationType::FrameExtraction,
                None,
                1,
            )
            .complete();
        }

        self.transition(PipelineState::Enumerating);
        let sequence = enumerate_frames(&self.frame_directory, &self.pattern);
        if sequence.is_empty() {
            return Err(StripError::NoFramesAvailable {
                directory: self.frame_directory.clone(),
                pattern: self.pattern.to_string(),
            });
        }

        self.transition(PipelineState::Sampling);
        let slices = extract_slices(&sequence, &self.spec, &self.options)?;

        self.transition(PipelineState::Assembling);
        let composite = assemble(slices, &self.spec)?;
        ProgressTracker::new(
            self.options.progress.clone(),
            OperationType::Assembly,
            Some(u64::from(composite.frame_count())),
            1,
        )
        .complete();

        self.transition(PipelineState::Persisting);
        composite.save(output)?;

        Ok(StripReport {
            frame_count: composite.frame_count(),
            width: composite.width(),
            height: composite.height(),
            output: output.to_path_buf(),
            elapsed: started.elapsed(),
        })
    }

    fn transition(&mut self, next: PipelineState) {
        log::debug!("Pipeline {:?} -> {next:?}", self.state);
        self.state = next;
    }
}
