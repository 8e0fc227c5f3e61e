//! # framestrip
//!
//! Sample a strip of pixels from every frame of a video and assemble the
//! strips, in capture order, into one timeline image.
//!
//! A run decodes the video into numbered frame files, finds the contiguous
//! run of frames `1..=K`, crops one strip from each frame on a worker pool,
//! and pastes the strips side by side (columns) or top to bottom (rows).
//! Workers finish in any order; the assembler puts the slices back in frame
//! order before compositing.
//!
//! ## Quick Start
//!
//! ### Strip a Video
//!
//! ```no_run
//! use framestrip::{FfmpegCommand, SampleAxis, SampleSpec, StripPipeline, TimeRange};
//!
//! let spec = SampleSpec::new(0.5, 1, SampleAxis::Column)?;
//! StripPipeline::new(spec, "scratch")
//!     .with_frame_source(FfmpegCommand::new(), "input.mp4", TimeRange::default())
//!     .run("strip.png")?;
//! # Ok::<(), framestrip::StripError>(())
//! ```
//!
//! ### Reuse Extracted Frames
//!
//! ```no_run
//! use framestrip::{OverflowPolicy, SampleAxis, SampleSpec, StripPipeline};
//!
//! let spec = SampleSpec::new(0.25, 4, SampleAxis::Row)?.with_overflow(OverflowPolicy::Clamp);
//! let report = StripPipeline::new(spec, "scratch").run("rows.png")?;
//! println!("{} frames", report.frame_count);
//! # Ok::<(), framestrip::StripError>(())
//! ```
//!
//! ### Drive the Stages Directly
//!
//! ```no_run
//! use framestrip::{
//!     FramePattern, SampleAxis, SampleSpec, StripOptions, assemble, enumerate_frames,
//!     extract_slices,
//! };
//!
//! let spec = SampleSpec::new(0.5, 2, SampleAxis::Column)?;
//! let frames = enumerate_frames("scratch", &FramePattern::default());
//! let slices = extract_slices(&frames, &spec, &StripOptions::new().with_workers(4))?;
//! assemble(slices, &spec)?.save("strip.png")?;
//! # Ok::<(), framestrip::StripError>(())
//! ```
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `ffmpeg` | `FfmpegDecoder`: decode in-process via `ffmpeg-next` instead of running the `ffmpeg` binary |
//!
//! ## Requirements
//!
//! [`FfmpegCommand`] needs the `ffmpeg` executable on `PATH`. The `ffmpeg`
//! feature needs the FFmpeg development libraries instead.

pub mod assemble;
pub mod configuration;
pub mod enumerate;
pub mod error;
#[cfg(feature = "ffmpeg")]
pub mod ffmpeg;
pub mod frame;
mod output;
pub mod pipeline;
pub mod pool;
pub mod progress;
pub mod sample;
pub mod scratch;
pub mod source;
pub mod validation;

pub use assemble::{CompositeStrip, assemble};
pub use configuration::{DEFAULT_WORKERS, StripOptions};
pub use enumerate::{DEFAULT_FRAME_PATTERN, FramePattern, FrameSequence, enumerate_frames};
pub use error::StripError;
#[cfg(feature = "ffmpeg")]
pub use ffmpeg::FfmpegDecoder;
pub use frame::FrameHandle;
pub use pipeline::{PipelineState, StripPipeline, StripReport};
pub use pool::extract_slices;
pub use progress::{CancellationToken, OperationType, ProgressCallback, ProgressInfo};
pub use sample::{OverflowPolicy, SampleAxis, SampleRect, SampleSpec, StripSlice, extract};
pub use source::{DEFAULT_START, FfmpegCommand, FrameSource, TimeRange, parse_timecode};
pub use validation::{InspectionReport, inspect_frames};
