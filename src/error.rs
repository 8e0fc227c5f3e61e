//! Error types for the `framestrip` crate.
//!
//! This module defines [`StripError`], the unified error type returned by all
//! fallible operations in the crate. Errors carry enough context (frame
//! index, file path, upstream cause) to diagnose a failed run without
//! additional logging at the call site.

use std::{io::Error as IoError, path::PathBuf};

use thiserror::Error;

/// The unified error type for all `framestrip` operations.
///
/// Every public function that can fail returns `Result<T, StripError>`.
/// All variants are fatal to the run that produced them.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StripError {
    /// The frame directory holds no usable frame (frame 1 is missing).
    #[error("No frames available in {directory} matching {pattern}")]
    NoFramesAvailable {
        /// Directory that was scanned.
        directory: PathBuf,
        /// Filename pattern that was searched.
        pattern: String,
    },

    /// A frame file could not be opened or decoded.
    #[error("Failed to decode frame {frame_index} at {path}: {reason}")]
    FrameDecodeFailure {
        /// 1-based index of the offending frame.
        frame_index: u32,
        /// Path of the frame file.
        path: PathBuf,
        /// Underlying reason the decode failed.
        reason: String,
    },

    /// The sample rectangle does not fit the frame, or frame sizes differ
    /// within one run.
    #[error("Invalid sample geometry for frame {frame_index} ({width}x{height}): {reason}")]
    InvalidSampleGeometry {
        /// 1-based index of the offending frame.
        frame_index: u32,
        /// Width of the offending frame, or of its slice when raised by the
        /// assembler.
        width: u32,
        /// Height of the offending frame, or of its slice when raised by the
        /// assembler.
        height: u32,
        /// What was wrong with the geometry.
        reason: String,
    },

    /// The assembler received a slice set that is not exactly `1..=K`.
    #[error("Slice for frame {frame_index} is missing or duplicated")]
    MissingSlice {
        /// The first index at which the sequence broke.
        frame_index: u32,
    },

    /// The composite could not be written.
    #[error("Failed to write output image at {path}: {reason}")]
    PersistenceFailure {
        /// Requested output path.
        path: PathBuf,
        /// Underlying reason the write failed.
        reason: String,
    },

    /// Sample location or size is out of range.
    #[error("Invalid sample specification: {0}")]
    InvalidSampleSpec(String),

    /// The frame filename pattern has no (or more than one) index placeholder.
    #[error("Invalid frame pattern: {0}")]
    InvalidFramePattern(String),

    /// The frame source could not produce frames.
    #[error("Frame extraction from {video} failed: {reason}")]
    FrameSourceFailed {
        /// Source video passed to the frame source.
        video: PathBuf,
        /// Underlying reason, including the tail of the tool's stderr.
        reason: String,
    },

    /// The operation was cancelled via a [`CancellationToken`](crate::CancellationToken).
    #[error("Operation cancelled")]
    Cancelled,

    /// An I/O error occurred while preparing the scratch directory.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),
}

