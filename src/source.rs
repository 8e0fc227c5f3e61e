//! Frame sources.
//!
//! A [`FrameSource`] turns a video into a dense, 1-based sequence of frame
//! image files named by a [`FramePattern`]. The strip pipeline only relies
//! on that contract: files exist, each one decodes, numbering is contiguous
//! from 1.
//!
//! [`FfmpegCommand`] runs the `ffmpeg` binary. With the `ffmpeg` cargo
//! feature, [`FfmpegDecoder`](crate::FfmpegDecoder) decodes in-process
//! instead.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use crate::enumerate::FramePattern;
use crate::error::StripError;

/// Start used when none is given: the beginning of the video.
pub const DEFAULT_START: &str = "0:0:0";

/// The portion of the video to turn into frames.
///
/// Bounds are kept as the caller wrote them (e.g. `"0:01:30"` or `"90.5"`)
/// and handed to the frame source unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    /// Start time.
    pub start: String,
    /// End time. `None` runs to the end of the video.
    pub end: Option<String>,
}

impl TimeRange {
    /// A range from `start` to the end of the video.
    pub fn starting_at(start: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: None,
        }
    }

    /// A range from `start` to `end`.
    pub fn between(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: Some(end.into()),
        }
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::starting_at(DEFAULT_START)
    }
}

/// Produces numbered frame files from a video.
pub trait FrameSource {
    /// Write frames `1..=K` of `range` into `directory`, named by `pattern`.
    ///
    /// # Errors
    ///
    /// Implementations return [`StripError::FrameSourceFailed`] when the
    /// video cannot be decoded.
    fn produce_frames(
        &self,
        video: &Path,
        directory: &Path,
        pattern: &FramePattern,
        range: &TimeRange,
    ) -> Result<(), StripError>;
}

/// Lines of `ffmpeg` stderr kept in error messages.
const STDERR_TAIL_LINES: usize = 5;

/// Extracts frames by running the `ffmpeg` command-line tool.
///
/// The frame pattern is passed straight through as ffmpeg's image sequence
/// output, which numbers frames from 1.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    program: PathBuf,
}

impl FfmpegCommand {
    /// Use the `ffmpeg` found on `PATH`.
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
        }
    }

    /// Use a specific `ffmpeg` executable.
    #[must_use]
    pub fn with_program<P: Into<PathBuf>>(mut self, program: P) -> Self {
        self.program = program.into();
        self
    }

    /// Build the command line without running it.
    pub fn build_command(
        &self,
        video: &Path,
        directory: &Path,
        pattern: &FramePattern,
        range: &TimeRange,
    ) -> Command {
        let mut arguments: Vec<OsString> = vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-y".into(),
            "-i".into(),
            video.as_os_str().to_owned(),
            "-ss".into(),
            range.start.clone().into(),
        ];
        if let Some(end) = &range.end {
            arguments.push("-to".into());
            arguments.push(end.clone().into());
        }
        arguments.push(directory.join(pattern.as_str()).into_os_string());

        let mut command = Command::new(&self.program);
        command
            .args(arguments)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        command
    }
}

impl Default for FfmpegCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for FfmpegCommand {
    fn produce_frames(
        &self,
        video: &Path,
        directory: &Path,
        pattern: &FramePattern,
        range: &TimeRange,
    ) -> Result<(), StripError> {
        let failed = |reason: String| StripError::FrameSourceFailed {
            video: video.to_path_buf(),
            reason,
        };

        log::info!(
            "Extracting frames from {} ({} to {})",
            video.display(),
            range.start,
            range.end.as_deref().unwrap_or("end")
        );

        let output = self
            .build_command(video, directory, pattern, range)
            .output()
            .map_err(|error| failed(format!("could not run {}: {error}", self.program.display())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let lines: Vec<&str> = stderr.lines().collect();
            let tail = lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n");
            return Err(failed(format!(
                "{} exited with {}: {tail}",
                self.program.display(),
                output.status
            )));
        }

        Ok(())
    }
}

/// Parse an ffmpeg-style time: plain seconds (`"90.5"`), `MM:SS` or
/// `HH:MM:SS[.frac]`.
///
/// Returns `None` for anything else, including negative values.
pub fn parse_timecode(value: &str) -> Option<Duration> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parts: Vec<&str> = trimmed.split(':').collect();
    if parts.len() > 3 {
        return None;
    }

    let (seconds_part, whole_parts) = parts.split_last()?;
    let seconds = seconds_part.parse::<f64>().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }

    let mut total = seconds;
    for (position, part) in whole_parts.iter().rev().enumerate() {
        let value = part.parse::<u64>().ok()?;
        total += value as f64 * 60_f64.powi(position as i32 + 1);
    }

    Duration::try_from_secs_f64(total).ok()
}
