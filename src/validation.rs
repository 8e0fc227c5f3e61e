//! Frame directory inspection.
//!
//! [`inspect_frames`] looks at a scratch directory the way a strip run
//! would, reading only image headers, and reports anything that would make
//! the run fail or silently drop frames.
//!
//! # Example
//!
//! ```no_run
//! use framestrip::{FramePattern, inspect_frames};
//!
//! let report = inspect_frames("scratch", &FramePattern::default(), None);
//! if report.is_valid() {
//!     println!("{} frames ready", report.frame_count);
//! } else {
//!     print!("{report}");
//! }
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::fs;
use std::path::Path;

use crate::enumerate::{FramePattern, enumerate_frames};
use crate::sample::SampleSpec;

/// Summary of a frame directory inspection.
#[derive(Debug, Clone, Default)]
pub struct InspectionReport {
    /// Number of contiguous frames a run would use.
    pub frame_count: u32,
    /// Size shared by the frames, when they all share one.
    pub frame_size: Option<(u32, u32)>,
    /// Informational notices (not problems).
    pub info: Vec<String>,
    /// Issues that do not stop a run but change its result.
    pub warnings: Vec<String>,
    /// Issues that will make a run fail.
    pub errors: Vec<String>,
}

impl InspectionReport {
    /// Returns `true` if no errors were found.
    ///
    /// Warnings do not affect this result.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of entries (info + warnings + errors).
    pub fn issue_count(&self) -> usize {
        self.info.len() + self.warnings.len() + self.errors.len()
    }
}

impl Display for InspectionReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for item in &self.info {
            writeln!(f, "[INFO] {item}")?;
        }
        for item in &self.warnings {
            writeln!(f, "[WARN] {item}")?;
        }
        for item in &self.errors {
            writeln!(f, "[ERROR] {item}")?;
        }
        if self.issue_count() == 0 {
            writeln!(f, "No issues found.")?;
        }
        Ok(())
    }
}

/// Inspect the frames in `directory` named by `pattern`.
///
/// When `spec` is given, also checks that its strip fits the frame size.
pub fn inspect_frames<P: AsRef<Path>>(
    directory: P,
    pattern: &FramePattern,
    spec: Option<&SampleSpec>,
) -> InspectionReport {
    let directory = directory.as_ref();
    let mut report = InspectionReport::default();

    if !directory.is_dir() {
        report
            .errors
            .push(format!("Directory {} does not exist", directory.display()));
        return report;
    }

    let sequence = enumerate_frames(directory, pattern);
    report.frame_count = sequence.count();

    if sequence.is_empty() {
        report.errors.push(format!(
            "No frames matching {pattern} in {}",
            directory.display()
        ));
    } else {
        report
            .info
            .push(format!("{} contiguous frame(s)", sequence.count()));
    }

    // ── Frames past the first gap ──────────────────────────────────
    let stranded = fs::read_dir(directory)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter_map(|entry| entry.file_name().to_str().and_then(|n| pattern.index_of(n)))
                .filter(|&index| index > sequence.count() + 1)
                .count()
        })
        .unwrap_or(0);
    if stranded > 0 {
        report.warnings.push(format!(
            "Frame {} is missing; {stranded} later frame file(s) will be ignored",
            sequence.count() + 1
        ));
    }

    // ── Frame sizes ────────────────────────────────────────────────
    let mut frame_size: Option<(u32, u32)> = None;
    let mut uniform = true;
    for (index, path) in sequence.iter() {
        match image::image_dimensions(&path) {
            Ok(size) => match frame_size {
                None => frame_size = Some(size),
                Some(first) if first != size && uniform => {
                    uniform = false;
                    report.errors.push(format!(
                        "Frame {index} is {}x{} but frame 1 is {}x{}",
                        size.0, size.1, first.0, first.1
                    ));
                }
                Some(_) => {}
            },
            Err(error) => {
                report
                    .errors
                    .push(format!("Frame {index} cannot be read: {error}"));
            }
        }
    }

    if let (Some((width, height)), true) = (frame_size, uniform) {
        report.frame_size = Some((width, height));
        report.info.push(format!("Frame size: {width}x{height}"));

        // ── Sample geometry ────────────────────────────────────────
        if let Some(spec) = spec {
            match spec.rect_for(1, width, height) {
                Ok(rect) => report.info.push(format!(
                    "Slice: {}x{} at ({}, {})",
                    rect.width, rect.height, rect.x, rect.y
                )),
                Err(error) => report.errors.push(error.to_string()),
            }
        }
    }

    report
}
