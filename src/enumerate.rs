//! Frame discovery.
//!
//! Frame files are named by a [`FramePattern`] such as `frame_%d.png` and
//! numbered densely from 1. [`enumerate_frames`] checks index 1, 2, 3 and so on
//! and stops at the first missing file: a gap marks the end of the usable
//! sequence, not a hole to skip over.
//!
//! # Example
//!
//! ```no_run
//! use framestrip::{FramePattern, enumerate_frames};
//!
//! let pattern = FramePattern::parse("frame_%d.png")?;
//! let frames = enumerate_frames("scratch", &pattern);
//! for (index, path) in frames.iter() {
//!     println!("{index}: {}", path.display());
//! }
//! # Ok::<(), framestrip::StripError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};

use crate::error::StripError;

/// Pattern used when none is configured.
pub const DEFAULT_FRAME_PATTERN: &str = "frame_%d.png";

/// A frame filename template with exactly one integer placeholder.
///
/// Supports `%d`, zero-padded `%0Nd`, and `%%` for a literal percent sign:
/// the same subset the `ffmpeg` image sequence muxer understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramePattern {
    raw: String,
    prefix: String,
    suffix: String,
    width: usize,
}

impl FramePattern {
    /// Parse a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`StripError::InvalidFramePattern`] if the pattern has no
    /// index placeholder, more than one, or an unsupported `%` directive.
    pub fn parse(pattern: &str) -> Result<Self, StripError> {
        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut width = None;
        let mut chars = pattern.chars().peekable();

        while let Some(character) = chars.next() {
            if character != '%' {
                match width {
                    None => prefix.push(character),
                    Some(_) => suffix.push(character),
                }
                continue;
            }

            if chars.peek() == Some(&'%') {
                chars.next();
                match width {
                    None => prefix.push('%'),
                    Some(_) => suffix.push('%'),
                }
                continue;
            }

            let mut digits = String::new();
            while let Some(digit) = chars.peek().filter(|c| c.is_ascii_digit()) {
                digits.push(*digit);
                chars.next();
            }
            if chars.next() != Some('d') {
                return Err(StripError::InvalidFramePattern(format!(
                    "unsupported directive in {pattern:?}; expected %d or %0Nd"
                )));
            }
            if width.is_some() {
                return Err(StripError::InvalidFramePattern(format!(
                    "{pattern:?} has more than one index placeholder"
                )));
            }
            let padding = if digits.is_empty() {
                0
            } else {
                digits.parse::<usize>().map_err(|_| {
                    StripError::InvalidFramePattern(format!(
                        "padding width {digits} in {pattern:?} is out of range"
                    ))
                })?
            };
            width = Some(padding);
        }

        let width = width.ok_or_else(|| {
            StripError::InvalidFramePattern(format!("{pattern:?} has no index placeholder"))
        })?;

        Ok(Self {
            raw: pattern.to_string(),
            prefix,
            suffix,
            width,
        })
    }

    /// The pattern as written, placeholder included.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Filename for a frame index.
    pub fn filename(&self, index: u32) -> String {
        format!(
            "{}{:0width$}{}",
            self.prefix,
            index,
            self.suffix,
            width = self.width
        )
    }

    /// Recover the frame index from a filename produced by this pattern.
    ///
    /// Only the exact spelling [`filename`](FramePattern::filename) produces
    /// matches: `frame_01.png` is not frame 1 of `frame_%d.png`.
    pub fn index_of(&self, filename: &str) -> Option<u32> {
        let digits = filename
            .strip_prefix(&self.prefix)?
            .strip_suffix(&self.suffix)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let index = digits.parse().ok()?;
        (self.filename(index) == filename).then_some(index)
    }

    /// File extension of the frames, if the pattern has one.
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.suffix)
            .extension()
            .and_then(|extension| extension.to_str())
    }
}

impl Default for FramePattern {
    fn default() -> Self {
        Self {
            raw: DEFAULT_FRAME_PATTERN.to_string(),
            prefix: "frame_".to_string(),
            suffix: ".png".to_string(),
            width: 0,
        }
    }
}

impl Display for FramePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.raw)
    }
}

/// The contiguous run of frames `1..=count` found in a directory.
#[derive(Debug, Clone)]
pub struct FrameSequence {
    directory: PathBuf,
    pattern: FramePattern,
    count: u32,
}

impl FrameSequence {
    /// Directory the frames live in.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Pattern the frames are named by.
    pub fn pattern(&self) -> &FramePattern {
        &self.pattern
    }

    /// Number of contiguous frames, `K`.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Returns `true` if frame 1 does not exist.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Path of the frame with the given index.
    pub fn path(&self, index: u32) -> PathBuf {
        self.directory.join(self.pattern.filename(index))
    }

    /// `(index, path)` pairs in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, PathBuf)> + '_ {
        (1..=self.count).map(move |index| (index, self.path(index)))
    }
}

/// Find the maximal run of frame files `1..=K` in `directory`.
///
/// Probing stops at the first index with no regular file behind it, so
/// frames 1, 2, 3, 5 yield `K = 3`. A missing directory yields `K = 0`.
pub fn enumerate_frames<P: AsRef<Path>>(directory: P, pattern: &FramePattern) -> FrameSequence {
    let directory = directory.as_ref().to_path_buf();
    let mut count = 0_u32;
    while directory.join(pattern.filename(count + 1)).is_file() {
        count += 1;
    }
    if directory.join(pattern.filename(count + 2)).is_file() {
        log::warn!(
            "Frame {} is missing from {}; later frames are ignored",
            count + 1,
            directory.display()
        );
    }

    log::debug!(
        "Found {count} contiguous frame(s) in {} matching {pattern}",
        directory.display()
    );

    FrameSequence {
        directory,
        pattern: pattern.clone(),
        count,
    }
}
