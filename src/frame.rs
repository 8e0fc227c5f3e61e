//! Decoded frame handles.
//!
//! A [`FrameHandle`] owns one decoded frame for as long as it takes to
//! sample it. Opening a handle is the only place frame files are decoded,
//! so every decode failure carries the frame's index and path.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader};

use crate::error::StripError;

/// One decoded frame plus the index it was enumerated under.
#[derive(Debug, Clone)]
pub struct FrameHandle {
    index: u32,
    image: DynamicImage,
}

impl FrameHandle {
    /// Wrap an already-decoded image.
    pub fn new(index: u32, image: DynamicImage) -> Self {
        Self { index, image }
    }

    /// Open and decode the frame file at `path`.
    ///
    /// The format is guessed from the file contents, not the extension.
    ///
    /// # Errors
    ///
    /// Returns [`StripError::FrameDecodeFailure`] if the file cannot be
    /// opened or decoded.
    pub fn open<P: AsRef<Path>>(index: u32, path: P) -> Result<Self, StripError> {
        let path = path.as_ref();
        let decode_failure = |reason: String| StripError::FrameDecodeFailure {
            frame_index: index,
            path: PathBuf::from(path),
            reason,
        };

        let image = ImageReader::open(path)
            .map_err(|error| decode_failure(error.to_string()))?
            .with_guessed_format()
            .map_err(|error| decode_failure(error.to_string()))?
            .decode()
            .map_err(|error| decode_failure(error.to_string()))?;

        log::trace!(
            "Decoded frame {index} ({}x{}) from {}",
            image.width(),
            image.height(),
            path.display()
        );
        Ok(Self { index, image })
    }

    /// 1-based frame index.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the decoded pixels.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}
