//! Strip assembly.
//!
//! [`assemble`] is where frame order is re-established. Slices arrive from
//! the extraction pool in no particular order; they are sorted by frame
//! index and pasted one after another along the major axis, so the
//! composite reads left to right (columns) or top to bottom (rows) in
//! capture order.

use std::path::Path;

use image::{GenericImage, RgbImage};

use crate::error::StripError;
use crate::output;
use crate::sample::{SampleAxis, SampleSpec, StripSlice};

/// The assembled timeline image.
#[derive(Debug, Clone)]
pub struct CompositeStrip {
    image: RgbImage,
    frame_count: u32,
    spec: SampleSpec,
}

impl CompositeStrip {
    /// Number of frames (slices) in the composite.
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Composite width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Composite height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The [`SampleSpec`] the slices were sampled with.
    pub fn spec(&self) -> &SampleSpec {
        &self.spec
    }

    /// Borrow the composite pixels.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Take ownership of the composite pixels.
    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Write the composite to `path`, replacing any existing file.
    ///
    /// The format is chosen from the path's extension. The image is written
    /// to a temporary file beside `path` and renamed into place, so a failed
    /// write never leaves a partial file behind.
    ///
    /// # Errors
    ///
    /// Returns [`StripError::PersistenceFailure`] if the format is unknown or
    /// the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StripError> {
        output::write_image(&self.image, path.as_ref())
    }
}

/// Composite `slices` into one image in ascending frame-index order.
///
/// The input order is ignored. Slice of rank `r` (frame `r + 1`) is placed
/// at offset `r × thickness` along the major axis, where thickness is the
/// slice's extent in the sampling direction.
///
/// # Errors
///
/// - [`StripError::MissingSlice`] if the indices are not exactly `1..=K`,
///   including when `slices` is empty.
/// - [`StripError::InvalidSampleGeometry`] if slices differ in size, which
///   happens when frames of one run differ in size.
pub fn assemble(
    mut slices: Vec<StripSlice>,
    spec: &SampleSpec,
) -> Result<CompositeStrip, StripError> {
    slices.sort_unstable_by_key(|slice| slice.frame_index);

    let first = slices
        .first()
        .ok_or(StripError::MissingSlice { frame_index: 1 })?;
    let (slice_width, slice_height) = (first.width(), first.height());

    for (rank, slice) in slices.iter().enumerate() {
        let expected_index = rank as u32 + 1;
        if slice.frame_index != expected_index {
            return Err(StripError::MissingSlice {
                frame_index: expected_index,
            });
        }
        if (slice.width(), slice.height()) != (slice_width, slice_height) {
            return Err(StripError::InvalidSampleGeometry {
                frame_index: slice.frame_index,
                width: slice.width(),
                height: slice.height(),
                reason: format!(
                    "slice differs from frame 1's {slice_width}x{slice_height}; frames must share one size"
                ),
            });
        }
    }

    let frame_count = slices.len() as u32;
    let too_large = || StripError::InvalidSampleGeometry {
        frame_index: frame_count,
        width: slice_width,
        height: slice_height,
        reason: format!("{frame_count} slices overflow the maximum image size"),
    };

    let (width, height) = match spec.axis() {
        SampleAxis::Column => (
            slice_width.checked_mul(frame_count).ok_or_else(too_large)?,
            slice_height,
        ),
        SampleAxis::Row => (
            slice_width,
            slice_height.checked_mul(frame_count).ok_or_else(too_large)?,
        ),
    };

    log::debug!("Assembling {frame_count} slice(s) into a {width}x{height} composite");
    let mut image = RgbImage::new(width, height);

    for (rank, slice) in slices.iter().enumerate() {
        let rank = rank as u32;
        let (x, y) = match spec.axis() {
            SampleAxis::Column => (rank * slice_width, 0),
            SampleAxis::Row => (0, rank * slice_height),
        };
        image
            .copy_from(&slice.image, x, y)
            .map_err(|error| StripError::InvalidSampleGeometry {
                frame_index: slice.frame_index,
                width: slice.width(),
                height: slice.height(),
                reason: error.to_string(),
            })?;
    }

    Ok(CompositeStrip {
        image,
        frame_count,
        spec: *spec,
    })
}
