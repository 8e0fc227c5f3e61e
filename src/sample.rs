//! Strip sampling.
//!
//! [`SampleSpec`] describes which strip to take from every frame and
//! [`extract`] crops it. The rectangle depends only on the frame's size and
//! the `SampleSpec`, so every frame of a uniformly sized run yields a slice of the
//! same dimensions.
//!
//! # Example
//!
//! ```
//! use framestrip::{SampleAxis, SampleSpec};
//!
//! let spec = SampleSpec::new(0.5, 2, SampleAxis::Column)?;
//! let rect = spec.rect_for(1, 640, 360)?;
//! assert_eq!((rect.x, rect.y, rect.width, rect.height), (320, 0, 2, 360));
//! # Ok::<(), framestrip::StripError>(())
//! ```

use image::RgbImage;

use crate::error::StripError;
use crate::frame::FrameHandle;

/// Which way the strip runs through the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleAxis {
    /// A vertical strip taken at a fraction of the frame width. Slices are
    /// laid out left to right.
    #[default]
    Column,
    /// A horizontal strip taken at a fraction of the frame height. Slices
    /// are laid out top to bottom.
    Row,
}

/// What to do when the strip would run past the frame edge.
///
/// The policy is fixed for a whole run so that every slice has the same
/// dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Reject the frame with [`StripError::InvalidSampleGeometry`].
    #[default]
    Fail,
    /// Shift the strip back inside the frame. If the strip is thicker than
    /// the frame it shrinks to the full frame extent.
    Clamp,
}

/// An immutable description of the strip to sample from each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleSpec {
    location: f64,
    sample_size: u32,
    axis: SampleAxis,
    overflow: OverflowPolicy,
}

impl SampleSpec {
    /// Create a spec sampling `sample_size` pixels at `location` (0.0 to 1.0)
    /// along the axis orthogonal to `axis`.
    ///
    /// # Errors
    ///
    /// Returns [`StripError::InvalidSampleSpec`] if `location` is not a
    /// finite value in `[0, 1]` or `sample_size` is zero.
    pub fn new(location: f64, sample_size: u32, axis: SampleAxis) -> Result<Self, StripError> {
        if !location.is_finite() || !(0.0..=1.0).contains(&location) {
            return Err(StripError::InvalidSampleSpec(format!(
                "location must be between 0 and 1, got {location}"
            )));
        }
        if sample_size == 0 {
            return Err(StripError::InvalidSampleSpec(
                "sample size must be at least one pixel".to_string(),
            ));
        }
        Ok(Self {
            location,
            sample_size,
            axis,
            overflow: OverflowPolicy::Fail,
        })
    }

    /// Set the overflow policy. Defaults to [`OverflowPolicy::Fail`].
    #[must_use]
    pub fn with_overflow(mut self, policy: OverflowPolicy) -> Self {
        self.overflow = policy;
        self
    }

    /// Fractional sample position.
    pub fn location(&self) -> f64 {
        self.location
    }

    /// Requested strip thickness in pixels.
    pub fn sample_size(&self) -> u32 {
        self.sample_size
    }

    /// Strip orientation.
    pub fn axis(&self) -> SampleAxis {
        self.axis
    }

    /// Overflow policy for this run.
    pub fn overflow(&self) -> OverflowPolicy {
        self.overflow
    }

    /// Compute the crop rectangle for a frame of the given size.
    ///
    /// `frame_index` is only used to label errors.
    ///
    /// # Errors
    ///
    /// Returns [`StripError::InvalidSampleGeometry`] under
    /// [`OverflowPolicy::Fail`] when the strip does not fit, or under either
    /// policy when the frame is empty.
    pub fn rect_for(
        &self,
        frame_index: u32,
        frame_width: u32,
        frame_height: u32,
    ) -> Result<SampleRect, StripError> {
        let geometry_error = |reason: String| StripError::InvalidSampleGeometry {
            frame_index,
            width: frame_width,
            height: frame_height,
            reason,
        };

        if frame_width == 0 || frame_height == 0 {
            return Err(geometry_error("frame is empty".to_string()));
        }

        let extent = match self.axis {
            SampleAxis::Column => frame_width,
            SampleAxis::Row => frame_height,
        };
        let offset = (extent as f64 * self.location).floor() as u32;

        let (offset, thickness) = if u64::from(offset) + u64::from(self.sample_size)
            <= u64::from(extent)
        {
            (offset, self.sample_size)
        } else {
            match self.overflow {
                OverflowPolicy::Fail => {
                    return Err(geometry_error(format!(
                        "{} pixel strip at offset {offset} exceeds extent {extent}",
                        self.sample_size
                    )));
                }
                OverflowPolicy::Clamp if self.sample_size >= extent => (0, extent),
                OverflowPolicy::Clamp => (extent - self.sample_size, self.sample_size),
            }
        };

        Ok(match self.axis {
            SampleAxis::Column => SampleRect {
                x: offset,
                y: 0,
                width: thickness,
                height: frame_height,
            },
            SampleAxis::Row => SampleRect {
                x: 0,
                y: offset,
                width: frame_width,
                height: thickness,
            },
        })
    }
}

/// A crop rectangle in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// The strip cropped out of one frame, tagged with the frame's index.
#[derive(Debug, Clone)]
pub struct StripSlice {
    /// 1-based index of the frame this slice came from.
    pub frame_index: u32,
    /// Owned RGB8 pixels of the strip.
    pub image: RgbImage,
}

impl StripSlice {
    /// Slice width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Slice height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Crop the strip described by `spec` out of `frame`.
///
/// The returned slice owns a copy of the pixels; the frame can be dropped
/// as soon as this returns.
///
/// # Errors
///
/// Returns [`StripError::InvalidSampleGeometry`] if the strip does not fit
/// the frame (see [`SampleSpec::rect_for`]).
pub fn extract(frame: &FrameHandle, spec: &SampleSpec) -> Result<StripSlice, StripError> {
    let rect = spec.rect_for(frame.index(), frame.width(), frame.height())?;
    let image = frame
        .image()
        .crop_imm(rect.x, rect.y, rect.width, rect.height)
        .into_rgb8();

    Ok(StripSlice {
        frame_index: frame.index(),
        image,
    })
}
