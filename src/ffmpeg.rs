//! In-process frame extraction with FFmpeg.
//!
//! [`FfmpegDecoder`] is a [`FrameSource`] that decodes the video through
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) instead of
//! spawning the `ffmpeg` binary. Frames are converted to RGB24 and written
//! with the `image` crate, so the pattern's extension picks the frame file
//! format.
//!
//! Requires the `ffmpeg` cargo feature and the FFmpeg development
//! libraries.

use std::path::Path;
use std::time::Duration;

use ffmpeg_next::{
    Rational,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::Pixel,
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
    util::log::Level as LogLevel,
};
use image::RgbImage;

use crate::enumerate::FramePattern;
use crate::error::StripError;
use crate::source::{FrameSource, TimeRange, parse_timecode};

/// Decodes frames in-process.
///
/// Unlike [`FfmpegCommand`](crate::FfmpegCommand), the time range must use
/// the syntax understood by [`parse_timecode`].
#[derive(Debug, Clone, Default)]
pub struct FfmpegDecoder;

impl FfmpegDecoder {
    /// Create a decoder source.
    pub fn new() -> Self {
        Self
    }
}

impl FrameSource for FfmpegDecoder {
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
        let ffmpeg_failed = |error: ffmpeg_next::Error| failed(error.to_string());

        let start = parse_timecode(&range.start)
            .ok_or_else(|| failed(format!("invalid start time {:?}", range.start)))?;
        let end = match &range.end {
            Some(end) => Some(
                parse_timecode(end).ok_or_else(|| failed(format!("invalid end time {end:?}")))?,
            ),
            None => None,
        };

        ffmpeg_next::init()
            .map_err(|error| failed(format!("FFmpeg initialisation failed: {error}")))?;
        ffmpeg_next::util::log::set_level(LogLevel::Error);

        log::debug!("Opening {} for in-process decoding", video.display());
        let mut input_context = ffmpeg_next::format::input(&video).map_err(ffmpeg_failed)?;

        let (video_stream_index, time_base, codec_parameters) = {
            let stream = input_context
                .streams()
                .best(Type::Video)
                .ok_or_else(|| failed("no video stream found".to_string()))?;
            (stream.index(), stream.time_base(), stream.parameters())
        };

        let decoder_context =
            CodecContext::from_parameters(codec_parameters).map_err(ffmpeg_failed)?;
        let mut decoder = decoder_context.decoder().video().map_err(ffmpeg_failed)?;

        // Seek to the nearest keyframe before the start; frames before the
        // start are decoded and discarded.
        if start > Duration::ZERO {
            let seek_timestamp = start.as_micros() as i64;
            input_context
                .seek(seek_timestamp, ..seek_timestamp)
                .map_err(ffmpeg_failed)?;
        }

        let scaler = ScalingContext::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            Pixel::RGB24,
            decoder.width(),
            decoder.height(),
            ScalingFlags::BILINEAR,
        )
        .map_err(ffmpeg_failed)?;

        let mut writer = FrameWriter {
            scaler,
            video,
            directory,
            pattern,
            time_base,
            start_seconds: start.as_secs_f64(),
            end_seconds: end.map(|end| end.as_secs_f64()),
            next_index: 1,
            decoded: VideoFrame::empty(),
            converted: VideoFrame::empty(),
        };

        for (stream, packet) in input_context.packets() {
            if stream.index() != video_stream_index {
                continue;
            }
            decoder.send_packet(&packet).map_err(ffmpeg_failed)?;
            if !writer.drain(&mut decoder)? {
                break;
            }
        }

        decoder.send_eof().map_err(ffmpeg_failed)?;
        writer.drain(&mut decoder)?;

        log::info!(
            "Decoded {} frame(s) from {} into {}",
            writer.next_index - 1,
            video.display(),
            directory.display()
        );
        Ok(())
    }
}

/// Writes decoded frames that fall inside the time range.
struct FrameWriter<'a> {
    scaler: ScalingContext,
    video: &'a Path,
    directory: &'a Path,
    pattern: &'a FramePattern,
    time_base: Rational,
    start_seconds: f64,
    end_seconds: Option<f64>,
    next_index: u32,
    decoded: VideoFrame,
    converted: VideoFrame,
}

impl FrameWriter<'_> {
    /// Receive every frame the decoder has ready. Returns `false` once a
    /// frame past the end of the range is seen.
    fn drain(&mut self, decoder: &mut VideoDecoder) -> Result<bool, StripError> {
        while decoder.receive_frame(&mut self.decoded).is_ok() {
            let pts = self
                .decoded
                .timestamp()
                .or_else(|| self.decoded.pts())
                .unwrap_or(0);
            let seconds = pts as f64 * self.time_base.numerator() as f64
                / self.time_base.denominator() as f64;

            if seconds < self.start_seconds {
                continue;
            }
            if self.end_seconds.is_some_and(|end| seconds > end) {
                return Ok(false);
            }

            self.scaler
                .run(&self.decoded, &mut self.converted)
                .map_err(|error| self.failed(error.to_string()))?;
            let image = self.converted_image()?;

            let path = self.directory.join(self.pattern.filename(self.next_index));
            image
                .save(&path)
                .map_err(|error| self.failed(format!("{}: {error}", path.display())))?;
            self.next_index += 1;
        }
        Ok(true)
    }

    /// Copy the RGB24 frame into a tightly packed image, dropping row padding.
    fn converted_image(&self) -> Result<RgbImage, StripError> {
        let width = self.converted.width();
        let height = self.converted.height();
        let stride = self.converted.stride(0);
        let row_bytes = width as usize * 3;
        let data = self.converted.data(0);

        let mut buffer = Vec::with_capacity(row_bytes * height as usize);
        for row in 0..height as usize {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + row_bytes]);
        }

        RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| self.failed("decoded frame buffer has the wrong size".to_string()))
    }

    fn failed(&self, reason: String) -> StripError {
        StripError::FrameSourceFailed {
            video: self.video.to_path_buf(),
            reason,
        }
    }
}
