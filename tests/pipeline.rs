//! End-to-end pipeline tests.
//!
//! Frame sources are stubbed so no `ffmpeg` binary is required.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use framestrip::{
    CancellationToken, FramePattern, FrameSource, OperationType, PipelineState, ProgressCallback,
    ProgressInfo, SampleAxis, SampleSpec, StripError, StripOptions, StripPipeline, TimeRange,
};
use image::{Rgb, RgbImage};

const RED: Rgb<u8> = Rgb([255, 0, 0]);
const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

fn write_solid_frames(directory: &Path, pattern: &FramePattern, colours: &[Rgb<u8>], size: u32) {
    for (rank, colour) in colours.iter().enumerate() {
        RgbImage::from_pixel(size, size, *colour)
            .save(directory.join(pattern.filename(rank as u32 + 1)))
            .expect("Failed to write frame");
    }
}

/// Writes solid frames instead of decoding a video.
struct SolidFrames {
    colours: Vec<Rgb<u8>>,
    seen_range: Arc<Mutex<Option<TimeRange>>>,
}

impl SolidFrames {
    fn new(colours: &[Rgb<u8>]) -> Self {
        Self {
            colours: colours.to_vec(),
            seen_range: Arc::new(Mutex::new(None)),
        }
    }
}

impl FrameSource for SolidFrames {
    fn produce_frames(
        &self,
        _video: &Path,
        directory: &Path,
        pattern: &FramePattern,
        range: &TimeRange,
    ) -> Result<(), StripError> {
        *self.seen_range.lock().unwrap() = Some(range.clone());
        write_solid_frames(directory, pattern, &self.colours, 10);
        Ok(())
    }
}

struct BrokenSource;

impl FrameSource for BrokenSource {
    fn produce_frames(
        &self,
        video: &Path,
        _directory: &Path,
        _pattern: &FramePattern,
        _range: &TimeRange,
    ) -> Result<(), StripError> {
        Err(StripError::FrameSourceFailed {
            video: video.to_path_buf(),
            reason: "no video stream".to_string(),
        })
    }
}

struct RecordingProgress {
    operations: Mutex<Vec<OperationType>>,
}

impl ProgressCallback for RecordingProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.operations.lock().unwrap().push(info.operation);
    }
}

// ── Existing frames ────────────────────────────────────────────────

#[test]
fn row_strip_from_four_frames() {
    let frames = tempfile::tempdir().expect("Failed to create temp dir");
    let output_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let output = output_directory.path().join("strip.png");
    write_solid_frames(
        frames.path(),
        &FramePattern::default(),
        &[RED, GREEN, BLUE, WHITE],
        10,
    );

    let spec = SampleSpec::new(0.5, 1, SampleAxis::Row).expect("valid spec");
    let mut pipeline = StripPipeline::new(spec, frames.path());
    let report = pipeline.run(&output).expect("Pipeline failed");

    assert_eq!(pipeline.state(), PipelineState::Done);
    assert_eq!(report.frame_count, 4);
    assert_eq!((report.width, report.height), (10, 4));
    assert_eq!(report.output, output);

    let strip = image::open(&output).expect("readable output").into_rgb8();
    assert_eq!(strip.dimensions(), (10, 4));
    for (row, colour) in [RED, GREEN, BLUE, WHITE].iter().enumerate() {
        for x in 0..10 {
            assert_eq!(strip.get_pixel(x, row as u32), colour);
        }
    }
}

#[test]
fn column_strip_width_is_frames_times_size() {
    let frames = tempfile::tempdir().expect("Failed to create temp dir");
    let output = frames.path().join("out.png");
    write_solid_frames(frames.path(), &FramePattern::default(), &[RED; 7], 10);

    let spec = SampleSpec::new(0.2, 3, SampleAxis::Column).expect("valid spec");
    let report = StripPipeline::new(spec, frames.path())
        .run(&output)
        .expect("Pipeline failed");

    assert_eq!((report.width, report.height), (21, 10));
}

#[test]
fn frames_after_gap_are_ignored() {
    let frames = tempfile::tempdir().expect("Failed to create temp dir");
    let pattern = FramePattern::default();
    write_solid_frames(frames.path(), &pattern, &[RED, GREEN, BLUE, WHITE, RED], 10);
    fs::remove_file(frames.path().join("frame_4.png")).expect("Failed to remove");

    let spec = SampleSpec::new(0.5, 1, SampleAxis::Column).expect("valid spec");
    let report = StripPipeline::new(spec, frames.path())
        .run(frames.path().join("strip.png"))
        .expect("Pipeline failed");
    assert_eq!(report.frame_count, 3);
}

#[test]
fn custom_pattern() {
    let frames = tempfile::tempdir().expect("Failed to create temp dir");
    let pattern = FramePattern::parse("shot%03d.png").expect("valid pattern");
    write_solid_frames(frames.path(), &pattern, &[GREEN, BLUE], 10);

    let spec = SampleSpec::new(0.5, 1, SampleAxis::Column).expect("valid spec");
    let report = StripPipeline::new(spec, frames.path())
        .with_pattern(pattern)
        .run(frames.path().join("strip.png"))
        .expect("Pipeline failed");
    assert_eq!(report.frame_count, 2);
}

#[test]
fn rerun_replaces_output() {
    let frames = tempfile::tempdir().expect("Failed to create temp dir");
    let output = frames.path().join("strip.png");
    write_solid_frames(frames.path(), &FramePattern::default(), &[RED, GREEN], 10);

    let spec = SampleSpec::new(0.5, 1, SampleAxis::Column).expect("valid spec");
    let mut pipeline = StripPipeline::new(spec, frames.path());
    pipeline.run(&output).expect("First run failed");

    write_solid_frames(frames.path(), &FramePattern::default(), &[RED, GREEN, BLUE], 10);
    let report = pipeline.run(&output).expect("Second run failed");
    assert_eq!(report.frame_count, 3);
    assert_eq!(image::image_dimensions(&output).expect("readable"), (3, 10));
}

// ── Failures ───────────────────────────────────────────────────────

#[test]
fn no_frames_fails_without_output() {
    let frames = tempfile::tempdir().expect("Failed to create temp dir");
    let output = frames.path().join("strip.png");

    let spec = SampleSpec::new(0.5, 1, SampleAxis::Column).expect("valid spec");
    let mut pipeline = StripPipeline::new(spec, frames.path());
    match pipeline.run(&output) {
        Err(StripError::NoFramesAvailable { directory, pattern }) => {
            assert_eq!(directory, frames.path());
            assert_eq!(pattern, "frame_%d.png");
        }
        other => panic!("Expected NoFramesAvailable, got: {other:?}"),
    }
    assert_eq!(pipeline.state(), PipelineState::Failed);
    assert!(!output.exists());
}

#[test]
fn geometry_failure_writes_nothing() {
    let frames = tempfile::tempdir().expect("Failed to create temp dir");
    let output = frames.path().join("strip.png");
    write_solid_frames(frames.path(), &FramePattern::default(), &[RED, GREEN], 10);

    let spec = SampleSpec::new(1.0, 1, SampleAxis::Column).expect("valid spec");
    let mut pipeline = StripPipeline::new(spec, frames.path());
    let result = pipeline.run(&output);

    assert!(matches!(
        result,
        Err(StripError::InvalidSampleGeometry { .. })
    ));
    assert_eq!(pipeline.state(), PipelineState::Failed);
    assert!(!output.exists());
}

#[test]
fn mixed_frame_sizes_fail() {
    let frames = tempfile::tempdir().expect("Failed to create temp dir");
    let pattern = FramePattern::default();
    write_solid_frames(frames.path(), &pattern, &[RED], 10);
    RgbImage::from_pixel(12, 10, GREEN)
        .save(frames.path().join(pattern.filename(2)))
        .expect("Failed to write frame");

    let spec = SampleSpec::new(0.5, 1, SampleAxis::Row).expect("valid spec");
    let result = StripPipeline::new(spec, frames.path()).run(frames.path().join("strip.png"));
    assert!(matches!(
        result,
        Err(StripError::InvalidSampleGeometry { frame_index: 2, .. })
    ));
}

#[test]
fn cancellation_stops_run() {
    let frames = tempfile::tempdir().expect("Failed to create temp dir");
    write_solid_frames(frames.path(), &FramePattern::default(), &[RED, GREEN], 10);

    let token = CancellationToken::new();
    token.cancel();
    let spec = SampleSpec::new(0.5, 1, SampleAxis::Column).expect("valid spec");
    let mut pipeline = StripPipeline::new(spec, frames.path())
        .with_options(StripOptions::new().with_cancellation(token));

    assert!(matches!(
        pipeline.run(frames.path().join("strip.png")),
        Err(StripError::Cancelled)
    ));
    assert_eq!(pipeline.state(), PipelineState::Failed);
}

// ── Extraction ─────────────────────────────────────────────────────

#[test]
fn extraction_replaces_stale_frames() {
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    let pattern = FramePattern::default();
    write_solid_frames(scratch.path(), &pattern, &[WHITE; 6], 10);
    fs::write(scratch.path().join("notes.txt"), b"keep me").expect("Failed to write");

    let source = SolidFrames::new(&[RED, GREEN, BLUE]);
    let seen_range = source.seen_range.clone();
    let spec = SampleSpec::new(0.5, 1, SampleAxis::Row).expect("valid spec");
    let mut pipeline = StripPipeline::new(spec, scratch.path()).with_frame_source(
        source,
        "input.mp4",
        TimeRange::between("0:00:01", "0:00:02"),
    );
    let report = pipeline
        .run(scratch.path().join("strip.png"))
        .expect("Pipeline failed");

    assert_eq!(report.frame_count, 3);
    assert!(!scratch.path().join("frame_4.png").exists());
    assert!(scratch.path().join("notes.txt").exists());
    assert_eq!(
        seen_range.lock().unwrap().clone(),
        Some(TimeRange::between("0:00:01", "0:00:02"))
    );
}

#[test]
fn extraction_creates_scratch_directory() {
    let root = tempfile::tempdir().expect("Failed to create temp dir");
    let scratch = root.path().join("scratch");

    let source = SolidFrames::new(&[BLUE, BLUE]);
    let spec = SampleSpec::new(0.5, 1, SampleAxis::Column).expect("valid spec");
    let report = StripPipeline::new(spec, &scratch)
        .with_frame_source(source, "input.mp4", TimeRange::default())
        .run(root.path().join("strip.png"))
        .expect("Pipeline failed");

    assert!(scratch.is_dir());
    assert_eq!(report.frame_count, 2);
}

#[test]
fn source_failure_fails_run() {
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    let spec = SampleSpec::new(0.5, 1, SampleAxis::Column).expect("valid spec");
    let mut pipeline = StripPipeline::new(spec, scratch.path()).with_frame_source(
        BrokenSource,
        "input.mp4",
        TimeRange::default(),
    );

    assert!(matches!(
        pipeline.run(scratch.path().join("strip.png")),
        Err(StripError::FrameSourceFailed { .. })
    ));
    assert_eq!(pipeline.state(), PipelineState::Failed);
}

#[test]
fn progress_covers_every_stage() {
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    let recorder = Arc::new(RecordingProgress {
        operations: Mutex::new(Vec::new()),
    });

    let spec = SampleSpec::new(0.5, 1, SampleAxis::Column).expect("valid spec");
    StripPipeline::new(spec, scratch.path())
        .with_frame_source(
            SolidFrames::new(&[RED, GREEN]),
            "input.mp4",
            TimeRange::default(),
        )
        .with_options(StripOptions::new().with_progress(recorder.clone()))
        .run(scratch.path().join("strip.png"))
        .expect("Pipeline failed");

    let operations = recorder.operations.lock().unwrap();
    assert_eq!(operations.first(), Some(&OperationType::FrameExtraction));
    assert!(operations.contains(&OperationType::Sampling));
    assert_eq!(operations.last(), Some(&OperationType::Assembly));
}
