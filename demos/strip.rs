//! Build a column strip from a video with the `ffmpeg` binary, printing
//! progress as frames are sampled.
//!
//! Usage:
//!   cargo run --example strip -- <input_file> [output_image]

use std::error::Error;
use std::sync::Arc;

use framestrip::{
    FfmpegCommand, ProgressCallback, ProgressInfo, SampleAxis, SampleSpec, StripOptions,
    StripPipeline, TimeRange,
};

/// Simple progress callback that prints to stdout.
struct PrintProgress;

impl ProgressCallback for PrintProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        let pct = info
            .percentage
            .map_or("??".to_string(), |p| format!("{p:.1}"));
        println!(
            "[{:?}] {}/{} ({pct}%)",
            info.operation,
            info.current,
            info.total.map_or("?".to_string(), |t| t.to_string()),
        );
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let input_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "input.mp4".to_string());
    let output_path = std::env::args()
        .nth(2)
        .unwrap_or_else(|| "strip.png".to_string());

    let spec = SampleSpec::new(0.5, 1, SampleAxis::Column)?;
    let options = StripOptions::new()
        .with_progress(Arc::new(PrintProgress))
        .with_batch_size(25);

    let mut pipeline = StripPipeline::new(spec, "scratch")
        .with_options(options)
        .with_frame_source(FfmpegCommand::new(), &input_path, TimeRange::default());
    let report = pipeline.run(&output_path)?;

    println!(
        "Wrote {}x{} strip of {} frames to {} in {:.2}s",
        report.width,
        report.height,
        report.frame_count,
        report.output.display(),
        report.elapsed.as_secs_f64()
    );

    Ok(())
}
