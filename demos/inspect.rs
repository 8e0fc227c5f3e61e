//! Inspect a directory of extracted frames and display the report.
//!
//! Usage:
//!   cargo run --example inspect -- [frame_directory] [pattern]

use std::error::Error;

use framestrip::{
    DEFAULT_FRAME_PATTERN, FramePattern, SampleAxis, SampleSpec, inspect_frames,
};

fn main() -> Result<(), Box<dyn Error>> {
    let directory = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "scratch".to_string());
    let pattern = std::env::args()
        .nth(2)
        .unwrap_or_else(|| DEFAULT_FRAME_PATTERN.to_string());

    let pattern = FramePattern::parse(&pattern)?;
    let spec = SampleSpec::new(0.5, 1, SampleAxis::Column)?;
    let report = inspect_frames(&directory, &pattern, Some(&spec));

    println!("Inspection report for {directory}:");
    println!("{report}");

    println!("Frames: {}", report.frame_count);
    if let Some((width, height)) = report.frame_size {
        println!("Frame size: {width}x{height}");
    }
    println!("Valid: {}", report.is_valid());
    println!("Total issues: {}", report.issue_count());

    Ok(())
}
