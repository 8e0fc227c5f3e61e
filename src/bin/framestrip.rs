use std::{path::PathBuf, sync::Arc};

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use env_logger::Env;
use framestrip::{
    DEFAULT_FRAME_PATTERN, DEFAULT_START, DEFAULT_WORKERS, FfmpegCommand, FramePattern,
    OperationType, OverflowPolicy, ProgressCallback, ProgressInfo, SampleAxis, SampleSpec,
    StripError, StripOptions, StripPipeline, TimeRange, inspect_frames, parse_timecode,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

#[cfg(feature = "ffmpeg")]
use framestrip::FfmpegDecoder;

const CLI_AFTER_HELP: &str = "Examples:\n  framestrip strip input.mp4 --out strip.png\n  framestrip strip input.mp4 --out rows.png --rows --sample-size 2 --start 0:01:00 --end 0:02:00 --progress\n  framestrip strip --skip-extract --out again.png --location 0.25\n  framestrip inspect --scratch scratch\n  framestrip completions zsh > _framestrip";

#[derive(Debug, Parser)]
#[command(
    name = "framestrip",
    version,
    about = "Sample a column or row from each frame in a video",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show additional logging output.
    #[arg(long, global = true)]
    verbose: bool,

    /// Show a progress bar while sampling.
    #[arg(long, global = true)]
    progress: bool,
}

#[derive(Debug, Args, Clone)]
struct SampleArgs {
    /// Place to sample at, between 0 and 1.
    #[arg(long, default_value_t = 0.5)]
    location: f64,

    /// Number of pixels to grab per sample.
    #[arg(long, default_value_t = 1)]
    sample_size: u32,

    /// Sample rows instead of columns.
    #[arg(long)]
    rows: bool,

    /// Shift strips that run past the frame edge back inside instead of failing.
    #[arg(long)]
    clamp: bool,
}

#[derive(Debug, Args, Clone)]
struct FrameArgs {
    /// Directory holding the numbered frames.
    #[arg(long, default_value = "scratch")]
    scratch: PathBuf,

    /// Frame filename pattern with one %d or %0Nd placeholder.
    #[arg(long, default_value = DEFAULT_FRAME_PATTERN)]
    pattern: String,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build a strip image from a video.
    #[command(
        about = "Build a strip image",
        after_help = "Examples:\n  framestrip strip input.mp4 --out strip.png\n  framestrip strip --skip-extract --out strip.png --rows"
    )]
    Strip {
        /// Video file to process.
        #[arg(required_unless_present = "skip_extract")]
        video: Option<PathBuf>,

        /// File to write out. The extension picks the format.
        #[arg(long)]
        out: PathBuf,

        /// Starting time, in ffmpeg time syntax.
        #[arg(long, default_value = DEFAULT_START)]
        start: String,

        /// Ending time, in ffmpeg time syntax.
        #[arg(long)]
        end: Option<String>,

        /// Skip the extract step and reuse existing frames.
        #[arg(long)]
        skip_extract: bool,

        /// Number of parallel sampling workers.
        #[arg(long, default_value_t = DEFAULT_WORKERS)]
        workers: usize,

        /// ffmpeg executable used to extract frames.
        #[arg(long, default_value = "ffmpeg")]
        ffmpeg: PathBuf,

        /// Decode in-process instead of running ffmpeg.
        #[cfg(feature = "ffmpeg")]
        #[arg(long)]
        in_process: bool,

        /// Print the run report as machine-readable JSON.
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        sample: SampleArgs,

        #[command(flatten)]
        frames: FrameArgs,
    },

    /// Check a frame directory before sampling it.
    #[command(
        about = "Inspect extracted frames",
        after_help = "Examples:\n  framestrip inspect\n  framestrip inspect --scratch frames --sample-size 8 --rows --json"
    )]
    Inspect {
        /// Output the report as machine-readable JSON.
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        sample: SampleArgs,

        #[command(flatten)]
        frames: FrameArgs,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn build_spec(sample: &SampleArgs) -> Result<SampleSpec, StripError> {
    let axis = if sample.rows {
        SampleAxis::Row
    } else {
        SampleAxis::Column
    };
    let overflow = if sample.clamp {
        OverflowPolicy::Clamp
    } else {
        OverflowPolicy::Fail
    };
    Ok(SampleSpec::new(sample.location, sample.sample_size, axis)?.with_overflow(overflow))
}

fn check_timecode(flag: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
    if parse_timecode(value).is_none() {
        return Err(format!("invalid {flag} time: {value}").into());
    }
    Ok(())
}

fn init_logging(global: &GlobalOptions) {
    let default_level = if global.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new(0);
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
        bar.set_style(style.progress_chars("##-"));
        Ok(Self { bar })
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        match info.operation {
            OperationType::FrameExtraction => self.bar.set_message("frames extracted"),
            OperationType::Sampling => {
                if let Some(total) = info.total {
                    self.bar.set_length(total);
                }
                self.bar.set_position(info.current);
                self.bar.set_message("sampling");
            }
            OperationType::Assembly => self.bar.finish_with_message("assembled"),
            _ => {}
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.global);

    match cli.command {
        Commands::Strip {
            video,
            out,
            start,
            end,
            skip_extract,
            workers,
            ffmpeg,
            #[cfg(feature = "ffmpeg")]
            in_process,
            json,
            sample,
            frames,
        } => {
            let spec = build_spec(&sample)?;
            let pattern = FramePattern::parse(&frames.pattern)?;

            let mut options = StripOptions::new().with_workers(workers);
            if cli.global.progress {
                options = options.with_progress(Arc::new(TerminalProgress::new()?));
            }

            let mut pipeline = StripPipeline::new(spec, &frames.scratch)
                .with_pattern(pattern)
                .with_options(options);

            if !skip_extract {
                let video = video.ok_or("a video is required unless --skip-extract is set")?;
                check_timecode("--start", &start)?;
                if let Some(end) = &end {
                    check_timecode("--end", end)?;
                }
                let range = TimeRange { start, end };

                #[cfg(feature = "ffmpeg")]
                if in_process {
                    pipeline = pipeline.with_frame_source(FfmpegDecoder::new(), video, range);
                } else {
                    pipeline = pipeline.with_frame_source(
                        FfmpegCommand::new().with_program(ffmpeg),
                        video,
                        range,
                    );
                }

                #[cfg(not(feature = "ffmpeg"))]
                {
                    pipeline = pipeline.with_frame_source(
                        FfmpegCommand::new().with_program(ffmpeg),
                        video,
                        range,
                    );
                }
            }

            if out.exists() {
                eprintln!(
                    "{} {}",
                    "warning:".yellow().bold(),
                    format!("overwriting {}", out.display()).yellow()
                );
            }

            let report = pipeline.run(&out)?;

            if json {
                let payload = json!({
                    "frames": report.frame_count,
                    "width": report.width,
                    "height": report.height,
                    "output": report.output.display().to_string(),
                    "elapsed_seconds": report.elapsed.as_secs_f64(),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!(
                    "{} {}",
                    "success:".green().bold(),
                    format!(
                        "Wrote {}x{} strip of {} frame(s) to {}",
                        report.width,
                        report.height,
                        report.frame_count,
                        report.output.display()
                    )
                    .green()
                );
            }
        }
        Commands::Inspect {
            json,
            sample,
            frames,
        } => {
            let spec = build_spec(&sample)?;
            let pattern = FramePattern::parse(&frames.pattern)?;
            let report = inspect_frames(&frames.scratch, &pattern, Some(&spec));

            if json {
                let payload = json!({
                    "frames": report.frame_count,
                    "frame_size": report.frame_size.map(|(width, height)| json!({
                        "width": width,
                        "height": height,
                    })),
                    "valid": report.is_valid(),
                    "info": report.info,
                    "warnings": report.warnings,
                    "errors": report.errors,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                print!("{report}");
            }

            if !report.is_valid() {
                return Err("frame directory has errors".into());
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "framestrip", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
