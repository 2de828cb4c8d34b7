//! Run the board acquisition pipeline over one or more still frames.
//!
//! Frames are processed in argument order with a configurable simulated
//! inter-frame interval, and a one-line JSON summary is printed per frame.
//! Live capture and display plumbing are deliberately out of scope here.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tictrack::{
    FrameReport, HeuristicResolver, Pipeline, PipelineParams, ShapeClassifier, Symbol,
};
use tictrack_core::RgbImage;

#[derive(Parser, Debug)]
#[command(name = "tictrack", about = "Tic-tac-toe board detection on still frames")]
struct Cli {
    /// Input frames, processed in order.
    #[arg(required = true)]
    frames: Vec<PathBuf>,

    /// JSON file with pipeline parameter overrides.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Simulated time between frames, in milliseconds.
    #[arg(long, default_value_t = 33)]
    frame_interval_ms: u64,

    /// Directory to write annotated frames into (same file names).
    #[arg(long)]
    annotate_dir: Option<PathBuf>,

    /// Log verbosity: error, warn, info, debug or trace.
    #[arg(long, default_value = "warn")]
    log_level: log::LevelFilter,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("failed to read frame {path}: {source}")]
    FrameRead {
        path: String,
        source: image::ImageError,
    },
    #[error("failed to write annotated frame {path}: {source}")]
    FrameWrite {
        path: String,
        source: image::ImageError,
    },
    #[error("failed to read params file: {0}")]
    ParamsRead(#[from] std::io::Error),
    #[error("invalid params file: {0}")]
    ParamsParse(#[from] serde_json::Error),
    #[error(transparent)]
    Params(#[from] tictrack::ParamsError),
}

fn load_params(path: Option<&Path>) -> Result<PipelineParams, CliError> {
    match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)?;
            Ok(serde_json::from_str(&text)?)
        }
        None => Ok(PipelineParams::default()),
    }
}

fn load_frame(path: &Path) -> Result<RgbImage, CliError> {
    let img = image::ImageReader::open(path)
        .map_err(|e| CliError::FrameRead {
            path: path.display().to_string(),
            source: e.into(),
        })?
        .decode()
        .map_err(|e| CliError::FrameRead {
            path: path.display().to_string(),
            source: e,
        })?
        .to_rgb8();
    Ok(RgbImage {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.into_raw(),
    })
}

fn save_frame(path: &Path, frame: &RgbImage) -> Result<(), CliError> {
    image::save_buffer(
        path,
        &frame.data,
        frame.width as u32,
        frame.height as u32,
        image::ExtendedColorType::Rgb8,
    )
    .map_err(|e| CliError::FrameWrite {
        path: path.display().to_string(),
        source: e,
    })
}

fn symbol_char(s: Symbol) -> char {
    match s {
        Symbol::Empty => '.',
        Symbol::X => 'x',
        Symbol::O => 'o',
    }
}

fn summarize(path: &Path, report: &FrameReport) -> serde_json::Value {
    let board: Option<String> = report
        .board
        .map(|b| b.0.iter().map(|&s| symbol_char(s)).collect());
    let overlay = report.overlay.as_ref().map(|o| {
        serde_json::json!({
            "mark": o.mark.glyph().to_string(),
            "x": o.position.x,
            "y": o.position.y,
            "stroke": o.stroke,
        })
    });
    serde_json::json!({
        "frame": path.display().to_string(),
        "board_found": report.board_found,
        "cells_found": report.cells_found,
        "board": board,
        "overlay": overlay,
    })
}

fn run(cli: Cli) -> Result<(), CliError> {
    let params = load_params(cli.params.as_deref())?;
    let mut pipeline = Pipeline::new(params, ShapeClassifier::default(), HeuristicResolver)?;

    let t0 = Instant::now();
    let interval = Duration::from_millis(cli.frame_interval_ms);

    for (i, path) in cli.frames.iter().enumerate() {
        let frame = load_frame(path)?;
        let now = t0 + interval * i as u32;
        let report = pipeline.process(&frame, now);

        println!("{}", summarize(path, &report));

        if let Some(dir) = &cli.annotate_dir {
            std::fs::create_dir_all(dir)?;
            let name = path.file_name().unwrap_or_default();
            save_frame(&dir.join(name), &report.frame)?;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let _ = tictrack_core::init_with_level(cli.log_level);

    if let Err(err) = run(cli) {
        log::error!("{err}");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
