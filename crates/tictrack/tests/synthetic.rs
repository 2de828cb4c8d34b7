//! End-to-end pipeline runs over synthetic rendered frames.

use std::time::{Duration, Instant};
use tictrack::{
    BoardState, HeuristicResolver, Mark, Pipeline, PipelineParams, ShapeClassifier, Symbol,
};
use tictrack_core::RgbImage;

/// White 240x240 frame with a black 3x3 grid drawn from x,y = 40 to 200
/// (4 px line width), like a thresholder-friendly pen-drawn board. The grid
/// is horizontally symmetric so the preprocessing mirror leaves it in place.
fn grid_frame() -> RgbImage {
    let size = 240;
    let mut img = RgbImage {
        width: size,
        height: size,
        data: vec![255; 3 * size * size],
    };
    let bands = [40usize, 92, 144, 196];
    for &b in &bands {
        for t in 0..4 {
            for i in 40..200 {
                img.set_pixel(b + t, i, [0, 0, 0]);
                img.set_pixel(i, b + t, [0, 0, 0]);
            }
        }
    }
    img
}

fn blank_frame() -> RgbImage {
    RgbImage {
        width: 240,
        height: 240,
        data: vec![255; 3 * 240 * 240],
    }
}

fn pipeline() -> Pipeline<ShapeClassifier, HeuristicResolver> {
    Pipeline::new(
        PipelineParams::default(),
        ShapeClassifier::default(),
        HeuristicResolver,
    )
    .expect("default params")
}

#[test]
fn blank_grid_classifies_all_empty_and_suggests_center() {
    let mut pl = pipeline();
    let report = pl.process(&grid_frame(), Instant::now());

    assert!(report.board_found, "grid boundary should be located");
    assert_eq!(report.cells_found, 9);
    assert_eq!(report.board, Some(BoardState([Symbol::Empty; 9])));

    let overlay = report.overlay.expect("resolver should suggest a move");
    assert_eq!(overlay.mark, Mark::X);
    // Center cell of a board spanning 40..200 maps near (120, 120).
    assert!(
        (overlay.position.x - 120.0).abs() < 30.0,
        "overlay x = {}",
        overlay.position.x
    );
    assert!(
        (overlay.position.y - 120.0).abs() < 30.0,
        "overlay y = {}",
        overlay.position.y
    );
    assert!(overlay.stroke >= 2);
}

#[test]
fn color_frame_is_rectified_alongside_the_binary() {
    let mut pl = pipeline();
    let report = pl.process(&grid_frame(), Instant::now());

    // Canonical frame is source size plus the rectification margin.
    let rectified = report.rectified.expect("board boundary was rectified");
    assert_eq!(rectified.width, 250);
    assert_eq!(rectified.height, 250);

    // The board interior fills the margin-inset square: the center of the
    // center cell is white paper, the top grid line lands just inside it.
    assert_eq!(rectified.pixel(125, 125), [255, 255, 255]);
    let top_line = rectified.pixel(125, 13);
    assert!(top_line.iter().all(|&v| v < 100), "top line = {top_line:?}");
}

#[test]
fn overlay_survives_dropouts_within_the_staleness_window() {
    let mut pl = pipeline();
    let t0 = Instant::now();

    let report = pl.process(&grid_frame(), t0);
    assert!(report.overlay.is_some());

    // Detection dropout at t = 0.3 s: no board in frame, overlay persists.
    let report = pl.process(&blank_frame(), t0 + Duration::from_millis(300));
    assert!(!report.board_found);
    assert!(report.overlay.is_some());

    // Still no detection by t = 0.6 s: overlay suppressed, state retained.
    let report = pl.process(&blank_frame(), t0 + Duration::from_millis(600));
    assert!(report.overlay.is_none());
    assert!(pl.tracker().saved().is_some());

    // A fresh detection re-arms the overlay.
    let report = pl.process(&grid_frame(), t0 + Duration::from_secs(2));
    assert!(report.overlay.is_some());
}

#[test]
fn featureless_frames_never_panic_or_detect() {
    let mut pl = pipeline();
    let mut noisy = blank_frame();
    for (i, v) in noisy.data.iter_mut().enumerate() {
        *v = ((i * 31) % 256) as u8;
    }
    let report = pl.process(&noisy, Instant::now());
    assert!(report.board.is_none());
    assert!(report.overlay.is_none());
}

#[test]
fn drawn_overlay_darkens_pixels_at_the_suggested_cell() {
    let mut pl = pipeline();
    let report = pl.process(&grid_frame(), Instant::now());
    let overlay = report.overlay.expect("placement");

    let x = overlay.position.x.round() as usize;
    let y = overlay.position.y.round() as usize;
    assert_eq!(report.frame.pixel(x, y), [0, 0, 0]);
}
