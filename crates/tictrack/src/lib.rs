//! Tic-tac-toe board acquisition and spatial registration.
//!
//! The pipeline locates a hand-drawn 3x3 grid in a camera frame, rectifies it
//! into a canonical square, segments and orders the nine cells, tracks
//! detection validity across frames, and maps a suggested move back into
//! frame pixel coordinates for overlay rendering.
//!
//! Cell classification and move resolution are external collaborators behind
//! the [`CellClassifier`] and [`MoveResolver`] traits; small reference
//! implementations are included so the end-to-end path is runnable without
//! an external model or solver.

mod board;
mod classify;
mod locate;
mod order;
mod overlay;
mod pipeline;
mod preprocess;
mod quad;
mod rectify;
mod resolve;
mod segment;
mod tracker;

pub use board::{BoardState, Mark, SuggestedMove, Symbol};
pub use classify::{CellClassifier, ShapeClassifier};
pub use locate::locate_grid;
pub use order::order_cells;
pub use overlay::{draw_mark, locate_overlay, OverlayPlacement};
pub use pipeline::{FrameReport, Pipeline, PipelineParams, ParamsError};
pub use preprocess::{preprocess, PreprocessedFrame};
pub use quad::Quad;
pub use rectify::{rectify_gray, rectify_rgb, RectifyMap};
pub use resolve::{HeuristicResolver, MoveResolver};
pub use segment::{segment_cells, Cell, SegmentParams};
pub use tracker::{BoardTracker, TrackedDetection};
