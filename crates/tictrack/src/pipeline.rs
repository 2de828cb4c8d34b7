use crate::{
    locate_grid, locate_overlay, order_cells, preprocess, rectify_gray, rectify_rgb, segment_cells,
    BoardState,
    BoardTracker, CellClassifier, MoveResolver, OverlayPlacement, RectifyMap, SegmentParams,
    Symbol, TrackedDetection,
};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tictrack_core::RgbImage;

/// Configuration for the acquisition pipeline.
///
/// Every threshold is an empirically tuned constant and usually needs
/// recalibration per camera and lighting setup.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineParams {
    /// Blur kernel applied before thresholding.
    pub blur_kernel: usize,
    /// Adaptive threshold window; large relative to the expected cell size.
    pub threshold_window: usize,
    /// Adaptive threshold offset.
    pub threshold_offset: i32,
    /// Grid-locator polygon approximation epsilon (fraction of perimeter).
    pub grid_epsilon_frac: f64,
    /// Grid candidates must cover less than this fraction of the frame.
    pub grid_max_area_frac: f64,
    /// Margin inset of the canonical grid frame, in pixels.
    pub rectify_margin: f32,
    /// Cell segmentation thresholds.
    pub segment: SegmentParams,
    /// Cells brighter than this mean intensity are forced to empty,
    /// suppressing false positives on blank paper.
    pub brightness_override: f32,
    /// How long a detection stays displayable without reconfirmation.
    pub staleness: Duration,
    /// Outer-contour area at which the overlay renders at unit scale.
    pub overlay_reference_area: f32,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            blur_kernel: 3,
            threshold_window: 51,
            threshold_offset: 3,
            grid_epsilon_frac: 0.01,
            grid_max_area_frac: 0.9,
            rectify_margin: 10.0,
            segment: SegmentParams::default(),
            brightness_override: 250.0,
            staleness: Duration::from_millis(500),
            overlay_reference_area: 10_000.0,
        }
    }
}

/// Errors raised by parameter validation.
#[derive(thiserror::Error, Debug)]
pub enum ParamsError {
    #[error("kernel/window sizes must be odd (got {name}={got})")]
    EvenWindow { name: &'static str, got: usize },
    #[error("area fraction {name}={got} outside (0, 1)")]
    BadAreaFraction { name: &'static str, got: f64 },
    #[error("cell area bounds inverted (min {min} >= max {max})")]
    InvertedAreaBounds { min: f64, max: f64 },
    #[error("patch dimensions must be non-zero")]
    EmptyPatch,
}

impl PipelineParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.blur_kernel % 2 == 0 {
            return Err(ParamsError::EvenWindow {
                name: "blur_kernel",
                got: self.blur_kernel,
            });
        }
        if self.threshold_window % 2 == 0 {
            return Err(ParamsError::EvenWindow {
                name: "threshold_window",
                got: self.threshold_window,
            });
        }
        for (name, v) in [
            ("grid_max_area_frac", self.grid_max_area_frac),
            ("segment.min_area_frac", self.segment.min_area_frac),
            ("segment.max_area_frac", self.segment.max_area_frac),
            ("segment.max_bbox_frac", self.segment.max_bbox_frac),
        ] {
            if !(0.0..1.0).contains(&v) || v == 0.0 {
                return Err(ParamsError::BadAreaFraction { name, got: v });
            }
        }
        if self.segment.min_area_frac >= self.segment.max_area_frac {
            return Err(ParamsError::InvertedAreaBounds {
                min: self.segment.min_area_frac,
                max: self.segment.max_area_frac,
            });
        }
        if self.segment.patch_width == 0 || self.segment.patch_height == 0 {
            return Err(ParamsError::EmptyPatch);
        }
        Ok(())
    }
}

/// What happened during one frame.
#[derive(Clone, Debug)]
pub struct FrameReport {
    /// Whether the grid locator found a board boundary this frame.
    pub board_found: bool,
    /// Number of cell candidates that passed segmentation filters.
    pub cells_found: usize,
    /// Classified board, present only on an exactly-9-cell frame.
    pub board: Option<BoardState>,
    /// Overlay placement rendered this frame, if the tracker is displayable.
    pub overlay: Option<OverlayPlacement>,
    /// Color frame warped into the canonical grid frame, present whenever a
    /// boundary was rectified this frame.
    pub rectified: Option<RgbImage>,
    /// Mirrored color frame with the overlay mark drawn in.
    pub frame: RgbImage,
}

/// The per-frame processing pipeline.
///
/// Owns the board tracker (the only cross-frame state) and the external
/// classifier/resolver collaborators. Time is injected through
/// [`Pipeline::process`] so temporal behavior is testable without a camera.
pub struct Pipeline<C, R> {
    params: PipelineParams,
    tracker: BoardTracker,
    classifier: C,
    resolver: R,
}

impl<C: CellClassifier, R: MoveResolver> Pipeline<C, R> {
    pub fn new(params: PipelineParams, classifier: C, resolver: R) -> Result<Self, ParamsError> {
        params.validate()?;
        let tracker = BoardTracker::new(params.staleness);
        Ok(Self {
            params,
            tracker,
            classifier,
            resolver,
        })
    }

    pub fn params(&self) -> &PipelineParams {
        &self.params
    }

    pub fn tracker(&self) -> &BoardTracker {
        &self.tracker
    }

    /// Run all pipeline stages on one captured frame.
    ///
    /// Detection failures (no board, wrong cell count, degenerate geometry,
    /// resolver declining) are frame-local: the previous tracked detection
    /// survives them and the overlay keeps rendering until it goes stale.
    pub fn process(&mut self, frame: &RgbImage, now: Instant) -> FrameReport {
        let p = &self.params;
        let pre = preprocess(
            frame,
            p.blur_kernel,
            p.threshold_window,
            p.threshold_offset,
        );

        let located = locate_grid(&pre.binary.view(), p.grid_epsilon_frac, p.grid_max_area_frac);
        let board_found = located.is_some();
        let mut cells_found = 0;
        let mut board = None;
        let mut rectified = None;

        if let Some(quad) = located {
            // One transform value for the frame, reused by both warps so the
            // binary and color outputs stay pixel-aligned.
            if let Some(map) =
                RectifyMap::new(&quad, pre.binary.width, pre.binary.height, p.rectify_margin)
            {
                let canonical = rectify_gray(&pre.binary.view(), &map);
                rectified = Some(rectify_rgb(&pre.color, &map));

                let cells = segment_cells(&canonical.view(), &p.segment);
                cells_found = cells.len();

                if cells.len() == 9 {
                    let cells = order_cells(cells);

                    let mut symbols = [Symbol::Empty; 9];
                    for (i, cell) in cells.iter().enumerate() {
                        symbols[i] = if cell.patch.mean_intensity() > p.brightness_override {
                            Symbol::Empty
                        } else {
                            self.classifier.classify(&cell.patch)
                        };
                    }
                    let state = BoardState(symbols);
                    board = Some(state);

                    if let Some(suggestion) = self.resolver.resolve(&state) {
                        self.tracker.accept(TrackedDetection {
                            board: state,
                            outer_quad: quad,
                            cell_contours: cells.into_iter().map(|c| c.contour).collect(),
                            canonical_size: (canonical.width, canonical.height),
                            suggestion,
                            last_seen: now,
                        });
                    } else {
                        log::debug!("resolver declined: board full, decided or inconsistent");
                    }
                } else {
                    log::trace!("cell count {} != 9, keeping previous detection", cells.len());
                }
            } else {
                log::debug!("degenerate board quadrilateral, treating as not found");
            }
        }

        let mut out = pre.color;
        let overlay = self
            .tracker
            .displayable(now)
            .and_then(|det| locate_overlay(det, p.overlay_reference_area));
        if let Some(placement) = &overlay {
            crate::draw_mark(&mut out, placement);
        }

        FrameReport {
            board_found,
            cells_found,
            board,
            overlay,
            rectified,
            frame: out,
        }
    }
}
