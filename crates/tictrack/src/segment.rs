use crate::{rectify_gray, Quad, RectifyMap};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use tictrack_core::{
    approx_poly, bounding_box, contour_area, dilate3, erode3, find_contours, perimeter,
    stroke_contour, GrayImage, GrayImageView,
};

/// One candidate cell inside the canonical grid frame.
#[derive(Clone, Debug)]
pub struct Cell {
    /// Simplified contour in canonical-frame coordinates.
    pub contour: Vec<Point2<i32>>,
    /// Classifier-sized sub-image extracted from the canonical frame.
    pub patch: GrayImage,
}

/// Cell segmentation thresholds. All ratios are relative to the canonical
/// grid frame; the defaults are empirically tuned for hand-drawn grids and
/// typically need recalibration per camera and lighting setup.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SegmentParams {
    /// Polygon approximation epsilon as a fraction of contour perimeter.
    pub approx_epsilon_frac: f64,
    /// Exclusive lower bound on cell area / frame area.
    pub min_area_frac: f64,
    /// Exclusive upper bound on cell area / frame area.
    pub max_area_frac: f64,
    /// Approximated polygon must have fewer vertices than this.
    pub max_vertices: usize,
    /// Minimum bounding-box aspect ratio (both w/h and h/w).
    pub min_aspect: f64,
    /// Maximum bounding-box area / frame area.
    pub max_bbox_frac: f64,
    /// Stroke width used to re-draw boundaries between passes.
    pub stroke_thickness: i32,
    /// Extracted patch width (classifier input).
    pub patch_width: usize,
    /// Extracted patch height (classifier input).
    pub patch_height: usize,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            approx_epsilon_frac: 0.02,
            min_area_frac: 0.02,
            max_area_frac: 0.2,
            max_vertices: 7,
            min_aspect: 0.5,
            max_bbox_frac: 0.5,
            stroke_thickness: 10,
            patch_width: 30,
            patch_height: 20,
        }
    }
}

/// Segment the canonical binary grid frame into candidate cells.
///
/// Closes broken grid lines with one dilate/erode round, then widens the
/// boundaries between regions by stroking every traced contour with
/// background before tracing a second time. Each surviving contour is
/// filtered for cell-like shape and extracted as a patch. The caller decides
/// what to do when the count is not exactly nine.
pub fn segment_cells(canonical: &GrayImageView<'_>, params: &SegmentParams) -> Vec<Cell> {
    let closed = erode3(&dilate3(canonical).view());

    let mut separated = closed.clone();
    for contour in find_contours(&closed.view()) {
        stroke_contour(&mut separated, &contour, params.stroke_thickness, 0);
    }

    let frame_area = (canonical.width * canonical.height) as f64;
    let mut cells = Vec::new();

    for contour in find_contours(&separated.view()) {
        let eps = params.approx_epsilon_frac * perimeter(&contour.points);
        let poly = approx_poly(&contour.points, eps);
        if poly.len() >= params.max_vertices || poly.len() < 3 {
            continue;
        }

        let area = contour_area(&poly) / frame_area;
        if area <= params.min_area_frac || area >= params.max_area_frac {
            continue;
        }

        let Some(bb) = bounding_box(&poly) else {
            continue;
        };
        let (w, h) = (bb.width as f64, bb.height as f64);
        if w / h < params.min_aspect || h / w < params.min_aspect {
            continue;
        }
        if w * h / frame_area > params.max_bbox_frac {
            continue;
        }

        let quad = Quad::from_i32(&poly);
        let Some(map) = RectifyMap::to_patch(&quad, params.patch_width, params.patch_height) else {
            continue;
        };
        let patch = rectify_gray(&closed.view(), &map);

        cells.push(Cell {
            contour: poly,
            patch,
        });
    }

    log::debug!("segmented {} cell candidate(s)", cells.len());
    cells
}
