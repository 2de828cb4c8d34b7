use crate::Symbol;
use tictrack_core::{contour_area, find_contours, GrayImage};

/// External cell-state classifier seam.
///
/// Implementations receive a fixed-size single-channel cell patch and label
/// it empty, X or O. The production system backs this with a trained model
/// warmed up once at startup; [`ShapeClassifier`] is a dependency-free
/// reference implementation.
pub trait CellClassifier {
    fn classify(&self, patch: &GrayImage) -> Symbol;
}

/// Topology-based reference classifier.
///
/// A drawn O encloses a hole; an X does not. Patches that are almost
/// entirely bright are blank paper. This is far weaker than a trained model
/// on noisy strokes but behaves correctly on clean input and keeps the
/// end-to-end pipeline runnable without external weights.
#[derive(Clone, Copy, Debug)]
pub struct ShapeClassifier {
    /// Mean intensity above which a patch counts as blank.
    pub blank_mean: f32,
    /// Minimum hole area in pixels before a hole counts as an O ring.
    pub min_hole_area: f64,
}

impl Default for ShapeClassifier {
    fn default() -> Self {
        Self {
            blank_mean: 240.0,
            min_hole_area: 4.0,
        }
    }
}

impl CellClassifier for ShapeClassifier {
    fn classify(&self, patch: &GrayImage) -> Symbol {
        if patch.mean_intensity() > self.blank_mean {
            return Symbol::Empty;
        }

        // The patch is bright paper with dark ink, while the contour tracer
        // follows bright regions. Invert so strokes become foreground.
        let inverted = GrayImage {
            width: patch.width,
            height: patch.height,
            data: patch.data.iter().map(|&v| 255 - v).collect(),
        };

        let mut has_ink = false;
        for contour in find_contours(&inverted.view()) {
            if contour.hole && contour_area(&contour.points) >= self.min_hole_area {
                return Symbol::O;
            }
            if !contour.hole && contour_area(&contour.points) >= self.min_hole_area {
                has_ink = true;
            }
        }

        if has_ink {
            Symbol::X
        } else {
            Symbol::Empty
        }
    }
}
