use crate::Quad;
use tictrack_core::{approx_poly, contour_area, find_contours, perimeter, GrayImageView};

/// Find the quadrilateral most likely to be the outer board boundary.
///
/// Every contour is simplified at `approx_epsilon_frac` of its perimeter;
/// candidates must have exactly four vertices and cover less than
/// `max_area_frac` of the frame (rejecting the full-frame border). The
/// largest surviving candidate wins. `None` means no board in this frame.
pub fn locate_grid(
    binary: &GrayImageView<'_>,
    approx_epsilon_frac: f64,
    max_area_frac: f64,
) -> Option<Quad> {
    let total_area = (binary.width * binary.height) as f64;
    let mut best: Option<(f64, Quad)> = None;

    for contour in find_contours(binary) {
        let eps = approx_epsilon_frac * perimeter(&contour.points);
        let poly = approx_poly(&contour.points, eps);
        if poly.len() != 4 {
            continue;
        }

        let area = contour_area(&contour.points);
        if area / total_area >= max_area_frac {
            continue;
        }
        if best.as_ref().is_none_or(|(a, _)| area > *a) {
            best = Some((area, Quad::from_i32(&poly)));
        }
    }

    let (area, quad) = best?;
    log::debug!(
        "grid candidate area {:.0}px ({:.1}% of frame)",
        area,
        100.0 * area / total_area
    );
    Some(quad)
}
