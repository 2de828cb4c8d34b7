use crate::{Mark, Quad, TrackedDetection};
use nalgebra::Point2;
use tictrack_core::{homography_from_4pt, RgbImage};

/// Where and how large to render the suggested mark in frame coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayPlacement {
    pub position: Point2<f32>,
    pub mark: Mark,
    /// Detected-board size relative to the reference area; scales the glyph.
    pub image_ratio: f32,
    /// Stroke width in pixels, clamped to a legible minimum.
    pub stroke: i32,
}

/// Map the suggested cell's canonical-space centroid back into frame pixel
/// coordinates through the inverse of the rectification mapping.
///
/// `reference_area` is the outer-contour area at which the glyph renders at
/// unit scale. Returns `None` when the saved outer quadrilateral is too
/// degenerate to invert.
pub fn locate_overlay(
    detection: &TrackedDetection,
    reference_area: f32,
) -> Option<OverlayPlacement> {
    let contour = detection.cell_contours.get(detection.suggestion.cell)?;
    if contour.is_empty() {
        return None;
    }
    let centroid = Quad::from_i32(contour).centroid();

    // Canonical rectangle corners in TL, BL, BR, TR order; no margin, the
    // full rectified frame maps onto the outer quadrilateral.
    let (w, h) = detection.canonical_size;
    let rect = [
        Point2::new(0.0, 0.0),
        Point2::new(0.0, h as f32),
        Point2::new(w as f32, h as f32),
        Point2::new(w as f32, 0.0),
    ];
    let h_img_from_rect = homography_from_4pt(&rect, &detection.outer_quad.corners)?;
    let position = h_img_from_rect.apply(centroid);

    let image_ratio = detection.outer_quad.area() / reference_area;
    let stroke = ((2.0 * image_ratio) as i32).max(2);

    Some(OverlayPlacement {
        position,
        mark: detection.suggestion.mark,
        image_ratio,
        stroke,
    })
}

fn draw_segment(img: &mut RgbImage, a: Point2<f32>, b: Point2<f32>, half: f32, color: [u8; 3]) {
    let min_x = (a.x.min(b.x) - half).floor().max(0.0) as usize;
    let max_x = (a.x.max(b.x) + half).ceil().min(img.width as f32 - 1.0) as usize;
    let min_y = (a.y.min(b.y) - half).floor().max(0.0) as usize;
    let max_y = (a.y.max(b.y) + half).ceil().min(img.height as f32 - 1.0) as usize;

    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len2 = dx * dx + dy * dy;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = x as f32 - a.x;
            let py = y as f32 - a.y;
            let t = if len2 > 1e-6 {
                ((px * dx + py * dy) / len2).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let ex = px - t * dx;
            let ey = py - t * dy;
            if ex * ex + ey * ey <= half * half {
                img.set_pixel(x, y, color);
            }
        }
    }
}

/// Stamp the suggested mark onto the output frame.
///
/// The glyph half-size scales with the image ratio so the overlay stays
/// legible as the camera moves closer or further from the board.
pub fn draw_mark(img: &mut RgbImage, placement: &OverlayPlacement) {
    let c = placement.position;
    let half_size = (10.0 * placement.image_ratio).max(4.0);
    let half_stroke = placement.stroke as f32 / 2.0;
    let color = [0, 0, 0];

    match placement.mark {
        Mark::X => {
            draw_segment(
                img,
                Point2::new(c.x - half_size, c.y - half_size),
                Point2::new(c.x + half_size, c.y + half_size),
                half_stroke,
                color,
            );
            draw_segment(
                img,
                Point2::new(c.x - half_size, c.y + half_size),
                Point2::new(c.x + half_size, c.y - half_size),
                half_stroke,
                color,
            );
        }
        Mark::O => {
            // Ring as short chords around the circle.
            let steps = 24;
            for k in 0..steps {
                let a0 = (k as f32 / steps as f32) * std::f32::consts::TAU;
                let a1 = ((k + 1) as f32 / steps as f32) * std::f32::consts::TAU;
                draw_segment(
                    img,
                    Point2::new(c.x + half_size * a0.cos(), c.y + half_size * a0.sin()),
                    Point2::new(c.x + half_size * a1.cos(), c.y + half_size * a1.sin()),
                    half_stroke,
                    color,
                );
            }
        }
    }
}
