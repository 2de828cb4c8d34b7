//! Polygon metrics and simplification for traced contours.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box of a point set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Closed-polygon perimeter (includes the closing edge).
pub fn perimeter(poly: &[Point2<i32>]) -> f64 {
    let len = poly.len();
    if len < 2 {
        return 0.0;
    }
    let mut p = 0.0;
    let mut j = len - 1;
    for i in 0..len {
        let dx = (poly[i].x - poly[j].x) as f64;
        let dy = (poly[i].y - poly[j].y) as f64;
        p += (dx * dx + dy * dy).sqrt();
        j = i;
    }
    p
}

/// Absolute shoelace area of a closed polygon.
pub fn contour_area(poly: &[Point2<i32>]) -> f64 {
    let len = poly.len();
    if len < 3 {
        return 0.0;
    }
    let mut acc = 0i64;
    let mut j = len - 1;
    for i in 0..len {
        acc += (poly[j].x as i64) * (poly[i].y as i64) - (poly[i].x as i64) * (poly[j].y as i64);
        j = i;
    }
    (acc.abs() as f64) / 2.0
}

pub fn bounding_box(poly: &[Point2<i32>]) -> Option<BoundingBox> {
    let first = poly.first()?;
    let mut min_x = first.x;
    let mut min_y = first.y;
    let mut max_x = first.x;
    let mut max_y = first.y;
    for p in poly {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(BoundingBox {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    })
}

#[inline]
fn point_segment_distance(p: Point2<i32>, a: Point2<i32>, b: Point2<i32>) -> f64 {
    let dx = (b.x - a.x) as f64;
    let dy = (b.y - a.y) as f64;
    let px = (p.x - a.x) as f64;
    let py = (p.y - a.y) as f64;
    let len2 = dx * dx + dy * dy;
    if len2 < 1e-12 {
        return (px * px + py * py).sqrt();
    }
    // Perpendicular distance to the infinite line; anchors are far apart so
    // the segment/line distinction does not matter for simplification.
    (py * dx - px * dy).abs() / len2.sqrt()
}

fn simplify_chain(pts: &[Point2<i32>], eps: f64, out: &mut Vec<Point2<i32>>) {
    // Iterative Douglas-Peucker over index ranges; keeps the first point of
    // every accepted range, never the last (the caller closes the loop).
    let mut stack = vec![(0usize, pts.len() - 1)];
    let mut keep = vec![false; pts.len()];
    keep[0] = true;

    while let Some((lo, hi)) = stack.pop() {
        if hi <= lo + 1 {
            continue;
        }
        let mut max_d = 0.0;
        let mut max_i = lo;
        for i in lo + 1..hi {
            let d = point_segment_distance(pts[i], pts[lo], pts[hi]);
            if d > max_d {
                max_d = d;
                max_i = i;
            }
        }
        if max_d > eps {
            keep[max_i] = true;
            stack.push((lo, max_i));
            stack.push((max_i, hi));
        }
    }

    for (i, &k) in keep.iter().enumerate() {
        if k {
            out.push(pts[i]);
        }
    }
}

/// Douglas-Peucker simplification of a closed contour.
///
/// The contour is split at its two mutually farthest vertices and each half
/// is simplified independently, so the result is stable regardless of where
/// the trace happened to start.
pub fn approx_poly(contour: &[Point2<i32>], epsilon: f64) -> Vec<Point2<i32>> {
    let len = contour.len();
    if len <= 2 {
        return contour.to_vec();
    }

    // Farthest point from vertex 0, then farthest point from that: a cheap
    // diameter approximation giving two stable anchors.
    let far = |from: Point2<i32>| -> usize {
        let mut best = 0;
        let mut best_d = -1.0;
        for (i, p) in contour.iter().enumerate() {
            let dx = (p.x - from.x) as f64;
            let dy = (p.y - from.y) as f64;
            let d = dx * dx + dy * dy;
            if d > best_d {
                best_d = d;
                best = i;
            }
        }
        best
    };
    let a = far(contour[0]);
    let b = far(contour[a]);
    let (a, b) = (a.min(b), a.max(b));
    if a == b {
        return vec![contour[a]];
    }

    let first_half: Vec<Point2<i32>> = contour[a..=b].to_vec();
    let mut second_half: Vec<Point2<i32>> = contour[b..].to_vec();
    second_half.extend_from_slice(&contour[..=a]);

    let mut poly = Vec::new();
    simplify_chain(&first_half, epsilon, &mut poly);
    simplify_chain(&second_half, epsilon, &mut poly);
    poly
}
