use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// A 4-point polygon approximation of a contour, stored in canonical corner
/// order: top-left, bottom-left, bottom-right, top-right.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub corners: [Point2<f32>; 4],
}

impl Quad {
    /// Canonicalize four unordered points.
    ///
    /// Corner assignment: top-left minimizes x+y, bottom-right maximizes x+y,
    /// bottom-left minimizes x-y, top-right maximizes x-y. This is robust to
    /// arbitrary traversal order and rotation within roughly +/-45 degrees;
    /// under extreme perspective skew two corners can swap roles. That
    /// limitation is intentional for behavioral parity with the reference
    /// system.
    pub fn canonicalize(points: &[Point2<f32>; 4]) -> Self {
        Self::enclosing(points)
    }

    /// Same extreme-corner rule, applied to an arbitrary vertex list.
    pub fn enclosing(points: &[Point2<f32>]) -> Self {
        debug_assert!(!points.is_empty());
        let mut tl = points[0];
        let mut bl = points[0];
        let mut br = points[0];
        let mut tr = points[0];
        for &p in points {
            if p.x + p.y < tl.x + tl.y {
                tl = p;
            }
            if p.x + p.y > br.x + br.y {
                br = p;
            }
            if p.x - p.y < bl.x - bl.y {
                bl = p;
            }
            if p.x - p.y > tr.x - tr.y {
                tr = p;
            }
        }
        Self {
            corners: [tl, bl, br, tr],
        }
    }

    pub fn from_i32(points: &[Point2<i32>]) -> Self {
        let pts: Vec<Point2<f32>> = points
            .iter()
            .map(|p| Point2::new(p.x as f32, p.y as f32))
            .collect();
        Self::enclosing(&pts)
    }

    /// Arithmetic mean of the four corners.
    pub fn centroid(&self) -> Point2<f32> {
        let mut cx = 0.0;
        let mut cy = 0.0;
        for c in &self.corners {
            cx += c.x;
            cy += c.y;
        }
        Point2::new(cx / 4.0, cy / 4.0)
    }

    /// Shoelace area of the ordered corners.
    pub fn area(&self) -> f32 {
        let c = &self.corners;
        let mut acc = 0.0;
        let mut j = 3;
        for i in 0..4 {
            acc += c[j].x * c[i].y - c[i].x * c[j].y;
            j = i;
        }
        (acc / 2.0).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> Point2<f32> {
        Point2::new(x, y)
    }

    #[test]
    fn orders_corners_regardless_of_input_order() {
        let expected = [p(0.0, 0.0), p(1.0, 10.0), p(11.0, 11.0), p(10.0, 1.0)];
        let shuffled = [expected[2], expected[0], expected[3], expected[1]];
        let q = Quad::canonicalize(&shuffled);
        assert_eq!(q.corners, expected);
    }

    #[test]
    fn canonicalization_is_idempotent() {
        let q = Quad::canonicalize(&[p(3.0, 1.0), p(0.5, 8.0), p(9.0, 9.5), p(0.0, 0.0)]);
        let again = Quad::canonicalize(&q.corners);
        assert_eq!(q, again);
    }

    #[test]
    fn survives_moderate_rotation() {
        // Unit square rotated by 30 degrees about its center.
        let center = p(5.0, 5.0);
        let (s, c) = (30.0_f32.to_radians().sin(), 30.0_f32.to_radians().cos());
        let rot = |q: Point2<f32>| {
            let dx = q.x - center.x;
            let dy = q.y - center.y;
            p(center.x + c * dx - s * dy, center.y + s * dx + c * dy)
        };
        let tl = rot(p(3.0, 3.0));
        let bl = rot(p(3.0, 7.0));
        let br = rot(p(7.0, 7.0));
        let tr = rot(p(7.0, 3.0));

        let q = Quad::canonicalize(&[br, tl, tr, bl]);
        assert_eq!(q.corners, [tl, bl, br, tr]);
    }

    #[test]
    fn centroid_and_area_of_axis_aligned_square() {
        let q = Quad::canonicalize(&[p(0.0, 0.0), p(0.0, 4.0), p(4.0, 4.0), p(4.0, 0.0)]);
        assert_eq!(q.centroid(), p(2.0, 2.0));
        assert!((q.area() - 16.0).abs() < 1e-6);
    }

    #[test]
    fn enclosing_picks_extremes_from_many_vertices() {
        let pts = vec![
            p(1.0, 1.0),
            p(5.0, 0.5),
            p(9.0, 1.0),
            p(9.5, 5.0),
            p(9.0, 9.0),
            p(5.0, 9.5),
            p(1.0, 9.0),
            p(0.5, 5.0),
        ];
        let q = Quad::enclosing(&pts);
        assert_eq!(q.corners[0], p(1.0, 1.0));
        assert_eq!(q.corners[2], p(9.0, 9.0));
    }
}
