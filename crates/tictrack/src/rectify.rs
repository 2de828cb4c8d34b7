use crate::Quad;
use nalgebra::Point2;
use tictrack_core::{
    homography_from_4pt, warp_perspective_gray, warp_perspective_rgb, GrayImage, GrayImageView,
    Homography, RgbImage,
};

/// First-class perspective transform for one frame.
///
/// Computed once per located quadrilateral and applied to both the binary and
/// the color image, so the two rectified outputs stay pixel-aligned.
#[derive(Clone, Copy, Debug)]
pub struct RectifyMap {
    /// Maps canonical (rectified) coordinates into source image coordinates.
    pub img_from_rect: Homography,
    pub out_width: usize,
    pub out_height: usize,
}

impl RectifyMap {
    /// Build the transform mapping `quad` onto an axis-aligned square sized
    /// from the source dimensions plus `margin` of pad, with a `margin` inset
    /// on every side.
    ///
    /// Returns `None` for degenerate quadrilaterals whose homography is
    /// singular; callers treat that as "no board found".
    pub fn new(quad: &Quad, src_width: usize, src_height: usize, margin: f32) -> Option<Self> {
        let w = src_width as f32;
        let h = src_height as f32;
        // Canonical targets in TL, BL, BR, TR order, matching Quad.
        let rect = [
            Point2::new(margin, margin),
            Point2::new(margin, h - margin),
            Point2::new(w - margin, h - margin),
            Point2::new(w - margin, margin),
        ];
        let img_from_rect = homography_from_4pt(&rect, &quad.corners)?;
        Some(Self {
            img_from_rect,
            out_width: src_width + margin as usize,
            out_height: src_height + margin as usize,
        })
    }

    /// Transform targeting a fixed patch size with no margin, used to extract
    /// classifier-sized cell sub-images.
    pub fn to_patch(quad: &Quad, patch_width: usize, patch_height: usize) -> Option<Self> {
        let w = patch_width as f32;
        let h = patch_height as f32;
        let rect = [
            Point2::new(0.0, 0.0),
            Point2::new(0.0, h),
            Point2::new(w, h),
            Point2::new(w, 0.0),
        ];
        let img_from_rect = homography_from_4pt(&rect, &quad.corners)?;
        Some(Self {
            img_from_rect,
            out_width: patch_width,
            out_height: patch_height,
        })
    }

    /// Inverse mapping: canonical rectangle corners back to the quadrilateral.
    pub fn rect_from_img(&self) -> Option<Homography> {
        self.img_from_rect.inverse()
    }
}

/// Warp the binary/grayscale source into the canonical grid frame.
pub fn rectify_gray(src: &GrayImageView<'_>, map: &RectifyMap) -> GrayImage {
    warp_perspective_gray(src, map.img_from_rect, map.out_width, map.out_height)
}

/// Warp the color source with the identical transform parameters.
pub fn rectify_rgb(src: &RgbImage, map: &RectifyMap) -> RgbImage {
    warp_perspective_rgb(src, map.img_from_rect, map.out_width, map.out_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;
    use tictrack_core::GrayImage;

    fn p(x: f32, y: f32) -> Point2<f32> {
        Point2::new(x, y)
    }

    #[test]
    fn canonical_corners_round_trip_to_quad_corners() {
        let quad = Quad::canonicalize(&[p(30.0, 20.0), p(25.0, 180.0), p(200.0, 190.0), p(210.0, 35.0)]);
        let map = RectifyMap::new(&quad, 320, 240, 10.0).expect("non-degenerate");

        let rect = [
            p(10.0, 10.0),
            p(10.0, 230.0),
            p(310.0, 230.0),
            p(310.0, 10.0),
        ];
        for (r, q) in rect.iter().zip(quad.corners.iter()) {
            let mapped = map.img_from_rect.apply(*r);
            assert!((mapped.x - q.x).abs() < 0.5 && (mapped.y - q.y).abs() < 0.5);
        }

        // And back again through the inverse.
        let inv = map.rect_from_img().expect("invertible");
        for (r, q) in rect.iter().zip(quad.corners.iter()) {
            let back = inv.apply(*q);
            assert!((back.x - r.x).abs() < 0.5 && (back.y - r.y).abs() < 0.5);
        }
    }

    #[test]
    fn degenerate_quadrilateral_is_rejected() {
        let quad = Quad {
            corners: [p(5.0, 5.0), p(5.0, 5.0), p(5.0, 5.0), p(5.0, 5.0)],
        };
        assert!(RectifyMap::new(&quad, 100, 100, 10.0).is_none());
    }

    #[test]
    fn warp_of_uniform_image_is_uniform() {
        let quad = Quad::canonicalize(&[p(10.0, 10.0), p(10.0, 50.0), p(50.0, 50.0), p(50.0, 10.0)]);
        let map = RectifyMap::new(&quad, 64, 64, 10.0).expect("non-degenerate");
        let src = GrayImage {
            width: 64,
            height: 64,
            data: vec![180; 64 * 64],
        };
        let out = rectify_gray(&src.view(), &map);
        assert_eq!(out.width, 74);
        assert_eq!(out.height, 74);
        // Interior pixels map inside the uniform source.
        assert_eq!(out.data[37 * 74 + 37], 180);
    }
}
