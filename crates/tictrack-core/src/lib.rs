//! Image and geometry primitives for tic-tac-toe board acquisition.
//!
//! This crate is intentionally small and knows nothing about boards, cells or
//! moves. It provides the raster types, the contour machinery and the
//! perspective math the `tictrack` pipeline is built from.

mod contour;
mod filters;
mod geometry;
mod homography;
mod image;
mod logger;

pub use contour::{find_contours, Contour};
pub use filters::{
    adaptive_threshold_mean, box_blur, box_blur_rgb, dilate3, erode3, rgb_to_gray, stroke_contour,
};
pub use geometry::{approx_poly, bounding_box, contour_area, perimeter, BoundingBox};
pub use homography::{homography_from_4pt, warp_perspective_gray, warp_perspective_rgb, Homography};
pub use image::{mirror_horizontal, sample_bilinear, sample_bilinear_u8, GrayImage, GrayImageView, RgbImage};
pub use logger::init_with_level;
