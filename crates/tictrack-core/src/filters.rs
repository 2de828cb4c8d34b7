//! Raster filters: grayscale conversion, blur, adaptive thresholding and
//! binary 3x3 morphology.

use crate::{Contour, GrayImage, GrayImageView, RgbImage};

/// Weighted RGB-to-luma conversion (0.299 R + 0.587 G + 0.114 B).
pub fn rgb_to_gray(src: &RgbImage) -> GrayImage {
    let mut out = GrayImage::new(src.width, src.height);
    for (i, px) in src.data.chunks_exact(3).enumerate() {
        let v = px[0] as f32 * 0.299 + px[1] as f32 * 0.587 + px[2] as f32 * 0.114 + 0.5;
        out.data[i] = v as u8;
    }
    out
}

/// Summed-area table with a leading zero row/column, so any window sum is
/// four lookups.
fn integral(src: &GrayImageView<'_>) -> Vec<u64> {
    let w = src.width + 1;
    let h = src.height + 1;
    let mut tab = vec![0u64; w * h];
    for y in 0..src.height {
        let mut row_sum = 0u64;
        for x in 0..src.width {
            row_sum += src.data[y * src.width + x] as u64;
            tab[(y + 1) * w + (x + 1)] = tab[y * w + (x + 1)] + row_sum;
        }
    }
    tab
}

fn window_mean(tab: &[u64], w: usize, img_w: usize, img_h: usize, x: usize, y: usize, r: i32) -> f64 {
    let x0 = (x as i32 - r).max(0) as usize;
    let y0 = (y as i32 - r).max(0) as usize;
    let x1 = (x as i32 + r + 1).min(img_w as i32) as usize;
    let y1 = (y as i32 + r + 1).min(img_h as i32) as usize;
    let sum = tab[y1 * w + x1] + tab[y0 * w + x0] - tab[y0 * w + x1] - tab[y1 * w + x0];
    sum as f64 / ((x1 - x0) * (y1 - y0)) as f64
}

/// Box blur with the given odd kernel size.
pub fn box_blur(src: &GrayImageView<'_>, kernel: usize) -> GrayImage {
    let r = (kernel / 2) as i32;
    let tab = integral(src);
    let mut out = GrayImage::new(src.width, src.height);
    for y in 0..src.height {
        for x in 0..src.width {
            let m = window_mean(&tab, src.width + 1, src.width, src.height, x, y, r);
            out.data[y * src.width + x] = m.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// Per-channel box blur of a color image with the given odd kernel size.
pub fn box_blur_rgb(src: &RgbImage, kernel: usize) -> RgbImage {
    let mut out = src.clone();
    let mut plane = GrayImage::new(src.width, src.height);
    for ch in 0..3 {
        for (i, px) in src.data.chunks_exact(3).enumerate() {
            plane.data[i] = px[ch];
        }
        let blurred = box_blur(&plane.view(), kernel);
        for (i, v) in blurred.data.iter().enumerate() {
            out.data[i * 3 + ch] = *v;
        }
    }
    out
}

/// Mean-window adaptive threshold: a pixel becomes 255 when it exceeds the
/// local window mean minus `offset`, 0 otherwise. `window` must be odd and
/// large relative to the expected stroke width.
pub fn adaptive_threshold_mean(src: &GrayImageView<'_>, window: usize, offset: i32) -> GrayImage {
    let r = (window / 2) as i32;
    let tab = integral(src);
    let mut out = GrayImage::new(src.width, src.height);
    for y in 0..src.height {
        for x in 0..src.width {
            let m = window_mean(&tab, src.width + 1, src.width, src.height, x, y, r);
            let v = src.data[y * src.width + x] as f64;
            out.data[y * src.width + x] = if v > m - offset as f64 { 255 } else { 0 };
        }
    }
    out
}

fn morph3(src: &GrayImageView<'_>, dilate: bool) -> GrayImage {
    let w = src.width as i32;
    let h = src.height as i32;
    let mut out = GrayImage::new(src.width, src.height);
    for y in 0..h {
        for x in 0..w {
            let mut hit = false;
            'probe: for dy in -1..=1 {
                for dx in -1..=1 {
                    let nx = x + dx;
                    let ny = y + dy;
                    let on = nx >= 0
                        && ny >= 0
                        && nx < w
                        && ny < h
                        && src.data[(ny * w + nx) as usize] != 0;
                    if dilate == on {
                        hit = true;
                        break 'probe;
                    }
                }
            }
            let set = if dilate { hit } else { !hit };
            out.data[(y * w + x) as usize] = if set { 255 } else { 0 };
        }
    }
    out
}

/// Binary dilation with a full 3x3 structuring element.
pub fn dilate3(src: &GrayImageView<'_>) -> GrayImage {
    morph3(src, true)
}

/// Binary erosion with a full 3x3 structuring element. Pixels outside the
/// image count as background, matching the dilation's zero border.
pub fn erode3(src: &GrayImageView<'_>) -> GrayImage {
    morph3(src, false)
}

/// Paint every contour pixel (and a disc of the given thickness around it)
/// with `value`. Used to re-draw detected boundaries so broken grid lines
/// become continuous before re-tracing.
pub fn stroke_contour(img: &mut GrayImage, contour: &Contour, thickness: i32, value: u8) {
    let r = (thickness / 2).max(0);
    let w = img.width as i32;
    let h = img.height as i32;
    for p in &contour.points {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                let x = p.x + dx;
                let y = p.y + dy;
                if x >= 0 && y >= 0 && x < w && y < h {
                    img.data[(y * w + x) as usize] = value;
                }
            }
        }
    }
}
