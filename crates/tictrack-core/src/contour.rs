//! Suzuki-Abe border following over a binary image.
//!
//! Extracts every outer and hole boundary as a chain of pixel coordinates.
//! The implementation works on an internal zero-padded label buffer so the
//! caller only supplies the thresholded image.

use crate::GrayImageView;
use nalgebra::Point2;

/// A single traced boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    /// Boundary pixels in trace order.
    pub points: Vec<Point2<i32>>,
    /// True if this boundary encloses a hole inside another contour.
    pub hole: bool,
}

// 8-neighborhood offsets (x, y), counterclockwise starting at +x.
const NEIGHBORHOOD: [[i32; 2]; 8] = [
    [1, 0],
    [1, -1],
    [0, -1],
    [-1, -1],
    [-1, 0],
    [-1, 1],
    [0, 1],
    [1, 1],
];

fn neighborhood_deltas(stride: i32) -> [i32; 16] {
    let mut deltas = [0i32; 16];
    for i in 0..8 {
        let d = NEIGHBORHOOD[i][0] + NEIGHBORHOOD[i][1] * stride;
        deltas[i] = d;
        deltas[i + 8] = d;
    }
    deltas
}

/// Copy `src` into a `(w+2) x (h+2)` label buffer with a zero border,
/// compressing pixels to 0/1.
fn padded_labels(src: &GrayImageView<'_>) -> Vec<i32> {
    let bw = src.width + 2;
    let bh = src.height + 2;
    let mut out = vec![0i32; bw * bh];
    for y in 0..src.height {
        let row = &src.data[y * src.width..(y + 1) * src.width];
        let dst = &mut out[(y + 1) * bw + 1..(y + 1) * bw + 1 + src.width];
        for (d, &s) in dst.iter_mut().zip(row) {
            *d = i32::from(s != 0);
        }
    }
    out
}

fn follow_border(
    labels: &mut [i32],
    pos: usize,
    nbd: i32,
    mut point: Point2<i32>,
    hole: bool,
    deltas: &[i32; 16],
) -> Contour {
    let mut contour = Contour {
        points: Vec::new(),
        hole,
    };

    let mut s: usize = if hole { 0 } else { 4 };
    let mut s_end = s;

    // Scan backwards for the first non-zero neighbor.
    let mut pos1;
    loop {
        s = s.wrapping_sub(1) & 7;
        pos1 = (pos as isize + deltas[s] as isize) as usize;
        if labels[pos1] != 0 {
            break;
        }
        if s == s_end {
            break;
        }
    }

    if s == s_end {
        // Isolated pixel.
        labels[pos] = -nbd;
        contour.points.push(point);
        return contour;
    }

    let mut pos3 = pos;
    loop {
        s_end = s;

        let mut pos4;
        loop {
            s = (s + 1) & 15;
            pos4 = (pos3 as isize + deltas[s] as isize) as usize;
            if labels[pos4] != 0 {
                break;
            }
        }
        s &= 7;

        // Mark examined-right-neighbor borders negative so they are not
        // re-entered as fresh starting points.
        if (s.wrapping_sub(1) as u32) < s_end as u32 {
            labels[pos3] = -nbd;
        } else if labels[pos3] == 1 {
            labels[pos3] = nbd;
        }

        contour.points.push(point);

        point.x += NEIGHBORHOOD[s][0];
        point.y += NEIGHBORHOOD[s][1];

        if pos4 == pos && pos3 == pos1 {
            break;
        }
        pos3 = pos4;
        s = (s + 4) & 7;
    }

    contour
}

/// Find all boundary contours of the non-zero regions in `src`.
pub fn find_contours(src: &GrayImageView<'_>) -> Vec<Contour> {
    let mut labels = padded_labels(src);
    let stride = (src.width + 2) as i32;
    let deltas = neighborhood_deltas(stride);

    let mut contours = Vec::new();
    let mut nbd = 1;
    let mut pos = src.width + 3; // first interior pixel

    for y in 0..src.height {
        for x in 0..src.width {
            let pix = labels[pos];
            if pix != 0 {
                let outer = pix == 1 && labels[pos - 1] == 0;
                let hole = !outer && pix >= 1 && labels[pos + 1] == 0;
                if outer || hole {
                    nbd += 1;
                    let start = Point2::new(x as i32, y as i32);
                    contours.push(follow_border(&mut labels, pos, nbd, start, hole, &deltas));
                }
            }
            pos += 1;
        }
        pos += 2; // skip right and left padding columns
    }

    contours
}
