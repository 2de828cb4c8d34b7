use crate::Cell;
use nalgebra::Point2;

/// Top-left anchor of a cell contour: the vertex minimizing x+y, the same
/// rule used for the top-left corner during quadrilateral canonicalization
/// but applied to every polygon vertex.
fn anchor(contour: &[Point2<i32>]) -> Point2<i32> {
    let mut best = contour[0];
    for &p in contour {
        if p.x + p.y < best.x + best.y {
            best = p;
        }
    }
    best
}

/// Sort nine cells into row-major reading order (top-left to bottom-right).
///
/// Two-level sort: first by anchor y to split the cells into three row
/// triples, then by anchor x within each triple. A single diagonal score
/// cannot replace this because perspective distortion skews the relative
/// spacing of rows and columns. Both sorts are stable.
pub fn order_cells(mut cells: Vec<Cell>) -> Vec<Cell> {
    debug_assert_eq!(cells.len(), 9);

    cells.sort_by_key(|c| anchor(&c.contour).y);
    for row in cells.chunks_mut(3) {
        row.sort_by_key(|c| anchor(&c.contour).x);
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use tictrack_core::GrayImage;

    fn cell_at(x: i32, y: i32) -> Cell {
        Cell {
            contour: vec![
                Point2::new(x, y),
                Point2::new(x + 20, y),
                Point2::new(x + 20, y + 20),
                Point2::new(x, y + 20),
            ],
            patch: GrayImage::new(30, 20),
        }
    }

    #[test]
    fn perfect_grid_sorts_row_major_from_any_input_order() {
        // 3x3 grid of anchors, deliberately scrambled.
        let mut cells = Vec::new();
        for (gx, gy) in [(2, 1), (0, 2), (1, 0), (2, 2), (0, 0), (1, 2), (2, 0), (0, 1), (1, 1)] {
            cells.push(cell_at(gx * 30, gy * 30));
        }

        let ordered = order_cells(cells);
        for (i, cell) in ordered.iter().enumerate() {
            let a = anchor(&cell.contour);
            assert_eq!(a.x, (i as i32 % 3) * 30, "cell {i} column");
            assert_eq!(a.y, (i as i32 / 3) * 30, "cell {i} row");
        }
    }

    #[test]
    fn skewed_rows_still_group_correctly() {
        // Rows at slightly different heights within each triple, as under
        // mild perspective.
        let mut cells = Vec::new();
        for gy in 0..3 {
            for gx in 0..3 {
                cells.push(cell_at(gx * 40 + gy, gy * 40 + gx * 2));
            }
        }
        cells.reverse();

        let ordered = order_cells(cells);
        let rows: Vec<i32> = ordered.iter().map(|c| anchor(&c.contour).y / 40).collect();
        assert_eq!(rows, vec![0, 0, 0, 1, 1, 1, 2, 2, 2]);
        for row in ordered.chunks(3) {
            let xs: Vec<i32> = row.iter().map(|c| anchor(&c.contour).x).collect();
            assert!(xs.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
