use super::point::Point;
use crate::consts;

/// The dimensions of the playing field.  Both dimensions are always at least
/// [`MIN_GRID_DIM`][consts::MIN_GRID_DIM]; smaller requests are clamped up.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Grid {
    cols: i32,
    rows: i32,
}

impl Grid {
    pub(crate) fn new(cols: i32, rows: i32) -> Grid {
        Grid {
            cols: cols.max(consts::MIN_GRID_DIM),
            rows: rows.max(consts::MIN_GRID_DIM),
        }
    }

    pub(crate) fn cols(self) -> i32 {
        self.cols
    }

    pub(crate) fn rows(self) -> i32 {
        self.rows
    }

    /// Change the grid's dimensions, returning the previous `(cols, rows)`
    pub(crate) fn resize(&mut self, cols: i32, rows: i32) -> (i32, i32) {
        let old = (self.cols, self.rows);
        *self = Grid::new(cols, rows);
        old
    }

    pub(crate) fn contains(self, p: Point) -> bool {
        (0..self.cols).contains(&p.x) && (0..self.rows).contains(&p.y)
    }

    /// Move `p` to the nearest cell inside the grid
    pub(crate) fn clamp(self, p: Point) -> Point {
        Point {
            x: p.x.clamp(0, self.cols - 1),
            y: p.y.clamp(0, self.rows - 1),
        }
    }

    pub(crate) fn cell_count(self) -> usize {
        let cols = usize::try_from(self.cols).unwrap_or_default();
        let rows = usize::try_from(self.rows).unwrap_or_default();
        cols.saturating_mul(rows)
    }

    /// Iterate over every cell in row-major order
    pub(crate) fn cells(self) -> impl Iterator<Item = Point> {
        (0..self.rows).flat_map(move |y| (0..self.cols).map(move |x| Point::new(x, y)))
    }
}
