use super::point::Point;
use std::collections::{HashSet, VecDeque};

/// A snake on the grid, stored as its head plus the rest of its body.
///
/// The snake always has at least two cells: the head plus a non-empty body.
/// Self-intersection is not prevented here; that's the engine's job.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Snake {
    /// The position of the snake's head
    head: Point,

    /// The positions of all of the cells behind the head, oldest (the tail)
    /// first
    body: VecDeque<Point>,
}

impl Snake {
    pub(crate) fn new(tail: Point, head: Point) -> Snake {
        Snake {
            head,
            body: VecDeque::from([tail]),
        }
    }

    /// Build a snake from its cells listed oldest first; the last cell is the
    /// head.  Returns `None` if fewer than two cells are given.
    #[cfg(test)]
    pub(crate) fn from_cells<I: IntoIterator<Item = Point>>(cells: I) -> Option<Snake> {
        let mut body = cells.into_iter().collect::<VecDeque<_>>();
        let head = body.pop_back()?;
        (!body.is_empty()).then_some(Snake { head, body })
    }

    pub(crate) fn head(&self) -> Point {
        self.head
    }

    /// Return the position of the oldest cell
    #[cfg(test)]
    pub(crate) fn tail(&self) -> Point {
        self.body.front().copied().unwrap_or(self.head)
    }

    pub(crate) fn len(&self) -> usize {
        self.body.len() + 1
    }

    /// Iterate over every cell of the snake, tail first and head last
    pub(crate) fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        self.body
            .iter()
            .copied()
            .chain(std::iter::once(self.head))
    }

    /// Return the set of cells occupied by the snake
    pub(crate) fn occupied(&self) -> HashSet<Point> {
        self.cells().collect()
    }

    /// Test whether moving the head onto `pos` would hit the snake.  The tail
    /// counts only when `keep_tail` is true; otherwise it is about to be
    /// vacated.
    pub(crate) fn would_collide(&self, pos: Point, keep_tail: bool) -> bool {
        let skip = usize::from(!keep_tail);
        self.cells().skip(skip).any(|p| p == pos)
    }

    /// Move the head to `head`.  The tail is dropped unless `grow` is true.
    pub(crate) fn advance(&mut self, head: Point, grow: bool) {
        self.body.push_back(self.head);
        self.head = head;
        if !grow {
            let _ = self.body.pop_front();
        }
    }

    /// Replace every cell `p` with `f(p)`
    pub(crate) fn map_cells<F: FnMut(Point) -> Point>(&mut self, mut f: F) {
        for p in &mut self.body {
            *p = f(*p);
        }
        self.head = f(self.head);
    }

    /// Test whether any two cells of the snake coincide
    pub(crate) fn overlaps_itself(&self) -> bool {
        self.occupied().len() < self.len()
    }
}
