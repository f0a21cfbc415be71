use super::grid::Grid;
use super::point::Point;
use crate::consts;
use rand::{seq::IteratorRandom, Rng};
use std::collections::HashSet;

/// Choose a cell of `grid` uniformly at random from those not in `occupied`.
///
/// Random cells are sampled up to
/// [`FOOD_PLACEMENT_ATTEMPTS`][consts::FOOD_PLACEMENT_ATTEMPTS] times; if none
/// of them is free, the free cells are enumerated and one is chosen from
/// those.  Returns `None` only when every cell is occupied.
pub(crate) fn place<R: Rng>(
    grid: Grid,
    occupied: &HashSet<Point>,
    rng: &mut R,
) -> Option<Point> {
    if occupied.len() < grid.cell_count() {
        for _ in 0..consts::FOOD_PLACEMENT_ATTEMPTS {
            let p = Point::new(
                rng.random_range(0..grid.cols()),
                rng.random_range(0..grid.rows()),
            );
            if !occupied.contains(&p) {
                return Some(p);
            }
        }
    }
    grid.cells().filter(|p| !occupied.contains(p)).choose(rng)
}
