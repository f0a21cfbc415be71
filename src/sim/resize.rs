use super::engine::Simulation;
use log::warn;
use rand::Rng;

/// What [`Simulation::reconcile_resize()`] did
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Reconciliation {
    /// Grid dimensions before the resize
    pub(crate) old: (i32, i32),
    /// Grid dimensions after the resize, after clamping to the minimum
    pub(crate) new: (i32, i32),
    /// How far every snake cell was translated before clamping
    pub(crate) shift: (i32, i32),
    /// Whether the food had to be moved
    pub(crate) food_moved: bool,
}

impl<R: Rng> Simulation<R> {
    /// Fit the game onto a grid of a new size.
    ///
    /// When either dimension shrinks, the snake is shifted by half the change
    /// in each dimension (rounding down) so that it stays near the middle of
    /// the view, and then clamped into the new grid.  Otherwise it is only
    /// clamped.  Food that ends up outside the grid or under the snake is
    /// placed again.
    ///
    /// Clamping can fold several snake cells onto the same cell.  That is not
    /// treated as a collision.
    pub(crate) fn reconcile_resize(&mut self, cols: i32, rows: i32) -> Reconciliation {
        let old = self.grid.resize(cols, rows);
        let grid = self.grid;
        let new = (grid.cols(), grid.rows());
        let shift = if new.0 < old.0 || new.1 < old.1 {
            ((new.0 - old.0).div_euclid(2), (new.1 - old.1).div_euclid(2))
        } else {
            (0, 0)
        };
        self.snake
            .map_cells(|p| grid.clamp(p.translate(shift.0, shift.1)));
        let food_moved = if !grid.contains(self.food) || self.snake.occupied().contains(&self.food)
        {
            self.replace_food()
        } else {
            false
        };
        if self.snake.overlaps_itself() {
            warn!("Snake overlaps itself after resize");
        }
        Reconciliation {
            old,
            new,
            shift,
            food_moved,
        }
    }
}
