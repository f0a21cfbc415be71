//! The game itself, independent of any terminal: grid, snake, food, the
//! per-tick rules, the fixed-rate loop, and fitting a running game onto a
//! resized grid.
//!
//! Nothing in here sleeps, reads the clock, or touches the terminal.  The
//! caller measures time and passes it to [`Driver::step()`].
mod direction;
mod driver;
mod engine;
mod food;
mod grid;
mod point;
mod resize;
mod snake;
pub(crate) use self::direction::Direction;
pub(crate) use self::driver::{Driver, LoopSettings, PausePolicy};
pub(crate) use self::engine::{Cause, GameOver, Simulation, Snapshot};
pub(crate) use self::grid::Grid;
pub(crate) use self::point::Point;
