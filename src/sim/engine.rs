use super::direction::Direction;
use super::food;
use super::grid::Grid;
use super::point::Point;
use super::snake::Snake;
use crate::consts;
use log::{debug, info, warn};
use rand::Rng;
use std::fmt;

/// The complete state of one game: the playing field, the snake, the food,
/// and the score.
///
/// The only way to move the game forwards is [`Simulation::tick()`].  Once a
/// tick ends the game, the state is frozen.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Simulation<R = rand::rngs::ThreadRng> {
    pub(super) rng: R,
    pub(super) grid: Grid,
    pub(super) snake: Snake,
    pub(super) food: Point,
    direction: Direction,
    /// The most recent accepted turn that hasn't been applied yet
    pending_direction: Option<Direction>,
    alive: bool,
    score: u32,
}

impl Simulation<rand::rngs::ThreadRng> {
    pub(crate) fn new(grid: Grid) -> Self {
        Simulation::new_with_rng(grid, rand::rng())
    }
}

impl<R: Rng> Simulation<R> {
    pub(crate) fn new_with_rng(grid: Grid, mut rng: R) -> Simulation<R> {
        let snake = initial_snake(grid);
        let food = food::place(grid, &snake.occupied(), &mut rng)
            .expect("a new grid should have room for food");
        info!(
            "New game on {}x{} grid; snake at {}, food at {food}",
            grid.cols(),
            grid.rows(),
            snake.head()
        );
        Simulation {
            rng,
            grid,
            snake,
            food,
            direction: Direction::Right,
            pending_direction: None,
            alive: true,
            score: 0,
        }
    }

    /// Advance the game by one step.
    ///
    /// The pending turn (if any) is applied first.  Leaving the grid ends the
    /// game before self-collision is considered.  The cell the tail is about
    /// to leave doesn't count as a collision unless the snake is eating and
    /// thus keeping its tail.
    pub(crate) fn tick(&mut self) -> Tick {
        if !self.alive {
            return Tick::Halted;
        }
        if let Some(d) = self.pending_direction.take() {
            self.direction = d;
        }
        let head = self.direction.advance(self.snake.head());
        let will_grow = head == self.food;
        if !self.grid.contains(head) {
            return self.die(Cause::Wall, head);
        }
        if self.snake.would_collide(head, will_grow) {
            return self.die(Cause::SelfCollision, head);
        }
        self.snake.advance(head, will_grow);
        if will_grow {
            self.score += 1;
            debug!("Food eaten at {head}; score is now {}", self.score);
            self.replace_food();
            Tick::Grew
        } else {
            Tick::Moved
        }
    }

    /// Move the food to a random free cell.  If there is no free cell, the
    /// food stays where it is and `false` is returned.
    pub(super) fn replace_food(&mut self) -> bool {
        if let Some(p) = food::place(self.grid, &self.snake.occupied(), &mut self.rng) {
            self.food = p;
            true
        } else {
            warn!("No free cell for food; leaving it at {}", self.food);
            false
        }
    }

    fn die(&mut self, cause: Cause, at: Point) -> Tick {
        self.alive = false;
        self.pending_direction = None;
        info!("Game over: snake {cause} at {at} with score {}", self.score);
        Tick::Died(GameOver {
            score: self.score,
            cause,
        })
    }
}

impl<R> Simulation<R> {
    /// Request a turn to be applied at the next tick.
    ///
    /// A turn back onto the snake's current heading is ignored.  Otherwise the
    /// request replaces any earlier one that hasn't been applied yet.
    pub(crate) fn set_pending_direction(&mut self, direction: Direction) {
        if self.alive && !direction.is_reverse_of(self.direction) {
            self.pending_direction = Some(direction);
        }
    }

    #[cfg(test)]
    pub(crate) fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            snake: &self.snake,
            food: self.food,
            score: self.score,
            alive: self.alive,
            grid: self.grid,
            direction: self.direction,
        }
    }
}

#[cfg(test)]
impl<R: Rng> Simulation<R> {
    /// Construct a game in an arbitrary mid-play state
    pub(crate) fn from_parts(
        grid: Grid,
        snake: Snake,
        direction: Direction,
        food: Point,
        rng: R,
    ) -> Simulation<R> {
        Simulation {
            rng,
            grid,
            snake,
            food,
            direction,
            pending_direction: None,
            alive: true,
            score: 0,
        }
    }
}

/// Lay out the starting snake, facing right.  If the usual starting cells
/// don't fit on the grid, the snake is placed at the center instead.
fn initial_snake(grid: Grid) -> Snake {
    let (tail, head) = consts::INITIAL_SNAKE;
    if grid.contains(tail) && grid.contains(head) {
        Snake::new(tail, head)
    } else {
        let head = Point::new(grid.cols() / 2, grid.rows() / 2);
        Snake::new(head.translate(-1, 0), head)
    }
}

/// Read-only view of a [`Simulation`] for drawing
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Snapshot<'a> {
    pub(crate) snake: &'a Snake,
    pub(crate) food: Point,
    pub(crate) score: u32,
    pub(crate) alive: bool,
    pub(crate) grid: Grid,
    pub(crate) direction: Direction,
}

/// The result of a call to [`Simulation::tick()`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Tick {
    /// The snake moved one cell
    Moved,
    /// The snake moved one cell onto the food and grew
    Grew,
    /// The snake crashed and the game is now over.  This is returned for
    /// exactly one tick per game.
    Died(GameOver),
    /// The game was already over; nothing happened
    Halted,
}

/// Notification that a game has ended
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct GameOver {
    pub(crate) score: u32,
    pub(crate) cause: Cause,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Cause {
    Wall,
    SelfCollision,
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Wall => write!(f, "hit the wall"),
            Cause::SelfCollision => write!(f, "ran into itself"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    fn rng() -> ChaCha12Rng {
        ChaCha12Rng::seed_from_u64(RNG_SEED)
    }

    fn game<const N: usize>(
        cols: i32,
        rows: i32,
        cells: [(i32, i32); N],
        direction: Direction,
        food: (i32, i32),
    ) -> Simulation<ChaCha12Rng> {
        let snake = Snake::from_cells(cells.map(|(x, y)| Point::new(x, y))).unwrap();
        Simulation::from_parts(
            Grid::new(cols, rows),
            snake,
            direction,
            Point::new(food.0, food.1),
            rng(),
        )
    }

    fn cells(sim: &Simulation<ChaCha12Rng>) -> Vec<(i32, i32)> {
        sim.snapshot().snake.cells().map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn new_game() {
        let sim = Simulation::new_with_rng(Grid::new(20, 15), rng());
        let snap = sim.snapshot();
        assert!(snap.alive);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.direction, Direction::Right);
        assert_eq!(cells(&sim), [(5, 5), (6, 5)]);
        assert!(snap.grid.contains(snap.food));
        assert!(!snap.snake.occupied().contains(&snap.food));
    }

    #[test]
    fn new_game_on_tiny_grid() {
        let sim = Simulation::new_with_rng(Grid::new(6, 6), rng());
        assert_eq!(cells(&sim), [(2, 3), (3, 3)]);
    }

    #[test]
    fn eat_food() {
        let mut sim = game(10, 10, [(5, 5), (6, 5)], Direction::Right, (7, 5));
        assert_eq!(sim.tick(), Tick::Grew);
        assert_eq!(cells(&sim), [(5, 5), (6, 5), (7, 5)]);
        assert_eq!(sim.score(), 1);
        let snap = sim.snapshot();
        assert_ne!(snap.food, Point::new(7, 5));
        assert!(!snap.snake.occupied().contains(&snap.food));
        assert!(snap.grid.contains(snap.food));
    }

    #[test]
    fn move_without_eating() {
        let mut sim = game(10, 10, [(5, 5), (6, 5)], Direction::Right, (0, 0));
        assert_eq!(sim.tick(), Tick::Moved);
        assert_eq!(cells(&sim), [(6, 5), (7, 5)]);
        assert_eq!(sim.score(), 0);
        assert_eq!(sim.snapshot().food, Point::new(0, 0));
    }

    #[test]
    fn hit_wall() {
        let mut sim = game(10, 10, [(1, 5), (0, 5)], Direction::Left, (7, 5));
        assert_eq!(
            sim.tick(),
            Tick::Died(GameOver {
                score: 0,
                cause: Cause::Wall
            })
        );
        assert!(!sim.is_alive());
        assert_eq!(cells(&sim), [(1, 5), (0, 5)]);
    }

    #[test]
    fn wall_checked_before_body() {
        let mut sim = game(10, 10, [(9, 1), (9, 0)], Direction::Up, (5, 5));
        assert!(matches!(
            sim.tick(),
            Tick::Died(GameOver {
                cause: Cause::Wall,
                ..
            })
        ));
    }

    #[test]
    fn self_collision() {
        let mut sim = game(
            10,
            10,
            [(3, 5), (4, 5), (5, 5), (5, 6), (4, 6)],
            Direction::Left,
            (0, 0),
        );
        sim.set_pending_direction(Direction::Up);
        assert_eq!(
            sim.tick(),
            Tick::Died(GameOver {
                score: 0,
                cause: Cause::SelfCollision
            })
        );
        assert_eq!(cells(&sim), [(3, 5), (4, 5), (5, 5), (5, 6), (4, 6)]);
    }

    #[test]
    fn chase_tail() {
        // A 2x2 loop: the head moves into the cell the tail is leaving
        let mut sim = game(
            10,
            10,
            [(5, 6), (6, 6), (6, 5), (5, 5)],
            Direction::Left,
            (0, 0),
        );
        sim.set_pending_direction(Direction::Down);
        assert_eq!(sim.tick(), Tick::Moved);
        assert_eq!(cells(&sim), [(6, 6), (6, 5), (5, 5), (5, 6)]);
    }

    #[test]
    fn chase_tail_while_eating() {
        let mut sim = game(
            10,
            10,
            [(5, 6), (6, 6), (6, 5), (5, 5)],
            Direction::Left,
            (5, 6),
        );
        sim.set_pending_direction(Direction::Down);
        assert!(matches!(
            sim.tick(),
            Tick::Died(GameOver {
                cause: Cause::SelfCollision,
                ..
            })
        ));
    }

    #[test]
    fn reverse_turn_ignored() {
        let mut sim = game(10, 10, [(5, 5), (6, 5)], Direction::Right, (0, 0));
        sim.set_pending_direction(Direction::Left);
        assert_eq!(sim.pending_direction(), None);
        sim.set_pending_direction(Direction::Up);
        sim.set_pending_direction(Direction::Left);
        assert_eq!(sim.pending_direction(), Some(Direction::Up));
    }

    #[test]
    fn last_turn_wins() {
        let mut sim = game(10, 10, [(5, 5), (6, 5)], Direction::Right, (0, 0));
        sim.set_pending_direction(Direction::Up);
        sim.set_pending_direction(Direction::Down);
        assert_eq!(sim.pending_direction(), Some(Direction::Down));
        sim.tick();
        assert_eq!(sim.pending_direction(), None);
        assert_eq!(cells(&sim), [(6, 5), (6, 6)]);
        assert_eq!(sim.snapshot().direction, Direction::Down);
    }

    #[test]
    fn frozen_after_death() {
        let mut sim = game(10, 10, [(1, 5), (0, 5)], Direction::Left, (7, 5));
        assert!(matches!(sim.tick(), Tick::Died(_)));
        let before = sim.clone();
        sim.set_pending_direction(Direction::Up);
        for _ in 0..5 {
            assert_eq!(sim.tick(), Tick::Halted);
        }
        assert_eq!(sim, before);
    }

    /// Pick a turn that heads for the food without hitting anything, with an
    /// occasional random safe turn.  Returns `None` if every move is fatal.
    fn steer(sim: &Simulation<ChaCha12Rng>, turns: &mut ChaCha12Rng) -> Option<Direction> {
        let snap = sim.snapshot();
        let head = snap.snake.head();
        let safe = [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
        .into_iter()
        .filter(|d| !d.is_reverse_of(snap.direction))
        .filter(|d| {
            let next = d.advance(head);
            snap.grid.contains(next) && !snap.snake.would_collide(next, next == snap.food)
        })
        .collect::<Vec<_>>();
        if safe.is_empty() {
            None
        } else if turns.random_bool(0.8) {
            safe.into_iter().min_by_key(|d| {
                let next = d.advance(head);
                (next.x - snap.food.x).abs() + (next.y - snap.food.y).abs()
            })
        } else {
            Some(safe[turns.random_range(0..safe.len())])
        }
    }

    #[test]
    fn invariants_over_many_games() {
        let grid = Grid::new(12, 9);
        let mut sim = Simulation::new_with_rng(grid, rng());
        let mut turns = ChaCha12Rng::seed_from_u64(42);
        let mut eaten = 0;
        let mut games = 1;
        for _ in 0..5000 {
            let len = sim.snapshot().snake.len();
            let score = sim.score();
            let food = sim.snapshot().food;
            if let Some(d) = steer(&sim, &mut turns) {
                sim.set_pending_direction(d);
            }
            match sim.tick() {
                Tick::Moved => {
                    assert_eq!(sim.snapshot().snake.len(), len);
                    assert_eq!(sim.score(), score);
                    assert_eq!(sim.snapshot().food, food);
                }
                Tick::Grew => {
                    assert_eq!(sim.snapshot().snake.len(), len + 1);
                    assert_eq!(sim.score(), score + 1);
                    assert_eq!(sim.snapshot().snake.head(), food);
                    eaten += 1;
                }
                Tick::Died(over) => {
                    assert_eq!(over.score, score);
                    assert!(!sim.is_alive());
                    assert_eq!(sim.tick(), Tick::Halted);
                    games += 1;
                    sim = Simulation::new_with_rng(grid, ChaCha12Rng::seed_from_u64(games));
                }
                Tick::Halted => panic!("live game halted"),
            }
            let snap = sim.snapshot();
            assert!(!snap.snake.overlaps_itself());
            assert!(snap.grid.contains(snap.food));
            assert!(!snap.snake.occupied().contains(&snap.food));
        }
        assert!(eaten >= 50, "only {eaten} food eaten in {games} games");
    }

    #[test]
    fn food_frozen_when_board_full() {
        // 6x6 grid, snake fills all but the food cell
        let grid = Grid::new(6, 6);
        let mut path = Vec::new();
        for y in 0..6 {
            if y % 2 == 0 {
                path.extend((0..6).map(|x| (x, y)));
            } else {
                path.extend((0..6).rev().map(|x| (x, y)));
            }
        }
        // path ends at (0,5); leave it free as food
        let food = path.pop().unwrap();
        let snake = Snake::from_cells(path.iter().map(|&(x, y)| Point::new(x, y))).unwrap();
        let mut sim = Simulation::from_parts(
            grid,
            snake,
            Direction::Left,
            Point::new(food.0, food.1),
            rng(),
        );
        assert_eq!(sim.tick(), Tick::Grew);
        assert_eq!(sim.score(), 1);
        assert_eq!(sim.snapshot().food, Point::new(0, 5));
    }
}
