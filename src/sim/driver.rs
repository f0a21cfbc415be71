use super::direction::Direction;
use super::engine::{GameOver, Simulation, Snapshot, Tick};
use crate::consts;
use log::{debug, info};
use rand::Rng;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Timing settings for a [`Driver`], read from the `[game]` table of the
/// configuration file
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct LoopSettings {
    pub(crate) ticks_per_second: u32,
    pub(crate) pause_policy: PausePolicy,
    pub(crate) resize_debounce_ms: u64,
}

impl LoopSettings {
    /// The tick rate, clamped to the supported range
    pub(crate) fn tick_rate(&self) -> u32 {
        self.ticks_per_second
            .clamp(1, consts::MAX_TICKS_PER_SECOND)
    }

    pub(crate) fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate()
    }

    pub(crate) fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

impl Default for LoopSettings {
    fn default() -> LoopSettings {
        LoopSettings {
            ticks_per_second: consts::TICKS_PER_SECOND,
            pause_policy: PausePolicy::default(),
            resize_debounce_ms: consts::RESIZE_DEBOUNCE_MS,
        }
    }
}

/// What happens to time that passes while the game is paused
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum PausePolicy {
    /// Keep accumulating time while paused, but throw away whole ticks'
    /// worth of it without running them
    #[default]
    Drain,
    /// Zero the accumulator whenever the game is paused or resumed
    Reset,
}

impl fmt::Display for PausePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PausePolicy::Drain => "drain",
            PausePolicy::Reset => "reset",
        };
        f.pad(name)
    }
}

impl FromStr for PausePolicy {
    type Err = ParsePausePolicyError;

    fn from_str(s: &str) -> Result<PausePolicy, ParsePausePolicyError> {
        match s {
            "drain" => Ok(PausePolicy::Drain),
            "reset" => Ok(PausePolicy::Reset),
            _ => Err(ParsePausePolicyError),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("invalid pause policy; expected \"drain\" or \"reset\"")]
pub(crate) struct ParsePausePolicyError;

/// Runs a [`Simulation`] at a fixed tick rate, however often and irregularly
/// [`Driver::step()`] is called.
///
/// The driver also holds back grid-size notifications until they stop
/// arriving for a short while, so that a burst of terminal resize events only
/// reconciles the game once.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Driver<R = rand::rngs::ThreadRng> {
    sim: Simulation<R>,
    settings: LoopSettings,
    interval: Duration,
    /// Time that has passed but not yet been spent on ticks
    accumulator: Duration,
    paused: bool,
    pending_resize: Option<PendingResize>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct PendingResize {
    cols: i32,
    rows: i32,
    /// Time left before the resize is applied
    remaining: Duration,
}

impl<R: Rng> Driver<R> {
    pub(crate) fn new(sim: Simulation<R>, settings: LoopSettings) -> Driver<R> {
        Driver {
            sim,
            settings,
            interval: settings.tick_interval(),
            accumulator: Duration::ZERO,
            paused: false,
            pending_resize: None,
        }
    }

    /// Advance the game by `elapsed` of real time.
    ///
    /// Every whole tick interval in the accumulated time runs one tick, so a
    /// slow frame can run several.  Whatever is left over carries into the
    /// next call.  Returns `Some` only for the call in which the game ended.
    pub(crate) fn step(&mut self, elapsed: Duration) -> Option<GameOver> {
        self.advance_resize(elapsed);
        if self.paused && self.settings.pause_policy == PausePolicy::Reset {
            return None;
        }
        self.accumulator = self.accumulator.saturating_add(elapsed);
        let mut outcome = None;
        while self.accumulator >= self.interval {
            if self.paused || !self.sim.is_alive() {
                self.drain();
                break;
            }
            self.accumulator -= self.interval;
            if let Tick::Died(over) = self.sim.tick() {
                outcome = Some(over);
            }
        }
        outcome
    }

    /// Apply a new grid size right away, dropping any debounced one
    pub(crate) fn resize_now(&mut self, cols: i32, rows: i32) {
        self.pending_resize = None;
        self.reconcile(cols, rows);
    }

    fn advance_resize(&mut self, elapsed: Duration) {
        if let Some(mut pending) = self.pending_resize.take() {
            pending.remaining = pending.remaining.saturating_sub(elapsed);
            if pending.remaining.is_zero() {
                self.reconcile(pending.cols, pending.rows);
            } else {
                self.pending_resize = Some(pending);
            }
        }
    }

    fn reconcile(&mut self, cols: i32, rows: i32) {
        let r = self.sim.reconcile_resize(cols, rows);
        info!(
            "Grid resized from {}x{} to {}x{}; snake shifted by ({}, {}){}",
            r.old.0,
            r.old.1,
            r.new.0,
            r.new.1,
            r.shift.0,
            r.shift.1,
            if r.food_moved { "; food moved" } else { "" }
        );
    }
}

impl<R> Driver<R> {
    pub(crate) fn set_pending_direction(&mut self, direction: Direction) {
        self.sim.set_pending_direction(direction);
    }

    /// Record a new grid size.  It is applied once no further size has been
    /// recorded for the configured debounce period.
    pub(crate) fn notify_grid_resize(&mut self, cols: i32, rows: i32) {
        self.pending_resize = Some(PendingResize {
            cols,
            rows,
            remaining: self.settings.resize_debounce(),
        });
    }

    pub(crate) fn pause(&mut self) {
        if !self.paused {
            debug!("Game paused");
            self.paused = true;
            self.reset_on_transition();
        }
    }

    pub(crate) fn resume(&mut self) {
        if self.paused {
            debug!("Game resumed");
            self.paused = false;
            self.reset_on_transition();
        }
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.paused
    }

    pub(crate) fn settings(&self) -> LoopSettings {
        self.settings
    }

    pub(crate) fn snapshot(&self) -> Snapshot<'_> {
        self.sim.snapshot()
    }

    /// Shut the driver down, handing back the final game state.  Any grid
    /// size still waiting out its debounce period is discarded.
    pub(crate) fn stop(self) -> Simulation<R> {
        info!(
            "Stopping game loop with score {}{}",
            self.sim.score(),
            if self.sim.is_alive() { "" } else { " (game over)" }
        );
        self.sim
    }

    fn reset_on_transition(&mut self) {
        if self.settings.pause_policy == PausePolicy::Reset {
            self.accumulator = Duration::ZERO;
        }
    }

    /// Discard all whole tick intervals from the accumulator
    fn drain(&mut self) {
        let interval = self.interval.as_nanos().max(1);
        let rem = self.accumulator.as_nanos() % interval;
        self.accumulator = Duration::from_nanos(u64::try_from(rem).unwrap_or_default());
    }
}

#[cfg(test)]
mod tests {
    use super::super::grid::Grid;
    use super::super::point::Point;
    use super::super::snake::Snake;
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use rstest::rstest;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    const MS: Duration = Duration::from_millis(1);

    fn settings(pause_policy: PausePolicy) -> LoopSettings {
        LoopSettings {
            ticks_per_second: 10,
            pause_policy,
            resize_debounce_ms: 100,
        }
    }

    /// A snake heading right along row 5 of a 40x10 grid, with food out of
    /// the way
    fn driver(pause_policy: PausePolicy) -> Driver<ChaCha12Rng> {
        let sim = Simulation::from_parts(
            Grid::new(40, 10),
            Snake::new(Point::new(0, 5), Point::new(1, 5)),
            Direction::Right,
            Point::new(0, 0),
            ChaCha12Rng::seed_from_u64(RNG_SEED),
        );
        Driver::new(sim, settings(pause_policy))
    }

    fn head_x(driver: &Driver<ChaCha12Rng>) -> i32 {
        driver.snapshot().snake.head().x
    }

    #[rstest]
    #[case(1)]
    #[case(16)]
    #[case(33)]
    #[case(60)]
    #[case(100)]
    #[case(250)]
    #[case(999)]
    fn tick_count_is_independent_of_frame_rate(#[case] frame_ms: u32) {
        // One second sliced into frames of any length runs exactly ten ticks
        let mut d = driver(PausePolicy::Drain);
        let frame = frame_ms * MS;
        let mut total = Duration::ZERO;
        while total + frame <= Duration::from_secs(1) {
            assert_eq!(d.step(frame), None);
            total += frame;
        }
        assert_eq!(d.step(Duration::from_secs(1) - total), None);
        assert_eq!(head_x(&d), 11);
    }

    #[test]
    fn stall_runs_several_ticks() {
        let mut d = driver(PausePolicy::Drain);
        assert_eq!(d.step(350 * MS), None);
        assert_eq!(head_x(&d), 4);
        assert_eq!(d.step(49 * MS), None);
        assert_eq!(head_x(&d), 4);
        assert_eq!(d.step(MS), None);
        assert_eq!(head_x(&d), 5);
    }

    #[test]
    fn small_frames_accumulate() {
        let mut d = driver(PausePolicy::Drain);
        for _ in 0..6 {
            d.step(16 * MS);
        }
        assert_eq!(head_x(&d), 1);
        d.step(16 * MS);
        assert_eq!(head_x(&d), 2);
    }

    #[test]
    fn game_over_reported_once() {
        let mut d = driver(PausePolicy::Drain);
        // 38 ticks take the head to x = 39; the 39th runs into the wall
        assert_eq!(d.step(3800 * MS), None);
        assert_eq!(head_x(&d), 39);
        let over = d.step(5000 * MS).unwrap();
        assert_eq!(over.score, 0);
        assert!(!d.snapshot().alive);
        for _ in 0..10 {
            assert_eq!(d.step(1000 * MS), None);
        }
        assert_eq!(head_x(&d), 39);
    }

    #[test]
    fn turns_apply_at_next_tick() {
        let mut d = driver(PausePolicy::Drain);
        d.set_pending_direction(Direction::Down);
        d.set_pending_direction(Direction::Left);
        d.step(99 * MS);
        assert_eq!(d.snapshot().snake.head(), Point::new(1, 5));
        d.step(MS);
        assert_eq!(d.snapshot().snake.head(), Point::new(1, 6));
    }

    #[test]
    fn drain_pause_discards_time() {
        let mut d = driver(PausePolicy::Drain);
        d.step(50 * MS);
        d.pause();
        assert!(d.is_paused());
        d.step(1000 * MS);
        assert_eq!(head_x(&d), 1);
        d.resume();
        // Only whole ticks' worth of time was thrown away
        d.step(50 * MS);
        assert_eq!(head_x(&d), 2);
    }

    #[test]
    fn drain_pause_keeps_partial_time() {
        let mut d = driver(PausePolicy::Drain);
        d.pause();
        d.step(1030 * MS);
        d.resume();
        d.step(69 * MS);
        assert_eq!(head_x(&d), 1);
        d.step(MS);
        assert_eq!(head_x(&d), 2);
    }

    #[test]
    fn reset_pause_zeroes_accumulator() {
        let mut d = driver(PausePolicy::Reset);
        d.step(90 * MS);
        d.pause();
        d.step(1000 * MS);
        d.resume();
        d.step(90 * MS);
        assert_eq!(head_x(&d), 1);
        d.step(10 * MS);
        assert_eq!(head_x(&d), 2);
    }

    #[test]
    fn resize_is_debounced() {
        let mut d = driver(PausePolicy::Drain);
        d.pause();
        d.notify_grid_resize(30, 8);
        d.step(60 * MS);
        d.notify_grid_resize(20, 8);
        d.step(60 * MS);
        assert_eq!(d.snapshot().grid, Grid::new(40, 10));
        d.notify_grid_resize(12, 8);
        d.step(99 * MS);
        assert_eq!(d.snapshot().grid, Grid::new(40, 10));
        d.step(MS);
        assert_eq!(d.snapshot().grid, Grid::new(12, 8));
        // 40 -> 12 columns shifts by -14; 10 -> 8 rows shifts by -1
        assert_eq!(d.snapshot().snake.head(), Point::new(0, 4));
    }

    #[test]
    fn resize_now_cancels_pending() {
        let mut d = driver(PausePolicy::Drain);
        d.notify_grid_resize(10, 10);
        d.resize_now(50, 20);
        d.pause();
        d.step(500 * MS);
        assert_eq!(d.snapshot().grid, Grid::new(50, 20));
    }

    #[test]
    fn resize_after_game_over() {
        let mut d = driver(PausePolicy::Drain);
        assert!(d.step(10 * Duration::from_secs(1)).is_some());
        d.notify_grid_resize(20, 10);
        d.step(100 * MS);
        let snap = d.snapshot();
        assert_eq!(snap.grid, Grid::new(20, 10));
        assert!(!snap.alive);
    }

    #[test]
    fn stop_returns_state() {
        let mut d = driver(PausePolicy::Drain);
        d.step(100 * MS);
        d.notify_grid_resize(10, 10);
        let sim = d.stop();
        assert_eq!(sim.snapshot().snake.head(), Point::new(2, 5));
        assert_eq!(sim.snapshot().grid, Grid::new(40, 10));
    }

    #[test]
    fn tick_rate_is_clamped() {
        let mut s = LoopSettings::default();
        assert_eq!(s.tick_interval(), Duration::from_secs(1) / 6);
        s.ticks_per_second = 0;
        assert_eq!(s.tick_interval(), Duration::from_secs(1));
        s.ticks_per_second = 1000;
        assert_eq!(s.tick_rate(), consts::MAX_TICKS_PER_SECOND);
    }

    #[rstest]
    #[case("drain", Ok(PausePolicy::Drain))]
    #[case("reset", Ok(PausePolicy::Reset))]
    #[case("Drain", Err(ParsePausePolicyError))]
    #[case("", Err(ParsePausePolicyError))]
    fn parse_pause_policy(
        #[case] s: &str,
        #[case] policy: Result<PausePolicy, ParsePausePolicyError>,
    ) {
        assert_eq!(s.parse::<PausePolicy>(), policy);
        if let Ok(p) = policy {
            assert_eq!(p.to_string(), s);
        }
    }
}
