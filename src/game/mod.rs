mod paused;
use self::paused::{PauseOpt, Paused};
use crate::app::Screen;
use crate::command::Command;
use crate::consts;
use crate::menu::MainMenu;
use crate::scoreboard::ScoreBoard;
use crate::sim::{Cause, Direction, Driver, GameOver, Grid, Point, Simulation, Snapshot};
use crate::util::{center_rect, Globals};
use crossterm::event::{poll, read, Event};
use log::{debug, warn};
use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Margin, Rect, Size},
    style::Style,
    text::{Line, Span, Text},
    widgets::{
        block::{Block, Padding},
        Clear, Widget,
    },
    Frame,
};
use std::io;
use std::time::{Duration, Instant};

/// The screen on which a game is played
#[derive(Clone, Debug)]
pub(crate) struct GameView<R = rand::rngs::ThreadRng> {
    driver: Driver<R>,
    globals: Globals,
    state: GameState,
    /// Whether the debug overlay is shown
    debug: bool,
    /// Most recently seen terminal size.  `None` if it couldn't be read when
    /// the game started, in which case the grid is fitted to the terminal on
    /// the first frame.
    terminal: Option<Size>,
    last_frame: Option<Instant>,
}

impl GameView<rand::rngs::ThreadRng> {
    /// Start a game on a grid that fills the terminal
    pub(crate) fn new(globals: Globals) -> Self {
        let terminal = match crossterm::terminal::size() {
            Ok((width, height)) => Some(Size::new(width, height)),
            Err(e) => {
                warn!("Failed to get terminal size: {e}");
                None
            }
        };
        GameView::with_simulation(globals, terminal, Simulation::new(initial_grid(terminal)))
    }
}

impl<R: Rng> GameView<R> {
    #[cfg(test)]
    fn new_with_rng(globals: Globals, rng: R, terminal: Size) -> GameView<R> {
        let sim = Simulation::new_with_rng(initial_grid(Some(terminal)), rng);
        GameView::with_simulation(globals, Some(terminal), sim)
    }

    fn with_simulation(
        globals: Globals,
        terminal: Option<Size>,
        sim: Simulation<R>,
    ) -> GameView<R> {
        let driver = Driver::new(sim, globals.config.game);
        GameView {
            driver,
            globals,
            state: GameState::Running,
            debug: false,
            terminal,
            last_frame: None,
        }
    }

    /// Wait for input until the next frame is due.  If an event arrives, it
    /// is handled; otherwise the game is stepped by the time since the last
    /// frame.
    pub(crate) fn process_input(&mut self) -> io::Result<Option<Screen>> {
        // Only reached if the terminal size couldn't be read when the game
        // was created
        if self.terminal.is_none() {
            let (width, height) = crossterm::terminal::size()?;
            self.terminal = Some(Size::new(width, height));
            let (cols, rows) = grid_size(width, height);
            self.driver.resize_now(cols, rows);
        }
        let last = *self.last_frame.get_or_insert_with(Instant::now);
        let wait = (last + consts::FRAME_PERIOD).saturating_duration_since(Instant::now());
        if !wait.is_zero() && poll(wait)? {
            return Ok(self.handle_event(read()?));
        }
        let now = Instant::now();
        self.last_frame = Some(now);
        self.advance(now.saturating_duration_since(last));
        Ok(None)
    }

    fn advance(&mut self, elapsed: Duration) {
        if let Some(over) = self.driver.step(elapsed) {
            self.game_over(over);
        }
    }
}

impl<R> GameView<R> {
    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    /// Shut down the game loop when leaving this screen
    pub(crate) fn stop(self) {
        let sim = self.driver.stop();
        debug!("Final snake length: {}", sim.snapshot().snake.len());
    }

    fn handle_event(&mut self, event: Event) -> Option<Screen> {
        if let Event::Resize(width, height) = event {
            self.terminal = Some(Size::new(width, height));
            let (cols, rows) = grid_size(width, height);
            self.driver.notify_grid_resize(cols, rows);
            return None;
        }
        match self.state {
            GameState::Running => {
                if event == Event::FocusLost {
                    self.pause();
                    return None;
                }
                let cmd = Command::from_key_event(event.as_key_press_event()?)?;
                if let Some(d) = cmd.direction() {
                    self.driver.set_pending_direction(d);
                } else {
                    match cmd {
                        Command::Quit => return Some(Screen::Quit),
                        Command::Esc | Command::P => self.pause(),
                        Command::Debug => self.debug = !self.debug,
                        _ => (),
                    }
                }
            }
            GameState::Paused(ref mut paused) => match paused.handle_event(event)? {
                PauseOpt::Resume => {
                    self.state = GameState::Running;
                    self.driver.resume();
                }
                PauseOpt::Restart => return Some(self.restart()),
                PauseOpt::MainMenu => return Some(self.main_menu()),
                PauseOpt::Quit => return Some(Screen::Quit),
            },
            GameState::Over { rank, .. } => {
                match Command::from_key_event(event.as_key_press_event()?)? {
                    Command::R => return Some(self.restart()),
                    Command::H => {
                        return Some(Screen::Scores(ScoreBoard::new(
                            self.globals.clone(),
                            rank,
                        )))
                    }
                    Command::M => return Some(self.main_menu()),
                    Command::Quit | Command::Q => return Some(Screen::Quit),
                    Command::Debug => self.debug = !self.debug,
                    _ => (),
                }
            }
        }
        None
    }

    fn pause(&mut self) {
        if self.state == GameState::Running {
            self.state = GameState::Paused(Paused::new());
            self.driver.pause();
        }
    }

    fn restart(&self) -> Screen {
        Screen::Game(GameView::new(self.globals.clone()))
    }

    fn main_menu(&self) -> Screen {
        Screen::Menu(MainMenu::new(self.globals.clone()))
    }

    /// Record the final score and switch to the game-over display
    fn game_over(&mut self, over: GameOver) {
        let rank = self.globals.record_score(over.score);
        let save_failed = match self.globals.save_high_scores() {
            Ok(()) => false,
            Err(e) => {
                warn!("{:#}", anyhow::Error::new(e));
                true
            }
        };
        self.state = GameState::Over {
            over,
            rank,
            save_failed,
        };
    }

    fn render_debug(&self, snap: &Snapshot<'_>, area: Rect, buf: &mut Buffer) {
        let settings = self.driver.settings();
        let lines = [
            match self.terminal {
                Some(size) => format!(" term {}x{} ", size.width, size.height),
                None => String::from(" term ? "),
            },
            format!(" grid {}x{} ", snap.grid.cols(), snap.grid.rows()),
            format!(" length {} ", snap.snake.len()),
            format!(" {} ticks/s ", settings.tick_rate()),
            format!(
                " pause: {}{} ",
                settings.pause_policy,
                if self.driver.is_paused() { " (paused)" } else { "" }
            ),
        ];
        let width = lines.iter().map(String::len).max().unwrap_or_default();
        let overlay = Rect {
            width: u16::try_from(width).unwrap_or(u16::MAX),
            height: u16::try_from(lines.len()).unwrap_or(u16::MAX),
            ..area
        }
        .intersection(area);
        Clear.render(overlay, buf);
        Text::from_iter(lines)
            .style(consts::DEBUG_STYLE)
            .render(overlay, buf);
    }
}

impl<R> Widget for &GameView<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snap = self.driver.snapshot();
        let [score_area, field_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);
        Line::styled(format!(" Score: {}", snap.score), consts::SCORE_BAR_STYLE)
            .render(score_area, buf);
        Line::styled(format!("{} ", self.globals.player), consts::SCORE_BAR_STYLE)
            .right_aligned()
            .render(score_area, buf);

        let block_size = Size::new(
            extent(snap.grid.cols()).saturating_add(2),
            extent(snap.grid.rows()).saturating_add(2),
        );
        let block_area = center_rect(field_area, block_size);
        Block::bordered().render(block_area, buf);
        let mut field = Canvas {
            area: block_area.inner(Margin::new(1, 1)),
            buf,
        };
        for p in snap.snake.cells() {
            field.draw_cell(p, consts::SNAKE_BODY_SYMBOL, consts::SNAKE_STYLE);
        }
        field.draw_cell(snap.food, consts::FOOD_SYMBOL, consts::FOOD_STYLE);
        // Draw the head last so that a collision overwrites whatever it hit
        if snap.alive {
            field.draw_cell(
                snap.snake.head(),
                head_symbol(snap.direction),
                consts::SNAKE_STYLE,
            );
        } else {
            field.draw_cell(
                snap.snake.head(),
                consts::COLLISION_SYMBOL,
                consts::COLLISION_STYLE,
            );
        }

        match self.state {
            GameState::Running => {
                key_hints(&[("Pause", "Esc"), ("Debug", "F3")]).render(status_area, buf);
            }
            GameState::Paused(paused) => {
                let pause_area = center_rect(field_area, Size::new(Paused::WIDTH, Paused::HEIGHT));
                paused.render(pause_area, buf);
            }
            GameState::Over {
                over,
                rank,
                save_failed,
            } => {
                let summary = Summary::new(over, rank, save_failed);
                let summary_area = center_rect(field_area, summary.size());
                (&summary).render(summary_area, buf);
                key_hints(&[
                    ("Restart", "r"),
                    ("High Scores", "h"),
                    ("Main Menu", "m"),
                    ("Quit", "q"),
                ])
                .render(status_area, buf);
            }
        }

        if self.debug {
            self.render_debug(&snap, field_area, buf);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum GameState {
    Running,
    Paused(Paused),
    Over {
        over: GameOver,
        /// Position of the score in the high score list, if it made it
        rank: Option<usize>,
        save_failed: bool,
    },
}

/// The game-over pop-up
#[derive(Clone, Debug, Eq, PartialEq)]
struct Summary {
    lines: Vec<String>,
}

impl Summary {
    const TITLE: &'static str = " GAME OVER ";

    fn new(over: GameOver, rank: Option<usize>, save_failed: bool) -> Summary {
        let mut lines = vec![
            String::from(match over.cause {
                Cause::Wall => "You hit the wall",
                Cause::SelfCollision => "You ran into yourself",
            }),
            format!("Score: {}", over.score),
            match rank {
                Some(0) => String::from("New high score!"),
                Some(r) => format!("High score #{}", r + 1),
                None => String::from("Not a high score"),
            },
        ];
        if save_failed {
            lines.push(String::from("Could not save scores"));
        }
        Summary { lines }
    }

    fn size(&self) -> Size {
        let text_width = self
            .lines
            .iter()
            .map(String::len)
            .chain([Self::TITLE.len()])
            .max()
            .unwrap_or_default();
        Size::new(
            u16::try_from(text_width + 4).unwrap_or(u16::MAX),
            u16::try_from(self.lines.len() + 2).unwrap_or(u16::MAX),
        )
    }
}

impl Widget for &Summary {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::bordered()
            .title(Summary::TITLE)
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1))
            .style(Style::reset());
        let inner = block.inner(area);
        block.render(area, buf);
        for (s, row) in self.lines.iter().zip(inner.rows()) {
            Line::from(s.as_str()).render(row, buf);
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    /// Draw a glyph at grid cell `p`.  Cells outside the canvas are skipped,
    /// which happens while a shrunken terminal is waiting to be reconciled.
    fn draw_cell(&mut self, p: Point, symbol: char, style: Style) {
        let (Ok(x), Ok(y)) = (u16::try_from(p.x), u16::try_from(p.y)) else {
            return;
        };
        if x >= self.area.width || y >= self.area.height {
            return;
        }
        let pos = (self.area.x.saturating_add(x), self.area.y.saturating_add(y));
        if let Some(cell) = self.buf.cell_mut(pos) {
            cell.set_char(symbol);
            cell.set_style(Style::reset().patch(style));
        }
    }
}

/// A status line of the form " Label (key) — Label (key)"
fn key_hints(hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut line = Line::default();
    for (i, &(label, key)) in hints.iter().enumerate() {
        line.push_span(if i == 0 { " " } else { " — " });
        line.push_span(label);
        line.push_span(" (");
        line.push_span(Span::styled(key, consts::KEY_STYLE));
        line.push_span(")");
    }
    line
}

fn head_symbol(direction: Direction) -> char {
    match direction {
        Direction::Up => consts::SNAKE_HEAD_UP_SYMBOL,
        Direction::Down => consts::SNAKE_HEAD_DOWN_SYMBOL,
        Direction::Left => consts::SNAKE_HEAD_LEFT_SYMBOL,
        Direction::Right => consts::SNAKE_HEAD_RIGHT_SYMBOL,
    }
}

/// The grid for a new game: one that fills the terminal, or a fixed size if
/// the terminal size is unknown
fn initial_grid(terminal: Option<Size>) -> Grid {
    match terminal {
        Some(size) => {
            let (cols, rows) = grid_size(size.width, size.height);
            Grid::new(cols, rows)
        }
        None => Grid::new(consts::DEFAULT_GRID_COLS, consts::DEFAULT_GRID_ROWS),
    }
}

/// The grid size that fills a terminal of the given size
fn grid_size(width: u16, height: u16) -> (i32, i32) {
    (
        i32::from(width.saturating_sub(consts::GRID_MARGIN_COLS)),
        i32::from(height.saturating_sub(consts::GRID_MARGIN_ROWS)),
    )
}

fn extent(cells: i32) -> u16 {
    u16::try_from(cells).unwrap_or(u16::MAX)
}
