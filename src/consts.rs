//! Assorted constants & hard-coded configuration
use crate::sim::Point;
use ratatui::style::{Color, Modifier, Style};
use std::time::Duration;

/// Default number of simulation ticks per second of real time
pub(crate) const TICKS_PER_SECOND: u32 = 6;

/// Upper bound on the configurable tick rate
pub(crate) const MAX_TICKS_PER_SECOND: u32 = 60;

/// Default quiet period after the last resize notification before the
/// simulation is reconciled with the new grid size
pub(crate) const RESIZE_DEBOUNCE_MS: u64 = 100;

/// Target time between rendered frames
pub(crate) const FRAME_PERIOD: Duration = Duration::from_millis(16);

/// Smallest playable number of columns or rows
pub(crate) const MIN_GRID_DIM: i32 = 6;

/// Grid size used if the terminal size can't be read
pub(crate) const DEFAULT_GRID_COLS: i32 = 40;

/// Grid size used if the terminal size can't be read
pub(crate) const DEFAULT_GRID_ROWS: i32 = 20;

/// Starting position of the snake as `(tail, head)`
pub(crate) const INITIAL_SNAKE: (Point, Point) = (Point::new(5, 5), Point::new(6, 5));

/// Number of random cells to try when placing food before falling back to a
/// scan of every free cell
pub(crate) const FOOD_PLACEMENT_ATTEMPTS: usize = 1024;

/// Number of entries kept in the high score list
pub(crate) const MAX_HIGH_SCORES: usize = 50;

/// Name recorded with scores when the player hasn't given one
pub(crate) const DEFAULT_PLAYER_NAME: &str = "Anon";

/// Longest player name that can be typed into the main menu
pub(crate) const MAX_PLAYER_NAME_LEN: usize = 16;

/// Columns taken up by the game screen around the grid (left & right border)
pub(crate) const GRID_MARGIN_COLS: u16 = 2;

/// Rows taken up by the game screen around the grid (score bar, top & bottom
/// border, status line)
pub(crate) const GRID_MARGIN_ROWS: u16 = 4;

/// Glyph for the snake's head when it is moving up
pub(crate) const SNAKE_HEAD_UP_SYMBOL: char = 'v';

/// Glyph for the snake's head when it is moving down
pub(crate) const SNAKE_HEAD_DOWN_SYMBOL: char = '^';

/// Glyph for the snake's head when it is moving right
pub(crate) const SNAKE_HEAD_RIGHT_SYMBOL: char = '<';

/// Glyph for the snake's head when it is moving left
pub(crate) const SNAKE_HEAD_LEFT_SYMBOL: char = '>';

/// Glyph for the parts of the snake's body
pub(crate) const SNAKE_BODY_SYMBOL: char = '⚬';

/// Glyph for the food
pub(crate) const FOOD_SYMBOL: char = '●';

/// Glyph for the snake's head once the game is over
pub(crate) const COLLISION_SYMBOL: char = '×';

/// Style for the snake's head and body
pub(crate) const SNAKE_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

/// Style for the food
pub(crate) const FOOD_STYLE: Style = Style::new().fg(Color::LightRed);

/// Style for [`COLLISION_SYMBOL`]
pub(crate) const COLLISION_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::REVERSED);

/// Style for key codes shown in the interface
pub(crate) const KEY_STYLE: Style = Style::new().fg(Color::Yellow);

/// Style for the score bar at the top of the game screen
pub(crate) const SCORE_BAR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Style for the currently-selected menu item
pub(crate) const MENU_SELECTION_STYLE: Style = Style::new().add_modifier(Modifier::UNDERLINED);

/// Style for the debug overlay
pub(crate) const DEBUG_STYLE: Style = Style::new().fg(Color::White).bg(Color::DarkGray);
