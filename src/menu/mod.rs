mod widgets;
use self::widgets::{Instructions, Logo};
use crate::app::Screen;
use crate::command::Command;
use crate::config::normalize_player_name;
use crate::consts;
use crate::game::GameView;
use crate::scoreboard::ScoreBoard;
use crate::util::{EnumExt, Globals};
use crossterm::event::{read, Event, KeyCode, KeyEvent, KeyModifiers};
use enum_map::Enum;
use ratatui::{
    buffer::Buffer,
    layout::{Flex, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Widget,
    Frame,
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MainMenu {
    globals: Globals,
    selection: MenuItem,
    /// Contents of the name field as typed
    name: String,
}

impl MainMenu {
    pub(crate) fn new(globals: Globals) -> Self {
        MainMenu {
            name: globals.player.clone(),
            globals,
            selection: MenuItem::Play,
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    pub(crate) fn process_input(&mut self) -> std::io::Result<Option<Screen>> {
        Ok(self.handle_event(read()?))
    }

    fn handle_event(&mut self, event: Event) -> Option<Screen> {
        let ev = event.as_key_press_event()?;
        if self.selection == MenuItem::Name && self.edit_name(ev) {
            return None;
        }
        let cmd = Command::from_key_event(ev)?;
        if let Some(item) = MenuItem::iter().find(|item| item.shortcut() == Some(cmd)) {
            return Some(self.activate(item));
        }
        match cmd {
            Command::Quit => return Some(Screen::Quit),
            Command::Enter if self.selection == MenuItem::Name => {
                self.selection = MenuItem::Play;
            }
            Command::Enter => return Some(self.activate(self.selection)),
            Command::Up => self.selection = self.selection.prev().unwrap_or(self.selection),
            Command::Down => self.selection = self.selection.next().unwrap_or(self.selection),
            Command::Next => self.selection = self.selection.next().unwrap_or_else(MenuItem::min),
            Command::Prev => self.selection = self.selection.prev().unwrap_or_else(MenuItem::max),
            Command::Home => self.selection = MenuItem::min(),
            Command::End => self.selection = MenuItem::max(),
            _ => (),
        }
        if self.selection != MenuItem::Name {
            self.name.clone_from(&self.globals.player);
        }
        None
    }

    /// Apply a key press to the name field, returning `false` if the key
    /// doesn't edit text.  The player name is updated as the field changes.
    fn edit_name(&mut self, ev: KeyEvent) -> bool {
        match (ev.modifiers, ev.code) {
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                if self.name.chars().count() < consts::MAX_PLAYER_NAME_LEN {
                    self.name.push(c);
                }
            }
            (_, KeyCode::Backspace) => {
                self.name.pop();
            }
            _ => return false,
        }
        self.globals.player = normalize_player_name(&self.name);
        true
    }

    fn activate(&self, item: MenuItem) -> Screen {
        match item {
            MenuItem::Name | MenuItem::Play => Screen::Game(GameView::new(self.globals.clone())),
            MenuItem::HighScores => Screen::Scores(ScoreBoard::new(self.globals.clone(), None)),
            MenuItem::Quit => Screen::Quit,
        }
    }
}

impl Widget for &MainMenu {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [logo_area, instructions_area, items_area] = Layout::vertical([
            Logo::HEIGHT,
            Instructions::HEIGHT,
            // One row per item, with a blank row between each
            2 * u16::try_from(MenuItem::LENGTH).unwrap_or(u16::MAX) - 1,
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [logo_area] = Layout::horizontal([Logo::WIDTH])
            .flex(Flex::Center)
            .areas(logo_area);
        Logo.render(logo_area, buf);

        let [instructions_area] = Layout::horizontal([Instructions::WIDTH])
            .flex(Flex::Center)
            .areas(instructions_area);
        Instructions.render(instructions_area, buf);

        for (item, row) in MenuItem::iter().zip(items_area.rows().step_by(2)) {
            let selected = item == self.selection;
            if item == MenuItem::Name {
                self.name_field(selected).render(row, buf);
            } else {
                item.to_line(selected).render(row, buf);
            }
        }
    }
}

impl MainMenu {
    /// Render the name field, e.g. "Name: Vic_", with a cursor while it has
    /// focus
    fn name_field(&self, selected: bool) -> Line<'static> {
        let (text, style) = if selected {
            (format!("{}_", self.name), consts::MENU_SELECTION_STYLE)
        } else {
            (self.globals.player.clone(), Style::new())
        };
        Line::from_iter([
            Span::styled("Name: ", style),
            Span::styled(
                format!("{text:<width$}", width = consts::MAX_PLAYER_NAME_LEN + 1),
                consts::KEY_STYLE.patch(style),
            ),
        ])
        .centered()
    }
}

#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
enum MenuItem {
    Name,
    Play,
    HighScores,
    Quit,
}

impl MenuItem {
    fn label(self) -> &'static str {
        match self {
            MenuItem::Name => "Name",
            MenuItem::Play => "Play",
            MenuItem::HighScores => "High Scores",
            MenuItem::Quit => "Quit",
        }
    }

    fn shortcut(self) -> Option<Command> {
        match self {
            MenuItem::Name => None,
            MenuItem::Play => Some(Command::P),
            MenuItem::HighScores => Some(Command::H),
            MenuItem::Quit => Some(Command::Q),
        }
    }

    fn key_name(self) -> &'static str {
        match self {
            MenuItem::Name => "",
            MenuItem::Play => "p",
            MenuItem::HighScores => "h",
            MenuItem::Quit => "q",
        }
    }

    /// Render the item as a button, e.g. "[Play (p)]"
    fn to_line(self, selected: bool) -> Line<'static> {
        let style = if selected {
            consts::MENU_SELECTION_STYLE
        } else {
            Style::new()
        };
        Line::from_iter([
            Span::styled("[", style),
            Span::styled(self.label(), style),
            Span::styled(" (", style),
            Span::styled(self.key_name(), consts::KEY_STYLE.patch(style)),
            Span::styled(")]", style),
        ])
        .centered()
    }
}
