use crate::app::Screen;
use crate::command::Command;
use crate::consts;
use crate::menu::MainMenu;
use crate::util::Globals;
use crossterm::event::{read, Event};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Cell, Padding, Row, Table, Widget},
    Frame,
};

/// The screen listing the best scores so far
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ScoreBoard {
    globals: Globals,
    /// Rank of the score that was just added, if any; it is highlighted
    highlight: Option<usize>,
    /// Index of the first entry shown
    offset: usize,
}

impl ScoreBoard {
    const WIDTH: u16 = 46;

    pub(crate) fn new(globals: Globals, highlight: Option<usize>) -> Self {
        ScoreBoard {
            globals,
            highlight,
            offset: 0,
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    pub(crate) fn process_input(&mut self) -> std::io::Result<Option<Screen>> {
        Ok(self.handle_event(read()?))
    }

    fn handle_event(&mut self, event: Event) -> Option<Screen> {
        let last = self.globals.high_scores.entries().len().saturating_sub(1);
        match Command::from_key_event(event.as_key_press_event()?)? {
            Command::Quit | Command::Q => return Some(Screen::Quit),
            Command::Esc | Command::M | Command::Enter => {
                return Some(Screen::Menu(MainMenu::new(self.globals.clone())))
            }
            Command::Up => self.offset = self.offset.saturating_sub(1),
            Command::Down => self.offset = (self.offset + 1).min(last),
            Command::Home => self.offset = 0,
            Command::End => self.offset = last,
            _ => (),
        }
        None
    }
}

impl Widget for &ScoreBoard {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [_, table_area, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(ScoreBoard::WIDTH),
            Constraint::Fill(1),
        ])
        .areas(area);
        let [table_area, status_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(table_area);
        let block = Block::bordered()
            .title(" High Scores ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1));
        let entries = self.globals.high_scores.entries();
        if entries.is_empty() {
            let inner = block.inner(table_area);
            block.render(table_area, buf);
            Line::from("No scores yet").centered().render(inner, buf);
        } else {
            let rows = entries
                .iter()
                .enumerate()
                .skip(self.offset)
                .map(|(i, entry)| {
                    let style = if Some(i) == self.highlight {
                        consts::MENU_SELECTION_STYLE
                    } else {
                        Style::new()
                    };
                    Row::new([
                        Cell::from(format!("{:>3}.", i + 1)),
                        Cell::from(entry.name.as_str()),
                        Cell::from(Line::from(entry.score.to_string()).right_aligned()),
                        Cell::from(entry.date_string()),
                    ])
                    .style(style)
                });
            Table::new(
                rows,
                [
                    Constraint::Length(4),
                    Constraint::Fill(1),
                    Constraint::Length(6),
                    Constraint::Length(10),
                ],
            )
            .header(Row::new(["Rank", "Name", " Score", "Date"]).style(consts::SCORE_BAR_STYLE))
            .block(block)
            .render(table_area, buf);
        }
        Line::from_iter([
            Span::raw(" Back ("),
            Span::styled("Esc", consts::KEY_STYLE),
            Span::raw(") — Quit ("),
            Span::styled("q", consts::KEY_STYLE),
            Span::raw(")"),
        ])
        .render(status_area, buf);
    }
}
