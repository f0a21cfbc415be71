use crate::consts;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    text::{Line, Span, Text},
    widgets::Widget,
};

/// The title banner: the program name above a snake about to eat
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Logo;

impl Logo {
    const TEXT_HEIGHT: u16 = 3;
    const SNAKE_BODY_LENGTH: u16 = 9;
    const SNAKE_FOOD_GUTTER: u16 = 2;
    pub(super) const HEIGHT: u16 = Self::TEXT_HEIGHT + 2;
    pub(super) const WIDTH: u16 = 27;

    #[rustfmt::skip]
    const TITLE: [&'static str; Self::TEXT_HEIGHT as usize] = [
        "┌─┐┬─┐┬┌┬┐  ┌─┐┌┐┌┌─┐┬┌─┌─┐",
        "│ ┬├┬┘│ ││  └─┐│││├─┤├┴┐├┤ ",
        "└─┘┴└─┴─┴┘  └─┘┘└┘┴ ┴┴ ┴└─┘",
    ];
}

impl Widget for Logo {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [area] = Layout::horizontal([Self::WIDTH])
            .flex(Flex::Start)
            .areas(area);
        let [title_area, diagram_area] = Layout::vertical([Self::TEXT_HEIGHT, 1])
            .flex(Flex::Start)
            .spacing(1)
            .areas(area);
        Text::from_iter(Self::TITLE)
            .style(consts::SNAKE_STYLE)
            .render(title_area, buf);
        let [body_area, head_area, _, food_area] = Layout::horizontal([
            Constraint::Length(Self::SNAKE_BODY_LENGTH),
            Constraint::Length(1),
            Constraint::Length(Self::SNAKE_FOOD_GUTTER),
            Constraint::Length(1),
        ])
        .flex(Flex::Center)
        .areas(diagram_area);
        let glyphs = [
            (body_area, consts::SNAKE_BODY_SYMBOL, consts::SNAKE_STYLE),
            (head_area, consts::SNAKE_HEAD_RIGHT_SYMBOL, consts::SNAKE_STYLE),
            (food_area, consts::FOOD_SYMBOL, consts::FOOD_STYLE),
        ];
        for (glyph_area, symbol, style) in glyphs {
            for p in glyph_area.positions() {
                if let Some(cell) = buf.cell_mut(p) {
                    cell.set_char(symbol);
                    cell.set_style(style);
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Instructions;

impl Instructions {
    pub(super) const HEIGHT: u16 = 7;
    pub(super) const WIDTH: u16 = 20;
}

impl Widget for Instructions {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let keys = |lead: &'static str, keys: [&'static str; 4]| {
            let mut line = Line::from(lead);
            for (i, k) in keys.into_iter().enumerate() {
                if i > 0 {
                    line.push_span(" ");
                }
                line.push_span(Span::styled(k, consts::KEY_STYLE));
            }
            line
        };
        let text = Text::from_iter([
            Line::from("Move the snake with:"),
            keys("       ", ["←", "↓", "↑", "→"]),
            keys("   or: ", ["a", "s", "w", "d"]),
            Line::from_iter([
                Span::raw("Pause with "),
                Span::styled("Esc", consts::KEY_STYLE),
            ]),
            Line::from("Eat the food, but"),
            Line::from("don't hit the walls"),
            Line::from("or yourself!"),
        ]);
        debug_assert_eq!(
            text.height(),
            usize::from(Self::HEIGHT),
            "Instructions::HEIGHT is wrong"
        );
        debug_assert_eq!(
            text.width(),
            usize::from(Self::WIDTH),
            "Instructions::WIDTH is wrong"
        );
        text.render(area, buf);
    }
}
