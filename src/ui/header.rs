use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::query::QueryParams;
use crate::ui::app::Screen;
use crate::ui::theme::{ACCENT, GLOBAL_BORDER, HEADER_SEPARATOR, HEADER_TEXT, MUTED_TEXT};

pub struct Header<'a> {
    screen: Screen,
    query: &'a QueryParams,
    editing: Option<&'a str>,
}

impl<'a> Header<'a> {
    pub fn new(screen: Screen, query: &'a QueryParams) -> Self {
        Self {
            screen,
            query,
            editing: None,
        }
    }

    /// Shows `text` as the address being typed instead of the committed one.
    pub fn editing(mut self, text: Option<&'a str>) -> Self {
        self.editing = text;
        self
    }

    pub fn widget(&self) -> Paragraph<'static> {
        let text_style = Style::default().fg(HEADER_TEXT);
        let separator_style = Style::default().fg(HEADER_SEPARATOR);
        let tab = |label: &'static str, active: bool| {
            if active {
                Span::styled(
                    format!(" {label} "),
                    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD | Modifier::REVERSED),
                )
            } else {
                Span::styled(format!(" {label} "), text_style)
            }
        };

        let address = match self.editing {
            Some(text) => Span::styled(
                format!("?{text}█"),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
            None => Span::styled(
                format!("?{}", self.query.to_query_string()),
                Style::default().fg(MUTED_TEXT),
            ),
        };

        let line = Line::from(vec![
            Span::styled("  stockdesk", text_style.add_modifier(Modifier::BOLD)),
            Span::styled("  │  ", separator_style),
            tab("1 Products", self.screen == Screen::Products),
            Span::raw(" "),
            tab("2 Employees", self.screen == Screen::Employees),
            Span::styled("  │  ", separator_style),
            address,
        ]);

        Paragraph::new(line).block(
            Block::default()
                .borders(Borders::TOP | Borders::BOTTOM)
                .border_style(Style::default().fg(GLOBAL_BORDER)),
        )
    }
}
