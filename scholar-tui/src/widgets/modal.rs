//! Overlay panel for forms and confirmations.

use crate::theme::ScholarTheme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// A `percent_x` by `percent_y` rectangle centred in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[derive(Debug, Clone)]
pub struct FieldLine {
    pub label: String,
    pub value: String,
    pub required: bool,
    pub focused: bool,
    /// Rendered as dots.
    pub secret: bool,
}

pub struct ModalPanel<'a> {
    pub title: &'a str,
    pub message: Option<&'a str>,
    pub fields: &'a [FieldLine],
    pub error: Option<&'a str>,
    /// Replaces the hint while a request is in flight.
    pub busy: Option<&'a str>,
    pub hint: &'a str,
}

impl<'a> ModalPanel<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect, theme: &ScholarTheme) {
        let height = (self.fields.len() as u16 + 6).min(area.height);
        let percent_y = ((height as u32 * 100) / area.height.max(1) as u32).clamp(20, 90) as u16;
        let rect = centered_rect(60, percent_y, area);
        f.render_widget(Clear, rect);

        let mut lines: Vec<Line> = self
            .message
            .map(|message| Line::styled(message.to_string(), Style::default().fg(theme.text)))
            .into_iter()
            .collect();
        lines.extend(self.fields.iter().map(|field| {
            let marker = if field.required { "*" } else { " " };
            let value = if field.secret {
                "•".repeat(field.value.chars().count())
            } else {
                field.value.clone()
            };
            let (label_style, value_style) = if field.focused {
                (
                    Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
                    Style::default().fg(theme.text).bg(theme.bg_highlight),
                )
            } else {
                (Style::default().fg(theme.text_dim), Style::default().fg(theme.text))
            };
            Line::from(vec![
                Span::styled(format!("{}{}: ", field.label, marker), label_style),
                Span::styled(value, value_style),
            ])
        }));

        lines.push(Line::raw(""));
        if let Some(error) = self.error {
            lines.push(Line::styled(error.to_string(), Style::default().fg(theme.error)));
        }
        let hint = self.busy.unwrap_or(self.hint);
        lines.push(Line::styled(hint.to_string(), Style::default().fg(theme.text_dim)));

        let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .title(self.title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border_focus)),
        );
        f.render_widget(widget, rect);
    }
}

/// A short pick list drawn as an overlay.
pub struct MenuPanel<'a> {
    pub title: &'a str,
    pub entries: &'a [&'a str],
    pub highlighted: usize,
    pub hint: &'a str,
}

impl<'a> MenuPanel<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect, theme: &ScholarTheme) {
        let rect = centered_rect(50, 40, area);
        f.render_widget(Clear, rect);

        let mut lines: Vec<Line> = self
            .entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                if idx == self.highlighted {
                    Line::styled(
                        format!("> {entry}"),
                        Style::default().fg(theme.text).bg(theme.bg_highlight),
                    )
                } else {
                    Line::styled(format!("  {entry}"), Style::default().fg(theme.text_dim))
                }
            })
            .collect();
        lines.push(Line::raw(""));
        lines.push(Line::styled(self.hint.to_string(), Style::default().fg(theme.text_dim)));

        let widget = Paragraph::new(lines).block(
            Block::default()
                .title(self.title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border_focus)),
        );
        f.render_widget(widget, rect);
    }
}
