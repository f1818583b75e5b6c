//! Row details: labelled values, optionally followed by a related list
//! such as a class timetable or a test's results.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct Related<'a> {
    pub title: &'a str,
    /// Rows, or the status message drawn in their place.
    pub lines: Result<Vec<String>, String>,
}

pub struct DetailPanel<'a> {
    pub title: &'a str,
    pub fields: Vec<(&'a str, String)>,
    pub related: Option<Related<'a>>,
    pub style: Style,
}

impl<'a> DetailPanel<'a> {
    fn lines(&self) -> Vec<Line<'_>> {
        let mut lines: Vec<Line> = self
            .fields
            .iter()
            .map(|(label, value)| {
                let value = if value.is_empty() { "-" } else { value.as_str() };
                Line::from(vec![
                    Span::styled(format!("{label}: "), self.style),
                    Span::raw(value),
                ])
            })
            .collect();

        if let Some(related) = &self.related {
            lines.push(Line::raw(""));
            lines.push(Line::styled(
                related.title,
                self.style.add_modifier(Modifier::BOLD),
            ));
            match &related.lines {
                Ok(rows) => lines.extend(rows.iter().map(|row| Line::raw(format!("  {row}")))),
                Err(status) => lines.push(Line::styled(
                    format!("  {status}"),
                    Style::default().add_modifier(Modifier::DIM),
                )),
            }
        }
        lines
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let widget = Paragraph::new(Text::from(self.lines()))
            .block(Block::default().title(self.title).borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(widget, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn blank_values_and_related_status_are_spelled_out() {
        let panel = DetailPanel {
            title: "Details",
            fields: vec![("Name", "7B Maths".to_string()), ("Subject", String::new())],
            related: Some(Related {
                title: "Schedule",
                lines: Err("No lessons scheduled".to_string()),
            }),
            style: Style::default(),
        };
        let rendered: Vec<String> = panel.lines().iter().map(text).collect();
        assert_eq!(
            rendered,
            vec!["Name: 7B Maths", "Subject: -", "", "Schedule", "  No lessons scheduled"]
        );
    }
}
