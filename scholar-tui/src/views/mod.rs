//! View rendering dispatch.

pub mod dashboard;
pub mod login;
pub mod resource;

use crate::page::PageContext;
use crate::state::App;
use crate::widgets::{centered_rect, DetailPanel};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

pub fn render_view(f: &mut Frame<'_>, app: &mut App) {
    let area = f.size();
    let Some(user) = app.session.get().map(|session| session.user) else {
        login::render(f, area, &app.theme, &app.login);
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    render_header(f, app, &user.display_name(), user.role.label(), layout[0]);

    let ctx = PageContext {
        theme: &app.theme,
        bands: app.config.bands,
    };
    if let Some(page) = app.pages.get_mut(&app.active_view) {
        page.render(f, layout[1], &ctx);
    }

    render_footer(f, app, layout[2]);

    if app.show_help {
        render_help(f, app, area);
    }
}

fn render_header(f: &mut Frame<'_>, app: &App, name: &str, role: &str, area: Rect) {
    let views = app.visible_views();
    let titles: Vec<Line> = views
        .iter()
        .map(|view| Line::from(format!("{} {}", view.index() + 1, view.title())))
        .collect();
    let selected = views.iter().position(|v| *v == app.active_view).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(app.theme.text_dim))
        .highlight_style(
            Style::default()
                .fg(app.theme.primary)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border))
                .title(Span::styled(
                    format!("Scholar | {} ({})", name, role),
                    Style::default().fg(app.theme.primary),
                )),
        );
    f.render_widget(tabs, area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let hint = app
        .pages
        .get(&app.active_view)
        .map(|page| page.hint())
        .unwrap_or("q quit");
    let (text, style) = match app.notifications.latest() {
        Some(note) => {
            let color = match note.level {
                crate::notifications::NotificationLevel::Info => app.theme.info,
                crate::notifications::NotificationLevel::Warning => app.theme.warning,
                crate::notifications::NotificationLevel::Error => app.theme.error,
                crate::notifications::NotificationLevel::Success => app.theme.success,
            };
            (format!("{}: {}", note.level.label(), note.message), Style::default().fg(color))
        }
        None => (hint.to_string(), Style::default().fg(app.theme.text_dim)),
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(style);
    f.render_widget(footer, area);
}

fn render_help(f: &mut Frame<'_>, app: &App, area: Rect) {
    let rect = centered_rect(50, 60, area);
    f.render_widget(Clear, rect);
    let panel = DetailPanel {
        title: "Keys (? to close)",
        fields: vec![
            ("Tab / Shift-Tab", "next / previous view".to_string()),
            ("1-9, 0", "jump to view".to_string()),
            ("j / k", "move selection".to_string()),
            ("Enter", "toggle details".to_string()),
            ("n / e / d", "new, edit, delete".to_string()),
            ("a", "approve or complete".to_string()),
            ("t", "tools: import, upload, roster".to_string()),
            ("f / c", "edit or clear filters".to_string()),
            ("r", "refresh or retry".to_string()),
            ("L", "sign out".to_string()),
            ("q", "quit".to_string()),
        ],
        related: None,
        style: Style::default().fg(app.theme.secondary),
    };
    panel.render(f, rect);
}
