//! Sign-in screen.

use crate::login::LoginForm;
use crate::theme::ScholarTheme;
use crate::widgets::ModalPanel;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

pub fn render(f: &mut Frame<'_>, area: Rect, theme: &ScholarTheme, form: &LoginForm) {
    let backdrop = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title("Scholar")
        .style(Style::default().bg(theme.bg));
    f.render_widget(backdrop, area);

    let fields = form.inputs.lines();
    let panel = ModalPanel {
        title: "Sign in",
        message: None,
        fields: &fields,
        error: form.error(),
        busy: form.is_pending().then_some("Signing in..."),
        hint: "Tab next field • Enter sign in • Esc quit",
    };
    panel.render(f, area, theme);
}
