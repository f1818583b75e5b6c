//! Score gauge coloured by performance band.

use crate::theme::ScholarTheme;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Gauge},
    Frame,
};
use scholar_client::BandThresholds;

pub struct ScoreBar<'a> {
    pub title: &'a str,
    /// Percentage in `0..=100`.
    pub value: f64,
    pub thresholds: BandThresholds,
}

impl<'a> ScoreBar<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect, theme: &ScholarTheme) {
        let ratio = (self.value / 100.0).clamp(0.0, 1.0);
        let band = self.thresholds.band(self.value);
        let gauge = Gauge::default()
            .block(Block::default().title(self.title).borders(Borders::ALL))
            .gauge_style(Style::default().fg(theme.tone(band.tone())).bg(theme.bg_highlight))
            .label(format!("{:.0}% {}", self.value, band.label()))
            .ratio(ratio);
        f.render_widget(gauge, area);
    }
}
