//! Scholar theme and color utilities.

use ratatui::style::Color;
use scholar_client::Tone;

#[derive(Debug, Clone)]
pub struct ScholarTheme {
    pub bg: Color,
    pub bg_highlight: Color,
    pub primary: Color,
    pub secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub border: Color,
    pub border_focus: Color,
}

impl ScholarTheme {
    pub fn scholar() -> Self {
        Self {
            bg: Color::Rgb(16, 20, 28),
            bg_highlight: Color::Rgb(38, 46, 62),
            primary: Color::Rgb(94, 162, 255),
            secondary: Color::Rgb(186, 140, 255),
            success: Color::Rgb(72, 199, 116),
            warning: Color::Rgb(242, 201, 76),
            error: Color::Rgb(235, 87, 87),
            info: Color::Rgb(94, 162, 255),
            text: Color::Rgb(236, 239, 244),
            text_dim: Color::Rgb(136, 146, 164),
            border: Color::Rgb(68, 76, 92),
            border_focus: Color::Rgb(94, 162, 255),
        }
    }

    pub fn tone(&self, tone: Tone) -> Color {
        match tone {
            Tone::Green => self.success,
            Tone::Yellow => self.warning,
            Tone::Red => self.error,
        }
    }
}
