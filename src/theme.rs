use ratatui::style::{Color, Modifier, Style};

use crate::transcript::{Dimension, ScoreBand};

pub const TEXT: Color = Color::Gray;
pub const MUTED: Color = Color::DarkGray;
pub const ACCENT: Color = Color::LightBlue;
pub const ERROR: Color = Color::LightRed;

pub fn title_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

pub fn header_style() -> Style {
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
}

pub fn value_style() -> Style {
    Style::default().fg(TEXT)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub fn band_style(band: Option<ScoreBand>) -> Style {
    let color = match band {
        Some(ScoreBand::Strong) => Color::Green,
        Some(ScoreBand::Moderate) => Color::Yellow,
        Some(ScoreBand::NeedsAttention) => Color::Red,
        None => TEXT,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

pub fn dimension_color(dimension: Dimension) -> Color {
    match dimension {
        Dimension::Pitch => Color::Blue,
        Dimension::Confidence => Color::Green,
        Dimension::Tonality => Color::Magenta,
        Dimension::Energy => Color::Yellow,
        Dimension::ObjectionHandling => Color::Red,
    }
}
