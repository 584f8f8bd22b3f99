//! Parrot/neon theme tokens for the FoodTrend dashboard
//!
//! # Color Palette
//! - **Background**: Near-black / deep charcoal (base layer)
//! - **Accent**: Electric cyan (focus, highlights)
//! - **Positive**: Neon green (selected values)
//! - **Negative**: Hot pink (series color)
//! - **Warning**: Neon orange (alerts)
//! - **Neutral**: Cool purple (secondary info)
//! - **Muted**: Steel blue (hints, axis text)
//!
//! Chart series cycle through [`SERIES_PALETTE`].

use ratatui::style::{Color, Modifier, Style};

pub const BACKGROUND: Color = Color::Rgb(18, 18, 20);
pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT_PRIMARY: Color = Color::White;
pub const TEXT_SECONDARY: Color = Color::Rgb(170, 170, 170);

/// Colors for successive series in a multi-series chart.
pub const SERIES_PALETTE: [Color; 8] = [
    ACCENT,
    WARNING,
    POSITIVE,
    NEGATIVE,
    NEUTRAL,
    Color::Rgb(255, 255, 0),
    MUTED,
    Color::Rgb(255, 99, 71),
];

/// Color of the `index`-th series; wraps around the palette.
pub fn series_color(index: usize) -> Color {
    SERIES_PALETTE[index % SERIES_PALETTE.len()]
}

// ── Styles ───────────────────────────────────────────────────────────

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT_PRIMARY)
}

pub fn highlight() -> Style {
    Style::default()
        .fg(BACKGROUND)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn panel_border(focused: bool) -> Style {
    if focused {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(focused: bool) -> Style {
    if focused {
        accent_bold()
    } else {
        Style::default().fg(TEXT_SECONDARY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_wraps() {
        assert_eq!(series_color(0), ACCENT);
        assert_eq!(series_color(SERIES_PALETTE.len()), ACCENT);
        assert_eq!(series_color(1), WARNING);
    }

    #[test]
    fn focused_border_uses_accent() {
        assert_eq!(panel_border(true).fg, Some(ACCENT));
        assert_eq!(panel_border(false).fg, Some(MUTED));
    }
}
