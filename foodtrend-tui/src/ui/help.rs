//! `?` overlay: keyboard shortcuts.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::theme;
use crate::ui::centered_rect;

pub fn render(f: &mut Frame, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global");
    key(&mut lines, "1-8", "Jump to view by number");
    key(&mut lines, "Tab", "Switch focus between views and pickers");
    key(&mut lines, "PgUp / PgDn", "Scroll the report by a screen");
    key(&mut lines, "K / J", "Scroll the report by a line");
    key(&mut lines, "Home / End", "Jump to the top or bottom of the report");
    key(&mut lines, "r", "Draw a new Data Preview sample");
    key(&mut lines, "?", "Toggle this help");
    key(&mut lines, "q", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Views");
    key(&mut lines, "j / k", "Next / previous view (applies immediately)");
    key(&mut lines, "Enter / l", "Move focus to the pickers");
    lines.push(Line::from(""));

    section(&mut lines, "Pickers");
    key(&mut lines, "h / l", "Previous / next picker");
    key(&mut lines, "j / k", "Move the cursor");
    key(&mut lines, "Space / Enter", "Toggle (multi) or choose (single)");
    key(&mut lines, "c", "Clear a multi-select");
    key(&mut lines, "a", "Select every option");
    key(&mut lines, "Esc", "Back to views");

    let popup = centered_rect(64, 70, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Help ")
        .title_style(theme::accent_bold());
    f.render_widget(Clear, popup);
    f.render_widget(Paragraph::new(lines).block(block), popup);
}

fn section(lines: &mut Vec<Line<'_>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key(lines: &mut Vec<Line<'_>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {keys:>20}  "), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
