//! Bottom status bar with key hints for the focused pane and the last message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, Focus, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let hints = match app.focus {
        Focus::Sidebar => " j/k:View Tab:Pickers PgUp/PgDn:Scroll ?:Help q:Quit",
        Focus::Pickers => " h/l:Picker j/k:Move Space:Toggle c:Clear a:All Tab:Views",
    };
    let mut spans: Vec<Span> = vec![
        Span::styled(format!(" [{}]", app.focus.label()), theme::accent_bold()),
        Span::styled(hints, theme::muted()),
    ];

    if app.max_scroll() > 0 {
        spans.push(Span::styled(
            format!(" | line {}/{}", app.scroll + 1, app.report_lines()),
            theme::neutral(),
        ));
    }

    if let Some((msg, level)) = &app.status_message {
        spans.push(Span::raw(" | "));
        let style = match level {
            StatusLevel::Info => theme::positive(),
            StatusLevel::Warning => theme::warning(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
