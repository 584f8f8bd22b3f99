//! Top-level UI layout: sidebar on the left, pickers over the report on the right.

pub mod charts;
pub mod help;
pub mod pickers;
pub mod report_view;
pub mod sidebar;
pub mod status_bar;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

use crate::app::{AppState, Overlay};

/// Width of the view selector.
const SIDEBAR_WIDTH: u16 = 30;
/// Height of the picker row when the view has pickers.
const PICKER_HEIGHT: u16 = 9;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    // Split: main area + 1-line status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());
    let main_area = chunks[0];
    let status_area = chunks[1];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(main_area);

    sidebar::render(f, columns[0], app);

    let picker_height = if app.view.pickers().is_empty() {
        0
    } else {
        PICKER_HEIGHT
    };
    let content = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(picker_height), Constraint::Min(3)])
        .split(columns[1]);

    if picker_height > 0 {
        pickers::render(f, content[0], app);
    }
    report_view::render(f, content[1], app);

    status_bar::render(f, status_area, app);

    if app.overlay == Overlay::Help {
        help::render(f, main_area);
    }
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
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
        .split(popup_layout[1])[1]
}
