//! Picker row: one bordered option list per picker, side by side.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

use foodtrend_core::view::{picker_options, PickerMode, PickerSpec};

use crate::app::{AppState, Focus};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let pickers = app.view.pickers();
    if pickers.is_empty() {
        return;
    }
    let constraints = vec![Constraint::Ratio(1, pickers.len() as u32); pickers.len()];
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (i, (spec, cell)) in pickers.iter().zip(cells.iter()).enumerate() {
        let active = app.focus == Focus::Pickers && app.picker == i;
        render_picker(f, *cell, app, spec, active);
    }
}

fn render_picker(f: &mut Frame, area: Rect, app: &AppState, spec: &PickerSpec, active: bool) {
    let options = picker_options(&app.dataset, &app.request, spec.field);
    let selected = app.request.selection(spec.field);

    let (on, off) = match spec.mode {
        PickerMode::Single => ("(•)", "( )"),
        PickerMode::Multi => ("[x]", "[ ]"),
    };
    let items: Vec<ListItem> = options
        .iter()
        .map(|option| {
            let is_selected = selected.contains(option);
            let (mark, style) = if is_selected {
                (on, theme::positive())
            } else {
                (off, theme::text())
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{mark} "), theme::accent()),
                Span::styled(option.as_str(), style),
            ]))
        })
        .collect();

    let title = format!(" {} ({}/{}) ", spec.label, selected.len(), options.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(active))
        .title(title)
        .title_style(theme::panel_title(active));

    // Inactive pickers scroll to their first selected value.
    let cursor = if active {
        Some(app.option_cursor)
    } else {
        options.iter().position(|o| selected.contains(o))
    };
    let list = List::new(items).block(block).highlight_style(if active {
        theme::highlight()
    } else {
        ratatui::style::Style::default()
    });
    let mut state = ListState::default().with_selected(cursor);
    f.render_stateful_widget(list, area, &mut state);
}
