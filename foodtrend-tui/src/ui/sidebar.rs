//! View selector: the eight analyses, one active at a time.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

use foodtrend_core::view::ViewKind;

use crate::app::{AppState, Focus};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let focused = app.focus == Focus::Sidebar;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(focused))
        .title(" Choose Analysis Type ")
        .title_style(theme::panel_title(focused));

    let items: Vec<ListItem> = ViewKind::ALL
        .iter()
        .map(|view| {
            let marker = if *view == app.view { "(•)" } else { "( )" };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", view.index() + 1), theme::muted()),
                Span::styled(format!("{marker} "), theme::accent()),
                Span::styled(view.label(), theme::text()),
            ]))
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(if focused {
        theme::highlight()
    } else {
        theme::accent_bold()
    });
    let mut state = ListState::default().with_selected(Some(app.view.index()));
    f.render_stateful_widget(list, area, &mut state);
}
