//! Keyboard input dispatch: overlays first, then global keys, then the focused pane.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use foodtrend_core::view::ViewKind;

use crate::app::{AppState, Focus, Overlay};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    if app.overlay == Overlay::Help {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Enter
        ) {
            app.overlay = Overlay::None;
        }
        return;
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('?') => {
            app.overlay = Overlay::Help;
            return;
        }
        KeyCode::Tab | KeyCode::BackTab => {
            app.toggle_focus();
            return;
        }
        KeyCode::PageDown => {
            app.scroll_down(app.page());
            return;
        }
        KeyCode::PageUp => {
            app.scroll_up(app.page());
            return;
        }
        KeyCode::Char('J') => {
            app.scroll_down(1);
            return;
        }
        KeyCode::Char('K') => {
            app.scroll_up(1);
            return;
        }
        KeyCode::Home => {
            app.scroll_to_top();
            return;
        }
        KeyCode::End => {
            app.scroll_to_bottom();
            return;
        }
        KeyCode::Char('r') => {
            app.resample();
            return;
        }
        KeyCode::Char(c @ '1'..='8') => {
            let index = c as usize - '1' as usize;
            if let Some(view) = ViewKind::from_index(index) {
                app.select_view(view);
                app.focus = Focus::Sidebar;
            }
            return;
        }
        _ => {}
    }

    // 3. Focus-specific keys.
    match app.focus {
        Focus::Sidebar => handle_sidebar_key(app, key),
        Focus::Pickers => handle_picker_key(app, key),
    }
}

fn handle_sidebar_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.select_view(app.view.next()),
        KeyCode::Char('k') | KeyCode::Up => app.select_view(app.view.prev()),
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => app.toggle_focus(),
        _ => {}
    }
}

fn handle_picker_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.cursor_down(),
        KeyCode::Char('k') | KeyCode::Up => app.cursor_up(),
        KeyCode::Char('l') | KeyCode::Right => app.next_picker(),
        KeyCode::Char('h') | KeyCode::Left => app.prev_picker(),
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_option(),
        KeyCode::Char('c') => app.clear_selection(),
        KeyCode::Char('a') => app.select_all(),
        KeyCode::Esc => app.focus = Focus::Sidebar,
        _ => {}
    }
}
