use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppMode};
use crate::fav::model::Panel;

/// Handle a key event, dispatching by application mode.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.mode.clone() {
        AppMode::Normal => handle_normal_key(app, key),
        AppMode::Dialog(kind) => {
            if kind.is_confirm() {
                handle_confirm_key(app, key);
            } else if kind.is_select() {
                handle_select_key(app, key);
            } else {
                handle_input_key(app, key);
            }
        }
        AppMode::Help => handle_help_key(app, key),
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        KeyCode::Tab => app.toggle_panel(),
        KeyCode::Esc => app.escape(),

        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),

        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => app.activate(),
        KeyCode::Char(' ') => app.toggle_expand_selected(),
        KeyCode::Char('h') | KeyCode::Left => match app.ui.focused_panel {
            Panel::Left => app.collapse_selected(),
            Panel::Right => app.navigate_up(),
        },
        KeyCode::Backspace if app.ui.focused_panel == Panel::Right => app.navigate_up(),

        KeyCode::Char('a') => match app.ui.focused_panel {
            Panel::Left => app.open_add_group(false),
            Panel::Right => app.open_add_item(),
        },
        KeyCode::Char('A') => app.open_add_group(true),
        KeyCode::Char('L') => app.open_add_dir_link(),
        KeyCode::Char('r') => {
            if app.ui.focused_panel == Panel::Left {
                app.open_rename();
            }
        }
        KeyCode::Char('m') => app.open_move(),
        KeyCode::Char('d') => app.open_remove(),

        KeyCode::Char('s') => app.cycle_sort_mode(),
        KeyCode::Char('S') => app.toggle_sort_direction(),
        KeyCode::Char('f') => app.freeze_sort(),
        KeyCode::Char('R') => app.refresh_metadata(),

        KeyCode::Char('?') => {
            app.help_scroll = 0;
            app.mode = AppMode::Help;
        }
        _ => {}
    }
}

fn handle_input_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.commit_dialog(),
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Backspace => app.dialog_delete_char(),
        KeyCode::Left => app.dialog_move_cursor_left(),
        KeyCode::Right => app.dialog_move_cursor_right(),
        KeyCode::Home => app.dialog_cursor_home(),
        KeyCode::End => app.dialog_cursor_end(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.close_dialog(),
        KeyCode::Char(c) => app.dialog_input_char(c),
        _ => {}
    }
}

fn handle_select_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.commit_dialog(),
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Char('j') | KeyCode::Down => app.dialog_select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.dialog_select_previous(),
        _ => {}
    }
}

fn handle_confirm_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.commit_dialog(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.close_dialog(),
        _ => {}
    }
}

fn handle_help_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.mode = AppMode::Normal;
        }
        KeyCode::Char('j') | KeyCode::Down => app.help_scroll += 1,
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll = app.help_scroll.saturating_sub(1);
        }
        _ => {}
    }
}
