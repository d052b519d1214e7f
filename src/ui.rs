use ratatui::{
    layout::{Constraint, Direction, Layout},
    widgets::{Block, Borders},
    Frame,
};

use crate::app::{App, AppMode, RightPane};
use crate::components::dialog::DialogWidget;
use crate::components::help::HelpWidget;
use crate::components::items::ItemsWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::components::tree::TreeWidget;
use crate::fav::model::Panel;

/// Render the application UI: tree panel, items panel, status bar, overlays.
pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(38), Constraint::Percentage(62)])
        .split(chunks[0]);

    let panel_height = panels[0].height.saturating_sub(2) as usize;
    update_scroll(
        &mut app.left_scroll,
        app.ui.left_cursor.row,
        panel_height,
    );
    update_scroll(
        &mut app.right_scroll,
        app.ui.right_cursor.row,
        panel_height,
    );

    let left_focused = app.ui.focused_panel == Panel::Left;

    let left_block = Block::default()
        .title(" Favorites ")
        .borders(Borders::ALL)
        .border_style(border_style(app, left_focused));
    let tree = TreeWidget::new(
        &app.nodes,
        app.ui.left_cursor.row,
        app.left_scroll,
        left_focused,
        &app.theme,
    )
    .block(left_block);
    frame.render_widget(tree, panels[0]);

    let right_block = Block::default()
        .title(right_title(app))
        .borders(Borders::ALL)
        .border_style(border_style(app, !left_focused));
    let items = ItemsWidget::new(
        &app.right,
        app.ui.right_cursor.row,
        app.right_scroll,
        !left_focused,
        &app.theme,
        &app.cache,
    )
    .block(right_block);
    frame.render_widget(items, panels[1]);

    let location = location_line(app);
    let info = info_line(app);
    let sort_label = sort_label(app);
    let mut status = StatusBarWidget::new(&location, &info, &sort_label, &app.theme)
        .prefetch(app.prefetch_progress);
    if let Some((msg, is_error, _)) = &app.status_message {
        status = status.status_message(msg, *is_error);
    }
    frame.render_widget(status, chunks[1]);

    match &app.mode {
        AppMode::Dialog(_) => {
            frame.render_widget(DialogWidget::new(&app.mode, &app.dialog, &app.theme), area);
        }
        AppMode::Help => {
            frame.render_widget(HelpWidget::new(app.help_scroll, &app.theme), area);
        }
        AppMode::Normal => {}
    }
}

/// Keep the cursor row inside the visible window.
fn update_scroll(scroll: &mut usize, cursor: usize, visible_height: usize) {
    if visible_height == 0 {
        return;
    }
    if cursor < *scroll {
        *scroll = cursor;
    } else if cursor >= *scroll + visible_height {
        *scroll = cursor - visible_height + 1;
    }
}

fn border_style(app: &App, focused: bool) -> ratatui::style::Style {
    if focused {
        ratatui::style::Style::default().fg(app.theme.border_focused_fg)
    } else {
        ratatui::style::Style::default().fg(app.theme.border_fg)
    }
}

fn right_title(app: &App) -> String {
    match &app.right {
        RightPane::Empty => " Items ".to_string(),
        RightPane::Items { group, .. } => format!(" {} ", group),
        RightPane::Dir { dir, .. } => format!(" {} ", dir.display()),
    }
}

fn location_line(app: &App) -> String {
    if app.ui.is_browsing_directory {
        return app
            .ui
            .browse_current_path
            .clone()
            .unwrap_or_default();
    }
    app.selected_node()
        .map(|n| n.full_path.clone())
        .unwrap_or_default()
}

fn info_line(app: &App) -> String {
    match &app.right {
        RightPane::Empty => String::new(),
        RightPane::Items { rows, .. } => format!("{} favorites", rows.len()),
        RightPane::Dir { rows, .. } => {
            let real = rows.iter().filter(|e| !e.is_parent).count();
            format!("{} entries", real)
        }
    }
}

fn sort_label(app: &App) -> String {
    let (label, asc) = match app.ui.focused_panel {
        Panel::Left => (app.ui.left_sort_mode.label(), app.ui.left_sort_asc),
        Panel::Right => match &app.right {
            RightPane::Dir { .. } => (app.ui.dir_sort_mode.label(), app.ui.dir_sort_asc),
            _ => (app.ui.right_sort_mode.label(), app.ui.right_sort_asc),
        },
    };
    format!("{} {}", label, if asc { "↑" } else { "↓" })
}
