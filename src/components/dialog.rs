use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::app::{AppMode, DialogKind, DialogState};
use crate::theme::ThemeColors;

/// Dialog widget that renders a centered modal overlay.
pub struct DialogWidget<'a> {
    mode: &'a AppMode,
    dialog: &'a DialogState,
    theme: &'a ThemeColors,
}

impl<'a> DialogWidget<'a> {
    pub fn new(mode: &'a AppMode, dialog: &'a DialogState, theme: &'a ThemeColors) -> Self {
        Self {
            mode,
            dialog,
            theme,
        }
    }

    /// Calculate a centered rectangle within the given area.
    fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        let w = width.min(area.width);
        let h = height.min(area.height);
        Rect::new(x, y, w, h)
    }
}

impl<'a> Widget for DialogWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let kind = match &self.mode {
            AppMode::Dialog(kind) => kind,
            _ => return,
        };

        if kind.is_confirm() {
            render_confirm_dialog(kind, self.theme, area, buf);
        } else if kind.is_select() {
            render_select_dialog(kind, self.dialog, self.theme, area, buf);
        } else {
            render_input_dialog(kind, self.dialog, self.theme, area, buf);
        }
    }
}

fn render_input_dialog(
    kind: &DialogKind,
    state: &DialogState,
    theme: &ThemeColors,
    area: Rect,
    buf: &mut Buffer,
) {
    let dialog_width = 54.min(area.width.saturating_sub(4));
    let dialog_height = 5;
    let rect = DialogWidget::centered_rect(dialog_width, dialog_height, area);

    Clear.render(rect, buf);

    let block = Block::default()
        .title(format!(" {} ", kind.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dialog_border_fg))
        .padding(Padding::horizontal(1));

    let inner = block.inner(rect);
    block.render(rect, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    // Render input line with cursor
    let input = &state.input;
    let cursor_pos = state.cursor_position;
    let max_width = inner.width as usize;

    let (before, cursor_char, after) = if cursor_pos < input.len() {
        let mut end = cursor_pos + 1;
        while end < input.len() && !input.is_char_boundary(end) {
            end += 1;
        }
        (&input[..cursor_pos], &input[cursor_pos..end], &input[end..])
    } else {
        (input.as_str(), " ", "")
    };

    // Truncate from left if input is too long
    let total_len = before.len() + 1 + after.len();
    let before_display = if total_len > max_width && before.len() > max_width.saturating_sub(2) {
        let mut skip = before.len().saturating_sub(max_width.saturating_sub(2));
        while skip < before.len() && !before.is_char_boundary(skip) {
            skip += 1;
        }
        &before[skip..]
    } else {
        before
    };

    let input_style = Style::default().fg(theme.tree_fg);
    let cursor_style = Style::default()
        .bg(theme.tree_fg)
        .fg(theme.tree_selected_bg)
        .add_modifier(Modifier::BOLD);

    let spans = vec![
        Span::styled(before_display, input_style),
        Span::styled(cursor_char, cursor_style),
        Span::styled(after, input_style),
    ];
    let line = Line::from(spans);
    buf.set_line(inner.x, inner.y + inner.height / 2, &line, inner.width);

    let hint = "[Enter] Confirm  [Esc] Cancel";
    let hint_line = Line::from(Span::styled(
        hint,
        Style::default().fg(theme.dim_fg).add_modifier(Modifier::DIM),
    ));
    if inner.height > 1 {
        buf.set_line(inner.x, inner.y + inner.height - 1, &hint_line, inner.width);
    }
}

fn render_select_dialog(
    kind: &DialogKind,
    state: &DialogState,
    theme: &ThemeColors,
    area: Rect,
    buf: &mut Buffer,
) {
    let max_option_len = state.options.iter().map(|o| o.len()).max().unwrap_or(10);
    let dialog_width = (max_option_len as u16 + 8)
        .max(40)
        .min(area.width.saturating_sub(4));
    let dialog_height = (state.options.len() as u16 + 4).min(area.height.saturating_sub(2));
    let rect = DialogWidget::centered_rect(dialog_width, dialog_height, area);

    Clear.render(rect, buf);

    let block = Block::default()
        .title(format!(" {} ", kind.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dialog_border_fg))
        .padding(Padding::horizontal(1));

    let inner = block.inner(rect);
    block.render(rect, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    // Keep the selected option inside the visible window
    let visible_rows = inner.height.saturating_sub(1) as usize;
    let scroll = if state.selected >= visible_rows {
        state.selected + 1 - visible_rows
    } else {
        0
    };

    for (i, (idx, option)) in state
        .options
        .iter()
        .enumerate()
        .skip(scroll)
        .take(visible_rows)
        .enumerate()
    {
        let style = if idx == state.selected {
            Style::default()
                .bg(theme.tree_selected_bg)
                .fg(theme.tree_selected_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.tree_fg)
        };
        let line = Line::from(Span::styled(format!(" {} ", option), style));
        buf.set_line(inner.x, inner.y + i as u16, &line, inner.width);
    }

    let hint = "[Enter] Select  [Esc] Cancel";
    let hint_line = Line::from(Span::styled(
        hint,
        Style::default().fg(theme.dim_fg).add_modifier(Modifier::DIM),
    ));
    buf.set_line(inner.x, inner.y + inner.height - 1, &hint_line, inner.width);
}

fn render_confirm_dialog(kind: &DialogKind, theme: &ThemeColors, area: Rect, buf: &mut Buffer) {
    let message = kind.confirm_message();
    let dialog_width = (message.len() as u16 + 6)
        .max(36)
        .min(area.width.saturating_sub(4));
    let dialog_height = 5;
    let rect = DialogWidget::centered_rect(dialog_width, dialog_height, area);

    Clear.render(rect, buf);

    let block = Block::default()
        .title(format!(" {} ", kind.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.error_fg))
        .padding(Padding::horizontal(1));

    let inner = block.inner(rect);
    block.render(rect, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let msg_line = Line::from(Span::styled(
        message,
        Style::default().fg(theme.warning_fg),
    ));
    buf.set_line(inner.x, inner.y + inner.height / 2, &msg_line, inner.width);

    let hint = "[y] Yes  [n/Esc] Cancel";
    let hint_line = Line::from(Span::styled(
        hint,
        Style::default().fg(theme.dim_fg).add_modifier(Modifier::DIM),
    ));
    if inner.height > 1 {
        buf.set_line(inner.x, inner.y + inner.height - 1, &hint_line, inner.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::dark_theme;

    fn buffer_to_string(buf: &Buffer, area: Rect) -> String {
        let mut s = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                s.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            s.push('\n');
        }
        s
    }

    #[test]
    fn input_dialog_renders_title_and_text() {
        let mode = AppMode::Dialog(DialogKind::AddRootGroup);
        let state = DialogState {
            input: "Notes".to_string(),
            cursor_position: 5,
            ..Default::default()
        };
        let theme = dark_theme();
        let widget = DialogWidget::new(&mode, &state, &theme);
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let content = buffer_to_string(&buf, area);
        assert!(content.contains("New Top-Level Group"));
        assert!(content.contains("Notes"));
    }

    #[test]
    fn select_dialog_lists_options() {
        let mode = AppMode::Dialog(DialogKind::MoveGroup {
            path: "Work".into(),
        });
        let state = DialogState {
            options: vec!["(top level)".into(), "Home".into(), "Archive".into()],
            selected: 1,
            ..Default::default()
        };
        let theme = dark_theme();
        let widget = DialogWidget::new(&mode, &state, &theme);
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let content = buffer_to_string(&buf, area);
        assert!(content.contains("Move Work to..."));
        assert!(content.contains("(top level)"));
        assert!(content.contains("Home"));
        assert!(content.contains("Archive"));
    }

    #[test]
    fn confirm_dialog_shows_message() {
        let mode = AppMode::Dialog(DialogKind::ConfirmRemoveGroup {
            path: "Work.Projects".into(),
        });
        let state = DialogState::default();
        let theme = dark_theme();
        let widget = DialogWidget::new(&mode, &state, &theme);
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let content = buffer_to_string(&buf, area);
        assert!(content.contains("Confirm Removal"));
        assert!(content.contains("Work.Projects"));
    }

    #[test]
    fn normal_mode_renders_nothing() {
        let mode = AppMode::Normal;
        let state = DialogState::default();
        let theme = dark_theme();
        let widget = DialogWidget::new(&mode, &state, &theme);
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        assert!(buffer_to_string(&buf, area).trim().is_empty());
    }
}
