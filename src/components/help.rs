use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::theme::ThemeColors;

/// A single keybinding entry for display.
struct KeyEntry {
    key: &'static str,
    description: &'static str,
}

/// A category of keybindings.
struct KeyCategory {
    name: &'static str,
    entries: &'static [KeyEntry],
}

const NAVIGATION_KEYS: &[KeyEntry] = &[
    KeyEntry { key: "j / ↓", description: "Move down" },
    KeyEntry { key: "k / ↑", description: "Move up" },
    KeyEntry { key: "g / G", description: "First / last entry" },
    KeyEntry { key: "Tab", description: "Switch panel" },
    KeyEntry { key: "Enter / l", description: "Expand group, open link, enter directory" },
    KeyEntry { key: "h / ←", description: "Collapse group / go up a directory" },
    KeyEntry { key: "Space", description: "Toggle group expansion" },
    KeyEntry { key: "Esc", description: "Leave browse mode / back to tree" },
];

const EDIT_KEYS: &[KeyEntry] = &[
    KeyEntry { key: "a", description: "Add group (tree) or favorite (items)" },
    KeyEntry { key: "A", description: "Add top-level group" },
    KeyEntry { key: "L", description: "Add directory link to selected group" },
    KeyEntry { key: "r", description: "Rename group" },
    KeyEntry { key: "m", description: "Move group or item" },
    KeyEntry { key: "d", description: "Remove group, link, or favorite" },
];

const SORT_KEYS: &[KeyEntry] = &[
    KeyEntry { key: "s", description: "Cycle sort mode for the focused panel" },
    KeyEntry { key: "S", description: "Reverse sort direction" },
    KeyEntry { key: "f", description: "Freeze displayed order as custom order" },
    KeyEntry { key: "R", description: "Refresh cached file metadata" },
];

const GENERAL_KEYS: &[KeyEntry] = &[
    KeyEntry { key: "?", description: "Toggle this help" },
    KeyEntry { key: "q / Ctrl-c", description: "Quit" },
];

const CATEGORIES: &[KeyCategory] = &[
    KeyCategory { name: "Navigation", entries: NAVIGATION_KEYS },
    KeyCategory { name: "Editing", entries: EDIT_KEYS },
    KeyCategory { name: "Sorting", entries: SORT_KEYS },
    KeyCategory { name: "General", entries: GENERAL_KEYS },
];

/// Help overlay listing keybindings by category.
pub struct HelpWidget<'a> {
    scroll: usize,
    theme: &'a ThemeColors,
}

impl<'a> HelpWidget<'a> {
    pub fn new(scroll: usize, theme: &'a ThemeColors) -> Self {
        Self { scroll, theme }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for category in CATEGORIES {
            lines.push(Line::from(Span::styled(
                category.name,
                Style::default()
                    .fg(self.theme.info_fg)
                    .add_modifier(Modifier::BOLD),
            )));
            for entry in category.entries {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {:<12}", entry.key),
                        Style::default().fg(self.theme.warning_fg),
                    ),
                    Span::styled(
                        entry.description,
                        Style::default().fg(self.theme.tree_fg),
                    ),
                ]));
            }
            lines.push(Line::from(""));
        }
        lines
    }
}

impl<'a> Widget for HelpWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = 58.min(area.width.saturating_sub(2));
        let height = (area.height.saturating_sub(2)).min(24);
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        let rect = Rect::new(x, y, width, height);

        Clear.render(rect, buf);

        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.dialog_border_fg))
            .padding(Padding::horizontal(1));
        let inner = block.inner(rect);
        block.render(rect, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let lines = self.lines();
        let visible = lines
            .iter()
            .skip(self.scroll)
            .take(inner.height as usize);
        for (i, line) in visible.enumerate() {
            buf.set_line(inner.x, inner.y + i as u16, line, inner.width);
        }
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
    fn help_lists_categories() {
        let theme = dark_theme();
        let widget = HelpWidget::new(0, &theme);
        let area = Rect::new(0, 0, 80, 30);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let content = buffer_to_string(&buf, area);
        assert!(content.contains("Navigation"));
        assert!(content.contains("Editing"));
        assert!(content.contains("Sorting"));
        assert!(content.contains("Freeze displayed order"));
    }

    #[test]
    fn scrolled_help_hides_first_category() {
        let theme = dark_theme();
        let widget = HelpWidget::new(12, &theme);
        let area = Rect::new(0, 0, 80, 14);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let content = buffer_to_string(&buf, area);
        assert!(!content.contains("Navigation"));
    }
}
