use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::fav::view::TreeNode;
use crate::theme::ThemeColors;

/// Left panel: the favorites tree.
pub struct TreeWidget<'a> {
    nodes: &'a [TreeNode],
    selected: usize,
    scroll: usize,
    focused: bool,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(
        nodes: &'a [TreeNode],
        selected: usize,
        scroll: usize,
        focused: bool,
        theme: &'a ThemeColors,
    ) -> Self {
        Self {
            nodes,
            selected,
            scroll,
            focused,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    /// Marker glyph for a row: expansion state for groups, `@` for links.
    fn marker(node: &TreeNode) -> &'static str {
        if node.is_dir_link {
            "@ "
        } else if !node.has_children {
            "· "
        } else if node.is_expanded {
            "▾ "
        } else {
            "▸ "
        }
    }
}

impl<'a> Widget for TreeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let visible_height = inner_area.height as usize;
        if self.nodes.is_empty() || visible_height == 0 {
            return;
        }

        let visible = self
            .nodes
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(visible_height);

        for (i, (idx, node)) in visible.enumerate() {
            let y = inner_area.y + i as u16;
            let indent = "  ".repeat(node.level);
            let marker = Self::marker(node);

            let is_selected = idx == self.selected;
            let style = if is_selected && self.focused {
                Style::default()
                    .bg(self.theme.tree_selected_bg)
                    .fg(self.theme.tree_selected_fg)
                    .add_modifier(Modifier::BOLD)
            } else if is_selected {
                Style::default().bg(self.theme.tree_selected_bg)
            } else if node.is_dir_link {
                Style::default().fg(self.theme.dir_link_fg)
            } else {
                Style::default()
                    .fg(self.theme.group_fg)
                    .add_modifier(Modifier::BOLD)
            };

            let line_content = format!("{}{}{}", indent, marker, node.name);
            let line = Line::from(Span::styled(line_content, style));
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}
