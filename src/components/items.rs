use std::path::Path;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::app::RightPane;
use crate::fav::model::ItemKind;
use crate::fav::stat_cache::StatCache;
use crate::theme::ThemeColors;

/// Right panel: a group's favorites or a live directory listing.
pub struct ItemsWidget<'a> {
    pane: &'a RightPane,
    selected: usize,
    scroll: usize,
    focused: bool,
    theme: &'a ThemeColors,
    cache: &'a StatCache,
    block: Option<Block<'a>>,
}

impl<'a> ItemsWidget<'a> {
    pub fn new(
        pane: &'a RightPane,
        selected: usize,
        scroll: usize,
        focused: bool,
        theme: &'a ThemeColors,
        cache: &'a StatCache,
    ) -> Self {
        Self {
            pane,
            selected,
            scroll,
            focused,
            theme,
            cache,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    /// Cached size column, when metadata is resident. Never stats.
    fn size_label(&self, path: &Path, is_dir: bool) -> Option<String> {
        if is_dir {
            return None;
        }
        self.cache.get(path).map(|stat| human_size(stat.size))
    }

    fn row_style(&self, is_dir: bool, is_selected: bool) -> Style {
        if is_selected && self.focused {
            Style::default()
                .bg(self.theme.tree_selected_bg)
                .fg(self.theme.tree_selected_fg)
                .add_modifier(Modifier::BOLD)
        } else if is_selected {
            Style::default().bg(self.theme.tree_selected_bg)
        } else if is_dir {
            Style::default()
                .fg(self.theme.item_dir_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.item_fg)
        }
    }
}

impl<'a> Widget for ItemsWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let visible_height = inner_area.height as usize;
        if visible_height == 0 || inner_area.width == 0 {
            return;
        }

        // (display name, detail, is_dir) per visible row
        let rows: Vec<(String, Option<String>, bool)> = match self.pane {
            RightPane::Empty => Vec::new(),
            RightPane::Items { rows, .. } => rows
                .iter()
                .map(|item| {
                    let path = Path::new(&item.path);
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| item.path.clone());
                    let is_dir = item.kind == ItemKind::Dir;
                    let detail = self
                        .size_label(path, is_dir)
                        .or_else(|| Some(item.path.clone()));
                    (name, detail, is_dir)
                })
                .collect(),
            RightPane::Dir { rows, .. } => rows
                .iter()
                .map(|entry| {
                    let name = if entry.is_dir {
                        format!("{}/", entry.name)
                    } else {
                        entry.name.clone()
                    };
                    let detail = self.size_label(&entry.path, entry.is_dir);
                    (name, detail, entry.is_dir)
                })
                .collect(),
        };

        let visible = rows
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(visible_height);

        for (i, (idx, (name, detail, is_dir))) in visible.enumerate() {
            let y = inner_area.y + i as u16;
            let style = self.row_style(*is_dir, idx == self.selected);
            let width = inner_area.width as usize;

            let mut spans = vec![Span::styled(name.clone(), style)];
            if let Some(detail) = detail {
                let used = name.len() + 1;
                if width > used + detail.len() {
                    let gap = width - used - detail.len();
                    spans.push(Span::raw(" ".repeat(gap)));
                    spans.push(Span::styled(
                        detail.clone(),
                        Style::default().fg(self.theme.item_detail_fg),
                    ));
                }
            }
            let line = Line::from(spans);
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}

/// Compact byte count, e.g. `4.2K` or `813B`.
fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "K", "M", "G", "T"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{}B", bytes)
    } else {
        format!("{:.1}{}", size, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fav::browse::DirEntryInfo;
    use crate::fav::model::Item;
    use crate::theme::dark_theme;
    use std::path::PathBuf;

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
    fn renders_item_basenames() {
        let pane = RightPane::Items {
            group: "Work".into(),
            rows: vec![
                Item {
                    path: "/tmp/notes.md".into(),
                    kind: ItemKind::File,
                    order: 1,
                },
                Item {
                    path: "/tmp/project".into(),
                    kind: ItemKind::Dir,
                    order: 2,
                },
            ],
        };
        let theme = dark_theme();
        let cache = StatCache::new();
        let widget = ItemsWidget::new(&pane, 0, 0, true, &theme, &cache);
        let area = Rect::new(0, 0, 60, 5);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let content = buffer_to_string(&buf, area);
        assert!(content.contains("notes.md"));
        assert!(content.contains("project"));
    }

    #[test]
    fn renders_dir_entries_with_slash() {
        let pane = RightPane::Dir {
            dir: PathBuf::from("/tmp"),
            rows: vec![
                DirEntryInfo {
                    name: "..".into(),
                    path: PathBuf::from("/"),
                    is_dir: true,
                    is_parent: true,
                },
                DirEntryInfo {
                    name: "sub".into(),
                    path: PathBuf::from("/tmp/sub"),
                    is_dir: true,
                    is_parent: false,
                },
                DirEntryInfo {
                    name: "file.txt".into(),
                    path: PathBuf::from("/tmp/file.txt"),
                    is_dir: false,
                    is_parent: false,
                },
            ],
        };
        let theme = dark_theme();
        let cache = StatCache::new();
        let widget = ItemsWidget::new(&pane, 1, 0, true, &theme, &cache);
        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let content = buffer_to_string(&buf, area);
        assert!(content.contains("../"));
        assert!(content.contains("sub/"));
        assert!(content.contains("file.txt"));
    }

    #[test]
    fn empty_pane_renders_nothing() {
        let pane = RightPane::Empty;
        let theme = dark_theme();
        let cache = StatCache::new();
        let widget = ItemsWidget::new(&pane, 0, 0, false, &theme, &cache);
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        assert!(buffer_to_string(&buf, area).trim().is_empty());
    }

    #[test]
    fn human_size_formatting() {
        assert_eq!(human_size(0), "0B");
        assert_eq!(human_size(813), "813B");
        assert_eq!(human_size(4300), "4.2K");
        assert_eq!(human_size(1024 * 1024), "1.0M");
    }
}
