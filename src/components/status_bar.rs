use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

/// Bottom status bar: location, counts, sort mode, transient messages.
pub struct StatusBarWidget<'a> {
    location: &'a str,
    info: &'a str,
    sort_label: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<(&'a str, bool)>,
    prefetch: Option<(usize, usize)>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(location: &'a str, info: &'a str, sort_label: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            location,
            info,
            sort_label,
            theme,
            status_message: None,
            prefetch: None,
        }
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some((msg, is_error));
        self
    }

    pub fn prefetch(mut self, progress: Option<(usize, usize)>) -> Self {
        self.prefetch = progress;
        self
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;

        // A transient message takes over the whole bar
        if let Some((msg, is_error)) = self.status_message {
            let style = if is_error {
                Style::default()
                    .fg(self.theme.error_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.success_fg)
            };
            let display: String = if msg.len() >= width {
                msg.chars().take(width).collect()
            } else {
                format!("{:<width$}", msg, width = width)
            };
            let line = Line::from(Span::styled(display, style));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        let right = match self.prefetch {
            Some((done, total)) => format!("stat {}/{} | {}", done, total, self.sort_label),
            None => self.sort_label.to_string(),
        };

        let left = if self.info.is_empty() {
            self.location.to_string()
        } else {
            format!("{}  {}", self.location, self.info)
        };

        let gap = width
            .saturating_sub(left.chars().count())
            .saturating_sub(right.chars().count());
        let content = format!("{}{}{}", left, " ".repeat(gap), right);

        let line = Line::from(Span::styled(
            content,
            Style::default().fg(self.theme.status_fg),
        ));
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
