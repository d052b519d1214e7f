//! Theme data model: built-in palettes resolved from config.

use ratatui::style::Color;

/// All runtime colors used in the UI.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Tree panel
    pub tree_fg: Color,
    pub tree_selected_bg: Color,
    pub tree_selected_fg: Color,
    pub group_fg: Color,
    pub dir_link_fg: Color,

    // Items panel
    pub item_fg: Color,
    pub item_dir_fg: Color,
    pub item_detail_fg: Color,

    // Status bar
    pub status_fg: Color,

    // Borders & chrome
    pub border_fg: Color,
    pub border_focused_fg: Color,

    // Dialogs
    pub dialog_border_fg: Color,

    // Semantic colors, consistent across themes
    pub error_fg: Color,
    pub warning_fg: Color,
    pub success_fg: Color,
    pub info_fg: Color,
    pub dim_fg: Color,
}

/// Dark theme using Catppuccin Mocha palette.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        tree_fg: Color::Rgb(205, 214, 244),          // #cdd6f4 (text)
        tree_selected_bg: Color::Rgb(69, 71, 90),    // #45475a (surface1)
        tree_selected_fg: Color::Rgb(205, 214, 244), // #cdd6f4
        group_fg: Color::Rgb(137, 180, 250),         // #89b4fa (blue)
        dir_link_fg: Color::Rgb(203, 166, 247),      // #cba6f7 (mauve)

        item_fg: Color::Rgb(205, 214, 244),
        item_dir_fg: Color::Rgb(137, 180, 250),
        item_detail_fg: Color::Rgb(108, 112, 134), // #6c7086 (overlay0)

        status_fg: Color::Rgb(186, 194, 222), // #bac2de (subtext1)

        border_fg: Color::Rgb(88, 91, 112),          // #585b70 (surface2)
        border_focused_fg: Color::Rgb(137, 180, 250), // #89b4fa

        dialog_border_fg: Color::Rgb(137, 180, 250),

        error_fg: Color::Rgb(243, 139, 168),   // #f38ba8 (red)
        warning_fg: Color::Rgb(249, 226, 175), // #f9e2af (yellow)
        success_fg: Color::Rgb(166, 227, 161), // #a6e3a1 (green)
        info_fg: Color::Rgb(148, 226, 213),    // #94e2d5 (teal)
        dim_fg: Color::Rgb(108, 112, 134),     // #6c7086
    }
}

/// Light theme using Catppuccin Latte palette.
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        tree_fg: Color::Rgb(76, 79, 105),             // #4c4f69 (text)
        tree_selected_bg: Color::Rgb(188, 192, 204),  // #bcc0cc (surface1)
        tree_selected_fg: Color::Rgb(76, 79, 105),    // #4c4f69
        group_fg: Color::Rgb(30, 102, 245),           // #1e66f5 (blue)
        dir_link_fg: Color::Rgb(136, 57, 239),        // #8839ef (mauve)

        item_fg: Color::Rgb(76, 79, 105),
        item_dir_fg: Color::Rgb(30, 102, 245),
        item_detail_fg: Color::Rgb(140, 143, 161), // #8c8fa1 (overlay1)

        status_fg: Color::Rgb(92, 95, 119), // #5c5f77 (subtext1)

        border_fg: Color::Rgb(172, 176, 190),          // #acb0be (surface2)
        border_focused_fg: Color::Rgb(30, 102, 245),   // #1e66f5

        dialog_border_fg: Color::Rgb(30, 102, 245),

        error_fg: Color::Rgb(210, 15, 57),    // #d20f39 (red)
        warning_fg: Color::Rgb(223, 142, 29), // #df8e1d (yellow)
        success_fg: Color::Rgb(64, 160, 43),  // #40a02b (green)
        info_fg: Color::Rgb(23, 146, 153),    // #179299 (teal)
        dim_fg: Color::Rgb(140, 143, 161),    // #8c8fa1
    }
}

/// Resolve the runtime theme from the configured scheme name.
/// Unknown schemes fall back to dark.
pub fn resolve_theme(scheme: &str) -> ThemeColors {
    match scheme {
        "light" => light_theme(),
        _ => dark_theme(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_known_schemes() {
        let dark = resolve_theme("dark");
        let light = resolve_theme("light");
        assert_ne!(format!("{:?}", dark.tree_fg), format!("{:?}", light.tree_fg));
    }

    #[test]
    fn unknown_scheme_falls_back_to_dark() {
        let theme = resolve_theme("solarized");
        let dark = dark_theme();
        assert_eq!(format!("{:?}", theme.tree_fg), format!("{:?}", dark.tree_fg));
    }
}
