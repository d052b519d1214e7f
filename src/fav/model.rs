//! Persisted data model: the favorites tree and the UI/view state.
//!
//! Two independent JSON documents. The tree (`Data`) owns groups, items and
//! directory links; `UiState` owns expansion, selection, browsing cursors
//! and per-panel sort settings. Every field defaults so that missing or
//! partial documents deserialize into a usable state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::sort::{LeftSortMode, SortMode};

/// Whether a favorite item points at a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    File,
    Dir,
}

/// A single favorited filesystem location inside a group.
///
/// `path` is absolute and normalized; duplicate detection is exact string
/// equality on it. `order` is the list-relative sort key for custom order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub order: i64,
}

/// A live filesystem browsing root attached to a group.
///
/// Shares one sibling order space with the parent's child groups, so links
/// and subgroups interleave under a single ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirLink {
    pub name: String,
    pub path: String,
    pub order: i64,
}

/// A node in the favorites forest.
///
/// Sibling names are unique across {children ∪ dir_links}. `order` values
/// need not be contiguous except right after a renumbering pass; duplicates
/// are tolerated and broken by list position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    pub name: String,
    pub order: i64,
    pub items: Vec<Item>,
    pub children: Vec<Group>,
    pub dir_links: Vec<DirLink>,
}

impl Group {
    pub fn new(name: impl Into<String>, order: i64) -> Self {
        Self {
            name: name.into(),
            order,
            items: Vec::new(),
            children: Vec::new(),
            dir_links: Vec::new(),
        }
    }
}

/// The root aggregate: the top-level group forest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Data {
    pub groups: Vec<Group>,
}

impl Data {
    /// A fresh tree seeded with one empty group per configured default name.
    pub fn seeded(default_groups: &[String]) -> Self {
        Self {
            groups: default_groups
                .iter()
                .enumerate()
                .map(|(i, name)| Group::new(name.clone(), i as i64 + 1))
                .collect(),
        }
    }
}

/// What kind of node the last selection pointed at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectedKind {
    #[default]
    #[serde(rename = "group")]
    Group,
    #[serde(rename = "dir_link")]
    DirLink,
}

/// Which panel currently has keyboard focus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    #[default]
    Left,
    Right,
}

/// A persisted cursor position within a panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

/// The second persisted document: everything about how the tree is being
/// viewed. Mutated on almost every user action and saved eagerly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiState {
    /// Dot-paths of groups currently expanded in the left panel.
    pub expanded_groups: BTreeSet<String>,
    pub last_selected_group: Option<String>,
    pub last_selected_type: SelectedKind,
    pub last_selected_dir_link: Option<String>,
    /// Directory currently shown for the selected dir link, if the user
    /// navigated away from the link's root.
    pub dir_link_current_path: Option<String>,
    pub is_browsing_directory: bool,
    pub browse_base_path: Option<String>,
    pub browse_current_path: Option<String>,
    pub focused_panel: Panel,
    pub left_cursor: Cursor,
    pub right_cursor: Cursor,
    pub left_sort_mode: LeftSortMode,
    pub right_sort_mode: SortMode,
    pub dir_sort_mode: SortMode,
    pub left_sort_asc: bool,
    pub right_sort_asc: bool,
    pub dir_sort_asc: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            expanded_groups: BTreeSet::new(),
            last_selected_group: None,
            last_selected_type: SelectedKind::Group,
            last_selected_dir_link: None,
            dir_link_current_path: None,
            is_browsing_directory: false,
            browse_base_path: None,
            browse_current_path: None,
            focused_panel: Panel::Left,
            left_cursor: Cursor::default(),
            right_cursor: Cursor::default(),
            left_sort_mode: LeftSortMode::Custom,
            right_sort_mode: SortMode::Custom,
            dir_sort_mode: SortMode::Name,
            left_sort_asc: true,
            right_sort_asc: true,
            dir_sort_asc: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_data_numbers_groups_in_order() {
        let data = Data::seeded(&["Default".to_string(), "Projects".to_string()]);
        assert_eq!(data.groups.len(), 2);
        assert_eq!(data.groups[0].name, "Default");
        assert_eq!(data.groups[0].order, 1);
        assert_eq!(data.groups[1].name, "Projects");
        assert_eq!(data.groups[1].order, 2);
    }

    #[test]
    fn group_json_shape() {
        let mut g = Group::new("Work", 1);
        g.items.push(Item {
            path: "/tmp/notes.md".into(),
            kind: ItemKind::File,
            order: 1,
        });
        g.dir_links.push(DirLink {
            name: "src".to_string(),
            path: "/tmp/src".into(),
            order: 2,
        });
        let json = serde_json::to_value(&Data { groups: vec![g] }).unwrap();
        assert_eq!(json["groups"][0]["name"], "Work");
        assert_eq!(json["groups"][0]["items"][0]["type"], "file");
        assert_eq!(json["groups"][0]["dir_links"][0]["path"], "/tmp/src");
    }

    #[test]
    fn group_deserializes_with_missing_lists() {
        let g: Group = serde_json::from_str(r#"{"name": "Work", "order": 3}"#).unwrap();
        assert_eq!(g.name, "Work");
        assert_eq!(g.order, 3);
        assert!(g.items.is_empty());
        assert!(g.children.is_empty());
        assert!(g.dir_links.is_empty());
    }

    #[test]
    fn ui_state_round_trip() {
        let mut ui = UiState::default();
        ui.expanded_groups.insert("Work".into());
        ui.expanded_groups.insert("Work.Projects".into());
        ui.last_selected_group = Some("Work".into());
        ui.right_sort_mode = SortMode::Modified;
        ui.right_sort_asc = false;

        let json = serde_json::to_string(&ui).unwrap();
        let back: UiState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ui);
    }

    #[test]
    fn ui_state_wire_values() {
        let ui = UiState {
            last_selected_type: SelectedKind::DirLink,
            focused_panel: Panel::Right,
            ..Default::default()
        };
        let json = serde_json::to_value(&ui).unwrap();
        assert_eq!(json["last_selected_type"], "dir_link");
        assert_eq!(json["focused_panel"], "right");
        assert_eq!(json["left_sort_mode"], "custom");
        assert_eq!(json["dir_sort_mode"], "name");
        // expanded set serializes as an array
        assert!(json["expanded_groups"].is_array());
    }

    #[test]
    fn ui_state_defaults_from_empty_object() {
        let ui: UiState = serde_json::from_str("{}").unwrap();
        assert_eq!(ui, UiState::default());
        assert!(ui.left_sort_asc);
        assert_eq!(ui.dir_sort_mode, SortMode::Name);
    }
}
