//! Projection of the favorites tree into a flat list for rendering.
//!
//! A pure function of (tree, UI state): siblings are ordered per the left
//! panel's sort settings, collapsed subtrees are skipped, and dir links
//! interleave with groups through the shared order space. Nodes carry no
//! identity across rebuilds — consumers re-resolve selection by path.

use std::path::Path;

use super::model::{Data, DirLink, Group, UiState};
use super::path;
use super::sort::{comparator, sibling_comparator, LeftSortMode, SortKey, SortMode};

/// One visible row of the favorites tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub name: String,
    pub full_path: String,
    /// 0-based indentation depth.
    pub level: usize,
    pub is_expanded: bool,
    pub has_children: bool,
    pub is_leaf: bool,
    pub is_dir_link: bool,
    /// Filesystem path carried by dir-link rows.
    pub dir_path: Option<String>,
}

enum ChildRef<'a> {
    Group(&'a Group),
    Link(&'a DirLink),
}

impl<'a> SortKey for ChildRef<'a> {
    fn sort_path(&self) -> Option<&Path> {
        match self {
            ChildRef::Group(_) => None,
            ChildRef::Link(l) => Some(Path::new(&l.path)),
        }
    }

    fn display_name(&self) -> &str {
        match self {
            ChildRef::Group(g) => &g.name,
            ChildRef::Link(l) => &l.name,
        }
    }

    fn is_dir(&self) -> bool {
        true
    }

    fn order(&self) -> i64 {
        match self {
            ChildRef::Group(g) => g.order,
            ChildRef::Link(l) => l.order,
        }
    }
}

/// Build the ordered, expansion-filtered node list for the left panel.
pub fn build_tree(data: &Data, ui: &UiState) -> Vec<TreeNode> {
    let mut nodes = Vec::new();
    push_level(&data.groups, &[], "", 0, ui, &mut nodes);
    nodes
}

fn push_level(
    groups: &[Group],
    dir_links: &[DirLink],
    prefix: &str,
    level: usize,
    ui: &UiState,
    out: &mut Vec<TreeNode>,
) {
    let mut siblings: Vec<ChildRef> = groups
        .iter()
        .map(ChildRef::Group)
        .chain(dir_links.iter().map(ChildRef::Link))
        .collect();
    match ui.left_sort_mode {
        LeftSortMode::Custom => siblings.sort_by(sibling_comparator(ui.left_sort_asc)),
        LeftSortMode::Alpha => {
            siblings.sort_by(comparator(SortMode::Name, ui.left_sort_asc, None, false))
        }
    }

    for sibling in siblings {
        let full_path = path::build_moved_path(sibling.display_name(), prefix);
        match sibling {
            ChildRef::Group(group) => {
                let has_children = !group.children.is_empty() || !group.dir_links.is_empty();
                let is_expanded = ui.expanded_groups.contains(&full_path);
                out.push(TreeNode {
                    name: group.name.clone(),
                    full_path: full_path.clone(),
                    level,
                    is_expanded,
                    has_children,
                    is_leaf: !has_children,
                    is_dir_link: false,
                    dir_path: None,
                });
                if is_expanded && has_children {
                    push_level(
                        &group.children,
                        &group.dir_links,
                        &full_path,
                        level + 1,
                        ui,
                        out,
                    );
                }
            }
            ChildRef::Link(link) => {
                out.push(TreeNode {
                    name: link.name.clone(),
                    full_path,
                    level,
                    is_expanded: false,
                    has_children: false,
                    is_leaf: true,
                    is_dir_link: true,
                    dir_path: Some(link.path.clone()),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fav::store;
    use tempfile::TempDir;

    fn sample() -> (Data, UiState) {
        let mut data = Data::default();
        store::add_group(&mut data, "", "Work").unwrap();
        store::add_group(&mut data, "", "Home").unwrap();
        store::add_group(&mut data, "Work", "Projects").unwrap();
        store::add_group(&mut data, "Work.Projects", "Active").unwrap();
        (data, UiState::default())
    }

    fn names(nodes: &[TreeNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn collapsed_tree_shows_only_top_level() {
        let (data, ui) = sample();
        let nodes = build_tree(&data, &ui);
        assert_eq!(names(&nodes), vec!["Work", "Home"]);
        assert_eq!(nodes[0].level, 0);
        assert!(nodes[0].has_children);
        assert!(!nodes[0].is_expanded);
        assert!(nodes[1].is_leaf);
    }

    #[test]
    fn expansion_reveals_descendants_with_levels() {
        let (data, mut ui) = sample();
        ui.expanded_groups.insert("Work".into());
        ui.expanded_groups.insert("Work.Projects".into());

        let nodes = build_tree(&data, &ui);
        assert_eq!(names(&nodes), vec!["Work", "Projects", "Active", "Home"]);
        let levels: Vec<usize> = nodes.iter().map(|n| n.level).collect();
        assert_eq!(levels, vec![0, 1, 2, 0]);
        assert_eq!(nodes[2].full_path, "Work.Projects.Active");
    }

    #[test]
    fn collapsed_middle_hides_grandchildren() {
        let (data, mut ui) = sample();
        ui.expanded_groups.insert("Work".into());
        let nodes = build_tree(&data, &ui);
        assert_eq!(names(&nodes), vec!["Work", "Projects", "Home"]);
    }

    #[test]
    fn dir_links_interleave_by_shared_order() {
        let dir = TempDir::new().unwrap();
        let (mut data, mut ui) = sample();
        store::add_dir_link(&mut data, "Work", "src", dir.path()).unwrap();
        store::add_group(&mut data, "Work", "Later").unwrap();
        ui.expanded_groups.insert("Work".into());

        let nodes = build_tree(&data, &ui);
        // Projects (order 1), src (order 2), Later (order 3)
        assert_eq!(names(&nodes), vec!["Work", "Projects", "src", "Later", "Home"]);
        let src = &nodes[2];
        assert!(src.is_dir_link);
        assert!(src.is_leaf);
        assert_eq!(src.full_path, "Work.src");
        assert_eq!(src.dir_path.as_deref(), Some(dir.path().to_str().unwrap()));
    }

    #[test]
    fn dir_links_make_a_group_expandable() {
        let dir = TempDir::new().unwrap();
        let (mut data, _) = sample();
        store::add_dir_link(&mut data, "Home", "docs", dir.path()).unwrap();
        let ui = UiState::default();
        let nodes = build_tree(&data, &ui);
        let home = nodes.iter().find(|n| n.name == "Home").unwrap();
        assert!(home.has_children);
        assert!(!home.is_leaf);
    }

    #[test]
    fn descending_reverses_sibling_order() {
        let (data, mut ui) = sample();
        ui.left_sort_asc = false;
        let nodes = build_tree(&data, &ui);
        assert_eq!(names(&nodes), vec!["Home", "Work"]);
    }

    #[test]
    fn alpha_mode_sorts_by_name() {
        let (mut data, mut ui) = sample();
        store::add_group(&mut data, "", "Archive").unwrap();
        ui.left_sort_mode = LeftSortMode::Alpha;
        let nodes = build_tree(&data, &ui);
        assert_eq!(names(&nodes), vec!["Archive", "Home", "Work"]);
    }

    #[test]
    fn rebuild_is_deterministic() {
        let (data, mut ui) = sample();
        ui.expanded_groups.insert("Work".into());
        let one = build_tree(&data, &ui);
        let two = build_tree(&data, &ui);
        assert_eq!(one, two);
    }
}
