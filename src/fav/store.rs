//! Path-addressed CRUD over the favorites tree.
//!
//! Every operation takes the full `Data` tree (and the `UiState` document
//! where view paths must stay consistent) as explicit arguments; callers own
//! the load → mutate → save cycle. Operations are all-or-nothing: any
//! validation failure returns before the first splice, except `move_item`,
//! which compensates with an explicit rollback.

use std::path::Path as FsPath;

use crate::error::{AppError, Result};

use super::model::{Data, DirLink, Group, Item, ItemKind, UiState};
use super::path;
use super::sort::{self, SortMode};
use super::stat_cache::StatCache;

/// Resolve a group by dot-path. Each segment must exactly match a group
/// name at that depth; dir links never match. Empty path resolves nothing.
pub fn find_group<'a>(data: &'a Data, tree_path: &str) -> Option<&'a Group> {
    let mut list = &data.groups;
    let mut found = None;
    for segment in path::split(tree_path) {
        let group = list.iter().find(|g| g.name == segment)?;
        list = &group.children;
        found = Some(group);
    }
    found
}

/// Mutable variant of [`find_group`].
pub fn find_group_mut<'a>(data: &'a mut Data, tree_path: &str) -> Option<&'a mut Group> {
    let segments = path::split(tree_path);
    let (last, ancestors) = segments.split_last()?;
    let mut list = &mut data.groups;
    for segment in ancestors {
        let group = list.iter_mut().find(|g| g.name == *segment)?;
        list = &mut group.children;
    }
    list.iter_mut().find(|g| g.name == *last)
}

/// Resolve a directory link by dot-path (parent group path + link name).
/// Links cannot live at the root, so a depth under 2 never resolves.
pub fn find_dir_link<'a>(data: &'a Data, tree_path: &str) -> Option<&'a DirLink> {
    if path::depth(tree_path) < 2 {
        return None;
    }
    let parent = find_group(data, path::parent(tree_path))?;
    let name = path::name(tree_path);
    parent.dir_links.iter().find(|l| l.name == name)
}

/// Every group's dot-path in pre-order. Dir links are excluded.
pub fn group_list(data: &Data) -> Vec<String> {
    fn walk(groups: &[Group], prefix: &str, out: &mut Vec<String>) {
        for group in groups {
            let group_path = path::build_moved_path(&group.name, prefix);
            out.push(group_path.clone());
            walk(&group.children, &group_path, out);
        }
    }
    let mut out = Vec::new();
    walk(&data.groups, "", &mut out);
    out
}

/// A sibling level: either the root forest or a parent group's children.
enum Level<'a> {
    Root(&'a mut Vec<Group>),
    Nested(&'a mut Group),
}

impl<'a> Level<'a> {
    fn lists(&mut self) -> (&mut Vec<Group>, Option<&mut Vec<DirLink>>) {
        match self {
            Level::Root(groups) => (groups, None),
            Level::Nested(group) => (&mut group.children, Some(&mut group.dir_links)),
        }
    }
}

fn level_mut<'a>(data: &'a mut Data, parent_path: &str) -> Option<Level<'a>> {
    if parent_path.is_empty() {
        Some(Level::Root(&mut data.groups))
    } else {
        find_group_mut(data, parent_path).map(Level::Nested)
    }
}

/// No two siblings — group or dir link — may share a name.
fn name_taken(children: &[Group], dir_links: &[DirLink], name: &str) -> bool {
    children.iter().any(|g| g.name == name) || dir_links.iter().any(|l| l.name == name)
}

/// Next order in the shared counter spanning child groups and dir links.
fn next_sibling_order(children: &[Group], dir_links: &[DirLink]) -> i64 {
    children
        .iter()
        .map(|g| g.order)
        .chain(dir_links.iter().map(|l| l.order))
        .max()
        .unwrap_or(0)
        + 1
}

/// Rewrite every UI path affected by a rename or move of `old` to `new`.
fn rewrite_ui_paths(ui: &mut UiState, old: &str, new: &str) {
    let expanded = std::mem::take(&mut ui.expanded_groups);
    ui.expanded_groups = expanded
        .into_iter()
        .map(|p| path::rewrite_path(&p, old, new).unwrap_or(p))
        .collect();
    for slot in [&mut ui.last_selected_group, &mut ui.last_selected_dir_link] {
        if let Some(current) = slot.as_deref() {
            if let Some(rewritten) = path::rewrite_path(current, old, new) {
                *slot = Some(rewritten);
            }
        }
    }
}

/// Drop every UI path equal to or nested under a removed group.
fn drop_ui_paths_under(ui: &mut UiState, removed: &str) {
    ui.expanded_groups
        .retain(|p| p != removed && !path::is_descendant(removed, p));
    for slot in [&mut ui.last_selected_group, &mut ui.last_selected_dir_link] {
        let dead = slot
            .as_deref()
            .map(|p| p == removed || path::is_descendant(removed, p))
            .unwrap_or(false);
        if dead {
            *slot = None;
        }
    }
}

/// Create an empty group under `parent_path` (root when empty).
/// Returns the new group's dot-path.
pub fn add_group(data: &mut Data, parent_path: &str, name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(AppError::EmptyName);
    }
    let mut level = level_mut(data, parent_path)
        .ok_or_else(|| AppError::MissingParent(parent_path.to_string()))?;
    let (children, dir_links) = level.lists();
    let links: &[DirLink] = dir_links.as_deref().map(Vec::as_slice).unwrap_or(&[]);
    if name_taken(children, links, name) {
        return Err(AppError::DuplicateName(name.to_string()));
    }
    let order = next_sibling_order(children, links);
    children.push(Group::new(name, order));
    Ok(path::build_moved_path(name, parent_path))
}

/// Remove a group and its whole subtree. Protected names are vetoed.
pub fn remove_group(
    data: &mut Data,
    ui: &mut UiState,
    tree_path: &str,
    protected: &[String],
) -> Result<()> {
    let name = path::name(tree_path);
    let mut level = level_mut(data, path::parent(tree_path))
        .ok_or_else(|| AppError::GroupNotFound(tree_path.to_string()))?;
    let (children, _) = level.lists();
    let idx = children
        .iter()
        .position(|g| g.name == name)
        .ok_or_else(|| AppError::GroupNotFound(tree_path.to_string()))?;
    if protected.iter().any(|p| p == name) {
        return Err(AppError::Protected(name.to_string()));
    }
    children.remove(idx);
    drop_ui_paths_under(ui, tree_path);
    Ok(())
}

/// Rename a group in place and rewrite every UI path below it.
/// Returns the group's new dot-path.
pub fn rename_group(
    data: &mut Data,
    ui: &mut UiState,
    tree_path: &str,
    new_name: &str,
) -> Result<String> {
    if new_name.is_empty() {
        return Err(AppError::EmptyName);
    }
    let old_name = path::name(tree_path).to_string();
    let mut level = level_mut(data, path::parent(tree_path))
        .ok_or_else(|| AppError::GroupNotFound(tree_path.to_string()))?;
    let (children, dir_links) = level.lists();
    let links: &[DirLink] = dir_links.as_deref().map(Vec::as_slice).unwrap_or(&[]);
    if !children.iter().any(|g| g.name == old_name) {
        return Err(AppError::GroupNotFound(tree_path.to_string()));
    }
    if new_name != old_name && name_taken(children, links, new_name) {
        return Err(AppError::DuplicateName(new_name.to_string()));
    }
    if let Some(group) = children.iter_mut().find(|g| g.name == old_name) {
        group.name = new_name.to_string();
    }
    let new_path = path::rename_last_segment(tree_path, new_name);
    rewrite_ui_paths(ui, tree_path, &new_path);
    Ok(new_path)
}

/// Move a group under a new parent (root when empty).
///
/// Cycle prevention walks the path strings, since the subtree has not moved
/// yet. Returns the group's new dot-path.
pub fn move_group(
    data: &mut Data,
    ui: &mut UiState,
    tree_path: &str,
    new_parent: &str,
    protected: &[String],
) -> Result<String> {
    let name = path::name(tree_path).to_string();
    if find_group(data, tree_path).is_none() {
        return Err(AppError::GroupNotFound(tree_path.to_string()));
    }
    if protected.iter().any(|p| p == &name) {
        return Err(AppError::Protected(name));
    }
    if new_parent == tree_path || path::is_descendant(tree_path, new_parent) {
        return Err(AppError::CyclicMove(tree_path.to_string()));
    }

    // validate destination before touching the source
    {
        let (dest_children, dest_links): (&[Group], &[DirLink]) = if new_parent.is_empty() {
            (&data.groups, &[])
        } else {
            let dest = find_group(data, new_parent)
                .ok_or_else(|| AppError::MissingParent(new_parent.to_string()))?;
            (&dest.children, &dest.dir_links)
        };
        if name_taken(dest_children, dest_links, &name) {
            return Err(AppError::DuplicateName(name));
        }
    }

    let source_parent = path::parent(tree_path).to_string();
    let (mut group, source_idx) = {
        let mut level = level_mut(data, &source_parent)
            .ok_or_else(|| AppError::GroupNotFound(tree_path.to_string()))?;
        let (children, _) = level.lists();
        let idx = children
            .iter()
            .position(|g| g.name == name)
            .ok_or_else(|| AppError::GroupNotFound(tree_path.to_string()))?;
        (children.remove(idx), idx)
    };

    match level_mut(data, new_parent) {
        Some(mut level) => {
            let (dest_children, _) = level.lists();
            group.order = dest_children.len() as i64 + 1;
            dest_children.push(group);
        }
        None => {
            // destination was validated above; restore the source on the
            // off chance resolution still failed
            if let Some(mut level) = level_mut(data, &source_parent) {
                level.lists().0.insert(source_idx, group);
            }
            return Err(AppError::MissingParent(new_parent.to_string()));
        }
    }

    let new_path = path::build_moved_path(&name, new_parent);
    rewrite_ui_paths(ui, tree_path, &new_path);
    Ok(new_path)
}

/// Attach a directory link to a group. The directory must exist on disk at
/// add time; it is not re-validated afterward.
pub fn add_dir_link(
    data: &mut Data,
    parent_path: &str,
    name: &str,
    dir_path: &FsPath,
) -> Result<()> {
    if parent_path.is_empty() {
        return Err(AppError::DirLinkAtRoot);
    }
    if name.is_empty() {
        return Err(AppError::EmptyName);
    }
    let canonical = std::fs::canonicalize(dir_path)
        .map_err(|_| AppError::InvalidPath(format!("{} does not exist", dir_path.display())))?;
    if !canonical.is_dir() {
        return Err(AppError::InvalidPath(format!(
            "{} is not a directory",
            dir_path.display()
        )));
    }
    let parent = find_group_mut(data, parent_path)
        .ok_or_else(|| AppError::MissingParent(parent_path.to_string()))?;
    if name_taken(&parent.children, &parent.dir_links, name) {
        return Err(AppError::DuplicateName(name.to_string()));
    }
    let order = next_sibling_order(&parent.children, &parent.dir_links);
    parent.dir_links.push(DirLink {
        name: name.to_string(),
        path: canonical.to_string_lossy().into_owned(),
        order,
    });
    Ok(())
}

/// Detach a directory link by exact name within its parent group.
pub fn remove_dir_link(
    data: &mut Data,
    ui: &mut UiState,
    parent_path: &str,
    name: &str,
) -> Result<()> {
    let full_path = path::build_moved_path(name, parent_path);
    let parent = find_group_mut(data, parent_path)
        .ok_or_else(|| AppError::DirLinkNotFound(full_path.clone()))?;
    let idx = parent
        .dir_links
        .iter()
        .position(|l| l.name == name)
        .ok_or_else(|| AppError::DirLinkNotFound(full_path.clone()))?;
    parent.dir_links.remove(idx);
    if ui.last_selected_dir_link.as_deref() == Some(full_path.as_str()) {
        ui.last_selected_dir_link = None;
        ui.dir_link_current_path = None;
    }
    Ok(())
}

/// Favorite a filesystem path into a group. The path is canonicalized and
/// classified by probing the filesystem; duplicates (exact canonical string)
/// are rejected. Returns the stored canonical path.
pub fn add_item(data: &mut Data, group_path: &str, fs_path: &FsPath) -> Result<String> {
    let group = find_group_mut(data, group_path)
        .ok_or_else(|| AppError::GroupNotFound(group_path.to_string()))?;
    let canonical = std::fs::canonicalize(fs_path)
        .map_err(|_| AppError::InvalidPath(format!("{} does not exist", fs_path.display())))?;
    let kind = if canonical.is_dir() {
        ItemKind::Dir
    } else {
        ItemKind::File
    };
    let canonical_str = canonical.to_string_lossy().into_owned();
    if group.items.iter().any(|i| i.path == canonical_str) {
        return Err(AppError::DuplicateItem(canonical_str));
    }
    let order = group.items.iter().map(|i| i.order).max().unwrap_or(0) + 1;
    group.items.push(Item {
        path: canonical_str.clone(),
        kind,
        order,
    });
    Ok(canonical_str)
}

/// Remove an item by its stored path and renumber the survivors.
pub fn remove_item(data: &mut Data, group_path: &str, item_path: &str) -> Result<()> {
    let group = find_group_mut(data, group_path)
        .ok_or_else(|| AppError::GroupNotFound(group_path.to_string()))?;
    let idx = group
        .items
        .iter()
        .position(|i| i.path == item_path)
        .ok_or_else(|| AppError::ItemNotFound(item_path.to_string()))?;
    group.items.remove(idx);
    sort::renumber(&mut group.items);
    Ok(())
}

/// Move an item between groups by its stored path.
///
/// The removal happens before the destination duplicate check, so a
/// duplicate triggers a compensating reinsert at the original index rather
/// than losing the item.
pub fn move_item(
    data: &mut Data,
    from_group: &str,
    item_path: &str,
    to_group: &str,
) -> Result<()> {
    if find_group(data, to_group).is_none() {
        return Err(AppError::GroupNotFound(to_group.to_string()));
    }
    let (mut item, original_idx) = {
        let source = find_group_mut(data, from_group)
            .ok_or_else(|| AppError::GroupNotFound(from_group.to_string()))?;
        let idx = source
            .items
            .iter()
            .position(|i| i.path == item_path)
            .ok_or_else(|| AppError::ItemNotFound(item_path.to_string()))?;
        (source.items.remove(idx), idx)
    };

    let duplicate = find_group(data, to_group)
        .map(|g| g.items.iter().any(|i| i.path == item.path))
        .unwrap_or(false);
    if duplicate {
        if let Some(source) = find_group_mut(data, from_group) {
            source.items.insert(original_idx, item);
        }
        return Err(AppError::DuplicateItem(item_path.to_string()));
    }

    match find_group_mut(data, to_group) {
        Some(dest) => {
            item.order = dest.items.iter().map(|i| i.order).max().unwrap_or(0) + 1;
            dest.items.push(item);
        }
        None => {
            if let Some(source) = find_group_mut(data, from_group) {
                source.items.insert(original_idx, item);
            }
            return Err(AppError::GroupNotFound(to_group.to_string()));
        }
    }

    if let Some(source) = find_group_mut(data, from_group) {
        sort::renumber(&mut source.items);
    }
    Ok(())
}

/// Flip a group's membership in the expanded set. Returns the new state.
pub fn toggle_expanded(ui: &mut UiState, tree_path: &str) -> bool {
    if ui.expanded_groups.remove(tree_path) {
        false
    } else {
        ui.expanded_groups.insert(tree_path.to_string());
        true
    }
}

/// Capture the currently displayed item order of a group into its persisted
/// `order` fields, making it the new custom order.
pub fn freeze_item_order(
    data: &mut Data,
    group_path: &str,
    mode: SortMode,
    ascending: bool,
    cache: &StatCache,
) -> Result<()> {
    let group = find_group_mut(data, group_path)
        .ok_or_else(|| AppError::GroupNotFound(group_path.to_string()))?;
    let cmp = sort::comparator(mode, ascending, Some(cache), true);
    group.items.sort_by(|a, b| cmp(a, b));
    sort::renumber(&mut group.items);
    Ok(())
}

/// Capture alphabetical sibling order (groups and dir links merged) into the
/// shared persisted order counter of one level.
pub fn freeze_sibling_order(data: &mut Data, parent_path: &str, ascending: bool) -> Result<()> {
    let mut level = level_mut(data, parent_path)
        .ok_or_else(|| AppError::MissingParent(parent_path.to_string()))?;
    let (children, mut dir_links) = level.lists();

    let mut merged: Vec<(String, bool, usize)> = children
        .iter()
        .enumerate()
        .map(|(i, g)| (g.name.to_lowercase(), false, i))
        .collect();
    if let Some(links) = dir_links.as_deref() {
        merged.extend(
            links
                .iter()
                .enumerate()
                .map(|(i, l)| (l.name.to_lowercase(), true, i)),
        );
    }
    merged.sort_by(|a, b| a.0.cmp(&b.0));
    if !ascending {
        merged.reverse();
    }

    for (pos, (_, is_link, idx)) in merged.into_iter().enumerate() {
        let order = pos as i64 + 1;
        if is_link {
            if let Some(links) = dir_links.as_deref_mut() {
                links[idx].order = order;
            }
        } else {
            children[idx].order = order;
        }
    }
    Ok(())
}
