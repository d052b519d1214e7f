use std::path::{Path, PathBuf};
use std::time::Instant;

use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::event::Event;
use crate::fav::browse::{self, DirEntryInfo};
use crate::fav::model::{Data, Item, Panel, SelectedKind, UiState};
use crate::fav::path as tree_path;
use crate::fav::persist;
use crate::fav::sort::{self, LeftSortMode, SortMode};
use crate::fav::stat_cache::StatCache;
use crate::fav::store;
use crate::fav::view::{self, TreeNode};
use crate::theme::{resolve_theme, ThemeColors};

/// Label offered in move dialogs for the root of the tree.
pub const TOP_LEVEL_LABEL: &str = "(top level)";

/// The kind of dialog being displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKind {
    AddRootGroup,
    AddSubGroup { parent: String },
    AddDirLinkName { parent: String },
    AddDirLinkPath { parent: String, name: String },
    AddItem { group: String },
    RenameGroup { path: String },
    MoveGroup { path: String },
    MoveItem { group: String, item_path: String },
    ConfirmRemoveGroup { path: String },
    ConfirmRemoveDirLink { parent: String, name: String },
    ConfirmRemoveItem { group: String, item_path: String },
}

impl DialogKind {
    /// Dialog title shown in the border.
    pub fn title(&self) -> String {
        match self {
            DialogKind::AddRootGroup => "New Top-Level Group".into(),
            DialogKind::AddSubGroup { parent } => format!("New Group in {}", parent),
            DialogKind::AddDirLinkName { parent } => format!("New Directory Link in {}", parent),
            DialogKind::AddDirLinkPath { name, .. } => format!("Directory for '{}'", name),
            DialogKind::AddItem { group } => format!("Add Favorite to {}", group),
            DialogKind::RenameGroup { path } => format!("Rename {}", path),
            DialogKind::MoveGroup { path } => format!("Move {} to...", path),
            DialogKind::MoveItem { .. } => "Move Item to...".into(),
            DialogKind::ConfirmRemoveGroup { .. }
            | DialogKind::ConfirmRemoveDirLink { .. }
            | DialogKind::ConfirmRemoveItem { .. } => "Confirm Removal".into(),
        }
    }

    pub fn is_select(&self) -> bool {
        matches!(self, DialogKind::MoveGroup { .. } | DialogKind::MoveItem { .. })
    }

    pub fn is_confirm(&self) -> bool {
        matches!(
            self,
            DialogKind::ConfirmRemoveGroup { .. }
                | DialogKind::ConfirmRemoveDirLink { .. }
                | DialogKind::ConfirmRemoveItem { .. }
        )
    }

    /// Message body for confirm dialogs.
    pub fn confirm_message(&self) -> String {
        match self {
            DialogKind::ConfirmRemoveGroup { path } => {
                format!("Remove group '{}' and everything in it?", path)
            }
            DialogKind::ConfirmRemoveDirLink { parent, name } => {
                format!("Remove directory link '{}.{}'?", parent, name)
            }
            DialogKind::ConfirmRemoveItem { item_path, .. } => {
                format!("Remove favorite '{}'?", item_path)
            }
            _ => String::new(),
        }
    }
}

/// Application mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Normal,
    Dialog(DialogKind),
    Help,
}

/// State for a dialog's text input or option list.
#[derive(Debug, Default)]
pub struct DialogState {
    pub input: String,
    pub cursor_position: usize,
    pub options: Vec<String>,
    pub selected: usize,
}

/// What the right panel is currently showing.
#[derive(Debug, Default)]
pub enum RightPane {
    #[default]
    Empty,
    /// A group's favorites, sorted per the right panel settings.
    Items { group: String, rows: Vec<Item> },
    /// A live directory listing (dir link or browse mode).
    Dir { dir: PathBuf, rows: Vec<DirEntryInfo> },
}

/// Main application state.
pub struct App {
    pub theme: ThemeColors,
    pub data: Data,
    pub ui: UiState,
    pub cache: StatCache,
    pub data_file: PathBuf,
    pub state_file: PathBuf,
    pub protected_groups: Vec<String>,
    pub confirm_delete: bool,
    pub mode: AppMode,
    pub dialog: DialogState,
    pub status_message: Option<(String, bool, Instant)>,
    pub should_quit: bool,
    /// Current projection of the favorites tree (left panel rows).
    pub nodes: Vec<TreeNode>,
    pub right: RightPane,
    pub left_scroll: usize,
    pub right_scroll: usize,
    pub help_scroll: usize,
    /// Progress of an in-flight metadata prefetch, for the status bar.
    pub prefetch_progress: Option<(usize, usize)>,
    prefetch_generation: u64,
    event_tx: mpsc::UnboundedSender<Event>,
}

impl App {
    /// Load both documents and build the initial projection.
    pub fn new(config: &AppConfig, event_tx: mpsc::UnboundedSender<Event>) -> Self {
        let data_file = config.data_file();
        let state_file = config.state_file();
        let data = persist::load_data(&data_file, &config.default_groups());
        let ui = persist::load_ui_state(&state_file);
        let mut app = Self {
            theme: resolve_theme(config.theme_scheme()),
            data,
            ui,
            cache: StatCache::with_ttl(config.stat_ttl()),
            data_file,
            state_file,
            protected_groups: config.protected_groups(),
            confirm_delete: config.confirm_delete(),
            mode: AppMode::Normal,
            dialog: DialogState::default(),
            status_message: None,
            should_quit: false,
            nodes: Vec::new(),
            right: RightPane::Empty,
            left_scroll: 0,
            right_scroll: 0,
            help_scroll: 0,
            prefetch_progress: None,
            prefetch_generation: 0,
            event_tx,
        };
        app.refresh_tree();
        app.refresh_right();
        app
    }

    // ── Projection & panes ──────────────────────────────────────────────────

    /// Rebuild the left panel rows from the tree and clamp the cursor.
    pub fn refresh_tree(&mut self) {
        self.nodes = view::build_tree(&self.data, &self.ui);
        if self.nodes.is_empty() {
            self.ui.left_cursor.row = 0;
        } else if self.ui.left_cursor.row >= self.nodes.len() {
            self.ui.left_cursor.row = self.nodes.len() - 1;
        }
    }

    /// Rebuild the right panel content for the current selection.
    pub fn refresh_right(&mut self) {
        self.right = if self.ui.is_browsing_directory {
            match self.ui.browse_current_path.clone() {
                Some(p) => self.build_dir_pane(PathBuf::from(p)),
                None => RightPane::Empty,
            }
        } else {
            match self.selected_node().cloned() {
                Some(node) if node.is_dir_link => {
                    let current = self
                        .ui
                        .dir_link_current_path
                        .clone()
                        .filter(|_| {
                            self.ui.last_selected_dir_link.as_deref()
                                == Some(node.full_path.as_str())
                        })
                        .or(node.dir_path);
                    match current {
                        Some(dir) => self.build_dir_pane(PathBuf::from(dir)),
                        None => RightPane::Empty,
                    }
                }
                Some(node) => self.build_items_pane(&node.full_path),
                None => RightPane::Empty,
            }
        };
        self.clamp_right_cursor();
    }

    fn build_items_pane(&mut self, group_path: &str) -> RightPane {
        let mut rows = match store::find_group(&self.data, group_path) {
            Some(group) => group.items.clone(),
            None => return RightPane::Empty,
        };
        let mode = self.ui.right_sort_mode;
        if mode.needs_metadata() {
            self.ensure_metadata(rows.iter().map(|i| PathBuf::from(&i.path)).collect());
        }
        let cmp = sort::comparator(mode, self.ui.right_sort_asc, Some(&self.cache), false);
        rows.sort_by(|a, b| cmp(a, b));
        RightPane::Items {
            group: group_path.to_string(),
            rows,
        }
    }

    fn build_dir_pane(&mut self, dir: PathBuf) -> RightPane {
        let mut rows = match browse::list_dir(&dir) {
            Ok(rows) => rows,
            Err(e) => {
                self.set_error(e.to_string());
                return RightPane::Empty;
            }
        };
        let mode = self.dir_mode();
        if mode.needs_metadata() {
            self.ensure_metadata(
                rows.iter()
                    .filter(|e| !e.is_parent)
                    .map(|e| e.path.clone())
                    .collect(),
            );
        }
        browse::sort_entries(&mut rows, mode, self.ui.dir_sort_asc, &self.cache, false);
        RightPane::Dir { dir, rows }
    }

    /// Directory listings have no persisted custom order; fall back to name.
    fn dir_mode(&self) -> SortMode {
        match self.ui.dir_sort_mode {
            SortMode::Custom => SortMode::Name,
            mode => mode,
        }
    }

    pub fn selected_node(&self) -> Option<&TreeNode> {
        self.nodes.get(self.ui.left_cursor.row)
    }

    pub fn right_len(&self) -> usize {
        match &self.right {
            RightPane::Empty => 0,
            RightPane::Items { rows, .. } => rows.len(),
            RightPane::Dir { rows, .. } => rows.len(),
        }
    }

    fn clamp_right_cursor(&mut self) {
        let len = self.right_len();
        if len == 0 {
            self.ui.right_cursor.row = 0;
        } else if self.ui.right_cursor.row >= len {
            self.ui.right_cursor.row = len - 1;
        }
    }

    // ── Metadata prefetch ───────────────────────────────────────────────────

    /// Kick off a prefetch when any path lacks a fresh cache entry. Cached
    /// failures count as fresh, so a listing with missing files settles.
    fn ensure_metadata(&mut self, paths: Vec<PathBuf>) {
        if paths.is_empty() || paths.iter().all(|p| self.cache.contains_fresh(p)) {
            return;
        }
        self.prefetch_generation += 1;
        let generation = self.prefetch_generation;
        let progress_tx = self.event_tx.clone();
        let complete_tx = self.event_tx.clone();
        self.cache.prefetch(
            paths,
            move |done, total| {
                let _ = progress_tx.send(Event::PrefetchProgress {
                    done,
                    total,
                    generation,
                });
            },
            move || {
                let _ = complete_tx.send(Event::PrefetchComplete { generation });
            },
        );
    }

    pub fn handle_prefetch_progress(&mut self, done: usize, total: usize, generation: u64) {
        if generation == self.prefetch_generation {
            self.prefetch_progress = Some((done, total));
        }
    }

    /// A superseded batch may still complete; only the latest one re-sorts.
    pub fn handle_prefetch_complete(&mut self, generation: u64) {
        if generation == self.prefetch_generation {
            self.prefetch_progress = None;
            self.refresh_right();
        }
    }

    // ── Persistence funnels ─────────────────────────────────────────────────

    fn save_data_doc(&mut self) {
        if let Err(e) = persist::save_data(&self.data_file, &self.data) {
            self.set_error(format!("Saving favorites failed: {}", e));
        }
    }

    fn save_state_doc(&mut self) {
        if let Err(e) = persist::save_ui_state(&self.state_file, &self.ui) {
            self.set_error(format!("Saving view state failed: {}", e));
        }
    }

    // ── Status messages ─────────────────────────────────────────────────────

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), false, Instant::now()));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), true, Instant::now()));
    }

    /// Clear the status message if it has been displayed for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, _, ref created)) = self.status_message {
            if created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }

    // ── Navigation ──────────────────────────────────────────────────────────

    pub fn select_next(&mut self) {
        match self.ui.focused_panel {
            Panel::Left => {
                if !self.nodes.is_empty() && self.ui.left_cursor.row + 1 < self.nodes.len() {
                    self.ui.left_cursor.row += 1;
                    self.on_left_cursor_moved();
                }
            }
            Panel::Right => {
                if self.right_len() > 0 && self.ui.right_cursor.row + 1 < self.right_len() {
                    self.ui.right_cursor.row += 1;
                    self.save_state_doc();
                }
            }
        }
    }

    pub fn select_previous(&mut self) {
        match self.ui.focused_panel {
            Panel::Left => {
                if self.ui.left_cursor.row > 0 {
                    self.ui.left_cursor.row -= 1;
                    self.on_left_cursor_moved();
                }
            }
            Panel::Right => {
                if self.ui.right_cursor.row > 0 {
                    self.ui.right_cursor.row -= 1;
                    self.save_state_doc();
                }
            }
        }
    }

    pub fn select_first(&mut self) {
        match self.ui.focused_panel {
            Panel::Left => {
                self.ui.left_cursor.row = 0;
                self.on_left_cursor_moved();
            }
            Panel::Right => {
                self.ui.right_cursor.row = 0;
                self.save_state_doc();
            }
        }
    }

    pub fn select_last(&mut self) {
        match self.ui.focused_panel {
            Panel::Left => {
                if !self.nodes.is_empty() {
                    self.ui.left_cursor.row = self.nodes.len() - 1;
                }
                self.on_left_cursor_moved();
            }
            Panel::Right => {
                if self.right_len() > 0 {
                    self.ui.right_cursor.row = self.right_len() - 1;
                }
                self.save_state_doc();
            }
        }
    }

    fn on_left_cursor_moved(&mut self) {
        self.sync_selection();
        self.save_state_doc();
        self.refresh_right();
    }

    /// Record what the cursor points at so the next session can restore it.
    fn sync_selection(&mut self) {
        let Some(node) = self.selected_node().cloned() else {
            return;
        };
        if node.is_dir_link {
            self.ui.last_selected_type = SelectedKind::DirLink;
            if self.ui.last_selected_dir_link.as_deref() != Some(node.full_path.as_str()) {
                self.ui.last_selected_dir_link = Some(node.full_path);
                self.ui.dir_link_current_path = None;
            }
        } else {
            self.ui.last_selected_type = SelectedKind::Group;
            self.ui.last_selected_group = Some(node.full_path);
        }
    }

    pub fn toggle_panel(&mut self) {
        self.ui.focused_panel = match self.ui.focused_panel {
            Panel::Left => Panel::Right,
            Panel::Right => Panel::Left,
        };
        self.save_state_doc();
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    // ── Expansion & activation ──────────────────────────────────────────────

    /// Toggle expansion of the selected group.
    pub fn toggle_expand_selected(&mut self) {
        let Some(node) = self.selected_node().cloned() else {
            return;
        };
        if node.is_dir_link || !node.has_children {
            return;
        }
        store::toggle_expanded(&mut self.ui, &node.full_path);
        self.save_state_doc();
        self.refresh_tree();
        self.refresh_right();
    }

    /// Enter: expand/collapse a group, open a dir link, descend into a
    /// directory row, or reveal a file's path.
    pub fn activate(&mut self) {
        match self.ui.focused_panel {
            Panel::Left => self.activate_left(),
            Panel::Right => self.activate_right(),
        }
    }

    fn activate_left(&mut self) {
        let Some(node) = self.selected_node().cloned() else {
            return;
        };
        if node.is_dir_link {
            self.ui.last_selected_type = SelectedKind::DirLink;
            self.ui.last_selected_dir_link = Some(node.full_path.clone());
            self.ui.dir_link_current_path = node.dir_path.clone();
            self.ui.focused_panel = Panel::Right;
            self.ui.right_cursor.row = 0;
            self.save_state_doc();
            self.refresh_right();
        } else {
            self.toggle_expand_selected();
        }
    }

    fn activate_right(&mut self) {
        let row = self.ui.right_cursor.row;
        match &self.right {
            RightPane::Empty => {}
            RightPane::Items { rows, .. } => {
                let Some(item) = rows.get(row).cloned() else {
                    return;
                };
                match item.kind {
                    crate::fav::model::ItemKind::Dir => self.start_browse(&item.path),
                    crate::fav::model::ItemKind::File => {
                        self.set_status(item.path);
                    }
                }
            }
            RightPane::Dir { rows, .. } => {
                let Some(entry) = rows.get(row).cloned() else {
                    return;
                };
                if entry.is_dir {
                    self.navigate_dir(entry.path);
                } else {
                    self.set_status(entry.path.to_string_lossy().into_owned());
                }
            }
        }
    }

    /// Step the active directory pane (browse or dir link) to another dir.
    fn navigate_dir(&mut self, dir: PathBuf) {
        let dir_str = dir.to_string_lossy().into_owned();
        if self.ui.is_browsing_directory {
            self.ui.browse_current_path = Some(dir_str);
        } else {
            self.ui.dir_link_current_path = Some(dir_str);
        }
        self.ui.right_cursor.row = 0;
        self.save_state_doc();
        self.refresh_right();
    }

    /// Go up one directory in the active directory pane.
    pub fn navigate_up(&mut self) {
        let current = if self.ui.is_browsing_directory {
            self.ui.browse_current_path.clone()
        } else {
            self.ui.dir_link_current_path.clone()
        };
        let Some(current) = current else {
            return;
        };
        if let Some(parent) = Path::new(&current).parent() {
            self.navigate_dir(parent.to_path_buf());
        }
    }

    /// Start browsing a favorited directory in the right panel.
    pub fn start_browse(&mut self, dir: &str) {
        self.ui.is_browsing_directory = true;
        self.ui.browse_base_path = Some(dir.to_string());
        self.ui.browse_current_path = Some(dir.to_string());
        self.ui.focused_panel = Panel::Right;
        self.ui.right_cursor.row = 0;
        self.save_state_doc();
        self.refresh_right();
    }

    /// Leave browse mode and return focus to the tree.
    pub fn exit_browse(&mut self) {
        self.ui.is_browsing_directory = false;
        self.ui.browse_base_path = None;
        self.ui.browse_current_path = None;
        self.ui.focused_panel = Panel::Left;
        self.save_state_doc();
        self.refresh_right();
    }

    /// Esc in normal mode: leave browse mode, else refocus the tree.
    pub fn escape(&mut self) {
        if self.ui.is_browsing_directory {
            self.exit_browse();
        } else if self.ui.focused_panel == Panel::Right {
            self.ui.focused_panel = Panel::Left;
            self.save_state_doc();
        }
    }

    /// Collapse the selected group, or jump to its parent row.
    pub fn collapse_selected(&mut self) {
        let Some(node) = self.selected_node().cloned() else {
            return;
        };
        if !node.is_dir_link && node.is_expanded {
            store::toggle_expanded(&mut self.ui, &node.full_path);
            self.save_state_doc();
            self.refresh_tree();
            self.refresh_right();
            return;
        }
        let parent = tree_path::parent(&node.full_path);
        if parent.is_empty() {
            return;
        }
        if let Some(idx) = self.nodes.iter().position(|n| n.full_path == parent) {
            self.ui.left_cursor.row = idx;
            self.on_left_cursor_moved();
        }
    }

    // ── Dialogs ─────────────────────────────────────────────────────────────

    pub fn open_dialog(&mut self, kind: DialogKind) {
        self.dialog = DialogState::default();
        match &kind {
            DialogKind::RenameGroup { path } => {
                let name = tree_path::name(path).to_string();
                self.dialog.cursor_position = name.len();
                self.dialog.input = name;
            }
            DialogKind::MoveGroup { path } => {
                let mut options = vec![TOP_LEVEL_LABEL.to_string()];
                options.extend(
                    store::group_list(&self.data)
                        .into_iter()
                        .filter(|p| p != path && !tree_path::is_descendant(path, p)),
                );
                self.dialog.options = options;
            }
            DialogKind::MoveItem { group, .. } => {
                self.dialog.options = store::group_list(&self.data)
                    .into_iter()
                    .filter(|p| p != group)
                    .collect();
            }
            _ => {}
        }
        self.mode = AppMode::Dialog(kind);
    }

    pub fn close_dialog(&mut self) {
        self.mode = AppMode::Normal;
        self.dialog = DialogState::default();
    }

    /// Open the add dialog appropriate for the current selection.
    pub fn open_add_group(&mut self, at_root: bool) {
        if at_root {
            self.open_dialog(DialogKind::AddRootGroup);
            return;
        }
        match self.selected_group_path() {
            Some(parent) => self.open_dialog(DialogKind::AddSubGroup { parent }),
            None => self.open_dialog(DialogKind::AddRootGroup),
        }
    }

    pub fn open_add_dir_link(&mut self) {
        match self.selected_group_path() {
            Some(parent) => self.open_dialog(DialogKind::AddDirLinkName { parent }),
            None => self.set_error("Select a group first"),
        }
    }

    pub fn open_add_item(&mut self) {
        match self.selected_group_path() {
            Some(group) => self.open_dialog(DialogKind::AddItem { group }),
            None => self.set_error("Select a group first"),
        }
    }

    pub fn open_rename(&mut self) {
        let Some(node) = self.selected_node().cloned() else {
            return;
        };
        if node.is_dir_link {
            self.set_error("Directory links cannot be renamed; remove and re-add");
            return;
        }
        self.open_dialog(DialogKind::RenameGroup {
            path: node.full_path,
        });
    }

    pub fn open_move(&mut self) {
        match self.ui.focused_panel {
            Panel::Left => {
                let Some(node) = self.selected_node().cloned() else {
                    return;
                };
                if node.is_dir_link {
                    self.set_error("Directory links cannot be moved; remove and re-add");
                    return;
                }
                self.open_dialog(DialogKind::MoveGroup {
                    path: node.full_path,
                });
            }
            Panel::Right => {
                if let RightPane::Items { group, rows } = &self.right {
                    if let Some(item) = rows.get(self.ui.right_cursor.row) {
                        let kind = DialogKind::MoveItem {
                            group: group.clone(),
                            item_path: item.path.clone(),
                        };
                        self.open_dialog(kind);
                    }
                }
            }
        }
    }

    pub fn open_remove(&mut self) {
        let kind = match self.ui.focused_panel {
            Panel::Left => {
                let Some(node) = self.selected_node().cloned() else {
                    return;
                };
                if node.is_dir_link {
                    DialogKind::ConfirmRemoveDirLink {
                        parent: tree_path::parent(&node.full_path).to_string(),
                        name: node.name,
                    }
                } else {
                    DialogKind::ConfirmRemoveGroup {
                        path: node.full_path,
                    }
                }
            }
            Panel::Right => match &self.right {
                RightPane::Items { group, rows } => {
                    let Some(item) = rows.get(self.ui.right_cursor.row) else {
                        return;
                    };
                    DialogKind::ConfirmRemoveItem {
                        group: group.clone(),
                        item_path: item.path.clone(),
                    }
                }
                _ => return,
            },
        };
        if self.confirm_delete {
            self.open_dialog(kind);
        } else {
            self.perform_removal(&kind);
        }
    }

    /// The group path the cursor refers to (a dir link resolves to its
    /// parent group).
    fn selected_group_path(&self) -> Option<String> {
        let node = self.selected_node()?;
        if node.is_dir_link {
            Some(tree_path::parent(&node.full_path).to_string())
        } else {
            Some(node.full_path.clone())
        }
    }

    /// Apply the current dialog. Validation failures surface in the status
    /// bar and leave the tree untouched.
    pub fn commit_dialog(&mut self) {
        let AppMode::Dialog(kind) = self.mode.clone() else {
            return;
        };
        let input = self.dialog.input.trim().to_string();
        match kind {
            DialogKind::AddRootGroup => {
                let result = store::add_group(&mut self.data, "", &input)
                    .map(|p| format!("Added group '{}'", p));
                self.finish_mutation(result);
            }
            DialogKind::AddSubGroup { parent } => {
                let result = store::add_group(&mut self.data, &parent, &input)
                    .map(|p| format!("Added group '{}'", p));
                self.finish_mutation(result);
            }
            DialogKind::AddDirLinkName { parent } => {
                if input.is_empty() {
                    self.set_error(crate::error::AppError::EmptyName.to_string());
                    self.close_dialog();
                    return;
                }
                // second step: ask for the directory
                self.open_dialog(DialogKind::AddDirLinkPath {
                    parent,
                    name: input,
                });
            }
            DialogKind::AddDirLinkPath { parent, name } => {
                let dir = expand_tilde(&input);
                let result = store::add_dir_link(&mut self.data, &parent, &name, &dir)
                    .map(|_| format!("Linked '{}' to {}", name, dir.display()));
                self.finish_mutation(result);
            }
            DialogKind::AddItem { group } => {
                let target = expand_tilde(&input);
                let result = store::add_item(&mut self.data, &group, &target)
                    .map(|p| format!("Added '{}'", p));
                self.finish_mutation(result);
            }
            DialogKind::RenameGroup { path } => {
                let result = store::rename_group(&mut self.data, &mut self.ui, &path, &input)
                    .map(|p| format!("Renamed to '{}'", p));
                self.finish_mutation(result);
            }
            DialogKind::MoveGroup { path } => {
                let Some(choice) = self.dialog.options.get(self.dialog.selected).cloned() else {
                    self.close_dialog();
                    return;
                };
                let new_parent = if choice == TOP_LEVEL_LABEL {
                    ""
                } else {
                    choice.as_str()
                };
                let protected = self.protected_groups.clone();
                let result =
                    store::move_group(&mut self.data, &mut self.ui, &path, new_parent, &protected)
                        .map(|p| format!("Moved to '{}'", p));
                self.finish_mutation(result);
            }
            DialogKind::MoveItem { group, item_path } => {
                let Some(choice) = self.dialog.options.get(self.dialog.selected).cloned() else {
                    self.close_dialog();
                    return;
                };
                let result = store::move_item(&mut self.data, &group, &item_path, &choice)
                    .map(|_| format!("Moved item to '{}'", choice));
                self.finish_mutation(result);
            }
            kind if kind.is_confirm() => {
                self.close_dialog();
                self.perform_removal(&kind);
            }
            _ => {}
        }
    }

    fn perform_removal(&mut self, kind: &DialogKind) {
        match kind {
            DialogKind::ConfirmRemoveGroup { path } => {
                let protected = self.protected_groups.clone();
                let result = store::remove_group(&mut self.data, &mut self.ui, path, &protected)
                    .map(|_| format!("Removed group '{}'", path));
                self.finish_mutation(result);
            }
            DialogKind::ConfirmRemoveDirLink { parent, name } => {
                let result = store::remove_dir_link(&mut self.data, &mut self.ui, parent, name)
                    .map(|_| format!("Removed link '{}'", name));
                self.finish_mutation(result);
            }
            DialogKind::ConfirmRemoveItem { group, item_path } => {
                let result = store::remove_item(&mut self.data, group, item_path)
                    .map(|_| format!("Removed '{}'", item_path));
                self.finish_mutation(result);
            }
            _ => {}
        }
    }

    /// Common tail of every mutating dialog: persist on success, report
    /// either way, and rebuild both panes.
    fn finish_mutation(&mut self, result: crate::error::Result<String>) {
        self.close_dialog();
        match result {
            Ok(msg) => {
                self.save_data_doc();
                self.save_state_doc();
                self.refresh_tree();
                self.refresh_right();
                self.set_status(msg);
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    // ── Dialog text editing ─────────────────────────────────────────────────

    pub fn dialog_input_char(&mut self, c: char) {
        self.dialog.input.insert(self.dialog.cursor_position, c);
        self.dialog.cursor_position += c.len_utf8();
    }

    pub fn dialog_delete_char(&mut self) {
        if self.dialog.cursor_position > 0 {
            let byte_pos = self.dialog.cursor_position;
            if let Some(prev_char) = self.dialog.input[..byte_pos].chars().next_back() {
                self.dialog.cursor_position -= prev_char.len_utf8();
                self.dialog.input.remove(self.dialog.cursor_position);
            }
        }
    }

    pub fn dialog_move_cursor_left(&mut self) {
        if self.dialog.cursor_position > 0 {
            if let Some(prev_char) = self.dialog.input[..self.dialog.cursor_position]
                .chars()
                .next_back()
            {
                self.dialog.cursor_position -= prev_char.len_utf8();
            }
        }
    }

    pub fn dialog_move_cursor_right(&mut self) {
        if self.dialog.cursor_position < self.dialog.input.len() {
            if let Some(next_char) = self.dialog.input[self.dialog.cursor_position..]
                .chars()
                .next()
            {
                self.dialog.cursor_position += next_char.len_utf8();
            }
        }
    }

    pub fn dialog_cursor_home(&mut self) {
        self.dialog.cursor_position = 0;
    }

    pub fn dialog_cursor_end(&mut self) {
        self.dialog.cursor_position = self.dialog.input.len();
    }

    pub fn dialog_select_next(&mut self) {
        if !self.dialog.options.is_empty() && self.dialog.selected + 1 < self.dialog.options.len()
        {
            self.dialog.selected += 1;
        }
    }

    pub fn dialog_select_previous(&mut self) {
        if self.dialog.selected > 0 {
            self.dialog.selected -= 1;
        }
    }

    // ── Sorting ─────────────────────────────────────────────────────────────

    /// Cycle the sort mode of whatever the focused panel shows.
    pub fn cycle_sort_mode(&mut self) {
        match self.ui.focused_panel {
            Panel::Left => {
                self.ui.left_sort_mode = self.ui.left_sort_mode.toggle();
                self.save_state_doc();
                self.refresh_tree();
                self.refresh_right();
            }
            Panel::Right => {
                match &self.right {
                    RightPane::Items { .. } => {
                        self.ui.right_sort_mode = self.ui.right_sort_mode.next();
                    }
                    RightPane::Dir { .. } => {
                        self.ui.dir_sort_mode = self.ui.dir_sort_mode.next_dir();
                    }
                    RightPane::Empty => return,
                }
                self.save_state_doc();
                self.refresh_right();
            }
        }
    }

    /// Flip the sort direction of whatever the focused panel shows.
    pub fn toggle_sort_direction(&mut self) {
        match self.ui.focused_panel {
            Panel::Left => {
                self.ui.left_sort_asc = !self.ui.left_sort_asc;
                self.save_state_doc();
                self.refresh_tree();
                self.refresh_right();
            }
            Panel::Right => {
                match &self.right {
                    RightPane::Items { .. } => {
                        self.ui.right_sort_asc = !self.ui.right_sort_asc;
                    }
                    RightPane::Dir { .. } => {
                        self.ui.dir_sort_asc = !self.ui.dir_sort_asc;
                    }
                    RightPane::Empty => return,
                }
                self.save_state_doc();
                self.refresh_right();
            }
        }
    }

    /// Drop cached metadata for what the right panel shows and re-read it.
    pub fn refresh_metadata(&mut self) {
        match &self.right {
            RightPane::Dir { dir, .. } => {
                let dir = dir.clone();
                self.cache.invalidate(Some(&dir));
            }
            RightPane::Items { .. } => self.cache.invalidate(None),
            RightPane::Empty => return,
        }
        self.refresh_right();
        self.set_status("Metadata refreshed");
    }

    /// Freeze the displayed order into the persisted custom order.
    pub fn freeze_sort(&mut self) {
        match self.ui.focused_panel {
            Panel::Left => {
                if self.ui.left_sort_mode != LeftSortMode::Alpha {
                    self.set_status("Tree already in custom order");
                    return;
                }
                let mut parents = vec![String::new()];
                parents.extend(store::group_list(&self.data));
                for parent in parents {
                    let _ =
                        store::freeze_sibling_order(&mut self.data, &parent, self.ui.left_sort_asc);
                }
                self.ui.left_sort_mode = LeftSortMode::Custom;
                self.save_data_doc();
                self.save_state_doc();
                self.refresh_tree();
                self.refresh_right();
                self.set_status("Alphabetical order frozen");
            }
            Panel::Right => {
                let RightPane::Items { group, .. } = &self.right else {
                    self.set_status("Only favorites can be frozen into custom order");
                    return;
                };
                if self.ui.right_sort_mode == SortMode::Custom {
                    self.set_status("Items already in custom order");
                    return;
                }
                let group = group.clone();
                let result = store::freeze_item_order(
                    &mut self.data,
                    &group,
                    self.ui.right_sort_mode,
                    self.ui.right_sort_asc,
                    &self.cache,
                );
                match result {
                    Ok(()) => {
                        self.ui.right_sort_mode = SortMode::Custom;
                        self.save_data_doc();
                        self.save_state_doc();
                        self.refresh_right();
                        self.set_status("Sort order frozen");
                    }
                    Err(e) => self.set_error(e.to_string()),
                }
            }
        }
    }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(input: &str) -> PathBuf {
    if input == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    if let Some(rest) = input.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(input)
}
