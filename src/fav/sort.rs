//! Comparator construction for every sortable collection in the app.
//!
//! One algorithm covers favorite items, mixed group/dir-link siblings and
//! raw directory entries: each entity implements [`SortKey`] to supply its
//! field mapping, and [`comparator`] builds a total order from a mode, a
//! direction and an optional metadata cache. Metadata-dependent modes
//! (created/modified/size) read through the [`StatCache`]; unknown metadata
//! sorts as zero rather than failing.

use std::cmp::Ordering;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::model::{DirLink, Group, Item};
use super::stat_cache::{FileStat, StatCache};

/// Sort criteria for the right panel and directory listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// By the persisted `order` field.
    #[default]
    Custom,
    /// Case-insensitive by display name.
    Name,
    /// Newest creation time first.
    Created,
    /// Newest modification time first.
    Modified,
    /// Largest first; directories count as zero.
    Size,
    /// Directories before files, then by name.
    Type,
}

impl SortMode {
    /// Display label for the status bar.
    pub fn label(&self) -> &'static str {
        match self {
            SortMode::Custom => "Custom",
            SortMode::Name => "Name",
            SortMode::Created => "Created",
            SortMode::Modified => "Modified",
            SortMode::Size => "Size",
            SortMode::Type => "Type",
        }
    }

    /// Cycle through the item-panel modes.
    pub fn next(&self) -> Self {
        match self {
            SortMode::Custom => SortMode::Name,
            SortMode::Name => SortMode::Created,
            SortMode::Created => SortMode::Modified,
            SortMode::Modified => SortMode::Size,
            SortMode::Size => SortMode::Type,
            SortMode::Type => SortMode::Custom,
        }
    }

    /// Cycle through the directory-listing modes (no custom order on disk).
    pub fn next_dir(&self) -> Self {
        match self.next() {
            SortMode::Custom => SortMode::Name,
            other => other,
        }
    }

    /// Whether this mode needs stat metadata to compare entries.
    pub fn needs_metadata(&self) -> bool {
        matches!(self, SortMode::Created | SortMode::Modified | SortMode::Size)
    }
}

/// Sort criteria for the group tree panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeftSortMode {
    /// By the persisted sibling `order` field.
    #[default]
    Custom,
    /// Case-insensitive by name.
    Alpha,
}

impl LeftSortMode {
    pub fn label(&self) -> &'static str {
        match self {
            LeftSortMode::Custom => "Custom",
            LeftSortMode::Alpha => "Alpha",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            LeftSortMode::Custom => LeftSortMode::Alpha,
            LeftSortMode::Alpha => LeftSortMode::Custom,
        }
    }
}

/// Field accessors an entity supplies to participate in sorting.
pub trait SortKey {
    /// Filesystem path for metadata lookups, when the entity has one.
    fn sort_path(&self) -> Option<&Path>;
    /// Name used for alphabetical comparison.
    fn display_name(&self) -> &str;
    fn is_dir(&self) -> bool;
    fn order(&self) -> i64;
}

/// Entities whose persisted order field can be rewritten.
pub trait Reorder {
    fn set_order(&mut self, order: i64);
}

impl SortKey for Item {
    fn sort_path(&self) -> Option<&Path> {
        Some(Path::new(&self.path))
    }

    // Items carry no explicit label; the basename stands in.
    fn display_name(&self) -> &str {
        Path::new(&self.path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.path)
    }

    fn is_dir(&self) -> bool {
        self.kind == super::model::ItemKind::Dir
    }

    fn order(&self) -> i64 {
        self.order
    }
}

impl Reorder for Item {
    fn set_order(&mut self, order: i64) {
        self.order = order;
    }
}

impl SortKey for Group {
    fn sort_path(&self) -> Option<&Path> {
        None
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn is_dir(&self) -> bool {
        true
    }

    fn order(&self) -> i64 {
        self.order
    }
}

impl SortKey for DirLink {
    fn sort_path(&self) -> Option<&Path> {
        Some(Path::new(&self.path))
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn is_dir(&self) -> bool {
        true
    }

    fn order(&self) -> i64 {
        self.order
    }
}

/// Build a comparator for `mode` and `ascending`.
///
/// `cache` supplies stat metadata for created/modified/size; pass `None`
/// when the mode cannot need it. With `blocking` set, cache misses stat the
/// filesystem synchronously; otherwise a miss compares as unknown (zero) and
/// callers are expected to have prefetched.
pub fn comparator<'a, T: SortKey>(
    mode: SortMode,
    ascending: bool,
    cache: Option<&'a StatCache>,
    blocking: bool,
) -> impl Fn(&T, &T) -> Ordering + 'a {
    move |a, b| {
        let ord = base_compare(a, b, mode, cache, blocking);
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    }
}

/// Comparator for mixed group/dir-link siblings: order field only.
pub fn sibling_comparator<T: SortKey>(ascending: bool) -> impl Fn(&T, &T) -> Ordering {
    move |a, b| {
        let ord = a.order().cmp(&b.order());
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    }
}

/// Reassign `order = 1..=N` following current list order.
pub fn renumber<T: Reorder>(list: &mut [T]) {
    for (i, entry) in list.iter_mut().enumerate() {
        entry.set_order(i as i64 + 1);
    }
}

fn base_compare<T: SortKey>(
    a: &T,
    b: &T,
    mode: SortMode,
    cache: Option<&StatCache>,
    blocking: bool,
) -> Ordering {
    match mode {
        SortMode::Custom => a.order().cmp(&b.order()),
        SortMode::Name => name_key(a).cmp(&name_key(b)),
        // Newest first is the ascending baseline for both timestamp modes.
        SortMode::Created => {
            created_secs(b, cache, blocking).cmp(&created_secs(a, cache, blocking))
        }
        SortMode::Modified => {
            modified_secs(b, cache, blocking).cmp(&modified_secs(a, cache, blocking))
        }
        // Largest first; directories and unknown sizes count as zero.
        SortMode::Size => size_bytes(b, cache, blocking).cmp(&size_bytes(a, cache, blocking)),
        SortMode::Type => b
            .is_dir()
            .cmp(&a.is_dir())
            .then_with(|| name_key(a).cmp(&name_key(b))),
    }
}

fn name_key<T: SortKey>(e: &T) -> String {
    e.display_name().to_lowercase()
}

fn stat_of<T: SortKey>(e: &T, cache: Option<&StatCache>, blocking: bool) -> Option<FileStat> {
    let path = e.sort_path()?;
    let cache = cache?;
    if blocking {
        cache.get_blocking(path)
    } else {
        cache.get(path)
    }
}

fn secs(time: Option<SystemTime>) -> u64 {
    time.and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn created_secs<T: SortKey>(e: &T, cache: Option<&StatCache>, blocking: bool) -> u64 {
    secs(stat_of(e, cache, blocking).and_then(|s| s.created))
}

fn modified_secs<T: SortKey>(e: &T, cache: Option<&StatCache>, blocking: bool) -> u64 {
    secs(stat_of(e, cache, blocking).and_then(|s| s.modified))
}

fn size_bytes<T: SortKey>(e: &T, cache: Option<&StatCache>, blocking: bool) -> u64 {
    if e.is_dir() {
        return 0;
    }
    stat_of(e, cache, blocking).map(|s| s.size).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fav::model::ItemKind;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    fn item(path: &str, kind: ItemKind, order: i64) -> Item {
        Item {
            path: path.to_string(),
            kind,
            order,
        }
    }

    #[test]
    fn custom_mode_sorts_by_order() {
        let mut items = vec![
            item("/tmp/c", ItemKind::File, 3),
            item("/tmp/a", ItemKind::File, 1),
            item("/tmp/b", ItemKind::File, 2),
        ];
        items.sort_by(comparator(SortMode::Custom, true, None, false));
        let orders: Vec<i64> = items.iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn name_mode_is_case_insensitive_on_basename() {
        let mut items = vec![
            item("/tmp/Zebra.txt", ItemKind::File, 1),
            item("/tmp/apple.txt", ItemKind::File, 2),
            item("/other/Mango.txt", ItemKind::File, 3),
        ];
        items.sort_by(comparator(SortMode::Name, true, None, false));
        let names: Vec<&str> = items.iter().map(|i| i.display_name()).collect();
        assert_eq!(names, vec!["apple.txt", "Mango.txt", "Zebra.txt"]);
    }

    #[test]
    fn type_mode_puts_directories_first() {
        let mut items = vec![
            item("/tmp/b.txt", ItemKind::File, 1),
            item("/tmp/zdir", ItemKind::Dir, 2),
            item("/tmp/a.txt", ItemKind::File, 3),
            item("/tmp/adir", ItemKind::Dir, 4),
        ];
        items.sort_by(comparator(SortMode::Type, true, None, false));
        let names: Vec<&str> = items.iter().map(|i| i.display_name()).collect();
        assert_eq!(names, vec!["adir", "zdir", "a.txt", "b.txt"]);
    }

    #[test]
    fn descending_is_exact_reverse() {
        let make = || {
            vec![
                item("/tmp/c.txt", ItemKind::File, 1),
                item("/tmp/a.txt", ItemKind::File, 2),
                item("/tmp/b.txt", ItemKind::File, 3),
            ]
        };
        let mut asc = make();
        asc.sort_by(comparator(SortMode::Name, true, None, false));
        let mut desc = make();
        desc.sort_by(comparator(SortMode::Name, false, None, false));
        asc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn sort_is_deterministic() {
        let make = || {
            vec![
                item("/tmp/b.txt", ItemKind::File, 2),
                item("/tmp/a.txt", ItemKind::File, 1),
            ]
        };
        let mut one = make();
        one.sort_by(comparator(SortMode::Size, true, None, false));
        let mut two = make();
        two.sort_by(comparator(SortMode::Size, true, None, false));
        assert_eq!(one, two);
    }

    #[test]
    fn size_mode_largest_first_with_blocking_stats() {
        let dir = TempDir::new().unwrap();
        let big = dir.path().join("big.txt");
        let small = dir.path().join("small.txt");
        let mut f = fs::File::create(&big).unwrap();
        f.write_all(&[0u8; 4096]).unwrap();
        fs::write(&small, "tiny").unwrap();

        let cache = StatCache::new();
        let mut items = vec![
            item(small.to_str().unwrap(), ItemKind::File, 1),
            item(big.to_str().unwrap(), ItemKind::File, 2),
        ];
        items.sort_by(comparator(SortMode::Size, true, Some(&cache), true));
        assert_eq!(items[0].display_name(), "big.txt");
        assert_eq!(items[1].display_name(), "small.txt");
    }

    #[test]
    fn unknown_metadata_sorts_last_under_size() {
        let dir = TempDir::new().unwrap();
        let real = dir.path().join("real.txt");
        fs::write(&real, "some content here").unwrap();

        let cache = StatCache::new();
        let mut items = vec![
            item("/nonexistent/ghost.txt", ItemKind::File, 1),
            item(real.to_str().unwrap(), ItemKind::File, 2),
        ];
        items.sort_by(comparator(SortMode::Size, true, Some(&cache), true));
        assert_eq!(items[0].display_name(), "real.txt");
    }

    #[test]
    fn directories_count_as_zero_size() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let file = dir.path().join("f.txt");
        fs::write(&file, "content").unwrap();

        let cache = StatCache::new();
        let mut items = vec![
            item(sub.to_str().unwrap(), ItemKind::Dir, 1),
            item(file.to_str().unwrap(), ItemKind::File, 2),
        ];
        items.sort_by(comparator(SortMode::Size, true, Some(&cache), true));
        assert_eq!(items[0].display_name(), "f.txt");
    }

    #[test]
    fn sibling_comparator_uses_order_only() {
        let mut groups = vec![Group::new("b", 2), Group::new("a", 5), Group::new("c", 1)];
        groups.sort_by(sibling_comparator(true));
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["c", "b", "a"]);

        groups.sort_by(sibling_comparator(false));
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn renumber_makes_orders_contiguous() {
        let mut items = vec![
            item("/tmp/a", ItemKind::File, 17),
            item("/tmp/b", ItemKind::File, 3),
            item("/tmp/c", ItemKind::File, 99),
        ];
        renumber(&mut items);
        let orders: Vec<i64> = items.iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn mode_cycle_wraps() {
        let mut mode = SortMode::Custom;
        for _ in 0..6 {
            mode = mode.next();
        }
        assert_eq!(mode, SortMode::Custom);
    }

    #[test]
    fn dir_mode_cycle_skips_custom() {
        assert_eq!(SortMode::Type.next_dir(), SortMode::Name);
        assert_eq!(SortMode::Name.next_dir(), SortMode::Created);
    }

    #[test]
    fn needs_metadata_flags() {
        assert!(SortMode::Created.needs_metadata());
        assert!(SortMode::Modified.needs_metadata());
        assert!(SortMode::Size.needs_metadata());
        assert!(!SortMode::Name.needs_metadata());
        assert!(!SortMode::Custom.needs_metadata());
        assert!(!SortMode::Type.needs_metadata());
    }

    #[test]
    fn left_mode_toggle() {
        assert_eq!(LeftSortMode::Custom.toggle(), LeftSortMode::Alpha);
        assert_eq!(LeftSortMode::Alpha.toggle(), LeftSortMode::Custom);
    }
}
