//! Live directory listing for dir links and browse mode.
//!
//! The right panel renders these entries directly; they are never part of
//! the persisted tree. A synthetic `..` entry leads every listing except at
//! the filesystem root, and always sorts first regardless of mode.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

use super::sort::{comparator, SortKey, SortMode};
use super::stat_cache::StatCache;

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq)]
pub struct DirEntryInfo {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    /// The synthetic `..` entry pointing at the parent directory.
    pub is_parent: bool,
}

impl SortKey for DirEntryInfo {
    fn sort_path(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn is_dir(&self) -> bool {
        self.is_dir
    }

    // directory listings have no persisted custom order
    fn order(&self) -> i64 {
        0
    }
}

/// Read a directory's entries, prepending `..` unless at the root.
/// Unreadable entries are skipped rather than failing the listing.
pub fn list_dir(dir: &Path) -> Result<Vec<DirEntryInfo>> {
    if !dir.is_dir() {
        return Err(AppError::InvalidPath(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut entries = Vec::new();
    if let Some(parent) = dir.parent() {
        entries.push(DirEntryInfo {
            name: "..".to_string(),
            path: parent.to_path_buf(),
            is_dir: true,
            is_parent: true,
        });
    }

    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        entries.push(DirEntryInfo {
            name,
            path,
            is_dir,
            is_parent: false,
        });
    }
    Ok(entries)
}

/// Sort a listing in place. The `..` entry short-circuits to the front no
/// matter the mode or direction.
pub fn sort_entries(
    entries: &mut [DirEntryInfo],
    mode: SortMode,
    ascending: bool,
    cache: &StatCache,
    blocking: bool,
) {
    let base = comparator(mode, ascending, Some(cache), blocking);
    entries.sort_by(|a, b| {
        if a.is_parent {
            return Ordering::Less;
        }
        if b.is_parent {
            return Ordering::Greater;
        }
        base(a, b)
    });
}
