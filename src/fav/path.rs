//! Dot-path addressing for the favorites tree.
//!
//! A tree path is a dot-joined sequence of group names from the root down to
//! a group or directory link, e.g. `Work.Projects.Active`. All functions here
//! are pure string operations; resolution against an actual tree lives in
//! `store`.

/// Split a dot-path into its segments. Empty input yields no segments.
pub fn split(path: &str) -> Vec<&str> {
    if path.is_empty() {
        return Vec::new();
    }
    path.split('.').collect()
}

/// Join segments into a dot-path, skipping empty segments.
#[allow(dead_code)]
pub fn join(segments: &[&str]) -> String {
    segments
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(".")
}

/// The parent path, or `""` for a top-level path.
pub fn parent(path: &str) -> &str {
    match path.rfind('.') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// The final segment of a path.
pub fn name(path: &str) -> &str {
    match path.rfind('.') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Number of segments in a path. Empty path has depth 0.
pub fn depth(path: &str) -> usize {
    if path.is_empty() {
        0
    } else {
        path.matches('.').count() + 1
    }
}

/// Whether `child` lies strictly below `ancestor`.
///
/// The empty path is the conceptual root: every non-empty path descends
/// from it.
pub fn is_descendant(ancestor: &str, child: &str) -> bool {
    if ancestor.is_empty() {
        return !child.is_empty();
    }
    child.len() > ancestor.len() + 1
        && child.starts_with(ancestor)
        && child.as_bytes()[ancestor.len()] == b'.'
}

/// Whether two paths share the same parent.
#[allow(dead_code)]
pub fn are_siblings(a: &str, b: &str) -> bool {
    parent(a) == parent(b)
}

/// Replace only the final segment of a path.
pub fn rename_last_segment(path: &str, new_name: &str) -> String {
    let p = parent(path);
    if p.is_empty() {
        new_name.to_string()
    } else {
        format!("{}.{}", p, new_name)
    }
}

/// The path of `name` after moving it under `new_parent`.
pub fn build_moved_path(name: &str, new_parent: &str) -> String {
    if new_parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", new_parent, name)
    }
}

/// Rewrite a single path after `old` was renamed/moved to `new`.
///
/// Exact match is replaced wholesale; a path below `old` keeps its suffix
/// under `new`; unrelated paths return `None`.
pub fn rewrite_path(path: &str, old: &str, new: &str) -> Option<String> {
    if path == old {
        return Some(new.to_string());
    }
    if is_descendant(old, path) {
        return Some(format!("{}{}", new, &path[old.len()..]));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_empty_path() {
        assert!(split("").is_empty());
    }

    #[test]
    fn split_single_segment() {
        assert_eq!(split("Work"), vec!["Work"]);
    }

    #[test]
    fn split_nested_path() {
        assert_eq!(split("Work.Projects.Active"), vec!["Work", "Projects", "Active"]);
    }

    #[test]
    fn join_filters_empty_segments() {
        assert_eq!(join(&["Work", "", "Projects"]), "Work.Projects");
        assert_eq!(join(&[]), "");
    }

    #[test]
    fn join_split_round_trip() {
        for p in ["Work", "Work.Projects", "a.b.c.d"] {
            assert_eq!(join(&split(p)), p);
        }
    }

    #[test]
    fn parent_of_nested_and_top_level() {
        assert_eq!(parent("Work.Projects.Active"), "Work.Projects");
        assert_eq!(parent("Work"), "");
        assert_eq!(parent(""), "");
    }

    #[test]
    fn name_is_last_segment() {
        assert_eq!(name("Work.Projects.Active"), "Active");
        assert_eq!(name("Work"), "Work");
    }

    #[test]
    fn depth_counts_segments() {
        assert_eq!(depth(""), 0);
        assert_eq!(depth("Work"), 1);
        assert_eq!(depth("Work.Projects.Active"), 3);
    }

    #[test]
    fn descendant_requires_dot_boundary() {
        assert!(is_descendant("Work", "Work.Projects"));
        assert!(is_descendant("Work", "Work.Projects.Active"));
        assert!(!is_descendant("Work", "Work"));
        // "Workshop" is not below "Work"
        assert!(!is_descendant("Work", "Workshop"));
    }

    #[test]
    fn everything_descends_from_root() {
        assert!(is_descendant("", "Work"));
        assert!(is_descendant("", "Work.Projects"));
        assert!(!is_descendant("", ""));
    }

    #[test]
    fn siblings_share_a_parent() {
        assert!(are_siblings("Work.A", "Work.B"));
        assert!(are_siblings("A", "B"));
        assert!(!are_siblings("Work.A", "Home.B"));
    }

    #[test]
    fn rename_last_segment_keeps_prefix() {
        assert_eq!(rename_last_segment("Work.Projects", "Archive"), "Work.Archive");
        assert_eq!(rename_last_segment("Work", "Job"), "Job");
    }

    #[test]
    fn build_moved_path_handles_root() {
        assert_eq!(build_moved_path("Projects", ""), "Projects");
        assert_eq!(build_moved_path("Projects", "Work"), "Work.Projects");
    }

    #[test]
    fn rewrite_exact_match() {
        assert_eq!(rewrite_path("Work", "Work", "Job"), Some("Job".to_string()));
    }

    #[test]
    fn rewrite_prefix_preserves_suffix() {
        assert_eq!(
            rewrite_path("Work.Projects.Active", "Work", "Job"),
            Some("Job.Projects.Active".to_string())
        );
    }

    #[test]
    fn rewrite_unrelated_is_none() {
        assert_eq!(rewrite_path("Home", "Work", "Job"), None);
        // prefix without a dot boundary must not match
        assert_eq!(rewrite_path("Workshop", "Work", "Job"), None);
    }

    #[test]
    fn rewrite_applied_once_is_stable() {
        // a second application with the same old/new finds nothing to change
        let rewritten = rewrite_path("Work.Projects", "Work", "Job").unwrap();
        assert_eq!(rewrite_path(&rewritten, "Work", "Job"), None);
    }
}
