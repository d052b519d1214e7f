//! Load/save of the two persisted JSON documents.
//!
//! The tree and the UI state are independent files. Loading is best-effort:
//! a missing, empty or unparsable document is replaced with a default (the
//! tree seeds from the configured default group names) and a warning goes to
//! stderr — never an error to the caller. Saving writes a sibling temp file
//! and renames it into place so a crash mid-write cannot leave a truncated
//! document behind.

use std::fs;
use std::path::Path;

use crate::error::Result;

use super::model::{Data, UiState};

/// Load the favorites tree, seeding defaults when the file is absent or
/// unreadable as JSON.
pub fn load_data(file: &Path, default_groups: &[String]) -> Data {
    let content = match fs::read_to_string(file) {
        Ok(c) => c,
        Err(_) => return Data::seeded(default_groups),
    };
    if content.trim().is_empty() {
        return Data::seeded(default_groups);
    }
    match serde_json::from_str(&content) {
        Ok(data) => data,
        Err(e) => {
            eprintln!(
                "Warning: failed to parse favorites data {}: {}",
                file.display(),
                e
            );
            Data::seeded(default_groups)
        }
    }
}

/// Load the UI state, defaulting when the file is absent or unreadable.
pub fn load_ui_state(file: &Path) -> UiState {
    let content = match fs::read_to_string(file) {
        Ok(c) => c,
        Err(_) => return UiState::default(),
    };
    if content.trim().is_empty() {
        return UiState::default();
    }
    match serde_json::from_str(&content) {
        Ok(ui) => ui,
        Err(e) => {
            eprintln!(
                "Warning: failed to parse UI state {}: {}",
                file.display(),
                e
            );
            UiState::default()
        }
    }
}

/// Persist the favorites tree.
pub fn save_data(file: &Path, data: &Data) -> Result<()> {
    write_atomically(file, &serde_json::to_string_pretty(data)?)
}

/// Persist the UI state.
pub fn save_ui_state(file: &Path, ui: &UiState) -> Result<()> {
    write_atomically(file, &serde_json::to_string_pretty(ui)?)
}

/// Write via a sibling temp file + rename so readers never observe a
/// partial document.
fn write_atomically(file: &Path, content: &str) -> Result<()> {
    if let Some(parent) = file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "favorites".to_string());
    let tmp = file.with_file_name(format!("{}.tmp", file_name));
    fs::write(&tmp, content)?;
    fs::rename(&tmp, file)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fav::store;
    use tempfile::TempDir;

    fn defaults() -> Vec<String> {
        vec!["Default".to_string()]
    }

    #[test]
    fn missing_data_file_seeds_defaults() {
        let dir = TempDir::new().unwrap();
        let data = load_data(&dir.path().join("absent.json"), &defaults());
        assert_eq!(data.groups.len(), 1);
        assert_eq!(data.groups[0].name, "Default");
    }

    #[test]
    fn empty_data_file_seeds_defaults() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("favorites.json");
        fs::write(&file, "  \n").unwrap();
        let data = load_data(&file, &defaults());
        assert_eq!(data.groups[0].name, "Default");
    }

    #[test]
    fn corrupt_data_file_seeds_defaults() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("favorites.json");
        fs::write(&file, "{ not json").unwrap();
        let data = load_data(&file, &defaults());
        assert_eq!(data.groups[0].name, "Default");
    }

    #[test]
    fn data_round_trip() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("favorites.json");

        let mut data = Data::default();
        store::add_group(&mut data, "", "Work").unwrap();
        store::add_group(&mut data, "Work", "Projects").unwrap();
        save_data(&file, &data).unwrap();

        let loaded = load_data(&file, &defaults());
        assert_eq!(loaded, data);
        // no temp file left behind
        assert!(!dir.path().join("favorites.json.tmp").exists());
    }

    #[test]
    fn save_creates_missing_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("nested").join("deep").join("favorites.json");
        save_data(&file, &Data::default()).unwrap();
        assert!(file.exists());
    }

    #[test]
    fn ui_state_round_trip() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("uistate.json");

        let mut ui = UiState::default();
        ui.expanded_groups.insert("Work".into());
        ui.last_selected_group = Some("Work".into());
        ui.right_sort_asc = false;
        save_ui_state(&file, &ui).unwrap();

        let loaded = load_ui_state(&file);
        assert_eq!(loaded, ui);
    }

    #[test]
    fn missing_ui_state_defaults() {
        let dir = TempDir::new().unwrap();
        let ui = load_ui_state(&dir.path().join("absent.json"));
        assert_eq!(ui, UiState::default());
    }

    #[test]
    fn corrupt_ui_state_defaults() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("uistate.json");
        fs::write(&file, "]]]").unwrap();
        let ui = load_ui_state(&file);
        assert_eq!(ui, UiState::default());
    }

    #[test]
    fn partial_ui_state_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("uistate.json");
        fs::write(&file, r#"{"expanded_groups": ["Work"], "left_sort_asc": false}"#).unwrap();
        let ui = load_ui_state(&file);
        assert!(ui.expanded_groups.contains("Work"));
        assert!(!ui.left_sort_asc);
        // unspecified fields default
        assert!(ui.right_sort_asc);
        assert!(!ui.is_browsing_directory);
    }
}
