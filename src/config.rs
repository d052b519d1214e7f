//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--config`, `--data-file`, `--theme`, etc.)
//! 2. `$FAV_TUI_CONFIG` environment variable (path to config file)
//! 3. Project-local `.fav-tui.toml` in the current working directory
//! 4. Global `~/.config/fav-tui/config.toml`
//! 5. Built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Location of the favorites tree document.
    pub data_file: Option<String>,
    /// Location of the UI state document.
    pub state_file: Option<String>,
    /// Confirm before remove operations.
    pub confirm_delete: Option<bool>,
}

/// Favorites tree settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FavoritesConfig {
    /// Groups seeded into a brand-new tree.
    pub default_groups: Option<Vec<String>>,
    /// Group names that cannot be deleted or moved.
    pub protected_groups: Option<Vec<String>>,
}

/// Stat cache settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct StatConfig {
    /// Freshness window for cached metadata, in seconds.
    pub ttl_secs: Option<u64>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark" or "light".
    pub scheme: Option<String>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub favorites: FavoritesConfig,
    pub stat: StatConfig,
    pub theme: ThemeConfig,
}

// ── Default constants ────────────────────────────────────────────────────────

/// Default stat cache TTL in seconds.
pub const DEFAULT_STAT_TTL_SECS: u64 = 30;
/// Group created (and protected) when no configuration says otherwise.
pub const DEFAULT_GROUP_NAME: &str = "Default";

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path — that is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("FAV_TUI_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".fav-tui.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("fav-tui").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning printed to stderr).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return None,
    };
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!(
                "Warning: failed to parse config file {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self` — `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                data_file: other.general.data_file.clone().or(self.general.data_file),
                state_file: other.general.state_file.clone().or(self.general.state_file),
                confirm_delete: other.general.confirm_delete.or(self.general.confirm_delete),
            },
            favorites: FavoritesConfig {
                default_groups: other
                    .favorites
                    .default_groups
                    .clone()
                    .or(self.favorites.default_groups),
                protected_groups: other
                    .favorites
                    .protected_groups
                    .clone()
                    .or(self.favorites.protected_groups),
            },
            stat: StatConfig {
                ttl_secs: other.stat.ttl_secs.or(self.stat.ttl_secs),
            },
            theme: ThemeConfig {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Walk candidates in reverse so that highest-priority overwrites.
        let paths = candidate_paths();
        for path in paths.iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Location of the favorites tree document.
    pub fn data_file(&self) -> PathBuf {
        match &self.general.data_file {
            Some(p) => PathBuf::from(p),
            None => default_document_dir().join("favorites.json"),
        }
    }

    /// Location of the UI state document.
    pub fn state_file(&self) -> PathBuf {
        match &self.general.state_file {
            Some(p) => PathBuf::from(p),
            None => default_document_dir().join("uistate.json"),
        }
    }

    /// Whether to confirm before remove operations.
    pub fn confirm_delete(&self) -> bool {
        self.general.confirm_delete.unwrap_or(true)
    }

    /// Groups seeded into a brand-new tree.
    pub fn default_groups(&self) -> Vec<String> {
        self.favorites
            .default_groups
            .clone()
            .unwrap_or_else(|| vec![DEFAULT_GROUP_NAME.to_string()])
    }

    /// Group names that cannot be deleted or moved.
    pub fn protected_groups(&self) -> Vec<String> {
        self.favorites
            .protected_groups
            .clone()
            .unwrap_or_else(|| vec![DEFAULT_GROUP_NAME.to_string()])
    }

    /// Freshness window for cached stat metadata.
    pub fn stat_ttl(&self) -> Duration {
        Duration::from_secs(self.stat.ttl_secs.unwrap_or(DEFAULT_STAT_TTL_SECS))
    }

    /// Theme scheme: "dark" or "light".
    pub fn theme_scheme(&self) -> &str {
        self.theme.scheme.as_deref().unwrap_or("dark")
    }
}

fn default_document_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fav-tui")
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.confirm_delete(), true);
        assert_eq!(cfg.default_groups(), vec!["Default".to_string()]);
        assert_eq!(cfg.protected_groups(), vec!["Default".to_string()]);
        assert_eq!(cfg.stat_ttl(), Duration::from_secs(30));
        assert_eq!(cfg.theme_scheme(), "dark");
        assert!(cfg.data_file().ends_with("favorites.json"));
        assert!(cfg.state_file().ends_with("uistate.json"));
    }

    #[test]
    fn test_toml_parsing_full() {
        let toml = r#"
[general]
data_file = "/tmp/fav/data.json"
state_file = "/tmp/fav/state.json"
confirm_delete = false

[favorites]
default_groups = ["Inbox", "Projects"]
protected_groups = ["Inbox"]

[stat]
ttl_secs = 60

[theme]
scheme = "light"
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert_eq!(cfg.data_file(), PathBuf::from("/tmp/fav/data.json"));
        assert_eq!(cfg.state_file(), PathBuf::from("/tmp/fav/state.json"));
        assert_eq!(cfg.confirm_delete(), false);
        assert_eq!(
            cfg.default_groups(),
            vec!["Inbox".to_string(), "Projects".to_string()]
        );
        assert_eq!(cfg.protected_groups(), vec!["Inbox".to_string()]);
        assert_eq!(cfg.stat_ttl(), Duration::from_secs(60));
        assert_eq!(cfg.theme_scheme(), "light");
    }

    #[test]
    fn test_toml_parsing_partial() {
        let toml = r#"
[stat]
ttl_secs = 5
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert_eq!(cfg.stat_ttl(), Duration::from_secs(5));
        // Everything else should be defaults
        assert_eq!(cfg.confirm_delete(), true);
        assert_eq!(cfg.theme_scheme(), "dark");
    }

    #[test]
    fn test_toml_parsing_empty() {
        let cfg: AppConfig = toml::from_str("").expect("parse failed");
        assert_eq!(cfg.confirm_delete(), true);
    }

    #[test]
    fn test_merge_overrides() {
        let base = AppConfig {
            general: GeneralConfig {
                confirm_delete: Some(true),
                data_file: Some("/a/data.json".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let over = AppConfig {
            general: GeneralConfig {
                confirm_delete: Some(false),
                // data_file not set — should keep base
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = base.merge(&over);
        assert_eq!(merged.confirm_delete(), false); // overridden
        assert_eq!(merged.data_file(), PathBuf::from("/a/data.json")); // from base
    }

    #[test]
    fn test_merge_none_does_not_clear_some() {
        let base = AppConfig {
            favorites: FavoritesConfig {
                default_groups: Some(vec!["Inbox".into()]),
                protected_groups: Some(vec!["Inbox".into()]),
            },
            ..Default::default()
        };
        let over = AppConfig::default(); // all None

        let merged = base.merge(&over);
        assert_eq!(merged.default_groups(), vec!["Inbox".to_string()]);
        assert_eq!(merged.protected_groups(), vec!["Inbox".to_string()]);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("test-config.toml");
        std::fs::write(
            &cfg_path,
            r#"
[general]
confirm_delete = false

[favorites]
default_groups = ["Stuff"]
"#,
        )
        .expect("write");

        let cfg = load_file(&cfg_path).expect("load");
        assert_eq!(cfg.confirm_delete(), false);
        assert_eq!(cfg.default_groups(), vec!["Stuff".to_string()]);
        // Unset fields fall through to defaults
        assert_eq!(cfg.stat_ttl(), Duration::from_secs(30));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_file(Path::new("/nonexistent/config.toml")).is_none());
    }

    #[test]
    fn test_load_invalid_toml_returns_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("bad.toml");
        std::fs::write(&cfg_path, "this is { not valid toml").expect("write");
        assert!(load_file(&cfg_path).is_none());
    }

    #[test]
    fn test_load_with_cli_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("config.toml");
        std::fs::write(
            &cfg_path,
            r#"
[general]
confirm_delete = false

[theme]
scheme = "light"
"#,
        )
        .expect("write");

        let cli_overrides = AppConfig {
            theme: ThemeConfig {
                scheme: Some("dark".into()),
            },
            ..Default::default()
        };

        let cfg = AppConfig::load(Some(&cfg_path), Some(&cli_overrides));
        // CLI override wins
        assert_eq!(cfg.theme_scheme(), "dark");
        // File value preserved (not overridden by CLI)
        assert_eq!(cfg.confirm_delete(), false);
    }
}
