//! Application configuration.
//!
//! The configuration is loaded once at startup from a JSON file
//! (`$XDG_CONFIG_HOME/splitwm/config.json`).  It is never reloaded.  The
//! top-level schema uses one key per concern so the file can be extended
//! with additional sections later without breaking backward compatibility.
//!
//! # Example
//!
//! ```json
//! {
//!   "tiling": {
//!     "max_regions": 64,
//!     "min_split_factor": 0.05,
//!     "workspaces": 9
//!   },
//!   "shortcuts": [
//!     { "modifiers": ["mod1"], "key": "c", "action": "Quit" },
//!     { "modifiers": ["mod1"], "key": "Return", "action": { "Spawn": "st" } }
//!   ]
//! }
//! ```

use crate::command::Action;
use crate::shortcuts::{ShortcutBinding, ShortcutTable};
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration.
///
/// Every field is optional.  A minimal `{}` file is valid and all sections
/// fall back to their compiled-in defaults.  If `shortcuts` is present it
/// replaces the built-in table entirely; otherwise the built-in table is
/// used, minus workspace bindings beyond `tiling.workspaces`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Tiling limits.
    #[serde(default)]
    pub tiling: TilingConfig,

    /// Key bindings, in dispatch order.
    #[serde(default)]
    pub shortcuts: Option<Vec<ShortcutBinding>>,
}

/// Region-tree limits shared by every workspace.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TilingConfig {
    /// Capacity of each workspace's region arena.  `n` windows need
    /// `2n - 1` regions.
    pub max_regions: usize,
    /// Smallest share of a split either child may be squeezed to.  Must lie
    /// in `(0, 0.5)`.
    pub min_split_factor: f64,
    /// Number of virtual workspaces.
    pub workspaces: usize,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            max_regions: 64,
            min_split_factor: 0.05,
            workspaces: 9,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Reject values that would break tree invariants or point at
    /// workspaces that do not exist.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.tiling;
        if t.max_regions == 0 {
            return Err(ConfigError("tiling.max_regions must be at least 1".into()));
        }
        if t.workspaces == 0 {
            return Err(ConfigError("tiling.workspaces must be at least 1".into()));
        }
        if !(t.min_split_factor > 0.0 && t.min_split_factor < 0.5) {
            return Err(ConfigError(format!(
                "tiling.min_split_factor must lie in (0, 0.5), got {}",
                t.min_split_factor
            )));
        }
        for binding in self.shortcuts.iter().flatten() {
            if let Action::SwitchWorkspace(n) = binding.action {
                if n >= t.workspaces {
                    return Err(ConfigError(format!(
                        "shortcut switches to workspace {} but only {} exist",
                        n, t.workspaces
                    )));
                }
            }
        }
        Ok(())
    }

    /// Build the immutable shortcut table.
    pub fn shortcut_table(&self) -> ShortcutTable {
        match &self.shortcuts {
            Some(bindings) => ShortcutTable::new(bindings.clone()),
            None => {
                let workspaces = self.tiling.workspaces;
                let bindings = ShortcutTable::default()
                    .bindings()
                    .iter()
                    .filter(|b| !matches!(b.action, Action::SwitchWorkspace(n) if n >= workspaces))
                    .cloned()
                    .collect();
                ShortcutTable::new(bindings)
            }
        }
    }
}

/// Error from loading, parsing, or validating a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{modifier, sym};

    #[test]
    fn deserialize_full_config() {
        let json = r#"{
            "tiling": {
                "max_regions": 15,
                "min_split_factor": 0.1,
                "workspaces": 4
            },
            "shortcuts": [
                { "modifiers": ["mod4"], "key": "Return", "action": { "Spawn": ["alacritty"] } },
                { "modifiers": ["mod4", "shift"], "key": "4", "action": { "SwitchWorkspace": 3 } }
            ]
        }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.tiling.max_regions, 15);
        assert_eq!(cfg.tiling.min_split_factor, 0.1);
        assert_eq!(cfg.tiling.workspaces, 4);

        let table = cfg.shortcut_table();
        assert_eq!(table.len(), 2);
        assert_eq!(table.bindings()[0].modifiers, modifier::MOD4);
        assert_eq!(table.bindings()[0].keysym, sym::RETURN);
        assert_eq!(table.bindings()[1].action, Action::SwitchWorkspace(3));
        cfg.validate().unwrap();
    }

    #[test]
    fn deserialize_empty_uses_defaults() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        let td = TilingConfig::default();
        assert_eq!(cfg.tiling.max_regions, td.max_regions);
        assert_eq!(cfg.tiling.min_split_factor, td.min_split_factor);
        assert_eq!(cfg.tiling.workspaces, td.workspaces);
        assert_eq!(cfg.shortcut_table(), ShortcutTable::default());
        cfg.validate().unwrap();
    }

    #[test]
    fn deserialize_partial_tiling() {
        let json = r#"{ "tiling": { "workspaces": 3 } }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.tiling.workspaces, 3);
        assert_eq!(cfg.tiling.max_regions, TilingConfig::default().max_regions);
    }

    #[test]
    fn empty_shortcut_list_disables_all_bindings() {
        let cfg: Config = serde_json::from_str(r#"{ "shortcuts": [] }"#).unwrap();
        assert!(cfg.shortcut_table().is_empty());
    }

    #[test]
    fn unknown_top_level_keys_ignored() {
        let json = r#"{ "tiling": {}, "future_section": { "key": 42 } }"#;
        let _cfg: Config = serde_json::from_str(json).unwrap();
    }

    #[test]
    fn bad_binding_fails_the_whole_file() {
        let json = r#"{ "shortcuts": [ { "key": "nope", "action": "Quit" } ] }"#;
        assert!(serde_json::from_str::<Config>(json).is_err());
    }

    #[test]
    fn validate_rejects_bad_limits() {
        let mut cfg = Config::default();
        cfg.tiling.min_split_factor = 0.5;
        assert!(cfg.validate().is_err());
        cfg.tiling.min_split_factor = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.tiling.max_regions = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.tiling.workspaces = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_workspace_binding() {
        let json = r#"{
            "tiling": { "workspaces": 3 },
            "shortcuts": [ { "modifiers": ["mod1"], "key": "4", "action": { "SwitchWorkspace": 3 } } ]
        }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("workspace 3"));
    }

    #[test]
    fn default_table_follows_workspace_count() {
        let json = r#"{ "tiling": { "workspaces": 3 } }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        cfg.validate().unwrap();
        let table = cfg.shortcut_table();
        let switches: Vec<usize> = table
            .bindings()
            .iter()
            .filter_map(|b| match b.action {
                Action::SwitchWorkspace(n) => Some(n),
                _ => None,
            })
            .collect();
        assert_eq!(switches, vec![0, 1, 2]);
        assert_eq!(table.len(), ShortcutTable::default().len() - 6);
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("splitwm-test-missing-config.json");
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "splitwm-test-config-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{ "tiling": { "max_regions": 7 } }"#).unwrap();
        let cfg = Config::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(cfg.tiling.max_regions, 7);
    }
}
