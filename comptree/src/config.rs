//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/comptree/comptree.toml`
//! 3. Local config: `<dir>/.comptree.toml`
//! 4. Environment variables: `COMPTREE_*` prefix, `__` between section and key

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;

/// Behaviour switches of the tree store.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreSettings {
    /// Make `detach` of an observer missing from an existing list fail with
    /// `NotFound` instead of being ignored.
    pub strict_detach: bool,
}

/// Revision history settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum number of revisions kept, current one included
    pub limit: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { limit: 64 }
    }
}

/// Tree rendering settings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderSettings {
    /// Append component ids to labels
    pub show_ids: bool,
    /// Deepest level rendered; the root is level 1
    pub max_depth: Option<usize>,
}

/// Raw settings for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub store: RawStoreSettings,
    pub history: RawHistorySettings,
    pub render: RawRenderSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawStoreSettings {
    pub strict_detach: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawHistorySettings {
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderSettings {
    pub show_ids: Option<bool>,
    pub max_depth: Option<usize>,
}

/// Unified configuration for comptree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub store: StoreSettings,
    pub history: HistorySettings,
    pub render: RenderSettings,
}

/// Get the XDG config directory for comptree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "comptree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("comptree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".comptree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            store: StoreSettings {
                strict_detach: overlay
                    .store
                    .strict_detach
                    .unwrap_or(self.store.strict_detach),
            },
            history: HistorySettings {
                limit: overlay.history.limit.unwrap_or(self.history.limit),
            },
            render: RenderSettings {
                show_ids: overlay.render.show_ids.unwrap_or(self.render.show_ids),
                max_depth: overlay.render.max_depth.or(self.render.max_depth),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.comptree.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!(path = %global_path.display(), "loading global config");
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!(path = %local_path.display(), "loading local config");
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;
        Ok(current)
    }

    /// Load a single file on top of the defaults, without global or env layers.
    pub fn load_file(path: &Path) -> Result<Self, ApplicationError> {
        let settings = Self::default().merge_with(&load_raw_settings(path)?);
        settings.validate()?;
        Ok(settings)
    }

    /// Apply COMPTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("COMPTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_bool("store.strict_detach") {
            settings.store.strict_detach = val;
        }
        if let Ok(val) = config.get_int("history.limit") {
            settings.history.limit = usize::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("history.limit must not be negative, got {val}"),
            })?;
        }
        if let Ok(val) = config.get_bool("render.show_ids") {
            settings.render.show_ids = val;
        }
        if let Ok(val) = config.get_int("render.max_depth") {
            let depth = usize::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("render.max_depth must not be negative, got {val}"),
            })?;
            settings.render.max_depth = Some(depth);
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.history.limit == 0 {
            return Err(ApplicationError::Config {
                message: "history.limit must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# comptree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/comptree/comptree.toml
#   Local:  <dir>/.comptree.toml
#   Env:    COMPTREE_<SECTION>__<KEY>, e.g. COMPTREE_HISTORY__LIMIT=10

[store]
# Fail detach when the observer is not in an existing registration list
# strict_detach = false

[history]
# Revisions kept for undo/redo, current one included
# limit = 64

[render]
# Append component ids to rendered labels
# show_ids = false

# Deepest level rendered (root is 1)
# max_depth = 3
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_overlay_when_merging_then_keeps_defaults() {
        let settings = Settings::default().merge_with(&RawSettings::default());
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.history.limit, 64);
        assert!(!settings.store.strict_detach);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_only_specified_fields_change() {
        let overlay: RawSettings = toml::from_str(
            r#"
[render]
max_depth = 2
"#,
        )
        .unwrap();
        let settings = Settings::default().merge_with(&overlay);
        assert_eq!(settings.render.max_depth, Some(2));
        assert!(!settings.render.show_ids);
        assert_eq!(settings.history, HistorySettings::default());
    }

    #[test]
    fn given_zero_limit_when_validating_then_config_error() {
        let mut settings = Settings::default();
        settings.history.limit = 0;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("history.limit"));
    }

    #[test]
    fn given_template_when_parsed_then_yields_defaults() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert_eq!(Settings::default().merge_with(&raw), Settings::default());
    }

    #[test]
    fn given_settings_when_serialized_then_round_trips_through_raw() {
        let mut settings = Settings::default();
        settings.store.strict_detach = true;
        settings.render.max_depth = Some(4);
        let text = settings.to_toml().unwrap();
        let raw: RawSettings = toml::from_str(&text).unwrap();
        assert_eq!(Settings::default().merge_with(&raw), settings);
    }
}
