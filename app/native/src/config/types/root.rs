//! Root configuration type and file loading.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::move_resize::MoveResizeConfig;
use super::quick_tile::QuickTileConfig;
use super::rules::WindowRule;

/// Virtual desktop settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct DesktopsConfig {
    /// Number of virtual desktops.
    /// Default: 4
    pub count: i32,
}

impl Default for DesktopsConfig {
    fn default() -> Self { Self { count: 4 } }
}

/// Root configuration for Casement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CasementConfig {
    /// JSON schema reference, ignored when loading.
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Interactive move and resize behavior.
    pub move_resize: MoveResizeConfig,

    /// Quick tiling and electric borders.
    pub quick_tile: QuickTileConfig,

    /// Virtual desktops.
    pub desktops: DesktopsConfig,

    /// Per-window geometry rules, first match wins per property.
    pub rules: Vec<WindowRule>,
}

/// Errors that can occur when loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error(
        "No configuration file found. Expected at ~/.config/casement/config.jsonc, \
        the platform config directory, or ~/.casement.jsonc"
    )]
    NotFound,
    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),
    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Legacy configuration file names in home directory.
const HOME_CONFIG_FILE_NAMES: &[&str] = &[".casement.jsonc", ".casement.json"];

/// Returns the possible configuration file paths in priority order.
///
/// The function checks the following locations (both `.jsonc` and `.json` variants):
/// 1. `$XDG_CONFIG_HOME/casement/` when set
/// 2. `~/.config/casement/`
/// 3. the platform config directory (`dirs::config_dir()`)
/// 4. `~/.casement.jsonc` or `~/.casement.json`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut push = |path: PathBuf| {
        if !paths.contains(&path) {
            paths.push(path);
        }
    };

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let dir = PathBuf::from(xdg_config).join("casement");
        for filename in CONFIG_FILE_NAMES {
            push(dir.join(filename));
        }
    }

    if let Some(home) = dirs::home_dir() {
        let dir = home.join(".config").join("casement");
        for filename in CONFIG_FILE_NAMES {
            push(dir.join(filename));
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let dir = config_dir.join("casement");
        for filename in CONFIG_FILE_NAMES {
            push(dir.join(filename));
        }
    }

    if let Some(home) = dirs::home_dir() {
        for filename in HOME_CONFIG_FILE_NAMES {
            push(home.join(filename));
        }
    }

    paths
}

/// Parses a configuration from a JSONC reader.
///
/// # Errors
///
/// Returns `ConfigError::ParseError` if the content is not valid JSON after
/// comments are stripped.
pub fn parse_config(reader: impl Read) -> Result<CasementConfig, ConfigError> {
    let reader = json_comments::StripComments::new(reader);
    let config: CasementConfig = serde_json::from_reader(reader)?;
    Ok(config)
}

/// Loads the configuration from a specific path.
///
/// A leading `~` in the path is expanded.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist, otherwise
/// `IoError` or `ParseError` as for [`load_config`].
pub fn load_config_from_path(path: &Path) -> Result<(CasementConfig, PathBuf), ConfigError> {
    let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref());

    if !expanded.exists() {
        return Err(ConfigError::NotFound);
    }

    let file = fs::File::open(&expanded)?;
    let config = parse_config(file)?;
    Ok((config, expanded))
}

/// Loads the configuration from the first available config file.
///
/// The configuration file supports JSONC format (JSON with comments).
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of the expected locations.
/// Returns `ConfigError::IoError` if a configuration file exists but could not be read.
/// Returns `ConfigError::ParseError` if the configuration file contains invalid JSON.
pub fn load_config() -> Result<(CasementConfig, PathBuf), ConfigError> {
    for path in config_paths() {
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    Err(ConfigError::NotFound)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::config::types::ClampPolicy;

    #[test]
    fn test_default_config() {
        let config = CasementConfig::default();
        assert!(config.rules.is_empty());
        assert_eq!(config.desktops.count, 4);
        assert_eq!(config.move_resize.border_margin, 10);
        assert!(config.quick_tile.electric_border);
    }

    #[test]
    fn test_parse_jsonc_with_comments() {
        let json = r#"{
            // keep windows fully visible
            "moveResize": { "clamp": "contain", "resizeEffect": true },
            /* quarter tiles near corners */
            "quickTile": { "cornerPercent": 10 },
            "rules": [
                { "appId": "org.example.Player", "resizable": false }
            ]
        }"#;

        let config = parse_config(json.as_bytes()).unwrap();
        assert_eq!(config.move_resize.clamp, ClampPolicy::Contain);
        assert!(config.move_resize.resize_effect);
        assert_eq!(config.move_resize.min_visible, 100, "unset fields keep defaults");
        assert_eq!(config.quick_tile.corner_percent, 10);
        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.rules[0].resizable, Some(false));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("{ not json".as_bytes()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.jsonc");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "{{ \"desktops\": {{ \"count\": 2 }} // two desktops\n}}").unwrap();

        let (config, loaded) = load_config_from_path(&path).unwrap();
        assert_eq!(config.desktops.count, 2);
        assert_eq!(loaded, path);
    }

    #[test]
    fn test_load_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_from_path(&dir.path().join("nope.jsonc")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound));
    }

    #[test]
    fn test_config_paths_are_not_empty() {
        let paths = config_paths();
        assert!(!paths.is_empty() || std::env::var("HOME").is_err());
    }
}
