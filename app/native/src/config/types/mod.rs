//! Configuration types for Casement.
//!
//! This module provides all configuration types organized by domain.
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

pub mod move_resize;
pub mod quick_tile;
pub mod root;
pub mod rules;

// Move/resize types
pub use move_resize::{ClampPolicy, MoveResizeConfig};
// Quick tile types
pub use quick_tile::QuickTileConfig;
// Root config types
pub use root::{
    CasementConfig, ConfigError, DesktopsConfig, config_paths, load_config,
    load_config_from_path, parse_config,
};
// Rule types
pub use rules::WindowRule;
