//! Window rule configuration types.
//!
//! Rules select windows by application id and title and override how their
//! geometry may change.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::window::state::{Point, Size};

/// Per-window geometry overrides.
///
/// All specified match properties must match (AND logic).
/// At least one match property must be specified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct WindowRule {
    /// Match by application identifier (exact, case-insensitive).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,

    /// Match by window title (case-insensitive substring match).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Override whether the window may be moved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movable: Option<bool>,

    /// Override whether the window may be resized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resizable: Option<bool>,

    /// Pin the frame origin to this position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,

    /// Minimum client size, raising the window's own hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size: Option<Size>,

    /// Maximum client size, lowering the window's own hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<Size>,
}

impl WindowRule {
    /// Returns true if the rule has at least one matching criterion.
    #[must_use]
    pub const fn is_valid(&self) -> bool { self.app_id.is_some() || self.title.is_some() }
}
