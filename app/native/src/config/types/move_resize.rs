//! Interactive move/resize configuration types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How a window being moved is kept on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ClampPolicy {
    /// Keep at least `minVisible` pixels inside the work area, and the top
    /// edge (title bar) reachable.
    #[default]
    Partial,
    /// Keep the whole window inside the work area.
    Contain,
}

/// Settings for interactive move and resize sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct MoveResizeConfig {
    /// When enabled, resize steps only report the outline and the geometry
    /// is committed once the resize finishes.
    /// Default: false
    pub resize_effect: bool,

    /// Delay before a press-and-hold turns into a move, in milliseconds.
    /// Default: 300
    pub delayed_start_ms: u64,

    /// Pointer travel (manhattan distance) that starts a pending move early.
    /// Default: 4
    pub drag_threshold: i32,

    /// Width of the frame band that starts a resize instead of a move.
    /// Default: 10
    pub border_margin: i32,

    /// How moved windows are kept on screen.
    /// Default: "partial"
    pub clamp: ClampPolicy,

    /// Pixels that must stay visible when clamping partially.
    /// Default: 100
    pub min_visible: i32,

    /// Pointer distance per arrow key press during a keyboard session.
    /// Default: 8
    pub keyboard_step: i32,

    /// Pointer distance per arrow key press with the fine modifier held.
    /// Default: 1
    pub keyboard_fine_step: i32,
}

impl Default for MoveResizeConfig {
    fn default() -> Self {
        Self {
            resize_effect: false,
            delayed_start_ms: 300,
            drag_threshold: 4,
            border_margin: 10,
            clamp: ClampPolicy::Partial,
            min_visible: 100,
            keyboard_step: 8,
            keyboard_fine_step: 1,
        }
    }
}
