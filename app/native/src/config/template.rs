//! Configuration template generation.
//!
//! Generates a commented configuration template with all available options.

use std::fs;
use std::path::Path;

/// Generates a configuration template with all options commented out.
#[must_use]
pub fn generate_config_template() -> String {
    r#"// Casement Configuration File
// ============================
// This file uses JSONC format (JSON with comments).
// All options below are commented out and show their default values.
// Uncomment and modify the options you want to configure.

{
  // ============================================================================
  // Interactive Move / Resize
  // ============================================================================
  // "moveResize": {
  //   // Commit the geometry only once a resize finishes
  //   "resizeEffect": false,
  //
  //   // Press-and-hold delay before a move starts (milliseconds)
  //   "delayedStartMs": 300,
  //
  //   // Pointer travel that starts a pending move early (pixels)
  //   "dragThreshold": 4,
  //
  //   // Width of the frame band that resizes instead of moving (pixels)
  //   "borderMargin": 10,
  //
  //   // "partial" keeps minVisible pixels on screen, "contain" keeps all of it
  //   "clamp": "partial",
  //   "minVisible": 100,
  //
  //   // Arrow key step during keyboard move/resize, and with the fine modifier
  //   "keyboardStep": 8,
  //   "keyboardFineStep": 1
  // },

  // ============================================================================
  // Quick Tiling
  // ============================================================================
  // "quickTile": {
  //   // Tile windows dragged against a screen edge
  //   "electricBorder": true,
  //
  //   // Time the pointer must rest at the edge before the preview shows
  //   "electricBorderDelayMs": 250,
  //
  //   // Distance from the edge that counts as touching it (pixels)
  //   "edgeThreshold": 2,
  //
  //   // Top edge maximizes; set to false to tile to the top half instead
  //   "topEdgeMaximizes": true,
  //
  //   // Part of each side edge, near the corners, that tiles to a quarter
  //   "cornerPercent": 25
  // },

  // ============================================================================
  // Virtual Desktops
  // ============================================================================
  // "desktops": {
  //   "count": 4
  // },

  // ============================================================================
  // Window Rules
  // ============================================================================
  // Match by "appId" (exact) and/or "title" (substring), ignoring case.
  // Each property is taken from the first rule that sets it.
  // "rules": [
  //   {
  //     "appId": "org.example.Player",
  //     "resizable": false,
  //     "minSize": { "width": 320, "height": 180 }
  //   }
  // ]
}
"#
    .to_string()
}

/// Creates a configuration file with the template at the specified path.
///
/// Creates parent directories if they don't exist.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn create_config_file(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, generate_config_template())
}
