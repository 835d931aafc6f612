//! Size-hint enforcement for client sizes.
//!
//! Windows describe how they may be sized with `SizeHints`: a minimum, an
//! optional maximum and a resize increment (terminals resize by character
//! cells, for instance). `adjusted_size` maps any requested client size to the
//! nearest size the hints allow.
//!
//! # Rounding
//!
//! When an increment larger than one pixel is declared, sizes are snapped to
//! `min + k * increment`. The `SizeMode` decides how:
//! - `Any`: nearest step in both dimensions
//! - `FixedWidth`: width kept exact, height snapped to the nearest step
//! - `FixedHeight`: height kept exact, width snapped to the nearest step
//! - `MaxBound`: both dimensions snapped down, never grown
//!
//! A step that would overshoot the maximum falls back to the step below it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::state::Size;

/// How to resolve a size against increments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SizeMode {
    /// Round each dimension to the nearest allowed step.
    #[default]
    Any,
    /// Try not to affect the width.
    FixedWidth,
    /// Try not to affect the height.
    FixedHeight,
    /// Try not to make the window larger in either direction.
    MaxBound,
}

/// Sizing constraints supplied by a window. These apply to the client
/// (buffer) size, never to the decorated frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct SizeHints {
    /// Minimum client size.
    pub min: Size,
    /// Maximum client size, `None` when unbounded.
    pub max: Option<Size>,
    /// Resize step; values of 1 or less disable snapping.
    pub increments: Size,
}

impl Default for SizeHints {
    fn default() -> Self {
        Self {
            min: Size::new(1, 1),
            max: None,
            increments: Size::new(1, 1),
        }
    }
}

impl SizeHints {
    /// Minimum size, never below 1x1.
    #[must_use]
    pub fn effective_min(&self) -> Size { self.min.expanded_to(Size::new(1, 1)) }

    /// Maximum size, unbounded dimensions as `i32::MAX`. A maximum below the
    /// minimum is a configuration error and resolves to the minimum.
    #[must_use]
    pub fn effective_max(&self) -> Size {
        let max = self.max.unwrap_or(Size::new(i32::MAX, i32::MAX));
        max.expanded_to(self.effective_min())
    }

    /// Resize increments, never below 1x1.
    #[must_use]
    pub fn effective_increments(&self) -> Size { self.increments.expanded_to(Size::new(1, 1)) }

    /// Check if a client size satisfies these hints.
    #[must_use]
    pub fn allows(&self, size: Size) -> bool {
        let min = self.effective_min();
        let max = self.effective_max();
        size.width >= min.width
            && size.height >= min.height
            && size.width <= max.width
            && size.height <= max.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rounding {
    Exact,
    Nearest,
    Down,
}

/// Maps a requested client size to the nearest size allowed by `hints`.
///
/// Pure function: the result only depends on the arguments.
#[must_use]
pub fn adjusted_size(requested: Size, mode: SizeMode, hints: &SizeHints) -> Size {
    let min = hints.effective_min();
    let max = hints.effective_max();
    let increments = hints.effective_increments();

    let (width_rounding, height_rounding) = match mode {
        SizeMode::Any => (Rounding::Nearest, Rounding::Nearest),
        SizeMode::FixedWidth => (Rounding::Exact, Rounding::Nearest),
        SizeMode::FixedHeight => (Rounding::Nearest, Rounding::Exact),
        SizeMode::MaxBound => (Rounding::Down, Rounding::Down),
    };

    Size::new(
        adjust_dimension(requested.width, min.width, max.width, increments.width, width_rounding),
        adjust_dimension(requested.height, min.height, max.height, increments.height, height_rounding),
    )
}

fn adjust_dimension(value: i32, min: i32, max: i32, increment: i32, rounding: Rounding) -> i32 {
    let clamped = value.clamp(min, max);
    if increment <= 1 || rounding == Rounding::Exact {
        return clamped;
    }

    let offset = i64::from(clamped) - i64::from(min);
    let step = i64::from(increment);
    let steps = match rounding {
        Rounding::Nearest => (offset + step / 2) / step,
        Rounding::Down | Rounding::Exact => offset / step,
    };

    let mut snapped = i64::from(min) + steps * step;
    if snapped > i64::from(max) {
        snapped -= step;
    }

    // `snapped` lies within [min, max] here, both of which fit in i32.
    i32::try_from(snapped).unwrap_or(min).max(1)
}

// ============================================================================
// Tests
// ============================================================================
