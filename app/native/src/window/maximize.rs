//! Maximizing along one or both axes.
//!
//! A maximized axis spans the work area of the window's screen while the
//! other axis keeps its geometry. The frame from before maximizing becomes
//! the window's restore geometry, the same one quick tiling uses, and each
//! axis is put back from it when that axis is restored.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::constraints::SizeMode;
use super::events::WindowEvent;
use super::quick_tile::QuickTileMode;
use super::state::{Rect, Size};
use super::{ForceGeometry, Window, kept_in_area};

bitflags! {
    /// Axes a window is maximized along.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct MaximizeMode: u8 {
        const VERTICAL = 1;
        const HORIZONTAL = 1 << 1;
        const FULL = Self::VERTICAL.bits() | Self::HORIZONTAL.bits();
    }
}

impl MaximizeMode {
    /// Not maximized.
    pub const RESTORE: Self = Self::empty();

    #[must_use]
    pub fn from_axes(vertically: bool, horizontally: bool) -> Self {
        let mut mode = Self::RESTORE;
        mode.set(Self::VERTICAL, vertically);
        mode.set(Self::HORIZONTAL, horizontally);
        mode
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            m if m == Self::FULL => "full",
            m if m == Self::VERTICAL => "vertical",
            m if m == Self::HORIZONTAL => "horizontal",
            _ => "restore",
        }
    }
}

impl Window {
    #[must_use]
    pub const fn maximize_mode(&self) -> MaximizeMode { self.maximize_mode }

    /// Frame `mode` gives this window inside `area`.
    ///
    /// Maximized axes span the area, rounded down to the size hints. Axes
    /// leaving the maximized state come back from the restore geometry and
    /// the rest keep the pending geometry.
    #[must_use]
    pub fn maximized_geometry_in(&self, mode: MaximizeMode, area: Rect) -> Rect {
        let current = self.pending_geometry();
        let restore = self.quick_tile.restore_geometry.unwrap_or(current);
        let old = self.maximize_mode;

        let (x, width) = if mode.contains(MaximizeMode::HORIZONTAL) {
            (area.x, area.width)
        } else if old.contains(MaximizeMode::HORIZONTAL) {
            (restore.x, restore.width)
        } else {
            (current.x, current.width)
        };
        let (y, height) = if mode.contains(MaximizeMode::VERTICAL) {
            (area.y, area.height)
        } else if old.contains(MaximizeMode::VERTICAL) {
            (restore.y, restore.height)
        } else {
            (current.y, current.height)
        };

        let fitted = self.adjusted_frame_size(Size::new(width, height), SizeMode::MaxBound);
        Rect::new(
            x,
            y,
            if mode.contains(MaximizeMode::HORIZONTAL) { fitted.width } else { width },
            if mode.contains(MaximizeMode::VERTICAL) { fitted.height } else { height },
        )
    }

    /// Maximize along the axes in `mode` and restore the others.
    ///
    /// A tiled window leaves its tile but keeps the geometry it had before
    /// tiling as the restore geometry. Returns `false` when the window is
    /// not resizable, nothing changes or window rules reject the result.
    pub fn maximize(&mut self, mode: MaximizeMode) -> bool {
        if !self.is_resizable() {
            tracing::debug!(window = %self.id, "maximize refused for non-resizable window");
            return false;
        }
        let old = self.maximize_mode;
        if mode == old {
            return false;
        }

        let area = self.env.work_area.work_area_at(self.pending_geometry().center(), self.desktop);
        let mut target = self.maximized_geometry_in(mode, area);
        if mode.is_empty() && !target.intersects(&area) {
            target = kept_in_area(target, area, false, self.env.config.move_resize.min_visible);
        }
        if !self.policy.allows_geometry(target, &self.borders()) {
            tracing::debug!(window = %self.id, mode = mode.label(), "maximize vetoed by rules");
            return false;
        }

        let mut blocker = self.geometry_updates_blocker();
        if mode.is_empty() {
            blocker.quick_tile.restore_geometry = None;
        } else if blocker.quick_tile.restore_geometry.is_none() {
            blocker.quick_tile.restore_geometry = Some(blocker.pending_geometry());
        }
        blocker.request_geometry(target, ForceGeometry::Normal);

        let tile = blocker.quick_tile_mode();
        if !tile.is_empty() {
            blocker.set_quick_tile_state(tile, QuickTileMode::NONE);
        }
        blocker.set_maximize_state(mode);
        true
    }

    pub fn set_maximize(&mut self, vertically: bool, horizontally: bool) -> bool {
        self.maximize(MaximizeMode::from_axes(vertically, horizontally))
    }

    /// Record a mode without touching the geometry.
    pub(super) fn set_maximize_state(&mut self, mode: MaximizeMode) -> bool {
        let old = std::mem::replace(&mut self.maximize_mode, mode);
        if old == mode {
            return false;
        }
        tracing::debug!(window = %self.id, old = old.label(), new = mode.label(), "maximize mode changed");
        self.emit(&WindowEvent::MaximizeModeChanged { old, new: mode });
        true
    }
}
