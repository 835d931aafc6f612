//! Quick tiling and electric borders.
//!
//! A quick-tiled window covers a half, a quarter or all of its screen's work
//! area. The geometry it had before tiling is saved and restored when the
//! window is untiled. Maximizing shares the same restore geometry, so a
//! window going from maximized to tiled and back ends up where it started.
//!
//! # Target geometry
//!
//! Each axis is resolved independently: when exactly one of `LEFT`/`RIGHT`
//! is set the window covers that half of the width, otherwise the full width;
//! `TOP`/`BOTTOM` work the same way vertically. `LEFT | TOP` is therefore the
//! top-left quarter and `MAXIMIZE` the whole work area.
//!
//! # Electric borders
//!
//! While a window is being moved, the pointer touching a screen edge selects
//! a tile mode. The mode is only shown as a preview after the pointer rested
//! there for the configured delay, and only applied when the move finishes.

use std::time::{Duration, Instant};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::events::WindowEvent;
use super::maximize::MaximizeMode;
use super::state::{Point, Rect};
use super::timer::DelayTimer;
use super::{ForceGeometry, Window, kept_in_area};
use crate::config::QuickTileConfig;

bitflags! {
    /// Quick tile mode as a set of screen sides.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct QuickTileMode: u8 {
        const LEFT = 1;
        const RIGHT = 1 << 1;
        const TOP = 1 << 2;
        const BOTTOM = 1 << 3;
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
        const VERTICAL = Self::TOP.bits() | Self::BOTTOM.bits();
        const MAXIMIZE = Self::HORIZONTAL.bits() | Self::VERTICAL.bits();
    }
}

impl QuickTileMode {
    /// Not tiled.
    pub const NONE: Self = Self::empty();

    /// Human readable name, e.g. `top-left`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            m if m == Self::NONE => "none",
            m if m == Self::MAXIMIZE => "maximize",
            m if m == Self::LEFT => "left",
            m if m == Self::RIGHT => "right",
            m if m == Self::TOP => "top",
            m if m == Self::BOTTOM => "bottom",
            m if m == Self::LEFT | Self::TOP => "top-left",
            m if m == Self::RIGHT | Self::TOP => "top-right",
            m if m == Self::LEFT | Self::BOTTOM => "bottom-left",
            m if m == Self::RIGHT | Self::BOTTOM => "bottom-right",
            m if m == Self::HORIZONTAL => "horizontal",
            m if m == Self::VERTICAL => "vertical",
            _ => "mixed",
        }
    }

    /// Exactly one of `LEFT` / `RIGHT`, ignoring the vertical bits.
    const fn horizontal_side(self) -> Self {
        let h = self.intersection(Self::HORIZONTAL);
        if h.bits() == Self::LEFT.bits() || h.bits() == Self::RIGHT.bits() { h } else { Self::NONE }
    }

    /// Exactly one of `TOP` / `BOTTOM`, ignoring the horizontal bits.
    const fn vertical_side(self) -> Self {
        let v = self.intersection(Self::VERTICAL);
        if v.bits() == Self::TOP.bits() || v.bits() == Self::BOTTOM.bits() { v } else { Self::NONE }
    }

    /// Rectangle covered by this mode inside `area`.
    #[must_use]
    pub fn geometry_in(self, area: Rect) -> Rect {
        let half_width = area.width / 2;
        let half_height = area.height / 2;

        let (x, width) = match self.horizontal_side() {
            s if s == Self::LEFT => (area.x, half_width),
            s if s == Self::RIGHT => (area.x + half_width, area.width - half_width),
            _ => (area.x, area.width),
        };
        let (y, height) = match self.vertical_side() {
            s if s == Self::TOP => (area.y, half_height),
            s if s == Self::BOTTOM => (area.y + half_height, area.height - half_height),
            _ => (area.y, area.height),
        };

        Rect::new(x, y, width, height)
    }

    /// Combine a keyboard request with the current mode: a side on one axis
    /// joins a side already set on the other axis.
    #[must_use]
    pub fn combined_with(self, current: Self) -> Self {
        let requested_h = self.horizontal_side();
        let requested_v = self.vertical_side();

        if self == requested_h && !requested_h.is_empty() {
            let current_v = current.vertical_side();
            if current.horizontal_side().union(current_v) == current && !current_v.is_empty() {
                return self | current_v;
            }
        }
        if self == requested_v && !requested_v.is_empty() {
            let current_h = current.horizontal_side();
            if current_h.union(current.vertical_side()) == current && !current_h.is_empty() {
                return self | current_h;
            }
        }
        self
    }
}

/// Per-window quick tile state.
#[derive(Debug, Clone)]
pub struct QuickTileState {
    mode: QuickTileMode,
    pub(super) restore_geometry: Option<Rect>,
    electric_mode: QuickTileMode,
    electric_maximizing: bool,
    electric_timer: DelayTimer,
}

impl QuickTileState {
    #[must_use]
    pub fn new(config: &QuickTileConfig) -> Self {
        Self {
            mode: QuickTileMode::NONE,
            restore_geometry: None,
            electric_mode: QuickTileMode::NONE,
            electric_maximizing: false,
            electric_timer: DelayTimer::new(Duration::from_millis(config.electric_border_delay_ms)),
        }
    }

    #[must_use]
    pub const fn electric_deadline(&self) -> Option<Instant> { self.electric_timer.deadline() }
}

/// Tile and maximize state saved when a session starts, for cancelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TileSnapshot {
    mode: QuickTileMode,
    maximize: MaximizeMode,
    restore_geometry: Option<Rect>,
}

impl Window {
    #[must_use]
    pub const fn quick_tile_mode(&self) -> QuickTileMode { self.quick_tile.mode }

    /// Geometry saved before the window was tiled.
    #[must_use]
    pub const fn restore_geometry(&self) -> Option<Rect> { self.quick_tile.restore_geometry }

    /// Pending electric border mode.
    #[must_use]
    pub const fn electric_border_mode(&self) -> QuickTileMode { self.quick_tile.electric_mode }

    /// Whether the electric border preview is showing.
    #[must_use]
    pub const fn is_electric_border_maximizing(&self) -> bool {
        self.quick_tile.electric_maximizing
    }

    /// Geometry `mode` would give this window on its current screen.
    #[must_use]
    pub fn quick_tile_geometry(&self, mode: QuickTileMode) -> Rect {
        self.quick_tile_geometry_at(mode, self.pending_geometry().center())
    }

    /// Geometry `mode` would give this window on the screen under `anchor`.
    #[must_use]
    pub fn quick_tile_geometry_at(&self, mode: QuickTileMode, anchor: Point) -> Rect {
        mode.geometry_in(self.env.work_area.work_area_at(anchor, self.desktop))
    }

    /// Tile or untile the window on its current screen.
    ///
    /// From the keyboard, requesting the current mode again untiles, and a
    /// side on one axis combines with a side already tiled on the other.
    /// Tiling a maximized window unmaximizes it. Returns `false` when the
    /// window cannot be tiled.
    pub fn set_quick_tile_mode(&mut self, mode: QuickTileMode, from_keyboard: bool) -> bool {
        let anchor = self.pending_geometry().center();
        self.set_quick_tile_mode_at(mode, from_keyboard, anchor)
    }

    /// Like `set_quick_tile_mode`, tiling on the screen under `anchor`.
    pub(crate) fn set_quick_tile_mode_at(
        &mut self,
        mode: QuickTileMode,
        from_keyboard: bool,
        anchor: Point,
    ) -> bool {
        if !self.is_resizable() {
            tracing::debug!(window = %self.id, "quick tile refused for non-resizable window");
            return false;
        }

        let old = self.quick_tile.mode;
        let mut mode = mode;
        if from_keyboard {
            mode = mode.combined_with(old);
            if mode == old {
                mode = QuickTileMode::NONE;
            }
        }

        if mode.is_empty() {
            // A maximized window owns the restore geometry when not tiled.
            if old.is_empty() {
                return self.set_quick_tile_state(old, QuickTileMode::NONE);
            }
            let Some(restore) = self.quick_tile.restore_geometry.take() else {
                return self.set_quick_tile_state(old, QuickTileMode::NONE);
            };

            let area = self.env.work_area.work_area_at(restore.center(), self.desktop);
            let restore = if restore.intersects(&area) {
                restore
            } else {
                kept_in_area(restore, area, false, self.env.config.move_resize.min_visible)
            };

            self.request_geometry(restore, ForceGeometry::Normal);
        } else {
            let target = self.quick_tile_geometry_at(mode, anchor);
            if !self.policy.allows_geometry(target, &self.borders()) {
                tracing::debug!(window = %self.id, mode = mode.label(), "quick tile vetoed by rules");
                return false;
            }

            if self.quick_tile.restore_geometry.is_none() {
                self.quick_tile.restore_geometry = Some(self.pending_geometry());
            }
            self.request_geometry(target, ForceGeometry::Normal);
            self.set_maximize_state(MaximizeMode::RESTORE);
        }

        self.set_quick_tile_state(old, mode)
    }

    pub(super) fn set_quick_tile_state(&mut self, old: QuickTileMode, mode: QuickTileMode) -> bool {
        self.quick_tile.mode = mode;
        self.reset_electric_border();

        if old != mode {
            tracing::debug!(window = %self.id, old = old.label(), new = mode.label(), "quick tile mode changed");
            self.emit(&WindowEvent::QuickTileModeChanged { old, new: mode });
        }
        true
    }

    /// Whether the window is tiled or maximized.
    #[must_use]
    pub fn is_tiled_or_maximized(&self) -> bool {
        !self.quick_tile.mode.is_empty() || !self.maximize_mode().is_empty()
    }

    /// Drop the tiled and maximized state without touching the geometry,
    /// returning the geometry to take the size from when dragging the window
    /// out.
    pub(crate) fn untile_for_drag(&mut self) -> Option<Rect> {
        if !self.is_tiled_or_maximized() {
            return None;
        }
        let restore = self.quick_tile.restore_geometry.take();

        let old = std::mem::replace(&mut self.quick_tile.mode, QuickTileMode::NONE);
        if !old.is_empty() {
            self.emit(&WindowEvent::QuickTileModeChanged { old, new: QuickTileMode::NONE });
        }
        self.set_maximize_state(MaximizeMode::RESTORE);
        restore
    }

    pub(crate) fn tile_snapshot(&self) -> TileSnapshot {
        TileSnapshot {
            mode: self.quick_tile.mode,
            maximize: self.maximize_mode(),
            restore_geometry: self.quick_tile.restore_geometry,
        }
    }

    /// Put back state saved by `tile_snapshot`.
    pub(crate) fn restore_tile_snapshot(&mut self, snapshot: TileSnapshot) {
        let old = self.quick_tile.mode;
        self.quick_tile.mode = snapshot.mode;
        self.quick_tile.restore_geometry = snapshot.restore_geometry;
        if old != snapshot.mode {
            self.emit(&WindowEvent::QuickTileModeChanged { old, new: snapshot.mode });
        }
        self.set_maximize_state(snapshot.maximize);
    }

    // ========================================================================
    // Electric borders
    // ========================================================================

    /// Tile mode selected by the pointer position, if it touches an outer
    /// screen edge.
    #[must_use]
    pub fn electric_border_mode_at(&self, pointer: Point) -> QuickTileMode {
        let config = &self.env.config.quick_tile;
        let work_area = &self.env.work_area;
        let screen = work_area.screen_at(pointer);
        let geometry = work_area.screen_geometry(screen);
        if !geometry.is_valid() {
            return QuickTileMode::NONE;
        }

        // Edges shared with a neighbouring screen are not electric.
        let is_outer = |beyond: Point| {
            let neighbour = work_area.screen_geometry(work_area.screen_at(beyond));
            !neighbour.contains_point(beyond)
        };

        let threshold = config.edge_threshold.max(0);
        let corner = config.corner_length(geometry.height);

        let vertical_part = |y: i32| {
            if y < geometry.y + corner {
                QuickTileMode::TOP
            } else if y >= geometry.bottom() - corner {
                QuickTileMode::BOTTOM
            } else {
                QuickTileMode::NONE
            }
        };

        if pointer.x <= geometry.x + threshold && is_outer(Point::new(geometry.x - 1, pointer.y)) {
            QuickTileMode::LEFT | vertical_part(pointer.y)
        } else if pointer.x >= geometry.right() - 1 - threshold
            && is_outer(Point::new(geometry.right(), pointer.y))
        {
            QuickTileMode::RIGHT | vertical_part(pointer.y)
        } else if pointer.y <= geometry.y + threshold && is_outer(Point::new(pointer.x, geometry.y - 1)) {
            if config.top_edge_maximizes { QuickTileMode::MAXIMIZE } else { QuickTileMode::TOP }
        } else if pointer.y >= geometry.bottom() - 1 - threshold
            && is_outer(Point::new(pointer.x, geometry.bottom()))
        {
            QuickTileMode::BOTTOM
        } else {
            QuickTileMode::NONE
        }
    }

    /// Track the pointer during a move. Entering a zone arms the delay
    /// timer; leaving it withdraws any preview.
    pub(crate) fn check_electric_border(&mut self, pointer: Point) {
        if !self.env.config.quick_tile.electric_border || !self.is_resizable() {
            return;
        }

        let mode = self.electric_border_mode_at(pointer);
        if mode == self.quick_tile.electric_mode {
            return;
        }

        self.quick_tile.electric_mode = mode;
        if self.quick_tile.electric_maximizing {
            self.quick_tile.electric_maximizing = false;
            self.emit(&WindowEvent::ElectricBorderPreview { mode: QuickTileMode::NONE });
        }

        if mode.is_empty() {
            self.quick_tile.electric_timer.cancel();
        } else {
            let now = self.env.clock.now();
            self.quick_tile.electric_timer.arm(now);
            tracing::trace!(window = %self.id, mode = mode.label(), "electric border armed");
        }
    }

    /// Show the preview once the pointer rested in a zone long enough.
    pub(crate) fn fire_electric_border(&mut self, now: Instant) -> bool {
        if !self.quick_tile.electric_timer.fire_if_due(now) || self.quick_tile.electric_mode.is_empty() {
            return false;
        }

        let mode = self.quick_tile.electric_mode;
        self.quick_tile.electric_maximizing = true;
        tracing::debug!(window = %self.id, mode = mode.label(), "electric border preview");
        self.emit(&WindowEvent::ElectricBorderPreview { mode });
        true
    }

    /// Apply a shown preview on the screen under `pointer`. Returns `true`
    /// if the window was tiled.
    pub(crate) fn commit_electric_border(&mut self, pointer: Point) -> bool {
        if !self.quick_tile.electric_maximizing {
            self.reset_electric_border();
            return false;
        }
        let mode = self.quick_tile.electric_mode;
        let tiled = self.set_quick_tile_mode_at(mode, false, pointer);
        self.reset_electric_border();
        tiled
    }

    /// Forget any pending electric border state.
    pub(crate) fn reset_electric_border(&mut self) {
        self.quick_tile.electric_timer.cancel();
        self.quick_tile.electric_mode = QuickTileMode::NONE;
        if std::mem::take(&mut self.quick_tile.electric_maximizing) {
            self.emit(&WindowEvent::ElectricBorderPreview { mode: QuickTileMode::NONE });
        }
    }
}
