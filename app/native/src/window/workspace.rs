//! Following screen and work area changes.
//!
//! A window keeps its place relative to the work area it was laid out in.
//! Tiled and maximized windows are laid out again in the new area; other
//! windows keep the area edges they touched and are pulled back inside.

use super::state::{Point, Rect};
use super::{ForceGeometry, Window, kept_in_area};

impl Window {
    /// Move the window to screen `screen` at the same position relative to
    /// the work area. Tiled and maximized windows are laid out again there.
    /// Returns `false` for an unknown screen, the window's own screen, or
    /// while a move/resize session is active.
    pub fn send_to_screen(&mut self, screen: usize) -> bool {
        let count = self.env.work_area.screen_count();
        if screen >= count {
            tracing::warn!(window = %self.id, screen, count, "ignoring unknown screen");
            return false;
        }
        if self.is_move_resize_active() {
            tracing::debug!(window = %self.id, "send to screen refused during move/resize");
            return false;
        }

        let work_area = &self.env.work_area;
        let current = work_area.screen_at(self.pending_geometry().center());
        if screen == current {
            return false;
        }

        let old_area = work_area.work_area(current, self.desktop);
        let area = work_area.work_area(screen, self.desktop);
        let delta = area.origin() - old_area.origin();
        let min_visible = self.env.config.move_resize.min_visible;

        tracing::debug!(window = %self.id, from = current, to = screen, "sending to screen");

        let mut blocker = self.geometry_updates_blocker();
        if let Some(restore) = blocker.quick_tile.restore_geometry {
            let moved = kept_in_area(restore.translated(delta), area, false, min_visible);
            blocker.quick_tile.restore_geometry = Some(moved);
        }

        let moved = blocker.pending_geometry().translated(delta);
        blocker.request_geometry(moved, ForceGeometry::Normal);
        if !blocker.relayout_in(area) {
            blocker.keep_in_area(area, false);
        }
        true
    }

    /// Lay the window out again after the work area it was placed in changed
    /// from `old_area`, e.g. because a panel appeared or a screen was
    /// resized. A window being moved or resized keeps its geometry; its
    /// session only loses the work area restriction if that would snap it.
    /// Returns `true` when the frame changed.
    pub fn check_workspace_position(&mut self, old_area: Rect) -> bool {
        if self.is_move_resize_active() {
            self.check_unrestricted_move_resize();
            return false;
        }

        let area = self.env.work_area.work_area_at(self.pending_geometry().center(), self.desktop);
        if area == old_area {
            return false;
        }

        let before = self.frame_geometry();
        {
            let mut blocker = self.geometry_updates_blocker();
            if let Some(restore) = blocker.quick_tile.restore_geometry {
                blocker.quick_tile.restore_geometry = Some(followed_edges(restore, old_area, area));
            }

            let geometry = blocker.pending_geometry();
            let followed = followed_edges(geometry, old_area, area);
            blocker.request_geometry(followed, ForceGeometry::Normal);
            if !blocker.relayout_in(area) {
                let partial = !old_area.contains_rect(&geometry);
                blocker.keep_in_area(area, partial);
            }
        }
        self.frame_geometry() != before
    }

    /// Recompute the geometry of a tiled or maximized window for `area`.
    /// Returns `false` for windows in neither state.
    fn relayout_in(&mut self, area: Rect) -> bool {
        let tile = self.quick_tile_mode();
        let maximize = self.maximize_mode();
        let target = if !tile.is_empty() {
            tile.geometry_in(area)
        } else if !maximize.is_empty() {
            self.maximized_geometry_in(maximize, area)
        } else {
            return false;
        };
        self.request_geometry(target, ForceGeometry::Normal);
        true
    }
}

/// Move `geometry` so that each edge touching an edge of `old` touches the
/// same edge of `new`.
fn followed_edges(geometry: Rect, old: Rect, new: Rect) -> Rect {
    let x = if geometry.x == old.x {
        new.x
    } else if geometry.right() == old.right() {
        new.right() - geometry.width
    } else {
        geometry.x
    };
    let y = if geometry.y == old.y {
        new.y
    } else if geometry.bottom() == old.bottom() {
        new.bottom() - geometry.height
    } else {
        geometry.y
    };
    geometry.with_origin(Point::new(x, y))
}
