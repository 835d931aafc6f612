//! Geometry update batching.
//!
//! Interactive operations often change a window several times in a row (move,
//! then resize, then snap). While updates are blocked, geometry requests are
//! recorded instead of applied; the outermost unblock commits the last
//! requested rect exactly once. Blocks nest, and a `Forced` request anywhere
//! in the blocked interval makes the final commit forced.
//!
//! `GeometryUpdatesBlocker` is the scoped form: it blocks on creation and
//! unblocks when dropped, on every exit path.

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use super::Window;
use super::state::Rect;

/// How strongly a geometry request should be applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForceGeometry {
    /// Skip the commit when nothing changed.
    #[default]
    Normal,
    /// Always apply and notify.
    Forced,
}

/// Pending request kind while updates are blocked. Ordered so that the
/// strongest request wins when combining.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PendingGeometry {
    #[default]
    None,
    Normal,
    Forced,
}

impl From<ForceGeometry> for PendingGeometry {
    fn from(force: ForceGeometry) -> Self {
        match force {
            ForceGeometry::Normal => Self::Normal,
            ForceGeometry::Forced => Self::Forced,
        }
    }
}

/// A geometry change ready to be applied to the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryCommit {
    pub geometry: Rect,
    pub force: ForceGeometry,
    /// Geometry at the time updates were blocked, when this commit ends a
    /// blocked interval.
    pub previous: Option<Rect>,
}

/// Nesting counter plus the combined pending request.
#[derive(Debug, Clone, Default)]
pub struct GeometryUpdateBatcher {
    depth: u32,
    pending: PendingGeometry,
    requested: Option<Rect>,
    geometry_before_blocking: Option<Rect>,
    visible_rect_before_update: Option<Rect>,
}

impl GeometryUpdateBatcher {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub const fn is_blocked(&self) -> bool { self.depth > 0 }

    #[must_use]
    pub const fn depth(&self) -> u32 { self.depth }

    #[must_use]
    pub const fn pending(&self) -> PendingGeometry { self.pending }

    /// Last geometry requested while blocked.
    #[must_use]
    pub const fn requested(&self) -> Option<Rect> { self.requested }

    /// Geometry snapshot taken by the outermost block, while blocked.
    #[must_use]
    pub const fn geometry_before_blocking(&self) -> Option<Rect> { self.geometry_before_blocking }

    /// Visible geometry recorded at the last outermost unblock.
    #[must_use]
    pub const fn visible_rect_before_update(&self) -> Option<Rect> {
        self.visible_rect_before_update
    }

    /// Enter a blocked interval. `current` is the committed geometry.
    pub fn block(&mut self, current: Rect) {
        if self.depth == 0 {
            self.geometry_before_blocking = Some(current);
        }
        self.depth += 1;
    }

    /// Leave a blocked interval. Returns the combined commit when this was
    /// the outermost block and something was requested.
    pub fn unblock(&mut self, current: Rect) -> Option<GeometryCommit> {
        if self.depth == 0 {
            tracing::warn!("unbalanced geometry update unblock ignored");
            return None;
        }

        self.depth -= 1;
        if self.depth > 0 {
            return None;
        }

        self.visible_rect_before_update = Some(current);
        let previous = self.geometry_before_blocking.take();
        let pending = std::mem::take(&mut self.pending);
        let requested = self.requested.take();

        let force = match pending {
            PendingGeometry::None => return None,
            PendingGeometry::Normal => ForceGeometry::Normal,
            PendingGeometry::Forced => ForceGeometry::Forced,
        };

        requested.map(|geometry| GeometryCommit { geometry, force, previous })
    }

    /// Submit a geometry. Applied immediately when not blocked.
    pub fn request(&mut self, geometry: Rect, force: ForceGeometry) -> Option<GeometryCommit> {
        if self.depth == 0 {
            return Some(GeometryCommit { geometry, force, previous: None });
        }

        self.pending = self.pending.max(force.into());
        self.requested = Some(geometry);
        None
    }
}

// ============================================================================
// Scoped blocker
// ============================================================================

/// Blocks geometry updates on a window for the lifetime of the guard.
///
/// The guard dereferences to the window, so operations can be issued through
/// it while blocked.
pub struct GeometryUpdatesBlocker<'a> {
    window: &'a mut Window,
}

impl<'a> GeometryUpdatesBlocker<'a> {
    pub fn new(window: &'a mut Window) -> Self {
        window.block_geometry_updates();
        Self { window }
    }
}

impl Deref for GeometryUpdatesBlocker<'_> {
    type Target = Window;

    fn deref(&self) -> &Window { self.window }
}

impl DerefMut for GeometryUpdatesBlocker<'_> {
    fn deref_mut(&mut self) -> &mut Window { self.window }
}

impl Drop for GeometryUpdatesBlocker<'_> {
    fn drop(&mut self) { self.window.unblock_geometry_updates(); }
}
