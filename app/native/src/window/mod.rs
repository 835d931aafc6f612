//! Window geometry core.
//!
//! A `Window` owns the geometry state of one managed window and is the only
//! place that state changes. Every change goes through one commit path:
//!
//! ```text
//! pointer / keyboard ──► MoveResizeController ──► GeometryConstraintSolver
//!                                │                          │
//!                                ▼                          ▼
//!                         QuickTileEngine ──────► GeometryUpdateBatcher
//!                                                           │
//!                                              commit (rule check, apply)
//!                                                           │
//!                                                           ▼
//!                                                     WindowEvent
//! ```
//!
//! Windows are stored in a `WindowTable`, which also owns the transient
//! (parent/child) relation between them.
//!
//! # Module Structure
//!
//! - `state` - Value types (`Rect`, `Point`, `Size`, `Margins`, `Layer`)
//! - `constraints` - Size hint enforcement
//! - `batcher` - Geometry update blocking and coalescing
//! - `quick_tile` - Half/quarter/maximize tiling and electric borders
//! - `maximize` - Per-axis maximize
//! - `workspace` - Following screen and work area changes
//! - `move_resize` - Interactive move and resize sessions
//! - `transients` / `table` - Transient relation and the window arena
//! - `capabilities`, `screen`, `rules`, `timer` - Collaborators

pub mod batcher;
pub mod capabilities;
pub mod constraints;
pub mod events;
pub mod maximize;
pub mod move_resize;
pub mod quick_tile;
pub mod rules;
pub mod screen;
pub mod state;
pub mod table;
pub mod timer;
pub mod transients;
pub mod workspace;

use std::sync::Arc;
use std::time::Instant;

use eyeball::Observable;
use serde::Serialize;

pub use self::batcher::{
    ForceGeometry, GeometryCommit, GeometryUpdateBatcher, GeometryUpdatesBlocker,
    PendingGeometry,
};
pub use self::capabilities::{
    ClientCapabilities, InternalCapabilities, WindowCapabilities, WindowKind,
};
pub use self::constraints::{SizeHints, SizeMode, adjusted_size};
pub use self::events::{EventDispatcher, Listener, ListenerId, WindowEvent};
pub use self::maximize::MaximizeMode;
pub use self::move_resize::{
    CursorShape, MoveResizeKey, MoveResizeRequest, MoveResizeSession, MoveResizeState, Position,
};
pub use self::quick_tile::QuickTileMode;
pub use self::rules::{RulePolicy, RuleSet, WindowIdentity};
pub use self::screen::{Screen, Screens, Strut, WorkArea};
pub use self::state::{
    DESKTOP_ALL, DESKTOP_UNASSIGNED, Layer, Margins, Point, Rect, Size, WindowId,
};
pub use self::table::WindowTable;
pub use self::timer::{Clock, DelayTimer, ManualClock, SystemClock};
pub use self::transients::TransientGroup;
use crate::config::CasementConfig;

// ============================================================================
// Environment
// ============================================================================

/// Shared collaborators every window consults.
#[derive(Debug, Clone)]
pub struct Environment {
    pub work_area: Arc<dyn WorkArea>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<CasementConfig>,
    pub rules: Arc<RuleSet>,
}

impl Environment {
    #[must_use]
    pub fn new(work_area: Arc<dyn WorkArea>, clock: Arc<dyn Clock>, config: Arc<CasementConfig>) -> Self {
        let rules = Arc::new(RuleSet::new(&config.rules));
        Self { work_area, clock, config, rules }
    }
}

// ============================================================================
// Closed window
// ============================================================================

/// Terminal snapshot of a withdrawn window.
///
/// Shared through an `Arc` so that animations running after the window is
/// gone can hold on to its last state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosedWindow {
    pub id: WindowId,
    pub identity: WindowIdentity,
    pub frame_geometry: Rect,
    pub desktop: i32,
    pub layer: Layer,
    pub quick_tile_mode: QuickTileMode,
}

// ============================================================================
// Window
// ============================================================================

/// Geometry state of a managed window.
#[derive(Debug)]
pub struct Window {
    id: WindowId,
    identity: WindowIdentity,
    capabilities: Box<dyn WindowCapabilities>,
    env: Environment,
    policy: RulePolicy,
    frame: Observable<Rect>,
    buffer_geometry: Rect,
    desktop: i32,
    layer: Layer,
    keep_above: bool,
    keep_below: bool,
    transients: TransientGroup,
    batcher: GeometryUpdateBatcher,
    quick_tile: quick_tile::QuickTileState,
    maximize_mode: MaximizeMode,
    move_resize: move_resize::MoveResizeController,
    events: EventDispatcher,
    /// Events raised while updates are blocked, sent after the commit.
    deferred_events: Vec<WindowEvent>,
}

impl Window {
    /// Create a window on the current desktop with an initial frame.
    #[must_use]
    pub fn new(
        id: WindowId,
        identity: WindowIdentity,
        capabilities: Box<dyn WindowCapabilities>,
        frame: Rect,
        env: &Environment,
    ) -> Self {
        let policy = env.rules.policy_for(&identity);
        let buffer_geometry = frame.shrunk_by(&capabilities.borders());
        let desktop = env.work_area.current_desktop();
        let quick_tile = quick_tile::QuickTileState::new(&env.config.quick_tile);
        let move_resize = move_resize::MoveResizeController::new(&env.config.move_resize);
        let layer = capabilities.kind().base_layer();

        tracing::debug!(window = %id, app_id = %identity.app_id, %frame, "window created");

        Self {
            id,
            identity,
            capabilities,
            env: env.clone(),
            policy,
            frame: Observable::new(frame),
            buffer_geometry,
            desktop,
            layer,
            keep_above: false,
            keep_below: false,
            transients: TransientGroup::default(),
            batcher: GeometryUpdateBatcher::new(),
            quick_tile,
            maximize_mode: MaximizeMode::RESTORE,
            move_resize,
            events: EventDispatcher::new(),
            deferred_events: Vec::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub const fn id(&self) -> WindowId { self.id }

    #[must_use]
    pub const fn identity(&self) -> &WindowIdentity { &self.identity }

    #[must_use]
    pub const fn environment(&self) -> &Environment { &self.env }

    #[must_use]
    pub const fn policy(&self) -> &RulePolicy { &self.policy }

    /// Outer geometry, including decorations.
    #[must_use]
    pub fn frame_geometry(&self) -> Rect { *Observable::get(&self.frame) }

    /// Client content geometry.
    #[must_use]
    pub const fn buffer_geometry(&self) -> Rect { self.buffer_geometry }

    /// Subscribe to committed frame geometry changes.
    #[must_use]
    pub fn subscribe_frame_geometry(&self) -> eyeball::Subscriber<Rect> {
        Observable::subscribe(&self.frame)
    }

    #[must_use]
    pub fn borders(&self) -> Margins { self.capabilities.borders() }

    #[must_use]
    pub fn kind(&self) -> WindowKind { self.capabilities.kind() }

    /// Size hints with rule overrides applied.
    #[must_use]
    pub fn size_hints(&self) -> SizeHints { self.policy.apply_to_hints(self.capabilities.size_hints()) }

    #[must_use]
    pub fn is_movable(&self) -> bool { self.policy.is_movable(self.capabilities.is_movable()) }

    #[must_use]
    pub fn is_resizable(&self) -> bool { self.policy.is_resizable(self.capabilities.is_resizable()) }

    #[must_use]
    pub const fn desktop(&self) -> i32 { self.desktop }

    #[must_use]
    pub const fn is_on_all_desktops(&self) -> bool { self.desktop == DESKTOP_ALL }

    #[must_use]
    pub const fn is_on_desktop(&self, desktop: i32) -> bool {
        self.desktop == DESKTOP_ALL || self.desktop == desktop
    }

    #[must_use]
    pub const fn layer(&self) -> Layer { self.layer }

    #[must_use]
    pub const fn keep_above(&self) -> bool { self.keep_above }

    #[must_use]
    pub const fn keep_below(&self) -> bool { self.keep_below }

    #[must_use]
    pub const fn transient_group(&self) -> &TransientGroup { &self.transients }

    #[must_use]
    pub const fn transient_for(&self) -> Option<WindowId> { self.transients.transient_for() }

    #[must_use]
    pub const fn is_transient(&self) -> bool { self.transients.is_transient() }

    #[must_use]
    pub const fn is_modal(&self) -> bool { self.transients.is_modal() }

    pub const fn set_modal(&mut self, modal: bool) { self.transients.set_modal(modal); }

    /// Index of the screen the frame's center is on.
    #[must_use]
    pub fn screen(&self) -> usize { self.env.work_area.screen_at(self.frame_geometry().center()) }

    /// Work area of the window's screen on its desktop.
    #[must_use]
    pub fn work_area(&self) -> Rect { self.env.work_area.work_area(self.screen(), self.desktop) }

    // ========================================================================
    // Events
    // ========================================================================

    pub fn subscribe(&mut self, listener: Listener) -> ListenerId { self.events.subscribe(listener) }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool { self.events.unsubscribe(id) }

    /// Open an async channel receiving this window's events.
    pub fn event_channel(&mut self) -> tokio::sync::mpsc::UnboundedReceiver<WindowEvent> {
        self.events.channel()
    }

    fn emit(&mut self, event: &WindowEvent) {
        if self.batcher.is_blocked() {
            self.deferred_events.push(event.clone());
        } else {
            self.events.emit(event);
        }
    }

    fn flush_deferred_events(&mut self) {
        for event in std::mem::take(&mut self.deferred_events) {
            self.events.emit(&event);
        }
    }

    // ========================================================================
    // Size conversion
    // ========================================================================

    /// Frame size enclosing a client size.
    #[must_use]
    pub fn frame_size_for_client_size(&self, client: Size) -> Size {
        let borders = self.borders();
        Size::new(client.width + borders.horizontal(), client.height + borders.vertical())
    }

    /// Client size inside a frame size.
    #[must_use]
    pub fn client_size_for_frame_size(&self, frame: Size) -> Size {
        let borders = self.borders();
        Size::new(frame.width - borders.horizontal(), frame.height - borders.vertical())
    }

    /// Constrain a client size with this window's hints.
    #[must_use]
    pub fn adjusted_size(&self, client: Size, mode: SizeMode) -> Size {
        adjusted_size(client, mode, &self.size_hints())
    }

    /// Constrain a frame size with this window's hints.
    #[must_use]
    pub fn adjusted_frame_size(&self, frame: Size, mode: SizeMode) -> Size {
        let client = self.adjusted_size(self.client_size_for_frame_size(frame), mode);
        self.frame_size_for_client_size(client)
    }

    // ========================================================================
    // Geometry updates
    // ========================================================================

    /// Start (or nest) a blocked interval.
    pub fn block_geometry_updates(&mut self) {
        let frame = self.frame_geometry();
        self.batcher.block(frame);
    }

    /// End a blocked interval, committing the combined request when this was
    /// the outermost block. Events raised inside the interval follow the
    /// geometry notification.
    pub fn unblock_geometry_updates(&mut self) {
        let frame = self.frame_geometry();
        if let Some(commit) = self.batcher.unblock(frame) {
            self.apply_commit(commit);
        }
        if !self.batcher.is_blocked() {
            self.flush_deferred_events();
        }
    }

    /// Block updates until the returned guard is dropped.
    pub fn geometry_updates_blocker(&mut self) -> GeometryUpdatesBlocker<'_> {
        GeometryUpdatesBlocker::new(self)
    }

    #[must_use]
    pub const fn batcher(&self) -> &GeometryUpdateBatcher { &self.batcher }

    /// Submit a frame geometry. Returns `false` when the geometry was
    /// committed immediately but rejected or unchanged.
    pub fn request_geometry(&mut self, geometry: Rect, force: ForceGeometry) -> bool {
        match self.batcher.request(geometry, force) {
            Some(commit) => self.apply_commit(commit),
            None => true,
        }
    }

    fn apply_commit(&mut self, commit: GeometryCommit) -> bool {
        let borders = self.borders();
        if !self.policy.allows_geometry(commit.geometry, &borders) {
            tracing::warn!(
                window = %self.id,
                geometry = %commit.geometry,
                "geometry rejected by window rules"
            );
            return false;
        }

        let current = self.frame_geometry();
        if commit.force == ForceGeometry::Normal && commit.geometry == current {
            return false;
        }

        Observable::set(&mut self.frame, commit.geometry);
        self.buffer_geometry = commit.geometry.shrunk_by(&borders);

        let old = commit.previous.unwrap_or(current);
        tracing::debug!(window = %self.id, %old, new = %commit.geometry, "geometry committed");
        self.emit(&WindowEvent::GeometryChanged { old, new: commit.geometry });
        true
    }

    // ========================================================================
    // Programmatic geometry
    // ========================================================================

    /// Geometry the window is heading to: the last request while updates are
    /// blocked, otherwise the committed frame.
    #[must_use]
    pub fn pending_geometry(&self) -> Rect {
        self.batcher.requested().unwrap_or_else(|| self.frame_geometry())
    }

    /// Move the frame to a new origin.
    pub fn move_to(&mut self, origin: Point, force: ForceGeometry) -> bool {
        let geometry = self.pending_geometry().with_origin(origin);
        self.request_geometry(geometry, force)
    }

    /// Resize the frame, bounded by the work area and the size hints.
    pub fn resize_with_checks(&mut self, size: Size, force: ForceGeometry) -> bool {
        let area = self.work_area();
        let bounded = size.bounded_to(area.size());
        let size = self.adjusted_frame_size(bounded, SizeMode::Any);
        let geometry = self.pending_geometry().with_size(size);
        self.request_geometry(geometry, force)
    }

    /// Set the whole frame, with the size constrained by the hints.
    pub fn set_frame_geometry(&mut self, geometry: Rect, force: ForceGeometry) -> bool {
        let size = self.adjusted_frame_size(geometry.size(), SizeMode::Any);
        self.request_geometry(geometry.with_size(size), force)
    }

    /// Move to a position and pull the frame back into the work area there.
    pub fn pack_to(&mut self, left: i32, top: i32) -> bool {
        let origin = Point::new(left, top);
        let target = self.pending_geometry().with_origin(origin);
        let area = self.env.work_area.work_area_at(target.center(), self.desktop);

        let mut blocker = self.geometry_updates_blocker();
        blocker.move_to(origin, ForceGeometry::Normal);
        blocker.keep_in_area(area, false);
        true
    }

    /// Keep the frame inside `area`. Unless `partial`, the frame is shrunk to
    /// fit first; with `partial`, only `minVisible` pixels must stay inside.
    pub fn keep_in_area(&mut self, area: Rect, partial: bool) -> bool {
        let mut geometry = self.move_resize_geometry();

        if !partial && (area.width < geometry.width || area.height < geometry.height) {
            let size = self.adjusted_frame_size(geometry.size().bounded_to(area.size()), SizeMode::MaxBound);
            geometry = geometry.with_size(size);
        }

        let min_visible = self.env.config.move_resize.min_visible;
        let kept = kept_in_area(geometry, area, partial, min_visible);
        self.request_geometry(kept, ForceGeometry::Normal)
    }

    // ========================================================================
    // Desktops and layers
    // ========================================================================

    /// Move to a desktop (`DESKTOP_ALL` for every desktop). Returns `false`
    /// for unknown desktops or when nothing changed.
    pub fn set_desktop(&mut self, desktop: i32) -> bool {
        let count = self.env.work_area.desktop_count();
        if desktop != DESKTOP_ALL && !(1..=count).contains(&desktop) {
            tracing::warn!(window = %self.id, desktop, count, "ignoring invalid desktop");
            return false;
        }
        if desktop == self.desktop {
            return false;
        }

        let old = std::mem::replace(&mut self.desktop, desktop);
        tracing::debug!(window = %self.id, old, new = desktop, "desktop changed");
        self.emit(&WindowEvent::DesktopChanged { old, new: desktop });
        true
    }

    /// Show on every desktop, or pin back to the current one.
    pub fn set_on_all_desktops(&mut self, on_all: bool) -> bool {
        if on_all == self.is_on_all_desktops() {
            return false;
        }
        let desktop = if on_all { DESKTOP_ALL } else { self.env.work_area.current_desktop() };
        self.set_desktop(desktop)
    }

    pub fn set_keep_above(&mut self, keep_above: bool) -> bool {
        if keep_above == self.keep_above {
            return false;
        }
        self.keep_above = keep_above;
        if keep_above {
            self.keep_below = false;
        }
        self.update_layer();
        true
    }

    pub fn set_keep_below(&mut self, keep_below: bool) -> bool {
        if keep_below == self.keep_below {
            return false;
        }
        self.keep_below = keep_below;
        if keep_below {
            self.keep_above = false;
        }
        self.update_layer();
        true
    }

    /// Layer derived from the window kind and keep-above/below.
    #[must_use]
    pub fn own_layer(&self) -> Layer {
        let kind = self.kind();
        if !kind.is_stackable() {
            return kind.base_layer();
        }
        if self.keep_above {
            Layer::Above
        } else if self.keep_below {
            Layer::Below
        } else {
            kind.base_layer()
        }
    }

    /// Recompute the layer from this window's own state.
    pub fn update_layer(&mut self) -> bool {
        let layer = self.own_layer();
        self.set_layer(layer)
    }

    fn set_layer(&mut self, layer: Layer) -> bool {
        if layer == self.layer {
            return false;
        }
        let old = std::mem::replace(&mut self.layer, layer);
        tracing::debug!(window = %self.id, old = old.as_str(), new = layer.as_str(), "layer changed");
        self.emit(&WindowEvent::LayerChanged { old, new: layer });
        true
    }

    /// Change the title and re-evaluate the window rules.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.identity.title = title.into();
        self.policy = self.env.rules.policy_for(&self.identity);
    }

    // ========================================================================
    // Timers
    // ========================================================================

    /// Fire every timer whose deadline has passed. Returns `true` if any did.
    pub fn dispatch_timers(&mut self) -> bool {
        let now = self.env.clock.now();
        let delayed = self.fire_delayed_move_resize(now);
        let electric = self.fire_electric_border(now);
        delayed || electric
    }

    /// Earliest pending timer deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        [self.move_resize.delay_deadline(), self.quick_tile.electric_deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Withdraw the window, cancelling any session, and return its final
    /// snapshot.
    pub fn close(mut self) -> ClosedWindow {
        self.stop_delayed_move_resize();
        if self.is_move_resize_active() {
            self.finish_move_resize(true);
        }

        tracing::debug!(window = %self.id, "window closed");
        self.emit(&WindowEvent::Closed);

        ClosedWindow {
            id: self.id,
            frame_geometry: self.frame_geometry(),
            desktop: self.desktop,
            layer: self.layer,
            quick_tile_mode: self.quick_tile_mode(),
            identity: self.identity,
        }
    }
}

/// Position `geometry` inside `area`.
///
/// With `partial`, the area is widened so that only `min_visible` pixels must
/// overlap it on each axis. Origins are adjusted; sizes are kept.
#[must_use]
pub fn kept_in_area(geometry: Rect, area: Rect, partial: bool, min_visible: i32) -> Rect {
    let area = if partial {
        let visible_x = min_visible.min(geometry.width);
        let visible_y = min_visible.min(geometry.height);
        Rect::from_edges(
            area.x.min(area.x - geometry.width + visible_x),
            area.y.min(area.y - geometry.height + visible_y),
            area.right().max(area.right() + geometry.width - visible_x),
            area.bottom().max(area.bottom() + geometry.height - visible_y),
        )
    } else {
        area
    };

    let mut x = geometry.x;
    let mut y = geometry.y;

    if geometry.right() > area.right() && geometry.width <= area.width {
        x = area.right() - geometry.width;
    }
    if geometry.bottom() > area.bottom() && geometry.height <= area.height {
        y = area.bottom() - geometry.height;
    }
    if x < area.x {
        x = area.x;
    }
    if y < area.y {
        y = area.y;
    }

    geometry.with_origin(Point::new(x, y))
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::config::WindowRule;

    mod commit_tests {
        use super::*;

        #[test]
        fn test_request_commits_and_notifies() {
            let (env, _) = environment();
            let mut window = window(&env, Rect::new(0, 0, 100, 100));
            let events = record(&mut window);

            assert!(window.request_geometry(Rect::new(10, 10, 100, 100), ForceGeometry::Normal));
            assert_eq!(window.frame_geometry(), Rect::new(10, 10, 100, 100));
            assert_eq!(
                geometry_changes(&events.lock()),
                vec![(Rect::new(0, 0, 100, 100), Rect::new(10, 10, 100, 100))]
            );
        }

        #[test]
        fn test_unchanged_normal_request_is_dropped() {
            let (env, _) = environment();
            let mut window = window(&env, Rect::new(0, 0, 100, 100));
            let events = record(&mut window);

            assert!(!window.request_geometry(Rect::new(0, 0, 100, 100), ForceGeometry::Normal));
            assert!(window.request_geometry(Rect::new(0, 0, 100, 100), ForceGeometry::Forced));
            assert_eq!(events.lock().len(), 1, "forced commits always notify");
        }

        #[test]
        fn test_blocker_coalesces_requests() {
            let (env, _) = environment();
            let mut window = window(&env, Rect::new(0, 0, 100, 100));
            let events = record(&mut window);

            {
                let mut blocker = window.geometry_updates_blocker();
                for step in 1..=5 {
                    blocker.request_geometry(Rect::new(step * 10, 0, 100, 100), ForceGeometry::Normal);
                }
                assert_eq!(blocker.frame_geometry(), Rect::new(0, 0, 100, 100));
            }

            assert_eq!(
                geometry_changes(&events.lock()),
                vec![(Rect::new(0, 0, 100, 100), Rect::new(50, 0, 100, 100))]
            );
        }

        #[test]
        fn test_forced_then_unchanged_normal_notifies_once() {
            let (env, _) = environment();
            let mut window = window(&env, Rect::new(0, 0, 100, 100));
            let events = record(&mut window);

            {
                let mut blocker = window.geometry_updates_blocker();
                blocker.request_geometry(Rect::new(40, 40, 100, 100), ForceGeometry::Forced);
                blocker.request_geometry(Rect::new(0, 0, 100, 100), ForceGeometry::Normal);
            }

            assert_eq!(window.frame_geometry(), Rect::new(0, 0, 100, 100));
            assert_eq!(
                geometry_changes(&events.lock()),
                vec![(Rect::new(0, 0, 100, 100), Rect::new(0, 0, 100, 100))]
            );
        }

        #[test]
        fn test_normal_requests_back_to_start_do_not_notify() {
            let (env, _) = environment();
            let mut window = window(&env, Rect::new(0, 0, 100, 100));
            let events = record(&mut window);

            {
                let mut blocker = window.geometry_updates_blocker();
                blocker.request_geometry(Rect::new(40, 40, 100, 100), ForceGeometry::Normal);
                blocker.request_geometry(Rect::new(80, 0, 300, 100), ForceGeometry::Normal);
                blocker.request_geometry(Rect::new(0, 0, 100, 100), ForceGeometry::Normal);
            }

            assert_eq!(window.frame_geometry(), Rect::new(0, 0, 100, 100));
            assert!(events.lock().is_empty());
        }

        #[test]
        fn test_events_inside_blocker_follow_geometry() {
            let (env, _) = environment();
            let mut window = window(&env, Rect::new(0, 0, 100, 100));
            let events = record(&mut window);

            {
                let mut blocker = window.geometry_updates_blocker();
                blocker.set_desktop(2);
                blocker.request_geometry(Rect::new(10, 0, 100, 100), ForceGeometry::Normal);
                {
                    let mut inner = blocker.geometry_updates_blocker();
                    inner.set_keep_above(true);
                }
                assert!(events.lock().is_empty(), "nothing is sent while blocked");
            }

            let names: Vec<_> = events.lock().iter().map(WindowEvent::name).collect();
            assert_eq!(names, ["geometry-changed", "desktop-changed", "layer-changed"]);
        }

        #[test]
        fn test_buffer_geometry_follows_borders() {
            let (env, _) = environment();
            let caps = ClientCapabilities { borders: Margins::new(2, 2, 20, 2), ..Default::default() };
            let mut window = window_with(&env, caps, Rect::new(0, 0, 100, 100));
            assert_eq!(window.buffer_geometry(), Rect::new(2, 20, 96, 78));

            window.request_geometry(Rect::new(50, 50, 200, 200), ForceGeometry::Normal);
            assert_eq!(window.buffer_geometry(), Rect::new(52, 70, 196, 178));
        }

        #[test]
        fn test_observable_frame() {
            let (env, _) = environment();
            let mut window = window(&env, Rect::new(0, 0, 100, 100));
            let subscriber = window.subscribe_frame_geometry();

            window.move_to(Point::new(30, 40), ForceGeometry::Normal);
            assert_eq!(subscriber.get(), Rect::new(30, 40, 100, 100));
        }

        #[test]
        fn test_rule_vetoes_commit() {
            let config = CasementConfig {
                rules: vec![WindowRule {
                    app_id: Some("org.example.App".to_string()),
                    max_size: Some(Size::new(500, 500)),
                    ..Default::default()
                }],
                ..Default::default()
            };
            let (env, _) = environment_with(config);
            let mut window = window(&env, Rect::new(0, 0, 100, 100));

            assert!(!window.request_geometry(Rect::new(0, 0, 600, 100), ForceGeometry::Forced));
            assert_eq!(window.frame_geometry(), Rect::new(0, 0, 100, 100));
        }
    }

    mod facade_tests {
        use super::*;

        #[test]
        fn test_resize_with_checks_applies_hints_and_area() {
            let (env, _) = environment();
            let caps = ClientCapabilities {
                hints: SizeHints { min: Size::new(200, 200), ..Default::default() },
                ..Default::default()
            };
            let mut window = window_with(&env, caps, Rect::new(0, 0, 300, 300));

            window.resize_with_checks(Size::new(50, 5000), ForceGeometry::Normal);
            assert_eq!(window.frame_geometry().size(), Size::new(200, 1080));
        }

        #[test]
        fn test_keep_in_area_full() {
            let (env, _) = environment();
            let mut window = window(&env, Rect::new(1800, 1000, 400, 300));

            window.keep_in_area(SCREEN, false);
            assert_eq!(window.frame_geometry(), Rect::new(1520, 780, 400, 300));
        }

        #[test]
        fn test_keep_in_area_shrinks_oversized() {
            let (env, _) = environment();
            let mut window = window(&env, Rect::new(-100, -100, 2500, 1500));

            window.keep_in_area(SCREEN, false);
            assert_eq!(window.frame_geometry(), SCREEN);
        }

        #[test]
        fn test_keep_in_area_partial_leaves_min_visible() {
            let (env, _) = environment();
            let mut window = window(&env, Rect::new(5000, 300, 400, 300));

            window.keep_in_area(SCREEN, true);
            // 100 px stay inside the right edge
            assert_eq!(window.frame_geometry(), Rect::new(1820, 300, 400, 300));
        }

        #[test]
        fn test_pack_to_commits_once() {
            let (env, _) = environment();
            let mut window = window(&env, Rect::new(0, 0, 400, 300));
            let events = record(&mut window);

            assert!(window.pack_to(1700, 900));
            assert_eq!(window.frame_geometry(), Rect::new(1520, 780, 400, 300));
            assert_eq!(geometry_changes(&events.lock()).len(), 1);
        }

        #[test]
        fn test_set_desktop_validates() {
            let (env, _) = environment();
            let mut window = window(&env, Rect::new(0, 0, 100, 100));
            assert_eq!(window.desktop(), 1);

            assert!(window.set_desktop(3));
            assert!(!window.set_desktop(3));
            assert!(!window.set_desktop(9));
            assert!(window.set_on_all_desktops(true));
            assert!(window.is_on_desktop(2));
            assert!(window.set_on_all_desktops(false));
            assert_eq!(window.desktop(), 1);
        }

        #[test]
        fn test_keep_above_and_below_are_exclusive() {
            let (env, _) = environment();
            let mut window = window(&env, Rect::new(0, 0, 100, 100));
            assert_eq!(window.layer(), Layer::Normal);

            window.set_keep_above(true);
            assert_eq!(window.layer(), Layer::Above);

            window.set_keep_below(true);
            assert!(!window.keep_above());
            assert_eq!(window.layer(), Layer::Below);
        }

        #[test]
        fn test_set_title_reevaluates_rules() {
            let config = CasementConfig {
                rules: vec![WindowRule {
                    title: Some("Picture-in-Picture".to_string()),
                    resizable: Some(false),
                    ..Default::default()
                }],
                ..Default::default()
            };
            let (env, _) = environment_with(config);
            let mut window = window(&env, Rect::new(0, 0, 100, 100));
            assert!(window.is_resizable());

            window.set_title("Picture-in-Picture");
            assert!(!window.is_resizable());
        }

        #[test]
        fn test_close_emits_closed() {
            let (env, _) = environment();
            let mut window = window(&env, Rect::new(0, 0, 100, 100));
            let events = record(&mut window);

            let closed = window.close();
            assert_eq!(closed.frame_geometry, Rect::new(0, 0, 100, 100));
            assert_eq!(events.lock().last(), Some(&WindowEvent::Closed));
        }
    }

    #[test]
    fn test_kept_in_area_moves_left_and_up() {
        let area = Rect::new(0, 0, 1000, 800);
        assert_eq!(
            kept_in_area(Rect::new(-50, -20, 200, 200), area, false, 100),
            Rect::new(0, 0, 200, 200)
        );
        assert_eq!(
            kept_in_area(Rect::new(900, 700, 200, 200), area, false, 100),
            Rect::new(800, 600, 200, 200)
        );
    }
}
