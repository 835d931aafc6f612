//! Interactive move and resize.
//!
//! A session starts from a pointer press (or a keyboard shortcut), follows
//! the pointer and ends with a finish or a cancel. The pointer position
//! relative to the frame decides what the session does: the interior moves
//! the window, the band of `borderMargin` pixels along the frame resizes the
//! matching edge or corner.
//!
//! # States
//!
//! ```text
//! Idle ──start_delayed──► Starting ──timer / drag threshold──► Active
//!   ▲                        │                                   │
//!   └────────stop_delayed────┘◄──────────finish / cancel─────────┘
//! ```
//!
//! `start_move_resize` enters `Active` directly. Geometry computed while the
//! session is active goes through the size hints and, unless the session is
//! unrestricted, is kept within the work area.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::constraints::SizeMode;
use super::events::WindowEvent;
use super::quick_tile::TileSnapshot;
use super::state::{Point, Rect, Size};
use super::timer::DelayTimer;
use super::{ForceGeometry, Window};
use crate::config::{ClampPolicy, MoveResizeConfig};

// ============================================================================
// Position and cursor
// ============================================================================

/// Part of the frame a session acts on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    /// Interior: the session moves the window.
    #[default]
    Center,
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Position {
    #[must_use]
    pub const fn is_move(self) -> bool { matches!(self, Self::Center) }

    #[must_use]
    pub const fn is_resize(self) -> bool { !self.is_move() }

    #[must_use]
    pub const fn moves_left_edge(self) -> bool {
        matches!(self, Self::Left | Self::TopLeft | Self::BottomLeft)
    }

    #[must_use]
    pub const fn moves_right_edge(self) -> bool {
        matches!(self, Self::Right | Self::TopRight | Self::BottomRight)
    }

    #[must_use]
    pub const fn moves_top_edge(self) -> bool {
        matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
    }

    #[must_use]
    pub const fn moves_bottom_edge(self) -> bool {
        matches!(self, Self::Bottom | Self::BottomLeft | Self::BottomRight)
    }

    /// Size hint rounding for a resize of this edge. Side edges leave the
    /// other dimension alone.
    #[must_use]
    pub const fn size_mode(self) -> SizeMode {
        match self {
            Self::Left | Self::Right => SizeMode::FixedHeight,
            Self::Top | Self::Bottom => SizeMode::FixedWidth,
            _ => SizeMode::Any,
        }
    }

    #[must_use]
    pub const fn cursor(self) -> CursorShape {
        match self {
            Self::Center => CursorShape::Move,
            Self::Left | Self::Right => CursorShape::SizeHorizontal,
            Self::Top | Self::Bottom => CursorShape::SizeVertical,
            Self::TopLeft | Self::BottomRight => CursorShape::SizeFDiag,
            Self::TopRight | Self::BottomLeft => CursorShape::SizeBDiag,
        }
    }

    /// Classify a point on the frame. Points within `margin` of an edge
    /// resize it; points outside the frame count as the interior.
    #[must_use]
    pub fn hit_test(frame: Rect, point: Point, margin: i32) -> Self {
        if !frame.contains_point(point) {
            return Self::Center;
        }

        let local = point - frame.origin();
        let margin = margin.max(0);

        let mut left = local.x < margin;
        let mut right = local.x >= frame.width - margin;
        if left && right {
            left = local.x < frame.width / 2;
            right = !left;
        }

        let mut top = local.y < margin;
        let mut bottom = local.y >= frame.height - margin;
        if top && bottom {
            top = local.y < frame.height / 2;
            bottom = !top;
        }

        match (left, right, top, bottom) {
            (true, _, true, _) => Self::TopLeft,
            (true, _, _, true) => Self::BottomLeft,
            (_, true, true, _) => Self::TopRight,
            (_, true, _, true) => Self::BottomRight,
            (true, ..) => Self::Left,
            (_, true, ..) => Self::Right,
            (_, _, true, _) => Self::Top,
            (_, _, _, true) => Self::Bottom,
            _ => Self::Center,
        }
    }
}

/// Pointer shape shown during a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CursorShape {
    #[default]
    Arrow,
    Move,
    SizeHorizontal,
    SizeVertical,
    /// Diagonal from top-left to bottom-right.
    SizeFDiag,
    /// Diagonal from top-right to bottom-left.
    SizeBDiag,
}

// ============================================================================
// Session
// ============================================================================

/// How a session should be started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MoveResizeRequest {
    pub pointer: Point,
    /// Frame part to act on; hit-tested from the pointer when `None`.
    pub position: Option<Position>,
    /// Skip work area clamping.
    pub unrestricted: bool,
    pub button_down: bool,
}

impl MoveResizeRequest {
    /// Pointer press at `pointer`, hit-tested.
    #[must_use]
    pub const fn at(pointer: Point) -> Self {
        Self { pointer, position: None, unrestricted: false, button_down: true }
    }

    #[must_use]
    pub const fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub const fn unrestricted(mut self) -> Self {
        self.unrestricted = true;
        self
    }
}

/// Keys understood during an active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveResizeKey {
    Left,
    Right,
    Up,
    Down,
    Confirm,
    Cancel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveResizeState {
    #[default]
    Idle,
    /// Waiting for the delay timer or the drag threshold.
    Starting,
    Active,
}

/// State of an active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResizeSession {
    pub unrestricted: bool,
    pub position: Position,
    pub button_down: bool,
    /// Pointer position relative to the frame origin.
    pub offset: Point,
    /// Frame bottom-right relative to the pointer.
    pub inverted_offset: Point,
    pub initial_geometry: Rect,
    pub current_geometry: Rect,
    pub start_screen: usize,
    pub cursor: CursorShape,
    /// Last pointer position seen.
    pub pointer: Point,
    #[serde(skip)]
    tile_snapshot: TileSnapshot,
}

impl MoveResizeSession {
    /// Where the pointer was when the session started.
    #[must_use]
    pub fn start_pointer(&self) -> Point { self.initial_geometry.origin() + self.offset }
}

/// Per-window session bookkeeping.
#[derive(Debug, Clone)]
pub struct MoveResizeController {
    state: MoveResizeState,
    session: Option<MoveResizeSession>,
    pending: Option<MoveResizeRequest>,
    delay_timer: DelayTimer,
}

impl MoveResizeController {
    #[must_use]
    pub fn new(config: &MoveResizeConfig) -> Self {
        Self {
            state: MoveResizeState::Idle,
            session: None,
            pending: None,
            delay_timer: DelayTimer::new(Duration::from_millis(config.delayed_start_ms)),
        }
    }

    #[must_use]
    pub const fn delay_deadline(&self) -> Option<Instant> { self.delay_timer.deadline() }
}

// ============================================================================
// Window operations
// ============================================================================

impl Window {
    #[must_use]
    pub const fn move_resize_state(&self) -> MoveResizeState { self.move_resize.state }

    #[must_use]
    pub const fn is_move_resize_active(&self) -> bool {
        matches!(self.move_resize.state, MoveResizeState::Active)
    }

    #[must_use]
    pub const fn move_resize_session(&self) -> Option<&MoveResizeSession> {
        self.move_resize.session.as_ref()
    }

    /// Candidate geometry of the active session, else the pending geometry.
    #[must_use]
    pub fn move_resize_geometry(&self) -> Rect {
        self.move_resize
            .session
            .map_or_else(|| self.pending_geometry(), |session| session.current_geometry)
    }

    /// Begin a session. Returns `false` when one is already active or the
    /// window refuses the requested kind of session.
    pub fn start_move_resize(&mut self, request: MoveResizeRequest) -> bool {
        match self.move_resize.state {
            MoveResizeState::Active => {
                tracing::debug!(window = %self.id, "move/resize already active");
                return false;
            }
            MoveResizeState::Starting => {
                self.stop_delayed_move_resize();
            }
            MoveResizeState::Idle => {}
        }

        let frame = self.pending_geometry();
        let margin = self.env.config.move_resize.border_margin;
        let position = request
            .position
            .unwrap_or_else(|| Position::hit_test(frame, request.pointer, margin));

        let allowed = if position.is_move() { self.is_movable() } else { self.is_resizable() };
        if !allowed || !self.capabilities.can_start_move_resize() {
            tracing::debug!(window = %self.id, ?position, "move/resize refused");
            return false;
        }

        let session = MoveResizeSession {
            unrestricted: request.unrestricted,
            position,
            button_down: request.button_down,
            offset: request.pointer - frame.origin(),
            inverted_offset: frame.bottom_right() - request.pointer,
            initial_geometry: frame,
            current_geometry: frame,
            start_screen: self.env.work_area.screen_at(request.pointer),
            cursor: position.cursor(),
            pointer: request.pointer,
            tile_snapshot: self.tile_snapshot(),
        };

        self.move_resize.session = Some(session);
        self.move_resize.state = MoveResizeState::Active;

        tracing::debug!(window = %self.id, ?position, %frame, "move/resize started");
        self.emit(&WindowEvent::MoveResizeStarted { position, geometry: frame });
        self.emit(&WindowEvent::CursorChanged { cursor: session.cursor });
        true
    }

    /// Follow the pointer. Returns `true` when the candidate geometry changed.
    pub fn handle_move_resize(&mut self, pointer: Point) -> bool {
        match self.move_resize.state {
            MoveResizeState::Idle => return false,
            MoveResizeState::Starting => {
                let Some(pending) = self.move_resize.pending else {
                    return false;
                };
                let threshold = self.env.config.move_resize.drag_threshold;
                if (pointer - pending.pointer).manhattan_length() <= threshold {
                    return false;
                }
                self.stop_delayed_move_resize();
                if !self.start_move_resize(pending) {
                    return false;
                }
            }
            MoveResizeState::Active => {}
        }

        let Some(mut session) = self.move_resize.session else {
            return false;
        };
        session.pointer = pointer;

        let candidate = if session.position.is_move() {
            self.move_geometry(&mut session, pointer)
        } else {
            self.resize_geometry(&session, pointer)
        };

        let changed = candidate != session.current_geometry;
        session.current_geometry = candidate;
        self.move_resize.session = Some(session);

        if session.position.is_move() {
            self.check_electric_border(pointer);
        }
        if !changed {
            return false;
        }

        let defer = session.position.is_resize() && self.env.config.move_resize.resize_effect;
        if !defer {
            self.request_geometry(candidate, ForceGeometry::Normal);
        }

        tracing::trace!(window = %self.id, %pointer, geometry = %candidate, "move/resize step");
        self.emit(&WindowEvent::MoveResizeStepped { geometry: candidate });
        true
    }

    /// End the session, committing (or with `cancel`, reverting) it.
    /// Returns `false` when no session was active.
    pub fn finish_move_resize(&mut self, cancel: bool) -> bool {
        match self.move_resize.state {
            MoveResizeState::Idle => {
                tracing::debug!(window = %self.id, "finish without an active move/resize");
                return false;
            }
            MoveResizeState::Starting => {
                self.stop_delayed_move_resize();
                return false;
            }
            MoveResizeState::Active => {}
        }

        self.move_resize.state = MoveResizeState::Idle;
        self.move_resize.delay_timer.cancel();
        let Some(session) = self.move_resize.session.take() else {
            return false;
        };

        {
            let mut blocker = self.geometry_updates_blocker();
            if cancel {
                blocker.reset_electric_border();
                blocker.restore_tile_snapshot(session.tile_snapshot);
                blocker.request_geometry(session.initial_geometry, ForceGeometry::Forced);
            } else {
                if session.position.is_resize() && blocker.env.config.move_resize.resize_effect {
                    blocker.request_geometry(session.current_geometry, ForceGeometry::Normal);
                }
                blocker.commit_electric_border(session.pointer);
            }
        }

        let geometry = self.frame_geometry();
        tracing::debug!(window = %self.id, cancel, %geometry, "move/resize finished");
        self.emit(&WindowEvent::MoveResizeFinished { cancelled: cancel, geometry });
        self.emit(&WindowEvent::CursorChanged { cursor: CursorShape::Arrow });
        true
    }

    /// Drive an active session from the keyboard. Arrows move the virtual
    /// pointer; `fine` uses the small step.
    pub fn key_press(&mut self, key: MoveResizeKey, fine: bool) -> bool {
        let Some(session) = self.move_resize.session else {
            return false;
        };

        let config = &self.env.config.move_resize;
        let step = if fine { config.keyboard_fine_step } else { config.keyboard_step };
        let delta = match key {
            MoveResizeKey::Confirm => return self.finish_move_resize(false),
            MoveResizeKey::Cancel => return self.finish_move_resize(true),
            MoveResizeKey::Left => Point::new(-step, 0),
            MoveResizeKey::Right => Point::new(step, 0),
            MoveResizeKey::Up => Point::new(0, -step),
            MoveResizeKey::Down => Point::new(0, step),
        };

        self.handle_move_resize(session.pointer + delta)
    }

    /// Lift the work area restriction from the active session when its
    /// geometry already lies where a restricted session would snap it, e.g.
    /// after the work area shrank under a window being moved. Returns `true`
    /// if the session became unrestricted.
    pub fn check_unrestricted_move_resize(&mut self) -> bool {
        let Some(mut session) = self.move_resize.session else {
            return false;
        };
        if session.unrestricted {
            return false;
        }

        let geometry = session.current_geometry;
        let area = self.env.work_area.work_area_at(session.pointer, self.desktop);
        let position = session.position;
        let outside = if position.is_move() {
            self.clamp_move(geometry, session.pointer) != geometry
        } else {
            (position.moves_left_edge() && geometry.x < area.x)
                || (position.moves_right_edge() && geometry.right() > area.right())
                || (position.moves_top_edge() && geometry.y < area.y)
                || (position.moves_bottom_edge() && geometry.bottom() > area.bottom())
        };
        if !outside {
            return false;
        }

        session.unrestricted = true;
        self.move_resize.session = Some(session);
        tracing::debug!(window = %self.id, %geometry, %area, "move/resize now unrestricted");
        true
    }

    // ========================================================================
    // Delayed start
    // ========================================================================

    /// Arm a session that starts after the press-and-hold delay, or earlier
    /// once the pointer travels past the drag threshold.
    pub fn start_delayed_move_resize(&mut self, request: MoveResizeRequest) -> bool {
        if self.move_resize.state != MoveResizeState::Idle {
            return false;
        }

        let now = self.env.clock.now();
        self.move_resize.pending = Some(request);
        self.move_resize.state = MoveResizeState::Starting;
        self.move_resize.delay_timer.arm(now);
        tracing::debug!(window = %self.id, pointer = %request.pointer, "delayed move/resize armed");
        true
    }

    /// Abort a pending delayed start.
    pub fn stop_delayed_move_resize(&mut self) -> bool {
        if self.move_resize.state != MoveResizeState::Starting {
            return false;
        }
        self.move_resize.delay_timer.cancel();
        self.move_resize.pending = None;
        self.move_resize.state = MoveResizeState::Idle;
        true
    }

    pub(crate) fn fire_delayed_move_resize(&mut self, now: Instant) -> bool {
        if self.move_resize.state != MoveResizeState::Starting
            || !self.move_resize.delay_timer.fire_if_due(now)
        {
            return false;
        }

        let Some(request) = self.move_resize.pending.take() else {
            self.move_resize.state = MoveResizeState::Idle;
            return false;
        };
        self.move_resize.state = MoveResizeState::Idle;
        self.start_move_resize(request)
    }

    // ========================================================================
    // Keyboard resize
    // ========================================================================

    /// Widen by one increment, up to the work area's right edge.
    pub fn grow_horizontal(&mut self) -> bool { self.step_size(true, true) }

    pub fn shrink_horizontal(&mut self) -> bool { self.step_size(true, false) }

    /// Heighten by one increment, up to the work area's bottom edge.
    pub fn grow_vertical(&mut self) -> bool { self.step_size(false, true) }

    pub fn shrink_vertical(&mut self) -> bool { self.step_size(false, false) }

    fn step_size(&mut self, horizontal: bool, grow: bool) -> bool {
        if !self.is_resizable() {
            return false;
        }

        let frame = self.pending_geometry();
        let increments = self.size_hints().effective_increments();
        let area = self.work_area();

        // Only the stepped dimension may snap to the increment grid.
        let (current, increment, limit, mode) = if horizontal {
            (frame.width, increments.width, area.right() - frame.x, SizeMode::FixedHeight)
        } else {
            (frame.height, increments.height, area.bottom() - frame.y, SizeMode::FixedWidth)
        };

        let target = if grow {
            if current >= limit {
                return false;
            }
            (current + increment).min(limit)
        } else {
            if current - increment <= 1 {
                return false;
            }
            current - increment
        };

        let requested = if horizontal {
            Size::new(target, frame.height)
        } else {
            Size::new(frame.width, target)
        };
        let size = self.adjusted_frame_size(requested, mode);
        let resolved = if horizontal { size.width } else { size.height };

        let progressed = if grow { resolved > current } else { resolved < current };
        if !progressed {
            return false;
        }
        self.request_geometry(frame.with_size(size), ForceGeometry::Normal)
    }

    // ========================================================================
    // Geometry computation
    // ========================================================================

    fn move_geometry(&mut self, session: &mut MoveResizeSession, pointer: Point) -> Rect {
        if self.is_tiled_or_maximized() {
            let threshold = self.env.config.move_resize.drag_threshold;
            if (pointer - session.start_pointer()).manhattan_length() <= threshold {
                return session.current_geometry;
            }

            // Dragged out of a tile or out of maximized: take back the saved
            // size, keeping the pointer at the same relative position along
            // the width.
            let restore = self.untile_for_drag();
            let size = restore.map_or(session.current_geometry.size(), |r| r.size());
            let width = i64::from(session.current_geometry.width.max(1));
            let offset_x = i64::from(session.offset.x) * i64::from(size.width) / width;
            session.offset = Point::new(
                i32::try_from(offset_x).unwrap_or(size.width / 2),
                session.offset.y.min(size.height - 1).max(0),
            );
            session.current_geometry = session.current_geometry.with_size(size);
        }

        let geometry = Rect::from_parts(pointer - session.offset, session.current_geometry.size());
        if session.unrestricted {
            return geometry;
        }
        self.clamp_move(geometry, pointer)
    }

    fn clamp_move(&self, geometry: Rect, pointer: Point) -> Rect {
        let config = &self.env.config.move_resize;
        let area = self.env.work_area.work_area_at(pointer, self.desktop);

        let (x, y) = match config.clamp {
            ClampPolicy::Partial => {
                let visible_x = config.min_visible.min(geometry.width);
                let visible_y = config.min_visible.min(geometry.height);
                (
                    geometry.x.max(area.x - geometry.width + visible_x).min(area.right() - visible_x),
                    geometry.y.max(area.y).min(area.bottom() - visible_y),
                )
            }
            ClampPolicy::Contain => (
                geometry.x.min(area.right() - geometry.width).max(area.x),
                geometry.y.min(area.bottom() - geometry.height).max(area.y),
            ),
        };

        geometry.with_origin(Point::new(x, y))
    }

    fn resize_geometry(&self, session: &MoveResizeSession, pointer: Point) -> Rect {
        let area = self.env.work_area.work_area_at(pointer, self.desktop);
        let initial = session.initial_geometry;
        let position = session.position;
        let restricted = !session.unrestricted;

        let mut left = initial.x;
        let mut top = initial.y;
        let mut right = initial.right();
        let mut bottom = initial.bottom();

        if position.moves_left_edge() {
            left = pointer.x - session.offset.x;
            if restricted {
                left = left.max(area.x);
            }
        }
        if position.moves_right_edge() {
            right = pointer.x + session.inverted_offset.x;
            if restricted {
                right = right.min(area.right());
            }
        }
        if position.moves_top_edge() {
            top = pointer.y - session.offset.y;
            if restricted {
                top = top.max(area.y);
            }
        }
        if position.moves_bottom_edge() {
            bottom = pointer.y + session.inverted_offset.y;
            if restricted {
                bottom = bottom.min(area.bottom());
            }
        }

        let requested = Size::new(right - left, bottom - top);
        let size = self.adjusted_frame_size(requested, position.size_mode());

        // Anchor the edge opposite to the one being dragged.
        let x = if position.moves_left_edge() { right - size.width } else { left };
        let y = if position.moves_top_edge() { bottom - size.height } else { top };
        Rect::new(x, y, size.width, size.height)
    }
}
