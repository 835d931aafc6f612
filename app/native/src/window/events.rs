//! Change notifications emitted by a window.
//!
//! Notifications fire after the state change they describe has been applied.
//! Observers can attach in two ways:
//! - callbacks via `subscribe`, invoked synchronously with `&WindowEvent`
//! - an unbounded `tokio` channel via `channel`, for async consumers
//!
//! Callbacks only receive a shared reference to the event, so they cannot
//! re-enter the window while a commit is in progress.

use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::maximize::MaximizeMode;
use super::move_resize::{CursorShape, Position};
use super::quick_tile::QuickTileMode;
use super::state::{Layer, Rect, WindowId};

/// A state change of a single window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum WindowEvent {
    /// The frame geometry was committed. `old` is the geometry at the time
    /// updates were first blocked, so it covers every intermediate change.
    GeometryChanged { old: Rect, new: Rect },
    QuickTileModeChanged { old: QuickTileMode, new: QuickTileMode },
    MaximizeModeChanged { old: MaximizeMode, new: MaximizeMode },
    MoveResizeStarted { position: Position, geometry: Rect },
    MoveResizeStepped { geometry: Rect },
    MoveResizeFinished { cancelled: bool, geometry: Rect },
    CursorChanged { cursor: CursorShape },
    /// The electric border delay elapsed; `mode` will be applied when the
    /// move finishes. `NONE` means the preview was withdrawn.
    ElectricBorderPreview { mode: QuickTileMode },
    DesktopChanged { old: i32, new: i32 },
    LayerChanged { old: Layer, new: Layer },
    TransientChanged { transient_for: Option<WindowId> },
    Closed,
}

impl WindowEvent {
    /// Short kebab-case name of the event kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::GeometryChanged { .. } => "geometry-changed",
            Self::QuickTileModeChanged { .. } => "quick-tile-mode-changed",
            Self::MaximizeModeChanged { .. } => "maximize-mode-changed",
            Self::MoveResizeStarted { .. } => "move-resize-started",
            Self::MoveResizeStepped { .. } => "move-resize-stepped",
            Self::MoveResizeFinished { .. } => "move-resize-finished",
            Self::CursorChanged { .. } => "cursor-changed",
            Self::ElectricBorderPreview { .. } => "electric-border-preview",
            Self::DesktopChanged { .. } => "desktop-changed",
            Self::LayerChanged { .. } => "layer-changed",
            Self::TransientChanged { .. } => "transient-changed",
            Self::Closed => "closed",
        }
    }
}

/// Handle returned by `subscribe`, used to detach a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type Listener = Box<dyn FnMut(&WindowEvent) + Send>;

/// Fan-out of window events to callbacks and channels.
#[derive(Default)]
pub struct EventDispatcher {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
    senders: Vec<UnboundedSender<WindowEvent>>,
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listeners.len())
            .field("channels", &self.senders.len())
            .finish()
    }
}

impl EventDispatcher {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Register a callback invoked for every event.
    pub fn subscribe(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Open a channel receiving every subsequent event.
    pub fn channel(&mut self) -> UnboundedReceiver<WindowEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.push(tx);
        rx
    }

    /// Deliver an event to all observers. Closed channels are dropped.
    pub fn emit(&mut self, event: &WindowEvent) {
        tracing::trace!(event = event.name(), "emitting window event");

        for (_, listener) in &mut self.listeners {
            listener(event);
        }

        self.senders.retain(|tx| tx.send(event.clone()).is_ok());
    }

    #[must_use]
    pub fn listener_count(&self) -> usize { self.listeners.len() + self.senders.len() }
}
