//! Per-variant window capabilities.
//!
//! Different kinds of windows (decorated clients, compositor-internal
//! surfaces) answer sizing and permission questions differently. The core
//! only talks to them through `WindowCapabilities`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::constraints::SizeHints;
use super::state::{Layer, Margins};

/// Functional classification of a window.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum WindowKind {
    #[default]
    Normal,
    Dialog,
    Utility,
    Dock,
    Desktop,
    Notification,
    /// Surface owned by the compositor itself (e.g. an on-screen display).
    Internal,
}

impl WindowKind {
    /// Layer a window of this kind lives in, before keep-above/below.
    #[must_use]
    pub const fn base_layer(self) -> Layer {
        match self {
            Self::Normal | Self::Dialog | Self::Utility => Layer::Normal,
            Self::Dock => Layer::Dock,
            Self::Desktop => Layer::Desktop,
            Self::Notification | Self::Internal => Layer::Notification,
        }
    }

    /// Whether keep-above/keep-below affect this kind.
    #[must_use]
    pub const fn is_stackable(self) -> bool {
        matches!(self, Self::Normal | Self::Dialog | Self::Utility)
    }
}

/// Questions the core asks a concrete window variant.
pub trait WindowCapabilities: std::fmt::Debug + Send {
    /// Client size constraints.
    fn size_hints(&self) -> SizeHints;

    /// Decoration extents around the client area.
    fn borders(&self) -> Margins { Margins::ZERO }

    fn is_movable(&self) -> bool { true }

    fn is_resizable(&self) -> bool { true }

    /// Last chance for the variant to refuse an interactive session.
    fn can_start_move_resize(&self) -> bool { true }

    fn kind(&self) -> WindowKind { WindowKind::Normal }
}

/// Capabilities of a regular, decorated client window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientCapabilities {
    pub hints: SizeHints,
    pub borders: Margins,
    pub movable: bool,
    pub resizable: bool,
    pub kind: WindowKind,
    /// Set while the client has an unanswered ping; interactive sessions are
    /// refused until it responds.
    #[serde(skip)]
    #[schemars(skip)]
    pub unresponsive: bool,
}

impl Default for ClientCapabilities {
    fn default() -> Self {
        Self {
            hints: SizeHints::default(),
            borders: Margins::ZERO,
            movable: true,
            resizable: true,
            kind: WindowKind::Normal,
            unresponsive: false,
        }
    }
}

impl WindowCapabilities for ClientCapabilities {
    fn size_hints(&self) -> SizeHints { self.hints }

    fn borders(&self) -> Margins { self.borders }

    fn is_movable(&self) -> bool {
        self.movable && !matches!(self.kind, WindowKind::Desktop | WindowKind::Dock)
    }

    fn is_resizable(&self) -> bool {
        self.resizable && !matches!(self.kind, WindowKind::Desktop | WindowKind::Dock)
    }

    fn can_start_move_resize(&self) -> bool { !self.unresponsive }

    fn kind(&self) -> WindowKind { self.kind }
}

/// Capabilities of an undecorated compositor-internal window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InternalCapabilities {
    pub hints: SizeHints,
    pub interactive: bool,
}

impl WindowCapabilities for InternalCapabilities {
    fn size_hints(&self) -> SizeHints { self.hints }

    fn is_movable(&self) -> bool { self.interactive }

    fn is_resizable(&self) -> bool { self.interactive }

    fn kind(&self) -> WindowKind { WindowKind::Internal }
}
