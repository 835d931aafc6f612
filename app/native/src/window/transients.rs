//! Per-window transient state.
//!
//! A transient (a dialog, a toolbox) belongs to a main window. Each window
//! records the window it is transient for and the ordered list of its own
//! transients. Both are plain ids; graph operations that need to look at
//! other windows live on `WindowTable`.

use smallvec::SmallVec;

use super::state::WindowId;

/// Transient links of one window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransientGroup {
    transient_for: Option<WindowId>,
    transients: SmallVec<[WindowId; 4]>,
    modal: bool,
}

impl TransientGroup {
    #[must_use]
    pub const fn transient_for(&self) -> Option<WindowId> { self.transient_for }

    #[must_use]
    pub const fn is_transient(&self) -> bool { self.transient_for.is_some() }

    /// Direct transients, in the order they were added.
    #[must_use]
    pub fn transients(&self) -> &[WindowId] { &self.transients }

    #[must_use]
    pub fn contains(&self, id: WindowId) -> bool { self.transients.contains(&id) }

    #[must_use]
    pub const fn is_modal(&self) -> bool { self.modal }

    pub const fn set_modal(&mut self, modal: bool) { self.modal = modal; }

    pub(crate) const fn set_transient_for(&mut self, parent: Option<WindowId>) {
        self.transient_for = parent;
    }

    /// Append a transient. Returns `false` if it was already listed.
    pub(crate) fn push(&mut self, id: WindowId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.transients.push(id);
        true
    }

    /// Remove a transient. Returns `false` if it was not listed.
    pub(crate) fn remove(&mut self, id: WindowId) -> bool {
        let before = self.transients.len();
        self.transients.retain(|t| *t != id);
        self.transients.len() != before
    }
}
