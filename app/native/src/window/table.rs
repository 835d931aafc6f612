//! Arena of managed windows and the transient graph between them.
//!
//! Windows refer to each other only by `WindowId`; every lookup is checked.
//! The storage tolerates malformed graphs (cycles, dangling ids) and every
//! traversal is bounded by a visited set.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use super::events::WindowEvent;
use super::state::{Layer, WindowId};
use super::{ClosedWindow, Window};

/// All managed windows, keyed by id.
#[derive(Debug, Default)]
pub struct WindowTable {
    windows: BTreeMap<WindowId, Window>,
}

impl WindowTable {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Add a window, returning any window previously stored under its id.
    pub fn insert(&mut self, window: Window) -> Option<Window> {
        self.windows.insert(window.id(), window)
    }

    #[must_use]
    pub fn get(&self, id: WindowId) -> Option<&Window> { self.windows.get(&id) }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> { self.windows.get_mut(&id) }

    #[must_use]
    pub fn contains(&self, id: WindowId) -> bool { self.windows.contains_key(&id) }

    #[must_use]
    pub fn len(&self) -> usize { self.windows.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.windows.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &Window> { self.windows.values() }

    pub fn ids(&self) -> impl Iterator<Item = WindowId> + '_ { self.windows.keys().copied() }

    /// Remove a window, unlinking it from the transient graph in both
    /// directions, and return its final snapshot.
    pub fn withdraw(&mut self, id: WindowId) -> Option<Arc<ClosedWindow>> {
        let window = self.windows.remove(&id)?;

        if let Some(parent) = window.transient_for()
            && let Some(parent) = self.windows.get_mut(&parent)
        {
            parent.transients.remove(id);
        }

        for child in window.transients.transients() {
            if let Some(child) = self.windows.get_mut(child)
                && child.transient_for() == Some(id)
            {
                child.transients.set_transient_for(None);
                child.emit(&WindowEvent::TransientChanged { transient_for: None });
            }
        }

        Some(Arc::new(window.close()))
    }

    // ========================================================================
    // Transient graph
    // ========================================================================

    /// Make `child` a transient of `parent`, or a main window with `None`.
    ///
    /// The child is moved from its old parent's list to the new one. Cycles
    /// are accepted; traversals handle them.
    pub fn set_transient_for(&mut self, child: WindowId, parent: Option<WindowId>) -> bool {
        if !self.contains(child) || parent.is_some_and(|p| !self.contains(p)) {
            tracing::warn!(%child, ?parent, "set_transient_for on unknown window");
            return false;
        }

        let old = self.windows.get(&child).and_then(Window::transient_for);
        if old == parent {
            return false;
        }

        if let Some(old) = old
            && let Some(old) = self.windows.get_mut(&old)
        {
            old.transients.remove(child);
        }
        if let Some(parent) = parent
            && let Some(parent) = self.windows.get_mut(&parent)
        {
            parent.transients.push(child);
        }
        if let Some(window) = self.windows.get_mut(&child) {
            window.transients.set_transient_for(parent);
            window.emit(&WindowEvent::TransientChanged { transient_for: parent });
        }

        tracing::debug!(%child, ?old, new = ?parent, "transient parent changed");
        self.update_layer(child);
        true
    }

    /// Add `child` to `parent`'s transient list without touching the child.
    pub fn add_transient(&mut self, parent: WindowId, child: WindowId) -> bool {
        if !self.contains(child) {
            return false;
        }
        self.windows.get_mut(&parent).is_some_and(|p| p.transients.push(child))
    }

    /// Remove `child` from `parent`'s transient list. The child's own link is
    /// left untouched.
    pub fn remove_transient(&mut self, parent: WindowId, child: WindowId) -> bool {
        self.windows.get_mut(&parent).is_some_and(|p| p.transients.remove(child))
    }

    /// Whether `candidate` is a transient of `parent`, directly or through a
    /// chain of transients when `indirect`.
    #[must_use]
    pub fn has_transient(&self, parent: WindowId, candidate: WindowId, indirect: bool) -> bool {
        let Some(window) = self.windows.get(&candidate) else {
            return false;
        };

        if !indirect {
            return window.transient_for() == Some(parent);
        }

        let mut visited = HashSet::from([candidate]);
        let mut current = window.transient_for();
        while let Some(id) = current {
            if id == parent {
                return true;
            }
            if !visited.insert(id) {
                tracing::warn!(%parent, %candidate, at = %id, "transient cycle detected");
                return false;
            }
            current = self.windows.get(&id).and_then(Window::transient_for);
        }
        false
    }

    /// The window `id` is directly transient for, if it is still managed.
    #[must_use]
    pub fn main_clients(&self, id: WindowId) -> Vec<WindowId> {
        self.windows
            .get(&id)
            .and_then(Window::transient_for)
            .filter(|parent| self.contains(*parent))
            .into_iter()
            .collect()
    }

    /// Every main window above `id`, nearest first.
    #[must_use]
    pub fn all_main_clients(&self, id: WindowId) -> Vec<WindowId> {
        let mut result = Vec::new();
        let mut visited = HashSet::from([id]);
        let mut queue = self.main_clients(id);

        while let Some(next) = queue.pop() {
            if !visited.insert(next) {
                tracing::warn!(window = %id, at = %next, "transient cycle detected");
                continue;
            }
            result.push(next);
            queue.extend(self.main_clients(next));
        }
        result
    }

    /// Every transient below `id`, breadth first.
    #[must_use]
    pub fn all_transients(&self, id: WindowId) -> Vec<WindowId> {
        let mut result = Vec::new();
        let mut visited = HashSet::from([id]);
        let mut queue = std::collections::VecDeque::from([id]);

        while let Some(next) = queue.pop_front() {
            let Some(window) = self.windows.get(&next) else {
                continue;
            };
            for child in window.transients.transients() {
                if visited.insert(*child) && self.contains(*child) {
                    result.push(*child);
                    queue.push_back(*child);
                }
            }
        }
        result
    }

    /// The first modal window among the transients of `id`.
    #[must_use]
    pub fn find_modal(&self, id: WindowId) -> Option<WindowId> {
        self.all_transients(id)
            .into_iter()
            .find(|t| self.windows.get(t).is_some_and(Window::is_modal))
    }

    // ========================================================================
    // Propagation
    // ========================================================================

    /// Move a window and all its transients to a desktop.
    pub fn set_desktop(&mut self, id: WindowId, desktop: i32) -> bool {
        let changed = self.windows.get_mut(&id).is_some_and(|w| w.set_desktop(desktop));
        if changed {
            for transient in self.all_transients(id) {
                if let Some(window) = self.windows.get_mut(&transient) {
                    window.set_desktop(desktop);
                }
            }
        }
        changed
    }

    pub fn set_keep_above(&mut self, id: WindowId, keep_above: bool) -> bool {
        let changed = self.windows.get_mut(&id).is_some_and(|w| w.set_keep_above(keep_above));
        if changed {
            self.update_layer(id);
        }
        changed
    }

    pub fn set_keep_below(&mut self, id: WindowId, keep_below: bool) -> bool {
        let changed = self.windows.get_mut(&id).is_some_and(|w| w.set_keep_below(keep_below));
        if changed {
            self.update_layer(id);
        }
        changed
    }

    /// Recompute the layer of `id` and its transients. Stackable transients
    /// are raised to their main window's layer when that is higher.
    pub fn update_layer(&mut self, id: WindowId) {
        let mut order = vec![id];
        order.extend(self.all_transients(id));

        for window_id in order {
            let inherited = self
                .all_main_clients(window_id)
                .into_iter()
                .filter_map(|main| self.windows.get(&main).map(Window::own_layer))
                .max()
                .unwrap_or(Layer::Unknown);

            if let Some(window) = self.windows.get_mut(&window_id) {
                let mut layer = window.own_layer();
                if window.kind().is_stackable() && inherited > layer {
                    layer = inherited;
                }
                window.set_layer(layer);
            }
        }
    }
}
