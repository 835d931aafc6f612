//! Window rule matching and geometry policy.
//!
//! Rules from the configuration are matched against a window's identity to
//! build a `RulePolicy`: the effective overrides for that window. The policy
//! both adjusts size hints and vetoes geometry commits that break a forced
//! position or size range.
//!
//! # Rule Matching
//!
//! Rules use AND logic - all specified properties must match for a rule to match.
//! At least one property must be specified for a rule to be valid.
//!
//! ```text
//! // Rule: appId = "org.example.Editor"
//! // Matches: any window of that application
//!
//! // Rule: appId = "org.example.Editor", title = "Preferences"
//! // Matches: the editor's windows with "Preferences" in the title
//! ```

use serde::{Deserialize, Serialize};

use super::constraints::SizeHints;
use super::state::{Margins, Point, Rect, Size};
use crate::config::WindowRule;

/// The properties rules are matched against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WindowIdentity {
    pub app_id: String,
    pub title: String,
}

impl WindowIdentity {
    #[must_use]
    pub fn new(app_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self { app_id: app_id.into(), title: title.into() }
    }
}

/// Checks if a window matches a rule.
///
/// - `app_id`: exact match, ignoring ASCII case
/// - `title`: case-insensitive substring match
///
/// Returns `false` if the rule has no matching criteria.
#[must_use]
pub fn matches_window(rule: &WindowRule, window: &WindowIdentity) -> bool {
    if !rule.is_valid() {
        return false;
    }

    if let Some(app_id) = &rule.app_id
        && !window.app_id.eq_ignore_ascii_case(app_id)
    {
        return false;
    }

    if let Some(title) = &rule.title
        && !window.title.to_lowercase().contains(&title.to_lowercase())
    {
        return false;
    }

    true
}

/// Effective rule overrides for one window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RulePolicy {
    pub movable: Option<bool>,
    pub resizable: Option<bool>,
    pub position: Option<Point>,
    pub min_size: Option<Size>,
    pub max_size: Option<Size>,
}

impl RulePolicy {
    /// Whether the window may move, given its own answer. A forced position
    /// pins the window in place.
    #[must_use]
    pub fn is_movable(&self, capability: bool) -> bool {
        self.position.is_none() && self.movable.unwrap_or(capability)
    }

    #[must_use]
    pub fn is_resizable(&self, capability: bool) -> bool { self.resizable.unwrap_or(capability) }

    /// Merge rule sizes into the window's own hints. Rule minimums only raise
    /// and rule maximums only lower the window's values.
    #[must_use]
    pub fn apply_to_hints(&self, mut hints: SizeHints) -> SizeHints {
        if let Some(min) = self.min_size {
            hints.min = hints.min.expanded_to(min);
        }
        if let Some(max) = self.max_size {
            hints.max = Some(hints.max.map_or(max, |own| own.bounded_to(max)));
        }
        hints
    }

    /// Check a frame geometry against the forced position and size range.
    #[must_use]
    pub fn allows_geometry(&self, frame: Rect, borders: &Margins) -> bool {
        if let Some(position) = self.position
            && frame.origin() != position
        {
            return false;
        }

        let client = frame.shrunk_by(borders).size();
        if let Some(min) = self.min_size
            && (client.width < min.width || client.height < min.height)
        {
            return false;
        }
        if let Some(max) = self.max_size
            && (client.width > max.width || client.height > max.height)
        {
            return false;
        }

        true
    }
}

/// The configured rules, in priority order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<WindowRule>,
}

impl RuleSet {
    /// Build a rule set, dropping rules without match criteria.
    #[must_use]
    pub fn new(rules: &[WindowRule]) -> Self {
        let rules = rules
            .iter()
            .filter(|rule| {
                if !rule.is_valid() {
                    tracing::warn!(?rule, "ignoring window rule without appId or title");
                }
                rule.is_valid()
            })
            .cloned()
            .collect();
        Self { rules }
    }

    #[must_use]
    pub fn len(&self) -> usize { self.rules.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.rules.is_empty() }

    /// Collect overrides for a window. The first matching rule that sets a
    /// property decides it.
    #[must_use]
    pub fn policy_for(&self, window: &WindowIdentity) -> RulePolicy {
        let mut policy = RulePolicy::default();
        for rule in self.rules.iter().filter(|rule| matches_window(rule, window)) {
            policy.movable = policy.movable.or(rule.movable);
            policy.resizable = policy.resizable.or(rule.resizable);
            policy.position = policy.position.or(rule.position);
            policy.min_size = policy.min_size.or(rule.min_size);
            policy.max_size = policy.max_size.or(rule.max_size);
        }
        policy
    }
}
