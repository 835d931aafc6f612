//! Screen layout and work areas.
//!
//! A work area is the part of a screen that windows may occupy: the screen
//! frame minus the struts reserved by panels and docks. Struts may apply to
//! every virtual desktop or only to one.

use std::sync::atomic::{AtomicI32, Ordering};

use parking_lot::RwLock;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::state::{DESKTOP_ALL, DESKTOP_UNASSIGNED, Margins, Point, Rect};

/// Screen and desktop queries used by geometry operations.
pub trait WorkArea: std::fmt::Debug + Send + Sync {
    fn screen_count(&self) -> usize;

    /// Index of the screen containing `point`, or the nearest one.
    fn screen_at(&self, point: Point) -> usize;

    /// Full frame of a screen.
    fn screen_geometry(&self, screen: usize) -> Rect;

    /// Usable area of a screen on a desktop.
    fn work_area(&self, screen: usize, desktop: i32) -> Rect;

    fn current_desktop(&self) -> i32;

    fn desktop_count(&self) -> i32;

    /// Work area of the screen under `point`.
    fn work_area_at(&self, point: Point, desktop: i32) -> Rect {
        self.work_area(self.screen_at(point), desktop)
    }
}

/// Space reserved along screen edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct Strut {
    /// Desktop the strut applies to, `None` for every desktop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desktop: Option<i32>,
    #[serde(flatten)]
    pub margins: Margins,
}

/// A connected display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct Screen {
    pub id: u32,
    pub name: String,
    /// Frame in global coordinates.
    pub frame: Rect,
    pub struts: Vec<Strut>,
}

impl Screen {
    #[must_use]
    pub const fn new(id: u32, name: String, frame: Rect) -> Self {
        Self { id, name, frame, struts: Vec::new() }
    }

    /// Add a reserved area.
    #[must_use]
    pub fn with_strut(mut self, desktop: Option<i32>, margins: Margins) -> Self {
        self.struts.push(Strut { desktop, margins });
        self
    }

    /// Frame minus the struts applying to `desktop`.
    #[must_use]
    pub fn work_area(&self, desktop: i32) -> Rect {
        let reserved = self
            .struts
            .iter()
            .filter(|strut| strut.desktop.is_none_or(|d| d == desktop))
            .fold(Margins::ZERO, |acc, strut| acc.max(strut.margins));

        let area = self.frame.shrunk_by(&reserved);
        if area.is_valid() { area } else { self.frame }
    }

    /// Distance from a point to this screen, zero when inside.
    fn distance_to(&self, point: Point) -> i64 {
        let dx = if point.x < self.frame.x {
            self.frame.x - point.x
        } else if point.x >= self.frame.right() {
            point.x - self.frame.right() + 1
        } else {
            0
        };
        let dy = if point.y < self.frame.y {
            self.frame.y - point.y
        } else if point.y >= self.frame.bottom() {
            point.y - self.frame.bottom() + 1
        } else {
            0
        };
        i64::from(dx) + i64::from(dy)
    }
}

/// The set of connected screens plus virtual desktop state.
///
/// Struts can change while windows are mapped; windows are told through
/// `Window::check_workspace_position`.
#[derive(Debug)]
pub struct Screens {
    screens: RwLock<Vec<Screen>>,
    desktop_count: i32,
    current_desktop: AtomicI32,
}

impl Screens {
    /// Create a layout. `desktop_count` is clamped to at least one.
    #[must_use]
    pub fn new(screens: Vec<Screen>, desktop_count: i32) -> Self {
        Self {
            screens: RwLock::new(screens),
            desktop_count: desktop_count.max(1),
            current_desktop: AtomicI32::new(1),
        }
    }

    /// Single screen without struts.
    #[must_use]
    pub fn single(frame: Rect) -> Self { Self::new(vec![Screen::new(0, "default".to_string(), frame)], 1) }

    #[must_use]
    pub fn screens(&self) -> Vec<Screen> { self.screens.read().clone() }

    /// Replace the reserved areas of a screen. Returns `false` for an
    /// unknown screen or when nothing changed.
    pub fn set_struts(&self, screen: usize, struts: Vec<Strut>) -> bool {
        let mut screens = self.screens.write();
        let Some(target) = screens.get_mut(screen) else {
            tracing::warn!(screen, "ignoring struts for unknown screen");
            return false;
        };
        if target.struts == struts {
            return false;
        }
        target.struts = struts;
        tracing::debug!(screen, name = %target.name, "struts changed");
        true
    }

    /// Switch the current desktop. Out-of-range values are ignored.
    pub fn set_current_desktop(&self, desktop: i32) -> bool {
        if !(1..=self.desktop_count).contains(&desktop) {
            tracing::warn!(desktop, count = self.desktop_count, "ignoring invalid desktop");
            return false;
        }
        self.current_desktop.store(desktop, Ordering::Relaxed);
        true
    }

    fn resolve_desktop(&self, desktop: i32) -> i32 {
        if desktop == DESKTOP_ALL || desktop == DESKTOP_UNASSIGNED {
            self.current_desktop()
        } else {
            desktop
        }
    }
}

impl WorkArea for Screens {
    fn screen_count(&self) -> usize { self.screens.read().len() }

    fn screen_at(&self, point: Point) -> usize {
        self.screens
            .read()
            .iter()
            .enumerate()
            .min_by_key(|(_, screen)| screen.distance_to(point))
            .map_or(0, |(index, _)| index)
    }

    fn screen_geometry(&self, screen: usize) -> Rect {
        self.screens.read().get(screen).map(|s| s.frame).unwrap_or_default()
    }

    fn work_area(&self, screen: usize, desktop: i32) -> Rect {
        let desktop = self.resolve_desktop(desktop);
        self.screens.read().get(screen).map(|s| s.work_area(desktop)).unwrap_or_default()
    }

    fn current_desktop(&self) -> i32 { self.current_desktop.load(Ordering::Relaxed) }

    fn desktop_count(&self) -> i32 { self.desktop_count }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dual() -> Screens {
        Screens::new(
            vec![
                Screen::new(1, "left".to_string(), Rect::new(0, 0, 1920, 1080))
                    .with_strut(None, Margins::new(0, 0, 30, 0))
                    .with_strut(Some(2), Margins::new(0, 0, 0, 60)),
                Screen::new(2, "right".to_string(), Rect::new(1920, 0, 1280, 1024)),
            ],
            2,
        )
    }

    #[test]
    fn test_screen_at_inside_and_nearest() {
        let screens = dual();
        assert_eq!(screens.screen_at(Point::new(100, 100)), 0);
        assert_eq!(screens.screen_at(Point::new(2000, 100)), 1);
        assert_eq!(screens.screen_at(Point::new(-50, 500)), 0);
        assert_eq!(screens.screen_at(Point::new(3500, 1050)), 1);
    }

    #[test]
    fn test_work_area_applies_struts_per_desktop() {
        let screens = dual();
        assert_eq!(screens.work_area(0, 1), Rect::new(0, 30, 1920, 1050));
        assert_eq!(screens.work_area(0, 2), Rect::new(0, 30, 1920, 990));
        assert_eq!(screens.work_area(1, 2), Rect::new(1920, 0, 1280, 1024));
    }

    #[test]
    fn test_all_desktops_uses_current() {
        let screens = dual();
        assert!(screens.set_current_desktop(2));
        assert_eq!(screens.work_area(0, DESKTOP_ALL), Rect::new(0, 30, 1920, 990));
        assert!(!screens.set_current_desktop(5));
        assert_eq!(screens.current_desktop(), 2);
    }

    #[test]
    fn test_set_struts_changes_work_area() {
        let screens = dual();
        let panel = Strut { desktop: None, margins: Margins::new(48, 0, 0, 0) };

        assert!(screens.set_struts(1, vec![panel]));
        assert_eq!(screens.work_area(1, 1), Rect::new(1968, 0, 1232, 1024));
        assert!(!screens.set_struts(1, vec![panel]), "unchanged");
        assert!(!screens.set_struts(7, Vec::new()));

        assert!(screens.set_struts(1, Vec::new()));
        assert_eq!(screens.work_area(1, 1), Rect::new(1920, 0, 1280, 1024));
    }

    #[test]
    fn test_strut_deserializes_flat() {
        let strut: Strut = serde_json::from_str(r#"{ "top": 28, "desktop": 1 }"#).unwrap();
        assert_eq!(strut.desktop, Some(1));
        assert_eq!(strut.margins, Margins::new(0, 0, 28, 0));
    }
}
