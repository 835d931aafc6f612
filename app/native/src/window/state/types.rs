//! Core value types for window geometry.
//!
//! All geometry is expressed in integer device pixels in the global
//! (multi-screen) coordinate space:
//! - `Point` is a position or a delta
//! - `Size` is a width/height pair
//! - `Rect` is an origin plus a size, with exclusive right/bottom edges
//! - `Margins` describes per-side extents (decoration borders, struts)

use std::fmt;
use std::ops::{Add, Sub};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Identity
// ============================================================================

/// Stable identifier of a managed window.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct WindowId(pub u32);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Desktop value for windows shown on every virtual desktop.
pub const DESKTOP_ALL: i32 = -1;

/// Desktop value for windows not yet assigned to any desktop.
pub const DESKTOP_UNASSIGNED: i32 = 0;

// ============================================================================
// Point
// ============================================================================

/// A position (or a delta) in global coordinates.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self { Self { x, y } }

    /// Sum of the absolute coordinates, used as a cheap drag distance.
    #[must_use]
    pub const fn manhattan_length(self) -> i32 { self.x.abs() + self.y.abs() }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self { Self::new(self.x + rhs.x, self.y + rhs.y) }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self { Self::new(self.x - rhs.x, self.y - rhs.y) }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{},{}", self.x, self.y) }
}

// ============================================================================
// Size
// ============================================================================

/// A width/height pair.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// Create a new size.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self { Self { width, height } }

    /// Check if both dimensions are positive.
    #[must_use]
    pub const fn is_valid(&self) -> bool { self.width > 0 && self.height > 0 }

    /// Component-wise maximum.
    #[must_use]
    pub fn expanded_to(self, other: Self) -> Self {
        Self::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Component-wise minimum.
    #[must_use]
    pub fn bounded_to(self, other: Self) -> Self {
        Self::new(self.width.min(other.width), self.height.min(other.height))
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// ============================================================================
// Margins
// ============================================================================

/// Per-side extents, used for decoration borders and reserved strut areas.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(default)]
pub struct Margins {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Margins {
    /// No extents on any side.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Create new margins.
    #[must_use]
    pub const fn new(left: i32, right: i32, top: i32, bottom: i32) -> Self {
        Self { left, right, top, bottom }
    }

    /// Combined left and right extents.
    #[must_use]
    pub const fn horizontal(&self) -> i32 { self.left + self.right }

    /// Combined top and bottom extents.
    #[must_use]
    pub const fn vertical(&self) -> i32 { self.top + self.bottom }

    /// Per-side maximum of two margins.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(
            self.left.max(other.left),
            self.right.max(other.right),
            self.top.max(other.top),
            self.bottom.max(other.bottom),
        )
    }
}

// ============================================================================
// Rect
// ============================================================================

/// A rectangle with position and size. `right()` and `bottom()` are exclusive.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Create a rectangle from an origin and a size.
    #[must_use]
    pub const fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Create a rectangle from its edges (right/bottom exclusive).
    #[must_use]
    pub const fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// Check if this rectangle has positive dimensions.
    #[must_use]
    pub const fn is_valid(&self) -> bool { self.width > 0 && self.height > 0 }

    #[must_use]
    pub const fn origin(&self) -> Point { Point::new(self.x, self.y) }

    #[must_use]
    pub const fn size(&self) -> Size { Size::new(self.width, self.height) }

    #[must_use]
    pub const fn right(&self) -> i32 { self.x + self.width }

    #[must_use]
    pub const fn bottom(&self) -> i32 { self.y + self.height }

    /// Bottom-right corner (exclusive).
    #[must_use]
    pub const fn bottom_right(&self) -> Point { Point::new(self.right(), self.bottom()) }

    /// Get the center point of this rectangle.
    #[must_use]
    pub const fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Check if this rectangle contains a point.
    #[must_use]
    pub const fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Check if this rectangle fully contains another.
    #[must_use]
    pub const fn contains_rect(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Check if this rectangle intersects with another.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Intersection of two rectangles; zero-sized when they don't overlap.
    #[must_use]
    pub fn intersected(&self, other: &Self) -> Self {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return Self::default();
        }
        Self::from_edges(left, top, right, bottom)
    }

    /// Smallest rectangle containing both.
    #[must_use]
    pub fn united(&self, other: &Self) -> Self {
        Self::from_edges(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// The same size at a new origin.
    #[must_use]
    pub const fn with_origin(&self, origin: Point) -> Self {
        Self::from_parts(origin, self.size())
    }

    /// The same origin with a new size.
    #[must_use]
    pub const fn with_size(&self, size: Size) -> Self { Self::from_parts(self.origin(), size) }

    /// Offset by a delta.
    #[must_use]
    pub const fn translated(&self, delta: Point) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// Shrink by per-side margins.
    #[must_use]
    pub const fn shrunk_by(&self, margins: &Margins) -> Self {
        Self::new(
            self.x + margins.left,
            self.y + margins.top,
            self.width - margins.horizontal(),
            self.height - margins.vertical(),
        )
    }

    /// Grow by per-side margins.
    #[must_use]
    pub const fn grown_by(&self, margins: &Margins) -> Self {
        Self::new(
            self.x - margins.left,
            self.y - margins.top,
            self.width + margins.horizontal(),
            self.height + margins.vertical(),
        )
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{} {}x{})", self.x, self.y, self.width, self.height)
    }
}

// ============================================================================
// Layer
// ============================================================================

/// Stacking classification, lowest first.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Layer {
    /// Not computed yet.
    #[default]
    Unknown,
    Desktop,
    Below,
    Normal,
    Dock,
    Above,
    Notification,
}

impl Layer {
    /// Returns the layer name as a static kebab-case string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Desktop => "desktop",
            Self::Below => "below",
            Self::Normal => "normal",
            Self::Dock => "dock",
            Self::Above => "above",
            Self::Notification => "notification",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
