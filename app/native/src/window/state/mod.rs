//! State module for the window core.
//!
//! This module contains the value types (`Rect`, `Point`, `Size`, `Margins`,
//! `Layer`, `WindowId`) shared by every component.

mod types;

pub use types::{
    DESKTOP_ALL, DESKTOP_UNASSIGNED, Layer, Margins, Point, Rect, Size, WindowId,
};
