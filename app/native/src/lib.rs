//! Casement - window geometry and interactive move/resize core.
//!
//! This library holds the per-window geometry state machine of a window
//! manager: size hint enforcement, batched geometry commits, quick tiling
//! with electric borders, interactive move/resize sessions and the transient
//! relation between windows. It has no platform backend; screens, windows
//! and time are supplied through traits.
//!
//! The `casement` binary replays scenario files against this core.

pub mod cli;
pub mod config;
pub mod error;
pub mod schema;
pub mod window;

pub use error::CasementError;
pub use window::{Window, WindowEvent, WindowTable};
