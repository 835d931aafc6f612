//! Error types for Casement.
//!
//! The window core never fails with an error: rejected operations return
//! `false`. Errors only come from the edges (configuration, scenario files,
//! the CLI) and are collected here.

use thiserror::Error;

use crate::config::ConfigError;
use crate::window::WindowId;

/// Errors that can occur while running the command-line tool.
#[derive(Debug, Error)]
pub enum CasementError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Scenario file is invalid.
    #[error("Scenario error: {0}")]
    Scenario(String),
    /// A scenario step refers to a window that does not exist.
    #[error("Unknown window: {0}")]
    UnknownWindow(WindowId),
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<String> for CasementError {
    fn from(msg: String) -> Self { Self::Scenario(msg) }
}

impl From<&str> for CasementError {
    fn from(msg: &str) -> Self { Self::Scenario(msg.to_string()) }
}
