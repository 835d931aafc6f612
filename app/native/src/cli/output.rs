//! CLI output formatting utilities.
//!
//! This module provides utilities for formatting CLI output including:
//! - Colored one-line renderings of replay records
//! - Tables for the final window state
//! - JSON syntax highlighting

use colored::Colorize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::scenario::{ReplayRecord, WindowSummary};
use crate::window::WindowEvent;

/// Prints JSON with syntax highlighting.
///
/// Colors:
/// - Keys: Cyan
/// - Strings: Green
/// - Numbers: Yellow
/// - Booleans/Null: Magenta
/// - Brackets/Braces: White (default)
pub fn print_highlighted_json(value: &serde_json::Value) {
    let json_str = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    println!("{}", highlight_json(&json_str));
}

/// Returns a JSON string with ANSI highlighting applied.
#[must_use]
pub fn highlight_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len() * 2);
    let mut in_string = false;
    let mut is_key = false;
    let mut escape_next = false;
    let mut current_token = String::new();
    let mut after_colon = false;

    for ch in json.chars() {
        if escape_next {
            current_token.push(ch);
            escape_next = false;
            continue;
        }

        if ch == '\\' && in_string {
            current_token.push(ch);
            escape_next = true;
            continue;
        }

        match ch {
            '"' => {
                if in_string {
                    current_token.push(ch);
                    let colored = if is_key { current_token.cyan() } else { current_token.green() };
                    out.push_str(&colored.to_string());
                    current_token.clear();
                    in_string = false;
                    is_key = false;
                } else {
                    flush_token(&mut out, &mut current_token, after_colon);
                    current_token.push(ch);
                    in_string = true;
                    // It's a key if we're not after a colon
                    is_key = !after_colon;
                    after_colon = false;
                }
            }
            ':' if !in_string => {
                flush_token(&mut out, &mut current_token, false);
                out.push_str(&":".white().to_string());
                after_colon = true;
            }
            ',' if !in_string => {
                flush_token(&mut out, &mut current_token, after_colon);
                out.push_str(&",".white().to_string());
                after_colon = false;
            }
            '{' | '}' | '[' | ']' if !in_string => {
                flush_token(&mut out, &mut current_token, after_colon);
                out.push_str(&ch.to_string().white().bold().to_string());
                after_colon = false;
            }
            _ => current_token.push(ch),
        }
    }

    flush_token(&mut out, &mut current_token, after_colon);
    out
}

/// Flushes the current token with appropriate coloring.
fn flush_token(out: &mut String, token: &mut String, is_value: bool) {
    if token.is_empty() {
        return;
    }

    if is_value && !token.trim().is_empty() {
        let start = token.find(|c: char| !c.is_whitespace()).unwrap_or(0);
        let end = token.rfind(|c: char| !c.is_whitespace()).map_or(token.len(), |i| i + 1);
        let (prefix, value, suffix) = (&token[..start], &token[start..end], &token[end..]);

        if value == "true" || value == "false" || value == "null" {
            out.push_str(&format!("{prefix}{}{suffix}", value.magenta()));
        } else if value.parse::<f64>().is_ok() {
            out.push_str(&format!("{prefix}{}{suffix}", value.yellow()));
        } else {
            out.push_str(token);
        }
    } else {
        out.push_str(token);
    }

    token.clear();
}

/// Formats a boolean as a colored string.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

/// Short human description of an event's payload.
#[must_use]
pub fn describe_event(event: &WindowEvent) -> String {
    match event {
        WindowEvent::GeometryChanged { old, new } => format!("{old} → {new}"),
        WindowEvent::QuickTileModeChanged { old, new } => format!("{} → {}", old.label(), new.label()),
        WindowEvent::MaximizeModeChanged { old, new } => format!("{} → {}", old.label(), new.label()),
        WindowEvent::MoveResizeStarted { position, geometry } => format!("{position:?} at {geometry}"),
        WindowEvent::MoveResizeStepped { geometry } => geometry.to_string(),
        WindowEvent::MoveResizeFinished { cancelled, geometry } => {
            let how = if *cancelled { "cancelled" } else { "committed" };
            format!("{how} at {geometry}")
        }
        WindowEvent::CursorChanged { cursor } => format!("{cursor:?}"),
        WindowEvent::ElectricBorderPreview { mode } => mode.label().to_string(),
        WindowEvent::DesktopChanged { old, new } => format!("{old} → {new}"),
        WindowEvent::LayerChanged { old, new } => format!("{} → {}", old.as_str(), new.as_str()),
        WindowEvent::TransientChanged { transient_for } => {
            transient_for.map_or_else(|| "main window".to_string(), |parent| format!("for {parent}"))
        }
        WindowEvent::Closed => String::new(),
    }
}

/// One colored line per replay record.
#[must_use]
pub fn format_record(record: &ReplayRecord) -> String {
    match record {
        ReplayRecord::Step { at_ms, window, action, accepted } => format!(
            "{} {} {} {}",
            format!("[{at_ms:>6} ms]").dimmed(),
            format!("#{window}").bold(),
            action.blue(),
            format_bool(*accepted)
        ),
        ReplayRecord::Event { at_ms, window, event } => format!(
            "{} {}   {} {}",
            format!("[{at_ms:>6} ms]").dimmed(),
            format!("#{window}").bold(),
            event.name().yellow(),
            describe_event(event)
        ),
    }
}

#[derive(Tabled)]
struct WindowRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "App")]
    app_id: String,
    #[tabled(rename = "Frame")]
    frame: String,
    #[tabled(rename = "Client")]
    client: String,
    #[tabled(rename = "Desktop")]
    desktop: String,
    #[tabled(rename = "Layer")]
    layer: String,
    #[tabled(rename = "Tile")]
    quick_tile: String,
    #[tabled(rename = "Maximized")]
    maximize: String,
    #[tabled(rename = "Transient")]
    transient: String,
}

impl From<&WindowSummary> for WindowRow {
    fn from(summary: &WindowSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            app_id: summary.app_id.clone(),
            frame: summary.frame.to_string(),
            client: summary.client.to_string(),
            desktop: if summary.desktop < 0 { "all".to_string() } else { summary.desktop.to_string() },
            layer: summary.layer.as_str().to_string(),
            quick_tile: summary.quick_tile.to_string(),
            maximize: summary.maximize.to_string(),
            transient: summary.transient_for.map_or_else(|| format_bool(false), |p| p.to_string()),
        }
    }
}

/// Table of the final window state.
#[must_use]
pub fn windows_table(windows: &[WindowSummary]) -> String {
    let rows: Vec<WindowRow> = windows.iter().map(WindowRow::from).collect();
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::right()))
        .with(Modify::new(Columns::new(4..5)).with(Alignment::right()))
        .with(Modify::new(Columns::new(8..9)).with(Alignment::center()))
        .to_string()
}
