//! Replay CLI command.

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;

use crate::cli::output;
use crate::cli::scenario::{self, Replay};
use crate::config;
use crate::error::CasementError;

/// Load, replay and print a scenario.
///
/// # Errors
///
/// Returns an error if the scenario cannot be read or refers to unknown
/// windows.
pub fn execute(path: &Path, json: bool) -> Result<(), CasementError> {
    let scenario = scenario::load_scenario(path)?;
    let config = Arc::new(config::get_config().clone());

    tracing::debug!(
        path = %path.display(),
        windows = scenario.windows.len(),
        steps = scenario.steps.len(),
        "replaying scenario"
    );
    let replay = scenario::replay(&scenario, config)?;

    if json {
        print_json(&replay)
    } else {
        print_text(&replay, path);
        Ok(())
    }
}

fn print_json(replay: &Replay) -> Result<(), CasementError> {
    for record in &replay.records {
        println!("{}", serde_json::to_string(record)?);
    }
    println!("{}", serde_json::to_string(&serde_json::json!({ "windows": replay.windows }))?);
    Ok(())
}

fn print_text(replay: &Replay, path: &Path) {
    println!("{}", format!("Replaying {}", path.display()).bold());
    for record in &replay.records {
        println!("{}", output::format_record(record));
    }

    println!();
    println!("{}", format!("Windows ({})", replay.windows.len()).bold());
    println!("{}", output::windows_table(&replay.windows));
}
