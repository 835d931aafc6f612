//! CLI module for Casement.
//!
//! The command-line tool drives the window core offline: it replays
//! scenario files and manages the configuration file.

mod commands;
pub mod output;
pub mod scenario;

use clap::Parser;
pub use commands::Cli;
use tracing_subscriber::EnvFilter;

use crate::error::CasementError;

/// Install the tracing subscriber. `RUST_LOG` wins over `verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "casement_lib=debug,casement=debug" } else { "casement_lib=info,casement=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), CasementError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    cli.execute()
}
