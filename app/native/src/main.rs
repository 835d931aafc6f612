#![allow(clippy::multiple_crate_versions)]

//! Casement - command-line front end of the window geometry core.
//!
//! Replays scenario files and manages the configuration file. See
//! `casement --help`.

fn main() {
    if let Err(err) = casement_lib::cli::run() {
        eprintln!("casement: {err}");
        std::process::exit(1);
    }
}
