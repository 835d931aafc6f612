//! Config CLI commands.
//!
//! Commands for managing the Casement configuration file.

use std::path::PathBuf;

use clap::Subcommand;
use colored::Colorize;

use crate::cli::output;
use crate::config::template::{create_config_file, generate_config_template};
use crate::config::{self, config_paths};
use crate::error::CasementError;

/// Config management commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum ConfigCommands {
    /// Initialize a new configuration file with all options documented.
    ///
    /// Creates a new configuration file at the default location with all
    /// available options commented out.
    #[command(
        name = "init",
        after_long_help = r#"Examples:
  casement config init              # Create config at default location
  casement config init --force      # Overwrite existing config
  casement config init --path ~/my-config.jsonc  # Create at custom path
  casement config init --stdout     # Print template to stdout"#
    )]
    Init {
        /// Overwrite existing configuration file if it exists.
        #[arg(long, short)]
        force: bool,

        /// Custom path for the configuration file.
        /// If not specified, uses the first search path.
        #[arg(long, short, value_name = "PATH")]
        path: Option<PathBuf>,

        /// Print the configuration template to stdout instead of writing to a file.
        #[arg(long)]
        stdout: bool,
    },

    /// Print the effective configuration.
    ///
    /// Shows the loaded configuration (defaults when no file exists) as JSON.
    Show,

    /// Show the path to the configuration file.
    ///
    /// Displays the paths where Casement looks for configuration files,
    /// and indicates which one is currently in use (if any).
    Path,
}

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cmd: &ConfigCommands) -> Result<(), CasementError> {
    match cmd {
        ConfigCommands::Init { force, path, stdout } => {
            if *stdout {
                println!("{}", generate_config_template());
                Ok(())
            } else {
                init_config(*force, path.clone())
            }
        }
        ConfigCommands::Show => show_config(),
        ConfigCommands::Path => {
            show_config_path();
            Ok(())
        }
    }
}

/// Initialize a new configuration file.
fn init_config(force: bool, custom_path: Option<PathBuf>) -> Result<(), CasementError> {
    let config_path = custom_path.unwrap_or_else(|| {
        config_paths().into_iter().next().unwrap_or_else(|| PathBuf::from("config.jsonc"))
    });

    if config_path.exists() && !force {
        return Err(CasementError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!(
                "configuration file already exists at {} (use --force to overwrite)",
                config_path.display()
            ),
        )));
    }

    create_config_file(&config_path)?;
    tracing::info!(path = %config_path.display(), "configuration template written");

    println!("Configuration file created at: {}", config_path.display());
    println!("\nAll options are commented out by default.");
    println!("Edit the file and uncomment the options you want to configure.");
    Ok(())
}

fn show_config() -> Result<(), CasementError> {
    let config = config::get_config();
    match config::get_config_path() {
        Some(path) => println!("{}", format!("# {}", path.display()).dimmed()),
        None => println!("{}", "# defaults (no configuration file)".dimmed()),
    }

    output::print_highlighted_json(&serde_json::to_value(config)?);
    Ok(())
}

/// Show the configuration file search paths.
fn show_config_path() {
    println!("Configuration file search paths (in priority order):\n");

    let mut found_config = false;
    for (i, path) in config_paths().iter().enumerate() {
        let exists = path.exists();
        let marker = if exists && !found_config {
            found_config = true;
            " (active)"
        } else if exists {
            " (exists)"
        } else {
            ""
        };

        println!("  {}. {}{}", i + 1, path.display(), marker);
    }

    if !found_config {
        println!("\nNo configuration file found.");
        println!("Run 'casement config init' to create one.");
    }
}
