// SPDX-FileCopyrightText: 2026 Overdue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Overdue - a to-do service that flags overdue items.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod check;
mod serve;
mod sweep;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use overdue_config::{ConfigError, OverdueConfig};

/// Overdue - a to-do service that flags overdue items.
#[derive(Parser, Debug)]
#[command(name = "overdue", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Start the HTTP server and the past-due sweep (default).
    Serve,
    /// Run a single past-due sweep and exit.
    Sweep,
    /// Validate the configuration and print the effective settings.
    Check,
}

fn load_config(path: Option<&std::path::Path>) -> Result<OverdueConfig, Vec<ConfigError>> {
    match path {
        Some(path) => overdue_config::load_and_validate_path(path),
        None => overdue_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            overdue_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let command = cli.command.unwrap_or(Commands::Serve);
    if command != Commands::Check {
        serve::init_tracing(&config.service.log_level);
    }

    let result = match command {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Sweep => sweep::run_sweep(config).await,
        Commands::Check => check::run_check(&config),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serial_test::serial;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the stats epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["overdue"]).unwrap();
        assert_eq!(cli.command, None);
        assert!(cli.config.is_none());
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["overdue", "sweep", "--config", "/tmp/o.toml"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Sweep));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/o.toml")));
    }

    #[test]
    #[serial]
    fn explicit_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overdue.toml");
        std::fs::write(&path, "[server]\nport = 9123\n").unwrap();

        let config = load_config(Some(&path)).expect("file config should be valid");
        assert_eq!(config.server.port, 9123);
    }

    #[test]
    #[serial]
    fn invalid_config_file_yields_diagnostics() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overdue.toml");
        std::fs::write(&path, "[sweep]\ninterval_secs = 0\n").unwrap();

        let errors = load_config(Some(&path)).unwrap_err();
        assert!(!errors.is_empty());
    }
}
