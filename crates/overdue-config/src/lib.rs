// SPDX-FileCopyrightText: 2026 Overdue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Overdue todo service.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, environment variable overrides, and miette
//! diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use overdue_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("sweep every {}s", config.sweep.interval_secs);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError, ConfigSource};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::OverdueConfig;

/// Load configuration from the XDG hierarchy and validate it.
///
/// Returns either a valid `OverdueConfig` or every diagnostic collected.
pub fn load_and_validate() -> Result<OverdueConfig, Vec<ConfigError>> {
    finish(loader::load_config(), hierarchy_sources)
}

/// Load configuration from one explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<OverdueConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        read_source(&path.display().to_string()).into_iter().collect()
    })
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<OverdueConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![ConfigSource::new("<inline>", toml_content)]
    })
}

fn finish(
    loaded: Result<OverdueConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<ConfigSource>,
) -> Result<OverdueConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Read every TOML file of the hierarchy that exists, for span lookup.
fn hierarchy_sources() -> Vec<ConfigSource> {
    let local = std::env::current_dir()
        .map(|d| d.join(loader::LOCAL_CONFIG_PATH).display().to_string())
        .unwrap_or_else(|_| loader::LOCAL_CONFIG_PATH.to_string());
    let user = loader::user_config_path().map(|p| p.display().to_string());

    [Some(local), user, Some(loader::SYSTEM_CONFIG_PATH.to_string())]
        .into_iter()
        .flatten()
        .filter_map(|path| read_source(&path))
        .collect()
}

fn read_source(path: &str) -> Option<ConfigSource> {
    std::fs::read_to_string(path)
        .ok()
        .map(|content| ConfigSource::new(path, content))
}
