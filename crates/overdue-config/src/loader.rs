// SPDX-FileCopyrightText: 2026 Overdue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./overdue.toml` > `~/.config/overdue/overdue.toml` > `/etc/overdue/overdue.toml`
//! with environment variable overrides via `OVERDUE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::OverdueConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/overdue/overdue.toml";

/// Configuration file in the working directory.
pub const LOCAL_CONFIG_PATH: &str = "overdue.toml";

/// Location of the per-user configuration file, if a config dir is known.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("overdue/overdue.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/overdue/overdue.toml` (system-wide)
/// 3. `~/.config/overdue/overdue.toml` (user XDG config)
/// 4. `./overdue.toml` (local directory)
/// 5. `OVERDUE_*` environment variables
pub fn load_config() -> Result<OverdueConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<OverdueConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OverdueConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<OverdueConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OverdueConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(OverdueConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `OVERDUE_SWEEP_INTERVAL_SECS` must map to `sweep.interval_secs`,
/// not `sweep.interval.secs`.
fn env_provider() -> Env {
    Env::prefixed("OVERDUE_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        let mapped = key
            .as_str()
            .replacen("service_", "service.", 1)
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("sweep_", "sweep.", 1)
            .replacen("todos_", "todos.", 1);
        mapped.into()
    })
}
