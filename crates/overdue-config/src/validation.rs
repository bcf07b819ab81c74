// SPDX-FileCopyrightText: 2026 Overdue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes.

use crate::diagnostic::ConfigError;
use crate::model::OverdueConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Upper bound for `todos.default_due_hours`: one hundred years.
pub const MAX_DEFAULT_DUE_HOURS: u32 = 24 * 365 * 100;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &OverdueConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.sweep.interval_secs == 0 {
        fail("sweep.interval_secs must be at least 1".to_string());
    }

    match config.todos.default_due_hours {
        0 => fail("todos.default_due_hours must be at least 1".to_string()),
        hours if hours > MAX_DEFAULT_DUE_HOURS => fail(format!(
            "todos.default_due_hours must be at most {MAX_DEFAULT_DUE_HOURS}, got {hours}"
        )),
        _ => {}
    }

    let level = config.service.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        fail(format!(
            "service.log_level `{}` must be one of {}",
            config.service.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &OverdueConfig) -> Vec<String> {
        match validate_config(config) {
            Ok(()) => Vec::new(),
            Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&OverdueConfig::default()).is_ok());
    }

    #[test]
    fn ipv6_host_is_valid() {
        let mut config = OverdueConfig::default();
        config.server.host = "::1".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_interval_rejected() {
        let mut config = OverdueConfig::default();
        config.sweep.interval_secs = 0;
        let msgs = messages(&config);
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].contains("sweep.interval_secs"));
    }

    #[test]
    fn default_due_hours_has_an_upper_bound() {
        let mut config = OverdueConfig::default();
        config.todos.default_due_hours = MAX_DEFAULT_DUE_HOURS;
        assert!(validate_config(&config).is_ok());

        config.todos.default_due_hours = u32::MAX;
        let msgs = messages(&config);
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].contains("todos.default_due_hours must be at most"));
    }

    #[test]
    fn collects_every_error() {
        let mut config = OverdueConfig::default();
        config.server.host = "bad host!".to_string();
        config.storage.database_path = "  ".to_string();
        config.todos.default_due_hours = 0;
        config.service.log_level = "loud".to_string();
        let msgs = messages(&config);
        assert_eq!(msgs.len(), 4, "got: {msgs:?}");
    }
}
