// SPDX-FileCopyrightText: 2026 Overdue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `overdue check` command implementation.

use overdue_config::OverdueConfig;
use overdue_core::OverdueError;

/// Render the effective configuration as TOML.
pub fn render_config(config: &OverdueConfig) -> Result<String, OverdueError> {
    toml::to_string_pretty(config)
        .map_err(|e| OverdueError::Config(format!("failed to render configuration: {e}")))
}

/// Print the validated configuration. Loading already rejected invalid files.
pub fn run_check(config: &OverdueConfig) -> Result<(), OverdueError> {
    println!("configuration is valid\n");
    print!("{}", render_config(config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_config_lists_every_section() {
        let rendered = render_config(&OverdueConfig::default()).unwrap();
        for section in ["[service]", "[server]", "[storage]", "[sweep]", "[todos]"] {
            assert!(rendered.contains(section), "missing {section} in:\n{rendered}");
        }
    }

    #[test]
    fn rendered_config_parses_back() {
        let rendered = render_config(&OverdueConfig::default()).unwrap();
        let parsed = overdue_config::load_config_from_str(&rendered).unwrap();
        assert_eq!(parsed.sweep.interval_secs, 60);
    }
}
