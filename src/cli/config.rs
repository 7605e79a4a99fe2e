//! Config check command handler.

use std::path::Path;

use anyhow::{Context, Result};

use pagefetch::config::validate::{validate_config, DiagnosticLevel};
use pagefetch::config::Config;

use super::ConfigAction;

/// Validate configuration file.
///
/// Exits with an error when the file is unreadable, is not JSON, or has
/// error-level diagnostics.
pub(crate) fn cmd_config(action: ConfigAction, path: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Check => {
            let config_path = path.map(Path::to_path_buf).unwrap_or_else(Config::path);
            println!("Config file: {}", config_path.display());

            if !config_path.exists() {
                println!("[OK] No config file found (using defaults)");
                return Ok(());
            }

            let content =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            let raw: serde_json::Value =
                serde_json::from_str(&content).context("Config file is not valid JSON")?;

            let diagnostics = validate_config(&raw);
            for diag in &diagnostics {
                println!("{}", diag);
            }

            let errors = diagnostics
                .iter()
                .filter(|d| d.level == DiagnosticLevel::Error)
                .count();
            let warnings = diagnostics
                .iter()
                .filter(|d| d.level == DiagnosticLevel::Warn)
                .count();

            if errors == 0 && warnings == 0 {
                println!("\nConfiguration looks good!");
            } else {
                println!("\nFound {} error(s), {} warning(s)", errors, warnings);
            }
            if errors > 0 {
                anyhow::bail!("configuration has {} error(s)", errors);
            }
        }
    }
    Ok(())
}
