//! Logging initialization for pagefetch.
//!
//! Supports three formats:
//! - `pretty`: multi-line human-readable output
//! - `component`: compact `timestamp LEVEL target: message fields` lines; use
//!   the [`log_component!`] macro to add a `component` field for
//!   per-subsystem filtering
//! - `json`: structured JSON lines for log aggregators
//!
//! Logs go to stderr (or `logging.file`) so fetched text on stdout stays
//! clean.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{FetchError, Result};

/// Install the global tracing subscriber described by `cfg`.
///
/// `RUST_LOG` wins over `cfg.level`. Call once at startup; a second call
/// fails because a global subscriber is already set.
pub fn init_logging(cfg: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.level));

    let (writer, ansi) = match &cfg.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi);

    let installed = match cfg.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Component => builder.with_target(true).compact().try_init(),
    };

    installed.map_err(|e| FetchError::Config(format!("failed to install logger: {}", e)))
}

/// Emit a component-tagged tracing event.
///
/// ```
/// # use pagefetch::log_component;
/// log_component!(info, "server", "listening");
/// log_component!(warn, "fetch", "attempt failed", status = 403u16);
/// ```
#[macro_export]
macro_rules! log_component {
    ($level:ident, $component:expr, $msg:expr) => {
        tracing::$level!(component = $component, $msg)
    };
    ($level:ident, $component:expr, $msg:expr, $($key:ident = $val:expr),+ $(,)?) => {
        tracing::$level!(component = $component, $($key = $val,)+ $msg)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_logging_config() {
        let cfg = LoggingConfig::default();
        assert_eq!(cfg.format, LogFormat::Component);
        assert_eq!(cfg.level, "info");
        assert!(cfg.file.is_none());
    }

    #[test]
    fn test_log_format_deserialize() {
        let cfg: LoggingConfig =
            serde_json::from_str(r#"{"format":"json","level":"debug"}"#).unwrap();
        assert_eq!(cfg.format, LogFormat::Json);
        assert_eq!(cfg.level, "debug");

        let cfg: LoggingConfig = serde_json::from_str(r#"{"format":"pretty"}"#).unwrap();
        assert_eq!(cfg.format, LogFormat::Pretty);
        assert_eq!(cfg.level, "info");
    }

    #[test]
    fn test_unopenable_log_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = LoggingConfig {
            format: LogFormat::Json,
            level: "info".to_string(),
            // A directory cannot be opened for appending.
            file: Some(dir.path().to_string_lossy().into_owned()),
        };
        assert!(matches!(init_logging(&cfg), Err(FetchError::Io(_))));
    }

    #[test]
    fn test_log_component_macro_compiles() {
        crate::log_component!(debug, "test", "plain event");
        crate::log_component!(debug, "test", "event with fields", host = "example.com", attempts = 2u32);
    }
}
