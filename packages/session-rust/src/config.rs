//! Configuration types for the editing session and the `schema-preview` binary.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Top-level session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Spaces per indentation level in the rendered preview.
    pub indent: usize,
    /// Logging settings.
    pub log: LogConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            indent: 2,
            log: LogConfig::default(),
        }
    }
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Logging configuration. `RUST_LOG`, when set, takes precedence over `filter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directive string, e.g. `"info"` or `"schema_builder_core=debug"`.
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Replay a scripted editing session and print the resulting JSON preview.
#[derive(Parser, Debug, Clone)]
#[command(name = "schema-preview", version, about, long_about = None)]
pub struct Cli {
    /// JSON-lines action script. Reads stdin when omitted.
    pub script: Option<PathBuf>,

    /// Print the field-type catalog and exit
    #[arg(long)]
    pub list_types: bool,

    /// Spaces per indentation level in the printed preview
    #[arg(long, env = "SCHEMA_PREVIEW_INDENT", default_value_t = 2)]
    pub indent: usize,

    /// Log filter directive
    #[arg(long, env = "SCHEMA_PREVIEW_LOG", default_value = "info")]
    pub log: String,

    /// Log output format
    #[arg(long, env = "SCHEMA_PREVIEW_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    /// Builds the session configuration from parsed arguments.
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            indent: self.indent,
            log: LogConfig {
                filter: self.log.clone(),
                format: self.log_format,
            },
        }
    }
}
