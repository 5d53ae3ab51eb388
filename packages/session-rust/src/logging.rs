//! Tracing subscriber bootstrap.

use tracing_subscriber::EnvFilter;

use crate::config::{LogConfig, LogFormat};

/// Builds the event filter: `RUST_LOG` when set, otherwise the configured
/// directive.
///
/// # Errors
///
/// Returns an error if the configured directive does not parse.
pub fn env_filter(config: &LogConfig) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(&config.filter)?),
    }
}

/// Installs the global tracing subscriber. Events go to stderr so the
/// preview on stdout stays machine-readable.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a global subscriber is
/// already installed.
pub fn init_tracing(config: &LogConfig) -> anyhow::Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config)?)
        .with_writer(std::io::stderr);

    let installed = match config.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {err}"))
}
