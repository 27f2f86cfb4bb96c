//! Logging initialization
//!
//! The subscriber honours `RUST_LOG`; without it the simulator logs its own
//! crates at `debug` and everything else at `info`.

use anyhow::anyhow;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_DIRECTIVES: &str = "info,pharos_sim=debug,laser=debug,tower_http=debug";

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    #[default]
    Pretty,
    /// One JSON object per line, for log aggregation
    Json,
    /// Single-line records
    Compact,
}

impl LogFormat {
    /// Parse from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
            Self::Compact => "compact",
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown log format: {}", s))
    }
}

/// Install the global tracing subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init_logging(service_name: &str, format: LogFormat) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = match format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(true),
            )
            .try_init(),
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
    };
    installed.map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))?;

    tracing::info!(
        service = service_name,
        format = format.as_str(),
        "Logging initialized"
    );

    Ok(())
}
