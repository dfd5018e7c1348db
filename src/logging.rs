//! Stderr logging subscriber for the CLI and embedding hosts.
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `RUST_LOG` | filter directives (default `cashgate=info,warn`) |
//! | `CASHGATE_LOG_JSON` | `1` / `true` for JSON lines |

use tracing_subscriber::{fmt, EnvFilter};

pub const ENV_LOG_JSON: &str = "CASHGATE_LOG_JSON";
const DEFAULT_FILTER: &str = "cashgate=info,warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }

    pub fn from_env() -> Self {
        std::env::var(ENV_LOG_JSON).map(|v| Self::parse(&v)).unwrap_or(LogFormat::Pretty)
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging() {
    init_logging_with(LogFormat::from_env());
}

pub fn init_logging_with(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = fmt::Subscriber::builder().with_env_filter(env_filter).with_writer(std::io::stderr);
    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}
