use std::env::var;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{level_filters::LevelFilter, warn};
use tracing_subscriber::{Layer, filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format of the log layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" | "" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Compact => write!(f, "compact"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` filters (default `info`), `RUST_LOG_FORMAT` overrides `format`.
pub fn init_tracing(format: LogFormat) {
    let (format, rejected) = resolve_format(format, var("RUST_LOG_FORMAT").ok());

    initialize_tracing(LevelFilter::INFO, format);

    if let Some(error) = rejected {
        warn!("Ignoring RUST_LOG_FORMAT, falling back to {format}: {error}");
    }
}

/// Pick the layer format; an unparseable override means `Compact`
fn resolve_format(configured: LogFormat, env: Option<String>) -> (LogFormat, Option<String>) {
    match env.map(|raw| raw.parse::<LogFormat>()) {
        None => (configured, None),
        Some(Ok(parsed)) => (parsed, None),
        Some(Err(error)) => (LogFormat::Compact, Some(error)),
    }
}

fn initialize_tracing(level: LevelFilter, format: LogFormat) {
    let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

    let log_layer = match format {
        LogFormat::Json => tracing_subscriber::fmt::layer().json().with_filter(env_filter).boxed(),
        LogFormat::Compact => {
            tracing_subscriber::fmt::layer().compact().with_filter(env_filter).boxed()
        }
    };

    tracing_subscriber::registry().with(log_layer).init();
}
