//! `social-search` binary.
//!
//! Wires the social search service from the environment and runs the auto-posting
//! agent until ctrl-c or a configuration error.

use dotenv::dotenv;
use social_search::{Dependencies, StartupError};
use std::env;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "social_search=info,social_search_repository=info";

/// Log output selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    /// One JSON object per event, for log shippers.
    Json,
    /// Human readable multi-line output.
    Pretty,
}

impl LogFormat {
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some(format) if format.trim().eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

fn init_logging(format: LogFormat) -> Result<(), StartupError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let json = (format == LogFormat::Json).then(|| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
    });
    let pretty = (format == LogFormat::Pretty).then(|| fmt::layer().with_target(false).pretty());

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .try_init()
        .map_err(|e| StartupError::config(format!("Logging already initialized: {}", e)))?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        log_format = ?format,
        "social-search logging ready"
    );
    Ok(())
}

async fn run() -> Result<(), StartupError> {
    let deps = Dependencies::new()
        .await
        .inspect_err(|e| error!(error = %e, "Could not wire the social search service"))?;

    deps.agent
        .run()
        .await
        .inspect_err(|e| error!(error = %e, "Auto-posting agent stopped on error"))?;

    info!("Auto-posting agent exited cleanly");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // A missing .env is fine; the process environment still applies
    dotenv().ok();

    init_logging(LogFormat::parse(env::var("LOG_FORMAT").ok().as_deref()))?;

    run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some(" JSON ")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some("text")), LogFormat::Pretty);
        assert_eq!(LogFormat::parse(None), LogFormat::Pretty);
    }
}
