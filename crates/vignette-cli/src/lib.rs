//! Helpers shared by the `vignette` binary.

use anyhow::Context;
use serde::Serialize;
use vignette_core::LogFormat;

/// Result of a `vignette store` run, printed as JSON
#[derive(Debug, Serialize)]
pub struct StoreReport {
    pub name: String,
    pub original_key: String,
    pub thumbnail_key: String,
    pub verified: bool,
}

/// Parse `WIDTHxHEIGHT` (e.g. `800x600`).
pub fn parse_dimensions(raw: &str) -> anyhow::Result<(u32, u32)> {
    let (width, height) = raw
        .trim()
        .split_once(['x', 'X'])
        .with_context(|| format!("expected WIDTHxHEIGHT, got '{}'", raw))?;
    let width = width
        .trim()
        .parse::<u32>()
        .with_context(|| format!("invalid width in '{}'", raw))?;
    let height = height
        .trim()
        .parse::<u32>()
        .with_context(|| format!("invalid height in '{}'", raw))?;
    Ok((width, height))
}

/// Initialize tracing for the CLI. Events go to stderr so stdout stays JSON only.
pub fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}
