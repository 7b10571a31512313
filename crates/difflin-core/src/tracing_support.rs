//! Structured logging support
//!
//! The containers emit `tracing` events on their structural operations:
//! index compaction at `trace` level, sparse transposes, in-place transposes
//! and permutations at `debug` level. This module installs a subscriber to
//! make them visible.
//!
//! # Example
//!
//! ```ignore
//! use difflin_core::tracing_support::{init_tracing, TracingConfig, TracingFormat};
//!
//! init_tracing(TracingConfig {
//!     format: TracingFormat::Compact,
//!     filter: "difflin_sparse=trace,info".to_string(),
//!     ..TracingConfig::default()
//! })?;
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set log level (e.g., `RUST_LOG=difflin_sparse=debug`)
//! - `DIFFLIN_LOG_FORMAT`: Set output format (`json`, `compact` or `pretty`, default: `pretty`)

use anyhow::Result;
#[cfg(feature = "tracing")]
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "difflin_core=info,difflin_sparse=info,warn";

/// Tracing output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracingFormat {
    /// Pretty-printed human-readable format
    Pretty,
    /// JSON format for structured logging
    Json,
    /// Compact format (single line per event)
    Compact,
}

impl TracingFormat {
    /// Parse from string, falling back to [`TracingFormat::Pretty`]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => TracingFormat::Json,
            "compact" => TracingFormat::Compact,
            _ => TracingFormat::Pretty,
        }
    }
}

/// Tracing configuration
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Output format
    pub format: TracingFormat,
    /// Filter directive (e.g., "difflin_sparse=trace,info")
    pub filter: String,
    /// Enable ANSI colors
    pub with_ansi: bool,
    /// Show target module paths
    pub with_target: bool,
    /// Show file locations
    pub with_file: bool,
    /// Show line numbers
    pub with_line_number: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        let format = std::env::var("DIFFLIN_LOG_FORMAT")
            .map(|s| TracingFormat::parse(&s))
            .unwrap_or(TracingFormat::Pretty);

        let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string());

        Self {
            format,
            filter,
            with_ansi: true,
            with_target: true,
            with_file: false,
            with_line_number: false,
        }
    }
}

/// Formatting layer for the configured output format
#[cfg(feature = "tracing")]
fn fmt_layer(config: &TracingConfig) -> Box<dyn Layer<Registry> + Send + Sync> {
    let layer = fmt::layer()
        .with_target(config.with_target)
        .with_file(config.with_file)
        .with_line_number(config.with_line_number);
    match config.format {
        TracingFormat::Pretty => layer.pretty().with_ansi(config.with_ansi).boxed(),
        TracingFormat::Json => layer.json().with_ansi(false).boxed(),
        TracingFormat::Compact => layer.compact().with_ansi(config.with_ansi).boxed(),
    }
}

/// Install a global subscriber built from `config`
///
/// # Errors
///
/// Returns error if the filter directive does not parse or a global
/// subscriber is already installed.
#[cfg(feature = "tracing")]
pub fn init_tracing(config: TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.filter)?;
    tracing_subscriber::registry()
        .with(fmt_layer(&config).with_filter(filter))
        .try_init()?;
    Ok(())
}

/// No-op when the `tracing` feature is disabled
#[cfg(not(feature = "tracing"))]
pub fn init_tracing(_config: TracingConfig) -> Result<()> {
    Ok(())
}
