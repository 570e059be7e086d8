//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, pool size > 0)
//! - Validate addresses and URLs before anything binds or connects
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - The exporter selector itself is checked by telemetry bootstrap, which owns that contract

use std::net::SocketAddr;

use tracing::level_filters::LevelFilter;
use url::Url;

use crate::config::schema::ServiceConfig;
use crate::observability::ExporterKind;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    InvalidBindAddress(String),

    #[error("telemetry.collector_endpoint `{0}` is not an http(s) URL")]
    InvalidCollectorEndpoint(String),

    #[error("logging.level `{0}` is not a log level")]
    InvalidLogLevel(String),

    #[error("store.url `{0}` is not a sqlite URL")]
    InvalidStoreUrl(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }

    if config.telemetry.metrics_interval_secs == 0 {
        errors.push(ValidationError::Zero("telemetry.metrics_interval_secs"));
    }

    // Only the remote collector uses the endpoint.
    if matches!(
        config.telemetry.exporter.parse::<ExporterKind>(),
        Ok(ExporterKind::Jaeger)
    ) && !is_http_url(&config.telemetry.collector_endpoint)
    {
        errors.push(ValidationError::InvalidCollectorEndpoint(
            config.telemetry.collector_endpoint.clone(),
        ));
    }

    if config.logging.level.parse::<LevelFilter>().is_err() {
        errors.push(ValidationError::InvalidLogLevel(config.logging.level.clone()));
    }

    if !config.store.url.starts_with("sqlite:") {
        errors.push(ValidationError::InvalidStoreUrl(config.store.url.clone()));
    }

    if config.store.max_connections == 0 {
        errors.push(ValidationError::Zero("store.max_connections"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}
