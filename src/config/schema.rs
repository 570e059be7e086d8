//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the traced lookup service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Trace and metrics export settings.
    pub telemetry: TelemetryConfig,

    /// Operational log settings.
    pub logging: LoggingConfig,

    /// Data store settings.
    pub store: StoreConfig,

    /// Business-logic tuning.
    pub pipeline: PipelineConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Telemetry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Trace exporter selector ("stdout" or "jaeger").
    pub exporter: String,

    /// Collector endpoint used by the "jaeger" exporter (OTLP over HTTP).
    pub collector_endpoint: String,

    /// `service.name` reported in the resource descriptor.
    pub service_name: String,

    /// Interval between periodic metric exports in seconds.
    pub metrics_interval_secs: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            exporter: "stdout".to_string(),
            collector_endpoint: "http://localhost:4318/v1/traces".to_string(),
            service_name: "sqlite-service".to_string(),
            metrics_interval_secs: 60,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub level: String,

    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Data store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite connection URL. `sqlite::memory:` keeps the table for the process lifetime only.
    pub url: String,

    /// Maximum pooled connections.
    pub max_connections: u32,

    /// Identifier of the record seeded at startup.
    pub seed_id: i64,

    /// Value of the record seeded at startup.
    pub seed_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 5,
            seed_id: 1,
            seed_name: "Alice".to_string(),
        }
    }
}

/// Business-logic configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Simulated processing time spent before the data query, in milliseconds.
    pub processing_delay_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: 50,
        }
    }
}
