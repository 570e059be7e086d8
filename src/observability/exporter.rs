//! Trace exporter selection.
//!
//! # Responsibilities
//! - Parse the exporter selector given at startup
//! - Build the matching span sink
//! - Attach it to the tracer provider behind a batching processor
//!
//! # Design Decisions
//! - Closed set of variants: a new backend is a new `ExporterKind` and `TraceExporter` arm
//! - The "jaeger" backend is reached through its native OTLP/HTTP intake

use std::fmt;
use std::str::FromStr;

use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::TracerProviderBuilder;

use crate::config::TelemetryConfig;
use crate::observability::bootstrap::InitError;

/// Which trace sink the service exports finished spans to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExporterKind {
    /// Human-readable spans written to standard output.
    Stdout,
    /// Spans pushed to a Jaeger collector.
    Jaeger,
}

impl ExporterKind {
    pub const ALL: [ExporterKind; 2] = [ExporterKind::Stdout, ExporterKind::Jaeger];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExporterKind::Stdout => "stdout",
            ExporterKind::Jaeger => "jaeger",
        }
    }
}

impl fmt::Display for ExporterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExporterKind {
    type Err = InitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| InitError::UnknownExporter(s.to_string()))
    }
}

/// A constructed span sink, ready to be installed on a tracer provider.
#[derive(Debug)]
pub enum TraceExporter {
    Stdout(opentelemetry_stdout::SpanExporter),
    Jaeger(opentelemetry_otlp::SpanExporter),
}

impl TraceExporter {
    /// Build the sink for `kind`.
    ///
    /// Must run outside an async context: the collector client is blocking.
    pub fn build(kind: ExporterKind, config: &TelemetryConfig) -> Result<Self, InitError> {
        match kind {
            ExporterKind::Stdout => Ok(TraceExporter::Stdout(
                opentelemetry_stdout::SpanExporter::default(),
            )),
            ExporterKind::Jaeger => {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .with_endpoint(config.collector_endpoint.clone())
                    .build()?;
                Ok(TraceExporter::Jaeger(exporter))
            }
        }
    }

    pub fn kind(&self) -> ExporterKind {
        match self {
            TraceExporter::Stdout(_) => ExporterKind::Stdout,
            TraceExporter::Jaeger(_) => ExporterKind::Jaeger,
        }
    }

    /// Register the sink on `builder` behind a batch span processor.
    pub fn install(self, builder: TracerProviderBuilder) -> TracerProviderBuilder {
        match self {
            TraceExporter::Stdout(exporter) => builder.with_batch_exporter(exporter),
            TraceExporter::Jaeger(exporter) => builder.with_batch_exporter(exporter),
        }
    }
}
