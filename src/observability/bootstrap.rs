//! Telemetry bootstrap.
//!
//! `initialize` runs once, before the listener is bound. It selects the trace
//! exporter, builds both providers around a shared resource descriptor,
//! publishes them and registers the instruments. The returned [`Telemetry`]
//! is the handle every request path is given explicitly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use opentelemetry::global;
use opentelemetry::metrics::{Meter, MeterProvider as _};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::metrics::exporter::PushMetricExporter;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::{SdkTracer, SdkTracerProvider, SpanExporter};
use opentelemetry_sdk::Resource;

use crate::config::TelemetryConfig;
use crate::observability::exporter::{ExporterKind, TraceExporter};
use crate::observability::metrics::{self, Instruments, PoolGauges, PoolStats, METER_NAME};
use crate::observability::trace::{DB_TRACER, HANDLER_TRACER};

static PUBLISHED: AtomicBool = AtomicBool::new(false);

/// Error type for telemetry initialization failures.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("unknown trace exporter `{0}` (expected one of: stdout, jaeger)")]
    UnknownExporter(String),

    #[error("failed to build trace exporter: {0}")]
    TraceExporter(#[from] opentelemetry_otlp::ExporterBuildError),

    #[error("telemetry has already been initialized")]
    AlreadyInitialized,
}

/// Tracing and metrics providers plus the instruments built on them.
pub struct Telemetry {
    tracer_provider: SdkTracerProvider,
    meter_provider: SdkMeterProvider,
    handler_tracer: SdkTracer,
    db_tracer: SdkTracer,
    meter: Meter,
    instruments: Instruments,
}

/// Select the trace exporter named by `mode` and bring up both providers.
///
/// The providers are also installed as the `opentelemetry::global` providers.
/// Fails on an unrecognized `mode`, on exporter construction errors, and on a
/// second call within the process.
pub fn initialize(mode: &str, config: &TelemetryConfig) -> Result<Telemetry, InitError> {
    let kind: ExporterKind = mode.parse()?;
    let exporter = TraceExporter::build(kind, config)?;
    if PUBLISHED
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return Err(InitError::AlreadyInitialized);
    }

    let resource = resource(config);
    let tracer_provider = exporter
        .install(SdkTracerProvider::builder())
        .with_resource(resource.clone())
        .build();
    let meter_provider = metrics::meter_provider(
        opentelemetry_stdout::MetricExporter::default(),
        Duration::from_secs(config.metrics_interval_secs),
        resource,
    );

    global::set_tracer_provider(tracer_provider.clone());
    global::set_meter_provider(meter_provider.clone());

    tracing::info!(
        exporter = %kind,
        service_name = %config.service_name,
        metrics_interval_secs = config.metrics_interval_secs,
        "Telemetry initialized"
    );

    Ok(Telemetry::from_providers(tracer_provider, meter_provider))
}

fn resource(config: &TelemetryConfig) -> Resource {
    Resource::builder()
        .with_service_name(config.service_name.clone())
        .build()
}

impl Telemetry {
    /// Build telemetry around caller-supplied sinks without touching global state.
    ///
    /// Spans still go through a batch processor; call [`Telemetry::force_flush`]
    /// to drain it.
    pub fn with_exporters<S, M>(
        span_exporter: S,
        metric_exporter: M,
        config: &TelemetryConfig,
    ) -> Self
    where
        S: SpanExporter + 'static,
        M: PushMetricExporter,
    {
        let resource = resource(config);
        let tracer_provider = SdkTracerProvider::builder()
            .with_batch_exporter(span_exporter)
            .with_resource(resource.clone())
            .build();
        let meter_provider = metrics::meter_provider(
            metric_exporter,
            Duration::from_secs(config.metrics_interval_secs),
            resource,
        );
        Self::from_providers(tracer_provider, meter_provider)
    }

    fn from_providers(
        tracer_provider: SdkTracerProvider,
        meter_provider: SdkMeterProvider,
    ) -> Self {
        let handler_tracer = tracer_provider.tracer(HANDLER_TRACER);
        let db_tracer = tracer_provider.tracer(DB_TRACER);
        let meter = meter_provider.meter(METER_NAME);
        let instruments = Instruments::register(&meter);
        Self {
            tracer_provider,
            meter_provider,
            handler_tracer,
            db_tracer,
            meter,
            instruments,
        }
    }

    pub fn handler_tracer(&self) -> &SdkTracer {
        &self.handler_tracer
    }

    pub fn db_tracer(&self) -> &SdkTracer {
        &self.db_tracer
    }

    pub fn instruments(&self) -> &Instruments {
        &self.instruments
    }

    /// Export connection pool occupancy, sampled from `stats` at each collection.
    pub fn observe_pool<F>(&self, stats: F) -> PoolGauges
    where
        F: Fn() -> PoolStats + Send + Sync + 'static,
    {
        PoolGauges::register(&self.meter, stats)
    }

    /// Export everything buffered so far. Failures are logged, not returned.
    pub fn force_flush(&self) {
        if let Err(e) = self.tracer_provider.force_flush() {
            tracing::warn!(error = %e, "Failed to flush spans");
        }
        if let Err(e) = self.meter_provider.force_flush() {
            tracing::warn!(error = %e, "Failed to flush metrics");
        }
    }

    /// Flush and stop both providers. Failures are logged, not returned.
    pub fn shutdown(&self) {
        if let Err(e) = self.tracer_provider.shutdown() {
            tracing::warn!(error = %e, "Failed to shutdown tracer provider");
        }
        if let Err(e) = self.meter_provider.shutdown() {
            tracing::warn!(error = %e, "Failed to shutdown meter provider");
        }
    }
}
