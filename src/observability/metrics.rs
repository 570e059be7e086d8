//! Metrics collection and periodic export.
//!
//! # Responsibilities
//! - Build the meter provider with a periodic reader
//! - Register the service's instruments once at startup
//! - Provide cheap recording helpers used on every request
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by route
//! - `db_query_duration_ms` (histogram): data query latency by query kind
//! - `db_pool_connections_open` / `db_pool_connections_idle` (observable gauges):
//!   connection pool occupancy, read on every collection
//!
//! # Design Decisions
//! - Instruments are created once and cloned into every request path
//! - Aggregation is internal to the SDK and safe under concurrent updates
//! - Export failures are reported by the SDK's internal logs and never reach callers

use std::sync::Arc;
use std::time::Duration;

use opentelemetry::metrics::{Counter, Histogram, Meter, ObservableGauge};
use opentelemetry::KeyValue;
use opentelemetry_sdk::metrics::exporter::PushMetricExporter;
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::Resource;

pub const METER_NAME: &str = "sqlite-metrics";
pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const DB_QUERY_DURATION_MS: &str = "db_query_duration_ms";
pub const DB_POOL_CONNECTIONS_OPEN: &str = "db_pool_connections_open";
pub const DB_POOL_CONNECTIONS_IDLE: &str = "db_pool_connections_idle";

/// Point-in-time view of the data store connection pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub open: u64,
    pub idle: u64,
}

/// Handles for the pool gauges. Their callbacks run on every collection for
/// the lifetime of the meter provider.
#[derive(Debug, Clone)]
pub struct PoolGauges {
    _open: ObservableGauge<u64>,
    _idle: ObservableGauge<u64>,
}

impl PoolGauges {
    /// Register both gauges on `meter`, sampling `stats` at collection time.
    pub fn register<F>(meter: &Meter, stats: F) -> Self
    where
        F: Fn() -> PoolStats + Send + Sync + 'static,
    {
        let stats = Arc::new(stats);

        let sample = stats.clone();
        let open = meter
            .u64_observable_gauge(DB_POOL_CONNECTIONS_OPEN)
            .with_description("Connections currently held by the pool")
            .with_callback(move |observer| {
                observer.observe((*sample)().open, &[KeyValue::new("db.system", "sqlite")]);
            })
            .build();

        let idle = meter
            .u64_observable_gauge(DB_POOL_CONNECTIONS_IDLE)
            .with_description("Pooled connections not checked out")
            .with_callback(move |observer| {
                observer.observe((*stats)().idle, &[KeyValue::new("db.system", "sqlite")]);
            })
            .build();

        Self {
            _open: open,
            _idle: idle,
        }
    }
}

/// Build a meter provider that pushes to `exporter` every `interval`.
pub fn meter_provider<E>(exporter: E, interval: Duration, resource: Resource) -> SdkMeterProvider
where
    E: PushMetricExporter,
{
    let reader = PeriodicReader::builder(exporter)
        .with_interval(interval)
        .build();

    SdkMeterProvider::builder()
        .with_reader(reader)
        .with_resource(resource)
        .build()
}

/// The instruments shared by all requests.
#[derive(Clone)]
pub struct Instruments {
    requests: Counter<u64>,
    query_duration: Histogram<f64>,
}

impl Instruments {
    /// Create the service's instruments on `meter`.
    pub fn register(meter: &Meter) -> Self {
        let requests = meter
            .u64_counter(HTTP_REQUESTS_TOTAL)
            .with_description("Total number of HTTP requests received")
            .build();
        let query_duration = meter
            .f64_histogram(DB_QUERY_DURATION_MS)
            .with_description("Duration of data store queries")
            .with_unit("ms")
            .build();

        Self {
            requests,
            query_duration,
        }
    }

    /// Count one request on `route`.
    pub fn record_request(&self, route: &'static str) {
        self.requests.add(1, &[KeyValue::new("route", route)]);
    }

    /// Record how long a `query` took, in milliseconds.
    pub fn record_query(&self, query: &'static str, elapsed: Duration) {
        self.query_duration.record(
            elapsed.as_secs_f64() * 1000.0,
            &[KeyValue::new("query", query)],
        );
    }
}
