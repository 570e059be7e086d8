//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use opentelemetry::trace::{SpanId, TraceId};
use opentelemetry_sdk::metrics::data::{AggregatedMetrics, MetricData};
use opentelemetry_sdk::metrics::InMemoryMetricExporter;
use opentelemetry_sdk::trace::{InMemorySpanExporter, SpanData};
use traced_service::lifecycle::{Service, Shutdown};
use traced_service::{ServiceConfig, Telemetry};

/// A running service wired to in-memory telemetry sinks.
pub struct TestService {
    pub addr: SocketAddr,
    pub telemetry: Arc<Telemetry>,
    spans: InMemorySpanExporter,
    metrics: InMemoryMetricExporter,
    shutdown: Shutdown,
}

/// A loopback port that was free a moment ago.
pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Defaults suitable for tests: ephemeral port, short processing delay.
pub fn test_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.pipeline.processing_delay_ms = 5;
    config
}

/// Start a service on an ephemeral port.
pub async fn start_service(config: ServiceConfig) -> TestService {
    let spans = InMemorySpanExporter::default();
    let metrics = InMemoryMetricExporter::default();
    let telemetry = Arc::new(Telemetry::with_exporters(
        spans.clone(),
        metrics.clone(),
        &config.telemetry,
    ));

    let service = Service::prepare(config, telemetry.clone()).await.unwrap();
    let addr = service.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = service.run(receiver).await;
    });

    TestService {
        addr,
        telemetry,
        spans,
        metrics,
        shutdown,
    }
}

impl TestService {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Flush the batch processor and return every span exported so far.
    pub fn finished_spans(&self) -> Vec<SpanData> {
        self.telemetry.force_flush();
        self.spans.get_finished_spans().unwrap()
    }

    /// Current value of counter `name` for the data point labelled `key=value`.
    pub fn counter_value(&self, name: &str, key: &str, value: &str) -> u64 {
        self.telemetry.force_flush();
        let exported = self.metrics.get_finished_metrics().unwrap();
        let Some(latest) = exported.last() else {
            return 0;
        };

        let mut total = 0;
        for metric in latest
            .scope_metrics()
            .into_iter()
            .flat_map(|scope| scope.metrics())
            .filter(|metric| metric.name() == name)
        {
            if let AggregatedMetrics::U64(MetricData::Sum(sum)) = metric.data() {
                for point in sum.data_points() {
                    let matches = point
                        .attributes()
                        .into_iter()
                        .any(|kv| kv.key.as_str() == key && kv.value.as_str() == value);
                    if matches {
                        total += point.value().to_owned();
                    }
                }
            }
        }
        total
    }

    /// Number of measurements recorded by histogram `name` for `key=value`.
    pub fn histogram_count(&self, name: &str, key: &str, value: &str) -> u64 {
        self.telemetry.force_flush();
        let exported = self.metrics.get_finished_metrics().unwrap();
        let Some(latest) = exported.last() else {
            return 0;
        };

        let mut count = 0;
        for metric in latest
            .scope_metrics()
            .into_iter()
            .flat_map(|scope| scope.metrics())
            .filter(|metric| metric.name() == name)
        {
            if let AggregatedMetrics::F64(MetricData::Histogram(histogram)) = metric.data() {
                for point in histogram.data_points() {
                    let matches = point
                        .attributes()
                        .into_iter()
                        .any(|kv| kv.key.as_str() == key && kv.value.as_str() == value);
                    if matches {
                        count += point.count() as u64;
                    }
                }
            }
        }
        count
    }

    /// Latest value of gauge `name` for the data point labelled `key=value`.
    pub fn gauge_value(&self, name: &str, key: &str, value: &str) -> Option<u64> {
        self.telemetry.force_flush();
        let exported = self.metrics.get_finished_metrics().unwrap();
        let latest = exported.last()?;

        for metric in latest
            .scope_metrics()
            .into_iter()
            .flat_map(|scope| scope.metrics())
            .filter(|metric| metric.name() == name)
        {
            if let AggregatedMetrics::U64(MetricData::Gauge(gauge)) = metric.data() {
                for point in gauge.data_points() {
                    let matches = point
                        .attributes()
                        .into_iter()
                        .any(|kv| kv.key.as_str() == key && kv.value.as_str() == value);
                    if matches {
                        return Some(point.value().to_owned());
                    }
                }
            }
        }
        None
    }

    pub fn stop(&self) {
        self.shutdown.trigger();
    }
}

impl Drop for TestService {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Spans belonging to `trace_id`.
pub fn spans_in_trace(spans: &[SpanData], trace_id: TraceId) -> Vec<&SpanData> {
    spans
        .iter()
        .filter(|span| span.span_context.trace_id() == trace_id)
        .collect()
}

/// The span named `name`, panicking if there is not exactly one.
pub fn only<'a>(spans: &[&'a SpanData], name: &str) -> &'a SpanData {
    let matching: Vec<_> = spans.iter().filter(|span| span.name == name).collect();
    assert_eq!(matching.len(), 1, "expected exactly one `{name}` span");
    matching[0]
}

/// Assert `spans` form the chain handler → lookup → query and return them.
pub fn assert_span_chain<'a>(
    spans: &[&'a SpanData],
) -> (&'a SpanData, &'a SpanData, &'a SpanData) {
    assert_eq!(spans.len(), 3, "expected one span triple per request");
    let handler = only(spans, "getUserHandler");
    let lookup = only(spans, "fetchUserByID");
    let query = only(spans, "SQL SELECT");

    assert_eq!(handler.parent_span_id, SpanId::INVALID);
    assert_eq!(lookup.parent_span_id, handler.span_context.span_id());
    assert_eq!(query.parent_span_id, lookup.span_context.span_id());

    assert!(query.end_time <= lookup.end_time);
    assert!(lookup.end_time <= handler.end_time);
    (handler, lookup, query)
}

/// Wait briefly for work finishing after a response was sent.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}
