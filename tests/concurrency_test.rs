//! Concurrent requests share instruments without losing counts or mixing traces.

use std::collections::HashMap;

use opentelemetry::trace::TraceId;
use reqwest::StatusCode;

mod common;

const REQUESTS: usize = 50;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_keep_traces_separate() {
    let service = common::start_service(common::test_config()).await;
    let client = reqwest::Client::new();

    let mut handles = Vec::with_capacity(REQUESTS);
    for i in 0..REQUESTS {
        let client = client.clone();
        // Mix hits and misses.
        let url = service.url(if i % 5 == 0 { "/user/7" } else { "/user/1" });
        handles.push(tokio::spawn(async move {
            client.get(url).send().await.unwrap().status()
        }));
    }

    let mut ok = 0;
    let mut not_found = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::OK => ok += 1,
            StatusCode::NOT_FOUND => not_found += 1,
            other => panic!("unexpected status {other}"),
        }
    }
    assert_eq!(ok, REQUESTS - REQUESTS / 5);
    assert_eq!(not_found, REQUESTS / 5);
    common::settle().await;

    assert_eq!(
        service.counter_value("http_requests_total", "route", "/user/{id}"),
        REQUESTS as u64
    );
    assert_eq!(
        service.histogram_count("db_query_duration_ms", "query", "SELECT user"),
        REQUESTS as u64
    );

    let spans = service.finished_spans();
    assert_eq!(spans.len(), REQUESTS * 3);

    let mut per_trace: HashMap<TraceId, usize> = HashMap::new();
    for span in &spans {
        *per_trace.entry(span.span_context.trace_id()).or_default() += 1;
    }
    assert_eq!(per_trace.len(), REQUESTS);

    for trace_id in per_trace.keys() {
        let trace = common::spans_in_trace(&spans, *trace_id);
        common::assert_span_chain(&trace);
    }
}
