//! The `stdout` exporter prints every span of a completed request.

#![cfg(unix)]

use std::process::{Command, Stdio};
use std::time::Duration;

use reqwest::StatusCode;

mod common;

#[tokio::test]
async fn test_stdout_exporter_prints_request_spans() {
    let address = format!("127.0.0.1:{}", common::free_port());
    let child = Command::new(env!("CARGO_BIN_EXE_traced-service"))
        .args(["--trace", "stdout", "--bind", &address])
        .env("RUST_LOG", "warn")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let url = format!("http://{address}/user/1");
    let mut response = None;
    for _ in 0..50 {
        match reqwest::get(&url).await {
            Ok(ok) => {
                response = Some(ok);
                break;
            }
            Err(_) => tokio::time::sleep(Duration::from_millis(100)).await,
        }
    }
    let response = response.expect("service never started listening");
    assert_eq!(response.status(), StatusCode::OK);

    // Graceful shutdown flushes the batch processor before exit.
    let signalled = Command::new("kill")
        .args(["-TERM", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(signalled.success());

    let output = tokio::task::spawn_blocking(move || child.wait_with_output())
        .await
        .unwrap()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for name in ["getUserHandler", "fetchUserByID", "SQL SELECT"] {
        assert_eq!(
            stdout.matches(&format!("Name         : {name}")).count(),
            1,
            "span `{name}` printed once"
        );
    }
    assert!(stdout.contains("http_requests_total"));
    assert!(stdout.contains("db_query_duration_ms"));
}
