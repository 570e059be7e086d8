//! Traced lookup service.
//!
//! A single-route HTTP service whose interest is its instrumentation: every
//! request produces a nested span triple and updates shared metric
//! instruments, all through providers bootstrapped once at startup.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────────┐
//!                 │                     TRACED SERVICE                        │
//!                 │                                                           │
//!   GET /user/1   │  ┌──────────┐   ┌───────────────┐   ┌──────────────────┐  │
//!   ──────────────┼─▶│   http   │──▶│    service    │──▶│      store       │  │
//!                 │  │ handler  │   │ fetchUserByID │   │ SQL SELECT (pool)│  │
//!                 │  │  span    │   │     span      │   │      span        │  │
//!                 │  └────┬─────┘   └───────┬───────┘   └────────┬─────────┘  │
//!                 │       │ counter         │                    │ histogram  │
//!                 │       ▼                 ▼                    ▼            │
//!                 │  ┌─────────────────────────────────────────────────────┐  │
//!                 │  │ observability: Telemetry (tracer + meter providers) │  │
//!                 │  │   spans → batch → stdout | jaeger                   │  │
//!                 │  │   metrics → periodic reader → stdout                │  │
//!                 │  └─────────────────────────────────────────────────────┘  │
//!                 │  ┌─────────┐  ┌──────────────────────────────────────┐    │
//!                 │  │ config  │  │ lifecycle: startup / shutdown        │    │
//!                 │  └─────────┘  └──────────────────────────────────────┘    │
//!                 └──────────────────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod service;
pub mod store;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::{Service, Shutdown};
pub use observability::Telemetry;
