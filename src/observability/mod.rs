//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! startup:
//!     bootstrap.rs  → exporter.rs (pick span sink from selector)
//!                   → tracer provider (batching) + meter provider (periodic)
//!                   → metrics.rs (register instruments)
//!                   → Telemetry handle, shared via Arc
//!     store opened  → metrics.rs (pool gauges, sampled at each collection)
//!
//! per request:
//!     trace.rs (ScopedSpan: handler → business logic → query)
//!     metrics.rs (request counter, query duration histogram)
//!
//! always:
//!     logging.rs (structured log events, separate from exported spans)
//! ```
//!
//! # Design Decisions
//! - Providers are created exactly once and never reinitialized
//! - Telemetry is passed explicitly; the global registration is only for
//!   third-party instrumentation
//! - Export and flush failures never reach request handling

pub mod bootstrap;
pub mod exporter;
pub mod logging;
pub mod metrics;
pub mod trace;

pub use bootstrap::{initialize, InitError, Telemetry};
pub use exporter::{ExporterKind, TraceExporter};
pub use metrics::{Instruments, PoolGauges, PoolStats};
pub use trace::ScopedSpan;
