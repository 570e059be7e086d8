//! Span creation and scoped span lifetime.
//!
//! # Responsibilities
//! - Derive child spans from the span carried by a `Context`
//! - Tie a span's end to the scope that started it
//! - Record the outcome (ok / error / cancelled) exactly once
//!
//! # Design Decisions
//! - Contexts are never mutated; each span start derives a new one
//! - `ScopedSpan` ends its span on drop, so every exit path (`?`, early
//!   return, dropped future) closes it
//! - A span dropped without an outcome was cancelled and is marked as an error

use std::error::Error;

use opentelemetry::trace::{Status, TraceContextExt, TraceId, Tracer as _};
use opentelemetry::{Context, KeyValue};
use opentelemetry_sdk::trace::SdkTracer;

/// Tracer used for the inbound HTTP span.
pub const HANDLER_TRACER: &str = "handler";

/// Tracer used for business-logic and query spans.
pub const DB_TRACER: &str = "db";

/// Status description for spans whose scope was dropped before completing.
pub const CANCELLED: &str = "cancelled";

/// A span that is active for as long as this guard lives.
///
/// The guard owns the child `Context` carrying the span; pass
/// [`ScopedSpan::context`] down to start nested spans.
#[derive(Debug)]
pub struct ScopedSpan {
    cx: Context,
    settled: bool,
}

impl ScopedSpan {
    /// Start `name` as a child of the span in `parent`, or as a root span if
    /// `parent` carries none. `parent` itself is left untouched.
    pub fn start(tracer: &SdkTracer, parent: &Context, name: &'static str) -> Self {
        let span = tracer.start_with_context(name, parent);
        Self {
            cx: parent.with_span(span),
            settled: false,
        }
    }

    /// The context carrying this span as its active span.
    pub fn context(&self) -> &Context {
        &self.cx
    }

    pub fn trace_id(&self) -> TraceId {
        self.cx.span().span_context().trace_id()
    }

    pub fn set_attribute(&self, attribute: KeyValue) {
        self.cx.span().set_attribute(attribute);
    }

    /// Mark the operation as successful. Later outcomes are ignored.
    pub fn succeed(&mut self) {
        if !self.settled {
            self.cx.span().set_status(Status::Ok);
            self.settled = true;
        }
    }

    /// Mark the operation as failed with `err`. Later outcomes are ignored.
    pub fn fail(&mut self, err: &dyn Error) {
        if !self.settled {
            let span = self.cx.span();
            span.record_error(err);
            span.set_status(Status::error(err.to_string()));
            self.settled = true;
        }
    }
}

impl Drop for ScopedSpan {
    fn drop(&mut self) {
        let span = self.cx.span();
        if !self.settled {
            span.set_status(Status::error(CANCELLED));
        }
        span.end();
    }
}
