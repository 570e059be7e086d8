//! Route handlers.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use opentelemetry::{Context, KeyValue};

use crate::http::request::request_id;
use crate::http::response::{ApiError, UserResponse};
use crate::http::server::AppState;
use crate::observability::ScopedSpan;

/// The lookup route, also used as the `route` metric attribute.
pub const USER_ROUTE: &str = "/user/{id}";

pub const HANDLER_SPAN: &str = "getUserHandler";

/// `GET /user/{id}`: resolve a user id to its name.
///
/// Opens the inbound (root) span, counts the request, and hands the span's
/// context to the business logic.
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<UserResponse>, ApiError> {
    let mut span = ScopedSpan::start(
        state.telemetry.handler_tracer(),
        &Context::new(),
        HANDLER_SPAN,
    );
    span.set_attribute(KeyValue::new("http.route", USER_ROUTE));
    if let Some(request_id) = request_id(&headers) {
        span.set_attribute(KeyValue::new("http.request_id", request_id.to_string()));
    }

    state.telemetry.instruments().record_request(USER_ROUTE);

    match state.users.fetch_user_by_id(span.context(), &id).await {
        Ok(name) => {
            span.set_attribute(KeyValue::new("http.response.status_code", 200_i64));
            span.succeed();
            Ok(Json(UserResponse { id, name }))
        }
        Err(e) => {
            let error = ApiError::from(&e);
            let status = error.status();
            span.set_attribute(KeyValue::new(
                "http.response.status_code",
                i64::from(status.as_u16()),
            ));
            if status.is_server_error() {
                tracing::error!(
                    user_id = %id,
                    trace_id = %span.trace_id(),
                    error = %e,
                    "User lookup failed"
                );
                span.fail(&e);
            } else {
                tracing::debug!(
                    user_id = %id,
                    trace_id = %span.trace_id(),
                    "User not found"
                );
                span.succeed();
            }
            Err(error)
        }
    }
}
