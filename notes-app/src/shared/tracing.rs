use axum::{extract::Request, Router};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::{self, TraceLayer},
};
use tracing::Span;
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::Config;

pub const DEFAULT_FILTER: &str = "notes_app=debug,tower_http=debug,axum::rejection=trace";

pub fn setup_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let tracing = tracing_subscriber::registry().with(filter);

    if config.log_json {
        tracing.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        tracing.with(tracing_subscriber::fmt::layer()).init();
    };
}

/// One span per request, tagged with the `x-request-id` set below it.
fn request_span(request: &Request) -> Span {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or_default();

    tracing::debug_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id,
    )
}

pub fn add_tracing_layer(app: Router) -> Router {
    app.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(request_span)
                    .on_response(trace::DefaultOnResponse::new().include_headers(false))
                    .on_failure(trace::DefaultOnFailure::new()),
            ),
    )
}
