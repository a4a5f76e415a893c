// Logging Middleware
// Request spans and response/failure events for the tracing subscriber

use axum::http::Request;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tracing::{Level, Span};

type RequestSpan = fn(&Request<axum::body::Body>) -> Span;

fn request_span(req: &Request<axum::body::Body>) -> Span {
    tracing::info_span!("http", method = %req.method(), path = %req.uri().path())
}

/// Create logging layer for HTTP requests
pub fn logging_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpan> {
    TraceLayer::new_for_http()
        .make_span_with(request_span as RequestSpan)
        .on_response(DefaultOnResponse::new().level(Level::INFO))
        .on_failure(DefaultOnFailure::new().level(Level::WARN))
}
