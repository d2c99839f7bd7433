//! Metrics collection and exposition.
//!
//! # Metrics
//! - `usermanager_requests_total` (counter): requests by method, route, status
//! - `usermanager_request_duration_seconds` (histogram): latency by method, route
//!
//! # Design Decisions
//! - Routes are labelled by their template (`/userinfo/{id}`), never the raw
//!   URI, to keep label cardinality bounded
//! - Without an installed recorder every call is a no-op

use std::net::SocketAddr;
use std::time::Instant;

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one completed request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!("usermanager_requests_total", &labels).increment(1);

    let labels = [("method", method.to_string()), ("route", route.to_string())];
    metrics::histogram!("usermanager_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

/// Route-layer middleware feeding [`record_request`].
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(&method, &route, response.status().as_u16(), start);
    response
}
