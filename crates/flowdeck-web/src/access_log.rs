//! Request logging for the flows API.

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, warn};

const FLOWS_PREFIX: &str = "/api/v1/flows/";

/// Id of the flow a request targets, for `/api/v1/flows/{id}[/...]` paths.
fn flow_id(path: &str) -> Option<&str> {
    let rest = path.strip_prefix(FLOWS_PREFIX)?;
    let id = rest.split('/').next()?;
    (!id.is_empty()).then_some(id)
}

/// Logs one line per API request with client, status, latency and, for
/// single-flow routes, the flow id. Swagger assets are not logged.
pub(crate) async fn access_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    if path.starts_with("/swagger-ui") || path.starts_with("/api-docs") {
        return next.run(req).await;
    }
    let client = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "-".to_owned());
    let flow = flow_id(&path).unwrap_or("-").to_owned();

    let started = Instant::now();
    let response = next.run(req).await;
    let latency_ms = started.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    if response.status().is_server_error() {
        warn!(client, flow, status, latency_ms, "{method} {path}");
    } else {
        info!(client, flow, status, latency_ms, "{method} {path}");
    }
    response
}
