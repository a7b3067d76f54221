//! Request handling for the demo host service

use gateway_client::AgentMetrics;
use gateway_core::{HealthSnapshot, HttpRouter};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Request, Response, StatusCode};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

pub struct HostState {
    pub service_name: String,
    pub router: HttpRouter,
    pub health: watch::Receiver<HealthSnapshot>,
    pub metrics: AgentMetrics,
}

pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<HostState>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    debug!("{} {}", method, path);

    let response = match (method.as_str(), path.as_str()) {
        ("GET", "/metrics") => match state.metrics.gather() {
            Ok(text) => respond(StatusCode::OK, "text/plain; version=0.0.4", text),
            Err(e) => respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                "text/plain",
                format!("Failed to gather metrics: {}\n", e),
            ),
        },
        ("GET", "/healthz") => {
            let snapshot = state.health.borrow().clone();
            let status = if snapshot.is_healthy {
                StatusCode::OK
            } else {
                StatusCode::SERVICE_UNAVAILABLE
            };
            json(status, serde_json::to_value(&snapshot).unwrap_or_default())
        }
        _ => match state.router.find(&method, &path) {
            Some(route) => json(
                StatusCode::OK,
                serde_json::json!({
                    "service": state.service_name,
                    "route": route.path,
                    "method": route.method,
                }),
            ),
            None => respond(StatusCode::NOT_FOUND, "text/plain", format!("Not Found: {}\n", path)),
        },
    };

    Ok(response)
}

fn json(status: StatusCode, body: serde_json::Value) -> Response<Full<Bytes>> {
    respond(status, "application/json", body.to_string())
}

fn respond(status: StatusCode, content_type: &'static str, body: String) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
