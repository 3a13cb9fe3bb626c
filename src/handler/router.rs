//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: route matching, dispatch to the
//! relay, and access logging. Body limits are enforced by the relay after its
//! preflight, configuration and path checks.

use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::relay;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let access_log = state.config.logging.access_log;
    let entry = access_log.then(|| access_entry(&req, peer_addr));

    let response = route_request(req, &state).await;

    if let Some(mut entry) = entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on path and configuration
async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let path = req.uri().path();

    // Health check endpoint (highest priority, never touches the upstream)
    let health = &state.config.routes.health;
    if health.enabled && path == health.liveness_path {
        return http::build_health_response();
    }

    if path == state.config.http.relay_path {
        return relay::relay(req, state).await;
    }

    http::build_404_response()
}

fn access_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let uri = req.uri();
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        uri.path().to_string(),
    );
    entry.query = uri.query().map(ToString::to_string);
    entry.upstream_path = relay::query_param(uri, relay::PATH_PARAM);
    entry.http_version = format!("{:?}", req.version())
        .trim_start_matches("HTTP/")
        .to_string();
    entry.user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    entry
}
