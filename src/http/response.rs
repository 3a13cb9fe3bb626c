//! HTTP response building module
//!
//! Every builder here attaches the CORS headers so browser callers can read
//! the relayed result cross-origin, errors included.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};

pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_METHODS: &str = "GET,POST,DELETE,OPTIONS";
pub const CORS_ALLOW_HEADERS: &str = "Content-Type";

const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";
const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";

/// Response builder with status and CORS headers preset
fn cors_builder(status: StatusCode) -> Builder {
    Response::builder()
        .status(status)
        .header("Access-Control-Allow-Origin", CORS_ALLOW_ORIGIN)
        .header("Access-Control-Allow-Methods", CORS_ALLOW_METHODS)
        .header("Access-Control-Allow-Headers", CORS_ALLOW_HEADERS)
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response() -> Response<Full<Bytes>> {
    build_empty_response(StatusCode::NO_CONTENT)
}

/// Build a body-less response with the given status
pub fn build_empty_response(status: StatusCode) -> Response<Full<Bytes>> {
    cors_builder(status)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build JSON response from an already-parsed value
pub fn build_json_response(status: StatusCode, body: &serde_json::Value) -> Response<Full<Bytes>> {
    let json = match serde_json::to_vec(body) {
        Ok(j) => j,
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            return build_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Proxy error: {e}"),
            );
        }
    };

    cors_builder(status)
        .header("Content-Type", CONTENT_TYPE_JSON)
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build plain text response
pub fn build_text_response(status: StatusCode, text: String) -> Response<Full<Bytes>> {
    cors_builder(status)
        .header("Content-Type", CONTENT_TYPE_TEXT)
        .body(Full::new(Bytes::from(text)))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build `{"error": message}` response
pub fn build_error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "error": message });
    cors_builder(status)
        .header("Content-Type", CONTENT_TYPE_JSON)
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            Response::new(Full::new(Bytes::from(r#"{"error":"Internal server error"}"#)))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_error_response(StatusCode::NOT_FOUND, "Not Found")
}

/// Build health check response
pub fn build_health_response() -> Response<Full<Bytes>> {
    build_json_response(StatusCode::OK, &serde_json::json!({ "status": "ok" }))
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
