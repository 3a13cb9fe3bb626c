//! Body translation in both directions.
//!
//! Inbound bodies are re-serialized as JSON before forwarding; upstream
//! bodies are classified as empty, JSON or raw text before being returned.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response, StatusCode};
use serde_json::Value;

use crate::http;

/// Upstream response body after content negotiation
#[derive(Debug, Clone, PartialEq)]
pub enum RelayedBody {
    Empty,
    Json(Value),
    Text(String),
}

impl RelayedBody {
    /// Classify the raw upstream text. The declared upstream content type is
    /// not consulted; anything that parses as JSON is relayed as JSON.
    pub fn from_text(text: String) -> Self {
        if text.is_empty() {
            return Self::Empty;
        }
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(text),
        }
    }

    pub fn into_response(self, status: StatusCode) -> Response<Full<Bytes>> {
        match self {
            Self::Empty => http::build_empty_response(status),
            Self::Json(value) => http::build_json_response(status, &value),
            Self::Text(text) => http::build_text_response(status, text),
        }
    }
}

/// Whether the inbound method may carry a forwarded body
pub fn method_carries_body(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::HEAD)
}

/// Serialize an inbound body for the upstream call.
///
/// Empty bodies are dropped. JSON is forwarded in compact form; anything
/// else is forwarded as a JSON string.
pub fn serialize_inbound(raw: &[u8]) -> Result<Option<Vec<u8>>, serde_json::Error> {
    if raw.is_empty() {
        return Ok(None);
    }
    let value = serde_json::from_slice::<Value>(raw)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(raw).into_owned()));
    serde_json::to_vec(&value).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_text_is_empty_body() {
        assert_eq!(RelayedBody::from_text(String::new()), RelayedBody::Empty);
    }

    #[test]
    fn test_json_text_is_parsed() {
        assert_eq!(
            RelayedBody::from_text(r#"{"id":123}"#.to_string()),
            RelayedBody::Json(json!({ "id": 123 }))
        );
        assert_eq!(
            RelayedBody::from_text("42".to_string()),
            RelayedBody::Json(json!(42))
        );
    }

    #[test]
    fn test_non_json_falls_back_to_text() {
        assert_eq!(
            RelayedBody::from_text("plain text".to_string()),
            RelayedBody::Text("plain text".to_string())
        );
        assert_eq!(
            RelayedBody::from_text("{broken".to_string()),
            RelayedBody::Text("{broken".to_string())
        );
    }

    #[test]
    fn test_empty_response_keeps_status() {
        let resp = RelayedBody::Empty.into_response(StatusCode::NO_CONTENT);
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(resp.headers().get("content-type").is_none());
    }

    #[test]
    fn test_method_carries_body() {
        assert!(!method_carries_body(&Method::GET));
        assert!(!method_carries_body(&Method::HEAD));
        assert!(method_carries_body(&Method::POST));
        assert!(method_carries_body(&Method::PUT));
        assert!(method_carries_body(&Method::DELETE));
    }

    #[test]
    fn test_serialize_inbound() {
        assert_eq!(serialize_inbound(b"").unwrap(), None);
        assert_eq!(
            serialize_inbound(b"{ \"name\" : \"sensor\" }").unwrap(),
            Some(br#"{"name":"sensor"}"#.to_vec())
        );
        assert_eq!(
            serialize_inbound(b"hello").unwrap(),
            Some(br#""hello""#.to_vec())
        );
    }
}
