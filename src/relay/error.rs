//! Relay error taxonomy.
//!
//! Every failure of a relay call ends up as one of these variants and is
//! rendered as a JSON `{"error": ...}` response at the handler boundary.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use thiserror::Error;

use crate::http;

#[derive(Debug, Error)]
pub enum RelayError {
    /// One or more upstream secrets are not configured.
    #[error("Server configuration missing. Set {} in environment variables.", .vars.join(", "))]
    Configuration { vars: &'static [&'static str] },

    /// A required query parameter is absent or empty.
    #[error("Missing required query parameter: {0}")]
    ClientInput(&'static str),

    /// The upstream login endpoint answered with a non-success status.
    #[error("{upstream} auth failed ({status}): {body}")]
    UpstreamAuth {
        upstream: String,
        status: u16,
        body: String,
    },

    /// Inbound body exceeds the configured limit.
    #[error("Request body too large (max: {max} bytes)")]
    PayloadTooLarge { max: u64 },

    /// Anything else: network failures, unreadable bodies, bad upstream URL.
    #[error("Proxy error: {0}")]
    Proxy(String),
}

impl RelayError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Configuration { .. } | Self::Proxy(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ClientInput(_) => StatusCode::BAD_REQUEST,
            Self::UpstreamAuth { .. } => StatusCode::UNAUTHORIZED,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        http::build_error_response(self.status(), &self.to_string())
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        Self::Proxy(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HOST_ENV, PASS_ENV, USER_ENV};

    #[test]
    fn test_configuration_message_lists_vars() {
        let err = RelayError::Configuration {
            vars: &[HOST_ENV, USER_ENV, PASS_ENV],
        };
        assert_eq!(
            err.to_string(),
            "Server configuration missing. Set TB_HOST, TB_USER, TB_PASS in environment variables."
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_auth_message_embeds_upstream_diagnostics() {
        let err = RelayError::UpstreamAuth {
            upstream: "ThingsBoard".to_string(),
            status: 403,
            body: "bad creds".to_string(),
        };
        assert_eq!(err.to_string(), "ThingsBoard auth failed (403): bad creds");
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            RelayError::ClientInput("path").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RelayError::Proxy("connection refused".to_string()).to_string(),
            "Proxy error: connection refused"
        );
        assert_eq!(
            RelayError::PayloadTooLarge { max: 10 }.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }
}
