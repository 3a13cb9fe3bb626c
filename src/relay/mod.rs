//! Relay handler
//!
//! Authenticate-then-forward: resolve credentials, log in to the upstream,
//! replay the inbound request with the fresh token and pass the upstream
//! status and body back. Every failure is turned into a JSON error response
//! here; nothing escapes to the connection layer.

mod body;
mod error;
mod upstream;

use body::RelayedBody;
pub use error::RelayError;
pub use upstream::UpstreamClient;

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::CONTENT_LENGTH;
use hyper::{Method, Request, Response, Uri};
use url::form_urlencoded;

use crate::config::AppState;
use crate::http;
use crate::logger;

/// Query parameter naming the upstream API path
pub const PATH_PARAM: &str = "path";

/// Handle one relay call
pub async fn relay<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match relay_inner(req, state).await {
        Ok(resp) => resp,
        Err(err) => {
            match &err {
                RelayError::Proxy(_) | RelayError::Configuration { .. } => {
                    logger::log_error(&err.to_string());
                }
                _ => logger::log_warning(&err.to_string()),
            }
            err.into_response()
        }
    }
}

async fn relay_inner<B>(req: Request<B>, state: &AppState) -> Result<Response<Full<Bytes>>, RelayError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    if req.method() == Method::OPTIONS {
        return Ok(http::build_options_response());
    }

    let creds = state
        .config
        .upstream
        .credentials()
        .map_err(|vars| RelayError::Configuration { vars })?;

    let path = query_param(req.uri(), PATH_PARAM).ok_or(RelayError::ClientInput(PATH_PARAM))?;

    let method = req.method().clone();
    let body = if body::method_carries_body(&method) {
        check_declared_length(&req, state.config.http.max_body_size)?;
        let raw = read_body(req.into_body(), state.config.http.max_body_size).await?;
        body::serialize_inbound(&raw).map_err(|e| RelayError::Proxy(e.to_string()))?
    } else {
        None
    };

    let token = state.upstream.login(&creds).await?;
    let (status, text) = state
        .upstream
        .forward(&creds, token, method, &path, body)
        .await?;

    Ok(RelayedBody::from_text(text).into_response(status))
}

/// Extract a non-empty, percent-decoded query parameter
pub fn query_param(uri: &Uri, name: &str) -> Option<String> {
    let query = uri.query()?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Reject a declared Content-Length above the limit before reading the body
fn check_declared_length<B>(req: &Request<B>, max_body_size: u64) -> Result<(), RelayError> {
    let Some(content_length) = req.headers().get(CONTENT_LENGTH) else {
        return Ok(());
    };
    let Ok(size_str) = content_length.to_str() else {
        logger::log_warning("Content-Length header contains non-ASCII characters");
        return Ok(());
    };
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => Err(RelayError::PayloadTooLarge { max: max_body_size }),
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Collect the inbound body, enforcing the size limit while streaming
async fn read_body<B>(body: B, max_body_size: u64) -> Result<Bytes, RelayError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => Err(RelayError::PayloadTooLarge {
            max: max_body_size,
        }),
        Err(e) => Err(RelayError::Proxy(e.to_string())),
    }
}
