// Upstream client
// Login and forward calls against the IoT platform REST API

use reqwest::{header, Client, Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::RelayError;
use crate::config::{Credentials, UpstreamConfig};

const LOGIN_PATH: &str = "/api/auth/login";

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

/// Short-lived token from a single login; used for one forwarded call only
#[derive(Debug)]
pub struct SessionToken(String);

impl SessionToken {
    fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

pub struct UpstreamClient {
    http_client: Client,
    /// Name shown in auth failure messages
    name: String,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        // The upstream is an internal API; ignore system proxy variables
        let mut builder = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .no_proxy();
        if let Some(secs) = config.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http_client: builder.build()?,
            name: config.name.clone(),
        })
    }

    /// Authenticate with the configured username/password
    pub async fn login(&self, creds: &Credentials) -> Result<SessionToken, RelayError> {
        let resp = self
            .http_client
            .post(join_url(&creds.host, LOGIN_PATH))
            .json(&LoginRequest {
                username: &creds.username,
                password: &creds.password,
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await?;
            return Err(RelayError::UpstreamAuth {
                upstream: self.name.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let login: LoginResponse = resp.json().await?;
        Ok(SessionToken(login.token))
    }

    /// Replay a request against `<host><path>` with the session token
    ///
    /// Returns the upstream status and its body read as text.
    pub async fn forward(
        &self,
        creds: &Credentials,
        token: SessionToken,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<(StatusCode, String), RelayError> {
        let mut request = self
            .http_client
            .request(method, join_url(&creds.host, path))
            .header("X-Authorization", token.bearer())
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.body(body);
        }

        let resp = request.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        Ok((status, text))
    }
}

/// Join host and path without doubling or dropping the separating slash
pub fn join_url(host: &str, path: &str) -> String {
    let host = host.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{host}{path}")
    } else {
        format!("{host}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("http://tb.local:8080", "/api/device/info/1"),
            "http://tb.local:8080/api/device/info/1"
        );
        assert_eq!(
            join_url("http://tb.local/", "/api/auth/login"),
            "http://tb.local/api/auth/login"
        );
        assert_eq!(join_url("http://tb.local", "api/x"), "http://tb.local/api/x");
        assert_eq!(
            join_url("http://tb.local", "/api/tenant/devices?pageSize=10&page=0"),
            "http://tb.local/api/tenant/devices?pageSize=10&page=0"
        );
    }

    #[test]
    fn test_bearer_header_value() {
        assert_eq!(SessionToken("abc".to_string()).bearer(), "Bearer abc");
    }
}
