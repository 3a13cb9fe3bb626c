// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Environment variable holding the upstream base URL
pub const HOST_ENV: &str = "TB_HOST";
/// Environment variable holding the upstream login username
pub const USER_ENV: &str = "TB_USER";
/// Environment variable holding the upstream login password
pub const PASS_ENV: &str = "TB_PASS";

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// `combined`, `common`, `json`, or a custom `$variable` pattern
    pub access_log_format: String,
    pub access_log_file: Option<String>,
    pub error_log_file: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Path the relay endpoint is mounted on
    pub relay_path: String,
    pub max_body_size: u64,
}

/// Routes configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RoutesConfig {
    /// Health check configuration
    #[serde(default)]
    pub health: HealthConfig,
}

/// Health check configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HealthConfig {
    /// Enable health check endpoint
    #[serde(default = "default_health_enabled")]
    pub enabled: bool,
    /// Liveness probe path (default: /healthz)
    #[serde(default = "default_healthz_path")]
    pub liveness_path: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_health_enabled() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_healthz_path() -> String {
    "/healthz".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_health_enabled(),
            liveness_path: default_healthz_path(),
        }
    }
}

/// Upstream IoT platform settings
///
/// The three secrets stay optional here: a relay started without them still
/// serves requests and answers each one with a configuration error.
#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    /// Display name used in authentication error messages
    pub name: String,
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub connect_timeout_secs: Option<u64>,
}

/// Validated upstream credentials for a single relay call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub host: String,
    pub username: String,
    pub password: String,
}

impl UpstreamConfig {
    /// Resolve credentials, treating unset and empty values alike.
    ///
    /// Returns the names of the environment variables to set when any
    /// secret is missing.
    pub fn credentials(&self) -> Result<Credentials, &'static [&'static str]> {
        let present = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_string);

        match (
            present(&self.host),
            present(&self.username),
            present(&self.password),
        ) {
            (Some(host), Some(username), Some(password)) => Ok(Credentials {
                host,
                username,
                password,
            }),
            _ => Err(&[HOST_ENV, USER_ENV, PASS_ENV]),
        }
    }

    /// Whether all three secrets are present
    pub fn is_complete(&self) -> bool {
        self.credentials().is_ok()
    }
}
