// Configuration module entry point
// Loads layered configuration and exposes the shared application state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, Credentials, UpstreamConfig, HOST_ENV, PASS_ENV, USER_ENV};

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    ///
    /// Upstream secrets are taken from `TB_HOST`, `TB_USER` and `TB_PASS`
    /// when set, overriding anything in the file.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false));
        Self::build(builder)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, config::ConfigError> {
        let settings = builder
            .add_source(
                config::Environment::with_prefix("RELAY")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.relay_path", "/api/tb")?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("upstream.name", "ThingsBoard")?
            .set_override_option("upstream.host", std::env::var(HOST_ENV).ok())?
            .set_override_option("upstream.username", std::env::var(USER_ENV).ok())?
            .set_override_option("upstream.password", std::env::var(PASS_ENV).ok())?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
impl Config {
    /// Build configuration from an inline TOML document (tests only)
    pub fn from_toml(toml: &str) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml));
        Self::build(builder)
    }

    /// Configuration pointing at a test upstream with complete credentials
    pub fn for_upstream(host: &str) -> Self {
        let mut cfg = Self::from_toml("").expect("defaults must deserialize");
        cfg.logging.access_log = false;
        cfg.upstream.host = Some(host.to_string());
        cfg.upstream.username = Some("tenant@thingsboard.org".to_string());
        cfg.upstream.password = Some("tenant".to_string());
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::from_toml("").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.http.relay_path, "/api/tb");
        assert_eq!(cfg.http.max_body_size, 10_485_760);
        assert_eq!(cfg.upstream.name, "ThingsBoard");
        assert!(cfg.routes.health.enabled);
        assert_eq!(cfg.routes.health.liveness_path, "/healthz");
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_file_values_override_defaults() {
        let cfg = Config::from_toml(
            r#"
            [server]
            port = 9090

            [http]
            relay_path = "/relay"

            [upstream]
            name = "Demo"
            connect_timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.http.relay_path, "/relay");
        assert_eq!(cfg.upstream.name, "Demo");
        assert_eq!(cfg.upstream.connect_timeout_secs, Some(5));
    }

    #[test]
    fn test_invalid_socket_addr() {
        let mut cfg = Config::from_toml("").unwrap();
        cfg.server.host = "not an address".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }

    #[test]
    fn test_credentials_complete() {
        let cfg = Config::for_upstream("http://tb.local");
        let creds = cfg.upstream.credentials().unwrap();
        assert_eq!(creds.host, "http://tb.local");
        assert_eq!(creds.username, "tenant@thingsboard.org");
        assert!(cfg.upstream.is_complete());
    }

    #[test]
    fn test_credentials_missing_or_empty() {
        let mut cfg = Config::for_upstream("http://tb.local");
        cfg.upstream.password = None;
        assert_eq!(
            cfg.upstream.credentials().unwrap_err(),
            &[HOST_ENV, USER_ENV, PASS_ENV]
        );

        let mut cfg = Config::for_upstream("");
        cfg.upstream.username = Some("user".to_string());
        assert!(!cfg.upstream.is_complete());
    }
}
