// Application state module
// Shared, read-only state handed to every request

use std::sync::Arc;
use tokio::sync::Notify;

use super::types::Config;
use crate::relay::UpstreamClient;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Pooled HTTP client for upstream calls
    pub upstream: UpstreamClient,
    /// Notified once when the server should stop accepting connections
    pub shutdown_signal: Arc<Notify>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            config: config.clone(),
            upstream: UpstreamClient::new(&config.upstream)?,
            shutdown_signal: Arc::new(Notify::new()),
        })
    }
}
