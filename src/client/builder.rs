//! Shared HTTP client construction

use crate::error::{CliError, Result};
use reqwest::Client;
use std::time::Duration;

/// Create the HTTP client used for every Barracks API call
///
/// Features:
/// - Connection pooling and keep-alive (pages of one query reuse a connection)
/// - Bounded connect time so an unreachable server fails fast
/// - Overall request timeout taken from configuration
///
/// # Errors
///
/// Returns an error if the client cannot be built (e.g., TLS backend failure).
pub fn create_http_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .user_agent(concat!("barracks-cli/", env!("CARGO_PKG_VERSION")))
        .tcp_keepalive(Duration::from_secs(60))
        .pool_idle_timeout(Duration::from_secs(90))
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| CliError::Internal(format!("Failed to create HTTP client: {e}")))
}
