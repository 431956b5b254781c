//! Default configuration values

/// Default API server URL
pub fn default_base_url() -> String {
    "https://app.barracks.io".to_string()
}

/// Default request timeout in seconds
pub const fn default_timeout() -> u64 {
    30
}

/// Environment variable overriding the API server URL
pub const BASE_URL_ENV: &str = "BARRACKS_BASE_URL";

/// Environment variable overriding the request timeout
pub const TIMEOUT_ENV: &str = "BARRACKS_TIMEOUT_SECS";

/// Environment variable holding an API key, used instead of a saved session
pub const API_KEY_ENV: &str = "BARRACKS_API_KEY";
