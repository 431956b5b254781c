//! Decoded API responses and HAL-style page envelopes
//!
//! Paged endpoints answer with
//!
//! ```json
//! { "_embedded": { "updates": [ ... ] }, "_links": { "next": { "href": "..." } } }
//! ```
//!
//! A body without `_embedded` is not a page.

use crate::error::{CliError, Result};
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Full response of a single endpoint request
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Decoded body: `Null` when empty, a JSON string when not JSON
    pub body: Value,
}

impl ApiResponse {
    /// Build a response from raw parts
    #[must_use]
    pub fn from_parts(status: u16, headers: HeaderMap, bytes: &[u8]) -> Self {
        Self {
            status,
            headers,
            body: decode_body(bytes),
        }
    }

    /// Header value as text, if present and valid UTF-8
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Deserialize the body into `T`
    ///
    /// # Errors
    ///
    /// Returns [`CliError::DeserializationError`] when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.body.clone())
            .map_err(|e| CliError::DeserializationError(e.to_string()))
    }

    /// Consume the response, keeping only the body
    #[must_use]
    pub fn into_body(self) -> Value {
        self.body
    }
}

/// Decode a response body leniently
#[must_use]
pub fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Borrowed view of a page envelope
#[derive(Debug, Clone, Copy)]
pub struct PageEnvelope<'a> {
    embedded: &'a Value,
    links: Option<&'a Value>,
}

impl<'a> PageEnvelope<'a> {
    /// View `body` as a page; `None` when it has no `_embedded` wrapper
    #[must_use]
    pub fn from_body(body: &'a Value) -> Option<Self> {
        let embedded = body.get("_embedded")?;
        Some(Self {
            embedded,
            links: body.get("_links"),
        })
    }

    /// Items embedded under `key`; empty when the key is missing
    #[must_use]
    pub fn items(&self, key: &str) -> Vec<Value> {
        match self.embedded.get(key) {
            Some(Value::Array(items)) => items.clone(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => vec![other.clone()],
        }
    }

    /// Target of the `next` link, if more pages exist
    #[must_use]
    pub fn next_href(&self) -> Option<&'a str> {
        self.links?.get("next")?.get("href")?.as_str()
    }
}
