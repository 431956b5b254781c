//! Per-call request options
//!
//! Built by the API facade for every request and consumed by the endpoint
//! client: headers, path variables for the endpoint template, and an
//! optional JSON or multipart body.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Header carrying the session token
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Options for one endpoint request
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Extra request headers
    pub headers: BTreeMap<String, String>,
    /// Values substituted into `:name` placeholders of the path template
    pub path_variables: BTreeMap<String, String>,
    /// Request payload
    pub body: RequestBody,
}

/// Request payload
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    /// No body
    #[default]
    None,
    /// JSON document
    Json(Value),
    /// `multipart/form-data` parts
    Form(Vec<FormPart>),
}

/// One part of a multipart form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    /// Plain text field
    Text { name: String, value: String },
    /// File upload
    File {
        name: String,
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

impl RequestOptions {
    /// Empty options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the session token header, if a token is available
    #[must_use]
    pub fn with_auth_token(self, token: Option<&str>) -> Self {
        match token {
            Some(token) => self.header(AUTH_TOKEN_HEADER, token),
            None => self,
        }
    }

    /// Bind a path variable
    #[must_use]
    pub fn path_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.path_variables.insert(name.into(), value.into());
        self
    }

    /// Set a JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    /// Serialize `body` as the JSON payload
    ///
    /// # Errors
    ///
    /// Returns an error if `body` cannot be represented as JSON.
    pub fn json_from<T: Serialize>(self, body: &T) -> crate::Result<Self> {
        Ok(self.json(serde_json::to_value(body)?))
    }

    /// Set a multipart body
    #[must_use]
    pub fn form(mut self, parts: Vec<FormPart>) -> Self {
        self.body = RequestBody::Form(parts);
        self
    }
}
