use super::BarracksApi;
use crate::client::{RequestOptions, AUTH_TOKEN_HEADER};
use crate::error::{CliError, Result};
use serde_json::{json, Value};

impl BarracksApi {
    /// Exchange credentials for a session token
    ///
    /// The server returns the token in the `x-auth-token` response header;
    /// a `token` field in the body is accepted as well.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<String> {
        let options = RequestOptions::new().json(json!({
            "username": email,
            "password": password,
        }));
        let response = match self.client.send_endpoint_request("login", &options).await {
            Err(CliError::ApiError { status: 401 | 403, message }) => {
                return Err(CliError::AuthFailed(message));
            }
            other => other?,
        };

        response
            .header(AUTH_TOKEN_HEADER)
            .map(str::to_owned)
            .or_else(|| response.body.get("token").and_then(Value::as_str).map(str::to_owned))
            .filter(|token| !token.is_empty())
            .ok_or_else(|| CliError::InvalidResponse("login response carried no token".to_string()))
    }

    /// Account the current token belongs to
    pub async fn account(&self) -> Result<Value> {
        self.fetch("me", self.options()).await
    }
}
