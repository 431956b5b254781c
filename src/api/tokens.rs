use super::{encode, BarracksApi};
use crate::error::Result;
use crate::stream::ResultStream;
use serde_json::{json, Value};

impl BarracksApi {
    /// Personal API tokens of the account
    #[must_use]
    pub fn tokens(&self) -> ResultStream {
        self.paged("getTokens", self.options(), "personalApiKeys")
    }

    /// Issue a personal API token
    pub async fn create_token(&self, label: &str) -> Result<Value> {
        let options = self.options().json(json!({ "label": label }));
        self.fetch("createToken", options).await
    }

    /// Revoke a personal API token
    pub async fn revoke_token(&self, token: &str) -> Result<()> {
        let options = self.options().path_variable("token", encode(token));
        let _ = self.client.send_endpoint_request("revokeToken", &options).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::test_support::api_for;
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn tokens_use_their_embedded_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/member/personal-api-keys"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_embedded": {"personalApiKeys": [{"id": "k1", "label": "ci"}]}
            })))
            .mount(&server)
            .await;

        let tokens = api_for(&server).tokens().collect_items().await.unwrap();
        assert_eq!(tokens, vec![json!({"id": "k1", "label": "ci"})]);
    }

    #[tokio::test]
    async fn revoke_targets_the_token_path() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/member/personal-api-keys/k1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        api_for(&server).revoke_token("k1").await.unwrap();
    }
}
