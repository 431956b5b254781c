use super::{encode, BarracksApi};
use crate::error::Result;
use crate::stream::ResultStream;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `hook create` / `hook edit`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookDraft {
    /// Unique hook name
    pub name: String,
    /// Event that triggers the hook, e.g. `ping` or `enrollment`
    pub event_type: String,
    /// Receiver URL
    pub url: String,
}

impl BarracksApi {
    /// All webhooks
    #[must_use]
    pub fn hooks(&self) -> ResultStream {
        self.paged("getHooks", self.options(), "webhooks")
    }

    /// One webhook
    pub async fn hook(&self, name: &str) -> Result<Value> {
        let options = self.options().path_variable("hook", encode(name));
        self.fetch("getHook", options).await
    }

    /// Register a webhook
    pub async fn create_hook(&self, draft: &HookDraft) -> Result<Value> {
        let options = self.options().json_from(draft)?;
        self.fetch("createHook", options).await
    }

    /// Replace a webhook
    pub async fn edit_hook(&self, name: &str, draft: &HookDraft) -> Result<Value> {
        let options = self
            .options()
            .path_variable("hook", encode(name))
            .json_from(draft)?;
        self.fetch("editHook", options).await
    }

    /// Remove a webhook
    pub async fn delete_hook(&self, name: &str) -> Result<()> {
        let options = self.options().path_variable("hook", encode(name));
        let _ = self.client.send_endpoint_request("deleteHook", &options).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::test_support::api_for;
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn edit_hook_puts_camel_case_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/member/webhooks/ci"))
            .and(body_json(json!({"name": "ci", "eventType": "ping", "url": "https://ci.example.com"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "ci"})))
            .expect(1)
            .mount(&server)
            .await;

        let draft = HookDraft {
            name: "ci".into(),
            event_type: "ping".into(),
            url: "https://ci.example.com".into(),
        };
        let hook = api_for(&server).edit_hook("ci", &draft).await.unwrap();
        assert_eq!(hook["name"], "ci");
    }

    #[tokio::test]
    async fn failed_delete_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/member/webhooks/ci"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = api_for(&server).delete_hook("ci").await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }
}
