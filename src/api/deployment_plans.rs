use super::{encode, BarracksApi};
use crate::error::Result;
use serde_json::Value;

impl BarracksApi {
    /// Deployment plan of a package
    pub async fn deployment_plan(&self, reference: &str) -> Result<Value> {
        let options = self.options().path_variable("reference", encode(reference));
        self.fetch("getDeploymentPlan", options).await
    }

    /// Replace the deployment plan of a package
    pub async fn publish_deployment_plan(&self, reference: &str, plan: Value) -> Result<Value> {
        let options = self
            .options()
            .path_variable("reference", encode(reference))
            .json(plan);
        self.fetch("publishDeploymentPlan", options).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::test_support::api_for;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn plan_is_posted_verbatim() {
        let server = MockServer::start().await;
        let plan = json!({"package": "app", "rules": [{"filter": "eu", "version": "1.0"}]});
        Mock::given(method("POST"))
            .and(path("/api/member/packages/app/deployment-plan"))
            .and(body_json(plan.clone()))
            .respond_with(ResponseTemplate::new(201).set_body_json(plan.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let saved = api_for(&server)
            .publish_deployment_plan("app", plan.clone())
            .await
            .unwrap();
        assert_eq!(saved, plan);
    }
}
