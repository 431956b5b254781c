use super::{encode, BarracksApi};
use crate::client::FormPart;
use crate::error::Result;
use crate::stream::ResultStream;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Body of `package create`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDraft {
    /// Unique reference, e.g. `io.barracks.app`
    pub reference: String,
    /// Display name
    pub name: String,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A package version together with its binary
#[derive(Debug, Clone, PartialEq)]
pub struct VersionUpload {
    /// Version identifier, e.g. `1.0.2`
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: Option<String>,
    /// Custom metadata stored with the version
    pub metadata: Value,
    /// File name reported to the server
    pub file_name: String,
    /// Binary content
    pub bytes: Vec<u8>,
}

impl VersionUpload {
    fn form_parts(&self) -> Vec<FormPart> {
        let mut version = json!({
            "id": self.id,
            "name": self.name,
        });
        if let Some(description) = &self.description {
            version["description"] = json!(description);
        }
        if !self.metadata.is_null() {
            version["metadata"] = self.metadata.clone();
        }

        vec![
            FormPart::Text {
                name: "version".to_string(),
                value: version.to_string(),
            },
            FormPart::File {
                name: "file".to_string(),
                file_name: self.file_name.clone(),
                mime: "application/octet-stream".to_string(),
                bytes: self.bytes.clone(),
            },
        ]
    }
}

impl BarracksApi {
    /// All packages
    #[must_use]
    pub fn packages(&self) -> ResultStream {
        self.paged("getPackages", self.options(), "packages")
    }

    /// One package
    pub async fn package(&self, reference: &str) -> Result<Value> {
        let options = self.options().path_variable("reference", encode(reference));
        self.fetch("getPackage", options).await
    }

    /// Register a package
    pub async fn create_package(&self, draft: &PackageDraft) -> Result<Value> {
        let options = self.options().json_from(draft)?;
        self.fetch("createPackage", options).await
    }

    /// All versions of a package
    #[must_use]
    pub fn versions(&self, reference: &str) -> ResultStream {
        let options = self.options().path_variable("reference", encode(reference));
        self.paged("getVersions", options, "versions")
    }

    /// One version of a package
    pub async fn version(&self, reference: &str, version: &str) -> Result<Value> {
        let options = self
            .options()
            .path_variable("reference", encode(reference))
            .path_variable("version", encode(version));
        self.fetch("getVersion", options).await
    }

    /// Upload a new version of a package
    pub async fn create_version(&self, reference: &str, upload: &VersionUpload) -> Result<Value> {
        let options = self
            .options()
            .path_variable("reference", encode(reference))
            .form(upload.form_parts());
        self.fetch("createVersion", options).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::test_support::api_for;
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn upload() -> VersionUpload {
        VersionUpload {
            id: "1.0.2".into(),
            name: "Hotfix".into(),
            description: None,
            metadata: json!({"channel": "beta"}),
            file_name: "firmware.bin".into(),
            bytes: b"\x7fELF".to_vec(),
        }
    }

    #[test]
    fn version_metadata_travels_as_json_text_part() {
        let parts = upload().form_parts();
        let FormPart::Text { name, value } = &parts[0] else {
            panic!("first part should be text");
        };
        assert_eq!(name, "version");
        let version: Value = serde_json::from_str(value).unwrap();
        assert_eq!(
            version,
            json!({"id": "1.0.2", "name": "Hotfix", "metadata": {"channel": "beta"}})
        );
        assert!(matches!(&parts[1], FormPart::File { file_name, .. } if file_name == "firmware.bin"));
    }

    #[tokio::test]
    async fn references_are_percent_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/member/packages/my%20app/versions/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "1.0"})))
            .expect(1)
            .mount(&server)
            .await;

        let version = api_for(&server).version("my app", "1.0").await.unwrap();
        assert_eq!(version["id"], "1.0");
    }

    #[tokio::test]
    async fn versions_are_paged_under_their_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/member/packages/app/versions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_embedded": {"versions": [{"id": "1.0"}, {"id": "1.1"}]},
                "_links": {}
            })))
            .mount(&server)
            .await;

        let versions = api_for(&server).versions("app").collect_items().await.unwrap();
        assert_eq!(versions, vec![json!({"id": "1.0"}), json!({"id": "1.1"})]);
    }

    #[tokio::test]
    async fn create_version_uploads_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/member/packages/app/versions"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "1.0.2"})))
            .expect(1)
            .mount(&server)
            .await;

        let created = api_for(&server).create_version("app", &upload()).await.unwrap();
        assert_eq!(created["id"], "1.0.2");
    }
}
