use super::{encode, BarracksApi};
use crate::error::Result;
use crate::stream::ResultStream;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `update create` / `update edit`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDraft {
    /// Display name
    pub name: String,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Package the update ships
    pub package_id: String,
    /// Segment the update targets; all devices when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<String>,
    /// Custom properties forwarded to devices
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub additional_properties: Value,
}

impl BarracksApi {
    /// All updates, newest first
    #[must_use]
    pub fn updates(&self) -> ResultStream {
        self.paged("getUpdates", self.options(), "updates")
    }

    /// Updates up to and including the page that contains `uuid`
    #[must_use]
    pub fn updates_until_uuid(&self, uuid: &str) -> ResultStream {
        let uuid = uuid.to_string();
        self.client
            .pages_until("getUpdates", self.options(), "updates", move |items| {
                items
                    .iter()
                    .any(|item| item.get("uuid").and_then(Value::as_str) == Some(uuid.as_str()))
            })
    }

    /// One update
    pub async fn update(&self, uuid: &str) -> Result<Value> {
        let options = self.options().path_variable("uuid", encode(uuid));
        self.fetch("getUpdate", options).await
    }

    /// Create a draft update
    pub async fn create_update(&self, draft: &UpdateDraft) -> Result<Value> {
        let options = self.options().json_from(draft)?;
        self.fetch("createUpdate", options).await
    }

    /// Replace the content of a draft update
    pub async fn edit_update(&self, uuid: &str, draft: &UpdateDraft) -> Result<Value> {
        let options = self
            .options()
            .path_variable("uuid", encode(uuid))
            .json_from(draft)?;
        self.fetch("editUpdate", options).await
    }

    /// Make an update available to devices
    pub async fn publish_update(&self, uuid: &str) -> Result<Value> {
        let options = self.options().path_variable("uuid", encode(uuid));
        self.fetch("publishUpdate", options).await
    }

    /// Withdraw an update
    pub async fn archive_update(&self, uuid: &str) -> Result<Value> {
        let options = self.options().path_variable("uuid", encode(uuid));
        self.fetch("archiveUpdate", options).await
    }

    /// Publish an update at `time` (RFC 3339)
    pub async fn schedule_update(&self, uuid: &str, time: &str) -> Result<Value> {
        let options = self
            .options()
            .path_variable("uuid", encode(uuid))
            .path_variable("time", encode(time));
        self.fetch("scheduleUpdate", options).await
    }
}
