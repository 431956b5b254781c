use super::{encode, BarracksApi};
use crate::error::Result;
use crate::stream::ResultStream;
use serde_json::{json, Value};

impl BarracksApi {
    /// All saved device filters
    #[must_use]
    pub fn filters(&self) -> ResultStream {
        self.paged("getFilters", self.options(), "filters")
    }

    /// One filter
    pub async fn filter(&self, name: &str) -> Result<Value> {
        let options = self.options().path_variable("filter", encode(name));
        self.fetch("getFilter", options).await
    }

    /// Save a device query under `name`
    pub async fn create_filter(&self, name: &str, query: &Value) -> Result<Value> {
        let options = self.options().json(json!({
            "name": name,
            "query": query,
        }));
        self.fetch("createFilter", options).await
    }

    /// Remove a filter
    pub async fn delete_filter(&self, name: &str) -> Result<()> {
        let options = self.options().path_variable("filter", encode(name));
        let _ = self.client.send_endpoint_request("deleteFilter", &options).await?;
        Ok(())
    }
}
