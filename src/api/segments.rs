use super::{encode, BarracksApi};
use crate::error::Result;
use crate::stream::ResultStream;
use serde_json::{json, Value};

impl BarracksApi {
    /// All segments, in evaluation order
    #[must_use]
    pub fn segments(&self) -> ResultStream {
        self.paged("getSegments", self.options(), "segments")
    }

    /// Create a segment from a device query
    pub async fn create_segment(&self, name: &str, query: &Value) -> Result<Value> {
        let options = self.options().json(json!({
            "name": name,
            "query": query,
        }));
        self.fetch("createSegment", options).await
    }

    /// Set the evaluation order of active segments
    pub async fn update_segment_order(&self, segment_ids: &[String]) -> Result<Value> {
        let options = self.options().json(json!(segment_ids));
        self.fetch("updateSegmentOrder", options).await
    }

    /// Devices that currently fall into a segment
    #[must_use]
    pub fn segment_devices(&self, segment_id: &str) -> ResultStream {
        let options = self.options().path_variable("segmentId", encode(segment_id));
        self.paged("getSegmentDevices", options, "devices")
    }
}
