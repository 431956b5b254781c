use super::{encode, BarracksApi};
use crate::error::Result;
use crate::stream::ResultStream;
use serde_json::Value;

impl BarracksApi {
    /// All devices that ever contacted the server
    #[must_use]
    pub fn devices(&self) -> ResultStream {
        self.paged("getDevices", self.options(), "devices")
    }

    /// Devices matching a JSON query
    #[must_use]
    pub fn devices_matching(&self, query: &Value) -> ResultStream {
        let options = self
            .options()
            .path_variable("query", encode(&query.to_string()));
        self.paged("getDevicesFiltered", options, "devices")
    }

    /// One device
    pub async fn device(&self, unit_id: &str) -> Result<Value> {
        let options = self.options().path_variable("unitId", encode(unit_id));
        self.fetch("getDevice", options).await
    }

    /// Events reported by a device, newest first
    ///
    /// With a `limit`, fetching stops once at least that many events have
    /// been received; the page that crosses the limit is delivered whole.
    #[must_use]
    pub fn device_events(&self, unit_id: &str, limit: Option<usize>) -> ResultStream {
        let options = self.options().path_variable("unitId", encode(unit_id));
        match limit {
            None => self.paged("getDeviceEvents", options, "events"),
            Some(limit) => {
                let mut received = 0usize;
                self.client
                    .pages_until("getDeviceEvents", options, "events", move |items| {
                        received += items.len();
                        received >= limit
                    })
            }
        }
    }
}
