//! Static registry of Barracks API endpoints
//!
//! Each endpoint maps a logical name to an HTTP method and a path template.
//! Templates use `:name` placeholders that are filled from request path
//! variables when the URL is built.

use crate::error::{CliError, Result};
use reqwest::{Method, Url};

/// A named server operation: HTTP method plus path template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Logical name used by the API facade
    pub name: &'static str,
    /// HTTP method declared for the operation
    pub method: Method,
    /// Path template relative to the base URL, with `:variable` placeholders
    pub path: &'static str,
}

const fn endpoint(name: &'static str, method: Method, path: &'static str) -> Endpoint {
    Endpoint { name, method, path }
}

/// Every endpoint the CLI knows how to call
pub static ENDPOINTS: &[Endpoint] = &[
    // Account
    endpoint("login", Method::POST, "/api/auth/login"),
    endpoint("me", Method::GET, "/api/me"),
    // Updates
    endpoint("getUpdates", Method::GET, "/api/member/updates"),
    endpoint("getUpdate", Method::GET, "/api/member/updates/:uuid"),
    endpoint("createUpdate", Method::POST, "/api/member/updates"),
    endpoint("editUpdate", Method::PUT, "/api/member/updates/:uuid"),
    endpoint(
        "publishUpdate",
        Method::PUT,
        "/api/member/updates/:uuid/status/published",
    ),
    endpoint(
        "archiveUpdate",
        Method::PUT,
        "/api/member/updates/:uuid/status/archived",
    ),
    endpoint(
        "scheduleUpdate",
        Method::PUT,
        "/api/member/updates/:uuid/status/scheduled?time=:time",
    ),
    // Packages and versions
    endpoint("getPackages", Method::GET, "/api/member/packages"),
    endpoint("getPackage", Method::GET, "/api/member/packages/:reference"),
    endpoint("createPackage", Method::POST, "/api/member/packages"),
    endpoint(
        "getVersions",
        Method::GET,
        "/api/member/packages/:reference/versions",
    ),
    endpoint(
        "getVersion",
        Method::GET,
        "/api/member/packages/:reference/versions/:version",
    ),
    endpoint(
        "createVersion",
        Method::POST,
        "/api/member/packages/:reference/versions",
    ),
    // Segments
    endpoint("getSegments", Method::GET, "/api/member/segments"),
    endpoint("createSegment", Method::POST, "/api/member/segments"),
    endpoint("updateSegmentOrder", Method::PUT, "/api/member/segments/order"),
    endpoint(
        "getSegmentDevices",
        Method::GET,
        "/api/member/segments/:segmentId/devices",
    ),
    // Filters
    endpoint("getFilters", Method::GET, "/api/member/filters"),
    endpoint("getFilter", Method::GET, "/api/member/filters/:filter"),
    endpoint("createFilter", Method::POST, "/api/member/filters"),
    endpoint("deleteFilter", Method::DELETE, "/api/member/filters/:filter"),
    // Devices
    endpoint("getDevices", Method::GET, "/api/member/devices"),
    endpoint(
        "getDevicesFiltered",
        Method::GET,
        "/api/member/devices?query=:query",
    ),
    endpoint("getDevice", Method::GET, "/api/member/devices/:unitId"),
    endpoint(
        "getDeviceEvents",
        Method::GET,
        "/api/member/devices/:unitId/events",
    ),
    // Hooks
    endpoint("getHooks", Method::GET, "/api/member/webhooks"),
    endpoint("getHook", Method::GET, "/api/member/webhooks/:hook"),
    endpoint("createHook", Method::POST, "/api/member/webhooks"),
    endpoint("editHook", Method::PUT, "/api/member/webhooks/:hook"),
    endpoint("deleteHook", Method::DELETE, "/api/member/webhooks/:hook"),
    // Deployment plans
    endpoint(
        "getDeploymentPlan",
        Method::GET,
        "/api/member/packages/:reference/deployment-plan",
    ),
    endpoint(
        "publishDeploymentPlan",
        Method::POST,
        "/api/member/packages/:reference/deployment-plan",
    ),
    // Personal API tokens
    endpoint("getTokens", Method::GET, "/api/member/personal-api-keys"),
    endpoint("createToken", Method::POST, "/api/member/personal-api-keys"),
    endpoint(
        "revokeToken",
        Method::DELETE,
        "/api/member/personal-api-keys/:token",
    ),
];

/// Endpoint table bound to the server it targets
#[derive(Debug, Clone)]
pub struct EndpointRegistry {
    base_url: Url,
}

impl EndpointRegistry {
    /// Create a registry for the given server
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    /// Parse `base_url` and create a registry for it
    ///
    /// # Errors
    ///
    /// Returns [`CliError::InvalidUrl`] when the URL cannot be parsed.
    pub fn from_base_url(base_url: &str) -> Result<Self> {
        let url = Url::parse(base_url).map_err(|e| CliError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(url))
    }

    /// Server every endpoint is resolved against
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Look up an endpoint by name
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&'static Endpoint> {
        ENDPOINTS.iter().find(|endpoint| endpoint.name == name)
    }

    /// Look up an endpoint by name, failing on unknown names
    ///
    /// # Errors
    ///
    /// Returns [`CliError::UnknownEndpoint`]; this is a programming error in
    /// the caller, never something user input can trigger.
    pub fn endpoint(&self, name: &str) -> Result<&'static Endpoint> {
        self.lookup(name)
            .ok_or_else(|| CliError::UnknownEndpoint(name.to_string()))
    }
}
