//! Barracks API facade
//!
//! Resource-oriented methods over the [`EndpointClient`]. Paged resources
//! come back as a [`ResultStream`]; everything else resolves to the decoded
//! JSON body.
//!
//! ```no_run
//! # async fn demo(api: barracks_cli::api::BarracksApi) -> barracks_cli::Result<()> {
//! let updates = api.updates().collect_items().await?;
//! # Ok(()) }
//! ```

use crate::client::{EndpointClient, RequestOptions};
use crate::error::Result;
use crate::stream::ResultStream;
use serde_json::Value;

mod account;
mod deployment_plans;
mod devices;
mod filters;
mod hooks;
mod packages;
mod segments;
mod tokens;
mod updates;

pub use hooks::HookDraft;
pub use packages::{PackageDraft, VersionUpload};
pub use updates::UpdateDraft;

/// Authenticated entry point to every Barracks resource
#[derive(Debug, Clone)]
pub struct BarracksApi {
    client: EndpointClient,
    token: Option<String>,
}

impl BarracksApi {
    /// Facade without credentials (enough for `login`)
    #[must_use]
    pub const fn anonymous(client: EndpointClient) -> Self {
        Self {
            client,
            token: None,
        }
    }

    /// Facade sending `token` with every request
    #[must_use]
    pub const fn authenticated(client: EndpointClient, token: String) -> Self {
        Self {
            client,
            token: Some(token),
        }
    }

    /// Underlying endpoint client
    #[must_use]
    pub const fn client(&self) -> &EndpointClient {
        &self.client
    }

    fn options(&self) -> RequestOptions {
        RequestOptions::new().with_auth_token(self.token.as_deref())
    }

    async fn fetch(&self, endpoint: &str, options: RequestOptions) -> Result<Value> {
        let response = self.client.send_endpoint_request(endpoint, &options).await?;
        Ok(response.into_body())
    }

    fn paged(&self, endpoint: &str, options: RequestOptions, embedded_key: &str) -> ResultStream {
        self.client.all_pages(endpoint, options, embedded_key)
    }
}

/// Percent-encode a value destined for a path placeholder
fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
