//! HTTP client abstraction for the Barracks API
//!
//! Provides endpoint URL templating, single-shot JSON requests and the page
//! traversal that feeds [`crate::stream::ResultStream`]s.

pub mod builder;
pub mod http;
pub mod request;
pub mod response;
pub mod uri;

pub use builder::create_http_client;
pub use http::{EndpointClient, StopCondition};
pub use request::{FormPart, RequestBody, RequestOptions, AUTH_TOKEN_HEADER};
pub use response::{ApiResponse, PageEnvelope};
