//! Endpoint client: single requests and page traversal
//!
//! Single-shot calls go through [`EndpointClient::send_endpoint_request`].
//! Paged queries run as a background task that walks the `_links.next`
//! chain one page at a time and reports through a [`PageSink`]:
//!
//! ```text
//! GET url ──► error?        ── yes ──► fail(error)
//!    │ no
//!    ▼
//! _embedded? ── no ──► last_page()
//!    │ yes
//!    ▼
//! write(items) ──► next link && !stop(items) ── yes ──► GET next
//!                          │ no
//!                          ▼
//!                      last_page()
//! ```

use crate::client::request::{FormPart, RequestBody, RequestOptions};
use crate::client::response::{ApiResponse, PageEnvelope};
use crate::client::uri;
use crate::endpoints::EndpointRegistry;
use crate::error::{CliError, Result};
use crate::stream::{result_stream, PageSink, ResultStream};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use serde_json::Value;

/// Predicate over the items of the page just received; `true` stops traversal
pub type StopCondition = Box<dyn FnMut(&[Value]) -> bool + Send>;

/// HTTP client bound to the endpoint registry
#[derive(Debug, Clone)]
pub struct EndpointClient {
    http: Client,
    registry: EndpointRegistry,
}

impl EndpointClient {
    /// Create a client
    #[must_use]
    pub const fn new(http: Client, registry: EndpointRegistry) -> Self {
        Self { http, registry }
    }

    /// Endpoint registry in use
    #[must_use]
    pub const fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    /// Resolve an endpoint name and path variables into a URL
    ///
    /// # Errors
    ///
    /// Returns [`CliError::UnknownEndpoint`] for names missing from the registry.
    pub fn build_endpoint_uri(&self, name: &str, options: &RequestOptions) -> Result<String> {
        let endpoint = self.registry.endpoint(name)?;
        Ok(uri::build_endpoint_uri(
            self.registry.base_url(),
            endpoint.path,
            &options.path_variables,
        ))
    }

    /// Issue one request to a named endpoint using its declared method
    ///
    /// # Errors
    ///
    /// Fails with [`CliError::Transport`] when no response arrives and with
    /// [`CliError::ApiError`] on a non-2xx status. Nothing is retried.
    pub async fn send_endpoint_request(
        &self,
        name: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse> {
        let endpoint = self.registry.endpoint(name)?;
        let url = uri::build_endpoint_uri(
            self.registry.base_url(),
            endpoint.path,
            &options.path_variables,
        );
        tracing::debug!(endpoint = name, method = %endpoint.method, %url, "sending request");

        let request = self.http.request(endpoint.method.clone(), url.as_str());
        let request = with_headers(request, options);
        let request = match &options.body {
            RequestBody::None => request,
            RequestBody::Json(body) => request.json(body),
            RequestBody::Form(parts) => request.multipart(build_form(parts)?),
        };

        execute(request).await
    }

    /// Fetch every page of a paged endpoint into `sink`
    ///
    /// Returns immediately; results arrive through the sink.
    pub fn retrieve_all_pages(
        &self,
        sink: PageSink,
        name: &str,
        options: RequestOptions,
        embedded_key: &str,
    ) {
        self.spawn_traversal(sink, name, options, embedded_key, None);
    }

    /// Fetch pages into `sink` until `stop` holds for a received page
    ///
    /// The page that satisfies `stop` is still delivered. Returns immediately.
    pub fn retrieve_pages_until_condition<F>(
        &self,
        sink: PageSink,
        name: &str,
        options: RequestOptions,
        embedded_key: &str,
        stop: F,
    ) where
        F: FnMut(&[Value]) -> bool + Send + 'static,
    {
        self.spawn_traversal(sink, name, options, embedded_key, Some(Box::new(stop)));
    }

    /// Start a full traversal and return the consumer half of its stream
    #[must_use]
    pub fn all_pages(&self, name: &str, options: RequestOptions, embedded_key: &str) -> ResultStream {
        let (sink, stream) = result_stream();
        self.retrieve_all_pages(sink, name, options, embedded_key);
        stream
    }

    /// Start a traversal bounded by `stop` and return its stream
    #[must_use]
    pub fn pages_until<F>(
        &self,
        name: &str,
        options: RequestOptions,
        embedded_key: &str,
        stop: F,
    ) -> ResultStream
    where
        F: FnMut(&[Value]) -> bool + Send + 'static,
    {
        let (sink, stream) = result_stream();
        self.retrieve_pages_until_condition(sink, name, options, embedded_key, stop);
        stream
    }

    fn spawn_traversal(
        &self,
        sink: PageSink,
        name: &str,
        options: RequestOptions,
        embedded_key: &str,
        stop: Option<StopCondition>,
    ) {
        let url = match self.build_endpoint_uri(name, &options) {
            Ok(url) => url,
            Err(err) => {
                sink.fail(err);
                return;
            }
        };

        let client = self.clone();
        let embedded_key = embedded_key.to_string();
        drop(tokio::spawn(async move {
            client
                .retrieve_next_pages(sink, url, &options, &embedded_key, stop)
                .await;
        }));
    }

    /// Walk the page chain starting at `url`
    ///
    /// Every outcome is reported through `sink`; this never fails itself.
    /// Traversal also ends quietly once the consumer drops its stream.
    pub async fn retrieve_next_pages(
        &self,
        sink: PageSink,
        url: String,
        options: &RequestOptions,
        embedded_key: &str,
        mut stop: Option<StopCondition>,
    ) {
        let mut url = match parse_url(&url) {
            Ok(url) => url,
            Err(err) => {
                sink.fail(err);
                return;
            }
        };
        let mut page_number: usize = 1;

        loop {
            tracing::debug!(%url, page = page_number, embedded_key, "fetching page");
            let response = match execute(with_headers(self.http.get(url.clone()), options)).await {
                Ok(response) => response,
                Err(err) => {
                    tracing::debug!(%url, error = %err, "page request failed");
                    sink.fail(err);
                    return;
                }
            };

            let Some(page) = PageEnvelope::from_body(&response.body) else {
                tracing::debug!(%url, "response has no embedded collection, treating as end of results");
                sink.last_page();
                return;
            };

            let items = page.items(embedded_key);
            let next = page.next_href().map(str::to_owned);
            let halt = stop.as_mut().is_some_and(|stop| stop(&items));

            if !sink.write(items) {
                tracing::debug!(%url, "result stream dropped, stopping traversal");
                return;
            }

            match next {
                Some(href) if !halt => match resolve_link(&url, &href) {
                    Ok(next_url) => {
                        url = next_url;
                        page_number += 1;
                    }
                    Err(err) => {
                        sink.fail(err);
                        return;
                    }
                },
                _ => {
                    tracing::debug!(pages = page_number, stopped_early = halt, "traversal complete");
                    sink.last_page();
                    return;
                }
            }
        }
    }
}

fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| CliError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Resolve a `next` link relative to the page that carried it
fn resolve_link(current: &Url, href: &str) -> Result<Url> {
    current.join(href).map_err(|e| CliError::InvalidUrl {
        url: href.to_string(),
        reason: e.to_string(),
    })
}

fn with_headers(mut request: RequestBuilder, options: &RequestOptions) -> RequestBuilder {
    request = request.header(reqwest::header::ACCEPT, "application/json");
    for (name, value) in &options.headers {
        request = request.header(name.as_str(), value.as_str());
    }
    request
}

fn build_form(parts: &[FormPart]) -> Result<Form> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
            FormPart::File {
                name,
                file_name,
                mime,
                bytes,
            } => {
                let file = Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(mime)
                    .map_err(|e| CliError::InvalidArgument(format!("invalid MIME type '{mime}': {e}")))?;
                form.part(name.clone(), file)
            }
        };
    }
    Ok(form)
}

async fn execute(request: RequestBuilder) -> Result<ApiResponse> {
    let response = request.send().await?;
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.bytes().await?;
    let response = ApiResponse::from_parts(status.as_u16(), headers, &bytes);

    if !status.is_success() {
        let message = error_message(&response.body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
        return Err(CliError::ApiError {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response)
}

/// Human-readable message from an error body
fn error_message(body: &Value) -> Option<String> {
    match body {
        Value::Object(map) => ["message", "error", "detail"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_owned),
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        _ => None,
    }
}
