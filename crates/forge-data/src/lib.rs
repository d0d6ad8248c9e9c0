//! HTTP client utilities for StoreForge.
//!
//! Provides an ergonomic builder API for outbound requests with automatic
//! JSON handling. The actual network I/O goes through a [`HttpTransport`],
//! injected at client construction: Spin's outbound HTTP on WASM targets, a
//! scripted [`mock::MockTransport`] in tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use forge_data::{FetchClient, Method};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Product {
//!     id: u64,
//!     name: String,
//! }
//!
//! let client = FetchClient::new(transport)
//!     .with_base_url("https://api.example.com")
//!     .with_default_header("Accept", "application/json");
//!
//! let product: Product = client
//!     .get("/products/123")
//!     .send()
//!     .await?
//!     .error_for_status()?
//!     .json()?;
//! ```

mod error;
pub mod mock;
mod request;
mod response;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

pub use error::FetchError;
pub use request::{Method, Request, RequestBuilder};
pub use response::Response;

/// Executes a built [`Request`] against some backend.
///
/// Implementations own the actual I/O. A transport failure (no response at
/// all) surfaces as [`FetchError::Connection`]; an HTTP error status is NOT a
/// transport failure and comes back as a normal [`Response`].
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: Request) -> Result<Response, FetchError>;
}

/// HTTP client for making outbound requests.
#[derive(Clone)]
pub struct FetchClient {
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
    transport: Arc<dyn HttpTransport>,
}

impl FetchClient {
    /// Create a new HTTP client over the given transport.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: None,
            default_headers: HashMap::new(),
            transport,
        }
    }

    /// Create a client with a base URL that will be prepended to all requests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Post, url)
    }

    /// Create a PUT request.
    pub fn put(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Put, url)
    }

    /// Create a DELETE request.
    pub fn delete(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Delete, url)
    }

    /// Create a request with a custom method. Absolute URLs bypass the base
    /// URL; relative paths are appended to it.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder {
        let url = url.into();
        let full_url = match &self.base_url {
            Some(base) => {
                if url.starts_with("http://") || url.starts_with("https://") {
                    url
                } else {
                    format!("{}{}", base.trim_end_matches('/'), url)
                }
            }
            None => url,
        };

        let mut builder = RequestBuilder::new(method, full_url);
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }

        ClientRequestBuilder {
            builder,
            transport: Arc::clone(&self.transport),
        }
    }
}

/// A request builder bound to a client's transport.
pub struct ClientRequestBuilder {
    builder: RequestBuilder,
    transport: Arc<dyn HttpTransport>,
}

impl ClientRequestBuilder {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.builder = self.builder.query(key, value);
        self
    }

    /// Set the request body as raw bytes.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.builder = self.builder.body(body);
        self
    }

    /// Set the request body as a string.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.builder = self.builder.text(text);
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    /// Add a bearer token authorization header.
    pub fn bearer_auth(mut self, token: impl AsRef<str>) -> Self {
        self.builder = self.builder.bearer_auth(token);
        self
    }

    /// Add a basic authorization header.
    pub fn basic_auth(mut self, username: impl AsRef<str>, password: Option<&str>) -> Self {
        self.builder = self.builder.basic_auth(username, password);
        self
    }

    /// Send the request and return the response.
    pub async fn send(self) -> Result<Response, FetchError> {
        self.transport.execute(self.builder.build()).await
    }
}

/// Transport backed by Spin's outbound HTTP host call.
#[cfg(target_arch = "wasm32")]
pub struct SpinTransport;

#[cfg(target_arch = "wasm32")]
#[async_trait]
impl HttpTransport for SpinTransport {
    async fn execute(&self, request: Request) -> Result<Response, FetchError> {
        use spin_sdk::http::{Method as SpinMethod, Request as SpinRequest};

        let method = match request.method {
            Method::Get => SpinMethod::Get,
            Method::Post => SpinMethod::Post,
            Method::Put => SpinMethod::Put,
            Method::Patch => SpinMethod::Patch,
            Method::Delete => SpinMethod::Delete,
            Method::Head => SpinMethod::Head,
            Method::Options => SpinMethod::Options,
        };

        let mut builder = SpinRequest::builder();
        builder.method(method);
        builder.uri(&request.url);
        for (key, value) in &request.headers {
            builder.header(key.as_str(), value.as_str());
        }
        let spin_request = match request.body {
            Some(body) => builder
                .body(body)
                .map_err(|e| FetchError::Request(e.to_string()))?,
            None => builder.build(),
        };

        let response: spin_sdk::http::Response = spin_sdk::http::send(spin_request)
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        let status = response.status();
        let headers: HashMap<String, String> = response
            .headers()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();
        let body = response.into_body();

        Ok(Response::new(status, headers, body))
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, HttpTransport, Method, Request, Response};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;

    #[tokio::test]
    async fn test_base_url_prepended_to_relative_paths() {
        let transport = Arc::new(MockTransport::new());
        transport.expect(Response::status_only(200));

        let client = FetchClient::new(Arc::clone(&transport) as Arc<dyn HttpTransport>)
            .with_base_url("https://api.example.com/");
        client.get("/products").send().await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].url, "https://api.example.com/products");
    }

    #[tokio::test]
    async fn test_absolute_url_bypasses_base() {
        let transport = Arc::new(MockTransport::new());
        transport.expect(Response::status_only(200));

        let client = FetchClient::new(Arc::clone(&transport) as Arc<dyn HttpTransport>)
            .with_base_url("https://api.example.com");
        client.get("https://other.example.com/x").send().await.unwrap();

        assert_eq!(transport.requests()[0].url, "https://other.example.com/x");
    }

    #[tokio::test]
    async fn test_default_headers_applied() {
        let transport = Arc::new(MockTransport::new());
        transport.expect(Response::status_only(200));

        let client = FetchClient::new(Arc::clone(&transport) as Arc<dyn HttpTransport>)
            .with_default_header("Accept", "application/json");
        client.get("https://api.example.com").send().await.unwrap();

        let requests = transport.requests();
        assert_eq!(
            requests[0].headers.get("Accept").map(String::as_str),
            Some("application/json")
        );
    }
}
