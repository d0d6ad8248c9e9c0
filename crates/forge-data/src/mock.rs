//! A scripted transport for tests.
//!
//! [`MockTransport`] implements [`HttpTransport`] entirely in-memory: queue
//! up responses with [`expect`](MockTransport::expect), run the code under
//! test, then inspect the recorded requests and call
//! [`verify`](MockTransport::verify) to ensure every queued response was
//! consumed.
//!
//! # Example
//!
//! ```rust,ignore
//! let transport = Arc::new(MockTransport::new());
//! transport.expect(Response::json_body(&products)?);
//!
//! let client = FetchClient::new(transport.clone());
//! // ... exercise the code under test ...
//!
//! assert_eq!(transport.requests()[0].url, "https://api.example.com/products");
//! transport.verify();
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{FetchError, HttpTransport, Request, Response};

/// An in-memory transport that replays a queue of scripted outcomes.
///
/// Outcomes are consumed in FIFO order, one per executed request. A request
/// arriving with an empty queue panics; that is a test setup bug, not a
/// runtime condition.
#[derive(Default)]
pub struct MockTransport {
    outcomes: Mutex<VecDeque<Result<Response, FetchError>>>,
    requests: Mutex<Vec<Request>>,
}

impl MockTransport {
    /// Create a transport with no scripted outcomes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next unmatched request.
    pub fn expect(&self, response: Response) {
        self.outcomes.lock().unwrap().push_back(Ok(response));
    }

    /// Queue a transport-level failure for the next unmatched request.
    pub fn expect_err(&self, error: FetchError) {
        self.outcomes.lock().unwrap().push_back(Err(error));
    }

    /// Every request executed so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests executed so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Panics if any scripted outcome was never consumed.
    pub fn verify(&self) {
        let remaining = self.outcomes.lock().unwrap().len();
        if remaining > 0 {
            panic!("{remaining} scripted response(s) were never consumed");
        }
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: Request) -> Result<Response, FetchError> {
        let outcome = self.outcomes.lock().unwrap().pop_front();
        let label = format!("{} {}", request.method.as_str(), request.url);
        self.requests.lock().unwrap().push(request);
        match outcome {
            Some(outcome) => outcome,
            None => panic!("no scripted response for request: {label}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FetchClient, Method, RequestBuilder};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_outcomes_replay_in_order() {
        let transport = MockTransport::new();
        transport.expect(Response::status_only(200));
        transport.expect(Response::status_only(404));

        let first = transport
            .execute(RequestBuilder::new(Method::Get, "https://a.example").build())
            .await
            .unwrap();
        let second = transport
            .execute(RequestBuilder::new(Method::Get, "https://b.example").build())
            .await
            .unwrap();

        assert_eq!(first.status, 200);
        assert_eq!(second.status, 404);
        transport.verify();
    }

    #[tokio::test]
    async fn test_records_requests_for_inspection() {
        let transport = Arc::new(MockTransport::new());
        transport.expect(Response::status_only(200));

        let client = FetchClient::new(Arc::clone(&transport) as Arc<dyn HttpTransport>);
        client
            .get("https://api.example.com/products")
            .query("page", 1)
            .send()
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "https://api.example.com/products?page=1");
        assert_eq!(requests[0].method, Method::Get);
    }

    #[tokio::test]
    async fn test_scripted_error_surfaces() {
        let transport = MockTransport::new();
        transport.expect_err(FetchError::Connection("refused".to_string()));

        let result = transport
            .execute(RequestBuilder::new(Method::Get, "https://a.example").build())
            .await;
        assert!(matches!(result, Err(FetchError::Connection(_))));
    }

    #[tokio::test]
    #[should_panic(expected = "never consumed")]
    async fn test_verify_panics_on_leftover_outcomes() {
        let transport = MockTransport::new();
        transport.expect(Response::status_only(200));
        transport.verify();
    }
}
