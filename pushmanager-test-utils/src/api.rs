//! In-process stand-in for the internal API.

use std::sync::{Arc, Mutex, PoisonError};

use pushmanager::server::api::{ApiArguments, ApiCallback, ApiClient, ApiResponse};
use serde_json::Value;

use crate::fixtures::server::Stopper;

/// Produces the response of every mocked call.
pub type ResponseProducer = Arc<dyn Fn() -> ApiResponse + Send + Sync>;

/// One call received by a [`MockedApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: String,
    pub arguments: ApiArguments,
}

/// API client that answers inline.
///
/// `call` builds the response from the producer, hands it to the callback before
/// returning, then stops the test's [`Stopper`] so a pending `wait()` completes.
pub struct MockedApiClient {
    producer: ResponseProducer,
    stopper: Stopper,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockedApiClient {
    pub fn new(
        producer: impl Fn() -> ApiResponse + Send + Sync + 'static,
        stopper: Stopper,
    ) -> Self {
        Self {
            producer: Arc::new(producer),
            stopper,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A client answering every call successfully with `body`
    pub fn returning(body: Option<Value>, stopper: Stopper) -> Self {
        Self::new(move || ApiResponse::ok(body.clone()), stopper)
    }

    /// Calls received so far, oldest first
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ApiClient for MockedApiClient {
    fn call(&self, method: &str, arguments: ApiArguments, callback: ApiCallback) {
        tracing::debug!(method = %method, "mocked API call");

        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                method: method.to_string(),
                arguments,
            });

        callback((self.producer)());
        self.stopper.stop();
    }
}
