//! Client for the internal JSON API.
//!
//! Page handlers fetch their data from the API application rather than querying the
//! database themselves. The call is callback-shaped: [`ApiClient::call`] returns
//! immediately and the client invokes the callback once a response is available.
//! [`request`] adapts that shape to `async`/`await` for handler code.
//!
//! [`HttpApiClient`] is the production implementation. Tests substitute an
//! implementation that invokes the callback inline.

use std::collections::HashMap;

use reqwest::RequestBuilder;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::server::{config::ApiAppSettings, error::api::ApiError};

/// Form arguments of an API call.
pub type ApiArguments = HashMap<String, String>;

/// Continuation invoked exactly once with the outcome of an API call.
pub type ApiCallback = Box<dyn FnOnce(ApiResponse) + Send + 'static>;

/// Outcome of an API call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiResponse {
    /// Set when the call failed
    pub error: Option<ApiError>,
    /// Decoded JSON body, absent for empty responses
    pub body: Option<Value>,
}

impl ApiResponse {
    /// A successful response carrying `body`
    pub fn ok(body: Option<Value>) -> Self {
        Self { error: None, body }
    }

    /// A failed response
    pub fn failed(error: ApiError) -> Self {
        Self {
            error: Some(error),
            body: None,
        }
    }
}

/// Capability to call the internal API.
pub trait ApiClient: Send + Sync {
    /// Calls API `method` with `arguments` and hands the outcome to `callback`.
    ///
    /// Implementations must invoke `callback` exactly once.
    fn call(&self, method: &str, arguments: ApiArguments, callback: ApiCallback);
}

/// Calls the API and waits for the callback to fire.
///
/// # Returns
/// - `Ok(ApiResponse)` - The callback fired; the response may still carry an error
/// - `Err(ApiError::CallbackDropped)` - The client dropped the callback without calling it
pub async fn request(
    client: &dyn ApiClient,
    method: &str,
    arguments: ApiArguments,
) -> Result<ApiResponse, ApiError> {
    let (tx, rx) = oneshot::channel();

    client.call(
        method,
        arguments,
        Box::new(move |response: ApiResponse| {
            let _ = tx.send(response);
        }),
    );

    rx.await.map_err(|_| ApiError::CallbackDropped)
}

/// Production API client posting form-encoded arguments over HTTP.
///
/// `method` maps to `POST {base_url}/api/v1/{method}`. The request runs on a spawned task
/// and the callback is invoked from that task.
#[derive(Clone)]
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpApiClient {
    /// Creates a client for the configured API application
    pub fn new(api_app: &ApiAppSettings) -> Self {
        Self::with_base_url(api_app.base_url())
    }

    /// Creates a client for an explicit base URL such as `http://127.0.0.1:1234`
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// URL an API method is served at
    pub fn api_url(&self, method: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, method)
    }
}

impl ApiClient for HttpApiClient {
    fn call(&self, method: &str, arguments: ApiArguments, callback: ApiCallback) {
        let url = self.api_url(method);
        tracing::debug!(url = %url, "calling API");

        let request = self.http.post(url).form(&arguments);
        tokio::spawn(async move {
            callback(send(request).await);
        });
    }
}

async fn send(request: RequestBuilder) -> ApiResponse {
    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => return ApiResponse::failed(ApiError::Transport(e.to_string())),
    };

    let status = response.status();
    let text = match response.text().await {
        Ok(text) => text,
        Err(e) => return ApiResponse::failed(ApiError::Transport(e.to_string())),
    };

    if !status.is_success() {
        return ApiResponse::failed(ApiError::Status {
            status: status.as_u16(),
            body: text,
        });
    }

    if text.trim().is_empty() {
        return ApiResponse::ok(None);
    }

    match serde_json::from_str(&text) {
        Ok(body) => ApiResponse::ok(Some(body)),
        Err(e) => ApiResponse::failed(ApiError::Decode(e.to_string())),
    }
}
