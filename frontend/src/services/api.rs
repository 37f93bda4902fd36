use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::ErrorBody;

use crate::services::config::ClientConfig;
use crate::services::notifications::{Notification, Notifier};

/// Fallback shown when the service rejects a call without a usable detail
pub const GENERIC_SERVICE_MESSAGE: &str = "An error occurred";
pub const UNREACHABLE_MESSAGE: &str = "Unable to connect to server. Please check your connection.";
pub const CLIENT_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Classified failure of a single call
///
/// `Display` is the text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The service answered and rejected the request
    #[error("{message}")]
    Service { status: u16, message: String },
    /// The request went out but no response came back (network, timeout)
    #[error("Unable to connect to server. Please check your connection.")]
    Unreachable { reason: String },
    /// Local fault building the request or reading its payload
    #[error("An unexpected error occurred")]
    Client { reason: String },
}

/// Failure reported by a `Transport` before any classification
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportFailure {
    #[error("no response: {0}")]
    NoResponse(String),
    #[error("request could not be prepared: {0}")]
    Local(String),
}

/// A fully resolved request handed to a transport
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<String>,
}

/// Status and body of a delivered response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Moves a request to the collection service and back
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<RawResponse, TransportFailure>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Client {
                reason: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: HttpRequest) -> Result<RawResponse, TransportFailure> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = request.body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_builder() {
                TransportFailure::Local(e.to_string())
            } else {
                TransportFailure::NoResponse(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        // A body cut off mid-stream is a network fault; no usable response arrived
        let body = response
            .text()
            .await
            .map_err(|e| TransportFailure::NoResponse(e.to_string()))?;

        Ok(RawResponse { status, body })
    }
}

/// One operation against the collection service, described relative to the base endpoint
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    segments: Vec<String>,
    body: Option<Result<String, String>>,
}

impl ApiRequest {
    fn new(method: Method, segments: &[&str]) -> Self {
        Self {
            method,
            segments: segments.iter().map(|s| s.to_string()).collect(),
            body: None,
        }
    }

    pub fn get(segments: &[&str]) -> Self {
        Self::new(Method::GET, segments)
    }

    pub fn post(segments: &[&str]) -> Self {
        Self::new(Method::POST, segments)
    }

    pub fn delete(segments: &[&str]) -> Self {
        Self::new(Method::DELETE, segments)
    }

    /// Attach a JSON body. Encoding failures surface when the request is sent.
    pub fn json<T: Serialize>(mut self, body: &T) -> Self {
        self.body = Some(serde_json::to_string(body).map_err(|e| e.to_string()));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Unencoded path, for logs
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path())
    }
}

/// Client for the remote collection service
///
/// Every failed call is classified into an `ApiError` and produces exactly one
/// error notification. Successful calls are silent; callers decide on
/// success messaging.
#[derive(Clone)]
pub struct ApiClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
}

impl ApiClient {
    /// Create a client talking HTTP to the configured base endpoint
    pub fn new(config: &ClientConfig, notifier: Arc<dyn Notifier>) -> Result<Self, ApiError> {
        let transport = Arc::new(HttpTransport::new(config.request_timeout)?);
        Ok(Self::with_transport(config, transport, notifier))
    }

    /// Create a client over an arbitrary transport
    pub fn with_transport(
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config: config.clone(),
            transport,
            notifier,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Notification sink shared with the views built on this client
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        Arc::clone(&self.notifier)
    }

    /// Send a request and decode its JSON payload
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.dispatch(&request).await?;

        serde_json::from_str(&response.body).map_err(|e| {
            self.fail(
                &request,
                ApiError::Client {
                    reason: format!("failed to decode response: {}", e),
                },
            )
        })
    }

    /// Send a request whose success payload carries nothing of interest
    pub async fn execute(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.dispatch(&request).await.map(|_| ())
    }

    async fn dispatch(&self, request: &ApiRequest) -> Result<RawResponse, ApiError> {
        tracing::debug!(component = "api", "{}", request);

        match self.round_trip(request).await {
            Ok(response) => {
                tracing::debug!(
                    component = "api",
                    status = response.status,
                    "{} completed",
                    request
                );
                Ok(response)
            }
            Err(error) => Err(self.fail(request, error)),
        }
    }

    async fn round_trip(&self, request: &ApiRequest) -> Result<RawResponse, ApiError> {
        let url = self.resolve_url(request)?;
        let body = match &request.body {
            Some(Ok(body)) => Some(body.clone()),
            Some(Err(reason)) => {
                return Err(ApiError::Client {
                    reason: format!("failed to encode request body: {}", reason),
                })
            }
            None => None,
        };

        let http_request = HttpRequest {
            method: request.method.clone(),
            url,
            body,
        };

        let timeout = self.config.request_timeout;
        let outcome = tokio::time::timeout(timeout, self.transport.execute(http_request)).await;
        let response = match outcome {
            Err(_) => {
                return Err(ApiError::Unreachable {
                    reason: format!("no response within {:?}", timeout),
                })
            }
            Ok(Err(TransportFailure::NoResponse(reason))) => {
                return Err(ApiError::Unreachable { reason })
            }
            Ok(Err(TransportFailure::Local(reason))) => return Err(ApiError::Client { reason }),
            Ok(Ok(response)) => response,
        };

        if response.is_success() {
            return Ok(response);
        }

        let message = ErrorBody::detail_from(&response.body)
            .filter(|detail| !detail.trim().is_empty())
            .unwrap_or_else(|| GENERIC_SERVICE_MESSAGE.to_string());

        Err(ApiError::Service {
            status: response.status,
            message,
        })
    }

    fn resolve_url(&self, request: &ApiRequest) -> Result<Url, ApiError> {
        let base_url = self.base_url();
        let mut url = Url::parse(base_url).map_err(|e| ApiError::Client {
            reason: format!("invalid base URL '{}': {}", base_url, e),
        })?;

        url.path_segments_mut()
            .map_err(|_| ApiError::Client {
                reason: format!("base URL '{}' cannot carry a path", base_url),
            })?
            .pop_if_empty()
            .extend(&request.segments);

        Ok(url)
    }

    fn fail(&self, request: &ApiRequest, error: ApiError) -> ApiError {
        match &error {
            ApiError::Service { status, message } => {
                tracing::warn!(component = "api", status, "{} rejected: {}", request, message)
            }
            ApiError::Unreachable { reason } => {
                tracing::error!(component = "api", "{} got no response: {}", request, reason)
            }
            ApiError::Client { reason } => {
                tracing::error!(component = "api", "{} failed locally: {}", request, reason)
            }
        }

        self.notifier.notify(Notification::error(error.to_string()));
        error
    }
}
