use async_trait::async_trait;
use reqwest::Client;
use std::error::Error as _;
use std::time::Duration;
use tokio::time::timeout;

use crate::error::{TransportError, ValidatorError};
use crate::request::{RequestSpec, USER_AGENT};
use crate::settings::OutputFormat;

/// Page the dry-run pseudo response carries in place of a checker page.
pub const DRY_RUN_PAGE: &str = "<p class=\"success\">Validation bypassed.</p>";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// A successful (2xx) exchange with the checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// Status code, if the transport knows it.
    pub status: Option<u16>,
    /// Response body: JSON for `out=json`, a rendered page for `out=html`.
    pub text: String,
}

impl TransportResponse {
    /// The response substituted for a dry run: status 200, an empty message
    /// list or a passing page.
    pub fn dry_run(output: OutputFormat) -> Self {
        let text = match output {
            OutputFormat::Json => r#"{"messages":[]}"#,
            OutputFormat::Html => DRY_RUN_PAGE,
        };
        Self {
            status: Some(200),
            text: text.to_string(),
        }
    }
}

/// Sends a [`RequestSpec`] to the checker.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &RequestSpec) -> Result<TransportResponse, TransportError>;
}

/// Production transport backed by a pooled reqwest client.
pub struct ReqwestTransport {
    client: Client,
    config: HttpClientConfig,
}

impl ReqwestTransport {
    /// Create a new transport with the given configuration
    pub fn new(config: HttpClientConfig) -> Result<Self, ValidatorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .pool_idle_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(ValidatorError::from)?;

        Ok(Self { client, config })
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &RequestSpec) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .query(&request.query);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = timeout(Duration::from_secs(self.config.timeout_seconds), builder.send())
            .await
            .map_err(|_| TransportError::Connection {
                code: "timeout".to_string(),
                message: format!(
                    "request timed out after {} seconds",
                    self.config.timeout_seconds
                ),
            })?
            .map_err(connection_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
                url: response.url().to_string(),
            });
        }

        let text = response.text().await.map_err(connection_error)?;
        Ok(TransportResponse {
            status: Some(status.as_u16()),
            text,
        })
    }
}

/// Classify a reqwest failure that produced no usable HTTP response.
fn connection_error(error: reqwest::Error) -> TransportError {
    let code = if error.is_timeout() {
        "timeout"
    } else if error.is_connect() {
        "connect"
    } else if error.is_redirect() {
        "redirect"
    } else if error.is_body() {
        "body"
    } else if error.is_decode() {
        "decode"
    } else if error.is_request() {
        "request"
    } else {
        "unknown"
    };

    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    TransportError::Connection {
        code: code.to_string(),
        message,
    }
}
