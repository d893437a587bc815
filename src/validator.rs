//! Validation Engine
//!
//! One call validates one document:
//! - **Resolve**: options are checked and defaults applied
//! - **Read**: a `filename` target is read from disk (async)
//! - **Send**: the request goes to the checker through an [`HttpTransport`]
//! - **Normalize**: the answer, or the failure, becomes a [`ValidatorResults`]
//!
//! A dry run skips the read and the send and yields a passing result.

use log::debug;
use std::sync::Arc;

use crate::error::Result;
use crate::normalize::normalize;
use crate::request::{build_request, title_for};
use crate::results::ValidatorResults;
use crate::settings::{ValidatorOptions, ValidatorSettings};
use crate::transport::{HttpClientConfig, HttpTransport, ReqwestTransport, TransportResponse};

/// Validates documents through a shared transport.
///
/// Cloning is cheap; clones share the transport.
#[derive(Clone)]
pub struct Validator {
    transport: Arc<dyn HttpTransport>,
}

impl Validator {
    /// Create a validator that sends requests through `transport`.
    pub fn new(transport: impl HttpTransport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Create a validator backed by a [`ReqwestTransport`].
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        Ok(Self::new(ReqwestTransport::new(config)?))
    }

    /// Validate one document.
    ///
    /// Fails only for invalid options or an unreadable file. Network
    /// problems are reported inside the returned results.
    pub async fn validate(&self, options: &ValidatorOptions) -> Result<ValidatorResults> {
        let settings = options.resolve()?;
        self.validate_settings(&settings).await
    }

    /// Validate one document from already resolved settings.
    pub async fn validate_settings(&self, settings: &ValidatorSettings) -> Result<ValidatorResults> {
        let title = title_for(settings);

        let outcome = if settings.dry_run {
            debug!("dry run, bypassing validation of {}", title);
            Ok(TransportResponse::dry_run(settings.output))
        } else {
            let input_html = settings.read_input_html().await?;
            let request = build_request(settings, input_html.as_deref());
            debug!("{} {} for {}", request.method, request.url, title);
            self.transport.send(&request).await
        };

        Ok(normalize(settings, title, outcome))
    }
}

/// Validate one document with the default HTTP transport.
pub async fn validate(options: &ValidatorOptions) -> Result<ValidatorResults> {
    Validator::with_config(HttpClientConfig::default())?
        .validate(options)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{TransportError, ValidatorError};
    use crate::results::MessageType;
    use crate::settings::Mode;
    use crate::transport::MockHttpTransport;
    use reqwest::Method;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VALID_HTML: &str = "<!doctype html>\n<html lang=en>\n<head><title>Home</title></head>\n<body><p>Hello</p></body>\n</html>\n";

    fn respond(text: &'static str) -> MockHttpTransport {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().times(1).returning(move |_| {
            Ok(TransportResponse {
                status: Some(200),
                text: text.to_string(),
            })
        });
        transport
    }

    #[tokio::test]
    async fn test_valid_html_string() {
        let validator = Validator::new(respond(r#"{"messages":[]}"#));
        let results = validator
            .validate(&ValidatorOptions::html(VALID_HTML))
            .await
            .unwrap();

        assert!(results.validates);
        assert_eq!(results.mode, Mode::Html);
        assert_eq!(results.title, format!("HTML String (characters: {})", VALID_HTML.len()));
        assert_eq!(results.html.as_deref(), Some(VALID_HTML));
        assert_eq!(results.messages, Some(vec![]));
        assert_eq!(results.display, None);
    }

    #[tokio::test]
    async fn test_inline_html_is_posted() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|request| {
                request.method == Method::POST
                    && request.body.as_deref() == Some(VALID_HTML)
                    && request.query_param("out") == Some("json")
            })
            .times(1)
            .returning(|_| {
                Ok(TransportResponse {
                    status: Some(200),
                    text: r#"{"messages":[]}"#.to_string(),
                })
            });

        let results = Validator::new(transport)
            .validate(&ValidatorOptions::html(VALID_HTML))
            .await
            .unwrap();
        assert!(results.validates);
    }

    #[tokio::test]
    async fn test_file_content_is_posted_without_carriage_returns() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "<!doctype html>\r\n<p>Hi</p>\r\n").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|request| request.body.as_deref() == Some("<!doctype html>\n<p>Hi</p>\n"))
            .times(1)
            .returning(|_| {
                Ok(TransportResponse {
                    status: Some(200),
                    text: r#"{"messages":[]}"#.to_string(),
                })
            });

        let results = Validator::new(transport)
            .validate(&ValidatorOptions::filename(path.clone()))
            .await
            .unwrap();

        assert_eq!(results.mode, Mode::Filename);
        assert_eq!(results.title, path.replace('\\', "/"));
        assert_eq!(results.filename.as_deref(), Some(results.title.as_str()));
        assert_eq!(results.html, None);
        assert_eq!(results.website, None);
    }

    #[tokio::test]
    async fn test_website_is_fetched_by_checker() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|request| {
                request.method == Method::GET
                    && request.query_param("doc") == Some("https://example.com/")
            })
            .times(1)
            .returning(|_| {
                Ok(TransportResponse {
                    status: Some(200),
                    text: r#"{"messages":[]}"#.to_string(),
                })
            });

        let results = Validator::new(transport)
            .validate(&ValidatorOptions::website("https://example.com/"))
            .await
            .unwrap();
        assert_eq!(results.mode, Mode::Website);
        assert_eq!(results.title, "https://example.com/");
        assert_eq!(results.website.as_deref(), Some("https://example.com/"));
    }

    #[tokio::test]
    async fn test_dry_run_sends_nothing() {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().times(0);

        let options = ValidatorOptions {
            dry_run: true,
            ..ValidatorOptions::filename("/nonexistent/file.html")
        };
        let results = Validator::new(transport).validate(&options).await.unwrap();

        assert!(results.validates);
        assert!(results.dry_run);
        assert_eq!(results.messages, Some(vec![]));
        assert_eq!(results.status, 200);
    }

    #[tokio::test]
    async fn test_network_failure_is_a_result() {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().times(1).returning(|_| {
            Err(TransportError::Status {
                status: 503,
                status_text: "Service Unavailable".to_string(),
                url: "https://validator.w3.org/nu/?out=json".to_string(),
            })
        });

        let results = Validator::new(transport)
            .validate(&ValidatorOptions::html(VALID_HTML))
            .await
            .unwrap();

        assert!(!results.validates);
        assert_eq!(results.status, 503);
        assert_eq!(results.messages().len(), 1);
        assert_eq!(results.messages()[0].kind, MessageType::NetworkError);
    }

    #[tokio::test]
    async fn test_invalid_options_fail_before_sending() {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().times(0);

        let options = ValidatorOptions {
            ignore_level: Some("bogus".to_string()),
            ..ValidatorOptions::html(VALID_HTML)
        };
        let err = Validator::new(transport).validate(&options).await.unwrap_err();
        assert!(matches!(err, ValidatorError::InvalidInput(ref m) if m.contains("bogus")));
    }

    #[tokio::test]
    async fn test_unreadable_file_fails() {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().times(0);

        let err = Validator::new(transport)
            .validate(&ValidatorOptions::filename("/nonexistent/file.html"))
            .await
            .unwrap_err();
        assert!(matches!(err, ValidatorError::FileRead { .. }));
    }

    #[tokio::test]
    async fn test_repeated_calls_are_idempotent() {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().times(2).returning(|_| {
            Ok(TransportResponse {
                status: Some(200),
                text: r#"{"messages":[{"type":"error","message":"Stray end tag “div”.","lastLine":3,"firstColumn":1}]}"#.to_string(),
            })
        });
        let validator = Validator::new(transport);
        let options = ValidatorOptions::html("<p>Hi</p></div>");

        let first = validator.validate(&options).await.unwrap();
        let second = validator.validate(&options).await.unwrap();
        assert_eq!(first, second);
        assert!(!first.validates);
    }
}
