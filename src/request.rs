//! Request construction
//!
//! Describes the outbound call to the checker without performing it; the
//! [`HttpTransport`](crate::transport::HttpTransport) does the I/O.

use reqwest::Method;

use crate::settings::{Target, ValidatorSettings};

/// Identifies this client to the checker.
pub const USER_AGENT: &str = concat!(
    "W3C HTML Validator (Rust) ~ w3c-html-validator/",
    env!("CARGO_PKG_VERSION")
);

pub const HTML_CONTENT_TYPE: &str = "text/html; encoding=utf-8";

/// Shape of one request to the checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RequestSpec {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Build the checker request: a POST of `input_html` when there is one,
/// otherwise a GET asking the checker to fetch the website itself.
pub fn build_request(settings: &ValidatorSettings, input_html: Option<&str>) -> RequestSpec {
    let mut headers = vec![("User-Agent".to_string(), USER_AGENT.to_string())];
    let mut query = vec![("out".to_string(), settings.output.as_str().to_string())];

    match input_html {
        Some(html) => {
            headers.push(("Content-Type".to_string(), HTML_CONTENT_TYPE.to_string()));
            RequestSpec {
                method: Method::POST,
                url: settings.check_url.clone(),
                query,
                headers,
                body: Some(html.to_string()),
            }
        }
        None => {
            query.push((
                "doc".to_string(),
                settings.website().unwrap_or_default().to_string(),
            ));
            RequestSpec {
                method: Method::GET,
                url: settings.check_url.clone(),
                query,
                headers,
                body: None,
            }
        }
    }
}

/// Human label for the validated document.
pub fn title_for(settings: &ValidatorSettings) -> String {
    match &settings.target {
        Target::Html(html) => format!(
            "HTML String (characters: {})",
            html.encode_utf16().count()
        ),
        Target::Filename(filename) => filename.clone(),
        Target::Website(website) => website.clone(),
    }
}
