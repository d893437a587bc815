#![allow(dead_code)]

use std::path::PathBuf;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Checker answer for a document without messages.
pub const VALID_JSON: &str = r#"{"messages":[]}"#;

/// Checker answer for `fixtures/invalid.html`: one warning, one error.
pub const INVALID_JSON: &str = r#"{"messages":[
    {"type":"info","subType":"warning","message":"Section lacks heading. Consider using “h2”-“h6” elements to add identifying headings to all sections, or else use a “div” element instead for any cases where no heading is needed.","extract":"e</h1>\n   <section>\n      ","lastLine":9,"firstColumn":4,"lastColumn":12,"hiliteStart":10,"hiliteLength":9},
    {"type":"error","message":"Element “blockquote” not allowed as child of element “span” in this context. (Suppressing further errors from this subtree.)","extract":"\n      <span><blockquote>Inside","lastLine":12,"firstColumn":13,"lastColumn":24,"hiliteStart":15,"hiliteLength":12}
]}"#;

pub const SUCCESS_PAGE: &str = r#"<!DOCTYPE html><html><body><div id="results"><p class="success">The document validates according to the specified schema(s).</p></div></body></html>"#;

pub const FAILURE_PAGE: &str = r#"<!DOCTYPE html><html><body><div id="results"><p class="failure">There were errors.</p></div></body></html>"#;

/// Test fixture paths
pub struct TestFixtures {
    pub fixtures_dir: PathBuf,
}

impl TestFixtures {
    pub fn new() -> Self {
        let fixtures_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures");

        Self { fixtures_dir }
    }

    pub fn path(&self, name: &str) -> String {
        self.fixtures_dir.join(name).to_string_lossy().into_owned()
    }

    pub fn valid_html(&self) -> String {
        self.path("valid.html")
    }

    pub fn invalid_html(&self) -> String {
        self.path("invalid.html")
    }

    pub fn ignore_config(&self) -> String {
        self.path("ignore-config.txt")
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.fixtures_dir.join(name)).unwrap()
    }
}

/// Local stand-in for the Nu checker. Documents containing `<blockquote>`
/// (and the website `https://example.com/broken`) are reported invalid.
pub struct MockChecker {
    pub server: MockServer,
}

impl MockChecker {
    pub async fn start() -> Self {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/nu/"))
            .and(query_param("out", "json"))
            .and(body_string_contains("<blockquote>"))
            .respond_with(ResponseTemplate::new(200).set_body_string(INVALID_JSON))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/nu/"))
            .and(query_param("out", "html"))
            .and(body_string_contains("<blockquote>"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FAILURE_PAGE))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/nu/"))
            .and(query_param("doc", "https://example.com/broken"))
            .respond_with(ResponseTemplate::new(200).set_body_string(INVALID_JSON))
            .with_priority(1)
            .mount(&server)
            .await;

        Mock::given(path("/nu/"))
            .and(query_param("out", "json"))
            .and(header("user-agent", w3c_html_validator::USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string(VALID_JSON))
            .with_priority(2)
            .mount(&server)
            .await;
        Mock::given(path("/nu/"))
            .and(query_param("out", "html"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SUCCESS_PAGE))
            .with_priority(2)
            .mount(&server)
            .await;

        Mock::given(path("/unavailable/"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        Self { server }
    }

    pub fn check_url(&self) -> String {
        format!("{}/nu/", self.server.uri())
    }

    pub fn unavailable_url(&self) -> String {
        format!("{}/unavailable/", self.server.uri())
    }

    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}
