//! Response normalization
//!
//! Maps whatever came back from the transport (a JSON message list, a
//! rendered page, or a failure) into a [`ValidatorResults`].

use log::warn;
use serde::Deserialize;

use crate::error::TransportError;
use crate::filter::MessageFilter;
use crate::results::{ValidatorResults, ValidatorResultsMessage};
use crate::settings::{OutputFormat, Target, ValidatorSettings};
use crate::transport::TransportResponse;

/// Marker the checker puts in a rendered page when the document passes.
pub const SUCCESS_MARKER: &str = "<p class=\"success\">";

#[derive(Debug, Deserialize)]
struct CheckerResponse {
    #[serde(default)]
    messages: Vec<ValidatorResultsMessage>,
}

/// Body of a result: either the filtered messages or the rendered page.
enum Outcome {
    Messages(Vec<ValidatorResultsMessage>),
    Page(String),
}

/// Build the canonical result for one call. Never fails: transport errors
/// become a single `network-error` message.
pub fn normalize(
    settings: &ValidatorSettings,
    title: String,
    outcome: Result<TransportResponse, TransportError>,
) -> ValidatorResults {
    let (status, body) = match outcome {
        Ok(response) => {
            let body = match settings.output {
                OutputFormat::Json => match serde_json::from_str::<CheckerResponse>(&response.text) {
                    Ok(parsed) => {
                        let filter = MessageFilter::from_settings(settings);
                        Outcome::Messages(filter.apply(parsed.messages))
                    }
                    Err(e) => {
                        let code = response
                            .status
                            .map(|s| s.to_string())
                            .unwrap_or_else(|| "-1".to_string());
                        let text = format!("{} invalid JSON response: {}", code, e);
                        warn!("{}: {}", title, text);
                        Outcome::Messages(vec![ValidatorResultsMessage::network_error(text)])
                    }
                },
                OutputFormat::Html => Outcome::Page(response.text),
            };
            (response.status, body)
        }
        Err(error) => {
            warn!("{}: network error: {}", title, error);
            let text = error.to_string();
            let body = match settings.output {
                OutputFormat::Json => {
                    Outcome::Messages(vec![ValidatorResultsMessage::network_error(text)])
                }
                OutputFormat::Html => Outcome::Page(text),
            };
            (error.status(), body)
        }
    };

    let (validates, messages, display) = match body {
        Outcome::Messages(messages) => (messages.is_empty(), Some(messages), None),
        Outcome::Page(page) => (page.contains(SUCCESS_MARKER), None, Some(page)),
    };

    let (html, filename, website) = match &settings.target {
        Target::Html(html) => (Some(html.clone()), None, None),
        Target::Filename(filename) => (None, Some(filename.clone()), None),
        Target::Website(website) => (None, None, Some(website.clone())),
    };

    ValidatorResults {
        validates,
        mode: settings.mode(),
        title,
        html,
        filename,
        website,
        output: settings.output,
        status: status.map(i32::from).filter(|&s| s != 0).unwrap_or(-1),
        messages,
        display,
        dry_run: settings.dry_run,
    }
}
