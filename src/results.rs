//! Canonical result records
//!
//! Every call to the validator ends in a [`ValidatorResults`], whether the
//! checker answered with JSON, with a rendered HTML page, or not at all.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::settings::{Mode, OutputFormat};

/// Top-level category of a checker message.
///
/// | type                 | possible sub types                  |
/// |----------------------|-------------------------------------|
/// | `info`               | `warning` or none (informative)     |
/// | `error`              | `fatal` or none (markup violation)  |
/// | `non-document-error` | `io`, `schema`, `internal` or none  |
/// | `network-error`      | none (request failure)              |
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageType {
    Info,
    Error,
    NonDocumentError,
    NetworkError,
    /// A type the checker may add in the future.
    Other(String),
}

impl MessageType {
    pub fn as_str(&self) -> &str {
        match self {
            MessageType::Info => "info",
            MessageType::Error => "error",
            MessageType::NonDocumentError => "non-document-error",
            MessageType::NetworkError => "network-error",
            MessageType::Other(other) => other,
        }
    }
}

impl From<String> for MessageType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "info" => MessageType::Info,
            "error" => MessageType::Error,
            "non-document-error" => MessageType::NonDocumentError,
            "network-error" => MessageType::NetworkError,
            _ => MessageType::Other(value),
        }
    }
}

impl From<MessageType> for String {
    fn from(value: MessageType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Refinement of a [`MessageType`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageSubType {
    Warning,
    Fatal,
    Io,
    Schema,
    Internal,
    Other(String),
}

impl MessageSubType {
    pub fn as_str(&self) -> &str {
        match self {
            MessageSubType::Warning => "warning",
            MessageSubType::Fatal => "fatal",
            MessageSubType::Io => "io",
            MessageSubType::Schema => "schema",
            MessageSubType::Internal => "internal",
            MessageSubType::Other(other) => other,
        }
    }
}

impl From<String> for MessageSubType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "warning" => MessageSubType::Warning,
            "fatal" => MessageSubType::Fatal,
            "io" => MessageSubType::Io,
            "schema" => MessageSubType::Schema,
            "internal" => MessageSubType::Internal,
            _ => MessageSubType::Other(value),
        }
    }
}

impl From<MessageSubType> for String {
    fn from(value: MessageSubType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for MessageSubType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message reported by the checker (or synthesized for a
/// network failure). Field names follow the checker's JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorResultsMessage {
    #[serde(rename = "type")]
    pub kind: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<MessageSubType>,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_column: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_column: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hilite_start: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hilite_length: Option<u32>,
}

impl ValidatorResultsMessage {
    /// Message with the given type and text and no position information.
    pub fn new(kind: MessageType, message: impl Into<String>) -> Self {
        Self {
            kind,
            sub_type: None,
            message: message.into(),
            extract: None,
            last_line: None,
            first_column: None,
            last_column: None,
            hilite_start: None,
            hilite_length: None,
        }
    }

    pub fn network_error(message: impl Into<String>) -> Self {
        Self::new(MessageType::NetworkError, message)
    }

    /// `subType` when present, otherwise `type` (e.g. "warning", "error").
    pub fn label(&self) -> &str {
        self.sub_type
            .as_ref()
            .map(MessageSubType::as_str)
            .unwrap_or_else(|| self.kind.as_str())
    }
}

/// Canonical, immutable outcome of one validation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorResults {
    pub validates: bool,
    pub mode: Mode,
    pub title: String,
    pub html: Option<String>,
    pub filename: Option<String>,
    pub website: Option<String>,
    pub output: OutputFormat,
    /// HTTP status of the exchange, `-1` when none is known.
    pub status: i32,
    pub messages: Option<Vec<ValidatorResultsMessage>>,
    pub display: Option<String>,
    pub dry_run: bool,
}

impl ValidatorResults {
    /// Messages as a slice; empty for HTML output.
    pub fn messages(&self) -> &[ValidatorResultsMessage] {
        self.messages.as_deref().unwrap_or_default()
    }
}
