//! Message filtering
//!
//! Decides which checker messages are suppressed, by severity
//! ([`IgnoreLevel`]) and by text ([`IgnorePattern`]).

use regex::Regex;

use crate::error::{Result, ValidatorError};
use crate::results::{MessageType, ValidatorResultsMessage};
use crate::settings::{IgnoreLevel, ValidatorSettings};

/// Opinionated messages skipped when `default_rules` is enabled.
///
/// "Section lacks heading." is sensible for traditional print publishing but
/// not for modern UI components.
pub const DEFAULT_IGNORE_LIST: &[&str] = &["Section lacks heading."];

/// A pattern for messages to skip.
#[derive(Debug, Clone)]
pub enum IgnorePattern {
    /// Matches when the message text contains this substring.
    Literal(String),
    /// Matches when the regular expression finds a match in the message text.
    Pattern(Regex),
}

impl IgnorePattern {
    /// Parse a textual pattern: text wrapped in slashes (`/lacks.*heading/`)
    /// becomes a regular expression, anything else a literal substring.
    pub fn parse(text: &str) -> Result<Self> {
        if text.len() > 2 && text.starts_with('/') && text.ends_with('/') {
            let source = &text[1..text.len() - 1];
            let regex = Regex::new(source).map_err(|e| {
                ValidatorError::InvalidInput(format!("Invalid ignore pattern '{}': {}", text, e))
            })?;
            Ok(IgnorePattern::Pattern(regex))
        } else {
            Ok(IgnorePattern::Literal(text.to_string()))
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            IgnorePattern::Literal(literal) => text.contains(literal.as_str()),
            IgnorePattern::Pattern(regex) => regex.is_match(text),
        }
    }
}

impl From<&str> for IgnorePattern {
    fn from(text: &str) -> Self {
        IgnorePattern::Literal(text.to_string())
    }
}

impl From<Regex> for IgnorePattern {
    fn from(regex: Regex) -> Self {
        IgnorePattern::Pattern(regex)
    }
}

/// Parse a newline-delimited list of patterns. Blank lines and lines
/// starting with `#` are skipped.
pub fn parse_pattern_list(text: &str) -> Result<Vec<IgnorePattern>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(IgnorePattern::parse)
        .collect()
}

/// Filter configured from the resolved settings of one call.
#[derive(Debug, Clone)]
pub struct MessageFilter {
    ignore_level: Option<IgnoreLevel>,
    patterns: Vec<IgnorePattern>,
}

impl MessageFilter {
    pub fn new(
        ignore_level: Option<IgnoreLevel>,
        ignore_messages: &[IgnorePattern],
        default_rules: bool,
    ) -> Self {
        let mut patterns = ignore_messages.to_vec();
        if default_rules {
            patterns.extend(DEFAULT_IGNORE_LIST.iter().map(|&text| IgnorePattern::from(text)));
        }
        Self {
            ignore_level,
            patterns,
        }
    }

    pub fn from_settings(settings: &ValidatorSettings) -> Self {
        Self::new(
            settings.ignore_level,
            &settings.ignore_messages,
            settings.default_rules,
        )
    }

    /// True when the message survives both the level and the pattern checks.
    pub fn is_relevant(&self, message: &ValidatorResultsMessage) -> bool {
        self.above_ignore_level(message) && !self.matches_pattern(&message.message)
    }

    pub fn apply(&self, messages: Vec<ValidatorResultsMessage>) -> Vec<ValidatorResultsMessage> {
        messages
            .into_iter()
            .filter(|message| self.is_relevant(message))
            .collect()
    }

    fn above_ignore_level(&self, message: &ValidatorResultsMessage) -> bool {
        if message.kind != MessageType::Info {
            return true;
        }
        match self.ignore_level {
            None => true,
            // Info with a sub type is a warning.
            Some(IgnoreLevel::Info) => message.sub_type.is_some(),
            Some(IgnoreLevel::Warning) => false,
        }
    }

    fn matches_pattern(&self, text: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(text))
    }
}
