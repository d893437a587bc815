//! Settings resolution
//!
//! Turns the caller-facing [`ValidatorOptions`] into validated, immutable
//! [`ValidatorSettings`]. Everything here is synchronous except reading the
//! document of a `filename` target.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidatorError};
use crate::filter::IgnorePattern;

/// Nu Markup Checker endpoint used when no other is configured.
pub const DEFAULT_CHECK_URL: &str = "https://validator.w3.org/nu/";

/// Coarse suppression threshold over message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IgnoreLevel {
    /// Skip informative messages.
    Info,
    /// Skip informative messages and warnings.
    Warning,
}

impl FromStr for IgnoreLevel {
    type Err = ValidatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "info" => Ok(IgnoreLevel::Info),
            "warning" => Ok(IgnoreLevel::Warning),
            _ => Err(ValidatorError::InvalidInput(format!(
                "Invalid ignoreLevel option: {}",
                s
            ))),
        }
    }
}

/// Response format requested from the checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Html,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Html => "html",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ValidatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "html" => Ok(OutputFormat::Html),
            _ => Err(ValidatorError::InvalidInput(format!(
                "Option \"output\" must be \"json\" or \"html\", got: {}",
                s
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which input supplied the document under validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Html,
    Filename,
    Website,
}

/// The document to validate. Exactly one per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Inline HTML text.
    Html(String),
    /// Local file, path in portable (forward slash) form.
    Filename(String),
    /// Remote page the checker fetches itself.
    Website(String),
}

impl Target {
    pub fn mode(&self) -> Mode {
        match self {
            Target::Html(_) => Mode::Html,
            Target::Filename(_) => Mode::Filename,
            Target::Website(_) => Mode::Website,
        }
    }
}

/// Caller-facing options for a single validation call.
///
/// Unset fields fall back to their documented defaults in
/// [`ValidatorOptions::resolve`].
#[derive(Debug, Clone, Default)]
pub struct ValidatorOptions {
    /// Inline HTML, e.g. `<!doctype html><html>...`
    pub html: Option<String>,
    /// Path of a local HTML file, e.g. `docs/index.html`
    pub filename: Option<String>,
    /// URL of a page to validate, e.g. `https://example.com/`
    pub website: Option<String>,
    /// Checker endpoint, defaults to [`DEFAULT_CHECK_URL`]
    pub check_url: Option<String>,
    /// `"info"` or `"warning"` (`"warning"` also skips info messages)
    pub ignore_level: Option<String>,
    /// Patterns for messages to skip
    pub ignore_messages: Vec<IgnorePattern>,
    /// Also apply the built-in opinionated ignore list
    pub default_rules: bool,
    /// `"json"` (default) or `"html"`
    pub output: Option<String>,
    /// Bypass validation entirely
    pub dry_run: bool,
}

impl ValidatorOptions {
    pub fn html(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            ..Default::default()
        }
    }

    pub fn filename(filename: impl Into<String>) -> Self {
        Self {
            filename: Some(filename.into()),
            ..Default::default()
        }
    }

    pub fn website(website: impl Into<String>) -> Self {
        Self {
            website: Some(website.into()),
            ..Default::default()
        }
    }

    /// Validate the options and apply defaults.
    pub fn resolve(&self) -> Result<ValidatorSettings> {
        let target = match (
            non_empty(&self.html),
            non_empty(&self.filename),
            non_empty(&self.website),
        ) {
            (Some(html), _, _) => Target::Html(html.to_string()),
            (None, Some(filename), _) => Target::Filename(to_portable(filename)),
            (None, None, Some(website)) => Target::Website(website.to_string()),
            (None, None, None) => {
                return Err(ValidatorError::InvalidInput(
                    "Must specify the \"html\", \"filename\", or \"website\" option.".to_string(),
                ));
            }
        };

        let ignore_level = self
            .ignore_level
            .as_deref()
            .map(IgnoreLevel::from_str)
            .transpose()?;

        let output = match self.output.as_deref() {
            Some(output) => output.parse()?,
            None => OutputFormat::default(),
        };

        let check_url = non_empty(&self.check_url)
            .unwrap_or(DEFAULT_CHECK_URL)
            .to_string();

        Ok(ValidatorSettings {
            target,
            check_url,
            ignore_level,
            ignore_messages: self.ignore_messages.clone(),
            default_rules: self.default_rules,
            output,
            dry_run: self.dry_run,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Resolved settings for one validation call. Never mutated after
/// resolution.
#[derive(Debug, Clone)]
pub struct ValidatorSettings {
    pub target: Target,
    pub check_url: String,
    pub ignore_level: Option<IgnoreLevel>,
    pub ignore_messages: Vec<IgnorePattern>,
    pub default_rules: bool,
    pub output: OutputFormat,
    pub dry_run: bool,
}

impl ValidatorSettings {
    pub fn mode(&self) -> Mode {
        self.target.mode()
    }

    pub fn filename(&self) -> Option<&str> {
        match &self.target {
            Target::Filename(filename) => Some(filename),
            _ => None,
        }
    }

    pub fn website(&self) -> Option<&str> {
        match &self.target {
            Target::Website(website) => Some(website),
            _ => None,
        }
    }

    /// The HTML to post to the checker: the inline text, or the file
    /// content with carriage returns stripped. `None` for websites.
    pub async fn read_input_html(&self) -> Result<Option<String>> {
        match &self.target {
            Target::Html(html) => Ok(Some(html.clone())),
            Target::Filename(filename) => read_text(filename).await.map(Some),
            Target::Website(_) => Ok(None),
        }
    }
}

/// Read a file as UTF-8 text with Unix line endings.
pub async fn read_text(path: &str) -> Result<String> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ValidatorError::FileRead {
            path: PathBuf::from(path),
            source,
        })?;
    Ok(text.replace('\r', ""))
}

/// Forward-slash form of a path. Extended-length Windows paths
/// (`\\?\...`) are returned unchanged.
pub fn to_portable(path: &str) -> String {
    if path.starts_with(r"\\?\") {
        return path.to_string();
    }
    path.replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_applied() {
        let settings = ValidatorOptions::html("<p>hi</p>").resolve().unwrap();

        assert_eq!(settings.check_url, DEFAULT_CHECK_URL);
        assert_eq!(settings.ignore_level, None);
        assert!(settings.ignore_messages.is_empty());
        assert!(!settings.default_rules);
        assert_eq!(settings.output, OutputFormat::Json);
        assert!(!settings.dry_run);
        assert_eq!(settings.mode(), Mode::Html);
    }

    #[test]
    fn test_missing_target_is_invalid_input() {
        let err = ValidatorOptions::default().resolve().unwrap_err();
        match err {
            ValidatorError::InvalidInput(message) => {
                assert!(message.contains("\"html\", \"filename\", or \"website\""))
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }

        let empty = ValidatorOptions::html("");
        assert!(matches!(
            empty.resolve(),
            Err(ValidatorError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_bogus_ignore_level_names_value() {
        let options = ValidatorOptions {
            ignore_level: Some("bogus".to_string()),
            ..ValidatorOptions::html("<p>hi</p>")
        };

        let err = options.resolve().unwrap_err();
        match err {
            ValidatorError::InvalidInput(message) => {
                assert_eq!(message, "Invalid ignoreLevel option: bogus")
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_ignore_levels_parse() {
        for (text, level) in [("info", IgnoreLevel::Info), ("warning", IgnoreLevel::Warning)] {
            let options = ValidatorOptions {
                ignore_level: Some(text.to_string()),
                ..ValidatorOptions::html("<p>hi</p>")
            };
            assert_eq!(options.resolve().unwrap().ignore_level, Some(level));
        }
    }

    #[test]
    fn test_invalid_output_is_invalid_input() {
        let options = ValidatorOptions {
            output: Some("xml".to_string()),
            ..ValidatorOptions::website("https://example.com/")
        };
        assert!(matches!(
            options.resolve(),
            Err(ValidatorError::InvalidInput(_))
        ));

        let html_output = ValidatorOptions {
            output: Some("html".to_string()),
            ..ValidatorOptions::website("https://example.com/")
        };
        assert_eq!(html_output.resolve().unwrap().output, OutputFormat::Html);
    }

    #[test]
    fn test_mode_precedence() {
        let all = ValidatorOptions {
            html: Some("<p>hi</p>".to_string()),
            filename: Some("index.html".to_string()),
            website: Some("https://example.com/".to_string()),
            ..Default::default()
        };
        assert_eq!(all.resolve().unwrap().mode(), Mode::Html);

        let file_and_site = ValidatorOptions {
            html: None,
            ..all.clone()
        };
        assert_eq!(file_and_site.resolve().unwrap().mode(), Mode::Filename);

        let site = ValidatorOptions::website("https://example.com/");
        let settings = site.resolve().unwrap();
        assert_eq!(settings.mode(), Mode::Website);
        assert_eq!(settings.website(), Some("https://example.com/"));
    }

    #[test]
    fn test_filename_is_made_portable() {
        let settings = ValidatorOptions::filename(r"docs\pages\index.html")
            .resolve()
            .unwrap();
        assert_eq!(settings.filename(), Some("docs/pages/index.html"));
    }

    #[test]
    fn test_to_portable() {
        assert_eq!(to_portable("a/b/c.html"), "a/b/c.html");
        assert_eq!(to_portable(r"a\b\c.html"), "a/b/c.html");
        assert_eq!(to_portable(r"\\?\C:\site\index.html"), r"\\?\C:\site\index.html");
    }

    #[tokio::test]
    async fn test_read_input_html_strips_carriage_returns() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "<!doctype html>\r\n<html lang=en>\r\n</html>\r\n").unwrap();

        let settings = ValidatorOptions::filename(file.path().to_str().unwrap())
            .resolve()
            .unwrap();
        let html = settings.read_input_html().await.unwrap().unwrap();
        assert_eq!(html, "<!doctype html>\n<html lang=en>\n</html>\n");
    }

    #[tokio::test]
    async fn test_read_input_html_missing_file() {
        let settings = ValidatorOptions::filename("/nonexistent/path/index.html")
            .resolve()
            .unwrap();
        let err = settings.read_input_html().await.unwrap_err();
        match err {
            ValidatorError::FileRead { path, .. } => {
                assert_eq!(path, PathBuf::from("/nonexistent/path/index.html"))
            }
            other => panic!("Expected FileRead, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_website_has_no_input_html() {
        let settings = ValidatorOptions::website("https://example.com/")
            .resolve()
            .unwrap();
        assert_eq!(settings.read_input_html().await.unwrap(), None);
    }
}
