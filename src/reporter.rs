//! Console Reporting
//!
//! Renders a [`ValidatorResults`] as timestamped console lines and turns a
//! failed validation into a [`ValidatorError::ValidationFailed`] unless the
//! caller asked to continue.

use crate::error::{Result, ValidatorError};
use crate::results::{ValidatorResults, ValidatorResultsMessage};

/// Prefix of every summary line.
pub const LOG_PREFIX: &str = "w3c-html-validator";

/// Reporter options. All fields default to off / unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReporterSettings {
    /// Report messages but do not fail if validation failed
    pub continue_on_fail: bool,
    /// Trim message text to at most this many UTF-16 code units
    pub max_message_len: Option<usize>,
    /// Suppress the status line for passing documents
    pub quiet: bool,
    /// Override the display title (useful for naming HTML string inputs)
    pub title: Option<String>,
}

/// Formats and prints validation results.
pub struct Reporter {
    settings: ReporterSettings,
    show_colors: bool,
}

impl Reporter {
    pub fn new(settings: ReporterSettings) -> Self {
        Self {
            settings,
            show_colors: atty::is(atty::Stream::Stdout),
        }
    }

    /// Reporter that never emits ANSI color codes.
    pub fn plain(settings: ReporterSettings) -> Self {
        Self {
            settings,
            show_colors: false,
        }
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if self.show_colors {
            format!("\x1b[{}m{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    /// Lines describing `results`, without timestamps.
    pub fn format_results(&self, results: &ValidatorResults) -> Vec<String> {
        let mut lines = Vec::new();
        let messages = results.messages();

        if !results.validates || !self.settings.quiet {
            let title = self.settings.title.as_deref().unwrap_or(&results.title);
            let mut line = format!(
                "{} {} {}",
                self.colorize(LOG_PREFIX, "90"),
                if results.validates {
                    self.colorize("✔ pass", "1;32")
                } else {
                    self.colorize("✘ fail", "1;31")
                },
                self.colorize(title, "1;34"),
            );
            if !results.validates {
                line.push(' ');
                line.push_str(&self.colorize(&format!("(messages: {})", messages.len()), "37"));
            }
            lines.push(line);
        }

        for message in messages {
            lines.extend(self.format_message(message));
        }

        lines
    }

    fn format_message(&self, message: &ValidatorResultsMessage) -> Vec<String> {
        let label = message.label();
        let color = match label {
            "error" => "1;31",
            "warning" => "1;33",
            "info" => "1;37",
            _ => "1;91",
        };
        let text = match self.settings.max_message_len {
            Some(max) => truncate_utf16(&message.message, max),
            None => message.message.clone(),
        };

        let mut lines = vec![format!(
            "{} {}",
            self.colorize(&format!("HTML {}:", label), color),
            text
        )];

        if let Some(last_line) = message.last_line.filter(|&line| line > 0) {
            let location = format!(
                "line {}, column {}:",
                last_line,
                message.first_column.unwrap_or(0)
            );
            let extract = message.extract.as_deref().unwrap_or_default().replace('\n', "\\n");
            lines.push(format!(
                "{} {}",
                self.colorize(&location, "37"),
                self.colorize(&extract, "35")
            ));
        }

        lines
    }

    /// Print `results` and fail if the document did not validate, unless
    /// `continue_on_fail` is set.
    pub fn report(&self, results: ValidatorResults) -> Result<ValidatorResults> {
        for line in self.format_results(&results) {
            log_line(&line);
        }

        if !results.validates && !self.settings.continue_on_fail {
            return Err(ValidatorError::ValidationFailed(failure_details(&results)));
        }
        Ok(results)
    }

    /// Report results that arrived as untyped JSON.
    pub fn report_json(&self, value: serde_json::Value) -> Result<ValidatorResults> {
        if value.get("validates").and_then(serde_json::Value::as_bool).is_none() {
            return Err(ValidatorError::InvalidInput(format!(
                "Invalid results for reporter(): {}",
                value
            )));
        }
        let results: ValidatorResults = serde_json::from_value(value).map_err(|e| {
            ValidatorError::InvalidInput(format!("Invalid results for reporter(): {}", e))
        })?;
        self.report(results)
    }
}

/// Failure text, e.g.
/// `spec/html/invalid.html -- warning line 9 column 4, error line 12 column 10`
pub fn failure_details(results: &ValidatorResults) -> String {
    let messages = results.messages();
    let Some(first) = messages.first() else {
        return results.title.clone();
    };

    match &results.filename {
        Some(filename) => {
            let details = messages
                .iter()
                .map(|message| {
                    format!(
                        "{} line {} column {}",
                        message.label(),
                        message.last_line.unwrap_or(0),
                        message.first_column.unwrap_or(0)
                    )
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("{} -- {}", filename, details)
        }
        None => first.message.clone(),
    }
}

/// Report `results` with the given settings. See [`Reporter::report`].
pub fn reporter(results: ValidatorResults, settings: &ReporterSettings) -> Result<ValidatorResults> {
    Reporter::new(settings.clone()).report(results)
}

/// Log the number of files in a batch.
pub fn summary(file_count: usize) {
    let reporter = Reporter::new(ReporterSettings::default());
    log_line(&format!(
        "{} {}",
        reporter.colorize(LOG_PREFIX, "90"),
        reporter.colorize(&format!("files: {}", file_count), "35")
    ));
}

/// Log that validation is being bypassed.
pub fn dry_run_notice() {
    let reporter = Reporter::new(ReporterSettings::default());
    log_line(&format!(
        "{} {} {}",
        reporter.colorize(LOG_PREFIX, "90"),
        reporter.colorize("dry run mode:", "93"),
        reporter.colorize("validation being bypassed", "97")
    ));
}

/// Longest prefix of `text` spanning at most `max` UTF-16 code units, the
/// unit also used to count characters in titles. A character that would
/// straddle the limit is dropped whole.
fn truncate_utf16(text: &str, max: usize) -> String {
    let mut used = 0;
    text.chars()
        .take_while(|c| {
            used += c.len_utf16();
            used <= max
        })
        .collect()
}

fn log_line(line: &str) {
    println!("[{}] {}", chrono::Local::now().format("%H:%M:%S"), line);
}
