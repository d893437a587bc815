use clap::Parser;
use std::path::PathBuf;

/// Validate HTML files with the W3C Nu Markup Checker
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "w3c-html-validator")]
#[command(about = "Check the markup validity of HTML files using the W3C validator")]
#[command(version)]
pub struct Cli {
    /// Files, folders, or glob patterns to validate
    #[arg(help = "Files, folders, or glob patterns (default: current folder)")]
    pub files: Vec<String>,

    /// Report failures but exit with status 0
    #[arg(long = "continue")]
    pub continue_on_fail: bool,

    /// Milliseconds between requests to the checker
    #[arg(long = "delay", help = "Milliseconds between requests (default: 500)")]
    pub delay: Option<u64>,

    /// Bypass validation (for usage while building your CI)
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Also skip messages on the built-in default ignore list
    #[arg(long = "default-rules")]
    pub default_rules: bool,

    /// Skip files whose path contains any of these substrings
    #[arg(long = "exclude", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Skip messages containing this text, or matching /regex/
    #[arg(long = "ignore", action = clap::ArgAction::Append)]
    pub ignore: Vec<String>,

    /// File of ignore patterns, one per line
    #[arg(long = "ignore-config")]
    pub ignore_config: Option<PathBuf>,

    /// Skip unwanted messages: info or warning
    #[arg(long = "ignore-level")]
    pub ignore_level: Option<String>,

    /// Suppress status lines of passing files
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Truncate validation messages to this many characters
    #[arg(long = "trim")]
    pub trim: Option<usize>,

    /// Nu checker endpoint
    #[arg(long = "check-url")]
    pub check_url: Option<String>,

    /// Checker response format: json or html
    #[arg(long = "output")]
    pub output: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long = "timeout")]
    pub timeout: Option<u64>,

    /// Configuration file (TOML or JSON)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
