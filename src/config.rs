use crate::cli::Cli;
use crate::error::{ConfigError, ConfigResult as Result, ValidatorError};
use crate::filter::{IgnorePattern, parse_pattern_list};
use crate::reporter::ReporterSettings;
use crate::settings::{DEFAULT_CHECK_URL, IgnoreLevel, OutputFormat, ValidatorOptions, read_text};
use crate::transport::HttpClientConfig;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Trait for abstracting environment variable access
pub trait EnvProvider {
    fn get(&self, key: &str) -> Option<String>;
}

/// System environment variable provider for production use
pub struct SystemEnvProvider;

impl EnvProvider for SystemEnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

const ENV_PREFIX: &str = "W3C_HTML_VALIDATOR_";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub validator: ValidatorConfig,
    pub batch: BatchConfig,
    pub reporter: ReporterConfig,
    pub network: NetworkConfig,
}

/// Options of every validation call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Nu checker endpoint
    pub check_url: String,
    /// `info` or `warning`
    pub ignore_level: Option<String>,
    /// `json` or `html`
    pub output: String,
    /// Apply the built-in default ignore list
    pub default_rules: bool,
    /// Bypass validation
    pub dry_run: bool,
    /// Message patterns to skip
    pub ignore: Vec<String>,
    /// File of message patterns to skip, one per line
    pub ignore_config: Option<PathBuf>,
}

/// File selection and request spacing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BatchConfig {
    /// Milliseconds between two requests
    pub delay_ms: u64,
    /// Skip paths containing any of these substrings
    pub exclude: Vec<String>,
}

/// Console report options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ReporterConfig {
    pub continue_on_fail: bool,
    pub quiet: bool,
    /// Truncate messages to this many characters
    pub trim: Option<usize>,
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    /// HTTP request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            check_url: DEFAULT_CHECK_URL.to_string(),
            ignore_level: None,
            output: OutputFormat::Json.to_string(),
            default_rules: false,
            dry_run: false,
            ignore: Vec::new(),
            ignore_config: None,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            delay_ms: 500,
            exclude: Vec::new(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}

impl Config {
    /// Options shared by every call of a batch; the target is filled in per file.
    pub fn validator_options(&self, ignore_messages: Vec<IgnorePattern>) -> ValidatorOptions {
        ValidatorOptions {
            check_url: Some(self.validator.check_url.clone()),
            ignore_level: self.validator.ignore_level.clone(),
            ignore_messages,
            default_rules: self.validator.default_rules,
            output: Some(self.validator.output.clone()),
            dry_run: self.validator.dry_run,
            ..Default::default()
        }
    }

    pub fn reporter_settings(&self) -> ReporterSettings {
        ReporterSettings {
            continue_on_fail: self.reporter.continue_on_fail,
            max_message_len: self.reporter.trim,
            quiet: self.reporter.quiet,
            title: None,
        }
    }

    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            timeout_seconds: self.network.timeout_seconds,
            ..Default::default()
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.batch.delay_ms)
    }

    /// Patterns from the ignore file followed by the individual patterns.
    pub async fn ignore_patterns(&self) -> crate::error::Result<Vec<IgnorePattern>> {
        let mut patterns = match &self.validator.ignore_config {
            Some(path) => {
                let text = read_text(&path.to_string_lossy()).await?;
                parse_pattern_list(&text)?
            }
            None => Vec::new(),
        };
        for text in &self.validator.ignore {
            patterns.push(IgnorePattern::parse(text)?);
        }
        Ok(patterns)
    }
}

/// Configuration manager for loading and merging configurations
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration with precedence: file -> environment -> CLI
    pub async fn load_config(cli: &Cli) -> std::result::Result<Config, ValidatorError> {
        Ok(Self::load_config_with(cli, &SystemEnvProvider).await?)
    }

    /// Load configuration with a custom environment provider
    pub async fn load_config_with(cli: &Cli, env: &impl EnvProvider) -> Result<Config> {
        let config = match &cli.config {
            Some(config_path) => Self::load_from_file(config_path).await?,
            None => Self::find_config_file().await?.unwrap_or_default(),
        };

        let config = Self::apply_environment_overrides_with(env, config)?;
        let config = Self::merge_with_cli(config, cli);

        Self::validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a file (TOML or JSON)
    pub async fn load_from_file(path: &Path) -> Result<Config> {
        debug!("loading configuration from {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => match toml::from_str::<Config>(&content) {
                Ok(config) => Ok(config),
                Err(_) => Ok(serde_json::from_str(&content)?),
            },
        }
    }

    /// Find configuration file in standard locations
    pub async fn find_config_file() -> Result<Option<Config>> {
        let config_names = [
            "w3c-html-validator.toml",
            "w3c-html-validator.json",
            ".w3c-html-validator.toml",
            ".w3c-html-validator.json",
        ];

        for name in &config_names {
            let path = PathBuf::from(name);
            if path.exists() {
                return Ok(Some(Self::load_from_file(&path).await?));
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let app_config_dir = config_dir.join("w3c-html-validator");
            for name in &config_names {
                let path = app_config_dir.join(name);
                if path.exists() {
                    return Ok(Some(Self::load_from_file(&path).await?));
                }
            }
        }

        Ok(None)
    }

    /// Apply environment variable overrides with a custom environment provider
    pub fn apply_environment_overrides_with(
        env: &impl EnvProvider,
        mut config: Config,
    ) -> Result<Config> {
        if let Some(check_url) = env_var(env, "CHECK_URL") {
            config.validator.check_url = check_url;
        }
        if let Some(ignore_level) = env_var(env, "IGNORE_LEVEL") {
            config.validator.ignore_level = Some(ignore_level);
        }
        if let Some(delay) = env_var(env, "DELAY") {
            config.batch.delay_ms = parse_env("DELAY", &delay)?;
        }
        if let Some(default_rules) = env_var(env, "DEFAULT_RULES") {
            config.validator.default_rules = parse_env("DEFAULT_RULES", &default_rules)?;
        }
        if let Some(dry_run) = env_var(env, "DRY_RUN") {
            config.validator.dry_run = parse_env("DRY_RUN", &dry_run)?;
        }
        if let Some(quiet) = env_var(env, "QUIET") {
            config.reporter.quiet = parse_env("QUIET", &quiet)?;
        }
        if let Some(continue_on_fail) = env_var(env, "CONTINUE") {
            config.reporter.continue_on_fail = parse_env("CONTINUE", &continue_on_fail)?;
        }

        Ok(config)
    }

    /// Merge CLI arguments with configuration (CLI takes precedence)
    pub fn merge_with_cli(mut config: Config, cli: &Cli) -> Config {
        if let Some(check_url) = &cli.check_url {
            config.validator.check_url = check_url.clone();
        }
        if cli.ignore_level.is_some() {
            config.validator.ignore_level = cli.ignore_level.clone();
        }
        if let Some(output) = &cli.output {
            config.validator.output = output.clone();
        }
        config.validator.default_rules |= cli.default_rules;
        config.validator.dry_run |= cli.dry_run;
        if !cli.ignore.is_empty() {
            config.validator.ignore = cli.ignore.clone();
        }
        if cli.ignore_config.is_some() {
            config.validator.ignore_config = cli.ignore_config.clone();
        }

        if let Some(delay) = cli.delay {
            config.batch.delay_ms = delay;
        }
        if !cli.exclude.is_empty() {
            config.batch.exclude = cli.exclude.clone();
        }

        config.reporter.continue_on_fail |= cli.continue_on_fail;
        config.reporter.quiet |= cli.quiet;
        if cli.trim.is_some() {
            config.reporter.trim = cli.trim;
        }

        if let Some(timeout) = cli.timeout {
            config.network.timeout_seconds = timeout;
        }

        config
    }

    /// Validate configuration values
    pub fn validate_config(config: &Config) -> Result<()> {
        let check_url = &config.validator.check_url;
        if !(check_url.starts_with("http://") || check_url.starts_with("https://")) {
            return Err(invalid("check_url", check_url, "must be an http(s) URL"));
        }

        if let Some(level) = &config.validator.ignore_level
            && level.parse::<IgnoreLevel>().is_err()
        {
            return Err(invalid("ignore_level", level, "must be \"info\" or \"warning\""));
        }

        if config.validator.output.parse::<OutputFormat>().is_err() {
            return Err(invalid(
                "output",
                &config.validator.output,
                "must be \"json\" or \"html\"",
            ));
        }

        if config.network.timeout_seconds == 0 {
            return Err(invalid("timeout_seconds", "0", "must be greater than 0"));
        }

        Ok(())
    }
}

fn env_var(env: &impl EnvProvider, name: &str) -> Option<String> {
    env.get(&format!("{}{}", ENV_PREFIX, name))
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        ConfigError::Environment(format!("Invalid {}{} value: {}", ENV_PREFIX, name, value))
    })
}

fn invalid(field: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
