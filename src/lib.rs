//! # w3c-html-validator Library
//!
//! Validates HTML strings, local files and websites with the W3C Nu Markup
//! Checker and normalizes every outcome, including network failures, into
//! one [`ValidatorResults`] shape. A batch driver and a console reporter
//! build on top of the single-document [`validate`] call.

pub mod batch;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod reporter;
pub mod request;
pub mod results;
pub mod settings;
pub mod transport;
pub mod validator;

pub use batch::{Batch, DEFAULT_DELAY, ResultCallback};
pub use cli::Cli;
pub use config::{Config, ConfigManager, EnvProvider, SystemEnvProvider};
pub use discovery::FileDiscovery;
pub use error::{ConfigError, Result, TransportError, ValidatorError};
pub use filter::{DEFAULT_IGNORE_LIST, IgnorePattern, MessageFilter, parse_pattern_list};
pub use reporter::{Reporter, ReporterSettings, dry_run_notice, failure_details, reporter, summary};
pub use request::{RequestSpec, USER_AGENT, build_request};
pub use results::{MessageSubType, MessageType, ValidatorResults, ValidatorResultsMessage};
pub use settings::{
    DEFAULT_CHECK_URL, IgnoreLevel, Mode, OutputFormat, Target, ValidatorOptions,
    ValidatorSettings,
};
pub use transport::{HttpClientConfig, HttpTransport, ReqwestTransport, TransportResponse};
pub use validator::{Validator, validate};
