use anyhow::{Context, Result};
use log::{debug, error};
use std::sync::Arc;

use w3c_html_validator::batch::{Batch, ResultCallback};
use w3c_html_validator::cli::Cli;
use w3c_html_validator::config::ConfigManager;
use w3c_html_validator::discovery::FileDiscovery;
use w3c_html_validator::reporter::{Reporter, dry_run_notice, summary};
use w3c_html_validator::validator::Validator;

/// Process exit status.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitCode {
    Success = 0,
    /// A file failed validation (without `--continue`) or could not be checked
    Failure = 1,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let exit_code = run_main().await?;
    std::process::exit(exit_code as i32);
}

async fn run_main() -> Result<ExitCode> {
    let cli = Cli::parse_args();

    let config = ConfigManager::load_config(&cli)
        .await
        .context("Cannot load configuration")?;
    debug!("effective configuration: {:?}", config);

    let ignore_messages = config
        .ignore_patterns()
        .await
        .context("Cannot read ignore patterns")?;
    let base = config.validator_options(ignore_messages);

    let targets = FileDiscovery::new()
        .with_exclude_patterns(config.batch.exclude.clone())
        .discover(&cli.files)
        .await
        .context("Cannot collect files to validate")?;

    summary(targets.len());
    if config.validator.dry_run {
        dry_run_notice();
    }
    if targets.is_empty() {
        return Ok(ExitCode::Success);
    }

    let validator = Validator::with_config(config.http_client_config())?;
    let reporter = Reporter::new(config.reporter_settings());
    let on_result: ResultCallback = Arc::new(move |outcome| {
        outcome
            .and_then(|results| reporter.report(results))
            .inspect_err(|e| error!("{}", e))
    });

    let outcomes = Batch::spawn(&validator, targets, &base, config.delay(), on_result)
        .join()
        .await;

    if outcomes.iter().any(Result::is_err) {
        Ok(ExitCode::Failure)
    } else {
        Ok(ExitCode::Success)
    }
}
