//! Batch Orchestration
//!
//! Validates many files by spawning one task per target, each started
//! `index × delay` after the batch begins. The stagger keeps bursts off the
//! shared checker; it does not limit concurrency, so calls may overlap.

use futures::future::join_all;
use log::debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

use crate::error::{Result, ValidatorError};
use crate::results::ValidatorResults;
use crate::settings::ValidatorOptions;
use crate::validator::Validator;

/// Default spacing between two requests of a batch.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Latest start offset of a batch item; larger staggers are clamped.
const MAX_START_OFFSET: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Receives each outcome as soon as its call completes, typically to report
/// it. Whatever it returns becomes that target's final outcome.
pub type ResultCallback =
    Arc<dyn Fn(Result<ValidatorResults>) -> Result<ValidatorResults> + Send + Sync>;

/// A running batch.
pub struct Batch {
    handles: Vec<JoinHandle<Result<ValidatorResults>>>,
}

impl Batch {
    /// Schedule one validation per target. Every call uses `base` with the
    /// target substituted as its `filename`.
    pub fn spawn(
        validator: &Validator,
        targets: Vec<String>,
        base: &ValidatorOptions,
        delay: Duration,
        on_result: ResultCallback,
    ) -> Self {
        let start = Instant::now();

        let handles = targets
            .into_iter()
            .enumerate()
            .map(|(index, target)| {
                let validator = validator.clone();
                let on_result = Arc::clone(&on_result);
                let options = ValidatorOptions {
                    html: None,
                    filename: Some(target),
                    website: None,
                    ..base.clone()
                };
                let deadline = start_deadline(start, delay, index);

                tokio::spawn(async move {
                    sleep_until(deadline).await;
                    debug!("batch item {} starting: {:?}", index, options.filename);
                    on_result(validator.validate(&options).await)
                })
            })
            .collect();

        Self { handles }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every task and return the outcomes in target order.
    pub async fn join(self) -> Vec<Result<ValidatorResults>> {
        join_all(self.handles)
            .await
            .into_iter()
            .map(|joined| {
                joined.unwrap_or_else(|e| {
                    Err(ValidatorError::Concurrency {
                        details: format!("Task join error: {}", e),
                    })
                })
            })
            .collect()
    }
}

/// When item `index` starts: `index × delay` after `start`, saturating
/// instead of overflowing for huge delays or batches.
fn start_deadline(start: Instant, delay: Duration, index: usize) -> Instant {
    let offset = delay
        .saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
        .min(MAX_START_OFFSET);
    start + offset
}
