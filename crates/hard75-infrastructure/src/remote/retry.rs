use anyhow::Result;
use log::{debug, warn};
use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// HTTP retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (default: 2)
    pub max_retries: u32,
    /// Initial backoff duration in milliseconds (default: 500ms)
    pub initial_backoff_ms: u64,
    /// Maximum backoff duration in milliseconds (default: 4000ms)
    pub max_backoff_ms: u64,
    /// Backoff multiplier (default: 2.0 for exponential backoff)
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff_ms: 500,
            max_backoff_ms: 4000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Single attempt, no backoff
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

/// Execute a request with retry logic
///
/// Retries on:
/// - Network errors (connection failures, timeouts)
/// - 5xx server errors
/// - 429 Too Many Requests
///
/// Everything else is returned on the first failure.
pub(crate) async fn execute_with_retry<F, Fut, T>(
    config: &RetryConfig,
    operation_name: &str,
    mut request_fn: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    let mut backoff_ms = config.initial_backoff_ms;

    loop {
        attempt += 1;

        match request_fn().await {
            Ok(response) => {
                if attempt > 1 {
                    debug!("[sync] {} succeeded after {} attempts", operation_name, attempt);
                }
                return Ok(response);
            }
            Err(e) => {
                if attempt <= config.max_retries && is_retryable_error(&e) {
                    warn!(
                        "[sync] {} failed (attempt {}/{}): {}. Retrying in {}ms",
                        operation_name,
                        attempt,
                        config.max_retries + 1,
                        e,
                        backoff_ms
                    );

                    sleep(Duration::from_millis(backoff_ms)).await;

                    backoff_ms = ((backoff_ms as f64 * config.backoff_multiplier) as u64)
                        .min(config.max_backoff_ms);
                } else {
                    if attempt > 1 {
                        warn!("[sync] {} failed after {} attempts", operation_name, attempt);
                    }
                    return Err(e);
                }
            }
        }
    }
}

fn is_retryable_error(error: &anyhow::Error) -> bool {
    if let Some(reqwest_err) = error.downcast_ref::<reqwest::Error>() {
        if let Some(status) = reqwest_err.status() {
            return status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS;
        }
        return reqwest_err.is_connect() || reqwest_err.is_timeout() || reqwest_err.is_request();
    }

    false
}
