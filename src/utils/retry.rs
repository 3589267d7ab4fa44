// Retry logic with Google retryDelay hint support
// Author: kelexine (https://github.com/kelexine)

use backoff::{backoff::Backoff, ExponentialBackoff};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Status used for failures that never produced an HTTP response
/// (connection refused, timeout, reset).
pub const TRANSPORT_ERROR: u16 = 0;

/// How often and how patiently a backend call is retried.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry; later delays grow exponentially.
    pub initial_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts: max_retries.saturating_add(1),
            initial_delay,
        }
    }

    /// Single attempt, no waiting.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(1000))
    }
}

/// Parse Google's retryDelay duration string (e.g., "0.457639761s", "40s")
/// Returns duration in milliseconds, capped at 60 seconds
pub fn parse_retry_delay(error_json: &str) -> Option<Duration> {
    let parsed: Value = serde_json::from_str(error_json).ok()?;

    // Navigate: error.details[] -> find RetryInfo -> retryDelay
    let details = parsed.get("error")?.get("details")?.as_array()?;

    details
        .iter()
        .filter(|detail| {
            detail.get("@type").and_then(Value::as_str)
                == Some("type.googleapis.com/google.rpc.RetryInfo")
        })
        .find_map(|detail| detail.get("retryDelay").and_then(Value::as_str))
        .and_then(parse_duration_string)
}

/// Parse duration strings like "0.457639761s", "40s", "1.5s"
/// Returns duration, capped at 60 seconds
fn parse_duration_string(duration_str: &str) -> Option<Duration> {
    let seconds: f64 = duration_str.strip_suffix('s')?.parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }

    let millis = (seconds.min(60.0) * 1000.0) as u64;
    Some(Duration::from_millis(millis))
}

/// Create exponential backoff configuration for retries
pub fn create_backoff(initial_delay: Duration) -> ExponentialBackoff {
    ExponentialBackoff {
        current_interval: initial_delay,
        initial_interval: initial_delay,
        randomization_factor: 0.3,                         // Add jitter
        multiplier: 2.0,                                  // Double each time
        max_interval: Duration::from_secs(30),            // Cap at 30s
        max_elapsed_time: Some(Duration::from_secs(120)), // Give up after 2 minutes
        ..Default::default()
    }
}

/// Determine if a failure status is retryable
pub fn is_retryable(status: u16) -> bool {
    matches!(status, TRANSPORT_ERROR | 429 | 500 | 502 | 503 | 504)
}

/// Execute operation with retry logic
/// - Uses Google's retryDelay hint if available
/// - Falls back to exponential backoff
/// - Gives up after `policy.max_attempts` or on a non-retryable status
pub async fn with_retry<F, Fut, T>(
    operation_name: &str,
    policy: RetryPolicy,
    mut operation: F,
) -> Result<T, (u16, String)>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, (u16, String)>>,
{
    let mut backoff = create_backoff(policy.initial_delay);
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!("{} succeeded on attempt {}", operation_name, attempt);
                }
                return Ok(result);
            }
            Err((status, error_body)) => {
                if !is_retryable(status) || attempt >= policy.max_attempts {
                    return Err((status, error_body));
                }

                let delay = match parse_retry_delay(&error_body) {
                    Some(google_delay) => {
                        debug!(
                            "{} failed with {} (attempt {}), Google suggests waiting {}ms",
                            operation_name,
                            status,
                            attempt,
                            google_delay.as_millis()
                        );
                        google_delay
                    }
                    None => {
                        let backoff_delay = backoff.next_backoff().unwrap_or(Duration::from_secs(30));
                        warn!(
                            "{} failed with {} (attempt {}/{}), retrying after {}ms",
                            operation_name,
                            status,
                            attempt,
                            policy.max_attempts,
                            backoff_delay.as_millis()
                        );
                        backoff_delay
                    }
                };

                tokio::time::sleep(delay).await;
            }
        }
    }
}
