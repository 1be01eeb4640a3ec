//! Bounded retry with exponential backoff and jitter

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Retry policy shared by upstream fetches and subscriber notifications.
///
/// After failed attempt `n` (0-based) the caller sleeps
/// `base * (2^n + jitter)` with `jitter` drawn from `[0, 1)`. No sleep
/// follows the final attempt.
#[derive(Debug, Clone)]
pub struct Backoff {
    pub attempts: u32,
    pub base: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            attempts: 3,
            base: Duration::from_secs(1),
        }
    }
}

impl Backoff {
    pub fn new(attempts: u32, base: Duration) -> Self {
        Self { attempts, base }
    }

    /// Delay to wait after failed attempt `attempt`
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2f64.powi(attempt as i32) + rand::random::<f64>();
        self.base.mul_f64(factor)
    }
}

/// Run `operation` until it succeeds or the attempts run out.
///
/// Failures are logged and absorbed: `None` means every attempt failed.
pub async fn retry<F, Fut, T>(operation_name: &str, backoff: &Backoff, mut operation: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = crate::Result<T>>,
{
    for attempt in 0..backoff.attempts {
        match operation().await {
            Ok(val) => {
                if attempt > 0 {
                    tracing::info!("{} succeeded after {} retries", operation_name, attempt);
                }
                return Some(val);
            }
            Err(e) => {
                tracing::warn!(
                    "{} failed (attempt {}/{}): {}",
                    operation_name,
                    attempt + 1,
                    backoff.attempts,
                    e
                );
                if attempt + 1 < backoff.attempts {
                    sleep(backoff.delay(attempt)).await;
                }
            }
        }
    }

    tracing::error!("{} failed after {} attempts", operation_name, backoff.attempts);
    None
}
