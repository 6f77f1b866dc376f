//! Bounded retry with a fixed delay.

use std::{fmt::Display, future::Future, time::Duration};

use tokio::time::sleep;

use crate::info;

/// A value that can signal failure without being an error, like a `false`
/// returned by an operation that already logged its own problem.
pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl<T> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

/// Calls `operation` up to `attempts` times and returns the first truthy
/// result. Errors are logged and count as a failed attempt. Between attempts
/// the executor waits `delay`. Returns `None` once all attempts are spent.
pub async fn retry<T, E, F, Fut>(mut operation: F, attempts: u32, delay: Duration) -> Option<T>
where
    T: Truthy,
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    for attempt in 1..=attempts {
        match operation().await {
            Ok(result) if result.is_truthy() => return Some(result),
            Ok(_) => log::warn!("Attempt {} failed", attempt),
            Err(e) => log::warn!("Attempt {} failed: {}", attempt, e),
        }

        if attempt < attempts {
            info!("Retrying in {} seconds...", delay.as_secs());
            sleep(delay).await;
        }
    }

    log::error!("All {} attempts failed.", attempts);
    None
}

/// [`retry`] driven by a [`RetryPolicy`].
pub async fn retry_with<T, E, F, Fut>(policy: RetryPolicy, operation: F) -> Option<T>
where
    T: Truthy,
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    retry(operation, policy.attempts, policy.delay).await
}
